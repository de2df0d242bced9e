use std::fs::File;
use std::path::{Path, PathBuf};

use gif::{Encoder, Frame, Repeat};
use image::{Rgb, RgbImage};

use crate::braille::color_value;
use crate::color::{rgb_from_lut, ColorLut};
use crate::settings::WallStyle;
use crate::simulation::MazeSimulation;

const BACKGROUND: [u8; 3] = [10, 10, 30];
const WALL_SOLID: [u8; 3] = [96, 96, 168];
const WALL_DIM: [u8; 3] = [40, 40, 76];

/// Hundredths of a second per GIF frame (~30 fps)
const GIF_FRAME_DELAY: u16 = 3;

/// Rasterize the current frame at `scale` image pixels per simulation
/// pixel: background, walls, fading trails, then particle discs.
pub fn render_frame(simulation: &MazeSimulation, color_lut: &ColorLut, scale: u32) -> RgbImage {
    let maze = simulation.maze();
    let settings = &simulation.settings;
    let width = (maze.pixel_width() as u32).max(1) * scale;
    let height = (maze.pixel_height() as u32).max(1) * scale;
    let mut img = RgbImage::from_pixel(width, height, Rgb(BACKGROUND));

    let wall_color = match settings.wall_style {
        WallStyle::Solid => Some(WALL_SOLID),
        WallStyle::Dim => Some(WALL_DIM),
        WallStyle::Hidden => None,
    };
    if let Some(color) = wall_color {
        let cell = settings.cell_size * scale as f32;
        for row in 0..maze.rows() {
            for col in 0..maze.cols() {
                if maze.is_wall_cell(col, row) {
                    let x0 = (col as f32 * cell) as u32;
                    let y0 = (row as f32 * cell) as u32;
                    fill_rect(&mut img, x0, y0, cell.ceil() as u32, color);
                }
            }
        }
    }

    for particle in simulation.particles() {
        let value = color_value(particle, settings.color_mode, settings.min_speed, settings.max_speed);
        let (r, g, b) = rgb_from_lut(color_lut, value);

        let trail_len = particle.trail().len();
        for (i, (tx, ty)) in particle.trail().enumerate() {
            let alpha = 0.6 * (i + 1) as f32 / (trail_len + 1) as f32;
            let faded = [
                (r as f32 * alpha) as u8,
                (g as f32 * alpha) as u8,
                (b as f32 * alpha) as u8,
            ];
            fill_disc(&mut img, tx * scale as f32, ty * scale as f32, scale as f32 * 0.6, faded);
        }

        fill_disc(
            &mut img,
            particle.x * scale as f32,
            particle.y * scale as f32,
            particle.radius * scale as f32,
            [r, g, b],
        );
    }

    img
}

/// Write a PNG of the current frame next to the working directory,
/// stamped with the simulation tick.
pub fn save_snapshot(
    simulation: &MazeSimulation,
    color_lut: &ColorLut,
    scale: u32,
) -> Result<PathBuf, String> {
    let path = PathBuf::from(format!("maze-drift-{:06}.png", simulation.ticks()));
    let img = render_frame(simulation, color_lut, scale);
    img.save(&path)
        .map_err(|e| format!("Failed to write snapshot: {}", e))?;
    Ok(path)
}

/// Collects frames while recording and encodes them on stop. Frame count
/// is bounded so a forgotten recording cannot eat the heap.
pub struct GifRecorder {
    frames: Vec<RgbImage>,
    max_frames: usize,
}

impl GifRecorder {
    pub fn new(max_frames: usize) -> Self {
        Self {
            frames: Vec::new(),
            max_frames,
        }
    }

    /// Add a frame; returns false once the budget is spent.
    pub fn capture(&mut self, frame: RgbImage) -> bool {
        if self.frames.len() >= self.max_frames {
            return false;
        }
        self.frames.push(frame);
        self.frames.len() < self.max_frames
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Encode everything captured so far into a looping GIF.
    pub fn finish(self, path: &Path) -> Result<(), String> {
        let first = self
            .frames
            .first()
            .ok_or("No frames captured")?;
        let (width, height) = (first.width() as u16, first.height() as u16);

        let file = File::create(path).map_err(|e| format!("Failed to create GIF file: {}", e))?;
        let mut encoder = Encoder::new(file, width, height, &[])
            .map_err(|e| format!("Failed to start GIF encoder: {}", e))?;
        encoder
            .set_repeat(Repeat::Infinite)
            .map_err(|e| format!("Failed to set GIF repeat: {}", e))?;

        for img in self.frames {
            let raw = img.into_raw();
            let mut frame = Frame::from_rgb_speed(width, height, &raw, 10);
            frame.delay = GIF_FRAME_DELAY;
            encoder
                .write_frame(&frame)
                .map_err(|e| format!("Failed to encode GIF frame: {}", e))?;
        }

        Ok(())
    }
}

fn fill_rect(img: &mut RgbImage, x0: u32, y0: u32, size: u32, color: [u8; 3]) {
    for y in y0..(y0 + size).min(img.height()) {
        for x in x0..(x0 + size).min(img.width()) {
            img.put_pixel(x, y, Rgb(color));
        }
    }
}

fn fill_disc(img: &mut RgbImage, cx: f32, cy: f32, radius: f32, color: [u8; 3]) {
    let r = radius.max(1.0);
    let x_min = (cx - r).floor().max(0.0) as u32;
    let y_min = (cy - r).floor().max(0.0) as u32;
    let x_max = ((cx + r).ceil() as u32).min(img.width().saturating_sub(1));
    let y_max = ((cy + r).ceil() as u32).min(img.height().saturating_sub(1));

    for y in y_min..=y_max {
        for x in x_min..=x_max {
            let dx = x as f32 - cx;
            let dy = y as f32 - cy;
            if dx * dx + dy * dy <= r * r {
                img.put_pixel(x, y, Rgb(color));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::ColorScheme;
    use crate::settings::SimulationSettings;
    use tempfile::tempdir;

    #[test]
    fn frame_dimensions_follow_the_scale() {
        let mut settings = SimulationSettings::default();
        settings.cell_size = 10.0;
        settings.num_particles = 0;
        let sim = MazeSimulation::new(64.0, 64.0, settings);
        let lut = ColorScheme::Rainbow.build_lut();

        let img = render_frame(&sim, &lut, 2);
        assert_eq!((img.width(), img.height()), (120, 120));
    }

    #[test]
    fn walls_and_corridors_get_different_pixels() {
        let mut settings = SimulationSettings::default();
        settings.cell_size = 10.0;
        settings.num_particles = 0;
        let sim = MazeSimulation::new(50.0, 50.0, settings);
        let lut = ColorScheme::Rainbow.build_lut();

        let img = render_frame(&sim, &lut, 1);
        // (0,0) is border wall; (1,1) is the carve start and always open.
        assert_eq!(img.get_pixel(5, 5).0, WALL_DIM);
        assert_eq!(img.get_pixel(15, 15).0, BACKGROUND);
    }

    #[test]
    fn recorder_enforces_its_frame_budget() {
        let mut recorder = GifRecorder::new(2);
        let blank = RgbImage::from_pixel(4, 4, Rgb(BACKGROUND));
        assert!(recorder.capture(blank.clone()));
        assert!(!recorder.capture(blank.clone()));
        assert!(!recorder.capture(blank));
        assert_eq!(recorder.frame_count(), 2);
    }

    #[test]
    fn recorder_writes_a_gif() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("capture.gif");

        let mut recorder = GifRecorder::new(10);
        for shade in [10u8, 80, 160] {
            recorder.capture(RgbImage::from_pixel(8, 8, Rgb([shade, shade, shade])));
        }
        recorder.finish(&path).unwrap();

        let written = std::fs::metadata(&path).unwrap();
        assert!(written.len() > 0);
    }

    #[test]
    fn empty_recording_is_an_error() {
        let recorder = GifRecorder::new(10);
        let dir = tempdir().unwrap();
        assert!(recorder.finish(&dir.path().join("empty.gif")).is_err());
    }
}
