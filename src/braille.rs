use crate::color::{fade, map_from_lut, ColorLut};
use crate::settings::{ColorMode, WallStyle};
use crate::simulation::{MazeSimulation, Particle};
use ratatui::style::Color;
use std::f32::consts::{PI, TAU};

/// Braille character rendering for high-resolution terminal graphics.
/// Each Braille character represents a 2x4 grid of dots (8 dots total).
///
/// Unicode Braille patterns: U+2800 to U+28FF (256 patterns)
const BRAILLE_BASE: u32 = 0x2800;

/// Dot position to bit mapping for Braille characters
const BRAILLE_DOTS: [[u8; 4]; 2] = [
    [0x01, 0x02, 0x04, 0x40], // Left column (x=0): rows 0,1,2,3
    [0x08, 0x10, 0x20, 0x80], // Right column (x=1): rows 0,1,2,3
];

const WALL_SOLID: Color = Color::Rgb(96, 96, 168);
const WALL_DIM: Color = Color::Rgb(40, 40, 76);

/// A single rendered Braille cell with position and color
#[derive(Clone, Copy)]
pub struct BrailleCell {
    pub x: u16,
    pub y: u16,
    pub char: char,
    pub color: Color,
}

/// The scalar a particle feeds into the color LUT, per color mode.
pub(crate) fn color_value(particle: &Particle, mode: ColorMode, min_speed: f32, max_speed: f32) -> f32 {
    match mode {
        ColorMode::Hue => particle.hue / 360.0,
        ColorMode::Heading => (particle.heading() + PI) / TAU,
        ColorMode::Speed => {
            let span = (max_speed - min_speed).max(f32::EPSILON);
            (particle.speed() - min_speed) / span
        }
    }
}

/// Render one frame to Braille cells: walls sampled per dot, particles and
/// their fading trails stamped on top. Rendering only reads the simulation.
pub fn render_to_braille(
    simulation: &MazeSimulation,
    canvas_width: u16,
    canvas_height: u16,
    color_lut: &ColorLut,
) -> Vec<BrailleCell> {
    let braille_width = canvas_width as usize * 2;
    let braille_height = canvas_height as usize * 4;
    if braille_width == 0 || braille_height == 0 {
        return Vec::new();
    }

    let maze = simulation.maze();
    let settings = &simulation.settings;
    let sim_w = maze.pixel_width().max(1.0);
    let sim_h = maze.pixel_height().max(1.0);

    // Particle layer in Braille dot space: value drives the LUT, alpha the
    // trail fade. Overlaps keep the brighter dot.
    let mut dots: Vec<Option<(f32, f32)>> = vec![None; braille_width * braille_height];
    let mut stamp = |x: f32, y: f32, value: f32, alpha: f32| {
        if x < 0.0 || y < 0.0 {
            return;
        }
        let bx = (x / sim_w * braille_width as f32) as usize;
        let by = (y / sim_h * braille_height as f32) as usize;
        if bx >= braille_width || by >= braille_height {
            return;
        }
        let slot = &mut dots[by * braille_width + bx];
        if slot.map_or(true, |(_, a)| a < alpha) {
            *slot = Some((value, alpha));
        }
    };

    for particle in simulation.particles() {
        let value = color_value(particle, settings.color_mode, settings.min_speed, settings.max_speed);
        let trail_len = particle.trail().len();
        for (i, (tx, ty)) in particle.trail().enumerate() {
            let alpha = 0.7 * (i + 1) as f32 / (trail_len + 1) as f32;
            stamp(tx, ty, value, alpha);
        }
        stamp(particle.x, particle.y, value, 1.0);
    }

    let wall_color = match settings.wall_style {
        WallStyle::Solid => Some(WALL_SOLID),
        WallStyle::Dim => Some(WALL_DIM),
        WallStyle::Hidden => None,
    };

    let mut cells = Vec::new();
    for cy in 0..canvas_height {
        for cx in 0..canvas_width {
            let mut pattern: u8 = 0;
            let mut particle_pattern: u8 = 0;
            let mut total_value = 0.0;
            let mut particle_dots = 0usize;
            let mut peak_alpha = 0.0f32;

            let base_bx = cx as usize * 2;
            let base_by = cy as usize * 4;

            for dx in 0..2 {
                for dy in 0..4 {
                    let bx = base_bx + dx;
                    let by = base_by + dy;
                    let bit = BRAILLE_DOTS[dx][dy];

                    if let Some((value, alpha)) = dots[by * braille_width + bx] {
                        pattern |= bit;
                        particle_pattern |= bit;
                        total_value += value;
                        particle_dots += 1;
                        peak_alpha = peak_alpha.max(alpha);
                    } else if wall_color.is_some() {
                        // Sample the maze at this dot's center.
                        let sx = (bx as f32 + 0.5) / braille_width as f32 * sim_w;
                        let sy = (by as f32 + 0.5) / braille_height as f32 * sim_h;
                        if maze.is_wall(sx, sy) {
                            pattern |= bit;
                        }
                    }
                }
            }

            if pattern == 0 {
                continue;
            }

            // Any particle dot claims the cell's color; walls otherwise.
            let color = if particle_dots > 0 {
                let avg = total_value / particle_dots as f32;
                fade(map_from_lut(color_lut, avg), peak_alpha)
            } else {
                wall_color.unwrap_or(Color::Reset)
            };

            // Pure-wall cells keep the full wall pattern; mixed cells drop
            // wall dots so faint trails stay legible.
            let glyph_pattern = if particle_dots > 0 { particle_pattern } else { pattern };

            cells.push(BrailleCell {
                x: cx,
                y: cy,
                char: char::from_u32(BRAILLE_BASE + glyph_pattern as u32).unwrap_or(' '),
                color,
            });
        }
    }

    cells
}

/// Simulation pixel extent backing a canvas of character cells; Braille
/// gives 2x4 dots per cell.
pub fn calculate_simulation_size(canvas_width: u16, canvas_height: u16) -> (f32, f32) {
    let width = (canvas_width as usize * 2).max(64);
    let height = (canvas_height as usize * 4).max(64);
    (width as f32, height as f32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::SimulationSettings;

    #[test]
    fn simulation_size_tracks_braille_resolution() {
        assert_eq!(calculate_simulation_size(50, 20), (100.0, 80.0));
        // Tiny canvases clamp so the maze keeps some structure.
        assert_eq!(calculate_simulation_size(4, 2), (64.0, 64.0));
    }

    #[test]
    fn walls_render_unless_hidden() {
        let mut settings = SimulationSettings::default();
        settings.num_particles = 0;
        let mut sim = MazeSimulation::new(64.0, 64.0, settings);
        let lut = crate::color::ColorScheme::Rainbow.build_lut();

        let cells = render_to_braille(&sim, 32, 16, &lut);
        assert!(!cells.is_empty());
        for cell in &cells {
            assert!(cell.x < 32 && cell.y < 16);
        }

        sim.settings.wall_style = WallStyle::Hidden;
        let cells = render_to_braille(&sim, 32, 16, &lut);
        assert!(cells.is_empty());
    }

    #[test]
    fn particles_claim_their_cells() {
        let mut settings = SimulationSettings::default();
        settings.num_particles = 10;
        settings.wall_style = WallStyle::Hidden;
        let sim = MazeSimulation::new(128.0, 128.0, settings);
        let lut = crate::color::ColorScheme::Rainbow.build_lut();

        let cells = render_to_braille(&sim, 64, 32, &lut);
        assert!(!cells.is_empty());
        for cell in &cells {
            assert_ne!(cell.color, Color::Reset);
        }
    }

    #[test]
    fn zero_canvas_renders_nothing() {
        let sim = MazeSimulation::new(64.0, 64.0, SimulationSettings::default());
        let lut = crate::color::ColorScheme::Rainbow.build_lut();
        assert!(render_to_braille(&sim, 0, 0, &lut).is_empty());
    }
}
