use crate::braille;
use crate::color::{ColorLut, ColorScheme};
use crate::config::AppConfig;
use crate::export::{self, GifRecorder};
use crate::presets::{Preset, PresetManager};
use crate::simulation::MazeSimulation;

/// Image pixels per simulation pixel in exported frames
const FRAME_SCALE: u32 = 3;

/// GIF recording stops on its own after this many frames
const MAX_GIF_FRAMES: usize = 450;

const GIF_PATH: &str = "maze-drift-capture.gif";

/// Focus state for parameter editing in the sidebar
/// Alphabetically ordered for consistent UI display
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Focus {
    #[default]
    None,
    // Alphabetical order
    CellSize,
    ColorMode,
    ColorScheme,
    HueDrift,
    MaxSpeed,
    MinSpeed,
    Particles,
    ProbeDistance,
    ProbeSamples,
    SpeedScale,
    TicksPerFrame,
    Trail,
    WallStyle,
    // Controls box (not a param)
    Controls,
}

impl Focus {
    /// Tab cycles through parameters in alphabetical order
    pub fn next(&self) -> Focus {
        match self {
            Focus::None | Focus::Controls => Focus::CellSize,
            Focus::CellSize => Focus::ColorMode,
            Focus::ColorMode => Focus::ColorScheme,
            Focus::ColorScheme => Focus::HueDrift,
            Focus::HueDrift => Focus::MaxSpeed,
            Focus::MaxSpeed => Focus::MinSpeed,
            Focus::MinSpeed => Focus::Particles,
            Focus::Particles => Focus::ProbeDistance,
            Focus::ProbeDistance => Focus::ProbeSamples,
            Focus::ProbeSamples => Focus::SpeedScale,
            Focus::SpeedScale => Focus::TicksPerFrame,
            Focus::TicksPerFrame => Focus::Trail,
            Focus::Trail => Focus::WallStyle,
            Focus::WallStyle => Focus::CellSize, // Loop back
        }
    }

    /// Shift+Tab cycles in reverse
    pub fn prev(&self) -> Focus {
        match self {
            Focus::None | Focus::Controls => Focus::WallStyle,
            Focus::CellSize => Focus::WallStyle, // Loop back
            Focus::ColorMode => Focus::CellSize,
            Focus::ColorScheme => Focus::ColorMode,
            Focus::HueDrift => Focus::ColorScheme,
            Focus::MaxSpeed => Focus::HueDrift,
            Focus::MinSpeed => Focus::MaxSpeed,
            Focus::Particles => Focus::MinSpeed,
            Focus::ProbeDistance => Focus::Particles,
            Focus::ProbeSamples => Focus::ProbeDistance,
            Focus::SpeedScale => Focus::ProbeSamples,
            Focus::TicksPerFrame => Focus::SpeedScale,
            Focus::Trail => Focus::TicksPerFrame,
            Focus::WallStyle => Focus::Trail,
        }
    }

    /// Line index in the parameters box (alphabetical order)
    pub fn line_index(&self) -> u16 {
        match self {
            Focus::None | Focus::Controls => 0,
            Focus::CellSize => 0,
            Focus::ColorMode => 1,
            Focus::ColorScheme => 2,
            Focus::HueDrift => 3,
            Focus::MaxSpeed => 4,
            Focus::MinSpeed => 5,
            Focus::Particles => 6,
            Focus::ProbeDistance => 7,
            Focus::ProbeSamples => 8,
            Focus::SpeedScale => 9,
            Focus::TicksPerFrame => 10,
            Focus::Trail => 11,
            Focus::WallStyle => 12,
        }
    }

    /// Check if focus is on a parameter (not Controls or None)
    pub fn is_param(&self) -> bool {
        !matches!(self, Focus::None | Focus::Controls)
    }
}

/// Main application state
pub struct App {
    pub simulation: MazeSimulation,
    pub presets: PresetManager,
    pub color_scheme: ColorScheme,
    pub color_lut: ColorLut,
    pub focus: Focus,
    pub fullscreen_mode: bool,
    pub ticks_per_frame: usize,
    pub show_help: bool,
    pub help_scroll: u16,
    pub controls_scroll: u16,
    recorder: Option<GifRecorder>,
    /// Transient feedback line (snapshot saved, recording state, errors)
    pub notice: Option<String>,
}

impl App {
    pub fn new(canvas_width: u16, canvas_height: u16, config: AppConfig) -> Self {
        let (sim_width, sim_height) = braille::calculate_simulation_size(canvas_width, canvas_height);
        let color_scheme = config.color_scheme;
        Self {
            simulation: MazeSimulation::new(sim_width, sim_height, config.settings),
            presets: PresetManager::new(),
            color_lut: color_scheme.build_lut(),
            color_scheme,
            focus: Focus::Controls,
            fullscreen_mode: false,
            ticks_per_frame: config.ticks_per_frame.clamp(1, 10),
            show_help: false,
            help_scroll: 0,
            controls_scroll: 0,
            recorder: None,
            notice: None,
        }
    }

    /// Run simulation ticks for the current frame and feed the recorder
    pub fn tick(&mut self) {
        if self.simulation.paused {
            return;
        }
        for _ in 0..self.ticks_per_frame {
            self.simulation.step();
        }
        let mut budget_spent = false;
        if let Some(recorder) = &mut self.recorder {
            let frame = export::render_frame(&self.simulation, &self.color_lut, FRAME_SCALE);
            budget_spent = !recorder.capture(frame);
        }
        if budget_spent {
            self.stop_recording();
        }
    }

    /// Handle adjusting the currently focused parameter
    pub fn adjust_focused_up(&mut self) {
        match self.focus {
            Focus::None | Focus::Controls => {}
            Focus::CellSize => self.simulation.adjust_cell_size(2.0),
            Focus::ColorMode => self.cycle_color_mode(),
            Focus::ColorScheme => self.cycle_color_scheme(),
            Focus::HueDrift => self.simulation.settings.adjust_hue_drift(0.25),
            Focus::MaxSpeed => self.simulation.settings.adjust_max_speed(0.25),
            Focus::MinSpeed => self.simulation.settings.adjust_min_speed(0.25),
            Focus::Particles => self.simulation.adjust_particles(10),
            Focus::ProbeDistance => self.simulation.settings.adjust_probe_distance(0.05),
            Focus::ProbeSamples => self.simulation.settings.adjust_probe_samples(4),
            Focus::SpeedScale => self.simulation.settings.adjust_speed_scale(0.1),
            Focus::TicksPerFrame => self.increase_speed(),
            Focus::Trail => self.simulation.settings.adjust_trail_length(5),
            Focus::WallStyle => self.cycle_wall_style(),
        }
    }

    /// Handle adjusting the currently focused parameter
    pub fn adjust_focused_down(&mut self) {
        match self.focus {
            Focus::None | Focus::Controls => {}
            Focus::CellSize => self.simulation.adjust_cell_size(-2.0),
            Focus::ColorMode => self.cycle_color_mode_prev(),
            Focus::ColorScheme => self.cycle_color_scheme_prev(),
            Focus::HueDrift => self.simulation.settings.adjust_hue_drift(-0.25),
            Focus::MaxSpeed => self.simulation.settings.adjust_max_speed(-0.25),
            Focus::MinSpeed => self.simulation.settings.adjust_min_speed(-0.25),
            Focus::Particles => self.simulation.adjust_particles(-10),
            Focus::ProbeDistance => self.simulation.settings.adjust_probe_distance(-0.05),
            Focus::ProbeSamples => self.simulation.settings.adjust_probe_samples(-4),
            Focus::SpeedScale => self.simulation.settings.adjust_speed_scale(-0.1),
            Focus::TicksPerFrame => self.decrease_speed(),
            Focus::Trail => self.simulation.settings.adjust_trail_length(-5),
            Focus::WallStyle => self.cycle_wall_style_prev(),
        }
    }

    pub fn next_focus(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn prev_focus(&mut self) {
        self.focus = self.focus.prev();
    }

    pub fn toggle_pause(&mut self) {
        self.simulation.toggle_pause();
    }

    /// New maze, new particles
    pub fn regenerate(&mut self) {
        self.simulation.regenerate();
        self.notice = None;
    }

    pub fn toggle_fullscreen(&mut self) {
        self.fullscreen_mode = !self.fullscreen_mode;
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
        if self.show_help {
            self.help_scroll = 0; // Reset scroll when opening
        }
    }

    pub fn scroll_help_up(&mut self) {
        self.help_scroll = self.help_scroll.saturating_sub(1);
    }

    pub fn scroll_help_down(&mut self, max_scroll: u16) {
        self.help_scroll = (self.help_scroll + 1).min(max_scroll);
    }

    pub fn scroll_controls_up(&mut self) {
        self.controls_scroll = self.controls_scroll.saturating_sub(1);
    }

    pub fn scroll_controls_down(&mut self, max_scroll: u16) {
        self.controls_scroll = (self.controls_scroll + 1).min(max_scroll);
    }

    /// Resize the simulation to a new canvas: a full maze + particle reset
    pub fn resize(&mut self, canvas_width: u16, canvas_height: u16) {
        let (sim_width, sim_height) = braille::calculate_simulation_size(canvas_width, canvas_height);
        self.simulation.resize(sim_width, sim_height);
    }

    pub fn increase_speed(&mut self) {
        self.ticks_per_frame = (self.ticks_per_frame + 1).min(10);
    }

    pub fn decrease_speed(&mut self) {
        self.ticks_per_frame = self.ticks_per_frame.saturating_sub(1).max(1);
    }

    pub fn cycle_color_scheme(&mut self) {
        self.color_scheme = self.color_scheme.next();
        self.color_lut = self.color_scheme.build_lut();
    }

    pub fn cycle_color_scheme_prev(&mut self) {
        self.color_scheme = self.color_scheme.prev();
        self.color_lut = self.color_scheme.build_lut();
    }

    pub fn cycle_color_mode(&mut self) {
        self.simulation.settings.color_mode = self.simulation.settings.color_mode.next();
    }

    pub fn cycle_color_mode_prev(&mut self) {
        self.simulation.settings.color_mode = self.simulation.settings.color_mode.prev();
    }

    pub fn cycle_wall_style(&mut self) {
        self.simulation.settings.wall_style = self.simulation.settings.wall_style.next();
    }

    pub fn cycle_wall_style_prev(&mut self) {
        self.simulation.settings.wall_style = self.simulation.settings.wall_style.prev();
    }

    /// Apply a preset: new settings, new maze, new particles
    pub fn apply_preset(&mut self, preset: &Preset) {
        self.simulation.settings = preset.settings.clone();
        self.color_scheme = preset.color_scheme;
        self.color_lut = self.color_scheme.build_lut();
        self.simulation.regenerate();
        self.notice = Some(format!("Preset: {}", preset.name));
    }

    /// Apply a builtin preset by number-key index
    pub fn apply_preset_index(&mut self, index: usize) {
        if let Some(preset) = self.presets.builtin.get(index).cloned() {
            self.apply_preset(&preset);
        }
    }

    /// Save the current settings as a user preset
    pub fn save_current_as_preset(&mut self) {
        let preset = Preset::new(
            self.presets.next_custom_name(),
            "Saved from a live session",
            self.simulation.settings.clone(),
            self.color_scheme,
        );
        self.notice = Some(match self.presets.save_preset(preset) {
            Ok(path) => format!("Saved {}", path.display()),
            Err(err) => err,
        });
    }

    /// Write a PNG of the current frame
    pub fn snapshot(&mut self) {
        self.notice = Some(
            match export::save_snapshot(&self.simulation, &self.color_lut, FRAME_SCALE) {
                Ok(path) => format!("Saved {}", path.display()),
                Err(err) => err,
            },
        );
    }

    pub fn is_recording(&self) -> bool {
        self.recorder.is_some()
    }

    /// Start or stop GIF capture
    pub fn toggle_recording(&mut self) {
        if self.recorder.is_some() {
            self.stop_recording();
        } else {
            self.recorder = Some(GifRecorder::new(MAX_GIF_FRAMES));
            self.notice = Some("Recording...".to_string());
        }
    }

    fn stop_recording(&mut self) {
        if let Some(recorder) = self.recorder.take() {
            let frames = recorder.frame_count();
            self.notice = Some(match recorder.finish(std::path::Path::new(GIF_PATH)) {
                Ok(()) => format!("Saved {} ({} frames)", GIF_PATH, frames),
                Err(err) => err,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn focus_cycle_visits_every_parameter_once() {
        let mut focus = Focus::CellSize;
        let mut seen = vec![focus];
        loop {
            focus = focus.next();
            if focus == Focus::CellSize {
                break;
            }
            assert!(!seen.contains(&focus), "{focus:?} visited twice");
            seen.push(focus);
        }
        assert_eq!(seen.len(), 13);

        for f in &seen {
            assert_eq!(f.next().prev(), *f);
            assert!(f.is_param());
        }
    }

    #[test]
    fn applying_a_preset_swaps_settings_and_scheme() {
        let mut app = App::new(40, 20, AppConfig::default());
        let preset = app.presets.builtin[1].clone();
        app.apply_preset(&preset);

        assert_eq!(app.simulation.settings.trail_length, preset.settings.trail_length);
        assert_eq!(app.color_scheme, preset.color_scheme);
        assert_eq!(app.simulation.ticks(), 0);
    }

    #[test]
    fn speed_stays_within_bounds() {
        let mut app = App::new(40, 20, AppConfig::default());
        for _ in 0..50 {
            app.increase_speed();
        }
        assert_eq!(app.ticks_per_frame, 10);
        for _ in 0..50 {
            app.decrease_speed();
        }
        assert_eq!(app.ticks_per_frame, 1);
    }
}
