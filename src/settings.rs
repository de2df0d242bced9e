use serde::{Deserialize, Serialize};

/// What scalar drives a particle's color lookup
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum ColorMode {
    /// Per-particle hue that drifts a little every tick
    #[default]
    Hue,
    /// Current heading angle
    Heading,
    /// Current speed within the configured range
    Speed,
}

impl ColorMode {
    pub fn name(&self) -> &str {
        match self {
            ColorMode::Hue => "Hue",
            ColorMode::Heading => "Heading",
            ColorMode::Speed => "Speed",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            ColorMode::Hue => ColorMode::Heading,
            ColorMode::Heading => ColorMode::Speed,
            ColorMode::Speed => ColorMode::Hue,
        }
    }

    pub fn prev(&self) -> Self {
        match self {
            ColorMode::Hue => ColorMode::Speed,
            ColorMode::Heading => ColorMode::Hue,
            ColorMode::Speed => ColorMode::Heading,
        }
    }
}

/// How maze walls are drawn on the canvas
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum WallStyle {
    /// Bright, solid wall blocks
    Solid,
    /// Dimmed walls so the particles carry the scene
    #[default]
    Dim,
    /// Walls invisible; only their effect on motion remains
    Hidden,
}

impl WallStyle {
    pub fn name(&self) -> &str {
        match self {
            WallStyle::Solid => "Solid",
            WallStyle::Dim => "Dim",
            WallStyle::Hidden => "Hidden",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            WallStyle::Solid => WallStyle::Dim,
            WallStyle::Dim => WallStyle::Hidden,
            WallStyle::Hidden => WallStyle::Solid,
        }
    }

    pub fn prev(&self) -> Self {
        match self {
            WallStyle::Solid => WallStyle::Hidden,
            WallStyle::Dim => WallStyle::Solid,
            WallStyle::Hidden => WallStyle::Dim,
        }
    }
}

/// All simulation settings consolidated into one struct
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationSettings {
    // === Grid ===
    /// Pixels per maze cell (6-32); changing it rebuilds the maze
    pub cell_size: f32,

    // === Particles ===
    /// Target particle population (1-500)
    pub num_particles: usize,
    /// Lower bound of the per-redirect speed draw
    pub min_speed: f32,
    /// Upper bound of the per-redirect speed draw
    pub max_speed: f32,
    /// Global multiplier applied to every movement step (0.1-4.0)
    pub speed_scale: f32,

    // === Steering ===
    /// Headings sampled around the circle when blocked (4-64)
    pub probe_samples: usize,
    /// Probe point distance as a fraction of the cell size (0.1-1.0)
    pub probe_distance: f32,

    // === Cosmetics ===
    /// Trail capacity in past positions (0-60)
    pub trail_length: usize,
    /// Hue advance per tick in degrees (0-10)
    pub hue_drift: f32,
    /// Particle radius draw range, only used when exporting frames
    pub min_radius: f32,
    pub max_radius: f32,
    /// What scalar drives particle color
    pub color_mode: ColorMode,
    /// How walls are drawn
    pub wall_style: WallStyle,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            cell_size: 12.0,

            num_particles: 50,
            min_speed: 1.5,
            max_speed: 3.0,
            speed_scale: 1.0,

            // The canvas original probed 16 headings at half a cell.
            probe_samples: 16,
            probe_distance: 0.5,

            trail_length: 15,
            hue_drift: 0.5,
            min_radius: 1.0,
            max_radius: 3.0,
            color_mode: ColorMode::default(),
            wall_style: WallStyle::default(),
        }
    }
}

impl SimulationSettings {
    /// Adjust cell size within bounds; the caller decides whether to
    /// regenerate the maze afterwards
    pub fn adjust_cell_size(&mut self, delta: f32) {
        self.cell_size = (self.cell_size + delta).clamp(6.0, 32.0);
    }

    /// Adjust the lower speed bound, never crossing the upper one
    pub fn adjust_min_speed(&mut self, delta: f32) {
        self.min_speed = (self.min_speed + delta).clamp(0.1, self.max_speed);
    }

    /// Adjust the upper speed bound, never crossing the lower one
    pub fn adjust_max_speed(&mut self, delta: f32) {
        self.max_speed = (self.max_speed + delta).clamp(self.min_speed, 8.0);
    }

    /// Adjust the global speed multiplier within bounds
    pub fn adjust_speed_scale(&mut self, delta: f32) {
        self.speed_scale = (self.speed_scale + delta).clamp(0.1, 4.0);
    }

    /// Adjust the number of probe headings within bounds
    pub fn adjust_probe_samples(&mut self, delta: i32) {
        self.probe_samples = (self.probe_samples as i32 + delta).clamp(4, 64) as usize;
    }

    /// Adjust the probe distance fraction within bounds
    pub fn adjust_probe_distance(&mut self, delta: f32) {
        self.probe_distance = (self.probe_distance + delta).clamp(0.1, 1.0);
    }

    /// Adjust trail capacity within bounds
    pub fn adjust_trail_length(&mut self, delta: i32) {
        self.trail_length = (self.trail_length as i32 + delta).clamp(0, 60) as usize;
    }

    /// Adjust hue drift within bounds
    pub fn adjust_hue_drift(&mut self, delta: f32) {
        self.hue_drift = (self.hue_drift + delta).clamp(0.0, 10.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn speed_bounds_cannot_cross() {
        let mut settings = SimulationSettings::default();
        settings.adjust_min_speed(100.0);
        assert_eq!(settings.min_speed, settings.max_speed);

        settings.adjust_max_speed(-100.0);
        assert_eq!(settings.max_speed, settings.min_speed);
    }

    #[test]
    fn adjusters_clamp_to_their_ranges() {
        let mut settings = SimulationSettings::default();

        settings.adjust_cell_size(1_000.0);
        assert_eq!(settings.cell_size, 32.0);

        settings.adjust_probe_samples(-1_000);
        assert_eq!(settings.probe_samples, 4);

        settings.adjust_trail_length(-1_000);
        assert_eq!(settings.trail_length, 0);

        settings.adjust_probe_distance(5.0);
        assert_eq!(settings.probe_distance, 1.0);
    }
}
