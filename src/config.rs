use crate::color::ColorScheme;
use crate::settings::SimulationSettings;
use crate::simulation::MAX_PARTICLES;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// On-disk format version; bumped when a field changes meaning.
pub const CONFIG_VERSION: u32 = 1;

/// Everything needed to reproduce a session: the simulation settings plus
/// the app-level knobs that live outside them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub version: u32,
    pub settings: SimulationSettings,
    pub color_scheme: ColorScheme,
    pub ticks_per_frame: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            settings: SimulationSettings::default(),
            color_scheme: ColorScheme::default(),
            ticks_per_frame: 1,
        }
    }
}

impl AppConfig {
    /// Write the config as pretty-printed JSON.
    pub fn save_to_file(&self, path: &Path) -> Result<(), String> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| format!("Could not serialize config: {}", e))?;
        fs::write(path, json).map_err(|e| format!("Could not write {}: {}", path.display(), e))
    }

    /// Read a config back. The file is hand-editable, so numeric fields are
    /// clamped into their live ranges rather than trusted.
    pub fn load_from_file(path: &Path) -> Result<Self, String> {
        let content = fs::read_to_string(path)
            .map_err(|e| format!("Could not read {}: {}", path.display(), e))?;
        let mut config: Self = serde_json::from_str(&content)
            .map_err(|e| format!("Could not parse {}: {}", path.display(), e))?;
        config.clamp_ranges();
        Ok(config)
    }

    fn clamp_ranges(&mut self) {
        let s = &mut self.settings;
        s.cell_size = s.cell_size.clamp(6.0, 32.0);
        s.num_particles = s.num_particles.clamp(1, MAX_PARTICLES);
        s.min_speed = s.min_speed.clamp(0.1, 8.0);
        s.max_speed = s.max_speed.clamp(s.min_speed, 8.0);
        s.speed_scale = s.speed_scale.clamp(0.1, 4.0);
        s.probe_samples = s.probe_samples.clamp(4, 64);
        s.probe_distance = s.probe_distance.clamp(0.1, 1.0);
        s.trail_length = s.trail_length.min(60);
        s.hue_drift = s.hue_drift.clamp(0.0, 10.0);
        self.ticks_per_frame = self.ticks_per_frame.clamp(1, 10);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{ColorMode, WallStyle};
    use tempfile::NamedTempFile;

    #[test]
    fn config_serialization_round_trips() {
        let config = AppConfig {
            version: CONFIG_VERSION,
            settings: SimulationSettings {
                cell_size: 18.0,
                num_particles: 120,
                min_speed: 0.8,
                max_speed: 4.2,
                speed_scale: 1.5,
                probe_samples: 24,
                probe_distance: 0.35,
                trail_length: 40,
                hue_drift: 2.0,
                min_radius: 1.5,
                max_radius: 4.0,
                color_mode: ColorMode::Heading,
                wall_style: WallStyle::Hidden,
            },
            color_scheme: ColorScheme::Fire,
            ticks_per_frame: 3,
        };

        let json = serde_json::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.version, config.version);
        assert_eq!(parsed.settings.cell_size, 18.0);
        assert_eq!(parsed.settings.num_particles, 120);
        assert_eq!(parsed.settings.probe_samples, 24);
        assert_eq!(parsed.settings.probe_distance, 0.35);
        assert_eq!(parsed.settings.color_mode, ColorMode::Heading);
        assert_eq!(parsed.settings.wall_style, WallStyle::Hidden);
        assert_eq!(parsed.color_scheme, ColorScheme::Fire);
        assert_eq!(parsed.ticks_per_frame, 3);
    }

    #[test]
    fn config_file_saves_and_loads() {
        let config = AppConfig::default();

        let temp_file = NamedTempFile::new().unwrap();
        config.save_to_file(temp_file.path()).unwrap();

        let loaded = AppConfig::load_from_file(temp_file.path()).unwrap();
        assert_eq!(loaded.version, config.version);
        assert_eq!(loaded.settings.num_particles, config.settings.num_particles);
        assert_eq!(loaded.settings.cell_size, config.settings.cell_size);
    }

    #[test]
    fn hand_edited_values_are_clamped_on_load() {
        let mut wild = AppConfig::default();
        wild.settings.cell_size = 1_000.0;
        wild.settings.num_particles = 1_000_000;
        wild.settings.probe_distance = -3.0;
        wild.ticks_per_frame = 99;

        let temp_file = NamedTempFile::new().unwrap();
        wild.save_to_file(temp_file.path()).unwrap();

        let loaded = AppConfig::load_from_file(temp_file.path()).unwrap();
        assert_eq!(loaded.settings.cell_size, 32.0);
        assert_eq!(loaded.settings.num_particles, MAX_PARTICLES);
        assert_eq!(loaded.settings.probe_distance, 0.1);
        assert_eq!(loaded.ticks_per_frame, 10);
    }

    #[test]
    fn invalid_config_file_is_an_error() {
        let temp_file = NamedTempFile::new().unwrap();
        std::fs::write(temp_file.path(), "not valid json").unwrap();

        assert!(AppConfig::load_from_file(temp_file.path()).is_err());
    }

    #[test]
    fn missing_config_file_is_an_error() {
        let result = AppConfig::load_from_file(Path::new("/nonexistent/path/config.json"));
        assert!(result.is_err());
    }
}
