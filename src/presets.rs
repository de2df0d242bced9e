use crate::color::ColorScheme;
use crate::settings::{ColorMode, SimulationSettings, WallStyle};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// A named bundle of simulation settings plus the color scheme
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Preset {
    pub name: String,
    pub description: String,
    pub settings: SimulationSettings,
    pub color_scheme: ColorScheme,
}

impl Preset {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        settings: SimulationSettings,
        color_scheme: ColorScheme,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            settings,
            color_scheme,
        }
    }
}

/// Manager for loading and saving presets
pub struct PresetManager {
    /// Built-in presets that ship with the app
    pub builtin: Vec<Preset>,
    /// User-created presets loaded from disk
    pub user: Vec<Preset>,
}

impl Default for PresetManager {
    fn default() -> Self {
        Self::new()
    }
}

impl PresetManager {
    pub fn new() -> Self {
        let mut manager = Self {
            builtin: builtin_presets(),
            user: Vec::new(),
        };
        if let Some(dir) = Self::presets_dir() {
            manager.load_user_presets(&dir);
        }
        manager
    }

    /// Get the presets directory path
    fn presets_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("maze-drift").join("presets"))
    }

    /// Load user presets from a directory
    fn load_user_presets(&mut self, dir: &Path) {
        let Ok(entries) = fs::read_dir(dir) else {
            return;
        };
        for entry in entries.flatten() {
            if entry.path().extension().is_some_and(|e| e == "json") {
                if let Ok(content) = fs::read_to_string(entry.path()) {
                    if let Ok(preset) = serde_json::from_str::<Preset>(&content) {
                        self.user.push(preset);
                    }
                }
            }
        }
    }

    /// Save a preset to the user presets directory
    pub fn save_preset(&mut self, preset: Preset) -> Result<PathBuf, String> {
        let dir = Self::presets_dir().ok_or("Could not determine config directory")?;
        self.save_preset_in(&dir, preset)
    }

    fn save_preset_in(&mut self, dir: &Path, preset: Preset) -> Result<PathBuf, String> {
        fs::create_dir_all(dir).map_err(|e| format!("Failed to create presets directory: {}", e))?;

        let path = dir.join(format!("{}.json", sanitize_name(&preset.name)));
        let json = serde_json::to_string_pretty(&preset)
            .map_err(|e| format!("Failed to serialize preset: {}", e))?;
        fs::write(&path, json).map_err(|e| format!("Failed to write preset file: {}", e))?;

        if !self.user.iter().any(|p| p.name == preset.name) {
            self.user.push(preset);
        }

        Ok(path)
    }

    /// Delete a user preset by name
    pub fn delete_preset(&mut self, name: &str) -> Result<(), String> {
        let dir = Self::presets_dir().ok_or("Could not determine config directory")?;
        self.delete_preset_in(&dir, name)
    }

    fn delete_preset_in(&mut self, dir: &Path, name: &str) -> Result<(), String> {
        if let Some(pos) = self.user.iter().position(|p| p.name == name) {
            self.user.remove(pos);
        }

        let path = dir.join(format!("{}.json", sanitize_name(name)));
        if path.exists() {
            fs::remove_file(&path).map_err(|e| format!("Failed to delete preset file: {}", e))?;
        }

        Ok(())
    }

    /// Get all presets (builtin + user)
    pub fn all_presets(&self) -> impl Iterator<Item = &Preset> {
        self.builtin.iter().chain(self.user.iter())
    }

    /// Find a preset by name
    pub fn find(&self, name: &str) -> Option<&Preset> {
        self.all_presets().find(|p| p.name.eq_ignore_ascii_case(name))
    }

    /// Next free "custom-N" name for quick in-app saves
    pub fn next_custom_name(&self) -> String {
        let mut n = 1;
        loop {
            let candidate = format!("custom-{}", n);
            if self.find(&candidate).is_none() {
                return candidate;
            }
            n += 1;
        }
    }
}

fn sanitize_name(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect()
}

fn builtin_presets() -> Vec<Preset> {
    vec![
        Preset::new(
            "Classic",
            "The original canvas look: rainbow drifters, medium trails",
            SimulationSettings::default(),
            ColorScheme::Rainbow,
        ),
        Preset::new(
            "Comet",
            "A few fast particles dragging long tails",
            SimulationSettings {
                num_particles: 12,
                trail_length: 45,
                min_speed: 2.5,
                max_speed: 4.5,
                hue_drift: 1.0,
                ..Default::default()
            },
            ColorScheme::Fire,
        ),
        Preset::new(
            "Swarm",
            "A dense population with stubby trails",
            SimulationSettings {
                num_particles: 220,
                trail_length: 4,
                ..Default::default()
            },
            ColorScheme::Ocean,
        ),
        Preset::new(
            "Fine Grid",
            "Narrow corridors and many slow walkers",
            SimulationSettings {
                cell_size: 7.0,
                num_particles: 120,
                min_speed: 0.8,
                max_speed: 1.8,
                ..Default::default()
            },
            ColorScheme::Aurora,
        ),
        Preset::new(
            "Broad Halls",
            "Wide cells, unhurried wandering",
            SimulationSettings {
                cell_size: 24.0,
                num_particles: 30,
                speed_scale: 0.6,
                trail_length: 25,
                ..Default::default()
            },
            ColorScheme::Rainbow,
        ),
        Preset::new(
            "Ghosts",
            "Invisible walls; motion alone betrays the maze",
            SimulationSettings {
                wall_style: WallStyle::Hidden,
                trail_length: 30,
                num_particles: 80,
                ..Default::default()
            },
            ColorScheme::Mono,
        ),
        Preset::new(
            "Compass",
            "Color follows heading, so corridors get a direction tint",
            SimulationSettings {
                color_mode: ColorMode::Heading,
                trail_length: 20,
                num_particles: 100,
                ..Default::default()
            },
            ColorScheme::Rainbow,
        ),
        Preset::new(
            "Slow Drift",
            "Everything at a quarter pace with long memories",
            SimulationSettings {
                speed_scale: 0.4,
                trail_length: 35,
                hue_drift: 0.2,
                ..Default::default()
            },
            ColorScheme::Ocean,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn builtin_presets_have_unique_names() {
        let manager = PresetManager {
            builtin: builtin_presets(),
            user: Vec::new(),
        };
        let names: Vec<_> = manager.all_presets().map(|p| p.name.as_str()).collect();
        let mut deduped = names.clone();
        deduped.sort_unstable();
        deduped.dedup();
        assert_eq!(names.len(), deduped.len());
        assert!(manager.find("classic").is_some());
    }

    #[test]
    fn presets_round_trip_through_a_directory() {
        let dir = tempdir().unwrap();
        let mut manager = PresetManager {
            builtin: builtin_presets(),
            user: Vec::new(),
        };

        let preset = Preset::new(
            "My Maze!",
            "test preset",
            SimulationSettings {
                cell_size: 9.0,
                ..Default::default()
            },
            ColorScheme::Fire,
        );
        let path = manager.save_preset_in(dir.path(), preset).unwrap();
        assert!(path.exists());
        // Punctuation is sanitized out of the filename.
        assert_eq!(path.file_name().unwrap(), "My_Maze_.json");

        let mut reloaded = PresetManager {
            builtin: Vec::new(),
            user: Vec::new(),
        };
        reloaded.load_user_presets(dir.path());
        assert_eq!(reloaded.user.len(), 1);
        assert_eq!(reloaded.user[0].settings.cell_size, 9.0);

        manager.delete_preset_in(dir.path(), "My Maze!").unwrap();
        assert!(!path.exists());
        assert!(manager.user.is_empty());
    }

    #[test]
    fn custom_names_do_not_collide() {
        let mut manager = PresetManager {
            builtin: Vec::new(),
            user: Vec::new(),
        };
        assert_eq!(manager.next_custom_name(), "custom-1");
        manager.user.push(Preset::new(
            "custom-1",
            "",
            SimulationSettings::default(),
            ColorScheme::Rainbow,
        ));
        assert_eq!(manager.next_custom_name(), "custom-2");
    }
}
