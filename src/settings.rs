//! Repair bay settings
//!
//! Read from a JSON file next to the task files. Missing or malformed files
//! fall back to defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Tunables for task loading and the life support meter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Directory holding `level<N>_module<M>.txt` files
    pub task_dir: PathBuf,

    // === Life support ===
    /// Gain for a repaired module
    pub life_reward: f32,
    /// Loss for a failed attempt
    pub life_penalty: f32,
    pub life_max: f32,
    /// Drain per second on level 1
    pub base_drain_rate: f32,
    /// Extra drain per second for each level past the first
    pub drain_rate_per_level: f32,

    /// `env_logger` filter used when `RUST_LOG` is unset
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            task_dir: PathBuf::from("tasks"),

            life_reward: 10.0,
            life_penalty: 10.0,
            life_max: 100.0,
            base_drain_rate: 0.5,
            drain_rate_per_level: 0.15,

            log_level: "info".to_string(),
        }
    }
}

impl Settings {
    /// Default file name
    pub const FILE_NAME: &'static str = "repair_bay.json";

    /// Life support drain per second on `level` (1-based)
    pub fn drain_rate(&self, level: u32) -> f32 {
        self.base_drain_rate + level.saturating_sub(1) as f32 * self.drain_rate_per_level
    }

    /// Load settings from `path`, or defaults if it cannot be read
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    settings
                }
                Err(e) => {
                    log::warn!("Malformed settings {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drain_rate_by_level() {
        let settings = Settings::default();
        assert!((settings.drain_rate(1) - 0.5).abs() < 1e-6);
        assert!((settings.drain_rate(3) - 0.8).abs() < 1e-6);
        assert!((settings.drain_rate(0) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings: Settings = serde_json::from_str(r#"{ "life_reward": 25.0 }"#).unwrap();
        assert_eq!(settings.life_reward, 25.0);
        assert_eq!(settings.life_max, 100.0);
        assert_eq!(settings.task_dir, PathBuf::from("tasks"));
    }

    #[test]
    fn test_load_missing_or_malformed() {
        let dir = std::env::temp_dir();
        let missing = dir.join(format!("repair-bay-no-settings-{}.json", std::process::id()));
        assert_eq!(Settings::load(&missing), Settings::default());

        let bad = dir.join(format!("repair-bay-bad-settings-{}.json", std::process::id()));
        std::fs::write(&bad, "{ not json").unwrap();
        assert_eq!(Settings::load(&bad), Settings::default());
        std::fs::remove_file(&bad).unwrap();
    }

    #[test]
    fn test_save_then_load() {
        let path = std::env::temp_dir().join(format!("repair-bay-settings-{}.json", std::process::id()));
        let settings = Settings {
            life_penalty: 15.0,
            log_level: "debug".into(),
            ..Default::default()
        };
        settings.save(&path).unwrap();
        assert_eq!(Settings::load(&path), settings);
        std::fs::remove_file(&path).unwrap();
    }
}
