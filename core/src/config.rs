//! Configuration management (`config.toml` in the platform config dir).
//!
//! Settings load with per-field defaults, so a missing or malformed file
//! never blocks startup; the machine simply runs with defaults until the
//! user fixes it.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::runtime::DEFAULT_REWIND_CADENCE;

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    /// Audio settings
    #[serde(default)]
    pub audio: AudioConfig,
    /// Save-data storage settings
    #[serde(default)]
    pub storage: StorageConfig,
    /// Rewind checkpoint settings
    #[serde(default)]
    pub rewind: RewindConfig,
}

/// Audio configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioConfig {
    /// Master volume level (default: 1.0, range: 0.0-1.0)
    #[serde(default = "default_volume")]
    pub master_volume: f32,
}

/// Save-data storage configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct StorageConfig {
    /// Directory for save files; `None` keeps saves beside the ROM.
    #[serde(default)]
    pub save_data_dir: Option<String>,
}

/// Rewind checkpoint configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RewindConfig {
    /// Frames between checkpoint captures (default: 60)
    #[serde(default = "default_cadence")]
    pub cadence_frames: u32,
}

fn default_volume() -> f32 {
    1.0
}

fn default_cadence() -> u32 {
    DEFAULT_REWIND_CADENCE
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            master_volume: default_volume(),
        }
    }
}

impl Default for RewindConfig {
    fn default() -> Self {
        Self {
            cadence_frames: default_cadence(),
        }
    }
}

/// Returns the platform-specific configuration directory.
///
/// Returns `None` if the home directory cannot be determined.
pub fn config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("io.kiln", "", "Kiln")
        .map(|dirs| dirs.config_dir().to_path_buf())
}

/// Loads the configuration from disk.
///
/// Returns default values if the file doesn't exist or cannot be parsed.
pub fn load() -> Config {
    config_dir()
        .and_then(|dir| std::fs::read_to_string(dir.join("config.toml")).ok())
        .map(|content| load_from_str(&content))
        .unwrap_or_default()
}

fn load_from_str(content: &str) -> Config {
    toml::from_str(content).unwrap_or_else(|e| {
        tracing::warn!("Malformed config.toml, using defaults: {}", e);
        Config::default()
    })
}

/// Saves the configuration to disk.
///
/// Creates the config directory if it doesn't exist.
pub fn save(config: &Config) -> std::io::Result<()> {
    if let Some(dir) = config_dir() {
        std::fs::create_dir_all(&dir)?;
        let content = toml::to_string_pretty(config).expect("config serializes");
        std::fs::write(dir.join("config.toml"), content)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let config = Config::default();
        assert_eq!(config.audio.master_volume, 1.0);
        assert_eq!(config.rewind.cadence_frames, DEFAULT_REWIND_CADENCE);
        assert!(config.storage.save_data_dir.is_none());
    }

    #[test]
    fn partial_file_fills_missing_sections_with_defaults() {
        let config = load_from_str("[audio]\nmaster_volume = 0.25\n");
        assert_eq!(config.audio.master_volume, 0.25);
        assert_eq!(config.rewind.cadence_frames, DEFAULT_REWIND_CADENCE);
    }

    #[test]
    fn malformed_file_falls_back_to_defaults() {
        let config = load_from_str("this is not toml {{");
        assert_eq!(config, Config::default());
    }

    #[test]
    fn config_round_trips_through_toml() {
        let config = Config {
            audio: AudioConfig {
                master_volume: 0.5,
            },
            storage: StorageConfig {
                save_data_dir: Some("saves".to_string()),
            },
            rewind: RewindConfig { cadence_frames: 30 },
        };
        let text = toml::to_string_pretty(&config).unwrap();
        assert_eq!(load_from_str(&text), config);
    }
}
