use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::scan::camera::CameraRequest;

/// Conversion endpoint of the companion processing backend
const DEFAULT_PROCESSOR_URL: &str = "http://127.0.0.1:5000/process";

/// Application configuration
///
/// Persisted as JSON in the user's config directory and loaded once at
/// startup. Anything missing or unreadable falls back to defaults.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Endpoint of the delegated processing service
    pub processor_url: String,
    /// Convert through the delegated service instead of locally
    pub prefer_remote: bool,
    /// Capture device request parameters
    pub camera: CameraRequest,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            processor_url: DEFAULT_PROCESSOR_URL.to_string(),
            prefer_remote: false,
            camera: CameraRequest::default(),
        }
    }
}

impl AppConfig {
    /// Where the configuration lives:
    /// - Linux: ~/.config/film-scanner/config.json
    /// - macOS: ~/Library/Application Support/film-scanner/config.json
    /// - Windows: %APPDATA%\film-scanner\config.json
    fn config_path() -> PathBuf {
        let mut path = dirs::config_dir()
            .or_else(dirs::home_dir)
            .expect("Could not determine user config directory");

        path.push("film-scanner");
        path.push("config.json");
        path
    }

    /// Load the configuration, falling back to defaults on any problem
    pub fn load() -> Self {
        let path = Self::config_path();
        match std::fs::read_to_string(&path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("⚠️  Ignoring malformed config {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }

    /// Persist the configuration. Failures are logged, not fatal.
    pub fn save(&self) {
        let path = Self::config_path();
        if let Some(parent) = path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }

        match serde_json::to_string_pretty(self) {
            Ok(json) => {
                if let Err(e) = std::fs::write(&path, json) {
                    eprintln!("⚠️  Could not save config: {}", e);
                }
            }
            Err(e) => eprintln!("⚠️  Could not serialize config: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan::camera::CameraFacing;

    #[test]
    fn test_defaults_point_at_the_local_backend() {
        let config = AppConfig::default();
        assert_eq!(config.processor_url, "http://127.0.0.1:5000/process");
        assert!(!config.prefer_remote);
        assert_eq!(config.camera.facing, CameraFacing::Environment);
    }

    #[test]
    fn test_serialization_round_trip() {
        let mut config = AppConfig::default();
        config.prefer_remote = true;
        config.processor_url = "http://lab-server:5000/process".to_string();
        config.camera.ideal_width = 3840;
        config.camera.ideal_height = 2160;

        let json = serde_json::to_string(&config).unwrap();
        let restored: AppConfig = serde_json::from_str(&json).unwrap();

        assert_eq!(config, restored);
    }

    #[test]
    fn test_unknown_fields_do_not_break_loading() {
        let json = r#"{
            "processor_url": "http://127.0.0.1:5000/process",
            "prefer_remote": false,
            "camera": {"ideal_width": 1920, "ideal_height": 1080, "facing": "environment"},
            "leftover_from_newer_version": 42
        }"#;

        let config: AppConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config, AppConfig::default());
    }
}
