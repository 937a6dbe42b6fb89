//! Configuration system
//!
//! Settings are plain serde structs. Any type implementing [`Config`] can be
//! loaded from or saved to `.toml` and `.ron` files.

use std::path::Path;

pub use serde::{Deserialize, Serialize};

use crate::foundation::math::Vec3;
use crate::scene::Fog;

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file, picking the format by extension
    fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let config = match Format::of(path)? {
            Format::Toml => toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))?,
            Format::Ron => ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))?,
        };
        log::info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Save configuration to file, picking the format by extension
    fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let contents = match Format::of(path)? {
            Format::Toml => toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?,
            Format::Ron => ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?,
        };
        std::fs::write(path, contents)?;
        log::debug!("Saved configuration to {}", path.display());
        Ok(())
    }

    /// Load from `path` if given, otherwise use defaults
    fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        path.map_or_else(|| Ok(Self::default()), |path| Self::load_from_file(path))
    }
}

enum Format {
    Toml,
    Ron,
}

impl Format {
    fn of(path: &Path) -> Result<Self, ConfigError> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Ok(Self::Toml),
            Some("ron") => Ok(Self::Ron),
            _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

/// Animation loop pacing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoopSettings {
    /// Frames per second the fixed-rate scheduler aims for
    pub target_fps: f32,

    /// Stop automatically after this many ticks
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_ticks: Option<u64>,
}

impl Default for LoopSettings {
    fn default() -> Self {
        Self {
            target_fps: 60.0,
            max_ticks: None,
        }
    }
}

/// Initial camera placement and projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    /// Vertical field of view in degrees
    pub fov_degrees: f32,
    /// Width over height
    pub aspect: f32,
    /// Near clip distance
    pub near: f32,
    /// Far clip distance
    pub far: f32,
    /// Eye position
    pub position: Vec3,
    /// Look-at point
    pub target: Vec3,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            fov_degrees: 45.0,
            aspect: 16.0 / 9.0,
            near: 1.0,
            far: 1000.0,
            position: Vec3::new(1.0, 2.0, 5.0),
            target: Vec3::zeros(),
        }
    }
}

/// Top-level settings shared by the demo binaries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// `env_logger` filter used when `RUST_LOG` is unset
    pub log_filter: String,

    /// Loop pacing
    #[serde(rename = "loop")]
    pub loop_settings: LoopSettings,

    /// Initial camera
    pub camera: CameraSettings,

    /// Scene fog, disabled when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fog: Option<Fog>,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            log_filter: "info".to_string(),
            loop_settings: LoopSettings::default(),
            camera: CameraSettings::default(),
            fog: None,
        }
    }
}

impl Config for EngineSettings {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Color;
    use std::path::PathBuf;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("scene_engine_{}_{name}", std::process::id()))
    }

    fn custom_settings() -> EngineSettings {
        EngineSettings {
            log_filter: "debug".to_string(),
            loop_settings: LoopSettings {
                target_fps: 30.0,
                max_ticks: Some(120),
            },
            camera: CameraSettings {
                position: Vec3::new(0.0, 5.0, 10.0),
                ..CameraSettings::default()
            },
            fog: Some(Fog::new(Color::new(0.5, 0.5, 0.5), 0.2)),
        }
    }

    #[test]
    fn test_toml_round_trip() {
        let path = temp_path("settings.toml");
        let settings = custom_settings();
        settings.save_to_file(&path).unwrap();
        let loaded = EngineSettings::load_from_file(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_ron_round_trip() {
        let path = temp_path("settings.ron");
        let settings = custom_settings();
        settings.save_to_file(&path).unwrap();
        let loaded = EngineSettings::load_from_file(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let settings: EngineSettings = toml::from_str("[loop]\nmax_ticks = 10\n").unwrap();
        assert_eq!(settings.loop_settings.max_ticks, Some(10));
        assert_eq!(settings.loop_settings.target_fps, 60.0);
        assert_eq!(settings.camera, CameraSettings::default());
        assert!(settings.fog.is_none());
    }

    #[test]
    fn test_unsupported_extension() {
        let result = EngineSettings::default().save_to_file(temp_path("settings.json"));
        assert!(matches!(result, Err(ConfigError::UnsupportedFormat(_))));
        assert!(matches!(
            EngineSettings::load_or_default(None),
            Ok(settings) if settings == EngineSettings::default()
        ));
    }
}
