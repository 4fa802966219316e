use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;

use crate::display::{RenderThreadMode, ScreenOrientation};
use crate::error::{HostError, HostResult};

/// Host configuration loaded from a TOML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HostConfig {
    #[serde(default)]
    pub os: OsConfig,

    #[serde(default)]
    pub display: DisplayConfig,

    #[serde(default)]
    pub window: WindowConfig,

    #[serde(default)]
    pub project: ProjectConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OsConfig {
    #[serde(default)]
    pub low_processor_usage_mode: bool,

    #[serde(default = "default_low_processor_sleep_usec")]
    pub low_processor_usage_mode_sleep_usec: u32,

    #[serde(default)]
    pub verbose_stdout: bool,

    /// Preferred audio driver by name. Empty picks the first registered one.
    #[serde(default)]
    pub audio_driver: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// `winit` or `headless`.
    #[serde(default = "default_display_backend")]
    pub backend: String,

    #[serde(default = "default_video_driver")]
    pub video_driver: String,

    #[serde(default = "default_true")]
    pub vsync: bool,

    #[serde(default = "default_true")]
    pub keep_screen_on: bool,

    #[serde(default)]
    pub no_window: bool,

    #[serde(default)]
    pub orientation: ScreenOrientation,

    #[serde(default)]
    pub render_thread_mode: RenderThreadMode,

    #[serde(default)]
    pub allow_hidpi: bool,

    #[serde(default)]
    pub allow_layered: bool,

    #[serde(default)]
    pub emulate_touch_from_mouse: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowConfig {
    #[serde(default = "default_title")]
    pub title: String,

    #[serde(default = "default_width")]
    pub width: u32,

    #[serde(default = "default_height")]
    pub height: u32,

    #[serde(default)]
    pub fullscreen: bool,

    #[serde(default = "default_true")]
    pub centered: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectConfig {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub custom_features: Vec<String>,
}

fn default_low_processor_sleep_usec() -> u32 {
    10_000
}
fn default_display_backend() -> String {
    "winit".to_string()
}
fn default_video_driver() -> String {
    "GLES3".to_string()
}
fn default_title() -> String {
    "NewEngine".to_string()
}
fn default_width() -> u32 {
    1024
}
fn default_height() -> u32 {
    600
}
fn default_true() -> bool {
    true
}

impl Default for OsConfig {
    fn default() -> Self {
        Self {
            low_processor_usage_mode: false,
            low_processor_usage_mode_sleep_usec: default_low_processor_sleep_usec(),
            verbose_stdout: false,
            audio_driver: String::new(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            backend: default_display_backend(),
            video_driver: default_video_driver(),
            vsync: true,
            keep_screen_on: true,
            no_window: false,
            orientation: ScreenOrientation::default(),
            render_thread_mode: RenderThreadMode::default(),
            allow_hidpi: false,
            allow_layered: false,
            emulate_touch_from_mouse: false,
        }
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            width: default_width(),
            height: default_height(),
            fullscreen: false,
            centered: true,
        }
    }
}

impl HostConfig {
    /// Missing file gives defaults; a file that exists but does not parse is an error.
    pub fn load_or_default(path: impl AsRef<Path>) -> HostResult<Self> {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(s) => Self::from_toml_str(&s)
                .map_err(|e| HostError::Config(format!("parse {}: {}", path.display(), e))),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => {
                log::warn!("config: cannot read {} ({}), using defaults", path.display(), e);
                Ok(Self::default())
            }
        }
    }

    pub fn from_toml_str(s: &str) -> HostResult<Self> {
        toml::from_str(s).map_err(|e| HostError::Config(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = HostConfig::load_or_default(dir.path().join("absent.toml")).unwrap();
        assert_eq!(cfg.os.low_processor_usage_mode_sleep_usec, 10_000);
        assert!(!cfg.os.low_processor_usage_mode);
        assert!(cfg.display.keep_screen_on);
        assert_eq!(cfg.display.backend, "winit");
        assert_eq!(cfg.display.orientation, ScreenOrientation::Landscape);
        assert_eq!(cfg.display.render_thread_mode, RenderThreadMode::Safe);
        assert_eq!(cfg.window.title, "NewEngine");
    }

    #[test]
    fn test_partial_file_overrides_only_given_keys() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[os]
low_processor_usage_mode = true

[display]
backend = "headless"
orientation = "sensor_portrait"
render_thread_mode = "separate"

[project]
name = "Demo: Part 2"
custom_features = ["demo"]
"#
        )
        .unwrap();

        let cfg = HostConfig::load_or_default(file.path()).unwrap();
        assert!(cfg.os.low_processor_usage_mode);
        assert_eq!(cfg.os.low_processor_usage_mode_sleep_usec, 10_000);
        assert_eq!(cfg.display.backend, "headless");
        assert_eq!(cfg.display.orientation, ScreenOrientation::SensorPortrait);
        assert_eq!(cfg.display.render_thread_mode, RenderThreadMode::Separate);
        assert!(cfg.display.vsync);
        assert_eq!(cfg.window.width, 1024);
        assert_eq!(cfg.project.custom_features, vec!["demo".to_string()]);
    }

    #[test]
    fn test_malformed_file_is_config_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[os\nlow_processor_usage_mode = yes").unwrap();
        let err = HostConfig::load_or_default(file.path()).unwrap_err();
        assert!(matches!(err, HostError::Config(_)));
    }

    #[test]
    fn test_unknown_orientation_is_rejected() {
        let err = HostConfig::from_toml_str("[display]\norientation = \"diagonal\"").unwrap_err();
        assert!(matches!(err, HostError::Config(_)));
    }
}
