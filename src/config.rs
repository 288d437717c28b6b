use crate::capture::CropGeometry;
use crate::classifier::ModelSource;
use crate::error::AppError;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variables override file values, e.g.
/// `COLOR_CODER__CAPTURE__TIMEOUT_MS=2000`.
const ENV_PREFIX: &str = "COLOR_CODER";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Configuration {
    pub display: DisplayConfig,
    pub capture: CaptureConfig,
    pub model: ModelSource,
    pub log_level: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub screen_width: f64,
    /// Horizontal padding around the rendered inspection region.
    pub region_inset: f64,
    pub crop: CropGeometry,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    pub photo_path: Option<PathBuf>,
    pub timeout_ms: u64,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            display: DisplayConfig::default(),
            capture: CaptureConfig::default(),
            model: ModelSource::BuiltIn,
            log_level: "info".to_string(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            screen_width: 393.0,
            region_inset: 40.0,
            crop: CropGeometry::default(),
        }
    }
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            photo_path: None,
            timeout_ms: 5_000,
        }
    }
}

impl DisplayConfig {
    /// Rendered side length of the square inspection region.
    pub fn region_width(&self) -> f64 {
        self.screen_width - self.region_inset
    }
}

impl CaptureConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Configuration {
    /// Defaults, then the optional file, then the environment.
    pub fn load(path: Option<&Path>) -> Result<Self, AppError> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(false));
        }
        let configuration: Configuration = builder
            .add_source(config::Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()?
            .try_deserialize()?;

        configuration.validate().map_err(AppError::InvalidConfig)?;
        Ok(configuration)
    }

    pub fn validate(&self) -> Result<(), String> {
        if !(self.display.region_width() > 0.0) {
            return Err(format!(
                "Screen width {} leaves no room for an inset of {}",
                self.display.screen_width, self.display.region_inset
            ));
        }

        let crop = &self.display.crop;
        if !(crop.display_height > 0.0) {
            return Err("Display height must be greater than 0".to_string());
        }

        if !(crop.crop_box_length > 0.0) {
            return Err("Crop box length must be greater than 0".to_string());
        }

        if self.capture.timeout_ms == 0 {
            return Err("Capture timeout must be greater than 0".to_string());
        }

        if self.log_level.parse::<tracing::Level>().is_err() {
            return Err(format!("Unknown log level '{}'", self.log_level));
        }

        Ok(())
    }

    pub fn with_photo_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.capture.photo_path = Some(path.into());
        self
    }

    pub fn with_model(mut self, model: ModelSource) -> Self {
        self.model = model;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let configuration = Configuration::default();
        assert!(configuration.validate().is_ok());
        assert_eq!(configuration.display.region_width(), 353.0);
        assert_eq!(configuration.capture.timeout(), Duration::from_secs(5));
    }

    #[test]
    fn loads_overrides_from_file() {
        let path = std::env::temp_dir().join(format!("color-coder-{}.toml", uuid::Uuid::new_v4()));
        std::fs::write(
            &path,
            r#"
log_level = "debug"

[display]
screen_width = 430.0

[display.crop]
cursor_center_vertical = 250.0

[capture]
timeout_ms = 750
"#,
        )
        .unwrap();

        let configuration = Configuration::load(Some(&path)).unwrap();
        assert_eq!(configuration.log_level, "debug");
        assert_eq!(configuration.display.screen_width, 430.0);
        assert_eq!(configuration.display.region_inset, 40.0);
        assert_eq!(configuration.display.crop.cursor_center_vertical, 250.0);
        assert_eq!(configuration.display.crop.crop_box_length, 50.0);
        assert_eq!(configuration.capture.timeout_ms, 750);
        assert_eq!(configuration.model, ModelSource::BuiltIn);

        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn rejects_degenerate_geometry() {
        let mut configuration = Configuration::default();
        configuration.display.region_inset = 500.0;
        assert!(configuration.validate().is_err());

        let mut configuration = Configuration::default();
        configuration.display.crop.display_height = 0.0;
        assert!(configuration.validate().is_err());

        let mut configuration = Configuration::default();
        configuration.log_level = "loud".to_string();
        assert!(configuration.validate().is_err());
    }
}
