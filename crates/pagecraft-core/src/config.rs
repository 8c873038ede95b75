//! Canvas configuration: page size, minimum item size and zoom limits.

use kurbo::{Size, Vec2};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Logical page width in document units.
pub const PAGE_WIDTH: f64 = 612.0;
/// Logical page height in document units.
pub const PAGE_HEIGHT: f64 = 792.0;
/// Minimum item width in document units (independent of zoom).
pub const MIN_WIDTH: f64 = 100.0;
/// Minimum item height in document units (independent of zoom).
pub const MIN_HEIGHT: f64 = 40.0;

/// Size given to items dropped from the palette.
pub const DEFAULT_ITEM_SIZE: Size = Size::new(150.0, 80.0);
/// Offset applied to a duplicated item.
pub const DUPLICATE_OFFSET: Vec2 = Vec2::new(20.0, 20.0);

pub const MIN_ZOOM: f64 = 0.3;
pub const MAX_ZOOM: f64 = 3.0;
/// Increment used by the zoom in/out controls.
pub const ZOOM_STEP: f64 = 0.1;
pub const DEFAULT_ZOOM: f64 = 1.0;

/// Base URL of the search backend, used to absolutize relative image URLs.
pub const DEFAULT_IMAGE_BASE_URL: &str = "http://localhost:5000";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Tunable constants of the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    pub page_width: f64,
    pub page_height: f64,
    pub min_width: f64,
    pub min_height: f64,
    /// Size of a freshly placed item.
    pub default_item_size: Size,
    /// Offset of a duplicate relative to its source.
    pub duplicate_offset: Vec2,
    pub zoom_min: f64,
    pub zoom_max: f64,
    pub zoom_step: f64,
    pub zoom_default: f64,
    pub image_base_url: String,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            page_width: PAGE_WIDTH,
            page_height: PAGE_HEIGHT,
            min_width: MIN_WIDTH,
            min_height: MIN_HEIGHT,
            default_item_size: DEFAULT_ITEM_SIZE,
            duplicate_offset: DUPLICATE_OFFSET,
            zoom_min: MIN_ZOOM,
            zoom_max: MAX_ZOOM,
            zoom_step: ZOOM_STEP,
            zoom_default: DEFAULT_ZOOM,
            image_base_url: DEFAULT_IMAGE_BASE_URL.to_string(),
        }
    }
}

impl CanvasConfig {
    /// Page size in document units.
    pub fn page_size(&self) -> Size {
        Size::new(self.page_width, self.page_height)
    }

    /// Minimum item size in document units.
    pub fn min_size(&self) -> Size {
        Size::new(self.min_width, self.min_height)
    }

    /// Check that the geometry constraints can all be satisfied at once.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let values = [
            self.page_width,
            self.page_height,
            self.min_width,
            self.min_height,
            self.zoom_min,
            self.zoom_max,
            self.zoom_step,
            self.zoom_default,
        ];
        if values.iter().any(|value| !value.is_finite()) {
            return Err(ConfigError::Invalid("config values must be finite".to_string()));
        }
        if self.min_width <= 0.0 || self.min_height <= 0.0 {
            return Err(ConfigError::Invalid(
                "minimum item size must be positive".to_string(),
            ));
        }
        if self.page_width < self.min_width || self.page_height < self.min_height {
            return Err(ConfigError::Invalid(format!(
                "page {}x{} is smaller than the minimum item size {}x{}",
                self.page_width, self.page_height, self.min_width, self.min_height
            )));
        }
        if self.zoom_min <= 0.0 || self.zoom_min > self.zoom_max {
            return Err(ConfigError::Invalid(format!(
                "zoom range [{}, {}] is empty",
                self.zoom_min, self.zoom_max
            )));
        }
        if !(self.zoom_min..=self.zoom_max).contains(&self.zoom_default) {
            return Err(ConfigError::Invalid(format!(
                "default zoom {} lies outside [{}, {}]",
                self.zoom_default, self.zoom_min, self.zoom_max
            )));
        }
        if self.zoom_step <= 0.0 {
            return Err(ConfigError::Invalid("zoom step must be positive".to_string()));
        }
        Ok(())
    }

    /// Load and validate a configuration from a JSON file.
    /// Missing fields fall back to their defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path).map_err(|e| {
            ConfigError::Io(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let config: Self = serde_json::from_str(&json).map_err(|e| {
            ConfigError::Parse(format!("Failed to parse {}: {}", path.display(), e))
        })?;
        config.validate()?;
        log::debug!("Loaded canvas config from {}", path.display());
        Ok(config)
    }
}
