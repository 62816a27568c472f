// File: crates/chart-geometry/src/config.rs
// Summary: Chart options (container size, root sentinel, keyed value field) with JSON loading.

use serde::{Deserialize, Serialize};

use crate::error::{GeometryError, Result};
use crate::types::{Size, HEIGHT, ROOT_KEY, WIDTH};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChartOptions {
    /// Layout container width in pixels.
    pub width: f64,
    /// Layout container height in pixels.
    pub height: f64,
    /// Key that hierarchy records use to name the synthetic root as parent.
    pub root_key: String,
    /// Field read from keyed points when a group does not name its own.
    pub keyed_value_field: String,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            width: WIDTH,
            height: HEIGHT,
            root_key: ROOT_KEY.to_string(),
            keyed_value_field: "y".to_string(),
        }
    }
}

impl ChartOptions {
    /// Parse options from JSON; missing fields keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let opts: Self = serde_json::from_str(json).map_err(|e| GeometryError::Config(e.to_string()))?;
        opts.validate()?;
        Ok(opts)
    }

    pub fn validate(&self) -> Result<()> {
        validate_size(self.width, self.height)?;
        if self.root_key.is_empty() {
            return Err(GeometryError::Config("rootKey must not be empty".into()));
        }
        Ok(())
    }

    pub fn container(&self) -> Size { Size::new(self.width, self.height) }
}

pub(crate) fn validate_size(width: f64, height: f64) -> Result<()> {
    if !width.is_finite() || !height.is_finite() || width < 0.0 || height < 0.0 {
        return Err(GeometryError::Config(format!("container size {width}x{height} must be finite and non-negative")));
    }
    Ok(())
}
