use serde::{Deserialize, Serialize};

use crate::color::{default_color_fn, ColorFn};
use crate::error::ConfigError;
use crate::label::LabelRule;

/// Height reserved above the tiles for the breadcrumb bar.
pub const TOP_MARGIN: f64 = 20.0;

#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TreemapConfig {
    pub width: f64,
    pub height: f64,
    /// Route clicks on terminal tiles to the row activator.
    pub drilldown: bool,
    pub label_rule: LabelRule,
    #[serde(skip, default = "default_color_fn")]
    pub color: ColorFn,
}

impl Default for TreemapConfig {
    fn default() -> Self {
        Self {
            width: 1060.0,
            height: 600.0,
            drilldown: false,
            label_rule: LabelRule::Measured,
            color: default_color_fn(),
        }
    }
}

impl std::fmt::Debug for TreemapConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TreemapConfig")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("drilldown", &self.drilldown)
            .field("label_rule", &self.label_rule)
            .finish_non_exhaustive()
    }
}

impl TreemapConfig {
    pub fn with_color(mut self, color: impl Fn(f64) -> crate::color::ColorToken + Send + Sync + 'static) -> Self {
        self.color = std::sync::Arc::new(color);
        self
    }

    /// Height of the tile area once the breadcrumb bar is taken off.
    pub fn content_height(&self) -> f64 {
        self.height - TOP_MARGIN
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [("width", self.width), ("height", self.height)] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::NonPositiveDimension { name, value });
            }
        }
        if self.content_height() <= 0.0 {
            return Err(ConfigError::NoRoomForContent {
                height: self.height,
                margin: TOP_MARGIN,
            });
        }
        Ok(())
    }
}
