use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Opaque fill token handed to the renderer, usually a CSS color.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColorToken(pub String);

impl ColorToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

pub const POSITIVE: &str = "#8AE274";
pub const NEGATIVE: &str = "#D4494F";
pub const NEUTRAL: &str = "#FFEC42";

pub type ColorFn = Arc<dyn Fn(f64) -> ColorToken + Send + Sync>;

/// Green above zero, red below, yellow otherwise (NaN included).
pub fn sign_color(value: f64) -> ColorToken {
    let token = if value > 0.0 {
        POSITIVE
    } else if value < 0.0 {
        NEGATIVE
    } else {
        NEUTRAL
    };
    ColorToken(token.to_string())
}

pub fn default_color_fn() -> ColorFn {
    Arc::new(sign_color)
}
