//! Label legibility culling.

use serde::{Deserialize, Serialize};

use crate::treemap::Rect;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TextSize {
    pub width: f64,
    pub height: f64,
}

/// Source of text extents for the measured rule.
pub trait TextMeasure {
    fn measure(&self, text: &str) -> TextSize;
}

/// Estimates extents from a fixed per-character advance.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FixedAdvance {
    pub char_width: f64,
    pub line_height: f64,
}

impl Default for FixedAdvance {
    fn default() -> Self {
        Self {
            char_width: 6.5,
            line_height: 14.0,
        }
    }
}

impl TextMeasure for FixedAdvance {
    fn measure(&self, text: &str) -> TextSize {
        TextSize {
            width: text.chars().count() as f64 * self.char_width,
            height: if text.is_empty() { 0.0 } else { self.line_height },
        }
    }
}

impl<F> TextMeasure for F
where
    F: Fn(&str) -> TextSize,
{
    fn measure(&self, text: &str) -> TextSize {
        self(text)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelRule {
    /// Compare measured text extents against the tile, with padding.
    #[default]
    Measured,
    /// Character-count estimate for renderers whose metrics are unreliable
    /// before the text is painted.
    CharCount,
}

/// Whether a label of the given extents fits inside `rect` (screen units).
pub fn should_show_label(rect: &Rect, size: TextSize, char_count: usize, rule: LabelRule) -> bool {
    match rule {
        LabelRule::Measured => size.width + 8.0 < rect.w && size.height + 4.0 < rect.h,
        LabelRule::CharCount => char_count as f64 * 6.5 + 16.0 < rect.w && 18.0 < rect.h,
    }
}

pub struct LabelCuller {
    rule: LabelRule,
    measure: Box<dyn TextMeasure>,
}

impl std::fmt::Debug for LabelCuller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LabelCuller").field("rule", &self.rule).finish_non_exhaustive()
    }
}

impl LabelCuller {
    pub fn new(rule: LabelRule, measure: Box<dyn TextMeasure>) -> Self {
        Self { rule, measure }
    }

    pub fn visible(&self, text: &str, rect: &Rect) -> bool {
        let size = match self.rule {
            LabelRule::Measured => self.measure.measure(text),
            LabelRule::CharCount => TextSize::default(),
        };
        should_show_label(rect, size, text.chars().count(), self.rule)
    }
}

impl Default for LabelCuller {
    fn default() -> Self {
        Self::new(LabelRule::default(), Box::new(FixedAdvance::default()))
    }
}
