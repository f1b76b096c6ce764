use crate::foundation::error::{SegError, SegResult};

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
/// Visual constants used when painting shapes.
pub struct PaintStyle {
    /// Fill of shapes that carry no tag.
    pub default_color: String,
    /// Opacity of shapes that carry no tag.
    pub default_opacity: f64,
    /// Opacity of committed (tagged) shapes.
    pub annotated_opacity: f64,
    /// Opacity of the hover preview.
    pub annotating_opacity: f64,
    /// Stroke width outside of hover.
    pub default_line_width: f64,
    /// Stroke width of the hover preview.
    pub highlight_line_width: f64,
}

impl Default for PaintStyle {
    fn default() -> Self {
        Self {
            default_color: "black".to_string(),
            default_opacity: 0.1,
            annotated_opacity: 0.7,
            annotating_opacity: 0.9,
            default_line_width: 0.0,
            highlight_line_width: 2.0,
        }
    }
}

impl PaintStyle {
    /// Reject opacities outside `[0, 1]` and negative line widths.
    pub fn validate(&self) -> SegResult<()> {
        for (name, v) in [
            ("default_opacity", self.default_opacity),
            ("annotated_opacity", self.annotated_opacity),
            ("annotating_opacity", self.annotating_opacity),
        ] {
            if !v.is_finite() || !(0.0..=1.0).contains(&v) {
                return Err(SegError::validation(format!(
                    "{name} must be within [0, 1], got {v}"
                )));
            }
        }
        for (name, v) in [
            ("default_line_width", self.default_line_width),
            ("highlight_line_width", self.highlight_line_width),
        ] {
            if !v.is_finite() || v < 0.0 {
                return Err(SegError::validation(format!(
                    "{name} must be finite and >= 0, got {v}"
                )));
            }
        }
        if self.default_color.trim().is_empty() {
            return Err(SegError::validation("default_color must be non-empty"));
        }
        Ok(())
    }
}
