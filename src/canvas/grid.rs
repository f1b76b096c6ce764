use std::fmt::Write as _;

use crate::{
    foundation::{
        core::{Point, Size},
        error::{SegError, SegResult},
    },
    surface::svg_out::{escape_attr, fmt_num},
};

/// Element id of the grid group in serialized overlays.
pub const GRID_ID: &str = "canvas-grid";

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
/// Look of the optional line grid.
pub struct GridStyle {
    /// Distance between lines in image units.
    pub spacing: f64,
    /// Stroke width.
    pub line_width: f64,
    /// Stroke opacity.
    pub opacity: f64,
    /// Stroke color.
    pub color: String,
}

impl Default for GridStyle {
    fn default() -> Self {
        Self {
            spacing: 32.0,
            line_width: 0.5,
            opacity: 0.8,
            color: "white".to_string(),
        }
    }
}

impl GridStyle {
    /// Reject non-positive spacing, negative widths and out-of-range opacity.
    pub fn validate(&self) -> SegResult<()> {
        if !self.spacing.is_finite() || self.spacing <= 0.0 {
            return Err(SegError::validation(format!(
                "grid spacing must be > 0, got {}",
                self.spacing
            )));
        }
        if !self.line_width.is_finite() || self.line_width < 0.0 {
            return Err(SegError::validation(format!(
                "grid line_width must be finite and >= 0, got {}",
                self.line_width
            )));
        }
        if !(0.0..=1.0).contains(&self.opacity) {
            return Err(SegError::validation(format!(
                "grid opacity must be within [0, 1], got {}",
                self.opacity
            )));
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
/// One grid line in image coordinates.
pub struct GridLine {
    /// Start point.
    pub from: Point,
    /// End point.
    pub to: Point,
}

#[derive(Clone, Debug)]
/// Read-only grid over a partition's coordinate space. Never touches shapes or segments.
pub struct GridOverlay {
    size: Size,
    style: GridStyle,
}

impl GridOverlay {
    /// Grid covering an image of `size`.
    pub fn new(size: Size, style: GridStyle) -> Self {
        Self { size, style }
    }

    /// Style in use.
    pub fn style(&self) -> &GridStyle {
        &self.style
    }

    /// Vertical lines first, then horizontal, each at multiples of the spacing strictly inside
    /// the image.
    pub fn lines(&self) -> Vec<GridLine> {
        let step = self.style.spacing;
        if !step.is_finite() || step <= 0.0 {
            return Vec::new();
        }
        let (w, h) = (self.size.width, self.size.height);
        let mut out = Vec::new();
        let mut x = step;
        while x < w {
            out.push(GridLine {
                from: Point::new(x, 0.0),
                to: Point::new(x, h),
            });
            x += step;
        }
        let mut y = step;
        while y < h {
            out.push(GridLine {
                from: Point::new(0.0, y),
                to: Point::new(w, y),
            });
            y += step;
        }
        out
    }

    /// `<g>` element drawing the grid, for embedding into an overlay document.
    pub fn to_svg_fragment(&self) -> String {
        let mut s = String::new();
        let _ = write!(
            s,
            r#"<g id="{GRID_ID}" stroke="{}" stroke-width="{}" stroke-opacity="{}" fill="none">"#,
            escape_attr(&self.style.color),
            fmt_num(self.style.line_width),
            fmt_num(self.style.opacity),
        );
        for line in self.lines() {
            let _ = write!(
                s,
                r#"<line x1="{}" y1="{}" x2="{}" y2="{}"/>"#,
                fmt_num(line.from.x),
                fmt_num(line.from.y),
                fmt_num(line.to.x),
                fmt_num(line.to.y),
            );
        }
        s.push_str("</g>");
        s
    }
}
