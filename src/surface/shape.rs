use kurbo::Shape as _;

use crate::{
    foundation::core::{BezPath, EMPTY_TAG, Rect, ShapeId},
    paint::style::PaintStyle,
};

#[derive(Clone, Debug, PartialEq)]
/// Mutable paint attributes of a shape.
///
/// `tag` is the authoritative per-shape state. `fill`, `opacity` and `stroke_width` are visual
/// only and may be overwritten by hover previews.
pub struct PaintState {
    /// Current fill color.
    pub fill: String,
    /// Current opacity.
    pub opacity: f64,
    /// Current stroke width.
    pub stroke_width: f64,
    /// Committed tag, or [`EMPTY_TAG`].
    pub tag: String,
    /// Committed color, or [`EMPTY_TAG`].
    pub name: String,
}

impl PaintState {
    /// Untagged state under `style`.
    pub fn empty(style: &PaintStyle) -> Self {
        Self {
            fill: style.default_color.clone(),
            opacity: style.default_opacity,
            stroke_width: style.default_line_width,
            tag: EMPTY_TAG.to_string(),
            name: EMPTY_TAG.to_string(),
        }
    }

    /// Committed state for `tag` painted in `color`.
    pub fn tagged(style: &PaintStyle, tag: &str, color: &str) -> Self {
        Self {
            fill: color.to_string(),
            opacity: style.annotated_opacity,
            stroke_width: style.default_line_width,
            tag: tag.to_string(),
            name: color.to_string(),
        }
    }

    /// True when the shape carries no tag.
    pub fn is_empty(&self) -> bool {
        self.tag == EMPTY_TAG
    }

    /// Snapshot of the visual-only attributes.
    pub fn visual(&self) -> VisualState {
        VisualState {
            fill: self.fill.clone(),
            opacity: self.opacity,
            stroke_width: self.stroke_width,
        }
    }

    /// Overwrite the visual-only attributes.
    pub fn set_visual(&mut self, visual: VisualState) {
        self.fill = visual.fill;
        self.opacity = visual.opacity;
        self.stroke_width = visual.stroke_width;
    }
}

#[derive(Clone, Debug, PartialEq)]
/// Visual-only subset of [`PaintState`].
pub struct VisualState {
    /// Fill color.
    pub fill: String,
    /// Opacity.
    pub opacity: f64,
    /// Stroke width.
    pub stroke_width: f64,
}

#[derive(Clone, Debug)]
/// One superpixel: immutable geometry plus mutable paint.
pub struct Shape {
    id: ShapeId,
    path: BezPath,
    area: f64,
    bounds: Rect,
    /// Paint attributes.
    pub paint: PaintState,
}

impl Shape {
    /// Build a shape whose area is derived from its path.
    pub fn new(id: ShapeId, path: BezPath, style: &PaintStyle) -> Self {
        let area = path.area().abs();
        Self::with_area(id, path, area, style)
    }

    /// Build a shape with an externally measured area (e.g. a pixel count).
    pub fn with_area(id: ShapeId, path: BezPath, area: f64, style: &PaintStyle) -> Self {
        let bounds = path.bounding_box();
        Self {
            id,
            path,
            area,
            bounds,
            paint: PaintState::empty(style),
        }
    }

    /// Stable id.
    pub fn id(&self) -> ShapeId {
        self.id
    }

    /// Geometry.
    pub fn path(&self) -> &BezPath {
        &self.path
    }

    /// Area measure.
    pub fn area(&self) -> f64 {
        self.area
    }

    /// Tight geometric bounds.
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Committed tag.
    pub fn tag(&self) -> &str {
        &self.paint.tag
    }
}
