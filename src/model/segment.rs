use std::collections::BTreeSet;

use crate::foundation::core::{DEANNOTATING_TAG, Rect, ShapeId};

/// Risk label assigned to freshly created segments.
pub const DEFAULT_RISK: &str = "safe";

#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
/// Axis-aligned box in image coordinates.
pub struct BoundingBox {
    /// Minimum x.
    pub left: f64,
    /// Minimum y.
    pub top: f64,
    /// Extent along x.
    pub width: f64,
    /// Extent along y.
    pub height: f64,
}

impl BoundingBox {
    /// Build a box from its four components.
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Convert a kurbo rectangle (any orientation) into a box.
    pub fn from_rect(rect: Rect) -> Self {
        let r = rect.abs();
        Self::new(r.x0, r.y0, r.width(), r.height())
    }

    /// Convert back into a kurbo rectangle.
    pub fn to_rect(self) -> Rect {
        Rect::new(
            self.left,
            self.top,
            self.left + self.width,
            self.top + self.height,
        )
    }

    /// Right edge (`left + width`).
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    /// Bottom edge (`top + height`).
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// True when `rect` lies inside this box, edges included.
    pub fn contains_rect(&self, rect: Rect) -> bool {
        let r = rect.abs();
        r.x0 >= self.left && r.y0 >= self.top && r.x1 <= self.right() && r.y1 <= self.bottom()
    }
}

fn default_risk() -> String {
    DEFAULT_RISK.to_string()
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// A user-facing annotation: all shapes currently painted with one tag.
pub struct Segment {
    /// Stable id, generated once when the segment is created.
    pub id: String,
    /// Category name.
    pub tag: String,
    /// Member shape ids.
    pub superpixel: BTreeSet<ShapeId>,
    /// Sum of member shape areas.
    pub area: f64,
    /// Box enclosing every member shape.
    #[serde(default)]
    pub bounding_box: BoundingBox,
    /// COCO-style crowd flag.
    #[serde(default)]
    pub iscrowd: u8,
    /// Free-form risk label.
    #[serde(default = "default_risk")]
    pub risk: String,
    /// Optional category override used by exporters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl Segment {
    /// A segment with no members yet.
    pub fn empty(id: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            tag: tag.into(),
            superpixel: BTreeSet::new(),
            area: 0.0,
            bounding_box: BoundingBox::default(),
            iscrowd: 0,
            risk: default_risk(),
            category: None,
        }
    }

    /// True when no shape belongs to the segment.
    pub fn is_empty(&self) -> bool {
        self.superpixel.is_empty()
    }

    /// True when `shape` is a member.
    pub fn contains(&self, shape: ShapeId) -> bool {
        self.superpixel.contains(&shape)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// Paint directive derived from a segment: one per member shape.
pub struct Annotation {
    /// Tag to paint.
    pub tag: String,
    /// Color of the tag at decomposition time.
    pub color: String,
    /// Target shape.
    pub shape: Option<ShapeId>,
}

impl Annotation {
    /// Directive for one shape.
    pub fn new(tag: impl Into<String>, color: impl Into<String>, shape: Option<ShapeId>) -> Self {
        Self {
            tag: tag.into(),
            color: color.into(),
            shape,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
/// Direction of a single-shape change.
pub enum OffsetTag {
    /// The shape was painted with this tag.
    Annotate(String),
    /// The shape was cleared.
    Deannotate,
}

impl OffsetTag {
    /// Map a raw tag string (possibly the de-annotating sentinel) to an offset tag.
    pub fn from_raw(tag: &str) -> Self {
        if tag == DEANNOTATING_TAG {
            Self::Deannotate
        } else {
            Self::Annotate(tag.to_string())
        }
    }

    /// Raw string form, with the sentinel for removals.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Annotate(t) => t,
            Self::Deannotate => DEANNOTATING_TAG,
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Delta emitted by one paint or erase on one shape.
pub struct SegmentOffset {
    /// New tag of the shape, or removal.
    pub tag: OffsetTag,
    /// Area of the shape.
    pub area: f64,
    /// Target shape.
    pub shape: ShapeId,
}

impl SegmentOffset {
    /// Offset for painting `shape` with `tag`.
    pub fn annotate(tag: impl Into<String>, area: f64, shape: ShapeId) -> Self {
        Self {
            tag: OffsetTag::Annotate(tag.into()),
            area,
            shape,
        }
    }

    /// Offset for clearing `shape`.
    pub fn deannotate(area: f64, shape: ShapeId) -> Self {
        Self {
            tag: OffsetTag::Deannotate,
            area,
            shape,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/model/segment.rs"]
mod tests;
