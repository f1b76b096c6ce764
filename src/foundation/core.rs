use std::fmt;

pub use kurbo::{Affine, BezPath, Point, Rect, Size, Vec2};

/// Tag value carried by shapes that belong to no segment.
pub const EMPTY_TAG: &str = "empty";

/// Tag value published while the canvas is erasing.
pub const DEANNOTATING_TAG: &str = "deannotating";

/// Stable integer identifier of one superpixel shape.
///
/// In vector documents the id is written as `sp<N>`; in persisted segments it is the bare
/// integer.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct ShapeId(pub u32);

impl ShapeId {
    /// Parse a document id of the form `sp<N>`.
    pub fn parse(raw: &str) -> Option<Self> {
        let digits = raw.strip_prefix("sp")?;
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        digits.parse::<u32>().ok().map(Self)
    }
}

impl fmt::Display for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sp{}", self.0)
    }
}

/// Identifier of an asset (image or video frame) in the project.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct AssetId(pub String);

impl AssetId {
    /// Build an id from any string-like value.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Borrow the raw id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Returns true for the two sentinel tags that never name a segment.
pub fn is_sentinel_tag(tag: &str) -> bool {
    tag == EMPTY_TAG || tag == DEANNOTATING_TAG
}
