use crate::{
    foundation::core::{AssetId, ShapeId},
    model::{
        metadata::AssetMetadata,
        segment::{BoundingBox, Segment},
    },
    surface::{geometry::polygon_points, index::ShapeIndex},
};

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Strict per-segment record: membership by shape id, no geometry.
pub struct StrictSegmentRecord {
    /// Segment id.
    pub id: String,
    /// Owning asset.
    pub image_id: AssetId,
    /// Category (the segment's category override, else its tag).
    pub category_id: String,
    /// Always 0 (superpixel segmentation).
    pub segmentation_method_id: u32,
    /// Member shape ids, ascending.
    pub superpixel: Vec<ShapeId>,
    /// Summed member area.
    pub area: f64,
    /// Bounding box.
    pub bbox: BoundingBox,
    /// Crowd flag.
    pub iscrowd: u8,
    /// Risk label.
    pub risk: String,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Polygon per-segment record: one point list per member shape.
pub struct PolygonSegmentRecord {
    /// Position of the segment in the asset's list.
    pub id: usize,
    /// Always false; segments are "stuff", not countable things.
    pub isthing: bool,
    /// Category (the segment's category override, else its tag).
    pub category_id: String,
    /// Summed member area.
    pub area: f64,
    /// Member outlines as `[x, y]` lists.
    pub polygon: Vec<Vec<[f64; 2]>>,
    /// Bounding box.
    pub bbox: BoundingBox,
    /// Crowd flag.
    pub iscrowd: u8,
    /// Risk label.
    pub risk: String,
}

fn category_of(seg: &Segment) -> String {
    seg.category.clone().unwrap_or_else(|| seg.tag.clone())
}

/// Strict records for every segment of `metadata`.
pub fn strict_records(metadata: &AssetMetadata) -> Vec<StrictSegmentRecord> {
    metadata
        .segments
        .iter()
        .map(|seg| StrictSegmentRecord {
            id: seg.id.clone(),
            image_id: metadata.asset.id.clone(),
            category_id: category_of(seg),
            segmentation_method_id: 0,
            superpixel: seg.superpixel.iter().copied().collect(),
            area: seg.area,
            bbox: seg.bounding_box,
            iscrowd: seg.iscrowd,
            risk: seg.risk.clone(),
        })
        .collect()
}

/// Polygon records, resolving member geometry through `index`. Unresolvable shapes are skipped.
pub fn polygon_records(segments: &[Segment], index: &ShapeIndex) -> Vec<PolygonSegmentRecord> {
    segments
        .iter()
        .enumerate()
        .map(|(i, seg)| PolygonSegmentRecord {
            id: i,
            isthing: false,
            category_id: category_of(seg),
            area: seg.area,
            polygon: polygon_points(index, &seg.superpixel),
            bbox: seg.bounding_box,
            iscrowd: seg.iscrowd,
            risk: seg.risk.clone(),
        })
        .collect()
}

/// File name of the per-asset segment export: whitespace in the asset name becomes `-`.
pub fn segments_export_file_name(asset_name: &str) -> String {
    let name: String = asset_name
        .chars()
        .map(|c| if c.is_whitespace() { '-' } else { c })
        .collect();
    format!("{name}_PS_data.json")
}

#[cfg(test)]
#[path = "../../tests/unit/export/records.rs"]
mod tests;
