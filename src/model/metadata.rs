use crate::{foundation::core::AssetId, model::segment::Segment};

/// Metadata schema version written by this crate.
pub const METADATA_VERSION: &str = "0.1.0";

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Identity of an asset as recorded in its metadata.
pub struct AssetInfo {
    /// Project-unique asset id.
    pub id: AssetId,
    /// Display name, usually the image file name.
    pub name: String,
    /// Source path or URL.
    #[serde(default)]
    pub path: String,
}

impl AssetInfo {
    /// Asset known only by id.
    pub fn bare(id: AssetId) -> Self {
        Self {
            name: id.0.clone(),
            path: String::new(),
            id,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
/// Reference to the painted overlay document stored next to the metadata.
pub struct SvgRef {
    /// File name of the overlay document.
    pub name: String,
    /// Path of the overlay document.
    #[serde(default)]
    pub path: String,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Persisted annotation record for one asset (`<assetId>.metadata.json`).
pub struct AssetMetadata {
    /// Asset identity.
    pub asset: AssetInfo,
    /// Geometry regions owned by the region editor; carried through untouched.
    #[serde(default)]
    pub regions: Vec<serde_json::Value>,
    /// Segment annotations.
    #[serde(default)]
    pub segments: Vec<Segment>,
    /// Optional overlay document reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub svg: Option<SvgRef>,
    /// Schema version.
    #[serde(default = "default_version")]
    pub version: String,
}

fn default_version() -> String {
    METADATA_VERSION.to_string()
}

impl AssetMetadata {
    /// An untagged record for `asset`.
    pub fn empty(asset: AssetInfo) -> Self {
        Self {
            asset,
            regions: Vec::new(),
            segments: Vec::new(),
            svg: None,
            version: default_version(),
        }
    }

    /// True when the asset carries any annotation and therefore needs a metadata file.
    pub fn is_tagged(&self) -> bool {
        !self.segments.is_empty() || !self.regions.is_empty()
    }

    /// Name of the vector partition for this asset.
    ///
    /// Uses the referenced overlay when present, else `<asset name>.svg`.
    pub fn partition_name(&self) -> String {
        match &self.svg {
            Some(svg) => svg.name.clone(),
            None => format!("{}.svg", self.asset.name),
        }
    }
}
