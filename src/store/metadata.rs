use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use anyhow::Context;

use crate::{
    foundation::{
        core::AssetId,
        error::{SegError, SegResult},
    },
    model::{
        metadata::{AssetInfo, AssetMetadata},
        tag::{delete_tag_from_metadata, rename_tag_in_metadata},
    },
};

/// Suffix of per-asset metadata files.
pub const METADATA_FILE_SUFFIX: &str = ".metadata.json";

/// Persistence collaborator for per-asset annotation records.
///
/// `load_asset_metadata` never fails for a missing or unreadable record; it yields an empty
/// one instead.
pub trait MetadataStore {
    /// Load the record of `asset`, or an empty one.
    fn load_asset_metadata(&self, asset: &AssetInfo) -> SegResult<AssetMetadata>;
    /// Persist `metadata`. An untagged record removes any stored copy.
    fn save_asset_metadata(&mut self, metadata: &AssetMetadata) -> SegResult<()>;
    /// Persist a serialized overlay document under `name`.
    fn save_overlay_svg(&mut self, name: &str, content: &str) -> SegResult<()>;
    /// Ids of every asset with a stored record.
    fn list_assets(&self) -> SegResult<Vec<AssetId>>;

    /// Rename a tag in every stored record. Returns the assets that changed.
    fn rename_tag(&mut self, from: &str, to: &str) -> SegResult<Vec<AssetId>> {
        update_all(self, &mut |m| rename_tag_in_metadata(m, from, to))
    }

    /// Remove every segment carrying `name` from every stored record. Returns the assets that
    /// changed.
    fn delete_tag(&mut self, name: &str) -> SegResult<Vec<AssetId>> {
        update_all(self, &mut |m| delete_tag_from_metadata(m, name))
    }
}

fn update_all<S: MetadataStore + ?Sized>(
    store: &mut S,
    f: &mut dyn FnMut(&mut AssetMetadata) -> bool,
) -> SegResult<Vec<AssetId>> {
    let mut changed = Vec::new();
    for id in store.list_assets()? {
        let mut meta = store.load_asset_metadata(&AssetInfo::bare(id.clone()))?;
        if f(&mut meta) {
            store.save_asset_metadata(&meta)?;
            changed.push(id);
        }
    }
    Ok(changed)
}

/// Validate a store-relative file name: relative, no `..`, non-empty.
pub(crate) fn normalize_rel_path(source: &str) -> SegResult<String> {
    let s = source.replace('\\', "/");
    if s.starts_with('/') {
        return Err(SegError::validation("store paths must be relative"));
    }
    let mut out = Vec::<&str>::new();
    for part in s.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        if part == ".." {
            return Err(SegError::validation("store paths must not contain '..'"));
        }
        out.push(part);
    }
    if out.is_empty() {
        return Err(SegError::validation("store path must contain a file name"));
    }
    Ok(out.join("/"))
}

#[derive(Clone, Debug)]
/// Metadata files under one directory, `<assetId>.metadata.json` each.
pub struct FsMetadataStore {
    root: PathBuf,
}

impl FsMetadataStore {
    /// Store rooted at `root`. The directory is created on first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File holding the record of `id`.
    pub fn metadata_path(&self, id: &AssetId) -> SegResult<PathBuf> {
        let name = format!("{}{METADATA_FILE_SUFFIX}", id.as_str());
        if normalize_rel_path(&name)? != name || name.contains('/') {
            return Err(SegError::validation(format!(
                "asset id '{id}' is not usable as a file name"
            )));
        }
        Ok(self.root.join(name))
    }

    fn ensure_root(&self) -> SegResult<()> {
        std::fs::create_dir_all(&self.root)
            .with_context(|| format!("create metadata root '{}'", self.root.display()))?;
        Ok(())
    }
}

impl MetadataStore for FsMetadataStore {
    #[tracing::instrument(skip(self), fields(asset = %asset.id))]
    fn load_asset_metadata(&self, asset: &AssetInfo) -> SegResult<AssetMetadata> {
        let path = self.metadata_path(&asset.id)?;
        let text = match std::fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(AssetMetadata::empty(asset.clone()));
            }
            Err(e) => {
                return Err(SegError::metadata(format!(
                    "read '{}': {e}",
                    path.display()
                )));
            }
        };
        match serde_json::from_str::<AssetMetadata>(&text) {
            Ok(meta) => Ok(meta),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "undecodable metadata; using empty record");
                Ok(AssetMetadata::empty(asset.clone()))
            }
        }
    }

    #[tracing::instrument(skip(self, metadata), fields(asset = %metadata.asset.id))]
    fn save_asset_metadata(&mut self, metadata: &AssetMetadata) -> SegResult<()> {
        let path = self.metadata_path(&metadata.asset.id)?;
        if !metadata.is_tagged() {
            return match std::fs::remove_file(&path) {
                Ok(()) => Ok(()),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
                Err(e) => Err(SegError::metadata(format!(
                    "delete '{}': {e}",
                    path.display()
                ))),
            };
        }
        self.ensure_root()?;
        let json = serde_json::to_string_pretty(metadata)?;
        std::fs::write(&path, json)
            .with_context(|| format!("write metadata '{}'", path.display()))?;
        tracing::debug!(path = %path.display(), segments = metadata.segments.len(), "metadata saved");
        Ok(())
    }

    fn save_overlay_svg(&mut self, name: &str, content: &str) -> SegResult<()> {
        let rel = normalize_rel_path(name)?;
        let path = self.root.join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create overlay dir '{}'", parent.display()))?;
        }
        std::fs::write(&path, content)
            .with_context(|| format!("write overlay '{}'", path.display()))?;
        Ok(())
    }

    fn list_assets(&self) -> SegResult<Vec<AssetId>> {
        let entries = match std::fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(SegError::metadata(format!(
                    "list '{}': {e}",
                    self.root.display()
                )));
            }
        };
        let mut ids = Vec::new();
        for entry in entries {
            let entry = entry.with_context(|| format!("list '{}'", self.root.display()))?;
            let name = entry.file_name();
            if let Some(id) = name
                .to_str()
                .and_then(|n| n.strip_suffix(METADATA_FILE_SUFFIX))
            {
                ids.push(AssetId::new(id));
            }
        }
        ids.sort();
        Ok(ids)
    }
}

#[derive(Debug, Default)]
/// In-memory store for tests and dry runs.
pub struct InMemoryMetadataStore {
    records: BTreeMap<AssetId, AssetMetadata>,
    overlays: BTreeMap<String, String>,
    /// When set, every save fails with a metadata error.
    pub fail_saves: bool,
}

impl InMemoryMetadataStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a record.
    pub fn insert(&mut self, metadata: AssetMetadata) {
        self.records.insert(metadata.asset.id.clone(), metadata);
    }

    /// Stored record of `id`.
    pub fn record(&self, id: &AssetId) -> Option<&AssetMetadata> {
        self.records.get(id)
    }

    /// Stored overlay named `name`.
    pub fn overlay(&self, name: &str) -> Option<&str> {
        self.overlays.get(name).map(String::as_str)
    }
}

impl MetadataStore for InMemoryMetadataStore {
    fn load_asset_metadata(&self, asset: &AssetInfo) -> SegResult<AssetMetadata> {
        Ok(self
            .records
            .get(&asset.id)
            .cloned()
            .unwrap_or_else(|| AssetMetadata::empty(asset.clone())))
    }

    fn save_asset_metadata(&mut self, metadata: &AssetMetadata) -> SegResult<()> {
        if self.fail_saves {
            return Err(SegError::metadata("store is read-only"));
        }
        if metadata.is_tagged() {
            self.insert(metadata.clone());
        } else {
            self.records.remove(&metadata.asset.id);
        }
        Ok(())
    }

    fn save_overlay_svg(&mut self, name: &str, content: &str) -> SegResult<()> {
        if self.fail_saves {
            return Err(SegError::metadata("store is read-only"));
        }
        self.overlays
            .insert(normalize_rel_path(name)?, content.to_string());
        Ok(())
    }

    fn list_assets(&self) -> SegResult<Vec<AssetId>> {
        Ok(self.records.keys().cloned().collect())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/store/metadata.rs"]
mod tests;
