use std::{collections::BTreeMap, path::PathBuf};

use crate::{
    foundation::error::{SegError, SegResult},
    store::metadata::normalize_rel_path,
};

/// Resolves a named vector partition to its raw document bytes.
pub trait PartitionSource {
    /// Fetch the document called `name`. A missing document is a [`SegError::Partition`].
    fn fetch_partition(&self, name: &str) -> SegResult<Vec<u8>>;
}

#[derive(Clone, Debug)]
/// Partitions stored as files under one directory.
pub struct FsPartitionSource {
    root: PathBuf,
}

impl FsPartitionSource {
    /// Source rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl PartitionSource for FsPartitionSource {
    fn fetch_partition(&self, name: &str) -> SegResult<Vec<u8>> {
        let path = self.root.join(normalize_rel_path(name)?);
        std::fs::read(&path)
            .map_err(|e| SegError::partition(format!("read '{}': {e}", path.display())))
    }
}

#[derive(Clone, Debug, Default)]
/// Partitions held in memory, keyed by name.
pub struct InMemoryPartitionSource {
    docs: BTreeMap<String, Vec<u8>>,
}

impl InMemoryPartitionSource {
    /// Empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `bytes` under `name`.
    pub fn insert(&mut self, name: impl Into<String>, bytes: impl Into<Vec<u8>>) {
        self.docs.insert(name.into(), bytes.into());
    }
}

impl PartitionSource for InMemoryPartitionSource {
    fn fetch_partition(&self, name: &str) -> SegResult<Vec<u8>> {
        self.docs
            .get(name)
            .cloned()
            .ok_or_else(|| SegError::partition(format!("no partition named '{name}'")))
    }
}
