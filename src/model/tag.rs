use crate::model::metadata::AssetMetadata;

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
/// A project tag: category name plus display color.
pub struct Tag {
    /// Category name.
    pub name: String,
    /// CSS color string used to paint shapes carrying the tag.
    pub color: String,
}

impl Tag {
    /// Build a tag.
    pub fn new(name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            color: color.into(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
/// Ordered project tag list.
pub struct TagRegistry {
    tags: Vec<Tag>,
}

impl TagRegistry {
    /// Build a registry from an ordered list.
    pub fn new(tags: Vec<Tag>) -> Self {
        Self { tags }
    }

    /// Tags in project order.
    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    /// Look up a tag by name.
    pub fn get(&self, name: &str) -> Option<&Tag> {
        self.tags.iter().find(|t| t.name == name)
    }

    /// Color of the tag called `name`.
    pub fn color_of(&self, name: &str) -> Option<&str> {
        self.get(name).map(|t| t.color.as_str())
    }

    /// Rename a tag in place. Returns false when `from` is unknown.
    pub fn rename(&mut self, from: &str, to: &str) -> bool {
        match self.tags.iter_mut().find(|t| t.name == from) {
            Some(tag) => {
                tag.name = to.to_string();
                true
            }
            None => false,
        }
    }

    /// Change the color of `name`. Returns false when `name` is unknown.
    pub fn recolor(&mut self, name: &str, color: &str) -> bool {
        match self.tags.iter_mut().find(|t| t.name == name) {
            Some(tag) => {
                tag.color = color.to_string();
                true
            }
            None => false,
        }
    }

    /// Remove a tag. Returns false when `name` is unknown.
    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.tags.len();
        self.tags.retain(|t| t.name != name);
        self.tags.len() != before
    }
}

/// Rename `from` to `to` in every segment of `metadata`.
///
/// Returns true if any segment changed.
pub fn rename_tag_in_metadata(metadata: &mut AssetMetadata, from: &str, to: &str) -> bool {
    let mut changed = false;
    for seg in metadata.segments.iter_mut().filter(|s| s.tag == from) {
        seg.tag = to.to_string();
        changed = true;
    }
    changed
}

/// Drop every segment of `metadata` carrying `name`.
///
/// Returns true if any segment was removed.
pub fn delete_tag_from_metadata(metadata: &mut AssetMetadata, name: &str) -> bool {
    let before = metadata.segments.len();
    metadata.segments.retain(|s| s.tag != name);
    metadata.segments.len() != before
}

#[cfg(test)]
#[path = "../../tests/unit/model/tag.rs"]
mod tests;
