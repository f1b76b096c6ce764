use crate::{
    foundation::core::{DEANNOTATING_TAG, EMPTY_TAG},
    model::tag::Tag,
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
/// Canvas interaction mode chosen in the editor toolbar.
pub enum SelectionMode {
    /// Clicking reports the shape's segment; nothing is painted.
    #[default]
    Neutral,
    /// Primary button paints with the active tag, secondary erases.
    Annotating,
    /// Any held button erases.
    Deannotating,
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// Tag the paint-event linker applies on the next gesture.
pub enum ActiveTag {
    /// Nothing is painted.
    Empty,
    /// Gestures erase.
    Deannotating,
    /// Gestures paint this tag.
    Named(String),
}

impl ActiveTag {
    /// Raw string form, using the sentinels for the non-named variants.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Empty => EMPTY_TAG,
            Self::Deannotating => DEANNOTATING_TAG,
            Self::Named(t) => t,
        }
    }
}

#[derive(Clone, Debug)]
/// Shared "current paint mode" read by the paint-event linker on every gesture.
///
/// Only the synchronization layer writes it.
pub struct PaintContext {
    mode: SelectionMode,
    active: ActiveTag,
    color: String,
    default_color: String,
    remembered: Option<Tag>,
    enabled: bool,
}

impl PaintContext {
    /// Neutral, enabled context.
    pub fn new(default_color: impl Into<String>) -> Self {
        let default_color = default_color.into();
        Self {
            mode: SelectionMode::Neutral,
            active: ActiveTag::Empty,
            color: default_color.clone(),
            default_color,
            remembered: None,
            enabled: true,
        }
    }

    /// Current selection mode.
    pub fn mode(&self) -> SelectionMode {
        self.mode
    }

    /// Tag painted by the next gesture.
    pub fn active_tag(&self) -> &ActiveTag {
        &self.active
    }

    /// Color painted by the next gesture.
    pub fn color(&self) -> &str {
        &self.color
    }

    /// Fill of untagged shapes.
    pub fn default_color(&self) -> &str {
        &self.default_color
    }

    /// Last real tag applied, restored when annotating resumes.
    pub fn remembered(&self) -> Option<&Tag> {
        self.remembered.as_ref()
    }

    /// False while the asset preview owns rendering.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// True when hover previews should show (enabled, and a paint or erase tag is active).
    pub fn is_painting(&self) -> bool {
        self.enabled && self.active != ActiveTag::Empty
    }

    /// Remember `tag`; publish it right away when annotating.
    pub fn apply_tag(&mut self, tag: &Tag) {
        self.remembered = Some(tag.clone());
        if self.mode == SelectionMode::Annotating {
            self.publish(ActiveTag::Named(tag.name.clone()), tag.color.clone());
        }
    }

    /// Switch mode and republish the matching tag/color.
    pub fn set_selection_mode(&mut self, mode: SelectionMode) {
        self.mode = mode;
        match mode {
            SelectionMode::Neutral => self.publish(ActiveTag::Empty, self.default_color.clone()),
            SelectionMode::Deannotating => {
                self.publish(ActiveTag::Deannotating, self.default_color.clone())
            }
            SelectionMode::Annotating => match self.remembered.clone() {
                Some(tag) => self.publish(ActiveTag::Named(tag.name), tag.color),
                None => self.publish(ActiveTag::Empty, self.default_color.clone()),
            },
        }
    }

    /// Enable or disable painting. Re-enabling republishes the current mode.
    pub fn set_enabled(&mut self, enabled: bool) {
        if self.enabled == enabled {
            return;
        }
        self.enabled = enabled;
        if enabled {
            self.set_selection_mode(self.mode);
        }
    }

    /// Publish (empty, default color) without changing the mode.
    pub fn clear(&mut self) {
        self.publish(ActiveTag::Empty, self.default_color.clone());
    }

    /// Follow a tag rename so the remembered and active tags stay valid.
    pub fn rename_tag(&mut self, from: &str, to: &str) {
        if let Some(tag) = self.remembered.as_mut().filter(|t| t.name == from) {
            tag.name = to.to_string();
        }
        if let ActiveTag::Named(name) = &mut self.active {
            if name.as_str() == from {
                *name = to.to_string();
            }
        }
    }

    /// Follow a recolor of `name`.
    pub fn recolor_tag(&mut self, name: &str, color: &str) {
        if let Some(tag) = self.remembered.as_mut().filter(|t| t.name == name) {
            tag.color = color.to_string();
        }
        if matches!(&self.active, ActiveTag::Named(n) if n == name) {
            self.color = color.to_string();
        }
    }

    fn publish(&mut self, active: ActiveTag, color: String) {
        if let ActiveTag::Named(name) = &active {
            self.remembered = Some(Tag::new(name.clone(), color.clone()));
        }
        self.active = active;
        self.color = color;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/paint/mode.rs"]
mod tests;
