//! Per-shape pointer handling: hover preview, paint, erase and click selection.
//!
//! The linker reads the active tag from a [`PaintContext`] and mutates shape paint in a
//! [`ShapeIndex`]. It never touches segments; it emits [`SegmentOffset`]s for the aggregation
//! engine instead.

use crate::{
    foundation::core::ShapeId,
    model::segment::SegmentOffset,
    paint::{
        mode::{ActiveTag, PaintContext, SelectionMode},
        style::PaintStyle,
    },
    surface::{
        index::ShapeIndex,
        shape::{PaintState, VisualState},
    },
};

#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
/// Pointer button bitmask as reported with the event (`1` primary, `2` secondary).
pub struct Buttons(pub u8);

impl Buttons {
    /// No button held.
    pub const NONE: Self = Self(0);
    /// Only the primary button held.
    pub const PRIMARY: Self = Self(1);
    /// Only the secondary button held.
    pub const SECONDARY: Self = Self(2);

    /// True when no button is held.
    pub fn is_none(self) -> bool {
        self.0 == 0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
/// Pointer event kinds delivered per shape.
pub enum PointerKind {
    /// Pointer entered the shape.
    Enter,
    /// Pointer left the shape.
    Leave,
    /// Pointer moved over the shape.
    Move,
    /// A button went down over the shape.
    Down,
    /// A button went up over the shape.
    Up,
    /// Native drag-and-drop is about to start.
    DragStart,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
/// One pointer event targeted at one shape.
pub struct PointerEvent {
    /// What happened.
    pub kind: PointerKind,
    /// Target shape.
    pub shape: ShapeId,
    /// Buttons held while the event fired.
    #[serde(default)]
    pub buttons: Buttons,
}

impl PointerEvent {
    /// Build an event.
    pub fn new(kind: PointerKind, shape: ShapeId, buttons: Buttons) -> Self {
        Self {
            kind,
            shape,
            buttons,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
/// What one event produced.
pub struct LinkerOutput {
    /// Committed per-shape changes, in order.
    pub offsets: Vec<SegmentOffset>,
    /// Tag reported by a neutral-mode click.
    pub selected: Option<String>,
    /// A pressed gesture ended; the caller should run a bulk rescan.
    pub gesture_ended: bool,
    /// Tag of the shape under the pointer when a non-neutral gesture ended.
    pub released_tag: Option<String>,
    /// The host should prevent its native handling of the event.
    pub prevent_default: bool,
}

#[derive(Clone, Debug)]
struct HoverStash {
    shape: ShapeId,
    visual: VisualState,
}

#[derive(Clone, Debug)]
/// Gesture state machine shared by every shape of the surface.
pub struct EventLinker {
    style: PaintStyle,
    hover: Option<HoverStash>,
    pressed: bool,
    painted: bool,
}

impl EventLinker {
    /// Idle linker painting with `style`.
    pub fn new(style: PaintStyle) -> Self {
        Self {
            style,
            hover: None,
            pressed: false,
            painted: false,
        }
    }

    /// Paint constants in use.
    pub fn style(&self) -> &PaintStyle {
        &self.style
    }

    /// True while a button press is in progress.
    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    /// Shape currently showing a hover preview.
    pub fn hovered(&self) -> Option<ShapeId> {
        self.hover.as_ref().map(|h| h.shape)
    }

    /// Dispatch one pointer event.
    pub fn handle(
        &mut self,
        index: &mut ShapeIndex,
        ctx: &PaintContext,
        ev: PointerEvent,
    ) -> LinkerOutput {
        if ev.kind == PointerKind::DragStart {
            return LinkerOutput {
                prevent_default: true,
                ..LinkerOutput::default()
            };
        }
        if !ctx.is_enabled() {
            return LinkerOutput::default();
        }
        if !index.contains(ev.shape) {
            tracing::debug!(shape = %ev.shape, kind = ?ev.kind, "event on unknown shape ignored");
            if ev.kind == PointerKind::Up && self.gesture_active() {
                self.pressed = false;
                self.painted = false;
                return LinkerOutput {
                    gesture_ended: true,
                    ..LinkerOutput::default()
                };
            }
            return LinkerOutput::default();
        }

        match ev.kind {
            PointerKind::Enter => {
                if ev.buttons.is_none() {
                    self.preview(index, ctx, ev.shape);
                }
                LinkerOutput::default()
            }
            PointerKind::Leave => {
                if ev.buttons.is_none() {
                    self.restore(index, ev.shape);
                }
                LinkerOutput::default()
            }
            PointerKind::Move => self.stroke(index, ctx, ev),
            PointerKind::Down => {
                self.pressed = true;
                self.painted = false;
                self.stroke(index, ctx, ev)
            }
            PointerKind::Up => self.release(index, ctx, ev.shape),
            PointerKind::DragStart => LinkerOutput::default(),
        }
    }

    /// Undo a pending hover preview. Returns true if one was restored.
    pub fn cancel_hover(&mut self, index: &mut ShapeIndex) -> bool {
        let Some(stash) = self.hover.take() else {
            return false;
        };
        match index.get_mut(stash.shape) {
            Some(shape) => {
                shape.paint.set_visual(stash.visual);
                true
            }
            None => false,
        }
    }

    /// Forget all gesture state without touching the surface.
    pub fn reset(&mut self) {
        self.hover = None;
        self.pressed = false;
        self.painted = false;
    }

    // A drag entering from the background paints without a shape `Down`.
    fn gesture_active(&self) -> bool {
        self.pressed || self.painted
    }

    fn preview(&mut self, index: &mut ShapeIndex, ctx: &PaintContext, id: ShapeId) {
        if !ctx.is_painting() {
            return;
        }
        if self.hovered().is_some_and(|h| h != id) {
            self.cancel_hover(index);
        }
        let Some(shape) = index.get_mut(id) else {
            return;
        };
        if self.hover.is_none() {
            self.hover = Some(HoverStash {
                shape: id,
                visual: shape.paint.visual(),
            });
        }
        let erasing = *ctx.active_tag() == ActiveTag::Deannotating;
        shape.paint.set_visual(VisualState {
            fill: if erasing {
                self.style.default_color.clone()
            } else {
                ctx.color().to_string()
            },
            opacity: if erasing {
                self.style.default_opacity
            } else {
                self.style.annotating_opacity
            },
            stroke_width: self.style.highlight_line_width,
        });
    }

    fn restore(&mut self, index: &mut ShapeIndex, id: ShapeId) {
        if self.hovered() == Some(id) {
            self.cancel_hover(index);
        }
    }

    fn stroke(&mut self, index: &mut ShapeIndex, ctx: &PaintContext, ev: PointerEvent) -> LinkerOutput {
        let offset = match (ctx.active_tag(), ev.buttons) {
            (ActiveTag::Empty, _) => None,
            (ActiveTag::Named(tag), Buttons::PRIMARY) => {
                let (tag, color) = (tag.clone(), ctx.color().to_string());
                self.paint(index, ev.shape, &tag, &color)
            }
            (ActiveTag::Deannotating, Buttons::PRIMARY) | (_, Buttons::SECONDARY) => {
                self.erase(index, ev.shape)
            }
            _ => None,
        };
        LinkerOutput {
            offsets: offset.into_iter().collect(),
            ..LinkerOutput::default()
        }
    }

    fn release(&mut self, index: &ShapeIndex, ctx: &PaintContext, id: ShapeId) -> LinkerOutput {
        if !self.gesture_active() {
            return LinkerOutput::default();
        }
        self.pressed = false;
        let tag = index.get(id).map(|s| s.tag().to_string());

        let mut out = LinkerOutput {
            gesture_ended: true,
            ..LinkerOutput::default()
        };
        if ctx.mode() == SelectionMode::Neutral {
            if !self.painted {
                out.selected = tag;
            }
        } else {
            out.released_tag = tag;
        }
        self.painted = false;
        out
    }

    fn paint(
        &mut self,
        index: &mut ShapeIndex,
        id: ShapeId,
        tag: &str,
        color: &str,
    ) -> Option<SegmentOffset> {
        let shape = index.get_mut(id)?;
        shape.paint = PaintState::tagged(&self.style, tag, color);
        let area = shape.area();
        self.commit(id);
        Some(SegmentOffset::annotate(tag, area, id))
    }

    fn erase(&mut self, index: &mut ShapeIndex, id: ShapeId) -> Option<SegmentOffset> {
        let shape = index.get_mut(id)?;
        shape.paint = PaintState::empty(&self.style);
        let area = shape.area();
        self.commit(id);
        Some(SegmentOffset::deannotate(area, id))
    }

    // A commit overwrites the previewed visuals, so the stash is stale from here on.
    fn commit(&mut self, id: ShapeId) {
        if self.hovered() == Some(id) {
            self.hover = None;
        }
        self.painted = true;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/paint/linker.rs"]
mod tests;
