//! The segment canvas: owner of the shape index, the paint context and the active asset's
//! segment list.
//!
//! All writes to the segment list go through this type. Failures of the collaborators
//! (partition source, metadata store) are logged and degrade the canvas; no operation here
//! returns an error to the caller.

use crate::{
    aggregate::{
        ids::{SegmentIdGen, UuidIds},
        offsets::project_segment_offsets,
        rescan::derive_segments_from_surface,
    },
    canvas::{
        grid::GridOverlay,
        state::{CanvasEvent, CanvasState, Effect, LoadTicket},
    },
    config::CanvasOpts,
    foundation::{
        core::{Affine, AssetId, Point, ShapeId, Size, Vec2, is_sentinel_tag},
        error::SegResult,
    },
    model::{
        metadata::{AssetInfo, AssetMetadata},
        segment::{Annotation, Segment, SegmentOffset},
        tag::{Tag, TagRegistry, delete_tag_from_metadata, rename_tag_in_metadata},
    },
    paint::{
        linker::{EventLinker, PointerEvent},
        mode::{ActiveTag, PaintContext, SelectionMode},
    },
    store::{metadata::MetadataStore, partition::PartitionSource},
    surface::{
        index::ShapeIndex,
        partition::decode_partition,
        shape::PaintState,
        svg_out::{SvgExportMode, overlay_to_svg},
    },
};

#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
/// On-screen box of the content the overlay sits on, in screen pixels.
pub struct ContentBox {
    /// Left edge.
    pub left: f64,
    /// Top edge.
    pub top: f64,
    /// Width.
    pub width: f64,
    /// Height.
    pub height: f64,
}

#[derive(Clone, Debug, PartialEq)]
/// Messages for the hosting editor, drained with [`SegmentCanvas::take_notices`].
pub enum CanvasNotice {
    /// The active asset's segments changed; the record is the new state.
    MetadataChanged(AssetMetadata),
    /// A neutral-mode click selected the segment of a different tag.
    SelectedSegmentChanged(Option<Segment>),
    /// The partition of the asset could not be loaded.
    NotAvailable(AssetId),
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// A started partition load. Hand the fetched result back to
/// [`SegmentCanvas::complete_load`] with this ticket.
pub struct LoadRequest {
    /// Ticket identifying the load.
    pub ticket: LoadTicket,
    /// Name of the partition to fetch.
    pub partition: String,
}

/// Decompose segments into one paint directive per member shape.
///
/// Colors come from `tags`; unknown tags paint in `fallback_color`. Segments without members
/// yield a directive with no shape.
pub fn segments_to_annotations(
    segments: &[Segment],
    tags: &TagRegistry,
    fallback_color: &str,
) -> Vec<Annotation> {
    let mut out = Vec::new();
    for seg in segments {
        let color = tags.color_of(&seg.tag).unwrap_or(fallback_color);
        if seg.is_empty() {
            out.push(Annotation::new(seg.tag.clone(), color, None));
            continue;
        }
        out.extend(
            seg.superpixel
                .iter()
                .map(|id| Annotation::new(seg.tag.clone(), color, Some(*id))),
        );
    }
    out
}

/// Interactive segment canvas over one asset at a time.
pub struct SegmentCanvas<S: MetadataStore, P: PartitionSource> {
    opts: CanvasOpts,
    store: S,
    partitions: P,
    ids: Box<dyn SegmentIdGen>,
    state: CanvasState,
    next_ticket: u64,
    metadata: Option<AssetMetadata>,
    index: ShapeIndex,
    ctx: PaintContext,
    linker: EventLinker,
    tags: TagRegistry,
    content_box: Option<ContentBox>,
    to_screen: Affine,
    from_screen: Affine,
    pending: Vec<SegmentOffset>,
    last_selected_tag: Option<String>,
    notices: Vec<CanvasNotice>,
}

impl<S: MetadataStore, P: PartitionSource> SegmentCanvas<S, P> {
    /// Uninitialized canvas using UUIDv7 segment ids.
    pub fn new(opts: CanvasOpts, store: S, partitions: P) -> Self {
        Self {
            ctx: PaintContext::new(opts.paint.default_color.clone()),
            linker: EventLinker::new(opts.paint.clone()),
            opts,
            store,
            partitions,
            ids: Box::new(UuidIds),
            state: CanvasState::Uninitialized,
            next_ticket: 0,
            metadata: None,
            index: ShapeIndex::default(),
            tags: TagRegistry::default(),
            content_box: None,
            to_screen: Affine::IDENTITY,
            from_screen: Affine::IDENTITY,
            pending: Vec::new(),
            last_selected_tag: None,
            notices: Vec::new(),
        }
    }

    /// Replace the segment id generator.
    pub fn with_id_gen(mut self, ids: impl SegmentIdGen + 'static) -> Self {
        self.ids = Box::new(ids);
        self
    }

    /// Set the project tag list without repainting (use before the first load).
    pub fn with_tags(mut self, tags: TagRegistry) -> Self {
        self.tags = tags;
        self
    }

    /// Lifecycle state.
    pub fn state(&self) -> &CanvasState {
        &self.state
    }

    /// Options in use.
    pub fn opts(&self) -> &CanvasOpts {
        &self.opts
    }

    /// Shapes of the attached partition.
    pub fn index(&self) -> &ShapeIndex {
        &self.index
    }

    /// Shared paint mode.
    pub fn paint_context(&self) -> &PaintContext {
        &self.ctx
    }

    /// Project tags.
    pub fn tags(&self) -> &TagRegistry {
        &self.tags
    }

    /// Record of the active asset.
    pub fn metadata(&self) -> Option<&AssetMetadata> {
        self.metadata.as_ref()
    }

    /// Segments of the active asset.
    pub fn segments(&self) -> &[Segment] {
        self.metadata
            .as_ref()
            .map(|m| m.segments.as_slice())
            .unwrap_or(&[])
    }

    /// Offsets queued while batching.
    pub fn pending_offsets(&self) -> &[SegmentOffset] {
        &self.pending
    }

    /// Metadata store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Metadata store, mutably.
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Drain pending notices in emission order.
    pub fn take_notices(&mut self) -> Vec<CanvasNotice> {
        std::mem::take(&mut self.notices)
    }

    /// Select `asset`, fetch its partition from the source and attach it.
    #[tracing::instrument(skip(self, asset), fields(asset = %asset.id))]
    pub fn load_asset(&mut self, asset: AssetInfo) {
        let req = self.begin_load(asset);
        let result = self
            .partitions
            .fetch_partition(&req.partition)
            .and_then(|bytes| decode_partition(&bytes, &self.opts.paint));
        self.complete_load(req.ticket, result);
    }

    /// Select `asset` and start a load. The previous asset, if ready, is persisted and torn down
    /// first.
    pub fn begin_load(&mut self, asset: AssetInfo) -> LoadRequest {
        self.next_ticket += 1;
        let ticket = LoadTicket(self.next_ticket);
        self.step(
            CanvasEvent::Select {
                asset: asset.id.clone(),
                ticket,
            },
            None,
        );

        let metadata = match self.store.load_asset_metadata(&asset) {
            Ok(m) => m,
            Err(e) => {
                tracing::warn!(asset = %asset.id, error = %e, "metadata load failed; starting empty");
                AssetMetadata::empty(asset)
            }
        };
        let partition = metadata.partition_name();
        self.metadata = Some(metadata);
        self.last_selected_tag = None;
        LoadRequest { ticket, partition }
    }

    /// Finish the load identified by `ticket`. Stale completions are dropped.
    pub fn complete_load(&mut self, ticket: LoadTicket, result: SegResult<ShapeIndex>) {
        match result {
            Ok(index) => self.step(CanvasEvent::Loaded(ticket), Some(index)),
            Err(e) => {
                if self.state.pending_ticket() == Some(ticket) {
                    tracing::warn!(error = %e, "partition not available");
                }
                self.step(CanvasEvent::Failed(ticket), None);
            }
        }
    }

    /// Persist the active asset and tear the surface down.
    pub fn teardown(&mut self) {
        self.step(CanvasEvent::Unmount, None);
        self.metadata = None;
    }

    /// Remember `tag` as the paint tag; it becomes active when annotating.
    pub fn apply_tag(&mut self, tag: &Tag) {
        self.ctx.apply_tag(tag);
    }

    /// Switch between neutral, annotating and de-annotating.
    pub fn set_selection_mode(&mut self, mode: SelectionMode) {
        self.linker.cancel_hover(&mut self.index);
        self.ctx.set_selection_mode(mode);
    }

    /// Enable or disable painting (disabled while the asset preview owns rendering).
    pub fn set_enabled(&mut self, enabled: bool) {
        if !enabled {
            self.linker.cancel_hover(&mut self.index);
            self.linker.reset();
        }
        self.ctx.set_enabled(enabled);
    }

    /// Show or hide the grid.
    pub fn set_grid_on(&mut self, on: bool) {
        self.opts.grid_on = on;
    }

    /// Grid to draw, when enabled and the partition is ready.
    pub fn grid_overlay(&self) -> Option<GridOverlay> {
        (self.opts.grid_on && self.state.is_ready())
            .then(|| GridOverlay::new(self.index.size(), self.opts.grid.clone()))
    }

    /// Clear every shape, reset the paint mode to empty and delete all segments.
    pub fn remove_all_segments(&mut self) {
        self.linker.cancel_hover(&mut self.index);
        self.linker.reset();
        self.index.clear_paint(&self.opts.paint);
        self.ctx.clear();
        self.pending.clear();
        self.replace_segments(Vec::new());
    }

    /// First segment carrying `tag`.
    pub fn selected_segment(&self, tag: &str) -> Option<&Segment> {
        self.segments().iter().find(|s| s.tag == tag)
    }

    /// Route one pointer event through the linker and fold its offsets into the segments.
    ///
    /// Returns true when the host should suppress its native handling of the event.
    pub fn handle_pointer(&mut self, ev: PointerEvent) -> bool {
        if !self.state.is_ready() {
            tracing::debug!(shape = %ev.shape, kind = ?ev.kind, "pointer event before ready ignored");
            return false;
        }
        let out = self.linker.handle(&mut self.index, &self.ctx, ev);

        if !out.offsets.is_empty() {
            if self.opts.batch_offsets {
                self.pending.extend(out.offsets);
            } else {
                self.apply_offsets(&out.offsets);
            }
        }

        if let Some(tag) = out.selected {
            if self.last_selected_tag.as_deref() != Some(tag.as_str()) {
                let seg = self.selected_segment(&tag).cloned();
                self.last_selected_tag = Some(tag);
                self.notices.push(CanvasNotice::SelectedSegmentChanged(seg));
            }
        }

        if out.gesture_ended {
            self.flush_offsets();
            if let Some(tag) = out.released_tag {
                self.ensure_segment(&tag);
            }
            self.rescan();
        }
        out.prevent_default
    }

    /// Apply every queued offset.
    pub fn flush_offsets(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        let pending = std::mem::take(&mut self.pending);
        self.apply_offsets(&pending);
    }

    /// Rebuild segments from the painted surface.
    pub fn rescan(&mut self) {
        let Some(meta) = self.metadata.as_ref() else {
            return;
        };
        let segments = derive_segments_from_surface(&self.index, &meta.segments, self.ids.as_mut());
        if segments.is_empty() && meta.segments.is_empty() {
            return;
        }
        self.replace_segments(segments);
    }

    /// Replace the project tag list and repaint shapes with the new colors.
    pub fn set_tags(&mut self, tags: TagRegistry) {
        for tag in tags.tags() {
            self.ctx.recolor_tag(&tag.name, &tag.color);
        }
        self.tags = tags;
        self.step(CanvasEvent::TagsChanged, None);
    }

    /// Rename a project tag everywhere on the canvas and in the active record.
    pub fn rename_tag(&mut self, from: &str, to: &str) {
        self.tags.rename(from, to);
        self.ctx.rename_tag(from, to);
        for shape in self.index.iter_mut().filter(|s| s.tag() == from) {
            shape.paint.tag = to.to_string();
        }
        if self.last_selected_tag.as_deref() == Some(from) {
            self.last_selected_tag = Some(to.to_string());
        }
        if let Some(meta) = self.metadata.as_mut() {
            if rename_tag_in_metadata(meta, from, to) {
                self.notify_metadata();
            }
        }
        self.step(CanvasEvent::TagsChanged, None);
    }

    /// Drop a project tag: its shapes become untagged and its segments are deleted.
    pub fn delete_tag(&mut self, name: &str) {
        self.tags.remove(name);
        if matches!(self.ctx.active_tag(), ActiveTag::Named(n) if n == name) {
            self.ctx.clear();
        }
        for shape in self.index.iter_mut().filter(|s| s.tag() == name) {
            shape.paint = PaintState::empty(&self.opts.paint);
        }
        if let Some(meta) = self.metadata.as_mut() {
            if delete_tag_from_metadata(meta, name) {
                self.notify_metadata();
            }
        }
        self.step(CanvasEvent::TagsChanged, None);
    }

    /// Change the color of a project tag and repaint.
    pub fn recolor_tag(&mut self, name: &str, color: &str) {
        self.tags.recolor(name, color);
        self.ctx.recolor_tag(name, color);
        self.step(CanvasEvent::TagsChanged, None);
    }

    /// Record where the content sits on screen and realign.
    pub fn set_content_box(&mut self, content: ContentBox) {
        self.content_box = Some(content);
        self.force_resize();
    }

    /// Recompute the image-to-screen transform after a layout change.
    pub fn force_resize(&mut self) {
        let (to, from) = match self.content_box {
            Some(content) => alignment(self.index.size(), content),
            None => (Affine::IDENTITY, Affine::IDENTITY),
        };
        self.to_screen = to;
        self.from_screen = from;
    }

    /// Image-to-screen transform.
    pub fn screen_transform(&self) -> Affine {
        self.to_screen
    }

    /// Topmost shape under a screen-space point.
    pub fn shape_at_screen(&self, pt: Point) -> Option<ShapeId> {
        self.index.shape_at(self.from_screen * pt)
    }

    /// Serialized painted overlay, with the grid when it is showing.
    pub fn overlay_svg(&self, mode: SvgExportMode) -> String {
        let grid = self.grid_overlay().map(|g| g.to_svg_fragment());
        overlay_to_svg(&self.index, &self.opts.paint, mode, grid.as_deref())
    }

    /// Rescan and hand the record to the metadata store. Best effort: failures are logged.
    pub fn store_current_canvas(&mut self) {
        if !self.state.is_ready() {
            return;
        }
        // A hover preview is visual only; restore it so the overlay document is clean.
        self.linker.cancel_hover(&mut self.index);
        self.flush_offsets();
        self.rescan();

        let Some(meta) = self.metadata.as_ref() else {
            return;
        };
        if let Err(e) = self.store.save_asset_metadata(meta) {
            tracing::warn!(asset = %meta.asset.id, error = %e, "saving metadata failed");
        }
        if let Some(svg) = &meta.svg {
            let doc = overlay_to_svg(&self.index, &self.opts.paint, SvgExportMode::Painted, None);
            if let Err(e) = self.store.save_overlay_svg(&svg.name, &doc) {
                tracing::warn!(asset = %meta.asset.id, error = %e, "saving overlay failed");
            }
        }
    }

    fn step(&mut self, event: CanvasEvent, mut loaded: Option<ShapeIndex>) {
        let t = self.state.next(event);
        // Effects run against the state being left.
        for effect in t.effects.iter() {
            match effect {
                Effect::Persist(asset) => {
                    tracing::debug!(asset = %asset, "persisting before teardown");
                    self.store_current_canvas();
                }
                Effect::TearDown => {
                    self.linker.reset();
                    self.pending.clear();
                    self.index = ShapeIndex::default();
                }
                Effect::Attach => {
                    if let Some(index) = loaded.take() {
                        self.index = index;
                    }
                }
                Effect::ShowNotAvailable => {}
                Effect::Repaint => self.repaint(),
                Effect::IgnoreStale => {
                    tracing::warn!(state = ?self.state, "stale load completion ignored");
                }
            }
        }
        self.state = t.state;

        for effect in t.effects {
            match effect {
                Effect::Attach => {
                    self.initialize_canvas();
                    self.force_resize();
                    tracing::info!(shapes = self.index.len(), "canvas ready");
                }
                Effect::ShowNotAvailable => {
                    if let Some(asset) = self.state.asset() {
                        self.notices.push(CanvasNotice::NotAvailable(asset.clone()));
                    }
                }
                _ => {}
            }
        }
    }

    // Paint every member shape from the record, then normalize opacity and stroke.
    fn initialize_canvas(&mut self) {
        let style = &self.opts.paint;
        let annotations =
            segments_to_annotations(self.segments(), &self.tags, &style.default_color);
        for ann in annotations {
            let Some(id) = ann.shape else {
                continue;
            };
            match self.index.get_mut(id) {
                Some(shape) => shape.paint = PaintState::tagged(style, &ann.tag, &ann.color),
                None => tracing::warn!(shape = %id, "annotation targets missing shape"),
            }
        }
        for shape in self.index.iter_mut() {
            shape.paint.opacity = if shape.paint.is_empty() {
                style.default_opacity
            } else {
                style.annotated_opacity
            };
            shape.paint.stroke_width = style.default_line_width;
        }
    }

    fn repaint(&mut self) {
        self.linker.cancel_hover(&mut self.index);
        let style = &self.opts.paint;
        for shape in self.index.iter_mut().filter(|s| !s.paint.is_empty()) {
            let color = self
                .tags
                .color_of(&shape.paint.tag)
                .unwrap_or(&shape.paint.name)
                .to_string();
            shape.paint = PaintState::tagged(style, &shape.paint.tag, &color);
        }
    }

    fn apply_offsets(&mut self, offsets: &[SegmentOffset]) {
        let Some(meta) = self.metadata.as_ref() else {
            return;
        };
        let segments = project_segment_offsets(&meta.segments, offsets, &self.index, self.ids.as_mut());
        self.replace_segments(segments);
    }

    fn ensure_segment(&mut self, tag: &str) {
        if is_sentinel_tag(tag) || self.selected_segment(tag).is_some() {
            return;
        }
        let id = self.ids.next_id();
        if let Some(meta) = self.metadata.as_mut() {
            meta.segments.push(Segment::empty(id, tag));
        }
    }

    fn replace_segments(&mut self, segments: Vec<Segment>) {
        let Some(meta) = self.metadata.as_mut() else {
            return;
        };
        if meta.segments == segments {
            return;
        }
        meta.segments = segments;
        self.notify_metadata();
    }

    fn notify_metadata(&mut self) {
        if let Some(meta) = &self.metadata {
            self.notices.push(CanvasNotice::MetadataChanged(meta.clone()));
        }
    }
}

/// Image-to-screen transform fitting `size` into `content`, and its inverse.
///
/// A degenerate size or box yields the identity pair.
pub fn alignment(size: Size, content: ContentBox) -> (Affine, Affine) {
    if size.width <= 0.0 || size.height <= 0.0 || content.width <= 0.0 || content.height <= 0.0 {
        return (Affine::IDENTITY, Affine::IDENTITY);
    }
    let to = Affine::translate(Vec2::new(content.left, content.top))
        * Affine::scale_non_uniform(content.width / size.width, content.height / size.height);
    (to, to.inverse())
}

#[cfg(test)]
#[path = "../../tests/unit/canvas/session.rs"]
mod tests;
