use super::*;
use crate::{
    aggregate::ids::SequentialIds,
    foundation::core::EMPTY_TAG,
    model::metadata::SvgRef,
    paint::linker::{Buttons, PointerKind},
    store::{metadata::InMemoryMetadataStore, partition::InMemoryPartitionSource},
};

// Three 10x10 squares side by side.
const PARTITION: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="30" height="10" viewBox="0 0 30 10">
  <path id="sp1" d="M0 0 L10 0 L10 10 L0 10 Z" fill="#000"/>
  <path id="sp2" d="M10 0 L20 0 L20 10 L10 10 Z" fill="#000"/>
  <path id="sp3" d="M20 0 L30 0 L30 10 L20 10 Z" fill="#000"/>
</svg>"##;

type TestCanvas = SegmentCanvas<InMemoryMetadataStore, InMemoryPartitionSource>;

fn asset(id: &str) -> AssetInfo {
    AssetInfo {
        id: AssetId::new(id),
        name: format!("{id}.jpg"),
        path: String::new(),
    }
}

fn canvas_with(store: InMemoryMetadataStore) -> TestCanvas {
    let mut parts = InMemoryPartitionSource::new();
    parts.insert("a.jpg.svg", PARTITION);
    parts.insert("b.jpg.svg", PARTITION);
    SegmentCanvas::new(CanvasOpts::default(), store, parts)
        .with_id_gen(SequentialIds::new("seg"))
        .with_tags(TagRegistry::new(vec![
            Tag::new("fish", "#f00"),
            Tag::new("coral", "#0f0"),
        ]))
}

fn ready_canvas() -> TestCanvas {
    let mut canvas = canvas_with(InMemoryMetadataStore::new());
    canvas.load_asset(asset("a"));
    assert!(canvas.state().is_ready());
    canvas.take_notices();
    canvas
}

fn annotate(canvas: &mut TestCanvas, tag: &str) {
    let color = canvas.tags().color_of(tag).unwrap().to_string();
    canvas.set_selection_mode(SelectionMode::Annotating);
    canvas.apply_tag(&Tag::new(tag, color));
}

fn press(canvas: &mut TestCanvas, kind: PointerKind, id: u32, buttons: Buttons) {
    canvas.handle_pointer(PointerEvent::new(kind, ShapeId(id), buttons));
}

// Press on `ids[0]`, drag across the rest, release on the last.
fn stroke(canvas: &mut TestCanvas, ids: &[u32], buttons: Buttons) {
    press(canvas, PointerKind::Down, ids[0], buttons);
    for id in &ids[1..] {
        press(canvas, PointerKind::Move, *id, buttons);
    }
    press(canvas, PointerKind::Up, *ids.last().unwrap(), Buttons::NONE);
}

fn metadata_changes(notices: &[CanvasNotice]) -> usize {
    notices
        .iter()
        .filter(|n| matches!(n, CanvasNotice::MetadataChanged(_)))
        .count()
}

#[test]
fn load_applies_saved_segments_as_paint() {
    let mut store = InMemoryMetadataStore::new();
    let mut meta = AssetMetadata::empty(asset("a"));
    let mut seg = Segment::empty("keep", "coral");
    seg.superpixel.insert(ShapeId(2));
    seg.superpixel.insert(ShapeId(9));
    seg.area = 100.0;
    meta.segments.push(seg);
    store.insert(meta);

    let mut canvas = canvas_with(store);
    canvas.load_asset(asset("a"));

    let s2 = &canvas.index().get(ShapeId(2)).unwrap().paint;
    assert_eq!(s2.tag, "coral");
    assert_eq!(s2.fill, "#0f0");
    assert_eq!(s2.opacity, 0.7);
    let s1 = &canvas.index().get(ShapeId(1)).unwrap().paint;
    assert_eq!(s1.tag, EMPTY_TAG);
    assert_eq!(s1.opacity, 0.1);
    assert_eq!(canvas.segments()[0].id, "keep");
}

#[test]
fn paint_stroke_builds_one_segment() {
    let mut canvas = ready_canvas();
    annotate(&mut canvas, "fish");
    stroke(&mut canvas, &[1, 2], Buttons::PRIMARY);

    let segs = canvas.segments();
    assert_eq!(segs.len(), 1);
    assert_eq!(segs[0].tag, "fish");
    assert_eq!(segs[0].id, "seg1");
    assert_eq!(segs[0].superpixel.len(), 2);
    assert!((segs[0].area - 200.0).abs() < 1e-6);
    assert!(metadata_changes(&canvas.take_notices()) >= 1);
}

#[test]
fn secondary_button_erases_and_deletes_empty_segment() {
    let mut canvas = ready_canvas();
    annotate(&mut canvas, "fish");
    stroke(&mut canvas, &[1], Buttons::PRIMARY);
    assert_eq!(canvas.segments().len(), 1);

    stroke(&mut canvas, &[1], Buttons::SECONDARY);
    assert!(canvas.segments().is_empty());
    assert_eq!(canvas.index().get(ShapeId(1)).unwrap().tag(), EMPTY_TAG);
}

#[test]
fn retag_without_erase_keeps_shapes_exclusive() {
    let mut canvas = ready_canvas();
    annotate(&mut canvas, "fish");
    stroke(&mut canvas, &[3], Buttons::PRIMARY);
    annotate(&mut canvas, "coral");
    stroke(&mut canvas, &[3], Buttons::PRIMARY);

    let segs = canvas.segments();
    assert_eq!(segs.len(), 1);
    assert_eq!(segs[0].tag, "coral");
}

#[test]
fn neutral_click_reports_selection_once() {
    let mut canvas = ready_canvas();
    annotate(&mut canvas, "fish");
    stroke(&mut canvas, &[1], Buttons::PRIMARY);
    canvas.set_selection_mode(SelectionMode::Neutral);
    canvas.take_notices();

    stroke(&mut canvas, &[1], Buttons::PRIMARY);
    stroke(&mut canvas, &[1], Buttons::PRIMARY);
    let selections: Vec<_> = canvas
        .take_notices()
        .into_iter()
        .filter_map(|n| match n {
            CanvasNotice::SelectedSegmentChanged(seg) => Some(seg),
            _ => None,
        })
        .collect();
    assert_eq!(selections.len(), 1);
    assert_eq!(selections[0].as_ref().unwrap().tag, "fish");

    // A different tag reports again.
    stroke(&mut canvas, &[2], Buttons::PRIMARY);
    let notices = canvas.take_notices();
    assert!(notices.contains(&CanvasNotice::SelectedSegmentChanged(None)));
}

#[test]
fn events_before_ready_are_ignored() {
    let mut canvas = canvas_with(InMemoryMetadataStore::new());
    annotate(&mut canvas, "fish");
    assert!(!canvas.handle_pointer(PointerEvent::new(
        PointerKind::Down,
        ShapeId(1),
        Buttons::PRIMARY
    )));
    assert!(canvas.segments().is_empty());
}

#[test]
fn drag_start_is_suppressed() {
    let mut canvas = ready_canvas();
    assert!(canvas.handle_pointer(PointerEvent::new(
        PointerKind::DragStart,
        ShapeId(1),
        Buttons::PRIMARY
    )));
}

#[test]
fn stale_load_completion_is_dropped() {
    let mut canvas = canvas_with(InMemoryMetadataStore::new());
    let first = canvas.begin_load(asset("a"));
    let second = canvas.begin_load(asset("b"));
    assert_ne!(first.ticket, second.ticket);

    let shapes = decode_partition(PARTITION.as_bytes(), &canvas.opts().paint).unwrap();
    canvas.complete_load(first.ticket, Ok(shapes.clone()));
    assert!(!canvas.state().is_ready());
    assert!(canvas.index().is_empty());

    canvas.complete_load(second.ticket, Ok(shapes));
    assert_eq!(
        canvas.state(),
        &CanvasState::Ready {
            asset: AssetId::new("b")
        }
    );
    assert_eq!(canvas.index().len(), 3);
}

#[test]
fn missing_partition_is_not_available() {
    let mut canvas = canvas_with(InMemoryMetadataStore::new());
    canvas.load_asset(asset("nope"));
    assert_eq!(
        canvas.state(),
        &CanvasState::NotAvailable {
            asset: AssetId::new("nope")
        }
    );
    assert_eq!(
        canvas.take_notices(),
        vec![CanvasNotice::NotAvailable(AssetId::new("nope"))]
    );
}

#[test]
fn switching_assets_persists_and_cleans_hover() {
    let mut store = InMemoryMetadataStore::new();
    let mut meta = AssetMetadata::empty(asset("a"));
    meta.svg = Some(SvgRef {
        name: "a.jpg.svg".to_string(),
        path: String::new(),
    });
    store.insert(meta);
    let mut canvas = canvas_with(store);
    canvas.load_asset(asset("a"));

    annotate(&mut canvas, "fish");
    stroke(&mut canvas, &[1], Buttons::PRIMARY);
    // Hover preview left dangling on shape 2.
    press(&mut canvas, PointerKind::Enter, 2, Buttons::NONE);
    assert_eq!(canvas.index().get(ShapeId(2)).unwrap().paint.fill, "#f00");

    canvas.load_asset(asset("b"));
    let saved = canvas.store().record(&AssetId::new("a")).unwrap();
    assert_eq!(saved.segments.len(), 1);
    assert_eq!(saved.segments[0].superpixel.len(), 1);

    let overlay = canvas.store().overlay("a.jpg.svg").unwrap();
    assert!(overlay.contains(r#"id="sp1" d="#));
    assert!(overlay.contains(r##"fill="#f00" tag="fish""##));
    assert_eq!(overlay.matches(r#"tag="empty""#).count(), 2);
    assert!(!overlay.contains("opacity: 0.9"));

    assert_eq!(canvas.segments().len(), 0);
    assert_eq!(canvas.paint_context().mode(), SelectionMode::Annotating);
}

#[test]
fn persistence_failure_does_not_block_switch() {
    let mut store = InMemoryMetadataStore::new();
    store.fail_saves = true;
    let mut canvas = canvas_with(store);
    canvas.load_asset(asset("a"));
    annotate(&mut canvas, "fish");
    stroke(&mut canvas, &[1], Buttons::PRIMARY);

    canvas.load_asset(asset("b"));
    assert!(canvas.state().is_ready());
    assert_eq!(canvas.state().asset(), Some(&AssetId::new("b")));
}

#[test]
fn remove_all_segments_clears_surface_and_mode() {
    let mut canvas = ready_canvas();
    annotate(&mut canvas, "fish");
    stroke(&mut canvas, &[1, 2, 3], Buttons::PRIMARY);
    canvas.take_notices();

    canvas.remove_all_segments();
    assert!(canvas.segments().is_empty());
    assert!(canvas.index().iter().all(|s| s.paint.is_empty()));
    assert_eq!(canvas.paint_context().active_tag(), &ActiveTag::Empty);
    assert_eq!(metadata_changes(&canvas.take_notices()), 1);
}

#[test]
fn batched_offsets_apply_on_gesture_end() {
    let mut store = InMemoryMetadataStore::new();
    store.insert(AssetMetadata::empty(asset("a")));
    let mut parts = InMemoryPartitionSource::new();
    parts.insert("a.jpg.svg", PARTITION);
    let opts = CanvasOpts {
        batch_offsets: true,
        ..CanvasOpts::default()
    };
    let mut canvas = SegmentCanvas::new(opts, store, parts).with_id_gen(SequentialIds::new("b"));
    canvas.load_asset(asset("a"));
    canvas.set_selection_mode(SelectionMode::Annotating);
    canvas.apply_tag(&Tag::new("fish", "#f00"));

    press(&mut canvas, PointerKind::Down, 1, Buttons::PRIMARY);
    press(&mut canvas, PointerKind::Move, 2, Buttons::PRIMARY);
    assert_eq!(canvas.pending_offsets().len(), 2);
    assert!(canvas.segments().is_empty());

    press(&mut canvas, PointerKind::Up, 2, Buttons::NONE);
    assert!(canvas.pending_offsets().is_empty());
    assert_eq!(canvas.segments()[0].superpixel.len(), 2);
}

#[test]
fn batched_drag_from_background_commits_on_release() {
    let mut parts = InMemoryPartitionSource::new();
    parts.insert("a.jpg.svg", PARTITION);
    let opts = CanvasOpts {
        batch_offsets: true,
        ..CanvasOpts::default()
    };
    let mut canvas = SegmentCanvas::new(opts, InMemoryMetadataStore::new(), parts)
        .with_id_gen(SequentialIds::new("b"));
    canvas.load_asset(asset("a"));
    canvas.set_selection_mode(SelectionMode::Annotating);
    canvas.apply_tag(&Tag::new("fish", "#f00"));

    press(&mut canvas, PointerKind::Move, 1, Buttons::PRIMARY);
    press(&mut canvas, PointerKind::Move, 2, Buttons::PRIMARY);
    press(&mut canvas, PointerKind::Up, 2, Buttons::NONE);

    assert!(canvas.pending_offsets().is_empty());
    assert_eq!(canvas.segments().len(), 1);
    let members: Vec<u32> = canvas.segments()[0].superpixel.iter().map(|s| s.0).collect();
    assert_eq!(members, vec![1, 2]);
}

#[test]
fn rescan_on_untouched_empty_canvas_is_silent() {
    let mut canvas = ready_canvas();
    canvas.rescan();
    assert!(canvas.take_notices().is_empty());
}

#[test]
fn tag_edits_repaint_without_changing_membership() {
    let mut canvas = ready_canvas();
    annotate(&mut canvas, "fish");
    stroke(&mut canvas, &[1, 2], Buttons::PRIMARY);

    canvas.recolor_tag("fish", "#00f");
    assert_eq!(canvas.index().get(ShapeId(1)).unwrap().paint.fill, "#00f");
    assert_eq!(canvas.paint_context().color(), "#00f");

    canvas.rename_tag("fish", "trout");
    assert_eq!(canvas.segments()[0].tag, "trout");
    assert_eq!(canvas.segments()[0].superpixel.len(), 2);
    assert_eq!(canvas.index().get(ShapeId(2)).unwrap().tag(), "trout");
    assert_eq!(canvas.paint_context().active_tag().as_str(), "trout");

    canvas.delete_tag("trout");
    assert!(canvas.segments().is_empty());
    assert!(canvas.index().iter().all(|s| s.paint.is_empty()));
    assert_eq!(canvas.paint_context().active_tag(), &ActiveTag::Empty);
}

#[test]
fn disabled_canvas_ignores_paint() {
    let mut canvas = ready_canvas();
    annotate(&mut canvas, "fish");
    canvas.set_enabled(false);
    stroke(&mut canvas, &[1], Buttons::PRIMARY);
    assert!(canvas.segments().is_empty());

    canvas.set_enabled(true);
    stroke(&mut canvas, &[1], Buttons::PRIMARY);
    assert_eq!(canvas.segments().len(), 1);
}

#[test]
fn screen_hit_testing_follows_content_box() {
    let mut canvas = ready_canvas();
    canvas.set_content_box(ContentBox {
        left: 100.0,
        top: 50.0,
        width: 60.0,
        height: 20.0,
    });
    // Image is 30x10, shown at 2x.
    assert_eq!(canvas.shape_at_screen(Point::new(105.0, 55.0)), Some(ShapeId(1)));
    assert_eq!(canvas.shape_at_screen(Point::new(150.0, 60.0)), Some(ShapeId(3)));
    assert_eq!(canvas.shape_at_screen(Point::new(10.0, 10.0)), None);
    assert_eq!(
        canvas.screen_transform() * Point::new(30.0, 10.0),
        Point::new(160.0, 70.0)
    );
}

#[test]
fn grid_shows_only_when_on_and_ready() {
    let mut canvas = canvas_with(InMemoryMetadataStore::new());
    canvas.set_grid_on(true);
    assert!(canvas.grid_overlay().is_none());
    canvas.load_asset(asset("a"));
    assert!(canvas.grid_overlay().is_some());
    assert!(canvas.overlay_svg(SvgExportMode::Painted).contains("canvas-grid"));
    canvas.set_grid_on(false);
    assert!(!canvas.overlay_svg(SvgExportMode::Painted).contains("canvas-grid"));
}

#[test]
fn annotations_decompose_per_member() {
    let mut a = Segment::empty("1", "fish");
    a.superpixel.insert(ShapeId(4));
    a.superpixel.insert(ShapeId(2));
    let b = Segment::empty("2", "ghost");
    let tags = TagRegistry::new(vec![Tag::new("fish", "#f00")]);

    let anns = segments_to_annotations(&[a, b], &tags, "black");
    assert_eq!(anns.len(), 3);
    assert_eq!(anns[0], Annotation::new("fish", "#f00", Some(ShapeId(2))));
    assert_eq!(anns[2], Annotation::new("ghost", "black", None));
}

#[test]
fn teardown_persists_and_resets() {
    let mut canvas = ready_canvas();
    annotate(&mut canvas, "coral");
    stroke(&mut canvas, &[2], Buttons::PRIMARY);
    canvas.teardown();
    assert_eq!(canvas.state(), &CanvasState::Uninitialized);
    assert!(canvas.index().is_empty());
    assert_eq!(
        canvas.store().record(&AssetId::new("a")).unwrap().segments[0].tag,
        "coral"
    );
}
