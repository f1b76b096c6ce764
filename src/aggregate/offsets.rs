use crate::{
    aggregate::ids::SegmentIdGen,
    foundation::core::{ShapeId, is_sentinel_tag},
    model::segment::{OffsetTag, Segment, SegmentOffset},
    surface::{geometry::{compute_bounding_box, resolved_area}, index::ShapeIndex},
};

/// Apply a queue of offsets, in arrival order, to a copy of `segments`.
///
/// Later offsets on the same shape win because each one sees the result of the previous.
#[tracing::instrument(skip_all, fields(segments = segments.len(), offsets = offsets.len()))]
pub fn project_segment_offsets(
    segments: &[Segment],
    offsets: &[SegmentOffset],
    index: &ShapeIndex,
    ids: &mut dyn SegmentIdGen,
) -> Vec<Segment> {
    let mut out = segments.to_vec();
    for offset in offsets {
        apply_offset(&mut out, offset, index, ids);
    }
    out
}

/// Apply one offset in place. Returns true if `segments` changed.
pub fn apply_offset(
    segments: &mut Vec<Segment>,
    offset: &SegmentOffset,
    index: &ShapeIndex,
    ids: &mut dyn SegmentIdGen,
) -> bool {
    match &offset.tag {
        OffsetTag::Annotate(tag) if !is_sentinel_tag(tag) => {
            annotate(segments, tag, offset, index, ids)
        }
        _ => remove_shape(segments, offset.shape, offset.area, index, None),
    }
}

fn annotate(
    segments: &mut Vec<Segment>,
    tag: &str,
    offset: &SegmentOffset,
    index: &ShapeIndex,
    ids: &mut dyn SegmentIdGen,
) -> bool {
    if segments
        .iter()
        .any(|s| s.tag == tag && s.contains(offset.shape))
    {
        return false;
    }

    // A shape carries one tag, so painting moves it out of any other segment.
    remove_shape(segments, offset.shape, offset.area, index, Some(tag));

    match segments.iter_mut().find(|s| s.tag == tag) {
        Some(seg) => {
            let mut carried = unresolved_area(seg, index);
            if !index.contains(offset.shape) {
                carried += offset.area;
            }
            seg.superpixel.insert(offset.shape);
            refresh_measures(seg, index, carried);
        }
        None => {
            let mut seg = Segment::empty(ids.next_id(), tag);
            seg.superpixel.insert(offset.shape);
            let carried = if index.contains(offset.shape) {
                0.0
            } else {
                offset.area
            };
            refresh_measures(&mut seg, index, carried);
            tracing::debug!(segment = %seg.id, tag, "created segment");
            segments.push(seg);
        }
    }
    true
}

fn remove_shape(
    segments: &mut Vec<Segment>,
    shape: ShapeId,
    area: f64,
    index: &ShapeIndex,
    keep_tag: Option<&str>,
) -> bool {
    let mut changed = false;
    segments.retain_mut(|seg| {
        if keep_tag == Some(seg.tag.as_str()) || !seg.contains(shape) {
            return true;
        }
        let mut carried = unresolved_area(seg, index);
        seg.superpixel.remove(&shape);
        changed = true;
        if seg.superpixel.is_empty() {
            tracing::debug!(segment = %seg.id, tag = %seg.tag, "segment emptied; deleted");
            return false;
        }
        if !index.contains(shape) {
            carried = (carried - area).max(0.0);
        }
        refresh_measures(seg, index, carried);
        true
    });
    changed
}

// Area of members without geometry, which only the stored total still accounts for.
fn unresolved_area(seg: &Segment, index: &ShapeIndex) -> f64 {
    if seg.superpixel.iter().all(|id| index.contains(*id)) {
        return 0.0;
    }
    (seg.area - resolved_area(index, &seg.superpixel)).max(0.0)
}

// Area is the sum over current members, never an accumulated delta.
fn refresh_measures(seg: &mut Segment, index: &ShapeIndex, carried: f64) {
    seg.area = resolved_area(index, &seg.superpixel) + carried;
    seg.bounding_box = compute_bounding_box(index, &seg.superpixel);
}

#[cfg(test)]
#[path = "../../tests/unit/aggregate/offsets.rs"]
mod tests;
