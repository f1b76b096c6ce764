use std::collections::{BTreeMap, BTreeSet};

use crate::{
    aggregate::ids::SegmentIdGen,
    foundation::core::{ShapeId, is_sentinel_tag},
    model::segment::Segment,
    surface::{geometry::{compute_bounding_box, resolved_area}, index::ShapeIndex},
};

/// Rebuild the segment list from the tags currently painted on the surface.
///
/// Groups are matched to `previous` by tag so that `id`, `risk`, `iscrowd` and `category` survive;
/// matched segments keep their previous order and unmatched groups follow in tag order with
/// fresh ids. Segments whose tag no longer appears on the surface are dropped.
#[tracing::instrument(skip_all, fields(shapes = index.len(), previous = previous.len()))]
pub fn derive_segments_from_surface(
    index: &ShapeIndex,
    previous: &[Segment],
    ids: &mut dyn SegmentIdGen,
) -> Vec<Segment> {
    let mut groups: BTreeMap<&str, BTreeSet<ShapeId>> = BTreeMap::new();
    for shape in index.iter() {
        let tag = shape.tag();
        if is_sentinel_tag(tag) {
            continue;
        }
        groups.entry(tag).or_default().insert(shape.id());
    }

    let mut out = Vec::with_capacity(groups.len());
    for prev in previous {
        let Some(members) = groups.remove(prev.tag.as_str()) else {
            continue;
        };
        out.push(Segment {
            bounding_box: compute_bounding_box(index, &members),
            area: resolved_area(index, &members),
            superpixel: members,
            ..prev.clone()
        });
    }
    for (tag, members) in groups {
        let mut seg = Segment::empty(ids.next_id(), tag);
        seg.bounding_box = compute_bounding_box(index, &members);
        seg.area = resolved_area(index, &members);
        seg.superpixel = members;
        out.push(seg);
    }
    out
}

/// Tag to member-set view of a segment list, ignoring ids and empty segments.
pub fn tag_assignment(segments: &[Segment]) -> BTreeMap<String, BTreeSet<ShapeId>> {
    let mut out: BTreeMap<String, BTreeSet<ShapeId>> = BTreeMap::new();
    for seg in segments.iter().filter(|s| !s.is_empty()) {
        out.entry(seg.tag.clone())
            .or_default()
            .extend(seg.superpixel.iter().copied());
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/aggregate/rescan.rs"]
mod tests;
