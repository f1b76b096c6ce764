//! Decoding of vector partitions into a [`ShapeIndex`].
//!
//! A partition is an SVG document whose top-level children are `<path id="sp<N>">` elements.
//! Anything that is not a path with a parsable `sp<N>` id is ignored. A path's `area`
//! attribute, when present, is the shape's measured area (a pixel count); otherwise the area is
//! taken from the geometry.

use std::collections::HashMap;

use anyhow::Context;
use usvg::tiny_skia_path::PathSegment;

use crate::{
    foundation::core::{Affine, BezPath, ShapeId, Size},
    foundation::error::{SegError, SegResult},
    paint::style::PaintStyle,
    surface::{index::ShapeIndex, shape::Shape},
};

/// Parse SVG bytes into a shape index with every shape untagged.
#[tracing::instrument(skip(bytes, style), fields(len = bytes.len()))]
pub fn decode_partition(bytes: &[u8], style: &PaintStyle) -> SegResult<ShapeIndex> {
    let opts = usvg::Options::default();
    let tree = usvg::Tree::from_data(bytes, &opts)
        .context("parse partition svg")
        .map_err(|e| SegError::partition(format!("{e:#}")))?;

    let size = Size::new(
        f64::from(tree.size().width()),
        f64::from(tree.size().height()),
    );
    let areas = declared_areas(bytes);
    let mut index = ShapeIndex::new(size);
    collect_shapes(tree.root(), "", style, &areas, &mut index);

    if index.is_empty() {
        return Err(SegError::partition(
            "partition contains no `sp<N>` path elements",
        ));
    }
    tracing::debug!(shapes = index.len(), "decoded partition");
    Ok(index)
}

/// Parse one SVG path `d` attribute.
pub fn parse_shape_path(d: &str) -> SegResult<BezPath> {
    let d = d.trim();
    if d.is_empty() {
        return Err(SegError::validation("shape path data must be non-empty"));
    }
    BezPath::from_svg(d).map_err(|e| SegError::validation(format!("invalid shape path: {e}")))
}

// usvg drops attributes it does not render, so `area` is read from the raw XML.
fn declared_areas(bytes: &[u8]) -> HashMap<ShapeId, f64> {
    let Ok(text) = std::str::from_utf8(bytes) else {
        return HashMap::new();
    };
    let doc = match roxmltree::Document::parse(text) {
        Ok(doc) => doc,
        Err(e) => {
            tracing::debug!(error = %e, "no declared areas; falling back to geometry");
            return HashMap::new();
        }
    };
    doc.descendants()
        .filter(|n| n.has_tag_name("path"))
        .filter_map(|n| {
            let id = ShapeId::parse(n.attribute("id")?)?;
            let raw = n.attribute("area")?;
            match raw.trim().parse::<f64>() {
                Ok(area) if area.is_finite() && area >= 0.0 => Some((id, area)),
                _ => {
                    tracing::warn!(shape = %id, area = raw, "ignoring invalid area attribute");
                    None
                }
            }
        })
        .collect()
}

// usvg moves the element id onto a synthesized group when the path needs one (opacity etc.),
// so an empty path id inherits the nearest named ancestor.
fn collect_shapes(
    group: &usvg::Group,
    inherited_id: &str,
    style: &PaintStyle,
    areas: &HashMap<ShapeId, f64>,
    out: &mut ShapeIndex,
) {
    let group_id = if group.id().is_empty() {
        inherited_id
    } else {
        group.id()
    };

    for child in group.children() {
        match child {
            usvg::Node::Group(g) => collect_shapes(g.as_ref(), group_id, style, areas, out),
            usvg::Node::Path(p) => {
                let raw_id = if p.id().is_empty() { group_id } else { p.id() };
                let Some(id) = ShapeId::parse(raw_id) else {
                    tracing::debug!(id = raw_id, "skipping path without sp<N> id");
                    continue;
                };
                let path = to_kurbo(p.data(), p.abs_transform());
                let shape = match areas.get(&id) {
                    Some(&area) => Shape::with_area(id, path, area, style),
                    None => Shape::new(id, path, style),
                };
                if out.insert(shape).is_some() {
                    tracing::warn!(shape = %id, "duplicate shape id in partition; last one wins");
                }
            }
            _ => {}
        }
    }
}

fn to_kurbo(data: &usvg::tiny_skia_path::Path, ts: usvg::Transform) -> BezPath {
    let mut out = BezPath::new();
    for seg in data.segments() {
        match seg {
            PathSegment::MoveTo(p) => out.move_to(pt(p)),
            PathSegment::LineTo(p) => out.line_to(pt(p)),
            PathSegment::QuadTo(p1, p2) => out.quad_to(pt(p1), pt(p2)),
            PathSegment::CubicTo(p1, p2, p3) => out.curve_to(pt(p1), pt(p2), pt(p3)),
            PathSegment::Close => out.close_path(),
        }
    }
    let affine = Affine::new([
        f64::from(ts.sx),
        f64::from(ts.ky),
        f64::from(ts.kx),
        f64::from(ts.sy),
        f64::from(ts.tx),
        f64::from(ts.ty),
    ]);
    if affine != Affine::IDENTITY {
        out.apply_affine(affine);
    }
    out
}

fn pt(p: usvg::tiny_skia_path::Point) -> (f64, f64) {
    (f64::from(p.x), f64::from(p.y))
}

#[cfg(test)]
#[path = "../../tests/unit/surface/partition.rs"]
mod tests;
