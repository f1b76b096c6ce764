//! Bounding boxes and polygon points derived from shape geometry.

use kurbo::PathEl;

use crate::{
    foundation::core::{BezPath, Point, ShapeId},
    model::segment::BoundingBox,
    surface::index::ShapeIndex,
};

/// Every `(x, y)` vertex written in the path, control points included.
///
/// Control points keep the fold conservative: a curve never leaves the hull of its points.
pub fn path_vertices(path: &BezPath) -> Vec<Point> {
    let mut out = Vec::new();
    for el in path.elements() {
        match *el {
            PathEl::MoveTo(p) | PathEl::LineTo(p) => out.push(p),
            PathEl::QuadTo(p1, p2) => out.extend([p1, p2]),
            PathEl::CurveTo(p1, p2, p3) => out.extend([p1, p2, p3]),
            PathEl::ClosePath => {}
        }
    }
    out
}

/// Bounding box folded over the vertices of every listed shape.
///
/// Ids that do not resolve are skipped with a warning. If nothing resolves the default
/// (degenerate) box is returned.
pub fn compute_bounding_box<'a>(
    index: &ShapeIndex,
    ids: impl IntoIterator<Item = &'a ShapeId>,
) -> BoundingBox {
    let mut min = Point::new(f64::INFINITY, f64::INFINITY);
    let mut max = Point::new(f64::NEG_INFINITY, f64::NEG_INFINITY);
    let mut any = false;

    for id in ids {
        let Some(shape) = index.get(*id) else {
            tracing::warn!(shape = %id, "missing geometry; skipped in bounding box");
            continue;
        };
        for p in path_vertices(shape.path()) {
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
            any = true;
        }
    }

    if !any {
        return BoundingBox::default();
    }
    BoundingBox::new(min.x, min.y, max.x - min.x, max.y - min.y)
}

/// Sum of the areas of every listed shape that resolves, in the order given.
pub fn resolved_area<'a>(index: &ShapeIndex, ids: impl IntoIterator<Item = &'a ShapeId>) -> f64 {
    ids.into_iter()
        .filter_map(|id| index.get(*id))
        .map(|shape| shape.area())
        .sum()
}

/// One point list per resolvable shape, in the order given.
pub fn polygon_points<'a>(
    index: &ShapeIndex,
    ids: impl IntoIterator<Item = &'a ShapeId>,
) -> Vec<Vec<[f64; 2]>> {
    ids.into_iter()
        .filter_map(|id| match index.get(*id) {
            Some(shape) => Some(
                path_vertices(shape.path())
                    .into_iter()
                    .map(|p| [p.x, p.y])
                    .collect(),
            ),
            None => {
                tracing::warn!(shape = %id, "missing geometry; skipped in polygon export");
                None
            }
        })
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/surface/geometry.rs"]
mod tests;
