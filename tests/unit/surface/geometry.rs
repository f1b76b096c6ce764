use super::*;
use crate::{
    foundation::core::{Rect, Size},
    paint::style::PaintStyle,
    surface::shape::Shape,
};
use kurbo::Shape as _;

fn index_with(rects: &[(u32, Rect)]) -> ShapeIndex {
    let mut index = ShapeIndex::new(Size::new(200.0, 200.0));
    for (id, r) in rects {
        index.insert(Shape::new(
            ShapeId(*id),
            r.to_path(0.1),
            &PaintStyle::default(),
        ));
    }
    index
}

#[test]
fn box_folds_over_all_shapes() {
    let index = index_with(&[
        (1, Rect::new(10.0, 20.0, 30.0, 40.0)),
        (2, Rect::new(50.0, 5.0, 60.0, 25.0)),
    ]);
    let bb = compute_bounding_box(&index, &[ShapeId(1), ShapeId(2)]);
    assert_eq!(bb, BoundingBox::new(10.0, 5.0, 50.0, 35.0));
}

#[test]
fn missing_shape_is_skipped() {
    let index = index_with(&[(1, Rect::new(10.0, 20.0, 30.0, 40.0))]);
    let bb = compute_bounding_box(&index, &[ShapeId(1), ShapeId(99)]);
    assert_eq!(bb, BoundingBox::new(10.0, 20.0, 20.0, 20.0));
}

#[test]
fn nothing_resolvable_gives_default_box() {
    let index = index_with(&[]);
    assert_eq!(
        compute_bounding_box(&index, &[ShapeId(4)]),
        BoundingBox::default()
    );
    assert_eq!(
        compute_bounding_box(&index, std::iter::empty()),
        BoundingBox::default()
    );
}

#[test]
fn box_contains_curved_geometry() {
    let mut index = ShapeIndex::new(Size::new(100.0, 100.0));
    let path = BezPath::from_svg("M10 10 Q50 -20 90 10 L90 60 L10 60 Z").unwrap();
    index.insert(Shape::new(ShapeId(3), path.clone(), &PaintStyle::default()));
    let bb = compute_bounding_box(&index, &[ShapeId(3)]);
    assert!(bb.contains_rect(path.bounding_box()));
}

#[test]
fn polygon_points_follow_path_vertices() {
    let mut index = ShapeIndex::new(Size::new(100.0, 100.0));
    let path = BezPath::from_svg("M0 0 L4 0 L4 3 Z").unwrap();
    index.insert(Shape::new(ShapeId(1), path, &PaintStyle::default()));
    let pts = polygon_points(&index, &[ShapeId(1), ShapeId(2)]);
    assert_eq!(pts, vec![vec![[0.0, 0.0], [4.0, 0.0], [4.0, 3.0]]]);
}
