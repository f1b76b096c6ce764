use std::collections::BTreeMap;

use kurbo::Shape as _;

use crate::{
    foundation::core::{Point, ShapeId, Size},
    paint::style::PaintStyle,
    surface::shape::{PaintState, Shape},
};

#[derive(Clone, Debug, Default)]
/// Explicit shape index: the rendering surface's shapes keyed by id.
///
/// Iteration order is ascending shape id, which keeps rescans deterministic.
pub struct ShapeIndex {
    size: Size,
    shapes: BTreeMap<ShapeId, Shape>,
}

impl ShapeIndex {
    /// Empty index over an image of `size`.
    pub fn new(size: Size) -> Self {
        Self {
            size,
            shapes: BTreeMap::new(),
        }
    }

    /// Intrinsic size of the partition (image coordinate space).
    pub fn size(&self) -> Size {
        self.size
    }

    /// Insert or replace a shape. Returns the replaced shape, if any.
    pub fn insert(&mut self, shape: Shape) -> Option<Shape> {
        self.shapes.insert(shape.id(), shape)
    }

    /// Remove a shape from the surface.
    pub fn remove(&mut self, id: ShapeId) -> Option<Shape> {
        self.shapes.remove(&id)
    }

    /// Look up a shape.
    pub fn get(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.get(&id)
    }

    /// Look up a shape mutably.
    pub fn get_mut(&mut self, id: ShapeId) -> Option<&mut Shape> {
        self.shapes.get_mut(&id)
    }

    /// True when `id` resolves.
    pub fn contains(&self, id: ShapeId) -> bool {
        self.shapes.contains_key(&id)
    }

    /// Number of shapes.
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    /// True when the surface holds no shape.
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Shapes in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = &Shape> {
        self.shapes.values()
    }

    /// Shapes in ascending id order, mutably.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Shape> {
        self.shapes.values_mut()
    }

    /// Ids in ascending order.
    pub fn ids(&self) -> impl Iterator<Item = ShapeId> + '_ {
        self.shapes.keys().copied()
    }

    /// Reset every shape to the untagged state.
    pub fn clear_paint(&mut self, style: &PaintStyle) {
        for shape in self.shapes.values_mut() {
            shape.paint = PaintState::empty(style);
        }
    }

    /// Topmost shape containing `pt` (image coordinates).
    ///
    /// Later ids are drawn on top, so the search runs in descending id order.
    pub fn shape_at(&self, pt: Point) -> Option<ShapeId> {
        self.shapes
            .values()
            .rev()
            .find(|s| s.bounds().contains(pt) && s.path().contains(pt))
            .map(|s| s.id())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/surface/index.rs"]
mod tests;
