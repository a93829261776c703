//! Axis-aligned box geometry
//!
//! Everything in a room (furniture, player, door, aliens, power-ups) is an
//! integer rectangle anchored at its top-left corner.

use glam::IVec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle with integer coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Top-left corner
    pub pos: IVec2,
    pub width: i32,
    pub height: i32,
}

impl BoundingBox {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            pos: IVec2::new(x, y),
            width,
            height,
        }
    }

    /// Square box of side `dim` at `pos`
    pub const fn square(pos: IVec2, dim: i32) -> Self {
        Self {
            pos,
            width: dim,
            height: dim,
        }
    }

    /// Same size, different top-left corner
    #[inline]
    pub fn at(self, pos: IVec2) -> Self {
        Self { pos, ..self }
    }

    #[inline]
    pub fn x(&self) -> i32 {
        self.pos.x
    }

    #[inline]
    pub fn y(&self) -> i32 {
        self.pos.y
    }

    /// Exclusive right edge
    #[inline]
    pub fn right(&self) -> i32 {
        self.pos.x + self.width
    }

    /// Exclusive bottom edge
    #[inline]
    pub fn bottom(&self) -> i32 {
        self.pos.y + self.height
    }

    /// Strict overlap on both axes (shared edges do not count)
    #[inline]
    pub fn intersects(&self, other: &BoundingBox) -> bool {
        self.right().min(other.right()) > self.x().max(other.x())
            && self.bottom().min(other.bottom()) > self.y().max(other.y())
    }

    /// Point test, inclusive on every edge
    #[inline]
    pub fn contains_point(&self, point: IVec2) -> bool {
        point.x >= self.x()
            && point.x <= self.right()
            && point.y >= self.y()
            && point.y <= self.bottom()
    }

    /// Euclidean distance between top-left corners
    #[inline]
    pub fn distance_to(&self, other: &BoundingBox) -> f64 {
        let d = (self.pos - other.pos).as_dvec2();
        d.length()
    }

    /// True if the box lies inside `[0, width] x [0, height]`
    pub fn within(&self, width: i32, height: i32) -> bool {
        self.x() >= 0 && self.y() >= 0 && self.right() <= width && self.bottom() <= height
    }

    /// Center point (rounded toward the top-left)
    pub fn center(&self) -> IVec2 {
        self.pos + IVec2::new(self.width / 2, self.height / 2)
    }
}

/// Strict AABB overlap test
#[inline]
pub fn intersects(a: &BoundingBox, b: &BoundingBox) -> bool {
    a.intersects(b)
}

/// Distance between reference points (top-left corners); proximity gating only
#[inline]
pub fn distance(a: &BoundingBox, b: &BoundingBox) -> f64 {
    a.distance_to(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlapping_boxes_intersect() {
        let a = BoundingBox::new(0, 0, 50, 50);
        let b = BoundingBox::new(25, 25, 50, 50);
        assert!(intersects(&a, &b));
        assert!(intersects(&b, &a));
    }

    #[test]
    fn test_touching_edges_do_not_intersect() {
        let a = BoundingBox::new(0, 0, 50, 50);
        let right = BoundingBox::new(50, 0, 50, 50);
        let below = BoundingBox::new(0, 50, 50, 50);
        let corner = BoundingBox::new(50, 50, 10, 10);
        assert!(!a.intersects(&right));
        assert!(!a.intersects(&below));
        assert!(!a.intersects(&corner));
    }

    #[test]
    fn test_overlap_on_one_axis_only() {
        let a = BoundingBox::new(0, 0, 50, 50);
        let b = BoundingBox::new(10, 100, 20, 20);
        assert!(!a.intersects(&b));
    }

    #[test]
    fn test_containment_counts_as_intersection() {
        let outer = BoundingBox::new(0, 0, 100, 100);
        let inner = BoundingBox::new(40, 40, 5, 5);
        assert!(outer.intersects(&inner));
    }

    #[test]
    fn test_distance_uses_top_left_corners() {
        let a = BoundingBox::new(0, 0, 500, 500);
        let b = BoundingBox::new(3, 4, 1, 1);
        assert!((distance(&a, &b) - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_contains_point_inclusive_edges() {
        let b = BoundingBox::new(100, 100, 50, 50);
        assert!(b.contains_point(IVec2::new(120, 120)));
        assert!(b.contains_point(IVec2::new(100, 150)));
        assert!(!b.contains_point(IVec2::new(151, 120)));
        assert!(!b.contains_point(IVec2::new(500, 500)));
    }

    #[test]
    fn test_within_bounds() {
        assert!(BoundingBox::new(0, 0, 40, 40).within(40, 40));
        assert!(!BoundingBox::new(-1, 0, 40, 40).within(100, 100));
        assert!(!BoundingBox::new(70, 0, 40, 40).within(100, 100));
    }
}
