//! Axis-aligned bounding box collision
//!
//! Every entity is a rectangle anchored at its top-left corner. Two rectangles
//! collide when they overlap on both axes; touching edges do not count.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle (top-left corner + size)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(width, height),
        }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.pos.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    /// Check overlap with another rectangle
    #[inline]
    pub fn overlaps(&self, other: &Rect) -> bool {
        aabb_overlap(self, other)
    }
}

/// Anything that occupies a rectangle on the playfield
pub trait Bounded {
    fn bounds(&self) -> Rect;
    fn pos_mut(&mut self) -> &mut Vec2;
}

/// AABB overlap test. Pure and symmetric in its arguments.
#[inline]
pub fn aabb_overlap(a: &Rect, b: &Rect) -> bool {
    a.left() < b.right() && a.right() > b.left() && a.top() < b.bottom() && a.bottom() > b.top()
}

/// Check whether two bounded entities collide
#[inline]
pub fn collides(a: &impl Bounded, b: &impl Bounded) -> bool {
    aabb_overlap(&a.bounds(), &b.bounds())
}
