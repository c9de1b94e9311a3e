//! Circle collision tests
//!
//! Every gameplay contact (player vs dot, player vs enemy) is a circle
//! overlap test in normalized track coordinates.

use glam::Vec2;

/// A collision circle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub center: Vec2,
    pub radius: f32,
}

impl Circle {
    pub fn new(center: Vec2, radius: f32) -> Self {
        Self { center, radius }
    }

    pub fn intersects(&self, other: &Circle) -> bool {
        circles_intersect(self.center, self.radius, other.center, other.radius)
    }

    /// Same center, radius multiplied by `factor`
    pub fn scaled(&self, factor: f32) -> Self {
        Self::new(self.center, self.radius * factor)
    }
}

/// Closed overlap test: circles exactly touching count as colliding.
#[inline]
pub fn circles_intersect(c1: Vec2, r1: f32, c2: Vec2, r2: f32) -> bool {
    c1.distance(c2) <= r1 + r2
}
