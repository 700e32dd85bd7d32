//! Arena geometry
//!
//! The arena is an axis-aligned rectangle. Spawning works on the rectangle
//! shrunk by a buffer; bullet expiry works on it grown or shrunk by a margin.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{ARENA_HEIGHT, ARENA_LEFT, ARENA_TOP, ARENA_WIDTH};

/// Axis-aligned rectangle (y grows downward, like screen space)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Arena {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl Default for Arena {
    fn default() -> Self {
        Self::new(ARENA_LEFT, ARENA_TOP, ARENA_WIDTH, ARENA_HEIGHT)
    }
}

impl Arena {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.left + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.left + self.width / 2.0, self.top + self.height / 2.0)
    }

    /// Check if a point lies inside (edges inclusive)
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.left && p.x <= self.right() && p.y >= self.top && p.y <= self.bottom()
    }

    /// Shrink by `amount` on every side. Returns `None` if nothing is left.
    pub fn inset(&self, amount: f32) -> Option<Arena> {
        let width = self.width - 2.0 * amount;
        let height = self.height - 2.0 * amount;
        if width < 0.0 || height < 0.0 {
            return None;
        }
        Some(Arena {
            left: self.left + amount,
            top: self.top + amount,
            width,
            height,
        })
    }

    /// Clamp a point into the rectangle
    pub fn clamp(&self, p: Vec2) -> Vec2 {
        Vec2::new(
            p.x.clamp(self.left, self.right()),
            p.y.clamp(self.top, self.bottom()),
        )
    }

    /// True once a point has left the rectangle grown by `margin`
    /// (a negative margin counts points near the edge as outside)
    pub fn is_outside(&self, p: Vec2, margin: f32) -> bool {
        p.x < self.left - margin
            || p.x > self.right() + margin
            || p.y < self.top - margin
            || p.y > self.bottom() + margin
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inset_and_contains() {
        let arena = Arena::new(0.0, 0.0, 400.0, 300.0);
        let inner = arena.inset(100.0).unwrap();
        assert_eq!(inner.left, 100.0);
        assert_eq!(inner.right(), 300.0);
        assert_eq!(inner.bottom(), 200.0);
        assert!(inner.contains(Vec2::new(200.0, 150.0)));
        assert!(!inner.contains(Vec2::new(50.0, 150.0)));

        // Buffer larger than half the height leaves nothing
        assert!(arena.inset(151.0).is_none());
    }

    #[test]
    fn test_is_outside_with_margin() {
        let arena = Arena::new(0.0, 0.0, 100.0, 100.0);
        // Negative margin: 10 units from the edge already counts as outside
        assert!(arena.is_outside(Vec2::new(10.0, 50.0), -20.0));
        assert!(!arena.is_outside(Vec2::new(50.0, 50.0), -20.0));
        // Positive margin: allowed to drift past the edge
        assert!(!arena.is_outside(Vec2::new(-10.0, 50.0), 20.0));
        assert!(arena.is_outside(Vec2::new(-30.0, 50.0), 20.0));
    }

    #[test]
    fn test_clamp() {
        let arena = Arena::new(0.0, 0.0, 100.0, 100.0);
        assert_eq!(arena.clamp(Vec2::new(-5.0, 150.0)), Vec2::new(0.0, 100.0));
    }
}
