//=========================================================================
// Bounds
//=========================================================================
//
// Axis-aligned collision box reported by an actor's physics body.
//
//=========================================================================

use glam::Vec2;

/// Axis-aligned box stored as center and half extents.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub center: Vec2,
    pub half_extents: Vec2,
}

impl Bounds {
    /// Builds a box centered on `center` with full dimensions `size`.
    pub fn new(center: Vec2, size: Vec2) -> Self {
        Self {
            center,
            half_extents: size.abs() * 0.5,
        }
    }

    pub fn from_min_max(min: Vec2, max: Vec2) -> Self {
        Self {
            center: (min + max) * 0.5,
            half_extents: (max - min).abs() * 0.5,
        }
    }

    pub fn min(&self) -> Vec2 {
        self.center - self.half_extents
    }

    pub fn max(&self) -> Vec2 {
        self.center + self.half_extents
    }

    /// True when this box's center sits at or above `other`'s top edge.
    ///
    /// Used as the "attacked from above" test; a center exactly level with
    /// the top edge counts.
    pub fn is_above(&self, other: &Bounds) -> bool {
        self.center.y >= other.max().y
    }
}
