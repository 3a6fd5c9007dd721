//! Axis-aligned rectangle on the ground (XZ) plane

use crate::core::types::Vec2;

/// Axis-aligned rectangle defined by min and max corners.
///
/// `x` maps to world X and `y` to world Z.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    /// Create from min and max corners
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Create from center and half-extents
    pub fn from_center_half_extent(center: Vec2, half_extent: Vec2) -> Self {
        Self::new(center - half_extent, center + half_extent)
    }

    /// Square bounding a circle
    pub fn around_circle(center: Vec2, radius: f32) -> Self {
        Self::from_center_half_extent(center, Vec2::splat(radius))
    }

    /// Check if point is inside (edges inclusive)
    pub fn contains_point(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x &&
        p.y >= self.min.y && p.y <= self.max.y
    }
}
