//! Ground-plane footprints used by the broad phase
//!
//! A footprint is the X/Z shadow of an object's world bounding box. It always
//! encloses the OBB's own projection, so a pair whose footprints miss cannot
//! collide.

use super::primitives::Aabb;

/// Axis-aligned rectangle on the horizontal (X/Z) plane
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FootprintRect {
    /// Minimum X
    pub x: f32,
    /// Minimum Z
    pub z: f32,
    /// Extent along X (never negative)
    pub width: f32,
    /// Extent along Z (never negative)
    pub depth: f32,
}

impl FootprintRect {
    /// Create a rectangle; negative sizes are clamped to zero
    pub fn new(x: f32, z: f32, width: f32, depth: f32) -> Self {
        Self {
            x,
            z,
            width: width.max(0.0),
            depth: depth.max(0.0),
        }
    }

    /// Project a world bounding box onto the ground plane
    pub fn from_aabb(aabb: &Aabb) -> Self {
        Self::new(
            aabb.min.x,
            aabb.min.z,
            aabb.max.x - aabb.min.x,
            aabb.max.z - aabb.min.z,
        )
    }

    /// Maximum X
    pub fn max_x(&self) -> f32 {
        self.x + self.width
    }

    /// Maximum Z
    pub fn max_z(&self) -> f32 {
        self.z + self.depth
    }

    /// Strict four-condition overlap test, short-circuiting per axis
    pub fn overlaps(&self, other: &FootprintRect) -> bool {
        self.x < other.max_x()
            && self.max_x() > other.x
            && self.z < other.max_z()
            && self.max_z() > other.z
    }

    /// The overlapping sub-rectangle, if any
    pub fn intersection(&self, other: &FootprintRect) -> Option<FootprintRect> {
        if !self.overlaps(other) {
            return None;
        }
        let x = self.x.max(other.x);
        let z = self.z.max(other.z);
        Some(FootprintRect::new(
            x,
            z,
            self.max_x().min(other.max_x()) - x,
            self.max_z().min(other.max_z()) - z,
        ))
    }

    /// Area of the rectangle
    pub fn area(&self) -> f32 {
        self.width * self.depth
    }
}
