//! Scene-facing contract of the collision pipeline
//!
//! The pipeline never owns render objects. It stores an opaque handle per
//! tracked object and asks a [`BodySource`] for the current local bounds and
//! world matrix whenever it needs fresh geometry. Writes (moves, resolver
//! corrections) go back through [`BodySourceMut`].

use std::fmt;

use crate::foundation::math::{Mat4, Vec3};

/// Identifier of a tracked object, unique among registered objects
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ObjectId {
    /// Named object
    Name(String),
    /// Numbered object
    Index(u64),
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name(name) => f.write_str(name),
            Self::Index(index) => write!(f, "#{index}"),
        }
    }
}

impl From<&str> for ObjectId {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

impl From<String> for ObjectId {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

impl From<u64> for ObjectId {
    fn from(index: u64) -> Self {
        Self::Index(index)
    }
}

/// Kind of solid behind a tracked object.
///
/// Every kind is bounded by a box for collision purposes; the kind is carried
/// for observers and diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    /// Rectangular box
    Box,
    /// Upright cylinder
    Cylinder,
    /// Regular n-sided prism
    Prism,
}

/// What the scene reports about one body: its local bounding box and
/// current world matrix
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyGeometry {
    /// Center of the local bounding box (model space)
    pub local_center: Vec3,
    /// Half sizes of the local bounding box (model space)
    pub local_half_extents: Vec3,
    /// Model-to-world matrix
    pub world_matrix: Mat4,
}

impl BodyGeometry {
    /// Bounds centered on the model origin
    pub fn centered(local_half_extents: Vec3, world_matrix: Mat4) -> Self {
        Self {
            local_center: Vec3::zeros(),
            local_half_extents,
            world_matrix,
        }
    }
}

/// Read access to scene bodies by handle
pub trait BodySource<H> {
    /// Current bounds and transform, or `None` if the handle no longer
    /// resolves to a body
    fn body_geometry(&self, handle: H) -> Option<BodyGeometry>;

    /// Mass used by the resolver; `None` falls back to the configured default
    fn mass(&self, _handle: H) -> Option<f32> {
        None
    }
}

/// Write access used to move bodies
pub trait BodySourceMut<H>: BodySource<H> {
    /// Translate a body in world space. Returns `false` if the handle no
    /// longer resolves.
    fn translate(&mut self, handle: H, delta: Vec3) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_id_conversions() {
        assert_eq!(ObjectId::from("crate"), ObjectId::Name("crate".to_string()));
        assert_eq!(ObjectId::from(7u64), ObjectId::Index(7));
        assert_eq!(ObjectId::from("crate").to_string(), "crate");
        assert_eq!(ObjectId::from(7u64).to_string(), "#7");
    }
}
