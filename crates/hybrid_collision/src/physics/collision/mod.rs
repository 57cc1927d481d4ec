//! Collision geometry
//!
//! # Module Organization
//!
//! - [`primitives`] - Rays, ray hits and world-space AABBs
//! - [`footprint`] - Ground-plane rectangles consumed by the broad phase
//! - [`obb`] - Oriented bounding boxes, SAT intersection and slab raycasts

pub mod primitives;
pub mod footprint;
pub mod obb;

// Re-export commonly used types
pub use primitives::{Aabb, Ray, RayHit};
pub use footprint::FootprintRect;
pub use obb::{ObbRayHit, OrientedBoundingBox, SatContact};
