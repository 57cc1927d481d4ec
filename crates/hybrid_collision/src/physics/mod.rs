//! Physics module for collision detection and response
//!
//! Based on Game Engine Architecture 3rd Edition, Chapter 13: collision
//! detection is split into a broad phase ([`broad_phase`]) that culls pairs
//! by ground-plane footprint and a narrow phase that runs the separating
//! axis test on oriented boxes ([`collision::obb`]). [`collision_system`]
//! orchestrates both; [`resolver`] pushes overlapping bodies apart.

pub mod body;
pub mod broad_phase;
pub mod collision;
pub mod collision_layers;
pub mod collision_system;
pub mod resolver;

pub use body::{BodyGeometry, BodySource, BodySourceMut, ObjectId, ShapeKind};
pub use broad_phase::{BroadPhaseIndex, BroadPhasePair};
pub use collision::{Aabb, FootprintRect, OrientedBoundingBox, Ray, RayHit, SatContact};
pub use collision_layers::CollisionLayers;
pub use collision_system::{
    ColliderKey, CollisionPipeline, CollisionRecord, CollisionStats, TrackedObject,
};
pub use resolver::{CollisionResolver, Separation};

/// Failures of per-object pipeline operations
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CollisionError {
    /// No object is registered under this identifier
    #[error("object {0} is not registered")]
    NotFound(ObjectId),

    /// An object with this identifier is already registered
    #[error("object {0} is already registered")]
    DuplicateObject(ObjectId),

    /// The scene could not describe or move the object's body
    #[error("scene has no body for object {0}")]
    BodyUnavailable(ObjectId),
}
