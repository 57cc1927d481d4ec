//! # Hybrid Collision
//!
//! Per-frame collision detection for interactive 3D scenes of boxes,
//! cylinders and prisms.
//!
//! ## Features
//!
//! - **Footprint broad phase**: ground-plane rectangles, brute-force O(n²)
//! - **OBB narrow phase**: 15-axis separating-axis test with penetration
//!   depth, contact normal and an approximate contact point
//! - **Queries**: raycast, point containment, single-pair tests
//! - **Resolution**: mass-weighted positional push-apart
//! - **Debug hooks**: optional observer plus a ready-made visualizer
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use hybrid_collision::prelude::*;
//!
//! struct Scene {
//!     bodies: Vec<Transform>,
//! }
//!
//! impl BodySource<usize> for Scene {
//!     fn body_geometry(&self, handle: usize) -> Option<BodyGeometry> {
//!         let transform = self.bodies.get(handle)?;
//!         Some(BodyGeometry::centered(Vec3::new(1.0, 1.0, 1.0), transform.to_matrix()))
//!     }
//! }
//!
//! fn main() -> Result<(), CollisionError> {
//!     let scene = Scene {
//!         bodies: vec![
//!             Transform::from_position(Vec3::zeros()),
//!             Transform::from_position(Vec3::new(1.5, 0.0, 0.0)),
//!         ],
//!     };
//!
//!     let mut pipeline = CollisionPipeline::new(CollisionConfig::default());
//!     pipeline.add_object(&scene, "left", 0, ShapeKind::Box)?;
//!     pipeline.add_object(&scene, "right", 1, ShapeKind::Box)?;
//!
//!     for record in pipeline.check_collisions(&scene) {
//!         println!("{} hits {} ({})", record.object_a, record.object_b, record.penetration_depth);
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod foundation;
pub mod config;
pub mod physics;
pub mod debug;

/// Common imports for collision users
pub mod prelude {
    pub use crate::{
        config::{CollisionConfig, Config, ConfigError, ContactEstimate},
        debug::{CollisionDebugVisualizer, CollisionObserver},
        foundation::math::{Mat3, Mat4, Quat, Transform, Vec3},
        physics::{
            BodyGeometry, BodySource, BodySourceMut, CollisionError, CollisionLayers,
            CollisionPipeline, CollisionRecord, CollisionResolver, CollisionStats, ObjectId,
            OrientedBoundingBox, Ray, RayHit, Separation, ShapeKind,
        },
    };
}
