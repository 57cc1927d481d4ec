//! Debug module for visualization and debugging tools
//!
//! Based on Game Engine Architecture 3rd Edition, Chapter 10.2:
//! "Debug Drawing Facilities"
//!
//! The collision pipeline never draws anything itself. It reports state
//! changes to an optional [`CollisionObserver`], and the visualizer in this
//! module is one such observer.

pub mod draw;
pub mod collision_debug;

use std::cell::RefCell;
use std::rc::Rc;

use crate::physics::{
    CollisionRecord, CollisionStats, FootprintRect, ObjectId, OrientedBoundingBox, ShapeKind,
};

pub use draw::{DebugShape, DebugDrawSystem, DebugShapeId};
pub use collision_debug::{CollisionDebugColors, CollisionDebugVisualizer};

/// Hooks the collision pipeline calls as its state changes.
///
/// Every hook defaults to doing nothing.
pub trait CollisionObserver {
    /// An object was registered
    fn object_added(
        &mut self,
        _id: &ObjectId,
        _kind: ShapeKind,
        _obb: &OrientedBoundingBox,
        _footprint: &FootprintRect,
    ) {
    }

    /// An object was deregistered
    fn object_removed(&mut self, _id: &ObjectId) {}

    /// An object's box and footprint were re-read from the scene
    fn object_refreshed(&mut self, _id: &ObjectId, _obb: &OrientedBoundingBox, _footprint: &FootprintRect) {}

    /// A full collision pass finished
    fn collisions_detected(&mut self, _records: &[CollisionRecord], _stats: &CollisionStats) {}
}

/// Shared observers, so the caller keeps a handle to read back from
impl<T: CollisionObserver + ?Sized> CollisionObserver for Rc<RefCell<T>> {
    fn object_added(
        &mut self,
        id: &ObjectId,
        kind: ShapeKind,
        obb: &OrientedBoundingBox,
        footprint: &FootprintRect,
    ) {
        self.borrow_mut().object_added(id, kind, obb, footprint);
    }

    fn object_removed(&mut self, id: &ObjectId) {
        self.borrow_mut().object_removed(id);
    }

    fn object_refreshed(&mut self, id: &ObjectId, obb: &OrientedBoundingBox, footprint: &FootprintRect) {
        self.borrow_mut().object_refreshed(id, obb, footprint);
    }

    fn collisions_detected(&mut self, records: &[CollisionRecord], stats: &CollisionStats) {
        self.borrow_mut().collisions_detected(records, stats);
    }
}
