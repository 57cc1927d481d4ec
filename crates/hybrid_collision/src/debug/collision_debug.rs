//! Collision-specific debug visualization
//!
//! Based on Game Engine Architecture 3rd Edition, Section 10.2:
//! "Debug drawing for collision detection typically includes visualizations
//! of bounding volumes, collision shapes, and query results."

use std::collections::{BTreeMap, HashSet};

use crate::debug::draw::{DebugDrawSystem, DebugShape};
use crate::debug::CollisionObserver;
use crate::foundation::math::Vec4;
use crate::physics::{
    CollisionRecord, CollisionStats, FootprintRect, ObjectId, OrientedBoundingBox, ShapeKind,
};

/// Color scheme for collision visualization
#[derive(Clone, Debug, PartialEq)]
pub struct CollisionDebugColors {
    /// OBB wireframe (not colliding)
    pub obb_default: Vec4,

    /// OBB wireframe (currently colliding)
    pub obb_colliding: Vec4,

    /// Ground-plane footprint
    pub footprint: Vec4,

    /// Contact point markers
    pub contact: Vec4,
}

impl Default for CollisionDebugColors {
    fn default() -> Self {
        Self {
            obb_default: Vec4::new(0.0, 1.0, 0.0, 0.6),    // Green
            obb_colliding: Vec4::new(1.0, 0.0, 0.0, 0.8),  // Red
            footprint: Vec4::new(0.5, 0.8, 1.0, 0.25),     // Light blue, transparent
            contact: Vec4::new(1.0, 1.0, 0.0, 1.0),        // Yellow
        }
    }
}

/// What the visualizer remembers about one tracked object
#[derive(Clone, Debug)]
struct TrackedShape {
    obb: OrientedBoundingBox,
    footprint: FootprintRect,
}

/// Collision debug visualizer
///
/// Observes a collision pipeline and keeps a [`DebugDrawSystem`] in sync
/// with it:
/// - OBB wireframes, red while colliding
/// - footprints drawn at the bottom of each box
/// - contact points of the last pass, as temporary points
pub struct CollisionDebugVisualizer {
    debug_draw: DebugDrawSystem,
    colors: CollisionDebugColors,
    tracked: BTreeMap<ObjectId, TrackedShape>,
    colliding: HashSet<ObjectId>,
    last_stats: CollisionStats,

    /// Show OBB wireframes
    pub show_obbs: bool,

    /// Show broad-phase footprints
    pub show_footprints: bool,

    /// Show contact points
    pub show_contacts: bool,
}

impl CollisionDebugVisualizer {
    /// Create a new collision debug visualizer
    pub fn new() -> Self {
        Self {
            debug_draw: DebugDrawSystem::new(),
            colors: CollisionDebugColors::default(),
            tracked: BTreeMap::new(),
            colliding: HashSet::new(),
            last_stats: CollisionStats::default(),
            show_obbs: true,
            show_footprints: true,
            show_contacts: true,
        }
    }

    /// Set custom color scheme
    pub fn with_colors(mut self, colors: CollisionDebugColors) -> Self {
        self.colors = colors;
        self
    }

    /// Whether the object was part of a collision in the last pass
    pub fn is_colliding(&self, id: &ObjectId) -> bool {
        self.colliding.contains(id)
    }

    /// Number of objects the visualizer is following
    pub fn tracked_count(&self) -> usize {
        self.tracked.len()
    }

    /// Counters reported with the last pass
    pub fn last_stats(&self) -> CollisionStats {
        self.last_stats
    }

    /// Rebuild every persistent shape, e.g. after flipping a toggle
    pub fn redraw(&mut self) {
        let ids: Vec<ObjectId> = self.tracked.keys().cloned().collect();
        for id in &ids {
            self.draw_object(id);
        }
    }

    /// Clear all visualization and forget tracked objects
    pub fn clear(&mut self) {
        self.debug_draw.clear();
        self.tracked.clear();
        self.colliding.clear();
    }

    /// Update debug system (expire temporary shapes)
    pub fn update(&mut self, delta_time: f32) {
        self.debug_draw.update(delta_time);
    }

    /// Get all debug shapes for rendering
    pub fn shapes(&self) -> impl Iterator<Item = &DebugShape> + '_ {
        self.debug_draw.shapes()
    }

    /// Enable/disable the entire debug system
    pub fn set_enabled(&mut self, enabled: bool) {
        self.debug_draw.enabled = enabled;
    }

    /// Check if debug system is enabled
    pub fn is_enabled(&self) -> bool {
        self.debug_draw.enabled
    }

    /// Get reference to underlying debug draw system
    pub fn debug_draw(&self) -> &DebugDrawSystem {
        &self.debug_draw
    }

    fn obb_key(id: &ObjectId) -> String {
        format!("obb_{id}")
    }

    fn footprint_key(id: &ObjectId) -> String {
        format!("footprint_{id}")
    }

    fn draw_object(&mut self, id: &ObjectId) {
        let obb_key = Self::obb_key(id);
        let footprint_key = Self::footprint_key(id);

        let Some(shape) = self.tracked.get(id) else {
            self.debug_draw.clear_persistent(&obb_key);
            self.debug_draw.clear_persistent(&footprint_key);
            return;
        };

        if self.show_obbs {
            let color = if self.colliding.contains(id) {
                self.colors.obb_colliding
            } else {
                self.colors.obb_default
            };
            let obb = DebugShape::Box {
                corners: shape.obb.vertices(),
                color,
                duration: f32::INFINITY,
            };
            self.debug_draw.draw_persistent(obb_key, obb);
        } else {
            self.debug_draw.clear_persistent(&obb_key);
        }

        if self.show_footprints {
            let footprint = DebugShape::Rect {
                rect: shape.footprint,
                y: shape.obb.world_aabb().min.y,
                color: self.colors.footprint,
                duration: f32::INFINITY,
            };
            self.debug_draw.draw_persistent(footprint_key, footprint);
        } else {
            self.debug_draw.clear_persistent(&footprint_key);
        }
    }
}

impl CollisionObserver for CollisionDebugVisualizer {
    fn object_added(
        &mut self,
        id: &ObjectId,
        _kind: ShapeKind,
        obb: &OrientedBoundingBox,
        footprint: &FootprintRect,
    ) {
        self.tracked.insert(id.clone(), TrackedShape { obb: *obb, footprint: *footprint });
        self.draw_object(id);
    }

    fn object_removed(&mut self, id: &ObjectId) {
        self.tracked.remove(id);
        self.colliding.remove(id);
        self.draw_object(id);
    }

    fn object_refreshed(&mut self, id: &ObjectId, obb: &OrientedBoundingBox, footprint: &FootprintRect) {
        if let Some(shape) = self.tracked.get_mut(id) {
            shape.obb = *obb;
            shape.footprint = *footprint;
            self.draw_object(id);
        }
    }

    fn collisions_detected(&mut self, records: &[CollisionRecord], stats: &CollisionStats) {
        let previous = std::mem::take(&mut self.colliding);
        for record in records {
            self.colliding.insert(record.object_a.clone());
            self.colliding.insert(record.object_b.clone());
        }

        // Only recolor objects whose state flipped
        let changed: Vec<ObjectId> = previous
            .symmetric_difference(&self.colliding)
            .cloned()
            .collect();
        for id in &changed {
            self.draw_object(id);
        }

        self.debug_draw.clear_temporary();
        if self.show_contacts {
            for record in records {
                self.debug_draw.draw_point(record.contact_point, self.colors.contact, 6.0, f32::INFINITY);
            }
        }

        self.last_stats = *stats;
    }
}

impl Default for CollisionDebugVisualizer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec3;

    fn unit_box(x: f32) -> OrientedBoundingBox {
        OrientedBoundingBox::axis_aligned(Vec3::new(x, 0.0, 0.0), Vec3::new(1.0, 1.0, 1.0))
    }

    fn add(viz: &mut CollisionDebugVisualizer, name: &str, x: f32) {
        let obb = unit_box(x);
        viz.object_added(&name.into(), ShapeKind::Box, &obb, &obb.footprint());
    }

    fn record() -> CollisionRecord {
        CollisionRecord {
            object_a: "a".into(),
            object_b: "b".into(),
            penetration_depth: 0.5,
            normal: Vec3::x(),
            contact_point: Vec3::new(0.75, 0.0, 0.0),
        }
    }

    #[test]
    fn test_added_object_gets_box_and_footprint() {
        let mut viz = CollisionDebugVisualizer::new();
        add(&mut viz, "a", 0.0);

        assert_eq!(viz.shapes().count(), 2);
        let footprint = viz.debug_draw().persistent("footprint_a").unwrap();
        assert!(matches!(footprint, DebugShape::Rect { y, .. } if *y == -1.0));

        viz.object_removed(&"a".into());
        assert_eq!(viz.shapes().count(), 0);
        assert_eq!(viz.tracked_count(), 0);
    }

    #[test]
    fn test_colliding_objects_turn_red() {
        let mut viz = CollisionDebugVisualizer::new();
        add(&mut viz, "a", 0.0);
        add(&mut viz, "b", 1.5);
        let stats = CollisionStats { object_count: 2, rough_collision_count: 1, precise_collision_count: 1 };

        viz.collisions_detected(&[record()], &stats);
        assert!(viz.is_colliding(&"a".into()));
        let colors = CollisionDebugColors::default();
        assert_eq!(viz.debug_draw().persistent("obb_b").unwrap().color(), colors.obb_colliding);
        assert_eq!(viz.debug_draw().temporary_count(), 1);
        assert_eq!(viz.last_stats(), stats);

        viz.collisions_detected(&[], &CollisionStats::default());
        assert!(!viz.is_colliding(&"a".into()));
        assert_eq!(viz.debug_draw().persistent("obb_b").unwrap().color(), colors.obb_default);
        assert_eq!(viz.debug_draw().temporary_count(), 0);
    }

    #[test]
    fn test_toggles() {
        let mut viz = CollisionDebugVisualizer::new();
        viz.show_footprints = false;
        viz.show_contacts = false;
        add(&mut viz, "a", 0.0);
        add(&mut viz, "b", 1.5);
        viz.collisions_detected(&[record()], &CollisionStats::default());

        assert_eq!(viz.shapes().count(), 2);

        viz.show_obbs = false;
        viz.redraw();
        assert_eq!(viz.shapes().count(), 0);
    }

    #[test]
    fn test_refresh_moves_wireframe() {
        let mut viz = CollisionDebugVisualizer::new();
        add(&mut viz, "a", 0.0);

        let moved = unit_box(10.0);
        viz.object_refreshed(&"a".into(), &moved, &moved.footprint());

        match viz.debug_draw().persistent("obb_a") {
            Some(DebugShape::Box { corners, .. }) => assert_eq!(corners[0], Vec3::new(9.0, -1.0, -1.0)),
            other => panic!("expected box, got {other:?}"),
        }
    }

    #[test]
    fn test_reenabled_visualizer_shows_latest_position() {
        let mut viz = CollisionDebugVisualizer::new();
        add(&mut viz, "a", 0.0);

        viz.set_enabled(false);
        let moved = unit_box(4.0);
        viz.object_refreshed(&"a".into(), &moved, &moved.footprint());
        assert_eq!(viz.shapes().count(), 0);

        viz.set_enabled(true);
        assert_eq!(viz.shapes().count(), 2);
        match viz.debug_draw().persistent("obb_a") {
            Some(DebugShape::Box { corners, .. }) => assert_eq!(corners[0], Vec3::new(3.0, -1.0, -1.0)),
            other => panic!("expected box, got {other:?}"),
        }
        match viz.debug_draw().persistent("footprint_a") {
            Some(DebugShape::Rect { rect, .. }) => assert_eq!(*rect, moved.footprint()),
            other => panic!("expected rect, got {other:?}"),
        }
    }
}
