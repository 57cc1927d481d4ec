//! Debug drawing primitives and system
//!
//! Based on Game Engine Architecture 3rd Edition, Section 10.2:
//! "Debug drawing facilities allow programmers to render simple shapes like
//! lines, points, spheres and boxes for debugging and visualization purposes."
//!
//! Nothing here renders. Shapes are plain data for whatever front end wants
//! to draw them.

use std::collections::BTreeMap;

use crate::foundation::math::{Vec3, Vec4};
use crate::physics::FootprintRect;

/// Unique identifier for persistent debug shapes
pub type DebugShapeId = String;

/// Debug shape primitives that can be rendered for visualization
#[derive(Clone, Debug, PartialEq)]
pub enum DebugShape {
    /// Line segment from start to end
    Line {
        start: Vec3,
        end: Vec3,
        color: Vec4,
        duration: f32,
    },

    /// Wireframe box given by its eight corners (OBB vertex order)
    Box {
        corners: [Vec3; 8],
        color: Vec4,
        duration: f32,
    },

    /// Ground-plane rectangle drawn at height `y`
    Rect {
        rect: FootprintRect,
        y: f32,
        color: Vec4,
        duration: f32,
    },

    /// Point at position
    Point {
        position: Vec3,
        color: Vec4,
        size: f32,
        duration: f32,
    },
}

impl DebugShape {
    /// Get remaining duration
    pub fn duration(&self) -> f32 {
        match self {
            Self::Line { duration, .. }
            | Self::Box { duration, .. }
            | Self::Rect { duration, .. }
            | Self::Point { duration, .. } => *duration,
        }
    }

    /// Color of the shape
    pub fn color(&self) -> Vec4 {
        match self {
            Self::Line { color, .. }
            | Self::Box { color, .. }
            | Self::Rect { color, .. }
            | Self::Point { color, .. } => *color,
        }
    }

    /// Decrease duration by delta_time, returns true if expired
    pub fn tick(&mut self, delta_time: f32) -> bool {
        let duration = match self {
            Self::Line { duration, .. }
            | Self::Box { duration, .. }
            | Self::Rect { duration, .. }
            | Self::Point { duration, .. } => duration,
        };
        *duration -= delta_time;
        *duration <= 0.0
    }

    /// The twelve edges of a box, as corner index pairs.
    ///
    /// Corner `i` has bit `k` set when it lies on the positive side of
    /// axis `k`, so edges join corners differing in exactly one bit.
    pub fn box_edges() -> [(usize, usize); 12] {
        [
            (0, 1), (2, 3), (4, 5), (6, 7),
            (0, 2), (1, 3), (4, 6), (5, 7),
            (0, 4), (1, 5), (2, 6), (3, 7),
        ]
    }
}

/// Debug drawing system for rendering debug shapes
///
/// GEA 10.2: "Debug rendering systems typically support both temporary shapes
/// (which expire after a certain time) and persistent shapes (which remain
/// until explicitly removed)."
#[derive(Debug, Clone)]
pub struct DebugDrawSystem {
    temporary_shapes: Vec<DebugShape>,
    // Ordered so shape lists are stable between frames
    persistent_shapes: BTreeMap<DebugShapeId, DebugShape>,

    /// Master enable/disable flag
    pub enabled: bool,
}

impl DebugDrawSystem {
    /// Create a new debug draw system
    pub fn new() -> Self {
        Self {
            temporary_shapes: Vec::new(),
            persistent_shapes: BTreeMap::new(),
            enabled: true,
        }
    }

    /// Draw a line segment (temporary)
    pub fn draw_line(&mut self, start: Vec3, end: Vec3, color: Vec4, duration: f32) {
        self.draw_temporary(DebugShape::Line { start, end, color, duration });
    }

    /// Draw a point (temporary)
    pub fn draw_point(&mut self, position: Vec3, color: Vec4, size: f32, duration: f32) {
        self.draw_temporary(DebugShape::Point { position, color, size, duration });
    }

    /// Queue any shape as temporary
    pub fn draw_temporary(&mut self, shape: DebugShape) {
        if !self.enabled {
            return;
        }

        self.temporary_shapes.push(shape);
    }

    /// Draw a persistent shape that remains until explicitly removed.
    ///
    /// Stored even while disabled so the latest state shows on re-enable.
    pub fn draw_persistent(&mut self, id: impl Into<DebugShapeId>, shape: DebugShape) {
        self.persistent_shapes.insert(id.into(), shape);
    }

    /// Persistent shape by id
    pub fn persistent(&self, id: &str) -> Option<&DebugShape> {
        self.persistent_shapes.get(id)
    }

    /// Remove a persistent shape
    pub fn clear_persistent(&mut self, id: &str) {
        self.persistent_shapes.remove(id);
    }

    /// Drop every temporary shape regardless of remaining duration
    pub fn clear_temporary(&mut self) {
        self.temporary_shapes.clear();
    }

    /// Update shape lifetimes and remove expired temporary shapes
    pub fn update(&mut self, delta_time: f32) {
        if !self.enabled {
            return;
        }

        self.temporary_shapes.retain_mut(|shape| !shape.tick(delta_time));
    }

    /// All shapes for rendering (temporary first, then persistent by id)
    pub fn shapes(&self) -> impl Iterator<Item = &DebugShape> + '_ {
        let visible = self.enabled;
        self.temporary_shapes
            .iter()
            .chain(self.persistent_shapes.values())
            .filter(move |_| visible)
    }

    /// Number of temporary shapes
    pub fn temporary_count(&self) -> usize {
        self.temporary_shapes.len()
    }

    /// Number of active shapes
    pub fn shape_count(&self) -> usize {
        self.temporary_shapes.len() + self.persistent_shapes.len()
    }

    /// Clear all shapes (temporary and persistent)
    pub fn clear(&mut self) {
        self.temporary_shapes.clear();
        self.persistent_shapes.clear();
    }
}

impl Default for DebugDrawSystem {
    fn default() -> Self {
        Self::new()
    }
}
