//! Minimal scene of moving solids for the collision demo
//!
//! Objects own their transform and shape; the collision pipeline only ever
//! sees them through [`BodySource`] / [`BodySourceMut`].

use hybrid_collision::foundation::collections::{new_key_type, DenseSlotMap};
use hybrid_collision::foundation::math::{constants, Quat, Transform, Vec3};
use hybrid_collision::physics::{BodyGeometry, BodySource, BodySourceMut, ShapeKind};

new_key_type! {
    /// Handle of a scene object
    pub struct ObjectKey;
}

/// Solid shapes the demo can spawn
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    /// Box with full dimensions
    Box { width: f32, height: f32, depth: f32 },
    /// Upright cylinder, approximated by a ring of vertices
    Cylinder { radius: f32, height: f32, segments: u32 },
    /// Upright regular prism
    Prism { radius: f32, height: f32, sides: u32 },
}

impl Shape {
    /// Collision kind for the shape
    pub fn kind(&self) -> ShapeKind {
        match self {
            Self::Box { .. } => ShapeKind::Box,
            Self::Cylinder { .. } => ShapeKind::Cylinder,
            Self::Prism { .. } => ShapeKind::Prism,
        }
    }

    /// Model-space vertices, centered on the origin
    pub fn vertices(&self) -> Vec<Vec3> {
        match *self {
            Self::Box { width, height, depth } => {
                let half = Vec3::new(width, height, depth) * 0.5;
                (0..8)
                    .map(|i| {
                        Vec3::new(
                            if i & 1 == 0 { -half.x } else { half.x },
                            if i & 2 == 0 { -half.y } else { half.y },
                            if i & 4 == 0 { -half.z } else { half.z },
                        )
                    })
                    .collect()
            }
            Self::Cylinder { radius, height, segments } => ring(radius, height, segments.max(8)),
            Self::Prism { radius, height, sides } => ring(radius, height, sides.max(3)),
        }
    }

    /// Local bounding box as (center, half extents)
    pub fn local_bounds(&self) -> (Vec3, Vec3) {
        let vertices = self.vertices();
        let Some(first) = vertices.first() else {
            return (Vec3::zeros(), Vec3::zeros());
        };

        let (min, max) = vertices
            .iter()
            .fold((*first, *first), |(min, max), v| (min.inf(v), max.sup(v)));
        ((min + max) * 0.5, (max - min) * 0.5)
    }
}

/// Top and bottom rings of an upright n-gon
fn ring(radius: f32, height: f32, sides: u32) -> Vec<Vec3> {
    let half_height = height * 0.5;
    let step = 2.0 * constants::PI / sides as f32;

    (0..sides)
        .flat_map(|i| {
            let angle = step * i as f32;
            let (sin, cos) = angle.sin_cos();
            [
                Vec3::new(radius * cos, -half_height, radius * sin),
                Vec3::new(radius * cos, half_height, radius * sin),
            ]
        })
        .collect()
}

/// One moving solid
#[derive(Debug, Clone)]
pub struct SceneObject {
    /// Display name, also used as the collision id
    pub name: String,
    /// World transform
    pub transform: Transform,
    /// Geometry
    pub shape: Shape,
    /// Linear velocity (units per second)
    pub velocity: Vec3,
    /// Spin about the vertical axis (radians per second)
    pub spin: f32,
    /// Mass for the resolver
    pub mass: f32,
}

/// Objects plus a square arena they bounce around in
pub struct Scene {
    objects: DenseSlotMap<ObjectKey, SceneObject>,
    /// Half size of the arena on X and Z
    pub arena_half_size: f32,
}

impl Scene {
    /// Empty arena
    pub fn new(arena_half_size: f32) -> Self {
        Self {
            objects: DenseSlotMap::with_key(),
            arena_half_size,
        }
    }

    /// Add an object
    pub fn spawn(&mut self, object: SceneObject) -> ObjectKey {
        self.objects.insert(object)
    }

    /// Look up an object
    pub fn get(&self, key: ObjectKey) -> Option<&SceneObject> {
        self.objects.get(key)
    }

    /// Advance every object and bounce off the arena walls
    pub fn integrate(&mut self, delta_time: f32) {
        let limit = self.arena_half_size;

        for object in self.objects.values_mut() {
            object.transform.position += object.velocity * delta_time;
            object.transform.rotation =
                Quat::from_axis_angle(&Vec3::y_axis(), object.spin * delta_time) * object.transform.rotation;

            for axis in [0, 2] {
                let position = object.transform.position[axis];
                if position.abs() > limit {
                    object.transform.position[axis] = position.clamp(-limit, limit);
                    object.velocity[axis] = -object.velocity[axis];
                }
            }
        }
    }

    /// Elastic exchange of velocity along a contact normal (pointing from
    /// `a` toward `b`). Pairs already moving apart are left alone.
    pub fn bounce(&mut self, a: ObjectKey, b: ObjectKey, normal: Vec3) {
        let (Some(first), Some(second)) = (self.objects.get(a), self.objects.get(b)) else {
            return;
        };

        let approach = (second.velocity - first.velocity).dot(&normal);
        if approach >= 0.0 {
            return;
        }

        let inverse_a = 1.0 / first.mass;
        let inverse_b = 1.0 / second.mass;
        let impulse = -2.0 * approach / (inverse_a + inverse_b);

        if let Some(first) = self.objects.get_mut(a) {
            first.velocity -= normal * (impulse * inverse_a);
        }
        if let Some(second) = self.objects.get_mut(b) {
            second.velocity += normal * (impulse * inverse_b);
        }
    }
}

impl BodySource<ObjectKey> for Scene {
    fn body_geometry(&self, handle: ObjectKey) -> Option<BodyGeometry> {
        let object = self.objects.get(handle)?;
        let (local_center, local_half_extents) = object.shape.local_bounds();

        Some(BodyGeometry {
            local_center,
            local_half_extents,
            world_matrix: object.transform.to_matrix(),
        })
    }

    fn mass(&self, handle: ObjectKey) -> Option<f32> {
        self.objects.get(handle).map(|object| object.mass)
    }
}

impl BodySourceMut<ObjectKey> for Scene {
    fn translate(&mut self, handle: ObjectKey, delta: Vec3) -> bool {
        match self.objects.get_mut(handle) {
            Some(object) => {
                object.transform.position += delta;
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_box_bounds() {
        let shape = Shape::Box { width: 2.0, height: 4.0, depth: 6.0 };
        let (center, half) = shape.local_bounds();
        assert_eq!(center, Vec3::zeros());
        assert_eq!(half, Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_triangular_prism_bounds() {
        let shape = Shape::Prism { radius: 1.0, height: 2.0, sides: 3 };
        let (center, half) = shape.local_bounds();

        // Vertices at 0, 120 and 240 degrees: x spans [-0.5, 1]
        assert!((center.x - 0.25).abs() < 1e-5);
        assert!((half.x - 0.75).abs() < 1e-5);
        assert!((half.y - 1.0).abs() < 1e-5);
        assert!(center.z.abs() < 1e-5);
    }

    #[test]
    fn test_bounce_swaps_equal_mass_velocities() {
        let mut scene = Scene::new(10.0);
        let object = |x: f32, vx: f32| SceneObject {
            name: format!("{x}"),
            transform: Transform::from_position(Vec3::new(x, 0.0, 0.0)),
            shape: Shape::Box { width: 1.0, height: 1.0, depth: 1.0 },
            velocity: Vec3::new(vx, 0.0, 0.0),
            spin: 0.0,
            mass: 1.0,
        };
        let a = scene.spawn(object(0.0, 1.0));
        let b = scene.spawn(object(0.9, -1.0));

        scene.bounce(a, b, Vec3::x());
        assert_eq!(scene.get(a).map(|o| o.velocity.x), Some(-1.0));
        assert_eq!(scene.get(b).map(|o| o.velocity.x), Some(1.0));

        // Already separating: untouched
        scene.bounce(a, b, Vec3::x());
        assert_eq!(scene.get(a).map(|o| o.velocity.x), Some(-1.0));
    }

    #[test]
    fn test_walls_reflect_velocity() {
        let mut scene = Scene::new(1.0);
        let key = scene.spawn(SceneObject {
            name: "runner".into(),
            transform: Transform::from_position(Vec3::new(0.9, 0.0, 0.0)),
            shape: Shape::Cylinder { radius: 0.5, height: 1.0, segments: 16 },
            velocity: Vec3::new(2.0, 0.0, 0.0),
            spin: 0.0,
            mass: 1.0,
        });

        scene.integrate(0.1);
        let object = scene.get(key).unwrap();
        assert_eq!(object.transform.position.x, 1.0);
        assert_eq!(object.velocity.x, -2.0);
    }
}
