//! Oriented bounding boxes and the separating-axis test
//!
//! An [`OrientedBoundingBox`] is the narrow-phase shape for every tracked
//! object. Intersection uses the separating axis theorem over the 15 candidate
//! axes of a box pair: three face normals per box plus the nine pairwise edge
//! cross products. Two boxes are disjoint iff one of those axes separates
//! their projections.

use crate::config::ContactEstimate;
use crate::foundation::math::{rotation_of, scale_of, Mat3, Mat4, Point3, Vec3};
use super::footprint::FootprintRect;
use super::primitives::{Aabb, Ray};

/// Default squared-length cutoff for candidate axes
pub const AXIS_EPSILON: f32 = 1e-6;

/// Default threshold below which a ray counts as parallel to a slab
pub const PARALLEL_EPSILON: f32 = 1e-6;

/// Narrow-phase result for an intersecting pair
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SatContact {
    /// Smallest positive overlap over all candidate axes (never negative)
    pub penetration_depth: f32,
    /// Unit axis of that overlap, pointing from the first box toward the second
    pub normal: Vec3,
    /// Approximate contact point, see [`ContactEstimate`]
    pub contact_point: Vec3,
}

/// Ray hit against a single box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObbRayHit {
    /// Distance along the (normalized) ray; zero when the origin is inside
    pub distance: f32,
    /// World-space hit point
    pub point: Vec3,
    /// Outward face normal at the entry point, or the reversed ray direction
    /// when the origin is inside the box
    pub normal: Vec3,
}

/// A box with arbitrary rotation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrientedBoundingBox {
    /// World-space center
    pub center: Vec3,
    /// Non-negative half sizes along the box's local axes
    pub half_extents: Vec3,
    /// Orthonormal rotation; its columns are the local axes in world space
    pub orientation: Mat3,
}

impl OrientedBoundingBox {
    /// Create a box. Extents are made non-negative (non-finite ones become
    /// zero) and the orientation is re-orthonormalized.
    pub fn new(center: Vec3, half_extents: Vec3, orientation: Mat3) -> Self {
        Self {
            center,
            half_extents: half_extents.map(sanitize_extent),
            orientation: crate::foundation::math::orthonormalize([
                orientation.column(0).into_owned(),
                orientation.column(1).into_owned(),
                orientation.column(2).into_owned(),
            ]),
        }
    }

    /// Axis-aligned box
    pub fn axis_aligned(center: Vec3, half_extents: Vec3) -> Self {
        Self::new(center, half_extents, Mat3::identity())
    }

    /// Build a box from local bounds and an object's world matrix.
    ///
    /// The world center is the transformed local center, the rotation is the
    /// scale-free part of the matrix, and the half extents are multiplied by
    /// the matrix's per-axis scale factors.
    pub fn from_world_transform(local_center: Vec3, local_half_extents: Vec3, world: &Mat4) -> Self {
        let mut obb = Self::axis_aligned(Vec3::zeros(), Vec3::zeros());
        obb.update_from_world_transform(local_center, local_half_extents, world);
        obb
    }

    /// In-place variant of [`Self::from_world_transform`], used by the per-frame refresh
    pub fn update_from_world_transform(
        &mut self,
        local_center: Vec3,
        local_half_extents: Vec3,
        world: &Mat4,
    ) {
        self.center = world.transform_point(&Point3::from(local_center)).coords;
        self.half_extents = local_half_extents
            .map(sanitize_extent)
            .component_mul(&scale_of(world))
            .map(sanitize_extent);
        self.orientation = rotation_of(world);
    }

    /// The three local axes in world space
    pub fn axes(&self) -> [Vec3; 3] {
        [
            self.orientation * Vec3::x(),
            self.orientation * Vec3::y(),
            self.orientation * Vec3::z(),
        ]
    }

    /// The eight corners; bit `i` of the index picks the sign along axis `i`
    pub fn vertices(&self) -> [Vec3; 8] {
        let axes = self.axes();
        let mut corners = [self.center; 8];
        for (index, corner) in corners.iter_mut().enumerate() {
            for (bit, axis) in axes.iter().enumerate() {
                let sign = if index & (1 << bit) == 0 { -1.0 } else { 1.0 };
                *corner += axis * (sign * self.half_extents[bit]);
            }
        }
        corners
    }

    /// Half width of the box's shadow on `axis` (which should be unit length)
    pub fn projected_radius(&self, axis: &Vec3) -> f32 {
        self.axes()
            .iter()
            .zip(self.half_extents.iter())
            .map(|(local, half)| axis.dot(local).abs() * half)
            .sum()
    }

    /// Interval `[min, max]` covered by the box on `axis`
    pub fn project(&self, axis: &Vec3) -> (f32, f32) {
        let center = self.center.dot(axis);
        let radius = self.projected_radius(axis);
        (center - radius, center + radius)
    }

    /// Tight world-space AABB around the box
    pub fn world_aabb(&self) -> Aabb {
        let extents = Vec3::new(
            self.projected_radius(&Vec3::x()),
            self.projected_radius(&Vec3::y()),
            self.projected_radius(&Vec3::z()),
        );
        Aabb::from_center_extents(self.center, extents)
    }

    /// Ground-plane footprint for the broad phase
    pub fn footprint(&self) -> FootprintRect {
        FootprintRect::from_aabb(&self.world_aabb())
    }

    /// Whether every extent is zero
    pub fn is_degenerate(&self) -> bool {
        self.half_extents == Vec3::zeros()
    }

    /// SAT test with the default epsilon and contact estimate
    pub fn intersects(&self, other: &OrientedBoundingBox) -> Option<SatContact> {
        self.intersects_with(other, AXIS_EPSILON, ContactEstimate::default())
    }

    /// Separating-axis test.
    ///
    /// Returns `None` as soon as one candidate axis separates the boxes
    /// (overlap `<= 0`). Otherwise the axis with the smallest overlap becomes
    /// the contact normal and that overlap the penetration depth. This is the
    /// usual cheap SAT resolution heuristic, not an exact minimum translation
    /// vector for edge contacts.
    pub fn intersects_with(
        &self,
        other: &OrientedBoundingBox,
        axis_epsilon: f32,
        estimate: ContactEstimate,
    ) -> Option<SatContact> {
        let own = self.axes();
        let theirs = other.axes();

        let mut candidates = [Vec3::zeros(); 15];
        candidates[..3].copy_from_slice(&own);
        candidates[3..6].copy_from_slice(&theirs);
        for (i, a) in own.iter().enumerate() {
            for (j, b) in theirs.iter().enumerate() {
                candidates[6 + i * 3 + j] = a.cross(b);
            }
        }

        // (depth, unit axis, overlap interval on that axis)
        let mut best: Option<(f32, Vec3, f32, f32)> = None;

        for candidate in &candidates {
            let length_squared = candidate.magnitude_squared();
            // Parallel edges give (near) zero cross products
            if length_squared <= axis_epsilon {
                continue;
            }
            let axis = candidate / length_squared.sqrt();

            let (min_a, max_a) = self.project(&axis);
            let (min_b, max_b) = other.project(&axis);
            let low = min_a.max(min_b);
            let high = max_a.min(max_b);
            let overlap = high - low;

            if overlap <= 0.0 {
                return None;
            }
            if best.map_or(true, |(depth, ..)| overlap < depth) {
                best = Some((overlap, axis, low, high));
            }
        }

        let (penetration_depth, axis, low, high) = best?;

        let between = other.center - self.center;
        let normal = if axis.dot(&between) < 0.0 { -axis } else { axis };

        let midpoint = (self.center + other.center) * 0.5;
        let contact_point = match estimate {
            ContactEstimate::CenterAverage => midpoint,
            ContactEstimate::OverlapMidpoint => {
                midpoint + axis * ((low + high) * 0.5 - midpoint.dot(&axis))
            }
        };

        Some(SatContact {
            penetration_depth,
            normal,
            contact_point,
        })
    }

    /// Whether a world point lies inside or on the box
    pub fn contains_point(&self, point: &Vec3) -> bool {
        let offset = point - self.center;
        self.axes()
            .iter()
            .zip(self.half_extents.iter())
            .all(|(axis, half)| offset.dot(axis).abs() <= *half)
    }

    /// Slab test with the default parallel threshold
    pub fn intersects_ray(&self, ray: &Ray) -> Option<ObbRayHit> {
        self.intersects_ray_with(ray, PARALLEL_EPSILON)
    }

    /// Slab test in the box's local axes.
    ///
    /// Each axis clips the ray to an entry/exit interval; the three intervals
    /// are intersected. A ray parallel to a slab either starts outside it (no
    /// hit) or is unconstrained by it. The nearest non-negative distance is
    /// reported, so a ray starting inside hits at distance zero.
    pub fn intersects_ray_with(&self, ray: &Ray, parallel_epsilon: f32) -> Option<ObbRayHit> {
        if ray.is_degenerate() {
            return None;
        }

        let to_center = self.center - ray.origin;
        let mut t_enter = f32::NEG_INFINITY;
        let mut t_exit = f32::INFINITY;
        let mut entry_normal = None;

        for (axis, half) in self.axes().iter().zip(self.half_extents.iter()) {
            let offset = axis.dot(&to_center);
            let slope = axis.dot(&ray.direction);

            if slope.abs() > parallel_epsilon {
                let mut near = (offset - half) / slope;
                let mut far = (offset + half) / slope;
                if near > far {
                    std::mem::swap(&mut near, &mut far);
                }
                if near > t_enter {
                    t_enter = near;
                    entry_normal = Some(axis * -slope.signum());
                }
                t_exit = t_exit.min(far);

                if t_enter > t_exit || t_exit < 0.0 {
                    return None;
                }
            } else if offset.abs() > *half {
                return None;
            }
        }

        let (distance, normal) = if t_enter >= 0.0 {
            (t_enter, entry_normal.unwrap_or(-ray.direction))
        } else {
            (0.0, -ray.direction)
        };

        Some(ObbRayHit {
            distance,
            point: ray.point_at(distance),
            normal,
        })
    }
}

fn sanitize_extent(value: f32) -> f32 {
    if value.is_finite() { value.abs() } else { 0.0 }
}
