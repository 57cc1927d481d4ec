//! Positional collision response
//!
//! Based on Game Engine Architecture 3rd Edition, Section 13.4.7:
//! "The simplest approach is to push the interpenetrating objects apart
//! along the contact normal."
//!
//! No velocities, restitution or angular terms: each body is translated
//! along the contact normal by a share of the penetration depth that is
//! inversely proportional to its mass.

use log::trace;

use crate::config::CollisionConfig;
use crate::foundation::math::Vec3;
use crate::physics::body::BodySourceMut;
use crate::physics::collision_system::{CollisionPipeline, CollisionRecord};
use crate::physics::CollisionError;

/// Translations applied to the two bodies of a record
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Separation {
    /// Offset for `object_a` (opposite the normal)
    pub offset_a: Vec3,
    /// Offset for `object_b` (along the normal)
    pub offset_b: Vec3,
}

impl Separation {
    /// No movement
    pub fn none() -> Self {
        Self {
            offset_a: Vec3::zeros(),
            offset_b: Vec3::zeros(),
        }
    }
}

/// Mass-weighted push-apart resolver
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionResolver {
    default_mass: f32,
    default_strength: f32,
}

impl CollisionResolver {
    /// Resolver using the configured fallback mass and strength
    pub fn new(config: &CollisionConfig) -> Self {
        Self {
            default_mass: sanitize_mass(config.default_mass, 1.0),
            default_strength: config.separation_strength.clamp(0.0, 1.0),
        }
    }

    /// Configured strength, used by [`Self::resolve_all`]
    pub fn default_strength(&self) -> f32 {
        self.default_strength
    }

    /// Offsets that remove `strength` of the penetration depth.
    ///
    /// Masses that are not positive and finite fall back to the default
    /// mass. With equal masses each body moves half the correction.
    pub fn separation(
        &self,
        record: &CollisionRecord,
        strength: f32,
        mass_a: Option<f32>,
        mass_b: Option<f32>,
    ) -> Separation {
        let strength = if strength.is_nan() { 0.0 } else { strength.clamp(0.0, 1.0) };
        let correction = record.penetration_depth.max(0.0) * strength;
        if correction == 0.0 {
            return Separation::none();
        }

        let mass_a = mass_a.map_or(self.default_mass, |m| sanitize_mass(m, self.default_mass));
        let mass_b = mass_b.map_or(self.default_mass, |m| sanitize_mass(m, self.default_mass));
        let total = mass_a + mass_b;

        // Heavier body moves less
        let ratio_a = mass_b / total;
        let ratio_b = mass_a / total;

        Separation {
            offset_a: -record.normal * (correction * ratio_a),
            offset_b: record.normal * (correction * ratio_b),
        }
    }

    /// Translate both bodies of a record apart and refresh their boxes so
    /// later queries in the same frame see the new positions.
    ///
    /// On failure the scene and the pipeline are left as they were: both
    /// bodies are checked before anything moves, and if the scene refuses
    /// the second translation the first one is undone.
    pub fn resolve_collision<H, S>(
        &self,
        pipeline: &mut CollisionPipeline<H>,
        scene: &mut S,
        record: &CollisionRecord,
        strength: f32,
    ) -> Result<Separation, CollisionError>
    where
        H: Copy,
        S: BodySourceMut<H> + ?Sized,
    {
        let handle_a = pipeline.handle(&record.object_a)?;
        let handle_b = pipeline.handle(&record.object_b)?;
        for (id, handle) in [(&record.object_a, handle_a), (&record.object_b, handle_b)] {
            if scene.body_geometry(handle).is_none() {
                return Err(CollisionError::BodyUnavailable(id.clone()));
            }
        }

        let separation = self.separation(record, strength, scene.mass(handle_a), scene.mass(handle_b));
        if separation == Separation::none() {
            return Ok(separation);
        }

        if !scene.translate(handle_a, separation.offset_a) {
            return Err(CollisionError::BodyUnavailable(record.object_a.clone()));
        }
        if !scene.translate(handle_b, separation.offset_b) {
            scene.translate(handle_a, -separation.offset_a);
            return Err(CollisionError::BodyUnavailable(record.object_b.clone()));
        }

        pipeline.refresh_object(scene, &record.object_a)?;
        pipeline.refresh_object(scene, &record.object_b)?;

        trace!(
            "Separated {} and {} by {:.4}",
            record.object_a,
            record.object_b,
            record.penetration_depth * strength.clamp(0.0, 1.0),
        );
        Ok(separation)
    }

    /// Resolve every record at the configured strength, in order.
    ///
    /// Stops at the first failure.
    pub fn resolve_all<H, S>(
        &self,
        pipeline: &mut CollisionPipeline<H>,
        scene: &mut S,
        records: &[CollisionRecord],
    ) -> Result<Vec<Separation>, CollisionError>
    where
        H: Copy,
        S: BodySourceMut<H> + ?Sized,
    {
        records
            .iter()
            .map(|record| self.resolve_collision(pipeline, scene, record, self.default_strength))
            .collect()
    }
}

impl Default for CollisionResolver {
    fn default() -> Self {
        Self::new(&CollisionConfig::default())
    }
}

fn sanitize_mass(mass: f32, fallback: f32) -> f32 {
    if mass.is_finite() && mass > 0.0 {
        mass
    } else {
        fallback
    }
}
