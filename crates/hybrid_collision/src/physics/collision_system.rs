//! Hybrid collision pipeline
//!
//! Based on Game Engine Architecture 3rd Edition, Chapter 13:
//! "The collision detection system is typically split into two phases:
//! broad-phase and narrow-phase."
//!
//! Every call to [`CollisionPipeline::check_collisions`] runs, in order:
//! 1. refresh of every tracked OBB and footprint from the scene,
//! 2. the footprint broad phase,
//! 3. SAT on each surviving candidate pair.
//!
//! Contacts are rebuilt from scratch each call; nothing persists between
//! frames except the registration table.

use std::collections::HashMap;

use log::{debug, trace, warn};

use crate::config::CollisionConfig;
use crate::debug::CollisionObserver;
use crate::foundation::collections::{new_key_type, DenseSlotMap};
use crate::foundation::math::Vec3;
use crate::physics::body::{BodySource, BodySourceMut, ObjectId, ShapeKind};
use crate::physics::broad_phase::BroadPhaseIndex;
use crate::physics::collision::{FootprintRect, OrientedBoundingBox, Ray, RayHit, SatContact};
use crate::physics::collision_layers::CollisionLayers;
use crate::physics::resolver::{CollisionResolver, Separation};
use crate::physics::CollisionError;

new_key_type! {
    /// Arena key of a tracked object
    pub struct ColliderKey;
}

/// Collision state the pipeline owns for one registered object
#[derive(Debug, Clone)]
pub struct TrackedObject<H> {
    /// Caller-facing identifier
    pub id: ObjectId,
    /// Non-owning handle into the scene
    pub handle: H,
    /// Kind of solid behind the box
    pub kind: ShapeKind,
    /// Narrow-phase box, refreshed every pass. The matching footprint lives
    /// in the broad-phase index.
    pub obb: OrientedBoundingBox,
    /// Layer this object is on
    pub layer: CollisionLayers,
    /// Layers this object collides with
    pub mask: CollisionLayers,
    /// Set when the last refresh could not reach the scene body
    stale: bool,
}

impl<H> TrackedObject<H> {
    /// Whether the last refresh failed; stale objects are never tested
    pub fn is_stale(&self) -> bool {
        self.stale
    }
}

/// One confirmed collision from the narrow phase
#[derive(Debug, Clone, PartialEq)]
pub struct CollisionRecord {
    /// First object of the pair
    pub object_a: ObjectId,
    /// Second object of the pair
    pub object_b: ObjectId,
    /// SAT penetration depth (never negative)
    pub penetration_depth: f32,
    /// Unit separating axis pointing from `object_a` toward `object_b`
    pub normal: Vec3,
    /// Approximate contact point
    pub contact_point: Vec3,
}

impl CollisionRecord {
    fn from_contact(object_a: &ObjectId, object_b: &ObjectId, contact: SatContact) -> Self {
        Self {
            object_a: object_a.clone(),
            object_b: object_b.clone(),
            penetration_depth: contact.penetration_depth,
            normal: contact.normal,
            contact_point: contact.contact_point,
        }
    }

    /// Whether the record involves the given object
    pub fn involves(&self, id: &ObjectId) -> bool {
        &self.object_a == id || &self.object_b == id
    }
}

/// Counters from the most recent [`CollisionPipeline::check_collisions`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollisionStats {
    /// Registered objects
    pub object_count: usize,
    /// Broad-phase candidate pairs that passed layer filtering
    pub rough_collision_count: usize,
    /// Pairs confirmed by SAT
    pub precise_collision_count: usize,
}

/// Owns one OBB and one footprint per registered object and runs the
/// two-stage test over them.
///
/// `H` is the caller's handle type for scene bodies. The pipeline is
/// single-threaded and holds no locks.
pub struct CollisionPipeline<H> {
    config: CollisionConfig,
    objects: DenseSlotMap<ColliderKey, TrackedObject<H>>,
    keys: HashMap<ObjectId, ColliderKey>,
    broad_phase: BroadPhaseIndex<ColliderKey>,
    stats: CollisionStats,
    observer: Option<Box<dyn CollisionObserver>>,
}

impl<H: Copy> CollisionPipeline<H> {
    /// Create an empty pipeline
    pub fn new(config: CollisionConfig) -> Self {
        Self {
            config,
            objects: DenseSlotMap::with_key(),
            keys: HashMap::new(),
            broad_phase: BroadPhaseIndex::new(),
            stats: CollisionStats::default(),
            observer: None,
        }
    }

    /// Attach an observer that is notified of registrations, refreshes and
    /// collision passes
    pub fn with_observer(mut self, observer: Box<dyn CollisionObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Replace the observer, returning the previous one
    pub fn set_observer(
        &mut self,
        observer: Option<Box<dyn CollisionObserver>>,
    ) -> Option<Box<dyn CollisionObserver>> {
        std::mem::replace(&mut self.observer, observer)
    }

    /// Active configuration
    pub fn config(&self) -> &CollisionConfig {
        &self.config
    }

    /// Register an object on every layer
    pub fn add_object<S: BodySource<H> + ?Sized>(
        &mut self,
        scene: &S,
        id: impl Into<ObjectId>,
        handle: H,
        kind: ShapeKind,
    ) -> Result<(), CollisionError> {
        self.add_object_filtered(scene, id, handle, kind, CollisionLayers::ALL, CollisionLayers::ALL)
    }

    /// Register an object with an explicit layer and mask.
    ///
    /// The initial OBB and footprint come from the body's current geometry.
    /// Fails without touching existing state if the id is taken or the scene
    /// cannot describe the body.
    pub fn add_object_filtered<S: BodySource<H> + ?Sized>(
        &mut self,
        scene: &S,
        id: impl Into<ObjectId>,
        handle: H,
        kind: ShapeKind,
        layer: CollisionLayers,
        mask: CollisionLayers,
    ) -> Result<(), CollisionError> {
        let id = id.into();
        if self.keys.contains_key(&id) {
            warn!("Rejected duplicate registration of {id}");
            return Err(CollisionError::DuplicateObject(id));
        }

        let geometry = scene
            .body_geometry(handle)
            .ok_or_else(|| CollisionError::BodyUnavailable(id.clone()))?;
        let obb = OrientedBoundingBox::from_world_transform(
            geometry.local_center,
            geometry.local_half_extents,
            &geometry.world_matrix,
        );
        let footprint = obb.footprint();

        let key = self.objects.insert(TrackedObject {
            id: id.clone(),
            handle,
            kind,
            obb,
            layer,
            mask,
            stale: false,
        });
        self.broad_phase.insert(key, footprint);
        self.keys.insert(id.clone(), key);

        debug!("Registered {kind:?} {id} at {:?}", obb.center);
        if let Some(observer) = self.observer.as_mut() {
            observer.object_added(&id, kind, &obb, &footprint);
        }
        Ok(())
    }

    /// Deregister an object, returning its scene handle
    pub fn remove_object(&mut self, id: &ObjectId) -> Result<H, CollisionError> {
        let key = self
            .keys
            .remove(id)
            .ok_or_else(|| CollisionError::NotFound(id.clone()))?;
        self.broad_phase.remove(&key);
        let object = self
            .objects
            .remove(key)
            .ok_or_else(|| CollisionError::NotFound(id.clone()))?;

        debug!("Removed {id}");
        if let Some(observer) = self.observer.as_mut() {
            observer.object_removed(id);
        }
        Ok(object.handle)
    }

    /// Re-read one object's geometry from the scene
    pub fn refresh_object<S: BodySource<H> + ?Sized>(
        &mut self,
        scene: &S,
        id: &ObjectId,
    ) -> Result<(), CollisionError> {
        let key = self.key_of(id)?;
        if self.refresh_key(scene, key) {
            Ok(())
        } else {
            Err(CollisionError::BodyUnavailable(id.clone()))
        }
    }

    /// Translate a body through the scene and refresh its collision state
    pub fn move_object<S: BodySourceMut<H> + ?Sized>(
        &mut self,
        scene: &mut S,
        id: &ObjectId,
        delta: Vec3,
    ) -> Result<(), CollisionError> {
        let handle = self.handle(id)?;
        if !scene.translate(handle, delta) {
            return Err(CollisionError::BodyUnavailable(id.clone()));
        }
        self.refresh_object(scene, id)
    }

    /// Full two-stage pass. Never fails: bodies the scene cannot describe
    /// are skipped for this pass.
    pub fn check_collisions<S: BodySource<H> + ?Sized>(&mut self, scene: &S) -> Vec<CollisionRecord> {
        // Refresh always precedes both phases
        let keys: Vec<ColliderKey> = self.objects.keys().collect();
        for key in keys {
            self.refresh_key(scene, key);
        }

        let candidates = self.broad_phase.check_all();

        let mut rough = 0;
        let mut records = Vec::new();
        for pair in &candidates {
            let (Some(a), Some(b)) = (self.objects.get(pair.first), self.objects.get(pair.second)) else {
                continue;
            };
            if a.stale || b.stale {
                continue;
            }
            if !CollisionLayers::should_collide(a.layer, a.mask, b.layer, b.mask) {
                continue;
            }
            rough += 1;

            if let Some(contact) = self.narrow_phase(&a.obb, &b.obb) {
                records.push(CollisionRecord::from_contact(&a.id, &b.id, contact));
            }
        }

        self.stats = CollisionStats {
            object_count: self.objects.len(),
            rough_collision_count: rough,
            precise_collision_count: records.len(),
        };
        trace!(
            "Collision pass: {} objects, {} candidates, {} contacts",
            self.stats.object_count,
            self.stats.rough_collision_count,
            self.stats.precise_collision_count,
        );

        if let Some(observer) = self.observer.as_mut() {
            observer.collisions_detected(&records, &self.stats);
        }
        records
    }

    /// Two-stage test of a single pair against the currently stored
    /// geometry. `None` if either id is unknown, the footprints miss, the
    /// layers exclude each other, or SAT finds a separating axis.
    pub fn check_collision_between(&self, id_a: &ObjectId, id_b: &ObjectId) -> Option<CollisionRecord> {
        let key_a = *self.keys.get(id_a)?;
        let key_b = *self.keys.get(id_b)?;
        if key_a == key_b {
            return None;
        }

        self.broad_phase.check_pair(&key_a, &key_b)?;

        let a = self.objects.get(key_a)?;
        let b = self.objects.get(key_b)?;
        if !CollisionLayers::should_collide(a.layer, a.mask, b.layer, b.mask) {
            return None;
        }

        self.narrow_phase(&a.obb, &b.obb)
            .map(|contact| CollisionRecord::from_contact(&a.id, &b.id, contact))
    }

    /// Closest box hit by a ray within `max_distance`.
    ///
    /// Linear scan over every tracked box.
    pub fn raycast(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<RayHit> {
        let ray = Ray::new(origin, direction);

        self.objects
            .values()
            .filter(|object| !object.stale)
            .filter_map(|object| {
                object
                    .obb
                    .intersects_ray_with(&ray, self.config.parallel_epsilon)
                    .filter(|hit| hit.distance <= max_distance)
                    .map(|hit| RayHit {
                        id: object.id.clone(),
                        distance: hit.distance,
                        point: hit.point,
                        normal: hit.normal,
                    })
            })
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }

    /// Identifiers of every box containing a world point
    pub fn objects_containing(&self, point: &Vec3) -> Vec<ObjectId> {
        self.objects
            .values()
            .filter(|object| !object.stale && object.obb.contains_point(point))
            .map(|object| object.id.clone())
            .collect()
    }

    /// Push a colliding pair apart with the default resolver.
    ///
    /// See [`CollisionResolver::resolve_collision`].
    pub fn resolve_collision<S: BodySourceMut<H> + ?Sized>(
        &mut self,
        scene: &mut S,
        record: &CollisionRecord,
        strength: f32,
    ) -> Result<Separation, CollisionError> {
        CollisionResolver::new(&self.config).resolve_collision(self, scene, record, strength)
    }

    /// Counters from the most recent full pass
    pub fn stats(&self) -> CollisionStats {
        CollisionStats {
            object_count: self.objects.len(),
            ..self.stats
        }
    }

    /// Tracked state for an object
    pub fn get(&self, id: &ObjectId) -> Option<&TrackedObject<H>> {
        self.keys.get(id).and_then(|&key| self.objects.get(key))
    }

    /// Current OBB of an object
    pub fn obb(&self, id: &ObjectId) -> Option<&OrientedBoundingBox> {
        self.get(id).map(|object| &object.obb)
    }

    /// Current footprint of an object
    pub fn footprint(&self, id: &ObjectId) -> Option<&FootprintRect> {
        self.keys.get(id).and_then(|key| self.broad_phase.get(key))
    }

    /// Scene handle of an object
    pub fn handle(&self, id: &ObjectId) -> Result<H, CollisionError> {
        self.get(id)
            .map(|object| object.handle)
            .ok_or_else(|| CollisionError::NotFound(id.clone()))
    }

    /// Whether an id is registered
    pub fn contains(&self, id: &ObjectId) -> bool {
        self.keys.contains_key(id)
    }

    /// Registered identifiers, in storage order
    pub fn ids(&self) -> impl Iterator<Item = &ObjectId> + '_ {
        self.objects.values().map(|object| &object.id)
    }

    /// Number of registered objects
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Whether nothing is registered
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Deregister everything
    pub fn clear(&mut self) {
        let removed: Vec<ObjectId> = self.keys.drain().map(|(id, _)| id).collect();
        self.objects.clear();
        self.broad_phase.clear();
        self.stats = CollisionStats::default();

        if let Some(observer) = self.observer.as_mut() {
            for id in &removed {
                observer.object_removed(id);
            }
        }
    }

    fn key_of(&self, id: &ObjectId) -> Result<ColliderKey, CollisionError> {
        self.keys
            .get(id)
            .copied()
            .ok_or_else(|| CollisionError::NotFound(id.clone()))
    }

    fn narrow_phase(&self, a: &OrientedBoundingBox, b: &OrientedBoundingBox) -> Option<SatContact> {
        a.intersects_with(b, self.config.axis_epsilon, self.config.contact_estimate)
    }

    /// Update one object's box and footprint in place. Returns `false` and
    /// marks the object stale if the scene cannot describe it.
    fn refresh_key<S: BodySource<H> + ?Sized>(&mut self, scene: &S, key: ColliderKey) -> bool {
        let Some(object) = self.objects.get_mut(key) else {
            return false;
        };

        let Some(geometry) = scene.body_geometry(object.handle) else {
            if !object.stale {
                warn!("Scene has no body for {}; excluding it from collision tests", object.id);
            }
            object.stale = true;
            return false;
        };

        object.obb.update_from_world_transform(
            geometry.local_center,
            geometry.local_half_extents,
            &geometry.world_matrix,
        );
        let footprint = object.obb.footprint();
        object.stale = false;
        self.broad_phase.update(key, footprint);

        if let Some(observer) = self.observer.as_mut() {
            observer.object_refreshed(&object.id, &object.obb, &footprint);
        }
        true
    }
}

impl<H: Copy> Default for CollisionPipeline<H> {
    fn default() -> Self {
        Self::new(CollisionConfig::default())
    }
}
