//! End-to-end checks of the collision pipeline against a small scene

use std::cell::RefCell;
use std::rc::Rc;

use approx::assert_relative_eq;
use hybrid_collision::debug::CollisionDebugVisualizer;
use hybrid_collision::prelude::*;

struct Body {
    transform: Transform,
    half_extents: Vec3,
    mass: Option<f32>,
}

#[derive(Default)]
struct Scene {
    bodies: Vec<Body>,
}

impl Scene {
    fn spawn(&mut self, position: Vec3, half_extents: Vec3) -> usize {
        self.bodies.push(Body {
            transform: Transform::from_position(position),
            half_extents,
            mass: None,
        });
        self.bodies.len() - 1
    }

    fn position(&self, handle: usize) -> Vec3 {
        self.bodies[handle].transform.position
    }
}

impl BodySource<usize> for Scene {
    fn body_geometry(&self, handle: usize) -> Option<BodyGeometry> {
        let body = self.bodies.get(handle)?;
        Some(BodyGeometry::centered(body.half_extents, body.transform.to_matrix()))
    }

    fn mass(&self, handle: usize) -> Option<f32> {
        self.bodies.get(handle)?.mass
    }
}

impl BodySourceMut<usize> for Scene {
    fn translate(&mut self, handle: usize, delta: Vec3) -> bool {
        match self.bodies.get_mut(handle) {
            Some(body) => {
                body.transform.position += delta;
                true
            }
            None => false,
        }
    }
}

fn unit() -> Vec3 {
    Vec3::new(1.0, 1.0, 1.0)
}

#[test]
fn resolve_separates_overlapping_pair() {
    let mut scene = Scene::default();
    let a = scene.spawn(Vec3::zeros(), unit());
    let b = scene.spawn(Vec3::new(1.5, 0.0, 0.0), unit());

    let mut pipeline = CollisionPipeline::default();
    pipeline.add_object(&scene, "a", a, ShapeKind::Box).unwrap();
    pipeline.add_object(&scene, "b", b, ShapeKind::Box).unwrap();

    let records = pipeline.check_collisions(&scene);
    assert_eq!(records.len(), 1);

    let separation = pipeline.resolve_collision(&mut scene, &records[0], 1.0).unwrap();
    assert_relative_eq!(separation.offset_a, Vec3::new(-0.25, 0.0, 0.0), epsilon = 1e-5);
    assert_relative_eq!(scene.position(a), Vec3::new(-0.25, 0.0, 0.0), epsilon = 1e-5);
    assert_relative_eq!(scene.position(b), Vec3::new(1.75, 0.0, 0.0), epsilon = 1e-5);

    // Boxes refreshed immediately; the pair now only touches
    assert_relative_eq!(pipeline.obb(&"b".into()).unwrap().center, Vec3::new(1.75, 0.0, 0.0), epsilon = 1e-5);
    assert!(pipeline.check_collision_between(&"a".into(), &"b".into()).is_none());
    assert!(pipeline.check_collisions(&scene).is_empty());
}

#[test]
fn resolve_uses_scene_masses() {
    let mut scene = Scene::default();
    let a = scene.spawn(Vec3::zeros(), unit());
    let b = scene.spawn(Vec3::new(1.0, 0.0, 0.0), unit());
    scene.bodies[a].mass = Some(3.0);

    let mut pipeline = CollisionPipeline::default();
    pipeline.add_object(&scene, "heavy", a, ShapeKind::Box).unwrap();
    pipeline.add_object(&scene, "light", b, ShapeKind::Box).unwrap();

    let records = pipeline.check_collisions(&scene);
    let resolver = CollisionResolver::new(pipeline.config());
    resolver.resolve_all(&mut pipeline, &mut scene, &records).unwrap();

    assert_relative_eq!(scene.position(a), Vec3::new(-0.25, 0.0, 0.0), epsilon = 1e-5);
    assert_relative_eq!(scene.position(b), Vec3::new(1.75, 0.0, 0.0), epsilon = 1e-5);
}

#[test]
fn resolve_unknown_object_is_not_found() {
    let mut scene = Scene::default();
    let a = scene.spawn(Vec3::zeros(), unit());
    let mut pipeline = CollisionPipeline::default();
    pipeline.add_object(&scene, "a", a, ShapeKind::Box).unwrap();

    let record = CollisionRecord {
        object_a: "a".into(),
        object_b: "ghost".into(),
        penetration_depth: 1.0,
        normal: Vec3::x(),
        contact_point: Vec3::zeros(),
    };
    assert_eq!(
        pipeline.resolve_collision(&mut scene, &record, 1.0),
        Err(CollisionError::NotFound("ghost".into()))
    );
    assert_relative_eq!(scene.position(a), Vec3::zeros());
}

#[test]
fn stats_track_each_stage() {
    let mut scene = Scene::default();
    // Row of boxes on X; 0-1 overlap, 2 floats above 1, 3 is far away
    let handles = [
        scene.spawn(Vec3::new(0.0, 0.0, 0.0), unit()),
        scene.spawn(Vec3::new(1.5, 0.0, 0.0), unit()),
        scene.spawn(Vec3::new(1.5, 5.0, 0.0), unit()),
        scene.spawn(Vec3::new(40.0, 0.0, 0.0), unit()),
    ];

    let mut pipeline = CollisionPipeline::default();
    for (index, handle) in handles.iter().enumerate() {
        pipeline.add_object(&scene, index as u64, *handle, ShapeKind::Box).unwrap();
    }

    let records = pipeline.check_collisions(&scene);
    assert_eq!(records.len(), 1);
    // Footprints of 0, 1 and 2 all overlap each other
    assert_eq!(
        pipeline.stats(),
        CollisionStats { object_count: 4, rough_collision_count: 3, precise_collision_count: 1 }
    );
}

#[test]
fn observer_follows_pipeline() {
    let mut scene = Scene::default();
    let a = scene.spawn(Vec3::zeros(), unit());
    let b = scene.spawn(Vec3::new(1.5, 0.0, 0.0), unit());

    let visualizer = Rc::new(RefCell::new(CollisionDebugVisualizer::new()));
    let mut pipeline = CollisionPipeline::default().with_observer(Box::new(visualizer.clone()));
    pipeline.add_object(&scene, "a", a, ShapeKind::Box).unwrap();
    pipeline.add_object(&scene, "b", b, ShapeKind::Cylinder).unwrap();
    assert_eq!(visualizer.borrow().tracked_count(), 2);

    pipeline.check_collisions(&scene);
    assert!(visualizer.borrow().is_colliding(&"a".into()));
    assert_eq!(visualizer.borrow().last_stats().precise_collision_count, 1);

    pipeline.remove_object(&"b".into()).unwrap();
    pipeline.check_collisions(&scene);
    assert!(!visualizer.borrow().is_colliding(&"a".into()));
    assert_eq!(visualizer.borrow().tracked_count(), 1);

    pipeline.clear();
    assert_eq!(visualizer.borrow().tracked_count(), 0);
}

#[test]
fn scaled_and_offset_bounds() {
    let mut scene = Scene::default();
    let a = scene.spawn(Vec3::zeros(), unit());
    scene.bodies[a].transform = Transform::from_position(Vec3::new(0.0, 0.0, 0.0)).with_scale(Vec3::new(2.0, 1.0, 1.0));

    struct Offset<'a>(&'a Scene);
    impl BodySource<usize> for Offset<'_> {
        fn body_geometry(&self, handle: usize) -> Option<BodyGeometry> {
            let mut geometry = self.0.body_geometry(handle)?;
            geometry.local_center = Vec3::new(0.0, 1.0, 0.0);
            Some(geometry)
        }
    }

    let mut pipeline = CollisionPipeline::default();
    pipeline.add_object(&Offset(&scene), "a", a, ShapeKind::Prism).unwrap();

    let obb = pipeline.obb(&"a".into()).unwrap();
    assert_relative_eq!(obb.center, Vec3::new(0.0, 1.0, 0.0), epsilon = 1e-5);
    assert_relative_eq!(obb.half_extents, Vec3::new(2.0, 1.0, 1.0), epsilon = 1e-5);

    let footprint = pipeline.footprint(&"a".into()).unwrap();
    assert_relative_eq!(footprint.x, -2.0, epsilon = 1e-5);
    assert_relative_eq!(footprint.width, 4.0, epsilon = 1e-5);
}

#[test]
fn config_round_trips_through_toml() {
    let dir = std::env::temp_dir().join(format!("hybrid_collision_cfg_{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("collision.toml");
    let path = path.to_str().unwrap();

    let config = CollisionConfig::default()
        .with_contact_estimate(ContactEstimate::CenterAverage)
        .with_separation_strength(0.5);
    config.save_to_file(path).unwrap();

    let loaded = CollisionConfig::load_from_file(path).unwrap();
    assert_eq!(loaded, config);
    assert!(loaded.validate().is_ok());

    std::fs::remove_dir_all(&dir).unwrap();
}
