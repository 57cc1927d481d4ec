//! Headless collision demo
//!
//! Spawns a handful of random boxes, cylinders and prisms in a walled arena,
//! lets them drift for a fixed number of frames and pushes them apart
//! whenever the collision pipeline reports an overlap.
//!
//! Usage: `scene_demo [frames]` (default 240). A `collision.toml` or
//! `collision.ron` in the working directory overrides the default tunables.

mod scene;

use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

use hybrid_collision::config::{CollisionConfig, Config, ConfigError};
use hybrid_collision::debug::CollisionDebugVisualizer;
use hybrid_collision::foundation::logging::{self, LevelFilter};
use hybrid_collision::foundation::math::{constants, Quat, Transform, Vec3};
use hybrid_collision::physics::{CollisionError, CollisionPipeline, ObjectId};
use log::{debug, info, warn};
use rand::prelude::*;

use scene::{ObjectKey, Scene, SceneObject, Shape};

// Demo constants
const DEFAULT_FRAMES: usize = 240;
const OBJECT_COUNT: usize = 16;
const ARENA_HALF_SIZE: f32 = 8.0;
const FRAME_TIME: f32 = 1.0 / 60.0;
const STATS_INTERVAL: usize = 60;
const RNG_SEED: u64 = 0x5eed;

/// Demo failures
#[derive(thiserror::Error, Debug)]
enum DemoError {
    #[error("invalid frame count '{0}'")]
    InvalidFrames(String),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Collision(#[from] CollisionError),
}

fn load_config() -> Result<CollisionConfig, ConfigError> {
    let config = ["collision.toml", "collision.ron"]
        .into_iter()
        .find(|path| Path::new(path).exists())
        .map_or_else(
            || Ok(CollisionConfig::default()),
            |path| {
                info!("Loading collision config from {path}");
                CollisionConfig::load_from_file(path)
            },
        )?;
    config.validate()?;
    Ok(config)
}

fn random_shape(rng: &mut StdRng) -> Shape {
    match rng.gen_range(0..3) {
        0 => Shape::Box {
            width: rng.gen_range(0.5..2.0),
            height: rng.gen_range(0.5..2.0),
            depth: rng.gen_range(0.5..2.0),
        },
        1 => Shape::Cylinder {
            radius: rng.gen_range(0.3..1.0),
            height: rng.gen_range(0.5..2.0),
            segments: 24,
        },
        _ => Shape::Prism {
            radius: rng.gen_range(0.3..1.0),
            height: rng.gen_range(0.5..2.0),
            sides: rng.gen_range(3..8),
        },
    }
}

fn populate(scene: &mut Scene, rng: &mut StdRng) -> Vec<ObjectKey> {
    let limit = scene.arena_half_size;

    (0..OBJECT_COUNT)
        .map(|index| {
            let shape = random_shape(rng);
            let position = Vec3::new(rng.gen_range(-limit..limit), 0.0, rng.gen_range(-limit..limit));
            let heading = rng.gen_range(0.0..360.0) * constants::DEG_TO_RAD;

            scene.spawn(SceneObject {
                name: format!("{:?}-{index}", shape.kind()).to_lowercase(),
                transform: Transform::from_position_rotation(
                    position,
                    Quat::from_axis_angle(&Vec3::y_axis(), heading),
                ),
                shape,
                velocity: Vec3::new(rng.gen_range(-3.0..3.0), 0.0, rng.gen_range(-3.0..3.0)),
                spin: rng.gen_range(-90.0..90.0) * constants::DEG_TO_RAD,
                mass: rng.gen_range(0.5..4.0),
            })
        })
        .collect()
}

fn run(frames: usize) -> Result<(), DemoError> {
    let config = load_config()?;
    let strength = config.separation_strength;
    let mut rng = StdRng::seed_from_u64(RNG_SEED);

    let mut scene = Scene::new(ARENA_HALF_SIZE);
    let keys = populate(&mut scene, &mut rng);

    let visualizer = Rc::new(RefCell::new(CollisionDebugVisualizer::new()));
    let mut pipeline = CollisionPipeline::new(config).with_observer(Box::new(visualizer.clone()));

    for key in keys {
        let Some(object) = scene.get(key) else { continue };
        let (name, kind) = (object.name.clone(), object.shape.kind());
        pipeline.add_object(&scene, name, key, kind)?;
    }
    info!("Tracking {} objects", pipeline.len());

    let mut total_contacts = 0;
    for frame in 0..frames {
        scene.integrate(FRAME_TIME);

        let records = pipeline.check_collisions(&scene);
        total_contacts += records.len();

        for record in &records {
            let (handle_a, handle_b) = (pipeline.handle(&record.object_a)?, pipeline.handle(&record.object_b)?);
            pipeline.resolve_collision(&mut scene, record, strength)?;
            scene.bounce(handle_a, handle_b, record.normal);
            debug!(
                "Frame {frame}: {} / {} depth {:.3}",
                record.object_a, record.object_b, record.penetration_depth
            );
        }

        if frame % STATS_INTERVAL == 0 {
            let stats = pipeline.stats();
            info!(
                "Frame {frame}: {} objects, {} rough, {} precise",
                stats.object_count, stats.rough_collision_count, stats.precise_collision_count
            );

            // Pick whatever sits under the arena center
            match pipeline.raycast(Vec3::new(0.0, 20.0, 0.0), -Vec3::y(), 50.0) {
                Some(hit) => info!("Pick at arena center: {} at distance {:.2}", hit.id, hit.distance),
                None => debug!("Pick at arena center: nothing"),
            }
        }
    }

    let inside: Vec<ObjectId> = pipeline.objects_containing(&Vec3::zeros());
    if !inside.is_empty() {
        debug!("Objects covering the origin: {inside:?}");
    }

    let viz = visualizer.borrow();
    info!(
        "Finished {frames} frames: {total_contacts} contacts resolved, {} debug shapes in final frame",
        viz.shapes().count()
    );
    Ok(())
}

fn main() {
    logging::init_with_level(LevelFilter::Info);

    let frames = match std::env::args().nth(1) {
        Some(arg) => match arg.parse::<usize>() {
            Ok(frames) => frames,
            Err(_) => {
                log::error!("{}", DemoError::InvalidFrames(arg));
                std::process::exit(2);
            }
        },
        None => DEFAULT_FRAMES,
    };

    info!("Starting collision demo for {frames} frames");
    if let Err(e) = run(frames) {
        warn!("Demo stopped: {e}");
        std::process::exit(1);
    }
}
