//! Headless demo: lays out a track, drives the car until the tank runs dry,
//! and reports what happened.

use std::time::Duration;

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;

use virusjager::{
    game_state::GameState,
    score::Score,
    simulation::{
        enemy::EnemyState,
        hazards::{Hazard, PlayerContact},
        vehicle::{Car, DriverInput, VehicleConfig},
    },
    track::{
        template::{SNAP_ENTRY, SNAP_EXIT, SNAP_POINT},
        ClearTrack, GenerateTrack, LayoutMode, Pose, SegmentTemplate, SnapConfig, SpawnedPieces,
        TemplateLibrary, TrackGenerator, TrackLibrary,
    },
    VirusJagerPlugin,
};

const FRAME_RATE: u64 = 60;
const DEMO_FRAMES: usize = 900;
const TRACK_SEED: u64 = 42;
const LOG_FILTER: &str = "virusjager=info";

fn demo_library() -> TemplateLibrary {
    TemplateLibrary::new([
        SegmentTemplate::straight("vessel_straight")
            .with_bounds(Vec3::new(6.0, 1.0, 10.0))
            .with_anchor(SNAP_POINT, Pose::from_position(Vec3::new(0.0, 0.0, 5.0))),
        SegmentTemplate::straight("vessel_narrow")
            .with_bounds(Vec3::new(4.0, 1.0, 8.0))
            .with_anchor(SNAP_POINT, Pose::from_position(Vec3::new(0.0, 0.0, 4.0))),
        SegmentTemplate::turn("vessel_bend")
            .with_bounds(Vec3::new(8.0, 1.0, 8.0))
            .with_anchor(SNAP_ENTRY, Pose::from_position(Vec3::new(0.0, 0.0, -4.0)))
            .with_anchor(SNAP_EXIT, Pose::from_position(Vec3::new(4.0, 0.0, 0.0))),
    ])
}

fn main() {
    let mut app = App::new();

    app.add_plugins(MinimalPlugins)
        .add_plugins(bevy::log::LogPlugin {
            level: bevy::log::Level::INFO,
            filter: LOG_FILTER.to_string(),
            ..default()
        })
        .add_plugins(VirusJagerPlugin)
        .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_nanos(
            1_000_000_000 / FRAME_RATE,
        )))
        .insert_resource(TrackLibrary(demo_library()));

    let vehicle_config = app.world().resource::<VehicleConfig>().clone();
    let world = app.world_mut();

    let generator = world
        .spawn((
            TrackGenerator {
                mode: LayoutMode::Snap(SnapConfig {
                    max_segments: 12,
                    ..default()
                }),
                seed: TRACK_SEED,
            },
            Transform::default(),
        ))
        .id();
    world.spawn(Car::new(&vehicle_config));
    let virus = world.spawn((Hazard::Virus, EnemyState::Flow)).id();
    let blood_cell = world.spawn(Hazard::BloodCell).id();

    // Floor the pedal
    world.resource_mut::<DriverInput>().pedal = -1.0;
    world.send_event(GenerateTrack { generator });
    world
        .resource_mut::<NextState<GameState>>()
        .set(GameState::Racing);

    info!("starting demo loop...");

    for frame in 0..DEMO_FRAMES {
        match frame {
            120 => {
                app.world_mut().send_event(PlayerContact { hazard: virus });
            }
            240 => {
                app.world_mut().send_event(PlayerContact { hazard: blood_cell });
            }
            _ => {}
        }
        app.update();

        if *app.world().resource::<State<GameState>>().get() == GameState::GameOver {
            info!("game over after {} frames", frame + 1);
            break;
        }
    }

    let pieces = app
        .world()
        .get::<SpawnedPieces>(generator)
        .map(SpawnedPieces::len)
        .unwrap_or_default();

    app.world_mut().send_event(ClearTrack { generator });
    app.update();

    info!(
        "demo finished: {} track pieces, score {}",
        pieces,
        app.world().resource::<Score>().value()
    );
}
