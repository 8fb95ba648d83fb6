//! Track generator entities.
//!
//! A generator entity owns the pieces it spawns:
//! 1. `ClearTrack` reclaims them
//! 2. `GenerateTrack` reclaims, lays out a fresh track from the generator's
//!    pose, and spawns one `TrackPiece` entity per placed segment
//!
//! Reclamation is immediate while editing and deferred to the end of the
//! frame while the game is running.

use bevy::prelude::*;
use rand::{rngs::StdRng, SeedableRng};

use super::layout::{generate_path, LayoutMode};
use super::template::{Pose, SegmentKind, TemplateId, TemplateLibrary};
use crate::game_state::GameState;
use crate::lifetime::Expiry;

pub struct TrackGeneratorPlugin;

impl Plugin for TrackGeneratorPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<TrackLibrary>()
            .add_event::<GenerateTrack>()
            .add_event::<ClearTrack>()
            .add_systems(Update, (clear_track_on_event, generate_track_on_event).chain());
    }
}

/// Piece templates supplied by the asset layer.
#[derive(Resource, Clone, Debug, Default)]
pub struct TrackLibrary(pub TemplateLibrary);

/// An entity that lays out track from its own transform.
#[derive(Component, Clone, Debug, Default)]
#[require(Transform, SpawnedPieces)]
pub struct TrackGenerator {
    pub mode: LayoutMode,
    /// Seed for template choice and jitter; the same seed rebuilds the same track.
    pub seed: u64,
}

/// Piece entities spawned by the generator this component sits on.
#[derive(Component, Clone, Debug, Default)]
pub struct SpawnedPieces(Vec<Entity>);

impl SpawnedPieces {
    pub fn entities(&self) -> &[Entity] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A placed road piece, for the instantiation layer to render.
#[derive(Component, Clone, Debug, PartialEq)]
pub struct TrackPiece {
    pub owner: Entity,
    pub index: usize,
    pub template: TemplateId,
    pub kind: SegmentKind,
}

/// Rebuild the track of a generator.
#[derive(Event, Clone, Copy, Debug)]
pub struct GenerateTrack {
    pub generator: Entity,
}

/// Remove every piece a generator has spawned.
#[derive(Event, Clone, Copy, Debug)]
pub struct ClearTrack {
    pub generator: Entity,
}

/// How spawned pieces are reclaimed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Teardown {
    /// Despawn at the next command flush.
    Immediate,
    /// Hand off to the lifetime system at the end of the frame.
    Deferred,
}

impl Teardown {
    pub fn for_state(state: &GameState) -> Self {
        if state.is_simulating() {
            Teardown::Deferred
        } else {
            Teardown::Immediate
        }
    }
}

/// Release every piece owned by `pieces`. Returns how many were released.
pub fn reclaim_pieces(
    commands: &mut Commands,
    pieces: &mut SpawnedPieces,
    teardown: Teardown,
) -> usize {
    let entities = std::mem::take(&mut pieces.0);
    for &entity in &entities {
        // Pieces removed by someone else are simply skipped
        let Some(mut piece) = commands.get_entity(entity) else {
            continue;
        };
        match teardown {
            Teardown::Immediate => piece.despawn(),
            Teardown::Deferred => {
                piece.try_insert(Expiry::end_of_frame());
            }
        }
    }
    entities.len()
}

fn clear_track_on_event(
    mut commands: Commands,
    mut events: EventReader<ClearTrack>,
    mut generators: Query<&mut SpawnedPieces, With<TrackGenerator>>,
    state: Res<State<GameState>>,
) {
    let teardown = Teardown::for_state(state.get());

    for event in events.read() {
        let Ok(mut pieces) = generators.get_mut(event.generator) else {
            warn!("ClearTrack sent to {:?}, which is not a track generator", event.generator);
            continue;
        };

        let released = reclaim_pieces(&mut commands, &mut pieces, teardown);
        info!("Cleared {} track pieces ({:?})", released, teardown);
    }
}

fn generate_track_on_event(
    mut commands: Commands,
    mut events: EventReader<GenerateTrack>,
    mut generators: Query<(&TrackGenerator, &Transform, &mut SpawnedPieces)>,
    library: Res<TrackLibrary>,
    state: Res<State<GameState>>,
) {
    let teardown = Teardown::for_state(state.get());

    for event in events.read() {
        let owner = event.generator;
        let Ok((generator, transform, mut pieces)) = generators.get_mut(owner) else {
            warn!("GenerateTrack sent to {:?}, which is not a track generator", owner);
            continue;
        };

        info!("Generating track...");

        reclaim_pieces(&mut commands, &mut pieces, teardown);

        let mode = generator.mode.with_origin(Pose::from(*transform));
        let mut rng = StdRng::seed_from_u64(generator.seed);
        let layout = match generate_path(&mode, &library.0, &mut rng) {
            Ok(layout) => layout,
            Err(err) => {
                error!("Track generation failed: {}", err);
                continue;
            }
        };

        let turns = layout.turn_count();
        let aborted = layout.was_aborted();

        for segment in layout {
            let piece_transform = Transform::from(segment.pose());
            let entity = commands
                .spawn((
                    TrackPiece {
                        owner,
                        index: segment.index,
                        template: segment.template,
                        kind: segment.kind,
                    },
                    piece_transform,
                ))
                .id();
            pieces.0.push(entity);
        }

        info!(
            "Track generation complete: {} pieces, {} turns{}",
            pieces.len(),
            turns,
            if aborted { " (stopped early)" } else { "" }
        );
    }
}
