//! VirusJager - drive a blood-vessel racer and clear out viruses.
//!
//! The crate is the headless game core: procedural track layout, the car's
//! fuel model, hazard scoring, and the game-over flow. Rendering, physics,
//! and input devices belong to the host app, which talks to the core through
//! resources (`DriverInput`, `TrackLibrary`) and events (`GenerateTrack`,
//! `PlayerContact`, `SceneRequest`).

use bevy::prelude::*;

pub mod game_state;
pub mod lifetime;
pub mod score;
pub mod simulation;
pub mod track;
pub mod ui;

/// Every gameplay plugin in the order they depend on each other.
pub struct VirusJagerPlugin;

impl Plugin for VirusJagerPlugin {
    fn build(&self, app: &mut App) {
        app
            // Game state management
            .add_plugins(game_state::GameStatePlugin)
            .add_plugins(lifetime::LifetimePlugin)
            .add_plugins(score::ScorePlugin)
            // Track layout
            .add_plugins(track::TrackPlugin)
            // Simulation
            .add_plugins(simulation::SimulationPlugin)
            // Menus
            .add_plugins(ui::UiPlugin);
    }
}
