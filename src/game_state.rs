//! Core game state and mode management.
//!
//! The state decides whether the world is being simulated, which in turn
//! decides how generated track is torn down and whether the car drives.

use bevy::prelude::*;
use bevy::state::app::StatesPlugin;

pub struct GameStatePlugin;

impl Plugin for GameStatePlugin {
    fn build(&self, app: &mut App) {
        // Headless apps built on MinimalPlugins don't bring state support along
        if !app.is_plugin_added::<StatesPlugin>() {
            app.add_plugins(StatesPlugin);
        }
        app.init_state::<GameState>();
    }
}

/// High-level game state controlling which systems run.
#[derive(States, Default, Clone, Copy, Eq, PartialEq, Debug, Hash)]
pub enum GameState {
    /// Not simulating: track editing tools or front-end menus.
    #[default]
    Editing,
    /// Active gameplay - the car drives and burns fuel.
    Racing,
    /// Out of fuel; the game-over menu is shown and time is frozen.
    GameOver,
}

impl GameState {
    /// True while the world is live (racing or frozen on the game-over screen).
    pub fn is_simulating(&self) -> bool {
        !matches!(self, GameState::Editing)
    }
}
