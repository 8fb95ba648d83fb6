//! Menu logic. Widgets are drawn by the host; this layer owns selection and
//! the actions that follow from it.

use bevy::prelude::*;

pub mod game_over;

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(game_over::GameOverMenuPlugin);
    }
}
