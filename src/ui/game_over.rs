//! Game-over menu driven by the steering wheel.
//!
//! Menu flow:
//! 1. Entering `GameOver` shows the menu, selects the first button, and
//!    freezes game time
//! 2. Swinging the wheel past the threshold moves the selection (wrapping)
//! 3. Submit runs the selected action, unfreezes time, and asks the host to
//!    reload or go back to the main menu

use bevy::prelude::*;

use crate::game_state::GameState;
use crate::score::Score;
use crate::simulation::vehicle::DriverInput;

pub struct GameOverMenuPlugin;

impl Plugin for GameOverMenuPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<GameOverMenu>()
            .add_event::<SceneRequest>()
            .add_systems(OnEnter(GameState::GameOver), show_game_over)
            .add_systems(
                Update,
                navigate_game_over_menu.run_if(in_state(GameState::GameOver)),
            );
    }
}

/// Wheel deflection needed to move the selection.
pub const STEER_THRESHOLD: f32 = 0.5;

/// What a game-over button does.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MenuAction {
    TryAgain,
    MainMenu,
}

impl MenuAction {
    pub fn label(&self) -> &'static str {
        match self {
            MenuAction::TryAgain => "Try Again",
            MenuAction::MainMenu => "Main Menu",
        }
    }
}

/// Scene changes requested from the host.
#[derive(Event, Clone, Copy, Debug, PartialEq, Eq)]
pub enum SceneRequest {
    /// Restart the current run.
    Reload,
    /// Return to the main menu scene.
    MainMenu,
}

/// Selection state of the game-over menu.
#[derive(Resource, Clone, Debug, PartialEq)]
pub struct GameOverMenu {
    visible: bool,
    buttons: Vec<MenuAction>,
    selected: Option<usize>,
    last_steer: f32,
}

impl Default for GameOverMenu {
    fn default() -> Self {
        Self::new(vec![MenuAction::TryAgain, MenuAction::MainMenu])
    }
}

impl GameOverMenu {
    pub fn new(buttons: Vec<MenuAction>) -> Self {
        Self {
            visible: false,
            buttons,
            selected: None,
            last_steer: 0.0,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn buttons(&self) -> &[MenuAction] {
        &self.buttons
    }

    pub fn selected(&self) -> Option<MenuAction> {
        self.selected.map(|index| self.buttons[index])
    }

    /// Show the menu with the first button selected. Returns false if it was
    /// already showing.
    pub fn show(&mut self) -> bool {
        if self.visible {
            return false;
        }
        self.visible = true;
        self.selected = if self.buttons.is_empty() { None } else { Some(0) };
        true
    }

    pub fn hide(&mut self) {
        self.visible = false;
        self.selected = None;
        self.last_steer = 0.0;
    }

    /// Feed the current wheel position. Only a crossing of the threshold moves
    /// the selection, so holding the wheel over moves it once.
    pub fn steer(&mut self, steer: f32) {
        if !self.visible {
            return;
        }

        if steer > STEER_THRESHOLD && self.last_steer <= STEER_THRESHOLD {
            self.move_selection(1);
        } else if steer < -STEER_THRESHOLD && self.last_steer >= -STEER_THRESHOLD {
            self.move_selection(-1);
        }

        self.last_steer = steer;
    }

    /// The action to run when submit is pressed, if any.
    pub fn submit(&self) -> Option<MenuAction> {
        if !self.visible {
            return None;
        }
        self.selected()
    }

    fn move_selection(&mut self, direction: isize) {
        let Some(index) = self.selected else {
            return;
        };
        let count = self.buttons.len() as isize;
        self.selected = Some((index as isize + direction).rem_euclid(count) as usize);
    }
}

fn show_game_over(mut menu: ResMut<GameOverMenu>, mut time: ResMut<Time<Virtual>>) {
    if menu.show() {
        info!("Game over");
        time.pause();
    }
}

fn navigate_game_over_menu(
    input: Res<DriverInput>,
    mut menu: ResMut<GameOverMenu>,
    mut time: ResMut<Time<Virtual>>,
    mut requests: EventWriter<SceneRequest>,
    mut next_state: ResMut<NextState<GameState>>,
    score: Option<ResMut<Score>>,
) {
    menu.steer(input.steer);

    if !input.submit {
        return;
    }
    let Some(action) = menu.submit() else {
        return;
    };

    info!("Game-over menu: {}", action.label());
    menu.hide();
    time.unpause();

    match action {
        MenuAction::TryAgain => {
            if let Some(mut score) = score {
                score.reset();
            }
            requests.send(SceneRequest::Reload);
            next_state.set(GameState::Racing);
        }
        MenuAction::MainMenu => {
            requests.send(SceneRequest::MainMenu);
            next_state.set(GameState::Editing);
        }
    }
}
