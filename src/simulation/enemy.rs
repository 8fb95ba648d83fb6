//! Virus enemy state machine.
//!
//! States are plain enum variants; `transition` is the whole table.

use bevy::prelude::*;

/// Behaviour state of a virus.
#[derive(Component, Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum EnemyState {
    /// Drifting along with the blood flow.
    #[default]
    Flow,
    /// Hit by the player; plays out its death before despawning.
    Dying,
}

/// Things that can happen to an enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EnemyEvent {
    PlayerHit,
}

impl EnemyState {
    /// Next state after `event`. Unlisted pairs keep the current state.
    pub fn transition(self, event: EnemyEvent) -> EnemyState {
        match (self, event) {
            (EnemyState::Flow, EnemyEvent::PlayerHit) => EnemyState::Dying,
            (EnemyState::Dying, EnemyEvent::PlayerHit) => EnemyState::Dying,
        }
    }

    pub fn is_alive(&self) -> bool {
        matches!(self, EnemyState::Flow)
    }
}
