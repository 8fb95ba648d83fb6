//! Player score.

use bevy::prelude::*;

pub struct ScorePlugin;

impl Plugin for ScorePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Score>();
    }
}

/// Points collected this run. Can go negative.
#[derive(Resource, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Score {
    value: i64,
}

impl Score {
    pub fn value(&self) -> i64 {
        self.value
    }

    pub fn add(&mut self, amount: i64) {
        self.value += amount;
        info!("Score: {}", self.value);
    }

    pub fn subtract(&mut self, amount: i64) {
        self.value -= amount;
        info!("Score: {}", self.value);
    }

    pub fn reset(&mut self) {
        self.value = 0;
    }
}
