//! Delayed entity removal.
//!
//! Used for hazards that linger while their hit animation plays and for
//! track pieces torn down while the game is running.

use bevy::prelude::*;

pub struct LifetimePlugin;

impl Plugin for LifetimePlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Last, expire_entities);
    }
}

/// Seconds of game time left before the entity is despawned.
#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct Expiry {
    pub remaining: f32,
}

impl Expiry {
    pub fn after(seconds: f32) -> Self {
        Self { remaining: seconds }
    }

    /// Despawn during this frame's `Last` schedule.
    pub fn end_of_frame() -> Self {
        Self::after(0.0)
    }
}

fn expire_entities(
    mut commands: Commands,
    time: Res<Time>,
    mut query: Query<(Entity, &mut Expiry)>,
) {
    let delta = time.delta_secs();

    for (entity, mut expiry) in &mut query {
        expiry.remaining -= delta;
        if expiry.remaining <= 0.0 {
            commands.entity(entity).despawn();
        }
    }
}
