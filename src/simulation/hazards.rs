//! Player contact with viruses and red blood cells.
//!
//! Collision detection happens elsewhere; it reports hits as `PlayerContact`
//! events naming the hazard that was touched.

use bevy::prelude::*;

use super::enemy::{EnemyEvent, EnemyState};
use super::SimulationSet;
use crate::lifetime::Expiry;
use crate::score::Score;

pub struct HazardPlugin;

impl Plugin for HazardPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<HazardConfig>()
            .add_event::<PlayerContact>()
            .add_systems(Update, resolve_player_contacts.in_set(SimulationSet::Gameplay));
    }
}

/// Scoring and cleanup rules for hazards.
#[derive(Resource, Clone, Debug, PartialEq)]
pub struct HazardConfig {
    /// Points for taking out a virus.
    pub virus_reward: i64,
    /// Seconds a hit virus lingers before it is removed.
    pub virus_death_delay: f32,
    /// Points lost for hitting a red blood cell.
    pub blood_cell_penalty: i64,
    /// Seconds a hit blood cell lingers so its animation can finish.
    pub blood_cell_despawn_delay: f32,
}

impl Default for HazardConfig {
    fn default() -> Self {
        Self {
            virus_reward: 10,
            virus_death_delay: 1.0,
            blood_cell_penalty: 10,
            blood_cell_despawn_delay: 3.0,
        }
    }
}

#[derive(Component, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Hazard {
    /// Enemy; carries an `EnemyState`.
    Virus,
    /// Friendly cell the player should avoid.
    BloodCell,
}

/// The player touched `hazard`.
#[derive(Event, Clone, Copy, Debug)]
pub struct PlayerContact {
    pub hazard: Entity,
}

fn resolve_player_contacts(
    mut commands: Commands,
    mut contacts: EventReader<PlayerContact>,
    config: Res<HazardConfig>,
    mut hazards: Query<(&Hazard, Option<&mut EnemyState>, Has<Expiry>)>,
    mut score: Option<ResMut<Score>>,
) {
    for contact in contacts.read() {
        let Ok((hazard, enemy, expiring)) = hazards.get_mut(contact.hazard) else {
            continue;
        };

        match hazard {
            Hazard::Virus => {
                let Some(mut state) = enemy else {
                    warn!("Virus {:?} has no enemy state", contact.hazard);
                    continue;
                };

                let next = state.transition(EnemyEvent::PlayerHit);
                if next == *state {
                    continue;
                }
                *state = next;

                if next == EnemyState::Dying {
                    info!("Player hit virus!");
                    if let Some(score) = score.as_mut() {
                        score.add(config.virus_reward);
                    }
                    commands
                        .entity(contact.hazard)
                        .insert(Expiry::after(config.virus_death_delay));
                }
            }
            Hazard::BloodCell => {
                info!("Player hit red blood cell!");
                if let Some(score) = score.as_mut() {
                    score.subtract(config.blood_cell_penalty);
                }
                if !expiring {
                    commands
                        .entity(contact.hazard)
                        .insert(Expiry::after(config.blood_cell_despawn_delay));
                }
            }
        }
    }
}
