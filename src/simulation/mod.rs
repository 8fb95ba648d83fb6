//! Simulation systems for the car, hazards, and enemies.
//!
//! The simulation runs on a fixed timestep (default 20 Hz) decoupled from the
//! frame rate. Gameplay systems listen for `SimulationTick` events so the same
//! step functions can be driven by any scheduler.

use bevy::prelude::*;

pub mod enemy;
pub mod hazards;
pub mod vehicle;

pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(vehicle::VehiclePlugin)
            .add_plugins(hazards::HazardPlugin)
            .init_resource::<SimulationConfig>()
            .init_resource::<SimulationStats>()
            .add_event::<SimulationTick>()
            .configure_sets(Update, (SimulationSet::Tick, SimulationSet::Gameplay).chain())
            .add_systems(Update, simulation_tick_system.in_set(SimulationSet::Tick));
    }
}

/// Ordering for simulation systems within a frame.
#[derive(SystemSet, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SimulationSet {
    /// Emit this frame's ticks.
    Tick,
    /// Consume ticks and contacts.
    Gameplay,
}

/// Configuration for the simulation.
#[derive(Resource)]
pub struct SimulationConfig {
    /// Ticks per second for simulation updates.
    pub tick_rate: f32,
    /// Current simulation speed multiplier.
    pub speed: f32,
    /// Whether simulation is paused.
    pub paused: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            tick_rate: 20.0,
            speed: 1.0,
            paused: false,
        }
    }
}

/// Event sent each simulation tick (at tick_rate Hz).
#[derive(Event, Clone, Copy, Debug)]
pub struct SimulationTick {
    /// The tick number since simulation start.
    pub tick: u64,
    /// Delta time for this tick (1.0 / tick_rate).
    pub delta: f32,
}

/// Statistics about the simulation.
#[derive(Resource, Default)]
pub struct SimulationStats {
    /// Total ticks since simulation start.
    pub total_ticks: u64,
    /// Accumulated time for fixed timestep.
    pub accumulator: f32,
}

/// System that generates simulation ticks at fixed intervals.
fn simulation_tick_system(
    config: Res<SimulationConfig>,
    mut stats: ResMut<SimulationStats>,
    time: Res<Time>,
    mut tick_events: EventWriter<SimulationTick>,
) {
    if config.paused {
        return;
    }

    stats.accumulator += time.delta_secs() * config.speed;
    let tick_duration = 1.0 / config.tick_rate;

    // Process accumulated time, sending tick events
    while stats.accumulator >= tick_duration {
        stats.accumulator -= tick_duration;
        stats.total_ticks += 1;

        tick_events.send(SimulationTick {
            tick: stats.total_ticks,
            delta: tick_duration,
        });
    }
}
