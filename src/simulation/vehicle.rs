//! Car movement with a fuel and boost model.
//!
//! `step` is a pure integrator over one time slice. The ECS side feeds it
//! simulation ticks and the latest driver input, moves the car, and ends the
//! run once the car has stalled with an empty tank.

use bevy::prelude::*;

use super::{SimulationSet, SimulationTick};
use crate::game_state::GameState;
use crate::track::waypoint::PATH_FORWARD;

pub struct VehiclePlugin;

impl Plugin for VehiclePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<VehicleConfig>()
            .init_resource::<DriverInput>()
            .add_systems(
                Update,
                drive_cars
                    .in_set(SimulationSet::Gameplay)
                    .run_if(in_state(GameState::Racing)),
            );
    }
}

/// Tuning for speed, steering, and fuel use.
#[derive(Resource, Clone, Debug, PartialEq)]
pub struct VehicleConfig {
    /// Cruising speed while there is fuel.
    pub base_speed: f32,
    /// Extra speed at full throttle.
    pub boost_speed: f32,
    /// How fast boost moves towards its target (units/s²).
    pub boost_acceleration: f32,
    /// Turn rate at full steering lock (degrees/s).
    pub steering_rate: f32,
    pub max_fuel: f32,
    /// Fuel burned per second while moving.
    pub fuel_drain_normal: f32,
    /// Additional fuel burned per second at full boost.
    pub fuel_drain_boost: f32,
    /// How fast base speed decays once the tank is empty.
    pub stall_deceleration: f32,
    /// Gauge arc fill when empty.
    pub gauge_min_fill: f32,
    /// Gauge arc fill when full.
    pub gauge_max_fill: f32,
}

impl Default for VehicleConfig {
    fn default() -> Self {
        Self {
            base_speed: 5.0,
            boost_speed: 15.0,
            boost_acceleration: 10.0,
            steering_rate: 45.0,
            max_fuel: 100.0,
            fuel_drain_normal: 2.0,
            fuel_drain_boost: 8.0,
            stall_deceleration: 2.0,
            gauge_min_fill: 0.15,
            gauge_max_fill: 0.85,
        }
    }
}

/// Dynamic part of the car.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VehicleState {
    pub fuel: f32,
    pub boost: f32,
    pub base_speed: f32,
}

impl VehicleState {
    /// Full tank, no boost.
    pub fn new(config: &VehicleConfig) -> Self {
        Self {
            fuel: config.max_fuel,
            boost: 0.0,
            base_speed: config.base_speed,
        }
    }

    pub fn speed(&self) -> f32 {
        self.base_speed + self.boost
    }
}

/// Normalised controls for one step.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DriveInput {
    /// -1.0 (full left) to 1.0 (full right).
    pub steer: f32,
    /// 0.0 (released) to 1.0 (floored).
    pub throttle: f32,
}

/// Result of advancing the car by one time slice.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DriveStep {
    pub state: VehicleState,
    /// Speed used for this slice.
    pub speed: f32,
    /// Distance to travel along the car's forward axis.
    pub distance: f32,
    /// Rotation about +Y in radians.
    pub yaw: f32,
    /// Out of fuel and effectively stopped.
    pub stalled: bool,
}

/// Move `current` towards `target` by at most `max_delta`.
pub fn move_towards(current: f32, target: f32, max_delta: f32) -> f32 {
    let gap = target - current;
    if gap.abs() <= max_delta {
        target
    } else {
        current + gap.signum() * max_delta
    }
}

/// Map a raw pedal axis (1.0 released, -1.0 floored) to throttle in 0..1.
pub fn throttle_from_pedal(raw: f32) -> f32 {
    ((1.0 - raw) / 2.0).clamp(0.0, 1.0)
}

/// Advance the fuel/boost model by `dt` seconds.
pub fn step(state: VehicleState, dt: f32, input: DriveInput, config: &VehicleConfig) -> DriveStep {
    let has_fuel = state.fuel > 0.0;

    let target_boost = if has_fuel {
        input.throttle * config.boost_speed
    } else {
        0.0
    };
    let boost = move_towards(state.boost, target_boost, config.boost_acceleration * dt);

    let base_speed = if has_fuel {
        config.base_speed
    } else {
        move_towards(state.base_speed, 0.0, config.stall_deceleration * dt)
    };

    let speed = base_speed + boost;

    let mut fuel = state.fuel;
    if speed > 0.1 && has_fuel {
        let boost_fraction = if config.boost_speed > 0.0 {
            boost / config.boost_speed
        } else {
            0.0
        };
        let drain = config.fuel_drain_normal + boost_fraction * config.fuel_drain_boost;
        fuel = (fuel - drain * dt).clamp(0.0, config.max_fuel);
    }

    // Positive steer turns right, which is clockwise seen from above.
    let yaw = -input.steer * config.steering_rate.to_radians() * dt;

    DriveStep {
        state: VehicleState {
            fuel,
            boost,
            base_speed,
        },
        speed,
        distance: speed * dt,
        yaw,
        stalled: speed <= 0.01 && fuel <= 0.0,
    }
}

/// Fill of the fuel gauge arc for the given fuel level.
pub fn gauge_fill(fuel: f32, config: &VehicleConfig) -> f32 {
    let fraction = if config.max_fuel > 0.0 {
        (fuel / config.max_fuel).clamp(0.0, 1.0)
    } else {
        0.0
    };
    config.gauge_min_fill + (config.gauge_max_fill - config.gauge_min_fill) * fraction
}

/// The player's car.
#[derive(Component, Clone, Copy, Debug)]
#[require(Transform)]
pub struct Car {
    pub state: VehicleState,
}

impl Car {
    pub fn new(config: &VehicleConfig) -> Self {
        Self {
            state: VehicleState::new(config),
        }
    }
}

/// Latest controller readings, written by the input layer.
#[derive(Resource, Clone, Copy, Debug, PartialEq)]
pub struct DriverInput {
    /// Wheel axis, -1.0 to 1.0.
    pub steer: f32,
    /// Raw pedal axis: 1.0 released, -1.0 floored.
    pub pedal: f32,
    /// Submit button went down this frame.
    pub submit: bool,
}

impl Default for DriverInput {
    fn default() -> Self {
        Self {
            steer: 0.0,
            pedal: 1.0,
            submit: false,
        }
    }
}

impl DriverInput {
    pub fn drive_input(&self) -> DriveInput {
        DriveInput {
            steer: self.steer.clamp(-1.0, 1.0),
            throttle: throttle_from_pedal(self.pedal),
        }
    }
}

/// Fuel readout for the HUD. Only updated when the HUD inserts it.
#[derive(Resource, Clone, Copy, Debug, Default, PartialEq)]
pub struct FuelGauge {
    pub fuel: f32,
    pub fill: f32,
}

fn drive_cars(
    mut ticks: EventReader<SimulationTick>,
    input: Res<DriverInput>,
    config: Res<VehicleConfig>,
    mut cars: Query<(&mut Car, &mut Transform)>,
    gauge: Option<ResMut<FuelGauge>>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    let controls = input.drive_input();
    let mut latest = None;
    let mut stalled = false;

    for tick in ticks.read() {
        for (mut car, mut transform) in &mut cars {
            let result = step(car.state, tick.delta, controls, &config);
            car.state = result.state;

            let forward = transform.rotation * PATH_FORWARD;
            transform.translation += forward * result.distance;
            transform.rotate_y(result.yaw);

            debug!(
                "Fuel: {:.1}, speed: {:.2}, base speed: {:.2}",
                result.state.fuel, result.speed, result.state.base_speed
            );

            latest = Some(result.state);
            stalled |= result.stalled;
        }
    }

    if let (Some(mut gauge), Some(state)) = (gauge, latest) {
        gauge.fuel = state.fuel;
        gauge.fill = gauge_fill(state.fuel, &config);
    }

    if stalled {
        info!("Out of fuel, game over");
        next_state.set(GameState::GameOver);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_state::GameStatePlugin;
    use crate::simulation::{SimulationConfig, SimulationPlugin};

    const DT: f32 = 0.05;

    fn config() -> VehicleConfig {
        VehicleConfig::default()
    }

    #[test]
    fn pedal_mapping_matches_wheel_convention() {
        assert_eq!(throttle_from_pedal(1.0), 0.0);
        assert_eq!(throttle_from_pedal(0.0), 0.5);
        assert_eq!(throttle_from_pedal(-1.0), 1.0);
        assert_eq!(throttle_from_pedal(3.0), 0.0);
    }

    #[test]
    fn move_towards_never_overshoots() {
        assert_eq!(move_towards(0.0, 10.0, 3.0), 3.0);
        assert_eq!(move_towards(9.0, 10.0, 3.0), 10.0);
        assert_eq!(move_towards(5.0, 0.0, 2.0), 3.0);
    }

    #[test]
    fn boost_ramps_towards_throttle_target() {
        let config = config();
        let input = DriveInput {
            steer: 0.0,
            throttle: 1.0,
        };
        let mut state = VehicleState::new(&config);
        for _ in 0..10 {
            state = step(state, DT, input, &config).state;
        }
        // 10 steps of 0.5 units towards 15
        assert!((state.boost - 5.0).abs() < 1e-4);
        assert_eq!(state.base_speed, config.base_speed);
    }

    #[test]
    fn boosting_burns_more_fuel() {
        let config = config();
        let cruising = VehicleState::new(&config);
        let boosting = VehicleState {
            boost: config.boost_speed,
            ..cruising
        };
        let full = DriveInput {
            steer: 0.0,
            throttle: 1.0,
        };

        let cruise_step = step(cruising, 1.0, DriveInput::default(), &config);
        let boost_step = step(boosting, 1.0, full, &config);

        assert!((cruise_step.state.fuel - 98.0).abs() < 1e-4);
        assert!((boost_step.state.fuel - 90.0).abs() < 1e-4);
    }

    #[test]
    fn empty_tank_decays_to_a_stall() {
        let config = config();
        let mut state = VehicleState {
            fuel: 0.0,
            boost: 2.0,
            base_speed: config.base_speed,
        };
        let input = DriveInput {
            steer: 0.0,
            throttle: 1.0,
        };

        let mut stalled_after = None;
        for i in 0..200 {
            let result = step(state, DT, input, &config);
            state = result.state;
            if result.stalled {
                stalled_after = Some(i);
                break;
            }
        }
        let stalled_after = stalled_after.expect("car stalls");
        assert!(stalled_after > 0);
        assert_eq!(state.fuel, 0.0);
        assert!(state.speed() <= 0.01);
    }

    #[test]
    fn steering_right_rotates_clockwise() {
        let result = step(
            VehicleState::new(&config()),
            1.0,
            DriveInput {
                steer: 1.0,
                throttle: 0.0,
            },
            &config(),
        );
        assert!((result.yaw + 45f32.to_radians()).abs() < 1e-6);
    }

    #[test]
    fn fuel_never_drops_below_zero() {
        let config = config();
        let state = VehicleState {
            fuel: 0.01,
            ..VehicleState::new(&config)
        };
        let result = step(state, 1.0, DriveInput::default(), &config);
        assert_eq!(result.state.fuel, 0.0);
    }

    #[test]
    fn gauge_maps_fuel_onto_arc() {
        let config = config();
        assert!((gauge_fill(100.0, &config) - 0.85).abs() < 1e-6);
        assert!((gauge_fill(0.0, &config) - 0.15).abs() < 1e-6);
        assert!((gauge_fill(50.0, &config) - 0.5).abs() < 1e-6);
    }

    fn racing_app() -> App {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, GameStatePlugin, SimulationPlugin));
        app.world_mut()
            .resource_mut::<SimulationConfig>()
            .paused = true;
        app.world_mut()
            .resource_mut::<NextState<GameState>>()
            .set(GameState::Racing);
        app.update();
        app
    }

    #[test]
    fn car_moves_along_its_forward_axis() {
        let mut app = racing_app();
        let car = app
            .world_mut()
            .spawn(Car::new(&VehicleConfig::default()))
            .id();

        app.world_mut().send_event(SimulationTick { tick: 1, delta: 1.0 });
        app.update();

        let transform = app.world().get::<Transform>(car).expect("car transform");
        assert!(transform
            .translation
            .abs_diff_eq(Vec3::new(5.0, 0.0, 0.0), 1e-4));
    }

    #[test]
    fn hud_gauge_is_optional_and_updated_when_present() {
        let mut app = racing_app();
        app.world_mut().spawn(Car::new(&VehicleConfig::default()));

        // Without a gauge resource the car still drives
        app.world_mut().send_event(SimulationTick { tick: 1, delta: 1.0 });
        app.update();

        app.init_resource::<FuelGauge>();
        app.world_mut().send_event(SimulationTick { tick: 2, delta: 1.0 });
        app.update();

        let gauge = *app.world().resource::<FuelGauge>();
        assert!((gauge.fuel - 96.0).abs() < 1e-3);
        assert!((gauge.fill - gauge_fill(96.0, &VehicleConfig::default())).abs() < 1e-6);
    }

    #[test]
    fn stalled_car_ends_the_race() {
        let mut app = racing_app();
        app.world_mut().spawn(Car {
            state: VehicleState {
                fuel: 0.0,
                boost: 0.0,
                base_speed: 0.0,
            },
        });

        app.world_mut().send_event(SimulationTick { tick: 1, delta: DT });
        app.update();
        app.update();

        assert_eq!(
            *app.world().resource::<State<GameState>>().get(),
            GameState::GameOver
        );
    }
}
