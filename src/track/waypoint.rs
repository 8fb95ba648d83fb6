//! Waypoint-walk track layout.
//!
//! Lays straight pieces along a line of precomputed waypoints, measuring each
//! piece by its footprint. The first turn ends the walk.

use std::f32::consts::FRAC_PI_2;

use bevy::prelude::*;
use rand::Rng;

use super::layout::{validate, validate_noise, LayoutError, TrackLayout};
use super::template::{Pose, SegmentTemplate, TemplateLibrary, TEMPLATE_FORWARD};

/// Direction the path heads from an unrotated origin.
pub const PATH_FORWARD: Vec3 = Vec3::X;

/// Yaw that turns template forward (+Z) onto the path forward (+X).
pub const STRAIGHT_YAW: f32 = FRAC_PI_2;

/// Settings for the waypoint walk.
#[derive(Clone, Debug, PartialEq)]
pub struct WaypointConfig {
    /// Where the path starts and which way it heads.
    pub origin: Pose,
    /// Number of waypoint-to-waypoint steps, i.e. the most pieces placed.
    pub segment_count: usize,
    /// Distance between consecutive waypoints.
    pub spacing: f32,
    /// Amplitude of uniform vertical jitter applied to each waypoint.
    pub noise: f32,
    /// Extra gap left after each straight piece.
    pub piece_spacing: f32,
    /// Probability of swapping a straight for a turn (0.0-1.0).
    pub turn_chance: f32,
    /// Local-space offset from piece origin to mesh pivot.
    pub pivot_offset: Vec3,
    /// Orientation given to every turn piece.
    pub turn_rotation: Quat,
}

impl Default for WaypointConfig {
    fn default() -> Self {
        Self {
            origin: Pose::IDENTITY,
            segment_count: 24,
            spacing: 5.0,
            noise: 0.0,
            piece_spacing: 0.0,
            turn_chance: 0.2,
            pivot_offset: Vec3::ZERO,
            turn_rotation: default_turn_rotation(),
        }
    }
}

/// Turn meshes are authored lying on their back; stand them up facing the path.
pub fn default_turn_rotation() -> Quat {
    Quat::from_euler(EulerRot::YXZ, STRAIGHT_YAW, -FRAC_PI_2, 0.0)
}

/// Orientation for a straight heading along `direction`, yaw pinned to the canonical value.
pub fn straight_rotation(direction: Vec3) -> Quat {
    let pitch = -direction.y.clamp(-1.0, 1.0).asin();
    Quat::from_euler(EulerRot::YXZ, STRAIGHT_YAW, pitch, 0.0)
}

/// Waypoints along the origin's forward direction, `segment_count + 1` of them.
pub fn generate_waypoints(config: &WaypointConfig, rng: &mut impl Rng) -> Vec<Vec3> {
    let direction = config.origin.rotation * PATH_FORWARD;

    (0..=config.segment_count)
        .map(|i| {
            let mut point = config.origin.position + direction * (i as f32 * config.spacing);
            if config.noise > 0.0 {
                point.y += rng.gen_range(-config.noise..=config.noise);
            }
            point
        })
        .collect()
}

pub fn layout_waypoint_path(
    config: &WaypointConfig,
    library: &TemplateLibrary,
    rng: &mut impl Rng,
) -> Result<TrackLayout, LayoutError> {
    validate(library, config.turn_chance)?;
    validate_noise(config.noise)?;

    let waypoints = generate_waypoints(config, rng);
    let mut layout = TrackLayout::default();
    let Some(&start) = waypoints.first() else {
        return Ok(layout);
    };

    let fallback_direction = config.origin.rotation * PATH_FORWARD;
    let mut cursor = start;
    let mut last_straight: Option<(&SegmentTemplate, Pose)> = None;

    for &next in waypoints.iter().skip(1) {
        let direction = (next - cursor)
            .try_normalize()
            .unwrap_or(fallback_direction);

        // The roll happens before checking for a previous piece, so the rng
        // advances the same way whether or not a turn can be placed.
        let wants_turn = library.has_turns() && rng.gen::<f32>() < config.turn_chance;

        if let Some((previous, previous_pose)) = last_straight.filter(|_| wants_turn) {
            let turn = library.pick_turn(rng);

            let front = previous_pose.position
                + previous_pose.rotation * TEMPLATE_FORWARD * previous.forward_extent();
            let rotation = config.turn_rotation;
            let position = front + rotation * config.pivot_offset;

            layout.place(turn, Pose::new(position, rotation));
            break;
        }

        let straight = library.pick_straight(rng);
        let rotation = straight_rotation(direction);
        let pose = Pose::new(cursor + rotation * config.pivot_offset, rotation);
        layout.place(straight, pose);
        last_straight = Some((straight, pose));

        cursor += direction * (straight.footprint_length() + config.piece_spacing);
    }

    Ok(layout)
}
