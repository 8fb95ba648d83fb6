//! Snap-point track layout.
//!
//! Each piece's entry anchor is aligned to the previous piece's exit anchor.
//! Pieces keep the orientation of the anchor they attach to; only positions
//! chain. Placing a turn ends the track.

use bevy::prelude::*;
use rand::Rng;

use super::layout::{validate, LayoutDiagnostic, LayoutError, TrackLayout};
use super::template::{
    Pose, SegmentKind, SegmentTemplate, TemplateLibrary, SNAP_ENTRY, SNAP_EXIT, SNAP_POINT,
};

/// Settings for snap chaining.
#[derive(Clone, Debug, PartialEq)]
pub struct SnapConfig {
    /// Generator pose; its height is replaced by `ground_y`.
    pub origin: Pose,
    /// Upper bound on pieces placed.
    pub max_segments: usize,
    /// Height every piece is flattened to.
    pub ground_y: f32,
    /// Probability of placing a turn instead of a straight (0.0-1.0).
    pub turn_chance: f32,
    /// World-space offset added to every placement.
    pub pivot_offset: Vec3,
}

impl Default for SnapConfig {
    fn default() -> Self {
        Self {
            origin: Pose::IDENTITY,
            max_segments: 20,
            ground_y: 0.0,
            turn_chance: 0.2,
            pivot_offset: Vec3::ZERO,
        }
    }
}

/// Entry and exit anchors a template attaches with.
///
/// Straights use their single snap point for both ends; turns need distinct
/// entry and exit points.
pub fn snap_anchors(template: &SegmentTemplate) -> Result<(Pose, Pose), LayoutDiagnostic> {
    let find = |name: &'static str| {
        template
            .anchor(name)
            .copied()
            .ok_or_else(|| LayoutDiagnostic::MissingAnchor {
                template: template.id.clone(),
                kind: template.kind,
                anchor: name,
            })
    };

    match template.kind {
        SegmentKind::Straight => find(SNAP_POINT).map(|snap| (snap, snap)),
        SegmentKind::Turn => Ok((find(SNAP_ENTRY)?, find(SNAP_EXIT)?)),
    }
}

/// Chain pieces from the origin until `max_segments`, a turn, or a missing anchor.
///
/// A straight without a snap point ends the track like any other missing
/// anchor; it is not skipped.
pub fn layout_snap_path(
    config: &SnapConfig,
    library: &TemplateLibrary,
    rng: &mut impl Rng,
) -> Result<TrackLayout, LayoutError> {
    validate(library, config.turn_chance)?;

    let mut layout = TrackLayout::default();
    let origin = config.origin.position;
    let mut last_exit = Pose::new(
        Vec3::new(origin.x, config.ground_y, origin.z),
        config.origin.rotation,
    );

    for _ in 0..config.max_segments {
        let spawn_turn = library.has_turns() && rng.gen::<f32>() < config.turn_chance;
        let template = if spawn_turn {
            library.pick_turn(rng)
        } else {
            library.pick_straight(rng)
        };

        let (entry, exit) = match snap_anchors(template) {
            Ok(anchors) => anchors,
            Err(diagnostic) => {
                layout.report(diagnostic);
                break;
            }
        };

        let rotation = last_exit.rotation;
        let mut position = last_exit.position - rotation * entry.position + config.pivot_offset;
        position.y = config.ground_y;

        let placed = Pose::new(position, rotation);
        layout.place(template, placed);
        last_exit = placed.compose(&exit);

        if spawn_turn {
            break;
        }
    }

    Ok(layout)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};
    use std::f32::consts::FRAC_PI_2;

    fn straight(id: &str, snap_z: f32) -> SegmentTemplate {
        SegmentTemplate::straight(id)
            .with_anchor(SNAP_POINT, Pose::from_position(Vec3::new(0.0, 0.0, snap_z)))
    }

    fn corner() -> SegmentTemplate {
        SegmentTemplate::turn("corner")
            .with_anchor(SNAP_ENTRY, Pose::from_position(Vec3::new(0.0, 0.0, -3.0)))
            .with_anchor(
                SNAP_EXIT,
                Pose::new(Vec3::new(3.0, 0.0, 0.0), Quat::from_rotation_y(-FRAC_PI_2)),
            )
    }

    fn library() -> TemplateLibrary {
        TemplateLibrary::new([straight("short", 2.5), straight("long", 4.0), corner()])
    }

    fn entry_world(segment: &crate::track::PlacedSegment, template: &SegmentTemplate) -> Vec3 {
        let (entry, _) = snap_anchors(template).expect("anchors present");
        segment.pose().transform_point(entry.position)
    }

    fn exit_world(segment: &crate::track::PlacedSegment, template: &SegmentTemplate) -> Vec3 {
        let (_, exit) = snap_anchors(template).expect("anchors present");
        segment.pose().transform_point(exit.position)
    }

    fn template_for<'a>(
        library: &'a TemplateLibrary,
        segment: &crate::track::PlacedSegment,
    ) -> &'a SegmentTemplate {
        library
            .straights()
            .iter()
            .chain(library.turns())
            .find(|t| t.id == segment.template)
            .expect("placed template comes from the library")
    }

    #[test]
    fn consecutive_pieces_share_anchor_positions() {
        let library = library();
        let config = SnapConfig {
            origin: Pose::new(Vec3::new(3.0, 0.0, -1.0), Quat::from_rotation_y(0.4)),
            max_segments: 15,
            turn_chance: 0.25,
            ..default()
        };
        for seed in 0..64 {
            let layout = layout_snap_path(&config, &library, &mut StdRng::seed_from_u64(seed))
                .expect("valid configuration");
            for pair in layout.segments().windows(2) {
                let exit = exit_world(&pair[0], template_for(&library, &pair[0]));
                let entry = entry_world(&pair[1], template_for(&library, &pair[1]));
                assert!(exit.abs_diff_eq(entry, 1e-4), "seed {seed}: {exit} vs {entry}");
            }
        }
    }

    #[test]
    fn pivot_offset_strides_single_anchor_straights() {
        let library = TemplateLibrary::new([straight("short", 2.5)]);
        let config = SnapConfig {
            max_segments: 3,
            pivot_offset: Vec3::new(5.0, 0.0, 0.0),
            ..default()
        };
        let layout = layout_snap_path(&config, &library, &mut StdRng::seed_from_u64(0))
            .expect("valid configuration");
        let positions: Vec<Vec3> = layout.segments().iter().map(|s| s.position).collect();
        let expected = [5.0, 10.0, 15.0].map(|x| Vec3::new(x, 0.0, -2.5));
        assert_eq!(positions.len(), 3);
        for (actual, expected) in positions.iter().zip(expected) {
            assert!(actual.abs_diff_eq(expected, 1e-4), "{actual} != {expected}");
        }
    }

    #[test]
    fn at_most_one_turn_and_always_last() {
        let library = library();
        let config = SnapConfig {
            max_segments: 40,
            turn_chance: 0.1,
            ..default()
        };
        for seed in 0..64 {
            let layout = layout_snap_path(&config, &library, &mut StdRng::seed_from_u64(seed))
                .expect("valid configuration");
            assert!(layout.turn_count() <= 1);
            if layout.turn_count() == 1 {
                assert_eq!(layout.last().map(|s| s.kind), Some(SegmentKind::Turn));
            }
        }
    }

    #[test]
    fn certain_turn_ends_track_immediately() {
        let config = SnapConfig {
            turn_chance: 1.0,
            ..default()
        };
        let layout = layout_snap_path(&config, &library(), &mut StdRng::seed_from_u64(2))
            .expect("valid configuration");
        assert_eq!(layout.len(), 1);
        assert_eq!(layout.segments()[0].kind, SegmentKind::Turn);
    }

    #[test]
    fn without_turn_templates_every_piece_is_straight() {
        let library = TemplateLibrary::new([straight("short", 2.5)]);
        let config = SnapConfig {
            max_segments: 7,
            turn_chance: 1.0,
            ..default()
        };
        let layout = layout_snap_path(&config, &library, &mut StdRng::seed_from_u64(5))
            .expect("valid configuration");
        assert_eq!(layout.len(), 7);
        assert_eq!(layout.turn_count(), 0);
    }

    #[test]
    fn pieces_are_flattened_to_ground_and_keep_origin_rotation() {
        let rotation = Quat::from_rotation_y(1.2);
        let config = SnapConfig {
            origin: Pose::new(Vec3::new(0.0, 7.0, 0.0), rotation),
            ground_y: 0.5,
            max_segments: 4,
            turn_chance: 0.0,
            ..default()
        };
        let layout = layout_snap_path(&config, &library(), &mut StdRng::seed_from_u64(8))
            .expect("valid configuration");
        assert!(layout.segments().iter().all(|s| s.position.y == 0.5));
        assert!(layout.segments().iter().all(|s| s.rotation == rotation));
    }

    #[test]
    fn straight_without_snap_point_aborts_with_diagnostic() {
        let library = TemplateLibrary::new([SegmentTemplate::straight("bare")]);
        let mut rng = StdRng::seed_from_u64(0);
        let layout = layout_snap_path(&SnapConfig::default(), &library, &mut rng)
            .expect("missing anchors are not configuration errors");
        assert!(layout.is_empty());
        assert_eq!(
            layout.diagnostics(),
            &[LayoutDiagnostic::MissingAnchor {
                template: "bare".into(),
                kind: SegmentKind::Straight,
                anchor: SNAP_POINT,
            }]
        );
    }

    #[test]
    fn turn_missing_exit_keeps_pieces_placed_so_far() {
        let broken_turn = SegmentTemplate::turn("broken")
            .with_anchor(SNAP_ENTRY, Pose::from_position(Vec3::new(0.0, 0.0, -3.0)));
        let library = TemplateLibrary::new([straight("short", 2.5), broken_turn]);
        let config = SnapConfig {
            max_segments: 20,
            turn_chance: 0.5,
            ..default()
        };

        let mut saw_partial = false;
        for seed in 0..32 {
            let layout = layout_snap_path(&config, &library, &mut StdRng::seed_from_u64(seed))
                .expect("valid configuration");
            assert_eq!(layout.turn_count(), 0);
            if layout.was_aborted() {
                assert!(matches!(
                    layout.diagnostics()[0],
                    LayoutDiagnostic::MissingAnchor { anchor: SNAP_EXIT, .. }
                ));
                saw_partial |= !layout.is_empty();
            }
        }
        assert!(saw_partial);
    }
}
