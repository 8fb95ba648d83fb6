//! Layout results shared by both generator modes.

use std::fmt;

use bevy::prelude::*;
use rand::Rng;
use thiserror::Error;

use super::snap::{layout_snap_path, SnapConfig};
use super::template::{Pose, SegmentKind, SegmentTemplate, TemplateId, TemplateLibrary};
use super::waypoint::{layout_waypoint_path, WaypointConfig};

/// Configuration problems detected before any piece is placed.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum LayoutError {
    #[error("template library has no straight segments")]
    NoStraightTemplates,

    #[error("turn chance {0} is outside [0, 1]")]
    TurnChanceOutOfRange(f32),

    #[error("waypoint noise {0} is not a finite jitter span")]
    NoiseOutOfRange(f32),
}

/// Non-fatal problems that cut a layout short.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LayoutDiagnostic {
    MissingAnchor {
        template: TemplateId,
        kind: SegmentKind,
        anchor: &'static str,
    },
}

impl fmt::Display for LayoutDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayoutDiagnostic::MissingAnchor {
                template,
                kind,
                anchor,
            } => write!(f, "{kind:?} template '{template}' is missing anchor '{anchor}'"),
        }
    }
}

/// One road piece placed in world space.
#[derive(Clone, Debug, PartialEq)]
pub struct PlacedSegment {
    pub index: usize,
    pub template: TemplateId,
    pub kind: SegmentKind,
    pub position: Vec3,
    pub rotation: Quat,
}

impl PlacedSegment {
    pub fn pose(&self) -> Pose {
        Pose::new(self.position, self.rotation)
    }
}

/// Ordered output of one generation run.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TrackLayout {
    segments: Vec<PlacedSegment>,
    diagnostics: Vec<LayoutDiagnostic>,
}

impl TrackLayout {
    pub fn segments(&self) -> &[PlacedSegment] {
        &self.segments
    }

    pub fn diagnostics(&self) -> &[LayoutDiagnostic] {
        &self.diagnostics
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn last(&self) -> Option<&PlacedSegment> {
        self.segments.last()
    }

    pub fn turn_count(&self) -> usize {
        self.segments
            .iter()
            .filter(|segment| segment.kind == SegmentKind::Turn)
            .count()
    }

    /// Whether generation stopped early on a diagnostic.
    pub fn was_aborted(&self) -> bool {
        !self.diagnostics.is_empty()
    }

    /// Release every placed segment. Returns how many were released.
    pub fn clear(&mut self) -> usize {
        let released = self.segments.len();
        self.segments.clear();
        self.diagnostics.clear();
        released
    }

    /// Append a piece; its index is its position in the sequence.
    pub(crate) fn place(&mut self, template: &SegmentTemplate, pose: Pose) -> &PlacedSegment {
        let index = self.segments.len();
        self.segments.push(PlacedSegment {
            index,
            template: template.id.clone(),
            kind: template.kind,
            position: pose.position,
            rotation: pose.rotation,
        });
        &self.segments[index]
    }

    pub(crate) fn report(&mut self, diagnostic: LayoutDiagnostic) {
        warn!("Track layout stopped early: {}", diagnostic);
        self.diagnostics.push(diagnostic);
    }
}

impl IntoIterator for TrackLayout {
    type Item = PlacedSegment;
    type IntoIter = std::vec::IntoIter<PlacedSegment>;

    fn into_iter(self) -> Self::IntoIter {
        self.segments.into_iter()
    }
}

/// The two generator variants. They are different algorithms and stay separate.
#[derive(Clone, Debug, PartialEq)]
pub enum LayoutMode {
    /// Walk precomputed waypoints, measuring pieces by their footprint.
    Waypoint(WaypointConfig),
    /// Chain pieces by aligning entry anchors to the previous exit anchor.
    Snap(SnapConfig),
}

impl LayoutMode {
    pub fn turn_chance(&self) -> f32 {
        match self {
            LayoutMode::Waypoint(config) => config.turn_chance,
            LayoutMode::Snap(config) => config.turn_chance,
        }
    }

    /// Same mode, starting from a different origin.
    pub fn with_origin(&self, origin: Pose) -> Self {
        match self {
            LayoutMode::Waypoint(config) => LayoutMode::Waypoint(WaypointConfig {
                origin,
                ..config.clone()
            }),
            LayoutMode::Snap(config) => LayoutMode::Snap(SnapConfig {
                origin,
                ..config.clone()
            }),
        }
    }
}

impl Default for LayoutMode {
    fn default() -> Self {
        LayoutMode::Waypoint(WaypointConfig::default())
    }
}

pub(crate) fn validate(library: &TemplateLibrary, turn_chance: f32) -> Result<(), LayoutError> {
    library.validate()?;
    if !(0.0..=1.0).contains(&turn_chance) {
        return Err(LayoutError::TurnChanceOutOfRange(turn_chance));
    }
    Ok(())
}

/// Jitter is drawn from `[-noise, noise]`, so the full span must be finite.
pub(crate) fn validate_noise(noise: f32) -> Result<(), LayoutError> {
    if !(2.0 * noise).is_finite() {
        return Err(LayoutError::NoiseOutOfRange(noise));
    }
    Ok(())
}

/// Generate a track layout in the given mode.
///
/// The result depends only on the inputs and the state of `rng`, so a seeded
/// rng reproduces the same layout.
pub fn generate_path(
    mode: &LayoutMode,
    library: &TemplateLibrary,
    rng: &mut impl Rng,
) -> Result<TrackLayout, LayoutError> {
    match mode {
        LayoutMode::Waypoint(config) => layout_waypoint_path(config, library, rng),
        LayoutMode::Snap(config) => layout_snap_path(config, library, rng),
    }
}
