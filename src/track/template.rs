//! Segment templates: the geometric footprint of each road piece.
//!
//! Templates stand in for prefab assets. The layout engine only needs their
//! bounding depth, scale, and (for snap chaining) named anchor points.

use std::fmt;

use bevy::prelude::*;
use rand::Rng;
use smallvec::SmallVec;

use super::layout::LayoutError;

/// Anchor shared by entry and exit on straight pieces.
pub const SNAP_POINT: &str = "SnapPoint";
/// Entry anchor on turn pieces.
pub const SNAP_ENTRY: &str = "SnapPointEntry";
/// Exit anchor on turn pieces.
pub const SNAP_EXIT: &str = "SnapPointExit";

/// Footprint length used when a template declares no geometry.
pub const DEFAULT_FOOTPRINT_LENGTH: f32 = 1.0;

/// Local axis along which template geometry extends.
pub const TEMPLATE_FORWARD: Vec3 = Vec3::Z;

/// A position plus orientation, in either local or world space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pose {
    pub position: Vec3,
    pub rotation: Quat,
}

impl Pose {
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
    };

    pub fn new(position: Vec3, rotation: Quat) -> Self {
        Self { position, rotation }
    }

    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            rotation: Quat::IDENTITY,
        }
    }

    /// Map a local-space point into this pose's space.
    pub fn transform_point(&self, local: Vec3) -> Vec3 {
        self.position + self.rotation * local
    }

    /// Express a child pose (given relative to `self`) in `self`'s parent space.
    pub fn compose(&self, local: &Pose) -> Pose {
        Pose {
            position: self.transform_point(local.position),
            rotation: self.rotation * local.rotation,
        }
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl From<Transform> for Pose {
    fn from(transform: Transform) -> Self {
        Self::new(transform.translation, transform.rotation)
    }
}

impl From<Pose> for Transform {
    fn from(pose: Pose) -> Self {
        Transform::from_translation(pose.position).with_rotation(pose.rotation)
    }
}

/// Identifier resolving to an external piece asset.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TemplateId(pub String);

impl From<&str> for TemplateId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl From<String> for TemplateId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SegmentKind {
    Straight,
    Turn,
}

/// A named attachment point in template-local space.
#[derive(Clone, Debug, PartialEq)]
pub struct NamedAnchor {
    pub name: String,
    pub local: Pose,
}

/// A road piece the generators can place.
#[derive(Clone, Debug, PartialEq)]
pub struct SegmentTemplate {
    pub id: TemplateId,
    pub kind: SegmentKind,
    /// Unscaled bounding box size of the piece mesh, if any.
    pub bounds: Option<Vec3>,
    /// Scale the piece is instantiated with.
    pub scale: Vec3,
    pub anchors: SmallVec<[NamedAnchor; 2]>,
}

impl SegmentTemplate {
    pub fn new(id: impl Into<TemplateId>, kind: SegmentKind) -> Self {
        Self {
            id: id.into(),
            kind,
            bounds: None,
            scale: Vec3::ONE,
            anchors: SmallVec::new(),
        }
    }

    pub fn straight(id: impl Into<TemplateId>) -> Self {
        Self::new(id, SegmentKind::Straight)
    }

    pub fn turn(id: impl Into<TemplateId>) -> Self {
        Self::new(id, SegmentKind::Turn)
    }

    pub fn with_bounds(mut self, size: Vec3) -> Self {
        self.bounds = Some(size);
        self
    }

    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_anchor(mut self, name: &str, local: Pose) -> Self {
        self.anchors.push(NamedAnchor {
            name: name.to_owned(),
            local,
        });
        self
    }

    /// Length of the piece along its local forward axis, after scaling.
    pub fn footprint_length(&self) -> f32 {
        match self.bounds {
            Some(size) => size.z * self.scale.z,
            None => DEFAULT_FOOTPRINT_LENGTH,
        }
    }

    /// Distance from the pivot to the front face (half the footprint).
    pub fn forward_extent(&self) -> f32 {
        self.footprint_length() / 2.0
    }

    pub fn anchor(&self, name: &str) -> Option<&Pose> {
        self.anchors
            .iter()
            .find(|anchor| anchor.name == name)
            .map(|anchor| &anchor.local)
    }
}

/// The straight and turn pieces available to a generator.
#[derive(Clone, Debug, Default)]
pub struct TemplateLibrary {
    straights: Vec<SegmentTemplate>,
    turns: Vec<SegmentTemplate>,
}

impl TemplateLibrary {
    /// Sort templates into the straight and turn sets by their kind.
    pub fn new(templates: impl IntoIterator<Item = SegmentTemplate>) -> Self {
        let (straights, turns) = templates
            .into_iter()
            .partition(|template| template.kind == SegmentKind::Straight);
        Self { straights, turns }
    }

    pub fn straights(&self) -> &[SegmentTemplate] {
        &self.straights
    }

    pub fn turns(&self) -> &[SegmentTemplate] {
        &self.turns
    }

    pub fn has_turns(&self) -> bool {
        !self.turns.is_empty()
    }

    /// A library is usable once it has at least one straight piece.
    pub fn validate(&self) -> Result<(), LayoutError> {
        if self.straights.is_empty() {
            return Err(LayoutError::NoStraightTemplates);
        }
        Ok(())
    }

    pub(crate) fn pick_straight(&self, rng: &mut impl Rng) -> &SegmentTemplate {
        &self.straights[rng.gen_range(0..self.straights.len())]
    }

    pub(crate) fn pick_turn(&self, rng: &mut impl Rng) -> &SegmentTemplate {
        &self.turns[rng.gen_range(0..self.turns.len())]
    }
}
