//! Procedural road layout.
//!
//! Two modes share one result type:
//! - waypoint: straights are aimed along a jittered line of waypoints
//! - snap: each piece's entry anchor is glued to the previous exit anchor
//!
//! Either way a single turn may close the track. The layout itself is pure
//! data; `generator` turns it into entities.

use bevy::prelude::*;

pub mod generator;
pub mod layout;
pub mod snap;
pub mod template;
pub mod waypoint;

pub use generator::{
    ClearTrack, GenerateTrack, SpawnedPieces, Teardown, TrackGenerator, TrackLibrary, TrackPiece,
};
pub use layout::{
    generate_path, LayoutDiagnostic, LayoutError, LayoutMode, PlacedSegment, TrackLayout,
};
pub use snap::SnapConfig;
pub use template::{Pose, SegmentKind, SegmentTemplate, TemplateId, TemplateLibrary};
pub use waypoint::WaypointConfig;

pub struct TrackPlugin;

impl Plugin for TrackPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(generator::TrackGeneratorPlugin);
    }
}
