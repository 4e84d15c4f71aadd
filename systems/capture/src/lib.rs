#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Capture engine that turns a ride built in the world into a portable
//! [`TrackDesign`].
//!
//! Track rides are walked piece by piece from the start of their track; mazes
//! are collected with a raster scan. Both variants are then outlined through
//! the placement engine to find the touched tiles and the footprint, and the
//! scenery standing on those tiles is recorded relative to the same origin.

use std::{collections::BTreeSet, fmt};

use thiserror::Error;
use tracing::debug;
use track_design_core::{
    CoordsXYZ, Direction, NormalizeError, RideId, TileCoordsXY, TrackDesign, MAX_TRACK_ELEMENTS,
};
use track_design_system_placement::{
    place, Operation, PlacementError, PlacementRequest, PlacementTarget,
};

mod maze;
mod metadata;
mod scenery;
mod track;

/// Tunables of a capture call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CaptureConfig {
    /// Largest number of track pieces a design may hold.
    pub max_track_elements: usize,
    /// Whether scenery on the touched tiles is recorded.
    pub include_scenery: bool,
    /// Further tiles whose scenery is recorded along with the ride.
    pub extra_scenery_tiles: Vec<TileCoordsXY>,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            max_track_elements: MAX_TRACK_ELEMENTS,
            include_scenery: true,
            extra_scenery_tiles: Vec::new(),
        }
    }
}

/// Element collection bounded by a cap.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CappedCollection {
    /// Track pieces.
    TrackElements,
    /// Maze cells and huts.
    MazeElements,
}

impl fmt::Display for CappedCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CappedCollection::TrackElements => f.write_str("track elements"),
            CappedCollection::MazeElements => f.write_str("maze elements"),
        }
    }
}

/// Part of a ride a capture cannot do without.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RequiredElement {
    /// The ride itself.
    Ride,
    /// At least one track piece or maze cell.
    Track,
    /// The entrance of the first station.
    Entrance,
    /// The exit of the first station.
    Exit,
}

impl fmt::Display for RequiredElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            RequiredElement::Ride => "ride",
            RequiredElement::Track => "track",
            RequiredElement::Entrance => "entrance",
            RequiredElement::Exit => "exit",
        };
        f.write_str(text)
    }
}

/// Reasons a capture call produces no design.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum CaptureError {
    /// A relative coordinate left the storable window.
    #[error("design does not fit the coordinate window: {0}")]
    EncodingOverflow(#[from] NormalizeError),
    /// A collection grew past its cap.
    #[error("more than {limit} {collection}")]
    ElementCapExceeded {
        /// Collection that overflowed.
        collection: CappedCollection,
        /// Cap in force.
        limit: usize,
    },
    /// The ride lacks something every design needs.
    #[error("ride has no {0}")]
    RequiredElementMissing(RequiredElement),
    /// The outline pass over the captured elements failed.
    #[error("outline of the captured ride failed: {0}")]
    Outline(#[from] PlacementError),
}

impl CaptureError {
    /// Message shown to players, which does not tell the causes apart.
    #[must_use]
    pub const fn user_message(&self) -> &'static str {
        "track too large or too much scenery"
    }
}

/// Anchor of a captured design in the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Origin {
    pub(crate) location: CoordsXYZ,
    pub(crate) direction: Direction,
}

/// Design produced by [`capture`], with where it was taken from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CapturedDesign {
    /// The design record.
    pub design: TrackDesign,
    /// Begin point of the first piece, or the first maze tile.
    pub origin: CoordsXYZ,
    /// Direction of the origin piece; placing with it rebuilds the ride in place.
    pub direction: Direction,
    /// Tiles covered by the outline of the captured elements.
    pub touched_tiles: BTreeSet<TileCoordsXY>,
}

/// Captures ride `ride` of `world` into a design record.
pub fn capture<W: PlacementTarget + ?Sized>(
    world: &W,
    ride: RideId,
    config: &CaptureConfig,
) -> Result<CapturedDesign, CaptureError> {
    let ride = world
        .ride(ride)
        .ok_or(CaptureError::RequiredElementMissing(RequiredElement::Ride))?;
    let mut design = metadata::design_for(ride);

    let origin = if ride.ride_type.is_maze() {
        maze::capture_maze(world, ride, &mut design)?
    } else {
        track::capture_track(world, ride, config, &mut design)?
    };

    let request = PlacementRequest::new(origin.location, origin.direction, ride.id);
    let outline = place(&design, Operation::<W>::DrawOutlines, &request)?;
    let (span_x, span_y) = outline.space_required();
    design.space_required_x = u8::try_from(span_x).unwrap_or(u8::MAX);
    design.space_required_y = u8::try_from(span_y).unwrap_or(u8::MAX);

    if config.include_scenery {
        let tiles = outline
            .selection
            .iter()
            .chain(&config.extra_scenery_tiles)
            .copied()
            .collect::<BTreeSet<_>>();
        scenery::capture_scenery(world, origin, &tiles, &mut design)?;
    }

    debug!(
        ride = ride.id.get(),
        origin = ?origin.location,
        direction = ?origin.direction,
        track = design.track_elements.len(),
        huts = design.entrance_elements.len(),
        maze = design.maze_elements.len(),
        scenery = design.scenery_elements.len(),
        "ride captured"
    );
    Ok(CapturedDesign {
        design,
        origin: origin.location,
        direction: origin.direction,
        touched_tiles: outline.selection,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use track_design_core::Axis;

    #[test]
    fn default_config_uses_the_record_cap() {
        let config = CaptureConfig::default();
        assert_eq!(config.max_track_elements, MAX_TRACK_ELEMENTS);
        assert!(config.include_scenery);
        assert!(config.extra_scenery_tiles.is_empty());
    }

    #[test]
    fn every_cause_shares_one_player_message() {
        let errors = [
            CaptureError::EncodingOverflow(NormalizeError::EncodingOverflow {
                axis: Axis::X,
                value: 128,
            }),
            CaptureError::ElementCapExceeded {
                collection: CappedCollection::TrackElements,
                limit: 3,
            },
            CaptureError::RequiredElementMissing(RequiredElement::Exit),
        ];
        for error in errors {
            assert_eq!(error.user_message(), "track too large or too much scenery");
        }
    }

    #[test]
    fn internal_messages_keep_the_cause() {
        let error = CaptureError::ElementCapExceeded {
            collection: CappedCollection::MazeElements,
            limit: 2000,
        };
        assert_eq!(error.to_string(), "more than 2000 maze elements");
        assert_eq!(
            CaptureError::RequiredElementMissing(RequiredElement::Entrance).to_string(),
            "ride has no entrance"
        );
    }
}
