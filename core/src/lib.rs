#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the track design engine.
//!
//! This crate defines the vocabulary that connects the authoritative world,
//! the capture/placement systems and the adapters. Systems read the world
//! through [`WorldQuery`], express every mutation as an [`Action`] handed to an
//! [`ActionExecutor`], and exchange built rides as origin-relative
//! [`TrackDesign`] records whose coordinates are produced by the
//! [`normalize`] functions.

mod action;
mod coords;
mod design;
pub mod graph;
pub mod normalize;
mod objects;
mod orientation;
mod tile;
mod track;
mod view;

pub use action::{
    Action, ActionExecutor, ActionFlags, ActionResult, Money, RejectReason,
    TrackPlacementSettings,
};
pub use coords::{
    BoundingBox, CoordsXY, CoordsXYZ, Direction, TileCoordsXY, COORDS_XY_STEP, COORDS_Z_STEP,
    LAND_HEIGHT_STEP,
};
pub use design::{
    DesignFlags, DesignStatistics, MazeElement, MazeEntry, TrackDesign,
    TrackDesignEntranceElement, TrackDesignSceneryElement, TrackDesignTrackElement,
    MAX_MAZE_ELEMENTS, MAX_TRACK_ELEMENTS,
};
pub use normalize::{Axis, NormalizeError, RelativeTile};
pub use objects::{
    LargeSceneryTile, ObjectCategory, ObjectIndex, ObjectReference, ObjectResolver, ObjectShape,
    ResolvedObject, SmallSceneryShape,
};
pub use orientation::{
    EdgeMask, GenericSceneryOrientation, PathOrientation, SceneryOrientation, WallOrientation,
};
pub use tile::{
    surface_height, EntranceElement, EntranceKind, EntranceLocation, LargeSceneryElement,
    OperatingSettings, PathElement, Ride, RideId, RideMeasurements, RideType, Slope,
    SmallSceneryElement, Station, StationIndex, SurfaceElement, TileElement, TileElementKind,
    TrackColour, TrackElement, VehicleColour, WallElement, MAX_STATIONS_PER_RIDE,
    NUM_COLOUR_SCHEMES,
};
pub use track::{TrackBlock, TrackCoordinates, TrackDescriptor, TrackFlags, TrackPiece};
pub use view::{translate_3d_to_2d, PreviewHost, PreviewRenderer, Viewport, WorldQuery};

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_round_trip<T>(value: &T)
    where
        T: serde::Serialize + serde::de::DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let decoded: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&decoded, value);
    }

    #[test]
    fn ride_id_round_trips_through_bincode() {
        assert_round_trip(&RideId::new(7));
    }

    #[test]
    fn action_round_trips_through_bincode() {
        assert_round_trip(&Action::PlaceTrack {
            ride: RideId::new(3),
            piece: TrackPiece::Up25,
            location: CoordsXYZ::new(320, 288, 48),
            direction: Direction::South,
            settings: TrackPlacementSettings {
                chain_lift: true,
                ..TrackPlacementSettings::default()
            },
        });
    }

    #[test]
    fn reject_reason_round_trips_through_bincode() {
        assert_round_trip(&RejectReason::Occupied);
    }

    #[test]
    fn tile_element_round_trips_through_bincode() {
        assert_round_trip(&TileElement {
            base_z: 16,
            clearance_z: 32,
            direction: Direction::North,
            ghost: true,
            kind: TileElementKind::Path(PathElement {
                surface: ObjectIndex::new(1),
                railings: ObjectIndex::new(2),
                edges: EdgeMask::ALL,
                slope: Some(Direction::East),
                is_queue: false,
            }),
        });
    }
}
