//! World mutations, the flags they are issued with and their results.

use std::{fmt, ops::BitOr};

use serde::{Deserialize, Serialize};

use crate::{
    coords::{CoordsXYZ, Direction},
    objects::{ObjectIndex, ObjectReference},
    orientation::EdgeMask,
    tile::{RideId, RideType, StationIndex, TrackColour},
    track::TrackPiece,
};

/// Options controlling how an action is executed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActionFlags(u8);

impl ActionFlags {
    /// Commit the mutation instead of only validating it.
    pub const APPLY: ActionFlags = ActionFlags(1 << 0);
    /// Create a removable preview overlay.
    pub const GHOST: ActionFlags = ActionFlags(1 << 1);
    /// Permit the action while the game is paused.
    pub const ALLOW_DURING_PAUSE: ActionFlags = ActionFlags(1 << 2);
    /// Compute the cost without charging it.
    pub const NO_SPEND: ActionFlags = ActionFlags(1 << 3);
    /// The action is being replayed.
    pub const REPLAY: ActionFlags = ActionFlags(1 << 4);

    /// Flags without any option set.
    #[must_use]
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Whether every option in `other` is set.
    #[must_use]
    pub const fn contains(self, other: ActionFlags) -> bool {
        self.0 & other.0 == other.0
    }

    /// Flags with the options of both operands.
    #[must_use]
    pub const fn union(self, other: ActionFlags) -> Self {
        Self(self.0 | other.0)
    }

    /// Raw flag bits.
    #[must_use]
    pub const fn bits(self) -> u8 {
        self.0
    }
}

impl BitOr for ActionFlags {
    type Output = ActionFlags;

    fn bitor(self, rhs: Self) -> Self::Output {
        self.union(rhs)
    }
}

/// Signed amount of money; `UNDEFINED` marks a total that could not be produced.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Money(i32);

impl Money {
    /// No cost.
    pub const ZERO: Money = Money(0);
    /// Sentinel for totals of failed operations.
    pub const UNDEFINED: Money = Money(i32::MIN);

    /// Creates an amount from whole currency units.
    #[must_use]
    pub const fn new(value: i32) -> Self {
        Self(value)
    }

    /// Raw amount.
    #[must_use]
    pub const fn get(self) -> i32 {
        self.0
    }

    /// Whether the amount is the undefined sentinel.
    #[must_use]
    pub const fn is_undefined(self) -> bool {
        self.0 == i32::MIN
    }

    /// Adds two amounts, saturating short of the sentinel; undefined stays undefined.
    #[must_use]
    pub const fn saturating_add(self, other: Money) -> Self {
        if self.is_undefined() || other.is_undefined() {
            return Self::UNDEFINED;
        }
        let sum = self.0.saturating_add(other.0);
        if sum == i32::MIN {
            Self(i32::MIN + 1)
        } else {
            Self(sum)
        }
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_undefined() {
            write!(f, "undefined")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

/// Settings of a track piece placement.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TrackPlacementSettings {
    /// Brake or booster speed.
    pub brake_speed: u8,
    /// Track colour scheme.
    pub colour_scheme: u8,
    /// Seat rotation.
    pub seat_rotation: u8,
    /// Whether the piece carries a chain lift.
    pub chain_lift: bool,
    /// Whether the inverted variant is used.
    pub inverted: bool,
}

/// Mutations the world accepts.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    /// Creates a new ride without any track.
    CreateRide {
        /// Category of ride.
        ride_type: RideType,
        /// Vehicle object.
        vehicle: Option<ObjectReference>,
        /// Track colour schemes.
        track_colours: Vec<TrackColour>,
    },
    /// Removes a ride and every element it owns.
    DemolishRide {
        /// Ride to remove.
        ride: RideId,
    },
    /// Places a track piece with its first block at `location`.
    PlaceTrack {
        /// Ride owning the piece.
        ride: RideId,
        /// Kind of piece.
        piece: TrackPiece,
        /// Base of the first block.
        location: CoordsXYZ,
        /// Direction the piece is entered with.
        direction: Direction,
        /// Per-piece settings.
        settings: TrackPlacementSettings,
    },
    /// Removes a track piece whose first block sits at `location`.
    RemoveTrack {
        /// Kind of piece.
        piece: TrackPiece,
        /// Base of the first block.
        location: CoordsXYZ,
        /// Direction the piece is entered with.
        direction: Direction,
    },
    /// Places a ride entrance or exit serving a station.
    PlaceEntranceExit {
        /// Ride served.
        ride: RideId,
        /// Tile and base height of the hut.
        location: CoordsXYZ,
        /// Direction the hut faces.
        direction: Direction,
        /// Station served.
        station: StationIndex,
        /// Whether the hut is an exit.
        is_exit: bool,
    },
    /// Checks only whether an entrance or exit location is free.
    QueryEntranceExitPlacement {
        /// Tile and base height of the hut.
        location: CoordsXYZ,
        /// Whether the hut is an exit.
        is_exit: bool,
    },
    /// Places a maze cell.
    PlaceMazeTrack {
        /// Ride owning the cell.
        ride: RideId,
        /// Tile and base height.
        location: CoordsXYZ,
        /// Wall segments present.
        maze_entry: u16,
    },
    /// Places small scenery.
    PlaceSmallScenery {
        /// Tile and base height.
        location: CoordsXYZ,
        /// Direction the object faces.
        direction: Direction,
        /// Quarter of the tile.
        quadrant: u8,
        /// Scenery object.
        object: ObjectIndex,
        /// Primary colour.
        primary_colour: u8,
        /// Secondary colour.
        secondary_colour: u8,
    },
    /// Removes small scenery.
    RemoveSmallScenery {
        /// Tile and base height.
        location: CoordsXYZ,
        /// Quarter of the tile.
        quadrant: u8,
        /// Scenery object.
        object: ObjectIndex,
    },
    /// Places large scenery anchored at `location`.
    PlaceLargeScenery {
        /// Anchor tile and base height.
        location: CoordsXYZ,
        /// Direction the object faces.
        direction: Direction,
        /// Scenery object.
        object: ObjectIndex,
        /// Primary colour.
        primary_colour: u8,
        /// Secondary colour.
        secondary_colour: u8,
    },
    /// Removes large scenery anchored at `location`.
    RemoveLargeScenery {
        /// Anchor tile and base height.
        location: CoordsXYZ,
        /// Direction the object faces.
        direction: Direction,
    },
    /// Places a wall on a tile edge.
    PlaceWall {
        /// Tile and base height.
        location: CoordsXYZ,
        /// Edge the wall stands on.
        direction: Direction,
        /// Wall object.
        object: ObjectIndex,
        /// Primary colour.
        primary_colour: u8,
        /// Secondary colour.
        secondary_colour: u8,
        /// Tertiary colour.
        tertiary_colour: u8,
    },
    /// Removes a wall from a tile edge.
    RemoveWall {
        /// Tile and base height.
        location: CoordsXYZ,
        /// Edge the wall stands on.
        direction: Direction,
    },
    /// Places a path tile with explicit edges, as a design dictates.
    PlaceFootpathFromTrack {
        /// Tile and base height.
        location: CoordsXYZ,
        /// Direction the path climbs towards.
        slope: Option<Direction>,
        /// Surface object.
        surface: ObjectIndex,
        /// Railings object.
        railings: ObjectIndex,
        /// Edges connected.
        edges: EdgeMask,
        /// Whether the path is a queue.
        is_queue: bool,
    },
    /// Removes a path tile.
    RemoveFootpath {
        /// Tile and base height.
        location: CoordsXYZ,
    },
    /// Reconnects a path tile's edges to its neighbours.
    ConnectFootpathEdges {
        /// Tile and base height.
        location: CoordsXYZ,
    },
}

/// Reason a mutation was declined.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RejectReason {
    /// The location lies outside the map.
    OutOfBounds,
    /// Another element occupies the space.
    Occupied,
    /// The game is paused and the action was not allowed during pause.
    GamePaused,
    /// The park forbids building this high.
    HeightRestricted,
    /// An entrance or exit is not next to a station.
    NotAdjacentToTrack,
    /// The ride does not exist.
    MissingRide,
    /// The station index is not valid.
    TooManyStations,
    /// The element to remove or update was not found.
    MissingElement,
    /// The park cannot afford the action.
    InsufficientFunds,
    /// The height is below the ground or not aligned.
    InvalidHeight,
    /// The object is not loaded.
    MissingObject,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            RejectReason::OutOfBounds => "location is outside the map",
            RejectReason::Occupied => "space is already occupied",
            RejectReason::GamePaused => "construction is not possible while paused",
            RejectReason::HeightRestricted => "too high for the park's construction limit",
            RejectReason::NotAdjacentToTrack => "must be built next to a station",
            RejectReason::MissingRide => "ride does not exist",
            RejectReason::TooManyStations => "station index is invalid",
            RejectReason::MissingElement => "nothing to remove here",
            RejectReason::InsufficientFunds => "not enough cash",
            RejectReason::InvalidHeight => "height is invalid",
            RejectReason::MissingObject => "object is not loaded",
        };
        f.write_str(text)
    }
}

/// Outcome of executing or querying an action.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActionResult {
    /// Rejection reason, or `None` when the action succeeded.
    pub error: Option<RejectReason>,
    /// Cost of the action.
    pub cost: Money,
    /// Ride created by the action, if any.
    pub ride: Option<RideId>,
}

impl ActionResult {
    /// Successful result with the provided cost.
    #[must_use]
    pub const fn ok(cost: Money) -> Self {
        Self {
            error: None,
            cost,
            ride: None,
        }
    }

    /// Failed result.
    #[must_use]
    pub const fn rejected(reason: RejectReason) -> Self {
        Self {
            error: Some(reason),
            cost: Money::UNDEFINED,
            ride: None,
        }
    }

    /// Attaches a created ride to the result.
    #[must_use]
    pub const fn with_ride(mut self, ride: RideId) -> Self {
        self.ride = Some(ride);
        self
    }

    /// Whether the action succeeded.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Black-box executor for world mutations.
pub trait ActionExecutor {
    /// Executes the action; without `APPLY` the world is left untouched.
    fn execute(&mut self, action: &Action, flags: ActionFlags) -> ActionResult;

    /// Validates the action and reports its cost without mutating anything.
    fn query(&self, action: &Action, flags: ActionFlags) -> ActionResult;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_combine_and_test_membership() {
        let flags = ActionFlags::APPLY | ActionFlags::GHOST | ActionFlags::NO_SPEND;
        assert!(flags.contains(ActionFlags::APPLY));
        assert!(flags.contains(ActionFlags::GHOST | ActionFlags::NO_SPEND));
        assert!(!flags.contains(ActionFlags::REPLAY));
        assert!(ActionFlags::empty().contains(ActionFlags::empty()));
    }

    #[test]
    fn undefined_money_is_sticky() {
        assert_eq!(Money::new(5).saturating_add(Money::UNDEFINED), Money::UNDEFINED);
        assert_eq!(Money::UNDEFINED.saturating_add(Money::new(5)), Money::UNDEFINED);
        assert_eq!(Money::new(5).saturating_add(Money::new(7)), Money::new(12));
    }

    #[test]
    fn saturating_add_never_produces_the_sentinel() {
        let low = Money::new(i32::MIN + 1).saturating_add(Money::new(-10));
        assert!(!low.is_undefined());
    }
}
