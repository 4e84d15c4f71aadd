//! The portable track design record.
//!
//! Field order of [`TrackDesign`] is the serialisation contract: new fields are
//! only ever appended and element collections keep their traversal order.

use serde::{Deserialize, Serialize};

use crate::{
    coords::Direction,
    normalize::RelativeTile,
    objects::ObjectReference,
    orientation::SceneryOrientation,
    tile::{OperatingSettings, RideType, TrackColour, VehicleColour, NUM_COLOUR_SCHEMES},
    track::{TrackFlags, TrackPiece},
};

/// Maximum number of track elements a design may hold.
pub const MAX_TRACK_ELEMENTS: usize = 8192;
/// Maximum number of maze elements a design may hold, markers included.
pub const MAX_MAZE_ELEMENTS: usize = 2000;

/// Summary flags written back after a design has been previewed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DesignFlags(u8);

impl DesignFlags {
    /// The design places scenery.
    pub const HAS_SCENERY: DesignFlags = DesignFlags(1 << 0);
    /// Some scenery object of the design is not loaded.
    pub const SCENERY_UNAVAILABLE: DesignFlags = DesignFlags(1 << 1);
    /// The design's vehicle is not loaded or not yet researched.
    pub const VEHICLE_UNAVAILABLE: DesignFlags = DesignFlags(1 << 2);

    /// Flags without any bit set.
    #[must_use]
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Whether every bit of `other` is set.
    #[must_use]
    pub const fn contains(self, other: DesignFlags) -> bool {
        self.0 & other.0 == other.0
    }

    /// Sets the bits of `other`.
    pub fn insert(&mut self, other: DesignFlags) {
        self.0 |= other.0;
    }

    /// Raw bits.
    #[must_use]
    pub const fn bits(self) -> u8 {
        self.0
    }
}

/// Ride statistics stored with a design, in design units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DesignStatistics {
    /// Maximum speed, whole units.
    pub max_speed: i8,
    /// Average speed, whole units.
    pub average_speed: i8,
    /// Ride length, whole units.
    pub ride_length: u16,
    /// Maximum positive vertical g in 0.32 steps.
    pub max_positive_vertical_g: u8,
    /// Maximum negative vertical g in 0.32 steps.
    pub max_negative_vertical_g: i8,
    /// Maximum lateral g in 0.32 steps.
    pub max_lateral_g: u8,
    /// Inversions in the low five bits, sheltered eighths in the top three.
    pub inversions: u8,
    /// Holes on mini golf courses.
    pub holes: u8,
    /// Number of drops.
    pub drops: u8,
    /// Highest drop.
    pub highest_drop: u8,
    /// Excitement in tenths.
    pub excitement: u8,
    /// Intensity in tenths.
    pub intensity: u8,
    /// Nausea in tenths.
    pub nausea: u8,
    /// Air time, zero when it does not fit a byte.
    pub total_air_time: u8,
    /// Running cost per month.
    pub upkeep_cost: i16,
}

/// One track piece of a ride design.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TrackDesignTrackElement {
    /// Kind of piece.
    pub piece: TrackPiece,
    /// Packed piece settings.
    pub flags: TrackFlags,
}

/// Entrance or exit of a ride design.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TrackDesignEntranceElement {
    /// Tile offset from the origin, rotation normalised.
    pub position: RelativeTile,
    /// Height offset in height steps.
    pub z: i8,
    /// Facing relative to the origin direction.
    pub direction: Direction,
    /// Whether the hut is an exit.
    pub is_exit: bool,
}

/// Scenery placed around a design.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TrackDesignSceneryElement {
    /// Tile offset from the origin, rotation normalised.
    pub position: RelativeTile,
    /// Height offset in height steps.
    pub z: i8,
    /// Object placed.
    pub object: ObjectReference,
    /// Primary colour.
    pub primary_colour: u8,
    /// Secondary colour.
    pub secondary_colour: u8,
    /// Category specific orientation.
    pub orientation: SceneryOrientation,
}

/// Wall segments of a maze cell, four bits per quadrant.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MazeEntry(u16);

impl MazeEntry {
    /// Wraps raw segment bits.
    #[must_use]
    pub const fn from_bits(bits: u16) -> Self {
        Self(bits)
    }

    /// Raw segment bits.
    #[must_use]
    pub const fn bits(self) -> u16 {
        self.0
    }

    /// Turns the cell clockwise by `by`, moving each quadrant's four bits along.
    #[must_use]
    pub const fn rotate(self, by: Direction) -> Self {
        Self(self.0.rotate_left(by.index() as u32 * 4))
    }
}

/// One element of a maze design.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MazeElement {
    /// Maze entrance hut.
    Entrance {
        /// Tile offset from the origin.
        position: RelativeTile,
        /// Direction the hut faces.
        direction: Direction,
    },
    /// Maze exit hut.
    Exit {
        /// Tile offset from the origin.
        position: RelativeTile,
        /// Direction the hut faces.
        direction: Direction,
    },
    /// Hedge cell.
    Cell {
        /// Tile offset from the origin.
        position: RelativeTile,
        /// Wall segments present.
        entry: MazeEntry,
    },
}

impl MazeElement {
    /// Tile offset of the element.
    #[must_use]
    pub const fn position(&self) -> RelativeTile {
        match self {
            MazeElement::Entrance { position, .. }
            | MazeElement::Exit { position, .. }
            | MazeElement::Cell { position, .. } => *position,
        }
    }
}

/// Portable, origin-relative description of a built ride and its surroundings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackDesign {
    /// Category of ride.
    pub ride_type: RideType,
    /// Vehicle object.
    pub vehicle_object: Option<ObjectReference>,
    /// Construction cost measured by the last preview.
    pub cost: i32,
    /// Summary flags measured by the last preview.
    pub track_flags: DesignFlags,
    /// Operating mode.
    pub ride_mode: u8,
    /// How track colour schemes are applied.
    pub colour_scheme: u8,
    /// Vehicle colours, one per car.
    pub vehicle_colours: Vec<VehicleColour>,
    /// Station building style.
    pub entrance_style: u8,
    /// Operating parameters.
    pub operating: OperatingSettings,
    /// Ride statistics.
    pub statistics: DesignStatistics,
    /// Track colour schemes.
    pub track_colours: [TrackColour; NUM_COLOUR_SCHEMES],
    /// Tiles spanned along x.
    pub space_required_x: u8,
    /// Tiles spanned along y.
    pub space_required_y: u8,
    /// Maze cells and huts, in raster order.
    pub maze_elements: Vec<MazeElement>,
    /// Track pieces in traversal order.
    pub track_elements: Vec<TrackDesignTrackElement>,
    /// Entrances first, then exits.
    pub entrance_elements: Vec<TrackDesignEntranceElement>,
    /// Scenery elements.
    pub scenery_elements: Vec<TrackDesignSceneryElement>,
    /// Display name.
    pub name: String,
}

impl TrackDesign {
    /// Creates an empty design for the given ride type.
    #[must_use]
    pub fn new(ride_type: RideType) -> Self {
        Self {
            ride_type,
            vehicle_object: None,
            cost: 0,
            track_flags: DesignFlags::empty(),
            ride_mode: 0,
            colour_scheme: 0,
            vehicle_colours: Vec::new(),
            entrance_style: 0,
            operating: OperatingSettings::default(),
            statistics: DesignStatistics::default(),
            track_colours: [TrackColour::default(); NUM_COLOUR_SCHEMES],
            space_required_x: 0,
            space_required_y: 0,
            maze_elements: Vec::new(),
            track_elements: Vec::new(),
            entrance_elements: Vec::new(),
            scenery_elements: Vec::new(),
            name: String::new(),
        }
    }

    /// Whether the design is stored as maze cells.
    #[must_use]
    pub const fn is_maze(&self) -> bool {
        self.ride_type.is_maze()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orientation::{GenericSceneryOrientation, PathOrientation};

    #[test]
    fn maze_entry_rotation_moves_quadrants() {
        let entry = MazeEntry::from_bits(0x000F);
        assert_eq!(entry.rotate(Direction::West).bits(), 0x000F);
        assert_eq!(entry.rotate(Direction::North).bits(), 0x00F0);
        assert_eq!(entry.rotate(Direction::South).bits(), 0xF000);
        assert_eq!(MazeEntry::from_bits(0xF001).rotate(Direction::North).bits(), 0x001F);
    }

    #[test]
    fn design_round_trips_through_bincode() {
        let mut design = TrackDesign::new(RideType::SteelCoaster);
        design.name = "Looping".to_owned();
        design.vehicle_object = Some(ObjectReference::new("rct2.ride.steel_train"));
        design.track_elements.push(TrackDesignTrackElement {
            piece: TrackPiece::LeftQuarterTurn3Tiles,
            flags: TrackFlags::pack(0, 1, false, true),
        });
        design.entrance_elements.push(TrackDesignEntranceElement {
            position: RelativeTile::new(-1, 2),
            z: 0,
            direction: Direction::North,
            is_exit: true,
        });
        design.scenery_elements.push(TrackDesignSceneryElement {
            position: RelativeTile::new(3, -4),
            z: 2,
            object: ObjectReference::new("rct2.tree.oak"),
            primary_colour: 4,
            secondary_colour: 5,
            orientation: SceneryOrientation::Generic(GenericSceneryOrientation::new(
                Direction::East,
                1,
            )),
        });
        design.scenery_elements.push(TrackDesignSceneryElement {
            position: RelativeTile::new(0, 1),
            z: 0,
            object: ObjectReference::new("rct2.footpath.tarmac"),
            primary_colour: 0,
            secondary_colour: 0,
            orientation: SceneryOrientation::Path(PathOrientation::from_bits(0x35)),
        });

        let bytes = bincode::serialize(&design).expect("serialize");
        let decoded: TrackDesign = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(decoded, design);
    }
}
