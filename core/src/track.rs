//! Static descriptors for every track piece a design can contain.

use serde::{Deserialize, Serialize};

use crate::coords::{CoordsXY, Direction};

/// Kind of track piece placed by a ride.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TrackPiece {
    /// Straight level piece.
    Flat,
    /// Last piece of a station platform.
    EndStation,
    /// First piece of a station platform.
    BeginStation,
    /// Inner piece of a station platform.
    MiddleStation,
    /// Straight 25 degree climb.
    Up25,
    /// Transition from level into a 25 degree climb.
    FlatToUp25,
    /// Transition from a 25 degree climb back to level.
    Up25ToFlat,
    /// Straight 25 degree descent.
    Down25,
    /// Transition from level into a 25 degree descent.
    FlatToDown25,
    /// Transition from a 25 degree descent back to level.
    Down25ToFlat,
    /// Tight left turn inside a single tile.
    LeftQuarterTurn1Tile,
    /// Tight right turn inside a single tile.
    RightQuarterTurn1Tile,
    /// Wide left turn spanning three tiles.
    LeftQuarterTurn3Tiles,
    /// Wide right turn spanning three tiles.
    RightQuarterTurn3Tiles,
    /// Level braking section.
    Brakes,
    /// Level launching section.
    Booster,
    /// Single maze cell.
    Maze,
}

/// Begin and end geometry of a track piece, expressed for a piece facing west.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TrackCoordinates {
    /// Direction offset the piece is entered with.
    pub rotation_begin: u8,
    /// Direction offset the piece is left with.
    pub rotation_end: u8,
    /// Height of the entry point above the piece's base.
    pub z_begin: i32,
    /// Height of the exit point above the piece's base.
    pub z_end: i32,
    /// Horizontal offset from the first block to the last block.
    pub x: i32,
    /// Vertical offset from the first block to the last block.
    pub y: i32,
}

/// Single tile occupied by a track piece.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TrackBlock {
    /// Sequence index of the block within its piece.
    pub index: u8,
    /// Horizontal offset from the first block.
    pub x: i32,
    /// Vertical offset from the first block.
    pub y: i32,
    /// Height offset from the piece's base.
    pub z: i32,
    /// Vertical space the block occupies.
    pub clearance: i32,
}

impl TrackBlock {
    const fn new(index: u8, x: i32, y: i32, z: i32, clearance: i32) -> Self {
        Self {
            index,
            x,
            y,
            z,
            clearance,
        }
    }

    /// Horizontal offset of the block for a piece facing `direction`.
    #[must_use]
    pub const fn offset(&self, direction: Direction) -> CoordsXY {
        CoordsXY::new(self.x, self.y).rotate(direction)
    }
}

/// Complete static description of a track piece.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TrackDescriptor {
    /// Entry and exit geometry.
    pub coordinates: TrackCoordinates,
    /// Tiles occupied, first block first.
    pub blocks: &'static [TrackBlock],
    /// Piece that replaces this one when the design is mirrored.
    pub mirror: TrackPiece,
    /// Whether the low flag bits store a speed instead of a seat rotation.
    pub has_speed_setting: bool,
    /// Whether the piece forms part of a station platform.
    pub is_station: bool,
    /// Base price of the piece.
    pub price: i32,
}

const fn coordinates(rotation_end: u8, z_begin: i32, z_end: i32, x: i32, y: i32) -> TrackCoordinates {
    TrackCoordinates {
        rotation_begin: 0,
        rotation_end,
        z_begin,
        z_end,
        x,
        y,
    }
}

const SINGLE_FLAT: [TrackBlock; 1] = [TrackBlock::new(0, 0, 0, 0, 16)];
const SINGLE_SLOPED: [TrackBlock; 1] = [TrackBlock::new(0, 0, 0, 0, 32)];
const SINGLE_TRANSITION: [TrackBlock; 1] = [TrackBlock::new(0, 0, 0, 0, 24)];
const LEFT_TURN_WIDE: [TrackBlock; 3] = [
    TrackBlock::new(0, 0, 0, 0, 16),
    TrackBlock::new(1, -32, 0, 0, 16),
    TrackBlock::new(2, -32, -32, 0, 16),
];
const RIGHT_TURN_WIDE: [TrackBlock; 3] = [
    TrackBlock::new(0, 0, 0, 0, 16),
    TrackBlock::new(1, -32, 0, 0, 16),
    TrackBlock::new(2, -32, 32, 0, 16),
];

const fn level(mirror: TrackPiece, price: i32) -> TrackDescriptor {
    TrackDescriptor {
        coordinates: coordinates(0, 0, 0, 0, 0),
        blocks: &SINGLE_FLAT,
        mirror,
        has_speed_setting: false,
        is_station: false,
        price,
    }
}

const FLAT: TrackDescriptor = level(TrackPiece::Flat, 100);
const END_STATION: TrackDescriptor = TrackDescriptor {
    is_station: true,
    ..level(TrackPiece::EndStation, 150)
};
const BEGIN_STATION: TrackDescriptor = TrackDescriptor {
    is_station: true,
    ..level(TrackPiece::BeginStation, 150)
};
const MIDDLE_STATION: TrackDescriptor = TrackDescriptor {
    is_station: true,
    ..level(TrackPiece::MiddleStation, 150)
};
const UP_25: TrackDescriptor = TrackDescriptor {
    coordinates: coordinates(0, 0, 16, 0, 0),
    blocks: &SINGLE_SLOPED,
    ..level(TrackPiece::Up25, 140)
};
const FLAT_TO_UP_25: TrackDescriptor = TrackDescriptor {
    coordinates: coordinates(0, 0, 8, 0, 0),
    blocks: &SINGLE_TRANSITION,
    ..level(TrackPiece::FlatToUp25, 120)
};
const UP_25_TO_FLAT: TrackDescriptor = TrackDescriptor {
    coordinates: coordinates(0, 0, 8, 0, 0),
    blocks: &SINGLE_TRANSITION,
    ..level(TrackPiece::Up25ToFlat, 120)
};
const DOWN_25: TrackDescriptor = TrackDescriptor {
    coordinates: coordinates(0, 16, 0, 0, 0),
    blocks: &SINGLE_SLOPED,
    ..level(TrackPiece::Down25, 140)
};
const FLAT_TO_DOWN_25: TrackDescriptor = TrackDescriptor {
    coordinates: coordinates(0, 8, 0, 0, 0),
    blocks: &SINGLE_TRANSITION,
    ..level(TrackPiece::FlatToDown25, 120)
};
const DOWN_25_TO_FLAT: TrackDescriptor = TrackDescriptor {
    coordinates: coordinates(0, 8, 0, 0, 0),
    blocks: &SINGLE_TRANSITION,
    ..level(TrackPiece::Down25ToFlat, 120)
};
const LEFT_QUARTER_TURN_1_TILE: TrackDescriptor = TrackDescriptor {
    coordinates: coordinates(3, 0, 0, 0, 0),
    ..level(TrackPiece::RightQuarterTurn1Tile, 110)
};
const RIGHT_QUARTER_TURN_1_TILE: TrackDescriptor = TrackDescriptor {
    coordinates: coordinates(1, 0, 0, 0, 0),
    ..level(TrackPiece::LeftQuarterTurn1Tile, 110)
};
const LEFT_QUARTER_TURN_3_TILES: TrackDescriptor = TrackDescriptor {
    coordinates: coordinates(3, 0, 0, -32, -32),
    blocks: &LEFT_TURN_WIDE,
    ..level(TrackPiece::RightQuarterTurn3Tiles, 300)
};
const RIGHT_QUARTER_TURN_3_TILES: TrackDescriptor = TrackDescriptor {
    coordinates: coordinates(1, 0, 0, -32, 32),
    blocks: &RIGHT_TURN_WIDE,
    ..level(TrackPiece::LeftQuarterTurn3Tiles, 300)
};
const BRAKES: TrackDescriptor = TrackDescriptor {
    has_speed_setting: true,
    ..level(TrackPiece::Brakes, 180)
};
const BOOSTER: TrackDescriptor = TrackDescriptor {
    has_speed_setting: true,
    ..level(TrackPiece::Booster, 200)
};
const MAZE: TrackDescriptor = TrackDescriptor {
    blocks: &SINGLE_SLOPED,
    ..level(TrackPiece::Maze, 60)
};

impl TrackPiece {
    /// Every piece kind in declaration order.
    pub const ALL: [TrackPiece; 17] = [
        TrackPiece::Flat,
        TrackPiece::EndStation,
        TrackPiece::BeginStation,
        TrackPiece::MiddleStation,
        TrackPiece::Up25,
        TrackPiece::FlatToUp25,
        TrackPiece::Up25ToFlat,
        TrackPiece::Down25,
        TrackPiece::FlatToDown25,
        TrackPiece::Down25ToFlat,
        TrackPiece::LeftQuarterTurn1Tile,
        TrackPiece::RightQuarterTurn1Tile,
        TrackPiece::LeftQuarterTurn3Tiles,
        TrackPiece::RightQuarterTurn3Tiles,
        TrackPiece::Brakes,
        TrackPiece::Booster,
        TrackPiece::Maze,
    ];

    /// Static descriptor for the piece.
    #[must_use]
    pub const fn descriptor(self) -> &'static TrackDescriptor {
        match self {
            TrackPiece::Flat => &FLAT,
            TrackPiece::EndStation => &END_STATION,
            TrackPiece::BeginStation => &BEGIN_STATION,
            TrackPiece::MiddleStation => &MIDDLE_STATION,
            TrackPiece::Up25 => &UP_25,
            TrackPiece::FlatToUp25 => &FLAT_TO_UP_25,
            TrackPiece::Up25ToFlat => &UP_25_TO_FLAT,
            TrackPiece::Down25 => &DOWN_25,
            TrackPiece::FlatToDown25 => &FLAT_TO_DOWN_25,
            TrackPiece::Down25ToFlat => &DOWN_25_TO_FLAT,
            TrackPiece::LeftQuarterTurn1Tile => &LEFT_QUARTER_TURN_1_TILE,
            TrackPiece::RightQuarterTurn1Tile => &RIGHT_QUARTER_TURN_1_TILE,
            TrackPiece::LeftQuarterTurn3Tiles => &LEFT_QUARTER_TURN_3_TILES,
            TrackPiece::RightQuarterTurn3Tiles => &RIGHT_QUARTER_TURN_3_TILES,
            TrackPiece::Brakes => &BRAKES,
            TrackPiece::Booster => &BOOSTER,
            TrackPiece::Maze => &MAZE,
        }
    }

    /// Entry and exit geometry of the piece.
    #[must_use]
    pub const fn coordinates(self) -> &'static TrackCoordinates {
        &self.descriptor().coordinates
    }

    /// Tiles occupied by the piece.
    #[must_use]
    pub const fn blocks(self) -> &'static [TrackBlock] {
        self.descriptor().blocks
    }

    /// Block with the given sequence index.
    #[must_use]
    pub fn block(self, sequence: u8) -> Option<&'static TrackBlock> {
        self.blocks().iter().find(|block| block.index == sequence)
    }

    /// Left-right mirrored equivalent of the piece.
    #[must_use]
    pub const fn mirrored(self) -> TrackPiece {
        self.descriptor().mirror
    }

    /// Whether the low flag bits carry a brake or booster speed.
    #[must_use]
    pub const fn has_speed_setting(self) -> bool {
        self.descriptor().has_speed_setting
    }

    /// Whether the piece belongs to a station platform.
    #[must_use]
    pub const fn is_station(self) -> bool {
        self.descriptor().is_station
    }

    /// Direction the piece is left with when entered facing `direction`.
    #[must_use]
    pub const fn exit_direction(self, direction: Direction) -> Direction {
        let coordinates = self.coordinates();
        Direction::from_index(
            direction
                .index()
                .wrapping_add(coordinates.rotation_end)
                .wrapping_sub(coordinates.rotation_begin),
        )
    }
}

/// Packed per-piece settings carried by a design track element.
///
/// Bits 0-3 store the brake speed halved or the seat rotation, bits 4-5 the
/// colour scheme, bit 6 the inverted flag and bit 7 the chain lift.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TrackFlags(u8);

impl TrackFlags {
    const SETTING_MASK: u8 = 0x0F;
    const COLOUR_SHIFT: u8 = 4;
    const INVERTED: u8 = 1 << 6;
    const CHAIN_LIFT: u8 = 1 << 7;

    /// Wraps a raw flag byte.
    #[must_use]
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    /// Raw flag byte.
    #[must_use]
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Packs the individual settings into a flag byte.
    #[must_use]
    pub const fn pack(setting: u8, colour_scheme: u8, inverted: bool, chain_lift: bool) -> Self {
        let mut bits = (setting & Self::SETTING_MASK) | ((colour_scheme & 3) << Self::COLOUR_SHIFT);
        if inverted {
            bits |= Self::INVERTED;
        }
        if chain_lift {
            bits |= Self::CHAIN_LIFT;
        }
        Self(bits)
    }

    /// Brake speed halved or seat rotation.
    #[must_use]
    pub const fn setting(self) -> u8 {
        self.0 & Self::SETTING_MASK
    }

    /// Colour scheme index.
    #[must_use]
    pub const fn colour_scheme(self) -> u8 {
        (self.0 >> Self::COLOUR_SHIFT) & 3
    }

    /// Whether the piece uses the inverted track variant.
    #[must_use]
    pub const fn inverted(self) -> bool {
        self.0 & Self::INVERTED != 0
    }

    /// Whether the piece carries a chain lift.
    #[must_use]
    pub const fn chain_lift(self) -> bool {
        self.0 & Self::CHAIN_LIFT != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mirror_table_is_an_involution() {
        for piece in TrackPiece::ALL {
            assert_eq!(
                piece.mirrored().mirrored(),
                piece,
                "mirroring {piece:?} twice should restore it",
            );
        }
    }

    #[test]
    fn every_piece_has_a_first_block_at_its_origin() {
        for piece in TrackPiece::ALL {
            let first = piece.blocks().first().expect("piece has blocks");
            assert_eq!((first.index, first.x, first.y), (0, 0, 0), "{piece:?}");
        }
    }

    #[test]
    fn last_block_sits_at_the_exit_offset() {
        for piece in TrackPiece::ALL {
            let last = piece.blocks().last().expect("piece has blocks");
            let coordinates = piece.coordinates();
            assert_eq!((last.x, last.y), (coordinates.x, coordinates.y), "{piece:?}");
        }
    }

    #[test]
    fn left_turns_exit_to_the_south_when_entered_west() {
        assert_eq!(
            TrackPiece::LeftQuarterTurn1Tile.exit_direction(Direction::West),
            Direction::South
        );
        assert_eq!(
            TrackPiece::RightQuarterTurn3Tiles.exit_direction(Direction::West),
            Direction::North
        );
    }

    #[test]
    fn flags_pack_into_documented_bits() {
        let flags = TrackFlags::pack(5, 2, true, true);
        assert_eq!(flags.bits(), 0b1110_0101);
        assert_eq!(flags.setting(), 5);
        assert_eq!(flags.colour_scheme(), 2);
        assert!(flags.inverted());
        assert!(flags.chain_lift());
    }
}
