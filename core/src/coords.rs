//! Map coordinates, tile coordinates and the four map directions.

use std::ops::{Add, AddAssign, Sub};

use serde::{Deserialize, Serialize};

/// Number of world units spanned by a single tile along the x and y axes.
pub const COORDS_XY_STEP: i32 = 32;
/// Number of world units represented by a single stored height step.
pub const COORDS_Z_STEP: i32 = 8;
/// Height added to a surface for each raised land step.
pub const LAND_HEIGHT_STEP: i32 = 16;

/// One of the four map directions a piece, entrance or object can face.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Direction {
    /// Facing decreasing x.
    West,
    /// Facing increasing y.
    North,
    /// Facing increasing x.
    East,
    /// Facing decreasing y.
    South,
}

impl Direction {
    /// All directions in index order.
    pub const ALL: [Direction; 4] = [
        Direction::West,
        Direction::North,
        Direction::East,
        Direction::South,
    ];

    /// Builds a direction from an index, wrapping values outside `0..4`.
    #[must_use]
    pub const fn from_index(index: u8) -> Self {
        match index & 3 {
            0 => Direction::West,
            1 => Direction::North,
            2 => Direction::East,
            _ => Direction::South,
        }
    }

    /// Index of the direction in `0..4`.
    #[must_use]
    pub const fn index(self) -> u8 {
        match self {
            Direction::West => 0,
            Direction::North => 1,
            Direction::East => 2,
            Direction::South => 3,
        }
    }

    /// Turns the direction clockwise by the quarter turns encoded in `by`.
    #[must_use]
    pub const fn rotate(self, by: Direction) -> Self {
        Self::from_index(self.index().wrapping_add(by.index()))
    }

    /// Undoes [`Direction::rotate`] for the same `by`.
    #[must_use]
    pub const fn rotate_back(self, by: Direction) -> Self {
        Self::from_index(self.index().wrapping_sub(by.index()))
    }

    /// Direction pointing the opposite way.
    #[must_use]
    pub const fn reverse(self) -> Self {
        Self::from_index(self.index() ^ 2)
    }

    /// Whether the direction runs along the y axis.
    #[must_use]
    pub const fn is_odd(self) -> bool {
        self.index() & 1 == 1
    }

    /// Offset of one tile step in this direction, in world units.
    #[must_use]
    pub const fn delta(self) -> CoordsXY {
        match self {
            Direction::West => CoordsXY::new(-COORDS_XY_STEP, 0),
            Direction::North => CoordsXY::new(0, COORDS_XY_STEP),
            Direction::East => CoordsXY::new(COORDS_XY_STEP, 0),
            Direction::South => CoordsXY::new(0, -COORDS_XY_STEP),
        }
    }
}

/// Position on the map in world units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CoordsXY {
    /// Horizontal world coordinate.
    pub x: i32,
    /// Vertical world coordinate.
    pub y: i32,
}

impl CoordsXY {
    /// Creates a new world position.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Rotates the offset by the quarter turns encoded in `direction`.
    #[must_use]
    pub const fn rotate(self, direction: Direction) -> Self {
        match direction {
            Direction::West => Self::new(self.x, self.y),
            Direction::North => Self::new(self.y, -self.x),
            Direction::East => Self::new(-self.x, -self.y),
            Direction::South => Self::new(-self.y, self.x),
        }
    }

    /// Tile containing the position.
    #[must_use]
    pub const fn to_tile(self) -> TileCoordsXY {
        TileCoordsXY::new(
            self.x.div_euclid(COORDS_XY_STEP),
            self.y.div_euclid(COORDS_XY_STEP),
        )
    }

    /// Attaches a height to the position.
    #[must_use]
    pub const fn with_z(self, z: i32) -> CoordsXYZ {
        CoordsXYZ::new(self.x, self.y, z)
    }
}

impl Add for CoordsXY {
    type Output = CoordsXY;

    fn add(self, rhs: Self) -> Self::Output {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for CoordsXY {
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for CoordsXY {
    type Output = CoordsXY;

    fn sub(self, rhs: Self) -> Self::Output {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Position on the map in world units including height.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CoordsXYZ {
    /// Horizontal world coordinate.
    pub x: i32,
    /// Vertical world coordinate.
    pub y: i32,
    /// Height in world units.
    pub z: i32,
}

impl CoordsXYZ {
    /// Creates a new three dimensional world position.
    #[must_use]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Horizontal component of the position.
    #[must_use]
    pub const fn xy(self) -> CoordsXY {
        CoordsXY::new(self.x, self.y)
    }
}

/// Position on the map in whole tiles.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileCoordsXY {
    /// Tile column.
    pub x: i32,
    /// Tile row.
    pub y: i32,
}

impl TileCoordsXY {
    /// Creates a new tile position.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// World position of the tile's corner.
    #[must_use]
    pub const fn to_coords(self) -> CoordsXY {
        CoordsXY::new(self.x * COORDS_XY_STEP, self.y * COORDS_XY_STEP)
    }

    /// Rotates the tile offset by the quarter turns encoded in `direction`.
    #[must_use]
    pub const fn rotate(self, direction: Direction) -> Self {
        match direction {
            Direction::West => Self::new(self.x, self.y),
            Direction::North => Self::new(self.y, -self.x),
            Direction::East => Self::new(-self.x, -self.y),
            Direction::South => Self::new(-self.y, self.x),
        }
    }
}

impl Add for TileCoordsXY {
    type Output = TileCoordsXY;

    fn add(self, rhs: Self) -> Self::Output {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

/// Axis-aligned box accumulated from world positions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BoundingBox {
    min: CoordsXYZ,
    max: CoordsXYZ,
}

impl BoundingBox {
    /// Creates a box containing a single position.
    #[must_use]
    pub const fn at(position: CoordsXYZ) -> Self {
        Self {
            min: position,
            max: position,
        }
    }

    /// Grows the box so it contains `position`.
    pub fn include(&mut self, position: CoordsXYZ) {
        self.min.x = self.min.x.min(position.x);
        self.min.y = self.min.y.min(position.y);
        self.min.z = self.min.z.min(position.z);
        self.max.x = self.max.x.max(position.x);
        self.max.y = self.max.y.max(position.y);
        self.max.z = self.max.z.max(position.z);
    }

    /// Smallest corner of the box.
    #[must_use]
    pub const fn min(&self) -> CoordsXYZ {
        self.min
    }

    /// Largest corner of the box.
    #[must_use]
    pub const fn max(&self) -> CoordsXYZ {
        self.max
    }

    /// Number of tiles covered along x and y, counting both ends.
    #[must_use]
    pub const fn tile_span(&self) -> (u32, u32) {
        (
            ((self.max.x - self.min.x) / COORDS_XY_STEP + 1) as u32,
            ((self.max.y - self.min.y) / COORDS_XY_STEP + 1) as u32,
        )
    }
}
