//! Orientation values for the scenery categories a design can carry.
//!
//! Each category rotates and mirrors by its own law, so the raw flag byte a
//! design file stores is only decoded at the edges via `from_bits`/`to_bits`.

use serde::{Deserialize, Serialize};

use crate::coords::Direction;

/// Four-bit set of path edges, one bit per [`Direction`] index.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EdgeMask(u8);

impl EdgeMask {
    /// Mask without any connected edge.
    pub const NONE: EdgeMask = EdgeMask(0);
    /// Mask with all four edges connected.
    pub const ALL: EdgeMask = EdgeMask(0x0F);

    /// Builds a mask from the low four bits of `bits`.
    #[must_use]
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits & 0x0F)
    }

    /// Raw four-bit value.
    #[must_use]
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Whether the edge facing `direction` is connected.
    #[must_use]
    pub const fn contains(self, direction: Direction) -> bool {
        self.0 & (1 << direction.index()) != 0
    }

    /// Mask with the edge facing `direction` connected.
    #[must_use]
    pub const fn with(self, direction: Direction) -> Self {
        Self(self.0 | (1 << direction.index()))
    }

    /// Rotates every edge clockwise by `by`.
    #[must_use]
    pub const fn rotate(self, by: Direction) -> Self {
        let shift = by.index();
        Self(((self.0 << shift) | (self.0 >> ((4 - shift) & 3))) & 0x0F)
    }

    /// Undoes [`EdgeMask::rotate`] for the same `by`.
    #[must_use]
    pub const fn rotate_back(self, by: Direction) -> Self {
        self.rotate(Direction::West.rotate_back(by))
    }

    /// Swaps the edges that face along the y axis.
    #[must_use]
    pub const fn mirror(self) -> Self {
        let north = self.0 & 0b0010;
        let south = self.0 & 0b1000;
        Self((self.0 & 0b0101) | (north << 2) | (south >> 2))
    }
}

/// Orientation of a path or queue tile.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PathOrientation {
    /// Edges connected to neighbouring paths.
    pub edges: EdgeMask,
    /// Direction the path climbs towards when sloped.
    pub slope: Option<Direction>,
    /// Whether the path is a queue line.
    pub is_queue: bool,
}

impl PathOrientation {
    const SLOPED: u8 = 1 << 4;
    const SLOPE_SHIFT: u8 = 5;
    const QUEUE: u8 = 1 << 7;

    /// Decodes the packed design byte.
    #[must_use]
    pub const fn from_bits(bits: u8) -> Self {
        let slope = if bits & Self::SLOPED != 0 {
            Some(Direction::from_index(bits >> Self::SLOPE_SHIFT))
        } else {
            None
        };
        Self {
            edges: EdgeMask::from_bits(bits),
            slope,
            is_queue: bits & Self::QUEUE != 0,
        }
    }

    /// Encodes the orientation into the packed design byte.
    #[must_use]
    pub const fn to_bits(self) -> u8 {
        let mut bits = self.edges.bits();
        if let Some(slope) = self.slope {
            bits |= Self::SLOPED | (slope.index() << Self::SLOPE_SHIFT);
        }
        if self.is_queue {
            bits |= Self::QUEUE;
        }
        bits
    }

    /// Rotates edges and slope clockwise by `by`.
    #[must_use]
    pub const fn rotate(self, by: Direction) -> Self {
        Self {
            edges: self.edges.rotate(by),
            slope: match self.slope {
                Some(slope) => Some(slope.rotate(by)),
                None => None,
            },
            is_queue: self.is_queue,
        }
    }

    /// Undoes [`PathOrientation::rotate`] for the same `by`.
    #[must_use]
    pub const fn rotate_back(self, by: Direction) -> Self {
        self.rotate(Direction::West.rotate_back(by))
    }

    /// Reflects the orientation across the x axis.
    #[must_use]
    pub const fn mirror(self) -> Self {
        Self {
            edges: self.edges.mirror(),
            slope: match self.slope {
                Some(slope) if slope.is_odd() => Some(slope.reverse()),
                other => other,
            },
            is_queue: self.is_queue,
        }
    }
}

/// Orientation of a wall segment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WallOrientation {
    /// Tile edge the wall stands on.
    pub direction: Direction,
    /// Third colour, stored next to the direction in the packed byte.
    pub tertiary_colour: u8,
}

impl WallOrientation {
    /// Decodes the packed design byte.
    #[must_use]
    pub const fn from_bits(bits: u8) -> Self {
        Self {
            direction: Direction::from_index(bits),
            tertiary_colour: bits >> 2,
        }
    }

    /// Encodes the orientation into the packed design byte.
    #[must_use]
    pub const fn to_bits(self) -> u8 {
        self.direction.index() | (self.tertiary_colour << 2)
    }

    /// Rotates the wall clockwise by `by`.
    #[must_use]
    pub const fn rotate(self, by: Direction) -> Self {
        Self {
            direction: self.direction.rotate(by),
            tertiary_colour: self.tertiary_colour,
        }
    }

    /// Undoes [`WallOrientation::rotate`] for the same `by`.
    #[must_use]
    pub const fn rotate_back(self, by: Direction) -> Self {
        Self {
            direction: self.direction.rotate_back(by),
            tertiary_colour: self.tertiary_colour,
        }
    }

    /// Reflects the wall across the x axis.
    #[must_use]
    pub const fn mirror(self) -> Self {
        let direction = if self.direction.is_odd() {
            self.direction.reverse()
        } else {
            self.direction
        };
        Self {
            direction,
            tertiary_colour: self.tertiary_colour,
        }
    }
}

/// Orientation of small and large scenery.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GenericSceneryOrientation {
    /// Direction the object faces.
    pub direction: Direction,
    /// Quarter of the tile the object occupies, `0..4`.
    pub quadrant: u8,
}

impl GenericSceneryOrientation {
    /// Creates an orientation, wrapping the quadrant into `0..4`.
    #[must_use]
    pub const fn new(direction: Direction, quadrant: u8) -> Self {
        Self {
            direction,
            quadrant: quadrant & 3,
        }
    }

    /// Decodes the packed design byte.
    #[must_use]
    pub const fn from_bits(bits: u8) -> Self {
        Self::new(Direction::from_index(bits), bits >> 2)
    }

    /// Encodes the orientation into the packed design byte.
    #[must_use]
    pub const fn to_bits(self) -> u8 {
        self.direction.index() | (self.quadrant << 2)
    }

    /// Rotates direction and quadrant clockwise by `by`.
    #[must_use]
    pub const fn rotate(self, by: Direction) -> Self {
        Self::new(
            self.direction.rotate(by),
            self.quadrant.wrapping_add(by.index()),
        )
    }

    /// Undoes [`GenericSceneryOrientation::rotate`] for the same `by`.
    #[must_use]
    pub const fn rotate_back(self, by: Direction) -> Self {
        Self::new(
            self.direction.rotate_back(by),
            self.quadrant.wrapping_sub(by.index()),
        )
    }

    /// Flips the lowest direction bit.
    #[must_use]
    pub const fn toggle_direction_parity(self) -> Self {
        Self::new(Direction::from_index(self.direction.index() ^ 1), self.quadrant)
    }

    /// Reverses the direction when it runs along the y axis.
    #[must_use]
    pub const fn reverse_if_odd(self) -> Self {
        if self.direction.is_odd() {
            Self::new(self.direction.reverse(), self.quadrant)
        } else {
            self
        }
    }

    /// Flips the lowest quadrant bit.
    #[must_use]
    pub const fn toggle_quadrant_parity(self) -> Self {
        Self::new(self.direction, self.quadrant ^ 1)
    }
}

/// Category specific orientation stored with each design scenery element.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SceneryOrientation {
    /// Orientation of a path or queue.
    Path(PathOrientation),
    /// Orientation of a wall.
    Wall(WallOrientation),
    /// Orientation of small or large scenery.
    Generic(GenericSceneryOrientation),
}

impl SceneryOrientation {
    /// Rotates the orientation clockwise by `by`.
    #[must_use]
    pub const fn rotate(self, by: Direction) -> Self {
        match self {
            SceneryOrientation::Path(path) => SceneryOrientation::Path(path.rotate(by)),
            SceneryOrientation::Wall(wall) => SceneryOrientation::Wall(wall.rotate(by)),
            SceneryOrientation::Generic(generic) => SceneryOrientation::Generic(generic.rotate(by)),
        }
    }

    /// Undoes [`SceneryOrientation::rotate`] for the same `by`.
    #[must_use]
    pub const fn rotate_back(self, by: Direction) -> Self {
        self.rotate(Direction::West.rotate_back(by))
    }

    /// Packed design byte for the orientation.
    #[must_use]
    pub const fn to_bits(self) -> u8 {
        match self {
            SceneryOrientation::Path(path) => path.to_bits(),
            SceneryOrientation::Wall(wall) => wall.to_bits(),
            SceneryOrientation::Generic(generic) => generic.to_bits(),
        }
    }
}
