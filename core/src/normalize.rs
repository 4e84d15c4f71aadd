//! Conversion between absolute map positions and origin-relative design offsets.
//!
//! Relative offsets are measured from the design origin and rotated backwards
//! by the origin direction, so a design always reads as if its first piece
//! faced [`Direction::West`]. Offsets are stored in signed bytes; anything
//! outside `RELATIVE_MIN..=RELATIVE_MAX` cannot be encoded.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::coords::{CoordsXY, Direction, TileCoordsXY, COORDS_XY_STEP, COORDS_Z_STEP};

/// Smallest encodable relative offset, in tiles or height steps.
pub const RELATIVE_MIN: i32 = -126;
/// Largest encodable relative offset, in tiles or height steps.
pub const RELATIVE_MAX: i32 = 127;

/// Axis of a relative offset.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    /// Horizontal tile axis.
    X,
    /// Vertical tile axis.
    Y,
    /// Height axis.
    Z,
}

/// Errors raised while normalising absolute positions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum NormalizeError {
    /// The relative offset does not fit into a signed byte window.
    #[error("relative {axis:?} offset {value} is outside {RELATIVE_MIN}..={RELATIVE_MAX}")]
    EncodingOverflow {
        /// Axis that overflowed.
        axis: Axis,
        /// Offending offset.
        value: i32,
    },
}

/// Tile offset relative to a design origin.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RelativeTile {
    /// Offset along the x axis in tiles.
    pub x: i8,
    /// Offset along the y axis in tiles.
    pub y: i8,
}

impl RelativeTile {
    /// Creates a relative tile offset.
    #[must_use]
    pub const fn new(x: i8, y: i8) -> Self {
        Self { x, y }
    }
}

fn encode(axis: Axis, value: i32) -> Result<i8, NormalizeError> {
    if (RELATIVE_MIN..=RELATIVE_MAX).contains(&value) {
        i8::try_from(value).map_err(|_| NormalizeError::EncodingOverflow { axis, value })
    } else {
        Err(NormalizeError::EncodingOverflow { axis, value })
    }
}

/// Converts an absolute tile position into an origin-relative, rotation-normalised offset.
pub fn to_relative(
    absolute: CoordsXY,
    origin: CoordsXY,
    origin_direction: Direction,
) -> Result<RelativeTile, NormalizeError> {
    let rotated = (absolute - origin).rotate(Direction::West.rotate_back(origin_direction));
    let tile = TileCoordsXY::new(
        rotated.x.div_euclid(COORDS_XY_STEP),
        rotated.y.div_euclid(COORDS_XY_STEP),
    );
    Ok(RelativeTile::new(
        encode(Axis::X, tile.x)?,
        encode(Axis::Y, tile.y)?,
    ))
}

/// Converts an origin-relative offset back into an absolute tile position.
#[must_use]
pub fn to_absolute(relative: RelativeTile, origin: CoordsXY, direction: Direction) -> CoordsXY {
    TileCoordsXY::new(i32::from(relative.x), i32::from(relative.y))
        .to_coords()
        .rotate(direction)
        + origin
}

/// Converts an absolute height into height steps above or below the origin.
pub fn to_relative_height(z: i32, origin_z: i32) -> Result<i8, NormalizeError> {
    encode(Axis::Z, (z - origin_z).div_euclid(COORDS_Z_STEP))
}

/// Converts a relative height back into world units.
#[must_use]
pub fn to_absolute_height(relative: i8, origin_z: i32) -> i32 {
    i32::from(relative) * COORDS_Z_STEP + origin_z
}

/// Encodes an unrotated tile difference, as used by maze cells.
pub fn to_relative_unrotated(
    absolute: TileCoordsXY,
    origin: TileCoordsXY,
) -> Result<RelativeTile, NormalizeError> {
    Ok(RelativeTile::new(
        encode(Axis::X, absolute.x - origin.x)?,
        encode(Axis::Y, absolute.y - origin.y)?,
    ))
}
