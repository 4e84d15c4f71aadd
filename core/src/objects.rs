//! Object references carried by designs and their resolution against loaded objects.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Portable identifier of an object, independent of load order.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectReference(String);

impl ObjectReference {
    /// Creates a reference from an identifier such as `rct2.tree.oak`.
    #[must_use]
    pub fn new(identifier: impl Into<String>) -> Self {
        Self(identifier.into())
    }

    /// Identifier text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ObjectReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Slot of a loaded object inside its category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectIndex(u16);

impl ObjectIndex {
    /// Creates an index with the provided value.
    #[must_use]
    pub const fn new(value: u16) -> Self {
        Self(value)
    }

    /// Numeric value of the index.
    #[must_use]
    pub const fn get(&self) -> u16 {
        self.0
    }
}

/// Category an object belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ObjectCategory {
    /// Single tile scenery such as trees.
    SmallScenery,
    /// Scenery spanning several tiles.
    LargeScenery,
    /// Walls and fences.
    Wall,
    /// Footpath surfaces; the secondary index names the railings.
    Path,
    /// Path railings.
    Railings,
    /// Ride vehicles.
    Vehicle,
}

/// Footprint flags of a small scenery object.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SmallSceneryShape {
    /// Occupies the whole tile.
    pub full_tile: bool,
    /// Placed across the tile diagonal.
    pub diagonal: bool,
    /// Occupies half of the tile.
    pub half_space: bool,
    /// Occupies three quarters of the tile.
    pub three_quarters: bool,
}

/// Offset of one tile of a large scenery object from its anchor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LargeSceneryTile {
    /// Horizontal offset in world units.
    pub x: i32,
    /// Vertical offset in world units.
    pub y: i32,
}

/// Shape data needed to place, mirror and remove an object.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectShape {
    /// Small scenery footprint.
    Small(SmallSceneryShape),
    /// Tiles of a large scenery object, anchor first.
    Large(Vec<LargeSceneryTile>),
    /// Objects without shape information.
    Plain,
}

impl ObjectShape {
    /// Extent of the large scenery tiles as `(x1, x2, y1, y2)`.
    #[must_use]
    pub fn large_extents(&self) -> Option<(i32, i32, i32, i32)> {
        let ObjectShape::Large(tiles) = self else {
            return None;
        };
        let mut extents = (0, 0, 0, 0);
        for tile in tiles {
            extents.0 = extents.0.min(tile.x);
            extents.1 = extents.1.max(tile.x);
            extents.2 = extents.2.min(tile.y);
            extents.3 = extents.3.max(tile.y);
        }
        Some(extents)
    }
}

/// Loaded object a reference resolved to.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ResolvedObject {
    /// Category of the object.
    pub category: ObjectCategory,
    /// Slot of the object.
    pub primary: ObjectIndex,
    /// Companion slot, such as the railings of a path.
    pub secondary: Option<ObjectIndex>,
    /// Shape information.
    pub shape: ObjectShape,
    /// Whether the object has been researched and can be built.
    pub available: bool,
}

/// Resolves design-local object references against the loaded object set.
pub trait ObjectResolver {
    /// Looks up a loaded object by reference.
    fn resolve(&self, reference: &ObjectReference) -> Option<ResolvedObject>;

    /// Finds the reference of a loaded object.
    fn reference_of(&self, category: ObjectCategory, index: ObjectIndex) -> Option<ObjectReference>;

    /// Surface used when a design's path object is not loaded.
    fn default_path_surface(&self, is_queue: bool) -> Option<ObjectIndex>;

    /// Railings used when a design's path object is not loaded.
    fn default_railings(&self) -> Option<ObjectIndex>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn large_extents_cover_every_tile_and_the_anchor() {
        let shape = ObjectShape::Large(vec![
            LargeSceneryTile { x: 0, y: 0 },
            LargeSceneryTile { x: 32, y: 0 },
            LargeSceneryTile { x: 32, y: 64 },
        ]);
        assert_eq!(shape.large_extents(), Some((0, 32, 0, 64)));
        assert_eq!(ObjectShape::Plain.large_extents(), None);
    }
}
