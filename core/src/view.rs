//! Read-only world access and the collaborators used while drawing previews.

use crate::{
    coords::{CoordsXYZ, Direction, TileCoordsXY},
    tile::{surface_height, Ride, RideId, TileElement},
};

/// Read-only access to map tiles and rides.
pub trait WorldQuery {
    /// Number of tiles along each side of the square map.
    fn map_size(&self) -> u32;

    /// Elements stacked on a tile, ordered from the ground up; empty outside the map.
    fn tile_elements(&self, tile: TileCoordsXY) -> &[TileElement];

    /// Ride with the given identifier.
    fn ride(&self, id: RideId) -> Option<&Ride>;

    /// Whether the tile lies on the map.
    fn is_valid_tile(&self, tile: TileCoordsXY) -> bool {
        let size = i64::from(self.map_size());
        (0..size).contains(&i64::from(tile.x)) && (0..size).contains(&i64::from(tile.y))
    }

    /// Walkable height of a tile's surface, water included.
    fn surface_height(&self, tile: TileCoordsXY) -> Option<i32> {
        self.tile_elements(tile).iter().find_map(surface_height)
    }
}

/// Host state swapped around a preview render.
pub trait PreviewHost {
    /// Saves the live map and installs an owned, flat, dry scratch map of `size` tiles.
    fn stash_and_install_scratch_map(&mut self, size: u32);

    /// Restores the map saved by the last stash.
    fn unstash_map(&mut self);

    /// Whether the park forbids building above its height limit.
    fn forbid_high_construction(&self) -> bool;

    /// Sets the park's height restriction.
    fn set_forbid_high_construction(&mut self, forbid: bool);

    /// Current view rotation.
    fn view_rotation(&self) -> Direction;

    /// Sets the view rotation.
    fn set_view_rotation(&mut self, rotation: Direction);
}

/// Off-screen view parameters for a preview render.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Viewport {
    /// Width of the image in pixels.
    pub width: u32,
    /// Height of the image in pixels.
    pub height: u32,
    /// Width of the viewed area in screen units.
    pub view_width: i32,
    /// Height of the viewed area in screen units.
    pub view_height: i32,
    /// Zoom level; each level halves the scale.
    pub zoom: u8,
    /// Screen position of the top-left corner of the view.
    pub view_x: i32,
    /// Screen position of the top-left corner of the view.
    pub view_y: i32,
}

/// Projects a world position into isometric screen space for a view rotation.
#[must_use]
pub const fn translate_3d_to_2d(rotation: Direction, position: CoordsXYZ) -> (i32, i32) {
    let CoordsXYZ { x, y, z } = position;
    match rotation {
        Direction::West => (y - x, (x + y) / 2 - z),
        Direction::North => (-x - y, (y - x) / 2 - z),
        Direction::East => (x - y, (-x - y) / 2 - z),
        Direction::South => (x + y, (x - y) / 2 - z),
    }
}

/// Draws one rotation of the world into an 8-bit pixel buffer.
pub trait PreviewRenderer {
    /// Renders `world` seen through `viewport` at `rotation` into `pixels`.
    fn render_view(
        &mut self,
        world: &dyn WorldQuery,
        viewport: &Viewport,
        rotation: Direction,
        pixels: &mut [u8],
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn projection_of_the_origin_is_lifted_by_height() {
        for rotation in Direction::ALL {
            assert_eq!(translate_3d_to_2d(rotation, CoordsXYZ::new(0, 0, 16)), (0, -16));
        }
    }

    #[test]
    fn projection_turns_with_the_view() {
        let position = CoordsXYZ::new(64, 0, 0);
        assert_eq!(translate_3d_to_2d(Direction::West, position), (-64, 32));
        assert_eq!(translate_3d_to_2d(Direction::East, position), (64, -32));
    }
}
