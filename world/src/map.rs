//! Square map of tile element stacks.

use track_design_core::{
    Direction, Slope, SurfaceElement, TileCoordsXY, TileElement, TileElementKind,
};

/// Base height of freshly generated land.
pub(crate) const DEFAULT_LAND_Z: i32 = 16;

/// Tile element storage for a square map.
#[derive(Clone, Debug)]
pub(crate) struct TileMap {
    size: u32,
    tiles: Vec<Vec<TileElement>>,
}

impl TileMap {
    /// Creates a map of level, dry land.
    pub(crate) fn flat(size: u32) -> Self {
        let count = size as usize * size as usize;
        let tiles = (0..count)
            .map(|_| vec![surface_element(DEFAULT_LAND_Z, Slope::FLAT, 0)])
            .collect();
        Self { size, tiles }
    }

    /// Number of tiles along each side.
    pub(crate) const fn size(&self) -> u32 {
        self.size
    }

    fn index(&self, tile: TileCoordsXY) -> Option<usize> {
        let x = u32::try_from(tile.x).ok()?;
        let y = u32::try_from(tile.y).ok()?;
        if x >= self.size || y >= self.size {
            return None;
        }
        Some(y as usize * self.size as usize + x as usize)
    }

    /// Elements of a tile, empty outside the map.
    pub(crate) fn elements(&self, tile: TileCoordsXY) -> &[TileElement] {
        match self.index(tile) {
            Some(index) => &self.tiles[index],
            None => &[],
        }
    }

    /// Inserts an element keeping the stack ordered by base height.
    pub(crate) fn insert(&mut self, tile: TileCoordsXY, element: TileElement) -> bool {
        let Some(index) = self.index(tile) else {
            return false;
        };
        let stack = &mut self.tiles[index];
        let position = stack
            .iter()
            .position(|existing| {
                existing.as_surface().is_none() && existing.base_z > element.base_z
            })
            .unwrap_or(stack.len());
        stack.insert(position, element);
        true
    }

    /// Removes the first element matching `predicate`, returning it.
    pub(crate) fn remove_first<F>(&mut self, tile: TileCoordsXY, predicate: F) -> Option<TileElement>
    where
        F: Fn(&TileElement) -> bool,
    {
        let index = self.index(tile)?;
        let stack = &mut self.tiles[index];
        let position = stack.iter().position(predicate)?;
        Some(stack.remove(position))
    }

    /// Removes every element matching `predicate` across the whole map.
    pub(crate) fn remove_all<F>(&mut self, predicate: F) -> usize
    where
        F: Fn(&TileElement) -> bool,
    {
        let mut removed = 0;
        for stack in &mut self.tiles {
            let before = stack.len();
            stack.retain(|element| !predicate(element));
            removed += before - stack.len();
        }
        removed
    }

    /// Mutable access to the elements of a tile.
    pub(crate) fn elements_mut(&mut self, tile: TileCoordsXY) -> Option<&mut Vec<TileElement>> {
        let index = self.index(tile)?;
        Some(&mut self.tiles[index])
    }

    /// Replaces the land surface of a tile.
    pub(crate) fn set_surface(
        &mut self,
        tile: TileCoordsXY,
        base_z: i32,
        slope: Slope,
        water_height: i32,
    ) -> bool {
        let Some(stack) = self.elements_mut(tile) else {
            return false;
        };
        stack.retain(|element| element.as_surface().is_none());
        stack.insert(0, surface_element(base_z, slope, water_height));
        true
    }

    /// Iterates over every tile in raster order.
    pub(crate) fn iter_tiles(&self) -> impl Iterator<Item = (TileCoordsXY, &[TileElement])> + '_ {
        let size = self.size as usize;
        self.tiles.iter().enumerate().map(move |(index, stack)| {
            let tile = TileCoordsXY::new((index % size) as i32, (index / size) as i32);
            (tile, stack.as_slice())
        })
    }
}

fn surface_element(base_z: i32, slope: Slope, water_height: i32) -> TileElement {
    TileElement {
        base_z,
        clearance_z: base_z,
        direction: Direction::West,
        ghost: false,
        kind: TileElementKind::Surface(SurfaceElement {
            slope,
            water_height,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_map_has_one_surface_per_tile() {
        let map = TileMap::flat(4);
        assert_eq!(map.iter_tiles().count(), 16);
        for (_, stack) in map.iter_tiles() {
            assert_eq!(stack.len(), 1);
            assert!(stack[0].as_surface().is_some());
        }
    }

    #[test]
    fn elements_outside_the_map_are_empty() {
        let map = TileMap::flat(4);
        assert!(map.elements(TileCoordsXY::new(-1, 0)).is_empty());
        assert!(map.elements(TileCoordsXY::new(0, 4)).is_empty());
    }

    #[test]
    fn insertion_keeps_surface_first_and_orders_by_height() {
        let mut map = TileMap::flat(2);
        let tile = TileCoordsXY::new(1, 1);
        let high = TileElement {
            base_z: 64,
            clearance_z: 80,
            ..surface_element(0, Slope::FLAT, 0)
        };
        let low = TileElement {
            base_z: 32,
            clearance_z: 48,
            ..surface_element(0, Slope::FLAT, 0)
        };
        assert!(map.insert(tile, high));
        assert!(map.insert(tile, low));
        let heights: Vec<i32> = map.elements(tile).iter().map(|e| e.base_z).collect();
        assert_eq!(heights, vec![DEFAULT_LAND_Z, 32, 64]);
    }
}
