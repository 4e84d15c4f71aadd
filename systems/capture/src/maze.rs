//! Capture of hedge mazes, stored as unrotated cell offsets.
//!
//! Maze records are never rotated, so their save direction is always west.

use track_design_core::{
    normalize::to_relative_unrotated, Direction, EntranceKind, EntranceLocation, MazeElement, MazeEntry,
    Ride, TileCoordsXY, TrackDesign, WorldQuery, MAX_MAZE_ELEMENTS,
};
use tracing::debug;

use crate::{CaptureError, CappedCollection, Origin, RequiredElement};

/// Appends every cell of `ride`, then its entrance and exit markers.
pub(crate) fn capture_maze<W: WorldQuery + ?Sized>(
    world: &W,
    ride: &Ride,
    design: &mut TrackDesign,
) -> Result<Origin, CaptureError> {
    let size = i32::try_from(world.map_size()).unwrap_or(i32::MAX);
    let tiles = (0..size).flat_map(|y| (0..size).map(move |x| TileCoordsXY::new(x, y)));

    let mut origin: Option<(TileCoordsXY, Origin)> = None;
    for tile in tiles {
        for element in world.tile_elements(tile) {
            let Some(track) = element.as_track().filter(|track| track.ride == ride.id) else {
                continue;
            };
            let (origin_tile, _) = *origin.get_or_insert((
                tile,
                Origin {
                    location: tile.to_coords().with_z(element.base_z),
                    direction: Direction::West,
                },
            ));
            design.maze_elements.push(MazeElement::Cell {
                position: to_relative_unrotated(tile, origin_tile)?,
                entry: MazeEntry::from_bits(track.maze_entry),
            });
            check_cap(design)?;
        }
    }
    let (origin_tile, origin) =
        origin.ok_or(CaptureError::RequiredElementMissing(RequiredElement::Track))?;

    let station = ride.stations[0];
    let entrance = station
        .entrance
        .ok_or(CaptureError::RequiredElementMissing(RequiredElement::Entrance))?;
    let direction = hut_direction(world, ride, entrance, EntranceKind::Entrance)
        .ok_or(CaptureError::RequiredElementMissing(RequiredElement::Entrance))?;
    design.maze_elements.push(MazeElement::Entrance {
        position: to_relative_unrotated(entrance.tile, origin_tile)?,
        direction,
    });

    let exit = station
        .exit
        .ok_or(CaptureError::RequiredElementMissing(RequiredElement::Exit))?;
    let direction = hut_direction(world, ride, exit, EntranceKind::Exit)
        .ok_or(CaptureError::RequiredElementMissing(RequiredElement::Exit))?;
    design.maze_elements.push(MazeElement::Exit {
        position: to_relative_unrotated(exit.tile, origin_tile)?,
        direction,
    });
    check_cap(design)?;

    debug!(ride = ride.id.get(), elements = design.maze_elements.len(), "captured maze");
    Ok(origin)
}

fn check_cap(design: &TrackDesign) -> Result<(), CaptureError> {
    if design.maze_elements.len() > MAX_MAZE_ELEMENTS {
        return Err(CaptureError::ElementCapExceeded {
            collection: CappedCollection::MazeElements,
            limit: MAX_MAZE_ELEMENTS,
        });
    }
    Ok(())
}

fn hut_direction<W: WorldQuery + ?Sized>(
    world: &W,
    ride: &Ride,
    location: EntranceLocation,
    kind: EntranceKind,
) -> Option<Direction> {
    world
        .tile_elements(location.tile)
        .iter()
        .find(|element| {
            element
                .as_entrance()
                .is_some_and(|hut| hut.ride == ride.id && hut.kind == kind)
        })
        .map(|element| element.direction)
}
