//! Capture of scenery standing on the tiles a ride touches.

use std::collections::BTreeSet;

use track_design_core::{
    normalize::{to_relative, to_relative_height},
    GenericSceneryOrientation, ObjectCategory, ObjectIndex, ObjectResolver, PathOrientation,
    SceneryOrientation, TileCoordsXY, TileElement, TileElementKind, TrackDesign,
    TrackDesignSceneryElement, WallOrientation, WorldQuery,
};
use tracing::{debug, warn};

use crate::{CaptureError, Origin};

/// Object, colours and world orientation of one scenery element.
struct Found {
    category: ObjectCategory,
    object: ObjectIndex,
    primary_colour: u8,
    secondary_colour: u8,
    orientation: SceneryOrientation,
}

/// Appends the non-ghost scenery on `tiles` to `design`.
pub(crate) fn capture_scenery<W: WorldQuery + ObjectResolver + ?Sized>(
    world: &W,
    origin: Origin,
    tiles: &BTreeSet<TileCoordsXY>,
    design: &mut TrackDesign,
) -> Result<(), CaptureError> {
    for &tile in tiles {
        for element in world.tile_elements(tile).iter().filter(|element| !element.ghost) {
            let Some(found) = inspect(element) else {
                continue;
            };
            let Some(object) = world.reference_of(found.category, found.object) else {
                warn!(?tile, category = ?found.category, "scenery object has no reference, skipped");
                continue;
            };
            design.scenery_elements.push(TrackDesignSceneryElement {
                position: to_relative(tile.to_coords(), origin.location.xy(), origin.direction)?,
                z: to_relative_height(element.base_z, origin.location.z)?,
                object,
                primary_colour: found.primary_colour,
                secondary_colour: found.secondary_colour,
                orientation: found.orientation.rotate_back(origin.direction),
            });
        }
    }
    debug!(scenery = design.scenery_elements.len(), tiles = tiles.len(), "captured scenery");
    Ok(())
}

fn inspect(element: &TileElement) -> Option<Found> {
    let found = match element.kind {
        TileElementKind::SmallScenery(small) => Found {
            category: ObjectCategory::SmallScenery,
            object: small.object,
            primary_colour: small.primary_colour,
            secondary_colour: small.secondary_colour,
            orientation: SceneryOrientation::Generic(GenericSceneryOrientation::new(
                element.direction,
                small.quadrant,
            )),
        },
        TileElementKind::LargeScenery(large) if large.sequence == 0 => Found {
            category: ObjectCategory::LargeScenery,
            object: large.object,
            primary_colour: large.primary_colour,
            secondary_colour: large.secondary_colour,
            orientation: SceneryOrientation::Generic(GenericSceneryOrientation::new(
                element.direction,
                0,
            )),
        },
        TileElementKind::Wall(wall) => Found {
            category: ObjectCategory::Wall,
            object: wall.object,
            primary_colour: wall.primary_colour,
            secondary_colour: wall.secondary_colour,
            orientation: SceneryOrientation::Wall(WallOrientation {
                direction: element.direction,
                tertiary_colour: wall.tertiary_colour,
            }),
        },
        TileElementKind::Path(path) => Found {
            category: ObjectCategory::Path,
            object: path.surface,
            primary_colour: 0,
            secondary_colour: 0,
            orientation: SceneryOrientation::Path(PathOrientation {
                edges: path.edges,
                slope: path.slope,
                is_queue: path.is_queue,
            }),
        },
        _ => return None,
    };
    Some(found)
}
