//! Mirroring of scenery elements, which depends on each object's shape.

use track_design_core::{
    GenericSceneryOrientation, ObjectCategory, ObjectResolver, ObjectShape, RelativeTile,
    SceneryOrientation, TrackDesignSceneryElement, COORDS_XY_STEP,
};
use tracing::warn;

use crate::flip_y;

/// Mirrors every resolvable element; returns how many were left untouched.
pub(crate) fn mirror_scenery<R: ObjectResolver + ?Sized>(
    elements: &mut [TrackDesignSceneryElement],
    resolver: &R,
) -> usize {
    let mut skipped = 0;
    for element in elements {
        let Some(object) = resolver.resolve(&element.object) else {
            warn!(object = %element.object, "scenery object not loaded, left unmirrored");
            skipped += 1;
            continue;
        };
        match (object.category, element.orientation) {
            (ObjectCategory::SmallScenery, SceneryOrientation::Generic(generic)) => {
                let ObjectShape::Small(shape) = object.shape else {
                    skipped += 1;
                    continue;
                };
                element.position = flip_y(element.position);
                let mirrored = if shape.diagonal {
                    let flipped = generic.toggle_direction_parity();
                    if shape.full_tile {
                        flipped
                    } else {
                        flipped.toggle_quadrant_parity()
                    }
                } else {
                    generic.reverse_if_odd().toggle_quadrant_parity()
                };
                element.orientation = SceneryOrientation::Generic(mirrored);
            }
            (ObjectCategory::LargeScenery, SceneryOrientation::Generic(generic)) => {
                let Some(extents) = object.shape.large_extents() else {
                    skipped += 1;
                    continue;
                };
                let (position, mirrored) = mirror_large(element.position, generic, extents);
                element.position = position;
                element.orientation = SceneryOrientation::Generic(mirrored);
            }
            (ObjectCategory::Wall, SceneryOrientation::Wall(wall)) => {
                element.position = flip_y(element.position);
                element.orientation = SceneryOrientation::Wall(wall.mirror());
            }
            (ObjectCategory::Path, SceneryOrientation::Path(path)) => {
                element.position = flip_y(element.position);
                element.orientation = SceneryOrientation::Path(path.mirror());
            }
            (category, _) => {
                warn!(object = %element.object, ?category, "orientation does not fit the object, left unmirrored");
                skipped += 1;
            }
        }
    }
    skipped
}

/// Moves the anchor of a large object so its mirrored footprint covers the
/// reflected tiles.
fn mirror_large(
    position: RelativeTile,
    orientation: GenericSceneryOrientation,
    (_, _, y1, y2): (i32, i32, i32, i32),
) -> (RelativeTile, GenericSceneryOrientation) {
    let step = COORDS_XY_STEP;
    let x = i32::from(position.x);
    let y = i32::from(position.y);
    let (x, y, orientation) = match orientation.direction.index() {
        0 => (x, (-(y * step + y1) - y2) / step, orientation),
        1 => (
            (x * step + y2 + y1) / step,
            -y,
            GenericSceneryOrientation::new(orientation.direction.reverse(), orientation.quadrant),
        ),
        2 => (x, (-(y * step - y2) + y1) / step, orientation),
        _ => (
            (x * step - y2 - y1) / step,
            -y,
            GenericSceneryOrientation::new(orientation.direction.reverse(), orientation.quadrant),
        ),
    };
    (RelativeTile::new(saturate(x), saturate(y)), orientation)
}

fn saturate(value: i32) -> i8 {
    i8::try_from(value).unwrap_or(if value < 0 { i8::MIN } else { i8::MAX })
}

#[cfg(test)]
mod tests {
    use super::*;
    use track_design_core::Direction;

    const TOWER: (i32, i32, i32, i32) = (0, 32, 0, 32);

    #[test]
    fn large_anchor_shifts_by_the_footprint_depth() {
        let facing = |direction| GenericSceneryOrientation::new(direction, 0);
        let (position, _) = mirror_large(RelativeTile::new(2, 3), facing(Direction::West), TOWER);
        assert_eq!(position, RelativeTile::new(2, -4));

        let (position, orientation) =
            mirror_large(RelativeTile::new(2, 3), facing(Direction::North), TOWER);
        assert_eq!(position, RelativeTile::new(3, -3));
        assert_eq!(orientation.direction, Direction::South);

        let (position, orientation) = mirror_large(position, orientation, TOWER);
        assert_eq!(position, RelativeTile::new(2, 3), "mirroring twice restores the anchor");
        assert_eq!(orientation.direction, Direction::North);
    }

    #[test]
    fn east_facing_objects_keep_their_column() {
        let (position, orientation) = mirror_large(
            RelativeTile::new(-1, 2),
            GenericSceneryOrientation::new(Direction::East, 0),
            TOWER,
        );
        assert_eq!(position, RelativeTile::new(-1, -1));
        assert_eq!(orientation.direction, Direction::East);
    }
}
