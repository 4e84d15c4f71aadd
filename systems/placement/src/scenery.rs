//! Object resolution and action building for design scenery.

use track_design_core::{
    Action, ObjectCategory, ObjectResolver, ObjectShape, ResolvedObject, SceneryOrientation,
};

use crate::strategy::SceneryPlacement;

/// Resolves the object of a scenery element, substituting the default path
/// or queue surface when a path object is not loaded.
pub(crate) fn resolve<R: ObjectResolver + ?Sized>(
    resolver: &R,
    scenery: &SceneryPlacement<'_>,
) -> Option<ResolvedObject> {
    if let Some(resolved) = resolver.resolve(&scenery.element.object) {
        return Some(resolved);
    }
    let SceneryOrientation::Path(path) = scenery.element.orientation else {
        return None;
    };
    let primary = resolver.default_path_surface(path.is_queue)?;
    Some(ResolvedObject {
        category: ObjectCategory::Path,
        primary,
        secondary: resolver.default_railings(),
        shape: ObjectShape::Plain,
        available: true,
    })
}

/// Action placing `scenery` as the resolved object, or `None` when the
/// object category and the stored orientation disagree.
pub(crate) fn place_action<R: ObjectResolver + ?Sized>(
    resolver: &R,
    scenery: &SceneryPlacement<'_>,
    resolved: &ResolvedObject,
) -> Option<Action> {
    let element = scenery.element;
    let location = scenery.location;
    match (resolved.category, element.orientation.rotate(scenery.rotation)) {
        (ObjectCategory::SmallScenery, SceneryOrientation::Generic(orientation)) => {
            Some(Action::PlaceSmallScenery {
                location,
                direction: orientation.direction,
                quadrant: orientation.quadrant,
                object: resolved.primary,
                primary_colour: element.primary_colour,
                secondary_colour: element.secondary_colour,
            })
        }
        (ObjectCategory::LargeScenery, SceneryOrientation::Generic(orientation)) => {
            Some(Action::PlaceLargeScenery {
                location,
                direction: orientation.direction,
                object: resolved.primary,
                primary_colour: element.primary_colour,
                secondary_colour: element.secondary_colour,
            })
        }
        (ObjectCategory::Wall, SceneryOrientation::Wall(orientation)) => Some(Action::PlaceWall {
            location,
            direction: orientation.direction,
            object: resolved.primary,
            primary_colour: element.primary_colour,
            secondary_colour: element.secondary_colour,
            tertiary_colour: orientation.tertiary_colour,
        }),
        (ObjectCategory::Path, SceneryOrientation::Path(orientation)) => {
            let railings = resolved.secondary.or_else(|| resolver.default_railings())?;
            Some(Action::PlaceFootpathFromTrack {
                location,
                slope: orientation.slope,
                surface: resolved.primary,
                railings,
                edges: orientation.edges,
                is_queue: orientation.is_queue,
            })
        }
        _ => None,
    }
}

/// Action removing a ghost of `scenery`.
pub(crate) fn remove_action(scenery: &SceneryPlacement<'_>, resolved: &ResolvedObject) -> Option<Action> {
    let location = scenery.location;
    match (resolved.category, scenery.element.orientation.rotate(scenery.rotation)) {
        (ObjectCategory::SmallScenery, SceneryOrientation::Generic(orientation)) => {
            let quadrant = match &resolved.shape {
                ObjectShape::Small(shape)
                    if !(shape.diagonal && !shape.full_tile)
                        && (shape.diagonal || shape.half_space || shape.three_quarters) =>
                {
                    0
                }
                _ => orientation.quadrant,
            };
            Some(Action::RemoveSmallScenery {
                location,
                quadrant,
                object: resolved.primary,
            })
        }
        (ObjectCategory::LargeScenery, SceneryOrientation::Generic(orientation)) => {
            Some(Action::RemoveLargeScenery {
                location,
                direction: orientation.direction,
            })
        }
        (ObjectCategory::Wall, SceneryOrientation::Wall(orientation)) => Some(Action::RemoveWall {
            location,
            direction: orientation.direction,
        }),
        (ObjectCategory::Path, SceneryOrientation::Path(_)) => {
            Some(Action::RemoveFootpath { location })
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use track_design_core::{
        CoordsXYZ, Direction, GenericSceneryOrientation, ObjectIndex, ObjectReference,
        RelativeTile, SmallSceneryShape, TrackDesignSceneryElement,
    };

    fn small(shape: SmallSceneryShape) -> ResolvedObject {
        ResolvedObject {
            category: ObjectCategory::SmallScenery,
            primary: ObjectIndex::new(3),
            secondary: None,
            shape: ObjectShape::Small(shape),
            available: true,
        }
    }

    fn element(quadrant: u8) -> TrackDesignSceneryElement {
        TrackDesignSceneryElement {
            position: RelativeTile::new(1, 1),
            z: 0,
            object: ObjectReference::new("rct2.scenery_small.bush"),
            primary_colour: 1,
            secondary_colour: 2,
            orientation: SceneryOrientation::Generic(GenericSceneryOrientation::new(
                Direction::North,
                quadrant,
            )),
        }
    }

    fn removal_quadrant(shape: SmallSceneryShape, rotation: Direction) -> Option<u8> {
        let element = element(1);
        let placement = SceneryPlacement {
            index: 0,
            location: CoordsXYZ::new(64, 64, 16),
            rotation,
            element: &element,
        };
        match remove_action(&placement, &small(shape)) {
            Some(Action::RemoveSmallScenery { quadrant, .. }) => Some(quadrant),
            _ => None,
        }
    }

    #[test]
    fn quarter_tile_scenery_removal_uses_the_rotated_quadrant() {
        let quarter = SmallSceneryShape::default();
        assert_eq!(removal_quadrant(quarter, Direction::East), Some(3));
    }

    #[test]
    fn half_and_three_quarter_scenery_removal_uses_quadrant_zero() {
        let half = SmallSceneryShape {
            half_space: true,
            ..SmallSceneryShape::default()
        };
        let three_quarters = SmallSceneryShape {
            three_quarters: true,
            ..SmallSceneryShape::default()
        };
        assert_eq!(removal_quadrant(half, Direction::North), Some(0));
        assert_eq!(removal_quadrant(three_quarters, Direction::North), Some(0));
    }

    #[test]
    fn diagonal_scenery_removal_depends_on_full_tile() {
        let diagonal = SmallSceneryShape {
            diagonal: true,
            ..SmallSceneryShape::default()
        };
        let full_diagonal = SmallSceneryShape {
            diagonal: true,
            full_tile: true,
            ..SmallSceneryShape::default()
        };
        assert_eq!(removal_quadrant(diagonal, Direction::West), Some(1));
        assert_eq!(removal_quadrant(full_diagonal, Direction::West), Some(0));
    }
}
