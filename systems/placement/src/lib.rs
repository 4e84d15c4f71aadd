#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Placement engine that walks a [`TrackDesign`] and outlines, probes,
//! validates, builds or removes it at a chosen origin and rotation.
//!
//! Every operation shares one walk over the record: track pieces (or maze
//! cells) first, then entrances and exits, then scenery in two phases. What
//! happens at each element is decided by the strategy selected from the
//! [`Operation`]. The walk is aborted on the first rejected mutation; earlier
//! mutations stay in the world.

use std::fmt;

use thiserror::Error;
use tracing::debug;
use track_design_core::{
    normalize::{to_absolute, to_absolute_height},
    ActionFlags, CoordsXY, MazeElement, Money, RejectReason, TrackDesign,
};

mod context;
mod operation;
mod scenery;
mod strategies;
mod strategy;

pub use context::{PlacementReport, PlacementRequest};
pub use operation::{Operation, PlacementTarget};

use context::PlacementContext;
use operation::{GHOST_FLAGS, PREVIEW_FLAGS};
use strategies::{
    CommitStrategy, GhostRemovalStrategy, OutlineStrategy, ProbeStrategy, QueryStrategy,
};
use strategy::{
    EntrancePlacement, MazeMarker, MazePlacement, PlacementStrategy, SceneryPhase,
    SceneryPlacement, TrackPiecePlacement,
};

/// Kind of design element a failure refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ElementKind {
    /// Entry of the track element list.
    TrackPiece,
    /// Entry of the entrance element list.
    Entrance,
    /// Entry of the maze element list.
    MazeElement,
    /// Entry of the scenery element list.
    Scenery,
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            ElementKind::TrackPiece => "track piece",
            ElementKind::Entrance => "entrance",
            ElementKind::MazeElement => "maze element",
            ElementKind::Scenery => "scenery element",
        };
        f.write_str(text)
    }
}

/// Reasons a placement call fails.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum PlacementError {
    /// The world declined the mutation for one element.
    #[error("{element} {index} was rejected: {reason}")]
    MutationRejected {
        /// Kind of element.
        element: ElementKind,
        /// Position of the element within its list.
        index: usize,
        /// Reason given by the world.
        reason: RejectReason,
    },
}

/// Runs `operation` for `design` placed as described by `request`.
pub fn place<W: PlacementTarget + ?Sized>(
    design: &TrackDesign,
    operation: Operation<'_, W>,
    request: &PlacementRequest,
) -> Result<PlacementReport, PlacementError> {
    let mut context = PlacementContext::new(operation.name(), request);
    let outcome = match operation {
        Operation::DrawOutlines => walk(design, &mut context, &mut OutlineStrategy),
        Operation::GetPlaceZ(world) => walk(design, &mut context, &mut ProbeStrategy::new(world)),
        Operation::PlaceQuery(world) => walk(design, &mut context, &mut QueryStrategy::new(world)),
        Operation::Place(world) => walk(
            design,
            &mut context,
            &mut CommitStrategy::new(world, ActionFlags::APPLY),
        ),
        Operation::PlaceGhost(world) => walk(
            design,
            &mut context,
            &mut CommitStrategy::new(world, GHOST_FLAGS),
        ),
        Operation::PlaceTrackPreview(world) => walk(
            design,
            &mut context,
            &mut CommitStrategy::new(world, PREVIEW_FLAGS),
        ),
        Operation::RemoveGhost(world) => walk(
            design,
            &mut context,
            &mut GhostRemovalStrategy::new(world),
        ),
    };

    match outcome {
        Ok(()) => {
            debug!(
                operation = context.operation,
                ride = context.ride.get(),
                cost = %context.cost,
                place_z = context.place_z - context.scenery_z,
                "placement finished"
            );
            Ok(context.into_report())
        }
        Err(error) => {
            debug!(operation = context.operation, %error, "placement aborted");
            Err(error)
        }
    }
}

/// Total cost of a placement call; [`Money::UNDEFINED`] when it failed.
#[must_use]
pub fn total_cost(result: &Result<PlacementReport, PlacementError>) -> Money {
    match result {
        Ok(report) => report.cost,
        Err(_) => Money::UNDEFINED,
    }
}

fn walk<S: PlacementStrategy>(
    design: &TrackDesign,
    context: &mut PlacementContext,
    strategy: &mut S,
) -> Result<(), PlacementError> {
    strategy.begin(context);
    if design.is_maze() {
        walk_maze(design, context, strategy)?;
    } else {
        walk_track(design, context, strategy)?;
        walk_entrances(design, context, strategy)?;
    }
    walk_scenery(design, context, strategy)?;
    strategy.finish(context)
}

fn walk_track<S: PlacementStrategy>(
    design: &TrackDesign,
    context: &mut PlacementContext,
    strategy: &mut S,
) -> Result<(), PlacementError> {
    let mut cursor = context.origin;
    let mut direction = context.rotation;
    for (index, element) in design.track_elements.iter().enumerate() {
        let coordinates = element.piece.coordinates();
        let piece = TrackPiecePlacement {
            index,
            piece: element.piece,
            flags: element.flags,
            location: cursor.xy().with_z(cursor.z - coordinates.z_begin),
            direction,
        };
        for position in piece.block_positions() {
            context.include_structure(position);
        }
        strategy.track_piece(context, &piece)?;

        let end = piece.location.xy() + CoordsXY::new(coordinates.x, coordinates.y).rotate(direction);
        direction = element.piece.exit_direction(direction);
        cursor = (end + direction.delta()).with_z(piece.location.z + coordinates.z_end);
    }
    Ok(())
}

fn walk_entrances<S: PlacementStrategy>(
    design: &TrackDesign,
    context: &mut PlacementContext,
    strategy: &mut S,
) -> Result<(), PlacementError> {
    for (index, element) in design.entrance_elements.iter().enumerate() {
        let entrance = EntrancePlacement {
            index,
            location: to_absolute(element.position, context.origin.xy(), context.rotation)
                .with_z(to_absolute_height(element.z, context.origin.z)),
            direction: element.direction.rotate(context.rotation),
            is_exit: element.is_exit,
        };
        context.include(entrance.location);
        strategy.entrance(context, &entrance)?;
    }
    Ok(())
}

fn walk_maze<S: PlacementStrategy>(
    design: &TrackDesign,
    context: &mut PlacementContext,
    strategy: &mut S,
) -> Result<(), PlacementError> {
    let rotation = context.rotation;
    for (index, element) in design.maze_elements.iter().enumerate() {
        let location = to_absolute(element.position(), context.origin.xy(), rotation)
            .with_z(context.origin.z);
        let marker = match *element {
            MazeElement::Entrance { direction, .. } => MazeMarker::Entrance(direction.rotate(rotation)),
            MazeElement::Exit { direction, .. } => MazeMarker::Exit(direction.rotate(rotation)),
            MazeElement::Cell { entry, .. } => MazeMarker::Cell(entry.rotate(rotation)),
        };
        if matches!(marker, MazeMarker::Cell(_)) {
            context.include_structure(location);
        } else {
            context.include(location);
        }
        strategy.maze_element(context, &MazePlacement {
            index,
            location,
            marker,
        })?;
    }
    Ok(())
}

fn walk_scenery<S: PlacementStrategy>(
    design: &TrackDesign,
    context: &mut PlacementContext,
    strategy: &mut S,
) -> Result<(), PlacementError> {
    context.has_scenery = !design.scenery_elements.is_empty();
    if !context.place_scenery {
        return Ok(());
    }
    for phase in [SceneryPhase::PlaceSurfaces, SceneryPhase::ConnectEdges] {
        for (index, element) in design.scenery_elements.iter().enumerate() {
            let scenery = SceneryPlacement {
                index,
                location: to_absolute(element.position, context.origin.xy(), context.rotation)
                    .with_z(to_absolute_height(element.z, context.origin.z)),
                rotation: context.rotation,
                element,
            };
            if phase == SceneryPhase::PlaceSurfaces {
                context.include(scenery.location);
            }
            strategy.scenery(context, &scenery, phase)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use track_design_core::{
        CoordsXYZ, Direction, RelativeTile, RideId, RideType, TileCoordsXY,
        TrackDesignEntranceElement, TrackDesignTrackElement, TrackFlags, TrackPiece,
    };

    type NoWorld = track_design_world::World;

    fn straight(pieces: usize) -> TrackDesign {
        let mut design = TrackDesign::new(RideType::SteelCoaster);
        design.track_elements = (0..pieces)
            .map(|_| TrackDesignTrackElement {
                piece: TrackPiece::Flat,
                flags: TrackFlags::default(),
            })
            .collect();
        design
    }

    fn request(rotation: Direction) -> PlacementRequest {
        PlacementRequest::new(CoordsXYZ::new(320, 320, 16), rotation, RideId::new(0))
    }

    #[test]
    fn outline_selects_every_piece_tile_and_sets_the_arrow() {
        let design = straight(3);
        let report = place(&design, Operation::<NoWorld>::DrawOutlines, &request(Direction::West))
            .expect("outlines never fail");
        let expected: Vec<_> = [10, 9, 8].iter().map(|x| TileCoordsXY::new(*x, 10)).collect();
        assert_eq!(report.selection.iter().rev().copied().collect::<Vec<_>>(), expected);
        assert_eq!(report.arrow, Some((CoordsXYZ::new(320, 320, 16), Direction::West)));
        assert_eq!(report.space_required(), (3, 1));
    }

    #[test]
    fn outline_turns_with_the_rotation() {
        let design = straight(3);
        let report = place(&design, Operation::<NoWorld>::DrawOutlines, &request(Direction::North))
            .expect("outlines never fail");
        assert_eq!(report.space_required(), (1, 3), "a northward line spans y");
        assert!(report.selection.contains(&TileCoordsXY::new(10, 12)));
    }

    #[test]
    fn entrances_are_rotated_with_the_design() {
        let mut design = straight(1);
        design.entrance_elements.push(TrackDesignEntranceElement {
            position: RelativeTile::new(0, 1),
            z: 0,
            direction: Direction::South,
            is_exit: false,
        });
        let report = place(&design, Operation::<NoWorld>::DrawOutlines, &request(Direction::East))
            .expect("outlines never fail");
        assert!(
            report.selection.contains(&TileCoordsXY::new(10, 9)),
            "one tile to the side of the origin, turned twice"
        );
        assert_eq!(report.space_required(), (1, 1), "entrances stay outside the footprint");
    }

    #[test]
    fn failed_calls_have_an_undefined_total() {
        let failure: Result<PlacementReport, PlacementError> = Err(PlacementError::MutationRejected {
            element: ElementKind::TrackPiece,
            index: 0,
            reason: RejectReason::Occupied,
        });
        assert!(total_cost(&failure).is_undefined());
    }

    #[test]
    fn rejection_message_names_the_element() {
        let error = PlacementError::MutationRejected {
            element: ElementKind::Entrance,
            index: 1,
            reason: RejectReason::Occupied,
        };
        assert_eq!(error.to_string(), "entrance 1 was rejected: space is already occupied");
    }
}
