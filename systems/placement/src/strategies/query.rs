use track_design_core::{Action, ActionFlags};
use tracing::warn;

use super::{settle, track_settings};
use crate::{
    context::PlacementContext,
    operation::with_replay,
    scenery,
    strategy::{
        EntrancePlacement, MazeMarker, MazePlacement, PlacementStrategy, SceneryPhase,
        SceneryPlacement, TrackPiecePlacement,
    },
    ElementKind, PlacementError, PlacementTarget,
};

/// Validates every element and totals the cost without touching the world.
#[derive(Debug)]
pub(crate) struct QueryStrategy<'w, W: ?Sized> {
    world: &'w W,
}

impl<'w, W: PlacementTarget + ?Sized> QueryStrategy<'w, W> {
    pub(crate) fn new(world: &'w W) -> Self {
        Self { world }
    }

    fn query_entrance(
        &self,
        context: &mut PlacementContext,
        action: &Action,
        element: ElementKind,
        index: usize,
    ) -> Result<(), PlacementError> {
        let result = self
            .world
            .query(action, with_replay(ActionFlags::empty(), context.replay));
        settle(context, result, element, index)?;
        context.entrance_exit_placed = true;
        Ok(())
    }
}

impl<W: PlacementTarget + ?Sized> PlacementStrategy for QueryStrategy<'_, W> {
    fn track_piece(
        &mut self,
        context: &mut PlacementContext,
        piece: &TrackPiecePlacement,
    ) -> Result<(), PlacementError> {
        let action = Action::PlaceTrack {
            ride: context.ride,
            piece: piece.piece,
            location: piece.location,
            direction: piece.direction,
            settings: track_settings(piece),
        };
        let result = self
            .world
            .query(&action, with_replay(ActionFlags::NO_SPEND, context.replay));
        settle(context, result, ElementKind::TrackPiece, piece.index)
    }

    fn entrance(
        &mut self,
        context: &mut PlacementContext,
        entrance: &EntrancePlacement,
    ) -> Result<(), PlacementError> {
        let action = Action::QueryEntranceExitPlacement {
            location: entrance.location,
            is_exit: entrance.is_exit,
        };
        self.query_entrance(context, &action, ElementKind::Entrance, entrance.index)
    }

    fn maze_element(
        &mut self,
        context: &mut PlacementContext,
        element: &MazePlacement,
    ) -> Result<(), PlacementError> {
        match element.marker {
            MazeMarker::Entrance(_) | MazeMarker::Exit(_) => {
                let action = Action::QueryEntranceExitPlacement {
                    location: element.location,
                    is_exit: matches!(element.marker, MazeMarker::Exit(_)),
                };
                self.query_entrance(context, &action, ElementKind::MazeElement, element.index)
            }
            MazeMarker::Cell(entry) => {
                let action = Action::PlaceMazeTrack {
                    ride: context.ride,
                    location: element.location,
                    maze_entry: entry.bits(),
                };
                let result = self
                    .world
                    .query(&action, with_replay(ActionFlags::empty(), context.replay));
                settle(context, result, ElementKind::MazeElement, element.index)
            }
        }
    }

    fn scenery(
        &mut self,
        context: &mut PlacementContext,
        scenery: &SceneryPlacement<'_>,
        phase: SceneryPhase,
    ) -> Result<(), PlacementError> {
        if phase == SceneryPhase::ConnectEdges {
            return Ok(());
        }
        let Some(action) = scenery::resolve(self.world, scenery)
            .and_then(|resolved| scenery::place_action(self.world, scenery, &resolved))
        else {
            warn!(object = %scenery.element.object, "scenery object is not available");
            context.scenery_unavailable = true;
            return Ok(());
        };
        let result = self
            .world
            .query(&action, with_replay(ActionFlags::empty(), context.replay));
        settle(context, result, ElementKind::Scenery, scenery.index)
    }
}
