use track_design_core::Action;
use tracing::debug;

use crate::{
    context::PlacementContext,
    operation::{with_replay, GHOST_FLAGS},
    scenery,
    strategy::{
        EntrancePlacement, MazePlacement, PlacementStrategy, SceneryPhase, SceneryPlacement,
        TrackPiecePlacement,
    },
    PlacementError, PlacementTarget,
};

/// Removes ghost track and scenery, then demolishes the ghost ride.
///
/// Entrances and maze cells belong to the ride and go with it.
#[derive(Debug)]
pub(crate) struct GhostRemovalStrategy<'w, W: ?Sized> {
    world: &'w mut W,
}

impl<'w, W: PlacementTarget + ?Sized> GhostRemovalStrategy<'w, W> {
    pub(crate) fn new(world: &'w mut W) -> Self {
        Self { world }
    }

    fn remove(&mut self, context: &PlacementContext, action: &Action) {
        let result = self
            .world
            .execute(action, with_replay(GHOST_FLAGS, context.replay));
        if let Some(reason) = result.error {
            debug!(?action, %reason, "ghost was already gone");
        }
    }
}

impl<W: PlacementTarget + ?Sized> PlacementStrategy for GhostRemovalStrategy<'_, W> {
    fn track_piece(
        &mut self,
        context: &mut PlacementContext,
        piece: &TrackPiecePlacement,
    ) -> Result<(), PlacementError> {
        let action = Action::RemoveTrack {
            piece: piece.piece,
            location: piece.location,
            direction: piece.direction,
        };
        self.remove(context, &action);
        Ok(())
    }

    fn entrance(
        &mut self,
        _context: &mut PlacementContext,
        _entrance: &EntrancePlacement,
    ) -> Result<(), PlacementError> {
        Ok(())
    }

    fn maze_element(
        &mut self,
        _context: &mut PlacementContext,
        _element: &MazePlacement,
    ) -> Result<(), PlacementError> {
        Ok(())
    }

    fn scenery(
        &mut self,
        context: &mut PlacementContext,
        scenery: &SceneryPlacement<'_>,
        phase: SceneryPhase,
    ) -> Result<(), PlacementError> {
        if phase != SceneryPhase::PlaceSurfaces {
            return Ok(());
        }
        let Some(resolved) = scenery::resolve(&*self.world, scenery) else {
            context.scenery_unavailable = true;
            return Ok(());
        };
        if let Some(action) = scenery::remove_action(scenery, &resolved) {
            self.remove(context, &action);
        }
        Ok(())
    }

    fn finish(&mut self, context: &mut PlacementContext) -> Result<(), PlacementError> {
        let action = Action::DemolishRide { ride: context.ride };
        self.remove(context, &action);
        Ok(())
    }
}
