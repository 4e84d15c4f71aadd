use crate::{
    context::PlacementContext,
    strategy::{
        EntrancePlacement, MazePlacement, PlacementStrategy, SceneryPhase, SceneryPlacement,
        TrackPiecePlacement,
    },
    PlacementError,
};

/// Collects the selection tiles and the construction arrow.
#[derive(Debug, Default)]
pub(crate) struct OutlineStrategy;

impl PlacementStrategy for OutlineStrategy {
    fn begin(&mut self, context: &mut PlacementContext) {
        context.arrow = Some((context.origin, context.rotation));
    }

    fn track_piece(
        &mut self,
        context: &mut PlacementContext,
        piece: &TrackPiecePlacement,
    ) -> Result<(), PlacementError> {
        for position in piece.block_positions() {
            context.select(position);
        }
        Ok(())
    }

    fn entrance(
        &mut self,
        context: &mut PlacementContext,
        entrance: &EntrancePlacement,
    ) -> Result<(), PlacementError> {
        context.select(entrance.location);
        Ok(())
    }

    fn maze_element(
        &mut self,
        context: &mut PlacementContext,
        element: &MazePlacement,
    ) -> Result<(), PlacementError> {
        context.select(element.location);
        Ok(())
    }

    fn scenery(
        &mut self,
        context: &mut PlacementContext,
        scenery: &SceneryPlacement<'_>,
        phase: SceneryPhase,
    ) -> Result<(), PlacementError> {
        if phase == SceneryPhase::PlaceSurfaces {
            context.select(scenery.location);
        }
        Ok(())
    }
}
