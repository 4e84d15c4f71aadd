use track_design_core::{CoordsXYZ, COORDS_Z_STEP};
use tracing::warn;

use crate::{
    context::PlacementContext,
    scenery,
    strategy::{
        EntrancePlacement, MazePlacement, PlacementStrategy, SceneryPhase, SceneryPlacement,
        TrackPiecePlacement,
    },
    PlacementError, PlacementTarget,
};

/// Finds how far the design must be lifted so no block sits below the land.
#[derive(Debug)]
pub(crate) struct ProbeStrategy<'w, W: ?Sized> {
    world: &'w W,
}

impl<'w, W: PlacementTarget + ?Sized> ProbeStrategy<'w, W> {
    pub(crate) fn new(world: &'w W) -> Self {
        Self { world }
    }

    fn raise_above_surface(&self, context: &mut PlacementContext, position: CoordsXYZ) {
        let Some(surface) = self.world.surface_height(position.xy().to_tile()) else {
            return;
        };
        let difference = position.z + context.place_z - surface;
        if difference < 0 {
            context.place_z -= difference;
        }
    }
}

impl<W: PlacementTarget + ?Sized> PlacementStrategy for ProbeStrategy<'_, W> {
    fn track_piece(
        &mut self,
        context: &mut PlacementContext,
        piece: &TrackPiecePlacement,
    ) -> Result<(), PlacementError> {
        for position in piece.block_positions() {
            self.raise_above_surface(context, position);
        }
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
        context: &mut PlacementContext,
        element: &MazePlacement,
    ) -> Result<(), PlacementError> {
        self.raise_above_surface(context, element.location);
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
        if scenery::resolve(self.world, scenery).is_none() {
            warn!(object = %scenery.element.object, "scenery object is not available");
            context.scenery_unavailable = true;
            return Ok(());
        }
        let z = i32::from(scenery.element.z) * COORDS_Z_STEP + context.place_z;
        context.scenery_z = context.scenery_z.min(z);
        Ok(())
    }
}
