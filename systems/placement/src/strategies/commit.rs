use track_design_core::{
    Action, ActionFlags, SceneryOrientation, StationIndex, TileElementKind,
};
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

/// Applies every element to the world with one flag bundle.
#[derive(Debug)]
pub(crate) struct CommitStrategy<'w, W: ?Sized> {
    world: &'w mut W,
    flags: ActionFlags,
}

impl<'w, W: PlacementTarget + ?Sized> CommitStrategy<'w, W> {
    pub(crate) fn new(world: &'w mut W, flags: ActionFlags) -> Self {
        Self { world, flags }
    }

    fn execute(
        &mut self,
        context: &mut PlacementContext,
        action: &Action,
        element: ElementKind,
        index: usize,
    ) -> Result<(), PlacementError> {
        let result = self
            .world
            .execute(action, with_replay(self.flags, context.replay));
        settle(context, result, element, index)
    }

    /// Station of the ride's track the hut faces, at the hut's height.
    fn facing_station(
        &self,
        context: &PlacementContext,
        entrance: &EntrancePlacement,
    ) -> Option<StationIndex> {
        self.world
            .tile_elements(entrance.station_tile().to_tile())
            .iter()
            .find_map(|element| match element.kind {
                TileElementKind::Track(track)
                    if track.ride == context.ride && element.base_z == entrance.location.z =>
                {
                    Some(track.station)
                }
                _ => None,
            })
    }
}

impl<W: PlacementTarget + ?Sized> PlacementStrategy for CommitStrategy<'_, W> {
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
        self.execute(context, &action, ElementKind::TrackPiece, piece.index)
    }

    fn entrance(
        &mut self,
        context: &mut PlacementContext,
        entrance: &EntrancePlacement,
    ) -> Result<(), PlacementError> {
        let Some(station) = self.facing_station(context, entrance) else {
            warn!(
                index = entrance.index,
                x = entrance.location.x,
                y = entrance.location.y,
                z = entrance.location.z,
                "no station track in front of entrance, skipping"
            );
            return Ok(());
        };
        let action = Action::PlaceEntranceExit {
            ride: context.ride,
            location: entrance.location,
            direction: entrance.direction,
            station,
            is_exit: entrance.is_exit,
        };
        self.execute(context, &action, ElementKind::Entrance, entrance.index)?;
        context.entrance_exit_placed = true;
        Ok(())
    }

    fn maze_element(
        &mut self,
        context: &mut PlacementContext,
        element: &MazePlacement,
    ) -> Result<(), PlacementError> {
        let action = match element.marker {
            MazeMarker::Entrance(direction) | MazeMarker::Exit(direction) => {
                Action::PlaceEntranceExit {
                    ride: context.ride,
                    location: element.location,
                    direction,
                    station: StationIndex::new(0),
                    is_exit: matches!(element.marker, MazeMarker::Exit(_)),
                }
            }
            MazeMarker::Cell(entry) => Action::PlaceMazeTrack {
                ride: context.ride,
                location: element.location,
                maze_entry: entry.bits(),
            },
        };
        self.execute(context, &action, ElementKind::MazeElement, element.index)?;
        if !matches!(element.marker, MazeMarker::Cell(_)) {
            context.entrance_exit_placed = true;
        }
        Ok(())
    }

    fn scenery(
        &mut self,
        context: &mut PlacementContext,
        scenery: &SceneryPlacement<'_>,
        phase: SceneryPhase,
    ) -> Result<(), PlacementError> {
        let resolved = scenery::resolve(&*self.world, scenery);
        match phase {
            SceneryPhase::PlaceSurfaces => {
                let Some(action) = resolved
                    .and_then(|resolved| scenery::place_action(&*self.world, scenery, &resolved))
                else {
                    warn!(object = %scenery.element.object, "scenery object is not available");
                    context.scenery_unavailable = true;
                    return Ok(());
                };
                self.execute(context, &action, ElementKind::Scenery, scenery.index)
            }
            SceneryPhase::ConnectEdges => {
                let is_path = matches!(scenery.element.orientation, SceneryOrientation::Path(_));
                if !is_path || resolved.is_none() {
                    return Ok(());
                }
                let action = Action::ConnectFootpathEdges {
                    location: scenery.location,
                };
                self.execute(context, &action, ElementKind::Scenery, scenery.index)
            }
        }
    }
}
