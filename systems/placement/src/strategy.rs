//! Element positions handed to the per-operation strategies.

use track_design_core::{
    CoordsXY, CoordsXYZ, Direction, MazeEntry, TrackDesignSceneryElement, TrackFlags, TrackPiece,
};

use crate::{context::PlacementContext, PlacementError};

/// Track piece resolved to absolute map coordinates.
#[derive(Clone, Copy, Debug)]
pub(crate) struct TrackPiecePlacement {
    pub(crate) index: usize,
    pub(crate) piece: TrackPiece,
    pub(crate) flags: TrackFlags,
    /// Base of the first block.
    pub(crate) location: CoordsXYZ,
    pub(crate) direction: Direction,
}

impl TrackPiecePlacement {
    /// Tile corner and base height of every block of the piece.
    pub(crate) fn block_positions(&self) -> impl Iterator<Item = CoordsXYZ> + '_ {
        self.piece.blocks().iter().map(move |block| {
            (self.location.xy() + block.offset(self.direction)).with_z(self.location.z + block.z)
        })
    }
}

/// Ride entrance or exit resolved to absolute map coordinates.
#[derive(Clone, Copy, Debug)]
pub(crate) struct EntrancePlacement {
    pub(crate) index: usize,
    pub(crate) location: CoordsXYZ,
    pub(crate) direction: Direction,
    pub(crate) is_exit: bool,
}

impl EntrancePlacement {
    /// Tile corner of the station the hut faces.
    pub(crate) fn station_tile(&self) -> CoordsXY {
        self.location.xy() + self.direction.delta()
    }
}

/// What a maze element places.
#[derive(Clone, Copy, Debug)]
pub(crate) enum MazeMarker {
    Entrance(Direction),
    Exit(Direction),
    Cell(MazeEntry),
}

/// Maze element resolved to absolute map coordinates.
#[derive(Clone, Copy, Debug)]
pub(crate) struct MazePlacement {
    pub(crate) index: usize,
    pub(crate) location: CoordsXYZ,
    pub(crate) marker: MazeMarker,
}

/// Scenery element resolved to absolute map coordinates.
#[derive(Clone, Copy, Debug)]
pub(crate) struct SceneryPlacement<'a> {
    pub(crate) index: usize,
    pub(crate) location: CoordsXYZ,
    pub(crate) rotation: Direction,
    pub(crate) element: &'a TrackDesignSceneryElement,
}

/// Scenery is visited twice: first every element is placed, then paths are
/// connected to their neighbours once all path tiles exist.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum SceneryPhase {
    PlaceSurfaces,
    ConnectEdges,
}

/// Behaviour of one placement operation, one method per element kind.
pub(crate) trait PlacementStrategy {
    /// Called once before any element.
    fn begin(&mut self, _context: &mut PlacementContext) {}

    fn track_piece(
        &mut self,
        context: &mut PlacementContext,
        piece: &TrackPiecePlacement,
    ) -> Result<(), PlacementError>;

    fn entrance(
        &mut self,
        context: &mut PlacementContext,
        entrance: &EntrancePlacement,
    ) -> Result<(), PlacementError>;

    fn maze_element(
        &mut self,
        context: &mut PlacementContext,
        element: &MazePlacement,
    ) -> Result<(), PlacementError>;

    fn scenery(
        &mut self,
        context: &mut PlacementContext,
        scenery: &SceneryPlacement<'_>,
        phase: SceneryPhase,
    ) -> Result<(), PlacementError>;

    /// Called once after every element was visited.
    fn finish(&mut self, _context: &mut PlacementContext) -> Result<(), PlacementError> {
        Ok(())
    }
}
