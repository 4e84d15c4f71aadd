//! Per-call placement state and the report it turns into.

use std::collections::BTreeSet;

use track_design_core::{
    BoundingBox, CoordsXYZ, DesignFlags, Direction, Money, RideId, TileCoordsXY,
};

/// Where and how a design should be placed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlacementRequest {
    /// Begin point of the first track piece, or the first maze tile.
    pub origin: CoordsXYZ,
    /// Direction the design's canonical west facing is turned to.
    pub rotation: Direction,
    /// Ride that receives the placed pieces.
    pub ride: RideId,
    /// Whether scenery elements are placed.
    pub place_scenery: bool,
    /// Whether the placement is a replay of an earlier one.
    pub replay: bool,
}

impl PlacementRequest {
    /// Creates a request that places scenery and is not a replay.
    #[must_use]
    pub const fn new(origin: CoordsXYZ, rotation: Direction, ride: RideId) -> Self {
        Self {
            origin,
            rotation,
            ride,
            place_scenery: true,
            replay: false,
        }
    }

    /// Same request without scenery.
    #[must_use]
    pub const fn without_scenery(mut self) -> Self {
        self.place_scenery = false;
        self
    }

    /// Same request marked as a replay.
    #[must_use]
    pub const fn replayed(mut self) -> Self {
        self.replay = true;
        self
    }
}

/// State owned by a single placement call.
#[derive(Debug)]
pub(crate) struct PlacementContext {
    pub(crate) operation: &'static str,
    pub(crate) ride: RideId,
    pub(crate) origin: CoordsXYZ,
    pub(crate) rotation: Direction,
    pub(crate) bounds: BoundingBox,
    pub(crate) footprint: Option<BoundingBox>,
    pub(crate) selection: BTreeSet<TileCoordsXY>,
    pub(crate) arrow: Option<(CoordsXYZ, Direction)>,
    pub(crate) cost: Money,
    pub(crate) place_z: i32,
    pub(crate) scenery_z: i32,
    pub(crate) entrance_exit_placed: bool,
    pub(crate) scenery_unavailable: bool,
    pub(crate) has_scenery: bool,
    pub(crate) place_scenery: bool,
    pub(crate) replay: bool,
}

impl PlacementContext {
    pub(crate) fn new(operation: &'static str, request: &PlacementRequest) -> Self {
        Self {
            operation,
            ride: request.ride,
            origin: request.origin,
            rotation: request.rotation,
            bounds: BoundingBox::at(request.origin),
            footprint: None,
            selection: BTreeSet::new(),
            arrow: None,
            cost: Money::ZERO,
            place_z: 0,
            scenery_z: 0,
            entrance_exit_placed: false,
            scenery_unavailable: false,
            has_scenery: false,
            place_scenery: request.place_scenery,
            replay: request.replay,
        }
    }

    /// Grows the bounding box.
    pub(crate) fn include(&mut self, position: CoordsXYZ) {
        self.bounds.include(position);
    }

    /// Grows both the bounding box and the structural footprint.
    pub(crate) fn include_structure(&mut self, position: CoordsXYZ) {
        self.bounds.include(position);
        match &mut self.footprint {
            Some(footprint) => footprint.include(position),
            None => self.footprint = Some(BoundingBox::at(position)),
        }
    }

    /// Marks a tile as touched by the design.
    pub(crate) fn select(&mut self, position: CoordsXYZ) {
        let _ = self.selection.insert(position.xy().to_tile());
    }

    /// Adds the cost of one accepted action.
    pub(crate) fn charge(&mut self, cost: Money) {
        self.cost = self.cost.saturating_add(cost);
    }

    pub(crate) fn into_report(self) -> PlacementReport {
        PlacementReport {
            cost: self.cost,
            place_z: self.place_z - self.scenery_z,
            bounds: self.bounds,
            footprint: self.footprint.unwrap_or_else(|| BoundingBox::at(self.origin)),
            selection: self.selection,
            arrow: self.arrow,
            entrance_exit_placed: self.entrance_exit_placed,
            scenery_unavailable: self.scenery_unavailable,
            has_scenery: self.has_scenery,
        }
    }
}

/// Outcome of a successful placement call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlacementReport {
    /// Total cost of the accepted actions.
    pub cost: Money,
    /// Height adjustment found by a Z probe; zero for other operations.
    pub place_z: i32,
    /// Box around every position the design touches, scenery included.
    pub bounds: BoundingBox,
    /// Box around the track blocks or maze cells only.
    pub footprint: BoundingBox,
    /// Tiles touched by the design, filled by the outline operation.
    pub selection: BTreeSet<TileCoordsXY>,
    /// Construction arrow set by the outline operation.
    pub arrow: Option<(CoordsXYZ, Direction)>,
    /// Whether an entrance or exit was placed or accepted.
    pub entrance_exit_placed: bool,
    /// Whether some scenery object could not be resolved.
    pub scenery_unavailable: bool,
    /// Whether the design carries scenery.
    pub has_scenery: bool,
}

impl PlacementReport {
    /// Whether an entrance or exit was placed or accepted.
    #[must_use]
    pub const fn entrance_and_exit_placed(&self) -> bool {
        self.entrance_exit_placed
    }

    /// Tiles spanned by the footprint along x and y.
    #[must_use]
    pub const fn space_required(&self) -> (u32, u32) {
        self.footprint.tile_span()
    }

    /// Scenery related design flags observed during the call.
    #[must_use]
    pub fn design_flags(&self) -> DesignFlags {
        let mut flags = DesignFlags::empty();
        if self.has_scenery {
            flags.insert(DesignFlags::HAS_SCENERY);
        }
        if self.scenery_unavailable {
            flags.insert(DesignFlags::SCENERY_UNAVAILABLE);
        }
        flags
    }
}
