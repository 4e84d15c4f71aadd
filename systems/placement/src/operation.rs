//! Placement operations and the action flags each one issues.

use track_design_core::{ActionExecutor, ActionFlags, ObjectResolver, WorldQuery};

/// World capabilities the placement engine needs.
pub trait PlacementTarget: WorldQuery + ActionExecutor + ObjectResolver {}

impl<T> PlacementTarget for T where T: WorldQuery + ActionExecutor + ObjectResolver + ?Sized {}

/// What a placement call does, with the world access it needs.
#[derive(Debug)]
pub enum Operation<'w, W: ?Sized> {
    /// Collects the tiles, bounds and arrow of the design without a world.
    DrawOutlines,
    /// Finds how far the design must be raised to clear the terrain.
    GetPlaceZ(&'w W),
    /// Validates every action and totals the cost without mutating.
    PlaceQuery(&'w W),
    /// Builds the design for real.
    Place(&'w mut W),
    /// Builds the design as removable ghosts.
    PlaceGhost(&'w mut W),
    /// Builds the design for an off-screen preview.
    PlaceTrackPreview(&'w mut W),
    /// Removes ghosts built by [`Operation::PlaceGhost`] and demolishes the ride.
    RemoveGhost(&'w mut W),
}

impl<W: ?Sized> Operation<'_, W> {
    /// Short name used in logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Operation::DrawOutlines => "draw_outlines",
            Operation::GetPlaceZ(_) => "get_place_z",
            Operation::PlaceQuery(_) => "place_query",
            Operation::Place(_) => "place",
            Operation::PlaceGhost(_) => "place_ghost",
            Operation::PlaceTrackPreview(_) => "place_track_preview",
            Operation::RemoveGhost(_) => "remove_ghost",
        }
    }
}

/// Flags for committing ghosts, also used to remove them.
pub(crate) const GHOST_FLAGS: ActionFlags = ActionFlags::APPLY
    .union(ActionFlags::ALLOW_DURING_PAUSE)
    .union(ActionFlags::NO_SPEND)
    .union(ActionFlags::GHOST);

/// Flags for committing a preview build.
pub(crate) const PREVIEW_FLAGS: ActionFlags = ActionFlags::APPLY
    .union(ActionFlags::ALLOW_DURING_PAUSE)
    .union(ActionFlags::NO_SPEND);

/// Adds the replay marker when requested.
pub(crate) fn with_replay(flags: ActionFlags, replay: bool) -> ActionFlags {
    if replay {
        flags | ActionFlags::REPLAY
    } else {
        flags
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ghost_flags_never_spend() {
        assert!(GHOST_FLAGS.contains(ActionFlags::APPLY | ActionFlags::NO_SPEND | ActionFlags::GHOST));
        assert!(GHOST_FLAGS.contains(ActionFlags::ALLOW_DURING_PAUSE));
        assert!(!PREVIEW_FLAGS.contains(ActionFlags::GHOST));
    }

    #[test]
    fn replay_marker_is_added_on_request() {
        assert!(with_replay(ActionFlags::APPLY, true).contains(ActionFlags::REPLAY));
        assert_eq!(with_replay(ActionFlags::APPLY, false), ActionFlags::APPLY);
    }
}
