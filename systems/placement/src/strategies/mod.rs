//! One strategy per placement operation.

mod commit;
mod ghost;
mod outline;
mod probe;
mod query;

pub(crate) use commit::CommitStrategy;
pub(crate) use ghost::GhostRemovalStrategy;
pub(crate) use outline::OutlineStrategy;
pub(crate) use probe::ProbeStrategy;
pub(crate) use query::QueryStrategy;

use track_design_core::{ActionResult, TrackPlacementSettings};

use crate::{context::PlacementContext, strategy::TrackPiecePlacement, ElementKind, PlacementError};

/// Charges an accepted action or turns a rejection into a placement failure.
fn settle(
    context: &mut PlacementContext,
    result: ActionResult,
    element: ElementKind,
    index: usize,
) -> Result<(), PlacementError> {
    match result.error {
        None => {
            context.charge(result.cost);
            Ok(())
        }
        Some(reason) => Err(PlacementError::MutationRejected {
            element,
            index,
            reason,
        }),
    }
}

/// Unpacks the design flag byte into placement settings.
fn track_settings(piece: &TrackPiecePlacement) -> TrackPlacementSettings {
    let setting = piece.flags.setting();
    let (brake_speed, seat_rotation) = if piece.piece.has_speed_setting() {
        (setting.saturating_mul(2), 0)
    } else {
        (0, setting)
    };
    TrackPlacementSettings {
        brake_speed,
        colour_scheme: piece.flags.colour_scheme(),
        seat_rotation,
        chain_lift: piece.flags.chain_lift(),
        inverted: piece.flags.inverted(),
    }
}
