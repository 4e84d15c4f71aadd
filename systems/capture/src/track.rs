//! Capture of rides built from connected track pieces.

use track_design_core::{
    graph::{self, TrackPosition},
    normalize::{to_relative, to_relative_height},
    EntranceKind, Ride, TrackDesign, TrackDesignEntranceElement, TrackDesignTrackElement,
    TrackFlags, WorldQuery,
};
use tracing::debug;

use crate::{CaptureConfig, CaptureError, CappedCollection, Origin, RequiredElement};

/// Appends the track pieces and the station huts of `ride` to `design`.
pub(crate) fn capture_track<W: WorldQuery + ?Sized>(
    world: &W,
    ride: &Ride,
    config: &CaptureConfig,
    design: &mut TrackDesign,
) -> Result<Origin, CaptureError> {
    let any_piece = graph::find_origin_piece(world, ride.id)
        .ok_or(CaptureError::RequiredElementMissing(RequiredElement::Track))?;
    let start = graph::start_of_track(world, any_piece);
    let origin = Origin {
        location: start.begin(),
        direction: start.direction,
    };

    let mut current = start;
    loop {
        design.track_elements.push(TrackDesignTrackElement {
            piece: current.piece,
            flags: pack_flags(ride, &current),
        });
        if design.track_elements.len() > config.max_track_elements {
            return Err(CaptureError::ElementCapExceeded {
                collection: CappedCollection::TrackElements,
                limit: config.max_track_elements,
            });
        }
        match graph::next_piece(world, &current) {
            Some(next) if is_same_piece(&next, &start) => break,
            Some(next) => current = next,
            None => break,
        }
    }

    capture_station_huts(world, ride, origin, design)?;
    debug!(
        ride = ride.id.get(),
        pieces = design.track_elements.len(),
        huts = design.entrance_elements.len(),
        "captured track"
    );
    Ok(origin)
}

fn is_same_piece(a: &TrackPosition, b: &TrackPosition) -> bool {
    a.location == b.location && a.piece == b.piece && a.direction == b.direction
}

fn pack_flags(ride: &Ride, position: &TrackPosition) -> TrackFlags {
    let element = &position.element;
    let setting = if position.piece.has_speed_setting() {
        element.brake_speed >> 1
    } else {
        element.seat_rotation
    };
    let inverted = ride.ride_type.has_alternative_track_type() && element.inverted;
    TrackFlags::pack(setting, element.colour_scheme, inverted, element.chain_lift)
}

/// Entrances of every station first, then exits.
fn capture_station_huts<W: WorldQuery + ?Sized>(
    world: &W,
    ride: &Ride,
    origin: Origin,
    design: &mut TrackDesign,
) -> Result<(), CaptureError> {
    for kind in [EntranceKind::Entrance, EntranceKind::Exit] {
        for station in &ride.stations {
            let location = match kind {
                EntranceKind::Entrance => station.entrance,
                EntranceKind::Exit => station.exit,
            };
            let Some(location) = location else {
                continue;
            };
            let hut = world.tile_elements(location.tile).iter().find(|element| {
                element.base_z == station.height
                    && element
                        .as_entrance()
                        .is_some_and(|hut| hut.ride == ride.id && hut.kind == kind)
            });
            let Some(hut) = hut else {
                continue;
            };
            design.entrance_elements.push(TrackDesignEntranceElement {
                position: to_relative(location.tile.to_coords(), origin.location.xy(), origin.direction)?,
                z: to_relative_height(station.height, origin.location.z)?,
                direction: hut.direction.rotate_back(origin.direction),
                is_exit: kind == EntranceKind::Exit,
            });
        }
    }
    Ok(())
}
