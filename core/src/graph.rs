//! Track graph adjacency: locating pieces and stepping along connected track.

use crate::{
    coords::{CoordsXY, CoordsXYZ, Direction, TileCoordsXY},
    tile::{RideId, TileElement, TrackElement},
    track::TrackPiece,
    view::WorldQuery,
};

/// Upper bound on pieces visited while walking backwards to the start of a track.
const MAX_BACKWARD_STEPS: usize = 1 << 16;

/// A whole track piece located by its first block.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TrackPosition {
    /// Ride owning the piece.
    pub ride: RideId,
    /// Kind of piece.
    pub piece: TrackPiece,
    /// Tile corner and base height of the first block.
    pub location: CoordsXYZ,
    /// Direction the piece is entered with.
    pub direction: Direction,
    /// Payload stored on the first block.
    pub element: TrackElement,
}

impl TrackPosition {
    /// Point where the track enters the piece.
    #[must_use]
    pub const fn begin(&self) -> CoordsXYZ {
        CoordsXYZ::new(
            self.location.x,
            self.location.y,
            self.location.z + self.piece.coordinates().z_begin,
        )
    }

    /// Point where the next piece must begin.
    #[must_use]
    pub fn next_begin(&self) -> (CoordsXYZ, Direction) {
        let coordinates = self.piece.coordinates();
        let end = self.location.xy() + CoordsXY::new(coordinates.x, coordinates.y).rotate(self.direction);
        let exit = self.piece.exit_direction(self.direction);
        let next = end + exit.delta();
        (next.with_z(self.location.z + coordinates.z_end), exit)
    }
}

/// Resolves the first block of the piece that `element` belongs to.
#[must_use]
pub fn piece_origin<W: WorldQuery + ?Sized>(
    world: &W,
    tile: TileCoordsXY,
    element: &TileElement,
) -> Option<TrackPosition> {
    let track = element.as_track()?;
    let block = track.piece.block(track.sequence)?;
    let location = tile.to_coords() - block.offset(element.direction);
    let base_z = element.base_z - block.z;
    let origin_tile = location.to_tile();
    world
        .tile_elements(origin_tile)
        .iter()
        .find_map(|candidate| {
            let first = candidate.as_track()?;
            let matches = first.ride == track.ride
                && first.piece == track.piece
                && first.sequence == 0
                && candidate.direction == element.direction
                && candidate.base_z == base_z;
            matches.then_some(TrackPosition {
                ride: first.ride,
                piece: first.piece,
                location: location.with_z(base_z),
                direction: candidate.direction,
                element: *first,
            })
        })
}

/// Piece connected to the exit of `current`.
#[must_use]
pub fn next_piece<W: WorldQuery + ?Sized>(world: &W, current: &TrackPosition) -> Option<TrackPosition> {
    let (begin, direction) = current.next_begin();
    world
        .tile_elements(begin.xy().to_tile())
        .iter()
        .find_map(|candidate| {
            let track = candidate.as_track()?;
            let matches = track.ride == current.ride
                && track.sequence == 0
                && candidate.direction == direction
                && candidate.base_z + track.piece.coordinates().z_begin == begin.z;
            matches.then_some(TrackPosition {
                ride: track.ride,
                piece: track.piece,
                location: begin.xy().with_z(candidate.base_z),
                direction,
                element: *track,
            })
        })
}

/// Piece whose exit connects to the entry of `current`.
#[must_use]
pub fn previous_piece<W: WorldQuery + ?Sized>(
    world: &W,
    current: &TrackPosition,
) -> Option<TrackPosition> {
    let tile = (current.location.xy() - current.direction.delta()).to_tile();
    world.tile_elements(tile).iter().find_map(|candidate| {
        if candidate.as_track()?.ride != current.ride {
            return None;
        }
        let origin = piece_origin(world, tile, candidate)?;
        let (begin, direction) = origin.next_begin();
        (begin.xy() == current.location.xy()
            && begin.z == current.begin().z
            && direction == current.direction)
            .then_some(origin)
    })
}

/// First track block of `ride` in raster order, resolved to its piece.
#[must_use]
pub fn find_origin_piece<W: WorldQuery + ?Sized>(world: &W, ride: RideId) -> Option<TrackPosition> {
    let size = i32::try_from(world.map_size()).ok()?;
    for y in 0..size {
        for x in 0..size {
            let tile = TileCoordsXY::new(x, y);
            for element in world.tile_elements(tile) {
                if element.as_track().map(|track| track.ride) == Some(ride) {
                    if let Some(origin) = piece_origin(world, tile, element) {
                        return Some(origin);
                    }
                }
            }
        }
    }
    None
}

/// Walks backwards from `origin` to the first piece of an open track, or back
/// to `origin` itself when the track forms a closed circuit.
#[must_use]
pub fn start_of_track<W: WorldQuery + ?Sized>(world: &W, origin: TrackPosition) -> TrackPosition {
    let mut current = origin;
    for _ in 0..MAX_BACKWARD_STEPS {
        match previous_piece(world, &current) {
            Some(previous) if previous.location == origin.location && previous.piece == origin.piece => {
                return origin;
            }
            Some(previous) => current = previous,
            None => return current,
        }
    }
    current
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::tile::{Ride, StationIndex, TileElementKind};

    const RIDE: RideId = RideId::new(1);

    #[derive(Default)]
    struct Tiles(BTreeMap<TileCoordsXY, Vec<TileElement>>);

    impl WorldQuery for Tiles {
        fn map_size(&self) -> u32 {
            32
        }

        fn tile_elements(&self, tile: TileCoordsXY) -> &[TileElement] {
            self.0.get(&tile).map_or(&[][..], Vec::as_slice)
        }

        fn ride(&self, _: RideId) -> Option<&Ride> {
            None
        }
    }

    impl Tiles {
        fn flat(&mut self, tile: (i32, i32), direction: Direction) {
            let element = TileElement {
                base_z: 16,
                clearance_z: 32,
                direction,
                ghost: false,
                kind: TileElementKind::Track(TrackElement {
                    ride: RIDE,
                    piece: TrackPiece::Flat,
                    sequence: 0,
                    station: StationIndex::new(0),
                    brake_speed: 0,
                    seat_rotation: 0,
                    colour_scheme: 0,
                    chain_lift: false,
                    inverted: false,
                    maze_entry: 0,
                }),
            };
            self.0
                .entry(TileCoordsXY::new(tile.0, tile.1))
                .or_default()
                .push(element);
        }
    }

    /// Three flat pieces running west from tile (10, 5).
    fn straight() -> Tiles {
        let mut tiles = Tiles::default();
        for x in [10, 9, 8] {
            tiles.flat((x, 5), Direction::West);
        }
        tiles
    }

    #[test]
    fn raster_scan_finds_the_westmost_piece_first() {
        let tiles = straight();
        let origin = find_origin_piece(&tiles, RIDE).expect("track exists");
        assert_eq!(origin.location, CoordsXYZ::new(256, 160, 16));
        assert!(find_origin_piece(&tiles, RideId::new(2)).is_none());
    }

    #[test]
    fn open_track_is_walked_from_its_first_piece() {
        let tiles = straight();
        let origin = find_origin_piece(&tiles, RIDE).expect("track exists");
        let start = start_of_track(&tiles, origin);
        assert_eq!(start.location, CoordsXYZ::new(320, 160, 16));

        let second = next_piece(&tiles, &start).expect("second piece");
        assert_eq!(second.location, CoordsXYZ::new(288, 160, 16));
        let third = next_piece(&tiles, &second).expect("third piece");
        assert!(next_piece(&tiles, &third).is_none(), "the track ends");
        assert_eq!(previous_piece(&tiles, &second), Some(start));
    }

    #[test]
    fn pieces_facing_away_do_not_connect() {
        let mut tiles = straight();
        let origin = find_origin_piece(&tiles, RIDE).expect("track exists");
        tiles.flat((7, 5), Direction::East);
        assert!(next_piece(&tiles, &origin).is_none());
        assert_eq!(start_of_track(&tiles, origin).location, CoordsXYZ::new(320, 160, 16));
    }
}
