#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Left-right mirroring of track design records.
//!
//! Mirroring reflects a design across its x axis: relative y offsets change
//! sign, track pieces swap for their mirrored counterparts and every facing
//! that runs along the y axis is reversed. Mirroring twice gives back the
//! original record.

use tracing::debug;
use track_design_core::{
    Direction, MazeElement, MazeEntry, ObjectResolver, RelativeTile, TrackDesign,
};

mod scenery;

/// Mirrored position of each of the sixteen wall segments of a maze cell.
pub const MAZE_SEGMENT_MIRROR_MAP: [u8; 16] = [5, 4, 2, 7, 1, 0, 14, 3, 13, 12, 10, 15, 9, 8, 6, 11];

/// Mirrors `design` in place; scenery shapes are looked up through `resolver`.
pub fn mirror<R: ObjectResolver + ?Sized>(design: &mut TrackDesign, resolver: &R) {
    if design.is_maze() {
        mirror_maze(design);
    } else {
        mirror_ride(design);
    }
    let skipped = scenery::mirror_scenery(&mut design.scenery_elements, resolver);
    debug!(
        ride_type = ?design.ride_type,
        track = design.track_elements.len(),
        maze = design.maze_elements.len(),
        scenery = design.scenery_elements.len(),
        skipped,
        "design mirrored"
    );
}

/// Moves every wall segment of a maze cell to its mirrored position.
#[must_use]
pub fn mirror_maze_entry(entry: MazeEntry) -> MazeEntry {
    let bits = entry.bits();
    let mirrored = MAZE_SEGMENT_MIRROR_MAP
        .iter()
        .enumerate()
        .filter(|(segment, _)| bits & (1_u16 << segment) != 0)
        .fold(0_u16, |acc, (_, target)| acc | (1_u16 << target));
    MazeEntry::from_bits(mirrored)
}

fn mirror_maze(design: &mut TrackDesign) {
    for element in &mut design.maze_elements {
        *element = match *element {
            MazeElement::Entrance { position, direction } => MazeElement::Entrance {
                position: flip_y(position),
                direction: reverse_if_odd(direction),
            },
            MazeElement::Exit { position, direction } => MazeElement::Exit {
                position: flip_y(position),
                direction: reverse_if_odd(direction),
            },
            MazeElement::Cell { position, entry } => MazeElement::Cell {
                position: flip_y(position),
                entry: mirror_maze_entry(entry),
            },
        };
    }
}

fn mirror_ride(design: &mut TrackDesign) {
    for element in &mut design.track_elements {
        element.piece = element.piece.mirrored();
    }
    for entrance in &mut design.entrance_elements {
        entrance.position = flip_y(entrance.position);
        entrance.direction = reverse_if_odd(entrance.direction);
    }
}

pub(crate) fn flip_y(position: RelativeTile) -> RelativeTile {
    RelativeTile::new(position.x, position.y.saturating_neg())
}

pub(crate) fn reverse_if_odd(direction: Direction) -> Direction {
    if direction.is_odd() {
        direction.reverse()
    } else {
        direction
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segment_map_is_an_involutive_permutation() {
        let mut seen = [false; 16];
        for (segment, &target) in MAZE_SEGMENT_MIRROR_MAP.iter().enumerate() {
            seen[usize::from(target)] = true;
            assert_eq!(
                usize::from(MAZE_SEGMENT_MIRROR_MAP[usize::from(target)]),
                segment,
                "segment {segment} should map back onto itself"
            );
        }
        assert!(seen.iter().all(|&hit| hit), "every segment is a target");
    }

    #[test]
    fn every_wall_mask_survives_two_mirrors() {
        for bits in 0..=u16::MAX {
            let entry = MazeEntry::from_bits(bits);
            let once = mirror_maze_entry(entry);
            assert_eq!(once.bits().count_ones(), bits.count_ones(), "mask {bits:#06x} keeps its walls");
            assert_eq!(mirror_maze_entry(once), entry, "mask {bits:#06x}");
        }
    }

    #[test]
    fn single_segments_follow_the_map() {
        assert_eq!(mirror_maze_entry(MazeEntry::from_bits(1)).bits(), 1 << 5);
        assert_eq!(mirror_maze_entry(MazeEntry::from_bits(1 << 2)).bits(), 1 << 2);
        assert_eq!(mirror_maze_entry(MazeEntry::from_bits(1 << 6)).bits(), 1 << 14);
    }

    #[test]
    fn only_facings_along_y_are_reversed() {
        assert_eq!(reverse_if_odd(Direction::West), Direction::West);
        assert_eq!(reverse_if_odd(Direction::North), Direction::South);
        assert_eq!(reverse_if_odd(Direction::East), Direction::East);
        assert_eq!(reverse_if_odd(Direction::South), Direction::North);
    }
}
