//! Stock rides the CLI can build and capture without a saved park.

use anyhow::{anyhow, ensure, Context, Result};
use clap::ValueEnum;
use track_design_core::{
    Action, ActionFlags, CoordsXYZ, Direction, MazeElement, MazeEntry, ObjectIndex,
    ObjectReference, RelativeTile, RideId, RideType, TileCoordsXY, TrackDesign,
    TrackDesignEntranceElement, TrackDesignTrackElement, TrackFlags, TrackPiece,
};
use track_design_system_placement::{place, Operation, PlacementRequest};
use track_design_world::{apply, World};

/// Where samples are built; far enough from the map edge for every rotation.
pub(crate) const SAMPLE_ORIGIN: CoordsXYZ = CoordsXYZ::new(320, 320, 16);
/// Tile decorated with a tree when scenery is requested.
pub(crate) const SAMPLE_TREE: TileCoordsXY = TileCoordsXY::new(13, 9);

/// Stock layouts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum Sample {
    /// Four one-tile turns with an entrance and an exit.
    Loop,
    /// Two maze cells between an entrance and an exit.
    Maze,
}

impl Sample {
    fn design(self) -> TrackDesign {
        match self {
            Sample::Loop => loop_design(),
            Sample::Maze => maze_design(),
        }
    }
}

fn loop_design() -> TrackDesign {
    let mut design = TrackDesign::new(RideType::SteelCoaster);
    design.name = "Sample loop".to_owned();
    design.vehicle_object = Some(ObjectReference::new("rct2.ride.steel_train"));
    design.track_elements = vec![
        TrackDesignTrackElement {
            piece: TrackPiece::LeftQuarterTurn1Tile,
            flags: TrackFlags::pack(0, 1, false, true),
        };
        4
    ];
    design.entrance_elements = vec![
        TrackDesignEntranceElement {
            position: RelativeTile::new(0, 1),
            z: 0,
            direction: Direction::South,
            is_exit: false,
        },
        TrackDesignEntranceElement {
            position: RelativeTile::new(-1, 0),
            z: 0,
            direction: Direction::East,
            is_exit: true,
        },
    ];
    design
}

fn maze_design() -> TrackDesign {
    let mut design = TrackDesign::new(RideType::Maze);
    design.name = "Sample maze".to_owned();
    design.vehicle_object = Some(ObjectReference::new("rct2.ride.hedges"));
    design.maze_elements = vec![
        MazeElement::Cell {
            position: RelativeTile::new(0, 0),
            entry: MazeEntry::from_bits(0x000F),
        },
        MazeElement::Cell {
            position: RelativeTile::new(1, 0),
            entry: MazeEntry::from_bits(0x00F0),
        },
        MazeElement::Entrance {
            position: RelativeTile::new(-1, 0),
            direction: Direction::East,
        },
        MazeElement::Exit {
            position: RelativeTile::new(2, 0),
            direction: Direction::West,
        },
    ];
    design
}

/// Creates an empty ride for `design`.
pub(crate) fn create_ride(world: &mut World, design: &TrackDesign) -> Result<RideId> {
    let result = apply(
        world,
        &Action::CreateRide {
            ride_type: design.ride_type,
            vehicle: design.vehicle_object.clone(),
            track_colours: design.track_colours.to_vec(),
        },
        ActionFlags::APPLY,
    );
    if let Some(reason) = result.error {
        return Err(anyhow!("ride could not be created: {reason}"));
    }
    result
        .ride
        .ok_or_else(|| anyhow!("ride creation reported no ride"))
}

/// Builds a sample ride, optionally with a tree nearby, and returns its id.
pub(crate) fn build(world: &mut World, sample: Sample, rotation: Direction, tree: bool) -> Result<RideId> {
    let design = sample.design();
    let ride = create_ride(world, &design)?;
    let _ = place(
        &design,
        Operation::Place(world),
        &PlacementRequest::new(SAMPLE_ORIGIN, rotation, ride),
    )
    .with_context(|| format!("sample {sample:?} does not fit the map"))?;

    if tree {
        let planted = apply(
            world,
            &Action::PlaceSmallScenery {
                location: SAMPLE_TREE.to_coords().with_z(SAMPLE_ORIGIN.z),
                direction: Direction::North,
                quadrant: 0,
                object: ObjectIndex::new(0),
                primary_colour: 5,
                secondary_colour: 6,
            },
            ActionFlags::APPLY,
        );
        ensure!(planted.is_ok(), "sample tree could not be planted: {planted:?}");
    }
    Ok(ride)
}

#[cfg(test)]
mod tests {
    use super::*;
    use track_design_core::WorldQuery;
    use track_design_world::query;

    #[test]
    fn every_sample_builds_in_every_rotation() {
        for sample in [Sample::Loop, Sample::Maze] {
            for rotation in Direction::ALL {
                let mut world = World::new();
                let ride = build(&mut world, sample, rotation, true).expect("sample builds");
                assert!(world.ride(ride).is_some());
                assert!(query::structures(&world).count() > 4, "{sample:?} {rotation:?}");
            }
        }
    }
}
