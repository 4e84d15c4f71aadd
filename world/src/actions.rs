//! Validation and commitment of world mutations.
//!
//! Every action is first turned into a [`Plan`] against an immutable world.
//! Queries stop there; execution with `APPLY` commits the plan's mutation.

use track_design_core::{
    Action, ActionFlags, CoordsXY, CoordsXYZ, Direction, EdgeMask, EntranceElement, EntranceKind,
    EntranceLocation, LargeSceneryElement, Money, ObjectCategory, ObjectIndex, ObjectReference,
    ObjectShape, PathElement, RejectReason, RideId, RideType, SmallSceneryElement, StationIndex,
    TileCoordsXY, TileElement, TileElementKind, TrackColour, TrackElement, TrackPiece,
    TrackPlacementSettings, WallElement, COORDS_Z_STEP, LAND_HEIGHT_STEP, MAX_STATIONS_PER_RIDE,
};

use crate::{objects::ObjectDefinition, World};

/// Cost of an entrance or exit hut.
pub(crate) const ENTRANCE_PRICE: Money = Money::new(50);

const ENTRANCE_CLEARANCE: i32 = 48;
const MAZE_CLEARANCE: i32 = 32;
const SMALL_SCENERY_CLEARANCE: i32 = 32;
const LARGE_SCENERY_CLEARANCE: i32 = 48;
const WALL_CLEARANCE: i32 = 32;
const PATH_CLEARANCE: i32 = 16;
const SLOPED_PATH_CLEARANCE: i32 = 32;

/// Validated action ready to be committed.
#[derive(Debug)]
pub(crate) struct Plan {
    pub(crate) cost: Money,
    pub(crate) mutation: Mutation,
}

impl Plan {
    fn new(cost: Money, mutation: Mutation) -> Self {
        Self { cost, mutation }
    }
}

/// State change described by a plan.
#[derive(Debug)]
pub(crate) enum Mutation {
    /// Nothing to change.
    Nothing,
    /// Register a new ride.
    CreateRide {
        ride_type: RideType,
        vehicle: Option<ObjectReference>,
        track_colours: Vec<TrackColour>,
    },
    /// Remove a ride and every element it owns.
    DemolishRide(RideId),
    /// Replace tile elements and optionally update station bookkeeping.
    Edit {
        remove: Vec<(TileCoordsXY, TileElement)>,
        insert: Vec<(TileCoordsXY, TileElement)>,
        station: Option<StationUpdate>,
    },
}

/// Station bookkeeping attached to an edit.
#[derive(Debug)]
pub(crate) enum StationUpdate {
    /// A station platform was started.
    Platform {
        ride: RideId,
        station: StationIndex,
        start: CoordsXYZ,
    },
    /// An entrance or exit was built for a station.
    Hut {
        ride: RideId,
        station: StationIndex,
        kind: EntranceKind,
        location: EntranceLocation,
    },
}

/// Validates `action` against the world and describes its effect.
pub(crate) fn plan(world: &World, action: &Action, flags: ActionFlags) -> Result<Plan, RejectReason> {
    if world.paused && !flags.contains(ActionFlags::ALLOW_DURING_PAUSE) {
        return Err(RejectReason::GamePaused);
    }
    let ghost = flags.contains(ActionFlags::GHOST);
    let plan = match action {
        Action::CreateRide {
            ride_type,
            vehicle,
            track_colours,
        } => Plan::new(
            Money::ZERO,
            Mutation::CreateRide {
                ride_type: *ride_type,
                vehicle: vehicle.clone(),
                track_colours: track_colours.clone(),
            },
        ),
        Action::DemolishRide { ride } => {
            if world.rides.get(*ride).is_none() {
                return Err(RejectReason::MissingRide);
            }
            Plan::new(Money::ZERO, Mutation::DemolishRide(*ride))
        }
        Action::PlaceTrack {
            ride,
            piece,
            location,
            direction,
            settings,
        } => plan_track(world, *ride, *piece, *location, *direction, settings, ghost)?,
        Action::RemoveTrack {
            piece,
            location,
            direction,
        } => plan_remove_track(world, *piece, *location, *direction, ghost)?,
        Action::PlaceEntranceExit {
            ride,
            location,
            direction,
            station,
            is_exit,
        } => plan_entrance(world, *ride, *location, *direction, *station, *is_exit, ghost)?,
        Action::QueryEntranceExitPlacement { location, .. } => {
            check_height(world, *location, ENTRANCE_CLEARANCE)?;
            check_space(world, location.xy().to_tile(), location.z, ENTRANCE_CLEARANCE, blocks_solid)?;
            Plan::new(ENTRANCE_PRICE, Mutation::Nothing)
        }
        Action::PlaceMazeTrack {
            ride,
            location,
            maze_entry,
        } => {
            if world.rides.get(*ride).is_none() {
                return Err(RejectReason::MissingRide);
            }
            check_height(world, *location, MAZE_CLEARANCE)?;
            let tile = location.xy().to_tile();
            check_space(world, tile, location.z, MAZE_CLEARANCE, blocks_solid)?;
            let element = TileElement {
                base_z: location.z,
                clearance_z: location.z + MAZE_CLEARANCE,
                direction: Direction::West,
                ghost,
                kind: TileElementKind::Track(TrackElement {
                    maze_entry: *maze_entry,
                    ..track_element(*ride, TrackPiece::Maze, 0, StationIndex::default())
                }),
            };
            Plan::new(
                Money::new(TrackPiece::Maze.descriptor().price),
                insert_only(vec![(tile, element)]),
            )
        }
        Action::PlaceSmallScenery {
            location,
            direction,
            quadrant,
            object,
            primary_colour,
            secondary_colour,
        } => {
            let definition = object_definition(world, ObjectCategory::SmallScenery, *object)?;
            let full_tile = matches!(&definition.shape, ObjectShape::Small(shape) if shape.full_tile);
            check_height(world, *location, SMALL_SCENERY_CLEARANCE)?;
            let tile = location.xy().to_tile();
            let quadrant = quadrant & 3;
            check_space(world, tile, location.z, SMALL_SCENERY_CLEARANCE, |existing| {
                blocks_small_scenery(world, existing, full_tile, quadrant)
            })?;
            let element = TileElement {
                base_z: location.z,
                clearance_z: location.z + SMALL_SCENERY_CLEARANCE,
                direction: *direction,
                ghost,
                kind: TileElementKind::SmallScenery(SmallSceneryElement {
                    object: *object,
                    quadrant,
                    primary_colour: *primary_colour,
                    secondary_colour: *secondary_colour,
                }),
            };
            Plan::new(definition.price, insert_only(vec![(tile, element)]))
        }
        Action::RemoveSmallScenery {
            location,
            quadrant,
            object,
        } => {
            let tile = location.xy().to_tile();
            let found = find_element(world, tile, |element| {
                matches!(element.kind, TileElementKind::SmallScenery(scenery)
                    if scenery.object == *object && scenery.quadrant == quadrant & 3)
                    && element.base_z == location.z
                    && element.ghost == ghost
            })?;
            Plan::new(Money::ZERO, remove_only(vec![(tile, found)]))
        }
        Action::PlaceLargeScenery {
            location,
            direction,
            object,
            primary_colour,
            secondary_colour,
        } => {
            let definition = object_definition(world, ObjectCategory::LargeScenery, *object)?;
            let tiles = large_scenery_tiles(&definition.shape, location.xy(), *direction);
            let mut insert = Vec::with_capacity(tiles.len());
            for (sequence, tile) in tiles.into_iter().enumerate() {
                let position = tile.to_coords().with_z(location.z);
                check_height(world, position, LARGE_SCENERY_CLEARANCE)?;
                check_space(world, tile, location.z, LARGE_SCENERY_CLEARANCE, blocks_solid)?;
                insert.push((
                    tile,
                    TileElement {
                        base_z: location.z,
                        clearance_z: location.z + LARGE_SCENERY_CLEARANCE,
                        direction: *direction,
                        ghost,
                        kind: TileElementKind::LargeScenery(LargeSceneryElement {
                            object: *object,
                            sequence: u8::try_from(sequence).unwrap_or(u8::MAX),
                            primary_colour: *primary_colour,
                            secondary_colour: *secondary_colour,
                        }),
                    },
                ));
            }
            Plan::new(definition.price, insert_only(insert))
        }
        Action::RemoveLargeScenery {
            location,
            direction,
        } => plan_remove_large_scenery(world, *location, *direction, ghost)?,
        Action::PlaceWall {
            location,
            direction,
            object,
            primary_colour,
            secondary_colour,
            tertiary_colour,
        } => {
            let definition = object_definition(world, ObjectCategory::Wall, *object)?;
            check_height(world, *location, WALL_CLEARANCE)?;
            let tile = location.xy().to_tile();
            check_space(world, tile, location.z, WALL_CLEARANCE, |existing| {
                matches!(existing.kind, TileElementKind::Wall(_)) && existing.direction == *direction
            })?;
            let element = TileElement {
                base_z: location.z,
                clearance_z: location.z + WALL_CLEARANCE,
                direction: *direction,
                ghost,
                kind: TileElementKind::Wall(WallElement {
                    object: *object,
                    primary_colour: *primary_colour,
                    secondary_colour: *secondary_colour,
                    tertiary_colour: *tertiary_colour,
                }),
            };
            Plan::new(definition.price, insert_only(vec![(tile, element)]))
        }
        Action::RemoveWall {
            location,
            direction,
        } => {
            let tile = location.xy().to_tile();
            let found = find_element(world, tile, |element| {
                matches!(element.kind, TileElementKind::Wall(_))
                    && element.direction == *direction
                    && element.base_z == location.z
                    && element.ghost == ghost
            })?;
            Plan::new(Money::ZERO, remove_only(vec![(tile, found)]))
        }
        Action::PlaceFootpathFromTrack {
            location,
            slope,
            surface,
            railings,
            edges,
            is_queue,
        } => {
            let definition = object_definition(world, ObjectCategory::Path, *surface)?;
            let clearance = if slope.is_some() {
                SLOPED_PATH_CLEARANCE
            } else {
                PATH_CLEARANCE
            };
            check_height(world, *location, clearance)?;
            let tile = location.xy().to_tile();
            check_space(world, tile, location.z, clearance, blocks_solid)?;
            let element = TileElement {
                base_z: location.z,
                clearance_z: location.z + clearance,
                direction: Direction::West,
                ghost,
                kind: TileElementKind::Path(PathElement {
                    surface: *surface,
                    railings: *railings,
                    edges: *edges,
                    slope: *slope,
                    is_queue: *is_queue,
                }),
            };
            Plan::new(definition.price, insert_only(vec![(tile, element)]))
        }
        Action::RemoveFootpath { location } => {
            let tile = location.xy().to_tile();
            let found = find_element(world, tile, |element| {
                matches!(element.kind, TileElementKind::Path(_))
                    && element.base_z == location.z
                    && element.ghost == ghost
            })?;
            Plan::new(Money::ZERO, remove_only(vec![(tile, found)]))
        }
        Action::ConnectFootpathEdges { location } => plan_connect_edges(world, *location)?,
    };

    let charges = !flags.contains(ActionFlags::NO_SPEND) && !ghost;
    if charges && plan.cost.get() > world.cash.get() {
        return Err(RejectReason::InsufficientFunds);
    }
    Ok(plan)
}

/// Commits a validated plan to the world, returning the ride it created.
pub(crate) fn commit(world: &mut World, mutation: Mutation) -> Option<RideId> {
    match mutation {
        Mutation::Nothing => None,
        Mutation::CreateRide {
            ride_type,
            vehicle,
            track_colours,
        } => {
            let id = world.rides.create(ride_type, vehicle)?;
            if let Some(ride) = world.rides.get_mut(id) {
                for (slot, colour) in ride.track_colours.iter_mut().zip(track_colours) {
                    *slot = colour;
                }
            }
            Some(id)
        }
        Mutation::DemolishRide(id) => {
            let _ = world.map.remove_all(|element| element.ride() == Some(id));
            let _ = world.rides.remove(id);
            None
        }
        Mutation::Edit {
            remove,
            insert,
            station,
        } => {
            for (tile, element) in remove {
                let _ = world.map.remove_first(tile, |candidate| *candidate == element);
            }
            for (tile, element) in insert {
                let _ = world.map.insert(tile, element);
            }
            if let Some(update) = station {
                apply_station_update(world, update);
            }
            None
        }
    }
}

fn apply_station_update(world: &mut World, update: StationUpdate) {
    match update {
        StationUpdate::Platform {
            ride,
            station,
            start,
        } => {
            if let Some(slot) = world
                .rides
                .get_mut(ride)
                .and_then(|ride| ride.stations.get_mut(usize::from(station.get())))
            {
                if slot.start.is_none() {
                    slot.start = Some(start);
                    slot.height = start.z;
                }
            }
        }
        StationUpdate::Hut {
            ride,
            station,
            kind,
            location,
        } => {
            let Some(slot) = world
                .rides
                .get_mut(ride)
                .and_then(|ride| ride.stations.get_mut(usize::from(station.get())))
            else {
                return;
            };
            if slot.start.is_none() {
                slot.height = location.z;
            }
            match kind {
                EntranceKind::Entrance => slot.entrance = Some(location),
                EntranceKind::Exit => slot.exit = Some(location),
            }
        }
    }
}

fn plan_track(
    world: &World,
    ride: RideId,
    piece: TrackPiece,
    location: CoordsXYZ,
    direction: Direction,
    settings: &TrackPlacementSettings,
    ghost: bool,
) -> Result<Plan, RejectReason> {
    let Some(owner) = world.rides.get(ride) else {
        return Err(RejectReason::MissingRide);
    };
    let station = if piece.is_station() {
        owner
            .stations
            .iter()
            .position(|station| station.start.map(|start| start.z) == Some(location.z))
            .or_else(|| owner.stations.iter().position(|station| station.start.is_none()))
            .ok_or(RejectReason::TooManyStations)?
    } else {
        0
    };
    let station = StationIndex::new(u8::try_from(station).unwrap_or(u8::MAX));

    let mut insert = Vec::with_capacity(piece.blocks().len());
    for block in piece.blocks() {
        let tile = (location.xy() + block.offset(direction)).to_tile();
        let base_z = location.z + block.z;
        let position = tile.to_coords().with_z(base_z);
        check_height(world, position, block.clearance)?;
        check_space(world, tile, base_z, block.clearance, blocks_solid)?;
        insert.push((
            tile,
            TileElement {
                base_z,
                clearance_z: base_z + block.clearance,
                direction,
                ghost,
                kind: TileElementKind::Track(TrackElement {
                    brake_speed: settings.brake_speed,
                    seat_rotation: settings.seat_rotation,
                    colour_scheme: settings.colour_scheme,
                    chain_lift: settings.chain_lift,
                    inverted: settings.inverted,
                    ..track_element(ride, piece, block.index, station)
                }),
            },
        ));
    }

    let station_update = piece.is_station().then_some(StationUpdate::Platform {
        ride,
        station,
        start: location,
    });
    Ok(Plan::new(
        Money::new(piece.descriptor().price),
        Mutation::Edit {
            remove: Vec::new(),
            insert,
            station: station_update,
        },
    ))
}

fn plan_remove_track(
    world: &World,
    piece: TrackPiece,
    location: CoordsXYZ,
    direction: Direction,
    ghost: bool,
) -> Result<Plan, RejectReason> {
    let origin_tile = location.xy().to_tile();
    let anchor = find_element(world, origin_tile, |element| {
        matches!(element.kind, TileElementKind::Track(track) if track.piece == piece && track.sequence == 0)
            && element.direction == direction
            && element.base_z == location.z
            && element.ghost == ghost
    })?;
    let Some(ride) = anchor.ride() else {
        return Err(RejectReason::MissingElement);
    };

    let mut remove = Vec::with_capacity(piece.blocks().len());
    for block in piece.blocks() {
        let tile = (location.xy() + block.offset(direction)).to_tile();
        let base_z = location.z + block.z;
        let found = world.map.elements(tile).iter().find(|element| {
            matches!(element.kind, TileElementKind::Track(track)
                if track.ride == ride && track.piece == piece && track.sequence == block.index)
                && element.base_z == base_z
                && element.direction == direction
                && element.ghost == ghost
        });
        if let Some(found) = found {
            remove.push((tile, *found));
        }
    }
    Ok(Plan::new(Money::ZERO, remove_only(remove)))
}

fn plan_entrance(
    world: &World,
    ride: RideId,
    location: CoordsXYZ,
    direction: Direction,
    station: StationIndex,
    is_exit: bool,
    ghost: bool,
) -> Result<Plan, RejectReason> {
    let Some(owner) = world.rides.get(ride) else {
        return Err(RejectReason::MissingRide);
    };
    if usize::from(station.get()) >= MAX_STATIONS_PER_RIDE {
        return Err(RejectReason::TooManyStations);
    }
    check_height(world, location, ENTRANCE_CLEARANCE)?;
    let tile = location.xy().to_tile();

    let station_tile = (location.xy() + direction.delta()).to_tile();
    let adjacent = world.map.elements(station_tile).iter().any(|element| {
        element.as_track().map(|track| track.ride) == Some(ride) && element.base_z == location.z
    });
    if !adjacent {
        return Err(RejectReason::NotAdjacentToTrack);
    }

    let kind = if is_exit {
        EntranceKind::Exit
    } else {
        EntranceKind::Entrance
    };
    let previous = owner.station(station).and_then(|slot| match kind {
        EntranceKind::Entrance => slot.entrance,
        EntranceKind::Exit => slot.exit,
    });
    let mut remove = Vec::new();
    if let Some(previous) = previous {
        let existing = world.map.elements(previous.tile).iter().find(|element| {
            element.as_entrance()
                == Some(&EntranceElement {
                    ride,
                    station,
                    kind,
                })
                && element.base_z == previous.z
        });
        if let Some(existing) = existing {
            remove.push((previous.tile, *existing));
        }
    }

    check_space(world, tile, location.z, ENTRANCE_CLEARANCE, |existing| {
        blocks_solid(existing) && !remove.iter().any(|(_, replaced)| replaced == existing)
    })?;

    let element = TileElement {
        base_z: location.z,
        clearance_z: location.z + ENTRANCE_CLEARANCE,
        direction,
        ghost,
        kind: TileElementKind::Entrance(EntranceElement {
            ride,
            station,
            kind,
        }),
    };
    Ok(Plan::new(
        ENTRANCE_PRICE,
        Mutation::Edit {
            remove,
            insert: vec![(tile, element)],
            station: Some(StationUpdate::Hut {
                ride,
                station,
                kind,
                location: EntranceLocation {
                    tile,
                    z: location.z,
                    direction,
                },
            }),
        },
    ))
}

fn plan_remove_large_scenery(
    world: &World,
    location: CoordsXYZ,
    direction: Direction,
    ghost: bool,
) -> Result<Plan, RejectReason> {
    let anchor_tile = location.xy().to_tile();
    let anchor = find_element(world, anchor_tile, |element| {
        matches!(element.kind, TileElementKind::LargeScenery(scenery) if scenery.sequence == 0)
            && element.direction == direction
            && element.base_z == location.z
            && element.ghost == ghost
    })?;
    let TileElementKind::LargeScenery(scenery) = anchor.kind else {
        return Err(RejectReason::MissingElement);
    };

    let tiles = world
        .objects
        .get(ObjectCategory::LargeScenery, scenery.object)
        .map(|definition| large_scenery_tiles(&definition.shape, location.xy(), direction))
        .unwrap_or_else(|| vec![anchor_tile]);
    let mut remove = Vec::with_capacity(tiles.len());
    for (sequence, tile) in tiles.into_iter().enumerate() {
        let found = world.map.elements(tile).iter().find(|element| {
            matches!(element.kind, TileElementKind::LargeScenery(part)
                if part.object == scenery.object && usize::from(part.sequence) == sequence)
                && element.base_z == location.z
                && element.ghost == ghost
        });
        if let Some(found) = found {
            remove.push((tile, *found));
        }
    }
    Ok(Plan::new(Money::ZERO, remove_only(remove)))
}

fn plan_connect_edges(world: &World, location: CoordsXYZ) -> Result<Plan, RejectReason> {
    let tile = location.xy().to_tile();
    let is_path_at = |tile: TileCoordsXY| {
        world.map.elements(tile).iter().find(|element| {
            matches!(element.kind, TileElementKind::Path(_)) && element.base_z == location.z
        })
    };
    let Some(current) = is_path_at(tile) else {
        return Err(RejectReason::MissingElement);
    };

    let mut remove = Vec::new();
    let mut insert = Vec::new();
    let mut edges = path_edges(current);
    for direction in Direction::ALL {
        let neighbour_tile = (tile.to_coords() + direction.delta()).to_tile();
        let Some(neighbour) = is_path_at(neighbour_tile) else {
            continue;
        };
        edges = edges.with(direction);
        let neighbour_edges = path_edges(neighbour).with(direction.reverse());
        if neighbour_edges != path_edges(neighbour) {
            remove.push((neighbour_tile, *neighbour));
            insert.push((neighbour_tile, with_path_edges(*neighbour, neighbour_edges)));
        }
    }
    if edges != path_edges(current) {
        remove.push((tile, *current));
        insert.push((tile, with_path_edges(*current, edges)));
    }
    Ok(Plan::new(
        Money::ZERO,
        Mutation::Edit {
            remove,
            insert,
            station: None,
        },
    ))
}

fn path_edges(element: &TileElement) -> EdgeMask {
    match element.kind {
        TileElementKind::Path(path) => path.edges,
        _ => EdgeMask::NONE,
    }
}

fn with_path_edges(mut element: TileElement, edges: EdgeMask) -> TileElement {
    if let TileElementKind::Path(path) = &mut element.kind {
        path.edges = edges;
    }
    element
}

fn track_element(ride: RideId, piece: TrackPiece, sequence: u8, station: StationIndex) -> TrackElement {
    TrackElement {
        ride,
        piece,
        sequence,
        station,
        brake_speed: 0,
        seat_rotation: 0,
        colour_scheme: 0,
        chain_lift: false,
        inverted: false,
        maze_entry: 0,
    }
}

fn insert_only(insert: Vec<(TileCoordsXY, TileElement)>) -> Mutation {
    Mutation::Edit {
        remove: Vec::new(),
        insert,
        station: None,
    }
}

fn remove_only(remove: Vec<(TileCoordsXY, TileElement)>) -> Mutation {
    Mutation::Edit {
        remove,
        insert: Vec::new(),
        station: None,
    }
}

fn object_definition(
    world: &World,
    category: ObjectCategory,
    index: ObjectIndex,
) -> Result<&ObjectDefinition, RejectReason> {
    world
        .objects
        .get(category, index)
        .ok_or(RejectReason::MissingObject)
}

/// Map tiles covered by a large scenery object anchored at `anchor`.
pub(crate) fn large_scenery_tiles(
    shape: &ObjectShape,
    anchor: CoordsXY,
    direction: Direction,
) -> Vec<TileCoordsXY> {
    match shape {
        ObjectShape::Large(tiles) if !tiles.is_empty() => tiles
            .iter()
            .map(|tile| (anchor + CoordsXY::new(tile.x, tile.y).rotate(direction)).to_tile())
            .collect(),
        _ => vec![anchor.to_tile()],
    }
}

fn find_element<F>(world: &World, tile: TileCoordsXY, predicate: F) -> Result<TileElement, RejectReason>
where
    F: Fn(&TileElement) -> bool,
{
    world
        .map
        .elements(tile)
        .iter()
        .find(|element| predicate(element))
        .copied()
        .ok_or(RejectReason::MissingElement)
}

fn check_height(world: &World, location: CoordsXYZ, clearance: i32) -> Result<(), RejectReason> {
    if location.z < 0 || location.z % COORDS_Z_STEP != 0 {
        return Err(RejectReason::InvalidHeight);
    }
    if world.forbid_high_construction && location.z + clearance > world.max_construction_height {
        return Err(RejectReason::HeightRestricted);
    }
    Ok(())
}

fn check_space<F>(
    world: &World,
    tile: TileCoordsXY,
    base: i32,
    clearance: i32,
    blocks: F,
) -> Result<(), RejectReason>
where
    F: Fn(&TileElement) -> bool,
{
    let elements = world.map.elements(tile);
    if elements.is_empty() {
        return Err(RejectReason::OutOfBounds);
    }
    for element in elements {
        if let Some(surface) = element.as_surface() {
            let mut ground = element.base_z;
            if surface.slope.has_raised_corner() {
                ground += LAND_HEIGHT_STEP;
                if surface.slope.is_double_height() {
                    ground += LAND_HEIGHT_STEP;
                }
            }
            if base < ground {
                return Err(RejectReason::Occupied);
            }
        } else if element.overlaps(base, base + clearance) && blocks(element) {
            return Err(RejectReason::Occupied);
        }
    }
    Ok(())
}

/// Every element except walls occupies the volume it spans.
fn blocks_solid(element: &TileElement) -> bool {
    !matches!(element.kind, TileElementKind::Wall(_))
}

fn blocks_small_scenery(world: &World, element: &TileElement, full_tile: bool, quadrant: u8) -> bool {
    match element.kind {
        TileElementKind::Wall(_) => false,
        TileElementKind::SmallScenery(existing) => {
            let existing_full = world
                .objects
                .get(ObjectCategory::SmallScenery, existing.object)
                .map_or(true, |definition| {
                    matches!(&definition.shape, ObjectShape::Small(shape) if shape.full_tile)
                });
            full_tile || existing_full || existing.quadrant == quadrant
        }
        _ => true,
    }
}
