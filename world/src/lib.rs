#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative park state for the track design engine.
//!
//! The world owns the tile map, the rides built on it and the loaded object
//! catalog. All mutations go through [`apply`], which validates an [`Action`]
//! before committing it; read access is provided by the [`query`] module and
//! the [`WorldQuery`] implementation.

mod actions;
mod map;
mod objects;
mod rides;

use track_design_core::{
    Action, ActionExecutor, ActionFlags, ActionResult, Direction, Money, ObjectCategory,
    ObjectIndex, ObjectReference, ObjectResolver, PreviewHost, ResolvedObject, Ride, RideId, Slope,
    TileCoordsXY, TileElement, WorldQuery,
};
use tracing::debug;

pub use objects::{ObjectCatalog, ObjectDefinition};

use map::TileMap;
use rides::RideRegistry;

const DEFAULT_MAP_SIZE: u32 = 64;
const DEFAULT_CASH: i32 = 1_000_000;
const DEFAULT_MAX_CONSTRUCTION_HEIGHT: i32 = 512;

/// Start-up parameters of a world.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WorldConfig {
    /// Number of tiles along each side of the map.
    pub map_size: u32,
    /// Cash available to spend on construction.
    pub cash: Money,
    /// Whether the game starts paused.
    pub paused: bool,
    /// Whether building above `max_construction_height` is forbidden.
    pub forbid_high_construction: bool,
    /// Highest point construction may reach when restricted, in world units.
    pub max_construction_height: i32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            map_size: DEFAULT_MAP_SIZE,
            cash: Money::new(DEFAULT_CASH),
            paused: false,
            forbid_high_construction: false,
            max_construction_height: DEFAULT_MAX_CONSTRUCTION_HEIGHT,
        }
    }
}

/// Represents the authoritative park state.
#[derive(Debug)]
pub struct World {
    map: TileMap,
    stashed: Option<TileMap>,
    rides: RideRegistry,
    objects: ObjectCatalog,
    cash: Money,
    paused: bool,
    forbid_high_construction: bool,
    max_construction_height: i32,
    view_rotation: Direction,
}

impl World {
    /// Creates a world with the default configuration and the built-in objects.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(WorldConfig::default())
    }

    /// Creates a world of level land using the provided configuration.
    #[must_use]
    pub fn with_config(config: WorldConfig) -> Self {
        Self {
            map: TileMap::flat(config.map_size),
            stashed: None,
            rides: RideRegistry::new(),
            objects: ObjectCatalog::builtin(),
            cash: config.cash,
            paused: config.paused,
            forbid_high_construction: config.forbid_high_construction,
            max_construction_height: config.max_construction_height,
            view_rotation: Direction::West,
        }
    }

    /// Replaces the loaded object catalog.
    pub fn set_objects(&mut self, objects: ObjectCatalog) {
        self.objects = objects;
    }

    /// Loads one more object, returning its slot.
    pub fn load_object(&mut self, definition: ObjectDefinition) -> ObjectIndex {
        self.objects.insert(definition)
    }

    /// Reshapes the land surface of a tile; returns `false` outside the map.
    pub fn set_surface(
        &mut self,
        tile: TileCoordsXY,
        base_z: i32,
        slope: Slope,
        water_height: i32,
    ) -> bool {
        self.map.set_surface(tile, base_z, slope, water_height)
    }

    /// Pauses or resumes the game.
    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    /// Edits ride settings that are chosen outside construction, such as
    /// operating parameters or measured statistics.
    pub fn update_ride<F>(&mut self, id: RideId, edit: F) -> bool
    where
        F: FnOnce(&mut Ride),
    {
        match self.rides.get_mut(id) {
            Some(ride) => {
                edit(ride);
                true
            }
            None => false,
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided action to the world.
///
/// Without [`ActionFlags::APPLY`] the action is only validated. Costs are
/// charged unless the action is a ghost or carries [`ActionFlags::NO_SPEND`].
pub fn apply(world: &mut World, action: &Action, flags: ActionFlags) -> ActionResult {
    let plan = match actions::plan(world, action, flags) {
        Ok(plan) => plan,
        Err(reason) => {
            debug!(?reason, ?action, "action rejected");
            return ActionResult::rejected(reason);
        }
    };
    if !flags.contains(ActionFlags::APPLY) {
        return ActionResult::ok(plan.cost);
    }

    let charges = !flags.contains(ActionFlags::NO_SPEND) && !flags.contains(ActionFlags::GHOST);
    if charges {
        world.cash = Money::new(world.cash.get().saturating_sub(plan.cost.get()));
    }
    let result = ActionResult::ok(plan.cost);
    match actions::commit(world, plan.mutation) {
        Some(ride) => result.with_ride(ride),
        None => result,
    }
}

impl ActionExecutor for World {
    fn execute(&mut self, action: &Action, flags: ActionFlags) -> ActionResult {
        apply(self, action, flags)
    }

    fn query(&self, action: &Action, flags: ActionFlags) -> ActionResult {
        match actions::plan(self, action, flags) {
            Ok(plan) => ActionResult::ok(plan.cost),
            Err(reason) => ActionResult::rejected(reason),
        }
    }
}

impl WorldQuery for World {
    fn map_size(&self) -> u32 {
        self.map.size()
    }

    fn tile_elements(&self, tile: TileCoordsXY) -> &[TileElement] {
        self.map.elements(tile)
    }

    fn ride(&self, id: RideId) -> Option<&Ride> {
        self.rides.get(id)
    }
}

impl PreviewHost for World {
    fn stash_and_install_scratch_map(&mut self, size: u32) {
        let live = std::mem::replace(&mut self.map, TileMap::flat(size));
        if self.stashed.is_none() {
            self.stashed = Some(live);
        }
    }

    fn unstash_map(&mut self) {
        if let Some(live) = self.stashed.take() {
            self.map = live;
        }
    }

    fn forbid_high_construction(&self) -> bool {
        self.forbid_high_construction
    }

    fn set_forbid_high_construction(&mut self, forbid: bool) {
        self.forbid_high_construction = forbid;
    }

    fn view_rotation(&self) -> Direction {
        self.view_rotation
    }

    fn set_view_rotation(&mut self, rotation: Direction) {
        self.view_rotation = rotation;
    }
}

impl ObjectResolver for World {
    fn resolve(&self, reference: &ObjectReference) -> Option<ResolvedObject> {
        self.objects.resolve(reference)
    }

    fn reference_of(&self, category: ObjectCategory, index: ObjectIndex) -> Option<ObjectReference> {
        self.objects.reference_of(category, index)
    }

    fn default_path_surface(&self, is_queue: bool) -> Option<ObjectIndex> {
        self.objects.default_path_surface(is_queue)
    }

    fn default_railings(&self) -> Option<ObjectIndex> {
        self.objects.default_railings()
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use track_design_core::{Money, Ride, TileCoordsXY, TileElement};

    use super::{ObjectCatalog, World};

    /// Cash left to spend.
    #[must_use]
    pub fn cash(world: &World) -> Money {
        world.cash
    }

    /// Whether the game is paused.
    #[must_use]
    pub fn is_paused(world: &World) -> bool {
        world.paused
    }

    /// Whether a live map is stashed behind a scratch map.
    #[must_use]
    pub fn has_stashed_map(world: &World) -> bool {
        world.stashed.is_some()
    }

    /// Loaded object catalog.
    #[must_use]
    pub fn objects(world: &World) -> &ObjectCatalog {
        &world.objects
    }

    /// Rides in identifier order.
    pub fn rides(world: &World) -> impl Iterator<Item = &Ride> {
        world.rides.iter()
    }

    /// Every element other than land surfaces, with the tile it stands on.
    pub fn structures(world: &World) -> impl Iterator<Item = (TileCoordsXY, &TileElement)> {
        world.map.iter_tiles().flat_map(|(tile, stack)| {
            stack
                .iter()
                .filter(|element| element.as_surface().is_none())
                .map(move |element| (tile, element))
        })
    }

    /// Number of ghost elements on the map.
    #[must_use]
    pub fn ghost_count(world: &World) -> usize {
        structures(world).filter(|(_, element)| element.ghost).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use track_design_core::{
        graph, CoordsXYZ, EdgeMask, RejectReason, RideType, StationIndex, TrackPiece,
        TrackPlacementSettings,
    };

    fn place_flags() -> ActionFlags {
        ActionFlags::APPLY
    }

    fn create_ride(world: &mut World, ride_type: RideType) -> RideId {
        let result = apply(
            world,
            &Action::CreateRide {
                ride_type,
                vehicle: None,
                track_colours: Vec::new(),
            },
            place_flags(),
        );
        result.ride.expect("ride created")
    }

    fn place_track(
        world: &mut World,
        ride: RideId,
        piece: TrackPiece,
        location: CoordsXYZ,
        direction: Direction,
        flags: ActionFlags,
    ) -> ActionResult {
        apply(
            world,
            &Action::PlaceTrack {
                ride,
                piece,
                location,
                direction,
                settings: TrackPlacementSettings::default(),
            },
            flags,
        )
    }

    #[test]
    fn placing_track_charges_cash_and_stores_every_block() {
        let mut world = World::new();
        let ride = create_ride(&mut world, RideType::SteelCoaster);
        let before = query::cash(&world);

        let result = place_track(
            &mut world,
            ride,
            TrackPiece::LeftQuarterTurn3Tiles,
            CoordsXYZ::new(320, 320, 16),
            Direction::West,
            place_flags(),
        );

        assert!(result.is_ok(), "placement failed: {result:?}");
        let price = TrackPiece::LeftQuarterTurn3Tiles.descriptor().price;
        assert_eq!(query::cash(&world).get(), before.get() - price);
        assert_eq!(query::structures(&world).count(), 3);
    }

    #[test]
    fn queries_never_mutate() {
        let mut world = World::new();
        let ride = create_ride(&mut world, RideType::SteelCoaster);
        let action = Action::PlaceTrack {
            ride,
            piece: TrackPiece::Flat,
            location: CoordsXYZ::new(64, 64, 16),
            direction: Direction::North,
            settings: TrackPlacementSettings::default(),
        };

        let queried = world.query(&action, ActionFlags::empty());
        let unapplied = world.execute(&action, ActionFlags::empty());

        assert!(queried.is_ok());
        assert_eq!(queried, unapplied);
        assert_eq!(query::structures(&world).count(), 0);
    }

    #[test]
    fn overlapping_track_is_rejected() {
        let mut world = World::new();
        let ride = create_ride(&mut world, RideType::SteelCoaster);
        let location = CoordsXYZ::new(64, 64, 16);
        assert!(place_track(&mut world, ride, TrackPiece::Flat, location, Direction::West, place_flags()).is_ok());

        let again = place_track(&mut world, ride, TrackPiece::Flat, location, Direction::North, place_flags());
        assert_eq!(again.error, Some(RejectReason::Occupied));
        assert!(again.cost.is_undefined());
    }

    #[test]
    fn building_below_the_land_is_rejected() {
        let mut world = World::new();
        let ride = create_ride(&mut world, RideType::SteelCoaster);
        assert!(world.set_surface(TileCoordsXY::new(2, 2), 48, Slope::FLAT, 0));

        let result = place_track(
            &mut world,
            ride,
            TrackPiece::Flat,
            CoordsXYZ::new(64, 64, 16),
            Direction::West,
            place_flags(),
        );
        assert_eq!(result.error, Some(RejectReason::Occupied));
    }

    #[test]
    fn paused_world_only_accepts_pause_exempt_actions() {
        let mut world = World::with_config(WorldConfig {
            paused: true,
            ..WorldConfig::default()
        });
        let rejected = apply(
            &mut world,
            &Action::CreateRide {
                ride_type: RideType::Maze,
                vehicle: None,
                track_colours: Vec::new(),
            },
            ActionFlags::APPLY,
        );
        assert_eq!(rejected.error, Some(RejectReason::GamePaused));

        let allowed = apply(
            &mut world,
            &Action::CreateRide {
                ride_type: RideType::Maze,
                vehicle: None,
                track_colours: Vec::new(),
            },
            ActionFlags::APPLY | ActionFlags::ALLOW_DURING_PAUSE,
        );
        assert!(allowed.ride.is_some());
    }

    #[test]
    fn height_restriction_applies_only_when_forbidden() {
        let mut world = World::with_config(WorldConfig {
            forbid_high_construction: true,
            max_construction_height: 64,
            ..WorldConfig::default()
        });
        let ride = create_ride(&mut world, RideType::SteelCoaster);
        let high = CoordsXYZ::new(64, 64, 64);

        let restricted = place_track(&mut world, ride, TrackPiece::Flat, high, Direction::West, place_flags());
        assert_eq!(restricted.error, Some(RejectReason::HeightRestricted));

        world.set_forbid_high_construction(false);
        let allowed = place_track(&mut world, ride, TrackPiece::Flat, high, Direction::West, place_flags());
        assert!(allowed.is_ok());
    }

    #[test]
    fn insufficient_funds_reject_unless_no_spend() {
        let mut world = World::with_config(WorldConfig {
            cash: Money::new(10),
            ..WorldConfig::default()
        });
        let ride = create_ride(&mut world, RideType::SteelCoaster);
        let location = CoordsXYZ::new(64, 64, 16);

        let broke = place_track(&mut world, ride, TrackPiece::Flat, location, Direction::West, place_flags());
        assert_eq!(broke.error, Some(RejectReason::InsufficientFunds));

        let free = place_track(
            &mut world,
            ride,
            TrackPiece::Flat,
            location,
            Direction::West,
            ActionFlags::APPLY | ActionFlags::NO_SPEND,
        );
        assert!(free.is_ok());
        assert_eq!(query::cash(&world), Money::new(10));
    }

    #[test]
    fn ghost_track_is_removed_only_by_ghost_removal() {
        let mut world = World::new();
        let ride = create_ride(&mut world, RideType::SteelCoaster);
        let location = CoordsXYZ::new(96, 96, 16);
        let ghost_flags = ActionFlags::APPLY | ActionFlags::GHOST;
        assert!(place_track(&mut world, ride, TrackPiece::Up25, location, Direction::East, ghost_flags).is_ok());
        assert_eq!(query::ghost_count(&world), 1);

        let remove = Action::RemoveTrack {
            piece: TrackPiece::Up25,
            location,
            direction: Direction::East,
        };
        assert_eq!(
            apply(&mut world, &remove, ActionFlags::APPLY).error,
            Some(RejectReason::MissingElement)
        );
        assert!(apply(&mut world, &remove, ghost_flags).is_ok());
        assert_eq!(query::ghost_count(&world), 0);
    }

    #[test]
    fn entrances_need_adjacent_track_and_are_recorded_on_the_station() {
        let mut world = World::new();
        let ride = create_ride(&mut world, RideType::SteelCoaster);
        let track = CoordsXYZ::new(320, 320, 16);
        assert!(place_track(&mut world, ride, TrackPiece::Flat, track, Direction::West, place_flags()).is_ok());

        let far = apply(
            &mut world,
            &Action::PlaceEntranceExit {
                ride,
                location: CoordsXYZ::new(320, 416, 16),
                direction: Direction::North,
                station: StationIndex::new(0),
                is_exit: false,
            },
            place_flags(),
        );
        assert_eq!(far.error, Some(RejectReason::NotAdjacentToTrack));

        let near = apply(
            &mut world,
            &Action::PlaceEntranceExit {
                ride,
                location: CoordsXYZ::new(320, 288, 16),
                direction: Direction::North,
                station: StationIndex::new(0),
                is_exit: true,
            },
            place_flags(),
        );
        assert!(near.is_ok(), "entrance rejected: {near:?}");
        let station = world.ride(ride).and_then(|r| r.station(StationIndex::new(0))).copied();
        let exit = station.and_then(|s| s.exit).expect("exit recorded");
        assert_eq!(exit.tile, TileCoordsXY::new(10, 9));
        assert_eq!(exit.direction, Direction::North);
        assert_eq!(station.map(|s| s.height), Some(16));
    }

    #[test]
    fn station_pieces_start_a_station() {
        let mut world = World::new();
        let ride = create_ride(&mut world, RideType::MiniatureRailway);
        let location = CoordsXYZ::new(160, 160, 32);
        assert!(place_track(&mut world, ride, TrackPiece::EndStation, location, Direction::West, place_flags()).is_ok());

        let station = world.ride(ride).map(|r| r.stations[0]).expect("ride");
        assert_eq!(station.start, Some(location));
        assert_eq!(station.height, 32);
    }

    #[test]
    fn demolishing_a_ride_clears_its_elements() {
        let mut world = World::new();
        let ride = create_ride(&mut world, RideType::SteelCoaster);
        assert!(place_track(&mut world, ride, TrackPiece::Flat, CoordsXYZ::new(64, 64, 16), Direction::West, place_flags()).is_ok());

        assert!(apply(&mut world, &Action::DemolishRide { ride }, place_flags()).is_ok());
        assert!(world.ride(ride).is_none());
        assert_eq!(query::structures(&world).count(), 0);
    }

    #[test]
    fn connecting_paths_links_neighbouring_tiles() {
        let mut world = World::new();
        let surface = world.default_path_surface(false).expect("surface");
        let railings = world.default_railings().expect("railings");
        for x in [64, 96] {
            let placed = apply(
                &mut world,
                &Action::PlaceFootpathFromTrack {
                    location: CoordsXYZ::new(x, 64, 16),
                    slope: None,
                    surface,
                    railings,
                    edges: EdgeMask::NONE,
                    is_queue: false,
                },
                place_flags(),
            );
            assert!(placed.is_ok(), "path rejected: {placed:?}");
        }

        let connected = apply(
            &mut world,
            &Action::ConnectFootpathEdges {
                location: CoordsXYZ::new(64, 64, 16),
            },
            place_flags(),
        );
        assert!(connected.is_ok());
        let edges: Vec<EdgeMask> = query::structures(&world)
            .filter_map(|(_, element)| match element.kind {
                track_design_core::TileElementKind::Path(path) => Some(path.edges),
                _ => None,
            })
            .collect();
        assert_eq!(edges, vec![EdgeMask::NONE.with(Direction::East), EdgeMask::NONE.with(Direction::West)]);
    }

    #[test]
    fn scratch_map_is_flat_and_restores_the_live_map() {
        let mut world = World::new();
        let ride = create_ride(&mut world, RideType::SteelCoaster);
        assert!(place_track(&mut world, ride, TrackPiece::Flat, CoordsXYZ::new(64, 64, 16), Direction::West, place_flags()).is_ok());

        world.stash_and_install_scratch_map(256);
        assert_eq!(world.map_size(), 256);
        assert!(query::has_stashed_map(&world));
        assert_eq!(query::structures(&world).count(), 0);

        world.unstash_map();
        assert_eq!(world.map_size(), 64);
        assert_eq!(query::structures(&world).count(), 1);
    }

    #[test]
    fn closed_loop_walks_back_to_its_origin() {
        let mut world = World::new();
        let ride = create_ride(&mut world, RideType::SteelCoaster);
        let mut location = CoordsXYZ::new(320, 320, 16);
        let mut direction = Direction::West;
        for _ in 0..4 {
            let result = place_track(
                &mut world,
                ride,
                TrackPiece::LeftQuarterTurn1Tile,
                location,
                direction,
                place_flags(),
            );
            assert!(result.is_ok(), "loop piece rejected: {result:?}");
            let position = graph::TrackPosition {
                ride,
                piece: TrackPiece::LeftQuarterTurn1Tile,
                location,
                direction,
                element: *world.tile_elements(location.xy().to_tile())[1]
                    .as_track()
                    .expect("track"),
            };
            let (next, next_direction) = position.next_begin();
            location = next;
            direction = next_direction;
        }
        assert_eq!(location, CoordsXYZ::new(320, 320, 16));

        let origin = graph::find_origin_piece(&world, ride).expect("origin");
        let start = graph::start_of_track(&world, origin);
        assert_eq!(start.location, origin.location);

        let mut visited = 1;
        let mut current = graph::next_piece(&world, &start).expect("connected");
        while current.location != start.location {
            visited += 1;
            current = graph::next_piece(&world, &current).expect("connected");
        }
        assert_eq!(visited, 4);
    }

    #[test]
    fn open_track_walks_back_to_its_first_piece() {
        let mut world = World::new();
        let ride = create_ride(&mut world, RideType::SteelCoaster);
        let pieces = [
            (CoordsXYZ::new(320, 320, 16), TrackPiece::Flat),
            (CoordsXYZ::new(288, 320, 16), TrackPiece::FlatToUp25),
            (CoordsXYZ::new(256, 320, 24), TrackPiece::Up25ToFlat),
        ];
        for (location, piece) in pieces {
            assert!(place_track(&mut world, ride, piece, location, Direction::West, place_flags()).is_ok());
        }

        let any = graph::piece_origin(
            &world,
            TileCoordsXY::new(9, 10),
            &world.tile_elements(TileCoordsXY::new(9, 10))[1],
        )
        .expect("origin of middle piece");
        assert_eq!(any.piece, TrackPiece::FlatToUp25);
        let start = graph::start_of_track(&world, any);
        assert_eq!(start.piece, TrackPiece::Flat);
        let next = graph::next_piece(&world, &any).expect("next");
        assert_eq!(next.piece, TrackPiece::Up25ToFlat);
        assert!(graph::next_piece(&world, &next).is_none());
    }
}
