//! Snapshot types describing map tiles and rides.

use serde::{Deserialize, Serialize};

use crate::{
    coords::{CoordsXYZ, Direction, TileCoordsXY, LAND_HEIGHT_STEP},
    objects::{ObjectIndex, ObjectReference},
    orientation::EdgeMask,
    track::TrackPiece,
};

/// Maximum number of stations a single ride can own.
pub const MAX_STATIONS_PER_RIDE: usize = 4;

/// Unique identifier assigned to a ride by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RideId(u16);

impl RideId {
    /// Creates a new ride identifier with the provided value.
    #[must_use]
    pub const fn new(value: u16) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u16 {
        self.0
    }
}

/// Index of a station within its ride.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StationIndex(u8);

impl StationIndex {
    /// Creates a station index.
    #[must_use]
    pub const fn new(value: u8) -> Self {
        Self(value)
    }

    /// Numeric value of the index.
    #[must_use]
    pub const fn get(&self) -> u8 {
        self.0
    }
}

/// Slope of a land surface: one bit per raised corner plus a double height bit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Slope(u8);

impl Slope {
    /// Level land.
    pub const FLAT: Slope = Slope(0);
    const ALL_CORNERS: u8 = 0x0F;
    const DOUBLE_HEIGHT: u8 = 0x10;

    /// Wraps raw slope bits.
    #[must_use]
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits & (Self::ALL_CORNERS | Self::DOUBLE_HEIGHT))
    }

    /// Whether any corner is raised.
    #[must_use]
    pub const fn has_raised_corner(self) -> bool {
        self.0 & Self::ALL_CORNERS != 0
    }

    /// Whether the raised corner rises two land steps.
    #[must_use]
    pub const fn is_double_height(self) -> bool {
        self.0 & Self::DOUBLE_HEIGHT != 0
    }
}

/// Land surface of a tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SurfaceElement {
    /// Raised corners of the land.
    pub slope: Slope,
    /// Height of the water surface, zero when dry.
    pub water_height: i32,
}

/// Track piece block placed on a tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TrackElement {
    /// Ride owning the piece.
    pub ride: RideId,
    /// Kind of piece.
    pub piece: TrackPiece,
    /// Block of the piece stored on this tile.
    pub sequence: u8,
    /// Station the piece belongs to.
    pub station: StationIndex,
    /// Brake or booster speed.
    pub brake_speed: u8,
    /// Seat rotation for rides that spin their seats.
    pub seat_rotation: u8,
    /// Track colour scheme index.
    pub colour_scheme: u8,
    /// Whether the piece carries a chain lift.
    pub chain_lift: bool,
    /// Whether the piece uses the inverted track variant.
    pub inverted: bool,
    /// Wall segments of a maze cell.
    pub maze_entry: u16,
}

/// Whether an entrance element admits or releases guests.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntranceKind {
    /// Ride entrance.
    Entrance,
    /// Ride exit.
    Exit,
}

/// Ride entrance or exit hut.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntranceElement {
    /// Ride served by the hut.
    pub ride: RideId,
    /// Station served by the hut.
    pub station: StationIndex,
    /// Entrance or exit.
    pub kind: EntranceKind,
}

/// Footpath or queue tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PathElement {
    /// Surface object.
    pub surface: ObjectIndex,
    /// Railings object.
    pub railings: ObjectIndex,
    /// Edges connected to neighbours.
    pub edges: EdgeMask,
    /// Direction the path climbs towards when sloped.
    pub slope: Option<Direction>,
    /// Whether the path is a queue line.
    pub is_queue: bool,
}

/// Small scenery object occupying a tile or a quarter of one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SmallSceneryElement {
    /// Scenery object.
    pub object: ObjectIndex,
    /// Quarter of the tile occupied.
    pub quadrant: u8,
    /// Primary colour.
    pub primary_colour: u8,
    /// Secondary colour.
    pub secondary_colour: u8,
}

/// One tile of a multi-tile scenery object.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LargeSceneryElement {
    /// Scenery object.
    pub object: ObjectIndex,
    /// Tile of the object stored here; zero marks the anchor tile.
    pub sequence: u8,
    /// Primary colour.
    pub primary_colour: u8,
    /// Secondary colour.
    pub secondary_colour: u8,
}

/// Wall standing on a tile edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WallElement {
    /// Wall object.
    pub object: ObjectIndex,
    /// Primary colour.
    pub primary_colour: u8,
    /// Secondary colour.
    pub secondary_colour: u8,
    /// Tertiary colour.
    pub tertiary_colour: u8,
}

/// Payload of a tile element.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileElementKind {
    /// Land surface; every tile carries exactly one.
    Surface(SurfaceElement),
    /// Track block.
    Track(TrackElement),
    /// Ride entrance or exit.
    Entrance(EntranceElement),
    /// Footpath or queue.
    Path(PathElement),
    /// Small scenery.
    SmallScenery(SmallSceneryElement),
    /// Tile of large scenery.
    LargeScenery(LargeSceneryElement),
    /// Wall.
    Wall(WallElement),
}

/// Element stacked on a map tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileElement {
    /// Lowest point of the element in world units.
    pub base_z: i32,
    /// Highest point of the element in world units.
    pub clearance_z: i32,
    /// Direction the element faces.
    pub direction: Direction,
    /// Whether the element is a removable preview overlay.
    pub ghost: bool,
    /// Element payload.
    pub kind: TileElementKind,
}

impl TileElement {
    /// Track payload, if the element is a track block.
    #[must_use]
    pub const fn as_track(&self) -> Option<&TrackElement> {
        match &self.kind {
            TileElementKind::Track(track) => Some(track),
            _ => None,
        }
    }

    /// Entrance payload, if the element is an entrance or exit.
    #[must_use]
    pub const fn as_entrance(&self) -> Option<&EntranceElement> {
        match &self.kind {
            TileElementKind::Entrance(entrance) => Some(entrance),
            _ => None,
        }
    }

    /// Surface payload, if the element is the land surface.
    #[must_use]
    pub const fn as_surface(&self) -> Option<&SurfaceElement> {
        match &self.kind {
            TileElementKind::Surface(surface) => Some(surface),
            _ => None,
        }
    }

    /// Whether the vertical span overlaps `base..clearance`.
    #[must_use]
    pub const fn overlaps(&self, base: i32, clearance: i32) -> bool {
        base < self.clearance_z && self.base_z < clearance
    }

    /// Ride owning the element, if it belongs to one.
    #[must_use]
    pub const fn ride(&self) -> Option<RideId> {
        match &self.kind {
            TileElementKind::Track(track) => Some(track.ride),
            TileElementKind::Entrance(entrance) => Some(entrance.ride),
            _ => None,
        }
    }
}

/// Height of the walkable top of a surface, water included.
#[must_use]
pub fn surface_height(element: &TileElement) -> Option<i32> {
    let surface = element.as_surface()?;
    let mut height = element.base_z;
    if surface.slope.has_raised_corner() {
        height += LAND_HEIGHT_STEP;
        if surface.slope.is_double_height() {
            height += LAND_HEIGHT_STEP;
        }
    }
    if surface.water_height > 0 && surface.water_height > height {
        height = surface.water_height;
    }
    Some(height)
}

/// Tile position, height and facing of an entrance or exit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntranceLocation {
    /// Tile holding the hut.
    pub tile: TileCoordsXY,
    /// Base height of the hut in world units.
    pub z: i32,
    /// Direction the hut faces; the station lies one step this way.
    pub direction: Direction,
}

/// Boarding zone of a ride.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Station {
    /// First block of the platform, if one has been built.
    pub start: Option<CoordsXYZ>,
    /// Base height of the platform in world units.
    pub height: i32,
    /// Location of the entrance hut.
    pub entrance: Option<EntranceLocation>,
    /// Location of the exit hut.
    pub exit: Option<EntranceLocation>,
}

/// Category of ride, controlling how it is captured and framed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RideType {
    /// Hedge maze built from maze cells.
    Maze,
    /// Narrow gauge railway.
    MiniatureRailway,
    /// Steel roller coaster.
    SteelCoaster,
    /// Coaster that can run inverted track.
    FlyingCoaster,
    /// Spinning ride without its own track layout.
    Carousel,
}

impl RideType {
    /// Whether designs of this type are stored as maze cells.
    #[must_use]
    pub const fn is_maze(self) -> bool {
        matches!(self, RideType::Maze)
    }

    /// Whether the ride has a real track with height information.
    #[must_use]
    pub const fn has_track(self) -> bool {
        !matches!(self, RideType::Carousel)
    }

    /// Whether the ride can switch track pieces to the inverted variant.
    #[must_use]
    pub const fn has_alternative_track_type(self) -> bool {
        matches!(self, RideType::FlyingCoaster)
    }
}

/// Body, trim and tertiary colour of a vehicle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VehicleColour {
    /// Body colour.
    pub body: u8,
    /// Trim colour.
    pub trim: u8,
    /// Tertiary colour.
    pub tertiary: u8,
}

/// Spine, rail and support colours of one track colour scheme.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TrackColour {
    /// Spine colour.
    pub spine: u8,
    /// Rail colour.
    pub rail: u8,
    /// Support colour.
    pub support: u8,
}

/// Number of track colour schemes a ride carries.
pub const NUM_COLOUR_SCHEMES: usize = 4;

/// Operating parameters chosen for a ride.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OperatingSettings {
    /// Departure control flags.
    pub depart_flags: u8,
    /// Number of trains on the track.
    pub number_of_trains: u8,
    /// Number of cars per train.
    pub cars_per_train: u8,
    /// Minimum waiting time at the station.
    pub min_waiting_time: u8,
    /// Maximum waiting time at the station.
    pub max_waiting_time: u8,
    /// Mode specific operation option.
    pub operation_setting: u8,
    /// Speed of the chain lift.
    pub lift_hill_speed: u8,
    /// Number of circuits per ride.
    pub circuits: u8,
}

/// Measurements and ratings as the simulation stores them.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RideMeasurements {
    /// Maximum speed in 16.16 fixed point.
    pub max_speed: i32,
    /// Average speed in 16.16 fixed point.
    pub average_speed: i32,
    /// Total track length in 16.16 fixed point.
    pub total_length: i32,
    /// Maximum positive vertical g in hundredths.
    pub max_positive_vertical_g: i16,
    /// Maximum negative vertical g in hundredths.
    pub max_negative_vertical_g: i16,
    /// Maximum lateral g in hundredths.
    pub max_lateral_g: i16,
    /// Number of inversions.
    pub inversions: u8,
    /// Number of holes on mini golf courses.
    pub holes: u8,
    /// Eighths of the track that are sheltered.
    pub sheltered_eighths: u8,
    /// Number of drops.
    pub drops: u8,
    /// Highest drop in height steps.
    pub highest_drop: u8,
    /// Air time in simulation ticks.
    pub total_air_time: u16,
    /// Excitement rating in hundredths.
    pub excitement: i16,
    /// Intensity rating in hundredths.
    pub intensity: i16,
    /// Nausea rating in hundredths.
    pub nausea: i16,
    /// Running cost per month.
    pub upkeep_cost: i16,
}

/// Snapshot of a ride as stored by the world.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ride {
    /// Identifier of the ride.
    pub id: RideId,
    /// Category of ride.
    pub ride_type: RideType,
    /// Vehicle object, if the ride runs vehicles.
    pub vehicle: Option<ObjectReference>,
    /// Operating mode.
    pub mode: u8,
    /// How track colour schemes are applied.
    pub colour_scheme_type: u8,
    /// Vehicle colours, one per car.
    pub vehicle_colours: Vec<VehicleColour>,
    /// Track colour schemes.
    pub track_colours: [TrackColour; NUM_COLOUR_SCHEMES],
    /// Station building style.
    pub entrance_style: u8,
    /// Operating parameters.
    pub operating: OperatingSettings,
    /// Latest measurements.
    pub measurements: RideMeasurements,
    /// Stations in index order.
    pub stations: [Station; MAX_STATIONS_PER_RIDE],
}

impl Ride {
    /// Creates a ride without stations, measurements or custom colours.
    #[must_use]
    pub fn new(id: RideId, ride_type: RideType, vehicle: Option<ObjectReference>) -> Self {
        Self {
            id,
            ride_type,
            vehicle,
            mode: 0,
            colour_scheme_type: 0,
            vehicle_colours: Vec::new(),
            track_colours: [TrackColour::default(); NUM_COLOUR_SCHEMES],
            entrance_style: 0,
            operating: OperatingSettings::default(),
            measurements: RideMeasurements::default(),
            stations: [Station::default(); MAX_STATIONS_PER_RIDE],
        }
    }

    /// Station with the given index.
    #[must_use]
    pub fn station(&self, index: StationIndex) -> Option<&Station> {
        self.stations.get(usize::from(index.get()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn surface(base_z: i32, slope: Slope, water_height: i32) -> TileElement {
        TileElement {
            base_z,
            clearance_z: base_z,
            direction: Direction::West,
            ghost: false,
            kind: TileElementKind::Surface(SurfaceElement {
                slope,
                water_height,
            }),
        }
    }

    #[test]
    fn surface_height_adds_land_steps_for_raised_corners() {
        assert_eq!(surface_height(&surface(16, Slope::FLAT, 0)), Some(16));
        assert_eq!(surface_height(&surface(16, Slope::from_bits(0x01), 0)), Some(32));
        assert_eq!(surface_height(&surface(16, Slope::from_bits(0x11), 0)), Some(48));
    }

    #[test]
    fn water_above_the_land_wins() {
        assert_eq!(surface_height(&surface(16, Slope::FLAT, 40)), Some(40));
        assert_eq!(surface_height(&surface(48, Slope::FLAT, 40)), Some(48));
    }

    #[test]
    fn overlap_excludes_touching_spans() {
        let element = surface(16, Slope::FLAT, 0);
        let element = TileElement {
            clearance_z: 32,
            ..element
        };
        assert!(element.overlaps(24, 40));
        assert!(!element.overlaps(32, 48));
        assert!(!element.overlaps(0, 16));
    }
}
