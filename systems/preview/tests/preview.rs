use track_design_core::{
    Action, ActionFlags, CoordsXYZ, DesignFlags, Direction, GenericSceneryOrientation, Money,
    ObjectIndex, ObjectReference, PreviewHost, PreviewRenderer, RelativeTile, RideType,
    SceneryOrientation, TileCoordsXY, TrackDesign, TrackDesignEntranceElement,
    TrackDesignSceneryElement, TrackDesignTrackElement, TrackFlags, TrackPiece, Viewport,
    WorldQuery,
};
use track_design_system_preview::{draw_preview, PreviewConfig, PreviewError};
use track_design_world::{apply, query, World};

/// Records every view it is asked for and stamps each slice with its rotation.
#[derive(Default)]
struct Recorder {
    views: Vec<(Direction, Viewport, usize, bool)>,
}

impl PreviewRenderer for Recorder {
    fn render_view(
        &mut self,
        world: &dyn WorldQuery,
        viewport: &Viewport,
        rotation: Direction,
        pixels: &mut [u8],
    ) {
        let centre_built = world
            .tile_elements(TileCoordsXY::new(128, 128))
            .iter()
            .any(|element| element.as_track().is_some());
        pixels.fill(rotation.index() + 1);
        self.views.push((rotation, *viewport, pixels.len(), centre_built));
    }
}

fn loop_design(vehicle: &str) -> TrackDesign {
    let mut design = TrackDesign::new(RideType::SteelCoaster);
    design.vehicle_object = Some(ObjectReference::new(vehicle));
    design.track_elements = vec![
        TrackDesignTrackElement {
            piece: TrackPiece::LeftQuarterTurn1Tile,
            flags: TrackFlags::default(),
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

fn buffer(config: &PreviewConfig) -> Vec<u8> {
    vec![0xAA; config.buffer_size()]
}

#[test]
fn preview_renders_four_rotations_and_restores_the_host() {
    let mut world = World::new();
    let tree = apply(
        &mut world,
        &Action::PlaceSmallScenery {
            location: CoordsXYZ::new(64, 64, 16),
            direction: Direction::West,
            quadrant: 0,
            object: ObjectIndex::new(0),
            primary_colour: 0,
            secondary_colour: 0,
        },
        ActionFlags::APPLY,
    );
    assert!(tree.is_ok());
    world.set_view_rotation(Direction::North);
    world.set_forbid_high_construction(true);
    let cash_before = query::cash(&world);

    let config = PreviewConfig::default();
    let mut pixels = buffer(&config);
    let mut recorder = Recorder::default();
    let mut design = loop_design("rct2.ride.steel_train");

    let outcome = draw_preview(&mut design, &mut world, &mut recorder, &config, &mut pixels)
        .expect("loop previews");

    assert_eq!(outcome.cost, Money::new(540));
    assert_eq!(design.cost, 540, "cost is written back");
    assert_eq!(design.track_flags, DesignFlags::empty());
    assert_eq!(outcome.place_z, 16);

    let rotations: Vec<_> = recorder.views.iter().map(|view| view.0).collect();
    assert_eq!(rotations, Direction::ALL.to_vec());
    for (_, viewport, len, centre_built) in &recorder.views {
        assert_eq!(*len, config.image_size());
        assert_eq!((viewport.width, viewport.height), (370, 217));
        assert_eq!(viewport.zoom, 1);
        assert_eq!((viewport.view_width, viewport.view_height), (740, 434));
        assert!(centre_built, "the design stands on the scratch map while rendering");
    }
    for (index, slice) in pixels.chunks(config.image_size()).enumerate() {
        assert!(slice.iter().all(|&pixel| usize::from(pixel) == index + 1), "slice {index}");
    }

    assert_eq!(world.map_size(), 64, "live map is back");
    assert!(!query::has_stashed_map(&world));
    assert_eq!(query::structures(&world).count(), 1, "only the tree remains");
    assert_eq!(query::rides(&world).count(), 0, "preview ride is demolished");
    assert_eq!(world.view_rotation(), Direction::North);
    assert!(world.forbid_high_construction());
    assert_eq!(query::cash(&world), cash_before, "previews are free");
}

#[test]
fn unavailable_vehicles_are_flagged_unless_research_is_ignored() {
    let config = PreviewConfig::default();
    let mut pixels = buffer(&config);

    let mut world = World::new();
    let mut design = loop_design("rct2.ride.prototype_flyer");
    let outcome = draw_preview(&mut design, &mut world, &mut Recorder::default(), &config, &mut pixels)
        .expect("loop previews");
    assert!(outcome.flags.contains(DesignFlags::VEHICLE_UNAVAILABLE));
    assert!(design.track_flags.contains(DesignFlags::VEHICLE_UNAVAILABLE));

    let relaxed = PreviewConfig {
        ignore_research: true,
        ..config
    };
    let outcome = draw_preview(&mut design, &mut world, &mut Recorder::default(), &relaxed, &mut pixels)
        .expect("loop previews");
    assert!(!outcome.flags.contains(DesignFlags::VEHICLE_UNAVAILABLE));

    let mut unknown = loop_design("custom.ride.unknown");
    let outcome = draw_preview(&mut unknown, &mut world, &mut Recorder::default(), &relaxed, &mut pixels)
        .expect("loop previews");
    assert!(outcome.flags.contains(DesignFlags::VEHICLE_UNAVAILABLE), "unknown vehicles never pass");
}

#[test]
fn missing_scenery_is_left_out_of_the_preview() {
    let config = PreviewConfig::default();
    let mut pixels = buffer(&config);
    let mut world = World::new();
    let mut design = loop_design("rct2.ride.steel_train");
    design.scenery_elements.push(TrackDesignSceneryElement {
        position: RelativeTile::new(3, 3),
        z: 0,
        object: ObjectReference::new("custom.scenery_small.gnome"),
        primary_colour: 0,
        secondary_colour: 0,
        orientation: SceneryOrientation::Generic(GenericSceneryOrientation::new(Direction::West, 0)),
    });

    let outcome = draw_preview(&mut design, &mut world, &mut Recorder::default(), &config, &mut pixels)
        .expect("loop previews");
    assert!(outcome.flags.contains(DesignFlags::HAS_SCENERY));
    assert!(outcome.flags.contains(DesignFlags::SCENERY_UNAVAILABLE));
}

#[test]
fn failed_build_clears_the_image_and_restores_the_host() {
    let config = PreviewConfig {
        scratch_map_size: 16,
        ..PreviewConfig::default()
    };
    let mut pixels = buffer(&config);
    let mut world = World::new();
    world.set_view_rotation(Direction::East);
    let mut design = TrackDesign::new(RideType::SteelCoaster);
    design.track_elements = vec![
        TrackDesignTrackElement {
            piece: TrackPiece::Flat,
            flags: TrackFlags::default(),
        };
        10
    ];
    let mut recorder = Recorder::default();

    let result = draw_preview(&mut design, &mut world, &mut recorder, &config, &mut pixels);

    assert!(matches!(result, Err(PreviewError::Placement(_))), "{result:?}");
    assert!(pixels.iter().all(|&pixel| pixel == 0));
    assert!(recorder.views.is_empty());
    assert_eq!(design.cost, 0, "nothing is written back");
    assert_eq!(world.map_size(), 64);
    assert_eq!(world.view_rotation(), Direction::East);
    assert_eq!(query::rides(&world).count(), 0);
}

#[test]
fn short_buffers_are_rejected_before_touching_the_world() {
    let config = PreviewConfig::default();
    let mut pixels = vec![0; config.image_size()];
    let mut world = World::new();
    let mut design = loop_design("rct2.ride.steel_train");

    let result = draw_preview(&mut design, &mut world, &mut Recorder::default(), &config, &mut pixels);
    assert_eq!(
        result,
        Err(PreviewError::BufferTooSmall {
            needed: config.buffer_size(),
            actual: config.image_size(),
        })
    );
    assert!(!query::has_stashed_map(&world));
}
