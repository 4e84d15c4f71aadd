#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter for capturing, mirroring, placing and previewing
//! track designs.
//!
//! Designs travel between commands as single-line transfer strings, so the
//! output of `capture-sample` can be piped into every other command.

mod design_transfer;
mod manifest;
mod samples;

use std::{
    fs,
    io::{self, Read},
    path::{Path, PathBuf},
};

use anyhow::{anyhow, Context, Result};
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use track_design_core::{
    CoordsXYZ, Direction, PreviewRenderer, TrackDesign, WorldQuery, COORDS_XY_STEP,
};
use track_design_rendering::{encode_ppm, Palette, SilhouetteRenderer};
use track_design_system_capture::{capture, CaptureConfig};
use track_design_system_mirror::mirror;
use track_design_system_placement::{place, total_cost, Operation, PlacementRequest};
use track_design_system_preview::{draw_preview, PreviewConfig};
use track_design_world::{query, World};
use tracing::info;
use tracing_subscriber::EnvFilter;

use samples::Sample;

/// Height designs are probed from when no explicit height is given.
const PROBE_BASE_Z: i32 = 16;

#[derive(Debug, Parser)]
#[command(
    name = "track-design",
    version,
    about = "Capture, mirror, place and preview ride track designs"
)]
struct Cli {
    /// Raise log verbosity (-v for debug, -vv for trace); RUST_LOG takes precedence.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    /// TOML manifest of objects loaded on top of the built-in catalog.
    #[arg(long, global = true, value_name = "PATH")]
    objects: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Build a stock ride and print its captured design.
    CaptureSample {
        /// Layout to build.
        #[arg(value_enum, default_value = "loop")]
        sample: Sample,
        /// Rotation the ride is built with (0-3).
        #[arg(long, default_value_t = 0, value_parser = clap::value_parser!(u8).range(0..4))]
        rotation: u8,
        /// Plant a tree next to the ride and capture it as scenery.
        #[arg(long)]
        tree: bool,
    },
    /// Summarise a design.
    Inspect {
        /// Transfer string, or `-` to read it from stdin.
        design: String,
    },
    /// Print the mirror image of a design.
    Mirror {
        /// Transfer string, or `-` to read it from stdin.
        design: String,
    },
    /// Validate, ghost or build a design in an empty park.
    Place {
        /// Transfer string, or `-` to read it from stdin.
        design: String,
        /// Origin tile column.
        #[arg(long, default_value_t = 10)]
        x: i32,
        /// Origin tile row.
        #[arg(long, default_value_t = 10)]
        y: i32,
        /// Origin height in world units; probed from the terrain when omitted.
        #[arg(long)]
        z: Option<i32>,
        /// Rotation applied to the design (0-3).
        #[arg(long, default_value_t = 0, value_parser = clap::value_parser!(u8).range(0..4))]
        rotation: u8,
        /// What to do with the design.
        #[arg(long, value_enum, default_value = "place")]
        mode: PlaceMode,
        /// Leave the design's scenery out.
        #[arg(long)]
        no_scenery: bool,
    },
    /// Render the four preview views of a design as PPM images.
    Preview {
        /// Transfer string, or `-` to read it from stdin.
        design: String,
        /// Directory the images are written to.
        #[arg(long, default_value = ".")]
        output: PathBuf,
        /// Treat vehicles that have not been researched as available.
        #[arg(long)]
        ignore_research: bool,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum PlaceMode {
    /// Check every action and report the cost without building.
    Query,
    /// Build the design as ghosts, then remove them again.
    Ghost,
    /// Build the design for real.
    Place,
}

/// Entry point for the track design command-line interface.
fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut world = World::new();
    if let Some(path) = &cli.objects {
        let catalog = manifest::load_catalog(path)
            .with_context(|| format!("failed to load objects from {}", path.display()))?;
        info!(objects = catalog.len(), path = %path.display(), "object manifest loaded");
        world.set_objects(catalog);
    }

    match cli.command {
        Command::CaptureSample {
            sample,
            rotation,
            tree,
        } => capture_sample(&mut world, sample, Direction::from_index(rotation), tree),
        Command::Inspect { design } => inspect(&read_design(&design)?),
        Command::Mirror { design } => {
            let mut design = read_design(&design)?;
            mirror(&mut design, &world);
            println!("{}", design_transfer::encode(&design)?);
            Ok(())
        }
        Command::Place {
            design,
            x,
            y,
            z,
            rotation,
            mode,
            no_scenery,
        } => {
            let design = read_design(&design)?;
            let origin = CoordsXYZ::new(
                x * COORDS_XY_STEP,
                y * COORDS_XY_STEP,
                z.unwrap_or(PROBE_BASE_Z),
            );
            place_design(
                &mut world,
                &design,
                origin,
                z.is_none(),
                Direction::from_index(rotation),
                mode,
                no_scenery,
            )
        }
        Command::Preview {
            design,
            output,
            ignore_research,
        } => {
            let mut design = read_design(&design)?;
            let config = PreviewConfig {
                ignore_research,
                ..PreviewConfig::default()
            };
            preview(&mut world, &mut design, &mut SilhouetteRenderer::new(), &config, &output)
        }
    }
}

fn init_logging(verbose: u8) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(match verbose {
            0 => "warn",
            1 => "debug",
            _ => "trace",
        })
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn read_design(argument: &str) -> Result<TrackDesign> {
    let text = if argument == "-" {
        let mut buffer = String::new();
        let _ = io::stdin()
            .read_to_string(&mut buffer)
            .context("failed to read the design from stdin")?;
        buffer
    } else {
        argument.to_owned()
    };
    design_transfer::decode(&text).context("failed to decode the design string")
}

fn capture_sample(world: &mut World, sample: Sample, rotation: Direction, tree: bool) -> Result<()> {
    let ride = samples::build(world, sample, rotation, tree)?;
    let config = CaptureConfig {
        extra_scenery_tiles: vec![samples::SAMPLE_TREE],
        ..CaptureConfig::default()
    };
    let captured = capture(&*world, ride, &config)
        .map_err(|error| anyhow!("{}: {error}", error.user_message()))
        .context("failed to capture the sample ride")?;
    info!(
        origin = ?captured.origin,
        direction = ?captured.direction,
        tiles = captured.touched_tiles.len(),
        "sample captured"
    );
    println!("{}", design_transfer::encode(&captured.design)?);
    Ok(())
}

fn inspect(design: &TrackDesign) -> Result<()> {
    println!("name: {}", if design.name.is_empty() { "(unnamed)" } else { &design.name });
    println!("ride type: {:?}", design.ride_type);
    match &design.vehicle_object {
        Some(vehicle) => println!("vehicle: {vehicle}"),
        None => println!("vehicle: (none)"),
    }
    if design.ride_type.is_maze() {
        println!("maze elements: {}", design.maze_elements.len());
    } else {
        println!("track elements: {}", design.track_elements.len());
        println!("entrances and exits: {}", design.entrance_elements.len());
    }
    println!("scenery elements: {}", design.scenery_elements.len());
    println!(
        "space required: {}x{}",
        design.space_required_x, design.space_required_y
    );
    println!("cost: {}", design.cost);
    println!("flags: {:#04x}", design.track_flags.bits());
    Ok(())
}

fn place_design(
    world: &mut World,
    design: &TrackDesign,
    mut origin: CoordsXYZ,
    probe: bool,
    rotation: Direction,
    mode: PlaceMode,
    no_scenery: bool,
) -> Result<()> {
    let ride = samples::create_ride(world, design)?;
    let mut request = PlacementRequest::new(origin, rotation, ride);
    if no_scenery {
        request = request.without_scenery();
    }

    if probe {
        let probed = place(design, Operation::GetPlaceZ(&*world), &request)
            .context("failed to find a height for the design")?;
        origin.z += probed.place_z;
        request.origin = origin;
        info!(place_z = probed.place_z, "design height probed");
    }

    let result = match mode {
        PlaceMode::Query => place(design, Operation::PlaceQuery(&*world), &request),
        PlaceMode::Ghost => place(design, Operation::PlaceGhost(&mut *world), &request),
        PlaceMode::Place => place(design, Operation::Place(&mut *world), &request),
    };
    let cost = total_cost(&result);
    let report = result.context("the design could not be placed")?;

    println!("origin: {}, {}, {}", origin.x, origin.y, origin.z);
    println!("cost: {cost}");
    println!(
        "space required: {}x{}",
        report.space_required().0,
        report.space_required().1
    );
    println!("entrance and exit placed: {}", report.entrance_and_exit_placed());
    if report.scenery_unavailable {
        println!("some scenery is not available");
    }

    if mode == PlaceMode::Ghost {
        println!("ghost elements: {}", query::ghost_count(world));
        let _ = place(design, Operation::RemoveGhost(&mut *world), &request)
            .context("failed to remove the ghost")?;
        println!("ghost elements after removal: {}", query::ghost_count(world));
    } else {
        println!("elements on the map: {}", query::structures(world).count());
        println!("cash: {}", query::cash(world));
    }
    Ok(())
}

fn preview<R: PreviewRenderer>(
    world: &mut World,
    design: &mut TrackDesign,
    renderer: &mut R,
    config: &PreviewConfig,
    output: &Path,
) -> Result<()> {
    let mut pixels = vec![0; config.buffer_size()];
    let outcome = draw_preview(design, world, renderer, config, &mut pixels)
        .context("failed to draw the preview")?;

    fs::create_dir_all(output)
        .with_context(|| format!("failed to create {}", output.display()))?;
    let palette = Palette::default();
    for (rotation, view) in Direction::ALL.iter().zip(pixels.chunks_exact(config.image_size())) {
        let image = encode_ppm(view, config.image_width, config.image_height, &palette)?;
        let path = output.join(format!("preview_{}.ppm", rotation.index()));
        fs::write(&path, image).with_context(|| format!("failed to write {}", path.display()))?;
        info!(path = %path.display(), "preview view written");
    }

    println!("cost: {}", outcome.cost);
    println!("place z: {}", outcome.place_z);
    println!("flags: {:#04x}", outcome.flags.bits());
    println!("zoom: {}", outcome.viewport.zoom);
    println!("map size after preview: {}", world.map_size());
    Ok(())
}
