#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Preview orchestrator that builds a design on a scratch map and renders it
//! from the four view rotations.
//!
//! The live map is stashed for the duration of the call. The design is first
//! probed for the height it needs, then built as a preview at the centre of a
//! flat scratch map, framed and rendered. Every piece of host state touched
//! on the way is restored before the call returns, whether it succeeded or
//! not.

use thiserror::Error;
use tracing::{debug, info};
use track_design_core::{
    translate_3d_to_2d, Action, ActionExecutor, ActionFlags, BoundingBox, CoordsXYZ,
    DesignFlags, Direction, Money, ObjectResolver, PreviewHost, PreviewRenderer, RejectReason,
    RideId, TrackDesign, Viewport, WorldQuery, COORDS_XY_STEP,
};
use track_design_system_placement::{
    place, Operation, PlacementError, PlacementReport, PlacementRequest, PlacementTarget,
};

/// Height the preview is built from before the probe lifts it.
const PREVIEW_BASE_Z: i32 = 16;

/// Flags used for the ride bookkeeping actions of a preview.
const PREVIEW_RIDE_FLAGS: ActionFlags = ActionFlags::APPLY
    .union(ActionFlags::ALLOW_DURING_PAUSE)
    .union(ActionFlags::NO_SPEND);

/// Tunables of a preview render.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PreviewConfig {
    /// Tiles along each side of the scratch map.
    pub scratch_map_size: u32,
    /// Width of one rendered view in pixels.
    pub image_width: u32,
    /// Height of one rendered view in pixels.
    pub image_height: u32,
    /// Treat vehicles that have not been researched as available.
    pub ignore_research: bool,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            scratch_map_size: 256,
            image_width: 370,
            image_height: 217,
            ignore_research: false,
        }
    }
}

impl PreviewConfig {
    /// Bytes needed for one rendered view.
    #[must_use]
    pub const fn image_size(&self) -> usize {
        self.image_width as usize * self.image_height as usize
    }

    /// Bytes needed for all four views.
    #[must_use]
    pub const fn buffer_size(&self) -> usize {
        self.image_size() * 4
    }
}

/// Reasons a preview cannot be drawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum PreviewError {
    /// The caller's pixel buffer cannot hold four views.
    #[error("pixel buffer holds {actual} bytes but the preview needs {needed}")]
    BufferTooSmall {
        /// Bytes required.
        needed: usize,
        /// Bytes supplied.
        actual: usize,
    },
    /// The preview ride could not be created.
    #[error("preview ride could not be created: {0}")]
    RideCreation(RejectReason),
    /// Building the design on the scratch map failed.
    #[error("design could not be built for the preview: {0}")]
    Placement(#[from] PlacementError),
}

/// Result of a successful preview.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PreviewOutcome {
    /// Cost of building the design.
    pub cost: Money,
    /// Scenery and vehicle availability flags.
    pub flags: DesignFlags,
    /// Height the design was built at.
    pub place_z: i32,
    /// View used for the renders; its position is the one of the last rotation.
    pub viewport: Viewport,
}

/// World capabilities the preview needs.
pub trait PreviewWorld: PlacementTarget + PreviewHost {}

impl<T> PreviewWorld for T where T: PlacementTarget + PreviewHost {}

/// Host state saved before a preview and put back afterwards.
struct SavedHost {
    rotation: Direction,
    forbid_high_construction: bool,
}

impl SavedHost {
    fn take<W: PreviewHost>(world: &mut W) -> Self {
        let saved = Self {
            rotation: world.view_rotation(),
            forbid_high_construction: world.forbid_high_construction(),
        };
        world.set_forbid_high_construction(false);
        world.set_view_rotation(Direction::West);
        saved
    }

    fn restore<W: PreviewHost>(self, world: &mut W) {
        world.set_forbid_high_construction(self.forbid_high_construction);
        world.set_view_rotation(self.rotation);
    }
}

/// Builds `design` on a scratch map and renders four rotations into `pixels`.
///
/// On success the measured cost and availability flags are written back into
/// `design`. On failure `pixels` is zero-filled.
pub fn draw_preview<W, R>(
    design: &mut TrackDesign,
    world: &mut W,
    renderer: &mut R,
    config: &PreviewConfig,
    pixels: &mut [u8],
) -> Result<PreviewOutcome, PreviewError>
where
    W: PreviewWorld,
    R: PreviewRenderer + ?Sized,
{
    let needed = config.buffer_size();
    if pixels.len() < needed {
        return Err(PreviewError::BufferTooSmall {
            needed,
            actual: pixels.len(),
        });
    }

    world.stash_and_install_scratch_map(config.scratch_map_size);
    let outcome = build_and_render(design, world, renderer, config, pixels);
    world.unstash_map();

    match outcome {
        Ok(outcome) => {
            design.cost = outcome.cost.get();
            design.track_flags = outcome.flags;
            info!(
                ride_type = ?design.ride_type,
                cost = %outcome.cost,
                flags = outcome.flags.bits(),
                zoom = outcome.viewport.zoom,
                "preview drawn"
            );
            Ok(outcome)
        }
        Err(error) => {
            pixels[..needed].fill(0);
            info!(ride_type = ?design.ride_type, %error, "preview failed");
            Err(error)
        }
    }
}

fn build_and_render<W, R>(
    design: &TrackDesign,
    world: &mut W,
    renderer: &mut R,
    config: &PreviewConfig,
    pixels: &mut [u8],
) -> Result<PreviewOutcome, PreviewError>
where
    W: PreviewWorld,
    R: PreviewRenderer + ?Sized,
{
    let created = world.execute(
        &Action::CreateRide {
            ride_type: design.ride_type,
            vehicle: design.vehicle_object.clone(),
            track_colours: design.track_colours.to_vec(),
        },
        PREVIEW_RIDE_FLAGS,
    );
    let ride = match (created.error, created.ride) {
        (None, Some(ride)) => ride,
        (Some(reason), _) => return Err(PreviewError::RideCreation(reason)),
        (None, None) => return Err(PreviewError::RideCreation(RejectReason::MissingRide)),
    };

    let saved = SavedHost::take(world);
    let built = build(design, world, ride, config);
    let outcome = built.map(|(report, place_z, flags)| {
        let viewport = render(design, world, renderer, config, &report.bounds, pixels);
        PreviewOutcome {
            cost: report.cost,
            flags,
            place_z,
            viewport,
        }
    });

    let demolished = world.execute(&Action::DemolishRide { ride }, PREVIEW_RIDE_FLAGS);
    if let Some(reason) = demolished.error {
        debug!(ride = ride.get(), %reason, "preview ride was already gone");
    }
    saved.restore(world);
    outcome
}

/// Probes the height, then builds the preview; returns the build report, the
/// height used and the availability flags.
fn build<W: PreviewWorld>(
    design: &TrackDesign,
    world: &mut W,
    ride: RideId,
    config: &PreviewConfig,
) -> Result<(PlacementReport, i32, DesignFlags), PreviewError> {
    let centre = i32::try_from(world.map_size()).unwrap_or(0) * COORDS_XY_STEP / 2;
    let origin = CoordsXYZ::new(centre, centre, PREVIEW_BASE_Z);
    let request = PlacementRequest::new(origin, Direction::West, ride);

    let probe = place(design, Operation::GetPlaceZ(&*world), &request)?;
    let mut flags = probe.design_flags();
    let place_z = PREVIEW_BASE_Z + probe.place_z;
    let mut request = PlacementRequest::new(CoordsXYZ::new(centre, centre, place_z), Direction::West, ride);
    if probe.scenery_unavailable {
        request = request.without_scenery();
    }
    debug!(place_z, scenery = request.place_scenery, "preview height probed");

    let report = place(design, Operation::PlaceTrackPreview(world), &request)?;
    if !vehicle_available(design, &*world, config) {
        flags.insert(DesignFlags::VEHICLE_UNAVAILABLE);
    }
    Ok((report, place_z, flags))
}

fn vehicle_available<W: PreviewWorld>(design: &TrackDesign, world: &W, config: &PreviewConfig) -> bool {
    let Some(reference) = &design.vehicle_object else {
        return false;
    };
    match world.resolve(reference) {
        Some(object) => object.available || config.ignore_research,
        None => false,
    }
}

/// Frames the build and renders one view per rotation into consecutive slices.
fn render<W, R>(
    design: &TrackDesign,
    world: &W,
    renderer: &mut R,
    config: &PreviewConfig,
    bounds: &BoundingBox,
    pixels: &mut [u8],
) -> Viewport
where
    W: PreviewWorld,
    R: PreviewRenderer + ?Sized,
{
    let (centre, zoom) = frame(bounds, design.ride_type.has_track());
    let width = i32::try_from(config.image_width).unwrap_or(i32::MAX);
    let height = i32::try_from(config.image_height).unwrap_or(i32::MAX);
    let mut viewport = Viewport {
        width: config.image_width,
        height: config.image_height,
        view_width: width << zoom,
        view_height: height << zoom,
        zoom,
        view_x: 0,
        view_y: 0,
    };

    for (rotation, slice) in Direction::ALL
        .into_iter()
        .zip(pixels.chunks_exact_mut(config.image_size()))
    {
        let (x, y) = translate_3d_to_2d(rotation, centre);
        viewport.view_x = x - viewport.view_width / 2;
        viewport.view_y = y - viewport.view_height / 2;
        renderer.render_view(world, &viewport, rotation, slice);
    }
    viewport
}

/// Centre of the view and zoom level for a build spanning `bounds`.
fn frame(bounds: &BoundingBox, has_track: bool) -> (CoordsXYZ, u8) {
    let (min, max) = (bounds.min(), bounds.max());
    let half_tile = COORDS_XY_STEP / 2;
    let mut centre = CoordsXYZ::new(
        (min.x + max.x) / 2 + half_tile,
        (min.y + max.y) / 2 + half_tile,
        (min.z + max.z) / 2,
    );
    let mut size_z = max.z - min.z;
    if !has_track {
        centre.z = 0;
        size_z = 0;
    }
    let size = (max.x - min.x).max(max.y - min.y);

    let zoom = if size > 1600 || size_z > 1000 {
        3
    } else if size > 1000 || size_z > 280 {
        2
    } else {
        1
    };
    (centre, zoom)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds(min: CoordsXYZ, max: CoordsXYZ) -> BoundingBox {
        let mut bounds = BoundingBox::at(min);
        bounds.include(max);
        bounds
    }

    #[test]
    fn small_builds_use_the_closest_zoom() {
        let (centre, zoom) = frame(
            &bounds(CoordsXYZ::new(4000, 4000, 16), CoordsXYZ::new(4096, 4064, 48)),
            true,
        );
        assert_eq!(zoom, 1);
        assert_eq!(centre, CoordsXYZ::new(4064, 4048, 32), "centred on the middle of the tiles");
    }

    #[test]
    fn zoom_grows_with_the_widest_side_or_the_height() {
        let wide = bounds(CoordsXYZ::new(0, 0, 0), CoordsXYZ::new(200, 1200, 0));
        assert_eq!(frame(&wide, true).1, 2);
        let huge = bounds(CoordsXYZ::new(0, 0, 0), CoordsXYZ::new(1700, 0, 0));
        assert_eq!(frame(&huge, true).1, 3);
        let tall = bounds(CoordsXYZ::new(0, 0, 0), CoordsXYZ::new(64, 64, 300));
        assert_eq!(frame(&tall, true).1, 2);
    }

    #[test]
    fn flat_rides_ignore_height_when_framing() {
        let tall = bounds(CoordsXYZ::new(0, 0, 0), CoordsXYZ::new(64, 64, 300));
        let (centre, zoom) = frame(&tall, false);
        assert_eq!(zoom, 1);
        assert_eq!(centre.z, 0);
    }

    #[test]
    fn default_buffer_holds_four_views() {
        let config = PreviewConfig::default();
        assert_eq!(config.image_size(), 370 * 217);
        assert_eq!(config.buffer_size(), 4 * 370 * 217);
    }
}
