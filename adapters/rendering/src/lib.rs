#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Software renderer for track design previews.
//!
//! Every tile element is drawn as a flat-shaded box projected with the
//! isometric view transform into an 8-bit indexed image. Palette indices are
//! turned into colours only when an image is exported.

use glam::Vec2;
use thiserror::Error;
use track_design_core::{
    translate_3d_to_2d, CoordsXYZ, Direction, PreviewRenderer, TileCoordsXY, TileElement,
    TileElementKind, Viewport, WorldQuery, COORDS_XY_STEP,
};

/// Palette index of pixels nothing was drawn on.
pub const BACKGROUND: u8 = 0;

/// RGBA color used when exporting images.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Returns a new color lightened towards white by the provided amount.
    #[must_use]
    pub fn lighten(self, amount: f32) -> Self {
        let amount = amount.clamp(0.0, 1.0);
        Self {
            red: lighten_channel(self.red, amount),
            green: lighten_channel(self.green, amount),
            blue: lighten_channel(self.blue, amount),
            alpha: self.alpha,
        }
    }

    /// Byte RGB values, alpha ignored.
    #[must_use]
    pub fn to_rgb_u8(self) -> [u8; 3] {
        [self.red, self.green, self.blue].map(|channel| (channel.clamp(0.0, 1.0) * 255.0).round() as u8)
    }
}

fn lighten_channel(channel: f32, amount: f32) -> f32 {
    channel + (1.0 - channel) * amount
}

/// Kind of element as far as colouring is concerned.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ElementClass {
    /// Dry land.
    Land,
    /// Flooded land.
    Water,
    /// Track block or maze cell.
    Track,
    /// Ride entrance or exit.
    Entrance,
    /// Footpath or queue.
    Path,
    /// Small scenery.
    SmallScenery,
    /// Tile of large scenery.
    LargeScenery,
    /// Wall.
    Wall,
    /// Any ghost element.
    Ghost,
}

impl ElementClass {
    const ALL: [ElementClass; 9] = [
        ElementClass::Land,
        ElementClass::Water,
        ElementClass::Track,
        ElementClass::Entrance,
        ElementClass::Path,
        ElementClass::SmallScenery,
        ElementClass::LargeScenery,
        ElementClass::Wall,
        ElementClass::Ghost,
    ];

    /// Class of a tile element.
    #[must_use]
    pub fn of(element: &TileElement) -> Self {
        if element.ghost {
            return ElementClass::Ghost;
        }
        match element.kind {
            TileElementKind::Surface(surface) if surface.water_height > element.base_z => {
                ElementClass::Water
            }
            TileElementKind::Surface(_) => ElementClass::Land,
            TileElementKind::Track(_) => ElementClass::Track,
            TileElementKind::Entrance(_) => ElementClass::Entrance,
            TileElementKind::Path(_) => ElementClass::Path,
            TileElementKind::SmallScenery(_) => ElementClass::SmallScenery,
            TileElementKind::LargeScenery(_) => ElementClass::LargeScenery,
            TileElementKind::Wall(_) => ElementClass::Wall,
        }
    }

    fn slot(self) -> u8 {
        match self {
            ElementClass::Land => 0,
            ElementClass::Water => 1,
            ElementClass::Track => 2,
            ElementClass::Entrance => 3,
            ElementClass::Path => 4,
            ElementClass::SmallScenery => 5,
            ElementClass::LargeScenery => 6,
            ElementClass::Wall => 7,
            ElementClass::Ghost => 8,
        }
    }

    /// Palette index used for the sides of the element's box.
    #[must_use]
    pub fn side_index(self) -> u8 {
        1 + 2 * self.slot()
    }

    /// Palette index used for the top of the element's box.
    #[must_use]
    pub fn top_index(self) -> u8 {
        self.side_index() + 1
    }

    fn base_color(self) -> Color {
        match self {
            ElementClass::Land => Color::from_rgb_u8(74, 120, 52),
            ElementClass::Water => Color::from_rgb_u8(48, 92, 160),
            ElementClass::Track => Color::from_rgb_u8(168, 40, 32),
            ElementClass::Entrance => Color::from_rgb_u8(200, 160, 40),
            ElementClass::Path => Color::from_rgb_u8(120, 120, 120),
            ElementClass::SmallScenery => Color::from_rgb_u8(40, 96, 40),
            ElementClass::LargeScenery => Color::from_rgb_u8(140, 110, 90),
            ElementClass::Wall => Color::from_rgb_u8(110, 80, 50),
            ElementClass::Ghost => Color::from_rgb_u8(150, 170, 220),
        }
    }
}

/// Colours of the indices written by [`SilhouetteRenderer`].
#[derive(Clone, Debug, PartialEq)]
pub struct Palette {
    entries: Vec<Color>,
}

impl Default for Palette {
    fn default() -> Self {
        let mut entries = vec![Color::from_rgb_u8(0, 0, 0)];
        for class in ElementClass::ALL {
            let base = class.base_color();
            entries.push(base);
            entries.push(base.lighten(0.35));
        }
        Self { entries }
    }
}

impl Palette {
    /// Colour of an index; unknown indices are black.
    #[must_use]
    pub fn color(&self, index: u8) -> Color {
        self.entries
            .get(usize::from(index))
            .copied()
            .unwrap_or(Color::from_rgb_u8(0, 0, 0))
    }
}

/// Errors raised while exporting rendered images.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum RenderingError {
    /// The image has no pixels.
    #[error("image dimensions must be positive (received {width}x{height})")]
    EmptyImage {
        /// Width in pixels.
        width: u32,
        /// Height in pixels.
        height: u32,
    },
    /// The pixel buffer does not match the image dimensions.
    #[error("expected {expected} pixels but the buffer holds {actual}")]
    BufferSize {
        /// Pixels implied by the dimensions.
        expected: usize,
        /// Pixels supplied.
        actual: usize,
    },
}

/// Encodes an indexed image as a binary PPM file.
pub fn encode_ppm(
    pixels: &[u8],
    width: u32,
    height: u32,
    palette: &Palette,
) -> Result<Vec<u8>, RenderingError> {
    if width == 0 || height == 0 {
        return Err(RenderingError::EmptyImage { width, height });
    }
    let expected = width as usize * height as usize;
    if pixels.len() != expected {
        return Err(RenderingError::BufferSize {
            expected,
            actual: pixels.len(),
        });
    }
    let mut encoded = format!("P6\n{width} {height}\n255\n").into_bytes();
    encoded.reserve(expected * 3);
    for &index in pixels {
        encoded.extend_from_slice(&palette.color(index).to_rgb_u8());
    }
    Ok(encoded)
}

/// Renders tile elements as shaded boxes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SilhouetteRenderer {
    /// Whether land surfaces are drawn; previews hide them.
    pub show_land: bool,
}

impl SilhouetteRenderer {
    /// Renderer that hides land, as previews do.
    #[must_use]
    pub const fn new() -> Self {
        Self { show_land: false }
    }
}

impl PreviewRenderer for SilhouetteRenderer {
    fn render_view(
        &mut self,
        world: &dyn WorldQuery,
        viewport: &Viewport,
        rotation: Direction,
        pixels: &mut [u8],
    ) {
        pixels.fill(BACKGROUND);
        let mut canvas = Canvas::new(viewport, pixels);
        let size = i32::try_from(world.map_size()).unwrap_or(0);

        let mut boxes = Vec::new();
        for y in 0..size {
            for x in 0..size {
                let tile = TileCoordsXY::new(x, y);
                for element in world.tile_elements(tile) {
                    let class = ElementClass::of(element);
                    if !self.show_land && matches!(class, ElementClass::Land | ElementClass::Water) {
                        continue;
                    }
                    boxes.push(ElementBox::new(tile, element, class, rotation));
                }
            }
        }
        boxes.sort_by_key(|element| (element.depth, element.base_z));

        for element in &boxes {
            element.draw(&mut canvas, rotation);
        }
    }
}

/// One element ready to be painted.
struct ElementBox {
    corner: TileCoordsXY,
    base_z: i32,
    clearance_z: i32,
    class: ElementClass,
    depth: i32,
}

impl ElementBox {
    fn new(tile: TileCoordsXY, element: &TileElement, class: ElementClass, rotation: Direction) -> Self {
        let half = COORDS_XY_STEP / 2;
        let centre = tile.to_coords();
        let (_, depth) =
            translate_3d_to_2d(rotation, CoordsXYZ::new(centre.x + half, centre.y + half, 0));
        Self {
            corner: tile,
            base_z: element.base_z,
            clearance_z: element.clearance_z.max(element.base_z),
            class,
            depth,
        }
    }

    fn draw(&self, canvas: &mut Canvas<'_>, rotation: Direction) {
        let top = self.face(self.clearance_z, canvas, rotation);
        let bottom = self.face(self.base_z, canvas, rotation);
        let mut outline = top.to_vec();
        outline.extend_from_slice(&bottom);
        canvas.fill(&convex_hull(outline), self.class.side_index());
        canvas.fill(&top, self.class.top_index());
    }

    fn face(&self, z: i32, canvas: &Canvas<'_>, rotation: Direction) -> [Vec2; 4] {
        let origin = self.corner.to_coords();
        let step = COORDS_XY_STEP;
        [(0, 0), (step, 0), (step, step), (0, step)].map(|(dx, dy)| {
            let position = CoordsXYZ::new(origin.x + dx, origin.y + dy, z);
            canvas.project(translate_3d_to_2d(rotation, position))
        })
    }
}

/// Pixel target of one view.
struct Canvas<'a> {
    origin: Vec2,
    scale: f32,
    width: usize,
    height: usize,
    pixels: &'a mut [u8],
}

impl<'a> Canvas<'a> {
    fn new(viewport: &Viewport, pixels: &'a mut [u8]) -> Self {
        let width = viewport.width as usize;
        let height = if width == 0 {
            0
        } else {
            (viewport.height as usize).min(pixels.len() / width)
        };
        Self {
            origin: Vec2::new(viewport.view_x as f32, viewport.view_y as f32),
            scale: 1.0 / f32::from(1_u16 << viewport.zoom.min(15)),
            width,
            height,
            pixels,
        }
    }

    fn project(&self, (x, y): (i32, i32)) -> Vec2 {
        (Vec2::new(x as f32, y as f32) - self.origin) * self.scale
    }

    /// Fills a convex polygon given in either winding.
    fn fill(&mut self, polygon: &[Vec2], index: u8) {
        if polygon.len() < 3 || self.width == 0 || self.height == 0 {
            return;
        }
        let (min, max) = polygon
            .iter()
            .fold((Vec2::splat(f32::MAX), Vec2::splat(f32::MIN)), |(min, max), point| {
                (min.min(*point), max.max(*point))
            });
        let x_range = clamp_span(min.x, max.x, self.width);
        let y_range = clamp_span(min.y, max.y, self.height);
        for y in y_range {
            for x in x_range.clone() {
                let sample = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                if contains(polygon, sample) {
                    self.pixels[y * self.width + x] = index;
                }
            }
        }
    }
}

fn clamp_span(low: f32, high: f32, limit: usize) -> std::ops::Range<usize> {
    let start = low.floor().max(0.0) as usize;
    let end = (high.ceil().max(0.0) as usize).min(limit);
    start.min(end)..end
}

fn cross(origin: Vec2, a: Vec2, b: Vec2) -> f32 {
    (a - origin).perp_dot(b - origin)
}

fn contains(polygon: &[Vec2], point: Vec2) -> bool {
    let mut sign = 0.0_f32;
    for (index, &start) in polygon.iter().enumerate() {
        let end = polygon[(index + 1) % polygon.len()];
        let side = cross(start, end, point);
        if side == 0.0 {
            continue;
        }
        if sign == 0.0 {
            sign = side.signum();
        } else if side.signum() != sign {
            return false;
        }
    }
    true
}

/// Convex hull by the monotone chain method, counter-clockwise.
fn convex_hull(mut points: Vec<Vec2>) -> Vec<Vec2> {
    points.sort_by(|a, b| a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y)));
    points.dedup();
    if points.len() < 3 {
        return points;
    }
    let mut lower = half_hull(points.iter());
    let mut upper = half_hull(points.iter().rev());
    let _ = lower.pop();
    let _ = upper.pop();
    lower.extend(upper);
    lower
}

fn half_hull<'a>(points: impl Iterator<Item = &'a Vec2>) -> Vec<Vec2> {
    let mut hull: Vec<Vec2> = Vec::new();
    for &point in points {
        while hull.len() >= 2 && cross(hull[hull.len() - 2], hull[hull.len() - 1], point) <= 0.0 {
            let _ = hull.pop();
        }
        hull.push(point);
    }
    hull
}
