//! Area overlay rasterizer.

use image::{Pixel, Rgba, RgbaImage};
use rayon::prelude::*;

use super::{Area, AreaError};
use crate::coord::{PixelCoord, PixelTransform};
use crate::metadata::MapMetadata;
use crate::raster;

/// Horizontal border in local pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct HorizontalLine {
    y: i32,
    x0: i32,
    x1: i32,
}

impl HorizontalLine {
    fn covers(&self, x: i32) -> bool {
        self.x0 <= x && x <= self.x1
    }
}

/// Vertical border in local pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct VerticalLine {
    x: i32,
    y0: i32,
    y1: i32,
}

impl VerticalLine {
    fn covers(&self, y: i32) -> bool {
        self.y0 <= y && y <= self.y1
    }
}

/// How a local pixel is painted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PixelClass {
    Border,
    Interior,
    PassThrough,
}

/// An area projected onto the raster, in a frame local to its bounding box.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ProjectedArea {
    origin: PixelCoord,
    width: u32,
    height: u32,
    horizontal: Vec<HorizontalLine>,
    vertical: Vec<VerticalLine>,
}

impl ProjectedArea {
    fn classify(&self, x: i32, y: i32) -> PixelClass {
        let on_horizontal = self.horizontal.iter().any(|l| l.y == y && l.covers(x));
        let on_vertical = self.vertical.iter().any(|l| l.x == x && l.covers(y));
        if on_horizontal || on_vertical {
            return PixelClass::Border;
        }

        let above = self.horizontal.iter().any(|l| l.y < y && l.covers(x));
        let below = self.horizontal.iter().any(|l| l.y > y && l.covers(x));
        let left = self.vertical.iter().any(|l| l.x < x && l.covers(y));
        let right = self.vertical.iter().any(|l| l.x > x && l.covers(y));
        if above && below && left && right {
            PixelClass::Interior
        } else {
            PixelClass::PassThrough
        }
    }

    /// Paint the local canvas, reading untouched pixels from `under`.
    fn paint(&self, under: &RgbaImage, border: Rgba<u8>, fill: Rgba<u8>) -> RgbaImage {
        let mut canvas = RgbaImage::new(self.width, self.height);
        let (ox, oy) = (self.origin.x as u32, self.origin.y as u32);

        canvas.par_enumerate_pixels_mut().for_each(|(x, y, pixel)| {
            let below = *under.get_pixel(ox + x, oy + y);
            *pixel = match self.classify(x as i32, y as i32) {
                PixelClass::Border => blend(below, border),
                PixelClass::Interior => blend(below, fill),
                PixelClass::PassThrough => below,
            };
        });

        canvas
    }
}

fn blend(mut below: Rgba<u8>, color: Rgba<u8>) -> Rgba<u8> {
    match color[3] {
        0 => below,
        255 => color,
        _ => {
            below.blend(&color);
            below
        }
    }
}

/// Draws bordered, filled areas onto a copy of a base raster.
///
/// Each pixel in an area's bounding box is classified independently:
///
/// - **border**: on one of the area's segments
/// - **interior**: a horizontal segment lies strictly above and strictly
///   below it, and a vertical segment strictly left and strictly right
/// - **pass-through**: anything else, left as it was
///
/// The four-direction interior test is only correct for convex,
/// single-boundary, axis-aligned regions. Concave outlines (an L or a U
/// shape) get their notches filled, and holes are not supported.
///
/// Areas are drawn in list order; where they overlap, the later one wins.
#[derive(Debug, Clone)]
pub struct AreaRenderer {
    transform: PixelTransform,
    dimensions: (u32, u32),
}

impl AreaRenderer {
    /// Create a renderer for the map described by `metadata`.
    pub fn new(metadata: &MapMetadata) -> Self {
        Self {
            transform: PixelTransform::from_metadata(metadata),
            dimensions: (metadata.width(), metadata.height()),
        }
    }

    /// Render `areas` over `base` and return the composite.
    ///
    /// `base` is not modified.
    ///
    /// # Errors
    ///
    /// Fails without output if any area is empty or skewed, maps outside the
    /// raster, or if `base` doesn't have the metadata's dimensions.
    pub fn render(&self, base: &RgbaImage, areas: &[Area]) -> Result<RgbaImage, AreaError> {
        if base.dimensions() != self.dimensions {
            return Err(AreaError::RasterMismatch {
                actual: base.dimensions(),
                expected: self.dimensions,
            });
        }

        let mut accumulator = base.clone();
        for (index, area) in areas.iter().enumerate() {
            let projected = self.project(index, area)?;
            let canvas = projected.paint(&accumulator, area.border_color, area.fill_color);
            accumulator = raster::replace(
                accumulator,
                &canvas,
                projected.origin.x as i64,
                projected.origin.y as i64,
            );

            tracing::debug!(
                index,
                origin = %projected.origin,
                width = projected.width,
                height = projected.height,
                "Area rendered"
            );
        }

        Ok(accumulator)
    }

    /// Map an area to pixels and move it into its bounding box's frame.
    fn project(&self, index: usize, area: &Area) -> Result<ProjectedArea, AreaError> {
        area.validate(index)?;

        let to_pixel = |world| {
            self.transform
                .to_pixel(world)
                .map_err(|source| AreaError::OutOfBounds { index, source })
        };

        let points = area.points().map(to_pixel).collect::<Result<Vec<_>, _>>()?;

        // validate() guarantees at least one point
        let (mut min_x, mut min_y) = (i32::MAX, i32::MAX);
        let (mut max_x, mut max_y) = (i32::MIN, i32::MIN);
        for p in &points {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }
        let origin = PixelCoord::new(min_x, min_y);

        let mut horizontal = Vec::with_capacity(area.horizontal.len());
        for segment in &area.horizontal {
            let start = to_pixel(segment.start())? - origin;
            let end = to_pixel(segment.end())? - origin;
            horizontal.push(HorizontalLine {
                y: start.y,
                x0: start.x.min(end.x),
                x1: start.x.max(end.x),
            });
        }

        let mut vertical = Vec::with_capacity(area.vertical.len());
        for segment in &area.vertical {
            let start = to_pixel(segment.start())? - origin;
            let end = to_pixel(segment.end())? - origin;
            vertical.push(VerticalLine {
                x: start.x,
                y0: start.y.min(end.y),
                y1: start.y.max(end.y),
            });
        }

        Ok(ProjectedArea {
            origin,
            width: (max_x - min_x + 1) as u32,
            height: (max_y - min_y + 1) as u32,
            horizontal,
            vertical,
        })
    }
}
