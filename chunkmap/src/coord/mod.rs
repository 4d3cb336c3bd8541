//! Coordinate conversion module
//!
//! Converts world coordinates to pixel coordinates on an assembled map and
//! back. The transform is a single affine scale and offset:
//!
//! - the scale comes from the zoom level and the tile image resolution,
//! - the offset comes from where assembly physically placed the reference
//!   tile, recorded as [`MapMetadata::central_chunk_pixel`].
//!
//! The offset cannot be derived from the grid alone, which is why the mapper
//! reads it from metadata produced by assembly.

mod types;

pub use types::{
    chunks_per_axis, image_chunks, validate_zoom, CoordError, PixelCoord, PlacementIndex,
    TileCoord, WorldCoord, CHUNK_WIDTH, MAX_ZOOM, MIN_ZOOM, REFERENCE_WORLD_ANCHOR,
};

use crate::metadata::MapMetadata;

/// Precomputed world ↔ pixel transform for one map.
///
/// Building it once per render call avoids recomputing the rates for every
/// segment endpoint.
///
/// # Example
///
/// ```
/// use chunkmap::coord::{PixelCoord, PixelTransform, REFERENCE_WORLD_ANCHOR};
/// use chunkmap::metadata::MapMetadata;
///
/// let metadata = MapMetadata::new(64, [3, 3], 0, PixelCoord::new(64, 64));
/// let transform = PixelTransform::from_metadata(&metadata);
///
/// let pixel = transform.to_pixel(REFERENCE_WORLD_ANCHOR).unwrap();
/// assert_eq!(pixel, PixelCoord::new(64, 64));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PixelTransform {
    mc_to_pixel_rate: f64,
    pixel_to_mc_rate: f64,
    /// World offset from the reference anchor to the raster's top-left corner.
    central_to_corner: (i64, i64),
    width: u32,
    height: u32,
}

impl PixelTransform {
    /// Build the transform for a map.
    pub fn from_metadata(metadata: &MapMetadata) -> Self {
        let chunks = chunks_per_axis(metadata.zoom) as f64;
        let mc_to_pixel_rate =
            metadata.chunk_image_resolution as f64 / (chunks * CHUNK_WIDTH as f64);
        let pixel_to_mc_rate = 1.0 / mc_to_pixel_rate;

        let anchor = REFERENCE_WORLD_ANCHOR;
        let central = metadata.central_chunk_pixel;

        // Assembly places the central pixel on a whole tile, so the exact
        // offset is an integer; rounding absorbs the error of a rate like 64/49.
        let central_to_corner = (
            (-(central.x as f64 * pixel_to_mc_rate) - anchor.x as f64).round() as i64,
            (-(central.y as f64 * pixel_to_mc_rate) - anchor.y as f64).round() as i64,
        );

        Self {
            mc_to_pixel_rate,
            pixel_to_mc_rate,
            central_to_corner,
            width: metadata.full_resolution[0],
            height: metadata.full_resolution[1],
        }
    }

    /// Pixels per world unit.
    pub fn mc_to_pixel_rate(&self) -> f64 {
        self.mc_to_pixel_rate
    }

    /// World units per pixel.
    pub fn pixel_to_mc_rate(&self) -> f64 {
        self.pixel_to_mc_rate
    }

    /// Convert a world coordinate to a pixel on the map.
    ///
    /// # Errors
    ///
    /// Returns [`CoordError::OutOfBounds`] when the unrounded pixel lies
    /// outside `[0, full_resolution - 1]` on either axis.
    pub fn to_pixel(&self, world: WorldCoord) -> Result<PixelCoord, CoordError> {
        let anchor = REFERENCE_WORLD_ANCHOR;

        let central_to_point = (
            world.x as i64 - anchor.x as i64,
            world.y as i64 - anchor.y as i64,
        );
        let corner_to_point = (
            central_to_point.0 - self.central_to_corner.0 - anchor.x as i64,
            central_to_point.1 - self.central_to_corner.1 - anchor.y as i64,
        );

        let x = corner_to_point.0 as f64 * self.mc_to_pixel_rate;
        let y = corner_to_point.1 as f64 * self.mc_to_pixel_rate;

        let max_x = self.width as f64 - 1.0;
        let max_y = self.height as f64 - 1.0;
        if !((0.0..=max_x).contains(&x) && (0.0..=max_y).contains(&y)) {
            return Err(CoordError::OutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }

        Ok(PixelCoord::new(x.round() as i32, y.round() as i32))
    }

    /// Convert a pixel back to the nearest world coordinate.
    ///
    /// No bounds check is applied; pixels outside the raster map to world
    /// coordinates outside the rendered area.
    pub fn to_world(&self, pixel: PixelCoord) -> WorldCoord {
        let anchor = REFERENCE_WORLD_ANCHOR;

        let corner_to_point_x = (pixel.x as f64 * self.pixel_to_mc_rate).round() as i64;
        let corner_to_point_y = (pixel.y as f64 * self.pixel_to_mc_rate).round() as i64;

        WorldCoord::new(
            (corner_to_point_x + self.central_to_corner.0 + 2 * anchor.x as i64) as i32,
            (corner_to_point_y + self.central_to_corner.1 + 2 * anchor.y as i64) as i32,
        )
    }
}

/// Converts a world coordinate to a pixel on the map described by `metadata`.
///
/// # Errors
///
/// Returns [`CoordError::OutOfBounds`] when the result falls outside the raster.
#[inline]
pub fn to_pixel(world: WorldCoord, metadata: &MapMetadata) -> Result<PixelCoord, CoordError> {
    PixelTransform::from_metadata(metadata).to_pixel(world)
}

/// Converts a pixel on the map described by `metadata` to the nearest world coordinate.
#[inline]
pub fn to_world(pixel: PixelCoord, metadata: &MapMetadata) -> WorldCoord {
    PixelTransform::from_metadata(metadata).to_world(pixel)
}
