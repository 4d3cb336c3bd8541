//! Raster primitives over [`image::RgbaImage`].
//!
//! Compositing functions take the base raster by value and hand it back,
//! so a composite is a value transformation `(raster, overlay, offset) ->
//! raster`. Callers never share a raster mutably, which keeps parallel
//! tile decoding race-free.

use std::fs::File;
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};

use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{imageops, ImageError, Rgba, RgbaImage};
use thiserror::Error;

/// Opaque black.
pub const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// Opaque red, used for tile borders in debug grids.
pub const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);

/// Opaque blue, used for the reference tile border in debug grids.
pub const BLUE: Rgba<u8> = Rgba([0, 0, 255, 255]);

/// Errors from raster I/O.
#[derive(Debug, Error)]
pub enum RasterError {
    /// The file could not be decoded as an image.
    #[error("failed to decode {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: ImageError,
    },

    /// The raster could not be encoded.
    #[error("failed to encode {path}: {source}")]
    Encode {
        path: PathBuf,
        #[source]
        source: ImageError,
    },

    /// The output file could not be created.
    #[error("failed to create {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Create a raster filled with a single color.
pub fn create(width: u32, height: u32, color: Rgba<u8>) -> RgbaImage {
    RgbaImage::from_pixel(width, height, color)
}

/// Fill every pixel of a raster with a single color.
pub fn fill(mut raster: RgbaImage, color: Rgba<u8>) -> RgbaImage {
    for pixel in raster.pixels_mut() {
        *pixel = color;
    }
    raster
}

/// Decode an image file into an RGBA raster.
pub fn load(path: &Path) -> Result<RgbaImage, RasterError> {
    let image = image::open(path).map_err(|source| RasterError::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(image.to_rgba8())
}

/// Build a new raster by mapping every pixel of `raster`.
///
/// The closure receives the local `x`, `y` and the source pixel.
pub fn map_pixels<F>(raster: &RgbaImage, f: F) -> RgbaImage
where
    F: Fn(u32, u32, &Rgba<u8>) -> Rgba<u8>,
{
    RgbaImage::from_fn(raster.width(), raster.height(), |x, y| {
        f(x, y, raster.get_pixel(x, y))
    })
}

/// Alpha-composite `top` over `base` with its top-left corner at `(x, y)`.
///
/// Parts of `top` falling outside `base` are clipped.
pub fn overlay(mut base: RgbaImage, top: &RgbaImage, x: i64, y: i64) -> RgbaImage {
    imageops::overlay(&mut base, top, x, y);
    base
}

/// Copy `top` onto `base` at `(x, y)`, replacing pixels without blending.
pub fn replace(mut base: RgbaImage, top: &RgbaImage, x: i64, y: i64) -> RgbaImage {
    imageops::replace(&mut base, top, x, y);
    base
}

/// Write a raster as PNG.
///
/// Uses fast deflate settings: the stored maps are large and written once.
pub fn write_lossless(raster: &RgbaImage, path: &Path) -> Result<(), RasterError> {
    let file = File::create(path).map_err(|source| RasterError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let encoder = PngEncoder::new_with_quality(
        BufWriter::new(file),
        CompressionType::Fast,
        FilterType::Adaptive,
    );
    raster
        .write_with_encoder(encoder)
        .map_err(|source| RasterError::Encode {
            path: path.to_path_buf(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_create_fills_uniformly() {
        let raster = create(4, 3, BLACK);
        assert_eq!(raster.dimensions(), (4, 3));
        assert!(raster.pixels().all(|p| *p == BLACK));
    }

    #[test]
    fn test_fill_replaces_every_pixel() {
        let raster = fill(create(2, 2, BLACK), RED);
        assert!(raster.pixels().all(|p| *p == RED));
    }

    #[test]
    fn test_map_pixels_receives_coordinates() {
        let raster = create(3, 3, BLACK);
        let mapped = map_pixels(&raster, |x, y, pixel| {
            if x == 0 || y == 0 {
                BLUE
            } else {
                *pixel
            }
        });

        assert_eq!(*mapped.get_pixel(0, 2), BLUE);
        assert_eq!(*mapped.get_pixel(2, 0), BLUE);
        assert_eq!(*mapped.get_pixel(1, 1), BLACK);
    }

    #[test]
    fn test_overlay_places_at_offset() {
        let base = create(4, 4, BLACK);
        let top = create(2, 2, RED);

        let result = overlay(base, &top, 1, 2);
        assert_eq!(*result.get_pixel(1, 2), RED);
        assert_eq!(*result.get_pixel(2, 3), RED);
        assert_eq!(*result.get_pixel(0, 2), BLACK);
        assert_eq!(*result.get_pixel(1, 1), BLACK);
    }

    #[test]
    fn test_overlay_clips_outside_base() {
        let base = create(4, 4, BLACK);
        let top = create(2, 2, RED);

        let result = overlay(base, &top, 3, 4);
        assert_eq!(result.dimensions(), (4, 4));
        assert!(result.pixels().all(|p| *p == BLACK));
    }

    #[test]
    fn test_overlay_transparent_keeps_base() {
        let base = create(2, 2, BLUE);
        let top = create(2, 2, Rgba([0, 0, 0, 0]));

        let result = overlay(base, &top, 0, 0);
        assert!(result.pixels().all(|p| *p == BLUE));
    }

    #[test]
    fn test_replace_ignores_alpha() {
        let base = create(2, 2, BLUE);
        let clear = Rgba([0, 0, 0, 0]);
        let top = create(1, 1, clear);

        let result = replace(base, &top, 1, 1);
        assert_eq!(*result.get_pixel(1, 1), clear);
        assert_eq!(*result.get_pixel(0, 0), BLUE);
    }

    #[test]
    fn test_write_and_load_preserves_pixels() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("raster.png");

        let raster = map_pixels(&create(5, 3, BLACK), |x, y, _| {
            Rgba([x as u8 * 40, y as u8 * 80, 7, 255])
        });
        write_lossless(&raster, &path).unwrap();

        let loaded = load(&path).unwrap();
        assert_eq!(loaded, raster);
    }

    #[test]
    fn test_load_rejects_non_image() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("fake.png");
        std::fs::write(&path, b"not a png").unwrap();

        assert!(matches!(load(&path), Err(RasterError::Decode { .. })));
    }
}
