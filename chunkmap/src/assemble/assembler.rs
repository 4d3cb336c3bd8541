//! Tile grid assembler.

use std::path::Path;

use image::{Rgba, RgbaImage};
use rayon::prelude::*;

use super::AssembleError;
use crate::coord::{validate_zoom, PixelCoord, TileCoord};
use crate::metadata::MapMetadata;
use crate::raster::{self, BLACK, BLUE, RED};
use crate::tile::{tile_filename, GridLayout, TileDiscovery, TilePlacement};

/// Options controlling how tiles are composited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssembleOptions {
    /// Draw each tile's top and left edge in red (blue for the reference
    /// tile). Off by default so the stored base map stays clean.
    pub debug_grid: bool,

    /// Color of grid cells with no tile.
    pub background: Rgba<u8>,
}

impl Default for AssembleOptions {
    fn default() -> Self {
        Self {
            debug_grid: false,
            background: BLACK,
        }
    }
}

impl AssembleOptions {
    /// Enable or disable the debug grid.
    pub fn with_debug_grid(mut self, debug_grid: bool) -> Self {
        self.debug_grid = debug_grid;
        self
    }

    /// Set the background color.
    pub fn with_background(mut self, background: Rgba<u8>) -> Self {
        self.background = background;
        self
    }
}

/// Counters from one assembly run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AssemblyStats {
    /// Tiles composited onto the raster.
    pub placed: usize,

    /// Grid cells left at the background color.
    pub missing: usize,

    /// Directory entries skipped by discovery.
    pub skipped: usize,
}

/// Output of a successful assembly.
#[derive(Debug, Clone)]
pub struct AssembledMap {
    /// The stitched base raster.
    pub raster: RgbaImage,

    /// Metadata describing the raster.
    pub metadata: MapMetadata,

    /// Counters for reporting.
    pub stats: AssemblyStats,
}

/// Stitches a directory of tile renders into one raster.
///
/// Tiles are decoded in parallel one grid column at a time, then
/// composited strictly in placement order so layering is deterministic.
///
/// # Example
///
/// ```ignore
/// use chunkmap::assemble::{AssembleOptions, TileGridAssembler};
///
/// let assembler = TileGridAssembler::new(AssembleOptions::default());
/// let map = assembler.assemble(Path::new("tiles/zoom-2"), 2, 256)?;
/// println!("{}×{}", map.metadata.width(), map.metadata.height());
/// ```
#[derive(Debug, Clone, Default)]
pub struct TileGridAssembler {
    options: AssembleOptions,
}

impl TileGridAssembler {
    /// Create an assembler with the given options.
    pub fn new(options: AssembleOptions) -> Self {
        Self { options }
    }

    /// Assemble the tiles in `tile_dir`.
    ///
    /// # Arguments
    ///
    /// * `tile_dir` - Directory holding `<x>_<y>.png` tiles for one zoom level
    /// * `zoom` - Zoom level the tiles were rendered at (0-4)
    /// * `resolution` - Pixel width and height of one tile image
    ///
    /// # Errors
    ///
    /// Fails when parameters are out of range, the directory can't be read,
    /// tile (0, 0) is missing, the tiles don't form an aligned grid, or a
    /// tile can't be decoded.
    pub fn assemble(
        &self,
        tile_dir: &Path,
        zoom: u8,
        resolution: u32,
    ) -> Result<AssembledMap, AssembleError> {
        validate_zoom(zoom).map_err(|e| AssembleError::InvalidParameter(e.to_string()))?;
        if resolution == 0 {
            return Err(AssembleError::InvalidParameter(
                "chunk image resolution must be non-zero".to_string(),
            ));
        }

        let discovered = TileDiscovery::new(tile_dir).find_tiles()?;
        if !discovered.has_reference() {
            return Err(AssembleError::MissingReferenceTile(tile_dir.to_path_buf()));
        }

        let layout = GridLayout::infer(&discovered, zoom)?;
        let [columns, rows] = layout.dimensions;
        let (width, height) = match (columns.checked_mul(resolution), rows.checked_mul(resolution))
        {
            (Some(w), Some(h)) => (w, h),
            _ => {
                return Err(AssembleError::InvalidParameter(format!(
                    "{}×{} tiles of {} px exceed the maximum raster size",
                    columns, rows, resolution
                )))
            }
        };

        tracing::info!(
            dir = %tile_dir.display(),
            zoom,
            columns,
            rows,
            width,
            height,
            tiles = discovered.len(),
            "Assembling map"
        );

        let placements = layout.placements(&discovered);
        let mut base = raster::create(width, height, self.options.background);
        let mut central_chunk_pixel = None;
        let mut stats = AssemblyStats {
            skipped: discovered.skipped.len(),
            ..Default::default()
        };

        // Placements are column-major, so each chunk is one grid column
        for column in placements.chunks(rows as usize) {
            for gap in column.iter().filter(|p| p.path.is_none()) {
                tracing::debug!(file = %tile_filename(gap.coord), "No tile for grid cell");
            }

            let decoded = self.decode_column(column, resolution)?;

            for (placement, tile) in decoded {
                let offset = layout.pixel_offset(placement.index, resolution);
                base = raster::overlay(base, &tile, offset.x as i64, offset.y as i64);
                stats.placed += 1;

                if placement.coord.is_reference() {
                    central_chunk_pixel = Some(offset);
                }
            }
        }
        stats.missing = placements.len() - stats.placed;

        // Discovery found (0, 0) and the grid put it on the lattice
        let central_chunk_pixel: PixelCoord = central_chunk_pixel
            .ok_or_else(|| AssembleError::MissingReferenceTile(tile_dir.to_path_buf()))?;

        let metadata = MapMetadata::new(resolution, layout.dimensions, zoom, central_chunk_pixel);

        tracing::info!(
            placed = stats.placed,
            missing = stats.missing,
            skipped = stats.skipped,
            central = %central_chunk_pixel,
            "Map assembled"
        );

        Ok(AssembledMap {
            raster: base,
            metadata,
            stats,
        })
    }

    /// Decode the present tiles of one grid column in parallel.
    ///
    /// Output keeps the input order.
    fn decode_column<'a>(
        &self,
        column: &'a [TilePlacement],
        resolution: u32,
    ) -> Result<Vec<(&'a TilePlacement, RgbaImage)>, AssembleError> {
        column
            .par_iter()
            .filter_map(|placement| placement.path.as_ref().map(|path| (placement, path)))
            .map(|(placement, path)| {
                let tile = raster::load(path)?;
                if tile.dimensions() != (resolution, resolution) {
                    tracing::warn!(
                        tile = %placement.coord,
                        width = tile.width(),
                        height = tile.height(),
                        resolution,
                        "Tile size differs from chunk resolution"
                    );
                }
                Ok::<_, AssembleError>((placement, self.prepare_tile(placement.coord, tile)))
            })
            .collect()
    }

    /// Apply the debug grid to a decoded tile if enabled.
    fn prepare_tile(&self, coord: TileCoord, tile: RgbaImage) -> RgbaImage {
        if !self.options.debug_grid {
            return tile;
        }

        let edge = if coord.is_reference() { BLUE } else { RED };
        raster::map_pixels(&tile, |x, y, pixel| {
            if x == 0 || y == 0 {
                edge
            } else {
                *pixel
            }
        })
    }
}
