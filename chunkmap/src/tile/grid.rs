//! Grid bounds inference and tile placement.
//!
//! Tiles at zoom `z` sit on a lattice with a step of `2^z` in tile space. The
//! grid spans the bounding box of the discovered tiles, inclusive of both
//! ends, so tiles `-1..=1` at zoom 0 form three columns.
//!
//! ```text
//! tile y ▲                     raster row
//!        │  (-1, 1) (0, 1) (1, 1)   0
//!        │  (-1, 0) (0, 0) (1, 0)   1
//!        │  (-1,-1) (0,-1) (1,-1)   2
//!        └──────────────────► x
//! ```
//!
//! Grid row `iy = 0` holds the lowest tile y and is drawn at the bottom of
//! the raster.

use std::path::PathBuf;

use thiserror::Error;

use super::discovery::DiscoveredTiles;
use crate::coord::{image_chunks, PixelCoord, PlacementIndex, TileCoord};

/// Errors inferring a grid from discovered tiles.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    /// No tiles to build a grid from.
    #[error("no tiles found")]
    Empty,

    /// Tile extent along an axis is not a whole number of lattice steps.
    #[error("{axis} extent {extent} is not a multiple of {step} tiles")]
    Unaligned {
        axis: char,
        extent: i64,
        step: i32,
    },

    /// Tiles span more cells along an axis than a grid can index.
    #[error("{axis} axis spans {cells} tiles, too many for one map")]
    TooLarge { axis: char, cells: i64 },

    /// The reference tile does not sit on the lattice the grid is built from.
    #[error("reference tile (0, 0) is not aligned with grid origin {origin}")]
    ReferenceOffGrid { origin: TileCoord },
}

/// A grid cell and the tile file that fills it, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TilePlacement {
    /// Position in the grid.
    pub index: PlacementIndex,

    /// Tile coordinate expected at this position.
    pub coord: TileCoord,

    /// Tile file, or `None` if the cell was never rendered upstream.
    pub path: Option<PathBuf>,
}

/// Layout of an assembled tile grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridLayout {
    /// Lowest tile coordinate on both axes.
    pub origin: TileCoord,

    /// Lattice step between neighbouring tiles (`2^zoom`).
    pub step: i32,

    /// Tiles per axis, `[columns, rows]`.
    pub dimensions: [u32; 2],
}

impl GridLayout {
    /// Infer the grid spanned by the discovered tiles at a zoom level.
    ///
    /// # Errors
    ///
    /// - [`GridError::Empty`] when nothing was discovered
    /// - [`GridError::Unaligned`] when the extent isn't a multiple of the step
    /// - [`GridError::ReferenceOffGrid`] when (0, 0) isn't on the lattice
    pub fn infer(tiles: &DiscoveredTiles, zoom: u8) -> Result<Self, GridError> {
        let step = image_chunks(zoom);

        let mut coords = tiles.tiles.keys();
        let first = coords.next().ok_or(GridError::Empty)?;
        let (mut min_x, mut max_x, mut min_y, mut max_y) = (first.x, first.x, first.y, first.y);
        for coord in coords {
            min_x = min_x.min(coord.x);
            max_x = max_x.max(coord.x);
            min_y = min_y.min(coord.y);
            max_y = max_y.max(coord.y);
        }

        let columns = Self::axis_count('x', min_x, max_x, step)?;
        let rows = Self::axis_count('y', min_y, max_y, step)?;
        let origin = TileCoord::new(min_x, min_y);

        let layout = Self {
            origin,
            step,
            dimensions: [columns, rows],
        };

        if !layout.on_lattice(TileCoord::new(0, 0)) {
            return Err(GridError::ReferenceOffGrid { origin });
        }

        for coord in tiles.tiles.keys().filter(|c| !layout.on_lattice(**c)) {
            tracing::warn!(tile = %coord, step, "Tile is off the grid lattice and will not be placed");
        }

        Ok(layout)
    }

    fn axis_count(axis: char, min: i32, max: i32, step: i32) -> Result<u32, GridError> {
        let extent = max as i64 - min as i64;
        if extent % step as i64 != 0 {
            return Err(GridError::Unaligned { axis, extent, step });
        }
        let cells = extent / step as i64 + 1;
        u32::try_from(cells).map_err(|_| GridError::TooLarge { axis, cells })
    }

    /// Whether a tile coordinate falls on one of this grid's cells.
    fn on_lattice(&self, coord: TileCoord) -> bool {
        let dx = coord.x as i64 - self.origin.x as i64;
        let dy = coord.y as i64 - self.origin.y as i64;
        let step = self.step as i64;
        dx >= 0
            && dy >= 0
            && dx % step == 0
            && dy % step == 0
            && dx / step < self.dimensions[0] as i64
            && dy / step < self.dimensions[1] as i64
    }

    /// Tile coordinate expected at a grid position.
    pub fn coord_at(&self, index: PlacementIndex) -> TileCoord {
        let step = self.step as i64;
        TileCoord::new(
            (self.origin.x as i64 + step * index.ix as i64) as i32,
            (self.origin.y as i64 + step * index.iy as i64) as i32,
        )
    }

    /// Raster size in pixels for tiles of `resolution` pixels.
    pub fn full_resolution(&self, resolution: u32) -> [u32; 2] {
        [
            self.dimensions[0] * resolution,
            self.dimensions[1] * resolution,
        ]
    }

    /// Top-left pixel of the tile at `index`.
    ///
    /// Rows are flipped: tile y grows upward, raster y grows downward.
    pub fn pixel_offset(&self, index: PlacementIndex, resolution: u32) -> PixelCoord {
        let full_height = self.dimensions[1] * resolution;
        PixelCoord::new(
            (index.ix * resolution) as i32,
            (full_height - (index.iy + 1) * resolution) as i32,
        )
    }

    /// Every grid cell with its tile file, columns outer, rows inner.
    pub fn placements(&self, tiles: &DiscoveredTiles) -> Vec<TilePlacement> {
        let mut placements =
            Vec::with_capacity(self.dimensions[0] as usize * self.dimensions[1] as usize);

        for ix in 0..self.dimensions[0] {
            for iy in 0..self.dimensions[1] {
                let index = PlacementIndex::new(ix, iy);
                let coord = self.coord_at(index);
                placements.push(TilePlacement {
                    index,
                    coord,
                    path: tiles.get(&coord).map(|p| p.to_path_buf()),
                });
            }
        }

        placements
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn discovered(coords: &[(i32, i32)]) -> DiscoveredTiles {
        let mut tiles = DiscoveredTiles::default();
        for &(x, y) in coords {
            tiles
                .tiles
                .insert(TileCoord::new(x, y), PathBuf::from(format!("{}_{}.png", x, y)));
        }
        tiles
    }

    fn three_by_three() -> DiscoveredTiles {
        let mut coords = Vec::new();
        for x in -1..=1 {
            for y in -1..=1 {
                coords.push((x, y));
            }
        }
        discovered(&coords)
    }

    #[test]
    fn test_infer_three_by_three() {
        let layout = GridLayout::infer(&three_by_three(), 0).unwrap();
        assert_eq!(layout.origin, TileCoord::new(-1, -1));
        assert_eq!(layout.step, 1);
        assert_eq!(layout.dimensions, [3, 3]);
        assert_eq!(layout.full_resolution(16), [48, 48]);
    }

    #[test]
    fn test_infer_single_tile() {
        let layout = GridLayout::infer(&discovered(&[(0, 0)]), 3).unwrap();
        assert_eq!(layout.dimensions, [1, 1]);
    }

    #[test]
    fn test_infer_uses_zoom_step() {
        // zoom 2: neighbours are 4 apart
        let tiles = discovered(&[(-4, 0), (0, 0), (4, 8)]);
        let layout = GridLayout::infer(&tiles, 2).unwrap();
        assert_eq!(layout.step, 4);
        assert_eq!(layout.dimensions, [3, 3]);
        assert_eq!(layout.coord_at(PlacementIndex::new(2, 1)), TileCoord::new(4, 4));
    }

    #[test]
    fn test_infer_empty() {
        let result = GridLayout::infer(&DiscoveredTiles::default(), 0);
        assert_eq!(result, Err(GridError::Empty));
    }

    #[test]
    fn test_infer_unaligned_extent() {
        let tiles = discovered(&[(0, 0), (3, 0)]);
        assert_eq!(
            GridLayout::infer(&tiles, 1),
            Err(GridError::Unaligned {
                axis: 'x',
                extent: 3,
                step: 2
            })
        );
    }

    #[test]
    fn test_infer_full_i32_span_is_too_large() {
        let tiles = discovered(&[(i32::MIN, 0), (0, 0), (i32::MAX, 0)]);
        assert_eq!(
            GridLayout::infer(&tiles, 0),
            Err(GridError::TooLarge {
                axis: 'x',
                cells: 1 << 32
            })
        );
    }

    #[test]
    fn test_infer_widest_indexable_span() {
        // 2^32 - 1 cells still fit a u32 count
        let tiles = discovered(&[(i32::MIN + 1, 0), (0, 0), (i32::MAX, 0)]);
        let layout = GridLayout::infer(&tiles, 0).unwrap();
        assert_eq!(layout.dimensions, [u32::MAX, 1]);
        assert_eq!(
            layout.coord_at(PlacementIndex::new(u32::MAX - 1, 0)),
            TileCoord::new(i32::MAX, 0)
        );
    }

    #[test]
    fn test_infer_reference_off_lattice() {
        // Extent is aligned but (0, 0) falls between cells
        let tiles = discovered(&[(-1, 0), (0, 0), (1, 0)]);
        let result = GridLayout::infer(&tiles, 1);
        assert_eq!(
            result,
            Err(GridError::ReferenceOffGrid {
                origin: TileCoord::new(-1, 0)
            })
        );
    }

    #[test]
    fn test_pixel_offset_flips_rows() {
        let layout = GridLayout::infer(&three_by_three(), 0).unwrap();

        // Bottom row of tiles is drawn last in raster space
        assert_eq!(
            layout.pixel_offset(PlacementIndex::new(0, 0), 16),
            PixelCoord::new(0, 32)
        );
        assert_eq!(
            layout.pixel_offset(PlacementIndex::new(1, 1), 16),
            PixelCoord::new(16, 16)
        );
        assert_eq!(
            layout.pixel_offset(PlacementIndex::new(2, 2), 16),
            PixelCoord::new(32, 0)
        );
    }

    #[test]
    fn test_placements_cover_grid_in_order() {
        let tiles = discovered(&[(-1, -1), (0, 0), (1, 1)]);
        let layout = GridLayout::infer(&tiles, 0).unwrap();
        let placements = layout.placements(&tiles);

        assert_eq!(placements.len(), 9);
        assert_eq!(placements[0].index, PlacementIndex::new(0, 0));
        assert_eq!(placements[1].index, PlacementIndex::new(0, 1));
        assert_eq!(placements[3].index, PlacementIndex::new(1, 0));

        let present: Vec<_> = placements
            .iter()
            .filter(|p| p.path.is_some())
            .map(|p| p.coord)
            .collect();
        assert_eq!(
            present,
            vec![
                TileCoord::new(-1, -1),
                TileCoord::new(0, 0),
                TileCoord::new(1, 1)
            ]
        );
    }
}
