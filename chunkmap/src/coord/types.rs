//! Coordinate types for world, pixel and tile space.

use std::fmt;
use std::ops::Sub;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Maximum supported zoom level.
pub const MAX_ZOOM: u8 = 4;

/// Minimum supported zoom level.
pub const MIN_ZOOM: u8 = 0;

/// Width of one world chunk in world units (blocks).
pub const CHUNK_WIDTH: u32 = 16;

/// World position of the reference anchor.
///
/// The reference tile (0, 0) covers this point; all pixel math is expressed
/// relative to it. The y component is the sea-level style vertical offset the
/// upstream renderer uses for its origin.
pub const REFERENCE_WORLD_ANCHOR: WorldCoord = WorldCoord { x: 0, y: -64 };

/// Errors that can occur during coordinate conversion.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoordError {
    /// The mapped pixel lies outside the raster.
    #[error("x={x}, y={y} is out of the map ({width}*{height})")]
    OutOfBounds {
        x: f64,
        y: f64,
        width: u32,
        height: u32,
    },

    /// Zoom level is outside the supported range.
    #[error("Invalid zoom level: {0} (must be {MIN_ZOOM}-{MAX_ZOOM})")]
    InvalidZoom(u8),
}

/// A position in the simulated world's horizontal plane.
///
/// `y` is the north/south (depth) axis, not elevation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WorldCoord {
    pub x: i32,
    pub y: i32,
}

impl WorldCoord {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for WorldCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// A raster position. Origin is the top-left corner, `y` grows downward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct PixelCoord {
    pub x: i32,
    pub y: i32,
}

impl PixelCoord {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl Sub for PixelCoord {
    type Output = PixelCoord;

    fn sub(self, rhs: PixelCoord) -> PixelCoord {
        PixelCoord::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl fmt::Display for PixelCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Chunk-space grid index of a tile, as encoded in its filename.
///
/// Ordered by `x` then `y` so discovered tiles can be kept in a sorted map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileCoord {
    pub x: i32,
    pub y: i32,
}

impl TileCoord {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Whether this is the reference tile at (0, 0).
    pub fn is_reference(&self) -> bool {
        self.x == 0 && self.y == 0
    }
}

impl fmt::Display for TileCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.x, self.y)
    }
}

/// Zero-based position of a tile inside the assembled grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlacementIndex {
    pub ix: u32,
    pub iy: u32,
}

impl PlacementIndex {
    pub const fn new(ix: u32, iy: u32) -> Self {
        Self { ix, iy }
    }
}

/// Number of tile-grid steps between neighbouring tiles at a zoom level (`2^zoom`).
#[inline]
pub fn image_chunks(zoom: u8) -> i32 {
    1 << zoom
}

/// Number of world chunks one tile spans per axis (`2^(zoom + 2)`).
#[inline]
pub fn chunks_per_axis(zoom: u8) -> u32 {
    1 << (zoom as u32 + 2)
}

/// Validate a zoom level against the supported range.
pub fn validate_zoom(zoom: u8) -> Result<u8, CoordError> {
    if (MIN_ZOOM..=MAX_ZOOM).contains(&zoom) {
        Ok(zoom)
    } else {
        Err(CoordError::InvalidZoom(zoom))
    }
}
