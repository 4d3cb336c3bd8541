//! Map metadata record.
//!
//! [`MapMetadata`] is produced once by assembly and read back by everything
//! that draws on the map. It is persisted as JSON with camelCase field names:
//!
//! ```json
//! {
//!   "fullResolution": [768, 768],
//!   "chunkImageResolution": 256,
//!   "gridDimensions": [3, 3],
//!   "zoom": 2,
//!   "centralChunkPixel": { "x": 256, "y": 256 }
//! }
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::coord::{PixelCoord, MAX_ZOOM};

/// Errors that can occur reading or writing metadata.
#[derive(Debug, Error)]
pub enum MetadataError {
    /// Failed to read the metadata file.
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Failed to write the metadata file.
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The record is not valid JSON for this schema.
    #[error("malformed metadata: {0}")]
    Malformed(#[from] serde_json::Error),

    /// The record parsed but violates an invariant.
    #[error("invalid metadata: {0}")]
    Invalid(String),
}

/// Immutable description of an assembled map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapMetadata {
    /// Raster size in pixels, `[width, height]`.
    pub full_resolution: [u32; 2],

    /// Pixel width and height of one tile image.
    pub chunk_image_resolution: u32,

    /// Number of tiles per axis, `[columns, rows]`.
    pub grid_dimensions: [u32; 2],

    /// Zoom level the tiles were rendered at (0-4).
    pub zoom: u8,

    /// Pixel offset where the reference tile (0, 0) was placed.
    pub central_chunk_pixel: PixelCoord,
}

impl MapMetadata {
    /// Create metadata for a grid, deriving the full resolution.
    pub fn new(
        chunk_image_resolution: u32,
        grid_dimensions: [u32; 2],
        zoom: u8,
        central_chunk_pixel: PixelCoord,
    ) -> Self {
        Self {
            full_resolution: [
                grid_dimensions[0] * chunk_image_resolution,
                grid_dimensions[1] * chunk_image_resolution,
            ],
            chunk_image_resolution,
            grid_dimensions,
            zoom,
            central_chunk_pixel,
        }
    }

    /// Raster width in pixels.
    pub fn width(&self) -> u32 {
        self.full_resolution[0]
    }

    /// Raster height in pixels.
    pub fn height(&self) -> u32 {
        self.full_resolution[1]
    }

    /// Check the record's invariants.
    ///
    /// - zoom is within 0-4
    /// - tile resolution is non-zero
    /// - full resolution equals grid dimensions × tile resolution
    /// - the reference tile pixel lies inside the raster
    pub fn validate(&self) -> Result<(), MetadataError> {
        if self.zoom > MAX_ZOOM {
            return Err(MetadataError::Invalid(format!(
                "zoom {} exceeds maximum {}",
                self.zoom, MAX_ZOOM
            )));
        }

        if self.chunk_image_resolution == 0 {
            return Err(MetadataError::Invalid(
                "chunk image resolution must be non-zero".to_string(),
            ));
        }

        for axis in 0..2 {
            let expected = self.grid_dimensions[axis]
                .checked_mul(self.chunk_image_resolution)
                .ok_or_else(|| MetadataError::Invalid("resolution overflows".to_string()))?;
            if self.full_resolution[axis] != expected {
                return Err(MetadataError::Invalid(format!(
                    "full resolution {:?} does not match grid {:?} × {}",
                    self.full_resolution, self.grid_dimensions, self.chunk_image_resolution
                )));
            }
        }

        let central = self.central_chunk_pixel;
        if central.x < 0
            || central.y < 0
            || central.x as u32 >= self.width()
            || central.y as u32 >= self.height()
        {
            return Err(MetadataError::Invalid(format!(
                "central chunk pixel {} lies outside {}×{}",
                central,
                self.width(),
                self.height()
            )));
        }

        Ok(())
    }

    /// Encode as pretty JSON.
    pub fn to_json(&self) -> Result<String, MetadataError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Decode from JSON and validate.
    pub fn from_json(text: &str) -> Result<Self, MetadataError> {
        let metadata: MapMetadata = serde_json::from_str(text)?;
        metadata.validate()?;
        Ok(metadata)
    }

    /// Load and validate a metadata file.
    pub fn load(path: &Path) -> Result<Self, MetadataError> {
        let text = fs::read_to_string(path).map_err(|source| MetadataError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    /// Write this record to a file, replacing any previous content.
    pub fn save(&self, path: &Path) -> Result<(), MetadataError> {
        let text = self.to_json()?;
        fs::write(path, text).map_err(|source| MetadataError::Write {
            path: path.to_path_buf(),
            source,
        })
    }
}
