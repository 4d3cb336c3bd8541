//! Error types for map assembly.

use std::path::PathBuf;

use thiserror::Error;

use crate::raster::RasterError;
use crate::tile::{DiscoveryError, GridError};

/// Errors that can occur while assembling a map from tiles.
///
/// Every variant is fatal: nothing is persisted when assembly fails.
/// Malformed tile filenames are not errors; discovery skips them.
#[derive(Debug, Error)]
pub enum AssembleError {
    /// Zoom or resolution outside the supported range.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// The tile directory is missing or unreadable.
    #[error(transparent)]
    TileDirectory(#[from] DiscoveryError),

    /// Tile (0, 0) was not found.
    #[error("The center of the map (0,0) could not be found in {0}")]
    MissingReferenceTile(PathBuf),

    /// The discovered tiles don't form a usable grid.
    #[error("invalid tile grid: {0}")]
    Grid(#[from] GridError),

    /// A tile file exists but could not be decoded.
    #[error(transparent)]
    TileDecode(#[from] RasterError),
}

impl AssembleError {
    /// Whether this error stems from the tile set or parameters rather than
    /// from reading pixel data.
    pub fn is_configuration_error(&self) -> bool {
        !matches!(self, AssembleError::TileDecode(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_reference_display() {
        let err = AssembleError::MissingReferenceTile(PathBuf::from("/tiles/zoom-2"));
        assert_eq!(
            err.to_string(),
            "The center of the map (0,0) could not be found in /tiles/zoom-2"
        );
        assert!(err.is_configuration_error());
    }

    #[test]
    fn test_grid_error_converts() {
        let err: AssembleError = GridError::Empty.into();
        assert!(matches!(err, AssembleError::Grid(GridError::Empty)));
        assert_eq!(err.to_string(), "invalid tile grid: no tiles found");
    }

    #[test]
    fn test_directory_error_is_transparent() {
        let err: AssembleError = DiscoveryError::DirectoryNotFound(PathBuf::from("/x")).into();
        assert_eq!(err.to_string(), "Images under /x not found");
        assert!(err.is_configuration_error());
    }
}
