//! Error types for map workspaces.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::area::AreaError;
use crate::assemble::AssembleError;
use crate::metadata::MetadataError;
use crate::raster::RasterError;

/// Errors that can occur while creating, loading or drawing on a map.
#[derive(Debug, Error)]
pub enum WorkspaceError {
    /// A workspace directory couldn't be created.
    #[error("failed to create directory {path}: {source}")]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The workspace directory couldn't be listed.
    #[error("failed to read directory {path}: {source}")]
    ReadDirectory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A staged output couldn't be moved into place.
    #[error("failed to move {from} to {to}: {source}")]
    Persist {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },

    /// No map has been created in this workspace yet.
    #[error("no map in {0}, run assemble first")]
    NoMap(PathBuf),

    #[error(transparent)]
    Assemble(#[from] AssembleError),

    #[error(transparent)]
    Metadata(#[from] MetadataError),

    #[error(transparent)]
    Raster(#[from] RasterError),

    #[error(transparent)]
    Area(#[from] AreaError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assemble_error_is_transparent() {
        let inner = AssembleError::InvalidParameter("zoom 9".to_string());
        let message = inner.to_string();
        let err = WorkspaceError::from(inner);
        assert_eq!(err.to_string(), message);
    }

    #[test]
    fn test_no_map_display() {
        let err = WorkspaceError::NoMap(PathBuf::from("/maps/world"));
        assert_eq!(err.to_string(), "no map in /maps/world, run assemble first");
    }
}
