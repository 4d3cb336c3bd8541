//! Tile discovery.
//!
//! Scans a tile directory and collects every file whose name parses as a
//! tile coordinate. Files that don't parse are skipped and logged; they never
//! fail a scan.

use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::filename::{parse_tile_filename, FilenameError};
use crate::coord::TileCoord;

/// Errors that can occur while scanning a tile directory.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// The tile directory doesn't exist or isn't a directory.
    #[error("Images under {0} not found")]
    DirectoryNotFound(PathBuf),

    /// The tile directory couldn't be listed.
    #[error("failed to list {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// A directory entry that was not accepted as a tile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedFile {
    /// File name as found on disk.
    pub name: String,

    /// Why it was rejected.
    pub reason: SkipReason,
}

/// Reason a directory entry was skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The name doesn't follow `<x>_<y>.png`.
    IllegalName(FilenameError),

    /// Another file already provided this coordinate.
    Duplicate(TileCoord),
}

/// Result of scanning a tile directory.
#[derive(Debug, Clone, Default)]
pub struct DiscoveredTiles {
    /// Tile files keyed by coordinate.
    pub tiles: BTreeMap<TileCoord, PathBuf>,

    /// Entries that were skipped, in scan order.
    pub skipped: Vec<SkippedFile>,
}

impl DiscoveredTiles {
    /// Number of usable tiles.
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    /// Whether no usable tile was found.
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Whether the reference tile (0, 0) is present.
    pub fn has_reference(&self) -> bool {
        self.tiles.contains_key(&TileCoord::new(0, 0))
    }

    /// Path of the tile at `coord`, if present.
    pub fn get(&self, coord: &TileCoord) -> Option<&Path> {
        self.tiles.get(coord).map(PathBuf::as_path)
    }
}

/// Discovers tile images in a directory.
#[derive(Debug, Clone)]
pub struct TileDiscovery {
    tile_dir: PathBuf,
}

impl TileDiscovery {
    /// Create a discovery for the given directory.
    pub fn new(tile_dir: impl Into<PathBuf>) -> Self {
        Self {
            tile_dir: tile_dir.into(),
        }
    }

    /// Check if the tile directory exists.
    pub fn exists(&self) -> bool {
        self.tile_dir.is_dir()
    }

    /// Scan the directory for tiles.
    ///
    /// Entries are visited in name order so that duplicate coordinates
    /// (e.g. `1_0.png` and `01_0.png`) resolve the same way on every
    /// platform: the first name wins.
    pub fn find_tiles(&self) -> Result<DiscoveredTiles, DiscoveryError> {
        if !self.exists() {
            return Err(DiscoveryError::DirectoryNotFound(self.tile_dir.clone()));
        }

        let io_error = |source| DiscoveryError::Io {
            path: self.tile_dir.clone(),
            source,
        };

        let mut entries = Vec::new();
        for entry in std::fs::read_dir(&self.tile_dir).map_err(io_error)? {
            let entry = entry.map_err(io_error)?;
            let path = entry.path();

            // Skip sub-directories such as other zoom levels
            if path.is_dir() {
                continue;
            }

            entries.push((entry.file_name().to_string_lossy().to_string(), path));
        }
        entries.sort_by(|a, b| a.0.cmp(&b.0));

        let mut discovered = DiscoveredTiles::default();

        for (name, path) in entries {
            let coord = match parse_tile_filename(&name) {
                Ok(coord) => coord,
                Err(e) => {
                    tracing::warn!(file = %name, reason = %e, "Skip illegal file name");
                    discovered.skipped.push(SkippedFile {
                        name,
                        reason: SkipReason::IllegalName(e),
                    });
                    continue;
                }
            };

            if discovered.tiles.contains_key(&coord) {
                tracing::warn!(file = %name, tile = %coord, "Skip duplicate tile");
                discovered.skipped.push(SkippedFile {
                    name,
                    reason: SkipReason::Duplicate(coord),
                });
                continue;
            }

            discovered.tiles.insert(coord, path);
        }

        tracing::debug!(
            dir = %self.tile_dir.display(),
            tiles = discovered.len(),
            skipped = discovered.skipped.len(),
            "Tile discovery complete"
        );

        Ok(discovered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(dir: &Path, name: &str) {
        std::fs::write(dir.join(name), b"fake png").unwrap();
    }

    #[test]
    fn test_discovery_nonexistent_dir() {
        let discovery = TileDiscovery::new("/nonexistent/tiles");
        assert!(!discovery.exists());
        assert!(matches!(
            discovery.find_tiles(),
            Err(DiscoveryError::DirectoryNotFound(_))
        ));
    }

    #[test]
    fn test_discovery_empty_dir() {
        let temp = TempDir::new().unwrap();
        let tiles = TileDiscovery::new(temp.path()).find_tiles().unwrap();
        assert!(tiles.is_empty());
        assert!(!tiles.has_reference());
    }

    #[test]
    fn test_discovery_finds_tiles() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "0_0.png");
        touch(temp.path(), "-1_2.png");

        let tiles = TileDiscovery::new(temp.path()).find_tiles().unwrap();
        assert_eq!(tiles.len(), 2);
        assert!(tiles.has_reference());
        assert_eq!(
            tiles.get(&TileCoord::new(-1, 2)),
            Some(temp.path().join("-1_2.png").as_path())
        );
    }

    #[test]
    fn test_discovery_skips_illegal_names() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "0_0.png");
        touch(temp.path(), "abc.png");
        touch(temp.path(), "notes.txt");

        let tiles = TileDiscovery::new(temp.path()).find_tiles().unwrap();
        assert_eq!(tiles.len(), 1);
        assert_eq!(tiles.skipped.len(), 2);
        assert_eq!(tiles.skipped[0].name, "abc.png");
        assert_eq!(
            tiles.skipped[0].reason,
            SkipReason::IllegalName(FilenameError::InvalidPattern)
        );
    }

    #[test]
    fn test_discovery_ignores_subdirectories() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "0_0.png");
        std::fs::create_dir(temp.path().join("1_1.png")).unwrap();

        let tiles = TileDiscovery::new(temp.path()).find_tiles().unwrap();
        assert_eq!(tiles.len(), 1);
        assert!(tiles.skipped.is_empty());
    }

    #[test]
    fn test_discovery_first_duplicate_wins() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "1_0.png");
        touch(temp.path(), "01_0.png");

        let tiles = TileDiscovery::new(temp.path()).find_tiles().unwrap();
        assert_eq!(tiles.len(), 1);
        assert_eq!(
            tiles.get(&TileCoord::new(1, 0)),
            Some(temp.path().join("01_0.png").as_path())
        );
        assert_eq!(
            tiles.skipped[0].reason,
            SkipReason::Duplicate(TileCoord::new(1, 0))
        );
    }
}
