//! Tile discovery and grid layout.
//!
//! Turns a directory of `<x>_<y>.png` renders into an ordered list of
//! placements on a regular grid:
//!
//! ```text
//! tile dir ──► TileDiscovery ──► DiscoveredTiles ──► GridLayout ──► Vec<TilePlacement>
//!              (parse names)     (coord → path)      (bounds)       (index, coord, path?)
//! ```

mod discovery;
mod filename;
mod grid;

pub use discovery::{DiscoveredTiles, DiscoveryError, SkipReason, SkippedFile, TileDiscovery};
pub use filename::{parse_tile_filename, tile_filename, FilenameError};
pub use grid::{GridError, GridLayout, TilePlacement};
