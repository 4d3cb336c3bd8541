//! Tile filename parsing.
//!
//! Upstream renders one PNG per grid cell, named by its chunk-space index:
//! `{x}_{y}.png`
//!
//! Examples:
//! - `0_0.png` (the reference tile)
//! - `-4_12.png`
//!
//! Both components are signed. Anything else in the tile directory is not a
//! tile and gets skipped by discovery.

use regex::Regex;
use std::sync::OnceLock;

use crate::coord::TileCoord;

/// Error parsing a tile filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilenameError {
    /// Filename doesn't match expected pattern
    InvalidPattern,
    /// X component doesn't fit the coordinate range
    InvalidX(String),
    /// Y component doesn't fit the coordinate range
    InvalidY(String),
}

impl std::fmt::Display for FilenameError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FilenameError::InvalidPattern => write!(f, "Filename doesn't match tile pattern"),
            FilenameError::InvalidX(s) => write!(f, "Invalid x coordinate: {}", s),
            FilenameError::InvalidY(s) => write!(f, "Invalid y coordinate: {}", s),
        }
    }
}

impl std::error::Error for FilenameError {}

/// Get the tile filename regex.
///
/// Pattern: `<x>_<y>.png`, anchored on both ends so paths and suffixes
/// like `0_0.png.bak` never match.
fn tile_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        // (-?[0-9]+)  - x (signed integer)
        // _           - separator
        // (-?[0-9]+)  - y (signed integer)
        // \.png       - extension (lowercase only)
        Regex::new(r"^(-?[0-9]+)_(-?[0-9]+)\.png$").expect("tile pattern is valid")
    })
}

/// Parse a tile filename into its grid coordinate.
///
/// # Examples
///
/// ```
/// use chunkmap::tile::parse_tile_filename;
///
/// let coord = parse_tile_filename("1_-4.png").unwrap();
/// assert_eq!(coord.x, 1);
/// assert_eq!(coord.y, -4);
///
/// assert!(parse_tile_filename("abc.png").is_err());
/// ```
pub fn parse_tile_filename(filename: &str) -> Result<TileCoord, FilenameError> {
    let captures = tile_pattern()
        .captures(filename)
        .ok_or(FilenameError::InvalidPattern)?;

    let x_str = &captures[1];
    let x = x_str
        .parse::<i32>()
        .map_err(|_| FilenameError::InvalidX(x_str.to_string()))?;

    let y_str = &captures[2];
    let y = y_str
        .parse::<i32>()
        .map_err(|_| FilenameError::InvalidY(y_str.to_string()))?;

    Ok(TileCoord::new(x, y))
}

/// Format the filename a tile at `coord` is expected to have.
pub fn tile_filename(coord: TileCoord) -> String {
    format!("{}_{}.png", coord.x, coord.y)
}
