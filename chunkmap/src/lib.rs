//! chunkmap - stitch chunk tile renders into one map and draw areas on it
//!
//! An upstream renderer writes one PNG per world tile, named `<x>_<y>.png`,
//! under `zoom-<n>/`. This library stitches those tiles into a single base
//! raster, records how world coordinates map onto it, and paints bordered,
//! filled areas given in world coordinates on top.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//!
//! use chunkmap::area::Area;
//! use chunkmap::assemble::AssembleOptions;
//! use chunkmap::coord::WorldCoord;
//! use chunkmap::workspace::MapWorkspace;
//! use image::Rgba;
//!
//! let workspace = MapWorkspace::init("map")?;
//! workspace.create_map(Path::new("tiles"), 2, 256, AssembleOptions::default())?;
//!
//! let spawn = Area::rectangle(
//!     WorldCoord::new(-64, -64),
//!     WorldCoord::new(64, 64),
//!     Rgba([255, 0, 0, 255]),
//!     Rgba([255, 0, 0, 64]),
//! );
//! let output = workspace.render_areas(&[spawn])?;
//! println!("{}", output.display());
//! # Ok::<(), chunkmap::workspace::WorkspaceError>(())
//! ```

pub mod area;
pub mod assemble;
pub mod config;
pub mod coord;
pub mod logging;
pub mod metadata;
pub mod raster;
pub mod tile;
pub mod workspace;
