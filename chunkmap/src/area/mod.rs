//! Area overlays on a rendered map.
//!
//! An [`Area`] is a rectilinear region given in world coordinates by its
//! corners and its horizontal and vertical border segments. The
//! [`AreaRenderer`] maps each area to pixels through the map's metadata and
//! paints its border and interior onto a copy of the basemap.
//!
//! # Example
//!
//! ```no_run
//! use chunkmap::area::{Area, AreaRenderer};
//! use chunkmap::coord::WorldCoord;
//! use chunkmap::metadata::MapMetadata;
//! use image::Rgba;
//! use std::path::Path;
//!
//! let metadata = MapMetadata::load(Path::new("map/metadata.json"))?;
//! let basemap = chunkmap::raster::load(Path::new("map/basemap.png"))?;
//!
//! let spawn = Area::rectangle(
//!     WorldCoord::new(-32, -32),
//!     WorldCoord::new(32, 32),
//!     Rgba([255, 0, 0, 255]),
//!     Rgba([255, 0, 0, 64]),
//! );
//!
//! let rendered = AreaRenderer::new(&metadata).render(&basemap, &[spawn])?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod error;
mod render;
mod types;

pub use error::AreaError;
pub use render::AreaRenderer;
pub use types::{Area, Segment};
