//! Info command - show the map's metadata and renders.

use std::path::PathBuf;

use chunkmap::coord::{PixelTransform, REFERENCE_WORLD_ANCHOR};

use super::common::open_workspace;
use crate::error::CliError;

/// Run the info command.
pub fn run(map: Option<PathBuf>) -> Result<(), CliError> {
    let (_, workspace) = open_workspace(map);
    let metadata = workspace.load_metadata()?;
    let transform = PixelTransform::from_metadata(&metadata);

    println!("Map: {}", workspace.root().display());
    println!();
    println!("  Resolution:       {}×{} px", metadata.width(), metadata.height());
    println!(
        "  Grid:             {}×{} tiles of {} px",
        metadata.grid_dimensions[0], metadata.grid_dimensions[1], metadata.chunk_image_resolution
    );
    println!("  Zoom:             {}", metadata.zoom);
    println!(
        "  Anchor {}:   pixel {}",
        REFERENCE_WORLD_ANCHOR, metadata.central_chunk_pixel
    );
    println!("  World units/px:   {}", transform.pixel_to_mc_rate());

    let renders = workspace.area_maps()?;
    println!();
    if renders.is_empty() {
        println!("No area renders yet.");
    } else {
        println!("Area renders ({}):", renders.len());
        for path in renders {
            println!("  {}", path.display());
        }
    }
    Ok(())
}
