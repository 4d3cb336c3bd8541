//! Locate command - convert between world coordinates and map pixels.

use std::path::PathBuf;

use chunkmap::coord::{PixelCoord, PixelTransform, WorldCoord};

use super::common::open_workspace;
use crate::error::CliError;

/// Run the locate command.
pub fn run(x: i32, y: i32, pixel: bool, map: Option<PathBuf>) -> Result<(), CliError> {
    let (_, workspace) = open_workspace(map);
    let metadata = workspace.load_metadata()?;
    let transform = PixelTransform::from_metadata(&metadata);

    if pixel {
        let pixel = PixelCoord::new(x, y);
        println!("pixel {} -> world {}", pixel, transform.to_world(pixel));
    } else {
        let world = WorldCoord::new(x, y);
        let pixel = transform.to_pixel(world)?;
        println!("world {} -> pixel {}", world, pixel);
    }
    Ok(())
}
