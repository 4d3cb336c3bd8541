//! Assemble command - stitch tiles into the base map.

use std::path::PathBuf;

use chunkmap::assemble::AssembleOptions;
use chunkmap::config::ConfigFile;
use chunkmap::workspace::{tile_dir, MapWorkspace};

use super::common::{resolve_map_dir, resolve_tiles_dir};
use crate::error::CliError;

/// Arguments for the assemble command.
pub struct AssembleArgs {
    pub tiles: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub zoom: Option<u8>,
    pub resolution: Option<u32>,
    pub debug_grid: bool,
}

/// Run the assemble command.
pub fn run(args: AssembleArgs) -> Result<(), CliError> {
    let config = ConfigFile::load().unwrap_or_default();

    let tiles_root = resolve_tiles_dir(args.tiles, &config)?;
    let map_dir = resolve_map_dir(args.output, &config);
    let zoom = args.zoom.unwrap_or(config.map.zoom);
    let resolution = args.resolution.unwrap_or(config.map.chunk_resolution);
    let options = AssembleOptions::default()
        .with_debug_grid(args.debug_grid || config.render.debug_grid)
        .with_background(config.render.background);

    println!("Tiles:      {}", tile_dir(&tiles_root, zoom).display());
    println!("Zoom:       {}", zoom);
    println!("Resolution: {} px", resolution);
    println!();

    let workspace = MapWorkspace::init(&map_dir)?;
    let (metadata, stats) = workspace.create_map(&tiles_root, zoom, resolution, options)?;

    println!(
        "Assembled {}×{} tiles into {}×{} px",
        metadata.grid_dimensions[0],
        metadata.grid_dimensions[1],
        metadata.width(),
        metadata.height()
    );
    println!(
        "  Placed: {}  Missing: {}  Skipped: {}",
        stats.placed, stats.missing, stats.skipped
    );
    println!("  Base map: {}", workspace.basemap_path().display());
    println!("  Metadata: {}", workspace.metadata_path().display());
    Ok(())
}
