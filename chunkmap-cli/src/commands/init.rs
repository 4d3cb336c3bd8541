//! Init command - create the configuration file and map workspace.

use std::path::PathBuf;

use chunkmap::config::{config_file_path, ConfigFile};
use chunkmap::workspace::MapWorkspace;

use super::common::resolve_map_dir;
use crate::error::CliError;

/// Run the init command.
pub fn run(output: Option<PathBuf>) -> Result<(), CliError> {
    // Keep an existing config, only fill in the workspace if unset
    let mut config = ConfigFile::load().unwrap_or_default();
    let map_dir = resolve_map_dir(output, &config);
    if config.map.output_dir.is_none() {
        config.map.output_dir = Some(map_dir.clone());
    }
    config.save()?;

    let workspace = MapWorkspace::init(&map_dir)?;

    println!("Configuration file: {}", config_file_path().display());
    println!("Map workspace:      {}", workspace.root().display());
    println!();
    if config.map.tiles_dir.is_none() {
        println!("Set the tile directory before assembling:");
        println!("  chunkmap config set map.tiles_dir <DIR>");
    } else {
        println!("Run 'chunkmap assemble' to build the base map.");
    }
    Ok(())
}
