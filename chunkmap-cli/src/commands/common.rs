//! Common helpers shared across CLI commands.

use std::path::PathBuf;

use chunkmap::config::ConfigFile;
use chunkmap::workspace::MapWorkspace;

use crate::error::CliError;

/// Workspace used when neither the command line nor the config names one.
pub const DEFAULT_MAP_DIR: &str = "map";

/// Resolve the map workspace directory: CLI > config > `./map`.
pub fn resolve_map_dir(cli_dir: Option<PathBuf>, config: &ConfigFile) -> PathBuf {
    cli_dir
        .or_else(|| config.map.output_dir.clone())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_MAP_DIR))
}

/// Resolve the tiles root: CLI > config. There is no default.
pub fn resolve_tiles_dir(cli_dir: Option<PathBuf>, config: &ConfigFile) -> Result<PathBuf, CliError> {
    cli_dir
        .or_else(|| config.map.tiles_dir.clone())
        .ok_or_else(|| {
            CliError::Config(
                "No tiles directory. Use --tiles or 'chunkmap config set map.tiles_dir <DIR>'"
                    .to_string(),
            )
        })
}

/// Open the workspace for an existing map.
pub fn open_workspace(cli_dir: Option<PathBuf>) -> (ConfigFile, MapWorkspace) {
    let config = ConfigFile::load().unwrap_or_default();
    let workspace = MapWorkspace::open(resolve_map_dir(cli_dir, &config));
    (config, workspace)
}
