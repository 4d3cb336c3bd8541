//! Render command - draw areas on the base map.

use std::fs;
use std::path::{Path, PathBuf};

use chunkmap::area::Area;

use super::common::open_workspace;
use crate::error::CliError;

/// Run the render command.
pub fn run(areas_file: &Path, map: Option<PathBuf>) -> Result<(), CliError> {
    let areas = read_areas(areas_file)?;
    let (_, workspace) = open_workspace(map);

    let output = workspace.render_areas(&areas)?;

    println!("Rendered {} area(s)", areas.len());
    println!("  {}", output.display());
    Ok(())
}

/// Read a JSON array of areas.
fn read_areas(path: &Path) -> Result<Vec<Area>, CliError> {
    let text = fs::read_to_string(path)
        .map_err(|e| CliError::Areas(format!("{}: {}", path.display(), e)))?;
    serde_json::from_str(&text).map_err(|e| CliError::Areas(format!("{}: {}", path.display(), e)))
}
