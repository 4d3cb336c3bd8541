//! Addressable configuration keys (`section.key`).

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use super::{format_color, parse_color, parse_zoom, ConfigError, ConfigFile};

/// A single setting, addressed as `section.key` on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    MapTilesDir,
    MapOutputDir,
    MapZoom,
    MapChunkResolution,
    RenderDebugGrid,
    RenderBackground,
}

impl ConfigKey {
    /// Every key, in file order.
    pub fn all() -> &'static [ConfigKey] {
        &[
            ConfigKey::MapTilesDir,
            ConfigKey::MapOutputDir,
            ConfigKey::MapZoom,
            ConfigKey::MapChunkResolution,
            ConfigKey::RenderDebugGrid,
            ConfigKey::RenderBackground,
        ]
    }

    /// Full `section.key` name.
    pub fn name(&self) -> &'static str {
        match self {
            ConfigKey::MapTilesDir => "map.tiles_dir",
            ConfigKey::MapOutputDir => "map.output_dir",
            ConfigKey::MapZoom => "map.zoom",
            ConfigKey::MapChunkResolution => "map.chunk_resolution",
            ConfigKey::RenderDebugGrid => "render.debug_grid",
            ConfigKey::RenderBackground => "render.background",
        }
    }

    pub fn section(&self) -> &'static str {
        match self {
            ConfigKey::MapTilesDir
            | ConfigKey::MapOutputDir
            | ConfigKey::MapZoom
            | ConfigKey::MapChunkResolution => super::SECTION_MAP,
            ConfigKey::RenderDebugGrid | ConfigKey::RenderBackground => super::SECTION_RENDER,
        }
    }

    /// Key name within its section.
    pub fn key_name(&self) -> &'static str {
        let name = self.name();
        &name[self.section().len() + 1..]
    }

    /// Current value as a string; empty when unset.
    pub fn get(&self, config: &ConfigFile) -> String {
        let path = |p: &Option<PathBuf>| {
            p.as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default()
        };

        match self {
            ConfigKey::MapTilesDir => path(&config.map.tiles_dir),
            ConfigKey::MapOutputDir => path(&config.map.output_dir),
            ConfigKey::MapZoom => config.map.zoom.to_string(),
            ConfigKey::MapChunkResolution => config.map.chunk_resolution.to_string(),
            ConfigKey::RenderDebugGrid => config.render.debug_grid.to_string(),
            ConfigKey::RenderBackground => format_color(config.render.background),
        }
    }

    /// Parse `value` and store it. An empty path clears the setting.
    pub fn set(&self, config: &mut ConfigFile, value: &str) -> Result<(), ConfigError> {
        let invalid = |reason: &str| ConfigError::InvalidValue {
            key: self.name(),
            value: value.to_string(),
            reason: reason.to_string(),
        };
        let path = |value: &str| {
            let value = value.trim();
            (!value.is_empty()).then(|| PathBuf::from(value))
        };

        match self {
            ConfigKey::MapTilesDir => config.map.tiles_dir = path(value),
            ConfigKey::MapOutputDir => config.map.output_dir = path(value),
            ConfigKey::MapZoom => config.map.zoom = parse_zoom(self.name(), value)?,
            ConfigKey::MapChunkResolution => {
                config.map.chunk_resolution = value
                    .trim()
                    .parse::<u32>()
                    .ok()
                    .filter(|r| *r > 0)
                    .ok_or_else(|| invalid("expected a positive pixel count"))?;
            }
            ConfigKey::RenderDebugGrid => {
                config.render.debug_grid = match value.trim().to_lowercase().as_str() {
                    "true" | "yes" | "on" | "1" => true,
                    "false" | "no" | "off" | "0" => false,
                    _ => return Err(invalid("expected true or false")),
                };
            }
            ConfigKey::RenderBackground => {
                config.render.background =
                    parse_color(value).ok_or_else(|| invalid("expected r,g,b,a"))?;
            }
        }

        Ok(())
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ConfigKey {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ConfigKey::all()
            .iter()
            .copied()
            .find(|k| k.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ConfigError::UnknownKey(s.to_string()))
    }
}
