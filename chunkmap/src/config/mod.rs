//! INI configuration file.
//!
//! Settings live in `<config dir>/chunkmap/config.ini`:
//!
//! ```ini
//! [map]
//! tiles_dir = /srv/render/tiles
//! output_dir = /srv/render/map
//! zoom = 2
//! chunk_resolution = 256
//!
//! [render]
//! debug_grid = false
//! background = 0,0,0,255
//! ```
//!
//! Missing keys take their defaults. Command-line flags override the file.

mod keys;

pub use keys::ConfigKey;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use image::Rgba;
use ini::Ini;
use thiserror::Error;

use crate::coord::validate_zoom;
use crate::raster::BLACK;

const SECTION_MAP: &str = "map";
const SECTION_RENDER: &str = "render";

/// Errors reading, writing or editing the configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: ini::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("unknown configuration key '{0}'")]
    UnknownKey(String),

    #[error("invalid value '{value}' for {key}: {reason}")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// `[map]` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapConfig {
    /// Directory holding `zoom-<n>/` tile folders.
    pub tiles_dir: Option<PathBuf>,

    /// Workspace directory for the assembled map.
    pub output_dir: Option<PathBuf>,

    pub zoom: u8,

    /// Pixel width and height of one tile image.
    pub chunk_resolution: u32,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            tiles_dir: None,
            output_dir: None,
            zoom: 2,
            chunk_resolution: 256,
        }
    }
}

/// `[render]` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderConfig {
    pub debug_grid: bool,
    pub background: Rgba<u8>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            debug_grid: false,
            background: BLACK,
        }
    }
}

/// Parsed configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigFile {
    pub map: MapConfig,
    pub render: RenderConfig,
}

impl ConfigFile {
    /// Load from the default location, or defaults if there is no file.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&config_file_path())
    }

    /// Load from `path`, or defaults if it doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }

        let ini = Ini::load_from_file(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_ini(&ini)
    }

    /// Save to the default location.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&config_file_path())
    }

    /// Save to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let write_error = |source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(write_error)?;
        }
        self.to_ini().write_to_file(path).map_err(write_error)?;

        tracing::debug!(path = %path.display(), "Config saved");
        Ok(())
    }

    /// Build from parsed INI, applying defaults for absent keys.
    pub fn from_ini(ini: &Ini) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        for key in ConfigKey::all() {
            let value = ini
                .section(Some(key.section()))
                .and_then(|props| props.get(key.key_name()));
            if let Some(value) = value {
                key.set(&mut config, value)?;
            }
        }

        Ok(config)
    }

    /// Render as INI. Unset paths are left out.
    pub fn to_ini(&self) -> Ini {
        let mut ini = Ini::new();
        for key in ConfigKey::all() {
            let value = key.get(self);
            if !value.is_empty() {
                ini.with_section(Some(key.section()))
                    .set(key.key_name(), value);
            }
        }
        ini
    }
}

/// Directory holding chunkmap's configuration.
pub fn config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("chunkmap")
}

/// Path of the configuration file.
pub fn config_file_path() -> PathBuf {
    config_dir().join("config.ini")
}

/// Parse `r,g,b,a` with each channel 0-255.
pub fn parse_color(value: &str) -> Option<Rgba<u8>> {
    let channels: Vec<u8> = value
        .split(',')
        .map(|c| c.trim().parse::<u8>())
        .collect::<Result<_, _>>()
        .ok()?;
    let channels: [u8; 4] = channels.try_into().ok()?;
    Some(Rgba(channels))
}

/// Format a color as `r,g,b,a`.
pub fn format_color(color: Rgba<u8>) -> String {
    let [r, g, b, a] = color.0;
    format!("{},{},{},{}", r, g, b, a)
}

fn parse_zoom(key: &'static str, value: &str) -> Result<u8, ConfigError> {
    value
        .trim()
        .parse::<u8>()
        .ok()
        .and_then(|z| validate_zoom(z).ok())
        .ok_or_else(|| ConfigError::InvalidValue {
            key,
            value: value.to_string(),
            reason: "expected a zoom level between 0 and 4".to_string(),
        })
}
