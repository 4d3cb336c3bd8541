//! Persisted map layout.
//!
//! A workspace is a directory holding one assembled map and the area
//! renders drawn on it:
//!
//! ```text
//! <workspace>/
//! ├── basemap.png
//! ├── metadata.json
//! ├── AreaMap-2024-05-01-13-37-00.png
//! └── temp/
//! ```
//!
//! Outputs are written into `temp/` first and moved into place once
//! complete, so a failed run leaves the previous files untouched.

mod error;

pub use error::WorkspaceError;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use image::RgbaImage;

use crate::area::{Area, AreaRenderer};
use crate::assemble::{AssembleOptions, AssemblyStats, TileGridAssembler};
use crate::metadata::MapMetadata;
use crate::raster;

/// File name of the stitched base raster.
pub const BASEMAP_FILE: &str = "basemap.png";

/// File name of the metadata record.
pub const METADATA_FILE: &str = "metadata.json";

/// Scratch directory name.
pub const TEMP_DIR: &str = "temp";

const AREA_MAP_PREFIX: &str = "AreaMap-";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d-%H-%M-%S";

/// A base raster loaded together with its metadata.
#[derive(Debug, Clone)]
pub struct MapImage {
    pub raster: RgbaImage,
    pub metadata: MapMetadata,
}

/// Directory holding a persisted map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapWorkspace {
    root: PathBuf,
}

impl MapWorkspace {
    /// Refer to an existing workspace without touching the filesystem.
    pub fn open(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Create the workspace directory and its scratch directory.
    ///
    /// Safe to call on an existing workspace.
    pub fn init(root: impl Into<PathBuf>) -> Result<Self, WorkspaceError> {
        let workspace = Self::open(root);
        let temp = workspace.temp_dir();
        fs::create_dir_all(&temp).map_err(|source| WorkspaceError::CreateDirectory {
            path: temp.clone(),
            source,
        })?;

        tracing::debug!(root = %workspace.root.display(), "Workspace initialized");
        Ok(workspace)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn basemap_path(&self) -> PathBuf {
        self.root.join(BASEMAP_FILE)
    }

    pub fn metadata_path(&self) -> PathBuf {
        self.root.join(METADATA_FILE)
    }

    pub fn temp_dir(&self) -> PathBuf {
        self.root.join(TEMP_DIR)
    }

    /// Path of the area render stamped with `timestamp`.
    pub fn area_map_path(&self, timestamp: &DateTime<Local>) -> PathBuf {
        self.root.join(format!(
            "{}{}.png",
            AREA_MAP_PREFIX,
            timestamp.format(TIMESTAMP_FORMAT)
        ))
    }

    /// Whether a base map and its metadata are present.
    pub fn has_map(&self) -> bool {
        self.basemap_path().is_file() && self.metadata_path().is_file()
    }

    /// List area renders in this workspace, oldest first.
    pub fn area_maps(&self) -> Result<Vec<PathBuf>, WorkspaceError> {
        let read_error = |source: io::Error| WorkspaceError::ReadDirectory {
            path: self.root.clone(),
            source,
        };
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(read_error(e)),
        };

        let mut maps = Vec::new();
        for entry in entries {
            let path = entry.map_err(read_error)?.path();
            let is_area_map = path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with(AREA_MAP_PREFIX) && n.ends_with(".png"));
            if is_area_map {
                maps.push(path);
            }
        }
        // Timestamps sort lexically
        maps.sort();
        Ok(maps)
    }

    /// Assemble the tiles for `zoom` under `tiles_root` and persist the map.
    ///
    /// Tiles are read from `<tiles_root>/zoom-<zoom>/`. Nothing is written
    /// unless assembly succeeds.
    pub fn create_map(
        &self,
        tiles_root: &Path,
        zoom: u8,
        resolution: u32,
        options: AssembleOptions,
    ) -> Result<(MapMetadata, AssemblyStats), WorkspaceError> {
        let tile_dir = tile_dir(tiles_root, zoom);
        let assembled = TileGridAssembler::new(options).assemble(&tile_dir, zoom, resolution)?;

        let staged_basemap = self.temp_dir().join(BASEMAP_FILE);
        let staged_metadata = self.temp_dir().join(METADATA_FILE);
        raster::write_lossless(&assembled.raster, &staged_basemap)?;
        assembled.metadata.save(&staged_metadata)?;

        self.replace_map(&staged_basemap, &staged_metadata)?;

        tracing::info!(
            root = %self.root.display(),
            width = assembled.metadata.width(),
            height = assembled.metadata.height(),
            "Map saved"
        );

        Ok((assembled.metadata, assembled.stats))
    }

    /// Load the persisted metadata only.
    pub fn load_metadata(&self) -> Result<MapMetadata, WorkspaceError> {
        let path = self.metadata_path();
        if !path.is_file() {
            return Err(WorkspaceError::NoMap(self.root.clone()));
        }
        Ok(MapMetadata::load(&path)?)
    }

    /// Load the base raster and its metadata.
    pub fn load(&self) -> Result<MapImage, WorkspaceError> {
        if !self.has_map() {
            return Err(WorkspaceError::NoMap(self.root.clone()));
        }

        let metadata = MapMetadata::load(&self.metadata_path())?;
        let raster = raster::load(&self.basemap_path())?;
        Ok(MapImage { raster, metadata })
    }

    /// Draw `areas` on the base map and save the result as a new
    /// `AreaMap-<timestamp>.png`.
    ///
    /// Earlier renders are never modified. On error no file is created.
    pub fn render_areas(&self, areas: &[Area]) -> Result<PathBuf, WorkspaceError> {
        self.render_areas_at(areas, &Local::now())
    }

    /// [`render_areas`](Self::render_areas) with an explicit timestamp.
    pub fn render_areas_at(
        &self,
        areas: &[Area],
        timestamp: &DateTime<Local>,
    ) -> Result<PathBuf, WorkspaceError> {
        let map = self.load()?;
        let rendered = AreaRenderer::new(&map.metadata).render(&map.raster, areas)?;

        let target = self.area_map_path(timestamp);
        let staged = match target.file_name() {
            Some(name) => self.temp_dir().join(name),
            None => target.clone(),
        };
        raster::write_lossless(&rendered, &staged)?;
        promote(&staged, &target)?;

        tracing::info!(
            path = %target.display(),
            areas = areas.len(),
            "Area map saved"
        );

        Ok(target)
    }

    /// Move a staged basemap and metadata pair into place.
    ///
    /// The previous metadata is withdrawn while the basemap is replaced and
    /// restored if that fails, so a basemap is never left next to metadata
    /// describing a different map.
    fn replace_map(
        &self,
        staged_basemap: &Path,
        staged_metadata: &Path,
    ) -> Result<(), WorkspaceError> {
        let metadata_path = self.metadata_path();
        let withdrawn = self.temp_dir().join(format!("{}.previous", METADATA_FILE));
        let had_metadata = metadata_path.is_file();
        if had_metadata {
            promote(&metadata_path, &withdrawn)?;
        }

        if let Err(e) = promote(staged_basemap, &self.basemap_path()) {
            if had_metadata {
                if let Err(restore) = promote(&withdrawn, &metadata_path) {
                    tracing::warn!(error = %restore, "Failed to restore previous metadata");
                }
            }
            return Err(e);
        }

        promote(staged_metadata, &metadata_path)?;
        if had_metadata {
            if let Err(e) = fs::remove_file(&withdrawn) {
                tracing::debug!(error = %e, "Failed to remove withdrawn metadata");
            }
        }
        Ok(())
    }
}

/// Directory holding tiles for one zoom level.
pub fn tile_dir(tiles_root: &Path, zoom: u8) -> PathBuf {
    tiles_root.join(format!("zoom-{}", zoom))
}

fn promote(from: &Path, to: &Path) -> Result<(), WorkspaceError> {
    if from == to {
        return Ok(());
    }
    fs::rename(from, to).map_err(|source| WorkspaceError::Persist {
        from: from.to_path_buf(),
        to: to.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assemble::AssembleError;
    use crate::coord::{PixelCoord, WorldCoord};
    use chrono::TimeZone;
    use image::Rgba;
    use tempfile::TempDir;

    const RES: u32 = 8;

    fn write_tile(dir: &Path, x: i32, y: i32, color: Rgba<u8>) {
        let tile = raster::create(RES, RES, color);
        raster::write_lossless(&tile, &dir.join(format!("{}_{}.png", x, y))).unwrap();
    }

    /// Tiles root with a 1×2 grid at zoom 0: (0, 0) and (0, 1).
    fn tiles_root() -> TempDir {
        let root = TempDir::new().unwrap();
        let dir = tile_dir(root.path(), 0);
        fs::create_dir_all(&dir).unwrap();
        write_tile(&dir, 0, 0, Rgba([10, 10, 10, 255]));
        write_tile(&dir, 0, 1, Rgba([20, 20, 20, 255]));
        root
    }

    fn timestamp(second: u32) -> DateTime<Local> {
        Local
            .with_ymd_and_hms(2024, 5, 1, 13, 37, second)
            .single()
            .unwrap()
    }

    #[test]
    fn test_init_creates_temp() {
        let temp = TempDir::new().unwrap();
        let workspace = MapWorkspace::init(temp.path().join("map")).unwrap();

        assert!(workspace.temp_dir().is_dir());
        assert!(!workspace.has_map());

        // Idempotent
        MapWorkspace::init(workspace.root()).unwrap();
    }

    #[test]
    fn test_area_map_path_format() {
        let workspace = MapWorkspace::open("/maps/world");
        assert_eq!(
            workspace.area_map_path(&timestamp(5)),
            PathBuf::from("/maps/world/AreaMap-2024-05-01-13-37-05.png")
        );
    }

    #[test]
    fn test_tile_dir_layout() {
        assert_eq!(
            tile_dir(Path::new("/tiles"), 3),
            PathBuf::from("/tiles/zoom-3")
        );
    }

    #[test]
    fn test_create_and_load() {
        let tiles = tiles_root();
        let temp = TempDir::new().unwrap();
        let workspace = MapWorkspace::init(temp.path()).unwrap();

        let (metadata, stats) = workspace
            .create_map(tiles.path(), 0, RES, AssembleOptions::default())
            .unwrap();

        assert_eq!(stats.placed, 2);
        assert_eq!(metadata.full_resolution, [RES, 2 * RES]);
        assert_eq!(metadata.central_chunk_pixel, PixelCoord::new(0, RES as i32));
        assert!(workspace.has_map());

        let map = workspace.load().unwrap();
        assert_eq!(map.metadata, metadata);
        assert_eq!(map.raster.dimensions(), (RES, 2 * RES));
        assert_eq!(*map.raster.get_pixel(0, 0), Rgba([20, 20, 20, 255]));
        assert_eq!(*map.raster.get_pixel(0, RES), Rgba([10, 10, 10, 255]));

        // Staging area is left empty
        assert_eq!(fs::read_dir(workspace.temp_dir()).unwrap().count(), 0);
    }

    #[test]
    fn test_failed_create_keeps_previous_map() {
        let tiles = tiles_root();
        let temp = TempDir::new().unwrap();
        let workspace = MapWorkspace::init(temp.path()).unwrap();
        workspace
            .create_map(tiles.path(), 0, RES, AssembleOptions::default())
            .unwrap();
        let before = fs::read(workspace.basemap_path()).unwrap();

        // No zoom-1 directory
        let result = workspace.create_map(tiles.path(), 1, RES, AssembleOptions::default());
        assert!(matches!(
            result,
            Err(WorkspaceError::Assemble(AssembleError::TileDirectory(_)))
        ));
        assert_eq!(fs::read(workspace.basemap_path()).unwrap(), before);
    }

    #[test]
    fn test_recreate_replaces_both_files() {
        let tiles = tiles_root();
        let temp = TempDir::new().unwrap();
        let workspace = MapWorkspace::init(temp.path()).unwrap();
        workspace
            .create_map(tiles.path(), 0, RES, AssembleOptions::default())
            .unwrap();

        let (metadata, _) = workspace
            .create_map(tiles.path(), 0, 2 * RES, AssembleOptions::default())
            .unwrap();

        assert_eq!(metadata.chunk_image_resolution, 2 * RES);
        let map = workspace.load().unwrap();
        assert_eq!(map.metadata, metadata);
        assert_eq!(map.raster.dimensions(), (2 * RES, 4 * RES));
        assert_eq!(fs::read_dir(workspace.temp_dir()).unwrap().count(), 0);
    }

    #[test]
    fn test_failed_basemap_move_keeps_previous_metadata() {
        let tiles = tiles_root();
        let temp = TempDir::new().unwrap();
        let workspace = MapWorkspace::init(temp.path()).unwrap();
        workspace
            .create_map(tiles.path(), 0, RES, AssembleOptions::default())
            .unwrap();
        let before = workspace.load_metadata().unwrap();

        // A non-empty directory where the basemap goes makes the move fail
        let basemap = workspace.basemap_path();
        fs::remove_file(&basemap).unwrap();
        fs::create_dir(&basemap).unwrap();
        fs::write(basemap.join("keep"), b"keep").unwrap();

        let result = workspace.create_map(tiles.path(), 0, 2 * RES, AssembleOptions::default());

        assert!(matches!(result, Err(WorkspaceError::Persist { .. })));
        assert_eq!(workspace.load_metadata().unwrap(), before);
        assert!(basemap.join("keep").is_file());
    }

    #[test]
    fn test_area_maps_missing_root_is_empty() {
        let temp = TempDir::new().unwrap();
        let workspace = MapWorkspace::open(temp.path().join("absent"));
        assert!(workspace.area_maps().unwrap().is_empty());
    }

    #[test]
    fn test_area_maps_unreadable_root_is_error() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("not-a-dir");
        fs::write(&root, b"").unwrap();

        let result = MapWorkspace::open(&root).area_maps();
        assert!(matches!(
            result,
            Err(WorkspaceError::ReadDirectory { path, .. }) if path == root
        ));
    }

    #[test]
    fn test_load_without_map() {
        let temp = TempDir::new().unwrap();
        let workspace = MapWorkspace::init(temp.path()).unwrap();

        assert!(matches!(workspace.load(), Err(WorkspaceError::NoMap(_))));
        assert!(matches!(
            workspace.load_metadata(),
            Err(WorkspaceError::NoMap(_))
        ));
    }

    #[test]
    fn test_render_areas_writes_new_file() {
        let tiles = tiles_root();
        let temp = TempDir::new().unwrap();
        let workspace = MapWorkspace::init(temp.path()).unwrap();
        workspace
            .create_map(tiles.path(), 0, RES, AssembleOptions::default())
            .unwrap();

        // At zoom 0 with 8 px tiles, one pixel covers 8 world units
        let area = Area::rectangle(
            WorldCoord::new(8, -56),
            WorldCoord::new(40, -24),
            Rgba([255, 0, 0, 255]),
            Rgba([0, 255, 0, 255]),
        );

        let path = workspace.render_areas_at(&[area], &timestamp(0)).unwrap();
        assert_eq!(path, workspace.area_map_path(&timestamp(0)));
        assert_eq!(workspace.area_maps().unwrap(), vec![path.clone()]);

        let rendered = raster::load(&path).unwrap();
        assert_eq!(rendered.dimensions(), (RES, 2 * RES));
        assert_eq!(*rendered.get_pixel(1, 9), Rgba([255, 0, 0, 255]));
        assert_eq!(*rendered.get_pixel(3, 11), Rgba([0, 255, 0, 255]));
        assert_eq!(*rendered.get_pixel(0, 0), Rgba([20, 20, 20, 255]));
    }

    #[test]
    fn test_render_out_of_bounds_creates_nothing() {
        let tiles = tiles_root();
        let temp = TempDir::new().unwrap();
        let workspace = MapWorkspace::init(temp.path()).unwrap();
        workspace
            .create_map(tiles.path(), 0, RES, AssembleOptions::default())
            .unwrap();

        let area = Area::rectangle(
            WorldCoord::new(0, -64),
            WorldCoord::new(10_000, -64),
            Rgba([255, 0, 0, 255]),
            Rgba([0, 0, 0, 0]),
        );

        let result = workspace.render_areas_at(&[area], &timestamp(1));
        assert!(matches!(result, Err(WorkspaceError::Area(_))));
        assert!(workspace.area_maps().unwrap().is_empty());
        assert!(!workspace.area_map_path(&timestamp(1)).exists());
    }
}
