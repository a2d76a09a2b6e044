//! Pipeline orchestrator: images in, `game.map` contents out.

use std::io::Write;
use std::path::Path;

use crate::cliff::DEFAULT_FLATNESS_THRESHOLD;
use crate::encoder::write_map;
use crate::environment::Environment;
use crate::error::MapError;
use crate::gateway::{extract_gateways, Gateway};
use crate::heightfield::HeightGrid;
use crate::mask::Mask;
use crate::raster::Raster;
use crate::terrain::{build_terrain, TerrainGrid, TerrainReport};

pub const HEIGHTMAP_FILE: &str = "heightmap.png";
pub const TILEMAP_FILE: &str = "tilemap.png";
pub const CLIFFMAP_FILE: &str = "cliffmap.png";
pub const GATEMAP_FILE: &str = "gatemap.png";

/// The decoded authoring images of one map.
pub struct MapSources {
    pub heightmap: Raster,
    pub tilemap: Raster,
    pub cliffmap: Raster,
    /// Absent gatemaps mean no gateways.
    pub gatemap: Option<Raster>,
}

impl MapSources {
    /// Read the four images from a map directory. Only the gatemap may be missing.
    pub fn open(dir: &Path) -> Result<Self, MapError> {
        let gate_path = dir.join(GATEMAP_FILE);
        let gatemap = if gate_path.exists() {
            Some(Raster::open(&gate_path, "gatemap")?)
        } else {
            log::warn!("{} not found, ignoring gateways", gate_path.display());
            None
        };
        Ok(Self {
            heightmap: Raster::open(&dir.join(HEIGHTMAP_FILE), "heightmap")?,
            tilemap: Raster::open(&dir.join(TILEMAP_FILE), "tilemap")?,
            cliffmap: Raster::open(&dir.join(CLIFFMAP_FILE), "cliffmap")?,
            gatemap,
        })
    }
}

/// Everything `game.map` is made of.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledMap {
    pub heights: HeightGrid,
    pub terrain: TerrainGrid,
    pub gateways: Vec<Gateway>,
    pub report: TerrainReport,
}

impl CompiledMap {
    pub fn write_to<W: Write>(&self, out: &mut W) -> Result<(), MapError> {
        write_map(out, &self.terrain, &self.heights, &self.gateways)
    }

    /// Map size in tiles.
    pub fn dims(&self) -> (usize, usize) {
        (self.terrain.width, self.terrain.height)
    }
}

pub struct MapCompiler {
    env: Environment,
    threshold: u8,
}

impl MapCompiler {
    pub fn new(env: Environment) -> Self {
        Self {
            env,
            threshold: DEFAULT_FLATNESS_THRESHOLD,
        }
    }

    /// Override the cliff flatness threshold.
    pub fn with_threshold(mut self, threshold: u8) -> Self {
        self.threshold = threshold;
        self
    }

    /// Run the pipeline:
    ///   1. Heightmap → height grid
    ///   2. Cliffmap → cliff mask
    ///   3. Tilemap + cliffs + heights → tile and rotation grids
    ///   4. Gatemap → gateways
    pub fn compile(&self, sources: &MapSources) -> Result<CompiledMap, MapError> {
        let heights = HeightGrid::from_raster(&sources.heightmap)?;
        sources.heightmap.ensure_same_size(&sources.tilemap, "tilemap")?;
        sources.heightmap.ensure_same_size(&sources.cliffmap, "cliffmap")?;

        let cliffs = Mask::from_raster(&sources.cliffmap);
        let (terrain, report) = build_terrain(
            &sources.tilemap,
            &cliffs,
            &heights,
            self.env.tileset(),
            self.threshold,
        )?;
        report.log_summary();

        let gateways = match &sources.gatemap {
            Some(gatemap) => {
                sources.heightmap.ensure_same_size(gatemap, "gatemap")?;
                extract_gateways(&Mask::from_raster(gatemap))
            }
            None => Vec::new(),
        };
        log::info!(
            "Compiled {}x{} tiles, {} cliff(s), {} gateway(s)",
            terrain.width,
            terrain.height,
            cliffs.count(),
            gateways.len()
        );

        Ok(CompiledMap {
            heights,
            terrain,
            gateways,
            report,
        })
    }
}
