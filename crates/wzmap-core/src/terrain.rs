//! Tile grid construction: palette classification of the tilemap combined with
//! cliff classification of the heightmap wherever the cliffmap is marked.

use crate::cliff::{classify, Rotation};
use crate::environment::Tileset;
use crate::error::MapError;
use crate::heightfield::HeightGrid;
use crate::mask::Mask;
use crate::raster::{classify_tile, Raster};

/// Final tile indices and rotation bytes, `(w - 1) × (h - 1)` for `w × h`
/// input images, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerrainGrid {
    pub width: usize,
    pub height: usize,
    pub tiles: Vec<u16>,
    /// Rotation masks, one of `0x00`, `0x10`, `0x20`, `0x30`.
    pub rotations: Vec<u8>,
}

impl TerrainGrid {
    #[inline]
    pub fn tile(&self, x: usize, y: usize) -> u16 {
        self.tiles[y * self.width + x]
    }

    #[inline]
    pub fn rotation(&self, x: usize, y: usize) -> u8 {
        self.rotations[y * self.width + x]
    }
}

/// Recoverable problems met while building the grid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TerrainReport {
    /// Tilemap colours missing from the palette.
    pub unknown_tiles: usize,
    /// Cliff-marked tiles whose base tile has no cliff mapping.
    pub incompatible_cliffs: usize,
    /// Cliff blocks with no clean corner reading.
    pub ambiguous_cliffs: usize,
}

impl TerrainReport {
    pub fn is_clean(&self) -> bool {
        *self == Self::default()
    }

    /// Emit one warning per non-empty category.
    pub fn log_summary(&self) {
        if self.unknown_tiles > 0 {
            log::warn!(
                "Error(s) while reading tilemap: {} unknown tile(s)",
                self.unknown_tiles
            );
        }
        if self.incompatible_cliffs > 0 {
            log::warn!(
                "Error(s) while reading cliffmap: {} incompatible base tile(s)",
                self.incompatible_cliffs
            );
        }
        if self.ambiguous_cliffs > 0 {
            log::warn!(
                "{} ambiguous cliff corner configuration(s) given a default orientation",
                self.ambiguous_cliffs
            );
        }
    }
}

/// Build the tile and rotation grids.
///
/// `tilemap`, `cliffs` and `heights` must share dimensions. Unknown colours and
/// unmapped cliffs fall back to the tileset's default cliff record and are
/// counted in the returned report rather than failing the build.
pub fn build_terrain(
    tilemap: &Raster,
    cliffs: &Mask,
    heights: &HeightGrid,
    tileset: &Tileset,
    threshold: u8,
) -> Result<(TerrainGrid, TerrainReport), MapError> {
    for (what, w, h) in [
        ("cliffmap", cliffs.width, cliffs.height),
        ("heightmap", heights.width, heights.height),
    ] {
        if w != tilemap.width || h != tilemap.height {
            return Err(MapError::DimensionMismatch {
                what,
                expected_w: tilemap.width,
                expected_h: tilemap.height,
                found_w: w,
                found_h: h,
            });
        }
    }

    let width = tilemap.width - 1;
    let height = tilemap.height - 1;
    let fallback = tileset.cliffs.default.straight;
    let mut tiles = Vec::with_capacity(width * height);
    let mut rotations = Vec::with_capacity(width * height);
    let mut report = TerrainReport::default();

    for y in 0..height {
        for x in 0..width {
            let base = classify_tile(tilemap.pixel(x, y), &tileset.palette);
            if base.is_none() {
                report.unknown_tiles += 1;
            }

            let cliff_block = if cliffs.get(x, y) { heights.block_at(x, y) } else { None };

            let (tile, rotation) = match cliff_block {
                Some(block) => {
                    let class = classify(block, threshold);
                    if class.ambiguous {
                        report.ambiguous_cliffs += 1;
                    }
                    let variants = match base {
                        Some(b) => tileset.cliffs.get(b).unwrap_or_else(|| {
                            report.incompatible_cliffs += 1;
                            &tileset.cliffs.default
                        }),
                        None => &tileset.cliffs.default,
                    };
                    let tile = variants.for_shape(class.shape);
                    let extra = tileset.rotation_overrides.get(tile);
                    (tile, class.rotation.then(extra))
                }
                None => (base.unwrap_or(fallback), Rotation::R0),
            };

            tiles.push(tile);
            rotations.push(rotation.mask());
        }
    }

    Ok((
        TerrainGrid {
            width,
            height,
            tiles,
            rotations,
        },
        report,
    ))
}
