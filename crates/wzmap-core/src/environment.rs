//! Per-environment tile configuration.
//!
//! Each environment (tileset) carries three immutable tables: the palette that
//! maps painted colours to tile indices, the cliff table that maps a base tile
//! to its cliff art variants, and the rotation overrides that compensate for
//! cliff art drawn pre-rotated in the tileset.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::cliff::{CliffShape, Rotation};
use crate::error::MapError;

/// Terrain environment selected by the first letter of `map.json`'s `env`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Environment {
    Rockies,
    Arizona,
    Urban,
}

impl Environment {
    /// Resolve an environment name by its first character (`"rockies"`, `"r"`, ...).
    pub fn from_code(code: &str) -> Result<Self, MapError> {
        match code.chars().next() {
            Some('r') => Ok(Environment::Rockies),
            Some('a') => Ok(Environment::Arizona),
            Some('u') => Ok(Environment::Urban),
            _ => Err(MapError::UnknownEnvironment(code.to_string())),
        }
    }

    /// Engine dataset name for the `.lev` descriptor.
    pub fn dataset(self) -> &'static str {
        match self {
            Environment::Rockies => "MULTI_CAM_3",
            Environment::Arizona => "MULTI_CAM_1",
            Environment::Urban => "MULTI_CAM_2",
        }
    }

    pub fn tileset(self) -> &'static Tileset {
        match self {
            Environment::Rockies => &ROCKIES,
            Environment::Arizona => &ARIZONA,
            Environment::Urban => &URBAN,
        }
    }
}

impl FromStr for Environment {
    type Err = MapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_code(s)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Environment::Rockies => "rockies",
            Environment::Arizona => "arizona",
            Environment::Urban => "urban",
        };
        f.write_str(s)
    }
}

// ── Tables ───────────────────────────────────────────────────────────────────

/// Exact RGB colour → tile index.
#[derive(Debug)]
pub struct Palette {
    entries: &'static [([u8; 3], u16)],
}

impl Palette {
    pub fn lookup(&self, rgb: [u8; 3]) -> Option<u16> {
        self.entries.iter().find(|(c, _)| *c == rgb).map(|&(_, t)| t)
    }

    pub fn entries(&self) -> &'static [([u8; 3], u16)] {
        self.entries
    }
}

/// Cliff art variants for one base tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CliffTiles {
    pub flat: u16,
    pub straight: u16,
    pub corner: u16,
}

impl CliffTiles {
    pub fn for_shape(&self, shape: CliffShape) -> u16 {
        match shape {
            CliffShape::Flat => self.flat,
            CliffShape::Straight => self.straight,
            CliffShape::Corner => self.corner,
        }
    }
}

/// Base tile index → cliff variants, with a fallback record.
#[derive(Debug)]
pub struct CliffTable {
    entries: &'static [(u16, CliffTiles)],
    pub default: CliffTiles,
}

impl CliffTable {
    pub fn get(&self, base: u16) -> Option<&CliffTiles> {
        self.entries.iter().find(|(t, _)| *t == base).map(|(_, c)| c)
    }
}

/// Extra rotation applied to specific cliff tiles.
#[derive(Debug)]
pub struct RotationOverrides {
    entries: &'static [(u16, Rotation)],
}

impl RotationOverrides {
    /// Extra rotation for `tile`, `R0` when the tile has no override.
    pub fn get(&self, tile: u16) -> Rotation {
        self.entries
            .iter()
            .find(|(t, _)| *t == tile)
            .map(|&(_, r)| r)
            .unwrap_or(Rotation::R0)
    }
}

#[derive(Debug)]
pub struct Tileset {
    pub palette: Palette,
    pub cliffs: CliffTable,
    pub rotation_overrides: RotationOverrides,
}

const fn cliff(flat: u16, straight: u16, corner: u16) -> CliffTiles {
    CliffTiles { flat, straight, corner }
}

// Colours match the FlaME paint presets.
static ROCKIES: Tileset = Tileset {
    palette: Palette {
        entries: &[
            ([44, 59, 39], 0),     // grass
            ([108, 102, 98], 5),   // gravel
            ([90, 80, 64], 53),    // dirt
            ([142, 144, 138], 23), // grass snow
            ([158, 154, 151], 41), // gravel snow
            ([241, 241, 241], 64), // snow
            ([99, 101, 101], 22),  // concrete
            ([29, 47, 77], 17),    // water
        ],
    },
    cliffs: CliffTable {
        entries: &[
            (5, cliff(46, 46, 47)),  // gravel
            (41, cliff(44, 44, 43)), // gravel snow
            (23, cliff(29, 29, 30)), // grass snow
            (64, cliff(76, 76, 75)), // snow
        ],
        default: cliff(46, 46, 47),
    },
    rotation_overrides: RotationOverrides {
        entries: &[(43, Rotation::R90), (75, Rotation::R270)],
    },
};

static ARIZONA: Tileset = Tileset {
    palette: Palette {
        entries: &[
            ([255, 0, 0], 48),   // red
            ([128, 128, 0], 9),  // yellow
            ([255, 255, 0], 12), // sand
            ([64, 64, 64], 5),   // brown
            ([0, 128, 0], 23),   // green
            ([0, 0, 0], 22),     // concrete
            ([0, 0, 255], 17),   // water
        ],
    },
    cliffs: CliffTable {
        entries: &[
            (48, cliff(71, 71, 70)), // red
            (9, cliff(75, 75, 76)),  // yellow
        ],
        default: cliff(71, 71, 70),
    },
    rotation_overrides: RotationOverrides {
        entries: &[(70, Rotation::R180)],
    },
};

static URBAN: Tileset = Tileset {
    palette: Palette {
        entries: &[
            ([50, 90, 40], 0),     // grass
            ([96, 96, 96], 5),     // asphalt
            ([120, 100, 70], 53),  // dirt
            ([160, 160, 160], 22), // concrete
            ([200, 180, 140], 12), // rubble
            ([30, 60, 110], 17),   // water
        ],
    },
    cliffs: CliffTable {
        entries: &[
            (22, cliff(51, 51, 52)), // concrete
            (5, cliff(55, 55, 56)),  // asphalt
        ],
        default: cliff(51, 51, 52),
    },
    rotation_overrides: RotationOverrides {
        entries: &[(52, Rotation::R90)],
    },
};
