//! `map.json` map properties.

use std::io::Read;

use serde::{Deserialize, Serialize};

use crate::environment::Environment;
use crate::error::MapError;
use crate::symmetry::Symmetry;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapProps {
    /// Map width in tiles.
    pub width: u32,
    /// Map height in tiles.
    pub height: u32,
    pub players: u32,
    /// Environment name, resolved by its first letter.
    pub env: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, alias = "symmetry")]
    pub symetry: Option<String>,
}

impl MapProps {
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, MapError> {
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn environment(&self) -> Result<Environment, MapError> {
        Environment::from_code(&self.env)
    }

    /// Parsed symmetry, `None` when the map declares none.
    pub fn symmetry(&self) -> Result<Option<Symmetry>, MapError> {
        self.symetry.as_deref().map(str::parse).transpose()
    }

    /// Declared name, or `fallback` (usually the map directory name).
    pub fn name_or(&self, fallback: &str) -> String {
        self.name.clone().unwrap_or_else(|| fallback.to_string())
    }
}
