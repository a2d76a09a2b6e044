//! Compiler from painted map sources (heightmap, tilemap, cliffmap, gatemap
//! and object tables) to the engine's map package files.

pub mod autocliff;
pub mod cliff;
pub mod compiler;
pub mod encoder;
pub mod environment;
pub mod error;
pub mod gateway;
pub mod heightfield;
pub mod mask;
pub mod objects;
pub mod props;
pub mod raster;
pub mod symmetry;
pub mod terrain;

pub use compiler::{CompiledMap, MapCompiler, MapSources};
pub use environment::Environment;
pub use error::MapError;
pub use objects::{ObjectKind, PlacedObject};
pub use props::MapProps;
pub use symmetry::Symmetry;
