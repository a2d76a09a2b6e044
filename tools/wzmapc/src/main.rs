//! Map package compiler: turns a map source directory (PNG layers, map.json,
//! object CSVs) into the engine's map files under `build/`.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::{error, info, warn};

use wzmap_core::autocliff::{auto_cliff, DEFAULT_STEP};
use wzmap_core::cliff::DEFAULT_FLATNESS_THRESHOLD;
use wzmap_core::compiler::HEIGHTMAP_FILE;
use wzmap_core::encoder::{write_gam, write_lev};
use wzmap_core::heightfield::HeightGrid;
use wzmap_core::objects::{apply_symmetry, read_objects, to_json, write_json};
use wzmap_core::raster::Raster;
use wzmap_core::{MapCompiler, MapProps, MapSources, ObjectKind};

/// Files copied verbatim next to `game.map`.
const COMPANION_FILES: [&str; 4] = ["droid.json", "feature.json", "struct.json", "ttypes.ttp"];

// ── CLI ──────────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "wzmapc", about = "Compile painted map sources into a map package")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compile game.map, the .gam header and the .lev descriptor into <dir>/build
    Map {
        /// Map source directory
        dir: PathBuf,

        /// Height spread (0-255) under which a cliff tile counts as flat
        #[arg(long, default_value_t = DEFAULT_FLATNESS_THRESHOLD)]
        threshold: u8,
    },

    /// Convert droid/struct/feature CSV tables to JSON, applying map symmetry
    Objects {
        /// Map source directory
        dir: PathBuf,
    },

    /// Generate autocliffmap.png from the heightmap
    Autocliff {
        /// Map source directory
        dir: PathBuf,

        /// Minimum height step between neighbours that makes a cliff
        #[arg(long, default_value_t = DEFAULT_STEP)]
        step: u8,
    },
}

// ── Helpers ──────────────────────────────────────────────────────────────────

fn read_props(dir: &Path) -> Result<MapProps> {
    let path = dir.join("map.json");
    let file = File::open(&path).with_context(|| format!("cannot read {}", path.display()))?;
    MapProps::from_reader(BufReader::new(file))
        .with_context(|| format!("cannot parse {}", path.display()))
}

/// Map name fallback: the source directory's base name.
fn dir_name(dir: &Path) -> String {
    fs::canonicalize(dir)
        .ok()
        .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
        .unwrap_or_else(|| "map".to_string())
}

fn create(path: &Path) -> Result<BufWriter<File>> {
    let file = File::create(path).with_context(|| format!("cannot create {}", path.display()))?;
    Ok(BufWriter::new(file))
}

// ── Subcommands ──────────────────────────────────────────────────────────────

fn compile_map(dir: &Path, threshold: u8) -> Result<()> {
    let props = read_props(dir)?;
    let env = props.environment()?;
    let name = props.name_or(&dir_name(dir));

    let sources = MapSources::open(dir)?;
    let map = MapCompiler::new(env).with_threshold(threshold).compile(&sources)?;
    let (width, height) = map.dims();
    if (width, height) != (props.width as usize, props.height as usize) {
        warn!(
            "map.json declares {}x{} but the images describe {width}x{height} tiles",
            props.width, props.height
        );
    }

    let build = dir.join("build");
    let maps = build.join("multiplay").join("maps");
    let map_dir = maps.join(&name);
    fs::create_dir_all(&map_dir)
        .with_context(|| format!("cannot create {}", map_dir.display()))?;

    let path = map_dir.join("game.map");
    let mut out = create(&path)?;
    map.write_to(&mut out)?;
    out.flush()?;
    info!("Done compiling {}", path.display());

    let path = maps.join(format!("{name}.gam"));
    let mut out = create(&path)?;
    write_gam(&mut out, width as u32, height as u32)?;
    out.flush()?;
    info!("Done generating {}", path.display());

    let path = build.join(format!("{name}.addon.lev"));
    let mut out = create(&path)?;
    write_lev(&mut out, &name, props.players, env)?;
    out.flush()?;
    info!("Done creating {}", path.display());

    for file in COMPANION_FILES {
        let src = dir.join(file);
        if !src.exists() {
            warn!("{} not found, not copied", src.display());
            continue;
        }
        fs::copy(&src, map_dir.join(file))
            .with_context(|| format!("cannot copy {}", src.display()))?;
    }
    info!("Copied companion files into {}", map_dir.display());
    Ok(())
}

fn compile_objects(dir: &Path) -> Result<()> {
    let props = read_props(dir)?;
    let symmetry = props.symmetry()?;

    for kind in ObjectKind::ALL {
        let stem = kind.file_stem();
        let src = dir.join(format!("{stem}.csv"));
        if !src.exists() {
            warn!("{} not found, skipping {stem} objects", src.display());
            continue;
        }
        let file = File::open(&src).with_context(|| format!("cannot read {}", src.display()))?;
        let objects = read_objects(BufReader::new(file))
            .with_context(|| format!("cannot parse {}", src.display()))?;
        let placed = apply_symmetry(&objects, props.width, props.height, symmetry);

        let dst = dir.join(format!("{stem}.json"));
        let mut out = create(&dst)?;
        write_json(&mut out, &to_json(kind, &placed))?;
        out.flush()?;
        info!("Wrote {} ({} objects)", dst.display(), placed.len());
    }
    Ok(())
}

fn generate_cliffmap(dir: &Path, step: u8) -> Result<()> {
    let raster = Raster::open(&dir.join(HEIGHTMAP_FILE), "heightmap")?;
    let heights = HeightGrid::from_raster(&raster)?;
    let mask = auto_cliff(&heights, step);

    let path = dir.join("autocliffmap.png");
    mask.to_image()
        .save(&path)
        .with_context(|| format!("cannot write {}", path.display()))?;
    info!(
        "Done generating cliffmap into {} with step of {step} ({} cliff pixels)",
        path.display(),
        mask.count()
    );
    Ok(())
}

// ── Entry point ──────────────────────────────────────────────────────────────

fn run(args: Args) -> Result<()> {
    match args.command {
        Command::Map { dir, threshold } => compile_map(&dir, threshold),
        Command::Objects { dir } => compile_objects(&dir),
        Command::Autocliff { dir, step } => generate_cliffmap(&dir, step),
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    if let Err(e) = run(Args::parse()) {
        error!("{e:#}");
        std::process::exit(1);
    }
}
