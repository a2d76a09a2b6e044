//! Binary `game.map` encoding plus the `.gam` and `.lev` companion files.
//!
//! `game.map` layout, little-endian:
//! ```text
//!   "map " | u32 version=10 | u32 width | u32 height
//!   width × height × [tile: u8, rotation: u8, height: u8]   (row-major)
//!   u32 gateway version=1 | u32 count | count × [x0, y0, x1, y1: u8]
//! ```

use std::io::Write;

use byteorder::{LittleEndian, WriteBytesExt};

use crate::environment::Environment;
use crate::error::MapError;
use crate::gateway::Gateway;
use crate::heightfield::HeightGrid;
use crate::terrain::TerrainGrid;

pub const MAP_MAGIC: &[u8; 4] = b"map ";
pub const MAP_VERSION: u32 = 10;
pub const GATEWAY_VERSION: u32 = 1;
pub const GAM_MAGIC: &[u8; 4] = b"game";
pub const GAM_VERSION: u32 = 8;
/// Level type written to `.lev` descriptors (skirmish/multiplayer).
pub const LEVEL_TYPE: u32 = 14;

fn dimension(what: &'static str, value: usize) -> Result<u32, MapError> {
    u32::try_from(value).map_err(|_| MapError::CoordinateOverflow { what, value })
}

fn coordinate(what: &'static str, value: usize) -> Result<u8, MapError> {
    u8::try_from(value).map_err(|_| MapError::CoordinateOverflow { what, value })
}

pub fn write_header<W: Write>(out: &mut W, width: u32, height: u32) -> Result<(), MapError> {
    out.write_all(MAP_MAGIC)?;
    out.write_u32::<LittleEndian>(MAP_VERSION)?;
    out.write_u32::<LittleEndian>(width)?;
    out.write_u32::<LittleEndian>(height)?;
    Ok(())
}

/// Write one `[tile, rotation, height]` triple per tile, row-major.
///
/// Tile indices only keep their low byte. Returns how many tiles were
/// truncated that way.
pub fn write_tiles<W: Write>(
    out: &mut W,
    grid: &TerrainGrid,
    heights: &HeightGrid,
) -> Result<usize, MapError> {
    if heights.tile_dims() != (grid.width, grid.height) {
        return Err(MapError::DimensionMismatch {
            what: "heightmap",
            expected_w: grid.width + 1,
            expected_h: grid.height + 1,
            found_w: heights.width,
            found_h: heights.height,
        });
    }
    let mut truncated = 0;
    let mut row = Vec::with_capacity(grid.width * 3);
    for y in 0..grid.height {
        row.clear();
        for x in 0..grid.width {
            let tile = grid.tile(x, y);
            if tile > u8::MAX as u16 {
                truncated += 1;
            }
            row.push(tile as u8);
            row.push(grid.rotation(x, y));
            row.push(heights.get(x, y));
        }
        out.write_all(&row)?;
    }
    Ok(truncated)
}

/// Write the gateway section. Coordinates must fit in a byte.
pub fn write_gateways<W: Write>(out: &mut W, gateways: &[Gateway]) -> Result<(), MapError> {
    out.write_u32::<LittleEndian>(GATEWAY_VERSION)?;
    out.write_u32::<LittleEndian>(dimension("gateway count", gateways.len())?)?;
    for gate in gateways {
        out.write_u8(coordinate("gateway x", gate.start_x)?)?;
        out.write_u8(coordinate("gateway y", gate.start_y)?)?;
        out.write_u8(coordinate("gateway x", gate.end_x)?)?;
        out.write_u8(coordinate("gateway y", gate.end_y)?)?;
    }
    Ok(())
}

/// Write a complete `game.map` stream. The header carries the tile grid size.
///
/// Every gateway must lie inside the tile grid; nothing is written otherwise.
pub fn write_map<W: Write>(
    out: &mut W,
    grid: &TerrainGrid,
    heights: &HeightGrid,
    gateways: &[Gateway],
) -> Result<(), MapError> {
    for gate in gateways {
        if gate.end_x >= grid.width {
            return Err(MapError::CoordinateOverflow { what: "gateway x", value: gate.end_x });
        }
        if gate.end_y >= grid.height {
            return Err(MapError::CoordinateOverflow { what: "gateway y", value: gate.end_y });
        }
    }
    write_header(
        out,
        dimension("map width", grid.width)?,
        dimension("map height", grid.height)?,
    )?;
    let truncated = write_tiles(out, grid, heights)?;
    if truncated > 0 {
        log::warn!("{truncated} tile index(es) above 255 truncated to their low byte");
    }
    write_gateways(out, gateways)
}

/// Write the fixed 52-byte `.gam` file.
pub fn write_gam<W: Write>(out: &mut W, width: u32, height: u32) -> Result<(), MapError> {
    out.write_all(GAM_MAGIC)?;
    out.write_u32::<LittleEndian>(GAM_VERSION)?;
    for _ in 0..4 {
        out.write_u32::<LittleEndian>(0)?;
    }
    out.write_u32::<LittleEndian>(width)?;
    out.write_u32::<LittleEndian>(height)?;
    for _ in 0..5 {
        out.write_u32::<LittleEndian>(0)?;
    }
    Ok(())
}

/// Write the `.addon.lev` level descriptor.
pub fn write_lev<W: Write>(
    out: &mut W,
    name: &str,
    players: u32,
    env: Environment,
) -> Result<(), MapError> {
    write!(
        out,
        "\nlevel   {name}\nplayers {players}\ntype    {LEVEL_TYPE}\ndataset {}\ngame    \"multiplay/maps/{name}.gam\"\n",
        env.dataset()
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(width: usize, height: usize, tiles: Vec<u16>, rotations: Vec<u8>) -> TerrainGrid {
        TerrainGrid { width, height, tiles, rotations }
    }

    #[test]
    fn header_bytes() {
        let mut buf = Vec::new();
        write_header(&mut buf, 2, 2).unwrap();
        assert_eq!(
            buf,
            [0x6D, 0x61, 0x70, 0x20, 0x0A, 0, 0, 0, 0x02, 0, 0, 0, 0x02, 0, 0, 0]
        );
    }

    #[test]
    fn header_width_is_little_endian() {
        let mut buf = Vec::new();
        write_header(&mut buf, 0x0102, 3).unwrap();
        assert_eq!(&buf[8..12], &[0x02, 0x01, 0, 0]);
    }

    #[test]
    fn full_map_layout() {
        let mut heights = HeightGrid::new(3, 2, 0);
        heights.set(0, 0, 11);
        heights.set(1, 0, 22);
        heights.set(2, 0, 99); // outside the tile grid, never written
        let terrain = grid(2, 1, vec![46, 5], vec![0x10, 0x00]);
        let gates = [Gateway { start_x: 0, start_y: 0, end_x: 1, end_y: 0 }];

        let mut buf = Vec::new();
        write_map(&mut buf, &terrain, &heights, &gates).unwrap();

        let mut expected = vec![0x6D, 0x61, 0x70, 0x20, 10, 0, 0, 0, 2, 0, 0, 0, 1, 0, 0, 0];
        expected.extend([46, 0x10, 11, 5, 0x00, 22]);
        expected.extend([1, 0, 0, 0, 1, 0, 0, 0, 0, 0, 1, 0]);
        assert_eq!(buf, expected);
    }

    #[test]
    fn large_tile_indices_keep_low_byte() {
        let heights = HeightGrid::new(2, 2, 7);
        let terrain = grid(1, 1, vec![300], vec![0x20]);
        let mut buf = Vec::new();
        let truncated = write_tiles(&mut buf, &terrain, &heights).unwrap();
        assert_eq!(truncated, 1);
        assert_eq!(buf, [44, 0x20, 7]);
    }

    #[test]
    fn heights_must_match_grid() {
        let terrain = grid(2, 2, vec![0; 4], vec![0; 4]);
        let err = write_tiles(&mut Vec::<u8>::new(), &terrain, &HeightGrid::new(2, 2, 0)).unwrap_err();
        assert!(matches!(err, MapError::DimensionMismatch { .. }));
    }

    #[test]
    fn gateway_coordinates_must_fit_a_byte() {
        let gates = [Gateway { start_x: 256, start_y: 0, end_x: 300, end_y: 0 }];
        let err = write_gateways(&mut Vec::<u8>::new(), &gates).unwrap_err();
        assert!(matches!(err, MapError::CoordinateOverflow { value: 256, .. }));
    }

    #[test]
    fn gateways_outside_the_tile_grid_are_rejected() {
        let terrain = grid(3, 2, vec![0; 6], vec![0; 6]);
        let heights = HeightGrid::new(4, 3, 0);
        let gates = [Gateway { start_x: 3, start_y: 0, end_x: 3, end_y: 0 }];
        let mut buf = Vec::new();
        let err = write_map(&mut buf, &terrain, &heights, &gates).unwrap_err();
        assert!(matches!(err, MapError::CoordinateOverflow { what: "gateway x", value: 3 }));
        assert!(buf.is_empty());

        let gates = [Gateway { start_x: 0, start_y: 2, end_x: 0, end_y: 2 }];
        let err = write_map(&mut buf, &terrain, &heights, &gates).unwrap_err();
        assert!(matches!(err, MapError::CoordinateOverflow { what: "gateway y", value: 2 }));
    }

    #[test]
    fn empty_gateway_section() {
        let mut buf = Vec::new();
        write_gateways(&mut buf, &[]).unwrap();
        assert_eq!(buf, [1, 0, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn gam_layout() {
        let mut buf = Vec::new();
        write_gam(&mut buf, 64, 32).unwrap();
        assert_eq!(buf.len(), 52);
        assert_eq!(&buf[0..4], b"game");
        assert_eq!(&buf[4..8], &[8, 0, 0, 0]);
        assert!(buf[8..24].iter().all(|&b| b == 0));
        assert_eq!(&buf[24..28], &[64, 0, 0, 0]);
        assert_eq!(&buf[28..32], &[32, 0, 0, 0]);
        assert!(buf[32..].iter().all(|&b| b == 0));
    }

    #[test]
    fn lev_text() {
        let mut buf = Vec::new();
        write_lev(&mut buf, "Canyon", 4, Environment::Rockies).unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "\nlevel   Canyon\nplayers 4\ntype    14\ndataset MULTI_CAM_3\ngame    \"multiplay/maps/Canyon.gam\"\n"
        );
    }
}
