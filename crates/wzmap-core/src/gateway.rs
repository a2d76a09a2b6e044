//! Gateway extraction from a painted gatemap.
//!
//! Gateways are straight horizontal or vertical lines of marked pixels. The
//! scan is row-major; at each unvisited marked pixel the longer of the
//! rightward and downward runs becomes a gateway and its cells are retired.

use serde::{Deserialize, Serialize};

use crate::mask::Mask;

/// A gateway segment in tile coordinates. Always axis-aligned:
/// `start_x == end_x` or `start_y == end_y`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gateway {
    pub start_x: usize,
    pub start_y: usize,
    pub end_x: usize,
    pub end_y: usize,
}

impl Gateway {
    pub fn is_horizontal(&self) -> bool {
        self.start_y == self.end_y
    }

    /// Number of tiles the gateway covers.
    pub fn tile_count(&self) -> usize {
        (self.end_x - self.start_x) + (self.end_y - self.start_y) + 1
    }
}

/// Last marked index of the run starting at `start`, stepping while `marked`
/// holds and the index stays below `bound`.
fn run_end(start: usize, bound: usize, marked: impl Fn(usize) -> bool) -> usize {
    let mut end = start;
    while end + 1 < bound && marked(end + 1) {
        end += 1;
    }
    end
}

/// Find every gateway in `mask`, in discovery order.
///
/// A `w × h` gatemap describes `(w - 1) × (h - 1)` tiles; the last pixel row
/// and column have no tile under them and are ignored, so every gateway lies
/// inside the tile grid.
///
/// The horizontal run wins only when strictly longer than the vertical one,
/// so a lone pixel or a square blob resolves to a vertical segment.
pub fn extract_gateways(mask: &Mask) -> Vec<Gateway> {
    let tiles_w = mask.width.saturating_sub(1);
    let tiles_h = mask.height.saturating_sub(1);
    let mut visited = vec![false; tiles_w * tiles_h];
    let mut gates = Vec::new();

    for y in 0..tiles_h {
        for x in 0..tiles_w {
            if visited[y * tiles_w + x] {
                continue;
            }
            if !mask.get(x, y) {
                visited[y * tiles_w + x] = true;
                continue;
            }

            let end_x = run_end(x, tiles_w, |gx| mask.get(gx, y));
            let end_y = run_end(y, tiles_h, |gy| mask.get(x, gy));

            let gate = if end_x - x > end_y - y {
                Gateway { start_x: x, start_y: y, end_x, end_y: y }
            } else {
                Gateway { start_x: x, start_y: y, end_x: x, end_y }
            };

            for gy in gate.start_y..=gate.end_y {
                for gx in gate.start_x..=gate.end_x {
                    visited[gy * tiles_w + gx] = true;
                }
            }
            gates.push(gate);
        }
    }

    gates
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mask_from(rows: &[&str]) -> Mask {
        let mut mask = Mask::new(rows[0].len(), rows.len());
        for (y, row) in rows.iter().enumerate() {
            for (x, c) in row.chars().enumerate() {
                mask.set(x, y, c == '#');
            }
        }
        mask
    }

    #[test]
    fn single_horizontal_run() {
        let gates = extract_gateways(&mask_from(&["###.", "...."]));
        assert_eq!(gates, vec![Gateway { start_x: 0, start_y: 0, end_x: 2, end_y: 0 }]);
        assert!(gates[0].is_horizontal());
        assert_eq!(gates[0].tile_count(), 3);
    }

    #[test]
    fn horizontal_run_in_larger_mask() {
        let gates = extract_gateways(&mask_from(&["###..", ".....", "....."]));
        assert_eq!(gates, vec![Gateway { start_x: 0, start_y: 0, end_x: 2, end_y: 0 }]);
    }

    #[test]
    fn vertical_run() {
        let gates = extract_gateways(&mask_from(&["..#.", "..#.", "..#.", "...."]));
        assert_eq!(gates, vec![Gateway { start_x: 2, start_y: 0, end_x: 2, end_y: 2 }]);
    }

    #[test]
    fn lone_pixel_is_point_gateway() {
        let gates = extract_gateways(&mask_from(&["...", ".#.", "..."]));
        assert_eq!(gates, vec![Gateway { start_x: 1, start_y: 1, end_x: 1, end_y: 1 }]);
    }

    #[test]
    fn equal_runs_resolve_vertical() {
        let gates = extract_gateways(&mask_from(&["##.", "##.", "..."]));
        assert_eq!(
            gates,
            vec![
                Gateway { start_x: 0, start_y: 0, end_x: 0, end_y: 1 },
                Gateway { start_x: 1, start_y: 0, end_x: 1, end_y: 1 },
            ]
        );
    }

    #[test]
    fn discovery_order_is_row_major() {
        let gates = extract_gateways(&mask_from(&[
            "...#.",
            "##.#.",
            ".....",
            ".###.",
            ".....",
        ]));
        assert_eq!(
            gates,
            vec![
                Gateway { start_x: 3, start_y: 0, end_x: 3, end_y: 1 },
                Gateway { start_x: 0, start_y: 1, end_x: 1, end_y: 1 },
                Gateway { start_x: 1, start_y: 3, end_x: 3, end_y: 3 },
            ]
        );
    }

    #[test]
    fn last_pixel_row_and_column_are_outside_the_tile_grid() {
        let gates = extract_gateways(&mask_from(&["...#", "....", "#..."]));
        assert!(gates.is_empty(), "{gates:?}");
    }

    #[test]
    fn runs_stop_at_the_tile_grid_edge() {
        let gates = extract_gateways(&mask_from(&["....", ".###", ".#..", ".#.."]));
        assert_eq!(gates, vec![Gateway { start_x: 1, start_y: 1, end_x: 1, end_y: 2 }]);
        let gates = extract_gateways(&mask_from(&["....", ".###", "....", "...."]));
        assert_eq!(gates, vec![Gateway { start_x: 1, start_y: 1, end_x: 2, end_y: 1 }]);
        for g in &gates {
            assert!(g.end_x < 3 && g.end_y < 3);
        }
    }

    #[test]
    fn empty_mask_has_no_gateways() {
        assert!(extract_gateways(&Mask::new(4, 4)).is_empty());
    }
}
