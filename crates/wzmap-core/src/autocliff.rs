//! Cliffmap generation from height steps.

use crate::heightfield::HeightGrid;
use crate::mask::Mask;

/// Default height step (0-255 scale), roughly a 35° slope.
pub const DEFAULT_STEP: u8 = 50;

/// Mark every pixel whose height differs by at least `step` from its right,
/// lower or lower-right neighbour.
///
/// The scan stops one pixel short of the tile grid edge, so the last two rows
/// and columns are never marked.
pub fn auto_cliff(heights: &HeightGrid, step: u8) -> Mask {
    let mut mask = Mask::new(heights.width, heights.height);
    for y in 0..heights.height.saturating_sub(2) {
        for x in 0..heights.width.saturating_sub(2) {
            let h = heights.get(x, y);
            let steep = [
                heights.get(x + 1, y),
                heights.get(x, y + 1),
                heights.get(x + 1, y + 1),
            ]
            .iter()
            .any(|&n| h.abs_diff(n) >= step);
            mask.set(x, y, steep);
        }
    }
    mask
}
