//! Cliff shape and orientation from the four corner heights of a tile.
//!
//! Corner order is clockwise starting at the top-left:
//! ```text
//!   0 ── 1
//!   │    │
//!   3 ── 2
//! ```

use std::fmt;

/// Default height difference (0-255 scale) below which a block counts as flat.
pub const DEFAULT_FLATNESS_THRESHOLD: u8 = 30;

/// Which cliff art variant a tile needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CliffShape {
    Flat,
    Straight,
    Corner,
}

/// Quarter-turn rotation of a tile's texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Rotation {
    #[default]
    R0,
    R90,
    R180,
    R270,
}

impl Rotation {
    pub fn degrees(self) -> u16 {
        match self {
            Rotation::R0 => 0,
            Rotation::R90 => 90,
            Rotation::R180 => 180,
            Rotation::R270 => 270,
        }
    }

    /// Nearest lower quarter turn of `degrees` taken mod 360.
    pub fn from_degrees(degrees: u16) -> Self {
        match (degrees % 360) / 90 {
            0 => Rotation::R0,
            1 => Rotation::R90,
            2 => Rotation::R180,
            _ => Rotation::R270,
        }
    }

    /// Compose two rotations.
    pub fn then(self, other: Rotation) -> Self {
        Self::from_degrees(self.degrees() + other.degrees())
    }

    /// Rotation bits of a map tile record (mask `0x30`).
    pub fn mask(self) -> u8 {
        match self {
            Rotation::R0 => 0x00,
            Rotation::R90 => 0x10,
            Rotation::R180 => 0x20,
            Rotation::R270 => 0x30,
        }
    }
}

impl fmt::Display for Rotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}°", self.degrees())
    }
}

/// Result of classifying one 2×2 height block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CliffClass {
    pub shape: CliffShape,
    pub rotation: Rotation,
    /// Set when the corner pattern has no clean reading (diagonal pair, or no
    /// lone high/low corner) and a default was substituted.
    pub ambiguous: bool,
}

impl CliffClass {
    const FLAT: CliffClass = CliffClass {
        shape: CliffShape::Flat,
        rotation: Rotation::R0,
        ambiguous: false,
    };
}

/// Rotation keyed by a single distinguished corner (lone high or lone low).
fn corner_rotation(corner: usize) -> Rotation {
    match corner {
        0 => Rotation::R270,
        1 => Rotation::R0,
        2 => Rotation::R90,
        _ => Rotation::R180,
    }
}

/// Classify a block of corner heights `[tl, tr, br, bl]`.
///
/// A block whose height spread is within `threshold` is flat. Otherwise each
/// corner more than `threshold` above the lowest corner is "high", and the
/// count and position of high corners select the shape and base rotation.
pub fn classify(block: [u8; 4], threshold: u8) -> CliffClass {
    let min = u16::from(block.iter().copied().min().unwrap_or(0));
    let max = u16::from(block.iter().copied().max().unwrap_or(0));
    let threshold = u16::from(threshold);

    if max - min <= threshold {
        return CliffClass::FLAT;
    }

    let high = block.map(|h| u16::from(h) > min + threshold);
    let count = high.iter().filter(|&&h| h).count();

    match count {
        2 => {
            let rotation = match high {
                [true, true, false, false] => Some(Rotation::R0),
                [false, true, true, false] => Some(Rotation::R90),
                [false, false, true, true] => Some(Rotation::R180),
                [true, false, false, true] => Some(Rotation::R270),
                _ => None,
            };
            CliffClass {
                shape: CliffShape::Straight,
                rotation: rotation.unwrap_or(Rotation::R90),
                ambiguous: rotation.is_none(),
            }
        }
        1 => CliffClass {
            shape: CliffShape::Corner,
            rotation: corner_rotation(high.iter().position(|&h| h).unwrap_or(3)),
            ambiguous: false,
        },
        3 => CliffClass {
            shape: CliffShape::Corner,
            rotation: corner_rotation(high.iter().position(|&h| !h).unwrap_or(3)),
            ambiguous: false,
        },
        // Unreachable while max - min > threshold (the highest corner is
        // always high, the lowest never is), kept total for safety.
        _ => CliffClass {
            ambiguous: true,
            ..CliffClass::FLAT
        },
    }
}
