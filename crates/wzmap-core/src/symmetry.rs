//! Symmetry transforms for player-relative object placements.
//!
//! Two-player modes derive one placement (player 1). Four-player "cross" modes
//! pair two axis rules: players 1 and 3 use one rule, player 2 the other, and
//! player 3 is derived from player 2's placement so the four copies land in
//! four quadrants.

use std::fmt;
use std::str::FromStr;

use crate::error::MapError;
use crate::objects::PlacedObject;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Symmetry {
    NorthSouth,
    EastWest,
    Central,
    NorthWestSouthEast,
    SouthWestNorthEast,
    CrossStraightNvS,
    CrossStraightEvW,
    CrossStraight90,
    CrossDiagNWvSE,
    CrossDiagNEvSW,
    CrossDiag90,
}

/// A single geometric mirror applied to one placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rule {
    /// Mirror across the horizontal axis.
    NorthSouth,
    /// Mirror across the vertical axis.
    EastWest,
    /// Point symmetry through the map centre.
    Central,
    NorthWestSouthEast,
    SouthWestNorthEast,
}

impl Symmetry {
    pub const ALL: [Symmetry; 11] = [
        Symmetry::NorthSouth,
        Symmetry::EastWest,
        Symmetry::Central,
        Symmetry::NorthWestSouthEast,
        Symmetry::SouthWestNorthEast,
        Symmetry::CrossStraightNvS,
        Symmetry::CrossStraightEvW,
        Symmetry::CrossStraight90,
        Symmetry::CrossDiagNWvSE,
        Symmetry::CrossDiagNEvSW,
        Symmetry::CrossDiag90,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Symmetry::NorthSouth => "N-S",
            Symmetry::EastWest => "E-W",
            Symmetry::Central => "180",
            Symmetry::NorthWestSouthEast => "NW-SE",
            Symmetry::SouthWestNorthEast => "SW-NE",
            Symmetry::CrossStraightNvS => "cross-straight-NvS",
            Symmetry::CrossStraightEvW => "cross-straight-EvW",
            Symmetry::CrossStraight90 => "cross-straight-90",
            Symmetry::CrossDiagNWvSE => "cross-diag-NWvSE",
            Symmetry::CrossDiagNEvSW => "cross-diag-NEvSW",
            Symmetry::CrossDiag90 => "cross-diag-90",
        }
    }

    pub fn is_four_player(self) -> bool {
        matches!(
            self,
            Symmetry::CrossStraightNvS
                | Symmetry::CrossStraightEvW
                | Symmetry::CrossStraight90
                | Symmetry::CrossDiagNWvSE
                | Symmetry::CrossDiagNEvSW
                | Symmetry::CrossDiag90
        )
    }

    fn rule_for(self, player: u32) -> Option<Rule> {
        let odd = player == 1 || player == 3;
        let rule = match self {
            Symmetry::NorthSouth => Rule::NorthSouth,
            Symmetry::EastWest => Rule::EastWest,
            Symmetry::Central => Rule::Central,
            Symmetry::NorthWestSouthEast => Rule::NorthWestSouthEast,
            Symmetry::SouthWestNorthEast => Rule::SouthWestNorthEast,
            Symmetry::CrossStraightNvS if odd => Rule::EastWest,
            Symmetry::CrossStraightNvS if player == 2 => Rule::NorthSouth,
            // Pairing kept as authored; it does not mirror NvS.
            Symmetry::CrossStraightEvW if odd => Rule::NorthSouth,
            Symmetry::CrossStraightEvW if player == 2 => Rule::EastWest,
            Symmetry::CrossDiagNWvSE if odd => Rule::SouthWestNorthEast,
            Symmetry::CrossDiagNWvSE if player == 2 => Rule::NorthWestSouthEast,
            Symmetry::CrossDiagNEvSW if odd => Rule::NorthWestSouthEast,
            Symmetry::CrossDiagNEvSW if player == 2 => Rule::SouthWestNorthEast,
            _ => return None,
        };
        Some(rule)
    }
}

impl FromStr for Symmetry {
    type Err = MapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "S-N" => Ok(Symmetry::NorthSouth),
            "W-E" => Ok(Symmetry::EastWest),
            _ => Symmetry::ALL
                .into_iter()
                .find(|sym| sym.name() == s)
                .ok_or_else(|| MapError::UnknownSymmetry(s.to_string())),
        }
    }
}

impl fmt::Display for Symmetry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Replace the leading player digit of `id` with `player`.
fn player_id(id: &str, player: u32) -> String {
    let rest = id.char_indices().nth(1).map_or("", |(i, _)| &id[i..]);
    format!("{player}{rest}")
}

/// Derive the placement of `obj` for `player` on a `map_width × map_height`
/// tile map.
///
/// Coordinates are mirrored over `size - 1` (last tile index). Objects with a
/// 2-tile footprint are anchored at their top-left tile, so mirrored axes get
/// a one-tile offset for them.
pub fn transform(
    obj: &PlacedObject,
    map_width: u32,
    map_height: u32,
    symmetry: Symmetry,
    player: u32,
) -> Result<PlacedObject, MapError> {
    if map_width < 2 || map_height < 2 {
        return Err(MapError::TooSmall {
            width: map_width as usize,
            height: map_height as usize,
        });
    }
    let rule = symmetry
        .rule_for(player)
        .ok_or(MapError::UnsupportedSymmetry { symmetry, player })?;

    let w = f64::from(map_width - 1);
    let h = f64::from(map_height - 1);
    let offset = if obj.size == 2 { 1.0 } else { 0.0 };
    let rot = obj.rotation;

    let (x, y, rotation) = match rule {
        Rule::NorthSouth => (obj.x, h - obj.y, 180.0 - rot),
        Rule::EastWest => (w - obj.x + offset, obj.y, 360.0 - rot),
        Rule::Central => (w - obj.x + offset, h - obj.y + offset, 180.0 + rot),
        Rule::NorthWestSouthEast => {
            let axis = ((h / w).atan().to_degrees() + 90.0).rem_euclid(360.0);
            (
                (h - obj.y) / h * w + offset,
                (w - obj.x) / w * h + offset,
                axis - (rot - axis),
            )
        }
        Rule::SouthWestNorthEast => {
            let axis = ((-h / w).atan().to_degrees() + 90.0).rem_euclid(360.0);
            (obj.y / h * w, obj.x / w * h, axis - (rot - axis))
        }
    };

    Ok(PlacedObject {
        id: player_id(&obj.id, player),
        name: obj.name.clone(),
        x,
        y,
        rotation: rotation.rem_euclid(360.0),
        owner: player,
        size: obj.size,
    })
}

/// All derived placements of `obj` under `symmetry`, one result per derived
/// player. Player 3 of a four-player mode is derived from player 2's
/// placement; when that fails player 3 is reported unsupported too.
pub fn expand(
    obj: &PlacedObject,
    map_width: u32,
    map_height: u32,
    symmetry: Symmetry,
) -> Vec<Result<PlacedObject, MapError>> {
    if !symmetry.is_four_player() {
        return vec![transform(obj, map_width, map_height, symmetry, 1)];
    }
    let first = transform(obj, map_width, map_height, symmetry, 1);
    let second = transform(obj, map_width, map_height, symmetry, 2);
    let third = match &second {
        Ok(o) => transform(o, map_width, map_height, symmetry, 3),
        Err(_) => Err(MapError::UnsupportedSymmetry { symmetry, player: 3 }),
    };
    vec![first, second, third]
}
