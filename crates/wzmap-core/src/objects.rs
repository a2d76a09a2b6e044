//! Object placements: CSV rows in, engine JSON mappings out.

use std::io::{Read, Write};

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::error::MapError;
use crate::symmetry::{expand, Symmetry};

/// World units per tile.
pub const TILE_UNITS: f64 = 128.0;
/// Full turn in engine rotation units.
pub const FULL_TURN: i64 = 65536;
/// Id prefix of objects placed relative to player 0 and mirrored to others.
pub const PLAYER_RELATIVE_PREFIX: &str = "0P-";

/// One placed droid, structure or feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedObject {
    pub id: String,
    /// Template name for droids, object name otherwise.
    pub name: String,
    /// Fractional tile coordinates.
    pub x: f64,
    pub y: f64,
    /// Degrees in [0, 360).
    pub rotation: f64,
    pub owner: u32,
    /// Footprint in tiles along each axis (1 or 2).
    pub size: u32,
}

impl PlacedObject {
    pub fn is_player_relative(&self) -> bool {
        self.id.starts_with(PLAYER_RELATIVE_PREFIX)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    Droid,
    Structure,
    Feature,
}

impl ObjectKind {
    pub const ALL: [ObjectKind; 3] = [ObjectKind::Droid, ObjectKind::Structure, ObjectKind::Feature];

    /// Base file name shared by the CSV source and JSON output.
    pub fn file_stem(self) -> &'static str {
        match self {
            ObjectKind::Droid => "droid",
            ObjectKind::Structure => "struct",
            ObjectKind::Feature => "feature",
        }
    }
}

/// Tile coordinate → world units at the tile centre (round half to even).
pub fn tile_to_world(t: f64) -> i64 {
    (t * TILE_UNITS).round_ties_even() as i64 + 64
}

/// Degrees → engine rotation units.
pub fn degrees_to_units(deg: f64) -> i64 {
    ((deg / 360.0 * FULL_TURN as f64).round_ties_even() as i64).rem_euclid(FULL_TURN)
}

fn field<'a>(record: &'a csv::StringRecord, index: usize, name: &str, line: u64) -> Result<&'a str, MapError> {
    record.get(index).map(str::trim).ok_or_else(|| MapError::InvalidRow {
        line,
        reason: format!("missing column {name}"),
    })
}

fn number<T: std::str::FromStr>(value: &str, name: &str, line: u64) -> Result<T, MapError> {
    value.parse().map_err(|_| MapError::InvalidRow {
        line,
        reason: format!("{name} {value:?} is not a number"),
    })
}

/// Parse `id,name,x,y,rot,owner[,size]` rows. The first row is a header and
/// is skipped; an empty or missing size means 1.
pub fn read_objects<R: Read>(reader: R) -> Result<Vec<PlacedObject>, MapError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let mut objects = Vec::new();
    for record in rdr.records() {
        let record = record?;
        let line = record.position().map_or(0, |p| p.line());
        let size = match record.get(6).map(str::trim) {
            Some(s) if !s.is_empty() => number(s, "size", line)?,
            _ => 1,
        };
        objects.push(PlacedObject {
            id: field(&record, 0, "id", line)?.to_string(),
            name: field(&record, 1, "name", line)?.to_string(),
            x: number(field(&record, 2, "x", line)?, "x", line)?,
            y: number(field(&record, 3, "y", line)?, "y", line)?,
            rotation: number(field(&record, 4, "rot", line)?, "rot", line)?,
            owner: number(field(&record, 5, "owner", line)?, "owner", line)?,
            size,
        });
    }
    Ok(objects)
}

/// Every source object followed by its symmetric copies.
///
/// Only player-relative objects are mirrored. Unsupported symmetry/player
/// pairs are logged and skipped.
pub fn apply_symmetry(
    objects: &[PlacedObject],
    map_width: u32,
    map_height: u32,
    symmetry: Option<Symmetry>,
) -> Vec<PlacedObject> {
    let mut out = Vec::with_capacity(objects.len());
    for obj in objects {
        out.push(obj.clone());
        let Some(symmetry) = symmetry else { continue };
        if !obj.is_player_relative() {
            continue;
        }
        for derived in expand(obj, map_width, map_height, symmetry) {
            match derived {
                Ok(o) => out.push(o),
                Err(e) => log::error!("{}: {e}", obj.id),
            }
        }
    }
    out
}

/// Engine JSON mapping `id → record` for one object kind.
///
/// Structures are anchored at their tile corner rather than its centre.
pub fn to_json(kind: ObjectKind, objects: &[PlacedObject]) -> Value {
    let mut map = Map::new();
    for o in objects {
        let (mut px, mut py) = (tile_to_world(o.x), tile_to_world(o.y));
        if kind == ObjectKind::Structure {
            px -= 64;
            py -= 64;
        }
        let rotation = json!([degrees_to_units(o.rotation), 0, 0]);
        let record = match kind {
            ObjectKind::Droid => json!({
                "position": [px, py],
                "rotation": rotation,
                "startpos": o.owner,
                "template": o.name,
            }),
            ObjectKind::Structure => json!({
                "position": [px, py],
                "rotation": rotation,
                "startpos": o.owner,
                "name": o.name,
            }),
            ObjectKind::Feature => json!({
                "position": [px, py],
                "rotation": rotation,
                "name": o.name,
            }),
        };
        map.insert(o.id.clone(), record);
    }
    Value::Object(map)
}

/// Pretty-print with four-space indentation.
pub fn write_json<W: Write>(out: W, value: &Value) -> Result<(), MapError> {
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(out, formatter);
    value.serialize(&mut ser)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &str = "id,name,x,y,rot,owner,size\n\
        0P-hq,A0CommandCentre,2,3,90,0,2\n\
        oil-1,OilResource,5.5,6,0,0,\n\
        0P-truck,ConstructionDroid,1.25,1,45,0\n";

    #[test]
    fn world_coordinates() {
        assert_eq!(tile_to_world(0.0), 64);
        assert_eq!(tile_to_world(2.0), 320);
        assert_eq!(tile_to_world(1.5), 256);
        // 0.00390625 * 128 = 0.5 rounds to even.
        assert_eq!(tile_to_world(0.00390625), 64);
    }

    #[test]
    fn rotation_units() {
        assert_eq!(degrees_to_units(0.0), 0);
        assert_eq!(degrees_to_units(90.0), 16384);
        assert_eq!(degrees_to_units(360.0), 0);
        assert_eq!(degrees_to_units(1.0), 182);
    }

    #[test]
    fn read_rows_with_optional_size() {
        let objs = read_objects(CSV.as_bytes()).unwrap();
        assert_eq!(objs.len(), 3);
        assert_eq!(objs[0].size, 2);
        assert_eq!(objs[1].size, 1);
        assert_eq!(objs[2].size, 1);
        assert_eq!(objs[1].x, 5.5);
        assert!(objs[0].is_player_relative());
        assert!(!objs[1].is_player_relative());
    }

    #[test]
    fn bad_number_reports_row() {
        let err = read_objects("id,name,x,y,rot,owner\na,b,left,0,0,0\n".as_bytes()).unwrap_err();
        assert!(matches!(err, MapError::InvalidRow { line: 2, .. }), "{err}");
    }

    #[test]
    fn symmetry_expands_player_relative_only() {
        let objs = read_objects(CSV.as_bytes()).unwrap();
        let all = apply_symmetry(&objs, 10, 10, Some(Symmetry::Central));
        let ids: Vec<_> = all.iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids, ["0P-hq", "1P-hq", "oil-1", "0P-truck", "1P-truck"]);
        assert_eq!((all[1].x, all[1].y), (8.0, 7.0));
        assert_eq!(apply_symmetry(&objs, 10, 10, None).len(), 3);
    }

    #[test]
    fn unsupported_pairs_are_skipped() {
        let objs = read_objects(CSV.as_bytes()).unwrap();
        let all = apply_symmetry(&objs, 10, 10, Some(Symmetry::CrossStraight90));
        assert_eq!(all.len(), 3);
    }

    #[test]
    fn droid_json() {
        let objs = read_objects(CSV.as_bytes()).unwrap();
        let value = to_json(ObjectKind::Droid, &objs[2..]);
        assert_eq!(
            value,
            json!({
                "0P-truck": {
                    "position": [224, 192],
                    "rotation": [8192, 0, 0],
                    "startpos": 0,
                    "template": "ConstructionDroid",
                }
            })
        );
    }

    #[test]
    fn structure_json_is_corner_anchored() {
        let objs = read_objects(CSV.as_bytes()).unwrap();
        let value = to_json(ObjectKind::Structure, &objs[..1]);
        assert_eq!(value["0P-hq"]["position"], json!([256, 384]));
        assert_eq!(value["0P-hq"]["name"], "A0CommandCentre");
        assert_eq!(value["0P-hq"]["rotation"], json!([16384, 0, 0]));
    }

    #[test]
    fn feature_json_has_no_startpos() {
        let objs = read_objects(CSV.as_bytes()).unwrap();
        let value = to_json(ObjectKind::Feature, &objs[1..2]);
        let record = value["oil-1"].as_object().unwrap();
        assert!(!record.contains_key("startpos"));
        assert_eq!(record["position"], json!([768, 832]));
    }

    #[test]
    fn json_keeps_insertion_order_and_indent() {
        let objs = read_objects(CSV.as_bytes()).unwrap();
        let mut buf = Vec::new();
        write_json(&mut buf, &to_json(ObjectKind::Feature, &objs)).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.starts_with("{\n    \"0P-hq\": {\n        \"position\""));
        let hq = text.find("0P-hq").unwrap();
        let oil = text.find("oil-1").unwrap();
        let truck = text.find("0P-truck").unwrap();
        assert!(hq < oil && oil < truck);
    }
}
