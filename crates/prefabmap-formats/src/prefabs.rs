//! Prefab placement (`prefabs.xml`) and per-prefab metadata XML.

use crate::discover::find_files;
use crate::xml_error;
use ahash::AHashMap;
use prefabmap_common::PrefabMapResult;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, warn};

/// One `decoration` entry of `prefabs.xml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrefabPlacement {
    /// Prefab name, lower-cased.
    pub name: String,
    /// World position `(x, y, z)`.
    pub position: [f64; 3],
    /// Placement rotation in quarter turns.
    pub rotation: u8,
    /// Footprint size along x, when the placement carries one.
    pub size_x: Option<f64>,
    /// Footprint size along z, when the placement carries one.
    pub size_z: Option<f64>,
}

impl PrefabPlacement {
    /// World `(x, z)` of the footprint center.
    ///
    /// Positions mark the footprint's south-west corner; placements without
    /// a size are treated as points.
    #[must_use]
    pub fn footprint_center(&self) -> (f64, f64) {
        let [x, _, z] = self.position;
        (
            x + self.size_x.unwrap_or(0.0) / 2.0,
            z + self.size_z.unwrap_or(0.0) / 2.0,
        )
    }
}

/// Parses `"x,y,z"`.
fn parse_position(value: &str) -> Option<[f64; 3]> {
    let mut parts = value.split(',').map(|p| p.trim().parse::<f64>());
    let x = parts.next()?.ok()?;
    let y = parts.next()?.ok()?;
    let z = parts.next()?.ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some([x, y, z])
}

/// Parses every `decoration` element that has both `name` and `position`.
///
/// Elements with an unparseable position are skipped with a warning.
pub fn load_prefabs(xml: &str) -> Result<Vec<PrefabPlacement>, roxmltree::Error> {
    let doc = roxmltree::Document::parse(xml)?;
    let mut placements = Vec::new();

    for node in doc.descendants().filter(|n| n.has_tag_name("decoration")) {
        let (Some(name), Some(position)) = (node.attribute("name"), node.attribute("position"))
        else {
            continue;
        };
        let Some(position) = parse_position(position) else {
            warn!("Skipping {name}: malformed position {position:?}");
            continue;
        };

        let rotation = node
            .attribute("rotation")
            .and_then(|r| r.trim().parse::<u8>().ok())
            .unwrap_or(0);
        let size = |attr: &str| node.attribute(attr).and_then(|v| v.trim().parse::<f64>().ok());

        placements.push(PrefabPlacement {
            name: name.to_lowercase(),
            position,
            rotation,
            size_x: size("size_x"),
            size_z: size("size_z"),
        });
    }

    debug!("Found {} prefab placements", placements.len());
    Ok(placements)
}

/// Reads and parses a `prefabs.xml` file.
pub fn load_prefabs_file(path: impl AsRef<Path>) -> PrefabMapResult<Vec<PrefabPlacement>> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)?;
    let placements = load_prefabs(&text).map_err(|e| xml_error(path, &e))?;
    info!("Loaded {} prefab entries from {}", placements.len(), path.display());
    Ok(placements)
}

/// Metadata from a prefab's own XML file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrefabMetadata {
    /// `DifficultyTier`, or -1 when the prefab has none.
    pub difficulty_tier: i32,
    /// `RotationToFaceNorth` in quarter turns.
    pub rotation_to_face_north: u8,
    /// `PrefabSize` as `(x, y, z)`.
    pub size: Option<[i32; 3]>,
}

impl Default for PrefabMetadata {
    fn default() -> Self {
        Self {
            difficulty_tier: -1,
            rotation_to_face_north: 0,
            size: None,
        }
    }
}

impl PrefabMetadata {
    /// Tier if it falls in the game's 0–5 range.
    #[must_use]
    pub fn tier(&self) -> Option<u8> {
        u8::try_from(self.difficulty_tier).ok().filter(|t| *t <= 5)
    }
}

/// Parses `property name=… value=…` elements of a prefab XML document.
///
/// Property names compare case-insensitively.
pub fn parse_prefab_metadata(xml: &str) -> Result<PrefabMetadata, roxmltree::Error> {
    let doc = roxmltree::Document::parse(xml)?;
    let mut meta = PrefabMetadata::default();

    for prop in doc.descendants().filter(|n| n.has_tag_name("property")) {
        let (Some(name), Some(value)) = (prop.attribute("name"), prop.attribute("value")) else {
            continue;
        };
        let value = value.trim();
        match name.to_ascii_lowercase().as_str() {
            "difficultytier" => {
                if let Ok(tier) = value.parse::<f64>() {
                    meta.difficulty_tier = tier as i32;
                }
            },
            "rotationtofacenorth" => {
                if let Ok(rot) = value.parse::<u8>() {
                    meta.rotation_to_face_north = rot;
                }
            },
            "prefabsize" => {
                let parts: Vec<i32> = value
                    .split(',')
                    .filter_map(|p| p.trim().parse().ok())
                    .collect();
                if let [x, y, z, ..] = parts[..] {
                    meta.size = Some([x, y, z]);
                }
            },
            _ => {},
        }
    }

    Ok(meta)
}

/// Loads metadata for every `.xml` file below `dir`, keyed by the
/// lower-cased file stem. Files that fail to parse are skipped with a warning.
pub fn load_prefab_metadata_dir(dir: impl AsRef<Path>) -> PrefabMapResult<AHashMap<String, PrefabMetadata>> {
    let dir = dir.as_ref();
    let mut out = AHashMap::new();

    for path in find_files(dir, |p| p.extension().is_some_and(|e| e.eq_ignore_ascii_case("xml")))? {
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        let text = match std::fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) => {
                warn!("Failed to read {}: {e}", path.display());
                continue;
            },
        };
        match parse_prefab_metadata(&text) {
            Ok(meta) => {
                out.insert(stem.to_lowercase(), meta);
            },
            Err(e) => warn!("Failed to parse {}: {e}", path.display()),
        }
    }

    info!("Loaded metadata for {} prefabs from {}", out.len(), dir.display());
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PREFABS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<prefabs>
  <decoration type="model" name="Trader_Rekt" position="-512,40,1024" rotation="2" size_x="60" size_z="40"/>
  <decoration type="model" name="house_old_01" position="10.5, 38, -20.25"/>
  <decoration type="model" name="broken" position="1,2"/>
  <decoration type="model" position="1,2,3"/>
</prefabs>"#;

    #[test]
    fn test_load_prefabs() {
        let prefabs = load_prefabs(PREFABS).expect("parse");
        assert_eq!(prefabs.len(), 2);

        assert_eq!(prefabs[0].name, "trader_rekt");
        assert_eq!(prefabs[0].position, [-512.0, 40.0, 1024.0]);
        assert_eq!(prefabs[0].rotation, 2);
        assert_eq!(prefabs[0].footprint_center(), (-482.0, 1044.0));

        assert_eq!(prefabs[1].rotation, 0);
        assert_eq!(prefabs[1].size_x, None);
        assert_eq!(prefabs[1].footprint_center(), (10.5, -20.25));
    }

    #[test]
    fn test_invalid_xml_is_error() {
        assert!(load_prefabs("<prefabs><decoration</prefabs>").is_err());
    }

    #[test]
    fn test_parse_prefab_metadata() {
        let xml = r#"<prefab>
  <property name="DifficultyTier" value="3" />
  <property name="RotationToFaceNorth" value="1" />
  <property name="PrefabSize" value="31, 20, 42" />
  <property name="Tags" value="navonly" />
</prefab>"#;
        let meta = parse_prefab_metadata(xml).expect("parse");
        assert_eq!(meta.difficulty_tier, 3);
        assert_eq!(meta.tier(), Some(3));
        assert_eq!(meta.rotation_to_face_north, 1);
        assert_eq!(meta.size, Some([31, 20, 42]));
    }

    #[test]
    fn test_metadata_defaults() {
        let meta = parse_prefab_metadata("<prefab/>").expect("parse");
        assert_eq!(meta, PrefabMetadata::default());
        assert_eq!(meta.tier(), None);
    }

    #[test]
    fn test_load_metadata_dir() {
        let dir = tempfile::TempDir::new().expect("temp dir");
        let nested = dir.path().join("POIs");
        std::fs::create_dir_all(&nested).expect("mkdir");
        std::fs::write(
            nested.join("Store_Gun_01.xml"),
            r#"<prefab><property name="DifficultyTier" value="2"/></prefab>"#,
        )
        .expect("write");
        std::fs::write(nested.join("bad.xml"), "<prefab").expect("write");
        std::fs::write(nested.join("notes.txt"), "ignored").expect("write");

        let meta = load_prefab_metadata_dir(dir.path()).expect("load");
        assert_eq!(meta.len(), 1);
        assert_eq!(meta["store_gun_01"].difficulty_tier, 2);
    }
}
