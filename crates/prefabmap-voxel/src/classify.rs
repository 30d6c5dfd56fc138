//! Block-name classification.
//!
//! Block names are free-form game identifiers (`woodShapes:plankShingle`,
//! `metalTrussingCube`, `terrDirt`). Classification reduces them to a handful
//! of categories the renderers color and count.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Semantic category of a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockCategory {
    /// Planks, furniture and other timber
    Wood,
    /// Steel, trusses and appliances
    Metal,
    /// Windows and screens
    Glass,
    /// Concrete and cobblestone
    Concrete,
    /// Natural terrain
    Terrain,
    /// Roofing
    Roof,
    /// Light sources
    Light,
    /// Empty space
    Air,
    /// Anything not recognised
    Unknown,
}

impl BlockCategory {
    /// All categories, in declaration order.
    pub const ALL: [Self; 9] = [
        Self::Wood,
        Self::Metal,
        Self::Glass,
        Self::Concrete,
        Self::Terrain,
        Self::Roof,
        Self::Light,
        Self::Air,
        Self::Unknown,
    ];

    /// Lower-case name used in CSV output and logs.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Wood => "wood",
            Self::Metal => "metal",
            Self::Glass => "glass",
            Self::Concrete => "concrete",
            Self::Terrain => "terrain",
            Self::Roof => "roof",
            Self::Light => "light",
            Self::Air => "air",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for BlockCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Substring aliases checked before the generic heuristics.
///
/// Order matters: the first alias contained in the name decides.
const ALIASES: &[(&str, BlockCategory)] = &[
    ("palette", BlockCategory::Wood),
    ("pallet", BlockCategory::Wood),
    ("plank", BlockCategory::Wood),
    ("crate", BlockCategory::Wood),
    ("locker", BlockCategory::Metal),
    ("shelf", BlockCategory::Wood),
    ("cabinet", BlockCategory::Wood),
    ("sink", BlockCategory::Metal),
    ("barrel", BlockCategory::Metal),
    ("vent", BlockCategory::Metal),
    ("grate", BlockCategory::Metal),
    ("radiator", BlockCategory::Metal),
    ("rebar", BlockCategory::Metal),
    ("vault", BlockCategory::Metal),
    ("panel", BlockCategory::Metal),
    ("mirror", BlockCategory::Glass),
    ("tv", BlockCategory::Glass),
    ("screen", BlockCategory::Glass),
];

/// Classifies a block name into a [`BlockCategory`].
///
/// Matching is case-insensitive. Aliases are tried in declared order, then
/// the keyword heuristics `wood`, `metal`/`truss`, `concrete`/`cobble`,
/// `terrain`, `roof`, `light` and `air`.
#[must_use]
pub fn classify_block(name: &str) -> BlockCategory {
    let name = name.to_lowercase();

    if let Some(&(_, category)) = ALIASES.iter().find(|(alias, _)| name.contains(alias)) {
        return category;
    }

    if name.contains("wood") {
        BlockCategory::Wood
    } else if name.contains("metal") || name.contains("truss") {
        BlockCategory::Metal
    } else if name.contains("concrete") || name.contains("cobble") {
        BlockCategory::Concrete
    } else if name.contains("terrain") {
        BlockCategory::Terrain
    } else if name.contains("roof") {
        BlockCategory::Roof
    } else if name.contains("light") {
        BlockCategory::Light
    } else if name.contains("air") {
        BlockCategory::Air
    } else {
        BlockCategory::Unknown
    }
}

const SKIP_KEYWORDS: &[&str] = &[
    "sleeper", "cobweb", "trash", "decal", "gore", "paper", "cloth", "clothpile", "box", "bag",
    "toilet", "sink", "bathtub", "faucet", "light", "fan", "vent", "candle", "spider", "crate",
    "decor", "cash", "mug", "jar", "plate", "glass", "bottle", "bone", "flesh", "skull", "carton",
    "urn", "shard", "poster", "mirror", "note", "magazine", "frame", "flag", "painting", "lamp",
];

const MATERIAL_KEYWORDS: &[&str] = &[
    "wood", "metal", "steel", "concrete", "brick", "trash", "glass", "stone", "asphalt", "tile",
    "shingle", "plaster", "roof", "gravel", "terrain", "road", "dirt", "soil", "sand", "marble",
    "cinder", "cement",
];

const COLOR_KEYWORDS: &[&str] = &[
    "red", "green", "blue", "gray", "grey", "white", "black", "brown", "yellow", "tan", "pink",
    "orange", "purple",
];

const DIRECTIONAL_SUFFIXES: &[&str] = &["left", "right", "top", "bottom", "corner"];

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_alphabetic() || c == '_')
        && chars.all(|c| c.is_alphanumeric() || c == '_')
}

/// Folds a block name into a material or color family.
///
/// Returns `color_<c>` or `material_<m>` when the name mentions one of the
/// known colors or materials (colors first), the stripped name otherwise, and
/// `None` for clutter blocks, non-identifier names and stems shorter than four
/// characters. Directional and numeric suffixes are dropped before matching.
#[must_use]
pub fn normalize_name(name: &str) -> Option<String> {
    let name = name.trim().to_lowercase();
    if !is_identifier(&name) || SKIP_KEYWORDS.iter().any(|k| name.contains(k)) {
        return None;
    }

    let mut stem = name.as_str();
    if let Some(stripped) = DIRECTIONAL_SUFFIXES
        .iter()
        .find_map(|suffix| stem.strip_suffix(suffix))
    {
        stem = stripped;
    }
    let stem = stem
        .trim_end_matches(|c: char| c.is_ascii_digit())
        .trim_end_matches('_');

    if let Some(color) = COLOR_KEYWORDS.iter().find(|c| stem.contains(*c)) {
        return Some(format!("color_{color}"));
    }
    if let Some(material) = MATERIAL_KEYWORDS.iter().find(|m| stem.contains(*m)) {
        return Some(format!("material_{material}"));
    }
    if stem.len() < 4 {
        return None;
    }
    Some(stem.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heuristics() {
        assert_eq!(classify_block("wood_plank"), BlockCategory::Wood);
        assert_eq!(classify_block("metalTrussingCube"), BlockCategory::Metal);
        assert_eq!(classify_block("steelTruss"), BlockCategory::Metal);
        assert_eq!(classify_block("concreteBlock"), BlockCategory::Concrete);
        assert_eq!(classify_block("CobblestoneSlab"), BlockCategory::Concrete);
        assert_eq!(classify_block("terrain_dirt"), BlockCategory::Terrain);
        assert_eq!(classify_block("roofShingles"), BlockCategory::Roof);
        assert_eq!(classify_block("ceilingLight01"), BlockCategory::Light);
        assert_eq!(classify_block("air"), BlockCategory::Air);
        assert_eq!(classify_block("unknown_42"), BlockCategory::Unknown);
    }

    #[test]
    fn test_aliases() {
        assert_eq!(classify_block("shoppingCrate"), BlockCategory::Wood);
        assert_eq!(classify_block("gunSafeLocker"), BlockCategory::Metal);
        assert_eq!(classify_block("flatScreenTV"), BlockCategory::Glass);
    }

    #[test]
    fn test_alias_order_beats_heuristics() {
        // "plank" is an alias, "metal" only a heuristic keyword.
        assert_eq!(classify_block("metalPlankRamp"), BlockCategory::Wood);
        // "cabinet" precedes "sink" in the alias table.
        assert_eq!(classify_block("sinkCabinet"), BlockCategory::Wood);
        // "vent" precedes "screen".
        assert_eq!(classify_block("ventScreen"), BlockCategory::Metal);
        // "locker" precedes "shelf" and "cabinet".
        assert_eq!(classify_block("lockerCabinet"), BlockCategory::Metal);
        assert_eq!(classify_block("shelfLocker"), BlockCategory::Metal);
    }

    #[test]
    fn test_display_matches_as_str() {
        for category in BlockCategory::ALL {
            assert_eq!(category.to_string(), category.as_str());
        }
    }

    #[test]
    fn test_normalize_colors_and_materials() {
        assert_eq!(normalize_name("brickRedLeft").as_deref(), Some("color_red"));
        assert_eq!(normalize_name("asphaltRoad_02").as_deref(), Some("material_asphalt"));
        assert_eq!(normalize_name("  Concrete_Pillar3 ").as_deref(), Some("material_concrete"));
    }

    #[test]
    fn test_normalize_strips_suffixes() {
        assert_eq!(normalize_name("hedgecorner").as_deref(), Some("hedge"));
        assert_eq!(normalize_name("fence_post_12").as_deref(), Some("fence_post"));
    }

    #[test]
    fn test_normalize_rejects() {
        assert_eq!(normalize_name("cobwebHanging"), None);
        assert_eq!(normalize_name("trashPile"), None);
        assert_eq!(normalize_name("shapes:cube"), None);
        assert_eq!(normalize_name("9lives"), None);
        assert_eq!(normalize_name("hay1"), None);
    }
}
