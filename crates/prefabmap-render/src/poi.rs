//! Turning prefab placements into categorized map points.

use ahash::AHashMap;
use image::RgbImage;
use prefabmap_common::{transform_coords, Point, PrefabMapError, PrefabMapResult};
use prefabmap_formats::{DisplayNames, PrefabMetadata, PrefabPlacement};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use tracing::{debug, info};

/// Layer holding player spawn points.
pub const PLAYER_STARTS: &str = "player_starts";

/// Layer holding street names and highway signs.
pub const STREETS: &str = "streets";

/// Prefix of biome layers (`biome_desert`, …).
pub const BIOME_PREFIX: &str = "biome_";

/// Biome name for points with no biome map or no palette match.
pub const UNKNOWN_BIOME: &str = "unknown";

/// Sign prefabs that are kept despite the `sign_` rule.
const SIGN_ALLOWLIST: [&str; 2] = ["sign_260", "sign_73"];

/// Substrings of prefab names that never get a map point.
const EXCLUSION_PATTERNS: &[&str] = &[
    "bridge",
    "part_",
    "street_light",
    "diersville_city_",
    "cornfield_",
    "site_grave",
    "wilderness_filler",
    "roadblock",
    "crater",
    "gravestowne_city",
    "departure_city",
    "perishton_city",
    "rubble_burnt_filler",
    "rubble_downtown_filler",
    "bus_stop",
    "bus_wreck",
    "canyon_gift_shop_parking",
    "canyon_gift_shop_sign",
    "desert_town_blk",
    "perishton_fence",
    "perishton_riverdock",
    "remnant_industrial",
    "road_railing_long_filled",
    "perishton_church_parking",
    "perishton_median",
    "perishton_outlet",
    "rwg_tile_",
];

/// Whether a prefab is filler, decoration or infrastructure rather than a POI.
#[must_use]
pub fn should_exclude(name: &str) -> bool {
    let name = name.to_lowercase();
    if name.is_empty() {
        return true;
    }
    if name.starts_with("sign_") && !SIGN_ALLOWLIST.iter().any(|p| name.starts_with(p)) {
        return true;
    }
    EXCLUSION_PATTERNS.iter().any(|p| name.contains(p))
}

/// POI id for the `index`-th accepted placement.
#[must_use]
pub fn poi_id(index: usize) -> String {
    format!("P{index:04}")
}

/// A prefab placement ready to draw.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Poi {
    /// `P0000`-style id
    pub id: String,
    /// Lower-cased prefab name
    pub name: String,
    /// Map pixel of the footprint center
    pub pixel: Point,
}

/// Biome name ↔ bitmap color pairs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BiomePalette {
    /// Entries, matched exactly
    pub entries: Vec<(String, [u8; 3])>,
}

impl Default for BiomePalette {
    fn default() -> Self {
        let entries = [
            ("pine_forest", [0, 64, 0]),
            ("wasteland", [255, 172, 0]),
            ("desert", [255, 224, 128]),
            ("burnt_forest", [190, 14, 246]),
            ("snow", [255, 255, 255]),
        ];
        Self {
            entries: entries.into_iter().map(|(n, c)| (n.to_string(), c)).collect(),
        }
    }
}

impl BiomePalette {
    /// Biome whose color equals `rgb` exactly.
    #[must_use]
    pub fn lookup(&self, rgb: [u8; 3]) -> Option<&str> {
        self.entries
            .iter()
            .find(|(_, c)| *c == rgb)
            .map(|(name, _)| name.as_str())
    }
}

/// The world biome bitmap, scaled to map pixels.
#[derive(Debug, Clone)]
pub struct BiomeMap {
    image: RgbImage,
    palette: BiomePalette,
}

impl BiomeMap {
    /// Wraps an already map-sized bitmap.
    #[must_use]
    pub fn new(image: RgbImage, palette: BiomePalette) -> Self {
        Self { image, palette }
    }

    /// Loads the biome bitmap, resizing it (nearest neighbour) to
    /// `size × size`.
    pub fn open(path: impl AsRef<Path>, palette: BiomePalette, size: u32) -> PrefabMapResult<Self> {
        let path = path.as_ref();
        let mut image = image::open(path)
            .map_err(|e| PrefabMapError::Image(format!("{}: {e}", path.display())))?
            .to_rgb8();
        if image.dimensions() != (size, size) {
            image = image::imageops::resize(&image, size, size, image::imageops::FilterType::Nearest);
        }
        info!("Loaded biome map {}", path.display());
        Ok(Self::new(image, palette))
    }

    /// Biome at `p`, or [`UNKNOWN_BIOME`].
    #[must_use]
    pub fn biome_at(&self, p: Point) -> &str {
        let (Ok(x), Ok(y)) = (u32::try_from(p.x), u32::try_from(p.y)) else {
            return UNKNOWN_BIOME;
        };
        self.image
            .get_pixel_checked(x, y)
            .and_then(|px| self.palette.lookup(px.0))
            .unwrap_or(UNKNOWN_BIOME)
    }
}

/// Layer a prefab belongs to.
#[must_use]
pub fn categorize(name: &str, pixel: Point, biomes: Option<&BiomeMap>) -> String {
    if name.starts_with("playerstart") || name.starts_with("player_start") {
        return PLAYER_STARTS.to_string();
    }
    let street = (name.starts_with("street_") || name.starts_with("streets_")) && !name.ends_with("light");
    if street || SIGN_ALLOWLIST.iter().any(|p| name.starts_with(p)) {
        return STREETS.to_string();
    }
    let biome = biomes.map_or(UNKNOWN_BIOME, |b| b.biome_at(pixel));
    format!("{BIOME_PREFIX}{biome}")
}

/// Footprint center in world coordinates.
///
/// Explicit placement sizes win; otherwise the prefab's own `PrefabSize` is
/// used, with x and z swapped for odd quarter turns.
fn footprint_center(placement: &PrefabPlacement, meta: Option<&PrefabMetadata>) -> (f64, f64) {
    if placement.size_x.is_some() || placement.size_z.is_some() {
        return placement.footprint_center();
    }
    let [x, _, z] = placement.position;
    match meta.and_then(|m| m.size) {
        Some([sx, _, sz]) => {
            let (sx, sz) = if placement.rotation % 2 == 1 { (sz, sx) } else { (sx, sz) };
            (x + f64::from(sx) / 2.0, z + f64::from(sz) / 2.0)
        },
        None => (x, z),
    }
}

/// Every layer's points plus the names left out along the way.
#[derive(Debug, Clone, Default)]
pub struct PoiSet {
    /// Points per layer, layers sorted by name
    pub layers: BTreeMap<String, Vec<Poi>>,
    /// Prefab names rejected by [`should_exclude`]
    pub excluded: BTreeSet<String>,
    /// Prefab names with no localized display name
    pub missing_display_names: BTreeSet<String>,
}

impl PoiSet {
    /// Number of points across all layers.
    #[must_use]
    pub fn total(&self) -> usize {
        self.layers.values().map(Vec::len).sum()
    }

    /// Layers to draw, in name order.
    ///
    /// `player_starts` only appears when enabled. A non-empty `only_biomes`
    /// keeps just the listed `biome_<name>` layers.
    pub fn layers_to_render<'a>(
        &'a self,
        with_player_starts: bool,
        only_biomes: &'a [String],
    ) -> impl Iterator<Item = (&'a str, &'a [Poi])> + 'a {
        self.layers
            .iter()
            .filter(move |(category, _)| {
                if category.as_str() == PLAYER_STARTS && !with_player_starts {
                    return false;
                }
                if only_biomes.is_empty() {
                    return true;
                }
                category
                    .strip_prefix(BIOME_PREFIX)
                    .is_some_and(|biome| only_biomes.iter().any(|b| b == biome))
            })
            .map(|(category, pois)| (category.as_str(), pois.as_slice()))
    }
}

/// Filters, positions and categorizes placements.
///
/// POI ids count accepted placements in document order, across all layers.
#[must_use]
pub fn collect_pois(
    placements: &[PrefabPlacement],
    metadata: &AHashMap<String, PrefabMetadata>,
    biomes: Option<&BiomeMap>,
    display_names: &DisplayNames,
    map_center: i32,
) -> PoiSet {
    let mut set = PoiSet::default();
    let mut next_id = 0;

    for placement in placements {
        let name = &placement.name;
        if should_exclude(name) {
            set.excluded.insert(name.clone());
            continue;
        }

        let (cx, cz) = footprint_center(placement, metadata.get(name));
        let pixel = transform_coords(cx, cz, map_center);
        let category = categorize(name, pixel, biomes);

        if !display_names.contains_key(name) {
            set.missing_display_names.insert(name.clone());
        }
        set.layers.entry(category).or_default().push(Poi {
            id: poi_id(next_id),
            name: name.clone(),
            pixel,
        });
        next_id += 1;
    }

    debug!(
        "Collected {} POIs in {} layers ({} excluded)",
        next_id,
        set.layers.len(),
        set.excluded.len()
    );
    set
}
