//! Block colors.

use crate::classify::{classify_block, normalize_name, BlockCategory};
use image::Rgba;
use prefabmap_formats::BlockColors;

/// Fully transparent pixel.
pub const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// Color for blocks nothing else recognises.
pub const FALLBACK_GRAY: Rgba<u8> = Rgba([200, 200, 200, 255]);

/// Material and color families produced by [`normalize_name`].
const FAMILY_COLORS: &[(&str, [u8; 3])] = &[
    ("concrete", [207, 207, 207]),
    ("wood", [97, 80, 67]),
    ("metal", [108, 112, 128]),
    ("gravel", [153, 153, 153]),
    ("brick", [169, 71, 60]),
    ("stone", [131, 127, 118]),
    ("asphalt", [79, 79, 79]),
    ("dirt", [150, 122, 80]),
    ("soil", [150, 122, 80]),
    ("cinder", [176, 176, 176]),
    ("road", [85, 85, 85]),
    ("cement", [208, 208, 208]),
    ("tile", [182, 173, 161]),
    ("steel", [160, 160, 160]),
    ("trash", [110, 110, 110]),
    ("glass", [200, 220, 255]),
    ("white", [248, 248, 248]),
    ("brown", [156, 107, 74]),
    ("grey", [160, 160, 160]),
    ("red", [160, 48, 48]),
    ("green", [64, 160, 64]),
    ("blue", [80, 96, 176]),
    ("black", [28, 28, 28]),
    ("yellow", [224, 208, 80]),
    ("orange", [232, 124, 51]),
    ("tan", [205, 187, 154]),
    ("purple", [153, 102, 204]),
    ("pink", [235, 166, 198]),
];

const fn opaque([r, g, b]: [u8; 3]) -> Rgba<u8> {
    Rgba([r, g, b, 255])
}

/// Palette color of a category.
///
/// Air and unknown blocks have none: `"air"` is matched by name in
/// [`ColorLookup::resolve`] since names like `chair` also classify as air.
#[must_use]
pub const fn category_color(category: BlockCategory) -> Option<Rgba<u8>> {
    match category {
        BlockCategory::Wood => Some(opaque([97, 80, 67])),
        BlockCategory::Metal => Some(opaque([108, 112, 128])),
        BlockCategory::Glass => Some(opaque([200, 220, 255])),
        BlockCategory::Concrete => Some(opaque([207, 207, 207])),
        BlockCategory::Terrain => Some(opaque([150, 122, 80])),
        BlockCategory::Roof => Some(opaque([169, 71, 60])),
        BlockCategory::Light => Some(opaque([224, 208, 80])),
        BlockCategory::Air | BlockCategory::Unknown => None,
    }
}

fn family_color(name: &str) -> Option<Rgba<u8>> {
    let family = normalize_name(name)?;
    let key = family
        .strip_prefix("color_")
        .or_else(|| family.strip_prefix("material_"))?;
    let key = if key == "gray" { "grey" } else { key };
    FAMILY_COLORS
        .iter()
        .find(|(k, _)| *k == key)
        .map(|&(_, rgb)| opaque(rgb))
}

/// Deterministic color for an unresolved block ID.
///
/// Channels fall in `80..=255` so the color stays visible on dark terrain.
#[must_use]
pub fn unknown_block_color(id: u32) -> Rgba<u8> {
    let mut rng = fastrand::Rng::with_seed(u64::from(id));
    Rgba([rng.u8(80..=255), rng.u8(80..=255), rng.u8(80..=255), 255])
}

/// Resolves block names to sticker colors.
#[derive(Debug, Clone, Default)]
pub struct ColorLookup {
    block_colors: BlockColors,
}

impl ColorLookup {
    /// Creates a lookup over colors read from `blocks.xml`.
    #[must_use]
    pub fn new(block_colors: BlockColors) -> Self {
        Self { block_colors }
    }

    /// Number of explicit block colors.
    #[must_use]
    pub fn explicit_len(&self) -> usize {
        self.block_colors.len()
    }

    /// Color for `name`.
    ///
    /// Resolution order: explicit `blocks.xml` color, category palette,
    /// material/color family, a per-ID color for `unknown_<id>` names, and
    /// finally [`FALLBACK_GRAY`]. Air is transparent.
    #[must_use]
    pub fn resolve(&self, name: &str) -> Rgba<u8> {
        if name == "air" {
            return TRANSPARENT;
        }
        if let Some(&rgb) = self.block_colors.get(name) {
            return opaque(rgb);
        }
        if let Some(color) = category_color(classify_block(name)) {
            return color;
        }
        if let Some(color) = family_color(name) {
            return color;
        }
        if let Some(id) = name
            .strip_prefix("unknown_")
            .and_then(|id| id.parse::<u32>().ok())
        {
            return unknown_block_color(id);
        }
        FALLBACK_GRAY
    }
}
