//! Rendering one POI category into its points and labels images.

use crate::draw::{fill_circle, rounded_box, thick_line, wedge, BLACK, LABEL_FILL, WHITE, YELLOW};
use crate::font::LabelFont;
use crate::poi::{Poi, PLAYER_STARTS, STREETS};
use crate::report::{BoundingBoxRecord, LayerStats, LegendEntry};
use ahash::AHashMap;
use image::{Rgba, RgbaImage};
use prefabmap_common::{LabelBox, Point, PrefabMapError, PrefabMapResult};
use prefabmap_formats::{DisplayNames, PrefabMetadata};
use prefabmap_label::{
    badge_box, FontMetrics, LabelMask, LabelPlacer, Placement, PlacementConfig, PlacementOutcome, PlacementPass,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Corner radius of label boxes.
const LABEL_RADIUS: i32 = 8;
/// Corner radius of POI-id badges.
const BADGE_RADIUS: i32 = 4;
/// Halo offsets around directly placed text.
const HALO: [(i32, i32); 8] = [(-1, -1), (0, -1), (1, -1), (-1, 0), (1, 0), (-1, 1), (0, 1), (1, 1)];

/// Dot colors per difficulty tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TierColors {
    /// Tiers 0 through 5
    pub tiers: [[u8; 3]; 6],
    /// POIs without a known tier
    pub unknown: [u8; 3],
}

impl Default for TierColors {
    fn default() -> Self {
        Self {
            tiers: [
                [0x99, 0x89, 0x6B],
                [0xC4, 0x83, 0x3D],
                [0xA2, 0xA4, 0x3A],
                [0x69, 0xBF, 0x4B],
                [0x3C, 0x5C, 0xC7],
                [0x97, 0x34, 0xC5],
            ],
            unknown: [0xFF, 0x00, 0x00],
        }
    }
}

impl TierColors {
    /// Dot color for `tier`.
    #[must_use]
    pub fn color(&self, tier: Option<u8>) -> Rgba<u8> {
        let [r, g, b] = tier
            .and_then(|t| self.tiers.get(usize::from(t)))
            .copied()
            .unwrap_or(self.unknown);
        Rgba([r, g, b, 255])
    }
}

/// Per-run layer settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayerOptions {
    /// Edge length of the square layer images
    pub image_size: u32,
    /// Placement search settings
    pub placement: PlacementConfig,
    /// Dot colors
    pub tier_colors: TierColors,
    /// Draw POI-id badges for every POI instead of searching for labels
    pub numbered_dots: bool,
    /// Highlight labels found by the extended pass
    pub extended_debug: bool,
}

impl Default for LayerOptions {
    fn default() -> Self {
        Self {
            image_size: 6145,
            placement: PlacementConfig::default(),
            tier_colors: TierColors::default(),
            numbered_dots: false,
            extended_debug: false,
        }
    }
}

/// Shared read-only inputs for every layer of a run.
#[derive(Debug, Clone, Copy)]
pub struct LayerInputs<'a> {
    /// Label font
    pub font: &'a LabelFont,
    /// Forbidden-zone mask
    pub mask: Option<&'a LabelMask>,
    /// Blue zones extracted from the mask
    pub blue_zones: &'a [LabelBox],
    /// Localized prefab names
    pub display_names: &'a DisplayNames,
    /// Per-prefab metadata (tiers)
    pub metadata: &'a AHashMap<String, PrefabMetadata>,
}

impl LayerInputs<'_> {
    fn display_name(&self, poi: &Poi) -> String {
        self.display_names
            .get(&poi.name)
            .cloned()
            .unwrap_or_else(|| poi.name.clone())
    }

    fn tier(&self, poi: &Poi) -> Option<u8> {
        self.metadata.get(&poi.name).and_then(PrefabMetadata::tier)
    }
}

/// A rendered category.
#[derive(Debug, Clone)]
pub struct RenderedLayer {
    /// Layer category
    pub category: String,
    /// Dots and badges
    pub points: RgbaImage,
    /// Label boxes, connectors and text
    pub labels: RgbaImage,
    /// Counts for the report
    pub stats: LayerStats,
    /// Accepted label boxes
    pub bounding_boxes: Vec<BoundingBoxRecord>,
    /// POIs shown only by id
    pub legend: Vec<LegendEntry>,
}

impl RenderedLayer {
    /// Labels composited over points.
    #[must_use]
    pub fn combined(&self) -> RgbaImage {
        let mut image = self.points.clone();
        image::imageops::overlay(&mut image, &self.labels, 0, 0);
        image
    }

    /// Writes `<category>_points.png` and `<category>_labels.png` into
    /// `out_dir`, plus `<category>_combined.png` into `combined_dir` when
    /// given.
    pub fn save(&self, out_dir: &Path, combined_dir: Option<&Path>) -> PrefabMapResult<Vec<PathBuf>> {
        let mut written = Vec::new();
        let points_path = out_dir.join(format!("{}_points.png", self.category));
        save_png(&self.points, &points_path)?;
        written.push(points_path);

        let labels_path = out_dir.join(format!("{}_labels.png", self.category));
        save_png(&self.labels, &labels_path)?;
        written.push(labels_path);

        if let Some(dir) = combined_dir {
            let combined_path = dir.join(format!("{}_combined.png", self.category));
            save_png(&self.combined(), &combined_path)?;
            written.push(combined_path);
        }
        info!("Saved layer {} ({} files)", self.category, written.len());
        Ok(written)
    }
}

/// Saves a PNG, mapping encoder errors.
pub fn save_png(image: &RgbaImage, path: &Path) -> PrefabMapResult<()> {
    image
        .save(path)
        .map_err(|e| PrefabMapError::Image(format!("{}: {e}", path.display())))
}

fn uses_direct_labels(category: &str) -> bool {
    category == STREETS || category == PLAYER_STARTS
}

/// Renders `pois` as one layer.
///
/// Streets and player starts get direct labels. Other categories run the
/// placement search; POIs without a slot get an id badge and a legend entry.
/// With `numbered_dots`, every searched POI is a badge.
#[must_use]
pub fn render_layer(category: &str, pois: &[Poi], inputs: &LayerInputs<'_>, options: &LayerOptions) -> RenderedLayer {
    let size = options.image_size;
    let mut layer = RenderedLayer {
        category: category.to_string(),
        points: RgbaImage::new(size, size),
        labels: RgbaImage::new(size, size),
        stats: LayerStats::new(category),
        bounding_boxes: Vec::new(),
        legend: Vec::new(),
    };

    let radius = options.placement.dot_radius;
    for poi in pois {
        let color = options.tier_colors.color(inputs.tier(poi));
        fill_circle(&mut layer.points, poi.pixel, radius + 1, WHITE);
        fill_circle(&mut layer.points, poi.pixel, radius, color);
    }
    layer.stats.points = pois.len();

    let mut placer = LabelPlacer::new(inputs.font, options.placement)
        .with_dots(pois.iter().map(|p| p.pixel).collect());
    if let Some(mask) = inputs.mask {
        placer = placer.with_mask(mask, inputs.blue_zones.to_vec());
    }

    if uses_direct_labels(category) {
        render_direct(&mut layer, pois, inputs, options, &mut placer);
    } else if options.numbered_dots {
        for poi in pois {
            let b = badge_box(poi.pixel, &poi.id, inputs.font, options.placement.label_padding);
            draw_badge(&mut layer, poi, &b, inputs.font);
            add_legend(&mut layer, poi, inputs);
        }
    } else {
        render_searched(&mut layer, pois, inputs, options, &mut placer);
    }

    debug!(
        "Layer {category}: {} points, {} labels, {} badges",
        layer.stats.points,
        layer.stats.total_labels(),
        layer.stats.badges
    );
    layer
}

fn render_direct(
    layer: &mut RenderedLayer,
    pois: &[Poi],
    inputs: &LayerInputs<'_>,
    options: &LayerOptions,
    placer: &mut LabelPlacer<'_>,
) {
    let font = inputs.font;
    let line_h = font.line_height();
    for poi in pois {
        let color = options.tier_colors.color(inputs.tier(poi));
        let placement = placer.place_direct(poi.pixel, &inputs.display_name(poi));

        let anchor = Point::new(
            placement.origin.x,
            placement.origin.y + line_h * placement.lines.len() as i32 / 2,
        );
        thick_line(&mut layer.labels, poi.pixel, anchor, 4, WHITE);
        thick_line(&mut layer.labels, poi.pixel, anchor, 2, color);

        for (i, line) in placement.lines.iter().enumerate() {
            let (x, y) = (placement.origin.x, placement.origin.y + i as i32 * line_h);
            for (dx, dy) in HALO {
                font.draw(&mut layer.labels, WHITE, x + dx, y + dy, line);
            }
            font.draw(&mut layer.labels, color, x, y, line);
        }
        record_label(layer, poi, &placement);
    }
}

fn render_searched(
    layer: &mut RenderedLayer,
    pois: &[Poi],
    inputs: &LayerInputs<'_>,
    options: &LayerOptions,
    placer: &mut LabelPlacer<'_>,
) {
    let font = inputs.font;
    let pad = options.placement.label_padding;
    let mut accepted = Vec::new();

    for poi in pois {
        match placer.place(poi.pixel, &inputs.display_name(poi), &poi.id) {
            PlacementOutcome::Label(placement) => accepted.push((poi, placement)),
            PlacementOutcome::Badge(b) => {
                draw_badge(layer, poi, &b, font);
                add_legend(layer, poi, inputs);
            },
        }
    }

    // Wedges go under every label box.
    for (poi, placement) in &accepted {
        let color = options.tier_colors.color(inputs.tier(poi));
        wedge(&mut layer.labels, poi.pixel, &placement.label_box, pad, color);
    }

    let line_h = font.line_height();
    for (poi, placement) in &accepted {
        let color = options.tier_colors.color(inputs.tier(poi));
        let extended = placement.pass == PlacementPass::Extended;
        let fill = if options.extended_debug && extended { YELLOW } else { LABEL_FILL };
        let b = placement.label_box;
        rounded_box(&mut layer.labels, &b, LABEL_RADIUS, fill, Some((color, 2)));

        let inner_w = b.width() - 2 * pad;
        for (i, line) in placement.lines.iter().enumerate() {
            let tx = b.x1 + pad + (inner_w - font.text_width(line)) / 2;
            let ty = b.y1 + pad + i as i32 * line_h;
            font.draw(&mut layer.labels, BLACK, tx, ty, line);
        }
        record_label(layer, poi, placement);
    }
}

fn record_label(layer: &mut RenderedLayer, poi: &Poi, placement: &Placement) {
    layer.stats.record_label(placement.pass);
    layer.bounding_boxes.push(BoundingBoxRecord {
        poi_id: poi.id.clone(),
        layer: layer.category.clone(),
        label_box: placement.label_box,
    });
}

fn draw_badge(layer: &mut RenderedLayer, poi: &Poi, b: &LabelBox, font: &LabelFont) {
    rounded_box(&mut layer.points, b, BADGE_RADIUS, WHITE, Some((BLACK, 1)));
    let (w, h) = (font.text_width(&poi.id), font.line_height());
    font.draw(&mut layer.labels, BLACK, poi.pixel.x - w / 2, poi.pixel.y - h / 2, &poi.id);
    layer.stats.badges += 1;
}

fn add_legend(layer: &mut RenderedLayer, poi: &Poi, inputs: &LayerInputs<'_>) {
    layer.legend.push(LegendEntry {
        poi_id: poi.id.clone(),
        display_name: inputs.display_name(poi),
        prefab_name: poi.name.clone(),
        layer: layer.category.clone(),
    });
}
