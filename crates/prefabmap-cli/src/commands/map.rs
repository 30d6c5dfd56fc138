//! `prefabmap map`: POI layers, logs and the run report.

use crate::cli::MapArgs;
use crate::config::MapConfig;
use ahash::AHashMap;
use anyhow::{Context, Result};
use image::RgbaImage;
use prefabmap_formats::{load_display_names_file, load_prefab_metadata_dir, load_prefabs_file, PrefabMetadata};
use prefabmap_label::LabelMask;
use prefabmap_render::{
    collect_pois, density_heatmap, heatmap_overlay, render_layer, save_png, write_bounding_boxes, write_excluded,
    write_legend, write_missing_names, BiomeMap, LabelFont, LayerInputs, LayerOptions, RenderReport,
};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Output locations of one map run.
#[derive(Debug, Clone)]
pub struct OutputDirs {
    /// Layer images, legend and report
    pub root: PathBuf,
    /// Composited layers
    pub combined: Option<PathBuf>,
    /// Name lists
    pub logs: Option<PathBuf>,
}

impl OutputDirs {
    fn create(root: PathBuf, combined: bool, logs: bool) -> Result<Self> {
        std::fs::create_dir_all(&root).with_context(|| format!("creating {}", root.display()))?;
        let sub = |enabled: bool, name: &str| -> Result<Option<PathBuf>> {
            if !enabled {
                return Ok(None);
            }
            let dir = root.join(name);
            std::fs::create_dir_all(&dir).with_context(|| format!("creating {}", dir.display()))?;
            Ok(Some(dir))
        };
        Ok(Self {
            combined: sub(combined, "combined")?,
            logs: sub(logs, "logs")?,
            root,
        })
    }
}

fn load_metadata(dir: &Path) -> AHashMap<String, PrefabMetadata> {
    if !dir.is_dir() {
        warn!("Prefab directory {} not found, tiers unknown", dir.display());
        return AHashMap::new();
    }
    load_prefab_metadata_dir(dir).unwrap_or_else(|e| {
        warn!("Failed to read prefab metadata: {e}");
        AHashMap::new()
    })
}

fn load_mask(args: &MapArgs, config: &MapConfig) -> Option<LabelMask> {
    if args.no_mask {
        info!("Skipping label mask (--no-mask)");
        return None;
    }
    let path = args.mask.as_deref().unwrap_or(&config.mask_path);
    if !path.is_file() {
        warn!("Label mask not found: {}", path.display());
        return None;
    }
    match LabelMask::open(path, config.mask_colors, config.image_size) {
        Ok(mask) => Some(mask),
        Err(e) => {
            warn!("Failed to load label mask: {e}");
            None
        },
    }
}

/// Runs the map command.
pub fn run(args: &MapArgs, config: &MapConfig, verbose: bool) -> Result<()> {
    let start = Instant::now();
    let mut config = config.clone();
    if let Some(size) = args.text_size {
        config.text_size = size;
    }
    config.validate();

    let xml = args.xml.clone().unwrap_or_else(|| config.prefabs_xml());
    if args.xml.is_none() {
        warn!("No --xml given, defaulting to {}", xml.display());
    }
    let localization = args.localization.clone().unwrap_or_else(|| config.localization());
    let biomes_path = args.biomes.clone().unwrap_or_else(|| config.biomes_png());
    let prefab_dir = args.prefab_dir.clone().unwrap_or_else(|| config.prefab_dir());
    debug!(
        "Inputs: xml={} localization={} biomes={} prefabs={}",
        xml.display(),
        localization.display(),
        biomes_path.display(),
        prefab_dir.display()
    );

    let placements = load_prefabs_file(&xml).with_context(|| format!("loading {}", xml.display()))?;
    let display_names = load_display_names_file(&localization);
    let metadata = load_metadata(&prefab_dir);
    let biomes = match BiomeMap::open(&biomes_path, config.biome_palette.clone(), config.image_size) {
        Ok(biomes) => Some(biomes),
        Err(e) => {
            warn!("Biome map unavailable ({e}); all POIs go to biome_unknown");
            None
        },
    };

    let mask = load_mask(args, &config);
    let blue_zones = mask.as_ref().map(LabelMask::extract_blue_zones).unwrap_or_default();
    if mask.is_some() {
        info!("Loaded label mask with {} blue zones", blue_zones.len());
    }

    let font_path = args.font.as_deref().or(config.font_path.as_deref());
    let font = LabelFont::load_or_fallback(font_path, config.text_size);

    let set = collect_pois(&placements, &metadata, biomes.as_ref(), &display_names, config.map_center);
    info!(
        "{} POIs in {} categories, {} prefab names excluded",
        set.total(),
        set.layers.len(),
        set.excluded.len()
    );
    for name in &set.excluded {
        debug!("Excluded {name}");
    }

    let output = args.output.clone().unwrap_or_else(|| config.output_dir.clone());
    let dirs = OutputDirs::create(output, args.combined, verbose || args.log_missing)?;

    let inputs = LayerInputs {
        font: &font,
        mask: mask.as_ref(),
        blue_zones: &blue_zones,
        display_names: &display_names,
        metadata: &metadata,
    };
    let options = LayerOptions {
        image_size: config.image_size,
        placement: config.placement(),
        tier_colors: config.tier_colors,
        numbered_dots: args.numbered_dots,
        extended_debug: args.extended_placement_debug,
    };

    let mut report = RenderReport::new(config.image_size);
    report.total_pois = set.total();
    report.excluded = set.excluded.len();
    report.missing_display_names = set.missing_display_names.len();

    let mut boxes = Vec::new();
    let mut legend = Vec::new();
    let mut rendered_pois = Vec::new();
    let mut all_layers = dirs.combined.as_ref().map(|_| RgbaImage::new(config.image_size, config.image_size));

    for (category, pois) in set.layers_to_render(args.with_player_starts, &args.only_biomes) {
        info!("Rendering layer {category} ({} POIs)", pois.len());
        let layer = render_layer(category, pois, &inputs, &options);
        layer
            .save(&dirs.root, dirs.combined.as_deref())
            .with_context(|| format!("saving layer {category}"))?;
        if let Some(all) = all_layers.as_mut() {
            image::imageops::overlay(all, &layer.combined(), 0, 0);
        }
        rendered_pois.extend(pois.iter());
        report.layers.push(layer.stats);
        boxes.extend(layer.bounding_boxes);
        legend.extend(layer.legend);
    }

    if let (Some(all), Some(dir)) = (all_layers, dirs.combined.as_ref()) {
        let path = dir.join("map_all_layers_combined.png");
        save_png(&all, &path)?;
        info!("Final map saved: {}", path.display());
    }

    if args.heatmap {
        let heat_path = dirs.root.join("poi_heatmap.png");
        density_heatmap(rendered_pois.iter().copied(), config.image_size)
            .save(&heat_path)
            .with_context(|| format!("saving {}", heat_path.display()))?;
        let overlay = heatmap_overlay(rendered_pois.iter().copied(), config.image_size, config.dot_radius, &font);
        save_png(&overlay, &dirs.root.join("poi_heatmap_overlay.png"))?;
        info!("Heatmap saved: {}", heat_path.display());
    }

    let log_dir = dirs.logs.as_deref().unwrap_or(&dirs.root);
    write_bounding_boxes(&boxes, &log_dir.join("bounding_boxes.csv")).context("writing bounding boxes")?;
    if !legend.is_empty() {
        write_legend(&legend, &dirs.root.join("poi_legend.csv")).context("writing legend")?;
        info!("Legend: {} entries", legend.len());
    }
    if let Some(logs) = dirs.logs.as_deref() {
        if args.log_missing && !set.missing_display_names.is_empty() {
            let path = logs.join("missing_display_names.txt");
            write_missing_names(&set.missing_display_names, &path).context("writing missing names")?;
            info!("Missing display names: {}", path.display());
        }
        if verbose && !set.excluded.is_empty() {
            let path = logs.join("excluded_prefabs.txt");
            write_excluded(&set.excluded, &path).context("writing excluded names")?;
            info!("Excluded prefab names: {}", path.display());
        }
    }
    report.save(&dirs.root.join("render_report.json"))?;

    info!("Render completed in {:.2} seconds", start.elapsed().as_secs_f64());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const PREFABS: &str = r#"<prefabs>
  <decoration type="model" name="trader_hugh" position="-10,40,10" rotation="0" />
  <decoration type="model" name="sign_stop" position="0,40,0" rotation="0" />
  <decoration type="model" name="street_main" position="20,40,-20" rotation="0" />
</prefabs>"#;

    fn test_config(dir: &Path) -> MapConfig {
        MapConfig {
            image_size: 128,
            map_center: 64,
            font_path: None,
            game_data_dir: dir.join("missing-game"),
            mask_path: dir.join("missing-mask.gif"),
            ..MapConfig::default()
        }
    }

    #[test]
    fn test_map_run_writes_layers_and_logs() {
        let dir = TempDir::new().expect("temp dir");
        let xml = dir.path().join("prefabs.xml");
        std::fs::write(&xml, PREFABS).expect("write xml");
        let out = dir.path().join("out");

        let args = MapArgs {
            xml: Some(xml),
            output: Some(out.clone()),
            combined: true,
            heatmap: true,
            log_missing: true,
            ..MapArgs::default()
        };
        run(&args, &test_config(dir.path()), true).expect("map run");

        for file in [
            "biome_unknown_points.png",
            "biome_unknown_labels.png",
            "streets_points.png",
            "combined/map_all_layers_combined.png",
            "combined/streets_combined.png",
            "poi_heatmap.png",
            "poi_heatmap_overlay.png",
            "render_report.json",
            "logs/bounding_boxes.csv",
            "logs/missing_display_names.txt",
            "logs/excluded_prefabs.txt",
        ] {
            assert!(out.join(file).is_file(), "missing {file}");
        }

        let excluded = std::fs::read_to_string(out.join("logs/excluded_prefabs.txt")).expect("read");
        assert!(excluded.contains("excluded,sign_stop"));
        let map = image::open(out.join("combined/map_all_layers_combined.png")).expect("open");
        assert_eq!((map.width(), map.height()), (128, 128));
    }

    #[test]
    fn test_missing_xml_is_an_error() {
        let dir = TempDir::new().expect("temp dir");
        let args = MapArgs {
            xml: Some(dir.path().join("nope.xml")),
            output: Some(dir.path().join("out")),
            ..MapArgs::default()
        };
        assert!(run(&args, &test_config(dir.path()), false).is_err());
    }
}
