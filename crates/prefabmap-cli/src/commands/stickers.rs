//! `prefabmap stickers`: top-down prefab thumbnails.

use crate::cli::StickerArgs;
use crate::config::MapConfig;
use anyhow::{bail, Context, Result};
use prefabmap_formats::{load_block_colors_file, BlockColors};
use prefabmap_voxel::{discover_sticker_jobs, run_sticker_batch, ColorLookup, StickerJob, StickerOptions};
use std::path::Path;
use tracing::{info, warn};

fn load_colors(path: &Path) -> BlockColors {
    match load_block_colors_file(path) {
        Ok(colors) => colors,
        Err(e) => {
            warn!("No block colors from {} ({e}); using category colors", path.display());
            BlockColors::default()
        },
    }
}

/// Runs the stickers command.
pub fn run(args: &StickerArgs, config: &MapConfig) -> Result<()> {
    let blocks_xml = args.blocks_xml.clone().unwrap_or_else(|| config.blocks_xml());
    let lookup = ColorLookup::new(load_colors(&blocks_xml));
    info!("{} explicit block colors", lookup.explicit_len());

    let options = StickerOptions {
        scale: args.scale.unwrap_or(config.sticker_scale).clamp(1, 64),
        debug_csv: args.debug_csv,
    };
    let out_dir = args.output.clone().unwrap_or_else(|| config.output_dir.join("stickers"));

    let single = args.tts.is_some();
    let mut jobs = match &args.tts {
        Some(tts) => vec![StickerJob::for_tts(tts)],
        None => {
            let dir = args.prefab_dir.clone().unwrap_or_else(|| config.prefab_dir());
            discover_sticker_jobs(&dir).with_context(|| format!("scanning {}", dir.display()))?
        },
    };
    if let Some(only) = &args.only {
        jobs.retain(|job| job.name().eq_ignore_ascii_case(only));
    }
    if jobs.is_empty() {
        bail!("no prefabs to render");
    }
    info!("Rendering {} stickers into {}", jobs.len(), out_dir.display());

    let summary = run_sticker_batch(&jobs, &lookup, options, &out_dir)?;
    if single {
        if let Some((path, reason)) = summary.failed.first() {
            bail!("failed to render {}: {reason}", path.display());
        }
    }
    Ok(())
}
