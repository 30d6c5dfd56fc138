//! Sticker thumbnails: a prefab's top surface rendered one colored square per
//! column.

use crate::palette::ColorLookup;
use crate::surface::{block_map_records, top_surface_names, SurfaceGrid, TopBlockRecord};
use image::RgbaImage;
use prefabmap_common::csv::escape_field;
use prefabmap_common::{PrefabMapError, PrefabMapResult};
use prefabmap_formats::{blocks_path_for, find_files, read_blocks_nim, read_tts};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

/// File-name prefixes of test prefabs that never get stickers.
const SKIPPED_PREFIXES: [&str; 2] = ["aaa_", "000_"];

/// Sticker rendering options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StickerOptions {
    /// Pixels per column edge
    pub scale: u32,
    /// Also write `<name>_blocks.csv` next to each sticker
    pub debug_csv: bool,
}

impl Default for StickerOptions {
    fn default() -> Self {
        Self {
            scale: 4,
            debug_csv: false,
        }
    }
}

/// Renders a surface as `scale × scale` squares per column. Air stays
/// transparent.
#[must_use]
pub fn render_sticker(surface: &SurfaceGrid<String>, lookup: &ColorLookup, scale: u32) -> RgbaImage {
    let scale = scale.max(1);
    let mut image = RgbaImage::new(surface.width() as u32 * scale, surface.height() as u32 * scale);

    for (x, row, name) in surface.iter() {
        let color = lookup.resolve(name);
        if color[3] == 0 {
            continue;
        }
        let (px, py) = (x as u32 * scale, row as u32 * scale);
        for dy in 0..scale {
            for dx in 0..scale {
                image.put_pixel(px + dx, py + dy, color);
            }
        }
    }
    image
}

/// A `.tts` file and the block table that names its IDs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StickerJob {
    /// Voxel grid path
    pub tts_path: PathBuf,
    /// Block-name table path
    pub blocks_path: PathBuf,
}

impl StickerJob {
    /// Pairs `tts_path` with its sibling `.blocks.nim`.
    pub fn for_tts(tts_path: impl Into<PathBuf>) -> Self {
        let tts_path = tts_path.into();
        let blocks_path = blocks_path_for(&tts_path);
        Self {
            tts_path,
            blocks_path,
        }
    }

    /// Prefab name (the `.tts` file stem).
    #[must_use]
    pub fn name(&self) -> String {
        self.tts_path
            .file_stem()
            .map_or_else(|| "prefab".to_string(), |s| s.to_string_lossy().into_owned())
    }

    /// Where the sticker PNG goes inside `out_dir`.
    #[must_use]
    pub fn output_path(&self, out_dir: &Path) -> PathBuf {
        out_dir.join(format!("{}.png", self.name()))
    }

    /// Decodes both files, renders the sticker and writes it (plus the block
    /// map CSV when enabled) into `out_dir`.
    pub fn run(&self, lookup: &ColorLookup, options: StickerOptions, out_dir: &Path) -> PrefabMapResult<PathBuf> {
        let grid = read_tts(&self.tts_path)?;
        let names = read_blocks_nim(&self.blocks_path)?;
        let (sx, sy, sz) = grid.dims();
        debug!(
            "{}: {sx}x{sy}x{sz} voxels, {} block names",
            self.name(),
            names.len()
        );

        let surface = top_surface_names(&grid, &names);
        let image = render_sticker(&surface, lookup, options.scale);
        let out_path = self.output_path(out_dir);
        image
            .save(&out_path)
            .map_err(|e| PrefabMapError::Image(format!("{}: {e}", out_path.display())))?;

        if options.debug_csv {
            let csv_path = out_dir.join(format!("{}_blocks.csv", self.name()));
            write_block_map_csv(&block_map_records(&grid, &names), &csv_path)?;
        }
        Ok(out_path)
    }
}

fn is_skipped(path: &Path) -> bool {
    path.file_name()
        .map(|n| n.to_string_lossy().to_lowercase())
        .is_some_and(|n| SKIPPED_PREFIXES.iter().any(|p| n.starts_with(p)))
}

/// Finds every renderable `.tts` below `dir`.
///
/// Test prefabs (`aaa_*`, `000_*`) are skipped; so are grids without a
/// `.blocks.nim`, with a warning.
pub fn discover_sticker_jobs(dir: &Path) -> std::io::Result<Vec<StickerJob>> {
    let mut jobs = Vec::new();
    for path in find_files(dir, |p| p.extension().is_some_and(|e| e.eq_ignore_ascii_case("tts")))? {
        if is_skipped(&path) {
            debug!("Skipping test prefab {}", path.display());
            continue;
        }
        let job = StickerJob::for_tts(path);
        if !job.blocks_path.is_file() {
            warn!("No .blocks.nim for {}, skipping", job.tts_path.display());
            continue;
        }
        jobs.push(job);
    }
    Ok(jobs)
}

/// Outcome of a sticker batch.
#[derive(Debug, Clone, Default)]
pub struct StickerBatchSummary {
    /// PNGs written
    pub rendered: Vec<PathBuf>,
    /// Inputs that failed, with the reason
    pub failed: Vec<(PathBuf, String)>,
}

/// Runs every job, logging and skipping failures.
pub fn run_sticker_batch(
    jobs: &[StickerJob],
    lookup: &ColorLookup,
    options: StickerOptions,
    out_dir: &Path,
) -> PrefabMapResult<StickerBatchSummary> {
    std::fs::create_dir_all(out_dir)?;
    let mut summary = StickerBatchSummary::default();

    for job in jobs {
        match job.run(lookup, options, out_dir) {
            Ok(path) => {
                debug!("Sticker saved: {}", path.display());
                summary.rendered.push(path);
            },
            Err(e) => {
                error!("Failed to render {}: {e}", job.tts_path.display());
                summary.failed.push((job.tts_path.clone(), e.to_string()));
            },
        }
    }

    info!(
        "Rendered {} stickers ({} failed) into {}",
        summary.rendered.len(),
        summary.failed.len(),
        out_dir.display()
    );
    Ok(summary)
}

/// Writes `block_id,block_name,category,columns` rows.
pub fn write_block_map_csv(records: &[TopBlockRecord], path: &Path) -> std::io::Result<()> {
    let mut out = std::io::BufWriter::new(std::fs::File::create(path)?);
    writeln!(out, "block_id,block_name,category,columns")?;
    for record in records {
        writeln!(
            out,
            "{},{},{},{}",
            record.id,
            escape_field(&record.name),
            record.category,
            record.columns
        )?;
    }
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use prefabmap_formats::{encode_blocks_nim, encode_tts, BlockNameTable, VoxelGrid};
    use tempfile::TempDir;

    fn write_prefab(dir: &Path, stem: &str, with_blocks: bool) -> PathBuf {
        let grid = VoxelGrid::from_ids(1, 2, 2, 1, vec![1, 0, 2, 0]).expect("grid");
        let tts = dir.join(format!("{stem}.tts"));
        std::fs::write(&tts, encode_tts(&grid)).expect("write tts");
        if with_blocks {
            let names: BlockNameTable = [(1, "wood_plank".to_string()), (2, "terrain_dirt".to_string())]
                .into_iter()
                .collect();
            std::fs::write(blocks_path_for(&tts), encode_blocks_nim(&names)).expect("write nim");
        }
        tts
    }

    #[test]
    fn test_render_sticker_scales_and_keeps_air_clear() {
        let surface = SurfaceGrid::from_fn(2, 1, |x, _| if x == 0 { "wood_plank" } else { "air" }.to_string());
        let image = render_sticker(&surface, &ColorLookup::default(), 3);
        assert_eq!(image.dimensions(), (6, 3));
        assert_eq!(image.get_pixel(2, 2).0, [97, 80, 67, 255]);
        assert_eq!(image.get_pixel(3, 0).0[3], 0);
    }

    #[test]
    fn test_zero_scale_is_one() {
        let surface = SurfaceGrid::from_fn(2, 2, |_, _| "concrete".to_string());
        assert_eq!(render_sticker(&surface, &ColorLookup::default(), 0).dimensions(), (2, 2));
    }

    #[test]
    fn test_discover_skips_test_prefabs_and_orphans() {
        let dir = TempDir::new().expect("temp dir");
        write_prefab(dir.path(), "house_01", true);
        write_prefab(dir.path(), "orphan", false);
        write_prefab(dir.path(), "aaa_testing", true);
        write_prefab(dir.path(), "000_blank", true);

        let jobs = discover_sticker_jobs(dir.path()).expect("discover");
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].name(), "house_01");
    }

    #[test]
    fn test_batch_writes_png_and_csv() {
        let dir = TempDir::new().expect("temp dir");
        write_prefab(dir.path(), "house_01", true);
        std::fs::write(dir.path().join("broken.tts"), b"nope").expect("write");
        std::fs::write(dir.path().join("broken.blocks.nim"), [0u8; 8]).expect("write");

        let out = dir.path().join("stickers");
        let jobs = discover_sticker_jobs(dir.path()).expect("discover");
        let options = StickerOptions {
            scale: 2,
            debug_csv: true,
        };
        let summary = run_sticker_batch(&jobs, &ColorLookup::default(), options, &out).expect("batch");

        assert_eq!(summary.rendered, vec![out.join("house_01.png")]);
        assert_eq!(summary.failed.len(), 1);

        let png = image::open(out.join("house_01.png")).expect("open").to_rgba8();
        assert_eq!(png.dimensions(), (4, 4));

        let csv = std::fs::read_to_string(out.join("house_01_blocks.csv")).expect("csv");
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "block_id,block_name,category,columns");
        assert_eq!(lines[1], "1,wood_plank,wood,1");
        assert_eq!(lines[2], "2,terrain_dirt,terrain,1");
    }
}
