//! # prefabmap voxel
//!
//! Reduces decoded prefab voxel grids to what a top-down map needs:
//! - The topmost visible block of every column
//! - A semantic category per block name
//! - Colors per block, from `blocks.xml` or the category palette
//! - Sticker thumbnails rendered from the top surface

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod classify;
pub mod palette;
pub mod sticker;
pub mod surface;

pub use classify::{classify_block, normalize_name, BlockCategory};
pub use palette::{category_color, unknown_block_color, ColorLookup};
pub use sticker::{
    discover_sticker_jobs, render_sticker, run_sticker_batch, write_block_map_csv, StickerBatchSummary, StickerJob,
    StickerOptions,
};
pub use surface::{
    block_map_records, categorize_surface, count_categories, count_top_blocks, top_block_id,
    top_surface_ids, top_surface_names, SurfaceGrid, TopBlockRecord, AIR_ID,
};
