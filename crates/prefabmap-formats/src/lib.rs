//! # prefabmap formats
//!
//! Readers for the game files prefabmap consumes:
//! - `.tts` voxel block grids
//! - `.blocks.nim` block-name tables
//! - `prefabs.xml` placements and per-prefab metadata XML
//! - `blocks.xml` map colors
//! - `Localization.txt` display names

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod blocks_nim;
pub mod blocks_xml;
pub mod discover;
pub mod localization;
pub mod prefabs;
pub mod tts;

pub use blocks_nim::{blocks_path_for, decode_blocks_nim, encode_blocks_nim, read_blocks_nim, BlockNameTable};
pub use blocks_xml::{load_block_colors, load_block_colors_file, BlockColors};
pub use discover::find_files;
pub use localization::{load_display_names, load_display_names_file, DisplayNames};
pub use prefabs::{
    load_prefab_metadata_dir, load_prefabs, load_prefabs_file, parse_prefab_metadata,
    PrefabMetadata, PrefabPlacement,
};
pub use tts::{decode_tts, encode_tts, read_tts, TtsHeader, VoxelGrid, BLOCK_ID_MASK};

use prefabmap_common::PrefabMapError;
use std::path::Path;

/// Wraps a `roxmltree` parse failure with the path it came from.
pub(crate) fn xml_error(path: &Path, err: &roxmltree::Error) -> PrefabMapError {
    PrefabMapError::Xml {
        path: path.display().to_string(),
        message: err.to_string(),
    }
}
