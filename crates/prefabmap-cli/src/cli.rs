//! Command-line interface.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Render prefab map layers and voxel stickers.
#[derive(Parser, Debug)]
#[command(name = "prefabmap", version, about)]
pub struct Cli {
    /// Configuration file (defaults to ./prefabmap.toml)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable debug logging and the extra log files
    #[arg(long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Render the POI map layers
    Map(MapArgs),
    /// Render top-down sticker thumbnails of prefabs
    Stickers(StickerArgs),
    /// Print the header and block-ID histogram of a .tts file
    InspectTts {
        /// Voxel grid file
        path: PathBuf,
    },
    /// List the entries of a .blocks.nim file
    InspectNim {
        /// Block-name table file
        path: PathBuf,
    },
    /// Write the effective configuration as TOML
    InitConfig {
        /// Destination (defaults to ./prefabmap.toml)
        path: Option<PathBuf>,
    },
}

/// Options of `prefabmap map`.
#[derive(Args, Debug, Clone, Default)]
pub struct MapArgs {
    /// Full path to prefabs.xml
    #[arg(long, value_name = "FILE")]
    pub xml: Option<PathBuf>,

    /// Full path to Localization.txt
    #[arg(long, value_name = "FILE")]
    pub localization: Option<PathBuf>,

    /// Full path to biomes.png
    #[arg(long, value_name = "FILE")]
    pub biomes: Option<PathBuf>,

    /// Directory of per-prefab XML files (size, difficulty)
    #[arg(long, value_name = "DIR")]
    pub prefab_dir: Option<PathBuf>,

    /// Label mask image with red/green/blue zones
    #[arg(long, value_name = "FILE", conflicts_with = "no_mask")]
    pub mask: Option<PathBuf>,

    /// Ignore the label mask
    #[arg(long)]
    pub no_mask: bool,

    /// Also write composited layers and the all-layers map
    #[arg(long)]
    pub combined: bool,

    /// Replace labels with POI-id badges and list them in the legend
    #[arg(long)]
    pub numbered_dots: bool,

    /// Include the player_starts layer
    #[arg(long)]
    pub with_player_starts: bool,

    /// Only render these biome layers (pine_forest, desert, snow, burnt_forest, wasteland)
    #[arg(long, num_args = 1.., value_name = "BIOME")]
    pub only_biomes: Vec<String>,

    /// Label font size, clamped to 10-60
    #[arg(long, value_name = "PX")]
    pub text_size: Option<u32>,

    /// TrueType font for labels
    #[arg(long, value_name = "FILE")]
    pub font: Option<PathBuf>,

    /// Output directory
    #[arg(long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Write prefab names without a display name to the logs
    #[arg(long)]
    pub log_missing: bool,

    /// Highlight labels placed by the extended search
    #[arg(long)]
    pub extended_placement_debug: bool,

    /// Also write the POI density heatmap
    #[arg(long)]
    pub heatmap: bool,
}

/// Options of `prefabmap stickers`.
#[derive(Args, Debug, Clone, Default)]
pub struct StickerArgs {
    /// Directory searched recursively for .tts files
    #[arg(long, value_name = "DIR", conflicts_with = "tts")]
    pub prefab_dir: Option<PathBuf>,

    /// A single .tts file
    #[arg(long, value_name = "FILE")]
    pub tts: Option<PathBuf>,

    /// blocks.xml with per-block map colors
    #[arg(long, value_name = "FILE")]
    pub blocks_xml: Option<PathBuf>,

    /// Pixels per voxel column
    #[arg(long, value_name = "N")]
    pub scale: Option<u32>,

    /// Output directory
    #[arg(long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Only render the prefab with this name
    #[arg(long, value_name = "NAME")]
    pub only: Option<String>,

    /// Write a block map CSV next to every sticker
    #[arg(long)]
    pub debug_csv: bool,
}
