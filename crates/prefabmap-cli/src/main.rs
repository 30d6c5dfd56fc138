//! # prefabmap
//!
//! Command-line entry point:
//! - `map`: POI map layers with labels, legend data and reports
//! - `stickers`: top-down thumbnails of prefab voxel grids
//! - `inspect-tts` / `inspect-nim`: dump the binary prefab files
//! - `init-config`: write `prefabmap.toml`

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

mod cli;
mod commands;
mod config;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command};
use config::MapConfig;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Main entry point.
fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "prefabmap=debug" } else { "prefabmap=info" };
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive(level.parse()?))
        .init();

    info!("prefabmap {}", prefabmap_common::TOOL_VERSION);

    let mut config = match &cli.config {
        Some(path) => MapConfig::load_from(path),
        None => MapConfig::load(),
    };
    config.validate();

    match &cli.command {
        Command::Map(args) => commands::map::run(args, &config, cli.verbose),
        Command::Stickers(args) => commands::stickers::run(args, &config),
        Command::InspectTts { path } => commands::inspect::run_tts(path),
        Command::InspectNim { path } => commands::inspect::run_nim(path),
        Command::InitConfig { path } => {
            let path = path.clone().unwrap_or_else(|| config::CONFIG_FILE.into());
            config.save_to(&path)?;
            Ok(())
        },
    }
}
