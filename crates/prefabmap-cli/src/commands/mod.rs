//! Subcommand implementations.

pub mod inspect;
pub mod map;
pub mod stickers;
