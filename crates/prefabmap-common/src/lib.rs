//! # prefabmap common
//!
//! Shared types used across the prefabmap crates:
//! - Pixel geometry (points, label boxes, the overlap predicate)
//! - World → image coordinate transform
//! - Error types
//! - CSV field quoting
//! - File magic and tool version information

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod csv;
pub mod error;
pub mod geometry;
pub mod version;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::*;
    pub use crate::geometry::*;
    pub use crate::version::*;
}

pub use prelude::*;
