//! # prefabmap label
//!
//! Places text labels next to map dots without covering each other, other
//! dots, or zones a mask forbids.
//!
//! ## Components
//! - [`LabelMask`]: red/green/blue raster of forbidden and preferred zones
//! - [`FontMetrics`]: text measurement the search depends on
//! - [`LabelPlacer`]: the per-layer candidate search

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod mask;
pub mod metrics;
pub mod placement;

pub use mask::{LabelMask, MaskColors, DEFAULT_RED_TOLERANCE};
pub use metrics::{text_box, wrap_label, FixedMetrics, FontMetrics};
pub use placement::{
    badge_box, LabelPlacer, Placement, PlacementConfig, PlacementOutcome, PlacementPass,
};
