//! # prefabmap render
//!
//! Draws prefab placements as map layers.
//!
//! ## Pipeline
//! - [`collect_pois`]: filter placements, find their pixel and layer
//! - [`render_layer`]: dots, labels and badges for one layer
//! - [`report`]: CSV logs and the JSON run summary
//! - [`heatmap`]: POI density

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod draw;
pub mod font;
pub mod heatmap;
pub mod layer;
pub mod poi;
pub mod report;

pub use font::LabelFont;
pub use heatmap::{density_heatmap, heatmap_overlay};
pub use layer::{render_layer, save_png, LayerInputs, LayerOptions, RenderedLayer, TierColors};
pub use poi::{
    categorize, collect_pois, poi_id, should_exclude, BiomeMap, BiomePalette, Poi, PoiSet, BIOME_PREFIX,
    PLAYER_STARTS, STREETS, UNKNOWN_BIOME,
};
pub use report::{
    write_bounding_boxes, write_excluded, write_legend, write_missing_names, BoundingBoxRecord, LayerStats,
    LegendEntry, RenderReport,
};
