//! Run artifacts: CSV logs, name lists and the JSON summary.

use prefabmap_common::csv::escape_field;
use prefabmap_common::{LabelBox, PrefabMapResult, TOOL_VERSION};
use prefabmap_label::PlacementPass;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;

/// Box drawn for one POI on one layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingBoxRecord {
    /// POI id
    pub poi_id: String,
    /// Layer category
    pub layer: String,
    /// Label or badge box
    pub label_box: LabelBox,
}

/// A POI shown by id on the map, to be looked up in the legend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegendEntry {
    /// POI id
    pub poi_id: String,
    /// Text the label would have shown
    pub display_name: String,
    /// Prefab name
    pub prefab_name: String,
    /// Layer category
    pub layer: String,
}

/// Counts for one rendered layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerStats {
    /// Layer category
    pub category: String,
    /// Dots drawn
    pub points: usize,
    /// Labels accepted, per search pass
    pub labels: BTreeMap<PlacementPass, usize>,
    /// POIs that fell back to a badge
    pub badges: usize,
}

impl LayerStats {
    /// Empty stats for `category`.
    #[must_use]
    pub fn new(category: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            ..Self::default()
        }
    }

    /// Counts one accepted label.
    pub fn record_label(&mut self, pass: PlacementPass) {
        *self.labels.entry(pass).or_default() += 1;
    }

    /// Labels accepted in any pass.
    #[must_use]
    pub fn total_labels(&self) -> usize {
        self.labels.values().sum()
    }
}

/// `render_report.json` contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderReport {
    /// Tool version
    pub version: String,
    /// Edge length of every layer image
    pub image_size: u32,
    /// POIs kept after exclusion
    pub total_pois: usize,
    /// Distinct excluded prefab names
    pub excluded: usize,
    /// Distinct prefab names without a display name
    pub missing_display_names: usize,
    /// Per-layer counts, in render order
    pub layers: Vec<LayerStats>,
}

impl RenderReport {
    /// Empty report for a map of `image_size` pixels.
    #[must_use]
    pub fn new(image_size: u32) -> Self {
        Self {
            version: TOOL_VERSION.to_string(),
            image_size,
            total_pois: 0,
            excluded: 0,
            missing_display_names: 0,
            layers: Vec::new(),
        }
    }

    /// Writes the report as pretty-printed JSON.
    pub fn save(&self, path: &Path) -> PrefabMapResult<()> {
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(path, json)?;
        info!("Render report saved to {}", path.display());
        Ok(())
    }
}

fn version_header(out: &mut impl Write) -> std::io::Result<()> {
    writeln!(out, "# prefabmap version: {TOOL_VERSION}")
}

/// Writes `bounding_boxes.csv`.
pub fn write_bounding_boxes(records: &[BoundingBoxRecord], path: &Path) -> std::io::Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    version_header(&mut out)?;
    writeln!(out, "poi_id,layer,x1,y1,x2,y2")?;
    for r in records {
        let b = r.label_box;
        writeln!(out, "{},{},{},{},{},{}", r.poi_id, escape_field(&r.layer), b.x1, b.y1, b.x2, b.y2)?;
    }
    out.flush()
}

/// Writes `poi_legend.csv`, sorted by POI id.
pub fn write_legend(entries: &[LegendEntry], path: &Path) -> std::io::Result<()> {
    let mut sorted: Vec<&LegendEntry> = entries.iter().collect();
    sorted.sort_by(|a, b| a.poi_id.cmp(&b.poi_id));

    let mut out = BufWriter::new(File::create(path)?);
    writeln!(out, "poi_id,display_name,prefab_name,layer")?;
    for e in sorted {
        writeln!(
            out,
            "{},{},{},{}",
            e.poi_id,
            escape_field(&e.display_name),
            escape_field(&e.prefab_name),
            escape_field(&e.layer)
        )?;
    }
    out.flush()
}

/// Writes `missing_display_names.txt`: one prefab name per line.
pub fn write_missing_names(names: &BTreeSet<String>, path: &Path) -> std::io::Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    for name in names {
        writeln!(out, "{name}")?;
    }
    out.flush()
}

/// Writes `excluded_prefabs.txt` as `excluded,<name>` rows.
pub fn write_excluded(names: &BTreeSet<String>, path: &Path) -> std::io::Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    version_header(&mut out)?;
    for name in names {
        writeln!(out, "excluded,{name}")?;
    }
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_bounding_boxes_csv() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("bounding_boxes.csv");
        let records = vec![BoundingBoxRecord {
            poi_id: "P0003".to_string(),
            layer: "biome_desert".to_string(),
            label_box: LabelBox::new(1, 2, 30, 40),
        }];
        write_bounding_boxes(&records, &path).expect("write");

        let text = std::fs::read_to_string(&path).expect("read");
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines[0].starts_with("# prefabmap version: "));
        assert_eq!(lines[1], "poi_id,layer,x1,y1,x2,y2");
        assert_eq!(lines[2], "P0003,biome_desert,1,2,30,40");
    }

    #[test]
    fn test_legend_sorted_and_quoted() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("poi_legend.csv");
        let entry = |id: &str, name: &str| LegendEntry {
            poi_id: id.to_string(),
            display_name: name.to_string(),
            prefab_name: "house_01".to_string(),
            layer: "biome_snow".to_string(),
        };
        write_legend(&[entry("P0010", "Shack, Old"), entry("P0002", "Barn")], &path).expect("write");

        let text = std::fs::read_to_string(&path).expect("read");
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[1], "P0002,Barn,house_01,biome_snow");
        assert_eq!(lines[2], "P0010,\"Shack, Old\",house_01,biome_snow");
    }

    #[test]
    fn test_name_lists() {
        let dir = TempDir::new().expect("temp dir");
        let names: BTreeSet<String> = ["sign_stop", "bridge_01"].iter().map(ToString::to_string).collect();

        let missing = dir.path().join("missing.txt");
        write_missing_names(&names, &missing).expect("write");
        assert_eq!(std::fs::read_to_string(&missing).expect("read"), "bridge_01\nsign_stop\n");

        let excluded = dir.path().join("excluded.txt");
        write_excluded(&names, &excluded).expect("write");
        let text = std::fs::read_to_string(&excluded).expect("read");
        assert!(text.ends_with("excluded,bridge_01\nexcluded,sign_stop\n"));
    }

    #[test]
    fn test_report_json() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("render_report.json");

        let mut stats = LayerStats::new("streets");
        stats.points = 3;
        stats.record_label(PlacementPass::Direct);
        stats.record_label(PlacementPass::Direct);
        assert_eq!(stats.total_labels(), 2);

        let mut report = RenderReport::new(6145);
        report.layers.push(stats);
        report.save(&path).expect("save");

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).expect("read")).expect("json");
        assert_eq!(value["image_size"], 6145);
        assert_eq!(value["layers"][0]["labels"]["direct"], 2);

        let back: RenderReport = serde_json::from_value(value).expect("roundtrip");
        assert_eq!(back, report);
    }
}
