//! Top-surface extraction.
//!
//! A prefab seen from above shows, for every column, the highest block that
//! is not air. The file's outermost axis (`z` in `[z][y][x]` nesting order)
//! is the vertical one: columns are addressed by `(x, row)` where `row` is the
//! middle `y` index, and scanned from `z = size_z - 1` downward.

use crate::classify::{classify_block, BlockCategory};
use prefabmap_formats::{BlockNameTable, VoxelGrid};
use serde::Serialize;
use std::collections::BTreeMap;

/// Block ID of empty space.
pub const AIR_ID: u16 = 0;

/// Name reported for air columns.
const AIR_NAME: &str = "air";

/// A 2D grid of per-column values, stored row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurfaceGrid<T> {
    width: usize,
    height: usize,
    cells: Vec<T>,
}

impl<T> SurfaceGrid<T> {
    /// Builds a grid by evaluating `f(x, row)` for every cell.
    pub fn from_fn(width: usize, height: usize, mut f: impl FnMut(usize, usize) -> T) -> Self {
        let mut cells = Vec::with_capacity(width * height);
        for row in 0..height {
            for x in 0..width {
                cells.push(f(x, row));
            }
        }
        Self {
            width,
            height,
            cells,
        }
    }

    /// Number of columns.
    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of rows.
    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Cell at `(x, row)`.
    ///
    /// # Panics
    /// Panics when the coordinates are out of bounds.
    #[must_use]
    pub fn get(&self, x: usize, row: usize) -> &T {
        assert!(x < self.width && row < self.height, "cell ({x}, {row}) out of bounds");
        &self.cells[row * self.width + x]
    }

    /// Row slices, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[T]> {
        // chunks(0) panics, and a zero-width grid has no cells anyway.
        self.cells.chunks(self.width.max(1))
    }

    /// All cells in row-major order.
    #[must_use]
    pub fn cells(&self) -> &[T] {
        &self.cells
    }

    /// Iterates `(x, row, value)`.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &T)> {
        let width = self.width.max(1);
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, v)| (i % width, i / width, v))
    }

    /// Applies `f` to every cell.
    pub fn map<U>(&self, f: impl FnMut(&T) -> U) -> SurfaceGrid<U> {
        SurfaceGrid {
            width: self.width,
            height: self.height,
            cells: self.cells.iter().map(f).collect(),
        }
    }
}

/// Topmost non-air block ID of column `(x, row)`, or [`AIR_ID`].
#[must_use]
pub fn top_block_id(grid: &VoxelGrid, x: usize, row: usize) -> u16 {
    let (_, _, size_z) = grid.dims();
    (0..size_z)
        .rev()
        .map(|z| grid.get(x, row, z))
        .find(|&id| id != AIR_ID)
        .unwrap_or(AIR_ID)
}

/// Topmost block ID of every column.
#[must_use]
pub fn top_surface_ids(grid: &VoxelGrid) -> SurfaceGrid<u16> {
    let (size_x, size_y, _) = grid.dims();
    SurfaceGrid::from_fn(size_x, size_y, |x, row| top_block_id(grid, x, row))
}

fn surface_name(id: u16, names: &BlockNameTable) -> String {
    if id == AIR_ID {
        AIR_NAME.to_string()
    } else {
        names.name(u32::from(id)).into_owned()
    }
}

/// Topmost block name of every column; air columns read `"air"`.
#[must_use]
pub fn top_surface_names(grid: &VoxelGrid, names: &BlockNameTable) -> SurfaceGrid<String> {
    top_surface_ids(grid).map(|&id| surface_name(id, names))
}

/// Category of the topmost block of every column.
#[must_use]
pub fn categorize_surface(grid: &VoxelGrid, names: &BlockNameTable) -> SurfaceGrid<BlockCategory> {
    top_surface_ids(grid).map(|&id| {
        if id == AIR_ID {
            BlockCategory::Air
        } else {
            classify_block(&names.name(u32::from(id)))
        }
    })
}

/// Counts how many columns show each block name. Air is not counted.
#[must_use]
pub fn count_top_blocks(grid: &VoxelGrid, names: &BlockNameTable) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for &id in top_surface_ids(grid).cells() {
        if id != AIR_ID {
            *counts.entry(surface_name(id, names)).or_insert(0) += 1;
        }
    }
    counts
}

/// Folds per-name counts into per-category counts.
#[must_use]
pub fn count_categories(counts: &BTreeMap<String, usize>) -> BTreeMap<BlockCategory, usize> {
    let mut out = BTreeMap::new();
    for (name, &count) in counts {
        *out.entry(classify_block(name)).or_insert(0) += count;
    }
    out
}

/// One distinct block visible from above.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopBlockRecord {
    /// Block ID
    pub id: u16,
    /// Resolved name
    pub name: String,
    /// Classification of `name`
    pub category: BlockCategory,
    /// Number of columns showing it
    pub columns: usize,
}

/// Distinct topmost blocks sorted by ID, for block-map debug output.
#[must_use]
pub fn block_map_records(grid: &VoxelGrid, names: &BlockNameTable) -> Vec<TopBlockRecord> {
    let mut columns: BTreeMap<u16, usize> = BTreeMap::new();
    for &id in top_surface_ids(grid).cells() {
        if id != AIR_ID {
            *columns.entry(id).or_insert(0) += 1;
        }
    }
    columns
        .into_iter()
        .map(|(id, columns)| {
            let name = surface_name(id, names);
            TopBlockRecord {
                id,
                category: classify_block(&name),
                name,
                columns,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names() -> BlockNameTable {
        [(1, "wood_plank".to_string()), (2, "terrain_dirt".to_string())]
            .into_iter()
            .collect()
    }

    #[test]
    fn test_two_by_two_by_one() {
        let grid = VoxelGrid::from_ids(1, 2, 2, 1, vec![1, 0, 2, 0]).expect("grid");
        let surface = categorize_surface(&grid, &names());
        assert_eq!(*surface.get(0, 0), BlockCategory::Wood);
        assert_eq!(*surface.get(1, 0), BlockCategory::Air);
        assert_eq!(*surface.get(0, 1), BlockCategory::Terrain);
        assert_eq!(*surface.get(1, 1), BlockCategory::Air);
    }

    #[test]
    fn test_highest_layer_wins() {
        // 1x1 footprint, three layers: dirt at the bottom, plank above, air on top.
        let grid = VoxelGrid::from_ids(1, 1, 1, 3, vec![2, 1, 0]).expect("grid");
        assert_eq!(top_block_id(&grid, 0, 0), 1);
        assert_eq!(*top_surface_names(&grid, &names()).get(0, 0), "wood_plank");
    }

    #[test]
    fn test_all_air_column() {
        let grid = VoxelGrid::empty(1, 3, 2, 4).expect("grid");
        let ids = top_surface_ids(&grid);
        assert_eq!(ids.width(), 3);
        assert_eq!(ids.height(), 2);
        assert!(ids.cells().iter().all(|&id| id == AIR_ID));
        assert!(top_surface_names(&grid, &names()).cells().iter().all(|n| n == "air"));
    }

    #[test]
    fn test_unknown_ids_resolve_to_placeholder() {
        let grid = VoxelGrid::from_ids(1, 1, 1, 1, vec![77]).expect("grid");
        assert_eq!(*top_surface_names(&grid, &names()).get(0, 0), "unknown_77");
        assert_eq!(*categorize_surface(&grid, &names()).get(0, 0), BlockCategory::Unknown);
    }

    #[test]
    fn test_counts() {
        let grid = VoxelGrid::from_ids(1, 2, 2, 1, vec![1, 0, 2, 1]).expect("grid");
        let counts = count_top_blocks(&grid, &names());
        assert_eq!(counts.get("wood_plank"), Some(&2));
        assert_eq!(counts.get("terrain_dirt"), Some(&1));
        assert_eq!(counts.get("air"), None);

        let categories = count_categories(&counts);
        assert_eq!(categories.get(&BlockCategory::Wood), Some(&2));
        assert_eq!(categories.get(&BlockCategory::Terrain), Some(&1));
    }

    #[test]
    fn test_block_map_records() {
        let grid = VoxelGrid::from_ids(1, 2, 2, 1, vec![2, 1, 2, 0]).expect("grid");
        let records = block_map_records(&grid, &names());
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, 1);
        assert_eq!(records[0].category, BlockCategory::Wood);
        assert_eq!(records[1].name, "terrain_dirt");
        assert_eq!(records[1].columns, 2);
    }

    #[test]
    fn test_grid_iteration() {
        let grid = SurfaceGrid::from_fn(3, 2, |x, row| x + 10 * row);
        let rows: Vec<&[usize]> = grid.rows().collect();
        assert_eq!(rows, vec![&[0, 1, 2][..], &[10, 11, 12][..]]);
        assert_eq!(grid.iter().nth(4), Some((1, 1, &11)));
    }
}
