//! `prefabmap inspect-tts` and `prefabmap inspect-nim`.

use anyhow::{Context, Result};
use prefabmap_formats::{blocks_path_for, read_blocks_nim, read_tts, BlockNameTable, VoxelGrid};
use prefabmap_voxel::{classify_block, count_categories, count_top_blocks};
use std::fmt;
use std::path::Path;
use tracing::debug;

struct TtsSummary<'a> {
    grid: &'a VoxelGrid,
    names: Option<&'a BlockNameTable>,
}

impl fmt::Display for TtsSummary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let header = self.grid.header();
        writeln!(f, "version: {}", header.version)?;
        writeln!(f, "size: {} x {} x {}", header.size_x, header.size_y, header.size_z)?;
        writeln!(f, "voxels: {}", self.grid.len())?;

        writeln!(f, "block ids:")?;
        for (id, count) in self.grid.id_histogram() {
            match self.names {
                Some(table) => {
                    let name = table.name(u32::from(id));
                    writeln!(f, "  {id:>5}  {count:>8}  {name} ({})", classify_block(&name))?;
                },
                None => writeln!(f, "  {id:>5}  {count:>8}")?,
            }
        }

        if let Some(table) = self.names {
            writeln!(f, "top surface:")?;
            for (category, columns) in count_categories(&count_top_blocks(self.grid, table)) {
                writeln!(f, "  {:<10} {columns}", category.as_str())?;
            }
        }
        Ok(())
    }
}

struct NimSummary<'a>(&'a BlockNameTable);

impl fmt::Display for NimSummary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "entries: {}", self.0.len())?;
        for (id, name) in self.0.sorted() {
            writeln!(f, "  {id:>5}  {name}")?;
        }
        Ok(())
    }
}

/// Header, block-ID histogram and top-surface categories of a grid.
///
/// Names come from `names` when given.
#[must_use]
pub fn describe_tts(grid: &VoxelGrid, names: Option<&BlockNameTable>) -> String {
    TtsSummary { grid, names }.to_string()
}

/// Table entries, one `id name` line each in ID order.
#[must_use]
pub fn describe_nim(table: &BlockNameTable) -> String {
    NimSummary(table).to_string()
}

/// Prints [`describe_tts`] for `path`, using its sibling `.blocks.nim` when
/// present.
pub fn run_tts(path: &Path) -> Result<()> {
    let grid = read_tts(path).with_context(|| format!("reading {}", path.display()))?;
    let nim = blocks_path_for(path);
    let names = if nim.is_file() {
        Some(read_blocks_nim(&nim).with_context(|| format!("reading {}", nim.display()))?)
    } else {
        debug!("No block names at {}", nim.display());
        None
    };
    print!("{}", describe_tts(&grid, names.as_ref()));
    Ok(())
}

/// Prints [`describe_nim`] for `path`.
pub fn run_nim(path: &Path) -> Result<()> {
    let table = read_blocks_nim(path).with_context(|| format!("reading {}", path.display()))?;
    print!("{}", describe_nim(&table));
    Ok(())
}
