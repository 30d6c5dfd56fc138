//! Property tests for top-surface extraction.

use prefabmap_formats::VoxelGrid;
use prefabmap_voxel::{top_block_id, top_surface_ids, AIR_ID};
use proptest::prelude::*;

proptest! {
    #[test]
    fn single_voxel_column_reports_its_id(
        height in 1u16..32,
        h in 0usize..32,
        id in 1u16..0x8000,
    ) {
        let h = h % usize::from(height);
        let mut grid = VoxelGrid::empty(1, 1, 1, height).expect("grid");
        grid.set(0, 0, h, id);
        prop_assert_eq!(top_block_id(&grid, 0, 0), id);
    }

    #[test]
    fn all_air_grids_have_air_surfaces(sx in 1u16..8, sy in 1u16..8, sz in 1u16..8) {
        let grid = VoxelGrid::empty(1, sx, sy, sz).expect("grid");
        let surface = top_surface_ids(&grid);
        prop_assert_eq!(surface.width(), usize::from(sx));
        prop_assert_eq!(surface.height(), usize::from(sy));
        prop_assert!(surface.cells().iter().all(|&id| id == AIR_ID));
    }

    #[test]
    fn surface_id_is_highest_non_air(column in proptest::collection::vec(0u16..4, 1..16)) {
        let height = column.len() as u16;
        let grid = VoxelGrid::from_ids(1, 1, 1, height, column.clone()).expect("grid");
        let expected = column.iter().rev().copied().find(|&id| id != AIR_ID).unwrap_or(AIR_ID);
        prop_assert_eq!(top_block_id(&grid, 0, 0), expected);
    }
}
