use prefabmap_formats::tts::{decode_tts, encode_tts, TtsHeader, VoxelGrid, BLOCK_ID_MASK};
use proptest::prelude::*;

fn dim() -> impl Strategy<Value = u16> {
    1u16..=6
}

fn stream() -> impl Strategy<Value = (u16, u16, u16, Vec<u32>)> {
    (dim(), dim(), dim()).prop_flat_map(|(sx, sy, sz)| {
        let n = usize::from(sx) * usize::from(sy) * usize::from(sz);
        (Just(sx), Just(sy), Just(sz), prop::collection::vec(any::<u32>(), n))
    })
}

fn raw_bytes(sx: u16, sy: u16, sz: u16, words: &[u32]) -> Vec<u8> {
    let header = TtsHeader { version: 19, size_x: sx, size_y: sy, size_z: sz };
    let mut bytes = header.to_bytes().to_vec();
    for w in words {
        bytes.extend_from_slice(&w.to_le_bytes());
    }
    bytes
}

proptest! {
    // every declared voxel decodes to its word's low 15 bits
    #[test]
    fn decode_yields_masked_words((sx, sy, sz, words) in stream()) {
        let grid = decode_tts(&raw_bytes(sx, sy, sz, &words)).expect("decode");
        prop_assert_eq!(grid.len(), words.len());
        for (id, w) in grid.ids().iter().zip(&words) {
            prop_assert_eq!(u32::from(*id), w & BLOCK_ID_MASK);
        }
    }

    // a synthetic grid survives encoding
    #[test]
    fn encoded_grid_decodes_to_same_ids((sx, sy, sz, words) in stream()) {
        let ids = words.iter().map(|w| (w & BLOCK_ID_MASK) as u16).collect();
        let grid = VoxelGrid::from_ids(4, sx, sy, sz, ids).expect("grid");
        prop_assert_eq!(decode_tts(&encode_tts(&grid)).expect("decode"), grid);
    }

    // dropping any number of payload bytes is reported, never panics
    #[test]
    fn truncation_is_an_error((sx, sy, sz, words) in stream(), cut in 1usize..=8) {
        let mut bytes = raw_bytes(sx, sy, sz, &words);
        let cut = cut.min(bytes.len());
        bytes.truncate(bytes.len() - cut);
        prop_assert!(decode_tts(&bytes).is_err());
    }
}
