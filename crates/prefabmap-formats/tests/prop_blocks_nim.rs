use prefabmap_formats::blocks_nim::{decode_blocks_nim, encode_blocks_nim, BlockNameTable};
use proptest::prelude::*;

fn names() -> impl Strategy<Value = Vec<(u32, String)>> {
    prop::collection::vec((any::<u32>(), "[a-zA-Z_][a-zA-Z0-9_]{0,40}"), 0..32)
}

proptest! {
    // tables of well-formed names survive encoding
    #[test]
    fn table_survives_encoding(entries in names()) {
        let table: BlockNameTable = entries.into_iter().collect();
        prop_assert_eq!(decode_blocks_nim(&encode_blocks_nim(&table)), table);
    }

    // arbitrary bytes never panic and every recovered name is reachable
    #[test]
    fn arbitrary_bytes_do_not_panic(bytes in prop::collection::vec(any::<u8>(), 0..256)) {
        let table = decode_blocks_nim(&bytes);
        for (id, name) in table.sorted() {
            prop_assert_eq!(table.name(id), name);
        }
    }
}
