//! `.blocks.nim` block-name table decoding.
//!
//! The file starts with an 8-byte header that carries nothing the renderer
//! needs, followed by records until end of file:
//!
//! | size | field                       |
//! |------|-----------------------------|
//! | 4    | block ID (`i32` LE)         |
//! | 1    | name length `n`             |
//! | n    | name (UTF-8)                |

use ahash::AHashMap;
use prefabmap_common::PrefabMapResult;
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Bytes skipped at the start of every `.blocks.nim` file.
pub const NIM_HEADER_SIZE: usize = 8;

/// Block-type ID → block name mapping for one prefab.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockNameTable {
    names: AHashMap<u32, String>,
}

impl BlockNameTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a name. Later records win, as in the file.
    pub fn insert(&mut self, id: u32, name: impl Into<String>) {
        self.names.insert(id, name.into());
    }

    /// Name for `id`, if the table has one.
    #[must_use]
    pub fn get(&self, id: u32) -> Option<&str> {
        self.names.get(&id).map(String::as_str)
    }

    /// Name for `id`, falling back to `unknown_<id>`.
    #[must_use]
    pub fn name(&self, id: u32) -> Cow<'_, str> {
        match self.names.get(&id) {
            Some(name) => Cow::Borrowed(name.as_str()),
            None => Cow::Owned(format!("unknown_{id}")),
        }
    }

    /// Number of names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Entries sorted by ID.
    #[must_use]
    pub fn sorted(&self) -> Vec<(u32, &str)> {
        let mut entries: Vec<_> = self
            .names
            .iter()
            .map(|(&id, name)| (id, name.as_str()))
            .collect();
        entries.sort_by_key(|&(id, _)| id);
        entries
    }
}

impl FromIterator<(u32, String)> for BlockNameTable {
    fn from_iter<I: IntoIterator<Item = (u32, String)>>(iter: I) -> Self {
        Self {
            names: iter.into_iter().collect(),
        }
    }
}

/// Decodes a `.blocks.nim` byte stream.
///
/// Decoding is best-effort: a record cut off before its name length ends
/// the stream with a warning, and a name cut off by the end of the stream is
/// kept as far as it goes. Invalid UTF-8 is replaced with U+FFFD.
#[must_use]
pub fn decode_blocks_nim(bytes: &[u8]) -> BlockNameTable {
    let mut table = BlockNameTable::new();
    let mut offset = NIM_HEADER_SIZE;

    while offset < bytes.len() {
        let Some(id_bytes) = bytes.get(offset..offset + 4) else {
            warn!("Truncated block ID at offset {offset}");
            break;
        };
        let id = u32::from_le_bytes([id_bytes[0], id_bytes[1], id_bytes[2], id_bytes[3]]);
        offset += 4;

        let Some(&len) = bytes.get(offset) else {
            warn!("Missing name length for block ID {id} at offset {offset}");
            break;
        };
        offset += 1;

        let end = offset + usize::from(len);
        if end > bytes.len() {
            warn!("Truncated name for block ID {id} at offset {offset}, keeping the partial name");
        }
        let name_bytes = &bytes[offset..end.min(bytes.len())];
        offset = end;

        table.insert(id, String::from_utf8_lossy(name_bytes).into_owned());
    }

    debug!("Parsed {} block names from .blocks.nim", table.len());
    table
}

/// Encodes a table with a zeroed header. Names longer than 255 bytes are
/// truncated at a character boundary.
#[must_use]
pub fn encode_blocks_nim(table: &BlockNameTable) -> Vec<u8> {
    let mut out = vec![0u8; NIM_HEADER_SIZE];
    for (id, name) in table.sorted() {
        let mut end = name.len().min(usize::from(u8::MAX));
        while !name.is_char_boundary(end) {
            end -= 1;
        }
        out.extend_from_slice(&id.to_le_bytes());
        out.push(end as u8);
        out.extend_from_slice(&name.as_bytes()[..end]);
    }
    out
}

/// Reads and decodes a `.blocks.nim` file.
pub fn read_blocks_nim(path: impl AsRef<Path>) -> PrefabMapResult<BlockNameTable> {
    let bytes = std::fs::read(path.as_ref())?;
    Ok(decode_blocks_nim(&bytes))
}

/// Path of the block table paired with a `.tts` file (`x.tts` → `x.blocks.nim`).
#[must_use]
pub fn blocks_path_for(tts_path: &Path) -> PathBuf {
    tts_path.with_extension("blocks.nim")
}
