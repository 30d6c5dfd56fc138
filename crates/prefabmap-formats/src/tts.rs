//! `.tts` prefab voxel grid decoding.
//!
//! Layout (all integers little-endian):
//!
//! | offset | size | field                      |
//! |--------|------|----------------------------|
//! | 0      | 4    | magic `"tts\0"`            |
//! | 4      | 4    | format version (`u32`)     |
//! | 8      | 2    | `size_x` (`u16`)           |
//! | 10     | 2    | `size_y` (`u16`)           |
//! | 12     | 2    | `size_z` (`u16`)           |
//! | 14     | 4·n  | voxel words (`u32`)        |
//!
//! Voxel words are stored in z, y, x nesting order; the low 15 bits of each
//! word are the block-type ID, the upper bits carry rotation and flags which
//! the map renderer ignores.
//!
//! # Example
//!
//! ```
//! use prefabmap_formats::tts::{decode_tts, encode_tts, VoxelGrid};
//!
//! let grid = VoxelGrid::from_ids(1, 2, 2, 1, vec![1, 0, 2, 0]).unwrap();
//! let bytes = encode_tts(&grid);
//! let decoded = decode_tts(&bytes).unwrap();
//! assert_eq!(decoded.get(0, 1, 0), 2);
//! ```

use prefabmap_common::{FormatError, MagicBytes, PrefabMapResult};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use tracing::debug;

/// Mask selecting the block-type ID from a voxel word.
pub const BLOCK_ID_MASK: u32 = 0x7FFF;

/// Size of one voxel word in bytes.
const WORD_SIZE: usize = 4;

/// Fixed `.tts` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TtsHeader {
    /// Format version.
    pub version: u32,
    /// Size along x.
    pub size_x: u16,
    /// Size along y.
    pub size_y: u16,
    /// Size along z.
    pub size_z: u16,
}

impl TtsHeader {
    /// Header size in bytes.
    pub const SIZE: usize = 14;

    /// Parses the header from the start of `bytes`.
    pub fn parse(bytes: &[u8]) -> Result<Self, FormatError> {
        if bytes.len() < Self::SIZE {
            if !bytes.is_empty() && !MagicBytes::TTS.matches(bytes) && bytes.len() >= 4 {
                return Err(invalid_magic(bytes));
            }
            return Err(FormatError::TruncatedHeader {
                needed: Self::SIZE,
                actual: bytes.len(),
            });
        }
        if !MagicBytes::TTS.matches(bytes) {
            return Err(invalid_magic(bytes));
        }

        Ok(Self {
            version: u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]),
            size_x: u16::from_le_bytes([bytes[8], bytes[9]]),
            size_y: u16::from_le_bytes([bytes[10], bytes[11]]),
            size_z: u16::from_le_bytes([bytes[12], bytes[13]]),
        })
    }

    /// Serializes the header.
    #[must_use]
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut out = [0u8; Self::SIZE];
        out[..4].copy_from_slice(&MagicBytes::TTS.0);
        out[4..8].copy_from_slice(&self.version.to_le_bytes());
        out[8..10].copy_from_slice(&self.size_x.to_le_bytes());
        out[10..12].copy_from_slice(&self.size_y.to_le_bytes());
        out[12..14].copy_from_slice(&self.size_z.to_le_bytes());
        out
    }

    /// Number of voxels declared by the dimensions.
    pub fn voxel_count(&self) -> Result<usize, FormatError> {
        usize::from(self.size_x)
            .checked_mul(usize::from(self.size_y))
            .and_then(|n| n.checked_mul(usize::from(self.size_z)))
            .ok_or(FormatError::DimensionsTooLarge {
                x: self.size_x,
                y: self.size_y,
                z: self.size_z,
            })
    }
}

fn invalid_magic(bytes: &[u8]) -> FormatError {
    FormatError::InvalidMagic {
        expected: MagicBytes::TTS.0,
        actual: bytes[..bytes.len().min(4)].to_vec(),
    }
}

/// Decoded prefab voxel grid.
///
/// Block IDs are stored densely in file order, indexed `[z][y][x]`. The grid
/// is immutable once decoded; [`VoxelGrid::set`] exists for building
/// synthetic grids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoxelGrid {
    version: u32,
    size_x: u16,
    size_y: u16,
    size_z: u16,
    ids: Vec<u16>,
}

impl VoxelGrid {
    /// Creates an all-air grid.
    pub fn empty(version: u32, size_x: u16, size_y: u16, size_z: u16) -> Result<Self, FormatError> {
        let header = TtsHeader {
            version,
            size_x,
            size_y,
            size_z,
        };
        let count = header.voxel_count()?;
        Ok(Self {
            version,
            size_x,
            size_y,
            size_z,
            ids: vec![0; count],
        })
    }

    /// Creates a grid from IDs in z, y, x order.
    pub fn from_ids(
        version: u32,
        size_x: u16,
        size_y: u16,
        size_z: u16,
        ids: Vec<u16>,
    ) -> Result<Self, FormatError> {
        let expected = TtsHeader {
            version,
            size_x,
            size_y,
            size_z,
        }
        .voxel_count()?;
        if ids.len() != expected {
            return Err(FormatError::SizeMismatch {
                expected,
                actual: ids.len(),
            });
        }
        Ok(Self {
            version,
            size_x,
            size_y,
            size_z,
            ids: ids.into_iter().map(|id| id & BLOCK_ID_MASK as u16).collect(),
        })
    }

    /// Header describing this grid.
    #[must_use]
    pub fn header(&self) -> TtsHeader {
        TtsHeader {
            version: self.version,
            size_x: self.size_x,
            size_y: self.size_y,
            size_z: self.size_z,
        }
    }

    /// Format version the grid was read with.
    #[must_use]
    pub fn version(&self) -> u32 {
        self.version
    }

    /// Dimensions `(size_x, size_y, size_z)`.
    #[must_use]
    pub fn dims(&self) -> (usize, usize, usize) {
        (
            usize::from(self.size_x),
            usize::from(self.size_y),
            usize::from(self.size_z),
        )
    }

    /// Total number of voxels.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether the grid holds no voxels.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Raw IDs in z, y, x order.
    #[must_use]
    pub fn ids(&self) -> &[u16] {
        &self.ids
    }

    /// Linear index of `(x, y, z)`.
    #[inline]
    #[must_use]
    pub fn index(&self, x: usize, y: usize, z: usize) -> usize {
        let (sx, sy, _) = self.dims();
        (z * sy + y) * sx + x
    }

    /// Block ID at `(x, y, z)`.
    ///
    /// # Panics
    /// Panics if the coordinate is outside the grid.
    #[inline]
    #[must_use]
    pub fn get(&self, x: usize, y: usize, z: usize) -> u16 {
        self.ids[self.index(x, y, z)]
    }

    /// Sets the block ID at `(x, y, z)`, masking it to 15 bits.
    pub fn set(&mut self, x: usize, y: usize, z: usize, id: u16) {
        let i = self.index(x, y, z);
        self.ids[i] = id & BLOCK_ID_MASK as u16;
    }

    /// Distinct block IDs present, air included.
    #[must_use]
    pub fn unique_ids(&self) -> BTreeSet<u16> {
        self.ids.iter().copied().collect()
    }

    /// Number of voxels per block ID.
    #[must_use]
    pub fn id_histogram(&self) -> BTreeMap<u16, usize> {
        let mut counts = BTreeMap::new();
        for &id in &self.ids {
            *counts.entry(id).or_insert(0) += 1;
        }
        counts
    }
}

/// Decodes a `.tts` byte stream.
///
/// Bytes after the declared payload are ignored.
pub fn decode_tts(bytes: &[u8]) -> Result<VoxelGrid, FormatError> {
    let header = TtsHeader::parse(bytes)?;
    let expected = header.voxel_count()?;

    let payload = &bytes[TtsHeader::SIZE..];
    let available = payload.len() / WORD_SIZE;
    if available < expected {
        return Err(FormatError::TruncatedPayload {
            expected,
            actual: available,
        });
    }

    let ids: Vec<u16> = payload
        .chunks_exact(WORD_SIZE)
        .take(expected)
        .map(|w| (u32::from_le_bytes([w[0], w[1], w[2], w[3]]) & BLOCK_ID_MASK) as u16)
        .collect();

    debug!(
        "Decoded tts v{}: {}x{}x{} = {} voxels",
        header.version, header.size_x, header.size_y, header.size_z, expected
    );

    Ok(VoxelGrid {
        version: header.version,
        size_x: header.size_x,
        size_y: header.size_y,
        size_z: header.size_z,
        ids,
    })
}

/// Encodes a grid as a `.tts` byte stream with all flag bits cleared.
#[must_use]
pub fn encode_tts(grid: &VoxelGrid) -> Vec<u8> {
    let mut out = Vec::with_capacity(TtsHeader::SIZE + grid.len() * WORD_SIZE);
    out.extend_from_slice(&grid.header().to_bytes());
    for &id in grid.ids() {
        out.extend_from_slice(&u32::from(id).to_le_bytes());
    }
    out
}

/// Reads and decodes a `.tts` file.
pub fn read_tts(path: impl AsRef<Path>) -> PrefabMapResult<VoxelGrid> {
    let bytes = std::fs::read(path.as_ref())?;
    Ok(decode_tts(&bytes)?)
}
