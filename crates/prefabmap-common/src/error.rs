//! Error types for prefabmap.

use thiserror::Error;

/// Top-level error type for prefabmap operations.
#[derive(Debug, Error)]
pub enum PrefabMapError {
    /// Binary format errors
    #[error("Format error: {0}")]
    Format(#[from] FormatError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// XML parse errors
    #[error("XML error in {path}: {message}")]
    Xml {
        /// File the document came from
        path: String,
        /// Parser message
        message: String,
    },

    /// Image decode/encode errors
    #[error("Image error: {0}")]
    Image(String),

    /// Font loading errors
    #[error("Font error: {0}")]
    Font(String),

    /// Invalid configuration
    #[error("Config error: {0}")]
    Config(String),
}

/// Errors raised while decoding the game's binary prefab files.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    /// Magic bytes did not match
    #[error("Invalid magic: expected {expected:?}, got {actual:?}")]
    InvalidMagic {
        /// Expected magic
        expected: [u8; 4],
        /// Bytes found at the start of the file
        actual: Vec<u8>,
    },

    /// Header shorter than the fixed header size
    #[error("Truncated header: need {needed} bytes, got {actual}")]
    TruncatedHeader {
        /// Bytes needed
        needed: usize,
        /// Bytes available
        actual: usize,
    },

    /// Payload shorter than the dimensions declare
    #[error("Truncated payload: expected {expected} voxels, file holds {actual}")]
    TruncatedPayload {
        /// Voxel count declared by the header
        expected: usize,
        /// Complete voxel words present
        actual: usize,
    },

    /// Declared dimensions overflow addressable memory
    #[error("Dimensions {x}x{y}x{z} are too large")]
    DimensionsTooLarge {
        /// Size along x
        x: u16,
        /// Size along y
        y: u16,
        /// Size along z
        z: u16,
    },

    /// Voxel count does not match the declared dimensions
    #[error("Grid holds {actual} voxels but dimensions require {expected}")]
    SizeMismatch {
        /// Voxel count required by the dimensions
        expected: usize,
        /// Voxel count supplied
        actual: usize,
    },
}

/// Result type alias for prefabmap operations.
pub type PrefabMapResult<T> = Result<T, PrefabMapError>;
