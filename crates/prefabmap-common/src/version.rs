//! File magic and tool version information.

/// Tool version reported in generated logs and reports.
pub const TOOL_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Magic bytes for file format identification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MagicBytes(pub [u8; 4]);

impl MagicBytes {
    /// Prefab voxel grid (`.tts`) magic bytes.
    pub const TTS: Self = Self(*b"tts\0");

    /// Returns true when `bytes` starts with this magic.
    #[must_use]
    pub fn matches(&self, bytes: &[u8]) -> bool {
        bytes.len() >= 4 && bytes[..4] == self.0
    }
}

impl std::fmt::Display for MagicBytes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.escape_ascii())
    }
}
