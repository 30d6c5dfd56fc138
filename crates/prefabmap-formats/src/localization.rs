//! Prefab display names from `Localization.txt`.

use ahash::AHashMap;
use std::path::Path;
use tracing::{info, warn};

/// Lower-cased prefab name → display name.
pub type DisplayNames = AHashMap<String, String>;

/// Column holding the English display text.
const DISPLAY_COLUMN: usize = 5;

/// Parses localization CSV text.
///
/// Lines with fewer than six fields, or an empty key or display name, are
/// ignored. Quoted commas are not supported, matching the game's prefab rows.
#[must_use]
pub fn load_display_names(text: &str) -> DisplayNames {
    let text = text.strip_prefix('\u{FEFF}').unwrap_or(text);
    let mut names = DisplayNames::new();

    for line in text.lines() {
        let parts: Vec<&str> = line.trim().split(',').collect();
        if parts.len() <= DISPLAY_COLUMN {
            continue;
        }
        let key = parts[0].trim().to_lowercase();
        let display = parts[DISPLAY_COLUMN].trim();
        if !key.is_empty() && !display.is_empty() {
            names.insert(key, display.to_string());
        }
    }

    names
}

/// Loads display names from a file; a missing or unreadable file yields an
/// empty map with a warning so rendering falls back to prefab names.
#[must_use]
pub fn load_display_names_file(path: impl AsRef<Path>) -> DisplayNames {
    let path = path.as_ref();
    match std::fs::read_to_string(path) {
        Ok(text) => {
            let names = load_display_names(&text);
            info!("Loaded {} display name mappings", names.len());
            names
        },
        Err(e) => {
            warn!("Localization file not available at {}: {e}", path.display());
            DisplayNames::new()
        },
    }
}
