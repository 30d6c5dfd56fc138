//! Renderer configuration.
//!
//! Map geometry, label settings, colors and default game paths. Loaded from
//! a TOML file; command-line flags override individual values.

use prefabmap_label::{MaskColors, PlacementConfig, DEFAULT_RED_TOLERANCE};
use prefabmap_render::{BiomePalette, TierColors};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Configuration file name.
pub const CONFIG_FILE: &str = "prefabmap.toml";

/// Renderer configuration parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    // === Map ===
    /// Edge length of the square map images in pixels
    pub image_size: u32,
    /// Pixel of the world origin along both axes
    pub map_center: i32,

    // === Labels ===
    /// POI dot radius
    pub dot_radius: i32,
    /// Padding around label text
    pub label_padding: i32,
    /// Label font size in pixels (10-60)
    pub text_size: u32,
    /// Width at which label text wraps
    pub max_label_width: i32,
    /// TrueType font for labels (None = platform default)
    pub font_path: Option<PathBuf>,

    // === Mask ===
    /// Label mask image
    pub mask_path: PathBuf,
    /// Zone colors in the mask
    pub mask_colors: MaskColors,
    /// Red samples a label box may cover
    pub red_tolerance: usize,

    // === Colors ===
    /// Dot colors per difficulty tier
    pub tier_colors: TierColors,
    /// Biome bitmap colors
    pub biome_palette: BiomePalette,

    // === Paths ===
    /// Game `Data` directory
    pub game_data_dir: PathBuf,
    /// World whose `prefabs.xml` and `biomes.png` are used by default
    pub world: String,
    /// Where rendered files go
    pub output_dir: PathBuf,

    // === Stickers ===
    /// Pixels per voxel column in stickers
    pub sticker_scale: u32,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            // Map
            image_size: 6145,
            map_center: 3072,

            // Labels
            dot_radius: 4,
            label_padding: 4,
            text_size: 25,
            max_label_width: 200,
            font_path: Some(default_font_path()),

            // Mask
            mask_path: PathBuf::from("mask.gif"),
            mask_colors: MaskColors::default(),
            red_tolerance: DEFAULT_RED_TOLERANCE,

            // Colors
            tier_colors: TierColors::default(),
            biome_palette: BiomePalette::default(),

            // Paths
            game_data_dir: default_game_data_dir(),
            world: "Navezgane".to_string(),
            output_dir: PathBuf::from("output"),

            // Stickers
            sticker_scale: 4,
        }
    }
}

impl MapConfig {
    /// Load configuration from [`CONFIG_FILE`] in the working directory.
    /// Returns default config if file doesn't exist.
    pub fn load() -> Self {
        Self::load_from(CONFIG_FILE)
    }

    /// Load configuration from a specific path.
    /// Returns default config if file doesn't exist or is invalid.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();

        if !path.exists() {
            info!("Config file not found, using defaults");
            return Self::default();
        }

        match fs::File::open(path) {
            Ok(mut file) => {
                let mut contents = String::new();
                if let Err(e) = file.read_to_string(&mut contents) {
                    warn!("Failed to read config file: {e}");
                    return Self::default();
                }

                match toml::from_str(&contents) {
                    Ok(config) => {
                        info!("Loaded config from {}", path.display());
                        config
                    },
                    Err(e) => {
                        warn!("Failed to parse config file: {e}");
                        Self::default()
                    },
                }
            },
            Err(e) => {
                warn!("Failed to open config file: {e}");
                Self::default()
            },
        }
    }

    /// Save configuration to a specific path.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        let mut file = fs::File::create(path)?;
        file.write_all(contents.as_bytes())?;

        info!("Saved config to {}", path.display());
        Ok(())
    }

    /// Validate and clamp configuration values to sensible ranges.
    pub fn validate(&mut self) {
        // Map
        self.image_size = self.image_size.clamp(64, 16385);
        self.map_center = self.map_center.clamp(0, self.image_size as i32);

        // Labels
        self.dot_radius = self.dot_radius.clamp(1, 32);
        self.label_padding = self.label_padding.clamp(0, 32);
        self.text_size = self.text_size.clamp(10, 60);
        self.max_label_width = self.max_label_width.clamp(40, 2000);

        // Mask: a box has at most five samples
        self.red_tolerance = self.red_tolerance.min(5);

        // Stickers
        self.sticker_scale = self.sticker_scale.clamp(1, 64);
    }

    /// Placement search settings.
    #[must_use]
    pub fn placement(&self) -> PlacementConfig {
        PlacementConfig {
            label_padding: self.label_padding,
            max_label_width: self.max_label_width,
            dot_radius: self.dot_radius,
            red_tolerance: self.red_tolerance,
        }
    }

    fn world_dir(&self) -> PathBuf {
        self.game_data_dir.join("Worlds").join(&self.world)
    }

    /// Default `prefabs.xml`.
    #[must_use]
    pub fn prefabs_xml(&self) -> PathBuf {
        self.world_dir().join("prefabs.xml")
    }

    /// Default biome bitmap.
    #[must_use]
    pub fn biomes_png(&self) -> PathBuf {
        self.world_dir().join("biomes.png")
    }

    /// Default `Localization.txt`.
    #[must_use]
    pub fn localization(&self) -> PathBuf {
        self.game_data_dir.join("Config").join("Localization.txt")
    }

    /// Default `blocks.xml`.
    #[must_use]
    pub fn blocks_xml(&self) -> PathBuf {
        self.game_data_dir.join("Config").join("blocks.xml")
    }

    /// Default prefab directory.
    #[must_use]
    pub fn prefab_dir(&self) -> PathBuf {
        self.game_data_dir.join("Prefabs")
    }
}

/// Platform-specific game `Data` directory of a Steam install.
fn default_game_data_dir() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("ProgramFiles(x86)")
            .map_or_else(|_| PathBuf::from(r"C:\Program Files (x86)"), PathBuf::from)
            .join(r"Steam\steamapps\common\7 Days To Die\Data")
    }

    #[cfg(target_os = "macos")]
    {
        home_dir().join("Library/Application Support/Steam/steamapps/common/7 Days To Die/7DaysToDie.app/Data")
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        home_dir().join(".steam/steam/steamapps/common/7 Days To Die/Data")
    }
}

#[cfg(not(target_os = "windows"))]
fn home_dir() -> PathBuf {
    std::env::var("HOME").map_or_else(|_| PathBuf::from("."), PathBuf::from)
}

/// Platform font used when none is configured.
fn default_font_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        PathBuf::from(r"C:\Windows\Fonts\arial.ttf")
    }

    #[cfg(target_os = "macos")]
    {
        PathBuf::from("/System/Library/Fonts/Supplemental/Arial.ttf")
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        PathBuf::from("/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = MapConfig::default();
        assert_eq!(config.image_size, 6145);
        assert_eq!(config.map_center, 3072);
        assert_eq!(config.text_size, 25);
        assert_eq!(config.placement(), PlacementConfig::default());
    }

    #[test]
    fn test_config_validation() {
        let mut config = MapConfig::default();

        config.text_size = 200;
        config.dot_radius = 0;
        config.red_tolerance = 9;
        config.sticker_scale = 0;

        config.validate();

        assert_eq!(config.text_size, 60);
        assert_eq!(config.dot_radius, 1);
        assert_eq!(config.red_tolerance, 5);
        assert_eq!(config.sticker_scale, 1);
    }

    #[test]
    fn test_config_save_load() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join("nested").join("prefabmap.toml");

        let mut config = MapConfig::default();
        config.image_size = 3073;
        config.world = "Pregen06".to_string();
        config.tier_colors.unknown = [1, 2, 3];

        config.save_to(&config_path).expect("Failed to save config");

        let loaded = MapConfig::load_from(&config_path);
        assert_eq!(loaded, config);
        assert_eq!(loaded.prefabs_xml(), config.game_data_dir.join("Worlds/Pregen06/prefabs.xml"));
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join("prefabmap.toml");
        fs::write(&config_path, "text_size = 30\n").expect("write");

        let loaded = MapConfig::load_from(&config_path);
        assert_eq!(loaded.text_size, 30);
        assert_eq!(loaded.image_size, 6145);
    }

    #[test]
    fn test_config_load_missing_or_invalid_file() {
        let config = MapConfig::load_from("/nonexistent/path/prefabmap.toml");
        assert_eq!(config.image_size, 6145);

        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join("bad.toml");
        fs::write(&config_path, "image_size = \"big\"").expect("write");
        assert_eq!(MapConfig::load_from(&config_path), MapConfig::default());
    }

    #[test]
    fn test_config_toml_serialization() {
        let toml_str = toml::to_string_pretty(&MapConfig::default()).expect("Failed to serialize");
        assert!(toml_str.contains("image_size"));
        assert!(toml_str.contains("[mask_colors]"));
    }
}
