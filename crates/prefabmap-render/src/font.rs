//! Label font: a TrueType face when one is available, fixed metrics otherwise.

use ab_glyph::{FontVec, PxScale};
use image::{Rgba, RgbaImage};
use imageproc::drawing::{draw_text_mut, text_size};
use prefabmap_common::{PrefabMapError, PrefabMapResult};
use prefabmap_label::{FixedMetrics, FontMetrics};
use std::path::Path;
use tracing::{info, warn};

/// Font used to measure and draw label text.
pub enum LabelFont {
    /// A loaded TrueType/OpenType face
    Glyphs {
        /// Parsed font
        font: FontVec,
        /// Pixel scale
        scale: PxScale,
        /// Height of one text line
        line_height: i32,
    },
    /// No face available: boxes are measured, text is not drawn
    Metrics(FixedMetrics),
}

impl std::fmt::Debug for LabelFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Glyphs { scale, line_height, .. } => f
                .debug_struct("Glyphs")
                .field("scale", scale)
                .field("line_height", line_height)
                .finish_non_exhaustive(),
            Self::Metrics(m) => f.debug_tuple("Metrics").field(m).finish(),
        }
    }
}

impl LabelFont {
    /// Loads a font file at `text_size` pixels.
    pub fn load(path: impl AsRef<Path>, text_size: u32) -> PrefabMapResult<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        let font = FontVec::try_from_vec(bytes)
            .map_err(|e| PrefabMapError::Font(format!("{}: {e}", path.display())))?;
        let scale = PxScale::from(text_size as f32);
        let line_height = text_size_of(scale, &font, "Ay").1.max(1);
        info!("Loaded font {} at {text_size}px", path.display());
        Ok(Self::Glyphs {
            font,
            scale,
            line_height,
        })
    }

    /// Measurement-only fallback for `text_size`.
    #[must_use]
    pub fn fallback(text_size: u32) -> Self {
        Self::Metrics(FixedMetrics::for_text_size(text_size))
    }

    /// Loads `path` when given, falling back to fixed metrics with a warning
    /// when it is missing or unreadable.
    #[must_use]
    pub fn load_or_fallback(path: Option<&Path>, text_size: u32) -> Self {
        match path {
            Some(path) => match Self::load(path, text_size) {
                Ok(font) => font,
                Err(e) => {
                    warn!("Font unavailable ({e}); labels will be boxes without text");
                    Self::fallback(text_size)
                },
            },
            None => {
                warn!("No font configured; labels will be boxes without text");
                Self::fallback(text_size)
            },
        }
    }

    /// Whether text is actually drawn.
    #[must_use]
    pub fn has_glyphs(&self) -> bool {
        matches!(self, Self::Glyphs { .. })
    }

    /// Draws `text` with its top-left at `(x, y)`.
    pub fn draw(&self, canvas: &mut RgbaImage, color: Rgba<u8>, x: i32, y: i32, text: &str) {
        if let Self::Glyphs { font, scale, .. } = self {
            draw_text_mut(canvas, color, x, y, *scale, font, text);
        }
    }
}

fn text_size_of(scale: PxScale, font: &FontVec, text: &str) -> (i32, i32) {
    let (w, h) = text_size(scale, font, text);
    (w as i32, h as i32)
}

impl FontMetrics for LabelFont {
    fn text_width(&self, text: &str) -> i32 {
        match self {
            Self::Glyphs { font, scale, .. } => text_size_of(*scale, font, text).0,
            Self::Metrics(m) => m.text_width(text),
        }
    }

    fn line_height(&self) -> i32 {
        match self {
            Self::Glyphs { line_height, .. } => *line_height,
            Self::Metrics(m) => m.line_height(),
        }
    }
}
