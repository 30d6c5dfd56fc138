//! Text measurement and label wrapping.

use prefabmap_common::LabelBox;

/// Measures rendered text in pixels.
pub trait FontMetrics {
    /// Advance width of `text` on one line.
    fn text_width(&self, text: &str) -> i32;

    /// Height of one line of text.
    fn line_height(&self) -> i32;
}

/// Monospace metrics: every character advances by the same width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedMetrics {
    /// Advance per character
    pub char_width: i32,
    /// Line height
    pub line_height: i32,
}

impl FixedMetrics {
    /// Creates metrics with explicit sizes.
    #[must_use]
    pub const fn new(char_width: i32, line_height: i32) -> Self {
        Self {
            char_width,
            line_height,
        }
    }

    /// Approximates a proportional font rendered at `text_size` pixels.
    #[must_use]
    pub fn for_text_size(text_size: u32) -> Self {
        let size = text_size.max(1) as i32;
        Self::new((size * 3 / 5).max(1), size)
    }
}

impl FontMetrics for FixedMetrics {
    fn text_width(&self, text: &str) -> i32 {
        text.chars().count() as i32 * self.char_width
    }

    fn line_height(&self) -> i32 {
        self.line_height
    }
}

/// Greedily wraps `text` on whitespace so each line fits `max_width`.
///
/// A single word wider than `max_width` gets a line of its own rather than
/// being split.
#[must_use]
pub fn wrap_label(text: &str, metrics: &dyn FontMetrics, max_width: i32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let trial = if current.is_empty() {
            word.to_string()
        } else {
            format!("{current} {word}")
        };
        if metrics.text_width(&trial) > max_width && !current.is_empty() {
            lines.push(std::mem::replace(&mut current, word.to_string()));
        } else {
            current = trial;
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Box occupied by `lines` drawn with their top-left at `(x, y)`, grown by
/// `padding` on every side.
#[must_use]
pub fn text_box(x: i32, y: i32, lines: &[String], metrics: &dyn FontMetrics, padding: i32) -> LabelBox {
    let width = lines
        .iter()
        .map(|line| metrics.text_width(line))
        .max()
        .unwrap_or(0);
    let height = lines.len() as i32 * metrics.line_height();
    LabelBox::new(x - padding, y - padding, x + width + padding, y + height + padding)
}

#[cfg(test)]
mod tests {
    use super::*;

    const METRICS: FixedMetrics = FixedMetrics::new(10, 20);

    #[test]
    fn test_wrap_fits_width() {
        let lines = wrap_label("Old West Saloon And Grill", &METRICS, 100);
        assert_eq!(lines, vec!["Old West", "Saloon And", "Grill"]);
        assert!(lines.iter().all(|l| METRICS.text_width(l) <= 100));
    }

    #[test]
    fn test_wrap_long_word_stands_alone() {
        let lines = wrap_label("a supercalifragilistic b", &METRICS, 50);
        assert_eq!(lines, vec!["a", "supercalifragilistic", "b"]);
    }

    #[test]
    fn test_wrap_empty() {
        assert!(wrap_label("   ", &METRICS, 100).is_empty());
    }

    #[test]
    fn test_text_box() {
        let lines = vec!["abc".to_string(), "abcde".to_string()];
        assert_eq!(text_box(100, 50, &lines, &METRICS, 4), LabelBox::new(96, 46, 154, 94));
        assert_eq!(text_box(0, 0, &[], &METRICS, 4), LabelBox::new(-4, -4, 4, 4));
    }

    #[test]
    fn test_fixed_metrics_for_text_size() {
        let m = FixedMetrics::for_text_size(25);
        assert_eq!(m.line_height(), 25);
        assert_eq!(m.text_width("P0001"), 75);
    }
}
