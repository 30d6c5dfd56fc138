//! Block map colors from the game's `blocks.xml`.

use crate::xml_error;
use ahash::AHashMap;
use prefabmap_common::PrefabMapResult;
use std::path::Path;
use tracing::info;

/// Block name → RGB color.
pub type BlockColors = AHashMap<String, [u8; 3]>;

/// Parses `"r,g,b"`.
fn parse_map_color(value: &str) -> Option<[u8; 3]> {
    let parts: Vec<u8> = value
        .split(',')
        .map(|p| p.trim().parse::<u8>())
        .collect::<Result<_, _>>()
        .ok()?;
    match parts[..] {
        [r, g, b] => Some([r, g, b]),
        _ => None,
    }
}

/// Parses `RRGGBB` or `RRGGBBAA` with an optional leading `#`; alpha is dropped.
fn parse_tint_color(value: &str) -> Option<[u8; 3]> {
    let hex = value.trim().trim_start_matches('#');
    if !(hex.len() == 6 || hex.len() == 8) || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some([channel(0)?, channel(2)?, channel(4)?])
}

/// Collects a color for every `block` element that declares one.
///
/// `Map.Color` takes precedence over `TintColor` regardless of the order the
/// properties appear in.
pub fn load_block_colors(xml: &str) -> Result<BlockColors, roxmltree::Error> {
    let doc = roxmltree::Document::parse(xml)?;
    let mut colors = BlockColors::new();

    for block in doc.descendants().filter(|n| n.has_tag_name("block")) {
        let Some(name) = block.attribute("name") else {
            continue;
        };

        let mut map_color = None;
        let mut tint = None;
        for prop in block.children().filter(|n| n.has_tag_name("property")) {
            match (prop.attribute("name"), prop.attribute("value")) {
                (Some("Map.Color"), Some(v)) => map_color = map_color.or(parse_map_color(v)),
                (Some("TintColor"), Some(v)) => tint = tint.or(parse_tint_color(v)),
                _ => {},
            }
        }

        if let Some(rgb) = map_color.or(tint) {
            colors.insert(name.to_string(), rgb);
        }
    }

    Ok(colors)
}

/// Reads and parses a `blocks.xml` file.
pub fn load_block_colors_file(path: impl AsRef<Path>) -> PrefabMapResult<BlockColors> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)?;
    let colors = load_block_colors(&text).map_err(|e| xml_error(path, &e))?;
    info!("Loaded {} block colors from {}", colors.len(), path.display());
    Ok(colors)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_color_wins_over_tint() {
        let xml = r##"<blocks>
  <block name="woodPlank">
    <property name="TintColor" value="#102030"/>
    <property name="Map.Color" value="97,80,67"/>
  </block>
  <block name="glassPane">
    <property name="TintColor" value="C8DCFFAA"/>
  </block>
  <block name="badTint">
    <property name="TintColor" value="#XYZXYZ"/>
  </block>
  <block name="noColor"/>
</blocks>"##;
        let colors = load_block_colors(xml).expect("parse");
        assert_eq!(colors.len(), 2);
        assert_eq!(colors["woodPlank"], [97, 80, 67]);
        assert_eq!(colors["glassPane"], [200, 220, 255]);
    }

    #[test]
    fn test_parse_map_color_rejects_garbage() {
        assert_eq!(parse_map_color("1,2"), None);
        assert_eq!(parse_map_color("1,2,300"), None);
        assert_eq!(parse_map_color(" 4, 5 ,6"), Some([4, 5, 6]));
    }
}
