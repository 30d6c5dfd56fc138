//! POI density heatmap.

use crate::draw::{fill_circle, BLACK, WHITE};
use crate::font::LabelFont;
use crate::poi::Poi;
use image::{GrayImage, Luma, RgbaImage};

/// Intensity added per POI, saturating at 255.
pub const HEAT_STEP: u8 = 10;

/// Grayscale density map: each POI brightens its pixel by [`HEAT_STEP`].
#[must_use]
pub fn density_heatmap<'a>(pois: impl IntoIterator<Item = &'a Poi>, size: u32) -> GrayImage {
    let mut heat = GrayImage::new(size, size);
    for poi in pois {
        let (Ok(x), Ok(y)) = (u32::try_from(poi.pixel.x), u32::try_from(poi.pixel.y)) else {
            continue;
        };
        if let Some(Luma([v])) = heat.get_pixel_mut_checked(x, y) {
            *v = v.saturating_add(HEAT_STEP);
        }
    }
    heat
}

/// Transparent overlay marking every POI with a white dot and its id.
#[must_use]
pub fn heatmap_overlay<'a>(
    pois: impl IntoIterator<Item = &'a Poi>,
    size: u32,
    dot_radius: i32,
    font: &LabelFont,
) -> RgbaImage {
    let mut overlay = RgbaImage::new(size, size);
    for poi in pois {
        fill_circle(&mut overlay, poi.pixel, dot_radius, WHITE);
        font.draw(&mut overlay, BLACK, poi.pixel.x + 4, poi.pixel.y - 4, &poi.id);
    }
    overlay
}

#[cfg(test)]
mod tests {
    use super::*;
    use prefabmap_common::Point;

    fn poi(x: i32, y: i32) -> Poi {
        Poi {
            id: "P0000".to_string(),
            name: "house".to_string(),
            pixel: Point::new(x, y),
        }
    }

    #[test]
    fn test_density_accumulates_and_saturates() {
        let mut pois = vec![poi(1, 1), poi(1, 1), poi(-3, 2), poi(50, 50)];
        pois.extend((0..30).map(|_| poi(2, 2)));
        let heat = density_heatmap(&pois, 4);
        assert_eq!(heat.get_pixel(1, 1).0, [20]);
        assert_eq!(heat.get_pixel(2, 2).0, [255]);
        assert_eq!(heat.get_pixel(0, 0).0, [0]);
    }

    #[test]
    fn test_overlay_marks_points() {
        let pois = [poi(10, 10)];
        let overlay = heatmap_overlay(&pois, 32, 3, &LabelFont::fallback(12));
        assert_eq!(*overlay.get_pixel(10, 10), WHITE);
        assert_eq!(overlay.get_pixel(20, 20).0[3], 0);
    }
}
