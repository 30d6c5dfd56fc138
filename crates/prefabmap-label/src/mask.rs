//! Label mask: a map-sized raster painted in three flat colors.
//!
//! - red: labels must stay out; dots inside get their label in a blue zone
//! - green: free placement
//! - blue: reserved label areas, only filled through the blue-zone stack

use image::{Rgb, RgbImage};
use prefabmap_common::{LabelBox, Point, PrefabMapError, PrefabMapResult};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::path::Path;
use tracing::info;

/// Red samples a label box may touch before it is rejected.
pub const DEFAULT_RED_TOLERANCE: usize = 2;

/// The three zone colors of a mask image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaskColors {
    /// Forbidden zone
    pub red: [u8; 3],
    /// Free zone
    pub green: [u8; 3],
    /// Reserved label zone
    pub blue: [u8; 3],
}

impl Default for MaskColors {
    fn default() -> Self {
        Self {
            red: [165, 27, 27],
            green: [0, 118, 0],
            blue: [0, 42, 118],
        }
    }
}

/// Forbidden-zone raster used by the placement search.
#[derive(Debug, Clone)]
pub struct LabelMask {
    image: RgbImage,
    colors: MaskColors,
}

impl LabelMask {
    /// Wraps an RGB raster.
    #[must_use]
    pub fn new(image: RgbImage, colors: MaskColors) -> Self {
        Self { image, colors }
    }

    /// Loads a mask image of any format the `image` crate reads.
    ///
    /// The mask is resized (nearest neighbour) to `size × size` when its
    /// dimensions differ, so zones line up with map pixels.
    pub fn open(path: impl AsRef<Path>, colors: MaskColors, size: u32) -> PrefabMapResult<Self> {
        let path = path.as_ref();
        let mut image = image::open(path)
            .map_err(|e| PrefabMapError::Image(format!("{}: {e}", path.display())))?
            .to_rgb8();
        if image.dimensions() != (size, size) {
            info!(
                "Resizing label mask from {}x{} to {size}x{size}",
                image.width(),
                image.height()
            );
            image = image::imageops::resize(&image, size, size, image::imageops::FilterType::Nearest);
        }
        Ok(Self::new(image, colors))
    }

    /// Mask width in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Mask height in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Zone colors.
    #[must_use]
    pub fn colors(&self) -> MaskColors {
        self.colors
    }

    /// Pixel at `p`, or `None` outside the raster.
    #[must_use]
    pub fn pixel(&self, p: Point) -> Option<Rgb<u8>> {
        let x = u32::try_from(p.x).ok()?;
        let y = u32::try_from(p.y).ok()?;
        self.image.get_pixel_checked(x, y).copied()
    }

    /// Whether `p` lies in a red zone.
    #[must_use]
    pub fn is_red(&self, p: Point) -> bool {
        self.pixel(p).is_some_and(|px| px.0 == self.colors.red)
    }

    fn samples(label_box: &LabelBox, red_tolerance: usize) -> impl Iterator<Item = Point> {
        let wide = label_box.width() >= 2 * red_tolerance as i32;
        label_box
            .corners()
            .into_iter()
            .chain(wide.then(|| label_box.center()))
    }

    fn check(&self, label_box: &LabelBox, red_tolerance: usize, reject_blue: bool) -> bool {
        let mut red = 0;
        for p in Self::samples(label_box, red_tolerance) {
            let Some(px) = self.pixel(p) else {
                continue;
            };
            if reject_blue && px.0 == self.colors.blue {
                return false;
            }
            if px.0 == self.colors.red {
                red += 1;
            }
        }
        red <= red_tolerance
    }

    /// Whether a label may occupy `label_box`.
    ///
    /// Samples the four corners, plus the center once the box is at least
    /// `2 * red_tolerance` wide. Samples outside the raster are ignored. Any
    /// blue sample rejects the box, as do more than `red_tolerance` red ones.
    #[must_use]
    pub fn is_placeable(&self, label_box: &LabelBox, red_tolerance: usize) -> bool {
        self.check(label_box, red_tolerance, true)
    }

    /// Like [`Self::is_placeable`] but blue samples are allowed, for labels
    /// stacked inside a blue zone.
    #[must_use]
    pub fn is_placeable_in_blue(&self, label_box: &LabelBox, red_tolerance: usize) -> bool {
        self.check(label_box, red_tolerance, false)
    }

    /// Bounding boxes of the 4-connected blue regions.
    ///
    /// Regions are discovered scanning columns left to right, each column top
    /// to bottom, which fixes the order of the returned boxes.
    #[must_use]
    pub fn extract_blue_zones(&self) -> Vec<LabelBox> {
        let (width, height) = self.image.dimensions();
        let (w, h) = (width as usize, height as usize);
        let blue = self.colors.blue;
        let is_blue = |x: u32, y: u32| self.image.get_pixel(x, y).0 == blue;

        let mut visited = vec![false; w * h];
        let mut zones = Vec::new();
        let mut queue = VecDeque::new();

        for x in 0..width {
            for y in 0..height {
                let idx = y as usize * w + x as usize;
                if visited[idx] || !is_blue(x, y) {
                    continue;
                }
                visited[idx] = true;
                queue.push_back((x, y));
                let (mut min_x, mut min_y, mut max_x, mut max_y) = (x, y, x, y);

                while let Some((cx, cy)) = queue.pop_front() {
                    let neighbours = [
                        cx.checked_sub(1).map(|nx| (nx, cy)),
                        (cx + 1 < width).then_some((cx + 1, cy)),
                        cy.checked_sub(1).map(|ny| (cx, ny)),
                        (cy + 1 < height).then_some((cx, cy + 1)),
                    ];
                    for (nx, ny) in neighbours.into_iter().flatten() {
                        let nidx = ny as usize * w + nx as usize;
                        if visited[nidx] || !is_blue(nx, ny) {
                            continue;
                        }
                        visited[nidx] = true;
                        queue.push_back((nx, ny));
                        min_x = min_x.min(nx);
                        max_x = max_x.max(nx);
                        min_y = min_y.min(ny);
                        max_y = max_y.max(ny);
                    }
                }

                zones.push(LabelBox::new(min_x as i32, min_y as i32, max_x as i32, max_y as i32));
            }
        }
        zones
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GREEN: Rgb<u8> = Rgb([0, 118, 0]);
    const RED: Rgb<u8> = Rgb([165, 27, 27]);
    const BLUE: Rgb<u8> = Rgb([0, 42, 118]);

    fn mask_with(paint: impl Fn(u32, u32) -> Rgb<u8>) -> LabelMask {
        LabelMask::new(RgbImage::from_fn(40, 40, paint), MaskColors::default())
    }

    #[test]
    fn test_green_is_placeable() {
        let mask = mask_with(|_, _| GREEN);
        assert!(mask.is_placeable(&LabelBox::new(5, 5, 30, 20), DEFAULT_RED_TOLERANCE));
    }

    #[test]
    fn test_red_tolerance() {
        // Left half red: two corners and the center of a box spanning x=10..30
        // sample red.
        let mask = mask_with(|x, _| if x <= 20 { RED } else { GREEN });
        let b = LabelBox::new(10, 5, 30, 15);
        assert!(!mask.is_placeable(&b, 2));
        assert!(mask.is_placeable(&b, 3));
        // Narrow box: corners only, two of them red.
        let narrow = LabelBox::new(20, 5, 21, 15);
        assert!(mask.is_placeable(&narrow, 2));
        assert!(mask.is_red(Point::new(0, 0)));
        assert!(!mask.is_red(Point::new(39, 0)));
    }

    #[test]
    fn test_blue_corner_rejects() {
        let mask = mask_with(|x, y| if x == 30 && y == 20 { BLUE } else { GREEN });
        let b = LabelBox::new(10, 5, 30, 20);
        assert!(!mask.is_placeable(&b, 2));
        assert!(mask.is_placeable_in_blue(&b, 2));
    }

    #[test]
    fn test_out_of_bounds_samples_ignored() {
        let mask = mask_with(|_, _| RED);
        // Only the top-left corner falls inside the raster.
        assert!(mask.is_placeable(&LabelBox::new(39, 39, 200, 200), 2));
        assert_eq!(mask.pixel(Point::new(-1, 0)), None);
        assert!(!mask.is_red(Point::new(40, 0)));
    }

    #[test]
    fn test_extract_blue_zones_column_major() {
        let mask = mask_with(|x, y| {
            let right_block = (30..35).contains(&x) && (2..6).contains(&y);
            let left_block = (2..8).contains(&x) && (20..25).contains(&y);
            if right_block || left_block {
                BLUE
            } else {
                GREEN
            }
        });
        let zones = mask.extract_blue_zones();
        assert_eq!(
            zones,
            vec![LabelBox::new(2, 20, 7, 24), LabelBox::new(30, 2, 34, 5)]
        );
    }

    #[test]
    fn test_diagonal_pixels_are_separate_zones() {
        let mask = mask_with(|x, y| if (x, y) == (1, 1) || (x, y) == (2, 2) { BLUE } else { GREEN });
        assert_eq!(mask.extract_blue_zones().len(), 2);
    }

    #[test]
    fn test_open_resizes() {
        let dir = tempfile::TempDir::new().expect("temp dir");
        let path = dir.path().join("mask.png");
        RgbImage::from_pixel(8, 8, RED).save(&path).expect("save");

        let mask = LabelMask::open(&path, MaskColors::default(), 16).expect("open");
        assert_eq!((mask.width(), mask.height()), (16, 16));
        assert!(mask.is_red(Point::new(15, 15)));
    }
}
