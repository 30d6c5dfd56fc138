//! Drawing primitives on top of `imageproc`.
//!
//! Boxes are inclusive of both edges, matching how [`LabelBox`] is measured.

use image::{Rgba, RgbaImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_filled_rect_mut, draw_line_segment_mut, draw_polygon_mut};
use imageproc::rect::Rect;
use prefabmap_common::{LabelBox, Point};

/// Opaque white.
pub const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
/// Opaque black.
pub const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);
/// Highlight for extended-pass labels in debug mode.
pub const YELLOW: Rgba<u8> = Rgba([255, 255, 0, 255]);
/// Translucent label background.
pub const LABEL_FILL: Rgba<u8> = Rgba([255, 255, 255, 200]);

/// Filled circle of `radius` around `center`.
pub fn fill_circle(canvas: &mut RgbaImage, center: Point, radius: i32, color: Rgba<u8>) {
    draw_filled_circle_mut(canvas, (center.x, center.y), radius.max(0), color);
}

fn fill_rounded(canvas: &mut RgbaImage, b: &LabelBox, radius: i32, color: Rgba<u8>) {
    let (w, h) = (b.width(), b.height());
    if w < 0 || h < 0 {
        return;
    }
    let r = radius.min(w / 2).min(h / 2).max(0);

    draw_filled_rect_mut(
        canvas,
        Rect::at(b.x1 + r, b.y1).of_size((w - 2 * r + 1) as u32, (h + 1) as u32),
        color,
    );
    draw_filled_rect_mut(
        canvas,
        Rect::at(b.x1, b.y1 + r).of_size((w + 1) as u32, (h - 2 * r + 1) as u32),
        color,
    );
    if r > 0 {
        for (cx, cy) in [(b.x1 + r, b.y1 + r), (b.x2 - r, b.y1 + r), (b.x1 + r, b.y2 - r), (b.x2 - r, b.y2 - r)] {
            draw_filled_circle_mut(canvas, (cx, cy), r, color);
        }
    }
}

/// Rounded rectangle with an optional `(color, width)` outline.
pub fn rounded_box(
    canvas: &mut RgbaImage,
    b: &LabelBox,
    radius: i32,
    fill: Rgba<u8>,
    outline: Option<(Rgba<u8>, i32)>,
) {
    match outline {
        Some((color, width)) if width > 0 => {
            fill_rounded(canvas, b, radius, color);
            let inner = LabelBox::new(b.x1 + width, b.y1 + width, b.x2 - width, b.y2 - width);
            if inner.x1 <= inner.x2 && inner.y1 <= inner.y2 && b.width() > 2 * width && b.height() > 2 * width {
                fill_rounded(canvas, &inner, radius - width, fill);
            }
        },
        _ => fill_rounded(canvas, b, radius, fill),
    }
}

/// Line of roughly `width` pixels.
pub fn thick_line(canvas: &mut RgbaImage, from: Point, to: Point, width: i32, color: Rgba<u8>) {
    let width = width.max(1);
    let half = width / 2;
    for ox in -half..width - half {
        for oy in -half..width - half {
            draw_line_segment_mut(
                canvas,
                ((from.x + ox) as f32, (from.y + oy) as f32),
                ((to.x + ox) as f32, (to.y + oy) as f32),
                color,
            );
        }
    }
}

/// Anchor points where a connector wedge meets `b`: on the box edge
/// nearest to `dot`.
#[must_use]
pub fn wedge_anchors(dot: Point, b: &LabelBox, padding: i32) -> (Point, Point) {
    let left = (dot.x - b.x1).abs();
    let right = (dot.x - b.x2).abs();
    let top = (dot.y - b.y1).abs();
    let bottom = (dot.y - b.y2).abs();
    let nearest = left.min(right).min(top).min(bottom);

    let center = (b.x1 + b.x2) / 2;
    let spread = 20.min(b.width() / 2 - padding);
    if nearest == left {
        (Point::new(b.x1, b.y1 + padding), Point::new(b.x1, b.y2 - padding))
    } else if nearest == right {
        (Point::new(b.x2, b.y1 + padding), Point::new(b.x2, b.y2 - padding))
    } else if nearest == top {
        (Point::new(center - spread, b.y1), Point::new(center + spread, b.y1))
    } else {
        (Point::new(center - spread, b.y2), Point::new(center + spread, b.y2))
    }
}

/// Translucent wedge from `dot` to the nearest edge of `b`, outlined in
/// `line_color`.
pub fn wedge(canvas: &mut RgbaImage, dot: Point, b: &LabelBox, padding: i32, line_color: Rgba<u8>) {
    let (a, c) = wedge_anchors(dot, b, padding);
    if a != c && dot != c && dot != a {
        let poly = [
            imageproc::point::Point::new(dot.x, dot.y),
            imageproc::point::Point::new(a.x, a.y),
            imageproc::point::Point::new(c.x, c.y),
        ];
        draw_polygon_mut(canvas, &poly, LABEL_FILL);
    }
    thick_line(canvas, dot, a, 2, line_color);
    thick_line(canvas, dot, c, 2, line_color);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rounded_box_outline_and_fill() {
        let mut canvas = RgbaImage::new(40, 40);
        let b = LabelBox::new(5, 5, 30, 25);
        rounded_box(&mut canvas, &b, 4, LABEL_FILL, Some((BLACK, 2)));
        assert_eq!(*canvas.get_pixel(17, 5), BLACK);
        assert_eq!(*canvas.get_pixel(17, 15), LABEL_FILL);
        // Rounded corner stays clear.
        assert_eq!(canvas.get_pixel(5, 5).0[3], 0);
        assert_eq!(canvas.get_pixel(31, 15).0[3], 0);
    }

    #[test]
    fn test_degenerate_box_does_not_panic() {
        let mut canvas = RgbaImage::new(10, 10);
        rounded_box(&mut canvas, &LabelBox::new(2, 2, 2, 2), 8, WHITE, Some((BLACK, 2)));
        rounded_box(&mut canvas, &LabelBox::new(-50, -50, -40, -40), 8, WHITE, None);
        assert_eq!(*canvas.get_pixel(2, 2), BLACK);
    }

    #[test]
    fn test_wedge_anchors_pick_nearest_edge() {
        let b = LabelBox::new(100, 100, 200, 130);
        let (a, c) = wedge_anchors(Point::new(90, 115), &b, 4);
        assert_eq!((a, c), (Point::new(100, 104), Point::new(100, 126)));

        let (a, c) = wedge_anchors(Point::new(150, 90), &b, 4);
        assert_eq!((a, c), (Point::new(130, 100), Point::new(170, 100)));
    }

    #[test]
    fn test_wedge_on_edge_skips_polygon() {
        let mut canvas = RgbaImage::new(50, 50);
        let b = LabelBox::new(10, 10, 40, 20);
        // Dot exactly on an anchor: only the connector lines are drawn.
        wedge(&mut canvas, Point::new(10, 14), &b, 4, BLACK);
        assert_eq!(*canvas.get_pixel(10, 15), BLACK);
    }
}
