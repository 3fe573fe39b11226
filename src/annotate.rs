//! Drawing match boxes onto RGB images (feature `image-io`).

use crate::locate::BoundingBox;
use image::{Rgb, RgbImage};
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect;

/// Outline appearance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoxStyle {
    /// RGB outline colour.
    pub color: [u8; 3],
    /// Outline thickness in pixels, drawn inward from the box edge.
    pub stroke: u32,
}

impl Default for BoxStyle {
    fn default() -> Self {
        Self {
            color: [0, 255, 0],
            stroke: 2,
        }
    }
}

/// Returns a copy of `image` with `bbox` outlined; `image` is left untouched.
pub fn draw_bounding_box(image: &RgbImage, bbox: &BoundingBox, style: &BoxStyle) -> RgbImage {
    let mut out = image.clone();
    draw_bounding_box_mut(&mut out, bbox, style);
    out
}

/// Outlines `bbox` in place. Pixels outside the image are clipped.
///
/// `bbox.bottom_right` is exclusive: the outermost stroke ends on its last
/// covered row and column, one pixel inside `bottom_right`.
pub fn draw_bounding_box_mut(image: &mut RgbImage, bbox: &BoundingBox, style: &BoxStyle) {
    let color = Rgb(style.color);
    let (width, height) = (bbox.width() as u32, bbox.height() as u32);
    for inset in 0..style.stroke {
        if width <= 2 * inset || height <= 2 * inset {
            break;
        }
        let rect = Rect::at(
            (bbox.top_left.x as u32 + inset) as i32,
            (bbox.top_left.y as u32 + inset) as i32,
        )
        .of_size(width - 2 * inset, height - 2 * inset);
        draw_hollow_rect_mut(image, rect, color);
    }
}
