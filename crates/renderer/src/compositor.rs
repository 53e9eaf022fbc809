//! Drawing a single patch into its cell.
//!
//! Pixels are sampled at their centers. Each pixel center is mapped back
//! into the unrotated shape frame and tested there, so a patch drawn with
//! one more quarter turn is an exact 90° rotation of the previous one
//! whenever the patch size is even.

use identicon_common::Rgb;
use image::RgbImage;

use crate::patch::{PatchFlags, PatchLibrary};

/// Half-width of the pixel square used for the outline test.
const OUTLINE_HALF_WIDTH: f64 = 0.5;

pub(crate) fn pixel(color: Rgb) -> image::Rgb<u8> {
    image::Rgb(color.to_array())
}

/// Map a point from the rotated cell frame back into the shape frame.
///
/// Rotation is clockwise on screen (y points down).
fn unrotate(x: f64, y: f64, turn: u32) -> (f64, f64) {
    match turn % 4 {
        0 => (x, y),
        1 => (y, -x),
        2 => (-x, -y),
        _ => (-y, x),
    }
}

/// Draws patches from a library over a fixed background color.
#[derive(Debug, Clone, Copy)]
pub struct PatchCompositor<'a> {
    library: &'a PatchLibrary,
    background: Rgb,
}

impl<'a> PatchCompositor<'a> {
    pub fn new(library: &'a PatchLibrary, background: Rgb) -> Self {
        Self { library, background }
    }

    /// Draw one patch with its top-left corner at `(x, y)`.
    ///
    /// `shape` is taken modulo 16 and `turn` modulo 4. The cell is painted
    /// with the background (or the fill, when inverted), then the outline in
    /// `stroke` if given, then the shape interior on top. Edges lying on the
    /// cell border are outlined on the pixels just inside, above the
    /// interior. Nothing outside the cell is touched.
    #[allow(clippy::too_many_arguments)]
    pub fn draw(
        &self,
        canvas: &mut RgbImage,
        x: u32,
        y: u32,
        shape: usize,
        turn: u32,
        invert: bool,
        fill: Rgb,
        stroke: Option<Rgb>,
    ) {
        let turn = turn % 4;
        let invert = invert ^ self.library.flags(shape).contains(PatchFlags::INVERTED);
        let polygon = self.library.shape(shape);

        let (cell_color, shape_color) = if invert {
            (fill, self.background)
        } else {
            (self.background, fill)
        };

        let size = self.library.patch_size();
        let center_x = x as f64 + self.library.offset() as f64;
        let center_y = y as f64 + self.library.offset() as f64;
        let x_end = x.saturating_add(size).min(canvas.width());
        let y_end = y.saturating_add(size).min(canvas.height());

        for py in y..y_end {
            for px in x..x_end {
                let (sx, sy) = unrotate(
                    px as f64 + 0.5 - center_x,
                    py as f64 + 0.5 - center_y,
                    turn,
                );

                let color = match stroke {
                    Some(s) if polygon.border_touches(sx, sy, OUTLINE_HALF_WIDTH) => s,
                    _ if polygon.contains(sx, sy) => shape_color,
                    Some(s) if polygon.outline_touches(sx, sy, OUTLINE_HALF_WIDTH) => s,
                    _ => cell_color,
                };
                canvas.put_pixel(px, py, pixel(color));
            }
        }
    }
}
