//! Helpers for inspecting rendered rasters.

use identicon_common::Rgb;
use image::RgbImage;

/// Copy the `patch_size` square cell at grid position `(col, row)`.
pub fn cell(image: &RgbImage, col: u32, row: u32, patch_size: u32) -> RgbImage {
    image::imageops::crop_imm(image, col * patch_size, row * patch_size, patch_size, patch_size)
        .to_image()
}

/// Rotate a square block a quarter turn clockwise.
pub fn rotate_cw(block: &RgbImage) -> RgbImage {
    image::imageops::rotate90(block)
}

/// Number of pixels exactly matching `color`.
pub fn count_color(image: &RgbImage, color: Rgb) -> usize {
    image.pixels().filter(|p| p.0 == color.to_array()).count()
}

/// Positions of pixels that differ between two equally sized images.
pub fn differing_pixels(a: &RgbImage, b: &RgbImage) -> Vec<(u32, u32)> {
    assert_eq!(a.dimensions(), b.dimensions(), "image dimensions differ");
    a.enumerate_pixels()
        .filter(|(x, y, p)| b.get_pixel(*x, *y) != *p)
        .map(|(x, y, _)| (x, y))
        .collect()
}

/// Largest per-channel difference between two equally sized images.
pub fn max_channel_diff(a: &RgbImage, b: &RgbImage) -> u8 {
    assert_eq!(a.dimensions(), b.dimensions(), "image dimensions differ");
    a.as_raw()
        .iter()
        .zip(b.as_raw())
        .map(|(x, y)| x.abs_diff(*y))
        .max()
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_and_rotate() {
        let mut image = RgbImage::from_pixel(4, 4, image::Rgb([255, 255, 255]));
        // mark top-left pixel of the bottom-right 2x2 cell
        image.put_pixel(2, 2, image::Rgb([0, 0, 0]));

        let block = cell(&image, 1, 1, 2);
        assert_eq!(block.get_pixel(0, 0).0, [0, 0, 0]);

        // clockwise: top-left moves to top-right
        let rotated = rotate_cw(&block);
        assert_eq!(rotated.get_pixel(1, 0).0, [0, 0, 0]);
        assert_eq!(count_color(&rotated, Rgb::BLACK), 1);
    }

    #[test]
    fn test_differing_pixels() {
        let a = RgbImage::from_pixel(3, 3, image::Rgb([1, 1, 1]));
        let mut b = a.clone();
        b.put_pixel(1, 2, image::Rgb([9, 1, 1]));
        assert_eq!(differing_pixels(&a, &b), vec![(1, 2)]);
        assert_eq!(max_channel_diff(&a, &b), 8);
    }
}
