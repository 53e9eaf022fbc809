//! Tests for PNG encoding of rendered identicons.
//!
//! Encoded bytes are decoded again with the `image` crate and compared
//! against the raster they came from.

use image::RgbImage;
use renderer::png::{create_png, create_png_auto, create_png_indexed};
use renderer::QuiltRenderer;
use test_utils::CodeBuilder;

// ============================================================================
// Helper functions
// ============================================================================

fn decode_png(bytes: &[u8]) -> RgbImage {
    image::load_from_memory_with_format(bytes, image::ImageFormat::Png)
        .expect("valid PNG")
        .to_rgb8()
}

/// Color type byte from the IHDR chunk.
fn color_type(png: &[u8]) -> u8 {
    png[25]
}

/// Smooth gradient with far more than 256 colors.
fn gradient_image(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x * 3) as u8, (y * 5) as u8, ((x + y) * 7 % 256) as u8])
    })
}

// ============================================================================
// Encoding rendered identicons
// ============================================================================

#[test]
fn test_source_render_uses_indexed_png() {
    let renderer = QuiltRenderer::default();
    let code = CodeBuilder::new().middle(2).side(6).corner(9).color(31, 31, 31).build();
    let image = renderer.render_source(code).unwrap();

    let png = create_png_auto(&image).unwrap();
    assert_eq!(color_type(&png), 3);
    assert_eq!(decode_png(&png), image);
}

#[test]
fn test_render_png_round_trip_all_sizes() {
    let renderer = QuiltRenderer::default();
    for size in [16, 24, 48, 64] {
        let code = 0x9e37_79b9u32.wrapping_mul(size);
        let png = renderer.render_png(code, size).unwrap();
        let decoded = decode_png(&png);
        assert_eq!(decoded.dimensions(), (size, size));
        assert_eq!(decoded, renderer.render(code, size).unwrap());
    }
}

#[test]
fn test_large_render_round_trip() {
    // above the parallel palette threshold
    let renderer = QuiltRenderer::default();
    let png = renderer.render_png(0x0f0f_3c3c, 128).unwrap();
    assert_eq!(decode_png(&png), renderer.render(0x0f0f_3c3c, 128).unwrap());
}

// ============================================================================
// Encoder modes
// ============================================================================

#[test]
fn test_truecolor_fallback() {
    let image = gradient_image(64, 64);
    let png = create_png_auto(&image).unwrap();
    assert_eq!(color_type(&png), 2);
    assert_eq!(decode_png(&png), image);
}

#[test]
fn test_explicit_truecolor() {
    let image = RgbImage::from_pixel(5, 7, image::Rgb([1, 2, 3]));
    let png = create_png(image.as_raw(), 5, 7).unwrap();
    assert_eq!(color_type(&png), 2);
    assert_eq!(decode_png(&png), image);
}

#[test]
fn test_explicit_indexed() {
    let palette = [(255, 0, 0), (0, 0, 255)];
    let indices = [0, 1, 1, 0];
    let png = create_png_indexed(2, 2, &palette, &indices).unwrap();

    let decoded = decode_png(&png);
    assert_eq!(decoded.get_pixel(0, 0).0, [255, 0, 0]);
    assert_eq!(decoded.get_pixel(1, 0).0, [0, 0, 255]);
    assert_eq!(decoded.get_pixel(0, 1).0, [0, 0, 255]);
    assert_eq!(decoded.get_pixel(1, 1).0, [255, 0, 0]);
}
