//! Nine-block quilt rendering.
//!
//! A code is drawn as a 3x3 grid of patches at a fixed source resolution
//! (three patches per side) and then resampled to the requested size:
//!
//! ```text
//! +--------+--------+--------+
//! | corner |  side  | corner |
//! +--------+--------+--------+
//! |  side  | center |  side  |
//! +--------+--------+--------+
//! | corner |  side  | corner |
//! +--------+--------+--------+
//! ```
//!
//! Sides and corners are each visited clockwise, starting from the top and
//! the top-left respectively, with one more quarter turn per step.

use identicon_common::{IdenticonError, IdenticonResult, Rgb};
use image::imageops::{self, FilterType};
use image::RgbImage;
use tracing::debug;

use crate::compositor::PatchCompositor;
use crate::decode::{decode, low_word, DecodedParameters};
use crate::patch::PatchLibrary;
use crate::png;

/// Default patch edge length in source pixels.
pub const DEFAULT_PATCH_SIZE: u32 = 20;

/// Bicubic filter used to scale the source canvas.
const RESAMPLE_FILTER: FilterType = FilterType::CatmullRom;

/// Settings fixed when a renderer is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderConfig {
    /// Edge length of one patch before scaling.
    ///
    /// Shapes are laid out on a 4x4 grid of `patch_size / 4` pixel steps.
    /// When `patch_size` is not a multiple of 4 the grid is smaller than the
    /// cell, and the leftover pixels along one or two edges of each cell keep
    /// the cell color. Odd sizes can also shift rotated cells by a pixel.
    pub patch_size: u32,
    pub background: Rgb,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            patch_size: DEFAULT_PATCH_SIZE,
            background: Rgb::WHITE,
        }
    }
}

impl RenderConfig {
    pub fn validate(&self) -> IdenticonResult<()> {
        if self.patch_size == 0 {
            return Err(IdenticonError::invalid("patch_size", "must be positive"));
        }
        if self.patch_size.checked_mul(3).is_none() {
            return Err(IdenticonError::ResourceExhausted(format!(
                "patch size {} overflows the source canvas",
                self.patch_size
            )));
        }
        Ok(())
    }

    /// Side of the composed canvas before scaling.
    pub fn source_size(&self) -> u32 {
        self.patch_size * 3
    }
}

/// Renders identicon codes to RGB rasters.
///
/// Holds only immutable geometry, so one instance can be shared across
/// threads and used for any number of concurrent renders.
#[derive(Debug, Clone)]
pub struct QuiltRenderer {
    config: RenderConfig,
    library: PatchLibrary,
}

impl Default for QuiltRenderer {
    fn default() -> Self {
        let config = RenderConfig::default();
        Self {
            library: PatchLibrary::new(config.patch_size),
            config,
        }
    }
}

impl QuiltRenderer {
    pub fn new(config: RenderConfig) -> IdenticonResult<Self> {
        config.validate()?;
        Ok(Self {
            library: PatchLibrary::new(config.patch_size),
            config,
        })
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn library(&self) -> &PatchLibrary {
        &self.library
    }

    pub fn source_size(&self) -> u32 {
        self.config.source_size()
    }

    /// Render `code` as a `size` x `size` image.
    pub fn render(&self, code: u32, size: u32) -> IdenticonResult<RgbImage> {
        if size == 0 {
            return Err(IdenticonError::invalid("size", "must be positive"));
        }

        let source = self.render_source(code)?;
        if size == source.width() {
            return Ok(source);
        }

        // Reserve up front: the resampler aborts on allocation failure.
        let target_bytes = canvas_bytes(size)?;
        let mut probe: Vec<u8> = Vec::new();
        probe.try_reserve_exact(target_bytes)?;
        drop(probe);

        debug!(code, size, source_size = source.width(), "Resampling identicon");
        Ok(imageops::resize(&source, size, size, RESAMPLE_FILTER))
    }

    /// Render using the low 32 bits of a big-endian two's complement integer.
    pub fn render_wide(&self, code: &[u8], size: u32) -> IdenticonResult<RgbImage> {
        self.render(low_word(code), size)
    }

    /// Render and encode as PNG.
    pub fn render_png(&self, code: u32, size: u32) -> IdenticonResult<Vec<u8>> {
        let image = self.render(code, size)?;
        png::create_png_auto(&image)
    }

    /// Compose the nine patches at source resolution, without scaling.
    pub fn render_source(&self, code: u32) -> IdenticonResult<RgbImage> {
        let params = decode(code);
        let stroke = Rgb::stroke_for(&params.fill_color, &self.config.background);

        debug!(
            code,
            middle = params.middle_shape,
            corner = params.corner_shape,
            side = params.side_shape,
            fill = %params.fill_color,
            stroke = stroke.is_some(),
            "Composing identicon"
        );

        let mut canvas = allocate_canvas(self.source_size(), self.config.background)?;
        self.compose(&mut canvas, &params, stroke);
        Ok(canvas)
    }

    fn compose(&self, canvas: &mut RgbImage, params: &DecodedParameters, stroke: Option<Rgb>) {
        let compositor = PatchCompositor::new(&self.library, self.config.background);
        let p = self.config.patch_size;
        let fill = params.fill_color;

        compositor.draw(
            canvas,
            p,
            p,
            params.middle_shape,
            0,
            params.middle_invert,
            fill,
            stroke,
        );

        let sides = [(p, 0), (2 * p, p), (p, 2 * p), (0, p)];
        for (step, (x, y)) in (0u32..).zip(sides) {
            compositor.draw(
                canvas,
                x,
                y,
                params.side_shape,
                params.side_turn + step,
                params.side_invert,
                fill,
                stroke,
            );
        }

        let corners = [(0, 0), (2 * p, 0), (2 * p, 2 * p), (0, 2 * p)];
        for (step, (x, y)) in (0u32..).zip(corners) {
            compositor.draw(
                canvas,
                x,
                y,
                params.corner_shape,
                params.corner_turn + step,
                params.corner_invert,
                fill,
                stroke,
            );
        }
    }
}

fn canvas_bytes(side: u32) -> IdenticonResult<usize> {
    (side as usize)
        .checked_mul(side as usize)
        .and_then(|n| n.checked_mul(3))
        .ok_or_else(|| {
            IdenticonError::ResourceExhausted(format!("{}x{} canvas is too large", side, side))
        })
}

fn allocate_canvas(side: u32, background: Rgb) -> IdenticonResult<RgbImage> {
    let bytes = canvas_bytes(side)?;
    let mut buf: Vec<u8> = Vec::new();
    buf.try_reserve_exact(bytes)?;
    for _ in 0..bytes / 3 {
        buf.extend_from_slice(&background.to_array());
    }

    RgbImage::from_raw(side, side, buf).ok_or_else(|| {
        IdenticonError::ResourceExhausted(format!("{}x{} canvas buffer mismatch", side, side))
    })
}
