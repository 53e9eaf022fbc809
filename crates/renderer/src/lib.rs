//! Nine-block identicon rendering.
//!
//! Turns a 32-bit identicon code into a small square raster:
//! - `patch`: the fixed vocabulary of 16 patch shapes
//! - `decode`: code bitfields to rendering parameters
//! - `compositor`: drawing one rotated, possibly inverted patch
//! - `quilt`: composing nine patches and scaling to the output size
//! - `png`: encoding the raster for transport

pub mod compositor;
pub mod decode;
pub mod patch;
pub mod png;
pub mod quilt;

pub use compositor::PatchCompositor;
pub use decode::{decode, decode_wide, low_word, DecodedParameters};
pub use patch::{PatchFlags, PatchLibrary, PatchShape, CENTER_PATCHES, PATCH_COUNT};
pub use quilt::{QuiltRenderer, RenderConfig, DEFAULT_PATCH_SIZE};

/// Raster type produced by the renderer.
pub type Canvas = image::RgbImage;
