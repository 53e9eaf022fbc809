//! Common types and utilities shared across the identicon crates.

pub mod code;
pub mod color;
pub mod error;

pub use code::{etag, parse_code, parse_size, CodeDeriver, DEFAULT_SIZE, MAX_SIZE, MIN_SIZE};
pub use color::{Rgb, STROKE_DISTANCE_THRESHOLD};
pub use error::{IdenticonError, IdenticonResult};

/// Version of the rendered pixel format.
///
/// Bump whenever the code bit layout, the patch vertex table or the outline
/// rules change in a way that alters rendered pixels for existing codes.
/// Folded into every ETag.
pub const RENDER_FORMAT_VERSION: u32 = 2;
