//! Unpacking identicon codes into rendering parameters.
//!
//! Bit layout (bit 0 is least significant):
//!
//! | bits  | field                                   |
//! |-------|-----------------------------------------|
//! | 0-1   | center shape selector                   |
//! | 2     | center invert                           |
//! | 3-6   | corner shape                            |
//! | 7     | corner invert                           |
//! | 8-9   | corner base rotation                    |
//! | 10-13 | side shape                              |
//! | 14    | side invert                             |
//! | 15-16 | side base rotation (bit 16 shared with blue) |
//! | 16-20 | blue                                    |
//! | 21-25 | green (bit 26 unused)                   |
//! | 27-31 | red                                     |
//!
//! Every `u32` decodes to a valid parameter set.

use identicon_common::Rgb;

use crate::patch::PatchLibrary;

/// Rendering parameters for one code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodedParameters {
    /// Raw 2-bit center selector.
    pub middle_selector: u32,
    /// Library index of the center shape, one of 0, 4, 8, 15.
    pub middle_shape: usize,
    pub middle_invert: bool,
    pub corner_shape: usize,
    pub corner_invert: bool,
    /// Quarter turns applied to the top-left corner.
    pub corner_turn: u32,
    pub side_shape: usize,
    pub side_invert: bool,
    /// Quarter turns applied to the top side.
    pub side_turn: u32,
    pub fill_color: Rgb,
}

/// Decode a 32-bit code.
pub fn decode(code: u32) -> DecodedParameters {
    let middle_selector = code & 0x3;
    let blue = (code >> 16) & 0x1f;
    let green = (code >> 21) & 0x1f;
    let red = (code >> 27) & 0x1f;

    DecodedParameters {
        middle_selector,
        middle_shape: PatchLibrary::center_shape(middle_selector),
        middle_invert: (code >> 2) & 0x1 != 0,
        corner_shape: ((code >> 3) & 0xf) as usize,
        corner_invert: (code >> 7) & 0x1 != 0,
        corner_turn: (code >> 8) & 0x3,
        side_shape: ((code >> 10) & 0xf) as usize,
        side_invert: (code >> 14) & 0x1 != 0,
        side_turn: (code >> 15) & 0x3,
        fill_color: Rgb::new((red << 3) as u8, (green << 3) as u8, (blue << 3) as u8),
    }
}

/// Low 32 bits of a big-endian two's complement integer of any width.
///
/// Lets callers that produce codes from wide hashes pass the whole value.
/// Inputs shorter than four bytes are sign-extended.
pub fn low_word(be_bytes: &[u8]) -> u32 {
    let mut word = match be_bytes.first() {
        Some(&b) if b & 0x80 != 0 => [0xff; 4],
        _ => [0; 4],
    };
    let tail = &be_bytes[be_bytes.len().saturating_sub(4)..];
    word[4 - tail.len()..].copy_from_slice(tail);
    u32::from_be_bytes(word)
}

/// Decode a wide big-endian code by its low 32 bits.
pub fn decode_wide(be_bytes: &[u8]) -> DecodedParameters {
    decode(low_word(be_bytes))
}
