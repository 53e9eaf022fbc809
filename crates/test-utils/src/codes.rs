//! Building identicon codes field by field.
//!
//! Tests describe the image they want instead of spelling out magic
//! numbers, and can flip single fields to check how rendering reacts.

/// Builder for a 32-bit identicon code.
///
/// # Example
///
/// ```
/// use test_utils::CodeBuilder;
///
/// let code = CodeBuilder::new().middle(2).side(5).side_turn(1).build();
/// assert_eq!(code, 2 | (5 << 10) | (1 << 15));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CodeBuilder {
    code: u32,
}

impl CodeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_code(code: u32) -> Self {
        Self { code }
    }

    fn set(mut self, shift: u32, mask: u32, value: u32) -> Self {
        self.code = (self.code & !(mask << shift)) | ((value & mask) << shift);
        self
    }

    /// Center selector (0-3).
    pub fn middle(self, selector: u32) -> Self {
        self.set(0, 0x3, selector)
    }

    pub fn middle_invert(self, invert: bool) -> Self {
        self.set(2, 0x1, invert as u32)
    }

    pub fn corner(self, shape: u32) -> Self {
        self.set(3, 0xf, shape)
    }

    pub fn corner_invert(self, invert: bool) -> Self {
        self.set(7, 0x1, invert as u32)
    }

    pub fn corner_turn(self, turn: u32) -> Self {
        self.set(8, 0x3, turn)
    }

    pub fn side(self, shape: u32) -> Self {
        self.set(10, 0xf, shape)
    }

    pub fn side_invert(self, invert: bool) -> Self {
        self.set(14, 0x1, invert as u32)
    }

    /// Side turn. Only bit 15 is written; bit 16 belongs to blue as well.
    pub fn side_turn(self, turn: u32) -> Self {
        self.set(15, 0x1, turn)
    }

    /// Fill color from 5-bit channel values.
    pub fn color(self, red: u32, green: u32, blue: u32) -> Self {
        self.set(27, 0x1f, red).set(21, 0x1f, green).set(16, 0x1f, blue)
    }

    pub fn build(self) -> u32 {
        self.code
    }
}
