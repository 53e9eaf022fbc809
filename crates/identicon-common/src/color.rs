//! RGB colors and the color math used for the outline decision.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{IdenticonError, IdenticonResult};

/// Fill colors closer than this to the background get a complementary outline.
pub const STROKE_DISTANCE_THRESHOLD: f32 = 32.0;

/// Opaque 8-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Euclidean distance in RGB space, in `[0, ~441.67]`.
    pub fn distance(&self, other: &Rgb) -> f32 {
        let dr = self.r as f32 - other.r as f32;
        let dg = self.g as f32 - other.g as f32;
        let db = self.b as f32 - other.b as f32;
        (dr * dr + dg * dg + db * db).sqrt()
    }

    /// Per-channel complement (`0xFF - channel`).
    pub fn complementary(&self) -> Rgb {
        Rgb::new(!self.r, !self.g, !self.b)
    }

    /// Outline color to use for `fill` drawn over `background`, if any.
    pub fn stroke_for(fill: &Rgb, background: &Rgb) -> Option<Rgb> {
        if fill.distance(background) < STROKE_DISTANCE_THRESHOLD {
            Some(fill.complementary())
        } else {
            None
        }
    }

    /// Parse `#rrggbb` or `rrggbb`.
    pub fn from_hex(s: &str) -> IdenticonResult<Rgb> {
        let hex = s.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(IdenticonError::invalid(
                "color",
                format!("expected 6 hex digits, got '{}'", s),
            ));
        }

        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16)
                .map_err(|e| IdenticonError::invalid("color", format!("'{}': {}", s, e)))
        };

        Ok(Rgb::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }

    pub fn to_array(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

impl Default for Rgb {
    fn default() -> Self {
        Rgb::WHITE
    }
}

impl FromStr for Rgb {
    type Err = IdenticonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Rgb::from_hex(s)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_black_white() {
        let d = Rgb::BLACK.distance(&Rgb::WHITE);
        assert!((d - 441.672_96).abs() < 0.001);
    }

    #[test]
    fn test_distance_is_symmetric_and_zero_on_self() {
        let a = Rgb::new(10, 200, 30);
        let b = Rgb::new(40, 100, 90);
        assert_eq!(a.distance(&b), b.distance(&a));
        assert_eq!(a.distance(&a), 0.0);
    }

    #[test]
    fn test_complementary() {
        assert_eq!(Rgb::new(0xf8, 0x00, 0x18).complementary(), Rgb::new(0x07, 0xff, 0xe7));
        assert_eq!(Rgb::WHITE.complementary(), Rgb::BLACK);
    }

    #[test]
    fn test_stroke_threshold() {
        // 248,248,248 is ~12.1 away from white
        let near = Rgb::new(248, 248, 248);
        assert_eq!(Rgb::stroke_for(&near, &Rgb::WHITE), Some(Rgb::new(7, 7, 7)));

        // 232,248,248 is ~25.0 away, still below threshold
        let close = Rgb::new(232, 248, 248);
        assert!(Rgb::stroke_for(&close, &Rgb::WHITE).is_some());

        // 216,248,248 is ~40.2 away
        let far = Rgb::new(216, 248, 248);
        assert_eq!(Rgb::stroke_for(&far, &Rgb::WHITE), None);
    }

    #[test]
    fn test_from_hex() {
        assert_eq!(Rgb::from_hex("#ff8000").unwrap(), Rgb::new(255, 128, 0));
        assert_eq!("00ff00".parse::<Rgb>().unwrap(), Rgb::new(0, 255, 0));
        assert!(Rgb::from_hex("#fff").is_err());
        assert!(Rgb::from_hex("zzzzzz").is_err());
    }

    #[test]
    fn test_display_round_trips_through_hex() {
        let c = Rgb::new(1, 2, 254);
        assert_eq!(c.to_string(), "#0102fe");
        assert_eq!(Rgb::from_hex(&c.to_string()).unwrap(), c);
    }
}
