//! Hex color strings to and from RGBA bytes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ColorError {
    #[error("invalid hex color length: expected 3, 6 or 8 digits, got {len}")]
    InvalidFormat { len: usize },
    #[error("invalid hex digit {digit:?}")]
    InvalidDigit { digit: char },
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn to_hex(self) -> String {
        encode_hex(self)
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::BLACK
    }
}

impl FromStr for Color {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        decode_hex(s)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

fn nibble(digit: char) -> Result<u8, ColorError> {
    digit
        .to_digit(16)
        .map(|value| value as u8)
        .ok_or(ColorError::InvalidDigit { digit })
}

fn byte(high: char, low: char) -> Result<u8, ColorError> {
    Ok(nibble(high)? << 4 | nibble(low)?)
}

/// Decodes `rgb`, `rrggbb` or `rrggbbaa`, with or without a leading `#`.
///
/// The shorthand form duplicates each digit, so `"abc"` is `#aabbcc`.
/// Alpha defaults to 255 unless the 8-digit form supplies it.
pub fn decode_hex(text: &str) -> Result<Color, ColorError> {
    let digits: Vec<char> = text.strip_prefix('#').unwrap_or(text).chars().collect();
    match digits.as_slice() {
        [r, g, b] => Ok(Color::rgb(byte(*r, *r)?, byte(*g, *g)?, byte(*b, *b)?)),
        [r1, r2, g1, g2, b1, b2] => Ok(Color::rgb(
            byte(*r1, *r2)?,
            byte(*g1, *g2)?,
            byte(*b1, *b2)?,
        )),
        [r1, r2, g1, g2, b1, b2, a1, a2] => Ok(Color::rgba(
            byte(*r1, *r2)?,
            byte(*g1, *g2)?,
            byte(*b1, *b2)?,
            byte(*a1, *a2)?,
        )),
        other => Err(ColorError::InvalidFormat { len: other.len() }),
    }
}

/// `#rrggbb`, lowercase. Alpha is not emitted.
pub fn encode_hex(color: Color) -> String {
    color.to_string()
}
