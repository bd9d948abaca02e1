//! Four-channel color value shared by the renderer, the shell and the pickers.

pub mod random;

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

pub use random::{
    random_corner_colors, ColorFormat, HsvColor, HueSpec, Luminosity, NamedHue, RandomColor,
    RandomOptionError, RandomSeed, RandomValue,
};

pub const OPAQUE: u8 = 255;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorParseError {
    #[error("invalid hex color {0:?}; expected #RRGGBB")]
    InvalidHex(String),
}

/// RGBA color with 8-bit channels.
///
/// Channels are public and mutable so a single instance can be rewritten in
/// place by `set`/`set_packed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Default for Color {
    fn default() -> Self {
        Self::from_packed(0)
    }
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, OPAQUE)
    }

    /// Decomposes a packed `0xRRGGBB` integer; alpha is always opaque.
    pub const fn from_packed(packed: u32) -> Self {
        Self {
            r: ((packed >> 16) % 256) as u8,
            g: ((packed >> 8) % 256) as u8,
            b: (packed % 256) as u8,
            a: OPAQUE,
        }
    }

    pub fn set(&mut self, r: u8, g: u8, b: u8, a: u8) {
        self.r = r;
        self.g = g;
        self.b = b;
        self.a = a;
    }

    pub fn set_packed(&mut self, packed: u32) {
        *self = Self::from_packed(packed);
    }

    /// Packed `0xRRGGBB` form; alpha is discarded.
    pub const fn value(self) -> u32 {
        ((self.r as u32) << 16) + ((self.g as u32) << 8) + self.b as u32
    }

    pub const fn rgb(self) -> (u8, u8, u8) {
        (self.r, self.g, self.b)
    }

    pub fn from_hex(value: &str) -> Result<Self, ColorParseError> {
        let invalid = || ColorParseError::InvalidHex(value.to_string());
        let digits = value.trim().strip_prefix('#').unwrap_or(value.trim());
        if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let packed = u32::from_str_radix(digits, 16).map_err(|_| invalid())?;
        Ok(Self::from_packed(packed))
    }

    pub fn to_hex(self) -> String {
        format!("#{:06x}", self.value())
    }

    /// Converts a `[0.0, 1.0]` RGBA quadruple, as handed out by color choosers.
    pub fn from_unit_rgba(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self::new(
            unit_to_channel(red),
            unit_to_channel(green),
            unit_to_channel(blue),
            unit_to_channel(alpha),
        )
    }

    pub fn to_unit_rgba(self) -> (f32, f32, f32, f32) {
        (
            f32::from(self.r) / 255.0,
            f32::from(self.g) / 255.0,
            f32::from(self.b) / 255.0,
            f32::from(self.a) / 255.0,
        )
    }
}

fn unit_to_channel(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

impl From<u32> for Color {
    fn from(packed: u32) -> Self {
        Self::from_packed(packed)
    }
}

impl From<[u8; 3]> for Color {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self::opaque(r, g, b)
    }
}

impl FromStr for Color {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packed_constructor_splits_channels_and_forces_opaque_alpha() {
        let color = Color::from_packed(0x12_34_56);
        assert_eq!(color, Color::new(0x12, 0x34, 0x56, 255));
    }

    #[test]
    fn packed_value_round_trips_across_the_24_bit_range() {
        for packed in (0..=0xFF_FF_FF_u32).step_by(0x1_01_07) {
            assert_eq!(Color::from_packed(packed).value(), packed);
        }
        assert_eq!(Color::from_packed(0xFF_FF_FF).value(), 0xFF_FF_FF);
        assert_eq!(Color::from_packed(0).value(), 0);
    }

    #[test]
    fn packed_constructor_ignores_bits_above_24() {
        assert_eq!(Color::from_packed(0xAB_12_34_56).value(), 0x12_34_56);
    }

    #[test]
    fn value_discards_alpha() {
        assert_eq!(Color::new(1, 2, 3, 0).value(), Color::new(1, 2, 3, 255).value());
    }

    #[test]
    fn set_overwrites_all_channels_in_place() {
        let mut color = Color::default();
        assert_eq!(color, Color::new(0, 0, 0, 255));
        color.set(10, 20, 30, 40);
        assert_eq!(color, Color::new(10, 20, 30, 40));
        color.set_packed(0x00_FF_00);
        assert_eq!(color, Color::new(0, 255, 0, 255));
    }

    #[test]
    fn hex_parsing_accepts_optional_hash_and_rejects_garbage() {
        assert_eq!(Color::from_hex("#ff8000").unwrap(), Color::opaque(255, 128, 0));
        assert_eq!("00ff7f".parse::<Color>().unwrap(), Color::opaque(0, 255, 127));
        assert!(Color::from_hex("#fff").is_err());
        assert!(Color::from_hex("#gg0000").is_err());
        assert_eq!(Color::opaque(255, 128, 0).to_hex(), "#ff8000");
    }

    #[test]
    fn unit_rgba_conversion_scales_and_clamps() {
        let color = Color::from_unit_rgba(1.0, 0.5, 0.0, 2.0);
        assert_eq!(color, Color::new(255, 128, 0, 255));
        let (r, _, b, a) = Color::new(255, 0, 0, 0).to_unit_rgba();
        assert_eq!((r, b, a), (1.0, 0.0, 0.0));
    }
}
