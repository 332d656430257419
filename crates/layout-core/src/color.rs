//! Colour parsing and formatting.
//!
//! User colours arrive as CSS-like strings. They are parsed once into
//! [`Rgba`] and re-emitted in canonical form, so backends never embed raw
//! user strings into markup.

use serde::{Deserialize, Serialize};

/// 8-bit RGBA colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const BLACK: Rgba = Rgba::rgb(0, 0, 0);
    pub const WHITE: Rgba = Rgba::rgb(255, 255, 255);
    pub const TRANSPARENT: Rgba = Rgba::rgba(0, 0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Black with the given opacity in percent.
    pub fn black_percent(percent: u8) -> Self {
        let a = (f64::from(percent.min(100)) / 100.0 * 255.0).round() as u8;
        Self::rgba(0, 0, 0, a)
    }

    /// Parse `#rgb`, `#rgba`, `#rrggbb`, `#rrggbbaa`, `rgb()`, `rgba()`,
    /// or one of a few keywords.
    pub fn parse(input: &str) -> Option<Self> {
        let s = input.trim().to_ascii_lowercase();
        if let Some(hex) = s.strip_prefix('#') {
            return parse_hex(hex);
        }
        if let Some(args) = s.strip_prefix("rgba(").and_then(|r| r.strip_suffix(')')) {
            return parse_functional(args, true);
        }
        if let Some(args) = s.strip_prefix("rgb(").and_then(|r| r.strip_suffix(')')) {
            return parse_functional(args, false);
        }
        match s.as_str() {
            "black" => Some(Self::BLACK),
            "white" => Some(Self::WHITE),
            "transparent" => Some(Self::TRANSPARENT),
            _ => None,
        }
    }

    /// Alpha as a fraction in `[0, 1]`.
    pub fn alpha(&self) -> f64 {
        f64::from(self.a) / 255.0
    }

    /// `#rrggbb` without alpha.
    pub fn hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// CSS form; opaque colours use hex, others `rgba()`.
    pub fn css(&self) -> String {
        if self.a == 255 {
            self.hex()
        } else {
            format!(
                "rgba({},{},{},{})",
                self.r,
                self.g,
                self.b,
                format_alpha(self.alpha())
            )
        }
    }
}

/// Format an alpha fraction with at most three decimals and no trailing zeros.
pub fn format_alpha(alpha: f64) -> String {
    let text = format!("{:.3}", alpha.clamp(0.0, 1.0));
    let text = text.trim_end_matches('0').trim_end_matches('.');
    if text.is_empty() {
        "0".to_string()
    } else {
        text.to_string()
    }
}

fn parse_hex(hex: &str) -> Option<Rgba> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let nibble = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|v| v * 17);
    let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    match hex.len() {
        3 => Some(Rgba::rgb(nibble(0)?, nibble(1)?, nibble(2)?)),
        4 => Some(Rgba::rgba(nibble(0)?, nibble(1)?, nibble(2)?, nibble(3)?)),
        6 => Some(Rgba::rgb(byte(0)?, byte(2)?, byte(4)?)),
        8 => Some(Rgba::rgba(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
        _ => None,
    }
}

fn parse_functional(args: &str, with_alpha: bool) -> Option<Rgba> {
    let parts: Vec<&str> = args.split(',').map(str::trim).collect();
    let expected = if with_alpha { 4 } else { 3 };
    if parts.len() != expected {
        return None;
    }
    let channel = |s: &str| -> Option<u8> {
        let value: f64 = s.parse().ok()?;
        value
            .is_finite()
            .then(|| value.clamp(0.0, 255.0).round() as u8)
    };
    let alpha = if with_alpha {
        let value: f64 = parts[3].parse().ok()?;
        if !value.is_finite() {
            return None;
        }
        (value.clamp(0.0, 1.0) * 255.0).round() as u8
    } else {
        255
    };
    Some(Rgba::rgba(
        channel(parts[0])?,
        channel(parts[1])?,
        channel(parts[2])?,
        alpha,
    ))
}
