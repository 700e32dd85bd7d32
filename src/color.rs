//! RGBA colors
//!
//! Bullets, enemies and bonuses only carry a color tag; drawing is left to
//! whatever consumes the frame snapshot.

use serde::{Deserialize, Serialize};

/// 8-bit RGBA color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

impl Color {
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const RED: Color = Color::rgb(255, 0, 0);
    pub const GREEN: Color = Color::rgb(0, 128, 0);
    pub const BLUE: Color = Color::rgb(0, 0, 255);
    pub const YELLOW: Color = Color::rgb(255, 255, 0);
    pub const CYAN: Color = Color::rgb(0, 255, 255);
    pub const MAGENTA: Color = Color::rgb(255, 0, 255);
    pub const PURPLE: Color = Color::rgb(128, 0, 128);
    pub const ORANGE: Color = Color::rgb(255, 165, 0);
    pub const BROWN: Color = Color::rgb(165, 42, 42);
    pub const CRIMSON: Color = Color::rgb(220, 20, 60);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Look up a named color (case-insensitive). Unknown names map to white.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "red" => Color::RED,
            "blue" => Color::BLUE,
            "green" => Color::GREEN,
            "yellow" => Color::YELLOW,
            "cyan" => Color::CYAN,
            "magenta" => Color::MAGENTA,
            "white" => Color::WHITE,
            "black" => Color::BLACK,
            "purple" => Color::PURPLE,
            "orange" => Color::ORANGE,
            "brown" => Color::BROWN,
            "crimson" => Color::CRIMSON,
            _ => Color::WHITE,
        }
    }

    /// Linear interpolation of every channel, `t` clamped to [0, 1]
    pub fn lerp(self, other: Color, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
        Self {
            r: mix(self.r, other.r),
            g: mix(self.g, other.g),
            b: mix(self.b, other.b),
            a: mix(self.a, other.a),
        }
    }

    /// Same color with alpha set from a [0, 1] factor
    pub fn with_alpha(self, alpha: f32) -> Self {
        Self {
            a: (alpha.clamp(0.0, 1.0) * 255.0).round() as u8,
            ..self
        }
    }

    /// Multiply RGB channels independently (alpha untouched)
    pub fn scaled(self, r: f32, g: f32, b: f32) -> Self {
        let scale = |c: u8, f: f32| (c as f32 * f.clamp(0.0, 1.0)) as u8;
        Self {
            r: scale(self.r, r),
            g: scale(self.g, g),
            b: scale(self.b, b),
            a: self.a,
        }
    }

    /// Packed 0xRRGGBBAA for renderers
    pub fn to_u32(self) -> u32 {
        u32::from_be_bytes([self.r, self.g, self.b, self.a])
    }
}

/// Color as written in level files: a name or an `{R, G, B, A}` object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColorSpec {
    Named(String),
    Channels {
        #[serde(rename = "R", alias = "r")]
        r: u8,
        #[serde(rename = "G", alias = "g")]
        g: u8,
        #[serde(rename = "B", alias = "b")]
        b: u8,
        #[serde(rename = "A", alias = "a", default = "opaque")]
        a: u8,
    },
}

fn opaque() -> u8 {
    255
}

impl From<&ColorSpec> for Color {
    fn from(spec: &ColorSpec) -> Self {
        match spec {
            ColorSpec::Named(name) => Color::from_name(name),
            ColorSpec::Channels { r, g, b, a } => Color::rgba(*r, *g, *b, *a),
        }
    }
}

impl From<Color> for ColorSpec {
    fn from(color: Color) -> Self {
        ColorSpec::Channels {
            r: color.r,
            g: color.g,
            b: color.b,
            a: color.a,
        }
    }
}
