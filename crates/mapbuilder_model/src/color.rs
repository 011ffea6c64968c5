use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub a: u8,
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::from_argb(255, 0, 0, 0);
    pub const WHITE: Color = Color::from_argb(255, 255, 255, 255);
    pub const RED: Color = Color::from_argb(255, 255, 0, 0);
    pub const TRANSPARENT: Color = Color::from_argb(0, 255, 255, 255);

    pub const fn from_argb(a: u8, r: u8, g: u8, b: u8) -> Self {
        Self { a, r, g, b }
    }

    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self::from_argb(255, r, g, b)
    }

    /// `#AARRGGBB`
    pub fn to_hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}{:02X}", self.a, self.r, self.g, self.b)
    }

    /// Accepts `#RRGGBB`, `#AARRGGBB` and a handful of named colors.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        if let Some(hex) = text.strip_prefix('#') {
            let byte = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
            return match hex.len() {
                6 => Some(Self::from_rgb(byte(0)?, byte(2)?, byte(4)?)),
                8 => Some(Self::from_argb(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
                _ => None,
            };
        }
        match text.to_ascii_lowercase().as_str() {
            "black" => Some(Self::BLACK),
            "white" => Some(Self::WHITE),
            "red" => Some(Self::RED),
            "green" => Some(Self::from_rgb(0, 128, 0)),
            "blue" => Some(Self::from_rgb(0, 0, 255)),
            "yellow" => Some(Self::from_rgb(255, 255, 0)),
            "gray" => Some(Self::from_rgb(128, 128, 128)),
            "transparent" => Some(Self::TRANSPARENT),
            _ => None,
        }
    }

    /// `[r, g, b, a]` as used by service JSON symbols.
    pub fn to_rgba_array(&self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    pub fn from_rgba_array(rgba: [u8; 4]) -> Self {
        Self::from_argb(rgba[3], rgba[0], rgba[1], rgba[2])
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// A point in relative brush coordinates (0..1).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BrushPoint {
    pub x: f64,
    pub y: f64,
}

impl BrushPoint {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GradientStop {
    pub color: Color,
    pub offset: f64,
}

impl GradientStop {
    pub fn new(color: Color, offset: f64) -> Self {
        Self { color, offset }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Brush {
    Solid(Color),
    LinearGradient {
        start_point: BrushPoint,
        end_point: BrushPoint,
        stops: Vec<GradientStop>,
    },
    RadialGradient {
        stops: Vec<GradientStop>,
    },
}

impl Brush {
    pub const LINEAR_DEFAULT_START: BrushPoint = BrushPoint::new(0.0, 0.0);
    pub const LINEAR_DEFAULT_END: BrushPoint = BrushPoint::new(1.0, 1.0);

    pub fn stops(&self) -> &[GradientStop] {
        match self {
            Brush::Solid(_) => &[],
            Brush::LinearGradient { stops, .. } | Brush::RadialGradient { stops } => stops,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_round_trip() {
        let c = Color::from_argb(0x80, 0x12, 0xAB, 0xFF);
        assert_eq!(c.to_hex(), "#8012ABFF");
        assert_eq!(Color::parse("#8012ABFF"), Some(c));
        assert_eq!(Color::parse("#12ABFF"), Some(Color::from_rgb(0x12, 0xAB, 0xFF)));
        assert_eq!(Color::parse("Red"), Some(Color::RED));
        assert_eq!(Color::parse("#12"), None);
    }
}
