#![forbid(unsafe_code)]

//! Stroke colors.
//!
//! Hex forms and a few names are packed into [`Rgba`]. Anything else a page
//! might pass (`"red"`, `"rgb(255 0 0)"`, `"hsl(...)"`, `"currentcolor"`) is
//! kept verbatim as [`StrokeColor::Css`] and handed to the canvas unchanged;
//! the 2D context ignores strings it cannot parse.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Color string that is neither a supported hex form nor a known name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognized color {0:?} (expected #rgb, #rgba, #rrggbb, #rrggbbaa or a named color)")]
pub struct ColorError(pub String);

/// A color packed as `0xRRGGBBAA`.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgba(pub u32);

impl Rgba {
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const TRANSPARENT: Self = Self::rgba(0, 0, 0, 0);

    #[inline]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self(((r as u32) << 24) | ((g as u32) << 16) | ((b as u32) << 8) | a as u32)
    }

    #[inline]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 255)
    }

    #[inline]
    pub const fn r(self) -> u8 {
        (self.0 >> 24) as u8
    }

    #[inline]
    pub const fn g(self) -> u8 {
        (self.0 >> 16) as u8
    }

    #[inline]
    pub const fn b(self) -> u8 {
        (self.0 >> 8) as u8
    }

    #[inline]
    pub const fn a(self) -> u8 {
        self.0 as u8
    }

    /// CSS form accepted by `CanvasRenderingContext2D.strokeStyle`.
    ///
    /// Opaque colors render as `#rrggbb`, everything else as `rgba(...)`.
    #[must_use]
    pub fn to_css(self) -> String {
        if self.a() == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r(), self.g(), self.b())
        } else {
            let alpha = f64::from(self.a()) / 255.0;
            format!("rgba({},{},{},{alpha:.3})", self.r(), self.g(), self.b())
        }
    }
}

impl Default for Rgba {
    fn default() -> Self {
        Self::WHITE
    }
}

impl fmt::Debug for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Rgba(#{:08x})", self.0)
    }
}

fn hex_nibble(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

fn parse_hex(digits: &str) -> Option<Rgba> {
    let bytes = digits.as_bytes();
    let nibbles: Vec<u8> = bytes.iter().map(|&b| hex_nibble(b)).collect::<Option<_>>()?;
    let channels: Vec<u8> = match nibbles.len() {
        3 | 4 => nibbles.iter().map(|n| n * 17).collect(),
        6 | 8 => nibbles.chunks(2).map(|p| (p[0] << 4) | p[1]).collect(),
        _ => return None,
    };
    let a = channels.get(3).copied().unwrap_or(255);
    Some(Rgba::rgba(channels[0], channels[1], channels[2], a))
}

impl FromStr for Rgba {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let parsed = match trimmed.strip_prefix('#') {
            Some(digits) => parse_hex(digits),
            None => match trimmed.to_ascii_lowercase().as_str() {
                "white" => Some(Self::WHITE),
                "black" => Some(Self::BLACK),
                "transparent" => Some(Self::TRANSPARENT),
                _ => None,
            },
        };
        parsed.ok_or_else(|| ColorError(s.to_owned()))
    }
}

/// Color handed to `strokeStyle`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StrokeColor {
    Rgba(Rgba),
    /// A CSS color string the canvas parses itself.
    Css(Arc<str>),
}

impl StrokeColor {
    /// Interpret a host color string. Hex forms and known names are packed;
    /// other non-empty strings pass through. Blank input is the default.
    pub fn parse_lenient(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            tracing::warn!("empty spark color, using default");
            return Self::default();
        }
        match trimmed.parse::<Rgba>() {
            Ok(rgba) => Self::Rgba(rgba),
            Err(_) => Self::Css(Arc::from(trimmed)),
        }
    }

    /// The packed color, if this is one.
    #[inline]
    pub fn as_rgba(&self) -> Option<Rgba> {
        match self {
            Self::Rgba(rgba) => Some(*rgba),
            Self::Css(_) => None,
        }
    }

    #[must_use]
    pub fn to_css(&self) -> Cow<'_, str> {
        match self {
            Self::Rgba(rgba) => Cow::Owned(rgba.to_css()),
            Self::Css(css) => Cow::Borrowed(&**css),
        }
    }
}

impl Default for StrokeColor {
    fn default() -> Self {
        Self::Rgba(Rgba::WHITE)
    }
}

impl From<Rgba> for StrokeColor {
    fn from(rgba: Rgba) -> Self {
        Self::Rgba(rgba)
    }
}

impl PartialEq<Rgba> for StrokeColor {
    fn eq(&self, other: &Rgba) -> bool {
        self.as_rgba() == Some(*other)
    }
}

impl Serialize for StrokeColor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_css())
    }
}

impl<'de> Deserialize<'de> for StrokeColor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::parse_lenient(&raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_hex_expands() {
        assert_eq!("#fff".parse::<Rgba>().unwrap(), Rgba::WHITE);
        assert_eq!("#f008".parse::<Rgba>().unwrap(), Rgba::rgba(255, 0, 0, 0x88));
    }

    #[test]
    fn long_hex() {
        assert_eq!("#1e90ff".parse::<Rgba>().unwrap(), Rgba::rgb(0x1e, 0x90, 0xff));
        assert_eq!(
            "#1E90FF80".parse::<Rgba>().unwrap(),
            Rgba::rgba(0x1e, 0x90, 0xff, 0x80)
        );
    }

    #[test]
    fn named_colors_ignore_case() {
        assert_eq!(" White ".parse::<Rgba>().unwrap(), Rgba::WHITE);
        assert_eq!("transparent".parse::<Rgba>().unwrap().a(), 0);
    }

    #[test]
    fn rejects_junk() {
        for bad in ["", "#", "#12", "#12345", "#ggg", "rebeccapurple", "fff"] {
            assert!(bad.parse::<Rgba>().is_err(), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn css_output() {
        assert_eq!(Rgba::rgb(255, 136, 0).to_css(), "#ff8800");
        assert_eq!(Rgba::rgba(0, 0, 0, 0).to_css(), "rgba(0,0,0,0.000)");
        assert_eq!(Rgba::rgba(10, 20, 30, 255).to_css(), "#0a141e");
    }

    #[test]
    fn other_css_colors_pass_through() {
        for css in ["red", "rgb(255,0,0)", "hsl(0 100% 50%)", "rebeccapurple"] {
            let color = StrokeColor::parse_lenient(css);
            assert_eq!(color, StrokeColor::Css(Arc::from(css)));
            assert_eq!(color.to_css(), css);
        }
    }

    #[test]
    fn lenient_parse_packs_what_it_can() {
        assert_eq!(StrokeColor::parse_lenient(" #f80 "), Rgba::rgb(255, 136, 0));
        assert_eq!(StrokeColor::parse_lenient("BLACK"), Rgba::BLACK);
        assert_eq!(StrokeColor::parse_lenient("   "), StrokeColor::default());
        assert_eq!(StrokeColor::default().to_css(), "#ffffff");
    }

    #[test]
    fn serde_uses_css_strings() {
        let json = serde_json::to_string(&StrokeColor::from(Rgba::rgb(1, 2, 3))).unwrap();
        assert_eq!(json, "\"#010203\"");
        let back: StrokeColor = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Rgba::rgb(1, 2, 3));

        let css: StrokeColor = serde_json::from_str("\"orange\"").unwrap();
        assert_eq!(serde_json::to_string(&css).unwrap(), "\"orange\"");
    }
}
