use crate::foundation::error::{ScrollyError, ScrollyResult};
use serde::{Deserialize, Serialize};

pub use kurbo::{Point, Vec2};

/// Normalized scroll position: 0 is the top of the page, 1 the bottom.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScrollFraction(f64);

impl ScrollFraction {
    /// Top of the scrollable range.
    pub const START: Self = Self(0.0);
    /// Bottom of the scrollable range.
    pub const END: Self = Self(1.0);

    /// Build a fraction from a raw sample.
    ///
    /// Finite values are clamped into `[0, 1]`; NaN and infinities are rejected.
    pub fn new(v: f64) -> ScrollyResult<Self> {
        if !v.is_finite() {
            return Err(ScrollyError::validation(format!(
                "scroll fraction must be finite, got {v}"
            )));
        }
        Ok(Self(v.clamp(0.0, 1.0)))
    }

    /// Raw value in `[0, 1]`.
    pub fn get(self) -> f64 {
        self.0
    }

    /// Rounded percentage in `0..=100`.
    pub fn percent(self) -> u32 {
        (self.0 * 100.0).round() as u32
    }
}

/// Output raster dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Canvas {
    /// Create a validated canvas with non-zero dimensions.
    pub fn new(width: u32, height: u32) -> ScrollyResult<Self> {
        if width == 0 || height == 0 {
            return Err(ScrollyError::validation("canvas width/height must be > 0"));
        }
        Ok(Self { width, height })
    }

    /// Center point in pixel space.
    pub fn center(self) -> Point {
        Point::new(f64::from(self.width) / 2.0, f64::from(self.height) / 2.0)
    }
}

/// Straight (non-premultiplied) sRGB color with channels in `[0, 1]`.
///
/// Serializes as `#rrggbb`. Deserializes from a hex string, an `{r,g,b}`
/// object or a `[r,g,b]` array.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgb {
    /// Red channel.
    pub r: f64,
    /// Green channel.
    pub g: f64,
    /// Blue channel.
    pub b: f64,
}

impl Rgb {
    /// Pure black.
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0);

    /// Create a color from normalized channels.
    pub const fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    /// Create a color from 8-bit channels.
    pub fn from_u8(r: u8, g: u8, b: u8) -> Self {
        Self::new(
            f64::from(r) / 255.0,
            f64::from(g) / 255.0,
            f64::from(b) / 255.0,
        )
    }

    /// Parse `#rrggbb` (the leading `#` is optional).
    pub fn from_hex(s: &str) -> ScrollyResult<Self> {
        let s = s.trim();
        let s = s.strip_prefix('#').unwrap_or(s);
        if s.len() != 6 || !s.is_ascii() {
            return Err(ScrollyError::validation(format!(
                "hex color must be #RRGGBB, got \"{s}\""
            )));
        }

        fn hex_byte(pair: &str) -> ScrollyResult<u8> {
            u8::from_str_radix(pair, 16)
                .map_err(|_| ScrollyError::validation(format!("invalid hex byte \"{pair}\"")))
        }

        Ok(Self::from_u8(
            hex_byte(&s[0..2])?,
            hex_byte(&s[2..4])?,
            hex_byte(&s[4..6])?,
        ))
    }

    /// Quantize to 8-bit channels.
    pub fn to_u8(self) -> [u8; 3] {
        fn q(x: f64) -> u8 {
            (x.clamp(0.0, 1.0) * 255.0).round() as u8
        }
        [q(self.r), q(self.g), q(self.b)]
    }

    /// Format as lowercase `#rrggbb`.
    pub fn to_hex(self) -> String {
        let [r, g, b] = self.to_u8();
        format!("#{r:02x}{g:02x}{b:02x}")
    }

    /// Linear interpolation toward `other`; `t` is clamped to `[0, 1]`.
    pub fn lerp(self, other: Self, t: f64) -> Self {
        let t = t.clamp(0.0, 1.0);
        Self::new(
            self.r + (other.r - self.r) * t,
            self.g + (other.g - self.g) * t,
            self.b + (other.b - self.b) * t,
        )
    }

    /// Largest per-channel absolute difference.
    pub fn max_channel_delta(self, other: Self) -> f64 {
        (self.r - other.r)
            .abs()
            .max((self.g - other.g).abs())
            .max((self.b - other.b).abs())
    }
}

impl Serialize for Rgb {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Rgb {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Hex(String),
            Obj { r: f64, g: f64, b: f64 },
            Arr([f64; 3]),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Hex(s) => Self::from_hex(&s).map_err(serde::de::Error::custom),
            Repr::Obj { r, g, b } => Ok(Self::new(r, g, b)),
            Repr::Arr([r, g, b]) => Ok(Self::new(r, g, b)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn scroll_fraction_clamps_and_rejects_nan() {
        assert_eq!(ScrollFraction::new(1.5).unwrap(), ScrollFraction::END);
        assert_eq!(ScrollFraction::new(-0.2).unwrap(), ScrollFraction::START);
        assert!(ScrollFraction::new(f64::NAN).is_err());
        assert!(ScrollFraction::new(f64::INFINITY).is_err());
        assert_eq!(ScrollFraction::new(0.125).unwrap().percent(), 13);
    }

    #[test]
    fn canvas_rejects_zero_dimensions() {
        assert!(Canvas::new(0, 10).is_err());
        assert!(Canvas::new(10, 0).is_err());
        assert_eq!(Canvas::new(10, 20).unwrap().center(), Point::new(5.0, 10.0));
    }

    #[test]
    fn hex_roundtrips_through_u8() {
        let c = Rgb::from_hex("#1a0508").unwrap();
        assert_eq!(c.to_u8(), [0x1a, 0x05, 0x08]);
        assert_eq!(c.to_hex(), "#1a0508");
        assert_eq!(Rgb::from_hex("FFF1E6").unwrap().to_hex(), "#fff1e6");
    }

    #[test]
    fn hex_rejects_bad_input() {
        assert!(Rgb::from_hex("#fff").is_err());
        assert!(Rgb::from_hex("#gg0000").is_err());
        assert!(Rgb::from_hex("#ffé000").is_err());
    }

    #[test]
    fn lerp_clamps_factor() {
        let a = Rgb::BLACK;
        let b = Rgb::new(1.0, 1.0, 1.0);
        assert_eq!(a.lerp(b, 2.0), b);
        assert_eq!(a.lerp(b, -1.0), a);
        assert_eq!(a.lerp(b, 0.5), Rgb::new(0.5, 0.5, 0.5));
    }

    #[test]
    fn deserializes_all_representations() {
        let c: Rgb = serde_json::from_value(json!("#ff0000")).unwrap();
        assert_eq!(c, Rgb::new(1.0, 0.0, 0.0));
        let c: Rgb = serde_json::from_value(json!({"r": 0.25, "g": 0.5, "b": 0.75})).unwrap();
        assert_eq!(c, Rgb::new(0.25, 0.5, 0.75));
        let c: Rgb = serde_json::from_value(json!([0.25, 0.5, 0.75])).unwrap();
        assert_eq!(c, Rgb::new(0.25, 0.5, 0.75));
        assert_eq!(serde_json::to_value(c).unwrap(), json!("#4080bf"));
    }
}
