//! sRGB color sampled from source pixels.
//!
//! Channels are stored as `f64` in [0, 1]. Only simple sRGB averaging is
//! performed (brightness is the plain channel mean); there is no gamma-aware
//! or perceptual processing.

use crate::error::ParticleError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// sRGB color with components in [0, 1].
///
/// Serializes as a hex string `"#rrggbb"`. The hex form has 8-bit
/// quantization, which matches the 8-bit sources colors are sampled from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Srgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Srgb {
    /// Creates a color from components, clamping each to [0, 1].
    pub fn new(r: f64, g: f64, b: f64) -> Self {
        Self {
            r: r.clamp(0.0, 1.0),
            g: g.clamp(0.0, 1.0),
            b: b.clamp(0.0, 1.0),
        }
    }

    /// Converts straight (non-premultiplied) 8-bit channels.
    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: r as f64 / 255.0,
            g: g as f64 / 255.0,
            b: b as f64 / 255.0,
        }
    }

    /// Converts premultiplied 8-bit channels by dividing out alpha.
    ///
    /// A zero alpha yields black. Results are clamped, since malformed
    /// premultiplied data can carry a channel larger than its alpha.
    pub fn from_premultiplied_rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        if a == 0 {
            return Self::new(0.0, 0.0, 0.0);
        }
        let a = a as f64;
        Self::new(r as f64 / a, g as f64 / a, b as f64 / a)
    }

    /// Mean of the three channels.
    pub fn brightness(self) -> f64 {
        (self.r + self.g + self.b) / 3.0
    }

    /// Quantizes to 8-bit channels with rounding.
    pub fn to_rgb8(self) -> [u8; 3] {
        [
            (self.r.clamp(0.0, 1.0) * 255.0).round() as u8,
            (self.g.clamp(0.0, 1.0) * 255.0).round() as u8,
            (self.b.clamp(0.0, 1.0) * 255.0).round() as u8,
        ]
    }

    /// Parses a hex color string like "#ff00aa" or "ff00aa" (case insensitive).
    pub fn from_hex(hex: &str) -> Result<Srgb, ParticleError> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(ParticleError::InvalidConfig(format!(
                "invalid color '{hex}': expected 6 hex digits"
            )));
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16)
                .map_err(|e| ParticleError::InvalidConfig(format!("invalid color '{hex}': {e}")))
        };
        Ok(Srgb::from_rgb8(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }

    /// Formats as `"#rrggbb"`.
    pub fn to_hex(self) -> String {
        let [r, g, b] = self.to_rgb8();
        format!("#{r:02x}{g:02x}{b:02x}")
    }
}

impl Serialize for Srgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Srgb {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Srgb::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < EPSILON
    }

    // -- 8-bit conversion --

    #[test]
    fn from_rgb8_maps_full_range_to_unit_interval() {
        let c = Srgb::from_rgb8(255, 0, 51);
        assert!(approx_eq(c.r, 1.0));
        assert!(approx_eq(c.g, 0.0));
        assert!(approx_eq(c.b, 0.2));
    }

    #[test]
    fn premultiplied_divides_out_alpha() {
        // 50% alpha red stored premultiplied as (128, 0, 0, 128).
        let c = Srgb::from_premultiplied_rgba8(128, 0, 0, 128);
        assert!(approx_eq(c.r, 1.0), "expected un-premultiplied red, got {}", c.r);
        assert!(approx_eq(c.g, 0.0));
    }

    #[test]
    fn premultiplied_with_zero_alpha_is_black() {
        let c = Srgb::from_premultiplied_rgba8(10, 20, 30, 0);
        assert_eq!(c, Srgb::new(0.0, 0.0, 0.0));
    }

    #[test]
    fn premultiplied_clamps_malformed_channels() {
        let c = Srgb::from_premultiplied_rgba8(255, 255, 255, 128);
        assert!(c.r <= 1.0 && c.g <= 1.0 && c.b <= 1.0);
    }

    #[test]
    fn brightness_is_channel_mean() {
        assert!(approx_eq(Srgb::from_rgb8(255, 0, 0).brightness(), 1.0 / 3.0));
        assert!(approx_eq(Srgb::new(1.0, 1.0, 1.0).brightness(), 1.0));
        assert!(approx_eq(Srgb::new(0.0, 0.0, 0.0).brightness(), 0.0));
    }

    #[test]
    fn new_clamps_components() {
        let c = Srgb::new(1.5, -0.5, 0.5);
        assert_eq!(c, Srgb::new(1.0, 0.0, 0.5));
    }

    // -- Hex --

    #[test]
    fn from_hex_parses_with_and_without_hash() {
        assert_eq!(Srgb::from_hex("#ff0000").unwrap(), Srgb::from_rgb8(255, 0, 0));
        assert_eq!(Srgb::from_hex("00FF00").unwrap(), Srgb::from_rgb8(0, 255, 0));
    }

    #[test]
    fn from_hex_rejects_bad_input() {
        assert!(Srgb::from_hex("#ff00").is_err());
        assert!(Srgb::from_hex("zzzzzz").is_err());
        assert!(Srgb::from_hex("ééé").is_err());
    }

    #[test]
    fn to_hex_round_trips_8bit_colors() {
        for hex in ["#000000", "#ffffff", "#1a2b3c", "#ff8000"] {
            assert_eq!(Srgb::from_hex(hex).unwrap().to_hex(), hex);
        }
    }

    #[test]
    fn srgb_serializes_as_hex_string() {
        let json = serde_json::to_string(&Srgb::from_rgb8(255, 0, 0)).unwrap();
        assert_eq!(json, "\"#ff0000\"");
        let back: Srgb = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Srgb::from_rgb8(255, 0, 0));
    }

    #[test]
    fn srgb_deserialize_rejects_invalid_hex() {
        assert!(serde_json::from_str::<Srgb>("\"#nothex\"").is_err());
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn rgb8_round_trip_is_exact(r: u8, g: u8, b: u8) {
                prop_assert_eq!(Srgb::from_rgb8(r, g, b).to_rgb8(), [r, g, b]);
            }

            #[test]
            fn brightness_stays_in_unit_interval(r: u8, g: u8, b: u8, a in 1u8..=255) {
                let straight = Srgb::from_rgb8(r, g, b).brightness();
                let premul = Srgb::from_premultiplied_rgba8(r, g, b, a).brightness();
                prop_assert!((0.0..=1.0).contains(&straight));
                prop_assert!((0.0..=1.0).contains(&premul));
            }
        }
    }
}
