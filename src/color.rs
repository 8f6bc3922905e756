//! Hex color helpers
//!
//! Conversion between `#rrggbb` strings and RGB triples, and the
//! channel-wise inversion used to keep highlighted color literals readable.

/// An RGB color triple
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// Create a color from its channels
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// The channel-wise inverse (255 - channel)
    pub fn inverted(self) -> Self {
        Self::new(255 - self.r, 255 - self.g, 255 - self.b)
    }

    /// Format as a lowercase `#rrggbb` string
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Expand a 3 or 6 digit hex literal (with or without `#`) to 6 digits
fn normalize_hex(hex: &str) -> Option<String> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    match digits.len() {
        6 => Some(digits.to_string()),
        3 => Some(digits.chars().flat_map(|c| [c, c]).collect()),
        _ => None,
    }
}

/// Parse a hex color into its RGB channels
///
/// Accepts `#rgb`, `#rrggbb`, `rgb` and `rrggbb`. Returns `None` for
/// anything else.
pub fn hex_to_rgb(hex: &str) -> Option<Rgb> {
    let digits = normalize_hex(hex)?;
    let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
    Some(Rgb::new(channel(0)?, channel(2)?, channel(4)?))
}

/// Format RGB channels as a lowercase `#rrggbb` string
pub fn rgb_to_hex(r: u8, g: u8, b: u8) -> String {
    Rgb::new(r, g, b).to_hex()
}

/// Invert a hex color, e.g. `#ff0000` -> `#00ffff`
///
/// Short literals are expanded first, so `#fff` -> `#000000`.
pub fn invert_hex_color(hex: &str) -> Option<String> {
    hex_to_rgb(hex).map(|rgb| rgb.inverted().to_hex())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_to_rgb() {
        assert_eq!(hex_to_rgb("#ff8000"), Some(Rgb::new(255, 128, 0)));
        assert_eq!(hex_to_rgb("FF8000"), Some(Rgb::new(255, 128, 0)));
        assert_eq!(hex_to_rgb("#f80"), Some(Rgb::new(255, 136, 0)));
    }

    #[test]
    fn test_hex_to_rgb_malformed() {
        assert_eq!(hex_to_rgb("#ff80"), None);
        assert_eq!(hex_to_rgb("#gg0000"), None);
        assert_eq!(hex_to_rgb(""), None);
    }

    #[test]
    fn test_rgb_hex_roundtrip() {
        for v in 0..=255u8 {
            let other = v.wrapping_mul(37);
            for (r, g, b) in [(v, other, !v), (!v, v, other), (other, !v, v)] {
                assert_eq!(hex_to_rgb(&rgb_to_hex(r, g, b)), Some(Rgb::new(r, g, b)));
            }
        }
    }

    #[test]
    fn test_invert() {
        assert_eq!(invert_hex_color("#ff0000").as_deref(), Some("#00ffff"));
        assert_eq!(invert_hex_color("#FFF").as_deref(), Some("#000000"));
        assert_eq!(invert_hex_color("0a0b0c").as_deref(), Some("#f5f4f3"));
    }

    #[test]
    fn test_invert_is_involution() {
        for v in 0..=255u8 {
            let other = v.wrapping_mul(37);
            for (r, g, b) in [(v, other, !v), (!v, v, other), (other, !v, v)] {
                let color = rgb_to_hex(r, g, b);
                let once = invert_hex_color(&color).unwrap();
                assert_eq!(once, Rgb::new(r, g, b).inverted().to_hex());
                assert_eq!(invert_hex_color(&once), Some(color));
            }
        }
    }
}
