use crate::error::{Result, ScatterError};

use super::attribute::Attribute;

/// Straight-alpha RGB parsed from a hex string, channels in `[0, 1]`.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct HexColor {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl HexColor {
    /// Parses `#RRGGBB` or the `#RGB` shorthand. The leading `#` is optional.
    pub fn parse(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let digits = trimmed.strip_prefix('#').unwrap_or(trimmed);
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ScatterError::Format(format!("`{s}` is not a hex color")));
        }

        let bytes = match digits.len() {
            6 => [
                hex_byte(&digits[0..2]),
                hex_byte(&digits[2..4]),
                hex_byte(&digits[4..6]),
            ],
            3 => [
                hex_byte(&digits[0..1]).map(|v| v * 17),
                hex_byte(&digits[1..2]).map(|v| v * 17),
                hex_byte(&digits[2..3]).map(|v| v * 17),
            ],
            _ => [None; 3],
        };

        match bytes {
            [Some(r), Some(g), Some(b)] => Ok(Self::from_u8(r, g, b)),
            _ => Err(ScatterError::Format(format!("`{s}` is not a hex color"))),
        }
    }

    #[inline]
    pub fn from_u8(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
        }
    }

    #[inline]
    pub fn with_alpha(self, a: f32) -> [f32; 4] {
        [self.r, self.g, self.b, a]
    }
}

fn hex_byte(s: &str) -> Option<u8> {
    u8::from_str_radix(s, 16).ok()
}

/// Expands colors + opacity into `4 * n` floats (RGBA per point).
///
/// Opacity is clamped to `[0, 1]`.
pub fn expand_colors(
    colors: &Attribute<String>,
    opacity: &Attribute<f32>,
    n: usize,
) -> Result<Vec<f32>> {
    expand_colors_named(colors, "colors", opacity, n)
}

pub(crate) fn expand_colors_named(
    colors: &Attribute<String>,
    attribute: &'static str,
    opacity: &Attribute<f32>,
    n: usize,
) -> Result<Vec<f32>> {
    let colors = colors.expand(attribute, n)?;
    let opacity = opacity.expand("opacity", n)?;

    let mut out = Vec::with_capacity(n * 4);
    for (hex, alpha) in colors.iter().zip(opacity) {
        let rgb = HexColor::parse(hex)?;
        out.extend_from_slice(&rgb.with_alpha(alpha.clamp(0.0, 1.0)));
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── parsing ───────────────────────────────────────────────────────────

    #[test]
    fn parses_long_form() {
        assert_eq!(HexColor::parse("#FF0000").unwrap(), HexColor { r: 1.0, g: 0.0, b: 0.0 });
        assert_eq!(HexColor::parse("00ff00").unwrap(), HexColor { r: 0.0, g: 1.0, b: 0.0 });
    }

    #[test]
    fn parses_short_form() {
        assert_eq!(HexColor::parse("#fff").unwrap(), HexColor { r: 1.0, g: 1.0, b: 1.0 });
    }

    #[test]
    fn byte_division_by_255() {
        let c = HexColor::parse("#80C0FF").unwrap();
        assert_eq!(c.r, 128.0 / 255.0);
        assert_eq!(c.g, 192.0 / 255.0);
    }

    #[test]
    fn rejects_garbage() {
        for s in ["", "#", "#12345", "#GG0000", "#+1+1+1", "red"] {
            assert!(matches!(HexColor::parse(s), Err(ScatterError::Format(_))), "{s}");
        }
    }

    // ── expansion ─────────────────────────────────────────────────────────

    #[test]
    fn red_with_full_opacity() {
        let buf = expand_colors(&Attribute::from("#FF0000"), &Attribute::Uniform(1.0), 1).unwrap();
        assert_eq!(buf, vec![1.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn broadcast_fills_every_point() {
        let buf = expand_colors(&Attribute::from("#000000"), &Attribute::Uniform(0.5), 3).unwrap();
        assert_eq!(buf.len(), 12);
        assert!(buf.chunks(4).all(|c| c == [0.0, 0.0, 0.0, 0.5]));
    }

    #[test]
    fn per_point_opacity_lands_in_alpha() {
        let buf = expand_colors(&Attribute::from("#FFFFFF"), &Attribute::PerPoint(vec![0.25, 0.75]), 2).unwrap();
        assert_eq!(buf[3], 0.25);
        assert_eq!(buf[7], 0.75);
    }

    #[test]
    fn opacity_is_clamped() {
        let buf = expand_colors(&Attribute::from("#FFFFFF"), &Attribute::PerPoint(vec![-1.0, 3.0]), 2).unwrap();
        assert_eq!((buf[3], buf[7]), (0.0, 1.0));
    }

    #[test]
    fn color_count_mismatch() {
        let err = expand_colors(&Attribute::from(vec!["#000", "#fff"]), &Attribute::Uniform(1.0), 3).unwrap_err();
        assert_eq!(
            err,
            ScatterError::Cardinality { attribute: "colors", expected: 3, actual: 2 }
        );
    }

    #[test]
    fn opacity_count_mismatch() {
        let err = expand_colors(&Attribute::from("#000"), &Attribute::PerPoint(vec![1.0]), 2).unwrap_err();
        assert!(matches!(err, ScatterError::Cardinality { attribute: "opacity", .. }));
    }
}
