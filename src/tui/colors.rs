//! Color constants for the terminal user interface.

use ratatui::style::Color;

use crate::fields::{BadgeCategory, DEFAULT_COLOR};

/// Focused form field border.
pub const GOLD: Color = Color::Rgb(255, 215, 0);
/// Confirm dialog background and field errors.
pub const DARK_RED: Color = Color::Rgb(114, 0, 0);
/// Accent used for the header and status bar.
pub const ACCENT: Color = Color::Rgb(0, 180, 216);

/// Colour of a status badge.
pub fn badge_color(badge: BadgeCategory) -> Color {
    match badge {
        BadgeCategory::Primary => Color::Rgb(13, 110, 253),
        BadgeCategory::Warning => Color::Rgb(255, 193, 7),
        BadgeCategory::Danger => Color::Rgb(220, 53, 69),
        BadgeCategory::Success => Color::Rgb(25, 135, 84),
        BadgeCategory::Secondary => Color::Rgb(108, 117, 125),
    }
}

/// Parse a `#rrggbb` or `#rgb` string, falling back to the accent colour.
pub fn hex_color(value: &str) -> Color {
    parse_hex(value)
        .or_else(|| parse_hex(DEFAULT_COLOR))
        .unwrap_or(ACCENT)
}

fn parse_hex(value: &str) -> Option<Color> {
    let hex = value.trim().strip_prefix('#')?;
    if !hex.is_ascii() {
        return None;
    }
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();
    match hex.len() {
        6 => Some(Color::Rgb(channel(&hex[0..2])?, channel(&hex[2..4])?, channel(&hex[4..6])?)),
        3 => {
            let c = |i: usize| channel(&hex[i..i + 1]).map(|v| v * 17);
            Some(Color::Rgb(c(0)?, c(1)?, c(2)?))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_color() {
        assert_eq!(hex_color("#ff8000"), Color::Rgb(255, 128, 0));
        assert_eq!(hex_color("#fff"), Color::Rgb(255, 255, 255));
        assert_eq!(hex_color("red"), Color::Rgb(0, 180, 216));
        assert_eq!(hex_color("#12345"), ACCENT);
    }
}
