//! Color themes and small color helpers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeId {
    #[default]
    Peach,
    Mint,
    Lavender,
    Sky,
    Sand,
    Dark,
    White,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Theme {
    pub id: ThemeId,
    pub name: &'static str,
    /// Page background.
    pub bg: &'static str,
    pub card_bg: &'static str,
    pub text: &'static str,
    pub accent: &'static str,
}

/// Palette in display (and cycling) order.
pub static THEMES: [Theme; 7] = [
    Theme {
        id: ThemeId::Peach,
        name: "Peach",
        bg: "#FCE4D6",
        card_bg: "#F4C6AF",
        text: "#4B2C2C",
        accent: "#D15B3F",
    },
    Theme {
        id: ThemeId::Mint,
        name: "Mint",
        bg: "#E0F7EF",
        card_bg: "#C4EBDD",
        text: "#16332A",
        accent: "#1E7A57",
    },
    Theme {
        id: ThemeId::Lavender,
        name: "Lavender",
        bg: "#EEE7FF",
        card_bg: "#D7CCFF",
        text: "#2F2144",
        accent: "#5A3FF0",
    },
    Theme {
        id: ThemeId::Sky,
        name: "Sky",
        bg: "#E4F3FF",
        card_bg: "#C8E4FF",
        text: "#123047",
        accent: "#186FBF",
    },
    Theme {
        id: ThemeId::Sand,
        name: "Sand",
        bg: "#F5EBDD",
        card_bg: "#E4D3BE",
        text: "#3B3022",
        accent: "#B57A3F",
    },
    Theme {
        id: ThemeId::Dark,
        name: "Dark",
        bg: "#1A1A1A",
        card_bg: "#2D2D2D",
        text: "#E5E5E5",
        accent: "#6366F1",
    },
    Theme {
        id: ThemeId::White,
        name: "White",
        bg: "#FFFFFF",
        card_bg: "#F5F5F5",
        text: "#1A1A1A",
        accent: "#3B82F6",
    },
];

impl ThemeId {
    pub fn as_str(self) -> &'static str {
        match self {
            ThemeId::Peach => "peach",
            ThemeId::Mint => "mint",
            ThemeId::Lavender => "lavender",
            ThemeId::Sky => "sky",
            ThemeId::Sand => "sand",
            ThemeId::Dark => "dark",
            ThemeId::White => "white",
        }
    }

    pub fn theme(self) -> &'static Theme {
        THEMES
            .iter()
            .find(|t| t.id == self)
            .unwrap_or(&THEMES[0])
    }

    /// Following theme in palette order, wrapping around.
    pub fn next(self) -> ThemeId {
        let index = THEMES.iter().position(|t| t.id == self).unwrap_or(0);
        THEMES[(index + 1) % THEMES.len()].id
    }
}

impl fmt::Display for ThemeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThemeId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        THEMES
            .iter()
            .map(|t| t.id)
            .find(|id| id.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ValidationError::InvalidValue {
                field: "theme".into(),
                message: format!("unknown theme '{s}'"),
            })
    }
}

/// Theme for a stored identifier, falling back to the default palette.
pub fn theme_or_default(id: Option<&str>) -> &'static Theme {
    id.and_then(|s| s.parse::<ThemeId>().ok())
        .unwrap_or_default()
        .theme()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Parse `#rrggbb` (the leading `#` is optional).
pub fn parse_hex(hex: &str) -> Result<Rgb, ValidationError> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if digits.len() != 6 || !digits.is_ascii() {
        return Err(ValidationError::InvalidColor(hex.into()));
    }
    let channel = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&digits[range], 16).map_err(|_| ValidationError::InvalidColor(hex.into()))
    };
    Ok(Rgb {
        r: channel(0..2)?,
        g: channel(2..4)?,
        b: channel(4..6)?,
    })
}

/// Darken a hex color by `percent` (0..=100), returned as lower-case `#rrggbb`.
pub fn darken_color(hex: &str, percent: f64) -> Result<String, ValidationError> {
    let rgb = parse_hex(hex)?;
    let factor = 1.0 - percent.clamp(0.0, 100.0) / 100.0;
    let scale = |c: u8| (f64::from(c) * factor).floor().max(0.0) as u8;
    Ok(Rgb {
        r: scale(rgb.r),
        g: scale(rgb.g),
        b: scale(rgb.b),
    }
    .to_hex())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycling_visits_every_theme_and_wraps() {
        let mut id = ThemeId::default();
        let mut seen = vec![id];
        for _ in 1..THEMES.len() {
            id = id.next();
            seen.push(id);
        }
        assert_eq!(seen.len(), 7);
        assert_eq!(id, ThemeId::White);
        assert_eq!(id.next(), ThemeId::Peach);
    }

    #[test]
    fn unknown_theme_falls_back_to_peach() {
        assert_eq!(theme_or_default(Some("neon")).id, ThemeId::Peach);
        assert_eq!(theme_or_default(None).id, ThemeId::Peach);
        assert_eq!(theme_or_default(Some("Dark")).id, ThemeId::Dark);
    }

    #[test]
    fn theme_ids_serialize_lowercase() {
        assert_eq!(serde_json::to_string(&ThemeId::Lavender).unwrap(), "\"lavender\"");
        assert_eq!("sky".parse::<ThemeId>().unwrap(), ThemeId::Sky);
    }

    #[test]
    fn darken_scales_each_channel() {
        assert_eq!(darken_color("#FFFFFF", 10.0).unwrap(), "#e5e5e5");
        assert_eq!(darken_color("D15B3F", 0.0).unwrap(), "#d15b3f");
        assert_eq!(darken_color("#6366F1", 100.0).unwrap(), "#000000");
    }

    #[test]
    fn malformed_colors_are_rejected() {
        assert!(parse_hex("#FFF").is_err());
        assert!(parse_hex("#GG0000").is_err());
        assert!(darken_color("", 10.0).is_err());
    }
}
