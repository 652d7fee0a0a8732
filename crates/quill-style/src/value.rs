//! CSS values and their parsing.

use std::fmt;
use std::str::FromStr;

use csscolorparser::Color as CssColor;

use crate::property::{CssProperty, ValueKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthUnit {
    Px,
    Pt,
    Pc,
    In,
    Cm,
    Mm,
    Em,
    Ex,
}

impl LengthUnit {
    fn from_suffix(suffix: &str) -> Option<LengthUnit> {
        Some(match suffix.to_ascii_lowercase().as_str() {
            "" | "px" => LengthUnit::Px,
            "pt" => LengthUnit::Pt,
            "pc" => LengthUnit::Pc,
            "in" => LengthUnit::In,
            "cm" => LengthUnit::Cm,
            "mm" => LengthUnit::Mm,
            "em" => LengthUnit::Em,
            "ex" => LengthUnit::Ex,
            _ => return None,
        })
    }

    fn suffix(self) -> &'static str {
        match self {
            LengthUnit::Px => "px",
            LengthUnit::Pt => "pt",
            LengthUnit::Pc => "pc",
            LengthUnit::In => "in",
            LengthUnit::Cm => "cm",
            LengthUnit::Mm => "mm",
            LengthUnit::Em => "em",
            LengthUnit::Ex => "ex",
        }
    }
}

/// An 8-bit RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const BLACK: Rgba = Rgba::rgb(0, 0, 0);
    pub const WHITE: Rgba = Rgba::rgb(255, 255, 255);
    pub const GRAY: Rgba = Rgba::rgb(128, 128, 128);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// A lighter shade, used for the lit edges of bevels.
    pub fn brighter(self) -> Rgba {
        const FACTOR: f32 = 0.7;
        let floor = (1.0 / (1.0 - FACTOR)) as u8;
        if self.r == 0 && self.g == 0 && self.b == 0 {
            return Rgba { r: floor, g: floor, b: floor, a: self.a };
        }
        let lift = |c: u8| {
            let c = c.max(if c > 0 { floor } else { 0 });
            ((c as f32 / FACTOR) as u32).min(255) as u8
        };
        Rgba {
            r: lift(self.r),
            g: lift(self.g),
            b: lift(self.b),
            a: self.a,
        }
    }

    /// A darker shade, used for the shadowed edges of bevels.
    pub fn darker(self) -> Rgba {
        let drop = |c: u8| (c as f32 * 0.7) as u8;
        Rgba {
            r: drop(self.r),
            g: drop(self.g),
            b: drop(self.b),
            a: self.a,
        }
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CssValue {
    Length(f32, LengthUnit),
    Percentage(f32),
    Color(Rgba),
    Keyword(String),
    Url(String),
    Number(f32),
    Text(String),
}

impl CssValue {
    /// Parse `text` as a value of `property`. Returns `None` for text the
    /// property cannot hold; callers drop such declarations.
    pub fn parse(property: CssProperty, text: &str) -> Option<CssValue> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        match property.kind() {
            ValueKind::Length => parse_length_or_keyword(text, &["auto", "normal", "thin", "medium", "thick"]),
            ValueKind::Color => string_to_color(text).map(CssValue::Color).or_else(|| {
                text.eq_ignore_ascii_case("transparent")
                    .then(|| CssValue::Keyword("transparent".into()))
            }),
            ValueKind::FontSize => parse_font_size(text),
            ValueKind::LineHeight => {
                if let Ok(n) = text.parse::<f32>() {
                    return Some(CssValue::Number(n));
                }
                parse_length_or_keyword(text, &["normal"])
            }
            ValueKind::Url => parse_url(text),
            ValueKind::Keyword => {
                let word = text.to_ascii_lowercase();
                word.chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == ' ')
                    .then_some(CssValue::Keyword(word))
            }
            ValueKind::Text => Some(CssValue::Text(text.to_string())),
            ValueKind::Position => Some(CssValue::Text(text.to_ascii_lowercase())),
        }
    }

    pub fn keyword(&self) -> Option<&str> {
        match self {
            CssValue::Keyword(word) => Some(word),
            _ => None,
        }
    }

    pub fn color(&self) -> Option<Rgba> {
        match self {
            CssValue::Color(c) => Some(*c),
            _ => None,
        }
    }

    pub fn url(&self) -> Option<&str> {
        match self {
            CssValue::Url(u) => Some(u),
            _ => None,
        }
    }

    /// Resolve to points. `font_size` resolves `em`/`ex`; `reference`
    /// resolves percentages. Keywords map to the CSS border widths.
    pub fn to_points(&self, font_size: f32, reference: f32) -> Option<f32> {
        Some(match self {
            CssValue::Length(v, unit) => match unit {
                LengthUnit::Px | LengthUnit::Pt => *v,
                LengthUnit::Pc => v * 12.0,
                LengthUnit::In => v * 72.0,
                LengthUnit::Cm => v * 72.0 / 2.54,
                LengthUnit::Mm => v * 72.0 / 25.4,
                LengthUnit::Em => v * font_size,
                LengthUnit::Ex => v * font_size / 2.0,
            },
            CssValue::Percentage(p) => p * reference / 100.0,
            CssValue::Number(n) => *n,
            CssValue::Keyword(word) => match word.as_str() {
                "thin" => 1.0,
                "medium" => 3.0,
                "thick" => 5.0,
                _ => return None,
            },
            _ => return None,
        })
    }
}

impl fmt::Display for CssValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CssValue::Length(v, unit) => write!(f, "{v}{}", unit.suffix()),
            CssValue::Percentage(p) => write!(f, "{p}%"),
            CssValue::Color(c) => write!(f, "{c}"),
            CssValue::Keyword(k) => f.write_str(k),
            CssValue::Url(u) => write!(f, "url({u})"),
            CssValue::Number(n) => write!(f, "{n}"),
            CssValue::Text(t) => f.write_str(t),
        }
    }
}

/// Parse a length such as `12px`, `1.5em`, `0` or `50%`.
pub fn parse_length(text: &str) -> Option<CssValue> {
    let text = text.trim();
    if let Some(pct) = text.strip_suffix('%') {
        return pct.trim().parse().ok().map(CssValue::Percentage);
    }
    let split = text
        .find(|c: char| !(c.is_ascii_digit() || c == '.' || c == '-' || c == '+'))
        .unwrap_or(text.len());
    let (number, suffix) = text.split_at(split);
    let value: f32 = number.parse().ok()?;
    let unit = LengthUnit::from_suffix(suffix.trim())?;
    Some(CssValue::Length(value, unit))
}

fn parse_length_or_keyword(text: &str, keywords: &[&str]) -> Option<CssValue> {
    let lower = text.to_ascii_lowercase();
    if keywords.contains(&lower.as_str()) {
        return Some(CssValue::Keyword(lower));
    }
    parse_length(text)
}

fn parse_font_size(text: &str) -> Option<CssValue> {
    const KEYWORDS: &[&str] = &[
        "xx-small", "x-small", "small", "medium", "large", "x-large", "xx-large", "smaller",
        "larger",
    ];
    parse_length_or_keyword(text, KEYWORDS)
}

fn parse_url(text: &str) -> Option<CssValue> {
    if text.eq_ignore_ascii_case("none") {
        return Some(CssValue::Keyword("none".into()));
    }
    let inner = text
        .strip_prefix("url(")
        .or_else(|| text.strip_prefix("URL("))?
        .strip_suffix(')')?
        .trim()
        .trim_matches(|c| c == '"' || c == '\'');
    (!inner.is_empty()).then(|| CssValue::Url(inner.to_string()))
}

/// Convert an HTML or CSS color string (`red`, `#f00`, `#ff0000`,
/// `rgb(255,0,0)`, or bare `ff0000` as found in legacy attributes).
pub fn string_to_color(text: &str) -> Option<Rgba> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    let parsed = CssColor::from_str(text).ok().or_else(|| {
        (text.len() == 6 && text.chars().all(|c| c.is_ascii_hexdigit()))
            .then(|| CssColor::from_str(&format!("#{text}")).ok())
            .flatten()
    })?;
    let channel = |v: f64| (v * 255.0).round().clamp(0.0, 255.0) as u8;
    Some(Rgba {
        r: channel(parsed.r),
        g: channel(parsed.g),
        b: channel(parsed.b),
        a: channel(parsed.a),
    })
}
