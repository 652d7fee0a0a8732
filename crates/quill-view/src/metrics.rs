//! Text measurement.
//!
//! Views never rasterize glyphs; they ask a [`TextMetrics`] for advances and
//! vertical extents. [`FixedMetrics`] gives every grapheme the same advance,
//! which keeps layout deterministic for headless use and tests.

use quill_config::LayoutConfig;
use quill_style::{AttributeLookup, CssProperty};

use crate::text::grapheme_count;

pub const DEFAULT_FAMILY: &str = "SansSerif";

#[derive(Debug, Clone, PartialEq)]
pub struct FontSpec {
    pub family: String,
    pub size: f32,
    pub bold: bool,
    pub italic: bool,
}

impl FontSpec {
    /// Read family, weight and style from `attrs`; `size` is already
    /// resolved by the caller.
    pub fn from_attributes(attrs: &dyn AttributeLookup, size: f32) -> Self {
        let family = attrs
            .lookup(CssProperty::FontFamily)
            .map(|v| match v {
                quill_style::CssValue::Text(t) => first_family(&t),
                other => other.to_string(),
            })
            .filter(|f| !f.is_empty())
            .unwrap_or_else(|| DEFAULT_FAMILY.to_string());
        let bold = attrs
            .lookup(CssProperty::FontWeight)
            .and_then(|v| v.keyword().map(is_bold))
            .unwrap_or(false);
        let italic = attrs
            .lookup(CssProperty::FontStyle)
            .and_then(|v| v.keyword().map(|k| k == "italic" || k == "oblique"))
            .unwrap_or(false);
        Self {
            family,
            size,
            bold,
            italic,
        }
    }
}

fn first_family(list: &str) -> String {
    list.split(',')
        .next()
        .unwrap_or_default()
        .trim()
        .trim_matches(['"', '\''])
        .to_string()
}

fn is_bold(weight: &str) -> bool {
    match weight {
        "bold" | "bolder" => true,
        other => other.parse::<u32>().is_ok_and(|w| w >= 600),
    }
}

pub trait TextMetrics: Send + Sync {
    fn advance(&self, text: &str, font: &FontSpec) -> f32;
    fn ascent(&self, font: &FontSpec) -> f32;
    fn descent(&self, font: &FontSpec) -> f32;

    /// Distance between consecutive baselines.
    fn line_height(&self, font: &FontSpec) -> f32 {
        self.ascent(font) + self.descent(font)
    }

    /// Extra space between lines beyond ascent plus descent.
    fn leading(&self, font: &FontSpec) -> f32 {
        (self.line_height(font) - self.ascent(font) - self.descent(font)).max(0.0)
    }
}

/// Every grapheme advances `char_width * size`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedMetrics {
    pub char_width: f32,
    pub line_height: f32,
}

impl FixedMetrics {
    pub fn new(config: &LayoutConfig) -> Self {
        Self {
            char_width: config.char_width,
            line_height: config.line_height,
        }
    }
}

impl Default for FixedMetrics {
    fn default() -> Self {
        Self::new(&LayoutConfig::default())
    }
}

impl TextMetrics for FixedMetrics {
    fn advance(&self, text: &str, font: &FontSpec) -> f32 {
        grapheme_count(text) as f32 * self.char_width * font.size
    }

    fn ascent(&self, font: &FontSpec) -> f32 {
        font.size * 0.8
    }

    fn descent(&self, font: &FontSpec) -> f32 {
        font.size * 0.2
    }

    fn line_height(&self, font: &FontSpec) -> f32 {
        font.size * self.line_height.max(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_style::Declaration;

    #[test]
    fn font_from_declaration() {
        let mut decl = Declaration::new();
        decl.add_css_attribute("font-family", "\"Times\", serif");
        decl.add_css_attribute("font-weight", "700");
        decl.add_css_attribute("font-style", "italic");
        let font = FontSpec::from_attributes(&decl, 10.0);
        assert_eq!(font.family, "Times");
        assert!(font.bold);
        assert!(font.italic);
        let plain = FontSpec::from_attributes(&Declaration::new(), 10.0);
        assert_eq!(plain.family, DEFAULT_FAMILY);
        assert!(!plain.bold);
    }

    #[test]
    fn fixed_advances() {
        let metrics = FixedMetrics::default();
        let font = FontSpec::from_attributes(&Declaration::new(), 10.0);
        assert_eq!(metrics.advance("abcd", &font), 20.0);
        assert_eq!(metrics.line_height(&font), 12.0);
        assert_eq!(metrics.ascent(&font), 8.0);
        assert!((metrics.leading(&font) - 2.0).abs() < 1e-4);
    }
}
