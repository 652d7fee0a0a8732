//! Font size mapping between HTML `size` values (1..7), CSS keywords and
//! points.

use quill_dom::parse_int_or;

use crate::lookup::AttributeLookup;
use crate::property::CssProperty;
use crate::sheet::StyleSheet;
use crate::value::CssValue;

/// Point sizes for HTML sizes 1..7 at a 12pt base.
const SIZE_MAP: [f32; 7] = [8.0, 10.0, 12.0, 14.0, 18.0, 24.0, 36.0];

const SIZE_KEYWORDS: [&str; 7] = [
    "xx-small", "x-small", "small", "medium", "large", "x-large", "xx-large",
];

/// HTML size index (1..7) for a point size, at a 12pt base.
pub fn index_of_size(pt: f32) -> i32 {
    SIZE_MAP
        .iter()
        .position(|size| pt <= *size)
        .map_or(SIZE_MAP.len() as i32, |i| i as i32 + 1)
}

impl StyleSheet {
    fn size_scale(&self) -> f32 {
        self.config().base_font_size / 12.0
    }

    /// HTML size that unqualified and relative sizes start from.
    pub fn base_font_index(&self) -> i32 {
        self.lock().base_font_index
    }

    pub fn set_base_font_size(&self, size: i32) {
        self.lock().base_font_index = size.clamp(1, 7);
    }

    /// Accepts `n`, `+n` or `-n`; the signed forms are relative to the
    /// current base. Malformed text leaves the base unchanged.
    pub fn set_base_font_size_str(&self, size: &str) {
        let size = size.trim();
        let Ok(n) = size.trim_start_matches('+').parse::<i32>() else {
            return;
        };
        let base = self.base_font_index();
        let index = if size.starts_with(['+', '-']) { base + n } else { n };
        self.set_base_font_size(index);
    }

    /// Points for an HTML size index, clamped to 1..7.
    pub fn point_size(&self, index: i32) -> f32 {
        let i = (index - 1).clamp(0, SIZE_MAP.len() as i32 - 1) as usize;
        SIZE_MAP[i] * self.size_scale()
    }

    /// Points for an HTML `size` attribute value.
    pub fn point_size_str(&self, size: &str) -> f32 {
        let size = size.trim();
        let base = self.base_font_index();
        let index = if size.starts_with(['+', '-']) {
            base + parse_int_or(Some(size), 0)
        } else {
            parse_int_or(Some(size), base)
        };
        self.point_size(index)
    }

    /// HTML size index for a point size at this sheet's scale.
    pub fn index_of_size(&self, pt: f32) -> i32 {
        index_of_size(pt / self.size_scale())
    }

    /// Font size in points. `em`, `ex` and percentages are relative to
    /// `parent_size`; relative keywords step the size index.
    pub fn font_size(&self, attrs: &dyn AttributeLookup, parent_size: f32) -> f32 {
        let Some(value) = attrs.lookup(CssProperty::FontSize) else {
            return parent_size;
        };
        match &value {
            CssValue::Keyword(word) => match word.as_str() {
                "smaller" => self.point_size(self.index_of_size(parent_size) - 1),
                "larger" => self.point_size(self.index_of_size(parent_size) + 1),
                other => SIZE_KEYWORDS
                    .iter()
                    .position(|k| *k == other)
                    .map_or(parent_size, |i| self.point_size(i as i32 + 1)),
            },
            other => other
                .to_points(parent_size, parent_size)
                .filter(|pt| *pt > 0.0)
                .unwrap_or(parent_size),
        }
    }

    /// Font size of the document root.
    pub fn default_font_size(&self) -> f32 {
        self.point_size(self.base_font_index())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::declaration::Declaration;
    use quill_config::QuillConfig;

    fn sheet() -> StyleSheet {
        StyleSheet::with_config(&QuillConfig::default())
    }

    #[test]
    fn html_sizes_map_to_points() {
        let sheet = sheet();
        assert_eq!(sheet.point_size(1), 8.0);
        assert_eq!(sheet.point_size(3), 12.0);
        assert_eq!(sheet.point_size(7), 36.0);
        assert_eq!(sheet.point_size(0), 8.0);
        assert_eq!(sheet.point_size(12), 36.0);
        assert_eq!(sheet.point_size_str("+1"), 14.0);
        assert_eq!(sheet.point_size_str("-2"), 8.0);
        assert_eq!(sheet.point_size_str("5"), 18.0);
        assert_eq!(sheet.point_size_str("big"), 12.0);
    }

    #[test]
    fn base_size_moves_relative_sizes() {
        let sheet = sheet();
        sheet.set_base_font_size_str("+2");
        assert_eq!(sheet.base_font_index(), 5);
        assert_eq!(sheet.point_size_str("+1"), 24.0);
        sheet.set_base_font_size(9);
        assert_eq!(sheet.base_font_index(), 7);
        sheet.set_base_font_size_str("nope");
        assert_eq!(sheet.base_font_index(), 7);
    }

    #[test]
    fn scale_follows_configured_base() {
        let mut config = QuillConfig::default();
        config.style.base_font_size = 24.0;
        let sheet = StyleSheet::with_config(&config);
        assert_eq!(sheet.point_size(3), 24.0);
        assert_eq!(sheet.index_of_size(24.0), 3);
    }

    #[test]
    fn index_of_size_rounds_up() {
        assert_eq!(index_of_size(8.0), 1);
        assert_eq!(index_of_size(11.0), 3);
        assert_eq!(index_of_size(40.0), 7);
    }

    #[test]
    fn css_font_sizes() {
        let sheet = sheet();
        let mut decl = Declaration::new();
        assert_eq!(sheet.font_size(&decl, 12.0), 12.0);
        decl.add_css_attribute("font-size", "x-large");
        assert_eq!(sheet.font_size(&decl, 12.0), 24.0);
        decl.add_css_attribute("font-size", "2em");
        assert_eq!(sheet.font_size(&decl, 10.0), 20.0);
        decl.add_css_attribute("font-size", "150%");
        assert_eq!(sheet.font_size(&decl, 12.0), 18.0);
        decl.add_css_attribute("font-size", "larger");
        assert_eq!(sheet.font_size(&decl, 12.0), 14.0);
    }
}
