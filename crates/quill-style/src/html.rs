//! Legacy HTML presentation attributes and the built-in rendering rules.

use quill_config::QuillConfig;
use quill_dom::{Attributes, HtmlAttr, Tag};

use crate::declaration::Declaration;
use crate::property::CssProperty;
use crate::sheet::StyleSheet;
use crate::value::{CssValue, LengthUnit, parse_length, string_to_color};

/// Rules every HTML rendering starts from.
pub const DEFAULT_CSS: &str = include_str!("default.css");

impl StyleSheet {
    /// A sheet holding [`DEFAULT_CSS`].
    pub fn with_default_rules(config: &QuillConfig) -> Self {
        let sheet = Self::with_config(config);
        sheet.add_rule(DEFAULT_CSS);
        sheet
    }

    /// Map the presentation attributes of a `tag` element to CSS.
    pub fn translate_html_to_css(&self, tag: &Tag, attrs: &Attributes) -> Declaration {
        let mut decl = Declaration::new();
        for (key, value) in attrs.iter() {
            self.translate_attribute(tag, key, value, &mut decl);
        }
        decl
    }

    fn translate_attribute(&self, tag: &Tag, key: &HtmlAttr, value: &str, decl: &mut Declaration) {
        let value = value.trim();
        match key {
            HtmlAttr::Bgcolor => {
                if let Some(color) = string_to_color(value) {
                    decl.set(CssProperty::BackgroundColor, CssValue::Color(color));
                }
            }
            HtmlAttr::Color | HtmlAttr::Text => {
                if let Some(color) = string_to_color(value) {
                    decl.set(CssProperty::Color, CssValue::Color(color));
                }
            }
            HtmlAttr::Background => {
                decl.set(CssProperty::BackgroundImage, CssValue::Url(value.to_string()));
            }
            HtmlAttr::Face => {
                decl.set(CssProperty::FontFamily, CssValue::Text(value.to_string()));
            }
            HtmlAttr::Size if *tag == Tag::Font => {
                let points = self.point_size_str(value);
                decl.set(CssProperty::FontSize, CssValue::Length(points, LengthUnit::Pt));
            }
            HtmlAttr::Align => match tag {
                // images, tables and rules align themselves
                Tag::Img | Tag::Table | Tag::Hr | Tag::Object | Tag::Applet => {}
                _ => {
                    decl.set(CssProperty::TextAlign, CssValue::Keyword(value.to_ascii_lowercase()));
                }
            },
            HtmlAttr::Valign => {
                decl.set(CssProperty::VerticalAlign, CssValue::Keyword(value.to_ascii_lowercase()));
            }
            HtmlAttr::Width if *tag != Tag::Hr => set_html_length(decl, CssProperty::Width, value),
            HtmlAttr::Height => set_html_length(decl, CssProperty::Height, value),
            HtmlAttr::Border if matches!(tag, Tag::Table | Tag::Img) => {
                let width = parse_html_length(value).unwrap_or(CssValue::Length(1.0, LengthUnit::Px));
                for side in [
                    CssProperty::BorderTopWidth,
                    CssProperty::BorderRightWidth,
                    CssProperty::BorderBottomWidth,
                    CssProperty::BorderLeftWidth,
                ] {
                    decl.set(side, width.clone());
                }
                let style = if *tag == Tag::Table { "outset" } else { "solid" };
                decl.set(CssProperty::BorderStyle, CssValue::Keyword(style.into()));
            }
            HtmlAttr::Marginwidth => {
                if let Some(width) = parse_html_length(value) {
                    decl.set(CssProperty::MarginLeft, width.clone());
                    decl.set(CssProperty::MarginRight, width);
                }
            }
            HtmlAttr::Marginheight => {
                if let Some(height) = parse_html_length(value) {
                    decl.set(CssProperty::MarginTop, height.clone());
                    decl.set(CssProperty::MarginBottom, height);
                }
            }
            HtmlAttr::Type if matches!(tag, Tag::Ol | Tag::Ul | Tag::Li) => {
                if let Some(kind) = list_type(value) {
                    decl.set(CssProperty::ListStyleType, CssValue::Keyword(kind.into()));
                }
            }
            HtmlAttr::Nowrap => {
                decl.set(CssProperty::WhiteSpace, CssValue::Keyword("nowrap".into()));
            }
            _ => {}
        }
    }
}

/// HTML lengths are pixels unless they carry a `%`.
fn parse_html_length(value: &str) -> Option<CssValue> {
    let value = value.trim();
    if let Ok(n) = value.parse::<f32>() {
        return Some(CssValue::Length(n, LengthUnit::Px));
    }
    parse_length(value)
}

fn set_html_length(decl: &mut Declaration, key: CssProperty, value: &str) {
    if let Some(length) = parse_html_length(value) {
        decl.set(key, length);
    }
}

fn list_type(value: &str) -> Option<&'static str> {
    Some(match value {
        "1" => "decimal",
        "a" => "lower-alpha",
        "A" => "upper-alpha",
        "i" => "lower-roman",
        "I" => "upper-roman",
        other => match other.to_ascii_lowercase().as_str() {
            "disc" => "disc",
            "circle" => "circle",
            "square" => "square",
            _ => return None,
        },
    })
}
