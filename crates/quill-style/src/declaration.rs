//! Declaration blocks and shorthand expansion.

use crate::property::CssProperty;
use crate::value::{CssValue, string_to_color};

/// Ordered map from property to value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Declaration {
    entries: Vec<(CssProperty, CssValue)>,
}

const BORDER_STYLES: &[&str] = &[
    "none", "dotted", "dashed", "solid", "double", "groove", "ridge", "inset", "outset",
];
const LIST_TYPES: &[&str] = &[
    "disc",
    "circle",
    "square",
    "decimal",
    "lower-roman",
    "upper-roman",
    "lower-alpha",
    "upper-alpha",
    "none",
];
const FONT_STYLES: &[&str] = &["italic", "oblique"];
const FONT_WEIGHTS: &[&str] = &[
    "bold", "bolder", "lighter", "100", "200", "300", "400", "500", "600", "700", "800", "900",
];

impl Declaration {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: CssProperty) -> Option<&CssValue> {
        self.entries.iter().find(|(k, _)| *k == key).map(|(_, v)| v)
    }

    pub fn contains(&self, key: CssProperty) -> bool {
        self.entries.iter().any(|(k, _)| *k == key)
    }

    /// Insert or overwrite, keeping the first insertion position.
    pub fn set(&mut self, key: CssProperty, value: CssValue) {
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn remove(&mut self, key: CssProperty) -> Option<CssValue> {
        let index = self.entries.iter().position(|(k, _)| *k == key)?;
        Some(self.entries.remove(index).1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (CssProperty, &CssValue)> {
        self.entries.iter().map(|(k, v)| (*k, v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Copy every entry of `other` over this block.
    pub fn merge(&mut self, other: &Declaration) {
        for (key, value) in other.iter() {
            self.set(key, value.clone());
        }
    }

    /// Set a property from its CSS name and value text. Shorthands expand
    /// into their longhands. Returns false when nothing was recognised.
    pub fn add_css_attribute(&mut self, name: &str, value: &str) -> bool {
        let name = name.trim().to_ascii_lowercase();
        let value = value.trim();
        if let Some(prop) = CssProperty::from_name(&name) {
            return match CssValue::parse(prop, value) {
                Some(parsed) => {
                    self.set(prop, parsed);
                    true
                }
                None => false,
            };
        }
        let tokens = split_value_tokens(value);
        match name.as_str() {
            "margin" => self.expand_sides(&tokens, MARGINS),
            "padding" => self.expand_sides(&tokens, PADDINGS),
            "border-width" => self.expand_sides(&tokens, BORDER_WIDTHS),
            "border-style" => {
                if let Some(style) = tokens.first() {
                    self.try_set(CssProperty::BorderStyle, style);
                }
            }
            "border-color" => {
                if let Some(color) = tokens.first() {
                    self.try_set(CssProperty::BorderColor, color);
                }
            }
            "border" => self.expand_border(&tokens, &BORDER_WIDTHS),
            "border-top" => self.expand_border(&tokens, &[CssProperty::BorderTopWidth]),
            "border-right" => self.expand_border(&tokens, &[CssProperty::BorderRightWidth]),
            "border-bottom" => self.expand_border(&tokens, &[CssProperty::BorderBottomWidth]),
            "border-left" => self.expand_border(&tokens, &[CssProperty::BorderLeftWidth]),
            "list-style" => self.expand_list_style(&tokens),
            "background" => self.expand_background(&tokens),
            "font" => self.expand_font(&tokens),
            _ => return false,
        }
        !tokens.is_empty()
    }

    fn try_set(&mut self, key: CssProperty, text: &str) -> bool {
        match CssValue::parse(key, text) {
            Some(value) => {
                self.set(key, value);
                true
            }
            None => false,
        }
    }

    fn expand_sides(&mut self, tokens: &[String], keys: [CssProperty; 4]) {
        let pick: [usize; 4] = match tokens.len() {
            1 => [0, 0, 0, 0],
            2 => [0, 1, 0, 1],
            3 => [0, 1, 2, 1],
            4 => [0, 1, 2, 3],
            _ => return,
        };
        let values: Option<Vec<CssValue>> = pick
            .iter()
            .zip(keys)
            .map(|(i, key)| CssValue::parse(key, &tokens[*i]))
            .collect();
        if let Some(values) = values {
            for (key, value) in keys.into_iter().zip(values) {
                self.set(key, value);
            }
        }
    }

    fn expand_border(&mut self, tokens: &[String], widths: &[CssProperty]) {
        for token in tokens {
            let lower = token.to_ascii_lowercase();
            if BORDER_STYLES.contains(&lower.as_str()) {
                self.set(CssProperty::BorderStyle, CssValue::Keyword(lower));
            } else if let Some(width) = CssValue::parse(CssProperty::BorderTopWidth, token)
                .filter(|v| !matches!(v.keyword(), Some("auto" | "normal")))
            {
                for key in widths {
                    self.set(*key, width.clone());
                }
            } else if let Some(color) = string_to_color(token) {
                self.set(CssProperty::BorderColor, CssValue::Color(color));
            }
        }
    }

    fn expand_list_style(&mut self, tokens: &[String]) {
        for token in tokens {
            let lower = token.to_ascii_lowercase();
            if LIST_TYPES.contains(&lower.as_str()) {
                self.set(CssProperty::ListStyleType, CssValue::Keyword(lower));
            } else if lower == "inside" || lower == "outside" {
                self.set(CssProperty::ListStylePosition, CssValue::Keyword(lower));
            } else {
                self.try_set(CssProperty::ListStyleImage, token);
            }
        }
    }

    fn expand_background(&mut self, tokens: &[String]) {
        let mut position = Vec::new();
        for token in tokens {
            let lower = token.to_ascii_lowercase();
            match lower.as_str() {
                "repeat" | "repeat-x" | "repeat-y" | "no-repeat" => {
                    self.set(CssProperty::BackgroundRepeat, CssValue::Keyword(lower.clone()));
                }
                "scroll" | "fixed" => {
                    self.set(CssProperty::BackgroundAttachment, CssValue::Keyword(lower.clone()));
                }
                _ if lower.starts_with("url(") || lower == "none" => {
                    self.try_set(CssProperty::BackgroundImage, token);
                }
                _ => {
                    if let Some(color) = string_to_color(token) {
                        self.set(CssProperty::BackgroundColor, CssValue::Color(color));
                    } else if lower == "transparent" {
                        self.set(CssProperty::BackgroundColor, CssValue::Keyword(lower));
                    } else {
                        position.push(lower);
                    }
                }
            }
        }
        if !position.is_empty() {
            self.set(CssProperty::BackgroundPosition, CssValue::Text(position.join(" ")));
        }
    }

    fn expand_font(&mut self, tokens: &[String]) {
        let mut rest = tokens.iter().peekable();
        while let Some(token) = rest.peek() {
            let lower = token.to_ascii_lowercase();
            if FONT_STYLES.contains(&lower.as_str()) {
                self.set(CssProperty::FontStyle, CssValue::Keyword(lower));
            } else if lower == "small-caps" {
                self.set(CssProperty::FontVariant, CssValue::Keyword(lower));
            } else if FONT_WEIGHTS.contains(&lower.as_str()) {
                self.set(CssProperty::FontWeight, CssValue::Keyword(lower));
            } else if lower != "normal" {
                break;
            }
            rest.next();
        }
        let Some(size) = rest.next() else {
            return;
        };
        let (size, line_height) = match size.split_once('/') {
            Some((size, lh)) => (size, Some(lh)),
            None => (size.as_str(), None),
        };
        self.try_set(CssProperty::FontSize, size);
        if let Some(lh) = line_height {
            self.try_set(CssProperty::LineHeight, lh);
        }
        let family: Vec<&str> = rest.map(String::as_str).collect();
        if !family.is_empty() {
            self.set(CssProperty::FontFamily, CssValue::Text(family.join(" ")));
        }
    }
}

const MARGINS: [CssProperty; 4] = [
    CssProperty::MarginTop,
    CssProperty::MarginRight,
    CssProperty::MarginBottom,
    CssProperty::MarginLeft,
];
const PADDINGS: [CssProperty; 4] = [
    CssProperty::PaddingTop,
    CssProperty::PaddingRight,
    CssProperty::PaddingBottom,
    CssProperty::PaddingLeft,
];
const BORDER_WIDTHS: [CssProperty; 4] = [
    CssProperty::BorderTopWidth,
    CssProperty::BorderRightWidth,
    CssProperty::BorderBottomWidth,
    CssProperty::BorderLeftWidth,
];

/// Split a value on whitespace, keeping parenthesised groups and quoted
/// strings together.
pub(crate) fn split_value_tokens(value: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    for ch in value.chars() {
        match (quote, ch) {
            (Some(q), c) if c == q => {
                quote = None;
                current.push(c);
            }
            (Some(_), c) => current.push(c),
            (None, '"' | '\'') => {
                quote = Some(ch);
                current.push(ch);
            }
            (None, '(') => {
                depth += 1;
                current.push(ch);
            }
            (None, ')') => {
                depth = depth.saturating_sub(1);
                current.push(ch);
            }
            (None, c) if c.is_whitespace() && depth == 0 => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            (None, c) => current.push(c),
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{LengthUnit, Rgba};

    #[test]
    fn margin_shorthand_expands() {
        let mut decl = Declaration::new();
        assert!(decl.add_css_attribute("margin", "1px 2px"));
        assert_eq!(decl.get(CssProperty::MarginTop), Some(&CssValue::Length(1.0, LengthUnit::Px)));
        assert_eq!(decl.get(CssProperty::MarginRight), Some(&CssValue::Length(2.0, LengthUnit::Px)));
        assert_eq!(decl.get(CssProperty::MarginBottom), Some(&CssValue::Length(1.0, LengthUnit::Px)));
        assert_eq!(decl.get(CssProperty::MarginLeft), Some(&CssValue::Length(2.0, LengthUnit::Px)));
    }

    #[test]
    fn border_shorthand_expands() {
        let mut decl = Declaration::new();
        decl.add_css_attribute("border", "2px solid rgb(0, 0, 255)");
        assert_eq!(decl.get(CssProperty::BorderStyle).and_then(CssValue::keyword), Some("solid"));
        assert_eq!(decl.get(CssProperty::BorderLeftWidth), Some(&CssValue::Length(2.0, LengthUnit::Px)));
        assert_eq!(decl.get(CssProperty::BorderColor), Some(&CssValue::Color(Rgba::rgb(0, 0, 255))));
        for side in BORDER_WIDTHS {
            assert_eq!(decl.get(side), Some(&CssValue::Length(2.0, LengthUnit::Px)));
        }

        let mut decl = Declaration::new();
        decl.add_css_attribute("border-top", "4px");
        assert_eq!(decl.get(CssProperty::BorderTopWidth), Some(&CssValue::Length(4.0, LengthUnit::Px)));
        assert_eq!(decl.get(CssProperty::BorderLeftWidth), None);
    }

    #[test]
    fn font_shorthand_expands() {
        let mut decl = Declaration::new();
        decl.add_css_attribute("font", "italic bold 14pt/1.5 Times New Roman");
        assert_eq!(decl.get(CssProperty::FontStyle).and_then(CssValue::keyword), Some("italic"));
        assert_eq!(decl.get(CssProperty::FontWeight).and_then(CssValue::keyword), Some("bold"));
        assert_eq!(decl.get(CssProperty::FontSize), Some(&CssValue::Length(14.0, LengthUnit::Pt)));
        assert_eq!(decl.get(CssProperty::LineHeight), Some(&CssValue::Number(1.5)));
        assert_eq!(
            decl.get(CssProperty::FontFamily),
            Some(&CssValue::Text("Times New Roman".into()))
        );
    }

    #[test]
    fn list_style_shorthand() {
        let mut decl = Declaration::new();
        decl.add_css_attribute("list-style", "square inside");
        assert_eq!(decl.get(CssProperty::ListStyleType).and_then(CssValue::keyword), Some("square"));
        assert_eq!(decl.get(CssProperty::ListStylePosition).and_then(CssValue::keyword), Some("inside"));
    }

    #[test]
    fn unknown_or_malformed_is_ignored() {
        let mut decl = Declaration::new();
        assert!(!decl.add_css_attribute("zoom", "2"));
        assert!(!decl.add_css_attribute("margin-top", "lots"));
        assert!(decl.is_empty());
    }

    #[test]
    fn set_overwrites_existing_key() {
        let mut decl = Declaration::new();
        decl.add_css_attribute("color", "red");
        decl.add_css_attribute("color", "blue");
        assert_eq!(decl.len(), 1);
        assert_eq!(decl.get(CssProperty::Color), Some(&CssValue::Color(Rgba::rgb(0, 0, 255))));
    }

    #[test]
    fn tokens_keep_groups() {
        assert_eq!(
            split_value_tokens("url( a b.png ) 'x y' z"),
            vec!["url( a b.png )", "'x y'", "z"]
        );
    }
}
