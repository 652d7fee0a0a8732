//! CSS property keys understood by the cascade.

use std::fmt;

/// How the text of a property's value is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Length,
    Color,
    FontSize,
    LineHeight,
    Url,
    Keyword,
    Text,
    Position,
}

macro_rules! css_properties {
    ($($variant:ident => $name:literal, inherited: $inherited:literal, kind: $kind:ident, initial: $initial:expr;)+) => {
        /// A longhand CSS1 property. Shorthands are expanded into these when
        /// a declaration is parsed.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum CssProperty {
            $($variant,)+
        }

        impl CssProperty {
            pub const ALL: &'static [CssProperty] = &[$(CssProperty::$variant,)+];

            pub fn name(self) -> &'static str {
                match self {
                    $(CssProperty::$variant => $name,)+
                }
            }

            /// Whether an undefined value falls back to the parent's.
            pub fn is_inherited(self) -> bool {
                match self {
                    $(CssProperty::$variant => $inherited,)+
                }
            }

            pub fn kind(self) -> ValueKind {
                match self {
                    $(CssProperty::$variant => ValueKind::$kind,)+
                }
            }

            /// Initial value text, if the property has one.
            pub fn initial_text(self) -> Option<&'static str> {
                match self {
                    $(CssProperty::$variant => $initial,)+
                }
            }

            /// Case-insensitive lookup of a longhand name.
            pub fn from_name(name: &str) -> Option<CssProperty> {
                match name.trim().to_ascii_lowercase().as_str() {
                    $($name => Some(CssProperty::$variant),)+
                    _ => None,
                }
            }
        }
    };
}

css_properties! {
    BackgroundAttachment => "background-attachment", inherited: false, kind: Keyword, initial: Some("scroll");
    BackgroundColor => "background-color", inherited: false, kind: Color, initial: None;
    BackgroundImage => "background-image", inherited: false, kind: Url, initial: None;
    BackgroundPosition => "background-position", inherited: false, kind: Position, initial: None;
    BackgroundRepeat => "background-repeat", inherited: false, kind: Keyword, initial: Some("repeat");
    BorderBottomWidth => "border-bottom-width", inherited: false, kind: Length, initial: Some("medium");
    BorderColor => "border-color", inherited: false, kind: Color, initial: None;
    BorderLeftWidth => "border-left-width", inherited: false, kind: Length, initial: Some("medium");
    BorderRightWidth => "border-right-width", inherited: false, kind: Length, initial: Some("medium");
    BorderStyle => "border-style", inherited: false, kind: Keyword, initial: Some("none");
    BorderTopWidth => "border-top-width", inherited: false, kind: Length, initial: Some("medium");
    Clear => "clear", inherited: false, kind: Keyword, initial: Some("none");
    Color => "color", inherited: true, kind: Color, initial: None;
    Display => "display", inherited: false, kind: Keyword, initial: Some("block");
    Float => "float", inherited: false, kind: Keyword, initial: Some("none");
    FontFamily => "font-family", inherited: true, kind: Text, initial: None;
    FontSize => "font-size", inherited: true, kind: FontSize, initial: Some("medium");
    FontStyle => "font-style", inherited: true, kind: Keyword, initial: Some("normal");
    FontVariant => "font-variant", inherited: true, kind: Keyword, initial: Some("normal");
    FontWeight => "font-weight", inherited: true, kind: Keyword, initial: Some("normal");
    Height => "height", inherited: false, kind: Length, initial: Some("auto");
    LetterSpacing => "letter-spacing", inherited: true, kind: Length, initial: Some("normal");
    LineHeight => "line-height", inherited: true, kind: LineHeight, initial: Some("normal");
    ListStyleImage => "list-style-image", inherited: true, kind: Url, initial: Some("none");
    ListStylePosition => "list-style-position", inherited: true, kind: Keyword, initial: Some("outside");
    ListStyleType => "list-style-type", inherited: true, kind: Keyword, initial: None;
    MarginBottom => "margin-bottom", inherited: false, kind: Length, initial: Some("0");
    MarginLeft => "margin-left", inherited: false, kind: Length, initial: Some("0");
    MarginRight => "margin-right", inherited: false, kind: Length, initial: Some("0");
    MarginTop => "margin-top", inherited: false, kind: Length, initial: Some("0");
    PaddingBottom => "padding-bottom", inherited: false, kind: Length, initial: Some("0");
    PaddingLeft => "padding-left", inherited: false, kind: Length, initial: Some("0");
    PaddingRight => "padding-right", inherited: false, kind: Length, initial: Some("0");
    PaddingTop => "padding-top", inherited: false, kind: Length, initial: Some("0");
    TextAlign => "text-align", inherited: true, kind: Keyword, initial: None;
    TextDecoration => "text-decoration", inherited: true, kind: Keyword, initial: Some("none");
    TextIndent => "text-indent", inherited: true, kind: Length, initial: Some("0");
    TextTransform => "text-transform", inherited: true, kind: Keyword, initial: Some("none");
    VerticalAlign => "vertical-align", inherited: false, kind: Keyword, initial: Some("baseline");
    WhiteSpace => "white-space", inherited: true, kind: Keyword, initial: Some("normal");
    Width => "width", inherited: false, kind: Length, initial: Some("auto");
    WordSpacing => "word-spacing", inherited: true, kind: Length, initial: Some("normal");
}

impl fmt::Display for CssProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for prop in CssProperty::ALL {
            assert_eq!(CssProperty::from_name(prop.name()), Some(*prop));
        }
        assert_eq!(CssProperty::from_name("COLOR"), Some(CssProperty::Color));
        assert_eq!(CssProperty::from_name("margin"), None);
    }

    #[test]
    fn inheritance_flags() {
        assert!(CssProperty::Color.is_inherited());
        assert!(CssProperty::WhiteSpace.is_inherited());
        assert!(CssProperty::ListStyleType.is_inherited());
        assert!(!CssProperty::MarginTop.is_inherited());
        assert!(!CssProperty::BackgroundColor.is_inherited());
    }
}
