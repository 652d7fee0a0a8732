//! HTML attribute keys and ordered attribute maps.

use std::fmt;
use std::sync::Arc;

macro_rules! known_attrs {
    ($($variant:ident => $name:literal,)+) => {
        /// An HTML attribute name.
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub enum HtmlAttr {
            $($variant,)+
            /// An attribute outside the known vocabulary.
            Custom(Arc<str>),
        }

        impl HtmlAttr {
            pub fn name(&self) -> &str {
                match self {
                    $(HtmlAttr::$variant => $name,)+
                    HtmlAttr::Custom(name) => name,
                }
            }

            fn known_from_name(name: &str) -> Option<HtmlAttr> {
                match name {
                    $($name => Some(HtmlAttr::$variant),)+
                    _ => None,
                }
            }
        }
    };
}

known_attrs! {
    Action => "action",
    Align => "align",
    Alt => "alt",
    Background => "background",
    Bgcolor => "bgcolor",
    Border => "border",
    Cellpadding => "cellpadding",
    Cellspacing => "cellspacing",
    Class => "class",
    Classid => "classid",
    Color => "color",
    Cols => "cols",
    Colspan => "colspan",
    Compact => "compact",
    Face => "face",
    Frameborder => "frameborder",
    Height => "height",
    Href => "href",
    Hspace => "hspace",
    Id => "id",
    Marginheight => "marginheight",
    Marginwidth => "marginwidth",
    Name => "name",
    Noshade => "noshade",
    Nowrap => "nowrap",
    Prompt => "prompt",
    Rel => "rel",
    Rows => "rows",
    Rowspan => "rowspan",
    Size => "size",
    Src => "src",
    Start => "start",
    Style => "style",
    Text => "text",
    Title => "title",
    Type => "type",
    Valign => "valign",
    Value => "value",
    Vspace => "vspace",
    Width => "width",
}

impl HtmlAttr {
    /// Case-insensitive lookup; unknown names become [`HtmlAttr::Custom`].
    pub fn from_name(name: &str) -> HtmlAttr {
        let lower = name.trim().to_ascii_lowercase();
        HtmlAttr::known_from_name(&lower).unwrap_or_else(|| HtmlAttr::Custom(Arc::from(lower)))
    }
}

impl fmt::Display for HtmlAttr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Attribute map that keeps authored order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes {
    entries: Vec<(HtmlAttr, String)>,
}

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`Attributes::set`].
    pub fn with(mut self, key: HtmlAttr, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    /// Insert or overwrite `key`, keeping its original position.
    pub fn set(&mut self, key: HtmlAttr, value: impl Into<String>) {
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &HtmlAttr) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, key: &HtmlAttr) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    pub fn remove(&mut self, key: &HtmlAttr) -> Option<String> {
        let index = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(index).1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&HtmlAttr, &str)> {
        self.entries.iter().map(|(k, v)| (k, v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(HtmlAttr, K)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (HtmlAttr, K)>>(iter: I) -> Self {
        let mut attrs = Attributes::new();
        for (key, value) in iter {
            attrs.set(key, value);
        }
        attrs
    }
}

/// Parse a decimal integer attribute, falling back to `default` when the
/// value is missing or malformed.
pub fn parse_int_or(value: Option<&str>, default: i32) -> i32 {
    value
        .and_then(|v| v.trim().trim_start_matches('+').parse().ok())
        .unwrap_or(default)
}

/// Float counterpart of [`parse_int_or`]; a trailing `px` is accepted.
pub fn parse_f32_or(value: Option<&str>, default: f32) -> f32 {
    value
        .and_then(|v| v.trim().trim_end_matches("px").trim().parse().ok())
        .unwrap_or(default)
}
