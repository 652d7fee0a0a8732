//! HTML tag vocabulary.
//!
//! Known tags are a closed set of enum values; anything else met while
//! building a document becomes [`Tag::Custom`].

use std::fmt;
use std::sync::Arc;

macro_rules! known_tags {
    ($($variant:ident => $name:literal, breaks: $breaks:literal, block: $block:literal;)+) => {
        /// An element kind.
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub enum Tag {
            $($variant,)+
            /// A tag that is not part of the known vocabulary.
            Custom(Arc<str>),
        }

        impl Tag {
            /// Every known tag, in declaration order.
            pub const KNOWN: &'static [Tag] = &[$(Tag::$variant,)+];

            /// Lowercase tag name as written in markup.
            pub fn name(&self) -> &str {
                match self {
                    $(Tag::$variant => $name,)+
                    Tag::Custom(name) => name,
                }
            }

            /// True if the tag forces a break in the flow of text.
            pub fn breaks_flow(&self) -> bool {
                match self {
                    $(Tag::$variant => $breaks,)+
                    Tag::Custom(_) => false,
                }
            }

            /// True if the tag describes a block of content.
            pub fn is_block(&self) -> bool {
                match self {
                    $(Tag::$variant => $block,)+
                    Tag::Custom(_) => false,
                }
            }

            fn known_from_name(name: &str) -> Option<Tag> {
                match name {
                    $($name => Some(Tag::$variant),)+
                    _ => None,
                }
            }
        }
    };
}

known_tags! {
    A => "a", breaks: false, block: false;
    Address => "address", breaks: false, block: false;
    Applet => "applet", breaks: false, block: false;
    B => "b", breaks: false, block: false;
    Big => "big", breaks: false, block: false;
    Blockquote => "blockquote", breaks: true, block: true;
    Body => "body", breaks: true, block: true;
    Br => "br", breaks: true, block: false;
    Caption => "caption", breaks: false, block: false;
    Center => "center", breaks: true, block: false;
    Cite => "cite", breaks: false, block: false;
    Code => "code", breaks: false, block: false;
    Dd => "dd", breaks: true, block: true;
    Div => "div", breaks: true, block: true;
    Dl => "dl", breaks: true, block: true;
    Dt => "dt", breaks: true, block: true;
    Em => "em", breaks: false, block: false;
    Font => "font", breaks: false, block: false;
    Form => "form", breaks: true, block: false;
    Frame => "frame", breaks: false, block: false;
    Frameset => "frameset", breaks: false, block: false;
    H1 => "h1", breaks: true, block: true;
    H2 => "h2", breaks: true, block: true;
    H3 => "h3", breaks: true, block: true;
    H4 => "h4", breaks: true, block: true;
    H5 => "h5", breaks: true, block: true;
    H6 => "h6", breaks: true, block: true;
    Head => "head", breaks: true, block: true;
    Hr => "hr", breaks: true, block: false;
    Html => "html", breaks: true, block: false;
    I => "i", breaks: false, block: false;
    Img => "img", breaks: false, block: false;
    Input => "input", breaks: false, block: false;
    Isindex => "isindex", breaks: true, block: false;
    Kbd => "kbd", breaks: false, block: false;
    Li => "li", breaks: true, block: true;
    Link => "link", breaks: false, block: false;
    Menu => "menu", breaks: true, block: true;
    Meta => "meta", breaks: false, block: false;
    Noframes => "noframes", breaks: true, block: true;
    Object => "object", breaks: false, block: false;
    Ol => "ol", breaks: true, block: true;
    Option => "option", breaks: false, block: false;
    P => "p", breaks: true, block: true;
    Param => "param", breaks: false, block: false;
    Pre => "pre", breaks: true, block: true;
    S => "s", breaks: false, block: false;
    Samp => "samp", breaks: false, block: false;
    Script => "script", breaks: false, block: false;
    Select => "select", breaks: false, block: false;
    Small => "small", breaks: false, block: false;
    Span => "span", breaks: false, block: false;
    Strike => "strike", breaks: false, block: false;
    Strong => "strong", breaks: false, block: false;
    Style => "style", breaks: false, block: false;
    Sub => "sub", breaks: false, block: false;
    Sup => "sup", breaks: false, block: false;
    Table => "table", breaks: false, block: true;
    Td => "td", breaks: true, block: true;
    Textarea => "textarea", breaks: false, block: false;
    Th => "th", breaks: true, block: true;
    Title => "title", breaks: true, block: true;
    Tr => "tr", breaks: false, block: true;
    Tt => "tt", breaks: false, block: false;
    U => "u", breaks: false, block: false;
    Ul => "ul", breaks: true, block: true;
    Var => "var", breaks: false, block: false;
    Content => "content", breaks: false, block: false;
    Comment => "comment", breaks: false, block: false;
}

impl Tag {
    /// Look a tag up by name, case-insensitively. Unknown names yield a
    /// [`Tag::Custom`] holding the lowercased name.
    pub fn from_name(name: &str) -> Tag {
        let lower = name.trim().to_ascii_lowercase();
        Tag::known_from_name(&lower).unwrap_or_else(|| Tag::Custom(Arc::from(lower)))
    }

    /// Tags that never have an end tag in markup.
    pub fn is_empty_element(&self) -> bool {
        matches!(
            self,
            Tag::Br
                | Tag::Hr
                | Tag::Img
                | Tag::Input
                | Tag::Isindex
                | Tag::Link
                | Tag::Meta
                | Tag::Param
                | Tag::Frame
        )
    }

    /// Tags whose content is kept verbatim (no wrapping, no entity changes
    /// beyond the minimum).
    pub fn preserves_whitespace(&self) -> bool {
        matches!(self, Tag::Pre | Tag::Textarea | Tag::Script | Tag::Style)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_is_case_insensitive() {
        assert_eq!(Tag::from_name("TABLE"), Tag::Table);
        assert_eq!(Tag::from_name(" p "), Tag::P);
    }

    #[test]
    fn unknown_names_become_custom() {
        let tag = Tag::from_name("X-Widget");
        assert_eq!(tag.name(), "x-widget");
        assert!(!tag.is_block());
        assert_eq!(tag, Tag::from_name("x-widget"));
    }

    #[test]
    fn block_and_break_flags() {
        assert!(Tag::P.is_block() && Tag::P.breaks_flow());
        assert!(Tag::Table.is_block() && !Tag::Table.breaks_flow());
        assert!(Tag::Br.breaks_flow() && !Tag::Br.is_block());
        assert!(!Tag::Span.is_block());
    }

    #[test]
    fn known_names_round_trip() {
        for tag in Tag::KNOWN {
            assert_eq!(&Tag::from_name(tag.name()), tag);
        }
    }
}
