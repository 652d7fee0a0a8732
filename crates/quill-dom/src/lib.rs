//! Element model shared by the style engine and the view tree: the tag and
//! attribute vocabulary, an element arena, and a markup writer.

pub mod attr;
pub mod document;
pub mod error;
pub mod tag;
pub mod writer;

pub use attr::{Attributes, HtmlAttr, parse_f32_or, parse_int_or};
pub use document::{Document, Element, ElementId, ElementKind, ElementRef, InlineTag, Origin};
pub use error::DomError;
pub use tag::Tag;
pub use writer::{HtmlWriter, WriterOptions, write_document};
