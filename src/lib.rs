//! Quill: a CSS cascade for HTML documents and the view tree it drives.
//!
//! The work is split across the workspace crates; this crate re-exports
//! them under one roof.

pub use quill_config as config;
pub use quill_dom as dom;
pub use quill_style as style;
pub use quill_view as view;

pub use quill_config::QuillConfig;
pub use quill_dom::{Document, Tag};
pub use quill_style::StyleSheet;
pub use quill_view::{DisplayList, HtmlFactory, ViewTree};
