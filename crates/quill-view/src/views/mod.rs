//! Concrete views, one per rendering behavior.

pub mod block;
pub mod editable;
pub mod frameset;
pub mod hrule;
pub mod image;
pub mod inline;
pub mod list;
pub mod object;
pub mod paragraph;

pub use block::BlockView;
pub use editable::EditableView;
pub use frameset::{FrameSetView, FrameSpec, FrameView, parse_spec, spread};
pub use hrule::{HRuleView, RuleAlign};
pub use image::ImageView;
pub use inline::{BaselineShift, BreakView, InlineView};
pub use list::ListView;
pub use object::{Embeddable, IsindexView, ObjectView, search_url};
pub use paragraph::{Fragment, FragmentKind, Line, ParagraphView, TextAlign, WhiteSpace};
