//! View tree for styled HTML documents: one view per element, resolved
//! style attributes with inheritance, box and list painters, layout by
//! size requirements and painting into a display list.

pub mod attributes;
pub mod box_painter;
pub mod display_list;
pub mod error;
pub mod factory;
pub mod geometry;
pub mod list_painter;
pub mod metrics;
pub mod sizes;
pub mod text;
pub mod tree;
pub mod view;
pub mod views;

pub use attributes::{AttrView, ViewAttributes};
pub use box_painter::{BorderStyle, BoxPainter};
pub use display_list::{Command, DisplayList, Painter, Viewport};
pub use error::ViewError;
pub use factory::{HtmlFactory, ViewFactory};
pub use geometry::{Axis, Rect, Side};
pub use list_painter::{ListChild, ListPainter, ListStyle, render_index};
pub use metrics::{FixedMetrics, FontSpec, TextMetrics};
pub use sizes::{MAX_SPAN, SizeRequirements};
pub use tree::{ElementData, ViewCx, ViewId, ViewTree};
pub use view::{BreakWeight, View};
