use crate::display_list::Painter;
use crate::geometry::{Axis, Rect};
use crate::sizes::SizeRequirements;
use crate::tree::ViewCx;
use crate::views::InlineView;

/// How attractive a break at a view is to the line breaker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum BreakWeight {
    Bad,
    Good,
    Excellent,
    Forced,
}

/// A rectangular piece of the rendering of one element.
///
/// Views are stateless with respect to geometry: the tree hands each call
/// the view's context and, where relevant, its allocation. Properties read
/// from the attributes are cached by [`View::set_properties`] and refreshed
/// when the style sheet changes.
pub trait View {
    /// Short name of the view kind, for diagnostics.
    fn name(&self) -> &'static str;

    fn set_properties(&mut self, _cx: &ViewCx<'_>) {}

    fn preferred_span(&self, cx: &ViewCx<'_>, axis: Axis) -> f32;

    fn minimum_span(&self, cx: &ViewCx<'_>, axis: Axis) -> f32 {
        self.preferred_span(cx, axis)
    }

    fn maximum_span(&self, cx: &ViewCx<'_>, axis: Axis) -> f32 {
        self.preferred_span(cx, axis)
    }

    fn alignment(&self, _cx: &ViewCx<'_>, _axis: Axis) -> f32 {
        0.5
    }

    fn resize_weight(&self, _cx: &ViewCx<'_>, _axis: Axis) -> i32 {
        0
    }

    fn break_weight(&self, _cx: &ViewCx<'_>, _axis: Axis) -> BreakWeight {
        BreakWeight::Good
    }

    /// Height needed when laid out `width` wide.
    fn height_for_width(&self, cx: &ViewCx<'_>, _width: f32) -> f32 {
        self.preferred_span(cx, Axis::Y)
    }

    fn requirements(&self, cx: &ViewCx<'_>, axis: Axis) -> SizeRequirements {
        SizeRequirements::new(
            self.minimum_span(cx, axis),
            self.preferred_span(cx, axis),
            self.maximum_span(cx, axis),
            self.alignment(cx, axis),
        )
    }

    /// Allocations for the children inside `alloc`, one per child.
    fn layout(&self, _cx: &ViewCx<'_>, _alloc: Rect) -> Vec<Rect> {
        Vec::new()
    }

    fn paint(&self, cx: &ViewCx<'_>, _alloc: Rect, painter: &mut Painter) {
        cx.paint_children(painter);
    }

    fn as_inline(&self) -> Option<&InlineView> {
        None
    }
}
