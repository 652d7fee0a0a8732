use quill_style::Rgba;

use crate::display_list::Painter;
use crate::geometry::{Axis, Rect};
use crate::metrics::FontSpec;
use crate::tree::ViewCx;
use crate::view::View;

const TAG_FONT_SIZE: f32 = 8.0;

/// Elements with no rendering of their own (`head`, `script`, unknown
/// tags). They take no space, and show a tag label only while the tree
/// is being edited.
#[derive(Debug, Clone, Copy, Default)]
pub struct EditableView;

impl EditableView {
    fn label(cx: &ViewCx<'_>) -> String {
        format!("<{}>", cx.tag())
    }

    fn label_font(cx: &ViewCx<'_>) -> FontSpec {
        FontSpec {
            size: TAG_FONT_SIZE,
            ..cx.font()
        }
    }
}

impl View for EditableView {
    fn name(&self) -> &'static str {
        "editable"
    }

    fn preferred_span(&self, cx: &ViewCx<'_>, axis: Axis) -> f32 {
        if !cx.is_editable() {
            return 0.0;
        }
        let font = Self::label_font(cx);
        match axis {
            Axis::X => cx.metrics().advance(&Self::label(cx), &font) + 2.0,
            Axis::Y => cx.metrics().line_height(&font) + 2.0,
        }
    }

    fn paint(&self, cx: &ViewCx<'_>, alloc: Rect, painter: &mut Painter) {
        if !cx.is_editable() {
            return;
        }
        let font = Self::label_font(cx);
        let metrics = cx.metrics();
        let w = metrics.advance(&Self::label(cx), &font) + 2.0;
        let h = metrics.line_height(&font) + 2.0;
        painter.stroke_rect(Rect::new(alloc.x, alloc.y, w, h), 1.0, Rgba::GRAY);
        let baseline = alloc.y + 1.0 + metrics.ascent(&font);
        painter.text(alloc.x + 1.0, baseline, Self::label(cx), &font, Rgba::GRAY);
    }
}
