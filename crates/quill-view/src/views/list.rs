use quill_style::{AttributeLookup, CssValue};

use crate::display_list::Painter;
use crate::geometry::{Axis, Rect};
use crate::list_painter::{ListChild, ListPainter};
use crate::tree::ViewCx;
use crate::view::View;
use crate::views::BlockView;

/// A vertical box that paints a marker beside each list item.
#[derive(Debug, Clone)]
pub struct ListView {
    block: BlockView,
    painter: Option<ListPainter>,
}

impl ListView {
    pub fn new() -> Self {
        Self {
            block: BlockView::new(Axis::Y),
            painter: None,
        }
    }

    pub fn list_painter(&self) -> Option<&ListPainter> {
        self.painter.as_ref()
    }

    /// Number rendered for every child, in order.
    pub fn item_numbers(&self, cx: &ViewCx<'_>) -> Vec<i32> {
        let items = list_children(cx);
        let start = self.painter.as_ref().map_or(1, ListPainter::start);
        (0..items.len())
            .map(|i| crate::list_painter::render_index(&items, i, start))
            .collect()
    }
}

impl Default for ListView {
    fn default() -> Self {
        Self::new()
    }
}

fn list_children(cx: &ViewCx<'_>) -> Vec<ListChild> {
    cx.children()
        .iter()
        .map(|child| ListChild::new(child.tag(), &child.element().attributes))
        .collect()
}

/// Only an item's own list-style-type overrides the list's.
struct OwnType<'a>(crate::attributes::AttrView<'a>);

impl AttributeLookup for OwnType<'_> {
    fn lookup(&self, key: quill_style::CssProperty) -> Option<CssValue> {
        self.0.lookup_local(key)
    }
}

impl View for ListView {
    fn name(&self) -> &'static str {
        "list"
    }

    fn set_properties(&mut self, cx: &ViewCx<'_>) {
        self.block.set_properties(cx);
        self.painter = Some(ListPainter::from_attributes(
            cx.sheet(),
            &cx.attributes(),
            cx.tag(),
            &cx.element().attributes,
            cx.config(),
        ));
    }

    fn preferred_span(&self, cx: &ViewCx<'_>, axis: Axis) -> f32 {
        self.block.preferred_span(cx, axis)
    }

    fn minimum_span(&self, cx: &ViewCx<'_>, axis: Axis) -> f32 {
        self.block.minimum_span(cx, axis)
    }

    fn maximum_span(&self, cx: &ViewCx<'_>, axis: Axis) -> f32 {
        self.block.maximum_span(cx, axis)
    }

    fn alignment(&self, cx: &ViewCx<'_>, axis: Axis) -> f32 {
        self.block.alignment(cx, axis)
    }

    fn resize_weight(&self, cx: &ViewCx<'_>, axis: Axis) -> i32 {
        self.block.resize_weight(cx, axis)
    }

    fn height_for_width(&self, cx: &ViewCx<'_>, width: f32) -> f32 {
        self.block.height_for_width(cx, width)
    }

    fn layout(&self, cx: &ViewCx<'_>, alloc: Rect) -> Vec<Rect> {
        self.block.layout(cx, alloc)
    }

    fn paint(&self, cx: &ViewCx<'_>, alloc: Rect, painter: &mut Painter) {
        self.block.paint(cx, alloc, painter);
        let Some(list) = &self.painter else { return };
        let items = list_children(cx);
        let metrics = cx.metrics();
        for (i, child) in cx.children().iter().enumerate() {
            if !matches!(items[i], ListChild::Item { .. }) {
                continue;
            }
            let style = list.child_style(Some(&OwnType(child.attributes())));
            let n = crate::list_painter::render_index(&items, i, list.start());
            let font = child.font();
            let color = cx.sheet().foreground(&child.attributes());
            list.paint_marker(painter, metrics, &font, color, child.allocation(), style, n);
        }
    }
}
