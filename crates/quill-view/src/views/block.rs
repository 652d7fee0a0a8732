use quill_style::{AttributeLookup, CssProperty, CssValue};

use crate::box_painter::BoxPainter;
use crate::display_list::Painter;
use crate::geometry::{Axis, Rect};
use crate::sizes::{
    MAX_SPAN, SizeRequirements, aligned_requirements, calculate_tiled_positions, tiled_requirements,
};
use crate::tree::ViewCx;
use crate::view::View;

/// A box that tiles its children along one axis and aligns them along the
/// other, inside the insets of its [`BoxPainter`].
#[derive(Debug, Clone)]
pub struct BlockView {
    axis: Axis,
    painter: BoxPainter,
    width: Option<CssValue>,
    height: Option<CssValue>,
    font_size: f32,
}

impl BlockView {
    pub fn new(axis: Axis) -> Self {
        Self {
            axis,
            painter: BoxPainter::default(),
            width: None,
            height: None,
            font_size: 0.0,
        }
    }

    pub fn axis(&self) -> Axis {
        self.axis
    }

    pub fn box_painter(&self) -> &BoxPainter {
        &self.painter
    }

    fn insets(&self, axis: Axis) -> f32 {
        self.painter.insets_along(axis == Axis::X)
    }

    /// CSS width or height as a content span; percentages resolve against
    /// `reference`.
    fn css_span(&self, axis: Axis, reference: f32) -> Option<f32> {
        let value = match axis {
            Axis::X => self.width.as_ref(),
            Axis::Y => self.height.as_ref(),
        }?;
        if matches!(value, CssValue::Percentage(_)) && reference <= 0.0 {
            return None;
        }
        value.to_points(self.font_size, reference).filter(|v| *v > 0.0)
    }

    /// Spans of the children across a minor axis `target` wide.
    fn minor_spans(children: &[ViewCx<'_>], axis: Axis, target: f32) -> Vec<(f32, f32)> {
        children
            .iter()
            .map(|child| {
                let max = child.maximum_span(axis);
                if max < target {
                    ((target - max) * child.alignment(axis), max)
                } else {
                    (0.0, child.minimum_span(axis).max(target))
                }
            })
            .collect()
    }

    /// Widths of the children when the content is `inner` wide.
    fn child_widths(&self, children: &[ViewCx<'_>], inner: f32) -> Vec<(f32, f32)> {
        match self.axis {
            Axis::Y => Self::minor_spans(children, Axis::X, inner),
            Axis::X => {
                let reqs: Vec<SizeRequirements> = children.iter().map(|c| c.requirements(Axis::X)).collect();
                let (offsets, spans) = calculate_tiled_positions(inner, None, &reqs);
                offsets.into_iter().zip(spans).collect()
            }
        }
    }

    /// Horizontal requirements of the content.
    fn content_requirements(&self, cx: &ViewCx<'_>) -> SizeRequirements {
        let children = cx.children();
        let reqs: Vec<SizeRequirements> = children.iter().map(|c| c.requirements(Axis::X)).collect();
        if self.axis == Axis::X {
            tiled_requirements(&reqs)
        } else {
            let mut total = aligned_requirements(&reqs);
            total.maximum = MAX_SPAN;
            total
        }
    }

    fn content_height(&self, children: &[ViewCx<'_>], inner_width: f32) -> f32 {
        let widths = self.child_widths(children, inner_width);
        let heights = children
            .iter()
            .zip(widths)
            .map(|(child, (_, w))| child.height_for_width(w));
        match self.axis {
            Axis::Y => heights.sum(),
            Axis::X => heights.fold(0.0, f32::max),
        }
    }
}

impl View for BlockView {
    fn name(&self) -> &'static str {
        "block"
    }

    fn set_properties(&mut self, cx: &ViewCx<'_>) {
        let attrs = cx.attributes();
        self.font_size = cx.font_size();
        self.painter = BoxPainter::from_attributes(cx.sheet(), &attrs, self.font_size);
        self.width = attrs.lookup(CssProperty::Width);
        self.height = attrs.lookup(CssProperty::Height);
    }

    fn preferred_span(&self, cx: &ViewCx<'_>, axis: Axis) -> f32 {
        if axis == Axis::Y {
            return self.height_for_width(cx, self.preferred_span(cx, Axis::X));
        }
        if let Some(width) = self.css_span(Axis::X, 0.0) {
            return width + self.insets(Axis::X);
        }
        self.content_requirements(cx).preferred + self.insets(Axis::X)
    }

    fn minimum_span(&self, cx: &ViewCx<'_>, axis: Axis) -> f32 {
        if axis == Axis::Y {
            return self.preferred_span(cx, Axis::Y);
        }
        if let Some(width) = self.css_span(Axis::X, 0.0) {
            return width + self.insets(Axis::X);
        }
        self.content_requirements(cx).minimum + self.insets(Axis::X)
    }

    fn maximum_span(&self, cx: &ViewCx<'_>, axis: Axis) -> f32 {
        if axis == Axis::Y {
            return self.preferred_span(cx, Axis::Y);
        }
        if let Some(width) = self.css_span(Axis::X, 0.0) {
            return width + self.insets(Axis::X);
        }
        MAX_SPAN
    }

    fn alignment(&self, _cx: &ViewCx<'_>, _axis: Axis) -> f32 {
        0.0
    }

    fn resize_weight(&self, _cx: &ViewCx<'_>, axis: Axis) -> i32 {
        i32::from(axis == Axis::X && self.width.is_none())
    }

    fn height_for_width(&self, cx: &ViewCx<'_>, width: f32) -> f32 {
        let insets = self.insets(Axis::Y);
        if let Some(height) = self.css_span(Axis::Y, 0.0) {
            return height + insets;
        }
        let inner = (width - self.insets(Axis::X)).max(0.0);
        self.content_height(&cx.children(), inner) + insets
    }

    fn layout(&self, cx: &ViewCx<'_>, alloc: Rect) -> Vec<Rect> {
        let content = self.painter.content_rect(alloc);
        let children = cx.children();
        let widths = self.child_widths(&children, content.w);
        match self.axis {
            Axis::Y => {
                let mut y = content.y;
                children
                    .iter()
                    .zip(widths)
                    .map(|(child, (x, w))| {
                        let h = child.height_for_width(w);
                        let rect = Rect::new(content.x + x, y, w, h);
                        y += h;
                        rect
                    })
                    .collect()
            }
            Axis::X => widths
                .into_iter()
                .map(|(x, w)| Rect::new(content.x + x, content.y, w, content.h))
                .collect(),
        }
    }

    fn paint(&self, cx: &ViewCx<'_>, alloc: Rect, painter: &mut Painter) {
        self.painter.paint(alloc, painter);
        cx.paint_children(painter);
    }
}
