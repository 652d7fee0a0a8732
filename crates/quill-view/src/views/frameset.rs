use quill_dom::{HtmlAttr, parse_int_or};
use quill_style::Rgba;

use crate::display_list::Painter;
use crate::geometry::{Axis, Rect};
use crate::sizes::MAX_SPAN;
use crate::tree::ViewCx;
use crate::view::View;

/// One entry of a `rows` or `cols` list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameSpec {
    /// Pixels.
    Absolute(i32),
    /// Percent of the space left after absolute entries.
    Percent(i32),
    /// Share of whatever remains after the others.
    Relative(i32),
}

/// Parse a comma separated `rows`/`cols` list. `100%` means `*`; a
/// percent total above 100 is scaled back to 100.
pub fn parse_spec(spec: &str) -> Vec<FrameSpec> {
    let mut specs: Vec<FrameSpec> = spec
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(|item| {
            let item = if item == "100%" { "*" } else { item };
            if let Some(weight) = item.strip_suffix('*') {
                FrameSpec::Relative(if weight.is_empty() { 1 } else { parse_int_or(Some(weight), 1) })
            } else if item.contains('%') {
                FrameSpec::Percent(leading_digits(item))
            } else {
                FrameSpec::Absolute(parse_int_or(Some(item), 0))
            }
        })
        .collect();
    let percent_total: i32 = specs
        .iter()
        .map(|s| match s {
            FrameSpec::Percent(p) => *p,
            _ => 0,
        })
        .sum();
    if percent_total > 100 {
        for spec in &mut specs {
            if let FrameSpec::Percent(p) = spec {
                *p = *p * 100 / percent_total;
            }
        }
    }
    specs
}

fn leading_digits(text: &str) -> i32 {
    let digits: String = text.trim().chars().take_while(char::is_ascii_digit).collect();
    digits.parse().unwrap_or(0)
}

/// Divide `target` pixels among `specs`. Absolute entries are served
/// first, then percentages of what they left, then relative shares of the
/// rest. With no relative entries any leftover is handed out in
/// proportion to the spans already given, one pixel at a time at the end.
pub fn spread(target: i32, specs: &[FrameSpec]) -> Vec<i32> {
    let n = specs.len();
    let mut spans = vec![0; n];
    if target == 0 || n == 0 {
        return spans;
    }
    let mut remaining = target;
    for (span, spec) in spans.iter_mut().zip(specs) {
        if let FrameSpec::Absolute(px) = spec {
            if *px > 0 {
                *span = *px;
                remaining -= *px;
            }
        }
    }

    let available = remaining;
    for (span, spec) in spans.iter_mut().zip(specs) {
        if let FrameSpec::Percent(p) = spec {
            if *p > 0 {
                *span = if available > 0 { p * available / 100 } else { target / n as i32 };
                remaining -= *span;
            }
        }
    }

    let relative_total: i32 = specs
        .iter()
        .map(|s| match s {
            FrameSpec::Relative(w) if *w > 0 => *w,
            _ => 0,
        })
        .sum();
    if remaining > 0 && relative_total > 0 {
        for (span, spec) in spans.iter_mut().zip(specs) {
            if let FrameSpec::Relative(w) = spec {
                if *w > 0 {
                    *span = remaining * w / relative_total;
                }
            }
        }
    } else if remaining > 0 {
        let given = (target - remaining) as f32;
        remaining = target;
        for span in spans.iter_mut() {
            let percent = if given > 0.0 { *span as f32 / given * 100.0 } else { 0.0 };
            *span = (target as f32 * percent / 100.0) as i32;
            remaining -= *span;
        }
        let mut i = 0;
        while remaining != 0 {
            if remaining < 0 {
                spans[i] -= 1;
                remaining += 1;
            } else {
                spans[i] += 1;
                remaining -= 1;
            }
            i = (i + 1) % n;
        }
    }
    spans
}

/// Tiles frames along `rows` when present, otherwise along `cols`.
#[derive(Debug, Clone)]
pub struct FrameSetView {
    axis: Axis,
    specs: Vec<FrameSpec>,
}

impl FrameSetView {
    pub fn new() -> Self {
        Self {
            axis: Axis::X,
            specs: vec![FrameSpec::Relative(1)],
        }
    }

    pub fn axis(&self) -> Axis {
        self.axis
    }

    pub fn specs(&self) -> &[FrameSpec] {
        &self.specs
    }
}

impl Default for FrameSetView {
    fn default() -> Self {
        Self::new()
    }
}

impl View for FrameSetView {
    fn name(&self) -> &'static str {
        "frameset"
    }

    fn set_properties(&mut self, cx: &ViewCx<'_>) {
        let (axis, spec) = match cx.attribute(&HtmlAttr::Rows) {
            Some(rows) => (Axis::Y, rows),
            None => (Axis::X, cx.attribute(&HtmlAttr::Cols).unwrap_or("*")),
        };
        self.axis = axis;
        self.specs = parse_spec(spec);
    }

    fn preferred_span(&self, _cx: &ViewCx<'_>, _axis: Axis) -> f32 {
        0.0
    }

    fn maximum_span(&self, _cx: &ViewCx<'_>, _axis: Axis) -> f32 {
        MAX_SPAN
    }

    fn resize_weight(&self, _cx: &ViewCx<'_>, _axis: Axis) -> i32 {
        1
    }

    fn layout(&self, cx: &ViewCx<'_>, alloc: Rect) -> Vec<Rect> {
        let spans = spread(alloc.span(self.axis) as i32, &self.specs);
        let mut offset = alloc.origin(self.axis);
        let minor = self.axis.other();
        (0..cx.child_count())
            .map(|i| {
                let span = spans.get(i).copied().unwrap_or(0) as f32;
                let rect = Rect::from_axes(self.axis, offset, span, alloc.origin(minor), alloc.span(minor));
                offset += span;
                rect
            })
            .collect()
    }
}

/// A frame inside a frame set. The document it names is not loaded; the
/// frame paints its outline and the source as an image reference.
#[derive(Debug, Clone, Default)]
pub struct FrameView {
    src: Option<String>,
    border: bool,
}

impl FrameView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn src(&self) -> Option<&str> {
        self.src.as_deref()
    }
}

impl View for FrameView {
    fn name(&self) -> &'static str {
        "frame"
    }

    fn set_properties(&mut self, cx: &ViewCx<'_>) {
        self.src = cx.attribute(&HtmlAttr::Src).map(str::to_string);
        self.border = cx.attribute(&HtmlAttr::Frameborder).map_or(true, |v| v.trim() != "0");
    }

    fn preferred_span(&self, _cx: &ViewCx<'_>, _axis: Axis) -> f32 {
        0.0
    }

    fn maximum_span(&self, _cx: &ViewCx<'_>, _axis: Axis) -> f32 {
        MAX_SPAN
    }

    fn resize_weight(&self, _cx: &ViewCx<'_>, _axis: Axis) -> i32 {
        1
    }

    fn paint(&self, _cx: &ViewCx<'_>, alloc: Rect, painter: &mut Painter) {
        if let Some(src) = &self.src {
            painter.image(alloc, src.as_str());
        }
        if self.border {
            painter.stroke_rect(alloc, 1.0, Rgba::GRAY);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absolute_then_relative() {
        let specs = parse_spec("30, *, *");
        assert_eq!(specs, vec![FrameSpec::Absolute(30), FrameSpec::Relative(1), FrameSpec::Relative(1)]);
        assert_eq!(spread(100, &specs), vec![30, 35, 35]);
    }

    #[test]
    fn hundred_percent_is_relative() {
        assert_eq!(parse_spec("100%"), vec![FrameSpec::Relative(1)]);
        assert_eq!(parse_spec("2*,*"), vec![FrameSpec::Relative(2), FrameSpec::Relative(1)]);
    }

    #[test]
    fn percent_total_is_normalized() {
        assert_eq!(parse_spec("80%,70%"), vec![FrameSpec::Percent(53), FrameSpec::Percent(46)]);
    }

    #[test]
    fn percents_of_space_left_by_absolutes() {
        let specs = parse_spec("20,50%,*");
        assert_eq!(spread(120, &specs), vec![20, 50, 50]);
    }

    #[test]
    fn leftover_is_redistributed_without_relatives() {
        // 10 + 20 = 30 given; scaled to 100 as 33 + 66, the last pixel
        // goes round robin to the first frame
        let specs = parse_spec("10,20");
        assert_eq!(spread(100, &specs), vec![34, 66]);
        assert_eq!(spread(100, &specs).iter().sum::<i32>(), 100);
    }

    #[test]
    fn zero_target_spreads_nothing() {
        assert_eq!(spread(0, &parse_spec("10,*")), vec![0, 0]);
    }
}
