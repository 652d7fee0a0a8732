use quill_dom::{HtmlAttr, parse_int_or};
use quill_style::{CssProperty, CssValue, LengthUnit, Rgba, parse_length};

use crate::display_list::Painter;
use crate::geometry::{Axis, Rect};
use crate::sizes::MAX_SPAN;
use crate::tree::ViewCx;
use crate::view::{BreakWeight, View};

const SPACE_ABOVE: f32 = 3.0;
const SPACE_BELOW: f32 = 3.0;
/// Top plus bottom of the lowered bevel.
const BEVEL: f32 = 4.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RuleAlign {
    Left,
    #[default]
    Center,
    Right,
}

/// A horizontal rule: a lowered bevel, or a solid bar with `noshade`.
#[derive(Debug, Clone, Default)]
pub struct HRuleView {
    size: i32,
    noshade: bool,
    width: Option<CssValue>,
    align: RuleAlign,
    margins: [f32; 4],
    color: Rgba,
}

impl HRuleView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn size(&self) -> i32 {
        self.size
    }

    pub fn is_noshade(&self) -> bool {
        self.noshade
    }

    fn vertical_margins(&self) -> f32 {
        self.margins[0] + self.margins[2]
    }

    /// Rectangle the rule itself occupies inside `alloc`.
    pub fn rule_rect(&self, alloc: Rect) -> Rect {
        let [top, left, bottom, right] = self.margins;
        let y = alloc.y + SPACE_ABOVE + top;
        let mut width = alloc.w - left - right;
        if let Some(value) = &self.width {
            width = value.to_points(0.0, width).unwrap_or(width);
        }
        let height = if self.size > 0 {
            self.size as f32
        } else {
            alloc.h - (SPACE_ABOVE + SPACE_BELOW + top + bottom)
        };
        let x = match self.align {
            RuleAlign::Center => alloc.x + alloc.w / 2.0 - width / 2.0,
            RuleAlign::Right => alloc.x + alloc.w - width - right,
            RuleAlign::Left => alloc.x + left,
        };
        Rect::new(x, y, width.max(0.0), height.max(0.0))
    }
}

impl View for HRuleView {
    fn name(&self) -> &'static str {
        "hrule"
    }

    fn set_properties(&mut self, cx: &ViewCx<'_>) {
        let attrs = cx.attributes();
        self.size = parse_int_or(cx.attribute(&HtmlAttr::Size), 0);
        self.noshade = cx.attribute(&HtmlAttr::Noshade).is_some();
        self.width = cx.attribute(&HtmlAttr::Width).and_then(|w| {
            let w = w.trim();
            w.parse::<f32>()
                .ok()
                .map(|px| CssValue::Length(px, LengthUnit::Px))
                .or_else(|| parse_length(w))
        });
        self.align = match cx.attribute(&HtmlAttr::Align).map(str::to_ascii_lowercase).as_deref() {
            Some("left") => RuleAlign::Left,
            Some("right") => RuleAlign::Right,
            _ => RuleAlign::Center,
        };
        let font_size = cx.font_size();
        let sheet = cx.sheet();
        self.margins = [
            CssProperty::MarginTop,
            CssProperty::MarginLeft,
            CssProperty::MarginBottom,
            CssProperty::MarginRight,
        ]
        .map(|key| sheet.length(&attrs, key, font_size, 0.0));
        self.color = sheet.foreground(&attrs);
    }

    fn preferred_span(&self, _cx: &ViewCx<'_>, axis: Axis) -> f32 {
        match axis {
            Axis::X => BEVEL,
            Axis::Y => {
                let rule = if self.size > 0 {
                    self.size as f32
                } else if self.noshade {
                    1.0
                } else {
                    BEVEL
                };
                rule + SPACE_ABOVE + SPACE_BELOW + self.vertical_margins()
            }
        }
    }

    fn maximum_span(&self, cx: &ViewCx<'_>, axis: Axis) -> f32 {
        match axis {
            Axis::X => MAX_SPAN,
            Axis::Y => self.preferred_span(cx, axis),
        }
    }

    fn resize_weight(&self, _cx: &ViewCx<'_>, axis: Axis) -> i32 {
        i32::from(axis == Axis::X)
    }

    fn break_weight(&self, _cx: &ViewCx<'_>, axis: Axis) -> BreakWeight {
        if axis == Axis::X {
            BreakWeight::Forced
        } else {
            BreakWeight::Bad
        }
    }

    fn paint(&self, _cx: &ViewCx<'_>, alloc: Rect, painter: &mut Painter) {
        let r = self.rule_rect(alloc);
        if self.noshade {
            painter.rect(r, self.color);
            return;
        }
        let (shadow, highlight) = (Rgba::GRAY, Rgba::WHITE);
        painter.rect(Rect::new(r.x, r.y, r.w, 1.0), shadow);
        painter.rect(Rect::new(r.x, r.y, 1.0, r.h), shadow);
        painter.rect(Rect::new(r.x, r.y + r.h - 1.0, r.w, 1.0), highlight);
        painter.rect(Rect::new(r.x + r.w - 1.0, r.y, 1.0, r.h), highlight);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rule_rect_alignment_and_width() {
        let mut rule = HRuleView::new();
        rule.size = 2;
        rule.width = Some(CssValue::Percentage(50.0));
        let alloc = Rect::new(0.0, 0.0, 200.0, 20.0);
        assert_eq!(rule.rule_rect(alloc), Rect::new(50.0, 3.0, 100.0, 2.0));
        rule.align = RuleAlign::Right;
        rule.margins = [0.0, 0.0, 0.0, 10.0];
        // half of the 190 left after the margin
        assert_eq!(rule.rule_rect(alloc), Rect::new(95.0, 3.0, 95.0, 2.0));
        rule.align = RuleAlign::Left;
        rule.margins = [1.0, 5.0, 0.0, 0.0];
        assert_eq!(rule.rule_rect(alloc).x, 5.0);
        assert_eq!(rule.rule_rect(alloc).y, 4.0);
    }

    #[test]
    fn unsized_rule_fills_remaining_height() {
        let rule = HRuleView::new();
        let r = rule.rule_rect(Rect::new(0.0, 0.0, 100.0, 10.0));
        assert_eq!(r.h, 4.0);
        assert_eq!(r.w, 100.0);
    }
}
