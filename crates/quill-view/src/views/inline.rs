use quill_dom::Tag;
use quill_style::{CssProperty, Rgba};

use crate::display_list::Painter;
use crate::geometry::{Axis, Rect};
use crate::metrics::{FontSpec, TextMetrics};
use crate::text::{collapse_whitespace, words};
use crate::tree::ViewCx;
use crate::view::{BreakWeight, View};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BaselineShift {
    #[default]
    None,
    Super,
    Sub,
}

/// A run of text sharing one set of attributes. Painted by the enclosing
/// paragraph, which flows it into lines.
#[derive(Debug, Clone)]
pub struct InlineView {
    text: String,
    font: FontSpec,
    color: Rgba,
    underline: bool,
    strike_through: bool,
    shift: BaselineShift,
    nowrap: bool,
    preformatted: bool,
}

impl InlineView {
    pub fn new() -> Self {
        Self {
            text: String::new(),
            font: FontSpec {
                family: crate::metrics::DEFAULT_FAMILY.to_string(),
                size: 12.0,
                bold: false,
                italic: false,
            },
            color: Rgba::BLACK,
            underline: false,
            strike_through: false,
            shift: BaselineShift::None,
            nowrap: false,
            preformatted: false,
        }
    }

    /// Text as it flows: whitespace collapsed unless preformatted.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn font(&self) -> &FontSpec {
        &self.font
    }

    pub fn color(&self) -> Rgba {
        self.color
    }

    pub fn is_underline(&self) -> bool {
        self.underline
    }

    pub fn is_strike_through(&self) -> bool {
        self.strike_through
    }

    pub fn shift(&self) -> BaselineShift {
        self.shift
    }

    pub fn is_nowrap(&self) -> bool {
        self.nowrap
    }

    pub fn is_preformatted(&self) -> bool {
        self.preformatted
    }

    /// Vertical offset of the baseline; negative moves up.
    pub fn baseline_offset(&self) -> f32 {
        match self.shift {
            BaselineShift::None => 0.0,
            BaselineShift::Super => -self.font.size / 3.0,
            BaselineShift::Sub => self.font.size / 3.0,
        }
    }

    /// Widest word of the run; the narrowest the run can be laid out.
    pub fn longest_word_span(&self, metrics: &dyn TextMetrics) -> f32 {
        words(&self.text)
            .into_iter()
            .map(|range| metrics.advance(&self.text[range], &self.font))
            .fold(0.0, f32::max)
    }

    /// Paint one fragment of the run with its baseline at `baseline`.
    pub fn paint_fragment(&self, painter: &mut Painter, text: &str, x: f32, baseline: f32, width: f32) {
        let baseline = baseline + self.baseline_offset();
        painter.text(x, baseline, text, &self.font, self.color);
        if self.underline {
            let y = baseline + 1.0;
            painter.line([x, y], [x + width, y], 1.0, self.color);
        }
        if self.strike_through {
            let y = baseline - self.font.size * 0.3;
            painter.line([x, y], [x + width, y], 1.0, self.color);
        }
    }
}

impl Default for InlineView {
    fn default() -> Self {
        Self::new()
    }
}

impl View for InlineView {
    fn name(&self) -> &'static str {
        "inline"
    }

    fn set_properties(&mut self, cx: &ViewCx<'_>) {
        let attrs = cx.attributes();
        let white_space = attrs.keyword(CssProperty::WhiteSpace).unwrap_or_default();
        self.preformatted = white_space == "pre";
        self.nowrap = self.preformatted || white_space == "nowrap";
        let raw = cx.element().text.as_deref().unwrap_or_default();
        self.text = if self.preformatted {
            raw.to_string()
        } else {
            collapse_whitespace(raw)
        };
        self.font = cx.font();
        self.color = cx.sheet().foreground(&attrs);
        let decoration = attrs.keyword(CssProperty::TextDecoration).unwrap_or_default();
        self.underline = decoration.contains("underline");
        self.strike_through = decoration.contains("line-through");
        let valign = attrs.keyword(CssProperty::VerticalAlign).unwrap_or_default();
        self.shift = if valign.contains("sup") || cx.element().has_inline(&Tag::Sup) {
            BaselineShift::Super
        } else if valign.contains("sub") || cx.element().has_inline(&Tag::Sub) {
            BaselineShift::Sub
        } else {
            BaselineShift::None
        };
    }

    fn preferred_span(&self, cx: &ViewCx<'_>, axis: Axis) -> f32 {
        let metrics = cx.metrics();
        match axis {
            Axis::X => metrics.advance(&self.text, &self.font),
            Axis::Y => metrics.line_height(&self.font) + self.baseline_offset().abs(),
        }
    }

    fn minimum_span(&self, cx: &ViewCx<'_>, axis: Axis) -> f32 {
        if axis == Axis::X && !self.nowrap {
            return self.longest_word_span(cx.metrics());
        }
        self.preferred_span(cx, axis)
    }

    fn break_weight(&self, _cx: &ViewCx<'_>, axis: Axis) -> BreakWeight {
        if axis == Axis::X && self.nowrap {
            BreakWeight::Bad
        } else {
            BreakWeight::Good
        }
    }

    /// Runs are painted by their paragraph.
    fn paint(&self, _cx: &ViewCx<'_>, _alloc: Rect, _painter: &mut Painter) {}

    fn as_inline(&self) -> Option<&InlineView> {
        Some(self)
    }
}

/// A forced line break.
#[derive(Debug, Clone, Copy, Default)]
pub struct BreakView;

impl View for BreakView {
    fn name(&self) -> &'static str {
        "break"
    }

    fn preferred_span(&self, cx: &ViewCx<'_>, axis: Axis) -> f32 {
        match axis {
            Axis::X => 0.0,
            Axis::Y => cx.metrics().line_height(&cx.font()),
        }
    }

    fn break_weight(&self, _cx: &ViewCx<'_>, axis: Axis) -> BreakWeight {
        if axis == Axis::X {
            BreakWeight::Forced
        } else {
            BreakWeight::Bad
        }
    }

    fn paint(&self, _cx: &ViewCx<'_>, _alloc: Rect, _painter: &mut Painter) {}
}
