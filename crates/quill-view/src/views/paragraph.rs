//! Inline flow.
//!
//! A paragraph gathers the text of its [`InlineView`] children and the
//! boxes of any atomic children (images, breaks, embedded objects) into
//! lines, breaking greedily at Unicode line break opportunities.

use quill_style::{AttributeLookup, CssProperty, CssValue};

use crate::box_painter::BoxPainter;
use crate::display_list::Painter;
use crate::geometry::{Axis, Rect};
use crate::metrics::{FontSpec, TextMetrics};
use crate::sizes::MAX_SPAN;
use crate::text::{LineBreakKind, compute_line_breaks};
use crate::tree::ViewCx;
use crate::view::{BreakWeight, View};
use crate::views::InlineView;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
    Justify,
}

impl TextAlign {
    fn from_keyword(word: &str) -> Self {
        match word {
            "center" | "middle" => TextAlign::Center,
            "right" => TextAlign::Right,
            "justify" => TextAlign::Justify,
            _ => TextAlign::Left,
        }
    }

    fn factor(self) -> f32 {
        match self {
            TextAlign::Left | TextAlign::Justify => 0.0,
            TextAlign::Center => 0.5,
            TextAlign::Right => 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WhiteSpace {
    #[default]
    Normal,
    Pre,
    Nowrap,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FragmentKind {
    Text(String),
    /// A child laid out as one box sitting on the baseline.
    Atomic,
}

/// Part of one child that landed on one line. `x` is relative to the
/// line start.
#[derive(Debug, Clone, PartialEq)]
pub struct Fragment {
    pub child: usize,
    pub kind: FragmentKind,
    pub x: f32,
    pub width: f32,
    pub ascent: f32,
    pub descent: f32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Line {
    pub fragments: Vec<Fragment>,
    pub width: f32,
    pub ascent: f32,
    pub descent: f32,
}

impl Line {
    pub fn height(&self) -> f32 {
        self.ascent + self.descent
    }
}

struct LineBuilder<'m> {
    metrics: &'m dyn TextMetrics,
    lines: Vec<Line>,
    current: Line,
    /// Font of the last fragment, when it is text.
    last_font: Option<FontSpec>,
    avail: f32,
    indent: f32,
    preformatted: bool,
}

impl<'m> LineBuilder<'m> {
    fn limit(&self) -> f32 {
        if self.lines.is_empty() {
            self.avail - self.indent
        } else {
            self.avail
        }
    }

    fn is_empty(&self) -> bool {
        self.current.fragments.is_empty()
    }

    fn fits(&self, width: f32) -> bool {
        self.is_empty() || self.current.width + width <= self.limit()
    }

    fn push_text(&mut self, child: usize, text: &str, font: &FontSpec, extents: (f32, f32)) {
        let width = self.metrics.advance(text, font);
        self.current.ascent = self.current.ascent.max(extents.0);
        self.current.descent = self.current.descent.max(extents.1);
        if let Some(last) = self.current.fragments.last_mut() {
            if let (true, FragmentKind::Text(existing)) = (last.child == child, &mut last.kind) {
                existing.push_str(text);
                last.width += width;
                self.current.width += width;
                return;
            }
        }
        self.current.fragments.push(Fragment {
            child,
            kind: FragmentKind::Text(text.to_string()),
            x: self.current.width,
            width,
            ascent: extents.0,
            descent: extents.1,
        });
        self.current.width += width;
        self.last_font = Some(font.clone());
    }

    fn push_atomic(&mut self, child: usize, width: f32, height: f32) {
        self.current.fragments.push(Fragment {
            child,
            kind: FragmentKind::Atomic,
            x: self.current.width,
            width,
            ascent: height,
            descent: 0.0,
        });
        self.current.width += width;
        self.current.ascent = self.current.ascent.max(height);
        self.last_font = None;
    }

    /// Close the current line. An empty line still takes `extents`.
    fn finish_line(&mut self, extents: Option<(f32, f32)>) {
        if self.is_empty() {
            if let Some((ascent, descent)) = extents {
                self.lines.push(Line {
                    ascent,
                    descent,
                    ..Line::default()
                });
            }
            return;
        }
        if !self.preformatted {
            self.trim_trailing_space();
        }
        self.lines.push(std::mem::take(&mut self.current));
        self.last_font = None;
    }

    fn trim_trailing_space(&mut self) {
        let Some(font) = &self.last_font else { return };
        let Some(last) = self.current.fragments.last_mut() else { return };
        if let FragmentKind::Text(text) = &mut last.kind {
            let trimmed_len = text.trim_end().len();
            if trimmed_len < text.len() {
                text.truncate(trimmed_len);
                let width = self.metrics.advance(text, font);
                self.current.width -= last.width - width;
                last.width = width;
            }
        }
    }

    fn finish(mut self) -> Vec<Line> {
        self.finish_line(None);
        self.lines
    }
}

/// Split `text` at break opportunities. The flag marks pieces ending in a
/// hard newline, which only preformatted text honours.
fn pieces(text: &str, wrap: bool, preformatted: bool) -> Vec<(&str, bool)> {
    if !wrap && !preformatted {
        return vec![(text, false)];
    }
    let mut out = Vec::new();
    let mut start = 0;
    for brk in compute_line_breaks(text) {
        let piece = &text[start..brk.offset];
        start = brk.offset;
        let hard = preformatted && brk.kind == LineBreakKind::Mandatory && piece.ends_with(['\n', '\r']);
        if hard {
            out.push((piece.trim_end_matches(['\n', '\r']), true));
        } else {
            out.push((piece, false));
        }
    }
    out
}

/// Ascent and descent of a run's line box, including half the leading and
/// any baseline shift.
fn extents(metrics: &dyn TextMetrics, run: &InlineView) -> (f32, f32) {
    let font = run.font();
    let half_leading = metrics.leading(font) / 2.0;
    let shift = run.baseline_offset();
    (
        metrics.ascent(font) + half_leading - shift.min(0.0),
        metrics.descent(font) + half_leading + shift.max(0.0),
    )
}

#[derive(Debug, Clone, Default)]
pub struct ParagraphView {
    painter: BoxPainter,
    align: TextAlign,
    indent: Option<CssValue>,
    white_space: WhiteSpace,
    font_size: f32,
}

impl ParagraphView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn align(&self) -> TextAlign {
        self.align
    }

    pub fn white_space(&self) -> WhiteSpace {
        self.white_space
    }

    fn indent(&self, avail: f32) -> f32 {
        self.indent
            .as_ref()
            .and_then(|v| v.to_points(self.font_size, avail))
            .unwrap_or(0.0)
    }

    /// Flow the children into lines `avail` wide.
    pub fn break_lines(&self, cx: &ViewCx<'_>, avail: f32) -> Vec<Line> {
        let metrics = cx.metrics();
        let wrap = self.white_space == WhiteSpace::Normal;
        let mut builder = LineBuilder {
            metrics,
            lines: Vec::new(),
            current: Line::default(),
            last_font: None,
            avail,
            indent: self.indent(avail),
            preformatted: self.white_space == WhiteSpace::Pre,
        };
        for (i, child) in cx.children().iter().enumerate() {
            let Some(run) = child.view().as_inline() else {
                let width = child.preferred_span(Axis::X);
                if wrap && !builder.fits(width) {
                    builder.finish_line(None);
                }
                builder.push_atomic(i, width, child.preferred_span(Axis::Y));
                if child.break_weight(Axis::X) == BreakWeight::Forced {
                    builder.finish_line(None);
                }
                continue;
            };
            let font = run.font();
            let ext = extents(metrics, run);
            let run_wraps = wrap && !run.is_nowrap();
            for (piece, hard) in pieces(run.text(), run_wraps, run.is_preformatted()) {
                let mut piece = piece;
                if !piece.is_empty() {
                    let needed = metrics.advance(piece.trim_end(), font);
                    if run_wraps && !builder.fits(needed) {
                        builder.finish_line(None);
                    }
                    if builder.is_empty() && !run.is_preformatted() {
                        piece = piece.trim_start();
                    }
                    if !piece.is_empty() {
                        builder.push_text(i, piece, font, ext);
                    }
                }
                if hard {
                    builder.finish_line(Some(ext));
                }
            }
        }
        builder.finish()
    }

    /// Walk the placed fragments of a paragraph allocated `alloc`, handing
    /// each its absolute x and the baseline of its line.
    fn for_each_fragment(&self, cx: &ViewCx<'_>, alloc: Rect, mut f: impl FnMut(&Fragment, f32, f32)) {
        let content = self.painter.content_rect(alloc);
        let indent = self.indent(content.w);
        let mut y = content.y;
        for (n, line) in self.break_lines(cx, content.w).iter().enumerate() {
            let start = if n == 0 { indent } else { 0.0 };
            let slack = (content.w - start - line.width).max(0.0);
            let x = content.x + start + slack * self.align.factor();
            let baseline = y + line.ascent;
            for fragment in &line.fragments {
                f(fragment, x + fragment.x, baseline);
            }
            y += line.height();
        }
    }
}

impl View for ParagraphView {
    fn name(&self) -> &'static str {
        "paragraph"
    }

    fn set_properties(&mut self, cx: &ViewCx<'_>) {
        let attrs = cx.attributes();
        self.font_size = cx.font_size();
        self.painter = BoxPainter::from_attributes(cx.sheet(), &attrs, self.font_size);
        self.align = attrs
            .keyword(CssProperty::TextAlign)
            .map_or(TextAlign::Left, |k| TextAlign::from_keyword(&k));
        self.indent = attrs.lookup(CssProperty::TextIndent);
        self.white_space = match attrs.keyword(CssProperty::WhiteSpace).as_deref() {
            Some("pre") => WhiteSpace::Pre,
            Some("nowrap") => WhiteSpace::Nowrap,
            _ => WhiteSpace::Normal,
        };
    }

    fn preferred_span(&self, cx: &ViewCx<'_>, axis: Axis) -> f32 {
        match axis {
            Axis::X => {
                let widest = self
                    .break_lines(cx, MAX_SPAN)
                    .iter()
                    .map(|l| l.width)
                    .fold(0.0, f32::max);
                widest + self.indent(0.0).max(0.0) + self.painter.insets_along(true)
            }
            Axis::Y => self.height_for_width(cx, self.preferred_span(cx, Axis::X)),
        }
    }

    fn minimum_span(&self, cx: &ViewCx<'_>, axis: Axis) -> f32 {
        if axis == Axis::Y {
            return self.preferred_span(cx, axis);
        }
        if self.white_space != WhiteSpace::Normal {
            return self.preferred_span(cx, axis);
        }
        let metrics = cx.metrics();
        let widest = cx
            .children()
            .iter()
            .map(|child| match child.view().as_inline() {
                Some(run) if run.is_nowrap() => child.preferred_span(Axis::X),
                Some(run) => run.longest_word_span(metrics),
                None => child.minimum_span(Axis::X),
            })
            .fold(0.0, f32::max);
        widest + self.painter.insets_along(true)
    }

    fn maximum_span(&self, cx: &ViewCx<'_>, axis: Axis) -> f32 {
        match axis {
            Axis::X => MAX_SPAN,
            Axis::Y => self.preferred_span(cx, axis),
        }
    }

    fn break_weight(&self, _cx: &ViewCx<'_>, axis: Axis) -> BreakWeight {
        if axis == Axis::X && self.white_space != WhiteSpace::Normal {
            BreakWeight::Bad
        } else {
            BreakWeight::Good
        }
    }

    fn height_for_width(&self, cx: &ViewCx<'_>, width: f32) -> f32 {
        let inner = (width - self.painter.insets_along(true)).max(0.0);
        let lines: f32 = self.break_lines(cx, inner).iter().map(Line::height).sum();
        lines + self.painter.insets_along(false)
    }

    fn layout(&self, cx: &ViewCx<'_>, alloc: Rect) -> Vec<Rect> {
        let mut rects: Vec<Option<Rect>> = vec![None; cx.child_count()];
        self.for_each_fragment(cx, alloc, |fragment, x, baseline| {
            let rect = Rect::new(x, baseline - fragment.ascent, fragment.width, fragment.ascent + fragment.descent);
            if let Some(slot) = rects.get_mut(fragment.child) {
                let merged = match *slot {
                    Some(existing) => existing.union(&rect),
                    None => rect,
                };
                *slot = Some(merged);
            }
        });
        rects
            .into_iter()
            .map(|r| r.unwrap_or(Rect::new(alloc.x, alloc.y, 0.0, 0.0)))
            .collect()
    }

    fn paint(&self, cx: &ViewCx<'_>, alloc: Rect, painter: &mut Painter) {
        self.painter.paint(alloc, painter);
        let children = cx.children();
        self.for_each_fragment(cx, alloc, |fragment, x, baseline| {
            let Some(child) = children.get(fragment.child) else { return };
            match (&fragment.kind, child.view().as_inline()) {
                (FragmentKind::Text(text), Some(run)) => {
                    run.paint_fragment(painter, text, x, baseline, fragment.width);
                }
                (FragmentKind::Atomic, _) => child.paint(painter),
                _ => {}
            }
        });
    }
}
