//! Embedded components: `object`/`applet` elements, form inputs and the
//! legacy `isindex` search prompt.

use quill_dom::{HtmlAttr, Tag, parse_int_or};
use quill_style::Rgba;
use tracing::debug;
use url::Url;
use url::form_urlencoded::byte_serialize;

use crate::display_list::Painter;
use crate::geometry::{Axis, Rect};
use crate::metrics::{FontSpec, TextMetrics};
use crate::sizes::MAX_SPAN;
use crate::tree::ViewCx;
use crate::view::View;

/// Marker shown for an object whose class cannot be embedded.
pub const UNLOADABLE_LABEL: &str = "??";
const UNLOADABLE_COLOR: Rgba = Rgba::rgb(255, 0, 0);
const FIELD_PADDING: f32 = 4.0;

/// A component an element can embed. Each kind accepts a closed set of
/// parameters.
#[derive(Debug, Clone, PartialEq)]
pub enum Embeddable {
    Label { text: String },
    Button { text: String, enabled: bool },
    TextField { text: String, columns: i32, editable: bool },
    CheckBox { text: String, selected: bool },
}

impl Embeddable {
    /// Component for an `object` class id.
    pub fn from_class(classid: &str) -> Option<Self> {
        let name = classid.trim().trim_start_matches("component:").to_ascii_lowercase();
        Some(match name.as_str() {
            "label" => Embeddable::Label { text: String::new() },
            "button" => Embeddable::Button {
                text: String::new(),
                enabled: true,
            },
            "text-field" | "textfield" => Embeddable::TextField {
                text: String::new(),
                columns: 20,
                editable: true,
            },
            "checkbox" | "check-box" => Embeddable::CheckBox {
                text: String::new(),
                selected: false,
            },
            _ => return None,
        })
    }

    /// Component for an `input` of the given `type`.
    pub fn from_input_type(kind: &str) -> Option<Self> {
        match kind.trim().to_ascii_lowercase().as_str() {
            "" | "text" | "password" => Self::from_class("text-field"),
            "checkbox" | "radio" => Self::from_class("checkbox"),
            "submit" | "reset" | "button" => Self::from_class("button"),
            _ => None,
        }
    }

    /// Apply one parameter. Returns false for names this kind does not
    /// know; those are ignored.
    pub fn set_param(&mut self, name: &str, value: &str) -> bool {
        let name = name.trim().to_ascii_lowercase();
        let flag = |v: &str| matches!(v.trim().to_ascii_lowercase().as_str(), "true" | "yes" | "1" | "" | "checked");
        match (self, name.as_str()) {
            (Embeddable::Label { text }, "text")
            | (Embeddable::Button { text, .. }, "text" | "label")
            | (Embeddable::TextField { text, .. }, "text")
            | (Embeddable::CheckBox { text, .. }, "text" | "label") => *text = value.to_string(),
            (Embeddable::Button { enabled, .. }, "enabled") => *enabled = flag(value),
            (Embeddable::TextField { columns, .. }, "columns") => *columns = parse_int_or(Some(value), *columns),
            (Embeddable::TextField { editable, .. }, "editable") => *editable = flag(value),
            (Embeddable::CheckBox { selected, .. }, "selected") => *selected = flag(value),
            _ => return false,
        }
        true
    }

    pub fn text(&self) -> &str {
        match self {
            Embeddable::Label { text }
            | Embeddable::Button { text, .. }
            | Embeddable::TextField { text, .. }
            | Embeddable::CheckBox { text, .. } => text,
        }
    }

    fn preferred_size(&self, metrics: &dyn TextMetrics, font: &FontSpec) -> (f32, f32) {
        let line = metrics.line_height(font);
        let text = metrics.advance(self.text(), font);
        match self {
            Embeddable::Label { .. } => (text, line),
            Embeddable::Button { .. } => (text + 2.0 * FIELD_PADDING, line + FIELD_PADDING),
            Embeddable::TextField { columns, .. } => {
                let column = metrics.advance("m", font);
                (column * (*columns).max(1) as f32 + FIELD_PADDING, line + FIELD_PADDING)
            }
            Embeddable::CheckBox { .. } => (line + FIELD_PADDING + text, line),
        }
    }

    fn paint(&self, painter: &mut Painter, metrics: &dyn TextMetrics, font: &FontSpec, color: Rgba, rect: Rect) {
        let baseline = rect.y + metrics.leading(font) / 2.0 + metrics.ascent(font);
        match self {
            Embeddable::Label { text } => painter.text(rect.x, baseline, text.as_str(), font, color),
            Embeddable::Button { text, enabled } => {
                painter.stroke_rect(rect, 1.0, Rgba::GRAY);
                let color = if *enabled { color } else { Rgba::GRAY };
                let baseline = baseline + FIELD_PADDING / 2.0;
                painter.text(rect.x + FIELD_PADDING, baseline, text.as_str(), font, color);
            }
            Embeddable::TextField { text, .. } => {
                painter.rect(rect, Rgba::WHITE);
                painter.stroke_rect(rect, 1.0, Rgba::GRAY);
                let baseline = baseline + FIELD_PADDING / 2.0;
                painter.text(rect.x + FIELD_PADDING / 2.0, baseline, text.as_str(), font, color);
            }
            Embeddable::CheckBox { text, selected } => {
                let side = metrics.line_height(font) * 0.75;
                let tick = Rect::new(rect.x, rect.y + (rect.h - side) / 2.0, side, side);
                painter.stroke_rect(tick, 1.0, color);
                if *selected {
                    painter.rect(tick.inset(2.0, 2.0, 2.0, 2.0), color);
                }
                let x = rect.x + metrics.line_height(font) + FIELD_PADDING;
                painter.text(x, baseline, text.as_str(), font, color);
            }
        }
    }
}

/// Hosts an [`Embeddable`] for `object`, `applet` and `input` elements.
#[derive(Debug, Clone, Default)]
pub struct ObjectView {
    component: Option<Embeddable>,
    font: Option<FontSpec>,
    color: Rgba,
}

impl ObjectView {
    pub fn new() -> Self {
        Self::default()
    }

    /// `None` when the element named something that cannot be embedded.
    pub fn component(&self) -> Option<&Embeddable> {
        self.component.as_ref()
    }

    fn size(&self, cx: &ViewCx<'_>) -> (f32, f32) {
        let font = self.font.clone().unwrap_or_else(|| cx.font());
        let metrics = cx.metrics();
        match &self.component {
            Some(component) => component.preferred_size(metrics, &font),
            None => (metrics.advance(UNLOADABLE_LABEL, &font), metrics.line_height(&font)),
        }
    }
}

impl View for ObjectView {
    fn name(&self) -> &'static str {
        "object"
    }

    fn set_properties(&mut self, cx: &ViewCx<'_>) {
        self.font = Some(cx.font());
        self.color = cx.sheet().foreground(&cx.attributes());
        let element = cx.element();
        let component = if element.tag == Tag::Input {
            let kind = element.attribute(&HtmlAttr::Type).unwrap_or("text");
            Embeddable::from_input_type(kind).map(|mut c| {
                if let Some(value) = element.attribute(&HtmlAttr::Value) {
                    c.set_param("text", value);
                }
                if element.attributes.contains(&HtmlAttr::from_name("checked")) {
                    c.set_param("selected", "true");
                }
                c
            })
        } else {
            let classid = element.attribute(&HtmlAttr::Classid).unwrap_or_default();
            Embeddable::from_class(classid).map(|mut c| {
                for param in cx.children().iter().filter(|p| *p.tag() == Tag::Param) {
                    let name = param.attribute(&HtmlAttr::Name).unwrap_or_default();
                    let value = param.attribute(&HtmlAttr::Value).unwrap_or_default();
                    if !c.set_param(name, value) {
                        debug!(param = name, "object parameter ignored");
                    }
                }
                c
            })
        };
        if component.is_none() {
            debug!(tag = %element.tag, "embedded component could not be created");
        }
        self.component = component;
    }

    fn preferred_span(&self, cx: &ViewCx<'_>, axis: Axis) -> f32 {
        let (w, h) = self.size(cx);
        match axis {
            Axis::X => w,
            Axis::Y => h,
        }
    }

    fn alignment(&self, _cx: &ViewCx<'_>, axis: Axis) -> f32 {
        match axis {
            Axis::X => 0.5,
            Axis::Y => 1.0,
        }
    }

    fn layout(&self, _cx: &ViewCx<'_>, _alloc: Rect) -> Vec<Rect> {
        Vec::new()
    }

    fn paint(&self, cx: &ViewCx<'_>, alloc: Rect, painter: &mut Painter) {
        let font = self.font.clone().unwrap_or_else(|| cx.font());
        let metrics = cx.metrics();
        match &self.component {
            Some(component) => component.paint(painter, metrics, &font, self.color, alloc),
            None => {
                let baseline = alloc.y + metrics.leading(&font) / 2.0 + metrics.ascent(&font);
                painter.text(alloc.x, baseline, UNLOADABLE_LABEL, &font, UNLOADABLE_COLOR);
            }
        }
    }
}

pub const DEFAULT_PROMPT: &str = "This is a searchable index.  Enter search keywords:";

/// Query URL for an index search: `action` (or the document base when
/// there is none) followed by `?` and the form-encoded query.
pub fn search_url(action: Option<&str>, base: Option<&Url>, query: &str) -> Option<String> {
    let target = match (action.map(str::trim).filter(|a| !a.is_empty()), base) {
        (Some(action), Some(base)) => base.join(action).map_or_else(|_| action.to_string(), |u| u.to_string()),
        (Some(action), None) => action.to_string(),
        (None, Some(base)) => base.to_string(),
        (None, None) => return None,
    };
    let encoded: String = byte_serialize(query.as_bytes()).collect();
    Some(format!("{target}?{encoded}"))
}

/// The `isindex` prompt: a line of text above a search field.
#[derive(Debug, Clone, Default)]
pub struct IsindexView {
    prompt: String,
    action: Option<String>,
    field: Option<Embeddable>,
}

impl IsindexView {
    pub fn new() -> Self {
        Self {
            prompt: DEFAULT_PROMPT.to_string(),
            action: None,
            field: Embeddable::from_class("text-field"),
        }
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// URL a search for `query` submits to.
    pub fn submit(&self, cx: &ViewCx<'_>, query: &str) -> Option<String> {
        let base = cx.sheet().base();
        search_url(self.action.as_deref(), base.as_ref(), query)
    }
}

impl View for IsindexView {
    fn name(&self) -> &'static str {
        "isindex"
    }

    fn set_properties(&mut self, cx: &ViewCx<'_>) {
        self.prompt = cx
            .attribute(&HtmlAttr::Prompt)
            .map_or_else(|| DEFAULT_PROMPT.to_string(), str::to_string);
        self.action = cx.attribute(&HtmlAttr::Action).map(str::to_string);
    }

    fn preferred_span(&self, cx: &ViewCx<'_>, axis: Axis) -> f32 {
        let font = cx.font();
        let metrics = cx.metrics();
        let (field_w, field_h) = self
            .field
            .as_ref()
            .map_or((0.0, 0.0), |f| f.preferred_size(metrics, &font));
        match axis {
            Axis::X => metrics.advance(&self.prompt, &font).max(field_w),
            Axis::Y => metrics.line_height(&font) + field_h,
        }
    }

    fn maximum_span(&self, cx: &ViewCx<'_>, axis: Axis) -> f32 {
        match axis {
            Axis::X => MAX_SPAN,
            Axis::Y => self.preferred_span(cx, axis),
        }
    }

    fn paint(&self, cx: &ViewCx<'_>, alloc: Rect, painter: &mut Painter) {
        let font = cx.font();
        let metrics = cx.metrics();
        let color = cx.sheet().foreground(&cx.attributes());
        let line = metrics.line_height(&font);
        let baseline = alloc.y + metrics.leading(&font) / 2.0 + metrics.ascent(&font);
        painter.text(alloc.x, baseline, self.prompt.as_str(), &font, color);
        if let Some(field) = &self.field {
            let (w, h) = field.preferred_size(metrics, &font);
            field.paint(painter, metrics, &font, color, Rect::new(alloc.x, alloc.y + line, w.min(alloc.w), h));
        }
    }
}
