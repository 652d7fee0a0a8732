use quill_dom::{HtmlAttr, parse_int_or};
use quill_style::{AttributeLookup, CssProperty, Rgba};

use crate::box_painter::BoxPainter;
use crate::display_list::Painter;
use crate::geometry::{Axis, Rect, Side};
use crate::tree::ViewCx;
use crate::view::View;

/// Size given to an image whose dimensions are not declared.
const DEFAULT_SIZE: f32 = 38.0;

/// An inline image. Pixels are never decoded; the view reserves the
/// declared size and paints an image reference, or the alt text when no
/// source is given.
#[derive(Debug, Clone, Default)]
pub struct ImageView {
    src: Option<String>,
    alt: Option<String>,
    width: Option<f32>,
    height: Option<f32>,
    hspace: f32,
    vspace: f32,
    vertical_align: f32,
    painter: BoxPainter,
    color: Rgba,
}

impl ImageView {
    pub fn new() -> Self {
        Self {
            vertical_align: 1.0,
            ..Self::default()
        }
    }

    pub fn src(&self) -> Option<&str> {
        self.src.as_deref()
    }

    pub fn alt(&self) -> Option<&str> {
        self.alt.as_deref()
    }

    /// Border width declared through the `border` attribute or CSS.
    pub fn border(&self) -> f32 {
        self.painter.border_width(Side::Top)
    }

    fn content(&self, axis: Axis) -> f32 {
        let declared = match axis {
            Axis::X => self.width,
            Axis::Y => self.height,
        };
        declared.unwrap_or(DEFAULT_SIZE)
    }

    fn extra(&self, axis: Axis) -> f32 {
        match axis {
            Axis::X => 2.0 * self.hspace + self.painter.insets_along(true),
            Axis::Y => 2.0 * self.vspace + self.painter.insets_along(false),
        }
    }
}

impl View for ImageView {
    fn name(&self) -> &'static str {
        "image"
    }

    fn set_properties(&mut self, cx: &ViewCx<'_>) {
        let attrs = cx.attributes();
        let font_size = cx.font_size();
        let sheet = cx.sheet();
        self.src = cx.attribute(&HtmlAttr::Src).map(|src| match sheet.base().map(|b| b.join(src)) {
            Some(Ok(url)) => url.to_string(),
            _ => src.to_string(),
        });
        self.alt = cx.attribute(&HtmlAttr::Alt).map(str::to_string);
        let declared = |key: CssProperty| {
            attrs
                .lookup(key)
                .and_then(|v| v.to_points(font_size, 0.0))
                .filter(|v| *v > 0.0)
        };
        self.width = declared(CssProperty::Width);
        self.height = declared(CssProperty::Height);
        self.hspace = parse_int_or(cx.attribute(&HtmlAttr::Hspace), 0).max(0) as f32;
        self.vspace = parse_int_or(cx.attribute(&HtmlAttr::Vspace), 0).max(0) as f32;
        self.vertical_align = match cx.attribute(&HtmlAttr::Align).map(str::to_ascii_lowercase).as_deref() {
            Some("top") => 0.0,
            Some("middle") | Some("absmiddle") | Some("center") => 0.5,
            _ => 1.0,
        };
        self.painter = BoxPainter::from_attributes(sheet, &attrs, font_size);
        self.color = sheet.foreground(&attrs);
    }

    fn preferred_span(&self, _cx: &ViewCx<'_>, axis: Axis) -> f32 {
        self.content(axis) + self.extra(axis)
    }

    fn alignment(&self, _cx: &ViewCx<'_>, axis: Axis) -> f32 {
        match axis {
            Axis::X => 0.5,
            Axis::Y => self.vertical_align,
        }
    }

    fn paint(&self, cx: &ViewCx<'_>, alloc: Rect, painter: &mut Painter) {
        let alloc = alloc.inset(self.vspace, self.hspace, self.vspace, self.hspace);
        self.painter.paint(alloc, painter);
        let content = self.painter.content_rect(alloc);
        match (&self.src, &self.alt) {
            (Some(src), _) => painter.image(content, src.as_str()),
            (None, Some(alt)) => {
                painter.stroke_rect(content, 1.0, Rgba::GRAY);
                let font = cx.font();
                let baseline = content.y + cx.metrics().ascent(&font);
                painter.text(content.x + 1.0, baseline, alt.as_str(), &font, self.color);
            }
            (None, None) => painter.stroke_rect(content, 1.0, Rgba::GRAY),
        }
    }
}
