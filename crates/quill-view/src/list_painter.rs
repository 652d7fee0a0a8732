//! List markers: bullets, numbers, letters and image markers.

use quill_config::LayoutConfig;
use quill_dom::{Attributes, HtmlAttr, Tag, parse_int_or};
use quill_style::{AttributeLookup, CssProperty, Rgba, StyleSheet};

use crate::display_list::Painter;
use crate::geometry::Rect;
use crate::metrics::{FontSpec, TextMetrics};

/// Side of a square, circle or disc bullet.
const BULLET_SIZE: f32 = 7.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListStyle {
    Disc,
    Circle,
    Square,
    Decimal,
    LowerAlpha,
    UpperAlpha,
    LowerRoman,
    UpperRoman,
    None,
}

impl ListStyle {
    pub fn from_keyword(word: &str) -> Option<Self> {
        Some(match word {
            "disc" => ListStyle::Disc,
            "circle" => ListStyle::Circle,
            "square" => ListStyle::Square,
            "decimal" => ListStyle::Decimal,
            "lower-alpha" | "lower-latin" => ListStyle::LowerAlpha,
            "upper-alpha" | "upper-latin" => ListStyle::UpperAlpha,
            "lower-roman" => ListStyle::LowerRoman,
            "upper-roman" => ListStyle::UpperRoman,
            "none" => ListStyle::None,
            _ => return None,
        })
    }

    fn lookup(attrs: &dyn AttributeLookup) -> Option<Self> {
        attrs
            .lookup(CssProperty::ListStyleType)
            .and_then(|v| v.keyword().and_then(ListStyle::from_keyword))
    }

    /// Marker text for item number `n`, or `None` for shape markers.
    pub fn format(self, n: i32) -> Option<String> {
        let label = match self {
            ListStyle::Decimal => n.to_string(),
            ListStyle::LowerAlpha => alpha(n).to_ascii_lowercase(),
            ListStyle::UpperAlpha => alpha(n),
            ListStyle::LowerRoman => roman(n).to_ascii_lowercase(),
            ListStyle::UpperRoman => roman(n),
            ListStyle::Disc | ListStyle::Circle | ListStyle::Square | ListStyle::None => return None,
        };
        Some(format!("{label}."))
    }
}

/// A, B, .. Z, AA, AB, ..; numbers below one stay decimal.
fn alpha(n: i32) -> String {
    if n < 1 {
        return n.to_string();
    }
    let mut n = n as u32;
    let mut out = Vec::new();
    while n > 0 {
        n -= 1;
        out.push(b'A' + (n % 26) as u8);
        n /= 26;
    }
    out.reverse();
    String::from_utf8_lossy(&out).into_owned()
}

/// Roman numerals for 1..=3999; anything else stays decimal.
fn roman(n: i32) -> String {
    if !(1..=3999).contains(&n) {
        return n.to_string();
    }
    const TABLE: [(i32, &str); 13] = [
        (1000, "M"),
        (900, "CM"),
        (500, "D"),
        (400, "CD"),
        (100, "C"),
        (90, "XC"),
        (50, "L"),
        (40, "XL"),
        (10, "X"),
        (9, "IX"),
        (5, "V"),
        (4, "IV"),
        (1, "I"),
    ];
    let mut n = n;
    let mut out = String::new();
    for (value, digits) in TABLE {
        while n >= value {
            out.push_str(digits);
            n -= value;
        }
    }
    out
}

/// One child of a list, as far as numbering is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListChild {
    Item { value: Option<i32> },
    Other,
}

impl ListChild {
    pub fn new(tag: &Tag, attributes: &Attributes) -> Self {
        if *tag != Tag::Li {
            return ListChild::Other;
        }
        let value = attributes
            .get(&HtmlAttr::Value)
            .and_then(|v| v.trim().parse::<i32>().ok());
        ListChild::Item { value }
    }
}

/// Number shown for the child at `index`. Counting restarts from the
/// nearest earlier item carrying an explicit value; children that are not
/// items are not counted.
pub fn render_index(children: &[ListChild], index: usize, start: i32) -> i32 {
    let mut number = index as i32;
    for (counter, child) in children.iter().enumerate().take(index.saturating_add(1)).rev() {
        match *child {
            ListChild::Other => number -= 1,
            ListChild::Item { value: Some(value) } => return number - counter as i32 + value,
            ListChild::Item { value: None } => {}
        }
    }
    number + start
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListPainter {
    style: Option<ListStyle>,
    ordered: bool,
    start: i32,
    bullet_gap: f32,
    image: Option<String>,
}

impl ListPainter {
    pub fn from_attributes(
        sheet: &StyleSheet,
        attrs: &dyn AttributeLookup,
        tag: &Tag,
        html: &Attributes,
        config: &LayoutConfig,
    ) -> Self {
        let image = attrs
            .lookup(CssProperty::ListStyleImage)
            .and_then(|v| v.url().map(str::to_string))
            .map(|href| match sheet.base().map(|base| base.join(&href)) {
                Some(Ok(url)) => url.to_string(),
                _ => href,
            });
        let style = if image.is_some() { None } else { ListStyle::lookup(attrs) };
        Self {
            style,
            ordered: *tag == Tag::Ol,
            start: parse_int_or(html.get(&HtmlAttr::Start), 1),
            bullet_gap: config.bullet_gap,
            image,
        }
    }

    pub fn start(&self) -> i32 {
        self.start
    }

    pub fn image(&self) -> Option<&str> {
        self.image.as_deref()
    }

    /// Marker style of an item: its own type, else the list's, else
    /// decimal for ordered lists and disc otherwise.
    pub fn child_style(&self, child: Option<&dyn AttributeLookup>) -> ListStyle {
        child
            .and_then(ListStyle::lookup)
            .or(self.style)
            .unwrap_or(if self.ordered { ListStyle::Decimal } else { ListStyle::Disc })
    }

    /// Paint the marker for an item allocated `item` with number `n`.
    #[allow(clippy::too_many_arguments)]
    pub fn paint_marker(
        &self,
        painter: &mut Painter,
        metrics: &dyn TextMetrics,
        font: &FontSpec,
        color: Rgba,
        item: Rect,
        style: ListStyle,
        n: i32,
    ) {
        let line = metrics.line_height(font).min(item.h.max(0.0));
        let shape_y = item.y + line * 0.5 - 3.0;
        if let Some(src) = &self.image {
            let x = item.x - BULLET_SIZE - self.bullet_gap;
            painter.image(Rect::new(x, shape_y, BULLET_SIZE, BULLET_SIZE), src.as_str());
            return;
        }
        let shape = Rect::new(item.x - self.bullet_gap - BULLET_SIZE, shape_y, BULLET_SIZE, BULLET_SIZE);
        match style {
            ListStyle::None => {}
            ListStyle::Square => painter.stroke_rect(shape, 1.0, color),
            ListStyle::Circle => painter.stroke_ellipse(shape, color),
            ListStyle::Disc => painter.ellipse(shape, color),
            numbered => {
                let Some(label) = numbered.format(n) else { return };
                let width = metrics.advance(&label, font);
                let half_leading = metrics.leading(font) / 2.0;
                let baseline = item.y + half_leading + metrics.ascent(font);
                painter.text(item.x - width - self.bullet_gap, baseline, label, font, color);
            }
        }
    }
}
