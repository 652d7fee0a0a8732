//! Margin, border, padding and background of a block.

use quill_style::{AttributeLookup, CssProperty, Rgba, StyleSheet};

use crate::display_list::Painter;
use crate::error::ViewError;
use crate::geometry::{Rect, Side};

/// Width of a border whose style is set but whose width is not.
const MEDIUM_BORDER: f32 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BorderStyle {
    #[default]
    None,
    Solid,
    Inset,
    Outset,
}

impl BorderStyle {
    fn from_keyword(word: &str) -> Self {
        match word {
            "none" | "hidden" => BorderStyle::None,
            "inset" => BorderStyle::Inset,
            "outset" => BorderStyle::Outset,
            // dotted, dashed, double, groove and ridge draw as solid lines
            _ => BorderStyle::Solid,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
struct Edges {
    top: f32,
    left: f32,
    bottom: f32,
    right: f32,
}

impl Edges {
    fn read(
        sheet: &StyleSheet,
        attrs: &dyn AttributeLookup,
        keys: [CssProperty; 4],
        font_size: f32,
    ) -> Self {
        let [top, left, bottom, right] = keys.map(|key| sheet.length(attrs, key, font_size, 0.0).max(0.0));
        Self { top, left, bottom, right }
    }

    fn get(&self, side: Side) -> f32 {
        match side {
            Side::Top => self.top,
            Side::Left => self.left,
            Side::Bottom => self.bottom,
            Side::Right => self.right,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct BoxPainter {
    margin: Edges,
    border: Edges,
    padding: Edges,
    border_style: BorderStyle,
    border_color: Rgba,
    background: Option<Rgba>,
    image: Option<String>,
}

impl BoxPainter {
    pub fn from_attributes(sheet: &StyleSheet, attrs: &dyn AttributeLookup, font_size: f32) -> Self {
        let margin = Edges::read(
            sheet,
            attrs,
            [
                CssProperty::MarginTop,
                CssProperty::MarginLeft,
                CssProperty::MarginBottom,
                CssProperty::MarginRight,
            ],
            font_size,
        );
        let padding = Edges::read(
            sheet,
            attrs,
            [
                CssProperty::PaddingTop,
                CssProperty::PaddingLeft,
                CssProperty::PaddingBottom,
                CssProperty::PaddingRight,
            ],
            font_size,
        );
        let border_style = attrs
            .lookup(CssProperty::BorderStyle)
            .and_then(|v| v.keyword().map(BorderStyle::from_keyword))
            .unwrap_or_default();
        let border = if border_style == BorderStyle::None {
            Edges::default()
        } else {
            let width = |key: CssProperty| {
                if attrs.is_defined(key) {
                    sheet.length(attrs, key, font_size, 0.0).max(0.0)
                } else {
                    MEDIUM_BORDER
                }
            };
            Edges {
                top: width(CssProperty::BorderTopWidth),
                left: width(CssProperty::BorderLeftWidth),
                bottom: width(CssProperty::BorderBottomWidth),
                right: width(CssProperty::BorderRightWidth),
            }
        };
        let border_color = attrs
            .lookup(CssProperty::BorderColor)
            .and_then(|v| v.color())
            .unwrap_or_else(|| sheet.foreground(attrs));
        Self {
            margin,
            border,
            padding,
            border_style,
            border_color,
            background: sheet.background(attrs),
            image: sheet.background_image(attrs),
        }
    }

    /// Space between the outer edge and the content on `side`.
    pub fn inset(&self, side: Side) -> f32 {
        self.margin.get(side) + self.border.get(side) + self.padding.get(side)
    }

    /// [`BoxPainter::inset`] for a raw side constant.
    pub fn inset_at(&self, side: i32) -> Result<f32, ViewError> {
        Side::try_from(side).map(|side| self.inset(side))
    }

    pub fn margin(&self, side: Side) -> f32 {
        self.margin.get(side)
    }

    pub fn border_width(&self, side: Side) -> f32 {
        self.border.get(side)
    }

    pub fn border_style(&self) -> BorderStyle {
        self.border_style
    }

    pub fn background(&self) -> Option<Rgba> {
        self.background
    }

    /// `alloc` shrunk by every inset.
    pub fn content_rect(&self, alloc: Rect) -> Rect {
        alloc.inset(
            self.inset(Side::Top),
            self.inset(Side::Left),
            self.inset(Side::Bottom),
            self.inset(Side::Right),
        )
    }

    /// Horizontal plus vertical insets.
    pub fn insets_along(&self, horizontal: bool) -> f32 {
        if horizontal {
            self.inset(Side::Left) + self.inset(Side::Right)
        } else {
            self.inset(Side::Top) + self.inset(Side::Bottom)
        }
    }

    pub fn paint(&self, alloc: Rect, painter: &mut Painter) {
        let r = alloc.inset(self.margin.top, self.margin.left, self.margin.bottom, self.margin.right);
        if r.w <= 0.0 || r.h <= 0.0 {
            return;
        }
        if let Some(bg) = self.background {
            painter.rect(r, bg);
        }
        if let Some(src) = &self.image {
            painter.image(r, src.as_str());
        }
        let (lit, shade) = match self.border_style {
            BorderStyle::None => return,
            BorderStyle::Solid => (self.border_color, self.border_color),
            BorderStyle::Outset => (self.border_color.brighter(), self.border_color.darker()),
            BorderStyle::Inset => (self.border_color.darker(), self.border_color.brighter()),
        };
        let b = self.border;
        if b.top > 0.0 {
            painter.rect(Rect::new(r.x, r.y, r.w, b.top), lit);
        }
        if b.left > 0.0 {
            painter.rect(Rect::new(r.x, r.y, b.left, r.h), lit);
        }
        if b.bottom > 0.0 {
            painter.rect(Rect::new(r.x, r.y + r.h - b.bottom, r.w, b.bottom), shade);
        }
        if b.right > 0.0 {
            painter.rect(Rect::new(r.x + r.w - b.right, r.y, b.right, r.h), shade);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display_list::{Command, Viewport};
    use quill_config::QuillConfig;

    fn painter_for(css: &str) -> BoxPainter {
        let sheet = StyleSheet::with_config(&QuillConfig::default());
        let decl = sheet.declaration(css);
        BoxPainter::from_attributes(&sheet, &decl, 10.0)
    }

    #[test]
    fn insets_sum_margin_border_padding() {
        let p = painter_for("margin: 1px 2px 3px 4px; padding: 5px; border-style: solid; border-top-width: 2px");
        assert_eq!(p.inset(Side::Top), 1.0 + 2.0 + 5.0);
        assert_eq!(p.inset(Side::Right), 2.0 + MEDIUM_BORDER + 5.0);
        assert_eq!(p.inset(Side::Bottom), 3.0 + MEDIUM_BORDER + 5.0);
        assert_eq!(p.inset(Side::Left), 4.0 + MEDIUM_BORDER + 5.0);
        assert_eq!(p.inset_at(1).unwrap(), p.inset(Side::Top));
    }

    #[test]
    fn raw_side_out_of_range_fails() {
        let p = painter_for("margin: 1px");
        assert!(matches!(p.inset_at(5), Err(ViewError::InvalidSide(5))));
        assert!(matches!(p.inset_at(0), Err(ViewError::InvalidSide(0))));
    }

    #[test]
    fn widths_without_style_are_ignored() {
        let p = painter_for("border-top-width: 4px; margin-left: 1em");
        assert_eq!(p.border_width(Side::Top), 0.0);
        assert_eq!(p.inset(Side::Left), 10.0);
    }

    #[test]
    fn paints_background_then_border() {
        let p = painter_for("background-color: #ff0000; border-style: outset; border-width: 1px; border-color: #808080; margin: 2px");
        let mut painter = Painter::begin_frame(Viewport::default());
        p.paint(Rect::new(0.0, 0.0, 20.0, 10.0), &mut painter);
        let list = painter.finish();
        assert_eq!(
            list.commands[0],
            Command::FillRect {
                rect: Rect::new(2.0, 2.0, 16.0, 6.0),
                color: Rgba::rgb(255, 0, 0)
            }
        );
        assert_eq!(list.commands.len(), 5);
        let top = &list.commands[1];
        assert_eq!(
            *top,
            Command::FillRect {
                rect: Rect::new(2.0, 2.0, 16.0, 1.0),
                color: Rgba::rgb(128, 128, 128).brighter()
            }
        );
    }

    #[test]
    fn zero_width_border_paints_nothing() {
        let p = painter_for("border-style: solid; border-width: 0");
        let mut painter = Painter::begin_frame(Viewport::default());
        p.paint(Rect::new(0.0, 0.0, 20.0, 10.0), &mut painter);
        assert!(painter.finish().commands.is_empty());
    }
}
