//! Read access to attribute sets.

use crate::declaration::Declaration;
use crate::property::CssProperty;
use crate::sheet::{ResolvedId, StyleSheet};
use crate::value::{CssValue, Rgba};

/// Anything that can answer "what is the value of this property".
pub trait AttributeLookup {
    fn lookup(&self, key: CssProperty) -> Option<CssValue>;

    fn is_defined(&self, key: CssProperty) -> bool {
        self.lookup(key).is_some()
    }
}

impl AttributeLookup for Declaration {
    fn lookup(&self, key: CssProperty) -> Option<CssValue> {
        self.get(key).cloned()
    }
}

impl<T: AttributeLookup + ?Sized> AttributeLookup for &T {
    fn lookup(&self, key: CssProperty) -> Option<CssValue> {
        (**self).lookup(key)
    }
}

/// A resolved style paired with the sheet that owns it.
#[derive(Clone, Copy)]
pub struct ResolvedRef<'a> {
    pub sheet: &'a StyleSheet,
    pub id: ResolvedId,
}

impl AttributeLookup for ResolvedRef<'_> {
    fn lookup(&self, key: CssProperty) -> Option<CssValue> {
        self.sheet.get(self.id, key)
    }
}

impl StyleSheet {
    /// `color`, black when undefined.
    pub fn foreground(&self, attrs: &dyn AttributeLookup) -> Rgba {
        attrs
            .lookup(CssProperty::Color)
            .and_then(|v| v.color())
            .unwrap_or(Rgba::BLACK)
    }

    /// `background-color`; `None` when undefined or transparent.
    pub fn background(&self, attrs: &dyn AttributeLookup) -> Option<Rgba> {
        attrs
            .lookup(CssProperty::BackgroundColor)
            .and_then(|v| v.color())
            .filter(|c| c.a > 0)
    }

    /// `background-image` resolved against the sheet's base.
    pub fn background_image(&self, attrs: &dyn AttributeLookup) -> Option<String> {
        let value = attrs.lookup(CssProperty::BackgroundImage)?;
        let href = value.url()?;
        Some(match self.base().map(|base| base.join(href)) {
            Some(Ok(url)) => url.to_string(),
            _ => href.to_string(),
        })
    }

    /// A length property in points. Percentages resolve against
    /// `reference`; undefined or non-length values give zero.
    pub fn length(
        &self,
        attrs: &dyn AttributeLookup,
        key: CssProperty,
        font_size: f32,
        reference: f32,
    ) -> f32 {
        attrs
            .lookup(key)
            .and_then(|v| v.to_points(font_size, reference))
            .unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_config::QuillConfig;

    #[test]
    fn color_helpers() {
        let sheet = StyleSheet::with_config(&QuillConfig::default());
        let mut decl = Declaration::new();
        assert_eq!(sheet.foreground(&decl), Rgba::BLACK);
        assert_eq!(sheet.background(&decl), None);
        decl.add_css_attribute("background", "transparent");
        assert_eq!(sheet.background(&decl), None);
        decl.add_css_attribute("background-color", "#ff0000");
        decl.add_css_attribute("color", "navy");
        assert_eq!(sheet.background(&decl), Some(Rgba::rgb(255, 0, 0)));
        assert_eq!(sheet.foreground(&decl), Rgba::rgb(0, 0, 128));
    }

    #[test]
    fn lengths_resolve_to_points() {
        let sheet = StyleSheet::with_config(&QuillConfig::default());
        let mut decl = Declaration::new();
        decl.add_css_attribute("margin-left", "2em");
        decl.add_css_attribute("width", "50%");
        assert_eq!(sheet.length(&decl, CssProperty::MarginLeft, 10.0, 0.0), 20.0);
        assert_eq!(sheet.length(&decl, CssProperty::Width, 10.0, 300.0), 150.0);
        assert_eq!(sheet.length(&decl, CssProperty::MarginTop, 10.0, 0.0), 0.0);
    }

    #[test]
    fn background_image_uses_base() {
        let sheet = StyleSheet::with_config(&QuillConfig::default());
        sheet.set_base(url::Url::parse("file:///site/css/main.css").ok());
        let mut decl = Declaration::new();
        decl.add_css_attribute("background-image", "url(bg.png)");
        assert_eq!(
            sheet.background_image(&decl).as_deref(),
            Some("file:///site/css/bg.png")
        );
    }
}
