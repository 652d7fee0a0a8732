//! Attribute mux seen by a view.
//!
//! A view does not own style. It holds the translated presentation
//! attributes of its element, the element's inline `style` declaration and
//! handles to the resolved styles that match it. Lookups walk those in that
//! order; inherited properties that none of them define come from the
//! parent view.

use quill_dom::{Element, ElementRef, HtmlAttr, Tag};
use quill_style::{AttributeLookup, CssProperty, CssValue, Declaration, ResolvedId, StyleSheet};

use crate::tree::{ViewId, ViewTree};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewAttributes {
    translated: Declaration,
    inline: Declaration,
    resolved: Vec<ResolvedId>,
}

impl ViewAttributes {
    /// No local attributes; everything inherited comes from the parent.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn for_element(sheet: &StyleSheet, element: &ElementRef<'_>) -> Self {
        let mut attrs = Self::default();
        if element.is_leaf() {
            // outermost first so inner tags overwrite
            for inline in element.inline_tags() {
                attrs
                    .translated
                    .merge(&sheet.translate_html_to_css(&inline.tag, &inline.attributes));
                if let Some(style) = inline.attributes.get(&HtmlAttr::Style) {
                    attrs.inline.merge(&sheet.declaration(style));
                }
            }
            for inline in element.inline_tags().iter().rev() {
                if inline.tag == Tag::A && !inline.attributes.contains(&HtmlAttr::Href) {
                    continue;
                }
                attrs.resolved.push(sheet.rule_for_element(&inline.tag, element));
            }
        } else {
            let tag = element.tag();
            attrs.translated = sheet.translate_html_to_css(tag, element.attributes());
            if let Some(style) = element.attribute(&HtmlAttr::Style) {
                attrs.inline = sheet.declaration(style);
            }
            attrs.resolved.push(sheet.rule_for_element(tag, element));
        }
        attrs
    }

    pub fn translated(&self) -> &Declaration {
        &self.translated
    }

    pub fn inline_style(&self) -> &Declaration {
        &self.inline
    }

    pub fn resolved(&self) -> &[ResolvedId] {
        &self.resolved
    }

    /// First defined value among this view's own sources.
    pub fn lookup_local(&self, sheet: &StyleSheet, key: CssProperty) -> Option<CssValue> {
        if let Some(value) = self.translated.get(key).or_else(|| self.inline.get(key)) {
            return Some(value.clone());
        }
        self.resolved.iter().find_map(|id| sheet.get(*id, key))
    }
}

/// Attributes of one view, inheriting through its ancestors.
#[derive(Clone, Copy)]
pub struct AttrView<'a> {
    tree: &'a ViewTree,
    id: ViewId,
}

impl<'a> AttrView<'a> {
    pub(crate) fn new(tree: &'a ViewTree, id: ViewId) -> Self {
        Self { tree, id }
    }

    /// Look `key` up without consulting ancestors.
    pub fn lookup_local(&self, key: CssProperty) -> Option<CssValue> {
        let node = self.tree.node(self.id)?;
        node.attrs.lookup_local(self.tree.sheet(), key)
    }

    pub fn keyword(&self, key: CssProperty) -> Option<String> {
        match self.lookup(key)? {
            CssValue::Keyword(word) => Some(word),
            _ => None,
        }
    }
}

impl AttributeLookup for AttrView<'_> {
    fn lookup(&self, key: CssProperty) -> Option<CssValue> {
        let mut cursor = Some(self.id);
        while let Some(id) = cursor {
            let node = self.tree.node(id)?;
            if let Some(value) = node.attrs.lookup_local(self.tree.sheet(), key) {
                return Some(value);
            }
            if !key.is_inherited() {
                return None;
            }
            cursor = node.parent;
        }
        None
    }
}
