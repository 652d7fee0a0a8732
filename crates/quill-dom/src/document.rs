//! Element arena.
//!
//! Elements live in a flat vector and refer to each other by [`ElementId`].
//! Removal marks a slot dead instead of compacting, so ids handed out to
//! views never alias a different element.

use crate::attr::{Attributes, HtmlAttr};
use crate::error::DomError;
use crate::tag::Tag;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(u32);

impl ElementId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Whether an element was written by an author or fabricated while building
/// the tree (an implied paragraph, for instance).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    Authored,
    Synthesized,
}

/// An inline tag enclosing a content run, with its own attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineTag {
    pub tag: Tag,
    pub attributes: Attributes,
}

impl InlineTag {
    pub fn new(tag: Tag) -> Self {
        Self {
            tag,
            attributes: Attributes::new(),
        }
    }

    pub fn with(mut self, key: HtmlAttr, value: impl Into<String>) -> Self {
        self.attributes.set(key, value);
        self
    }
}

#[derive(Debug, Clone)]
pub enum ElementKind {
    Branch {
        tag: Tag,
        attributes: Attributes,
        children: Vec<ElementId>,
    },
    /// A run of text. `inline` lists the enclosing inline tags outermost
    /// first.
    Content {
        text: String,
        inline: Vec<InlineTag>,
        attributes: Attributes,
    },
}

#[derive(Debug, Clone)]
struct Node {
    origin: Origin,
    parent: Option<ElementId>,
    kind: ElementKind,
    alive: bool,
}

#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
    root: ElementId,
    editable: bool,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// A document holding a single authored `html` root.
    pub fn new() -> Self {
        Self::with_root(Tag::Html, Attributes::new())
    }

    pub fn with_root(tag: Tag, attributes: Attributes) -> Self {
        let root = Node {
            origin: Origin::Authored,
            parent: None,
            kind: ElementKind::Branch {
                tag,
                attributes,
                children: Vec::new(),
            },
            alive: true,
        };
        Self {
            nodes: vec![root],
            root: ElementId(0),
            editable: false,
        }
    }

    pub fn root(&self) -> ElementId {
        self.root
    }

    pub fn is_editable(&self) -> bool {
        self.editable
    }

    pub fn set_editable(&mut self, editable: bool) {
        self.editable = editable;
    }

    pub fn append_element(
        &mut self,
        parent: ElementId,
        tag: Tag,
        attributes: Attributes,
    ) -> Result<ElementId, DomError> {
        self.push(
            parent,
            Origin::Authored,
            ElementKind::Branch {
                tag,
                attributes,
                children: Vec::new(),
            },
        )
    }

    /// Append an element the author did not write, such as an implied `p`.
    pub fn append_synthesized(&mut self, parent: ElementId, tag: Tag) -> Result<ElementId, DomError> {
        self.push(
            parent,
            Origin::Synthesized,
            ElementKind::Branch {
                tag,
                attributes: Attributes::new(),
                children: Vec::new(),
            },
        )
    }

    pub fn append_text(
        &mut self,
        parent: ElementId,
        text: impl Into<String>,
        inline: Vec<InlineTag>,
    ) -> Result<ElementId, DomError> {
        self.push(
            parent,
            Origin::Authored,
            ElementKind::Content {
                text: text.into(),
                inline,
                attributes: Attributes::new(),
            },
        )
    }

    fn push(&mut self, parent: ElementId, origin: Origin, kind: ElementKind) -> Result<ElementId, DomError> {
        let id = ElementId(self.nodes.len() as u32);
        match &mut self.node_mut(parent)?.kind {
            ElementKind::Branch { children, .. } => children.push(id),
            ElementKind::Content { .. } => return Err(DomError::NotABranch(parent)),
        }
        self.nodes.push(Node {
            origin,
            parent: Some(parent),
            kind,
            alive: true,
        });
        Ok(id)
    }

    /// Detach `id` and its descendants. The root cannot be removed.
    pub fn remove(&mut self, id: ElementId) -> Result<(), DomError> {
        let parent = self.node(id)?.parent.ok_or(DomError::StaleElement(id))?;
        if let ElementKind::Branch { children, .. } = &mut self.node_mut(parent)?.kind {
            children.retain(|c| *c != id);
        }
        let mut pending = vec![id];
        while let Some(next) = pending.pop() {
            let node = &mut self.nodes[next.index()];
            node.alive = false;
            if let ElementKind::Branch { children, .. } = &node.kind {
                pending.extend(children.iter().copied());
            }
        }
        Ok(())
    }

    fn node(&self, id: ElementId) -> Result<&Node, DomError> {
        self.nodes
            .get(id.index())
            .filter(|n| n.alive)
            .ok_or(DomError::StaleElement(id))
    }

    fn node_mut(&mut self, id: ElementId) -> Result<&mut Node, DomError> {
        self.nodes
            .get_mut(id.index())
            .filter(|n| n.alive)
            .ok_or(DomError::StaleElement(id))
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.node(id).is_ok()
    }

    pub fn get(&self, id: ElementId) -> Result<ElementRef<'_>, DomError> {
        self.node(id)?;
        Ok(ElementRef { doc: self, id })
    }

    pub fn kind(&self, id: ElementId) -> Result<&ElementKind, DomError> {
        Ok(&self.node(id)?.kind)
    }

    pub fn origin(&self, id: ElementId) -> Result<Origin, DomError> {
        Ok(self.node(id)?.origin)
    }

    pub fn parent(&self, id: ElementId) -> Result<Option<ElementId>, DomError> {
        Ok(self.node(id)?.parent)
    }

    pub fn children(&self, id: ElementId) -> Result<&[ElementId], DomError> {
        Ok(match &self.node(id)?.kind {
            ElementKind::Branch { children, .. } => children,
            ElementKind::Content { .. } => &[],
        })
    }

    pub fn set_attribute(&mut self, id: ElementId, key: HtmlAttr, value: impl Into<String>) -> Result<(), DomError> {
        match &mut self.node_mut(id)?.kind {
            ElementKind::Branch { attributes, .. } | ElementKind::Content { attributes, .. } => {
                attributes.set(key, value)
            }
        }
        Ok(())
    }

    /// Ids of `id` and its ancestors, nearest first.
    pub fn path(&self, id: ElementId) -> Result<Vec<ElementId>, DomError> {
        let mut out = Vec::new();
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            out.push(current);
            cursor = self.node(current)?.parent;
        }
        Ok(out)
    }

    /// Every live element below `id` in document order, `id` included.
    pub fn descendants(&self, id: ElementId) -> Result<Vec<ElementId>, DomError> {
        let mut out = Vec::new();
        let mut pending = vec![id];
        while let Some(next) = pending.pop() {
            out.push(next);
            pending.extend(self.children(next)?.iter().rev().copied());
        }
        Ok(out)
    }
}

/// Read access to one element, the interface the style resolver consumes.
pub trait Element {
    /// The element's tag. Content runs report [`Tag::Content`].
    fn tag(&self) -> &Tag;
    fn attribute(&self, key: &HtmlAttr) -> Option<&str>;
    fn attributes(&self) -> &Attributes;
    fn parent(&self) -> Option<Self>
    where
        Self: Sized;
    fn is_leaf(&self) -> bool;
    /// Attributes of the enclosing inline `tag` of a content run.
    fn inline_attributes(&self, tag: &Tag) -> Option<&Attributes>;
}

/// A borrowed handle on one live element.
#[derive(Debug, Clone, Copy)]
pub struct ElementRef<'a> {
    doc: &'a Document,
    id: ElementId,
}

impl<'a> ElementRef<'a> {
    pub fn id(&self) -> ElementId {
        self.id
    }

    pub fn document(&self) -> &'a Document {
        self.doc
    }

    fn node(&self) -> &'a Node {
        &self.doc.nodes[self.id.index()]
    }

    pub fn origin(&self) -> Origin {
        self.node().origin
    }

    pub fn text(&self) -> Option<&'a str> {
        match &self.node().kind {
            ElementKind::Content { text, .. } => Some(text),
            ElementKind::Branch { .. } => None,
        }
    }

    /// Enclosing inline tags, outermost first. Empty for branches.
    pub fn inline_tags(&self) -> &'a [InlineTag] {
        match &self.node().kind {
            ElementKind::Content { inline, .. } => inline,
            ElementKind::Branch { .. } => &[],
        }
    }

    pub fn children(&self) -> &'a [ElementId] {
        match &self.node().kind {
            ElementKind::Branch { children, .. } => children,
            ElementKind::Content { .. } => &[],
        }
    }

    /// Index of this element among its parent's children.
    pub fn index_in_parent(&self) -> Option<usize> {
        let parent = self.node().parent?;
        self.doc
            .children(parent)
            .ok()?
            .iter()
            .position(|c| *c == self.id)
    }
}

impl Element for ElementRef<'_> {
    fn tag(&self) -> &Tag {
        match &self.node().kind {
            ElementKind::Branch { tag, .. } => tag,
            ElementKind::Content { .. } => &Tag::Content,
        }
    }

    fn attribute(&self, key: &HtmlAttr) -> Option<&str> {
        self.attributes().get(key)
    }

    fn attributes(&self) -> &Attributes {
        match &self.node().kind {
            ElementKind::Branch { attributes, .. } | ElementKind::Content { attributes, .. } => {
                attributes
            }
        }
    }

    fn parent(&self) -> Option<Self> {
        self.node().parent.map(|id| ElementRef { doc: self.doc, id })
    }

    fn is_leaf(&self) -> bool {
        matches!(self.node().kind, ElementKind::Content { .. })
    }

    fn inline_attributes(&self, tag: &Tag) -> Option<&Attributes> {
        self.inline_tags()
            .iter()
            .rev()
            .find(|inline| &inline.tag == tag)
            .map(|inline| &inline.attributes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (Document, ElementId, ElementId) {
        let mut doc = Document::new();
        let body = doc.append_element(doc.root(), Tag::Body, Attributes::new()).unwrap();
        let p = doc
            .append_element(body, Tag::P, Attributes::new().with(HtmlAttr::Class, "note"))
            .unwrap();
        let run = doc
            .append_text(p, "hello", vec![InlineTag::new(Tag::B).with(HtmlAttr::Id, "x")])
            .unwrap();
        (doc, p, run)
    }

    #[test]
    fn element_interface() {
        let (doc, p, run) = sample();
        let leaf = doc.get(run).unwrap();
        assert!(leaf.is_leaf());
        assert_eq!(leaf.tag(), &Tag::Content);
        assert_eq!(leaf.parent().map(|e| e.id()), Some(p));
        assert_eq!(
            leaf.inline_attributes(&Tag::B).and_then(|a| a.get(&HtmlAttr::Id)),
            Some("x")
        );
        assert!(leaf.inline_attributes(&Tag::I).is_none());
        assert_eq!(doc.get(p).unwrap().attribute(&HtmlAttr::Class), Some("note"));
    }

    #[test]
    fn content_runs_cannot_have_children() {
        let (mut doc, _, run) = sample();
        assert!(matches!(
            doc.append_element(run, Tag::Span, Attributes::new()),
            Err(DomError::NotABranch(_))
        ));
    }

    #[test]
    fn removal_marks_subtree_stale() {
        let (mut doc, p, run) = sample();
        doc.remove(p).unwrap();
        assert!(!doc.contains(p));
        assert!(matches!(doc.get(run), Err(DomError::StaleElement(_))));
        assert!(doc.remove(doc.root()).is_err());
    }

    #[test]
    fn path_is_nearest_first() {
        let (doc, p, run) = sample();
        let path = doc.path(run).unwrap();
        assert_eq!(path.len(), 4);
        assert_eq!(path[1], p);
        assert_eq!(*path.last().unwrap(), doc.root());
    }

    #[test]
    fn synthesized_origin() {
        let mut doc = Document::new();
        let implied = doc.append_synthesized(doc.root(), Tag::P).unwrap();
        assert_eq!(doc.origin(implied).unwrap(), Origin::Synthesized);
        assert_eq!(doc.origin(doc.root()).unwrap(), Origin::Authored);
    }
}
