//! The view arena.
//!
//! Views live in a flat vector addressed by [`ViewId`]. A node owns its
//! child ids, points at its parent, and carries a snapshot of its element
//! together with the [`ViewAttributes`] handles into the style sheet.
//! Removing a subtree empties its slots; ids are never reused.

use std::sync::Arc;

use quill_config::{LayoutConfig, QuillConfig};
use quill_dom::{Attributes, Document, Element, ElementId, ElementRef, HtmlAttr, InlineTag, Tag};
use quill_style::{AttributeLookup, CssProperty, CssValue, StyleSheet};
use tracing::{debug, info};

use crate::attributes::{AttrView, ViewAttributes};
use crate::display_list::{DisplayList, Painter, Viewport};
use crate::error::ViewError;
use crate::factory::ViewFactory;
use crate::geometry::{Axis, Rect};
use crate::metrics::{FixedMetrics, FontSpec, TextMetrics};
use crate::sizes::SizeRequirements;
use crate::view::{BreakWeight, View};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ViewId(u32);

impl ViewId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// What a view keeps of its element.
#[derive(Debug, Clone)]
pub struct ElementData {
    pub id: ElementId,
    pub tag: Tag,
    pub attributes: Attributes,
    pub text: Option<String>,
    pub inline: Vec<InlineTag>,
}

impl ElementData {
    fn from_element(element: &ElementRef<'_>) -> Self {
        Self {
            id: element.id(),
            tag: element.tag().clone(),
            attributes: element.attributes().clone(),
            text: element.text().map(str::to_string),
            inline: element.inline_tags().to_vec(),
        }
    }

    pub fn attribute(&self, key: &HtmlAttr) -> Option<&str> {
        self.attributes.get(key)
    }

    /// True when the run sits inside the inline `tag`.
    pub fn has_inline(&self, tag: &Tag) -> bool {
        self.inline.iter().any(|i| &i.tag == tag)
    }
}

pub(crate) struct ViewNode {
    pub(crate) element: ElementData,
    pub(crate) implied: bool,
    pub(crate) parent: Option<ViewId>,
    pub(crate) children: Vec<ViewId>,
    pub(crate) attrs: ViewAttributes,
    pub(crate) view: Box<dyn View>,
    pub(crate) alloc: Rect,
}

/// Stands in for a view while its properties are being refreshed.
struct Detached;

impl View for Detached {
    fn name(&self) -> &'static str {
        "detached"
    }

    fn preferred_span(&self, _cx: &ViewCx<'_>, _axis: Axis) -> f32 {
        0.0
    }
}

pub struct ViewTree {
    nodes: Vec<Option<ViewNode>>,
    root: Option<ViewId>,
    sheet: Arc<StyleSheet>,
    metrics: Arc<dyn TextMetrics>,
    layout: LayoutConfig,
    editable: bool,
    diagnostics: bool,
}

impl ViewTree {
    pub fn new(sheet: Arc<StyleSheet>, config: &QuillConfig) -> Self {
        Self {
            nodes: Vec::new(),
            root: None,
            sheet,
            metrics: Arc::new(FixedMetrics::new(&config.layout)),
            layout: config.layout.clone(),
            editable: false,
            diagnostics: config.diagnostics_enabled("layout"),
        }
    }

    pub fn with_metrics(mut self, metrics: Arc<dyn TextMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    /// Realize views for every element of `doc`, replacing any previous
    /// tree.
    pub fn build(&mut self, doc: &Document, factory: &dyn ViewFactory) -> Result<ViewId, ViewError> {
        self.nodes.clear();
        self.root = None;
        self.editable = doc.is_editable();
        let root = doc.get(doc.root())?;
        let id = self.realize(doc, factory, &root, None)?;
        self.root = Some(id);
        self.refresh();
        debug!(views = self.nodes.len(), "view tree built");
        Ok(id)
    }

    fn realize(
        &mut self,
        doc: &Document,
        factory: &dyn ViewFactory,
        element: &ElementRef<'_>,
        parent: Option<ViewId>,
    ) -> Result<ViewId, ViewError> {
        let node = ViewNode {
            element: ElementData::from_element(element),
            implied: false,
            parent,
            children: Vec::new(),
            attrs: ViewAttributes::for_element(&self.sheet, element),
            view: factory.create(element),
            alloc: Rect::ZERO,
        };
        let id = self.push(node);
        if element.is_leaf() {
            return Ok(id);
        }

        let group = factory.groups_inline(element.tag());
        let mut pending = Vec::new();
        for child_id in element.children() {
            let child = doc.get(*child_id)?;
            if group && factory.is_inline(&child) {
                pending.push(child);
                continue;
            }
            self.flush_implied(doc, factory, id, element, &mut pending)?;
            self.realize(doc, factory, &child, Some(id))?;
        }
        self.flush_implied(doc, factory, id, element, &mut pending)?;
        Ok(id)
    }

    /// Wrap a run of loose inline children in an implied paragraph.
    fn flush_implied<'d>(
        &mut self,
        doc: &'d Document,
        factory: &dyn ViewFactory,
        parent: ViewId,
        parent_element: &ElementRef<'_>,
        pending: &mut Vec<ElementRef<'d>>,
    ) -> Result<(), ViewError> {
        if pending.is_empty() {
            return Ok(());
        }
        let blank = pending
            .iter()
            .all(|e| e.text().is_some_and(|t| t.trim().is_empty()));
        if blank {
            pending.clear();
            return Ok(());
        }
        let node = ViewNode {
            element: ElementData {
                id: parent_element.id(),
                tag: Tag::P,
                attributes: Attributes::new(),
                text: None,
                inline: Vec::new(),
            },
            implied: true,
            parent: Some(parent),
            children: Vec::new(),
            attrs: ViewAttributes::empty(),
            view: factory.create_implied(),
            alloc: Rect::ZERO,
        };
        let implied = self.push(node);
        for child in pending.drain(..) {
            self.realize(doc, factory, &child, Some(implied))?;
        }
        Ok(())
    }

    fn push(&mut self, node: ViewNode) -> ViewId {
        let id = ViewId(self.nodes.len() as u32);
        if let Some(parent) = node.parent.and_then(|p| self.node_mut(p)) {
            parent.children.push(id);
        }
        self.nodes.push(Some(node));
        id
    }

    pub(crate) fn node(&self, id: ViewId) -> Option<&ViewNode> {
        self.nodes.get(id.index()).and_then(Option::as_ref)
    }

    fn node_mut(&mut self, id: ViewId) -> Option<&mut ViewNode> {
        self.nodes.get_mut(id.index()).and_then(Option::as_mut)
    }

    pub fn root(&self) -> Option<ViewId> {
        self.root
    }

    pub fn sheet(&self) -> &StyleSheet {
        &self.sheet
    }

    pub fn metrics(&self) -> &dyn TextMetrics {
        self.metrics.as_ref()
    }

    pub fn layout_config(&self) -> &LayoutConfig {
        &self.layout
    }

    pub fn is_editable(&self) -> bool {
        self.editable
    }

    pub fn set_editable(&mut self, editable: bool) {
        self.editable = editable;
    }

    pub fn contains(&self, id: ViewId) -> bool {
        self.node(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.nodes.iter().flatten().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn cx(&self, id: ViewId) -> Result<ViewCx<'_>, ViewError> {
        let node = self.node(id).ok_or(ViewError::StaleView(id))?;
        Ok(ViewCx { tree: self, id, node })
    }

    pub fn children(&self, id: ViewId) -> Result<&[ViewId], ViewError> {
        Ok(&self.node(id).ok_or(ViewError::StaleView(id))?.children)
    }

    pub fn parent(&self, id: ViewId) -> Result<Option<ViewId>, ViewError> {
        Ok(self.node(id).ok_or(ViewError::StaleView(id))?.parent)
    }

    pub fn allocation(&self, id: ViewId) -> Result<Rect, ViewError> {
        Ok(self.node(id).ok_or(ViewError::StaleView(id))?.alloc)
    }

    pub fn view_name(&self, id: ViewId) -> Result<&'static str, ViewError> {
        Ok(self.node(id).ok_or(ViewError::StaleView(id))?.view.name())
    }

    pub fn attributes(&self, id: ViewId) -> Result<AttrView<'_>, ViewError> {
        self.cx(id).map(|cx| cx.attributes())
    }

    /// The authored view of `element`; implied paragraphs are skipped.
    pub fn find_by_element(&self, element: ElementId) -> Option<ViewId> {
        self.nodes.iter().enumerate().find_map(|(i, node)| {
            let node = node.as_ref()?;
            (node.element.id == element && !node.implied).then_some(ViewId(i as u32))
        })
    }

    /// Every live view in creation order, parents before children.
    pub fn ids(&self) -> Vec<ViewId> {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.is_some())
            .map(|(i, _)| ViewId(i as u32))
            .collect()
    }

    /// Re-read cached view properties after the style sheet changed.
    pub fn refresh(&mut self) {
        for id in self.ids() {
            let Some(node) = self.node_mut(id) else { continue };
            let mut view = std::mem::replace(&mut node.view, Box::new(Detached));
            if let Ok(cx) = self.cx(id) {
                view.set_properties(&cx);
            }
            if let Some(node) = self.node_mut(id) {
                node.view = view;
            }
        }
    }

    /// Detach `id` from its parent and drop it with all descendants.
    /// Returns the number of views removed.
    pub fn remove_subtree(&mut self, id: ViewId) -> Result<usize, ViewError> {
        let parent = self.parent(id)?;
        if let Some(parent) = parent.and_then(|p| self.node_mut(p)) {
            parent.children.retain(|c| *c != id);
        }
        if self.root == Some(id) {
            self.root = None;
        }
        let mut stack = vec![id];
        let mut removed = 0;
        while let Some(next) = stack.pop() {
            if let Some(node) = self.nodes.get_mut(next.index()).and_then(Option::take) {
                stack.extend(node.children);
                removed += 1;
            }
        }
        debug!(removed, "view subtree removed");
        Ok(removed)
    }

    /// Preferred height of the whole tree at `width`.
    pub fn preferred_height(&self, width: f32) -> f32 {
        self.root
            .and_then(|root| self.cx(root).ok())
            .map_or(0.0, |cx| cx.height_for_width(width))
    }

    /// Allocate `width` x `height` to the root and lay the tree out top
    /// down.
    pub fn layout(&mut self, width: f32, height: f32) -> Result<(), ViewError> {
        let Some(root) = self.root else {
            return Ok(());
        };
        let mut pending = vec![(root, Rect::new(0.0, 0.0, width, height))];
        let mut visited = 0usize;
        while let Some((id, alloc)) = pending.pop() {
            let child_allocs = {
                let cx = self.cx(id)?;
                cx.view().layout(&cx, alloc)
            };
            let node = self.node_mut(id).ok_or(ViewError::StaleView(id))?;
            node.alloc = alloc;
            for (i, child) in node.children.iter().enumerate() {
                let rect = child_allocs.get(i).copied().unwrap_or(Rect::new(alloc.x, alloc.y, 0.0, 0.0));
                pending.push((*child, rect));
            }
            visited += 1;
        }
        if self.diagnostics {
            info!(width, height, views = visited, "diagnostics: layout pass");
        }
        Ok(())
    }

    /// Paint the laid-out tree.
    pub fn paint(&self) -> DisplayList {
        let Some(root) = self.root.and_then(|r| self.cx(r).ok()) else {
            return DisplayList::default();
        };
        let alloc = root.allocation();
        let mut painter = Painter::begin_frame(Viewport {
            width: alloc.w,
            height: alloc.h,
        });
        root.paint(&mut painter);
        painter.finish()
    }
}

/// One view together with the tree it lives in.
#[derive(Clone, Copy)]
pub struct ViewCx<'a> {
    tree: &'a ViewTree,
    id: ViewId,
    node: &'a ViewNode,
}

/// Reads only the view's own sources, so relative font sizes are applied
/// once per level.
struct LocalLookup<'a>(AttrView<'a>);

impl AttributeLookup for LocalLookup<'_> {
    fn lookup(&self, key: CssProperty) -> Option<CssValue> {
        self.0.lookup_local(key)
    }
}

impl<'a> ViewCx<'a> {
    pub fn id(&self) -> ViewId {
        self.id
    }

    pub fn tree(&self) -> &'a ViewTree {
        self.tree
    }

    pub fn view(&self) -> &'a dyn View {
        self.node.view.as_ref()
    }

    pub fn element(&self) -> &'a ElementData {
        &self.node.element
    }

    pub fn tag(&self) -> &'a Tag {
        &self.node.element.tag
    }

    pub fn attribute(&self, key: &HtmlAttr) -> Option<&'a str> {
        self.node.element.attributes.get(key)
    }

    pub fn is_implied(&self) -> bool {
        self.node.implied
    }

    pub fn sheet(&self) -> &'a StyleSheet {
        &self.tree.sheet
    }

    pub fn metrics(&self) -> &'a dyn TextMetrics {
        self.tree.metrics.as_ref()
    }

    pub fn config(&self) -> &'a LayoutConfig {
        &self.tree.layout
    }

    pub fn is_editable(&self) -> bool {
        self.tree.editable
    }

    pub fn attributes(&self) -> AttrView<'a> {
        AttrView::new(self.tree, self.id)
    }

    pub fn parent(&self) -> Option<ViewCx<'a>> {
        self.node.parent.and_then(|p| self.tree.cx(p).ok())
    }

    pub fn children(&self) -> Vec<ViewCx<'a>> {
        self.node
            .children
            .iter()
            .filter_map(|c| self.tree.cx(*c).ok())
            .collect()
    }

    pub fn child_count(&self) -> usize {
        self.node.children.len()
    }

    pub fn allocation(&self) -> Rect {
        self.node.alloc
    }

    /// Font size in points, resolved against the parent view's size.
    pub fn font_size(&self) -> f32 {
        let sheet = self.sheet();
        let parent_size = match self.parent() {
            Some(parent) => parent.font_size(),
            None => sheet.default_font_size(),
        };
        sheet.font_size(&LocalLookup(self.attributes()), parent_size)
    }

    pub fn font(&self) -> FontSpec {
        FontSpec::from_attributes(&self.attributes(), self.font_size())
    }

    pub fn preferred_span(&self, axis: Axis) -> f32 {
        self.view().preferred_span(self, axis)
    }

    pub fn minimum_span(&self, axis: Axis) -> f32 {
        self.view().minimum_span(self, axis)
    }

    pub fn maximum_span(&self, axis: Axis) -> f32 {
        self.view().maximum_span(self, axis)
    }

    pub fn alignment(&self, axis: Axis) -> f32 {
        self.view().alignment(self, axis)
    }

    pub fn resize_weight(&self, axis: Axis) -> i32 {
        self.view().resize_weight(self, axis)
    }

    pub fn break_weight(&self, axis: Axis) -> BreakWeight {
        self.view().break_weight(self, axis)
    }

    pub fn height_for_width(&self, width: f32) -> f32 {
        self.view().height_for_width(self, width)
    }

    pub fn requirements(&self, axis: Axis) -> SizeRequirements {
        self.view().requirements(self, axis)
    }

    pub fn paint(&self, painter: &mut Painter) {
        self.view().paint(self, self.node.alloc, painter);
    }

    pub fn paint_children(&self, painter: &mut Painter) {
        for child in self.children() {
            child.paint(painter);
        }
    }
}
