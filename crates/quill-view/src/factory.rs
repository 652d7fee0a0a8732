use quill_dom::{Element, ElementRef, Tag};

use crate::geometry::Axis;
use crate::view::View;
use crate::views::{
    BlockView, BreakView, EditableView, FrameSetView, FrameView, HRuleView, ImageView, InlineView,
    IsindexView, ListView, ObjectView, ParagraphView,
};

/// Chooses the view kind for each element.
pub trait ViewFactory {
    fn create(&self, element: &ElementRef<'_>) -> Box<dyn View>;

    /// View for a paragraph wrapping loose inline content.
    fn create_implied(&self) -> Box<dyn View> {
        Box::new(ParagraphView::new())
    }

    /// Whether loose inline children of `tag` are gathered into implied
    /// paragraphs.
    fn groups_inline(&self, tag: &Tag) -> bool;

    /// Whether `element` flows inline with text.
    fn is_inline(&self, element: &ElementRef<'_>) -> bool;
}

/// The HTML mapping.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlFactory;

impl ViewFactory for HtmlFactory {
    fn create(&self, element: &ElementRef<'_>) -> Box<dyn View> {
        match element.tag() {
            Tag::Content => Box::new(InlineView::new()),
            Tag::P | Tag::Pre | Tag::Dt | Tag::Caption | Tag::Address => Box::new(ParagraphView::new()),
            Tag::H1 | Tag::H2 | Tag::H3 | Tag::H4 | Tag::H5 | Tag::H6 => Box::new(ParagraphView::new()),
            Tag::Html
            | Tag::Body
            | Tag::Div
            | Tag::Center
            | Tag::Blockquote
            | Tag::Dl
            | Tag::Dd
            | Tag::Li
            | Tag::Form
            | Tag::Table
            | Tag::Td
            | Tag::Th => Box::new(BlockView::new(Axis::Y)),
            Tag::Tr => Box::new(BlockView::new(Axis::X)),
            Tag::Ol | Tag::Ul | Tag::Menu => Box::new(ListView::new()),
            Tag::Frameset => Box::new(FrameSetView::new()),
            Tag::Frame => Box::new(FrameView::new()),
            Tag::Hr => Box::new(HRuleView::new()),
            Tag::Img => Box::new(ImageView::new()),
            Tag::Object | Tag::Applet | Tag::Input => Box::new(ObjectView::new()),
            Tag::Isindex => Box::new(IsindexView::new()),
            Tag::Br => Box::new(BreakView),
            Tag::Head
            | Tag::Title
            | Tag::Script
            | Tag::Style
            | Tag::Meta
            | Tag::Link
            | Tag::Param
            | Tag::Comment
            | Tag::Noframes
            | Tag::Option
            | Tag::Custom(_) => Box::new(EditableView),
            _ => Box::new(ParagraphView::new()),
        }
    }

    fn groups_inline(&self, tag: &Tag) -> bool {
        matches!(
            tag,
            Tag::Body
                | Tag::Div
                | Tag::Center
                | Tag::Blockquote
                | Tag::Dl
                | Tag::Dd
                | Tag::Li
                | Tag::Form
                | Tag::Td
                | Tag::Th
                | Tag::Html
        )
    }

    fn is_inline(&self, element: &ElementRef<'_>) -> bool {
        matches!(
            element.tag(),
            Tag::Content | Tag::Img | Tag::Input | Tag::Br | Tag::Object | Tag::Applet | Tag::Select | Tag::Textarea
        )
    }
}
