//! Markup writer.
//!
//! Walks a [`Document`] and produces indented HTML. Content runs carry the
//! inline tags that enclose them, so the writer keeps a stack of the inline
//! tags currently open and only closes and reopens the part that differs
//! from one run to the next.

use std::fmt::Write as _;

use tracing::debug;

use crate::attr::Attributes;
use crate::document::{Document, ElementId, ElementKind, InlineTag, Origin};
use crate::error::DomError;
use crate::tag::Tag;

#[derive(Debug, Clone, Copy)]
pub struct WriterOptions {
    /// Text is wrapped between words once a line would exceed this width.
    pub line_length: usize,
    /// Spaces per nesting level.
    pub indent: usize,
}

impl Default for WriterOptions {
    fn default() -> Self {
        Self {
            line_length: 80,
            indent: 2,
        }
    }
}

/// Serialize `doc` with default options.
pub fn write_document(doc: &Document) -> Result<String, DomError> {
    HtmlWriter::new(doc, WriterOptions::default()).write()
}

pub struct HtmlWriter<'a> {
    doc: &'a Document,
    options: WriterOptions,
    out: String,
    column: usize,
    depth: usize,
    open_inline: Vec<InlineTag>,
    pending_space: bool,
    need_break: bool,
    line_start: bool,
    preformatted: usize,
}

impl<'a> HtmlWriter<'a> {
    pub fn new(doc: &'a Document, options: WriterOptions) -> Self {
        Self {
            doc,
            options,
            out: String::new(),
            column: 0,
            depth: 0,
            open_inline: Vec::new(),
            pending_space: false,
            need_break: false,
            line_start: true,
            preformatted: 0,
        }
    }

    pub fn write(mut self) -> Result<String, DomError> {
        self.element(self.doc.root())?;
        self.close_inline_to(0)?;
        if !self.out.is_empty() && !self.out.ends_with('\n') {
            self.out.push('\n');
        }
        debug!(bytes = self.out.len(), "writer: serialized document");
        Ok(self.out)
    }

    fn element(&mut self, id: ElementId) -> Result<(), DomError> {
        let doc = self.doc;
        let origin = doc.origin(id)?;
        match doc.kind(id)? {
            ElementKind::Content { text, inline, .. } => self.content(text, inline),
            ElementKind::Branch { children, .. } if origin == Origin::Synthesized => {
                for child in children {
                    self.element(*child)?;
                }
                Ok(())
            }
            ElementKind::Branch {
                tag,
                attributes,
                children,
            } => {
                let starts_line = tag.is_block() || tag.breaks_flow();
                self.close_inline_to(0)?;
                if starts_line {
                    self.new_line()?;
                } else {
                    self.flush_space()?;
                }
                self.start_tag(tag, attributes)?;
                if tag.is_empty_element() {
                    self.need_break = starts_line;
                    return Ok(());
                }
                if starts_line {
                    self.depth += 1;
                    self.need_break = true;
                }
                if tag.preserves_whitespace() {
                    self.preformatted += 1;
                }
                for child in children {
                    self.element(*child)?;
                }
                self.close_inline_to(0)?;
                if tag.preserves_whitespace() {
                    self.preformatted -= 1;
                }
                if starts_line {
                    self.depth -= 1;
                    self.new_line()?;
                }
                self.end_tag(tag)?;
                self.need_break = starts_line;
                Ok(())
            }
        }
    }

    fn content(&mut self, text: &str, inline: &[InlineTag]) -> Result<(), DomError> {
        let shared = self
            .open_inline
            .iter()
            .zip(inline)
            .take_while(|(open, wanted)| open == wanted)
            .count();
        self.close_inline_to(shared)?;
        if self.need_break && self.preformatted == 0 {
            self.new_line()?;
        }
        if self.preformatted > 0 {
            for tag in &inline[shared..] {
                self.start_tag(&tag.tag, &tag.attributes)?;
                self.open_inline.push(tag.clone());
            }
            self.raw(&escape(text, false))?;
            return Ok(());
        }
        if text.starts_with(char::is_whitespace) && !self.line_start {
            self.pending_space = true;
        }
        if shared < inline.len() {
            self.flush_space()?;
            for tag in &inline[shared..] {
                self.start_tag(&tag.tag, &tag.attributes)?;
                self.open_inline.push(tag.clone());
            }
        }
        for word in text.split_whitespace() {
            let word = escape(word, false);
            let needed = word.chars().count() + usize::from(self.pending_space);
            if self.column + needed > self.options.line_length && !self.line_start {
                self.new_line()?;
            }
            self.flush_space()?;
            self.raw(&word)?;
            self.pending_space = true;
        }
        if !text.is_empty() {
            self.pending_space = text.ends_with(char::is_whitespace) && !self.line_start;
        }
        Ok(())
    }

    fn start_tag(&mut self, tag: &Tag, attributes: &Attributes) -> Result<(), DomError> {
        let mut markup = String::new();
        write!(markup, "<{}", tag.name())?;
        for (key, value) in attributes.iter() {
            if value.is_empty() {
                write!(markup, " {}", key.name())?;
            } else {
                write!(markup, " {}=\"{}\"", key.name(), escape(value, true))?;
            }
        }
        markup.push('>');
        self.raw(&markup)
    }

    fn end_tag(&mut self, tag: &Tag) -> Result<(), DomError> {
        self.raw(&format!("</{}>", tag.name()))
    }

    fn close_inline_to(&mut self, keep: usize) -> Result<(), DomError> {
        while self.open_inline.len() > keep {
            if let Some(tag) = self.open_inline.pop() {
                self.end_tag(&tag.tag)?;
            }
        }
        Ok(())
    }

    fn flush_space(&mut self) -> Result<(), DomError> {
        if self.pending_space && !self.line_start {
            self.raw(" ")?;
        }
        self.pending_space = false;
        Ok(())
    }

    fn new_line(&mut self) -> Result<(), DomError> {
        if !self.out.is_empty() {
            self.out.push('\n');
        }
        let width = self.depth * self.options.indent;
        write!(self.out, "{:width$}", "")?;
        self.column = width;
        self.need_break = false;
        self.pending_space = false;
        self.line_start = true;
        Ok(())
    }

    fn raw(&mut self, text: &str) -> Result<(), DomError> {
        self.out.write_str(text)?;
        match text.rfind('\n') {
            Some(pos) => self.column = text[pos + 1..].chars().count(),
            None => self.column += text.chars().count(),
        }
        if !text.is_empty() {
            self.need_break = false;
            self.line_start = false;
        }
        Ok(())
    }
}

fn escape(text: &str, attribute: bool) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if attribute => out.push_str("&quot;"),
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attr::HtmlAttr;

    #[test]
    fn escapes_text_and_attributes() {
        assert_eq!(escape("a<b & c", false), "a&lt;b &amp; c");
        assert_eq!(escape("say \"hi\"", true), "say &quot;hi&quot;");
        assert_eq!(escape("say \"hi\"", false), "say \"hi\"");
    }

    #[test]
    fn empty_elements_have_no_end_tag() {
        let mut doc = Document::new();
        let body = doc.append_element(doc.root(), Tag::Body, Attributes::new()).unwrap();
        doc.append_element(body, Tag::Hr, Attributes::new().with(HtmlAttr::Noshade, ""))
            .unwrap();
        let html = write_document(&doc).unwrap();
        assert!(html.contains("<hr noshade>"));
        assert!(!html.contains("</hr>"));
    }
}
