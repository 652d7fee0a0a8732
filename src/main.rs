use std::sync::Arc;

use anyhow::{Context, Result};
use quill::dom::{Attributes, HtmlAttr, InlineTag, write_document};
use quill::{Document, HtmlFactory, QuillConfig, StyleSheet, Tag, ViewTree};

/// Lays out a small sample page, optionally styled by the sheet given on
/// the command line, and prints its markup and display list.
fn main() -> Result<()> {
    let config = QuillConfig::load();
    let sheet = Arc::new(StyleSheet::with_default_rules(&config));
    if let Some(path) = std::env::args().nth(1) {
        sheet
            .try_import_style_sheet(&path)
            .with_context(|| format!("loading style sheet {path}"))?;
    }

    let doc = sample_document()?;
    println!("{}", write_document(&doc)?);

    let mut tree = ViewTree::new(Arc::clone(&sheet), &config);
    tree.build(&doc, &HtmlFactory)?;
    let width = 480.0;
    let height = tree.preferred_height(width);
    tree.layout(width, height)?;
    for command in tree.paint().commands {
        println!("{command:?}");
    }
    Ok(())
}

fn sample_document() -> Result<Document> {
    let mut doc = Document::new();
    let body = doc.append_element(doc.root(), Tag::Body, Attributes::new())?;
    let h1 = doc.append_element(body, Tag::H1, Attributes::new())?;
    doc.append_text(h1, "Quill", Vec::new())?;
    let p = doc.append_element(body, Tag::P, Attributes::new().with(HtmlAttr::Class, "intro"))?;
    doc.append_text(p, "Styles cascade from ", Vec::new())?;
    doc.append_text(p, "rules", vec![InlineTag::new(Tag::B)])?;
    doc.append_text(p, " into views.", Vec::new())?;
    let ol = doc.append_element(body, Tag::Ol, Attributes::new())?;
    for item in ["resolve", "lay out", "paint"] {
        let li = doc.append_element(ol, Tag::Li, Attributes::new())?;
        doc.append_text(li, item, Vec::new())?;
    }
    doc.append_element(body, Tag::Hr, Attributes::new())?;
    Ok(doc)
}
