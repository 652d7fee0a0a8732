use anyhow::Result;
use quill_dom::{
    Attributes, Document, HtmlAttr, HtmlWriter, InlineTag, Tag, WriterOptions, write_document,
};

#[test]
fn inline_runs_share_open_tags() -> Result<()> {
    let mut doc = Document::new();
    let body = doc.append_element(doc.root(), Tag::Body, Attributes::new())?;
    let p = doc.append_element(body, Tag::P, Attributes::new().with(HtmlAttr::Class, "note"))?;
    doc.append_text(p, "Hello ", vec![])?;
    doc.append_text(p, "bold", vec![InlineTag::new(Tag::B)])?;
    doc.append_text(p, " world", vec![])?;

    let html = write_document(&doc)?;
    assert_eq!(
        html,
        "<html>\n  <body>\n    <p class=\"note\">\n      Hello <b>bold</b> world\n    </p>\n  </body>\n</html>\n"
    );
    Ok(())
}

#[test]
fn nested_inline_tags_close_only_the_difference() -> Result<()> {
    let mut doc = Document::new();
    let link = InlineTag::new(Tag::A).with(HtmlAttr::Href, "x.html");
    doc.append_text(doc.root(), "one", vec![link.clone()])?;
    doc.append_text(doc.root(), "two", vec![link.clone(), InlineTag::new(Tag::I)])?;
    doc.append_text(doc.root(), "three", vec![link])?;

    let html = write_document(&doc)?;
    assert!(html.contains("<a href=\"x.html\">one<i>two</i>three</a>"));
    assert_eq!(html.matches("<a ").count(), 1);
    Ok(())
}

#[test]
fn synthesized_elements_emit_only_children() -> Result<()> {
    let mut doc = Document::new();
    let body = doc.append_element(doc.root(), Tag::Body, Attributes::new())?;
    let implied = doc.append_synthesized(body, Tag::P)?;
    doc.append_text(implied, "text", vec![])?;

    let html = write_document(&doc)?;
    assert_eq!(html, "<html>\n  <body>\n    text\n  </body>\n</html>\n");
    Ok(())
}

#[test]
fn long_text_wraps_between_words() -> Result<()> {
    let mut doc = Document::new();
    let body = doc.append_element(doc.root(), Tag::Body, Attributes::new())?;
    let text = "alpha beta gamma delta epsilon zeta eta theta iota kappa";
    doc.append_text(body, text, vec![])?;

    let options = WriterOptions {
        line_length: 20,
        indent: 2,
    };
    let html = HtmlWriter::new(&doc, options).write()?;
    for line in html.lines() {
        assert!(line.len() <= 20, "line too long: {line:?}");
    }
    let words: Vec<&str> = html
        .lines()
        .filter(|l| !l.trim_start().starts_with('<'))
        .flat_map(str::split_whitespace)
        .collect();
    assert_eq!(words.join(" "), text);
    Ok(())
}

#[test]
fn preformatted_text_is_kept_verbatim() -> Result<()> {
    let mut doc = Document::new();
    let pre = doc.append_element(doc.root(), Tag::Pre, Attributes::new())?;
    doc.append_text(pre, "a  <b>\n  c", vec![])?;

    let html = write_document(&doc)?;
    assert!(html.contains("a  &lt;b&gt;\n  c"));
    Ok(())
}
