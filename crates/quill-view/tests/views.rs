use std::sync::Arc;

use anyhow::Result;
use quill_config::QuillConfig;
use quill_dom::{Attributes, Document, ElementId, HtmlAttr, InlineTag, Tag};
use quill_style::{AttributeLookup, CssProperty, Rgba, StyleSheet};
use quill_view::{Axis, BreakWeight, Command, HtmlFactory, Rect, ViewError, ViewTree};

fn tree_for(doc: &Document) -> Result<(ViewTree, Arc<StyleSheet>)> {
    let config = QuillConfig::default();
    let sheet = Arc::new(StyleSheet::with_default_rules(&config));
    let mut tree = ViewTree::new(Arc::clone(&sheet), &config);
    tree.build(doc, &HtmlFactory)?;
    Ok((tree, sheet))
}

fn body(doc: &mut Document, attrs: Attributes) -> Result<ElementId> {
    Ok(doc.append_element(doc.root(), Tag::Body, attrs)?)
}

fn text_colors(tree: &ViewTree) -> Vec<(String, Rgba)> {
    tree.paint()
        .commands
        .into_iter()
        .filter_map(|c| match c {
            Command::DrawText { text, color, .. } => Some((text, color)),
            _ => None,
        })
        .collect()
}

#[test]
fn frames_share_the_rows() -> Result<()> {
    let mut doc = Document::with_root(Tag::Frameset, Attributes::new().with(HtmlAttr::Rows, "30,*,*"));
    let frames = (0..3)
        .map(|_| doc.append_element(doc.root(), Tag::Frame, Attributes::new()))
        .collect::<Result<Vec<_>, _>>()?;
    let (mut tree, _) = tree_for(&doc)?;
    tree.layout(100.0, 100.0)?;

    let rects = frames
        .iter()
        .map(|f| tree.find_by_element(*f).map(|id| tree.allocation(id)))
        .collect::<Option<Result<Vec<_>, _>>>()
        .expect("every frame has a view")?;
    assert_eq!(
        rects,
        vec![
            Rect::new(0.0, 0.0, 100.0, 30.0),
            Rect::new(0.0, 30.0, 100.0, 35.0),
            Rect::new(0.0, 65.0, 100.0, 35.0),
        ]
    );
    Ok(())
}

#[test]
fn ordered_list_numbers_follow_item_values() -> Result<()> {
    let mut doc = Document::new();
    let body = body(&mut doc, Attributes::new())?;
    let ol = doc.append_element(body, Tag::Ol, Attributes::new())?;
    for (i, text) in ["a", "b", "c", "d"].iter().enumerate() {
        let attrs = if i == 2 {
            Attributes::new().with(HtmlAttr::Value, "10")
        } else {
            Attributes::new()
        };
        let li = doc.append_element(ol, Tag::Li, attrs)?;
        doc.append_text(li, *text, Vec::new())?;
    }
    let (mut tree, _) = tree_for(&doc)?;
    tree.layout(400.0, 400.0)?;

    let list = tree.paint();
    let markers: Vec<&str> = list.texts().filter(|t| t.ends_with('.')).collect();
    assert_eq!(markers, vec!["1.", "2.", "10.", "11."]);
    Ok(())
}

#[test]
fn inherited_properties_come_from_ancestor_views() -> Result<()> {
    let mut doc = Document::new();
    let body = body(
        &mut doc,
        Attributes::new()
            .with(HtmlAttr::Text, "#ff0000")
            .with(HtmlAttr::Bgcolor, "#00ff00"),
    )?;
    let p = doc.append_element(body, Tag::P, Attributes::new())?;
    doc.append_text(p, "hello", Vec::new())?;
    let (tree, _) = tree_for(&doc)?;

    let id = tree.find_by_element(p).expect("paragraph view");
    let attrs = tree.attributes(id)?;
    assert_eq!(
        attrs.lookup(CssProperty::Color).and_then(|v| v.color()),
        Some(Rgba::rgb(255, 0, 0))
    );
    assert_eq!(attrs.lookup(CssProperty::BackgroundColor), None);
    assert!(attrs.lookup_local(CssProperty::Color).is_none());
    Ok(())
}

#[test]
fn refresh_picks_up_new_rules() -> Result<()> {
    let mut doc = Document::new();
    let body = body(&mut doc, Attributes::new())?;
    let p = doc.append_element(body, Tag::P, Attributes::new())?;
    doc.append_text(p, "hello", Vec::new())?;
    let (mut tree, sheet) = tree_for(&doc)?;
    tree.layout(200.0, 100.0)?;
    assert_eq!(text_colors(&tree), vec![("hello".to_string(), Rgba::BLACK)]);

    sheet.add_rule("p { color: green }");
    assert_eq!(text_colors(&tree), vec![("hello".to_string(), Rgba::BLACK)]);
    tree.refresh();
    assert_eq!(text_colors(&tree), vec![("hello".to_string(), Rgba::rgb(0, 128, 0))]);
    Ok(())
}

#[test]
fn loose_inline_content_gets_implied_paragraphs() -> Result<()> {
    let mut doc = Document::new();
    let body = body(&mut doc, Attributes::new())?;
    doc.append_text(body, "before", Vec::new())?;
    let p = doc.append_element(body, Tag::P, Attributes::new())?;
    doc.append_text(p, "inside", Vec::new())?;
    doc.append_text(body, "   \n", Vec::new())?;
    let (tree, _) = tree_for(&doc)?;

    let body_view = tree.find_by_element(body).expect("body view");
    let children = tree.children(body_view)?.to_vec();
    assert_eq!(children.len(), 2);
    assert!(tree.cx(children[0])?.is_implied());
    assert_eq!(tree.view_name(children[0])?, "paragraph");
    assert_eq!(Some(children[1]), tree.find_by_element(p));
    Ok(())
}

#[test]
fn paragraphs_wrap_at_word_boundaries() -> Result<()> {
    let mut doc = Document::new();
    let body = body(&mut doc, Attributes::new())?;
    let p = doc.append_element(body, Tag::P, Attributes::new())?;
    doc.append_text(p, "aaaa bbbb cccc", Vec::new())?;
    let (mut tree, _) = tree_for(&doc)?;
    tree.layout(60.0, 200.0)?;

    let list = tree.paint();
    assert_eq!(list.texts().collect::<Vec<_>>(), vec!["aaaa bbbb", "cccc"]);
    assert!(tree.preferred_height(60.0) > tree.preferred_height(200.0));
    Ok(())
}

#[test]
fn removed_views_are_stale() -> Result<()> {
    let mut doc = Document::new();
    let body = body(&mut doc, Attributes::new())?;
    let p = doc.append_element(body, Tag::P, Attributes::new())?;
    doc.append_text(p, "gone", Vec::new())?;
    let (mut tree, _) = tree_for(&doc)?;

    let before = tree.len();
    let id = tree.find_by_element(p).expect("paragraph view");
    assert_eq!(tree.remove_subtree(id)?, 2);
    assert_eq!(tree.len(), before - 2);
    assert!(matches!(tree.cx(id), Err(ViewError::StaleView(stale)) if stale == id));
    assert!(matches!(tree.remove_subtree(id), Err(ViewError::StaleView(_))));
    tree.layout(100.0, 100.0)?;
    assert_eq!(tree.paint().texts().count(), 0);
    Ok(())
}

#[test]
fn hidden_elements_show_only_while_editing() -> Result<()> {
    let mut doc = Document::new();
    doc.append_element(doc.root(), Tag::Head, Attributes::new())?;
    body(&mut doc, Attributes::new())?;

    let (mut tree, _) = tree_for(&doc)?;
    tree.layout(200.0, 100.0)?;
    assert!(!tree.paint().texts().any(|t| t == "<head>"));

    doc.set_editable(true);
    let (mut tree, _) = tree_for(&doc)?;
    assert!(tree.is_editable());
    tree.layout(200.0, 100.0)?;
    assert!(tree.paint().texts().any(|t| t == "<head>"));
    Ok(())
}

#[test]
fn objects_embed_known_components() -> Result<()> {
    let mut doc = Document::new();
    let body = body(&mut doc, Attributes::new())?;
    let button = doc.append_element(body, Tag::Object, Attributes::new().with(HtmlAttr::Classid, "button"))?;
    doc.append_element(
        button,
        Tag::Param,
        Attributes::new().with(HtmlAttr::Name, "label").with(HtmlAttr::Value, "Go"),
    )?;
    doc.append_element(body, Tag::Object, Attributes::new().with(HtmlAttr::Classid, "com.example.Applet"))?;
    let (mut tree, _) = tree_for(&doc)?;
    tree.layout(300.0, 100.0)?;

    let colors = text_colors(&tree);
    assert!(colors.contains(&("Go".to_string(), Rgba::BLACK)));
    assert!(colors.contains(&("??".to_string(), Rgba::rgb(255, 0, 0))));
    Ok(())
}

/// Baseline each text was drawn at.
fn baselines(tree: &ViewTree) -> Vec<(String, f32)> {
    tree.paint()
        .commands
        .into_iter()
        .filter_map(|c| match c {
            Command::DrawText { text, baseline, .. } => Some((text, baseline)),
            _ => None,
        })
        .collect()
}

fn baseline_of(drawn: &[(String, f32)], text: &str) -> f32 {
    drawn
        .iter()
        .find(|(t, _)| t == text)
        .map(|(_, b)| *b)
        .unwrap_or_else(|| panic!("{text:?} was not drawn"))
}

#[test]
fn nowrap_paragraphs_stay_on_one_line() -> Result<()> {
    let mut doc = Document::new();
    let body = body(&mut doc, Attributes::new())?;
    let p = doc.append_element(body, Tag::P, Attributes::new().with(HtmlAttr::Nowrap, ""))?;
    let run = doc.append_text(p, "aaaa bbbb cccc", Vec::new())?;
    let wrapped = doc.append_element(body, Tag::P, Attributes::new())?;
    doc.append_text(wrapped, "dddd eeee ffff", Vec::new())?;
    let (mut tree, _) = tree_for(&doc)?;
    tree.layout(60.0, 200.0)?;

    let texts: Vec<String> = baselines(&tree).into_iter().map(|(t, _)| t).collect();
    assert_eq!(texts, ["aaaa bbbb cccc", "dddd eeee", "ffff"]);

    let p_view = tree.find_by_element(p).expect("paragraph view");
    let run_view = tree.find_by_element(run).expect("run view");
    let wrapped_view = tree.find_by_element(wrapped).expect("paragraph view");
    assert_eq!(tree.cx(p_view)?.break_weight(Axis::X), BreakWeight::Bad);
    assert_eq!(tree.cx(run_view)?.break_weight(Axis::X), BreakWeight::Bad);
    assert_eq!(tree.cx(wrapped_view)?.break_weight(Axis::X), BreakWeight::Good);
    Ok(())
}

#[test]
fn super_and_subscripts_shift_the_baseline() -> Result<()> {
    let mut doc = Document::new();
    let body = body(&mut doc, Attributes::new())?;
    let p = doc.append_element(body, Tag::P, Attributes::new())?;
    doc.append_text(p, "x", Vec::new())?;
    doc.append_text(p, "up", vec![InlineTag::new(Tag::Sup)])?;
    doc.append_text(p, "down", vec![InlineTag::new(Tag::Sub)])?;
    let (mut tree, _) = tree_for(&doc)?;
    tree.layout(400.0, 200.0)?;

    let drawn = baselines(&tree);
    let plain = baseline_of(&drawn, "x");
    assert!(baseline_of(&drawn, "up") < plain);
    assert!(baseline_of(&drawn, "down") > plain);
    Ok(())
}

#[test]
fn decorations_draw_lines_under_and_through_text() -> Result<()> {
    let mut doc = Document::new();
    let body = body(&mut doc, Attributes::new())?;
    let p = doc.append_element(body, Tag::P, Attributes::new())?;
    doc.append_text(p, "under", vec![InlineTag::new(Tag::U)])?;
    doc.append_text(p, "plain", Vec::new())?;
    doc.append_text(p, "struck", vec![InlineTag::new(Tag::S)])?;
    let (mut tree, _) = tree_for(&doc)?;
    tree.layout(400.0, 200.0)?;

    let list = tree.paint();
    let mut lines = Vec::new();
    let mut drawn = Vec::new();
    for command in &list.commands {
        match command {
            Command::Line { from, to, .. } => lines.push((*from, *to)),
            Command::DrawText { text, x, baseline, .. } => drawn.push((text.clone(), *x, *baseline)),
            _ => {}
        }
    }
    assert_eq!(lines.len(), 2);
    let find = |text: &str| drawn.iter().find(|(t, ..)| t == text).map(|(_, x, b)| (*x, *b));
    let (under_x, under_baseline) = find("under").expect("underlined run drawn");
    let (struck_x, struck_baseline) = find("struck").expect("struck run drawn");

    let (from, to) = lines[0];
    assert_eq!(from[0], under_x);
    assert!(from[1] > under_baseline);
    assert!(to[0] > from[0]);
    let (from, _) = lines[1];
    assert_eq!(from[0], struck_x);
    assert!(from[1] < struck_baseline);
    Ok(())
}

#[test]
fn elements_with_id_and_class_lists_pick_up_class_rules() -> Result<()> {
    let mut doc = Document::new();
    let body = body(&mut doc, Attributes::new())?;
    let p = doc.append_element(
        body,
        Tag::P,
        Attributes::new().with(HtmlAttr::Id, "x").with(HtmlAttr::Class, "a  b"),
    )?;
    doc.append_text(p, "tagged", Vec::new())?;
    let plain = doc.append_element(body, Tag::P, Attributes::new())?;
    doc.append_text(plain, "plain", Vec::new())?;
    let (mut tree, sheet) = tree_for(&doc)?;
    tree.layout(200.0, 100.0)?;

    sheet.add_rule(".b { color: blue }");
    tree.refresh();
    assert_eq!(
        text_colors(&tree),
        vec![("tagged".to_string(), Rgba::rgb(0, 0, 255)), ("plain".to_string(), Rgba::BLACK)]
    );
    Ok(())
}
