use std::sync::Arc;

use anyhow::Result;
use quill_config::QuillConfig;
use quill_dom::{Attributes, Document, ElementId, HtmlAttr, InlineTag, Tag};
use quill_style::{CssProperty, CssValue, LengthUnit, Rgba, StyleSheet};

fn sheet() -> StyleSheet {
    StyleSheet::with_config(&QuillConfig::default())
}

fn color(sheet: &StyleSheet, id: quill_style::ResolvedId) -> Option<Rgba> {
    sheet.get(id, CssProperty::Color).and_then(|v| v.color())
}

/// html > body > p.note
fn note_paragraph() -> Result<(Document, ElementId)> {
    let mut doc = Document::new();
    let body = doc.append_element(doc.root(), Tag::Body, Attributes::new())?;
    let p = doc.append_element(body, Tag::P, Attributes::new().with(HtmlAttr::Class, "note"))?;
    Ok((doc, p))
}

#[test]
fn class_beats_tag() -> Result<()> {
    let sheet = sheet();
    sheet.add_rule(".note { color: blue } p { color: red }");
    let (doc, p) = note_paragraph()?;
    let id = sheet.rule_for_element(&Tag::P, &doc.get(p)?);
    assert_eq!(sheet.resolved_name(id).as_deref(), Some("html body p.note"));
    assert_eq!(color(&sheet, id), Some(Rgba::rgb(0, 0, 255)));
    Ok(())
}

#[test]
fn same_key_resolves_to_same_handle() -> Result<()> {
    let sheet = sheet();
    let (doc, p) = note_paragraph()?;
    let a = sheet.rule_for_element(&Tag::P, &doc.get(p)?);
    let b = sheet.rule("html  body p.note").expect("non-empty selector");
    assert_eq!(a, b);
    assert_eq!(sheet.resolved_names().len(), 1);
    Ok(())
}

#[test]
fn rules_added_later_reach_cached_styles() -> Result<()> {
    let sheet = sheet();
    sheet.add_rule("p { color: red }");
    let (doc, p) = note_paragraph()?;
    let id = sheet.rule_for_element(&Tag::P, &doc.get(p)?);
    assert_eq!(color(&sheet, id), Some(Rgba::rgb(255, 0, 0)));

    sheet.add_rule(".note { margin-top: 4px }");
    assert_eq!(
        sheet.get(id, CssProperty::MarginTop),
        Some(CssValue::Length(4.0, LengthUnit::Px))
    );
    sheet.add_rule("p.note { color: green }");
    assert_eq!(color(&sheet, id), Some(Rgba::rgb(0, 128, 0)));
    sheet.add_rule("div p { color: black }");
    assert_eq!(color(&sheet, id), Some(Rgba::rgb(0, 128, 0)));
    Ok(())
}

#[test]
fn equal_specificity_prefers_later_rule_in_any_order() {
    let before = sheet();
    before.add_rule("html p { color: red } body p { color: blue }");
    let id = before.rule("html body p").expect("non-empty selector");
    assert_eq!(color(&before, id), Some(Rgba::rgb(0, 0, 255)));

    let after = sheet();
    let id = after.rule("html body p").expect("non-empty selector");
    after.add_rule("html p { color: red } body p { color: blue }");
    assert_eq!(color(&after, id), Some(Rgba::rgb(0, 0, 255)));
}

#[test]
fn remove_style_keeps_handle() -> Result<()> {
    let sheet = sheet();
    sheet.add_rule("p { color: red } .note { color: blue }");
    let (doc, p) = note_paragraph()?;
    let id = sheet.rule_for_element(&Tag::P, &doc.get(p)?);
    assert_eq!(color(&sheet, id), Some(Rgba::rgb(0, 0, 255)));

    assert!(sheet.remove_style(" .note "));
    assert!(!sheet.remove_style(".note"));
    assert_eq!(color(&sheet, id), Some(Rgba::rgb(255, 0, 0)));
    assert_eq!(sheet.resolved_name(id).as_deref(), Some("html body p.note"));
    assert!(sheet.style(".note").is_none());
    Ok(())
}

#[test]
fn add_then_remove_restores_content() {
    let sheet = sheet();
    sheet.add_rule("p { color: red; margin-left: 2px }");
    let id = sheet.rule("body p.note").expect("non-empty selector");
    let before = sheet.copy_attributes(id);

    sheet.add_rule("body .note { color: blue; margin-right: 3px }");
    assert_ne!(sheet.copy_attributes(id), before);
    assert!(sheet.remove_style("body .note"));
    assert_eq!(sheet.copy_attributes(id), before);
    assert_eq!(sheet.attribute_count(id), 2);
}

#[test]
fn content_runs_use_inline_tag_attributes() -> Result<()> {
    let sheet = sheet();
    sheet.add_rule("b { color: red } p b.loud { color: blue }");
    let mut doc = Document::new();
    let p = doc.append_element(doc.root(), Tag::P, Attributes::new())?;
    let run = doc.append_text(
        p,
        "hey",
        vec![InlineTag::new(Tag::B).with(HtmlAttr::Class, "loud")],
    )?;
    let id = sheet.rule_for_element(&Tag::B, &doc.get(run)?);
    assert_eq!(sheet.resolved_name(id).as_deref(), Some("html p b.loud"));
    assert_eq!(color(&sheet, id), Some(Rgba::rgb(0, 0, 255)));
    Ok(())
}

#[test]
fn linked_sheets_sit_behind_local_rules() {
    let local = sheet();
    local.add_rule("p { color: red }");
    let id = local.rule("body p").expect("non-empty selector");

    let older = Arc::new(sheet());
    older.add_rule("p { color: green; margin-top: 1px }");
    let newer = Arc::new(sheet());
    newer.add_rule("p { margin-top: 2px; margin-bottom: 5px }");

    assert!(local.add_style_sheet(Arc::clone(&older)));
    assert!(local.add_style_sheet(Arc::clone(&newer)));
    assert_eq!(local.style_sheets().len(), 2);

    assert_eq!(color(&local, id), Some(Rgba::rgb(255, 0, 0)));
    assert_eq!(
        local.get(id, CssProperty::MarginTop),
        Some(CssValue::Length(2.0, LengthUnit::Px))
    );
    assert!(local.is_defined(id, CssProperty::MarginBottom));

    assert!(local.remove_style_sheet(&newer));
    assert_eq!(
        local.get(id, CssProperty::MarginTop),
        Some(CssValue::Length(1.0, LengthUnit::Px))
    );
    assert!(!local.is_defined(id, CssProperty::MarginBottom));

    assert!(local.remove_style_sheet(&older));
    assert!(local.style_sheets().is_empty());
    assert!(!local.remove_style_sheet(&older));
}

#[test]
fn linking_rejects_cycles() {
    let a = Arc::new(sheet());
    let b = Arc::new(sheet());
    let c = Arc::new(sheet());
    assert!(a.add_style_sheet(Arc::clone(&b)));
    assert!(b.add_style_sheet(Arc::clone(&c)));
    assert!(!c.add_style_sheet(Arc::clone(&a)));
    assert!(!a.add_style_sheet(Arc::clone(&a)));
}

#[test]
fn imported_rules_sit_behind_local_ones() -> Result<()> {
    let dir = tempfile::tempdir()?;
    std::fs::write(
        dir.path().join("base.css"),
        "@import url(extra.css);\np { color: red }\n",
    )?;
    std::fs::write(
        dir.path().join("extra.css"),
        "p { color: green; margin-left: 7px }\nh1 { color: navy }\n",
    )?;
    let href = url::Url::from_file_path(dir.path().join("base.css"))
        .map_err(|_| anyhow::anyhow!("temp path is not absolute"))?;

    let sheet = sheet();
    sheet.import_style_sheet(href.as_str());
    let id = sheet.rule("body p").expect("non-empty selector");
    assert_eq!(color(&sheet, id), Some(Rgba::rgb(255, 0, 0)));
    assert_eq!(
        sheet.get(id, CssProperty::MarginLeft),
        Some(CssValue::Length(7.0, LengthUnit::Px))
    );

    sheet.add_rule("p { color: blue }");
    assert_eq!(color(&sheet, id), Some(Rgba::rgb(0, 0, 255)));
    let h1 = sheet.rule("h1").expect("non-empty selector");
    assert_eq!(color(&sheet, h1), Some(Rgba::rgb(0, 0, 128)));
    Ok(())
}

#[test]
fn import_depth_is_bounded() -> Result<()> {
    let dir = tempfile::tempdir()?;
    std::fs::write(dir.path().join("base.css"), "@import 'extra.css'; p { color: red }")?;
    std::fs::write(dir.path().join("extra.css"), "p { margin-left: 7px }")?;

    let mut config = QuillConfig::default();
    config.style.max_import_depth = 1;
    let sheet = StyleSheet::with_config(&config);
    sheet.try_import_style_sheet(&dir.path().join("base.css").to_string_lossy())?;
    let id = sheet.rule("p").expect("non-empty selector");
    assert!(sheet.is_defined(id, CssProperty::Color));
    assert!(!sheet.is_defined(id, CssProperty::MarginLeft));
    Ok(())
}

#[test]
fn failed_imports_change_nothing() {
    let sheet = sheet();
    let missing = sheet.try_import_style_sheet("/definitely/not/here.css");
    assert!(matches!(missing, Err(quill_style::StyleError::Io { .. })));
    let remote = sheet.try_import_style_sheet("http://example.com/site.css");
    assert!(matches!(remote, Err(quill_style::StyleError::UnsupportedScheme(_))));
    sheet.import_style_sheet("/definitely/not/here.css");
    assert!(sheet.style_names().is_empty());
}

#[test]
fn inline_style_declarations() {
    let sheet = sheet();
    let decl = sheet.declaration("color: #ff0000; margin: 1px 2px; bogus: 3");
    assert_eq!(decl.get(CssProperty::Color), Some(&CssValue::Color(Rgba::rgb(255, 0, 0))));
    assert_eq!(
        decl.get(CssProperty::MarginLeft),
        Some(&CssValue::Length(2.0, LengthUnit::Px))
    );
    assert_eq!(decl.len(), 5);
    assert!(sheet.style_names().is_empty());
}

/// html > body > p with `attrs`
fn paragraph_with(attrs: Attributes) -> Result<(Document, ElementId)> {
    let mut doc = Document::new();
    let body = doc.append_element(doc.root(), Tag::Body, Attributes::new())?;
    let p = doc.append_element(body, Tag::P, attrs)?;
    Ok((doc, p))
}

#[test]
fn class_rules_reach_elements_that_also_have_an_id() -> Result<()> {
    let early = sheet();
    early.add_rule(".note { color: blue }");
    let late = sheet();

    let (doc, p) = paragraph_with(Attributes::new().with(HtmlAttr::Id, "x").with(HtmlAttr::Class, "note"))?;
    let early_id = early.rule_for_element(&Tag::P, &doc.get(p)?);
    let late_id = late.rule_for_element(&Tag::P, &doc.get(p)?);
    late.add_rule(".note { color: blue }");

    assert_eq!(color(&early, early_id), Some(Rgba::rgb(0, 0, 255)));
    assert_eq!(color(&late, late_id), Some(Rgba::rgb(0, 0, 255)));
    assert_eq!(late.resolved_name(late_id).as_deref(), Some("html body p#x.note"));

    late.add_rule("#x { color: red }");
    assert_eq!(color(&late, late_id), Some(Rgba::rgb(255, 0, 0)));
    Ok(())
}

#[test]
fn class_lists_match_each_class() -> Result<()> {
    let sheet = sheet();
    sheet.add_rule(".b { color: blue }");
    let (doc, p) = paragraph_with(Attributes::new().with(HtmlAttr::Class, "a  b"))?;
    let id = sheet.rule_for_element(&Tag::P, &doc.get(p)?);
    assert_eq!(sheet.resolved_name(id).as_deref(), Some("html body p.a.b"));
    assert_eq!(color(&sheet, id), Some(Rgba::rgb(0, 0, 255)));

    sheet.add_rule("p { margin-top: 3px } b { margin-left: 9px }");
    assert_eq!(
        sheet.get(id, CssProperty::MarginTop),
        Some(CssValue::Length(3.0, LengthUnit::Px))
    );
    assert!(!sheet.is_defined(id, CssProperty::MarginLeft));
    Ok(())
}

#[test]
fn linked_sheets_see_the_element_path() -> Result<()> {
    let local = sheet();
    let linked = Arc::new(sheet());
    linked.add_rule("b { color: red } p.a { margin-top: 2px }");
    assert!(local.add_style_sheet(Arc::clone(&linked)));

    let (doc, p) = paragraph_with(Attributes::new().with(HtmlAttr::Class, "a b"))?;
    let id = local.rule_for_element(&Tag::P, &doc.get(p)?);
    assert_eq!(color(&local, id), None);
    assert_eq!(
        local.get(id, CssProperty::MarginTop),
        Some(CssValue::Length(2.0, LengthUnit::Px))
    );

    let later = Arc::new(sheet());
    later.add_rule("b { color: red } .b { margin-bottom: 1px }");
    assert!(local.add_style_sheet(Arc::clone(&later)));
    assert_eq!(color(&local, id), None);
    assert!(local.is_defined(id, CssProperty::MarginBottom));
    Ok(())
}
