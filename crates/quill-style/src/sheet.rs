//! The style sheet: named rules bound into a selector graph, the cache of
//! resolved styles built from them, and the sheets linked behind it.
//!
//! All mutable state sits behind one mutex per sheet. Graph walks hold it
//! for the walk only. Resolution may call into a linked sheet while the
//! receiver is locked; linking refuses cycles so that order is always
//! receiver first.

use std::cmp::Reverse;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use quill_config::{QuillConfig, StyleConfig};
use quill_dom::{Attributes, Element, Tag};
use tracing::{debug, info, warn};
use url::Url;

use crate::cascade::{Step, clean_selector, key_for_steps, selector_matches, steps_from_selector};
use crate::declaration::Declaration;
use crate::error::StyleError;
use crate::graph::{NodeId, SelectorGraph, specificity_of};
use crate::parser::{RuleBuilder, parse};
use crate::property::CssProperty;
use crate::value::CssValue;

/// Handle on a named rule (or on the hidden block holding a rule's
/// imported declarations).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RuleId(usize);

impl RuleId {
    pub(crate) fn from_index(index: usize) -> Self {
        RuleId(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

/// Handle on a resolved style. Only meaningful for the sheet that issued
/// it, and valid for that sheet's whole lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResolvedId(usize);

#[derive(Debug, Clone)]
pub struct Style {
    name: String,
    declaration: Declaration,
    resolve_parent: Option<RuleId>,
    specificity: u32,
    sequence: u64,
}

impl Style {
    fn new(name: String) -> Self {
        Self {
            specificity: specificity_of(&name),
            name,
            declaration: Declaration::new(),
            resolve_parent: None,
            sequence: 0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn declaration(&self) -> &Declaration {
        &self.declaration
    }

    /// Block holding declarations that arrived through an imported sheet.
    pub fn resolve_parent(&self) -> Option<RuleId> {
        self.resolve_parent
    }

    pub fn specificity(&self) -> u32 {
        self.specificity
    }
}

/// Cached cascade result for one ancestor-qualified selector.
#[derive(Debug, Clone)]
pub struct ResolvedStyle {
    key: String,
    steps: Vec<Step>,
    rules: Vec<RuleId>,
    linked: Vec<Option<ResolvedId>>,
}

impl ResolvedStyle {
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The element path this style was resolved for, nearest first.
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Local rules, most specific first.
    pub fn rules(&self) -> &[RuleId] {
        &self.rules
    }

    /// One slot per linked sheet, in link order.
    pub fn linked(&self) -> &[Option<ResolvedId>] {
        &self.linked
    }
}

#[derive(Debug)]
pub(crate) struct SheetState {
    graph: SelectorGraph,
    styles: Vec<Option<Style>>,
    names: HashMap<String, RuleId>,
    resolved: Vec<ResolvedStyle>,
    resolved_keys: HashMap<String, ResolvedId>,
    linked: Option<Vec<Arc<StyleSheet>>>,
    next_sequence: u64,
    base: Option<Url>,
    pub(crate) base_font_index: i32,
}

impl SheetState {
    fn new() -> Self {
        Self {
            graph: SelectorGraph::new(),
            styles: Vec::new(),
            names: HashMap::new(),
            resolved: Vec::new(),
            resolved_keys: HashMap::new(),
            linked: None,
            next_sequence: 0,
            base: None,
            base_font_index: 3,
        }
    }

    fn register(&mut self, mut style: Style) -> RuleId {
        let id = RuleId(self.styles.len());
        style.sequence = self.next_sequence;
        self.next_sequence += 1;
        if !style.name.is_empty() {
            self.names.insert(style.name.clone(), id);
        }
        self.styles.push(Some(style));
        id
    }

    fn style(&self, rule: RuleId) -> Option<&Style> {
        self.styles.get(rule.0)?.as_ref()
    }

    fn style_mut(&mut self, rule: RuleId) -> Option<&mut Style> {
        self.styles.get_mut(rule.0)?.as_mut()
    }

    /// The resolve parent of `rule`, created on first use.
    fn linked_style(&mut self, rule: RuleId) -> RuleId {
        if let Some(parent) = self.style(rule).and_then(|s| s.resolve_parent) {
            return parent;
        }
        let parent = self.register(Style::new(String::new()));
        if let Some(style) = self.style_mut(rule) {
            style.resolve_parent = Some(parent);
        }
        parent
    }

    /// Value of `key` in `rule` or along its resolve-parent chain.
    fn style_value(&self, rule: RuleId, key: CssProperty) -> Option<&CssValue> {
        let mut cursor = Some(rule);
        while let Some(id) = cursor {
            let style = self.style(id)?;
            if let Some(value) = style.declaration.get(key) {
                return Some(value);
            }
            cursor = style.resolve_parent;
        }
        None
    }

    /// Flatten `rule` and its resolve parents into `out`, nearest winning.
    fn merge_style_into(&self, rule: RuleId, out: &mut Declaration) {
        let mut chain = Vec::new();
        let mut cursor = Some(rule);
        while let Some(style) = cursor.and_then(|id| self.style(id)) {
            chain.push(style);
            cursor = style.resolve_parent;
        }
        for style in chain.into_iter().rev() {
            out.merge(&style.declaration);
        }
    }

    fn collect_rules(&self, steps: &[Step]) -> Vec<RuleId> {
        let graph = &self.graph;
        let mut visited = HashSet::new();
        let mut found = Vec::new();
        if let Some(first) = steps.first() {
            for candidate in first.candidates() {
                if let Some(child) = graph.child(graph.root(), &candidate) {
                    walk(graph, child, steps, 1, &mut visited, &mut found);
                }
            }
        }
        let mut rules: Vec<RuleId> = found
            .into_iter()
            .filter_map(|node| graph.node(node).rule())
            .collect();
        rules.sort_by_key(|rule| Reverse(order_key(&self.styles, *rule)));
        rules
    }

    /// Insert a newly bound rule into every cached style it matches.
    fn refresh_resolved_rules(&mut self, selector: &str, rule: RuleId) -> usize {
        let key = order_key(&self.styles, rule);
        let mut refreshed = 0;
        for entry in &mut self.resolved {
            if entry.rules.contains(&rule) || !selector_matches(&entry.steps, selector) {
                continue;
            }
            let at = entry
                .rules
                .iter()
                .position(|other| order_key(&self.styles, *other) < key)
                .unwrap_or(entry.rules.len());
            entry.rules.insert(at, rule);
            refreshed += 1;
        }
        refreshed
    }
}

/// Ordering key of a rule: higher specificity first, then later
/// registration first.
fn order_key(styles: &[Option<Style>], rule: RuleId) -> (u32, u64) {
    styles
        .get(rule.0)
        .and_then(Option::as_ref)
        .map(|s| (s.specificity, s.sequence))
        .unwrap_or_default()
}

fn walk(
    graph: &SelectorGraph,
    node: NodeId,
    steps: &[Step],
    index: usize,
    visited: &mut HashSet<NodeId>,
    found: &mut Vec<NodeId>,
) {
    if !visited.insert(node) {
        return;
    }
    if graph.node(node).rule().is_some() {
        found.push(node);
    }
    for (counter, step) in steps.iter().enumerate().skip(index) {
        for candidate in step.candidates() {
            if let Some(child) = graph.child(node, &candidate) {
                walk(graph, child, steps, counter + 1, visited, found);
            }
        }
    }
}

#[derive(Debug)]
pub struct StyleSheet {
    state: Mutex<SheetState>,
    config: StyleConfig,
    diagnostics: bool,
}

impl Default for StyleSheet {
    fn default() -> Self {
        Self::new()
    }
}

impl StyleSheet {
    /// An empty sheet using the process-wide configuration.
    pub fn new() -> Self {
        Self::with_config(quill_config::global())
    }

    pub fn with_config(config: &QuillConfig) -> Self {
        Self {
            state: Mutex::new(SheetState::new()),
            config: config.style.clone(),
            diagnostics: config.diagnostics_enabled("css"),
        }
    }

    pub(crate) fn lock(&self) -> MutexGuard<'_, SheetState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn config(&self) -> &StyleConfig {
        &self.config
    }

    /// Base that relative imports resolve against.
    pub fn set_base(&self, base: Option<Url>) {
        self.lock().base = base;
    }

    pub fn base(&self) -> Option<Url> {
        self.lock().base.clone()
    }

    /// Parse CSS text and register every rule in it.
    pub fn add_rule(&self, css: &str) {
        let base = self.base();
        self.load_rules(css, base.as_ref());
    }

    /// Like [`StyleSheet::add_rule`], resolving imports against `base`.
    pub fn load_rules(&self, css: &str, base: Option<&Url>) {
        let mut builder = RuleBuilder::new(self, base.cloned(), false);
        parse(css, &mut builder, false);
    }

    /// Parse the body of an inline `style` attribute.
    pub fn declaration(&self, text: &str) -> Declaration {
        let mut builder = RuleBuilder::new(self, None, false);
        parse(text, &mut builder, true);
        builder.into_declaration()
    }

    /// Register `declaration` under the selector made of `selector`'s
    /// simple selectors, outermost first. With `is_linked` the values land
    /// in the rule's resolve parent, behind anything declared locally.
    pub fn add_rule_tokens<S: AsRef<str>>(
        &self,
        selector: &[S],
        declaration: &Declaration,
        is_linked: bool,
    ) {
        let tokens: Vec<&str> = selector
            .iter()
            .map(AsRef::as_ref)
            .filter(|t| !t.is_empty())
            .collect();
        if tokens.is_empty() {
            return;
        }
        let name = tokens.join(" ");
        let fresh = Style::new(name.clone());

        let mut state = self.lock();
        let existing = state.names.get(&name).copied();
        let rule = match existing {
            Some(rule) => rule,
            None => {
                if state.names.len() >= self.config.max_rules {
                    warn!(selector = %name, max_rules = self.config.max_rules, "style sheet rule limit reached");
                    return;
                }
                state.register(fresh)
            }
        };
        let mut node = state.graph.root();
        for token in tokens.iter().rev() {
            node = state.graph.child_or_insert(node, token);
        }
        if state.graph.bind(node, rule) {
            let specificity = state.graph.node(node).specificity();
            if let Some(style) = state.style_mut(rule) {
                style.specificity = specificity;
            }
            let refreshed = state.refresh_resolved_rules(&name, rule);
            if self.diagnostics {
                info!(selector = %name, specificity, refreshed, "diagnostics: rule bound");
            }
        }
        let target = if is_linked {
            state.linked_style(rule)
        } else {
            rule
        };
        if let Some(style) = state.style_mut(target) {
            style.declaration.merge(declaration);
        }
    }

    /// Drop the rule registered under `name`. Resolved styles that used it
    /// stay alive and simply stop seeing its declarations.
    pub fn remove_style(&self, name: &str) -> bool {
        let selector = clean_selector(name);
        let tokens: Vec<&str> = selector.split(' ').collect();
        let mut state = self.lock();
        let Some(rule) = state.names.remove(&selector) else {
            return false;
        };
        if let Some(node) = state.graph.find_path(&tokens) {
            if state.graph.node(node).rule() == Some(rule) {
                state.graph.unbind(node);
            }
        }
        let mut dropped = 0;
        for entry in &mut state.resolved {
            let before = entry.rules.len();
            entry.rules.retain(|r| *r != rule);
            dropped += before - entry.rules.len();
        }
        let mut cursor = Some(rule);
        while let Some(id) = cursor {
            cursor = state
                .styles
                .get_mut(id.0)
                .and_then(Option::take)
                .and_then(|style| style.resolve_parent);
        }
        if self.diagnostics {
            info!(selector = %selector, dropped, "diagnostics: rule removed");
        }
        true
    }

    /// Resolved style for `element` rendered as `tag`. For a content run,
    /// `tag` names one of its enclosing inline tags and that tag's own
    /// attributes qualify the last step.
    pub fn rule_for_element<E: Element>(&self, tag: &Tag, element: &E) -> ResolvedId {
        let mut ancestors = Vec::new();
        let mut cursor = element.parent();
        while let Some(parent) = cursor {
            cursor = parent.parent();
            ancestors.push(parent);
        }
        let own: Option<&Attributes> = if element.is_leaf() {
            element.inline_attributes(tag)
        } else {
            Some(element.attributes())
        };

        let mut steps = Vec::with_capacity(ancestors.len() + 1);
        steps.push(Step::from_attributes(tag.name(), own));
        steps.extend(
            ancestors
                .iter()
                .map(|a| Step::from_attributes(a.tag().name(), Some(a.attributes()))),
        );
        let key = key_for_steps(&steps);
        self.resolve(&key, || steps)
    }

    /// Resolved style for a literal selector such as `#main p`.
    pub fn rule(&self, selector: &str) -> Option<ResolvedId> {
        let key = clean_selector(selector);
        if key.is_empty() {
            return None;
        }
        Some(self.resolve(&key, || steps_from_selector(&key)))
    }

    fn resolve(&self, key: &str, steps: impl FnOnce() -> Vec<Step>) -> ResolvedId {
        let mut state = self.lock();
        if let Some(id) = state.resolved_keys.get(key) {
            return *id;
        }
        let steps = steps();
        let rules = state.collect_rules(&steps);
        let linked: Vec<Option<ResolvedId>> = state
            .linked
            .iter()
            .flatten()
            .map(|sheet| Some(sheet.resolve(key, Box::new(|| steps.clone()) as Box<dyn FnOnce() -> Vec<Step> + '_>)))
            .collect();
        if self.diagnostics {
            info!(key, matched_rules = rules.len(), linked = linked.len(), "diagnostics: style resolved");
        }
        let id = ResolvedId(state.resolved.len());
        state.resolved.push(ResolvedStyle {
            key: key.to_string(),
            steps,
            rules,
            linked,
        });
        state.resolved_keys.insert(key.to_string(), id);
        id
    }

    /// First defined value of `key`: local rules in order, then each
    /// linked sheet's slot in link order.
    pub fn get(&self, id: ResolvedId, key: CssProperty) -> Option<CssValue> {
        let state = self.lock();
        let entry = state.resolved.get(id.0)?;
        for rule in &entry.rules {
            if let Some(value) = state.style_value(*rule, key) {
                return Some(value.clone());
            }
        }
        let sheets = state.linked.as_deref().unwrap_or(&[]);
        entry
            .linked
            .iter()
            .zip(sheets)
            .find_map(|(slot, sheet)| sheet.get((*slot)?, key))
    }

    pub fn is_defined(&self, id: ResolvedId, key: CssProperty) -> bool {
        self.get(id, key).is_some()
    }

    /// Every value visible through `id`, flattened with first-match
    /// precedence preserved.
    pub fn copy_attributes(&self, id: ResolvedId) -> Declaration {
        let state = self.lock();
        let mut out = Declaration::new();
        let Some(entry) = state.resolved.get(id.0) else {
            return out;
        };
        let sheets = state.linked.as_deref().unwrap_or(&[]);
        for (slot, sheet) in entry.linked.iter().zip(sheets).rev() {
            if let Some(slot) = slot {
                out.merge(&sheet.copy_attributes(*slot));
            }
        }
        for rule in entry.rules.iter().rev() {
            state.merge_style_into(*rule, &mut out);
        }
        out
    }

    pub fn attribute_count(&self, id: ResolvedId) -> usize {
        self.copy_attributes(id).len()
    }

    pub fn resolved(&self, id: ResolvedId) -> Option<ResolvedStyle> {
        self.lock().resolved.get(id.0).cloned()
    }

    pub fn resolved_name(&self, id: ResolvedId) -> Option<String> {
        self.lock().resolved.get(id.0).map(|r| r.key.clone())
    }

    pub fn resolved_names(&self) -> Vec<String> {
        self.lock().resolved.iter().map(|r| r.key.clone()).collect()
    }

    pub fn style(&self, name: &str) -> Option<Style> {
        let state = self.lock();
        let rule = *state.names.get(&clean_selector(name))?;
        state.style(rule).cloned()
    }

    pub fn style_by_id(&self, rule: RuleId) -> Option<Style> {
        self.lock().style(rule).cloned()
    }

    /// Names of all registered rules, sorted.
    pub fn style_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.lock().names.keys().cloned().collect();
        names.sort();
        names
    }

    /// Link `sheet` behind this one. Newer links are consulted before
    /// older ones, and all of them after local rules. Linking a sheet to
    /// itself, twice, or into a cycle is refused.
    pub fn add_style_sheet(&self, sheet: Arc<StyleSheet>) -> bool {
        if std::ptr::eq(Arc::as_ptr(&sheet), self) || sheet.links_to(self) {
            warn!("refusing to link a style sheet that would form a cycle");
            return false;
        }
        let mut state = self.lock();
        let list = state.linked.get_or_insert_with(Vec::new);
        if list.iter().any(|s| Arc::ptr_eq(s, &sheet)) {
            return false;
        }
        list.insert(0, Arc::clone(&sheet));
        for entry in &mut state.resolved {
            let slot = sheet.resolve(&entry.key, || entry.steps.clone());
            entry.linked.insert(0, Some(slot));
        }
        debug!(linked = state.linked.as_ref().map_or(0, Vec::len), "style sheet linked");
        true
    }

    pub fn remove_style_sheet(&self, sheet: &Arc<StyleSheet>) -> bool {
        let mut state = self.lock();
        let Some(list) = state.linked.as_mut() else {
            return false;
        };
        let Some(index) = list.iter().position(|s| Arc::ptr_eq(s, sheet)) else {
            return false;
        };
        list.remove(index);
        if list.is_empty() {
            state.linked = None;
        }
        for entry in &mut state.resolved {
            if index < entry.linked.len() {
                entry.linked.remove(index);
            }
        }
        true
    }

    /// Linked sheets in lookup order.
    pub fn style_sheets(&self) -> Vec<Arc<StyleSheet>> {
        self.lock().linked.clone().unwrap_or_default()
    }

    fn links_to(&self, target: &StyleSheet) -> bool {
        self.style_sheets()
            .iter()
            .any(|s| std::ptr::eq(Arc::as_ptr(s), target) || s.links_to(target))
    }

    /// Load rules from `url` behind the local ones. Failures leave the
    /// sheet unchanged.
    pub fn import_style_sheet(&self, url: &str) {
        self.import_at_depth(url, 0);
    }

    /// [`StyleSheet::import_style_sheet`] reporting why nothing was loaded.
    pub fn try_import_style_sheet(&self, url: &str) -> Result<(), StyleError> {
        self.try_import(url, 0)
    }

    pub(crate) fn import_at_depth(&self, url: &str, depth: usize) {
        if let Err(err) = self.try_import(url, depth) {
            debug!(url, error = %err, "style sheet import skipped");
        }
    }

    fn try_import(&self, url: &str, depth: usize) -> Result<(), StyleError> {
        if depth >= self.config.max_import_depth {
            return Err(StyleError::ImportTooDeep(self.config.max_import_depth));
        }
        let base = self.base();
        let (text, location) = read_style_source(url, base.as_ref())?;
        let mut builder = RuleBuilder::new(self, location, true).at_depth(depth + 1);
        parse(&text, &mut builder, false);
        Ok(())
    }
}

/// Fetch style sheet text. Absolute `file:` URLs and plain paths are read
/// from disk; relative references resolve against `base`. Returns the text
/// and the location nested imports resolve against.
fn read_style_source(href: &str, base: Option<&Url>) -> Result<(String, Option<Url>), StyleError> {
    let trimmed = href.trim();
    let resolved = match Url::parse(trimmed) {
        Ok(url) => Some(url),
        Err(url::ParseError::RelativeUrlWithoutBase) => base.map(|b| b.join(trimmed)).transpose()?,
        Err(err) => return Err(err.into()),
    };
    match resolved {
        Some(url) if url.scheme() == "file" => {
            let path = url
                .to_file_path()
                .map_err(|_| StyleError::UnsupportedScheme(url.scheme().to_string()))?;
            let text = fs::read_to_string(&path).map_err(|source| StyleError::Io { path, source })?;
            Ok((text, Some(url)))
        }
        Some(url) => Err(StyleError::UnsupportedScheme(url.scheme().to_string())),
        None => {
            let path = PathBuf::from(trimmed);
            let text = fs::read_to_string(&path).map_err(|source| StyleError::Io {
                path: path.clone(),
                source,
            })?;
            let location = fs::canonicalize(&path)
                .ok()
                .and_then(|p| Url::from_file_path(p).ok());
            Ok((text, location))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sheet() -> StyleSheet {
        StyleSheet::with_config(&QuillConfig::default())
    }

    fn decl(name: &str, value: &str) -> Declaration {
        let mut d = Declaration::new();
        d.add_css_attribute(name, value);
        d
    }

    #[test]
    fn same_selector_reuses_rule() {
        let sheet = sheet();
        sheet.add_rule_tokens(&["p"], &decl("color", "red"), false);
        sheet.add_rule_tokens(&["p"], &decl("margin-top", "4px"), false);
        assert_eq!(sheet.style_names(), ["p"]);
        let style = sheet.style("p").unwrap();
        assert_eq!(style.declaration().len(), 2);
        assert_eq!(style.specificity(), 1);
    }

    #[test]
    fn linked_declarations_sit_behind_local_ones() {
        let sheet = sheet();
        sheet.add_rule_tokens(&["p"], &decl("color", "red"), true);
        sheet.add_rule_tokens(&["p"], &decl("color", "blue"), false);
        sheet.add_rule_tokens(&["p"], &decl("margin-top", "2px"), true);
        let id = sheet.rule("p").unwrap();
        let color = sheet.get(id, CssProperty::Color).and_then(|v| v.color());
        assert_eq!(color, Some(crate::value::Rgba::rgb(0, 0, 255)));
        assert!(sheet.is_defined(id, CssProperty::MarginTop));
        let style = sheet.style("p").unwrap();
        assert!(style.resolve_parent().is_some());
    }

    #[test]
    fn rule_limit_is_enforced() {
        let mut config = QuillConfig::default();
        config.style.max_rules = 1;
        let sheet = StyleSheet::with_config(&config);
        sheet.add_rule_tokens(&["p"], &decl("color", "red"), false);
        sheet.add_rule_tokens(&["div"], &decl("color", "red"), false);
        assert_eq!(sheet.style_names(), ["p"]);
    }

    #[test]
    fn empty_selector_has_no_rule() {
        let sheet = sheet();
        assert!(sheet.rule("   ").is_none());
        sheet.add_rule_tokens::<&str>(&[], &decl("color", "red"), false);
        assert!(sheet.style_names().is_empty());
    }

    #[test]
    fn self_link_is_refused() {
        let a = Arc::new(sheet());
        assert!(!a.add_style_sheet(Arc::clone(&a)));
        let b = Arc::new(sheet());
        assert!(a.add_style_sheet(Arc::clone(&b)));
        assert!(!a.add_style_sheet(Arc::clone(&b)));
        assert!(!b.add_style_sheet(Arc::clone(&a)));
    }
}
