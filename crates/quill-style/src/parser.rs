//! CSS1 tokenizer and the rule builder it drives.
//!
//! The tokenizer only finds structure (imports, selector tokens, property
//! and value text); [`RuleBuilder`] turns the callbacks into rules on a
//! [`StyleSheet`].

use tracing::debug;
use url::Url;

use crate::declaration::Declaration;
use crate::sheet::StyleSheet;

/// Receiver for the structural events found while tokenizing CSS text.
pub trait CssParserCallback {
    /// An `@import` with its url text.
    fn handle_import(&mut self, url: &str);
    /// One simple selector token. A trailing `,` ends a selector group.
    fn handle_selector(&mut self, selector: &str);
    fn start_rule(&mut self);
    fn handle_property(&mut self, property: &str);
    fn handle_value(&mut self, value: &str);
    fn end_rule(&mut self);
}

/// Tokenize `text`, reporting structure to `callback`. With
/// `declaration_only` the whole text is one declaration block, as in a
/// `style` attribute.
pub fn parse<C: CssParserCallback + ?Sized>(text: &str, callback: &mut C, declaration_only: bool) {
    let source = strip_comments(text);
    if declaration_only {
        parse_declarations(&source, callback);
        return;
    }
    let mut scanner = Scanner::new(&source);
    loop {
        scanner.skip_whitespace();
        match scanner.peek() {
            None => break,
            Some('@') => scanner.at_rule(callback),
            Some('}') => {
                // stray close brace from a malformed rule
                scanner.bump();
            }
            Some(_) => {
                let Some(prelude) = scanner.until_block() else {
                    debug!("css rule without a block ignored");
                    break;
                };
                let body = scanner.block_body();
                let groups = selector_groups(&prelude);
                if groups.is_empty() {
                    continue;
                }
                let last = groups.len() - 1;
                for (i, group) in groups.iter().enumerate() {
                    for (j, token) in group.iter().enumerate() {
                        if i < last && j == group.len() - 1 {
                            callback.handle_selector(&format!("{token},"));
                        } else {
                            callback.handle_selector(token);
                        }
                    }
                }
                callback.start_rule();
                parse_declarations(&body, callback);
                callback.end_rule();
            }
        }
    }
}

/// Report every `name: value` pair in a declaration block.
fn parse_declarations<C: CssParserCallback + ?Sized>(body: &str, callback: &mut C) {
    for part in split_outside_quotes(body, ';') {
        let Some((name, value)) = part.split_once(':') else {
            if !part.trim().is_empty() {
                debug!(declaration = %part.trim(), "malformed css declaration skipped");
            }
            continue;
        };
        let name = name.trim();
        let value = strip_important(value.trim());
        if name.is_empty() || value.is_empty() {
            continue;
        }
        callback.handle_property(name);
        callback.handle_value(value);
    }
}

fn strip_important(value: &str) -> &str {
    let lower = value.to_ascii_lowercase();
    match lower.rfind("!important") {
        Some(at) if lower[at..].trim() == "!important" => value[..at].trim_end(),
        _ => value,
    }
}

/// Split a selector prelude into comma separated groups of simple
/// selectors. Groups holding a token this cascade cannot match are dropped.
fn selector_groups(prelude: &str) -> Vec<Vec<String>> {
    prelude
        .split(',')
        .filter_map(|group| {
            let tokens: Vec<&str> = group.split_whitespace().collect();
            if tokens.is_empty() {
                return None;
            }
            if let Some(bad) = tokens.iter().find(|t| !is_simple_selector(t)) {
                debug!(selector = %group.trim(), token = %bad, "unsupported css selector skipped");
                return None;
            }
            Some(tokens.into_iter().map(normalize_token).collect())
        })
        .collect()
}

/// A tag with at most one `.class` or `#id` qualifier; the selector graph
/// has no candidate for anything more qualified.
fn is_simple_selector(token: &str) -> bool {
    let qualifiers = token.chars().filter(|c| matches!(c, '.' | '#')).count();
    qualifiers <= 1
        && !token.ends_with(['.', '#'])
        && token
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '-' | '_' | '.' | '#'))
}

/// Tag names compare lowercased; class and id keep their case.
fn normalize_token(token: &str) -> String {
    let split = token.find(['.', '#']).unwrap_or(token.len());
    let (tag, rest) = token.split_at(split);
    format!("{}{rest}", tag.to_ascii_lowercase())
}

fn strip_comments(source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    let mut chars = source.chars().peekable();
    let mut in_comment = false;
    while let Some(ch) = chars.next() {
        if in_comment {
            if ch == '*' && chars.peek() == Some(&'/') {
                chars.next();
                in_comment = false;
            }
        } else if ch == '/' && chars.peek() == Some(&'*') {
            chars.next();
            in_comment = true;
        } else {
            out.push(ch);
        }
    }
    // SGML comment delimiters are allowed around style element content
    out.replace("<!--", " ").replace("-->", " ")
}

/// Split on `sep` outside quoted strings and parentheses.
fn split_outside_quotes(text: &str, sep: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut quote: Option<char> = None;
    let mut depth = 0usize;
    let mut start = 0;
    for (i, ch) in text.char_indices() {
        match (quote, ch) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(ch),
            (None, '(') => depth += 1,
            (None, ')') => depth = depth.saturating_sub(1),
            (None, c) if c == sep && depth == 0 => {
                parts.push(&text[start..i]);
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }
    parts.push(&text[start..]);
    parts
}

/// Pull the location out of `url(...)`, a quoted string, or bare text.
fn import_target(arg: &str) -> Option<String> {
    let arg = arg.trim();
    let inner = match arg
        .strip_prefix("url(")
        .or_else(|| arg.strip_prefix("URL("))
    {
        Some(rest) => rest.split(')').next().unwrap_or(rest),
        None => arg.split_whitespace().next().unwrap_or(arg),
    };
    let target = inner.trim().trim_matches(['"', '\'']).trim();
    (!target.is_empty()).then(|| target.to_string())
}

struct Scanner<'a> {
    source: &'a str,
    pos: usize,
}

impl<'a> Scanner<'a> {
    fn new(source: &'a str) -> Self {
        Self { source, pos: 0 }
    }

    fn peek(&self) -> Option<char> {
        self.source[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    /// Consume up to the next `stop` character outside quotes, returning
    /// the text before it and the stop character found.
    fn until(&mut self, stops: &[char]) -> (&'a str, Option<char>) {
        let start = self.pos;
        let mut quote: Option<char> = None;
        while let Some(ch) = self.peek() {
            match quote {
                Some(q) if ch == q => quote = None,
                Some(_) => {}
                None if ch == '"' || ch == '\'' => quote = Some(ch),
                None if stops.contains(&ch) => {
                    let text = &self.source[start..self.pos];
                    self.bump();
                    return (text, Some(ch));
                }
                None => {}
            }
            self.bump();
        }
        (&self.source[start..], None)
    }

    /// Selector text before the next `{`, consuming the brace.
    fn until_block(&mut self) -> Option<String> {
        loop {
            match self.until(&['{', '}']) {
                (text, Some('{')) => return Some(text.to_string()),
                // a `}` before any `{`: drop what came before and retry
                (_, Some(_)) => continue,
                (_, None) => return None,
            }
        }
    }

    /// Body of a block whose `{` was consumed, up to its matching `}`.
    fn block_body(&mut self) -> String {
        let mut body = String::new();
        let mut depth = 1usize;
        loop {
            let (text, stop) = self.until(&['{', '}']);
            body.push_str(text);
            match stop {
                Some('{') => {
                    depth += 1;
                    body.push('{');
                }
                Some(_) => {
                    depth -= 1;
                    if depth == 0 {
                        break;
                    }
                    body.push('}');
                }
                None => break,
            }
        }
        if body.contains('{') {
            debug!("nested block inside a css rule ignored");
            // keep the declarations before the nested block
            body.truncate(body.find('{').unwrap_or(body.len()));
            if let Some(cut) = body.rfind(';') {
                body.truncate(cut);
            } else {
                body.clear();
            }
        }
        body
    }

    fn at_rule<C: CssParserCallback + ?Sized>(&mut self, callback: &mut C) {
        self.bump();
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|c| c.is_alphanumeric() || c == '-')
        {
            self.bump();
        }
        let keyword = self.source[start..self.pos].to_ascii_lowercase();
        let (arg, stop) = self.until(&[';', '{']);
        if stop == Some('{') {
            debug!(rule = %keyword, "css at-rule block skipped");
            self.block_body();
            return;
        }
        if keyword == "import" {
            match import_target(arg) {
                Some(target) => callback.handle_import(&target),
                None => debug!(arg = %arg.trim(), "css @import without a location"),
            }
        } else {
            debug!(rule = %keyword, "css at-rule skipped");
        }
    }
}

/// Turns parser callbacks into rules on a sheet.
pub struct RuleBuilder<'a> {
    sheet: &'a StyleSheet,
    base: Option<Url>,
    is_link: bool,
    import_depth: usize,
    selectors: Vec<Vec<String>>,
    tokens: Vec<String>,
    property: Option<String>,
    declaration: Declaration,
}

impl<'a> RuleBuilder<'a> {
    /// Rules land in `sheet`; relative imports resolve against `base`.
    /// With `is_link` the declarations sit behind the sheet's own.
    pub fn new(sheet: &'a StyleSheet, base: Option<Url>, is_link: bool) -> Self {
        Self {
            sheet,
            base,
            is_link,
            import_depth: 0,
            selectors: Vec::new(),
            tokens: Vec::new(),
            property: None,
            declaration: Declaration::new(),
        }
    }

    /// Nesting depth at which this builder's own imports are requested.
    pub(crate) fn at_depth(mut self, depth: usize) -> Self {
        self.import_depth = depth;
        self
    }

    /// The declaration collected so far (used for `style` attributes).
    pub fn into_declaration(self) -> Declaration {
        self.declaration
    }

    fn add_selector(&mut self) {
        self.selectors.push(std::mem::take(&mut self.tokens));
    }
}

impl CssParserCallback for RuleBuilder<'_> {
    fn handle_import(&mut self, url: &str) {
        let target = match (&self.base, Url::parse(url)) {
            (_, Ok(absolute)) => absolute.to_string(),
            (Some(base), Err(_)) => match base.join(url) {
                Ok(joined) => joined.to_string(),
                Err(err) => {
                    debug!(url, error = %err, "css @import could not be resolved");
                    return;
                }
            },
            (None, Err(_)) => url.to_string(),
        };
        self.sheet.import_at_depth(&target, self.import_depth);
    }

    fn handle_selector(&mut self, selector: &str) {
        if let Some(token) = selector.strip_suffix(',') {
            if !token.is_empty() {
                self.tokens.push(token.to_string());
            }
            self.add_selector();
        } else if !selector.is_empty() {
            self.tokens.push(selector.to_string());
        }
    }

    fn start_rule(&mut self) {
        if !self.tokens.is_empty() {
            self.add_selector();
        }
        self.property = None;
    }

    fn handle_property(&mut self, property: &str) {
        self.property = Some(property.to_string());
    }

    fn handle_value(&mut self, value: &str) {
        if let Some(property) = self.property.take() {
            if !self.declaration.add_css_attribute(&property, value) {
                debug!(property = %property, value, "css declaration not understood");
            }
        }
    }

    fn end_rule(&mut self) {
        for selector in self.selectors.drain(..) {
            if !selector.is_empty() {
                self.sheet
                    .add_rule_tokens(&selector, &self.declaration, self.is_link);
            }
        }
        self.declaration.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        events: Vec<String>,
    }

    impl CssParserCallback for Recorder {
        fn handle_import(&mut self, url: &str) {
            self.events.push(format!("import {url}"));
        }
        fn handle_selector(&mut self, selector: &str) {
            self.events.push(format!("sel {selector}"));
        }
        fn start_rule(&mut self) {
            self.events.push("start".into());
        }
        fn handle_property(&mut self, property: &str) {
            self.events.push(format!("prop {property}"));
        }
        fn handle_value(&mut self, value: &str) {
            self.events.push(format!("value {value}"));
        }
        fn end_rule(&mut self) {
            self.events.push("end".into());
        }
    }

    fn record(text: &str, declaration_only: bool) -> Vec<String> {
        let mut recorder = Recorder::default();
        parse(text, &mut recorder, declaration_only);
        recorder.events
    }

    #[test]
    fn rule_events() {
        let events = record("H1, h2.Big { color: red; margin-top: 2px }", false);
        assert_eq!(
            events,
            [
                "sel h1,",
                "sel h2.Big",
                "start",
                "prop color",
                "value red",
                "prop margin-top",
                "value 2px",
                "end"
            ]
        );
    }

    #[test]
    fn imports_and_comments() {
        let events = record(
            "/* top */ @import url(\"a.css\"); @import 'b.css'; @media print { p { color: red } } p { }",
            false,
        );
        assert_eq!(events, ["import a.css", "import b.css", "sel p", "start", "end"]);
    }

    #[test]
    fn unsupported_selector_group_is_skipped() {
        let events = record("a:hover, p { color: red }", false);
        assert_eq!(events, ["sel p", "start", "prop color", "value red", "end"]);
        let events = record("a:hover { color: red } em { color: blue }", false);
        assert_eq!(events[0], "sel em");
    }

    #[test]
    fn over_qualified_selectors_are_skipped() {
        let events = record("p.a.b { color: red } p#a#b { color: red } div#a.b { color: red } p.a { color: red }", false);
        assert_eq!(events, ["sel p.a", "start", "prop color", "value red", "end"]);
    }

    #[test]
    fn malformed_declarations_skip_to_next() {
        let events = record("color red; font-size: 12pt !important; : x", true);
        assert_eq!(events, ["prop font-size", "value 12pt"]);
    }

    #[test]
    fn quoted_semicolons_stay_in_value() {
        let events = record("font-family: \"a;b\", serif", true);
        assert_eq!(events, ["prop font-family", "value \"a;b\", serif"]);
    }

    #[test]
    fn stray_close_brace_is_ignored() {
        let events = record("} p { color: red }", false);
        assert_eq!(events[0], "sel p");
    }
}
