//! Selector text handling for the resolver: splitting selectors into
//! per-element steps, the candidates tried against the selector graph, and
//! matching a new rule against the steps of cached resolutions.

use quill_dom::{Attributes, HtmlAttr};

/// One element of a resolution path. An element may carry an id and any
/// number of classes at once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Step {
    pub tag: String,
    pub id: Option<String>,
    pub classes: Vec<String>,
}

impl Step {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    /// Step for an element rendered as `tag` with `attrs`. The `class`
    /// attribute is a whitespace separated list.
    pub fn from_attributes(tag: &str, attrs: Option<&Attributes>) -> Step {
        let value = |key: &HtmlAttr| attrs.and_then(|a| a.get(key)).map(str::trim).filter(|v| !v.is_empty());
        Step {
            tag: tag.to_string(),
            id: value(&HtmlAttr::Id).map(str::to_string),
            classes: value(&HtmlAttr::Class)
                .map(|c| c.split_whitespace().map(str::to_string).collect())
                .unwrap_or_default(),
        }
    }

    /// Parse a simple selector such as `p`, `p.note`, `#main`, `.x` or a
    /// key step like `p#main.a.b`.
    pub fn parse(simple: &str) -> Step {
        let end_of_tag = simple.find(['.', '#']).unwrap_or(simple.len());
        let mut step = Step::new(&simple[..end_of_tag]);
        let mut rest = &simple[end_of_tag..];
        while let Some(marker) = rest.chars().next() {
            let body = &rest[1..];
            let end = body.find(['.', '#']).unwrap_or(body.len());
            let name = &body[..end];
            if !name.is_empty() {
                if marker == '#' {
                    step.id.get_or_insert_with(|| name.to_string());
                } else {
                    step.classes.push(name.to_string());
                }
            }
            rest = &body[end..];
        }
        step
    }

    /// Cache key text: `tag#id.class...`.
    pub fn key(&self) -> String {
        let mut out = self.tag.clone();
        if let Some(id) = &self.id {
            out.push('#');
            out.push_str(id);
        }
        for class in &self.classes {
            out.push('.');
            out.push_str(class);
        }
        out
    }

    /// Graph tokens to try for this step, in candidate order: `tag`, then
    /// `tag.class` and `.class` per class, then `tag#id` and `#id`.
    pub fn candidates(&self) -> Vec<String> {
        let mut out = Vec::with_capacity(3 + 2 * self.classes.len());
        if !self.tag.is_empty() {
            out.push(self.tag.clone());
        }
        for class in &self.classes {
            if !self.tag.is_empty() {
                out.push(format!("{}.{class}", self.tag));
            }
            out.push(format!(".{class}"));
        }
        if let Some(id) = &self.id {
            if !self.tag.is_empty() {
                out.push(format!("{}#{id}", self.tag));
            }
            out.push(format!("#{id}"));
        }
        out
    }

    /// Whether a rule token bound in the graph is one of this step's
    /// candidates.
    pub fn accepts(&self, token: &str) -> bool {
        self.candidates().iter().any(|p| p == token)
    }
}

/// Collapse runs of whitespace to one space and trim the ends.
pub fn clean_selector(selector: &str) -> String {
    selector.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Split a cleaned selector into steps, nearest element first.
pub fn steps_from_selector(selector: &str) -> Vec<Step> {
    selector.split(' ').rev().map(Step::parse).collect()
}

/// Cache key for `steps` given nearest first.
pub fn key_for_steps(steps: &[Step]) -> String {
    steps.iter().rev().map(Step::key).collect::<Vec<_>>().join(" ")
}

/// Whether a resolution over `steps` (nearest first) collects a rule
/// registered under `selector`. The last rule token must be a candidate of the
/// nearest step; each earlier token must be a candidate of some farther step,
/// in order. This is the walk the graph lookup performs.
pub fn selector_matches(steps: &[Step], selector: &str) -> bool {
    if selector.is_empty() {
        return false;
    }
    let mut tokens = selector.split(' ').rev();
    let (Some(last), Some((nearest, farther))) = (tokens.next(), steps.split_first()) else {
        return false;
    };
    if !nearest.accepts(last) {
        return false;
    }
    let mut farther = farther.iter();
    tokens.all(|token| farther.any(|step| step.accepts(token)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_steps() {
        assert_eq!(Step::parse("p"), Step::new("p"));
        let step = Step::parse("p.note");
        assert_eq!(step.classes, ["note"]);
        assert_eq!(step.id, None);
        let step = Step::parse("#main");
        assert_eq!(step.tag, "");
        assert_eq!(step.id.as_deref(), Some("main"));
        let step = Step::parse("div#a.b.c");
        assert_eq!(step.id.as_deref(), Some("a"));
        assert_eq!(step.classes, ["b", "c"]);
        assert_eq!(step.key(), "div#a.b.c");
    }

    #[test]
    fn class_lists_split_on_whitespace() {
        let attrs = Attributes::new()
            .with(HtmlAttr::Class, " a  b\t")
            .with(HtmlAttr::Id, "x");
        let step = Step::from_attributes("p", Some(&attrs));
        assert_eq!(step.classes, ["a", "b"]);
        assert_eq!(step.key(), "p#x.a.b");
        assert!(!step.key().contains(' '));
        assert_eq!(Step::from_attributes("p", Some(&Attributes::new().with(HtmlAttr::Class, "  "))), Step::new("p"));
    }

    #[test]
    fn candidate_order() {
        let step = Step {
            tag: "p".into(),
            id: Some("x".into()),
            classes: vec!["c".into()],
        };
        assert_eq!(step.candidates(), ["p", "p.c", ".c", "p#x", "#x"]);
        assert_eq!(Step::parse(".c").candidates(), [".c"]);
    }

    #[test]
    fn steps_are_nearest_first() {
        let steps = steps_from_selector("html body p.x");
        assert_eq!(steps[0].tag, "p");
        assert_eq!(steps[2].tag, "html");
        assert_eq!(key_for_steps(&steps), "html body p.x");
    }

    #[test]
    fn clean_collapses_whitespace() {
        assert_eq!(clean_selector("  ul \t li\n"), "ul li");
    }

    #[test]
    fn matching_rules_against_steps() {
        let matches = |key: &str, selector: &str| selector_matches(&steps_from_selector(key), selector);
        assert!(matches("html body p", "p"));
        assert!(matches("html body p", "body p"));
        assert!(matches("html body.main p", "body p"));
        assert!(matches("html body p.note", ".note"));
        assert!(matches("html body p.note", "p.note"));
        assert!(matches("html div#top p", "#top p"));
        assert!(matches("html body p#x.note", ".note"));
        assert!(matches("html body p#x.note", "p#x"));
        assert!(matches("html body p.a.b", "p"));
        assert!(matches("html body p.a.b", "p.b"));
        assert!(!matches("html body p.a.b", "b"));
        assert!(!matches("html body p", "div p"));
        assert!(!matches("html body p", "p.note"));
        assert!(!matches("html body p.other", "p.note"));
        assert!(!matches("html body p", ""));
        assert!(!matches("html body p em", "p"));
        assert!(!matches("html body p", "p body"));
    }
}
