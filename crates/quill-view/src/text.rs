//! Break opportunities and word segments for inline flow.

use core::ops::Range;

use unicode_linebreak::{BreakOpportunity, linebreaks};
use unicode_segmentation::UnicodeSegmentation;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineBreakKind {
    /// Required line break (e.g., explicit newline).
    Mandatory,
    /// Optional line break opportunity.
    Opportunity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineBreak {
    /// Byte offset *after* the break.
    pub offset: usize,
    pub kind: LineBreakKind,
}

/// UAX-14 break opportunities. The end of the text is always reported as
/// a mandatory break.
pub fn compute_line_breaks(text: &str) -> Vec<LineBreak> {
    linebreaks(text)
        .map(|(offset, opp)| LineBreak {
            offset,
            kind: match opp {
                BreakOpportunity::Mandatory => LineBreakKind::Mandatory,
                BreakOpportunity::Allowed => LineBreakKind::Opportunity,
            },
        })
        .collect()
}

/// Byte ranges of the word segments of `text`, skipping whitespace and
/// punctuation runs.
pub fn words(text: &str) -> Vec<Range<usize>> {
    text.split_word_bound_indices()
        .filter(|(_, segment)| segment.chars().any(|c| c.is_alphanumeric()))
        .map(|(start, segment)| start..start + segment.len())
        .collect()
}

/// Number of user-perceived characters.
pub fn grapheme_count(text: &str) -> usize {
    text.graphemes(true).count()
}

/// Collapse whitespace runs to single spaces, as normal flow does.
pub fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_space = false;
    for c in text.chars() {
        if c.is_whitespace() {
            if !in_space {
                out.push(' ');
            }
            in_space = true;
        } else {
            out.push(c);
            in_space = false;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_breaks_basic_with_newline() {
        let breaks = compute_line_breaks("a b \nc");
        assert!(breaks.iter().any(|b| b.kind == LineBreakKind::Mandatory && b.offset == 5));
        assert!(breaks.iter().any(|b| b.kind == LineBreakKind::Opportunity && b.offset == 2));
    }

    #[test]
    fn word_segments() {
        let text = "Hello, world!";
        let ranges = words(text);
        assert_eq!(ranges.len(), 2);
        assert_eq!(&text[ranges[0].clone()], "Hello");
        assert_eq!(&text[ranges[1].clone()], "world");
    }

    #[test]
    fn whitespace_collapses() {
        assert_eq!(collapse_whitespace("a \n\t b  "), "a b ");
        assert_eq!(grapheme_count("e\u{301}x"), 2);
    }
}
