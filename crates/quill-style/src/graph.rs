//! Selector graph.
//!
//! An inverted trie over simple selectors. A rule `div p.note` is stored
//! along the path `p.note` -> `div` from the root, so the first level of
//! the graph is keyed by the selector nearest the matched element.

use std::collections::HashMap;

use crate::sheet::RuleId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Default)]
pub struct SelectorNode {
    children: HashMap<String, NodeId>,
    rule: Option<RuleId>,
    specificity: u32,
}

impl SelectorNode {
    pub fn rule(&self) -> Option<RuleId> {
        self.rule
    }

    pub fn specificity(&self) -> u32 {
        self.specificity
    }
}

#[derive(Debug)]
pub struct SelectorGraph {
    nodes: Vec<SelectorNode>,
}

impl Default for SelectorGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl SelectorGraph {
    pub fn new() -> Self {
        Self {
            nodes: vec![SelectorNode::default()],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn node(&self, id: NodeId) -> &SelectorNode {
        &self.nodes[id.0]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    /// Existing child of `parent` for `token`, or a new one whose
    /// specificity adds the token's weight to the parent's.
    pub fn child_or_insert(&mut self, parent: NodeId, token: &str) -> NodeId {
        if let Some(existing) = self.child(parent, token) {
            return existing;
        }
        let id = NodeId(self.nodes.len());
        let specificity = self.nodes[parent.0].specificity + token_weight(token);
        self.nodes.push(SelectorNode {
            specificity,
            ..SelectorNode::default()
        });
        self.nodes[parent.0].children.insert(token.to_string(), id);
        id
    }

    pub fn child(&self, parent: NodeId, token: &str) -> Option<NodeId> {
        self.nodes[parent.0].children.get(token).copied()
    }

    /// Bind `rule` to `node` unless a rule is already bound. Returns true
    /// if this call bound it.
    pub fn bind(&mut self, node: NodeId, rule: RuleId) -> bool {
        let slot = &mut self.nodes[node.0].rule;
        if slot.is_some() {
            return false;
        }
        *slot = Some(rule);
        true
    }

    pub fn unbind(&mut self, node: NodeId) -> Option<RuleId> {
        self.nodes[node.0].rule.take()
    }

    /// Follow `tokens` back to front from the root without creating nodes.
    pub fn find_path(&self, tokens: &[&str]) -> Option<NodeId> {
        tokens
            .iter()
            .rev()
            .try_fold(self.root(), |node, token| self.child(node, token))
    }
}

/// Weight one simple selector adds to its parent's specificity.
pub fn token_weight(token: &str) -> u32 {
    match token.chars().next() {
        Some('.') => 100,
        Some('#') => 10_000,
        _ => {
            let mut weight = 1;
            if token.contains('.') {
                weight += 100;
            }
            if token.contains('#') {
                weight += 10_000;
            }
            weight
        }
    }
}

/// Specificity of a whole selector string: 100 per `.`, 10000 per `#`,
/// and 1 per simple selector that starts with neither.
pub fn specificity_of(selector: &str) -> u32 {
    let mut specificity = 0;
    let mut last_was_space = true;
    for ch in selector.chars() {
        match ch {
            '.' => {
                specificity += 100;
                last_was_space = false;
            }
            '#' => {
                specificity += 10_000;
                last_was_space = false;
            }
            ' ' => last_was_space = true,
            _ => {
                if last_was_space {
                    specificity += 1;
                }
                last_was_space = false;
            }
        }
    }
    specificity
}
