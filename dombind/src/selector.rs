//! A small subset of CSS selectors: `tag`, `.class`, `tag.class.other`, `*`,
//! and the descendant combinator (whitespace).

use crate::document::{Document, NodeId};

/// One compound selector, e.g. `li.select2list-option`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Compound {
    tag: Option<String>,
    classes: Vec<String>,
}

impl Compound {
    fn parse(token: &str) -> Self {
        let mut parts = token.split('.');
        let tag = match parts.next() {
            Some("") | Some("*") | None => None,
            Some(tag) => Some(tag.to_ascii_lowercase()),
        };
        let classes = parts.filter(|c| !c.is_empty()).map(str::to_string).collect();
        Self { tag, classes }
    }

    fn matches(&self, doc: &Document, id: NodeId) -> bool {
        let Some(node) = doc.node(id) else {
            return false;
        };
        if let Some(tag) = &self.tag {
            if !node.tag.eq_ignore_ascii_case(tag) {
                return false;
            }
        }
        self.classes
            .iter()
            .all(|class| node.classes.iter().any(|c| c == class))
    }
}

/// A descendant chain of compound selectors. The last compound is the subject.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selector {
    parts: Vec<Compound>,
}

impl Selector {
    /// Parse a selector. Unsupported syntax degrades to the closest
    /// tag/class reading; an empty string matches nothing.
    pub fn parse(selector: &str) -> Self {
        Self {
            parts: selector.split_whitespace().map(Compound::parse).collect(),
        }
    }

    pub fn tag(tag: &str) -> Self {
        Self {
            parts: vec![Compound {
                tag: Some(tag.to_ascii_lowercase()),
                classes: Vec::new(),
            }],
        }
    }

    pub fn class(class: &str) -> Self {
        Self {
            parts: vec![Compound {
                tag: None,
                classes: class.split_whitespace().map(str::to_string).collect(),
            }],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    pub(crate) fn matches(&self, doc: &Document, id: NodeId) -> bool {
        let Some((subject, ancestors)) = self.parts.split_last() else {
            return false;
        };
        if !subject.matches(doc, id) {
            return false;
        }

        // Greedy walk up the tree is exact for descendant-only chains
        let mut cursor = doc.node(id).and_then(|n| n.parent);
        for compound in ancestors.iter().rev() {
            loop {
                match cursor {
                    Some(ancestor) => {
                        cursor = doc.node(ancestor).and_then(|n| n.parent);
                        if compound.matches(doc, ancestor) {
                            break;
                        }
                    }
                    None => return false,
                }
            }
        }
        true
    }
}

impl From<&str> for Selector {
    fn from(selector: &str) -> Self {
        Self::parse(selector)
    }
}
