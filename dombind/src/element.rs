use std::collections::BTreeMap;

/// A detached element description.
///
/// Elements are plain values built with chained setters; nothing exists in a
/// document until the tree is materialized with [`crate::Dom::insert`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    pub tag: String,
    pub classes: Vec<String>,
    pub attrs: BTreeMap<String, String>,
    pub data: BTreeMap<String, String>,
    pub text: String,
    pub children: Vec<Element>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Default::default()
        }
    }

    pub fn select() -> Self {
        Self::new("select")
    }

    /// An `option` entry with a `value` attribute and text content.
    pub fn option(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new("option").attr("value", value).text(label)
    }

    /// Add one or more whitespace-separated classes.
    pub fn class(mut self, class: &str) -> Self {
        for name in class.split_whitespace() {
            if !self.classes.iter().any(|c| c == name) {
                self.classes.push(name.to_string());
            }
        }
        self
    }

    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(name.into(), value.into());
        self
    }

    pub fn data(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn disabled(self) -> Self {
        self.attr("disabled", "disabled")
    }

    pub fn selected(self) -> Self {
        self.attr("selected", "selected")
    }

    // Children
    pub fn child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = Element>) -> Self {
        self.children.extend(children);
        self
    }
}
