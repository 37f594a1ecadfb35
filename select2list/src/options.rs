//! Option store: projects the backing `select` into an ordered snapshot.

use std::collections::HashMap;

use crate::binding::Binding;

/// One selectable entry of the backing source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption<N> {
    /// Value attribute of the entry; empty when the entry has none
    pub value: String,
    /// Display text: the `display` data override if set, else the entry text
    pub label: String,
    pub disabled: bool,
    /// Handle to the backing entry
    pub source: N,
}

/// Ordered mapping value -> option, rebuilt whole on every parse.
///
/// A value seen twice keeps the position of its first occurrence and the
/// content of its last.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionSnapshot<N> {
    entries: Vec<SelectOption<N>>,
    index: HashMap<String, usize>,
}

impl<N> Default for OptionSnapshot<N> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<N> OptionSnapshot<N> {
    pub fn new() -> Self {
        Self::default()
    }

    fn insert(&mut self, option: SelectOption<N>) {
        match self.index.get(&option.value) {
            Some(&i) => self.entries[i] = option,
            None => {
                self.index.insert(option.value.clone(), self.entries.len());
                self.entries.push(option);
            }
        }
    }

    pub fn get(&self, value: &str) -> Option<&SelectOption<N>> {
        self.index.get(value).map(|&i| &self.entries[i])
    }

    pub fn contains(&self, value: &str) -> bool {
        self.index.contains_key(value)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SelectOption<N>> {
        self.entries.iter()
    }

    /// Every known value, in order.
    pub fn values(&self) -> Vec<String> {
        self.entries.iter().map(|o| o.value.clone()).collect()
    }
}

impl<N> FromIterator<SelectOption<N>> for OptionSnapshot<N> {
    fn from_iter<I: IntoIterator<Item = SelectOption<N>>>(iter: I) -> Self {
        let mut snapshot = Self::new();
        for option in iter {
            snapshot.insert(option);
        }
        snapshot
    }
}

impl<'a, N> IntoIterator for &'a OptionSnapshot<N> {
    type Item = &'a SelectOption<N>;
    type IntoIter = std::slice::Iter<'a, SelectOption<N>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Read every `option` entry of `source` in document order.
pub fn parse<B: Binding>(binding: &B, source: &B::Node) -> OptionSnapshot<B::Node> {
    binding
        .find(source, "option")
        .into_iter()
        .map(|entry| {
            let label = binding
                .data(&entry, "display")
                .filter(|display| !display.is_empty())
                .unwrap_or_else(|| binding.text(&entry));
            SelectOption {
                value: binding.attr(&entry, "value").unwrap_or_default(),
                label,
                disabled: binding.attr(&entry, "disabled").is_some(),
                source: entry,
            }
        })
        .collect()
}
