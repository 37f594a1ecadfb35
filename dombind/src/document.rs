use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use crate::element::Element;
use crate::event::{self, EventKind, EventResult, Handler, Listener};
use crate::selector::Selector;

/// Handle to a node in a [`Dom`]. Only meaningful for the document that
/// created it.
///
/// Slots of removed nodes are reused; the generation tells a stale handle
/// apart from the node now living in its slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    index: usize,
    generation: u32,
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node-{}", self.index)
    }
}

#[derive(Debug, Default)]
pub(crate) struct Node {
    pub(crate) tag: String,
    pub(crate) classes: Vec<String>,
    pub(crate) attrs: BTreeMap<String, String>,
    pub(crate) data: BTreeMap<String, String>,
    pub(crate) text: String,
    pub(crate) children: Vec<NodeId>,
    pub(crate) parent: Option<NodeId>,
    pub(crate) hidden: bool,
}

struct Slot {
    generation: u32,
    node: Option<Node>,
}

#[derive(Default)]
pub(crate) struct Document {
    slots: Vec<Slot>,
    free: Vec<usize>,
    listeners: Vec<Listener>,
    location_hash: Option<String>,
}

impl Document {
    pub(crate) fn node(&self, id: NodeId) -> Option<&Node> {
        self.slots
            .get(id.index)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_ref())
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.slots
            .get_mut(id.index)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_mut())
    }

    fn alloc(&mut self, node: Node) -> NodeId {
        if let Some(index) = self.free.pop() {
            if let Some(slot) = self.slots.get_mut(index) {
                slot.node = Some(node);
                return NodeId {
                    index,
                    generation: slot.generation,
                };
            }
        }
        self.slots.push(Slot {
            generation: 0,
            node: Some(node),
        });
        NodeId {
            index: self.slots.len() - 1,
            generation: 0,
        }
    }

    /// Drop the node and hand its slot back for reuse.
    fn release(&mut self, id: NodeId) {
        let Some(slot) = self.slots.get_mut(id.index) else {
            return;
        };
        if slot.generation != id.generation || slot.node.take().is_none() {
            return;
        }
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);
    }

    fn live(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    fn materialize(&mut self, element: Element, parent: Option<NodeId>) -> NodeId {
        let Element {
            tag,
            classes,
            attrs,
            data,
            text,
            children,
        } = element;
        let id = self.alloc(Node {
            tag: tag.to_ascii_lowercase(),
            classes,
            attrs,
            data,
            text,
            parent,
            ..Default::default()
        });
        for child in children {
            let child_id = self.materialize(child, Some(id));
            if let Some(node) = self.node_mut(id) {
                node.children.push(child_id);
            }
        }
        id
    }

    fn detach(&mut self, id: NodeId) {
        let Some(parent) = self.node(id).and_then(|n| n.parent) else {
            return;
        };
        if let Some(p) = self.node_mut(parent) {
            p.children.retain(|&c| c != id);
        }
        if let Some(n) = self.node_mut(id) {
            n.parent = None;
        }
    }

    fn is_ancestor_or_self(&self, ancestor: NodeId, mut id: NodeId) -> bool {
        loop {
            if id == ancestor {
                return true;
            }
            match self.node(id).and_then(|n| n.parent) {
                Some(parent) => id = parent,
                None => return false,
            }
        }
    }

    fn subtree(&self, root: NodeId, out: &mut Vec<NodeId>) {
        out.push(root);
        if let Some(node) = self.node(root) {
            for &child in &node.children {
                self.subtree(child, out);
            }
        }
    }

    fn text_content(&self, id: NodeId, out: &mut String) {
        if let Some(node) = self.node(id) {
            out.push_str(&node.text);
            for &child in &node.children {
                self.text_content(child, out);
            }
        }
    }

    fn descendants_matching(&self, id: NodeId, selector: &Selector, out: &mut Vec<NodeId>) {
        if let Some(node) = self.node(id) {
            for &child in &node.children {
                if selector.matches(self, child) {
                    out.push(child);
                }
                self.descendants_matching(child, selector, out);
            }
        }
    }

    fn options_of(&self, select: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.descendants_matching(select, &Selector::tag("option"), &mut out);
        out
    }

    /// The first option marked `selected`, else the first option.
    fn selected_option(&self, select: NodeId) -> Option<NodeId> {
        let options = self.options_of(select);
        options
            .iter()
            .find(|&&o| self.node(o).is_some_and(|o| o.attrs.contains_key("selected")))
            .or_else(|| options.first())
            .copied()
    }

    fn option_value(&self, option: NodeId) -> String {
        match self.node(option) {
            Some(node) => match node.attrs.get("value") {
                Some(value) => value.clone(),
                None => {
                    let mut text = String::new();
                    self.text_content(option, &mut text);
                    text
                }
            },
            None => String::new(),
        }
    }
}

/// Shared handle to an in-memory element tree.
///
/// All access goes through short-lived borrows, so event handlers and
/// callbacks are free to call back into the document.
#[derive(Clone, Default)]
pub struct Dom {
    doc: Rc<RefCell<Document>>,
}

impl fmt::Debug for Dom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let doc = self.doc.borrow();
        f.debug_struct("Dom")
            .field("nodes", &doc.live())
            .field("listeners", &doc.listeners.len())
            .finish()
    }
}

impl PartialEq for Dom {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.doc, &other.doc)
    }
}

impl Dom {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn read<R>(&self, f: impl FnOnce(&Document) -> R) -> R {
        f(&self.doc.borrow())
    }

    fn with_node<R>(&self, id: NodeId, f: impl FnOnce(&Node) -> R) -> Option<R> {
        self.doc.borrow().node(id).map(f)
    }

    fn with_node_mut<R>(&self, id: NodeId, f: impl FnOnce(&mut Node) -> R) -> Option<R> {
        self.doc.borrow_mut().node_mut(id).map(f)
    }

    // -------------------------------------------------------------------------
    // Tree construction
    // -------------------------------------------------------------------------

    /// Materialize a detached element tree and return its root.
    pub fn insert(&self, element: Element) -> NodeId {
        self.doc.borrow_mut().materialize(element, None)
    }

    /// Create a detached element with a tag and whitespace-separated classes.
    pub fn create(&self, tag: &str, class: &str) -> NodeId {
        self.insert(Element::new(tag).class(class))
    }

    /// Append `child` as the last child of `parent`, moving it if attached
    /// elsewhere. Appending an element into its own subtree is refused.
    pub fn append(&self, parent: NodeId, child: NodeId) {
        let mut doc = self.doc.borrow_mut();
        if doc.node(parent).is_none() || doc.node(child).is_none() {
            return;
        }
        if doc.is_ancestor_or_self(child, parent) {
            log::warn!("[dom] refusing to append {} into its own subtree", child);
            return;
        }
        doc.detach(child);
        if let Some(p) = doc.node_mut(parent) {
            p.children.push(child);
        }
        if let Some(c) = doc.node_mut(child) {
            c.parent = Some(parent);
        }
    }

    /// Insert `node` as the next sibling of `reference`. No-op when
    /// `reference` has no parent.
    pub fn insert_after(&self, reference: NodeId, node: NodeId) {
        let mut doc = self.doc.borrow_mut();
        let Some(parent) = doc.node(reference).and_then(|n| n.parent) else {
            return;
        };
        if doc.node(node).is_none() || doc.is_ancestor_or_self(node, parent) {
            return;
        }
        doc.detach(node);
        if let Some(p) = doc.node_mut(parent) {
            let index = p
                .children
                .iter()
                .position(|&c| c == reference)
                .map_or(p.children.len(), |i| i + 1);
            p.children.insert(index, node);
        }
        if let Some(n) = doc.node_mut(node) {
            n.parent = Some(parent);
        }
    }

    /// Detach `node` from its parent.
    pub fn detach(&self, node: NodeId) {
        self.doc.borrow_mut().detach(node);
    }

    /// Remove every child of `node` along with the listeners registered
    /// anywhere in the removed subtrees. Handles into the removed subtrees
    /// go stale.
    pub fn empty(&self, node: NodeId) {
        let mut doc = self.doc.borrow_mut();
        let children = match doc.node_mut(node) {
            Some(n) => std::mem::take(&mut n.children),
            None => return,
        };
        let mut removed = Vec::new();
        for child in children {
            if let Some(c) = doc.node_mut(child) {
                c.parent = None;
            }
            doc.subtree(child, &mut removed);
        }
        if !removed.is_empty() {
            doc.listeners.retain(|l| !removed.contains(&l.node));
        }
        for id in removed {
            doc.release(id);
        }
        if let Some(n) = doc.node_mut(node) {
            n.text.clear();
        }
    }

    // -------------------------------------------------------------------------
    // Structure
    // -------------------------------------------------------------------------

    /// Whether `node` still refers to a live element.
    pub fn contains(&self, node: NodeId) -> bool {
        self.doc.borrow().node(node).is_some()
    }

    /// Number of live elements, attached or not.
    pub fn node_count(&self) -> usize {
        self.doc.borrow().live()
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.with_node(node, |n| n.parent).flatten()
    }

    pub fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.with_node(node, |n| n.children.clone())
            .unwrap_or_default()
    }

    /// `node` followed by its ancestors up to the root.
    pub fn ancestors_inclusive(&self, node: NodeId) -> Vec<NodeId> {
        let doc = self.doc.borrow();
        let mut path = Vec::new();
        let mut cursor = doc.node(node).map(|_| node);
        while let Some(id) = cursor {
            path.push(id);
            cursor = doc.node(id).and_then(|n| n.parent);
        }
        path
    }

    pub fn tag(&self, node: NodeId) -> String {
        self.with_node(node, |n| n.tag.clone()).unwrap_or_default()
    }

    // -------------------------------------------------------------------------
    // Classes and attributes
    // -------------------------------------------------------------------------

    pub fn classes(&self, node: NodeId) -> Vec<String> {
        self.with_node(node, |n| n.classes.clone())
            .unwrap_or_default()
    }

    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.with_node(node, |n| n.classes.iter().any(|c| c == class))
            .unwrap_or(false)
    }

    pub fn add_class(&self, node: NodeId, class: &str) {
        self.with_node_mut(node, |n| {
            for name in class.split_whitespace() {
                if !n.classes.iter().any(|c| c == name) {
                    n.classes.push(name.to_string());
                }
            }
        });
    }

    pub fn remove_class(&self, node: NodeId, class: &str) {
        self.with_node_mut(node, |n| {
            n.classes.retain(|c| !class.split_whitespace().any(|name| name == c));
        });
    }

    pub fn attr(&self, node: NodeId, name: &str) -> Option<String> {
        self.with_node(node, |n| n.attrs.get(name).cloned())
            .flatten()
    }

    pub fn has_attr(&self, node: NodeId, name: &str) -> bool {
        self.with_node(node, |n| n.attrs.contains_key(name))
            .unwrap_or(false)
    }

    /// Set an attribute. `None` removes it.
    pub fn set_attr(&self, node: NodeId, name: &str, value: Option<&str>) {
        self.with_node_mut(node, |n| match value {
            Some(value) => {
                n.attrs.insert(name.to_string(), value.to_string());
            }
            None => {
                n.attrs.remove(name);
            }
        });
    }

    // -------------------------------------------------------------------------
    // Data store
    // -------------------------------------------------------------------------

    /// Read a data entry. Falls back to the `data-<key>` attribute.
    pub fn data(&self, node: NodeId, key: &str) -> Option<String> {
        self.with_node(node, |n| {
            n.data
                .get(key)
                .or_else(|| n.attrs.get(&format!("data-{key}")))
                .cloned()
        })
        .flatten()
    }

    pub fn set_data(&self, node: NodeId, key: &str, value: &str) {
        self.with_node_mut(node, |n| {
            n.data.insert(key.to_string(), value.to_string());
        });
    }

    /// Every data entry of the element: `data-*` attributes with the prefix
    /// stripped, overlaid by the data store.
    pub fn data_map(&self, node: NodeId) -> BTreeMap<String, String> {
        self.with_node(node, |n| {
            let mut map: BTreeMap<String, String> = n
                .attrs
                .iter()
                .filter_map(|(k, v)| k.strip_prefix("data-").map(|k| (k.to_string(), v.clone())))
                .collect();
            map.extend(n.data.iter().map(|(k, v)| (k.clone(), v.clone())));
            map
        })
        .unwrap_or_default()
    }

    // -------------------------------------------------------------------------
    // Text and values
    // -------------------------------------------------------------------------

    /// Concatenated text of the element and all of its descendants.
    pub fn text(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.doc.borrow().text_content(node, &mut out);
        out
    }

    /// Replace the element's content with plain text.
    pub fn set_text(&self, node: NodeId, text: &str) {
        self.empty(node);
        self.with_node_mut(node, |n| n.text = text.to_string());
    }

    /// Form value. For a `select` this is the value of the first option marked
    /// `selected`, else of the first option; `None` when it has no options.
    pub fn value(&self, node: NodeId) -> Option<String> {
        let doc = self.doc.borrow();
        let n = doc.node(node)?;
        match n.tag.as_str() {
            "select" => doc.selected_option(node).map(|o| doc.option_value(o)),
            "option" => Some(doc.option_value(node)),
            _ => n.attrs.get("value").cloned(),
        }
    }

    /// The option a `select` reports as chosen: the first one marked
    /// `selected`, else the first one.
    pub fn selected_option(&self, select: NodeId) -> Option<NodeId> {
        let doc = self.doc.borrow();
        match doc.node(select)?.tag.as_str() {
            "select" => doc.selected_option(select),
            _ => None,
        }
    }

    /// Set the form value. For a `select`, marks the first option with a
    /// matching value as `selected` and clears the mark everywhere else.
    pub fn set_value(&self, node: NodeId, value: &str) {
        let mut doc = self.doc.borrow_mut();
        let Some(tag) = doc.node(node).map(|n| n.tag.clone()) else {
            return;
        };
        if tag == "select" {
            let mut matched = false;
            for option in doc.options_of(node) {
                let hit = !matched && doc.option_value(option) == value;
                matched |= hit;
                if let Some(o) = doc.node_mut(option) {
                    if hit {
                        o.attrs.insert("selected".into(), "selected".into());
                    } else {
                        o.attrs.remove("selected");
                    }
                }
            }
        } else if let Some(n) = doc.node_mut(node) {
            n.attrs.insert("value".into(), value.to_string());
        }
    }

    // -------------------------------------------------------------------------
    // Visibility
    // -------------------------------------------------------------------------

    pub fn hide(&self, node: NodeId) {
        self.with_node_mut(node, |n| n.hidden = true);
    }

    pub fn show(&self, node: NodeId) {
        self.with_node_mut(node, |n| n.hidden = false);
    }

    pub fn is_hidden(&self, node: NodeId) -> bool {
        self.with_node(node, |n| n.hidden).unwrap_or(false)
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    pub fn matches(&self, node: NodeId, selector: &Selector) -> bool {
        selector.matches(&self.doc.borrow(), node)
    }

    /// Descendants of `node` matching the selector, in document order.
    pub fn find(&self, node: NodeId, selector: impl Into<Selector>) -> Vec<NodeId> {
        let selector = selector.into();
        let mut out = Vec::new();
        self.doc
            .borrow()
            .descendants_matching(node, &selector, &mut out);
        out
    }

    /// Nearest element matching the selector, starting with `node` itself.
    pub fn closest(&self, node: NodeId, selector: impl Into<Selector>) -> Option<NodeId> {
        let selector = selector.into();
        self.ancestors_inclusive(node)
            .into_iter()
            .find(|&id| self.matches(id, &selector))
    }

    // -------------------------------------------------------------------------
    // Events
    // -------------------------------------------------------------------------

    /// Listen for events fired on `node` or bubbling through it.
    pub fn on(
        &self,
        node: NodeId,
        kind: EventKind,
        handler: impl Fn(&Dom, &event::Event) -> EventResult + 'static,
    ) {
        self.doc.borrow_mut().listeners.push(Listener {
            node,
            kind,
            selector: None,
            handler: Rc::new(handler),
        });
    }

    /// Listen on `node` for events whose path contains a descendant matching
    /// `selector`. The handler runs once per matching descendant.
    pub fn delegate(
        &self,
        node: NodeId,
        kind: EventKind,
        selector: impl Into<Selector>,
        handler: impl Fn(&Dom, &event::Event) -> EventResult + 'static,
    ) {
        self.doc.borrow_mut().listeners.push(Listener {
            node,
            kind,
            selector: Some(selector.into()),
            handler: Rc::new(handler),
        });
    }

    /// Drop every listener attached to `node`.
    pub fn off(&self, node: NodeId) {
        self.doc.borrow_mut().listeners.retain(|l| l.node != node);
    }

    pub(crate) fn listeners_for(
        &self,
        node: NodeId,
        kind: EventKind,
    ) -> Vec<(Option<Selector>, Handler)> {
        self.doc
            .borrow()
            .listeners
            .iter()
            .filter(|l| l.node == node && l.kind == kind)
            .map(|l| (l.selector.clone(), l.handler.clone()))
            .collect()
    }

    /// Fire an event on `node`. Returns true if a handler prevented the
    /// default action.
    pub fn trigger(&self, node: NodeId, kind: EventKind) -> bool {
        event::dispatch(self, node, kind)
    }

    /// Simulate a user click on `node`.
    ///
    /// Unless a handler prevents it, clicking inside an anchor whose `href`
    /// is a fragment navigates the document to that fragment.
    /// Returns true when the default action ran.
    pub fn click(&self, node: NodeId) -> bool {
        let anchor = self.closest(node, "a");
        if event::dispatch(self, node, EventKind::Click) {
            return false;
        }
        let href = anchor.and_then(|a| self.attr(a, "href"));
        if let Some(fragment) = href.as_deref().and_then(|h| h.strip_prefix('#')) {
            log::trace!("[dom] navigating to #{}", fragment);
            self.doc.borrow_mut().location_hash = Some(fragment.to_string());
        }
        true
    }

    /// Fragment the document last navigated to.
    pub fn location_hash(&self) -> Option<String> {
        self.doc.borrow().location_hash.clone()
    }
}
