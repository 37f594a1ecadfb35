//! The UI binding layer the widget drives.
//!
//! Everything the widget does to markup goes through [`Binding`]. The crate
//! ships an implementation for [`dombind::Dom`].

use std::collections::BTreeMap;
use std::fmt::Debug;
use std::hash::Hash;
use std::rc::Rc;

use dombind::{Dom, EventKind, NodeId, Selector};

/// Result of handling an activation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResult {
    /// Not handled; the activator's default behavior runs.
    Ignored,
    /// Handled; the activator's default behavior is suppressed.
    Consumed,
}

/// Handler for a delegated activation. Receives the activator element.
pub type ActivationHandler<N> = Rc<dyn Fn(&N) -> EventResult>;

/// Markup primitives consumed by the widget.
///
/// Handles are cheap to clone and compare; the widget never owns the elements
/// behind them. Implementations must not hold internal borrows while running
/// an activation handler, since handlers call back into the binding.
pub trait Binding: Clone + 'static {
    type Node: Clone + Eq + Hash + Debug + 'static;

    /// Create a detached element with a tag and whitespace-separated classes.
    fn create(&self, tag: &str, class: &str) -> Self::Node;

    /// Descendants of `root` with the given tag, in document order.
    fn find(&self, root: &Self::Node, tag: &str) -> Vec<Self::Node>;

    /// Nearest element carrying `class`, starting at `node` itself.
    fn closest(&self, node: &Self::Node, class: &str) -> Option<Self::Node>;

    fn attr(&self, node: &Self::Node, name: &str) -> Option<String>;

    /// Set an attribute; `None` removes it.
    fn set_attr(&self, node: &Self::Node, name: &str, value: Option<&str>);

    fn text(&self, node: &Self::Node) -> String;

    fn set_text(&self, node: &Self::Node, text: &str);

    /// Per-element data entry (the data store or `data-*` attributes).
    fn data(&self, node: &Self::Node, key: &str) -> Option<String>;

    fn set_data(&self, node: &Self::Node, key: &str, value: &str);

    /// Every data entry of the element.
    fn data_map(&self, node: &Self::Node) -> BTreeMap<String, String>;

    /// Write a form value; for a `select`, marks the matching entry chosen.
    fn set_value(&self, node: &Self::Node, value: &str);

    /// The entry a `select` reports as chosen.
    fn selected(&self, node: &Self::Node) -> Option<Self::Node>;

    fn append(&self, parent: &Self::Node, child: &Self::Node);

    fn insert_after(&self, reference: &Self::Node, node: &Self::Node);

    /// Remove every child of `node`.
    fn empty(&self, node: &Self::Node);

    fn hide(&self, node: &Self::Node);

    /// Listen on `container` for activations of descendants matching
    /// `selector`. A [`EventResult::Consumed`] result suppresses the default
    /// activation behavior.
    fn on_activate(
        &self,
        container: &Self::Node,
        selector: &str,
        handler: ActivationHandler<Self::Node>,
    );

    /// Fire the element's native change signal.
    fn trigger_change(&self, node: &Self::Node);
}

impl Binding for Dom {
    type Node = NodeId;

    fn create(&self, tag: &str, class: &str) -> NodeId {
        Dom::create(self, tag, class)
    }

    fn find(&self, root: &NodeId, tag: &str) -> Vec<NodeId> {
        Dom::find(self, *root, Selector::tag(tag))
    }

    fn closest(&self, node: &NodeId, class: &str) -> Option<NodeId> {
        Dom::closest(self, *node, Selector::class(class))
    }

    fn attr(&self, node: &NodeId, name: &str) -> Option<String> {
        Dom::attr(self, *node, name)
    }

    fn set_attr(&self, node: &NodeId, name: &str, value: Option<&str>) {
        Dom::set_attr(self, *node, name, value);
    }

    fn text(&self, node: &NodeId) -> String {
        Dom::text(self, *node)
    }

    fn set_text(&self, node: &NodeId, text: &str) {
        Dom::set_text(self, *node, text);
    }

    fn data(&self, node: &NodeId, key: &str) -> Option<String> {
        Dom::data(self, *node, key)
    }

    fn set_data(&self, node: &NodeId, key: &str, value: &str) {
        Dom::set_data(self, *node, key, value);
    }

    fn data_map(&self, node: &NodeId) -> BTreeMap<String, String> {
        Dom::data_map(self, *node)
    }

    fn set_value(&self, node: &NodeId, value: &str) {
        Dom::set_value(self, *node, value);
    }

    fn selected(&self, node: &NodeId) -> Option<NodeId> {
        Dom::selected_option(self, *node)
    }

    fn append(&self, parent: &NodeId, child: &NodeId) {
        Dom::append(self, *parent, *child);
    }

    fn insert_after(&self, reference: &NodeId, node: &NodeId) {
        Dom::insert_after(self, *reference, *node);
    }

    fn empty(&self, node: &NodeId) {
        Dom::empty(self, *node);
    }

    fn hide(&self, node: &NodeId) {
        Dom::hide(self, *node);
    }

    fn on_activate(&self, container: &NodeId, selector: &str, handler: ActivationHandler<NodeId>) {
        self.delegate(*container, EventKind::Click, selector, move |_, event| {
            match handler(&event.current_target) {
                EventResult::Consumed => dombind::EventResult::Consumed,
                EventResult::Ignored => dombind::EventResult::Ignored,
            }
        });
    }

    fn trigger_change(&self, node: &NodeId) {
        self.trigger(*node, EventKind::Change);
    }
}
