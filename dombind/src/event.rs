use std::rc::Rc;

use crate::document::{Dom, NodeId};
use crate::selector::Selector;

/// Kinds of events the document routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// User activation (mouse click, Enter on a focused row)
    Click,
    /// Value of a form control changed
    Change,
}

/// What a handler saw when it was invoked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Event {
    pub kind: EventKind,
    /// Deepest element the event was fired on
    pub target: NodeId,
    /// Element the handler is running for. For delegated handlers this is the
    /// element that matched the selector, otherwise the listening element.
    pub current_target: NodeId,
    /// Element the listener is attached to
    pub delegate_target: NodeId,
}

/// Result of handling an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResult {
    /// Keep bubbling, default action still runs.
    Ignored,
    /// Handled: prevent the default action, keep bubbling.
    Consumed,
    /// Handled: prevent the default action and stop bubbling.
    Stop,
}

impl EventResult {
    pub fn is_handled(&self) -> bool {
        !matches!(self, EventResult::Ignored)
    }
}

/// Event handler. Receives the document so it can mutate it; the document is
/// never borrowed while a handler runs.
pub type Handler = Rc<dyn Fn(&Dom, &Event) -> EventResult>;

pub(crate) struct Listener {
    pub(crate) node: NodeId,
    pub(crate) kind: EventKind,
    pub(crate) selector: Option<Selector>,
    pub(crate) handler: Handler,
}

/// Bubble an event from `target` up to the root.
///
/// At every element on the path, delegated listeners run first (once per
/// matching element between the target and the listener, innermost first),
/// then direct listeners. Returns true if the default action was prevented.
pub(crate) fn dispatch(dom: &Dom, target: NodeId, kind: EventKind) -> bool {
    let path = dom.ancestors_inclusive(target);
    let mut prevented = false;

    for (depth, &node) in path.iter().enumerate() {
        let listeners = dom.listeners_for(node, kind);
        if listeners.is_empty() {
            continue;
        }

        let mut calls: Vec<(NodeId, Handler)> = Vec::new();
        for &inner in &path[..depth] {
            for (selector, handler) in &listeners {
                if selector.as_ref().is_some_and(|s| dom.matches(inner, s)) {
                    calls.push((inner, handler.clone()));
                }
            }
        }
        for (selector, handler) in &listeners {
            if selector.is_none() {
                calls.push((node, handler.clone()));
            }
        }

        let mut stopped = false;
        for (current_target, handler) in calls {
            let event = Event {
                kind,
                target,
                current_target,
                delegate_target: node,
            };
            let result = handler(dom, &event);
            log::trace!(
                "[dom] {:?} on {} handled at {}: {:?}",
                kind,
                target,
                current_target,
                result
            );
            match result {
                EventResult::Ignored => {}
                EventResult::Consumed => prevented = true,
                EventResult::Stop => {
                    prevented = true;
                    stopped = true;
                }
            }
        }
        if stopped {
            break;
        }
    }

    prevented
}
