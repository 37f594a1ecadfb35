use std::cell::RefCell;
use std::rc::Rc;

use dombind::{Dom, Element, EventKind, EventResult, NodeId};

fn list(dom: &Dom) -> NodeId {
    dom.insert(
        Element::new("ul")
            .child(
                Element::new("li")
                    .class("item")
                    .child(Element::new("a").attr("href", "#one").text("One")),
            )
            .child(Element::new("li").class("item").child(Element::new("span").text("Two"))),
    )
}

// ============================================================================
// Bubbling
// ============================================================================

#[test]
fn test_direct_listener_sees_bubbled_click() {
    let dom = Dom::new();
    let root = list(&dom);
    let anchor = dom.find(root, "a")[0];
    let seen = Rc::new(RefCell::new(Vec::new()));

    let log = seen.clone();
    dom.on(root, EventKind::Click, move |_, event| {
        log.borrow_mut().push((event.target, event.current_target));
        EventResult::Ignored
    });

    dom.click(anchor);

    assert_eq!(*seen.borrow(), vec![(anchor, root)]);
}

#[test]
fn test_stop_halts_bubbling() {
    let dom = Dom::new();
    let root = list(&dom);
    let item = dom.children(root)[0];
    let anchor = dom.find(root, "a")[0];
    let outer_calls = Rc::new(RefCell::new(0));

    dom.on(item, EventKind::Click, |_, _| EventResult::Stop);
    let calls = outer_calls.clone();
    dom.on(root, EventKind::Click, move |_, _| {
        *calls.borrow_mut() += 1;
        EventResult::Ignored
    });

    assert!(!dom.click(anchor));
    assert_eq!(*outer_calls.borrow(), 0);
}

// ============================================================================
// Delegation
// ============================================================================

#[test]
fn test_delegated_listener_matches_selector_only() {
    let dom = Dom::new();
    let root = list(&dom);
    let anchor = dom.find(root, "a")[0];
    let span = dom.find(root, "span")[0];
    let hits = Rc::new(RefCell::new(Vec::new()));

    let log = hits.clone();
    dom.delegate(
        root,
        EventKind::Click,
        "li a",
        move |_, event| {
            log.borrow_mut().push(event.current_target);
            EventResult::Consumed
        },
    );

    dom.click(span);
    assert!(hits.borrow().is_empty());

    dom.click(anchor);
    assert_eq!(*hits.borrow(), vec![anchor]);
}

#[test]
fn test_delegated_handler_can_mutate_tree() {
    let dom = Dom::new();
    let root = list(&dom);
    let anchor = dom.find(root, "a")[0];

    dom.delegate(
        root,
        EventKind::Click,
        "a",
        |dom, event| {
            dom.empty(event.delegate_target);
            EventResult::Consumed
        },
    );

    dom.click(anchor);

    assert!(dom.children(root).is_empty());
}

#[test]
fn test_empty_drops_listeners_of_removed_nodes() {
    let dom = Dom::new();
    let root = list(&dom);
    let item = dom.children(root)[0];
    let anchor = dom.find(root, "a")[0];
    let calls = Rc::new(RefCell::new(0));

    let counter = calls.clone();
    dom.on(item, EventKind::Click, move |_, _| {
        *counter.borrow_mut() += 1;
        EventResult::Ignored
    });
    dom.empty(root);
    assert!(!dom.contains(item));
    dom.click(anchor);
    assert_eq!(dom.location_hash(), None);

    // New elements may land in the freed slots; they must not inherit the
    // old listener.
    let fresh = dom.create("li", "item");
    let link = dom.create("a", "");
    dom.append(fresh, link);
    dom.append(root, fresh);
    dom.click(link);

    assert_eq!(*calls.borrow(), 0);
}

// ============================================================================
// Default actions
// ============================================================================

#[test]
fn test_anchor_click_navigates_unless_prevented() {
    let dom = Dom::new();
    let root = list(&dom);
    let anchor = dom.find(root, "a")[0];

    assert!(dom.click(anchor));
    assert_eq!(dom.location_hash().as_deref(), Some("one"));

    let dom = Dom::new();
    let root = list(&dom);
    let anchor = dom.find(root, "a")[0];
    dom.on(root, EventKind::Click, |_, _| EventResult::Consumed);

    assert!(!dom.click(anchor));
    assert_eq!(dom.location_hash(), None);
}

#[test]
fn test_trigger_change() {
    let dom = Dom::new();
    let select = dom.insert(Element::select().child(Element::option("a", "A")));
    let changes = Rc::new(RefCell::new(Vec::new()));

    let log = changes.clone();
    dom.on(select, EventKind::Change, move |dom, event| {
        log.borrow_mut().push(dom.value(event.target));
        EventResult::Ignored
    });

    dom.trigger(select, EventKind::Change);
    dom.trigger(select, EventKind::Click);

    assert_eq!(*changes.borrow(), vec![Some("a".to_string())]);
}
