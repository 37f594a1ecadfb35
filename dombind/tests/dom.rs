use dombind::{Dom, Element};

fn fruit_select(dom: &Dom) -> dombind::NodeId {
    dom.insert(
        Element::select()
            .child(Element::option("a", "Apple"))
            .child(Element::option("b", "Banana").selected())
            .child(Element::option("c", "Cherry").disabled()),
    )
}

// ============================================================================
// Tree construction
// ============================================================================

#[test]
fn test_insert_materializes_children_in_order() {
    let dom = Dom::new();
    let select = fruit_select(&dom);

    let options = dom.children(select);
    assert_eq!(options.len(), 3);
    let labels: Vec<_> = options.iter().map(|&o| dom.text(o)).collect();
    assert_eq!(labels, vec!["Apple", "Banana", "Cherry"]);
    assert!(options.iter().all(|&o| dom.parent(o) == Some(select)));
}

#[test]
fn test_append_moves_node() {
    let dom = Dom::new();
    let first = dom.create("ul", "");
    let second = dom.create("ul", "");
    let item = dom.create("li", "");

    dom.append(first, item);
    dom.append(second, item);

    assert!(dom.children(first).is_empty());
    assert_eq!(dom.children(second), vec![item]);
    assert_eq!(dom.parent(item), Some(second));
}

#[test]
fn test_append_refuses_cycles() {
    let dom = Dom::new();
    let outer = dom.create("div", "");
    let inner = dom.create("div", "");
    dom.append(outer, inner);

    dom.append(inner, outer);

    assert_eq!(dom.parent(outer), None);
    assert_eq!(dom.children(inner), Vec::new());
}

#[test]
fn test_insert_after_places_next_sibling() {
    let dom = Dom::new();
    let root = dom.insert(
        Element::new("form")
            .child(Element::new("label"))
            .child(Element::select())
            .child(Element::new("button")),
    );
    let select = dom.find(root, "select")[0];
    let list = dom.create("ul", "select2list");

    dom.insert_after(select, list);

    let tags: Vec<_> = dom.children(root).iter().map(|&c| dom.tag(c)).collect();
    assert_eq!(tags, vec!["label", "select", "ul", "button"]);
}

#[test]
fn test_insert_after_detached_reference_is_noop() {
    let dom = Dom::new();
    let select = dom.insert(Element::select());
    let list = dom.create("ul", "");

    dom.insert_after(select, list);

    assert_eq!(dom.parent(list), None);
}

#[test]
fn test_empty_removes_children() {
    let dom = Dom::new();
    let list = dom.create("ul", "");
    for _ in 0..3 {
        let item = dom.create("li", "");
        dom.append(list, item);
    }

    dom.empty(list);

    assert!(dom.children(list).is_empty());
    assert_eq!(dom.to_html(list), "<ul></ul>");
}

#[test]
fn test_refilling_a_list_reuses_freed_nodes() {
    let dom = Dom::new();
    let list = dom.create("ul", "");
    let refill = |dom: &Dom| {
        dom.empty(list);
        for label in ["One", "Two", "Three"] {
            let item = dom.create("li", "item");
            let anchor = dom.create("a", "");
            dom.set_text(anchor, label);
            dom.append(item, anchor);
            dom.append(list, item);
        }
    };
    refill(&dom);
    let count = dom.node_count();
    let stale = dom.children(list)[0];

    for _ in 0..1000 {
        refill(&dom);
    }

    assert_eq!(dom.node_count(), count);
    assert_eq!(dom.children(list).len(), 3);
    assert!(!dom.contains(stale));
    assert!(!dom.children(list).contains(&stale));
    assert_eq!(dom.text(stale), "");
    assert_eq!(dom.parent(stale), None);
}

// ============================================================================
// Attributes, data and text
// ============================================================================

#[test]
fn test_create_splits_classes() {
    let dom = Dom::new();
    let item = dom.create("li", "select2list-option  selected");

    assert_eq!(dom.classes(item), vec!["select2list-option", "selected"]);
    assert!(dom.has_class(item, "selected"));

    dom.remove_class(item, "selected");
    assert!(!dom.has_class(item, "selected"));
}

#[test]
fn test_set_attr_none_removes() {
    let dom = Dom::new();
    let option = dom.insert(Element::option("a", "Apple").disabled());
    assert!(dom.has_attr(option, "disabled"));

    dom.set_attr(option, "disabled", None);
    assert!(!dom.has_attr(option, "disabled"));

    dom.set_attr(option, "title", Some("fruit"));
    assert_eq!(dom.attr(option, "title").as_deref(), Some("fruit"));
}

#[test]
fn test_data_falls_back_to_data_attributes() {
    let dom = Dom::new();
    let option = dom.insert(
        Element::option("a", "Apple")
            .attr("data-display", "Green apple")
            .data("origin", "orchard"),
    );

    assert_eq!(dom.data(option, "display").as_deref(), Some("Green apple"));
    assert_eq!(dom.data(option, "origin").as_deref(), Some("orchard"));
    assert_eq!(dom.data(option, "missing"), None);

    let map = dom.data_map(option);
    assert_eq!(map.len(), 2);
    assert_eq!(map["display"], "Green apple");
}

#[test]
fn test_data_store_overrides_attribute_in_map() {
    let dom = Dom::new();
    let node = dom.insert(Element::select().attr("data-item-tag", "p"));
    dom.set_data(node, "item-tag", "div");

    assert_eq!(dom.data_map(node)["item-tag"], "div");
}

#[test]
fn test_text_concatenates_descendants() {
    let dom = Dom::new();
    let item = dom.insert(
        Element::new("li")
            .child(Element::new("a").text("Straw"))
            .child(Element::new("span").text("berry")),
    );

    assert_eq!(dom.text(item), "Strawberry");

    dom.set_text(item, "Plain");
    assert!(dom.children(item).is_empty());
    assert_eq!(dom.text(item), "Plain");
}

// ============================================================================
// Form values
// ============================================================================

#[test]
fn test_select_value_reports_selected_option() {
    let dom = Dom::new();
    let select = fruit_select(&dom);

    assert_eq!(dom.value(select).as_deref(), Some("b"));
}

#[test]
fn test_select_value_defaults_to_first_option() {
    let dom = Dom::new();
    let select = dom.insert(
        Element::select()
            .child(Element::option("x", "X"))
            .child(Element::option("y", "Y")),
    );

    assert_eq!(dom.value(select).as_deref(), Some("x"));
    assert_eq!(dom.value(dom.insert(Element::select())), None);
}

#[test]
fn test_set_value_moves_selected_mark() {
    let dom = Dom::new();
    let select = fruit_select(&dom);

    dom.set_value(select, "c");

    assert_eq!(dom.value(select).as_deref(), Some("c"));
    let marked: Vec<_> = dom
        .find(select, "option")
        .into_iter()
        .filter(|&o| dom.has_attr(o, "selected"))
        .collect();
    assert_eq!(marked.len(), 1);
}

#[test]
fn test_selected_option_of_select() {
    let dom = Dom::new();
    let select = fruit_select(&dom);
    let placeholder = dom.insert(
        Element::select()
            .child(Element::new("option").text("Choose one"))
            .child(Element::option("x", "X")),
    );

    assert_eq!(dom.selected_option(select), Some(dom.children(select)[1]));
    assert_eq!(
        dom.selected_option(placeholder),
        Some(dom.children(placeholder)[0])
    );
    assert_eq!(dom.selected_option(dom.children(select)[0]), None);
}

#[test]
fn test_option_without_value_uses_text() {
    let dom = Dom::new();
    let option = dom.insert(Element::new("option").text("Plum"));

    assert_eq!(dom.value(option).as_deref(), Some("Plum"));
    assert_eq!(dom.attr(option, "value"), None);
}

// ============================================================================
// Queries and markup
// ============================================================================

#[test]
fn test_find_descends_through_groups() {
    let dom = Dom::new();
    let select = dom.insert(
        Element::select()
            .child(Element::new("optgroup").child(Element::option("a", "Apple")))
            .child(Element::option("b", "Banana")),
    );

    let values: Vec<_> = dom
        .find(select, "option")
        .into_iter()
        .filter_map(|o| dom.attr(o, "value"))
        .collect();
    assert_eq!(values, vec!["a", "b"]);
}

#[test]
fn test_closest_includes_self_and_ancestors() {
    let dom = Dom::new();
    let list = dom.insert(
        Element::new("ul")
            .class("select2list")
            .child(Element::new("li").class("item").child(Element::new("a"))),
    );
    let anchor = dom.find(list, "a")[0];
    let item = dom.children(list)[0];

    assert_eq!(dom.closest(anchor, ".item"), Some(item));
    assert_eq!(dom.closest(item, "li.item"), Some(item));
    assert_eq!(dom.closest(anchor, "ul.select2list"), Some(list));
    assert_eq!(dom.closest(anchor, "ol"), None);
}

#[test]
fn test_to_html() {
    let dom = Dom::new();
    let list = dom.insert(
        Element::new("ul").class("select2list").child(
            Element::new("li")
                .class("select2list-option")
                .data("select2list-value", "a")
                .child(Element::new("a").attr("href", "#a").text("Fish & Chips")),
        ),
    );
    dom.hide(list);

    assert_eq!(
        dom.to_html(list),
        "<ul class=\"select2list\" style=\"display: none\"><li class=\"select2list-option\">\
         <a href=\"#a\">Fish &amp; Chips</a></li></ul>"
    );
}
