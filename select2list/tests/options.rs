use dombind::{Dom, Element};
use select2list::options::parse;
use select2list::{OptionSnapshot, SelectOption};

// ============================================================================
// Parsing
// ============================================================================

#[test]
fn test_parse_reads_entries_in_order() {
    let dom = Dom::new();
    let select = dom.insert(
        Element::select()
            .child(Element::option("a", "Apple"))
            .child(Element::option("b", "Banana").disabled())
            .child(Element::option("c", "Cherry")),
    );

    let snapshot = parse(&dom, &select);

    assert_eq!(snapshot.values(), vec!["a", "b", "c"]);
    let banana = snapshot.get("b").unwrap();
    assert_eq!(banana.label, "Banana");
    assert!(banana.disabled);
    assert!(!snapshot.get("a").unwrap().disabled);
    assert_eq!(banana.source, dom.children(select)[1]);
}

#[test]
fn test_display_override_wins_unless_empty() {
    let dom = Dom::new();
    let select = dom.insert(
        Element::select()
            .child(Element::option("a", "Apple").data("display", "Red apple"))
            .child(Element::option("b", "Banana").attr("data-display", "")),
    );

    let snapshot = parse(&dom, &select);

    assert_eq!(snapshot.get("a").unwrap().label, "Red apple");
    assert_eq!(snapshot.get("b").unwrap().label, "Banana");
}

#[test]
fn test_missing_value_collapses_to_empty_key() {
    let dom = Dom::new();
    let select = dom.insert(
        Element::select()
            .child(Element::new("option").text("Choose..."))
            .child(Element::option("a", "Apple")),
    );

    let snapshot = parse(&dom, &select);

    assert_eq!(snapshot.values(), vec!["", "a"]);
    assert_eq!(snapshot.get("").unwrap().label, "Choose...");
}

#[test]
fn test_duplicates_are_last_writer_wins_in_first_position() {
    let dom = Dom::new();
    let select = dom.insert(
        Element::select()
            .child(Element::option("a", "First"))
            .child(Element::option("b", "Banana"))
            .child(Element::option("a", "Second").disabled()),
    );
    let last = dom.children(select)[2];

    let snapshot = parse(&dom, &select);

    assert_eq!(snapshot.len(), 2);
    assert_eq!(snapshot.values(), vec!["a", "b"]);
    let a = snapshot.get("a").unwrap();
    assert_eq!(a.label, "Second");
    assert!(a.disabled);
    assert_eq!(a.source, last);
}

#[test]
fn test_parse_includes_grouped_options() {
    let dom = Dom::new();
    let select = dom.insert(
        Element::select()
            .child(
                Element::new("optgroup")
                    .attr("label", "Citrus")
                    .child(Element::option("l", "Lemon")),
            )
            .child(Element::option("m", "Mango")),
    );

    assert_eq!(parse(&dom, &select).values(), vec!["l", "m"]);
}

#[test]
fn test_parse_is_read_only() {
    let dom = Dom::new();
    let select = dom.insert(Element::select().child(Element::option("a", "Apple")));
    let before = dom.to_html(select);

    let first = parse(&dom, &select);
    let second = parse(&dom, &select);

    assert_eq!(first, second);
    assert_eq!(dom.to_html(select), before);
}

#[test]
fn test_empty_snapshot() {
    let snapshot: OptionSnapshot<u32> = OptionSnapshot::new();
    assert!(snapshot.is_empty());
    assert!(!snapshot.contains(""));

    let snapshot: OptionSnapshot<u32> = vec![SelectOption {
        value: "v".into(),
        label: "V".into(),
        disabled: false,
        source: 7,
    }]
    .into_iter()
    .collect();
    assert_eq!(snapshot.get("v").map(|o| o.source), Some(7));
}
