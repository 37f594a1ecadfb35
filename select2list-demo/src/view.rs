//! Reads the generated list back out of the element tree for drawing.

use dombind::{Dom, NodeId};
use select2list::render::{DISABLED_CLASS, SELECTED_CLASS};
use select2list::{ItemState, SelectList};

use crate::terminal::LineStyle;

/// Rows above the first list item.
pub const HEADER_ROWS: usize = 3;

/// One generated item as drawn on screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub value: String,
    pub label: String,
    pub state: ItemState,
    /// The anchor to click, for interactive items
    pub activator: Option<NodeId>,
}

pub fn rows(dom: &Dom, list: &SelectList<Dom>) -> Vec<Row> {
    let key = &list.config().value_binding_key;
    dom.children(*list.container())
        .into_iter()
        .map(|item| {
            let state = if dom.has_class(item, SELECTED_CLASS) {
                ItemState::Selected
            } else if dom.has_class(item, DISABLED_CLASS) {
                ItemState::Disabled
            } else {
                ItemState::Interactive
            };
            Row {
                value: dom.data(item, key).unwrap_or_default(),
                label: dom.text(item),
                state,
                activator: dom.find(item, "a").first().copied(),
            }
        })
        .collect()
}

pub fn lines(rows: &[Row], cursor: usize, status: &str) -> Vec<(String, LineStyle)> {
    let mut lines = vec![
        (
            "select2list demo".to_string(),
            LineStyle {
                bold: true,
                ..Default::default()
            },
        ),
        (
            "click/enter: select  j/k: move  d/e: disable/enable  a: add  q: quit".to_string(),
            LineStyle {
                dim: true,
                ..Default::default()
            },
        ),
        (String::new(), LineStyle::default()),
    ];

    for (i, row) in rows.iter().enumerate() {
        let (marker, style) = match row.state {
            ItemState::Selected => (
                '◉',
                LineStyle {
                    bold: true,
                    ..Default::default()
                },
            ),
            ItemState::Disabled => (
                ' ',
                LineStyle {
                    dim: true,
                    ..Default::default()
                },
            ),
            ItemState::Interactive => ('◯', LineStyle::default()),
        };
        let style = LineStyle {
            reverse: i == cursor,
            ..style
        };
        lines.push((format!(" {} {}", marker, row.label), style));
    }

    lines.push((String::new(), LineStyle::default()));
    lines.push((status.to_string(), LineStyle::default()));
    lines
}
