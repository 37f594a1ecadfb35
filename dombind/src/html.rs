//! Markup serialization for inspecting a tree.

use crate::document::{Document, Dom, NodeId};

fn escape(text: &str, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
}

fn write_node(doc: &Document, id: NodeId, out: &mut String) {
    let Some(node) = doc.node(id) else {
        return;
    };

    out.push('<');
    out.push_str(&node.tag);
    if !node.classes.is_empty() {
        out.push_str(" class=\"");
        escape(&node.classes.join(" "), out);
        out.push('"');
    }
    for (name, value) in &node.attrs {
        out.push(' ');
        out.push_str(name);
        out.push_str("=\"");
        escape(value, out);
        out.push('"');
    }
    if node.hidden {
        out.push_str(" style=\"display: none\"");
    }
    out.push('>');

    escape(&node.text, out);
    for &child in &node.children {
        write_node(doc, child, out);
    }

    out.push_str("</");
    out.push_str(&node.tag);
    out.push('>');
}

impl Dom {
    /// Serialize `node` and its subtree. Attributes are emitted in name order,
    /// the data store is not part of the markup.
    pub fn to_html(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.read(|doc| write_node(doc, node, &mut out));
        out
    }
}
