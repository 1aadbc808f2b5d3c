//! Render DomNode trees to HTML strings for SSR first-paint.
//!
//! Event bindings become `data-a_<event>` attributes and keys become
//! `data-key`, so client-side event delegation attaches without a hydration
//! pass.

use crate::DomNode;

/// Void elements that must not have closing tags
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input",
    "link", "meta", "param", "source", "track", "wbr",
];

/// Render a DomNode tree to an HTML string.
pub fn render_to_html(node: &DomNode) -> String {
    let mut buf = String::with_capacity(4096);
    write_node(node, &mut buf);
    buf
}

fn write_node(node: &DomNode, buf: &mut String) {
    let is_void = VOID_ELEMENTS.contains(&node.tag.as_str());

    buf.push('<');
    buf.push_str(&node.tag);

    if let Some(key) = &node.key {
        buf.push_str(" data-key=\"");
        buf.push_str(&escape_attr(key));
        buf.push('"');
    }

    // BTreeMap iteration keeps attribute output deterministic
    if let Some(attrs) = &node.attrs {
        for (k, v) in attrs {
            buf.push(' ');
            buf.push_str(k);
            buf.push_str("=\"");
            buf.push_str(&escape_attr(v));
            buf.push('"');
        }
    }

    if let Some(events) = &node.events {
        for (k, v) in events {
            buf.push_str(" data-a_");
            buf.push_str(k);
            buf.push_str("=\"");
            buf.push_str(&escape_attr(v));
            buf.push('"');
        }
    }

    buf.push('>');

    if let Some(text) = &node.text {
        buf.push_str(&escape_html(text));
    }

    for child in node.children_iter() {
        write_node(child, buf);
    }

    if !is_void {
        buf.push_str("</");
        buf.push_str(&node.tag);
        buf.push('>');
    }
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn escape_attr(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DomNode;

    #[test]
    fn test_simple_render() {
        let node = DomNode::elem("div")
            .key("bundle")
            .class("bundle-canvas")
            .child(DomNode::text("h1", "My Bundle"))
            .child(
                DomNode::text("button", "Save")
                    .key("save")
                    .on("click", "save_bundle"),
            );

        let html = render_to_html(&node);
        assert!(html.contains("data-key=\"bundle\""));
        assert!(html.contains("class=\"bundle-canvas\""));
        assert!(html.contains("data-a_click=\"save_bundle\""));
        assert!(html.contains("<h1>My Bundle</h1>"));
    }

    #[test]
    fn test_void_element() {
        let node = DomNode::elem("img")
            .attr("src", "/img/pot.jpg")
            .attr("alt", "Handcrafted Water Pot");
        let html = render_to_html(&node);
        assert!(html.starts_with("<img"));
        assert!(!html.contains("</img>"));
    }

    #[test]
    fn test_text_is_escaped() {
        let node = DomNode::text("p", "pots & <pans>");
        assert_eq!(render_to_html(&node), "<p>pots &amp; &lt;pans&gt;</p>");
    }
}
