//! persona-dom — shared DomNode types for the marketplace widgets
//!
//! Every widget renders its state into this JSON DOM snapshot format; the
//! story feed also *reads* its initial entries out of a parsed snapshot of
//! the page markup. The HTML renderer in [`render`] produces the SSR
//! first-paint for the same trees.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub mod render;

pub use render::render_to_html;

/// A single node in a widget DOM tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomNode {
    /// HTML tag name (e.g. "div", "button", "input")
    pub tag: String,

    /// Stable identity for efficient DOM reuse
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,

    /// HTML attributes (class, data-*, etc.)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attrs: Option<BTreeMap<String, String>>,

    /// Map of DOM event name → action name (e.g. "click" → "add_item")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub events: Option<BTreeMap<String, String>>,

    /// Text content for leaf nodes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    /// Child nodes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<DomNode>>,
}

/// A complete snapshot wrapping the root DomNode.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub root: DomNode,
}

impl DomNode {
    /// Create an empty element node.
    pub fn elem(tag: &str) -> Self {
        DomNode {
            tag: tag.to_string(),
            key: None,
            attrs: None,
            events: None,
            text: None,
            children: None,
        }
    }

    /// Create a leaf text node.
    pub fn text(tag: &str, content: impl Into<String>) -> Self {
        DomNode {
            text: Some(content.into()),
            ..DomNode::elem(tag)
        }
    }

    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn attr(mut self, name: &str, value: impl Into<String>) -> Self {
        self.attrs
            .get_or_insert_with(BTreeMap::new)
            .insert(name.to_string(), value.into());
        self
    }

    pub fn class(self, value: impl Into<String>) -> Self {
        self.attr("class", value)
    }

    /// Bind a DOM event to an action name.
    pub fn on(mut self, event: &str, action: impl Into<String>) -> Self {
        self.events
            .get_or_insert_with(BTreeMap::new)
            .insert(event.to_string(), action.into());
        self
    }

    pub fn child(mut self, node: DomNode) -> Self {
        self.children.get_or_insert_with(Vec::new).push(node);
        self
    }

    pub fn children(mut self, nodes: impl IntoIterator<Item = DomNode>) -> Self {
        self.children.get_or_insert_with(Vec::new).extend(nodes);
        self
    }

    /// Get an attribute value if present.
    pub fn attr_value(&self, name: &str) -> Option<&str> {
        self.attrs.as_ref()?.get(name).map(|s| s.as_str())
    }

    /// Get the class attribute if present.
    pub fn class_value(&self) -> Option<&str> {
        self.attr_value("class")
    }

    /// Whether the class attribute contains the given whitespace-separated
    /// class name.
    pub fn has_class(&self, name: &str) -> bool {
        self.class_value()
            .map(|c| c.split_whitespace().any(|part| part == name))
            .unwrap_or(false)
    }

    /// Iterate over children (empty slice if none).
    pub fn children_iter(&self) -> &[DomNode] {
        match &self.children {
            Some(c) => c,
            None => &[],
        }
    }

    /// Get an event action by event name.
    pub fn event(&self, name: &str) -> Option<&str> {
        self.events.as_ref()?.get(name).map(|s| s.as_str())
    }

    /// Depth-first search for the first descendant carrying a class.
    pub fn find_by_class(&self, name: &str) -> Option<&DomNode> {
        if self.has_class(name) {
            return Some(self);
        }
        self.children_iter()
            .iter()
            .find_map(|child| child.find_by_class(name))
    }

    /// Text content of the first descendant with the given class.
    ///
    /// Widgets that source their model from page markup (the story feed)
    /// use this for the `.artisan-name` / `.story-title` style lookups.
    pub fn text_by_class(&self, name: &str) -> Option<&str> {
        self.find_by_class(name)?.text.as_deref()
    }

    /// Collect all descendants (including self) carrying a class, in
    /// document order.
    pub fn collect_by_class<'a>(&'a self, name: &str, out: &mut Vec<&'a DomNode>) {
        if self.has_class(name) {
            out.push(self);
        }
        for child in self.children_iter() {
            child.collect_by_class(name, out);
        }
    }
}

/// Parse a snapshot from a JSON string.
pub fn parse_snapshot(json: &str) -> Result<Snapshot, serde_json::Error> {
    serde_json::from_str(json)
}

/// Parse a single DomNode from a JSON string.
pub fn parse_node(json: &str) -> Result<DomNode, serde_json::Error> {
    serde_json::from_str(json)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_snapshot() {
        let json = r#"{
            "root": {
                "tag": "div",
                "key": "app",
                "children": [
                    { "tag": "h1", "text": "Persona" },
                    { "tag": "button", "events": { "click": "add_item" }, "text": "+" }
                ]
            }
        }"#;

        let snap = parse_snapshot(json).unwrap();
        assert_eq!(snap.root.tag, "div");
        assert_eq!(snap.root.key.as_deref(), Some("app"));
        assert_eq!(snap.root.children_iter().len(), 2);
        assert_eq!(snap.root.children_iter()[1].event("click"), Some("add_item"));
    }

    #[test]
    fn test_builder_roundtrip() {
        let node = DomNode::elem("div")
            .key("card-7")
            .class("story-card active")
            .attr("data-story-id", "7")
            .child(DomNode::text("h3", "Clay and memory").class("story-title"));

        assert!(node.has_class("story-card"));
        assert!(node.has_class("active"));
        assert!(!node.has_class("story"));
        assert_eq!(node.attr_value("data-story-id"), Some("7"));

        let json = serde_json::to_string(&node).unwrap();
        let back = parse_node(&json).unwrap();
        assert_eq!(back.text_by_class("story-title"), Some("Clay and memory"));
    }

    #[test]
    fn test_collect_by_class() {
        let root = DomNode::elem("div").class("feed").children([
            DomNode::elem("div").class("story-card"),
            DomNode::elem("div")
                .class("wrap")
                .child(DomNode::elem("div").class("story-card")),
        ]);

        let mut cards = Vec::new();
        root.collect_by_class("story-card", &mut cards);
        assert_eq!(cards.len(), 2);
    }
}
