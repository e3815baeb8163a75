use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Virtual DOM node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum VNode {
    /// HTML element
    Element {
        tag: String,
        attributes: BTreeMap<String, String>,
        styles: BTreeMap<String, String>,
        children: Vec<VNode>,
        /// Element id for page roots, item index for repeated children
        #[serde(skip_serializing_if = "Option::is_none")]
        key: Option<String>,
    },

    /// Text node
    Text { content: String },

    /// Comment node
    Comment { content: String },

    /// Error node (shown inline instead of failing the whole page)
    Error {
        message: String,
        /// Id of the element that failed to render
        #[serde(skip_serializing_if = "Option::is_none")]
        element_id: Option<String>,
    },
}

impl VNode {
    pub fn element(tag: impl Into<String>) -> Self {
        VNode::Element {
            tag: tag.into(),
            attributes: BTreeMap::new(),
            styles: BTreeMap::new(),
            children: Vec::new(),
            key: None,
        }
    }

    pub fn text(content: impl Into<String>) -> Self {
        VNode::Text {
            content: content.into(),
        }
    }

    pub fn comment(content: impl Into<String>) -> Self {
        VNode::Comment {
            content: content.into(),
        }
    }

    pub fn error(message: impl Into<String>, element_id: Option<String>) -> Self {
        VNode::Error {
            message: message.into(),
            element_id,
        }
    }

    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        if let VNode::Element {
            ref mut attributes, ..
        } = self
        {
            attributes.insert(key.into(), value.into());
        }
        self
    }

    pub fn with_style(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        if let VNode::Element { ref mut styles, .. } = self {
            styles.insert(key.into(), value.into());
        }
        self
    }

    pub fn with_child(mut self, child: VNode) -> Self {
        if let VNode::Element {
            ref mut children, ..
        } = self
        {
            children.push(child);
        }
        self
    }

    pub fn with_children(mut self, new_children: Vec<VNode>) -> Self {
        if let VNode::Element {
            ref mut children, ..
        } = self
        {
            children.extend(new_children);
        }
        self
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        if let VNode::Element {
            key: ref mut node_key,
            ..
        } = self
        {
            *node_key = Some(key.into());
        }
        self
    }

    pub fn tag(&self) -> Option<&str> {
        match self {
            VNode::Element { tag, .. } => Some(tag),
            _ => None,
        }
    }

    pub fn key(&self) -> Option<&str> {
        match self {
            VNode::Element { key, .. } => key.as_deref(),
            _ => None,
        }
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        match self {
            VNode::Element { attributes, .. } => attributes.get(name).map(String::as_str),
            _ => None,
        }
    }

    pub fn style(&self, name: &str) -> Option<&str> {
        match self {
            VNode::Element { styles, .. } => styles.get(name).map(String::as_str),
            _ => None,
        }
    }

    pub fn children(&self) -> &[VNode] {
        match self {
            VNode::Element { children, .. } => children,
            _ => &[],
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, VNode::Error { .. })
    }

    /// Concatenated text of this subtree, error messages included
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            VNode::Text { content } => out.push_str(content),
            VNode::Error { message, .. } => out.push_str(message),
            VNode::Comment { .. } => {}
            VNode::Element { children, .. } => {
                for child in children {
                    child.collect_text(out);
                }
            }
        }
    }

    /// Depth-first search for the first node matching `pred`
    pub fn find(&self, pred: &dyn Fn(&VNode) -> bool) -> Option<&VNode> {
        if pred(self) {
            return Some(self);
        }
        self.children().iter().find_map(|child| child.find(pred))
    }
}

/// Rendered page: one root node per element plus page-level style rules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VirtualDomDocument {
    pub nodes: Vec<VNode>,
    pub styles: Vec<CssRule>,
}

/// CSS Rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CssRule {
    pub selector: String,
    pub properties: BTreeMap<String, String>,
}

impl VirtualDomDocument {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            styles: Vec::new(),
        }
    }

    pub fn add_node(&mut self, node: VNode) {
        self.nodes.push(node);
    }

    pub fn add_style(&mut self, selector: impl Into<String>, properties: BTreeMap<String, String>) {
        self.styles.push(CssRule {
            selector: selector.into(),
            properties,
        });
    }

    /// Root node rendered for the given element id
    pub fn node_for(&self, element_id: &str) -> Option<&VNode> {
        self.nodes.iter().find(|n| n.key() == Some(element_id))
    }
}

impl Default for VirtualDomDocument {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_and_accessors() {
        let node = VNode::element("section")
            .with_key("el-1")
            .with_attr("class", "hero")
            .with_style("padding", "48px")
            .with_child(VNode::element("h1").with_child(VNode::text("Hello")))
            .with_child(VNode::comment("ignored"));

        assert_eq!(node.key(), Some("el-1"));
        assert_eq!(node.attr("class"), Some("hero"));
        assert_eq!(node.style("padding"), Some("48px"));
        assert_eq!(node.text_content(), "Hello");
        assert!(node.find(&|n| n.tag() == Some("h1")).is_some());
    }

    #[test]
    fn test_builders_ignore_non_elements() {
        let node = VNode::text("plain").with_attr("class", "x").with_key("k");
        assert_eq!(node, VNode::text("plain"));
        assert!(node.children().is_empty());
    }

    #[test]
    fn test_serialization_is_tagged() {
        let json = serde_json::to_string(&VNode::error("boom", None)).unwrap();
        assert_eq!(json, r#"{"type":"Error","message":"boom"}"#);
    }
}
