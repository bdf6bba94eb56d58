//! HTML5 Parser implementation
//!
//! Uses html5ever's build-in RcDom and converts to our DOM format.
//! This is simpler and more reliable than implementing TreeSink directly.

use fos_dom::{Document, DomTree, NodeId, HTML_NAMESPACE};
use html5ever::tendril::TendrilSink;
use html5ever::{parse_document, parse_fragment, LocalName, Namespace, QualName};
use markup5ever_rcdom::{Handle, NodeData as RcNodeData, RcDom};

/// HTML5 parser
pub struct HtmlParser;

impl HtmlParser {
    /// Create a new HTML parser
    pub fn new() -> Self {
        Self
    }

    /// Parse HTML string into a Document
    pub fn parse(&self, html: &str) -> Document {
        self.parse_with_url(html, "about:blank")
    }

    /// Parse HTML with a base URL
    pub fn parse_with_url(&self, html: &str, url: &str) -> Document {
        tracing::debug!("Parsing HTML document: {}", url);

        let dom = parse_document(RcDom::default(), Default::default()).one(html);

        let mut document = Document::empty(url);
        let root = document.tree().root();
        for child in dom.document.children.borrow().iter() {
            if let Some(id) = self.convert_node(child, document.tree_mut()) {
                document.tree_mut().append_child(root, id);
            }
        }

        // Find html, head, body elements
        document.finalize();

        tracing::debug!("Parsed {} nodes", document.tree().len());
        document
    }

    /// Parse `html` as the content of a `<body>` and splice the result into `parent`.
    ///
    /// The fragment is assembled detached, then each top-level node is
    /// appended, so observers see one child-list record per top-level node.
    /// Metadata elements such as `<style>` or `<meta>` stay where they appear.
    pub fn parse_fragment_into(
        &self,
        tree: &mut DomTree,
        parent: NodeId,
        html: &str,
    ) -> Vec<NodeId> {
        let context = QualName::new(None, Namespace::from(HTML_NAMESPACE), LocalName::from("body"));
        let dom = parse_fragment(RcDom::default(), Default::default(), context, Vec::new(), true)
            .one(html);

        // Fragment content hangs off a synthetic <html> root
        let Some(root) = dom.document.children.borrow().first().cloned() else {
            return Vec::new();
        };

        let built: Vec<NodeId> = root.children.borrow().iter()
            .filter_map(|child| self.convert_node(child, tree))
            .collect();

        let mut inserted = Vec::with_capacity(built.len());
        for id in built {
            if tree.append_child(parent, id) {
                inserted.push(id);
            }
        }
        tracing::debug!(?parent, count = inserted.len(), "Spliced parsed fragment");
        inserted
    }

    /// Convert an RcDom node into a detached subtree of `tree`
    fn convert_node(&self, handle: &Handle, tree: &mut DomTree) -> Option<NodeId> {
        match &handle.data {
            RcNodeData::Text { contents } => {
                let text = contents.borrow().to_string();
                if text.trim().is_empty() {
                    return None;
                }
                Some(tree.create_text(&text))
            }
            RcNodeData::Comment { contents } => Some(tree.create_comment(contents)),
            RcNodeData::Element { name, attrs, .. } => {
                let ns = name.ns.to_string();
                let id = tree.create_element_ns(Some(ns.as_str()), &name.local);

                for attr in attrs.borrow().iter() {
                    let attr_ns = attr.name.ns.to_string();
                    let attr_ns = (!attr_ns.is_empty()).then_some(attr_ns.as_str());
                    tree.set_attribute_ns(id, attr_ns, &attr.name.local, &attr.value);
                }

                for child in handle.children.borrow().iter() {
                    if let Some(child_id) = self.convert_node(child, tree) {
                        tree.append_child(id, child_id);
                    }
                }
                Some(id)
            }
            // Doctype and processing instructions have no counterpart in our tree
            _ => None,
        }
    }
}

impl Default for HtmlParser {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple() {
        let html = "<html><head><title>Test</title></head><body><p>Hello</p></body></html>";
        let doc = HtmlParser::new().parse(html);

        assert!(doc.tree().len() > 1, "Expected more than 1 node, got {}", doc.tree().len());
        assert_eq!(doc.title(), "Test");
    }

    #[test]
    fn test_parse_fragment() {
        let html = "<div><span>Text</span></div>";
        let doc = HtmlParser::new().parse(html);

        // Even fragments get wrapped in html/head/body by html5ever
        assert!(doc.body().is_valid());
        assert_eq!(doc.get_elements_by_tag_name("span").len(), 1);
    }

    #[test]
    fn test_custom_tags_survive() {
        let doc = HtmlParser::new()
            .parse(r#"<my-widget value="1"><x-inner></x-inner></my-widget>"#);
        let widgets = doc.get_elements_by_tag_name("my-widget");
        assert_eq!(widgets.len(), 1);
        assert_eq!(doc.tree().get_attribute(widgets[0], "value"), Some("1"));
        assert_eq!(doc.get_elements_by_tag_name("x-inner").len(), 1);
    }
}
