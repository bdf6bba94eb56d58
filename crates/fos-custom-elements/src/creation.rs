//! Element creation entry points
//!
//! Imperative creation goes through the same upgrade path as parsed or
//! inserted markup, so an element created for a defined name comes back
//! already upgraded.

use fos_dom::{NodeId, HTML_NAMESPACE};

use crate::error::Result;
use crate::registry::CustomElements;

impl CustomElements {
    /// `document.createElement`
    pub fn create_element(&mut self, tag_name: &str) -> Result<NodeId> {
        if !self.config.intercept_creation {
            return Ok(self.document.tree_mut().create_element(tag_name));
        }
        self.create_element_internal(tag_name, true)
    }

    /// Create an element and bind it to the definition for its tag, if any.
    ///
    /// Without `should_construct` the constructor is deferred to the first
    /// insertion into an observed tree.
    pub(crate) fn create_element_internal(
        &mut self,
        tag_name: &str,
        should_construct: bool,
    ) -> Result<NodeId> {
        let node = self.document.tree_mut().create_element(tag_name);
        if let Some(definition) = self.definition_for(node) {
            self.upgrade_element(node, &definition, should_construct)?;
        }
        Ok(node)
    }

    /// `document.createElement(tag, { is })` for customized built-ins
    pub fn create_element_is(&mut self, tag_name: &str, is: &str) -> Result<NodeId> {
        let node = self.document.tree_mut().create_element(tag_name);
        self.document.tree_mut().set_attribute(node, "is", &is.to_ascii_lowercase());
        if !self.config.intercept_creation {
            return Ok(node);
        }
        if let Some(definition) = self.definition_for(node) {
            self.upgrade_element(node, &definition, true)?;
        }
        Ok(node)
    }

    /// `document.createElementNS`. Only the HTML namespace is upgraded.
    pub fn create_element_ns(
        &mut self,
        namespace: Option<&str>,
        qualified_name: &str,
    ) -> Result<NodeId> {
        if namespace == Some(HTML_NAMESPACE) {
            return self.create_element(qualified_name);
        }
        Ok(self.document.tree_mut().create_element_ns(namespace, qualified_name))
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use fos_dom::Document;

    use crate::class::ElementClass;
    use crate::config::Config;
    use crate::definition::DefineOptions;
    use crate::state::Lifecycle;

    use super::*;

    fn counting_class(count: &Rc<Cell<u32>>) -> Rc<ElementClass> {
        let count = Rc::clone(count);
        ElementClass::new("Counted")
            .with_constructor(move |ctx| {
                count.set(count.get() + 1);
                ctx.html_element()
            })
            .build()
    }

    #[test]
    fn test_create_element_upgrades() {
        let count = Rc::new(Cell::new(0));
        let mut registry = CustomElements::new(Document::default());
        registry.define("x-count", counting_class(&count), DefineOptions::default()).unwrap();

        let node = registry.create_element("X-Count").unwrap();
        assert_eq!(count.get(), 1);
        assert_eq!(registry.lifecycle(node), Lifecycle::Detached);

        let plain = registry.create_element("div").unwrap();
        assert_eq!(registry.lifecycle(plain), Lifecycle::Unseen);
    }

    #[test]
    fn test_deferred_construction() {
        let count = Rc::new(Cell::new(0));
        let mut registry = CustomElements::new(Document::default());
        registry.define("x-count", counting_class(&count), DefineOptions::default()).unwrap();

        let node = registry.create_element_internal("x-count", false).unwrap();
        assert_eq!(count.get(), 0);
        assert!(!registry.is_upgraded(node));

        let body = registry.document().body();
        registry.document_mut().tree_mut().append_child(body, node);
        registry.flush();
        assert_eq!(count.get(), 1);
        assert_eq!(registry.lifecycle(node), Lifecycle::Attached);
    }

    #[test]
    fn test_create_element_ns() {
        let count = Rc::new(Cell::new(0));
        let mut registry = CustomElements::new(Document::default());
        registry.define("x-count", counting_class(&count), DefineOptions::default()).unwrap();

        let html = registry.create_element_ns(Some(HTML_NAMESPACE), "x-count").unwrap();
        assert!(registry.is_upgraded(html));

        let svg = registry
            .create_element_ns(Some("http://www.w3.org/2000/svg"), "x-count")
            .unwrap();
        assert!(!registry.is_upgraded(svg));

        let body = registry.document().body();
        registry.document_mut().tree_mut().append_child(body, svg);
        registry.flush();
        assert_eq!(registry.lifecycle(svg), Lifecycle::Unseen);
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_create_element_is() {
        let count = Rc::new(Cell::new(0));
        let mut registry = CustomElements::new(Document::default());
        registry
            .define("fancy-button", counting_class(&count), DefineOptions::extends("button"))
            .unwrap();

        let fancy = registry.create_element_is("button", "fancy-button").unwrap();
        assert!(registry.is_upgraded(fancy));
        assert_eq!(registry.document().tree().get_attribute(fancy, "is"), Some("fancy-button"));

        let plain = registry.create_element("button").unwrap();
        assert!(!registry.is_upgraded(plain));
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_interception_disabled() {
        let count = Rc::new(Cell::new(0));
        let config = Config {
            intercept_creation: false,
            ..Default::default()
        };
        let mut registry = CustomElements::with_config(Document::default(), config);
        registry.define("x-count", counting_class(&count), DefineOptions::default()).unwrap();

        let node = registry.create_element("x-count").unwrap();
        assert_eq!(registry.lifecycle(node), Lifecycle::Unseen);

        // Still upgraded once it lands in the document
        let body = registry.document().body();
        registry.document_mut().tree_mut().append_child(body, node);
        registry.flush();
        assert_eq!(registry.lifecycle(node), Lifecycle::Attached);
        assert_eq!(count.get(), 1);
    }
}
