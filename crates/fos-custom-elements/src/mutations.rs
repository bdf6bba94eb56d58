//! Mutation batch processing
//!
//! Child-list batches drive upgrades and the connect/disconnect
//! transitions. Records pile up in the tree observer's queue until
//! [`CustomElements::flush`] or [`CustomElements::process_mutations`]
//! drains them.

use std::rc::Rc;

use fos_dom::{MutationObserverInit, MutationRecord, MutationType, NodeId};

use crate::error::Result;
use crate::registry::CustomElements;

impl CustomElements {
    /// Watch child-list changes anywhere under `root`. Idempotent.
    pub fn observe_root(&mut self, root: NodeId) {
        if !self.observed_roots.insert(root) {
            return;
        }
        self.document.tree_mut()
            .observers_mut()
            .observe(self.tree_observer, root, MutationObserverInit::child_list_subtree());
        tracing::debug!(?root, "observing root for custom elements");
    }

    /// Synchronously drain and handle pending child-list records
    pub fn flush(&mut self) {
        let records = self.document.tree_mut().observers_mut().take_records(self.tree_observer);
        if !records.is_empty() {
            self.handle_mutations(records);
        }
    }

    /// Deliver every pending batch, child-list before attribute, until both
    /// queues stay empty. Stands in for the host's delivery checkpoint.
    pub fn process_mutations(&mut self) {
        loop {
            let tree_records = self.document.tree_mut()
                .observers_mut()
                .take_records(self.tree_observer);
            let had_tree = !tree_records.is_empty();
            if had_tree {
                self.handle_mutations(tree_records);
            }

            let attribute_records = self.document.tree_mut()
                .observers_mut()
                .take_records(self.attribute_observer);
            let had_attributes = !attribute_records.is_empty();
            if had_attributes {
                self.handle_attribute_changes(attribute_records);
            }

            if !had_tree && !had_attributes {
                break;
            }
        }
    }

    /// Handle one child-list batch: added nodes, then removed nodes, per record.
    ///
    /// Constructor failures are logged and do not stop the batch.
    pub fn handle_mutations(&mut self, records: Vec<MutationRecord>) {
        tracing::trace!(count = records.len(), "handling mutation batch");
        for record in records {
            if record.mutation_type != MutationType::ChildList {
                continue;
            }
            // Already logged per element
            let _ = self.add_nodes(&record.added_nodes);
            self.remove_nodes(&record.removed_nodes);
        }
    }

    /// Upgrade and connect every matching element under `roots`, pre-order.
    ///
    /// The walk continues past a failing constructor; the first error is
    /// returned once every node has been visited.
    pub(crate) fn add_nodes(&mut self, roots: &[NodeId]) -> Result<()> {
        let mut first_error = None;
        for &root in roots {
            let subtree: Vec<NodeId> = self.document.tree().inclusive_descendants(root).collect();
            for node in subtree {
                if let Err(err) = self.add_node(node) {
                    first_error.get_or_insert(err);
                }
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    fn add_node(&mut self, node: NodeId) -> Result<()> {
        let Some(definition) = self.definition_for(node) else {
            return Ok(());
        };

        if !self.states.is_upgraded(node) {
            if let Err(err) = self.upgrade_element(node, &definition, true) {
                tracing::error!(
                    ?node,
                    name = %definition.name,
                    %err,
                    "custom element constructor failed"
                );
                return Err(err);
            }
        }

        if self.states.attach(node) {
            let connected = self.states.behavior(node)
                .and_then(|behavior| behavior.connected_callback.clone());
            tracing::trace!(?node, name = %definition.name, "connected");
            if let Some(callback) = connected {
                callback(&mut self.document, node);
            }
        }
        Ok(())
    }

    /// Disconnect every attached element under `roots`, pre-order
    pub(crate) fn remove_nodes(&mut self, roots: &[NodeId]) {
        for &root in roots {
            let subtree: Vec<NodeId> = self.document.tree().inclusive_descendants(root).collect();
            for node in subtree {
                if !self.states.detach(node) {
                    continue;
                }
                let disconnected = self.states.behavior(node).map(Rc::clone);
                tracing::trace!(?node, "disconnected");
                if let Some(callback) = disconnected.and_then(|b| b.disconnected_callback.clone()) {
                    callback(&mut self.document, node);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use fos_dom::Document;

    use crate::class::ElementClass;
    use crate::definition::DefineOptions;
    use crate::state::Lifecycle;

    use super::*;

    fn logging_class(log: &Rc<RefCell<Vec<String>>>) -> Rc<ElementClass> {
        let connected = Rc::clone(log);
        let disconnected = Rc::clone(log);
        ElementClass::new("Logged")
            .on_connected(move |_, node| connected.borrow_mut().push(format!("connected {node:?}")))
            .on_disconnected(move |_, node| {
                disconnected.borrow_mut().push(format!("disconnected {node:?}"))
            })
            .build()
    }

    #[test]
    fn test_nested_subtree_connects_in_document_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut registry = CustomElements::new(Document::default());
        registry.define("x-item", logging_class(&log), DefineOptions::default()).unwrap();

        let observer = registry.tree_observer;
        let tree = registry.document_mut().tree_mut();
        let outer = tree.create_element("x-item");
        let plain = tree.create_element("div");
        let inner = tree.create_element("x-item");
        tree.append_child(outer, plain);
        tree.append_child(plain, inner);
        // Building a detached subtree queues nothing
        assert!(!tree.observers().has_records(observer));

        let body = registry.document().body();
        registry.document_mut().tree_mut().append_child(body, outer);
        registry.flush();

        assert_eq!(
            *log.borrow(),
            vec![format!("connected {outer:?}"), format!("connected {inner:?}")]
        );
        assert_eq!(registry.lifecycle(plain), Lifecycle::Unseen);

        registry.document_mut().tree_mut().detach(outer);
        registry.flush();
        assert_eq!(log.borrow().len(), 4);
        assert_eq!(log.borrow()[3], format!("disconnected {inner:?}"));
    }

    #[test]
    fn test_move_within_document_reconnects() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut registry = CustomElements::new(Document::default());
        registry.define("x-item", logging_class(&log), DefineOptions::default()).unwrap();

        let body = registry.document().body();
        let head = registry.document().head();
        let node = registry.document_mut().tree_mut().create_element("x-item");
        registry.document_mut().tree_mut().append_child(body, node);
        registry.flush();

        registry.document_mut().tree_mut().append_child(head, node);
        registry.flush();

        assert_eq!(
            *log.borrow(),
            vec![
                format!("connected {node:?}"),
                format!("disconnected {node:?}"),
                format!("connected {node:?}"),
            ]
        );
        assert_eq!(registry.lifecycle(node), Lifecycle::Attached);
    }

    #[test]
    fn test_unobserved_root_is_ignored() {
        let config = crate::Config {
            observe_document: false,
            ..Default::default()
        };
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut registry = CustomElements::with_config(Document::default(), config);
        registry.define("x-item", logging_class(&log), DefineOptions::default()).unwrap();
        log.borrow_mut().clear();

        let body = registry.document().body();
        let node = registry.document_mut().tree_mut().create_element("x-item");
        registry.document_mut().tree_mut().append_child(body, node);
        registry.flush();
        assert!(log.borrow().is_empty());

        registry.observe_root(body);
        registry.observe_root(body);
        let second = registry.document_mut().tree_mut().create_element("x-item");
        registry.document_mut().tree_mut().append_child(body, second);
        registry.flush();
        assert_eq!(*log.borrow(), vec![format!("connected {second:?}")]);
    }

    #[test]
    fn test_failed_constructor_skips_connect() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        let class = ElementClass::new("Broken")
            .with_constructor(|_| Err(crate::CustomElementError::UnknownConstructorInvocation))
            .on_connected(move |_, _| sink.borrow_mut().push("connected"))
            .build();

        let mut registry = CustomElements::new(Document::default());
        registry.define("x-broken", class, DefineOptions::default()).unwrap();
        let body = registry.document().body();
        let broken = registry.document_mut().tree_mut().create_element("x-broken");
        registry.document_mut().tree_mut().append_child(body, broken);
        registry.flush();

        assert!(log.borrow().is_empty());
        assert!(registry.is_upgraded(broken));
        assert!(!registry.is_attached(broken));
        assert!(registry.pending_construction().is_empty());
    }
}
