//! Attribute change processing

use fos_dom::{MutationRecord, MutationType};

use crate::class::AttributeChange;
use crate::registry::CustomElements;

impl CustomElements {
    /// Forward one attribute batch to the targets' `attributeChangedCallback`.
    ///
    /// The new value is read from the element at delivery time, so several
    /// changes coalesced into one batch all report the latest value.
    pub fn handle_attribute_changes(&mut self, records: Vec<MutationRecord>) {
        tracing::trace!(count = records.len(), "handling attribute batch");
        for record in records {
            if record.mutation_type != MutationType::Attributes {
                continue;
            }
            let Some(name) = record.attribute_name else {
                continue;
            };
            let Some(callback) = self.states.behavior(record.target)
                .and_then(|behavior| behavior.attribute_changed_callback.clone())
            else {
                continue;
            };

            let namespace = record.attribute_namespace;
            let tree = self.document.tree();
            let new_value = match namespace.as_deref() {
                Some(ns) => tree.get_attribute_ns(record.target, Some(ns), &name),
                None => tree.get_attribute(record.target, &name),
            }
            .map(str::to_string);

            let change = AttributeChange {
                name,
                old_value: record.old_value,
                new_value,
                namespace,
            };
            tracing::trace!(node = ?record.target, attribute = %change.name, "attribute changed");
            callback(&mut self.document, record.target, &change);
        }
    }

    /// Synchronously drain and handle pending attribute records
    pub fn flush_attributes(&mut self) {
        let records = self.document.tree_mut()
            .observers_mut()
            .take_records(self.attribute_observer);
        if !records.is_empty() {
            self.handle_attribute_changes(records);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use fos_dom::Document;

    use crate::class::ElementClass;
    use crate::definition::DefineOptions;

    use super::*;

    fn recording_class(log: &Rc<RefCell<Vec<AttributeChange>>>) -> Rc<ElementClass> {
        let sink = Rc::clone(log);
        ElementClass::new("Recorder")
            .observed_attributes(["value"])
            .on_attribute_changed(move |_, _, change| sink.borrow_mut().push(change.clone()))
            .build()
    }

    #[test]
    fn test_coalesced_changes_read_latest_value() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut registry = CustomElements::new(Document::default());
        registry.define("x-rec", recording_class(&log), DefineOptions::default()).unwrap();

        let body = registry.document().body();
        let node = registry.document_mut().tree_mut().create_element("x-rec");
        registry.document_mut().tree_mut().append_child(body, node);
        registry.flush();

        let tree = registry.document_mut().tree_mut();
        tree.set_attribute(node, "value", "1");
        tree.set_attribute(node, "value", "2");
        registry.flush_attributes();

        let log = log.borrow();
        assert_eq!(log.len(), 2);
        assert_eq!(log[0].old_value, None);
        assert_eq!(log[1].old_value.as_deref(), Some("1"));
        assert!(log.iter().all(|c| c.new_value.as_deref() == Some("2")));
    }

    #[test]
    fn test_removed_attribute_reports_none() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut registry = CustomElements::new(Document::default());
        registry.define("x-rec", recording_class(&log), DefineOptions::default()).unwrap();

        let node = registry.document_mut().tree_mut().create_element("x-rec");
        registry.upgrade(node).unwrap();
        registry.document_mut().tree_mut().set_attribute(node, "value", "on");
        registry.flush_attributes();
        registry.document_mut().tree_mut().remove_attribute(node, "value");
        registry.flush_attributes();

        let last = log.borrow().last().cloned().unwrap();
        assert_eq!(last, AttributeChange {
            name: "value".into(),
            old_value: Some("on".into()),
            new_value: None,
            namespace: None,
        });
    }

    #[test]
    fn test_records_without_behavior_are_skipped() {
        let mut registry = CustomElements::new(Document::default());
        let node = registry.document_mut().tree_mut().create_element("div");
        let record = MutationRecord {
            mutation_type: MutationType::Attributes,
            target: node,
            added_nodes: Vec::new(),
            removed_nodes: Vec::new(),
            previous_sibling: None,
            next_sibling: None,
            attribute_name: Some("value".into()),
            attribute_namespace: None,
            old_value: None,
        };
        registry.handle_attribute_changes(vec![record]);
    }
}
