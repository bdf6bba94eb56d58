//! DOM Observers
//!
//! MutationObserver registrations and their pending record queues. Tree
//! mutations queue records synchronously; nothing is delivered until the
//! owner drains a queue with [`MutationObservers::take_records`].

use crate::NodeId;

/// Mutation observer handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u32);

/// Mutation observer options
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MutationObserverInit {
    pub child_list: bool,
    pub attributes: bool,
    pub subtree: bool,
    pub attribute_old_value: bool,
    pub attribute_filter: Option<Vec<String>>,
}

impl MutationObserverInit {
    /// Child-list changes anywhere under the target
    pub fn child_list_subtree() -> Self {
        Self {
            child_list: true,
            subtree: true,
            ..Default::default()
        }
    }

    /// Attribute changes on the target only, restricted to `filter`, with old values
    pub fn attributes_with_old_value(filter: Vec<String>) -> Self {
        Self {
            attributes: true,
            attribute_old_value: true,
            attribute_filter: Some(filter),
            ..Default::default()
        }
    }

    fn accepts_attribute(&self, name: &str) -> bool {
        self.attributes
            && self.attribute_filter.as_ref()
                .is_none_or(|filter| filter.iter().any(|f| f == name))
    }
}

/// Mutation record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationRecord {
    pub mutation_type: MutationType,
    pub target: NodeId,
    pub added_nodes: Vec<NodeId>,
    pub removed_nodes: Vec<NodeId>,
    pub previous_sibling: Option<NodeId>,
    pub next_sibling: Option<NodeId>,
    pub attribute_name: Option<String>,
    pub attribute_namespace: Option<String>,
    pub old_value: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationType {
    Attributes,
    ChildList,
}

impl MutationRecord {
    pub(crate) fn child_list(
        target: NodeId,
        added_nodes: Vec<NodeId>,
        removed_nodes: Vec<NodeId>,
        previous_sibling: Option<NodeId>,
        next_sibling: Option<NodeId>,
    ) -> Self {
        Self {
            mutation_type: MutationType::ChildList,
            target,
            added_nodes,
            removed_nodes,
            previous_sibling,
            next_sibling,
            attribute_name: None,
            attribute_namespace: None,
            old_value: None,
        }
    }

    pub(crate) fn attribute(target: NodeId, name: &str, namespace: Option<&str>) -> Self {
        Self {
            mutation_type: MutationType::Attributes,
            target,
            added_nodes: Vec::new(),
            removed_nodes: Vec::new(),
            previous_sibling: None,
            next_sibling: None,
            attribute_name: Some(name.to_string()),
            attribute_namespace: namespace.map(str::to_string),
            old_value: None,
        }
    }
}

/// Mutation observer
#[derive(Debug)]
struct MutationObserver {
    id: ObserverId,
    registrations: Vec<(NodeId, MutationObserverInit)>,
    records: Vec<MutationRecord>,
}

impl MutationObserver {
    /// Options of every registration interested in a mutation of `path[0]`.
    ///
    /// `path` is the inclusive ancestor chain of the mutated node, nearest first.
    fn interested<'a>(
        &'a self,
        path: &'a [NodeId],
    ) -> impl Iterator<Item = &'a MutationObserverInit> + 'a {
        self.registrations.iter().filter_map(move |(target, options)| {
            let hit = match path.iter().position(|id| id == target) {
                Some(0) => true,
                Some(_) => options.subtree,
                None => false,
            };
            hit.then_some(options)
        })
    }
}

/// All mutation observers attached to a tree
#[derive(Debug, Default)]
pub struct MutationObservers {
    observers: Vec<MutationObserver>,
    next_id: u32,
}

impl MutationObservers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new observer with no registrations
    pub fn create(&mut self) -> ObserverId {
        let id = ObserverId(self.next_id);
        self.next_id += 1;
        self.observers.push(MutationObserver {
            id,
            registrations: Vec::new(),
            records: Vec::new(),
        });
        id
    }

    /// Observe `target`. Re-observing a target replaces its options.
    pub fn observe(&mut self, observer: ObserverId, target: NodeId, options: MutationObserverInit) {
        let Some(obs) = self.get_mut(observer) else {
            tracing::warn!(?observer, "observe on unknown mutation observer");
            return;
        };
        match obs.registrations.iter_mut().find(|(t, _)| *t == target) {
            Some((_, existing)) => *existing = options,
            None => obs.registrations.push((target, options)),
        }
    }

    /// Check whether `observer` has a registration on `target`
    pub fn is_observing(&self, observer: ObserverId, target: NodeId) -> bool {
        self.get(observer)
            .is_some_and(|obs| obs.registrations.iter().any(|(t, _)| *t == target))
    }

    /// Drop all registrations and pending records
    pub fn disconnect(&mut self, observer: ObserverId) {
        if let Some(obs) = self.get_mut(observer) {
            obs.registrations.clear();
            obs.records.clear();
        }
    }

    /// Drain the pending record batch
    pub fn take_records(&mut self, observer: ObserverId) -> Vec<MutationRecord> {
        self.get_mut(observer)
            .map(|obs| std::mem::take(&mut obs.records))
            .unwrap_or_default()
    }

    /// Check whether a batch is waiting for delivery
    pub fn has_records(&self, observer: ObserverId) -> bool {
        self.get(observer).is_some_and(|obs| !obs.records.is_empty())
    }

    pub(crate) fn queue_child_list(&mut self, path: &[NodeId], record: MutationRecord) {
        for obs in &mut self.observers {
            if obs.interested(path).any(|o| o.child_list) {
                obs.records.push(record.clone());
            }
        }
    }

    pub(crate) fn queue_attribute(
        &mut self,
        path: &[NodeId],
        record: MutationRecord,
        old_value: Option<&str>,
    ) {
        let name = record.attribute_name.as_deref().unwrap_or_default();
        for obs in &mut self.observers {
            let mut interested = false;
            let mut wants_old = false;
            for options in obs.interested(path).filter(|o| o.accepts_attribute(name)) {
                interested = true;
                wants_old |= options.attribute_old_value;
            }
            if interested {
                let mut record = record.clone();
                if wants_old {
                    record.old_value = old_value.map(str::to_string);
                }
                obs.records.push(record);
            }
        }
    }

    fn get(&self, id: ObserverId) -> Option<&MutationObserver> {
        self.observers.iter().find(|o| o.id == id)
    }

    fn get_mut(&mut self, id: ObserverId) -> Option<&mut MutationObserver> {
        self.observers.iter_mut().find(|o| o.id == id)
    }
}
