//! Per-element upgrade state
//!
//! Kept beside the tree rather than on the nodes. An element with no entry
//! has never been seen by the upgrade engine.

use std::collections::HashMap;
use std::rc::Rc;

use fos_dom::NodeId;

use crate::definition::Definition;

/// Upgrade state of one element. `attached` implies `upgraded`.
#[derive(Debug, Clone, Default)]
pub struct ElementState {
    pub upgraded: bool,
    pub attached: bool,
    /// Definition the element's behavior is bound to
    pub behavior: Option<Rc<Definition>>,
}

/// Lifecycle position of an element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Unseen,
    /// Upgraded and not currently connected through the engine
    Detached,
    Attached,
}

/// Side-table from element to upgrade state
#[derive(Debug, Default)]
pub struct StateTable {
    states: HashMap<NodeId, ElementState>,
}

impl StateTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, node: NodeId) -> Option<&ElementState> {
        self.states.get(&node)
    }

    pub fn lifecycle(&self, node: NodeId) -> Lifecycle {
        match self.states.get(&node) {
            Some(s) if s.attached => Lifecycle::Attached,
            Some(s) if s.upgraded => Lifecycle::Detached,
            _ => Lifecycle::Unseen,
        }
    }

    pub fn is_upgraded(&self, node: NodeId) -> bool {
        self.states.get(&node).is_some_and(|s| s.upgraded)
    }

    pub fn is_attached(&self, node: NodeId) -> bool {
        self.states.get(&node).is_some_and(|s| s.attached)
    }

    /// Definition bound to the element, if any
    pub fn behavior(&self, node: NodeId) -> Option<&Rc<Definition>> {
        self.states.get(&node)?.behavior.as_ref()
    }

    pub(crate) fn bind(&mut self, node: NodeId, definition: Rc<Definition>) {
        self.states.entry(node).or_default().behavior = Some(definition);
    }

    pub(crate) fn mark_upgraded(&mut self, node: NodeId) {
        let state = self.states.entry(node).or_default();
        debug_assert!(!state.upgraded, "element {node:?} upgraded twice");
        state.upgraded = true;
    }

    /// Flip to attached. Returns false if not upgraded or already attached.
    pub(crate) fn attach(&mut self, node: NodeId) -> bool {
        match self.states.get_mut(&node) {
            Some(state) if state.upgraded && !state.attached => {
                state.attached = true;
                true
            }
            _ => false,
        }
    }

    /// Flip to detached. Returns false unless currently attached.
    pub(crate) fn detach(&mut self, node: NodeId) -> bool {
        match self.states.get_mut(&node) {
            Some(state) if state.attached => {
                state.attached = false;
                true
            }
            _ => false,
        }
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}
