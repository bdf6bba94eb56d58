//! fOS DOM - Document Object Model
//!
//! Arena-backed DOM tree with batched mutation observation.

mod node;
mod tree;
mod document;
mod observer;

pub use node::{Attribute, ElementData, Node, NodeData};
pub use tree::{Children, DomTree, InclusiveDescendants};
pub use document::Document;
pub use observer::{
    MutationObserverInit, MutationObservers, MutationRecord, MutationType, ObserverId,
};

/// HTML namespace URI
pub const HTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";

/// Node identifier (index into arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Root node ID
    pub const ROOT: NodeId = NodeId(0);
    /// Sentinel for "no node"
    pub const NONE: NodeId = NodeId(u32::MAX);

    /// Check if this ID refers to a node
    #[inline]
    pub fn is_valid(self) -> bool {
        self != Self::NONE
    }

    #[inline]
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub(crate) fn to_option(self) -> Option<NodeId> {
        self.is_valid().then_some(self)
    }
}
