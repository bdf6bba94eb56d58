//! DOM Tree (arena-based allocation)
//!
//! Every structural or attribute mutation queues a [`MutationRecord`] for
//! the observers interested in it.

use crate::{ElementData, HTML_NAMESPACE, MutationObservers, MutationRecord, Node, NodeId};

/// Arena-based DOM tree for memory efficiency
#[derive(Debug)]
pub struct DomTree {
    nodes: Vec<Node>,
    observers: MutationObservers,
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

impl DomTree {
    /// Create a tree holding only the document node
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::document()],
            observers: MutationObservers::new(),
        }
    }

    /// Document node
    #[inline]
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Get a node by ID
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    /// Get a mutable node by ID
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.index())
    }

    /// Number of nodes in the tree
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if tree is empty
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Mutation observers attached to this tree
    pub fn observers(&self) -> &MutationObservers {
        &self.observers
    }

    /// Mutation observers attached to this tree
    pub fn observers_mut(&mut self) -> &mut MutationObservers {
        &mut self.observers
    }

    fn push(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    // ------------------------------------------------------------------
    // Creation primitives
    // ------------------------------------------------------------------

    /// Create a detached HTML element. The tag name is lowercased.
    pub fn create_element(&mut self, tag_name: &str) -> NodeId {
        let local = tag_name.to_ascii_lowercase();
        self.push(Node::element(ElementData::new(&local, Some(HTML_NAMESPACE))))
    }

    /// Create a detached element in `namespace`. A `prefix:` is stripped from the local name.
    pub fn create_element_ns(&mut self, namespace: Option<&str>, qualified_name: &str) -> NodeId {
        let local = qualified_name
            .split_once(':')
            .map_or(qualified_name, |(_, local)| local);
        let namespace = namespace.filter(|ns| !ns.is_empty());
        self.push(Node::element(ElementData::new(local, namespace)))
    }

    /// Create a detached text node
    pub fn create_text(&mut self, content: &str) -> NodeId {
        self.push(Node::text(content.to_string()))
    }

    /// Create a detached comment node
    pub fn create_comment(&mut self, content: &str) -> NodeId {
        self.push(Node::comment(content.to_string()))
    }

    // ------------------------------------------------------------------
    // Navigation
    // ------------------------------------------------------------------

    /// Parent of a node
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent.to_option())
    }

    /// Iterate direct children
    pub fn children(&self, id: NodeId) -> Children<'_> {
        let next = self.get(id).map_or(NodeId::NONE, |n| n.first_child);
        Children { tree: self, next }
    }

    /// Pre-order walk of `id` and all of its descendants
    pub fn inclusive_descendants(&self, id: NodeId) -> InclusiveDescendants<'_> {
        let next = if self.get(id).is_some() { id } else { NodeId::NONE };
        InclusiveDescendants { tree: self, root: id, next }
    }

    /// Inclusive ancestor chain, nearest first
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut path = Vec::new();
        let mut current = id;
        while let Some(node) = self.get(current) {
            path.push(current);
            current = node.parent;
        }
        path
    }

    /// Check if `ancestor` is `node` or one of its ancestors
    pub fn is_inclusive_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = node;
        while let Some(n) = self.get(current) {
            if current == ancestor {
                return true;
            }
            current = n.parent;
        }
        false
    }

    /// Check if a node is reachable from the document node
    pub fn is_connected(&self, id: NodeId) -> bool {
        self.is_inclusive_ancestor(NodeId::ROOT, id)
    }

    /// Local name of an element
    pub fn local_name(&self, id: NodeId) -> Option<&str> {
        self.get(id)?.as_element().map(ElementData::local_name)
    }

    // ------------------------------------------------------------------
    // Structural mutation
    // ------------------------------------------------------------------

    /// Append `child` as the last child of `parent`
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        self.insert_before(parent, child, NodeId::NONE)
    }

    /// Insert `child` before `reference` (append when `reference` is NONE).
    ///
    /// A child that already has a parent is removed from it first, which
    /// queues its own removal record.
    pub fn insert_before(&mut self, parent: NodeId, child: NodeId, reference: NodeId) -> bool {
        if self.get(parent).is_none() || self.get(child).is_none() || child == NodeId::ROOT {
            tracing::warn!(?parent, ?child, "insert with unknown node");
            return false;
        }
        if self.is_inclusive_ancestor(child, parent) {
            tracing::warn!(?parent, ?child, "insert would create a cycle");
            return false;
        }
        if reference.is_valid() && self.parent(reference) != Some(parent) {
            tracing::warn!(?parent, ?reference, "reference node is not a child of parent");
            return false;
        }
        if reference == child {
            return true;
        }

        self.detach(child);

        let prev = if reference.is_valid() {
            self.nodes[reference.index()].prev_sibling
        } else {
            self.nodes[parent.index()].last_child
        };

        {
            let node = &mut self.nodes[child.index()];
            node.parent = parent;
            node.prev_sibling = prev;
            node.next_sibling = reference;
        }
        if prev.is_valid() {
            self.nodes[prev.index()].next_sibling = child;
        } else {
            self.nodes[parent.index()].first_child = child;
        }
        if reference.is_valid() {
            self.nodes[reference.index()].prev_sibling = child;
        } else {
            self.nodes[parent.index()].last_child = child;
        }

        let path = self.ancestors(parent);
        self.observers.queue_child_list(
            &path,
            MutationRecord::child_list(
                parent,
                vec![child],
                Vec::new(),
                prev.to_option(),
                reference.to_option(),
            ),
        );
        true
    }

    /// Remove `child` from `parent`
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        if self.parent(child) != Some(parent) {
            return false;
        }
        self.detach(child)
    }

    /// Remove a node from its parent, if it has one
    pub fn detach(&mut self, child: NodeId) -> bool {
        let Some(parent) = self.parent(child) else {
            return false;
        };
        let (prev, next) = {
            let node = &mut self.nodes[child.index()];
            let links = (node.prev_sibling, node.next_sibling);
            node.parent = NodeId::NONE;
            node.prev_sibling = NodeId::NONE;
            node.next_sibling = NodeId::NONE;
            links
        };
        if prev.is_valid() {
            self.nodes[prev.index()].next_sibling = next;
        } else {
            self.nodes[parent.index()].first_child = next;
        }
        if next.is_valid() {
            self.nodes[next.index()].prev_sibling = prev;
        } else {
            self.nodes[parent.index()].last_child = prev;
        }

        let path = self.ancestors(parent);
        self.observers.queue_child_list(
            &path,
            MutationRecord::child_list(
                parent,
                Vec::new(),
                vec![child],
                prev.to_option(),
                next.to_option(),
            ),
        );
        true
    }

    // ------------------------------------------------------------------
    // Attributes
    // ------------------------------------------------------------------

    /// Read an attribute by name
    pub fn get_attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.get(id)?.as_element()?.get_attr(name)
    }

    /// Read an attribute by namespace and local name
    pub fn get_attribute_ns(
        &self,
        id: NodeId,
        namespace: Option<&str>,
        name: &str,
    ) -> Option<&str> {
        self.get(id)?.as_element()?.get_attr_ns(namespace, name)
    }

    /// Set an attribute
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) -> bool {
        self.set_attribute_ns(id, None, name, value)
    }

    /// Set a namespaced attribute
    pub fn set_attribute_ns(
        &mut self,
        id: NodeId,
        namespace: Option<&str>,
        name: &str,
        value: &str,
    ) -> bool {
        let Some(elem) = self.get_mut(id).and_then(Node::as_element_mut) else {
            return false;
        };
        let old = elem.set_attr(namespace, name, value);
        self.queue_attribute(id, name, namespace, old.as_deref());
        true
    }

    /// Remove an attribute, returning whether it existed
    pub fn remove_attribute(&mut self, id: NodeId, name: &str) -> bool {
        self.remove_attribute_ns(id, None, name)
    }

    /// Remove a namespaced attribute, returning whether it existed
    pub fn remove_attribute_ns(&mut self, id: NodeId, namespace: Option<&str>, name: &str) -> bool {
        let Some(elem) = self.get_mut(id).and_then(Node::as_element_mut) else {
            return false;
        };
        match elem.remove_attr(namespace, name) {
            Some(old) => {
                self.queue_attribute(id, name, namespace, Some(&old));
                true
            }
            None => false,
        }
    }

    fn queue_attribute(
        &mut self,
        id: NodeId,
        name: &str,
        namespace: Option<&str>,
        old: Option<&str>,
    ) {
        let path = self.ancestors(id);
        self.observers.queue_attribute(&path, MutationRecord::attribute(id, name, namespace), old);
    }
}

/// Iterator over direct children
pub struct Children<'a> {
    tree: &'a DomTree,
    next: NodeId,
}

impl<'a> Iterator for Children<'a> {
    type Item = (NodeId, &'a Node);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next;
        let node = self.tree.get(id)?;
        self.next = node.next_sibling;
        Some((id, node))
    }
}

/// Pre-order iterator over a subtree, root included
pub struct InclusiveDescendants<'a> {
    tree: &'a DomTree,
    root: NodeId,
    next: NodeId,
}

impl<'a> Iterator for InclusiveDescendants<'a> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next;
        let node = self.tree.get(current)?;

        self.next = if node.first_child.is_valid() {
            node.first_child
        } else {
            // Climb until a next sibling exists, without leaving the subtree
            let mut cursor = current;
            loop {
                if cursor == self.root {
                    break NodeId::NONE;
                }
                let Some(n) = self.tree.get(cursor) else {
                    break NodeId::NONE;
                };
                if n.next_sibling.is_valid() {
                    break n.next_sibling;
                }
                cursor = n.parent;
            }
        };
        Some(current)
    }
}
