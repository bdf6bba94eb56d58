//! Construction hand-off
//!
//! [`PendingConstruction`] is the single slot through which the upgrade
//! engine passes an existing element into a class constructor, or through
//! which direct construction names the tag to fabricate. Constructors reach
//! it through [`ConstructionContext::html_element`], the generic element
//! constructor.

use fos_dom::{Document, NodeId};

use crate::error::{CustomElementError, Result};

/// Element or tag awaiting the generic constructor
#[derive(Debug, Default)]
pub struct PendingConstruction {
    element: Option<NodeId>,
    tag: Option<String>,
}

impl PendingConstruction {
    pub fn new() -> Self {
        Self::default()
    }

    /// True outside of a construction sequence
    pub fn is_empty(&self) -> bool {
        self.element.is_none() && self.tag.is_none()
    }

    /// Element waiting to be handed to a constructor
    pub fn element(&self) -> Option<NodeId> {
        self.element
    }

    /// Tag waiting to be fabricated
    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    /// Record a tag for the next generic construction. First write wins.
    pub fn set_current_tag(&mut self, tag: &str) {
        if self.element.is_some() || self.tag.is_some() {
            tracing::trace!(tag, "construction already pending; tag ignored");
            return;
        }
        self.tag = Some(tag.to_string());
    }

    /// Publish `node` for the constructor about to run.
    ///
    /// # Panics
    /// If another element is already waiting: two interleaved upgrade
    /// sequences are a logic error.
    pub(crate) fn publish(&mut self, node: NodeId) {
        assert!(
            self.element.is_none(),
            "element {:?} published while {:?} still awaits construction",
            node,
            self.element
        );
        if let Some(stale) = self.tag.take() {
            tracing::warn!(tag = %stale, "discarding pending tag superseded by upgrade");
        }
        self.element = Some(node);
    }

    /// Check the slot was consumed by the sequence that populated it.
    ///
    /// # Panics
    /// If anything is still pending.
    pub(crate) fn assert_empty(&self) {
        assert!(
            self.is_empty(),
            "construction slot not consumed: element {:?}, tag {:?}",
            self.element,
            self.tag
        );
    }

    /// Drop whatever is pending after a constructor failed
    pub(crate) fn clear(&mut self) {
        self.element = None;
        self.tag = None;
    }
}

/// What a class constructor sees while it runs
pub struct ConstructionContext<'a> {
    document: &'a mut Document,
    pending: &'a mut PendingConstruction,
}

impl<'a> ConstructionContext<'a> {
    pub(crate) fn new(document: &'a mut Document, pending: &'a mut PendingConstruction) -> Self {
        Self { document, pending }
    }

    /// The generic element constructor.
    ///
    /// Returns the element awaiting upgrade if there is one, otherwise
    /// fabricates a plain element for the pending tag. The fabricated
    /// element bypasses definition lookup; the caller that set the tag
    /// finishes its upgrade.
    pub fn html_element(&mut self) -> Result<NodeId> {
        if let Some(node) = self.pending.element.take() {
            self.pending.tag = None;
            tracing::trace!(?node, "handing off element under construction");
            return Ok(node);
        }
        if let Some(tag) = self.pending.tag.take() {
            let node = self.document.tree_mut().create_element(&tag);
            tracing::trace!(?node, tag = %tag, "fabricated element for pending tag");
            return Ok(node);
        }
        Err(CustomElementError::UnknownConstructorInvocation)
    }

    /// Document the element lives in
    pub fn document(&mut self) -> &mut Document {
        &mut *self.document
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handoff_returns_published_element() {
        let mut doc = Document::default();
        let existing = doc.tree_mut().create_element("my-widget");
        let before = doc.tree().len();
        let mut pending = PendingConstruction::new();

        pending.publish(existing);
        let mut ctx = ConstructionContext::new(&mut doc, &mut pending);
        assert_eq!(ctx.html_element(), Ok(existing));
        // Nothing left for a second call
        assert_eq!(ctx.html_element(), Err(CustomElementError::UnknownConstructorInvocation));

        assert!(pending.is_empty());
        assert_eq!(doc.tree().len(), before);
    }

    #[test]
    fn test_pending_tag_fabricates() {
        let mut doc = Document::default();
        let mut pending = PendingConstruction::new();
        pending.set_current_tag("my-widget");
        pending.set_current_tag("other-tag");
        assert_eq!(pending.tag(), Some("my-widget"));

        let node = ConstructionContext::new(&mut doc, &mut pending).html_element().unwrap();
        assert_eq!(doc.tree().local_name(node), Some("my-widget"));
        assert!(!doc.tree().is_connected(node));
        pending.assert_empty();
    }

    #[test]
    fn test_nothing_pending_is_an_error() {
        let mut doc = Document::default();
        let mut pending = PendingConstruction::new();
        let result = ConstructionContext::new(&mut doc, &mut pending).html_element();
        assert_eq!(result, Err(CustomElementError::UnknownConstructorInvocation));
    }

    #[test]
    fn test_publish_supersedes_tag() {
        let mut pending = PendingConstruction::new();
        pending.set_current_tag("x-a");
        pending.publish(NodeId::ROOT);
        assert_eq!(pending.tag(), None);
        assert_eq!(pending.element(), Some(NodeId::ROOT));
    }

    #[test]
    #[should_panic(expected = "still awaits construction")]
    fn test_double_publish_panics() {
        let mut pending = PendingConstruction::new();
        pending.publish(NodeId::ROOT);
        pending.publish(NodeId::ROOT);
    }

    #[test]
    #[should_panic(expected = "construction slot not consumed")]
    fn test_unconsumed_slot_panics() {
        let mut pending = PendingConstruction::new();
        pending.publish(NodeId::ROOT);
        pending.assert_empty();
    }
}
