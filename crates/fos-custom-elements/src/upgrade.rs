//! Upgrade engine
//!
//! Binds an element to its definition, runs the class constructor against
//! the existing element through the hand-off slot, and arms attribute
//! observation for the definition's observed attributes.

use std::rc::Rc;

use fos_dom::{MutationObserverInit, NodeId, HTML_NAMESPACE};

use crate::construction::ConstructionContext;
use crate::definition::Definition;
use crate::error::{CustomElementError, Result};
use crate::registry::CustomElements;

impl CustomElements {
    /// Definition that applies to `node`, honouring the `is` attribute.
    /// Only HTML elements can be custom elements.
    pub(crate) fn definition_for(&self, node: NodeId) -> Option<Rc<Definition>> {
        let element = self.document.tree().get(node)?.as_element()?;
        if element.namespace() != Some(HTML_NAMESPACE) {
            return None;
        }
        self.definitions
            .lookup_element(element.local_name(), element.get_attr("is"))
            .cloned()
    }

    /// Upgrade `node` to `definition`.
    ///
    /// With `should_construct`, the element is marked upgraded and the class
    /// constructor runs with the element waiting in the hand-off slot.
    /// Callers check the upgraded state first; this does not.
    ///
    /// # Panics
    /// If the constructor returns without consuming the hand-off slot.
    pub(crate) fn upgrade_element(
        &mut self,
        node: NodeId,
        definition: &Rc<Definition>,
        should_construct: bool,
    ) -> Result<()> {
        self.states.bind(node, Rc::clone(definition));

        if should_construct {
            self.pending.publish(node);
            self.states.mark_upgraded(node);

            let result = match definition.class.constructor() {
                Some(constructor) => {
                    let constructor = Rc::clone(constructor);
                    let mut ctx = ConstructionContext::new(&mut self.document, &mut self.pending);
                    constructor(&mut ctx)
                }
                None => Err(CustomElementError::InvalidArgument(
                    definition.class.name().to_string(),
                )),
            };
            match result {
                Ok(constructed) => {
                    self.pending.assert_empty();
                    if constructed != node {
                        tracing::warn!(
                            ?node,
                            ?constructed,
                            name = %definition.name,
                            "constructor returned a different element; keeping the upgraded one"
                        );
                    }
                }
                Err(err) => {
                    self.pending.clear();
                    return Err(err);
                }
            }
        }

        if let Some(filter) = definition.attribute_filter() {
            let options = MutationObserverInit::attributes_with_old_value(filter.to_vec());
            self.document.tree_mut()
                .observers_mut()
                .observe(self.attribute_observer, node, options);
        }

        tracing::trace!(?node, name = %definition.name, should_construct, "upgraded element");
        Ok(())
    }
}
