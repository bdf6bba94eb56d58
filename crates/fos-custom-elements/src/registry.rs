//! Custom element registry
//!
//! [`CustomElements`] owns the document it serves, the definition table,
//! the per-element state side-table and the construction hand-off slot.
//! The upgrade engine, batch processors and creation entry points are
//! implemented on it in their own modules.

use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use fos_dom::{Document, NodeId, ObserverId};

use crate::class::ElementClass;
use crate::config::Config;
use crate::construction::{ConstructionContext, PendingConstruction};
use crate::definition::{is_valid_name, DefineOptions, Definition, DefinitionTable};
use crate::error::{CustomElementError, Result};
use crate::state::{ElementState, Lifecycle, StateTable};

/// Callback waiting for a name to be defined
pub type WhenDefinedFn = Box<dyn FnOnce(&mut CustomElements)>;

/// Custom elements registry bound to one document
pub struct CustomElements {
    pub(crate) document: Document,
    pub(crate) definitions: DefinitionTable,
    pub(crate) states: StateTable,
    pub(crate) pending: PendingConstruction,
    pub(crate) config: Config,
    /// Child-list observer over every observed root
    pub(crate) tree_observer: ObserverId,
    /// Attribute observer armed per upgraded element
    pub(crate) attribute_observer: ObserverId,
    pub(crate) observed_roots: HashSet<NodeId>,
    when_defined: HashMap<String, Vec<WhenDefinedFn>>,
}

impl CustomElements {
    pub fn new(document: Document) -> Self {
        Self::with_config(document, Config::default())
    }

    pub fn with_config(mut document: Document, config: Config) -> Self {
        let observers = document.tree_mut().observers_mut();
        let tree_observer = observers.create();
        let attribute_observer = observers.create();

        let mut registry = Self {
            document,
            definitions: DefinitionTable::new(),
            states: StateTable::new(),
            pending: PendingConstruction::new(),
            config,
            tree_observer,
            attribute_observer,
            observed_roots: HashSet::new(),
            when_defined: HashMap::new(),
        };
        if registry.config.observe_document {
            let root = registry.document.tree().root();
            registry.observe_root(root);
        }
        registry
    }

    /// Define a custom element.
    ///
    /// On success, matching elements already in the document are upgraded
    /// and connected before this returns. If one of their constructors
    /// fails, the definition stays registered, the remaining elements are
    /// still processed and the first constructor error is returned.
    pub fn define(
        &mut self,
        name: &str,
        class: Rc<ElementClass>,
        options: DefineOptions,
    ) -> Result<()> {
        let definition = self.definitions.validate(name, &class, &options)?;
        let definition = self.definitions.insert(definition);
        tracing::debug!(
            name = %definition.name,
            local_name = %definition.local_name,
            class = class.name(),
            "defined custom element"
        );

        let root = self.document.tree().root();
        let upgraded = self.add_nodes(&[root]);

        self.resolve_when_defined(&definition.name);
        upgraded
    }

    /// Class registered under `name`
    pub fn get(&self, name: &str) -> Option<Rc<ElementClass>> {
        self.definitions.lookup(name).map(|def| Rc::clone(&def.class))
    }

    /// Check if element is defined
    pub fn is_defined(&self, name: &str) -> bool {
        self.definitions.lookup(name).is_some()
    }

    /// Definition registered under `name`
    pub fn definition(&self, name: &str) -> Option<&Rc<Definition>> {
        self.definitions.lookup(name)
    }

    /// Run `callback` once `name` is defined; immediately if it already is
    pub fn when_defined(
        &mut self,
        name: &str,
        callback: impl FnOnce(&mut CustomElements) + 'static,
    ) -> Result<()> {
        if !is_valid_name(name) {
            return Err(CustomElementError::NameInvalid(name.to_string()));
        }
        if self.is_defined(name) {
            callback(self);
            return Ok(());
        }
        self.when_defined
            .entry(name.to_string())
            .or_default()
            .push(Box::new(callback));
        Ok(())
    }

    fn resolve_when_defined(&mut self, name: &str) {
        if let Some(callbacks) = self.when_defined.remove(name) {
            tracing::trace!(name, count = callbacks.len(), "resolving whenDefined callbacks");
            for callback in callbacks {
                callback(self);
            }
        }
    }

    /// Upgrade every matching element under `root` without connecting it.
    ///
    /// Returns the first constructor error after visiting the whole subtree.
    pub fn upgrade(&mut self, root: NodeId) -> Result<()> {
        let subtree: Vec<NodeId> = self.document.tree().inclusive_descendants(root).collect();
        let mut first_error = None;
        for node in subtree {
            if self.states.is_upgraded(node) {
                continue;
            }
            let Some(definition) = self.definition_for(node) else {
                continue;
            };
            if let Err(err) = self.upgrade_element(node, &definition, true) {
                tracing::error!(
                    ?node,
                    name = %definition.name,
                    %err,
                    "custom element upgrade failed"
                );
                first_error.get_or_insert(err);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    /// Construct an element directly from its class, as `new Class()` would.
    ///
    /// The returned element is upgraded and detached; inserting it connects it.
    pub fn construct(&mut self, class: &Rc<ElementClass>) -> Result<NodeId> {
        let constructor = class.constructor()
            .cloned()
            .ok_or_else(|| CustomElementError::InvalidArgument(class.name().to_string()))?;
        let definition = self.definitions.find_by_constructor(class).cloned();

        if let Some(def) = &definition {
            self.pending.set_current_tag(&def.local_name);
        }
        let mut ctx = ConstructionContext::new(&mut self.document, &mut self.pending);
        let node = match constructor(&mut ctx) {
            Ok(node) => node,
            Err(err) => {
                self.pending.clear();
                return Err(err);
            }
        };
        self.pending.assert_empty();

        let Some(definition) = definition else {
            return Ok(node);
        };
        if definition.is_customized_builtin() {
            self.document.tree_mut().set_attribute(node, "is", &definition.name);
        }
        if !self.states.is_upgraded(node) {
            self.states.mark_upgraded(node);
        }
        self.upgrade_element(node, &definition, false)?;
        tracing::debug!(?node, name = %definition.name, "constructed custom element");
        Ok(node)
    }

    /// Record the tag the next generic construction should fabricate
    pub fn set_current_tag(&mut self, tag: &str) {
        self.pending.set_current_tag(tag);
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    /// Give the document back, dropping the registry
    pub fn into_document(self) -> Document {
        self.document
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn definitions(&self) -> &DefinitionTable {
        &self.definitions
    }

    pub fn pending_construction(&self) -> &PendingConstruction {
        &self.pending
    }

    pub fn element_state(&self, node: NodeId) -> Option<&ElementState> {
        self.states.get(node)
    }

    pub fn lifecycle(&self, node: NodeId) -> Lifecycle {
        self.states.lifecycle(node)
    }

    pub fn is_upgraded(&self, node: NodeId) -> bool {
        self.states.is_upgraded(node)
    }

    pub fn is_attached(&self, node: NodeId) -> bool {
        self.states.is_attached(node)
    }
}

impl std::fmt::Debug for CustomElements {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CustomElements")
            .field("definitions", &self.definitions.len())
            .field("elements", &self.states.len())
            .field("observed_roots", &self.observed_roots)
            .field("pending", &self.pending)
            .field("config", &self.config)
            .finish()
    }
}
