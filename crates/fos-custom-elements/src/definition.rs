//! Definition table
//!
//! Validated name → definition mappings. Definitions are immutable once
//! stored and are never removed.

use std::collections::HashMap;
use std::rc::Rc;

use crate::class::{AttributeChangedFn, ElementClass, LifecycleCallback, LifecycleFn, Member};
use crate::error::{CustomElementError, Result};

/// Names that satisfy the grammar but belong to SVG/MathML
pub const RESERVED_NAMES: &[&str] = &[
    "annotation-xml",
    "color-profile",
    "font-face",
    "font-face-src",
    "font-face-uri",
    "font-face-format",
    "font-face-name",
    "missing-glyph",
];

/// Options accepted by `define`
#[derive(Debug, Clone, Default)]
pub struct DefineOptions {
    /// Built-in tag this definition customizes
    pub extends: Option<String>,
}

impl DefineOptions {
    pub fn extends(tag: &str) -> Self {
        Self {
            extends: Some(tag.to_string()),
        }
    }
}

/// Custom element definition
pub struct Definition {
    /// Registered name
    pub name: String,
    /// Tag the definition applies to; differs from `name` for customized built-ins
    pub local_name: String,
    pub class: Rc<ElementClass>,
    pub connected_callback: Option<LifecycleFn>,
    pub disconnected_callback: Option<LifecycleFn>,
    pub attribute_changed_callback: Option<AttributeChangedFn>,
    pub observed_attributes: Vec<String>,
}

impl Definition {
    /// Whether this definition customizes a built-in tag
    pub fn is_customized_builtin(&self) -> bool {
        self.name != self.local_name
    }

    /// Attribute names to watch, if attribute observation applies at all
    pub fn attribute_filter(&self) -> Option<&[String]> {
        (self.attribute_changed_callback.is_some() && !self.observed_attributes.is_empty())
            .then_some(self.observed_attributes.as_slice())
    }
}

impl std::fmt::Debug for Definition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Definition")
            .field("name", &self.name)
            .field("local_name", &self.local_name)
            .field("class", &self.class.name())
            .field("connected", &self.connected_callback.is_some())
            .field("disconnected", &self.disconnected_callback.is_some())
            .field("attribute_changed", &self.attribute_changed_callback.is_some())
            .field("observed_attributes", &self.observed_attributes)
            .finish()
    }
}

/// Registered definitions keyed by lowercase name
#[derive(Debug, Default)]
pub struct DefinitionTable {
    definitions: HashMap<String, Rc<Definition>>,
}

impl DefinitionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run every definition check in order and build the definition.
    ///
    /// Order: constructor, name grammar, reserved names, duplicate name,
    /// duplicate constructor, `extends`, callbacks. The first failure wins.
    pub fn validate(
        &self,
        name: &str,
        class: &Rc<ElementClass>,
        options: &DefineOptions,
    ) -> Result<Definition> {
        if !class.is_constructible() {
            return Err(CustomElementError::InvalidArgument(class.name().to_string()));
        }

        let name = name.to_ascii_lowercase();
        if !is_valid_name(&name) {
            return Err(CustomElementError::NameInvalid(name));
        }
        if RESERVED_NAMES.contains(&name.as_str()) {
            return Err(CustomElementError::NameReserved(name));
        }
        if self.definitions.contains_key(&name) {
            return Err(CustomElementError::NameAlreadyRegistered(name));
        }
        if let Some(existing) = self.find_by_constructor(class) {
            return Err(CustomElementError::ConstructorAlreadyUsed(existing.name.clone()));
        }

        let local_name = match &options.extends {
            Some(tag) => {
                let tag = tag.to_ascii_lowercase();
                if is_valid_name(&tag) || tag.is_empty() {
                    return Err(CustomElementError::InvalidExtends(tag));
                }
                tag
            }
            None => name.clone(),
        };

        let connected_callback =
            read_callback(class.connected_member(), LifecycleCallback::Connected)?;
        let disconnected_callback =
            read_callback(class.disconnected_member(), LifecycleCallback::Disconnected)?;
        let attribute_changed_callback =
            read_callback(class.attribute_changed_member(), LifecycleCallback::AttributeChanged)?;

        Ok(Definition {
            name,
            local_name,
            class: Rc::clone(class),
            connected_callback,
            disconnected_callback,
            attribute_changed_callback,
            observed_attributes: class.observed_attribute_names().to_vec(),
        })
    }

    /// Store a validated definition
    pub fn insert(&mut self, definition: Definition) -> Rc<Definition> {
        let definition = Rc::new(definition);
        self.definitions.insert(definition.name.clone(), Rc::clone(&definition));
        definition
    }

    /// Definition registered under `name`
    pub fn lookup(&self, name: &str) -> Option<&Rc<Definition>> {
        self.definitions.get(name)
    }

    /// Definition that applies to an element with this local name and `is` value
    pub fn lookup_element(&self, local_name: &str, is: Option<&str>) -> Option<&Rc<Definition>> {
        let customized = is
            .and_then(|is| self.definitions.get(is))
            .filter(|def| def.is_customized_builtin() && def.local_name == local_name);
        customized.or_else(|| {
            self.definitions.get(local_name)
                .filter(|def| !def.is_customized_builtin())
        })
    }

    /// Whether any definition was made with `class`
    pub fn has_constructor(&self, class: &Rc<ElementClass>) -> bool {
        self.find_by_constructor(class).is_some()
    }

    /// Definition made with `class`
    pub fn find_by_constructor(&self, class: &Rc<ElementClass>) -> Option<&Rc<Definition>> {
        self.definitions.values().find(|def| Rc::ptr_eq(&def.class, class))
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

fn read_callback<F: Clone>(
    member: Option<&Member<F>>,
    callback: LifecycleCallback,
) -> Result<Option<F>> {
    match member {
        None => Ok(None),
        Some(Member::Function(f)) => Ok(Some(f.clone())),
        Some(Member::Value(_)) => Err(CustomElementError::InvalidCallback(callback)),
    }
}

/// Check the custom element name grammar `[a-z][.0-9_a-z]*-[-.0-9_a-z]*`.
///
/// Reserved names are not rejected here.
pub fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    if !chars.next().is_some_and(|c| c.is_ascii_lowercase()) {
        return false;
    }
    name.contains('-')
        && chars.all(|c| {
            c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '-' | '.' | '_')
        })
}
