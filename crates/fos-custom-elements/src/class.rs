//! Element classes
//!
//! An [`ElementClass`] is the constructor value handed to `define`: an
//! optional constructor function, a static list of observed attributes and
//! an instance surface holding the lifecycle callbacks. Members of that
//! surface may be functions or plain values; only functions are accepted at
//! definition time.

use std::fmt;
use std::rc::Rc;

use fos_dom::{Document, NodeId};

use crate::construction::ConstructionContext;
use crate::error::Result;

/// Constructor body. Must obtain its element from [`ConstructionContext::html_element`].
pub type ConstructorFn = Rc<dyn Fn(&mut ConstructionContext<'_>) -> Result<NodeId>>;

/// `connectedCallback` / `disconnectedCallback`
pub type LifecycleFn = Rc<dyn Fn(&mut Document, NodeId)>;

/// `attributeChangedCallback`
pub type AttributeChangedFn = Rc<dyn Fn(&mut Document, NodeId, &AttributeChange)>;

/// Custom element lifecycle callbacks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleCallback {
    Connected,
    Disconnected,
    AttributeChanged,
}

impl LifecycleCallback {
    /// Member name on the instance surface
    pub fn method_name(self) -> &'static str {
        match self {
            Self::Connected => "connectedCallback",
            Self::Disconnected => "disconnectedCallback",
            Self::AttributeChanged => "attributeChangedCallback",
        }
    }
}

impl fmt::Display for LifecycleCallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.method_name())
    }
}

/// Arguments of `attributeChangedCallback`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeChange {
    pub name: String,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
    pub namespace: Option<String>,
}

/// A member of the instance surface
#[derive(Clone)]
pub enum Member<F> {
    /// Callable member
    Function(F),
    /// Anything else, described for diagnostics
    Value(String),
}

impl<F> fmt::Debug for Member<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Function(_) => f.write_str("Function"),
            Self::Value(v) => f.debug_tuple("Value").field(v).finish(),
        }
    }
}

/// Constructor value for a custom element
pub struct ElementClass {
    name: String,
    constructor: Option<ConstructorFn>,
    observed_attributes: Vec<String>,
    connected: Option<Member<LifecycleFn>>,
    disconnected: Option<Member<LifecycleFn>>,
    attribute_changed: Option<Member<AttributeChangedFn>>,
}

impl ElementClass {
    /// A class whose constructor only performs the base element construction
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            constructor: Some(Rc::new(base_constructor)),
            observed_attributes: Vec::new(),
            connected: None,
            disconnected: None,
            attribute_changed: None,
        }
    }

    /// A value that cannot be invoked with `new`
    pub fn non_constructible(name: &str) -> Self {
        Self {
            constructor: None,
            ..Self::new(name)
        }
    }

    pub fn with_constructor(
        mut self,
        f: impl Fn(&mut ConstructionContext<'_>) -> Result<NodeId> + 'static,
    ) -> Self {
        self.constructor = Some(Rc::new(f));
        self
    }

    pub fn observed_attributes<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.observed_attributes = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn on_connected(mut self, f: impl Fn(&mut Document, NodeId) + 'static) -> Self {
        self.connected = Some(Member::Function(Rc::new(f)));
        self
    }

    pub fn on_disconnected(mut self, f: impl Fn(&mut Document, NodeId) + 'static) -> Self {
        self.disconnected = Some(Member::Function(Rc::new(f)));
        self
    }

    pub fn on_attribute_changed(
        mut self,
        f: impl Fn(&mut Document, NodeId, &AttributeChange) + 'static,
    ) -> Self {
        self.attribute_changed = Some(Member::Function(Rc::new(f)));
        self
    }

    /// Put a non-callable value where a lifecycle callback is looked up
    pub fn with_value(mut self, callback: LifecycleCallback, value: &str) -> Self {
        let value = value.to_string();
        match callback {
            LifecycleCallback::Connected => self.connected = Some(Member::Value(value)),
            LifecycleCallback::Disconnected => self.disconnected = Some(Member::Value(value)),
            LifecycleCallback::AttributeChanged => {
                self.attribute_changed = Some(Member::Value(value))
            }
        }
        self
    }

    pub fn build(self) -> Rc<Self> {
        Rc::new(self)
    }

    /// Class name, for diagnostics
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_constructible(&self) -> bool {
        self.constructor.is_some()
    }

    pub fn observed_attribute_names(&self) -> &[String] {
        &self.observed_attributes
    }

    pub(crate) fn constructor(&self) -> Option<&ConstructorFn> {
        self.constructor.as_ref()
    }

    pub(crate) fn connected_member(&self) -> Option<&Member<LifecycleFn>> {
        self.connected.as_ref()
    }

    pub(crate) fn disconnected_member(&self) -> Option<&Member<LifecycleFn>> {
        self.disconnected.as_ref()
    }

    pub(crate) fn attribute_changed_member(&self) -> Option<&Member<AttributeChangedFn>> {
        self.attribute_changed.as_ref()
    }
}

fn base_constructor(ctx: &mut ConstructionContext<'_>) -> Result<NodeId> {
    ctx.html_element()
}

impl fmt::Debug for ElementClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElementClass")
            .field("name", &self.name)
            .field("constructible", &self.is_constructible())
            .field("observed_attributes", &self.observed_attributes)
            .field("connected", &self.connected)
            .field("disconnected", &self.disconnected)
            .field("attribute_changed", &self.attribute_changed)
            .finish()
    }
}
