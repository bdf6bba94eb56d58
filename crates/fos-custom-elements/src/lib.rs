//! fOS Custom Elements
//!
//! Custom element registry and lifecycle engine over a `fos-dom` document.
//!
//! Definitions map a hyphenated tag name to an [`ElementClass`]. Elements
//! matching a definition are upgraded when they are created, when they are
//! inserted into an observed tree, or when the definition arrives after
//! them. Insertions and removals are picked up from batched mutation
//! records, so lifecycle callbacks run when the owner drains the batch
//! with [`CustomElements::flush`] or [`CustomElements::process_mutations`].
//!
//! ```ignore
//! let mut registry = CustomElements::new(Document::default());
//! let class = ElementClass::new("MyWidget")
//!     .on_connected(|doc, node| { /* ... */ })
//!     .build();
//! registry.define("my-widget", class, DefineOptions::default())?;
//!
//! let widget = registry.create_element("my-widget")?;
//! let body = registry.document().body();
//! registry.document_mut().tree_mut().append_child(body, widget);
//! registry.flush(); // connectedCallback runs here
//! ```

mod attributes;
mod class;
mod config;
mod construction;
mod creation;
mod definition;
mod error;
mod mutations;
mod registry;
mod state;
mod upgrade;

pub use class::{
    AttributeChange, AttributeChangedFn, ConstructorFn, ElementClass, LifecycleCallback,
    LifecycleFn, Member,
};
pub use config::Config;
pub use construction::{ConstructionContext, PendingConstruction};
pub use definition::{is_valid_name, DefineOptions, Definition, DefinitionTable, RESERVED_NAMES};
pub use error::{CustomElementError, Result};
pub use registry::{CustomElements, WhenDefinedFn};
pub use state::{ElementState, Lifecycle, StateTable};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
