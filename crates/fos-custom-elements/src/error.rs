//! Custom element errors

use crate::class::LifecycleCallback;

/// Errors surfaced by `define` and by the generic element constructor
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CustomElementError {
    #[error("Custom element constructor for '{0}' is not constructible")]
    InvalidArgument(String),

    #[error("Invalid custom element name: {0}")]
    NameInvalid(String),

    #[error("'{0}' is a reserved element name")]
    NameReserved(String),

    #[error("Element already defined: {0}")]
    NameAlreadyRegistered(String),

    #[error("Constructor already used to define '{0}'")]
    ConstructorAlreadyUsed(String),

    #[error("Cannot extend element: {0}")]
    InvalidExtends(String),

    #[error("{0} is not a function")]
    InvalidCallback(LifecycleCallback),

    #[error("Illegal constructor: no element is pending construction")]
    UnknownConstructorInvocation,
}

pub type Result<T> = std::result::Result<T, CustomElementError>;
