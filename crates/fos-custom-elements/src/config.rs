//! Custom elements configuration

/// Registry configuration options
#[derive(Debug, Clone)]
pub struct Config {
    /// Watch the document root for child-list changes as soon as the
    /// registry is created. When off, call `observe_root` explicitly.
    pub observe_document: bool,

    /// Route `create_element` through definition lookup so registered
    /// tags come back already upgraded. When off, creation is a plain
    /// pass-through and upgrade happens on insertion.
    pub intercept_creation: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            observe_document: true,
            intercept_creation: true,
        }
    }
}
