//! Service descriptors for introspection and diagnostics.

use crate::key::Key;
use crate::lifetime::Lifetime;

/// Service descriptor for introspection and diagnostics
///
/// Returned by `lookup` and `get_service_descriptors`. Descriptors are plain
/// snapshots; they never hold instances.
///
/// # Examples
///
/// ```rust
/// use ferrous_container::{ServiceCollection, Lifetime, key_of_type};
///
/// struct Database { url: String }
///
/// let mut services = ServiceCollection::new();
/// services.add_singleton(Database { url: "postgres://localhost".to_string() });
/// services.add_named_singleton("config_value", 42u32);
///
/// let db = services.lookup(&key_of_type::<Database>()).unwrap();
/// assert_eq!(db.lifetime, Lifetime::Singleton);
/// assert!(!db.is_named());
///
/// let descriptors = services.get_service_descriptors();
/// let config = descriptors.iter().find(|d| d.is_named()).unwrap();
/// assert_eq!(config.type_name(), "u32");
/// assert_eq!(config.service_name(), Some("config_value"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceDescriptor {
    /// The capability key
    pub key: Key,
    /// Service lifetime
    pub lifetime: Lifetime,
    /// Implementation type name (if known)
    pub impl_type_name: Option<&'static str>,
    /// Whether this is an open generic registration
    pub open_generic: bool,
}

impl ServiceDescriptor {
    /// Get the service name for named services, or None for unnamed services
    pub fn service_name(&self) -> Option<&'static str> {
        self.key.service_name()
    }

    /// Get the type/trait name
    pub fn type_name(&self) -> &'static str {
        self.key.display_name()
    }

    /// Check if this is a named service
    pub fn is_named(&self) -> bool {
        self.service_name().is_some()
    }
}
