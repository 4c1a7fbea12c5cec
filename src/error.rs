//! Error types for the dependency injection container.

use thiserror::Error;

/// Dependency injection errors
///
/// Every variant describes a programmer or configuration mistake. None of
/// them is transient, so callers are expected to surface them rather than
/// retry.
///
/// # Examples
///
/// ```rust
/// use ferrous_container::{DiError, ServiceCollection, Resolver};
///
/// let provider = ServiceCollection::new().build();
/// match provider.get::<String>() {
///     Err(DiError::Unregistered(type_name)) => {
///         assert_eq!(type_name, "alloc::string::String");
///     }
///     _ => unreachable!(),
/// }
/// ```
///
/// ```rust
/// use ferrous_container::DiError;
///
/// let circular = DiError::CyclicDependency(vec!["ServiceA", "ServiceB", "ServiceA"]);
/// assert_eq!(circular.to_string(), "Cyclic dependency: ServiceA -> ServiceB -> ServiceA");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiError {
    /// Capability not registered
    #[error("Service not registered: {0}")]
    Unregistered(&'static str),
    /// Dependency cycle detected (includes path)
    #[error("Cyclic dependency: {}", .0.join(" -> "))]
    CyclicDependency(Vec<&'static str>),
    /// Registration rejected by the duplicate policy
    #[error("Duplicate registration: {0}")]
    DuplicateRegistration(&'static str),
    /// Resolve attempted before the container was initialized
    #[error("Container is not initialized")]
    NotInitialized,
    /// Type downcast failed
    #[error("Type mismatch for: {0}")]
    TypeMismatch(&'static str),
    /// Maximum recursion depth exceeded
    #[error("Max depth {0} exceeded")]
    DepthExceeded(usize),
    /// Owned resolution of an instance that is cached by its lifetime
    #[error("Instance of {0} is shared and cannot be taken by value")]
    SharedInstance(&'static str),
    /// A provider handle outlived its provider
    #[error("Service provider has been dropped")]
    ProviderDropped,
    /// Bad configuration source or failed options validation
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
    /// A fallible producer reported a failure of its own
    #[error("Producer for {service} failed: {message}")]
    Producer {
        service: &'static str,
        message: String,
    },
}

/// Result type for DI operations
pub type DiResult<T> = Result<T, DiError>;
