//! Resolver context for dependency injection.
//!
//! This module contains the ResolverContext type which provides
//! the interface for factory functions to resolve dependencies.

use crate::generic::ClosedRequest;
use crate::registration::AnyArc;
use crate::traits::ResolverCore;
use crate::{DiResult, Key, ProviderHandle};

/// Context passed to factory functions for resolving dependencies.
///
/// ResolverContext wraps the resolver that is running the producer and
/// gives factory functions access to other services. Resolutions made
/// through it share the caller's cycle detection.
///
/// # Examples
///
/// ```
/// use ferrous_container::{ServiceCollection, Resolver};
/// use std::sync::Arc;
///
/// struct Database { url: String }
/// struct UserService { db: Arc<Database> }
///
/// let mut services = ServiceCollection::new();
/// services.add_singleton(Database {
///     url: "postgres://localhost".to_string()
/// });
/// services.add_transient_factory::<UserService, _>(|resolver| {
///     UserService {
///         db: resolver.get_required::<Database>(),
///     }
/// });
/// ```
pub struct ResolverContext<'a> {
    resolver: &'a dyn ResolverCore,
}

impl<'a> ResolverContext<'a> {
    pub(crate) fn new<T>(resolver: &'a T) -> Self
    where
        T: ResolverCore,
    {
        Self { resolver }
    }
}

impl ResolverCore for ResolverContext<'_> {
    fn resolve_any(&self, key: &Key) -> DiResult<AnyArc> {
        self.resolver.resolve_any(key)
    }

    fn resolve_closed(&self, request: &ClosedRequest) -> DiResult<AnyArc> {
        self.resolver.resolve_closed(request)
    }

    fn handle(&self) -> DiResult<ProviderHandle> {
        self.resolver.handle()
    }
}
