//! Owned, non-owning references to a provider.

use std::fmt;
use std::sync::Weak;

use super::{ProviderInner, ServiceProvider};
use crate::generic::ClosedRequest;
use crate::registration::AnyArc;
use crate::traits::ResolverCore;
use crate::{DiError, DiResult, Key};

/// A weak reference to a [`ServiceProvider`] that producers can keep.
///
/// Services that need to resolve later, such as factories, store a handle
/// instead of the provider itself so a cached instance never keeps its own
/// provider alive. Every resolution through a dropped provider's handle
/// fails with [`DiError::ProviderDropped`].
///
/// # Examples
///
/// ```
/// use ferrous_container::{DiError, ProviderHandle, Resolver, ResolverCore, ServiceCollection};
///
/// struct Spawner { handle: ProviderHandle }
///
/// let mut services = ServiceCollection::new();
/// services.add_singleton(5u8);
/// services.register::<Spawner, _>(ferrous_container::Lifetime::Singleton, |r| {
///     Ok(Spawner { handle: r.handle()? })
/// }).unwrap();
///
/// let provider = services.build();
/// let spawner = provider.get_required::<Spawner>();
/// assert_eq!(*spawner.handle.get::<u8>().unwrap(), 5);
///
/// let handle = provider.handle().unwrap();
/// drop(spawner);
/// drop(provider);
/// assert_eq!(handle.get::<u8>().err(), Some(DiError::ProviderDropped));
/// ```
#[derive(Clone)]
pub struct ProviderHandle {
    inner: Weak<ProviderInner>,
}

impl ProviderHandle {
    pub(crate) fn new(inner: Weak<ProviderInner>) -> Self {
        Self { inner }
    }

    /// Returns the provider if it is still alive.
    pub fn provider(&self) -> DiResult<ServiceProvider> {
        self.inner
            .upgrade()
            .map(ServiceProvider::from_inner)
            .ok_or(DiError::ProviderDropped)
    }

    /// Whether the provider behind this handle has been dropped.
    pub fn is_dropped(&self) -> bool {
        self.inner.strong_count() == 0
    }
}

impl ResolverCore for ProviderHandle {
    fn resolve_any(&self, key: &Key) -> DiResult<AnyArc> {
        self.provider()?.resolve_any(key)
    }

    fn resolve_closed(&self, request: &ClosedRequest) -> DiResult<AnyArc> {
        self.provider()?.resolve_closed(request)
    }

    fn handle(&self) -> DiResult<ProviderHandle> {
        Ok(self.clone())
    }
}

impl fmt::Debug for ProviderHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderHandle")
            .field("dropped", &self.is_dropped())
            .finish()
    }
}
