//! Service provider module for dependency injection.
//!
//! This module contains the ServiceProvider type and related functionality
//! for resolving registered services from the DI container.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use crate::descriptors::ServiceDescriptor;
use crate::generic::{ClosedBindings, ClosedRequest};
use crate::internal::{run_producer, singleton_build, thread_cache, ResolutionGuard};
use crate::observer::Observers;
use crate::registration::{AnyArc, Registration, Registry};
use crate::traits::ResolverCore;
use crate::{DiError, DiResult, Key, Lifetime};

pub mod context;
pub mod handle;
pub use context::ResolverContext;
pub use handle::ProviderHandle;

static NEXT_PROVIDER_ID: AtomicU64 = AtomicU64::new(1);

/// Service provider for resolving dependencies from the DI container.
///
/// The `ServiceProvider` resolves services according to their registered
/// lifetimes:
///
/// - **Singleton**: one instance per provider, created on first use. Concurrent
///   first resolutions run the producer exactly once.
/// - **PerThread**: one instance per provider and OS thread, kept in
///   thread-local storage.
/// - **Transient**: a new instance on every resolution.
///
/// # Thread Safety
///
/// ServiceProvider is `Send + Sync` and cheap to clone (it uses `Arc`
/// internally). The registration table is immutable after build.
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
/// let mut collection = ServiceCollection::new();
/// collection.add_singleton(Database { url: "postgres://localhost".to_string() });
/// collection.add_transient_factory::<UserService, _>(|resolver| {
///     UserService { db: resolver.get_required::<Database>() }
/// });
///
/// let provider = collection.build();
/// let user_service = provider.get_required::<UserService>();
/// assert_eq!(user_service.db.url, "postgres://localhost");
/// ```
#[derive(Clone)]
pub struct ServiceProvider {
    inner: Arc<ProviderInner>,
}

pub(crate) struct ProviderInner {
    id: u64,
    registry: Registry,
    closed: ClosedBindings,
    observers: Observers,
    max_depth: usize,
}

impl Drop for ProviderInner {
    fn drop(&mut self) {
        // Other threads evict their slots on their next cache access.
        thread_cache::release_provider(self.id);
        tracing::trace!(provider = self.id, "service provider dropped");
    }
}

impl ServiceProvider {
    pub(crate) fn new(registry: Registry, observers: Observers, max_depth: usize) -> Self {
        let id = NEXT_PROVIDER_ID.fetch_add(1, Ordering::Relaxed);
        thread_cache::register_provider(id);
        tracing::debug!(provider = id, services = registry.one.len(), open = registry.open.len(), "service provider built");
        Self {
            inner: Arc::new(ProviderInner {
                id,
                registry,
                closed: ClosedBindings::default(),
                observers,
                max_depth,
            }),
        }
    }

    pub(crate) fn from_inner(inner: Arc<ProviderInner>) -> Self {
        Self { inner }
    }

    /// Describes the binding registered for `key`.
    ///
    /// Closed generic bindings are visible once they have been materialized
    /// by a resolution. Fails with [`DiError::Unregistered`] if nothing is
    /// bound.
    ///
    /// # Examples
    ///
    /// ```
    /// use ferrous_container::{ServiceCollection, Lifetime, key_of_type};
    ///
    /// let mut services = ServiceCollection::new();
    /// services.add_per_thread_factory::<String, _>(|_| String::from("worker"));
    /// let provider = services.build();
    ///
    /// let descriptor = provider.lookup(&key_of_type::<String>()).unwrap();
    /// assert_eq!(descriptor.lifetime, Lifetime::PerThread);
    /// assert!(provider.lookup(&key_of_type::<u8>()).is_err());
    /// ```
    pub fn lookup(&self, key: &Key) -> DiResult<ServiceDescriptor> {
        if let Some(descriptor) = self.inner.registry.descriptor(key) {
            return Ok(descriptor);
        }
        self.inner
            .closed
            .get(key)
            .map(|reg| ServiceDescriptor {
                key: key.clone(),
                lifetime: reg.lifetime,
                impl_type_name: reg.impl_name,
                open_generic: false,
            })
            .ok_or(DiError::Unregistered(key.display_name()))
    }

    /// Describes every binding, including materialized closed generics.
    pub fn get_service_descriptors(&self) -> Vec<ServiceDescriptor> {
        let mut descriptors = self.inner.registry.descriptors();
        descriptors.extend(self.inner.closed.snapshot().into_iter().map(|(key, lifetime, impl_type_name)| {
            ServiceDescriptor {
                key,
                lifetime,
                impl_type_name,
                open_generic: false,
            }
        }));
        descriptors
    }

    /// Returns true if a resolution of `key` would find a binding.
    pub fn is_registered(&self, key: &Key) -> bool {
        self.lookup(key).is_ok()
    }

    fn resolve_registration(&self, key: &Key, reg: &Registration) -> DiResult<AnyArc> {
        match reg.lifetime {
            Lifetime::Singleton => {
                if let Some(value) = reg.singleton.get() {
                    return Ok(value.clone());
                }
                // The guard must be entered first so a cycle on this thread is
                // reported before any cross-thread wait.
                let _guard = ResolutionGuard::enter(self.inner.id, key, self.inner.max_depth)?;
                singleton_build::get_or_build(self.inner.id, key, &reg.singleton, || self.construct(key, reg))
            }
            Lifetime::PerThread => {
                if let Some(value) = thread_cache::get(self.inner.id, key) {
                    return Ok(value);
                }
                let _guard = ResolutionGuard::enter(self.inner.id, key, self.inner.max_depth)?;
                let value = self.construct(key, reg)?;
                Ok(thread_cache::get_or_insert(self.inner.id, key, value))
            }
            Lifetime::Transient => {
                let _guard = ResolutionGuard::enter(self.inner.id, key, self.inner.max_depth)?;
                self.construct(key, reg)
            }
        }
    }

    fn construct(&self, key: &Key, reg: &Registration) -> DiResult<AnyArc> {
        let observers = &self.inner.observers;
        let started = observers.has_observers().then(Instant::now);
        if started.is_some() {
            observers.constructing(key, reg.lifetime);
        }

        let ctx = ResolverContext::new(self);
        let result = run_producer(
            || (reg.ctor)(&ctx),
            |message| {
                tracing::error!(service = key.display_name(), panic = message, "producer panicked");
                observers.factory_panic(key, message);
            },
        );

        match &result {
            Ok(_) => {
                if reg.lifetime.is_cached() {
                    tracing::debug!(service = key.display_name(), lifetime = ?reg.lifetime, "instance created");
                }
                if let Some(started) = started {
                    observers.constructed(key, reg.lifetime, started.elapsed());
                }
            }
            Err(error) => {
                tracing::debug!(service = key.display_name(), %error, "construction failed");
                observers.construction_failed(key, error);
            }
        }
        result
    }
}

impl ResolverCore for ServiceProvider {
    fn resolve_any(&self, key: &Key) -> DiResult<AnyArc> {
        tracing::trace!(service = key.display_name(), "resolving");
        if let Some(reg) = self.inner.registry.get(key) {
            return self.resolve_registration(key, reg);
        }
        if let Some(reg) = self.inner.closed.get(key) {
            return self.resolve_registration(key, &reg);
        }
        Err(DiError::Unregistered(key.display_name()))
    }

    fn resolve_closed(&self, request: &ClosedRequest) -> DiResult<AnyArc> {
        tracing::trace!(service = request.key.display_name(), "resolving closed generic");
        let open = self
            .inner
            .registry
            .get_open(&request.open)
            .ok_or(DiError::Unregistered(request.open_name))?;
        let reg = self.inner.closed.get_or_materialize(request, open.lifetime);
        self.resolve_registration(&request.key, &reg)
    }

    fn handle(&self) -> DiResult<ProviderHandle> {
        Ok(ProviderHandle::new(Arc::downgrade(&self.inner)))
    }
}

impl std::fmt::Debug for ServiceProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceProvider")
            .field("id", &self.inner.id)
            .field("services", &self.inner.registry.one.len())
            .field("open_generics", &self.inner.registry.open.len())
            .finish()
    }
}
