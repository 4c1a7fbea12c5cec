//! Open generic registrations.
//!
//! An open capability is a marker type implementing [`OpenService`]. It is
//! registered once with a lifetime; closed forms such as `Factory<User>` are
//! materialized the first time they are resolved and then reused.

use std::any::{type_name, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::DiResult;
use crate::key::Key;
use crate::lifetime::Lifetime;
use crate::provider::ResolverContext;
use crate::registration::{AnyArc, Ctor, Registration};

/// An open generic capability.
///
/// `Closed<T>` is the capability obtained by closing the open form over `T`;
/// it may be a concrete type or a trait object.
///
/// # Examples
///
/// ```
/// use ferrous_container::{DiResult, Lifetime, OpenService, Resolver, ResolverContext, ServiceCollection};
/// use std::marker::PhantomData;
/// use std::sync::Arc;
///
/// struct Repository<T> {
///     _item: PhantomData<T>,
/// }
///
/// struct Repositories;
///
/// impl OpenService for Repositories {
///     type Closed<T: Send + Sync + 'static> = Repository<T>;
///
///     fn produce<T: Send + Sync + 'static>(_: &ResolverContext<'_>) -> DiResult<Arc<Repository<T>>> {
///         Ok(Arc::new(Repository { _item: PhantomData }))
///     }
/// }
///
/// let mut services = ServiceCollection::new();
/// services.add_open_generic::<Repositories>(Lifetime::Singleton);
/// let provider = services.build();
///
/// let users = provider.get_closed::<Repositories, String>().unwrap();
/// let again = provider.get_closed::<Repositories, String>().unwrap();
/// let counts = provider.get_closed::<Repositories, u64>().unwrap();
/// assert!(Arc::ptr_eq(&users, &again));
/// # let _ = counts;
/// ```
pub trait OpenService: 'static {
    /// The capability produced when closing over `T`.
    type Closed<T: Send + Sync + 'static>: ?Sized + Send + Sync + 'static;

    /// Builds an instance of the closed capability.
    fn produce<T: Send + Sync + 'static>(resolver: &ResolverContext<'_>) -> DiResult<Arc<Self::Closed<T>>>;
}

/// A type-erased request for a closed generic capability.
///
/// Built by [`Resolver::get_closed`](crate::Resolver::get_closed); resolvers
/// that only implement [`ResolverCore`](crate::ResolverCore) receive it
/// through `resolve_closed`.
pub struct ClosedRequest {
    pub(crate) open: TypeId,
    pub(crate) open_name: &'static str,
    pub(crate) key: Key,
    pub(crate) ctor: Ctor,
}

impl ClosedRequest {
    pub(crate) fn new<G, T>() -> Self
    where
        G: OpenService,
        T: Send + Sync + 'static,
    {
        let ctor: Ctor = Arc::new(|ctx: &ResolverContext<'_>| -> DiResult<AnyArc> {
            G::produce::<T>(ctx).map(|closed| Arc::new(closed) as AnyArc)
        });
        Self {
            open: TypeId::of::<G>(),
            open_name: type_name::<G>(),
            key: Key::Closed(TypeId::of::<G>(), TypeId::of::<T>(), type_name::<G::Closed<T>>()),
            ctor,
        }
    }

    /// The key of the closed capability.
    pub fn key(&self) -> &Key {
        &self.key
    }

    /// The type name of the open registration.
    pub fn open_name(&self) -> &'static str {
        self.open_name
    }
}

/// Closed registrations materialized so far, by closed key.
#[derive(Default)]
pub(crate) struct ClosedBindings {
    bindings: RwLock<HashMap<Key, Arc<Registration>>>,
}

impl ClosedBindings {
    /// Returns the closed registration for `request`, creating it with
    /// `lifetime` on first use.
    pub(crate) fn get_or_materialize(&self, request: &ClosedRequest, lifetime: Lifetime) -> Arc<Registration> {
        if let Some(existing) = self.bindings.read().get(&request.key) {
            return existing.clone();
        }

        let mut bindings = self.bindings.write();
        bindings
            .entry(request.key.clone())
            .or_insert_with(|| {
                tracing::debug!(
                    open = request.open_name,
                    closed = request.key.display_name(),
                    ?lifetime,
                    "materializing closed generic binding"
                );
                Arc::new(Registration::new(lifetime, request.ctor.clone(), Some(request.key.display_name())))
            })
            .clone()
    }

    pub(crate) fn get(&self, key: &Key) -> Option<Arc<Registration>> {
        self.bindings.read().get(key).cloned()
    }

    pub(crate) fn snapshot(&self) -> Vec<(Key, Lifetime, Option<&'static str>)> {
        self.bindings
            .read()
            .iter()
            .map(|(key, reg)| (key.clone(), reg.lifetime, reg.impl_name))
            .collect()
    }
}
