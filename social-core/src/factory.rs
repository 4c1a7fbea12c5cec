//! Deferred creation of services.

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use ferrous_container::{DiResult, OpenService, ProviderHandle, Resolver, ResolverContext, ResolverCore};

/// Creates `T` from the provider on demand.
///
/// Holds only a weak handle to the provider, so storing a factory inside a
/// cached service does not keep the provider alive.
pub struct Factory<T> {
    handle: ProviderHandle,
    _target: PhantomData<fn() -> T>,
}

impl<T: Send + Sync + 'static> Factory<T> {
    pub fn new(handle: ProviderHandle) -> Self {
        Self {
            handle,
            _target: PhantomData,
        }
    }

    /// Resolves `T` honoring its registered lifetime.
    pub fn create(&self) -> DiResult<Arc<T>> {
        self.handle.get::<T>()
    }

    /// Resolves a transient `T` and takes ownership of it.
    pub fn create_owned(&self) -> DiResult<T> {
        self.handle.get_owned::<T>()
    }
}

impl<T> fmt::Debug for Factory<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Factory")
            .field("target", &std::any::type_name::<T>())
            .finish()
    }
}

/// Open generic registration for [`Factory`].
pub struct Factories;

impl OpenService for Factories {
    type Closed<T: Send + Sync + 'static> = Factory<T>;

    fn produce<T: Send + Sync + 'static>(r: &ResolverContext<'_>) -> DiResult<Arc<Factory<T>>> {
        Ok(Arc::new(Factory::new(r.handle()?)))
    }
}
