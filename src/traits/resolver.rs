//! Resolver traits for service resolution.

use std::any::{type_name, Any, TypeId};
use std::sync::Arc;

use crate::error::{DiError, DiResult};
use crate::generic::{ClosedRequest, OpenService};
use crate::internal::raise;
use crate::key::Key;
use crate::provider::ProviderHandle;

/// Core resolver trait for object-safe service resolution.
///
/// This trait provides the fundamental service resolution capabilities that are
/// object-safe (can be used as trait objects). Lifetime handling and circular
/// dependency detection happen behind it.
///
/// Most users should use the [`Resolver`] trait instead, which provides more
/// ergonomic generic methods built on top of this trait.
pub trait ResolverCore: Send + Sync {
    /// Resolves a single service by key.
    ///
    /// # Returns
    ///
    /// * `Ok(AnyArc)` - The resolved service wrapped in `Arc<dyn Any>`
    /// * `Err(DiError)` - Resolution error (unregistered, cyclic, producer failure, etc.)
    fn resolve_any(&self, key: &Key) -> DiResult<Arc<dyn Any + Send + Sync>>;

    /// Resolves a closed instantiation of an open generic registration,
    /// materializing the closed binding on first use.
    fn resolve_closed(&self, request: &ClosedRequest) -> DiResult<Arc<dyn Any + Send + Sync>>;

    /// Returns a weak handle to the provider behind this resolver.
    fn handle(&self) -> DiResult<ProviderHandle>;
}

/// High-level resolver interface with generic methods for type-safe service resolution.
///
/// This trait provides the main API that users interact with for resolving services.
/// It builds on [`ResolverCore`] to offer type-safe generic methods that handle
/// the complexities of type erasure and casting internally. Every
/// [`ResolverCore`] implements it.
///
/// # Examples
///
/// ```
/// use ferrous_container::{ServiceCollection, Resolver};
/// use std::sync::Arc;
///
/// trait Logger: Send + Sync {
///     fn log(&self, msg: &str);
/// }
///
/// struct ConsoleLogger;
/// impl Logger for ConsoleLogger {
///     fn log(&self, msg: &str) {
///         println!("LOG: {}", msg);
///     }
/// }
///
/// let mut collection = ServiceCollection::new();
/// collection.add_singleton(42usize);
/// collection.add_singleton_trait(Arc::new(ConsoleLogger) as Arc<dyn Logger>);
///
/// let provider = collection.build();
///
/// // Resolve concrete types
/// let number = provider.get_required::<usize>();
/// assert_eq!(*number, 42);
///
/// // Resolve trait objects
/// let logger = provider.get_required_trait::<dyn Logger>();
/// logger.log("Service resolved successfully");
/// ```
pub trait Resolver: ResolverCore {
    /// Resolves a concrete service type.
    ///
    /// # Examples
    ///
    /// ```
    /// use ferrous_container::{ServiceCollection, Resolver};
    ///
    /// let mut collection = ServiceCollection::new();
    /// collection.add_singleton("configuration".to_string());
    ///
    /// let provider = collection.build();
    /// let config = provider.get::<String>().unwrap();
    /// assert_eq!(&*config, "configuration");
    /// ```
    fn get<T: 'static + Send + Sync>(&self) -> DiResult<Arc<T>> {
        let key = Key::Type(TypeId::of::<T>(), type_name::<T>());
        self.resolve_any(&key)?
            .downcast::<T>()
            .map_err(|_| DiError::TypeMismatch(type_name::<T>()))
    }

    /// Resolves a trait implementation.
    ///
    /// # Examples
    ///
    /// ```
    /// use ferrous_container::{ServiceCollection, Resolver};
    /// use std::sync::Arc;
    ///
    /// trait Database: Send + Sync {
    ///     fn connect(&self) -> &str;
    /// }
    ///
    /// struct PostgresDb;
    /// impl Database for PostgresDb {
    ///     fn connect(&self) -> &str { "postgres://..." }
    /// }
    ///
    /// let mut collection = ServiceCollection::new();
    /// collection.add_singleton_trait(Arc::new(PostgresDb) as Arc<dyn Database>);
    ///
    /// let provider = collection.build();
    /// let db = provider.get_trait::<dyn Database>().unwrap();
    /// assert_eq!(db.connect(), "postgres://...");
    /// ```
    fn get_trait<T: ?Sized + 'static + Send + Sync>(&self) -> DiResult<Arc<T>> {
        let key = Key::Trait(type_name::<T>());
        // Trait objects are stored as Arc<Arc<dyn Trait>>.
        self.resolve_any(&key)?
            .downcast::<Arc<T>>()
            .map(|boxed| (*boxed).clone())
            .map_err(|_| DiError::TypeMismatch(type_name::<T>()))
    }

    /// Resolves a named concrete service type.
    fn get_named<T: 'static + Send + Sync>(&self, name: &'static str) -> DiResult<Arc<T>> {
        let key = Key::TypeNamed(TypeId::of::<T>(), type_name::<T>(), name);
        self.resolve_any(&key)?
            .downcast::<T>()
            .map_err(|_| DiError::TypeMismatch(type_name::<T>()))
    }

    /// Resolves a named trait implementation.
    fn get_named_trait<T: ?Sized + 'static + Send + Sync>(&self, name: &'static str) -> DiResult<Arc<T>> {
        let key = Key::TraitNamed(type_name::<T>(), name);
        self.resolve_any(&key)?
            .downcast::<Arc<T>>()
            .map(|boxed| (*boxed).clone())
            .map_err(|_| DiError::TypeMismatch(type_name::<T>()))
    }

    /// Resolves the closed form `G::Closed<T>` of an open generic registration.
    ///
    /// The closed binding is created on first use with the lifetime the open
    /// form was registered with. Fails with [`DiError::Unregistered`] naming
    /// `G` when the open form is not registered.
    fn get_closed<G, T>(&self) -> DiResult<Arc<G::Closed<T>>>
    where
        G: OpenService,
        T: Send + Sync + 'static,
    {
        let request = ClosedRequest::new::<G, T>();
        self.resolve_closed(&request)?
            .downcast::<Arc<G::Closed<T>>>()
            .map(|boxed| (*boxed).clone())
            .map_err(|_| DiError::TypeMismatch(type_name::<G::Closed<T>>()))
    }

    /// Resolves a service and takes it by value.
    ///
    /// Only works for instances nobody else holds, which in practice means
    /// transient services. Cached instances fail with
    /// [`DiError::SharedInstance`].
    ///
    /// # Examples
    ///
    /// ```
    /// use ferrous_container::{DiError, ServiceCollection, Resolver};
    ///
    /// let mut services = ServiceCollection::new();
    /// services.add_transient_factory::<Vec<u8>, _>(|_| vec![1, 2, 3]);
    /// services.add_singleton(String::from("shared"));
    /// let provider = services.build();
    ///
    /// let mut bytes = provider.get_owned::<Vec<u8>>().unwrap();
    /// bytes.push(4);
    /// assert_eq!(bytes, vec![1, 2, 3, 4]);
    /// assert!(matches!(provider.get_owned::<String>(), Err(DiError::SharedInstance(_))));
    /// ```
    fn get_owned<T: 'static + Send + Sync>(&self) -> DiResult<T> {
        let shared = self.get::<T>()?;
        Arc::try_unwrap(shared).map_err(|_| DiError::SharedInstance(type_name::<T>()))
    }

    /// Resolves a concrete service type, panicking on failure.
    ///
    /// Inside a producer the failure is handed back to the provider running
    /// that producer, so the outermost `get` returns the original error
    /// instead of unwinding.
    ///
    /// # Panics
    ///
    /// Panics if the service cannot be resolved and no producer is running
    /// on the current thread.
    ///
    /// # Examples
    ///
    /// ```
    /// use ferrous_container::{ServiceCollection, Resolver};
    ///
    /// let mut collection = ServiceCollection::new();
    /// collection.add_singleton(42usize);
    ///
    /// let provider = collection.build();
    /// let number = provider.get_required::<usize>();
    /// assert_eq!(*number, 42);
    /// ```
    fn get_required<T: 'static + Send + Sync>(&self) -> Arc<T> {
        self.get::<T>().unwrap_or_else(|e| raise(type_name::<T>(), e))
    }

    /// Resolves a trait implementation, panicking on failure.
    ///
    /// See [`get_required`](Self::get_required) for how failures inside
    /// producers are reported.
    fn get_required_trait<T: ?Sized + 'static + Send + Sync>(&self) -> Arc<T> {
        self.get_trait::<T>().unwrap_or_else(|e| raise(type_name::<T>(), e))
    }

    /// Resolves a named concrete service type, panicking on failure.
    fn get_named_required<T: 'static + Send + Sync>(&self, name: &'static str) -> Arc<T> {
        self.get_named::<T>(name).unwrap_or_else(|e| raise(type_name::<T>(), e))
    }

    /// Resolves a named trait implementation, panicking on failure.
    fn get_named_trait_required<T: ?Sized + 'static + Send + Sync>(&self, name: &'static str) -> Arc<T> {
        self.get_named_trait::<T>(name).unwrap_or_else(|e| raise(type_name::<T>(), e))
    }

    /// Resolves a closed generic, panicking on failure.
    fn get_closed_required<G, T>(&self) -> Arc<G::Closed<T>>
    where
        G: OpenService,
        T: Send + Sync + 'static,
    {
        self.get_closed::<G, T>()
            .unwrap_or_else(|e| raise(type_name::<G::Closed<T>>(), e))
    }
}

impl<R: ResolverCore + ?Sized> Resolver for R {}
