//! Service collection module for dependency injection.
//!
//! This module contains the ServiceCollection type and related functionality
//! for registering services and building service providers.

use std::any::{type_name, TypeId};
use std::sync::Arc;

use crate::config::{ContainerConfig, DuplicatePolicy};
use crate::generic::OpenService;
use crate::observer::Observers;
use crate::provider::ResolverContext;
use crate::registration::{AnyArc, OpenRegistration, Registration, Registry};
use crate::{DiError, DiObserver, DiResult, Key, Lifetime, ServiceDescriptor, ServiceProvider};

pub mod module_system;
pub use module_system::*;

/// Registration table that is frozen into a [`ServiceProvider`].
///
/// Fallible registrations (`register*`) return the policy violation directly.
/// The `add_*` sugar returns `&mut Self` for chaining; a violation there is
/// recorded and reported by [`try_build`](Self::try_build).
pub struct ServiceCollection {
    registry: Registry,
    observers: Observers,
    config: ContainerConfig,
    errors: Vec<DiError>,
}

impl ServiceCollection {
    /// Creates a new empty service collection with the default configuration.
    pub fn new() -> Self {
        Self::with_config(ContainerConfig::default())
    }

    /// Creates an empty service collection using `config`.
    pub fn with_config(config: ContainerConfig) -> Self {
        Self {
            registry: Registry::new(config.duplicate_policy),
            observers: Observers::new(),
            config,
            errors: Vec::new(),
        }
    }

    /// Creates an empty service collection with the given duplicate policy.
    pub fn with_policy(policy: DuplicatePolicy) -> Self {
        Self::with_config(ContainerConfig::default().with_duplicate_policy(policy))
    }

    /// The configuration this collection was created with.
    pub fn config(&self) -> &ContainerConfig {
        &self.config
    }

    // ----- Fallible Registrations -----

    /// Binds the capability `T` to a fallible producer.
    ///
    /// # Errors
    ///
    /// Returns [`DiError::DuplicateRegistration`] if `T` is already bound and the
    /// collection uses [`DuplicatePolicy::Reject`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ferrous_container::{DiError, Lifetime, Resolver, ServiceCollection};
    ///
    /// struct Port(u16);
    ///
    /// let mut services = ServiceCollection::new();
    /// services.register::<Port, _>(Lifetime::Singleton, |_| {
    ///     "8080".parse().map(Port).map_err(|e: std::num::ParseIntError| DiError::Producer {
    ///         service: "Port",
    ///         message: e.to_string(),
    ///     })
    /// })?;
    ///
    /// let provider = services.build();
    /// assert_eq!(provider.get_required::<Port>().0, 8080);
    /// # Ok::<(), DiError>(())
    /// ```
    pub fn register<T, F>(&mut self, lifetime: Lifetime, producer: F) -> DiResult<&mut Self>
    where
        T: 'static + Send + Sync,
        F: Fn(&ResolverContext) -> DiResult<T> + Send + Sync + 'static,
    {
        let key = Key::Type(TypeId::of::<T>(), type_name::<T>());
        self.insert_value(key, lifetime, producer)?;
        Ok(self)
    }

    /// Binds the trait-object capability `Trait` to a fallible producer.
    pub fn register_trait<Trait, F>(&mut self, lifetime: Lifetime, producer: F) -> DiResult<&mut Self>
    where
        Trait: ?Sized + 'static + Send + Sync,
        F: Fn(&ResolverContext) -> DiResult<Arc<Trait>> + Send + Sync + 'static,
    {
        let key = Key::Trait(type_name::<Trait>());
        self.insert_trait(key, lifetime, producer)?;
        Ok(self)
    }

    /// Binds the capability `T` under `name`.
    pub fn register_named<T, F>(&mut self, name: &'static str, lifetime: Lifetime, producer: F) -> DiResult<&mut Self>
    where
        T: 'static + Send + Sync,
        F: Fn(&ResolverContext) -> DiResult<T> + Send + Sync + 'static,
    {
        let key = Key::TypeNamed(TypeId::of::<T>(), type_name::<T>(), name);
        self.insert_value(key, lifetime, producer)?;
        Ok(self)
    }

    /// Binds the trait-object capability `Trait` under `name`.
    pub fn register_named_trait<Trait, F>(
        &mut self,
        name: &'static str,
        lifetime: Lifetime,
        producer: F,
    ) -> DiResult<&mut Self>
    where
        Trait: ?Sized + 'static + Send + Sync,
        F: Fn(&ResolverContext) -> DiResult<Arc<Trait>> + Send + Sync + 'static,
    {
        let key = Key::TraitNamed(type_name::<Trait>(), name);
        self.insert_trait(key, lifetime, producer)?;
        Ok(self)
    }

    /// Registers the open generic capability `G`.
    ///
    /// Every closed form `G::Closed<T>` resolved later gets its own binding
    /// with `lifetime`.
    pub fn register_generic<G: OpenService>(&mut self, lifetime: Lifetime) -> DiResult<&mut Self> {
        self.registry.insert_open(
            TypeId::of::<G>(),
            OpenRegistration {
                lifetime,
                name: type_name::<G>(),
            },
        )?;
        Ok(self)
    }

    fn insert_value<T, F>(&mut self, key: Key, lifetime: Lifetime, producer: F) -> DiResult<()>
    where
        T: 'static + Send + Sync,
        F: Fn(&ResolverContext) -> DiResult<T> + Send + Sync + 'static,
    {
        let ctor = move |r: &ResolverContext| -> DiResult<AnyArc> { Ok(Arc::new(producer(r)?)) };
        self.registry
            .insert(key, Registration::new(lifetime, Arc::new(ctor), Some(type_name::<T>())))
    }

    fn insert_trait<Trait, F>(&mut self, key: Key, lifetime: Lifetime, producer: F) -> DiResult<()>
    where
        Trait: ?Sized + 'static + Send + Sync,
        F: Fn(&ResolverContext) -> DiResult<Arc<Trait>> + Send + Sync + 'static,
    {
        // Trait objects are stored as Arc<Arc<dyn Trait>>.
        let ctor = move |r: &ResolverContext| -> DiResult<AnyArc> { Ok(Arc::new(producer(r)?)) };
        self.registry.insert(key, Registration::new(lifetime, Arc::new(ctor), None))
    }

    pub(crate) fn record(&mut self, result: DiResult<()>) -> &mut Self {
        if let Err(error) = result {
            tracing::warn!(%error, "registration rejected");
            self.errors.push(error);
        }
        self
    }

    // ----- Concrete Type Registrations -----

    /// Registers a singleton instance shared by every resolution.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use ferrous_container::ServiceCollection;
    /// struct Config {
    ///     database_url: String
    /// }
    ///
    /// let mut services = ServiceCollection::new();
    /// services.add_singleton(Config {
    ///     database_url: "postgres://localhost".to_string()
    /// });
    /// ```
    pub fn add_singleton<T: 'static + Send + Sync>(&mut self, value: T) -> &mut Self {
        let key = Key::Type(TypeId::of::<T>(), type_name::<T>());
        let result = self.insert_instance(key, Arc::new(value) as AnyArc, Some(type_name::<T>()));
        self.record(result)
    }

    /// Registers a singleton factory that creates the instance on first request.
    ///
    /// The factory is called only once, even when the first requests race on
    /// several threads.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use ferrous_container::{ServiceCollection, Resolver};
    /// # use std::sync::Arc;
    /// struct Database { url: String }
    /// struct UserService { db: Arc<Database> }
    ///
    /// let mut services = ServiceCollection::new();
    /// services.add_singleton(Database { url: "postgres://localhost".to_string() });
    /// services.add_singleton_factory::<UserService, _>(|resolver| {
    ///     UserService {
    ///         db: resolver.get_required::<Database>()
    ///     }
    /// });
    /// ```
    pub fn add_singleton_factory<T, F>(&mut self, factory: F) -> &mut Self
    where
        T: 'static + Send + Sync,
        F: Fn(&ResolverContext) -> T + Send + Sync + 'static,
    {
        self.add_factory(Lifetime::Singleton, factory)
    }

    /// Registers a factory whose instance is cached once per OS thread.
    pub fn add_per_thread_factory<T, F>(&mut self, factory: F) -> &mut Self
    where
        T: 'static + Send + Sync,
        F: Fn(&ResolverContext) -> T + Send + Sync + 'static,
    {
        self.add_factory(Lifetime::PerThread, factory)
    }

    /// Registers a transient factory that creates a new instance on every request.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use ferrous_container::{ServiceCollection, Resolver};
    /// struct Logger { timestamp: std::time::SystemTime }
    ///
    /// let mut services = ServiceCollection::new();
    /// services.add_transient_factory::<Logger, _>(|_| {
    ///     Logger { timestamp: std::time::SystemTime::now() }
    /// });
    /// ```
    pub fn add_transient_factory<T, F>(&mut self, factory: F) -> &mut Self
    where
        T: 'static + Send + Sync,
        F: Fn(&ResolverContext) -> T + Send + Sync + 'static,
    {
        self.add_factory(Lifetime::Transient, factory)
    }

    /// Registers an infallible factory with an explicit lifetime.
    pub fn add_factory<T, F>(&mut self, lifetime: Lifetime, factory: F) -> &mut Self
    where
        T: 'static + Send + Sync,
        F: Fn(&ResolverContext) -> T + Send + Sync + 'static,
    {
        let key = Key::Type(TypeId::of::<T>(), type_name::<T>());
        let result = self.insert_value(key, lifetime, move |r| Ok(factory(r)));
        self.record(result)
    }

    fn insert_instance(&mut self, key: Key, value: AnyArc, impl_name: Option<&'static str>) -> DiResult<()> {
        let ctor = move |_: &ResolverContext| -> DiResult<AnyArc> { Ok(value.clone()) };
        self.registry
            .insert(key, Registration::new(Lifetime::Singleton, Arc::new(ctor), impl_name))
    }

    // ----- Trait Registrations -----

    /// Registers a singleton trait implementation.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use ferrous_container::{ServiceCollection, Resolver};
    /// # use std::sync::Arc;
    /// trait Logger: Send + Sync {
    ///     fn log(&self, message: &str);
    /// }
    ///
    /// struct FileLogger { path: String }
    /// impl Logger for FileLogger {
    ///     fn log(&self, message: &str) {
    ///         // Write to file
    ///     }
    /// }
    ///
    /// let mut services = ServiceCollection::new();
    /// let logger = Arc::new(FileLogger { path: "/var/log/app.log".to_string() });
    /// services.add_singleton_trait::<dyn Logger>(logger);
    /// ```
    pub fn add_singleton_trait<T>(&mut self, value: Arc<T>) -> &mut Self
    where
        T: ?Sized + 'static + Send + Sync,
    {
        let key = Key::Trait(type_name::<T>());
        let result = self.insert_instance(key, Arc::new(value) as AnyArc, None);
        self.record(result)
    }

    /// Registers a singleton trait factory.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use ferrous_container::{ServiceCollection, Resolver};
    /// # use std::sync::Arc;
    /// trait Clock: Send + Sync {
    ///     fn now(&self) -> std::time::SystemTime;
    /// }
    ///
    /// struct SystemClock;
    /// impl Clock for SystemClock {
    ///     fn now(&self) -> std::time::SystemTime {
    ///         std::time::SystemTime::now()
    ///     }
    /// }
    ///
    /// let mut services = ServiceCollection::new();
    /// services.add_singleton_trait_factory::<dyn Clock, _>(|_| Arc::new(SystemClock));
    /// let provider = services.build();
    /// let a = provider.get_required_trait::<dyn Clock>();
    /// let b = provider.get_required_trait::<dyn Clock>();
    /// assert!(Arc::ptr_eq(&a, &b));
    /// ```
    pub fn add_singleton_trait_factory<Trait, F>(&mut self, factory: F) -> &mut Self
    where
        Trait: ?Sized + 'static + Send + Sync,
        F: Fn(&ResolverContext) -> Arc<Trait> + Send + Sync + 'static,
    {
        self.add_trait_factory(Lifetime::Singleton, factory)
    }

    /// Registers a trait factory whose instance is cached once per OS thread.
    pub fn add_per_thread_trait_factory<Trait, F>(&mut self, factory: F) -> &mut Self
    where
        Trait: ?Sized + 'static + Send + Sync,
        F: Fn(&ResolverContext) -> Arc<Trait> + Send + Sync + 'static,
    {
        self.add_trait_factory(Lifetime::PerThread, factory)
    }

    /// Registers a transient trait factory.
    pub fn add_transient_trait_factory<Trait, F>(&mut self, factory: F) -> &mut Self
    where
        Trait: ?Sized + 'static + Send + Sync,
        F: Fn(&ResolverContext) -> Arc<Trait> + Send + Sync + 'static,
    {
        self.add_trait_factory(Lifetime::Transient, factory)
    }

    /// Registers an infallible trait factory with an explicit lifetime.
    pub fn add_trait_factory<Trait, F>(&mut self, lifetime: Lifetime, factory: F) -> &mut Self
    where
        Trait: ?Sized + 'static + Send + Sync,
        F: Fn(&ResolverContext) -> Arc<Trait> + Send + Sync + 'static,
    {
        let key = Key::Trait(type_name::<Trait>());
        let result = self.insert_trait(key, lifetime, move |r| Ok(factory(r)));
        self.record(result)
    }

    // ----- Named Registrations -----

    /// Registers a named singleton instance.
    pub fn add_named_singleton<T: 'static + Send + Sync>(&mut self, name: &'static str, value: T) -> &mut Self {
        let key = Key::TypeNamed(TypeId::of::<T>(), type_name::<T>(), name);
        let result = self.insert_instance(key, Arc::new(value) as AnyArc, Some(type_name::<T>()));
        self.record(result)
    }

    /// Registers a named factory with an explicit lifetime.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ferrous_container::{Lifetime, Resolver, ServiceCollection};
    ///
    /// let mut services = ServiceCollection::new();
    /// services.add_named_factory::<String, _>("greeting", Lifetime::Transient, |_| "hello".to_string());
    /// services.add_named_factory::<String, _>("farewell", Lifetime::Transient, |_| "bye".to_string());
    ///
    /// let provider = services.build();
    /// assert_eq!(&*provider.get_named_required::<String>("greeting"), "hello");
    /// assert_eq!(&*provider.get_named_required::<String>("farewell"), "bye");
    /// assert!(provider.get::<String>().is_err());
    /// ```
    pub fn add_named_factory<T, F>(&mut self, name: &'static str, lifetime: Lifetime, factory: F) -> &mut Self
    where
        T: 'static + Send + Sync,
        F: Fn(&ResolverContext) -> T + Send + Sync + 'static,
    {
        let key = Key::TypeNamed(TypeId::of::<T>(), type_name::<T>(), name);
        let result = self.insert_value(key, lifetime, move |r| Ok(factory(r)));
        self.record(result)
    }

    /// Registers a named singleton trait implementation.
    pub fn add_named_singleton_trait<T>(&mut self, name: &'static str, value: Arc<T>) -> &mut Self
    where
        T: ?Sized + 'static + Send + Sync,
    {
        let key = Key::TraitNamed(type_name::<T>(), name);
        let result = self.insert_instance(key, Arc::new(value) as AnyArc, None);
        self.record(result)
    }

    /// Registers a named trait factory with an explicit lifetime.
    pub fn add_named_trait_factory<Trait, F>(&mut self, name: &'static str, lifetime: Lifetime, factory: F) -> &mut Self
    where
        Trait: ?Sized + 'static + Send + Sync,
        F: Fn(&ResolverContext) -> Arc<Trait> + Send + Sync + 'static,
    {
        let key = Key::TraitNamed(type_name::<Trait>(), name);
        let result = self.insert_trait(key, lifetime, move |r| Ok(factory(r)));
        self.record(result)
    }

    // ----- Open Generic Registrations -----

    /// Registers the open generic capability `G`, recording any policy
    /// violation for [`try_build`](Self::try_build).
    pub fn add_open_generic<G: OpenService>(&mut self, lifetime: Lifetime) -> &mut Self {
        let result = self.register_generic::<G>(lifetime).map(|_| ());
        self.record(result)
    }

    // ----- Service Descriptors and Introspection -----

    /// Describes the binding registered for `key`.
    ///
    /// Open generic registrations are found under the key of their marker
    /// type. Fails with [`DiError::Unregistered`] if nothing is bound.
    pub fn lookup(&self, key: &Key) -> DiResult<ServiceDescriptor> {
        self.registry
            .descriptor(key)
            .ok_or(DiError::Unregistered(key.display_name()))
    }

    /// Returns true if `key` has a binding.
    pub fn contains(&self, key: &Key) -> bool {
        self.registry.contains_key(key)
    }

    /// Get all service descriptors for introspection and diagnostics.
    ///
    /// # Examples
    ///
    /// ```
    /// use ferrous_container::{ServiceCollection, Lifetime};
    ///
    /// let mut services = ServiceCollection::new();
    /// services.add_singleton(42usize);
    /// services.add_per_thread_factory::<String, _>(|_| "hello".to_string());
    ///
    /// let descriptors = services.get_service_descriptors();
    /// assert_eq!(descriptors.len(), 2);
    ///
    /// let usize_desc = descriptors.iter()
    ///     .find(|d| d.type_name().contains("usize"))
    ///     .unwrap();
    /// assert_eq!(usize_desc.lifetime, Lifetime::Singleton);
    /// ```
    pub fn get_service_descriptors(&self) -> Vec<ServiceDescriptor> {
        self.registry.descriptors()
    }

    /// Number of bindings, open generics included.
    pub fn len(&self) -> usize {
        self.registry.one.len() + self.registry.open.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // ----- Diagnostics -----

    /// Adds a diagnostic observer to track resolution events.
    ///
    /// Observers are called synchronously on the resolving thread.
    pub fn add_observer(&mut self, observer: Arc<dyn DiObserver>) -> &mut Self {
        self.observers.add(observer);
        self
    }

    // ----- Build -----

    /// Freezes the registrations into a provider.
    ///
    /// # Errors
    ///
    /// Returns the first policy violation recorded by the `add_*` methods.
    pub fn try_build(self) -> DiResult<ServiceProvider> {
        if let Some(error) = self.errors.into_iter().next() {
            return Err(error);
        }
        self.config.validate()?;
        Ok(ServiceProvider::new(self.registry, self.observers, self.config.max_depth))
    }

    /// Freezes the registrations into a provider.
    ///
    /// # Panics
    ///
    /// Panics on a recorded policy violation or an invalid configuration. Use
    /// [`try_build`](Self::try_build) to handle them.
    ///
    /// # Examples
    ///
    /// ```
    /// use ferrous_container::{ServiceCollection, Resolver};
    ///
    /// let mut services = ServiceCollection::new();
    /// services.add_singleton(42usize);
    /// services.add_singleton("Hello".to_string());
    ///
    /// let provider = services.build();
    /// assert_eq!(*provider.get_required::<usize>(), 42);
    /// assert_eq!(&*provider.get_required::<String>(), "Hello");
    /// ```
    pub fn build(self) -> ServiceProvider {
        match self.try_build() {
            Ok(provider) => provider,
            Err(error) => panic!("Invalid service collection: {}", error),
        }
    }
}

impl Default for ServiceCollection {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ServiceCollection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceCollection")
            .field("services", &self.registry.one.len())
            .field("open_generics", &self.registry.open.len())
            .field("config", &self.config)
            .field("errors", &self.errors)
            .finish()
    }
}
