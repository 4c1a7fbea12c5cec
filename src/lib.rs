//! # ferrous-container
//!
//! Type-safe dependency registration and resolution for Rust.
//!
//! ## Features
//!
//! - **Three lifetimes**: Singleton, PerThread, and Transient services
//! - **Trait support**: bind trait objects as well as concrete types
//! - **Open generics**: register `Factory<_>` once, resolve `Factory<User>` on demand
//! - **Circular dependency detection**: cycles fail with the full resolution path
//! - **Modules and containers**: named registration bundles applied at startup
//!
//! ## Quick Start
//!
//! ```rust
//! use ferrous_container::{ServiceCollection, Resolver};
//! use std::sync::Arc;
//!
//! // Define your services
//! struct Database {
//!     connection_string: String,
//! }
//!
//! struct UserService {
//!     db: Arc<Database>,
//! }
//!
//! // Register services
//! let mut services = ServiceCollection::new();
//! services.add_singleton(Database {
//!     connection_string: "postgres://localhost".to_string(),
//! });
//! services.add_transient_factory::<UserService, _>(|resolver| {
//!     UserService {
//!         db: resolver.get_required::<Database>(),
//!     }
//! });
//!
//! // Build and use the service provider
//! let provider = services.build();
//! let user_service = provider.get_required::<UserService>();
//! assert_eq!(user_service.db.connection_string, "postgres://localhost");
//! ```
//!
//! ## Service Lifetimes
//!
//! - **Singleton**: Created once and shared across the entire application
//! - **PerThread**: Created once per OS thread and reused on that thread
//! - **Transient**: Created fresh on every resolution
//!
//! ## Trait Resolution
//!
//! ```rust
//! use ferrous_container::{ServiceCollection, Resolver};
//! use std::sync::Arc;
//!
//! trait Logger: Send + Sync {
//!     fn log(&self, message: &str);
//! }
//!
//! struct ConsoleLogger;
//! impl Logger for ConsoleLogger {
//!     fn log(&self, message: &str) {
//!         println!("[LOG] {}", message);
//!     }
//! }
//!
//! let mut services = ServiceCollection::new();
//! services.add_singleton_trait::<dyn Logger>(Arc::new(ConsoleLogger));
//!
//! let provider = services.build();
//! let logger = provider.get_required_trait::<dyn Logger>();
//! logger.log("Hello, World!");
//! ```
//!
//! ## Circular Dependencies
//!
//! ```rust
//! use ferrous_container::{DiError, Resolver, ServiceCollection};
//!
//! struct A;
//! struct B;
//!
//! let mut services = ServiceCollection::new();
//! services.add_transient_factory::<A, _>(|r| { r.get_required::<B>(); A });
//! services.add_transient_factory::<B, _>(|r| { r.get_required::<A>(); B });
//!
//! let provider = services.build();
//! match provider.get::<A>() {
//!     Err(DiError::CyclicDependency(path)) => assert_eq!(path.len(), 3),
//!     _ => unreachable!(),
//! }
//! ```

// Module declarations
pub mod collection;
pub mod config;
pub mod container;
pub mod descriptors;
pub mod error;
pub mod generic;
pub mod key;
pub mod lifetime;
pub mod observer;
pub mod provider;
pub mod traits;

// Internal modules
mod internal;
mod registration;

use std::sync::Arc;

// Re-export core types
pub use collection::{ServiceCollection, ServiceCollectionExt, ServiceCollectionModuleExt, ServiceModule};
pub use config::{ContainerConfig, DuplicatePolicy, DEFAULT_MAX_DEPTH, ENV_PREFIX};
pub use container::Container;
pub use descriptors::ServiceDescriptor;
pub use error::{DiError, DiResult};
pub use generic::{ClosedRequest, OpenService};
pub use internal::ResolutionPanic;
pub use key::{key_of_trait, key_of_type, Key};
pub use lifetime::Lifetime;
pub use observer::{DiObserver, LoggingObserver};
pub use provider::{ProviderHandle, ResolverContext, ServiceProvider};
pub use traits::{Resolver, ResolverCore};

// ===== Options Pattern =====

/// Options interface for dependency injection.
///
/// Provides access to an immutable configuration snapshot that is built on
/// first resolution and stays the same for the provider's lifetime.
///
/// # Examples
///
/// ```
/// use ferrous_container::{ServiceCollection, IOptions, Options, Resolver};
///
/// #[derive(Default)]
/// struct AppSettings {
///     name: String,
///     debug: bool,
/// }
///
/// let mut services = ServiceCollection::new();
/// services.add_options::<AppSettings>()
///     .configure(|_r, s| {
///         s.name = "MyApp".to_string();
///         s.debug = true;
///     })
///     .register();
///
/// let provider = services.build();
/// let options = provider.get_required::<Options<AppSettings>>();
/// let settings = options.get();
/// assert_eq!(settings.name, "MyApp");
/// assert!(settings.debug);
/// ```
pub trait IOptions<T>: Send + Sync + 'static {
    /// Gets the configured options instance.
    fn get(&self) -> Arc<T>;
}

/// Immutable options wrapper that implements `IOptions<T>`.
pub struct Options<T> {
    inner: Arc<T>,
}

impl<T> Options<T> {
    /// Creates a new `Options<T>` wrapping the given value.
    pub fn new(value: T) -> Self {
        Self { inner: Arc::new(value) }
    }

    /// Gets a reference to the inner `Arc<T>`.
    pub fn value(&self) -> &Arc<T> {
        &self.inner
    }

    /// Gets a clone of the inner `Arc<T>` containing the configured options.
    pub fn get(&self) -> Arc<T> {
        self.inner.clone()
    }
}

impl<T> IOptions<T> for Options<T>
where
    T: Send + Sync + 'static,
{
    fn get(&self) -> Arc<T> {
        self.inner.clone()
    }
}

type DefaultFn<T> = Arc<dyn Fn() -> T + Send + Sync>;
type ConfigureFn<T> = Arc<dyn Fn(&ResolverContext, &mut T) + Send + Sync>;
type ValidateFn<T> = Arc<dyn Fn(&T) -> Result<(), String> + Send + Sync>;

/// Options builder for configuring options that depend on other services.
///
/// Steps run in this order when `Options<T>` is first resolved: the default
/// maker (or `T::default()`), every `configure`, every `post_configure`, then
/// every `validate`. A failed validation makes the resolution fail with
/// [`DiError::InvalidConfiguration`].
///
/// # Examples
///
/// ```
/// use ferrous_container::{DiError, ServiceCollection, Resolver, Options};
///
/// #[derive(Default)]
/// struct ApiConfig {
///     base_url: String,
///     timeout_ms: u64,
/// }
///
/// let mut services = ServiceCollection::new();
/// services.add_named_singleton("api_base", String::from("https://api.example.com"));
///
/// services.add_options::<ApiConfig>()
///     .default_with(|| ApiConfig {
///         base_url: String::new(),
///         timeout_ms: 5000,
///     })
///     .configure(|resolver, config| {
///         config.base_url = (*resolver.get_named_required::<String>("api_base")).clone();
///     })
///     .post_configure(|_resolver, config| {
///         if !config.base_url.ends_with('/') {
///             config.base_url.push('/');
///         }
///     })
///     .validate(|config| {
///         if config.timeout_ms == 0 {
///             return Err("timeout_ms must be greater than 0".to_string());
///         }
///         Ok(())
///     })
///     .register();
///
/// let provider = services.build();
/// let api_config = provider.get_required::<Options<ApiConfig>>().get();
/// assert_eq!(api_config.base_url, "https://api.example.com/");
/// ```
pub struct OptionsBuilder<'a, T>
where
    T: Default + Send + Sync + 'static,
{
    services: &'a mut ServiceCollection,
    lifetime: Lifetime,
    default_maker: Option<DefaultFn<T>>,
    configures: Vec<ConfigureFn<T>>,
    post_configures: Vec<ConfigureFn<T>>,
    validates: Vec<ValidateFn<T>>,
}

impl<'a, T> OptionsBuilder<'a, T>
where
    T: Default + Send + Sync + 'static,
{
    pub(crate) fn new(services: &'a mut ServiceCollection) -> Self {
        Self {
            services,
            lifetime: Lifetime::Singleton,
            default_maker: None,
            configures: Vec::new(),
            post_configures: Vec::new(),
            validates: Vec::new(),
        }
    }

    /// Provide a custom default value creator (otherwise `T::default()`).
    pub fn default_with<F>(mut self, f: F) -> Self
    where
        F: Fn() -> T + Send + Sync + 'static,
    {
        self.default_maker = Some(Arc::new(f));
        self
    }

    /// Configure options with access to other services.
    ///
    /// Configure callbacks run in the order they were added.
    pub fn configure<F>(mut self, f: F) -> Self
    where
        F: Fn(&ResolverContext, &mut T) + Send + Sync + 'static,
    {
        self.configures.push(Arc::new(f));
        self
    }

    /// Post-configure options after all configure actions have been applied.
    pub fn post_configure<F>(mut self, f: F) -> Self
    where
        F: Fn(&ResolverContext, &mut T) + Send + Sync + 'static,
    {
        self.post_configures.push(Arc::new(f));
        self
    }

    /// Validate the final options after all configuration steps.
    ///
    /// # Examples
    ///
    /// ```
    /// use ferrous_container::{DiError, ServiceCollection, Options, Resolver};
    ///
    /// #[derive(Default)]
    /// struct PoolConfig {
    ///     max_connections: u32,
    /// }
    ///
    /// let mut services = ServiceCollection::new();
    /// services.add_options::<PoolConfig>()
    ///     .validate(|cfg| {
    ///         if cfg.max_connections == 0 {
    ///             Err("max_connections must be > 0".to_string())
    ///         } else {
    ///             Ok(())
    ///         }
    ///     })
    ///     .register();
    ///
    /// let provider = services.build();
    /// assert!(matches!(
    ///     provider.get::<Options<PoolConfig>>(),
    ///     Err(DiError::InvalidConfiguration(_))
    /// ));
    /// ```
    pub fn validate<F>(mut self, f: F) -> Self
    where
        F: Fn(&T) -> Result<(), String> + Send + Sync + 'static,
    {
        self.validates.push(Arc::new(f));
        self
    }

    /// Build the options once per OS thread instead of once per provider.
    ///
    /// Useful for settings that a thread may override locally.
    pub fn per_thread(mut self) -> Self {
        self.lifetime = Lifetime::PerThread;
        self
    }

    /// Registers `Options<T>` with the collection.
    pub fn register(self) -> &'a mut ServiceCollection {
        let Self {
            services,
            lifetime,
            default_maker,
            configures,
            post_configures,
            validates,
        } = self;

        let result = services
            .register::<Options<T>, _>(lifetime, move |resolver| {
                let mut value = match &default_maker {
                    Some(make) => make(),
                    None => T::default(),
                };
                for configure in configures.iter().chain(post_configures.iter()) {
                    configure(resolver, &mut value);
                }
                for validate in &validates {
                    validate(&value).map_err(|message| {
                        DiError::InvalidConfiguration(format!(
                            "Options<{}> validation failed: {}",
                            std::any::type_name::<T>(),
                            message
                        ))
                    })?;
                }
                Ok(Options::new(value))
            })
            .map(|_| ());
        services.record(result)
    }
}

/// Extensions to ServiceCollection for the Options pattern.
impl ServiceCollection {
    pub fn add_options<T>(&mut self) -> OptionsBuilder<'_, T>
    where
        T: Default + Send + Sync + 'static,
    {
        OptionsBuilder::new(self)
    }
}
