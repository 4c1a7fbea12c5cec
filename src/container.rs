//! Module-driven container with an explicit initialization step.

use once_cell::sync::OnceCell;

use crate::collection::module_system::apply;
use crate::config::ContainerConfig;
use crate::generic::ClosedRequest;
use crate::registration::AnyArc;
use crate::traits::ResolverCore;
use crate::{DiError, DiResult, Key, ProviderHandle, ServiceModule, ServiceProvider};

/// Owner of a provider that is built from modules at startup.
///
/// A container starts Uninitialized. [`initialize`](Self::initialize) runs the
/// given modules against a fresh `ServiceCollection`, builds the provider and
/// moves the container to Initialized. Resolving before that fails with
/// [`DiError::NotInitialized`].
///
/// # Examples
///
/// ```
/// use ferrous_container::{Container, DiError, DiResult, Resolver, ServiceCollection, ServiceModule};
///
/// struct Greetings;
///
/// impl ServiceModule for Greetings {
///     fn name(&self) -> &'static str { "greetings" }
///
///     fn register_services(&self, services: &mut ServiceCollection) -> DiResult<()> {
///         services.add_singleton(String::from("hello"));
///         Ok(())
///     }
/// }
///
/// let container = Container::new();
/// assert_eq!(container.get::<String>().err(), Some(DiError::NotInitialized));
///
/// container.initialize(&Greetings).unwrap();
/// assert_eq!(&*container.get_required::<String>(), "hello");
/// ```
pub struct Container {
    config: ContainerConfig,
    provider: OnceCell<ServiceProvider>,
}

impl Container {
    /// Creates an uninitialized container with the default configuration.
    pub fn new() -> Self {
        Self::with_config(ContainerConfig::default())
    }

    /// Creates an uninitialized container whose collection uses `config`.
    pub fn with_config(config: ContainerConfig) -> Self {
        Self {
            config,
            provider: OnceCell::new(),
        }
    }

    /// Registers `module` and builds the provider.
    ///
    /// Calling this on an initialized container does nothing and returns
    /// `Ok(())`. On error the container stays uninitialized.
    pub fn initialize<M: ServiceModule>(&self, module: &M) -> DiResult<()> {
        self.initialize_all(&[module as &dyn ServiceModule])
    }

    /// Registers every module in order and builds the provider.
    ///
    /// Later modules may replace bindings of earlier ones, subject to the
    /// configured duplicate policy.
    pub fn initialize_all(&self, modules: &[&dyn ServiceModule]) -> DiResult<()> {
        if self.provider.get().is_some() {
            tracing::warn!("container already initialized, ignoring initialize");
            return Ok(());
        }

        let mut initialized_now = false;
        self.provider.get_or_try_init(|| {
            let mut services = crate::ServiceCollection::with_config(self.config.clone());
            for module in modules {
                apply(*module, &mut services)?;
            }
            let provider = services.try_build()?;
            initialized_now = true;
            Ok::<_, DiError>(provider)
        })?;

        if initialized_now {
            tracing::debug!(
                modules = ?modules.iter().map(|m| m.name()).collect::<Vec<_>>(),
                "container initialized"
            );
        } else {
            tracing::warn!("container already initialized, ignoring initialize");
        }
        Ok(())
    }

    /// Whether [`initialize`](Self::initialize) has completed.
    pub fn is_initialized(&self) -> bool {
        self.provider.get().is_some()
    }

    /// The provider, once initialized.
    pub fn provider(&self) -> DiResult<&ServiceProvider> {
        self.provider.get().ok_or(DiError::NotInitialized)
    }
}

impl Default for Container {
    fn default() -> Self {
        Self::new()
    }
}

impl ResolverCore for Container {
    fn resolve_any(&self, key: &Key) -> DiResult<AnyArc> {
        self.provider()?.resolve_any(key)
    }

    fn resolve_closed(&self, request: &ClosedRequest) -> DiResult<AnyArc> {
        self.provider()?.resolve_closed(request)
    }

    fn handle(&self) -> DiResult<ProviderHandle> {
        self.provider()?.handle()
    }
}
