//! Service module system for modular registration.
//!
//! This module provides traits and functionality for organizing service
//! registrations into reusable modules.

use crate::{DiResult, ServiceCollection};

/// A named bundle of registrations.
///
/// Modules are applied to a `ServiceCollection` at startup, either directly
/// through the extension traits below or by [`Container::initialize`](crate::Container::initialize).
///
/// # Example
///
/// ```rust
/// use ferrous_container::{ServiceCollection, ServiceModule, ServiceCollectionExt, DiResult, Resolver};
///
/// #[derive(Default)]
/// struct UserConfig;
///
/// struct UserService;
/// impl UserService {
///     fn new(_config: std::sync::Arc<UserConfig>) -> Self { Self }
/// }
///
/// struct UserModule;
///
/// impl ServiceModule for UserModule {
///     fn name(&self) -> &'static str {
///         "users"
///     }
///
///     fn register_services(&self, services: &mut ServiceCollection) -> DiResult<()> {
///         services.add_singleton(UserConfig::default());
///         services.add_transient_factory::<UserService, _>(|r| {
///             let config = r.get_required::<UserConfig>();
///             UserService::new(config)
///         });
///         Ok(())
///     }
/// }
///
/// # fn main() -> DiResult<()> {
/// let provider = ServiceCollection::new().add_module(UserModule)?.build();
/// let _users = provider.get_required::<UserService>();
/// # Ok(())
/// # }
/// ```
pub trait ServiceModule {
    /// Name used in logs and diagnostics.
    fn name(&self) -> &'static str;

    /// Register this module's services with the ServiceCollection.
    fn register_services(&self, services: &mut ServiceCollection) -> DiResult<()>;
}

/// Extension trait for ServiceCollection that provides module registration capabilities.
pub trait ServiceCollectionExt {
    /// Add a module to the service collection using extension method syntax.
    ///
    /// # Example
    ///
    /// ```rust
    /// use ferrous_container::{ServiceCollection, ServiceCollectionExt, ServiceModule, DiResult};
    ///
    /// struct DatabaseModule;
    /// impl ServiceModule for DatabaseModule {
    ///     fn name(&self) -> &'static str { "database" }
    ///     fn register_services(&self, _: &mut ServiceCollection) -> DiResult<()> { Ok(()) }
    /// }
    ///
    /// struct UserModule;
    /// impl ServiceModule for UserModule {
    ///     fn name(&self) -> &'static str { "users" }
    ///     fn register_services(&self, _: &mut ServiceCollection) -> DiResult<()> { Ok(()) }
    /// }
    ///
    /// # fn main() -> DiResult<()> {
    /// let provider = ServiceCollection::new()
    ///     .add_module(DatabaseModule)?
    ///     .add_module(UserModule)?
    ///     .build();
    /// # Ok(())
    /// # }
    /// ```
    fn add_module<M: ServiceModule>(self, module: M) -> DiResult<Self>
    where
        Self: Sized;
}

impl ServiceCollectionExt for ServiceCollection {
    fn add_module<M: ServiceModule>(mut self, module: M) -> DiResult<Self> {
        apply(&module, &mut self)?;
        Ok(self)
    }
}

/// Fluent module registration that matches the `&mut Self` pattern.
pub trait ServiceCollectionModuleExt {
    /// Add a module to the service collection in-place.
    fn add_module_mut<M: ServiceModule + ?Sized>(&mut self, module: &M) -> DiResult<&mut Self>;
}

impl ServiceCollectionModuleExt for ServiceCollection {
    fn add_module_mut<M: ServiceModule + ?Sized>(&mut self, module: &M) -> DiResult<&mut Self> {
        apply(module, self)?;
        Ok(self)
    }
}

pub(crate) fn apply<M: ServiceModule + ?Sized>(module: &M, services: &mut ServiceCollection) -> DiResult<()> {
    let before = services.len();
    module.register_services(services)?;
    tracing::debug!(
        module = module.name(),
        registered = services.len().saturating_sub(before),
        "module registered"
    );
    Ok(())
}
