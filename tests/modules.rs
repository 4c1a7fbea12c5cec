/// Tests for the modular service registration system
///
/// This test suite verifies that the ServiceModule trait, the extension trait
/// pattern and the module-driven Container work together for organizing
/// service registrations.
use ferrous_container::{
    Container, ContainerConfig, DiError, DiResult, DuplicatePolicy, Resolver, ResolverCore, ServiceCollection,
    ServiceCollectionExt, ServiceCollectionModuleExt, ServiceModule,
};
use std::sync::Arc;

// ===== Test Services =====

#[derive(Debug, Clone)]
struct Config {
    name: String,
    value: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            name: "test-config".to_string(),
            value: 42,
        }
    }
}

#[derive(Debug)]
struct DatabaseService {
    config: Arc<Config>,
    connection_id: String,
}

impl DatabaseService {
    fn new(config: Arc<Config>) -> Self {
        Self {
            connection_id: format!("conn-{}", config.value),
            config,
        }
    }

    fn get_data(&self) -> String {
        format!("Data from {} ({})", self.config.name, self.connection_id)
    }
}

#[derive(Debug)]
struct CacheService {
    cache_size: usize,
}

impl Default for CacheService {
    fn default() -> Self {
        Self { cache_size: 100 }
    }
}

impl CacheService {
    fn get(&self, key: &str) -> String {
        format!("Cached[{}]: {} (size: {})", key, "value", self.cache_size)
    }
}

#[derive(Debug)]
struct BusinessService {
    db: Arc<DatabaseService>,
    cache: Arc<CacheService>,
}

impl BusinessService {
    fn new(db: Arc<DatabaseService>, cache: Arc<CacheService>) -> Self {
        Self { db, cache }
    }

    fn process(&self) -> String {
        format!("{} | {}", self.db.get_data(), self.cache.get("test"))
    }
}

// ===== Modules using ServiceModule trait =====

struct ConfigModule;

impl ServiceModule for ConfigModule {
    fn name(&self) -> &'static str {
        "config"
    }

    fn register_services(&self, services: &mut ServiceCollection) -> DiResult<()> {
        services.add_singleton(Config::default());
        Ok(())
    }
}

struct DatabaseModule;

impl ServiceModule for DatabaseModule {
    fn name(&self) -> &'static str {
        "database"
    }

    fn register_services(&self, services: &mut ServiceCollection) -> DiResult<()> {
        services.add_singleton_factory::<DatabaseService, _>(|r| {
            let config = r.get_required::<Config>();
            DatabaseService::new(config)
        });
        Ok(())
    }
}

struct CacheModule {
    cache_size: usize,
}

impl CacheModule {
    fn with_size(cache_size: usize) -> Self {
        Self { cache_size }
    }
}

impl ServiceModule for CacheModule {
    fn name(&self) -> &'static str {
        "cache"
    }

    fn register_services(&self, services: &mut ServiceCollection) -> DiResult<()> {
        services.add_singleton(CacheService {
            cache_size: self.cache_size,
        });
        Ok(())
    }
}

struct BusinessModule;

impl ServiceModule for BusinessModule {
    fn name(&self) -> &'static str {
        "business"
    }

    fn register_services(&self, services: &mut ServiceCollection) -> DiResult<()> {
        services.add_per_thread_factory::<BusinessService, _>(|r| {
            let db = r.get_required::<DatabaseService>();
            let cache = r.get_required::<CacheService>();
            BusinessService::new(db, cache)
        });
        Ok(())
    }
}

/// Uses the fallible registration API and propagates its error.
struct StrictModule;

impl ServiceModule for StrictModule {
    fn name(&self) -> &'static str {
        "strict"
    }

    fn register_services(&self, services: &mut ServiceCollection) -> DiResult<()> {
        services.register::<CacheService, _>(ferrous_container::Lifetime::Singleton, |_| {
            Ok(CacheService::default())
        })?;
        Ok(())
    }
}

// ===== Extension trait modules =====

trait DatabaseExtension {
    fn add_database(self) -> Self;
}

impl DatabaseExtension for ServiceCollection {
    fn add_database(mut self) -> Self {
        self.add_singleton_factory::<DatabaseService, _>(|r| {
            let config = r.get_required::<Config>();
            DatabaseService::new(config)
        });
        self
    }
}

trait CacheExtension {
    fn add_cache(self) -> Self;
    fn add_cache_with_size(self, size: usize) -> Self;
}

impl CacheExtension for ServiceCollection {
    fn add_cache(mut self) -> Self {
        self.add_singleton(CacheService::default());
        self
    }

    fn add_cache_with_size(mut self, size: usize) -> Self {
        self.add_singleton(CacheService { cache_size: size });
        self
    }
}

// ===== Tests =====

#[test]
fn test_service_module_trait_registration() {
    let mut services = ServiceCollection::new();
    services.add_singleton(Config::default());
    services.add_module_mut(&DatabaseModule).unwrap();
    services.add_module_mut(&CacheModule::with_size(200)).unwrap();
    services.add_module_mut(&BusinessModule).unwrap();

    let provider = services.build();
    let result = provider.get_required::<BusinessService>().process();

    assert!(result.contains("test-config"));
    assert!(result.contains("conn-42"));
    assert!(result.contains("size: 200"));
}

#[test]
fn test_extension_trait_registration() {
    let mut services = ServiceCollection::new();
    services = services.add_database().add_cache_with_size(300);
    services.add_singleton(Config {
        name: "extension-config".to_string(),
        value: 99,
    });

    let provider = services.build();
    let db = provider.get_required::<DatabaseService>();
    let cache = provider.get_required::<CacheService>();

    assert_eq!(db.get_data(), "Data from extension-config (conn-99)");
    assert_eq!(cache.cache_size, 300);
}

#[test]
fn test_chained_add_module() {
    let provider = ServiceCollection::new()
        .add_module(ConfigModule)
        .unwrap()
        .add_module(DatabaseModule)
        .unwrap()
        .add_cache()
        .add_module(BusinessModule)
        .unwrap()
        .build();

    let business = provider.get_required::<BusinessService>();
    assert!(business.process().contains("size: 100"));
}

#[test]
fn test_module_error_propagates() {
    let mut services = ServiceCollection::with_policy(DuplicatePolicy::Reject);
    services.add_module_mut(&CacheModule::with_size(10)).unwrap();

    let err = services.add_module_mut(&StrictModule).unwrap_err();
    assert_eq!(err, DiError::DuplicateRegistration(std::any::type_name::<CacheService>()));
}

#[test]
fn test_module_order_decides_replacement() {
    let mut services = ServiceCollection::new();
    services.add_module_mut(&CacheModule::with_size(1)).unwrap();
    services.add_module_mut(&CacheModule::with_size(2)).unwrap();

    let provider = services.build();
    assert_eq!(provider.get_required::<CacheService>().cache_size, 2);
}

#[test]
fn test_trait_object_modules() {
    let modules: Vec<Box<dyn ServiceModule>> = vec![
        Box::new(ConfigModule),
        Box::new(DatabaseModule),
        Box::new(CacheModule::with_size(64)),
        Box::new(BusinessModule),
    ];

    let mut services = ServiceCollection::new();
    for module in &modules {
        services.add_module_mut(module.as_ref()).unwrap();
    }

    let provider = services.build();
    assert!(provider.get_required::<BusinessService>().process().contains("size: 64"));
}

#[test]
fn test_container_lifecycle() {
    let container = Container::new();
    assert!(!container.is_initialized());
    assert_eq!(container.get::<Config>().err(), Some(DiError::NotInitialized));
    assert!(container.provider().is_err());

    container
        .initialize_all(&[&ConfigModule, &DatabaseModule, &CacheModule::with_size(8), &BusinessModule])
        .unwrap();

    assert!(container.is_initialized());
    let business = container.get_required::<BusinessService>();
    assert!(business.process().contains("conn-42"));

    // Singletons resolved through the container and its provider agree.
    let provider = container.provider().unwrap();
    assert!(Arc::ptr_eq(
        &provider.get_required::<DatabaseService>(),
        &container.get_required::<DatabaseService>()
    ));
}

#[test]
fn test_container_reinitialize_is_noop() {
    let container = Container::new();
    container.initialize(&CacheModule::with_size(1)).unwrap();
    container.initialize(&CacheModule::with_size(2)).unwrap();

    assert_eq!(container.get_required::<CacheService>().cache_size, 1);
}

#[test]
fn test_container_failure_leaves_it_uninitialized() {
    let config = ContainerConfig::default().with_duplicate_policy(DuplicatePolicy::Reject);
    let container = Container::with_config(config);

    let result = container.initialize_all(&[&CacheModule::with_size(1), &StrictModule]);
    assert!(matches!(result, Err(DiError::DuplicateRegistration(_))));
    assert!(!container.is_initialized());

    container.initialize(&CacheModule::with_size(3)).unwrap();
    assert_eq!(container.get_required::<CacheService>().cache_size, 3);
}

#[test]
fn test_container_hands_out_provider_handles() {
    struct NeedsHandle {
        handle: ferrous_container::ProviderHandle,
    }

    struct HandleModule;

    impl ServiceModule for HandleModule {
        fn name(&self) -> &'static str {
            "handles"
        }

        fn register_services(&self, services: &mut ServiceCollection) -> DiResult<()> {
            services.add_singleton(Config::default());
            services.register::<NeedsHandle, _>(ferrous_container::Lifetime::Singleton, |r| {
                Ok(NeedsHandle { handle: r.handle()? })
            })?;
            Ok(())
        }
    }

    let container = Container::new();
    container.initialize(&HandleModule).unwrap();

    let holder = container.get_required::<NeedsHandle>();
    assert_eq!(holder.handle.get_required::<Config>().value, 42);
}
