//! Service lifetime definitions.

/// Service lifetimes controlling instance caching behavior
///
/// # Examples
///
/// ```rust
/// use ferrous_container::{ServiceCollection, Resolver};
/// use std::sync::Arc;
///
/// struct Database { url: String }
/// struct Settings { retries: u32 }
/// struct RequestModel { id: u32 }
///
/// let mut services = ServiceCollection::new();
///
/// // Singleton: one instance for the whole application
/// services.add_singleton(Database { url: "postgres://localhost".to_string() });
///
/// // PerThread: one instance per OS thread
/// services.add_per_thread_factory::<Settings, _>(|_| Settings { retries: 3 });
///
/// // Transient: new instance every time
/// services.add_transient_factory::<RequestModel, _>(|_| RequestModel { id: 12345 });
///
/// let provider = services.build();
///
/// let db1 = provider.get_required::<Database>();
/// let db2 = provider.get_required::<Database>();
/// assert!(Arc::ptr_eq(&db1, &db2));
///
/// let here1 = provider.get_required::<Settings>();
/// let here2 = provider.get_required::<Settings>();
/// assert!(Arc::ptr_eq(&here1, &here2));
///
/// let p = provider.clone();
/// let there = std::thread::spawn(move || p.get_required::<Settings>()).join().unwrap();
/// assert!(!Arc::ptr_eq(&here1, &there));
///
/// let model1 = provider.get_required::<RequestModel>();
/// let model2 = provider.get_required::<RequestModel>();
/// assert!(!Arc::ptr_eq(&model1, &model2));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lifetime {
    /// Single instance per provider, shared by every thread
    ///
    /// Created on first request. Concurrent first requests run the producer
    /// once; every caller observes the same instance.
    Singleton,
    /// Single instance per provider and OS thread
    ///
    /// Each thread lazily creates its own instance and reuses it for every
    /// later request made on that thread. The instance is dropped when the
    /// thread exits. Async tasks that migrate between worker threads may
    /// observe different instances.
    PerThread,
    /// New instance per resolution, never cached
    Transient,
}

impl Lifetime {
    /// Returns true if resolved instances are reused by later resolutions.
    pub fn is_cached(&self) -> bool {
        !matches!(self, Lifetime::Transient)
    }
}
