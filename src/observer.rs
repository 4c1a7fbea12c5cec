//! Diagnostic observers for dependency injection traceability.
//!
//! Observers receive resolution events synchronously. Keep implementations
//! lightweight; they run on the resolving thread.

use std::sync::Arc;
use std::time::Duration;

use crate::{Key, Lifetime};

/// Observer trait for dependency injection resolution events.
///
/// # Examples
///
/// ```
/// use ferrous_container::{DiObserver, ServiceCollection, Key, Lifetime};
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use std::sync::Arc;
/// use std::time::Duration;
///
/// #[derive(Default)]
/// struct CountingObserver {
///     constructed: AtomicUsize,
/// }
///
/// impl DiObserver for CountingObserver {
///     fn constructing(&self, _key: &Key, _lifetime: Lifetime) {}
///
///     fn constructed(&self, _key: &Key, _lifetime: Lifetime, _duration: Duration) {
///         self.constructed.fetch_add(1, Ordering::SeqCst);
///     }
///
///     fn factory_panic(&self, _key: &Key, _message: &str) {}
/// }
///
/// let observer = Arc::new(CountingObserver::default());
/// let mut services = ServiceCollection::new();
/// services.add_observer(observer.clone());
/// ```
pub trait DiObserver: Send + Sync {
    /// Called before a producer runs.
    fn constructing(&self, key: &Key, lifetime: Lifetime);

    /// Called after a producer returned successfully.
    fn constructed(&self, key: &Key, lifetime: Lifetime, duration: Duration);

    /// Called when a producer panicked with something other than a resolution
    /// error. The panic still propagates after this call.
    fn factory_panic(&self, key: &Key, message: &str);

    /// Called when a producer or one of its dependencies failed.
    fn construction_failed(&self, key: &Key, error: &crate::DiError) {
        let _ = (key, error);
    }
}

/// Container for registered observers.
#[derive(Default, Clone)]
pub(crate) struct Observers {
    observers: Vec<Arc<dyn DiObserver>>,
}

impl Observers {
    pub(crate) fn new() -> Self {
        Self { observers: Vec::new() }
    }

    pub(crate) fn add(&mut self, observer: Arc<dyn DiObserver>) {
        self.observers.push(observer);
    }

    #[inline]
    pub(crate) fn has_observers(&self) -> bool {
        !self.observers.is_empty()
    }

    #[inline]
    pub(crate) fn constructing(&self, key: &Key, lifetime: Lifetime) {
        for observer in &self.observers {
            observer.constructing(key, lifetime);
        }
    }

    #[inline]
    pub(crate) fn constructed(&self, key: &Key, lifetime: Lifetime, duration: Duration) {
        for observer in &self.observers {
            observer.constructed(key, lifetime, duration);
        }
    }

    pub(crate) fn factory_panic(&self, key: &Key, message: &str) {
        for observer in &self.observers {
            observer.factory_panic(key, message);
        }
    }

    pub(crate) fn construction_failed(&self, key: &Key, error: &crate::DiError) {
        for observer in &self.observers {
            observer.construction_failed(key, error);
        }
    }
}

/// Built-in observer that forwards events to `tracing`.
///
/// # Examples
///
/// ```
/// use ferrous_container::{ServiceCollection, LoggingObserver};
/// use std::sync::Arc;
///
/// let mut services = ServiceCollection::new();
/// services.add_observer(Arc::new(LoggingObserver::new()));
/// let provider = services.build();
/// ```
pub struct LoggingObserver {
    prefix: String,
}

impl LoggingObserver {
    pub fn new() -> Self {
        Self {
            prefix: "ferrous-container".to_string(),
        }
    }

    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self { prefix: prefix.into() }
    }
}

impl Default for LoggingObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl DiObserver for LoggingObserver {
    fn constructing(&self, key: &Key, lifetime: Lifetime) {
        tracing::debug!(prefix = %self.prefix, service = key.display_name(), ?lifetime, "constructing");
    }

    fn constructed(&self, key: &Key, lifetime: Lifetime, duration: Duration) {
        tracing::debug!(
            prefix = %self.prefix,
            service = key.display_name(),
            ?lifetime,
            elapsed_us = duration.as_micros() as u64,
            "constructed"
        );
    }

    fn factory_panic(&self, key: &Key, message: &str) {
        tracing::error!(prefix = %self.prefix, service = key.display_name(), panic = message, "factory panicked");
    }

    fn construction_failed(&self, key: &Key, error: &crate::DiError) {
        tracing::warn!(prefix = %self.prefix, service = key.display_name(), %error, "construction failed");
    }
}
