//! Weakly-held event handlers and the client-wide events.

use std::sync::{Arc, Weak};

use ferrous_container::{DiResult, OpenService, Resolver, ResolverContext};
use parking_lot::RwLock;

/// A subscribed event handler. The event only keeps a weak reference, so the
/// subscriber controls how long the handler lives.
pub type Handler<T> = Arc<dyn Fn(&T) + Send + Sync>;

/// Event whose subscriptions do not keep handlers alive.
pub struct WeakEvent<T> {
    handlers: RwLock<Vec<Weak<dyn Fn(&T) + Send + Sync>>>,
}

impl<T> WeakEvent<T> {
    pub fn new() -> Self {
        Self {
            handlers: RwLock::new(Vec::new()),
        }
    }

    pub fn subscribe(&self, handler: &Handler<T>) {
        self.handlers.write().push(Arc::downgrade(handler));
    }

    /// Removes `handler` if it is subscribed.
    pub fn unsubscribe(&self, handler: &Handler<T>) {
        let target = Arc::downgrade(handler);
        self.handlers.write().retain(|h| !Weak::ptr_eq(h, &target));
    }

    /// Invokes every live handler in subscription order and returns how many
    /// ran. Handlers that were dropped are pruned.
    pub fn raise(&self, args: &T) -> usize {
        let live: Vec<Handler<T>> = {
            let mut handlers = self.handlers.write();
            handlers.retain(|h| h.strong_count() > 0);
            handlers.iter().filter_map(Weak::upgrade).collect()
        };
        for handler in &live {
            handler(args);
        }
        live.len()
    }

    /// Number of handlers still alive.
    pub fn handler_count(&self) -> usize {
        self.handlers.read().iter().filter(|h| h.strong_count() > 0).count()
    }
}

impl<T> Default for WeakEvent<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Open generic registration for [`WeakEvent`].
pub struct WeakEvents;

impl OpenService for WeakEvents {
    type Closed<T: Send + Sync + 'static> = WeakEvent<T>;

    fn produce<T: Send + Sync + 'static>(_: &ResolverContext<'_>) -> DiResult<Arc<WeakEvent<T>>> {
        Ok(Arc::new(WeakEvent::new()))
    }
}

/// Raised before a query is sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BeforeQueryArgs {
    pub query_url: String,
}

/// Raised after a query completed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AfterQueryArgs {
    pub query_url: String,
    pub status_code: u16,
}

/// Events shared by every client on every thread.
pub struct ClientEvents {
    before_query: Arc<WeakEvent<BeforeQueryArgs>>,
    after_query: Arc<WeakEvent<AfterQueryArgs>>,
}

impl ClientEvents {
    pub fn new(before_query: Arc<WeakEvent<BeforeQueryArgs>>, after_query: Arc<WeakEvent<AfterQueryArgs>>) -> Self {
        Self {
            before_query,
            after_query,
        }
    }

    pub(crate) fn resolve(r: &ResolverContext<'_>) -> DiResult<Self> {
        Ok(Self::new(
            r.get_closed::<WeakEvents, BeforeQueryArgs>()?,
            r.get_closed::<WeakEvents, AfterQueryArgs>()?,
        ))
    }

    pub fn before_query(&self) -> &WeakEvent<BeforeQueryArgs> {
        &self.before_query
    }

    pub fn after_query(&self) -> &WeakEvent<AfterQueryArgs> {
        &self.after_query
    }

    pub fn raise_before_query(&self, query_url: &str) -> usize {
        tracing::trace!(query_url, "before query");
        self.before_query.raise(&BeforeQueryArgs {
            query_url: query_url.to_string(),
        })
    }

    pub fn raise_after_query(&self, query_url: &str, status_code: u16) -> usize {
        tracing::trace!(query_url, status_code, "after query");
        self.after_query.raise(&AfterQueryArgs {
            query_url: query_url.to_string(),
            status_code,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn dropped_handlers_stop_receiving() {
        let event = WeakEvent::<u32>::new();
        let seen = Arc::new(AtomicUsize::new(0));

        let counter = seen.clone();
        let handler: Handler<u32> = Arc::new(move |n: &u32| {
            counter.fetch_add(*n as usize, Ordering::SeqCst);
        });
        event.subscribe(&handler);

        assert_eq!(event.raise(&2), 1);
        drop(handler);
        assert_eq!(event.raise(&5), 0);
        assert_eq!(seen.load(Ordering::SeqCst), 2);
        assert_eq!(event.handler_count(), 0);
    }

    #[test]
    fn unsubscribe_removes_only_that_handler() {
        let event = WeakEvent::<()>::new();
        let a: Handler<()> = Arc::new(|_: &()| {});
        let b: Handler<()> = Arc::new(|_: &()| {});
        event.subscribe(&a);
        event.subscribe(&b);

        event.unsubscribe(&a);
        assert_eq!(event.handler_count(), 1);
        assert_eq!(event.raise(&()), 1);
    }
}
