//! Per-thread instance slots for `Lifetime::PerThread`.
//!
//! Each OS thread owns its own map, so lookups need no cross-thread locking.
//! Slots are keyed by provider id and capability key. A dropped provider can
//! only clear the slots of the thread that drops it; every other thread
//! notices the drop through a generation counter and evicts the dead
//! provider's slots the next time it touches its cache.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};

use once_cell::sync::Lazy;
use parking_lot::RwLock;

use crate::key::Key;
use crate::registration::AnyArc;

type ProviderSlots = HashMap<Key, AnyArc>;

#[derive(Default)]
struct ThreadSlots {
    generation: u64,
    providers: HashMap<u64, ProviderSlots>,
}

thread_local! {
    static THREAD_INSTANCES: RefCell<ThreadSlots> = RefCell::new(ThreadSlots::default());
}

static LIVE_PROVIDERS: Lazy<RwLock<HashSet<u64>>> = Lazy::new(|| RwLock::new(HashSet::new()));
static GENERATION: AtomicU64 = AtomicU64::new(0);

/// Marks `provider` as alive.
pub(crate) fn register_provider(provider: u64) {
    LIVE_PROVIDERS.write().insert(provider);
}

/// Marks `provider` as dropped and clears this thread's slots for it.
pub(crate) fn release_provider(provider: u64) {
    LIVE_PROVIDERS.write().remove(&provider);
    GENERATION.fetch_add(1, Ordering::Release);
    clear(provider);
}

impl ThreadSlots {
    /// Removes the slots of providers dropped since the last sweep.
    fn sweep(&mut self) -> Vec<ProviderSlots> {
        let generation = GENERATION.load(Ordering::Acquire);
        if generation == self.generation {
            return Vec::new();
        }
        self.generation = generation;
        let live = LIVE_PROVIDERS.read();
        let dead: Vec<u64> = self.providers.keys().filter(|id| !live.contains(id)).copied().collect();
        dead.into_iter().filter_map(|id| self.providers.remove(&id)).collect()
    }
}

/// Returns this thread's instance for `key`, if one was created.
pub(crate) fn get(provider: u64, key: &Key) -> Option<AnyArc> {
    // Evicted instances are dropped after the borrow ends, since their
    // destructors may resolve again.
    let (found, _evicted) = THREAD_INSTANCES
        .try_with(|slots| {
            let mut slots = slots.borrow_mut();
            let evicted = slots.sweep();
            let found = slots.providers.get(&provider).and_then(|m| m.get(key)).cloned();
            (found, evicted)
        })
        .ok()?;
    found
}

/// Stores `value` unless this thread already holds an instance, and returns
/// the instance that ends up in the slot.
pub(crate) fn get_or_insert(provider: u64, key: &Key, value: AnyArc) -> AnyArc {
    let outcome = THREAD_INSTANCES.try_with(|slots| {
        let mut slots = slots.borrow_mut();
        let evicted = slots.sweep();
        let stored = slots
            .providers
            .entry(provider)
            .or_default()
            .entry(key.clone())
            .or_insert(value.clone())
            .clone();
        (stored, evicted)
    });
    match outcome {
        Ok((stored, _evicted)) => stored,
        Err(_) => value,
    }
}

/// Drops this thread's instances for `provider`.
pub(crate) fn clear(provider: u64) {
    // Take the map out first so instance destructors run without the borrow held.
    let removed = THREAD_INSTANCES
        .try_with(|slots| slots.borrow_mut().providers.remove(&provider))
        .ok()
        .flatten();
    drop(removed);
}
