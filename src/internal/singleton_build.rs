//! Cross-thread coordination of singleton construction.
//!
//! The resolution stack in `circular` only sees its own thread. Here every
//! singleton under construction records the thread that owns the build, and
//! every thread blocked on someone else's build records what it waits for.
//! Before blocking, a thread follows the owner/waiting chain; reaching itself
//! means the wait could never end, so it reports a cycle instead.

use std::collections::HashMap;
use std::sync::Arc;
use std::thread::{self, ThreadId};

use once_cell::sync::{Lazy, OnceCell};
use parking_lot::{Condvar, Mutex};

use crate::error::{DiError, DiResult};
use crate::key::Key;
use crate::registration::AnyArc;

type Slot = (u64, Key);
type Outcome = Arc<OnceCell<DiResult<AnyArc>>>;

struct Build {
    owner: ThreadId,
    outcome: Outcome,
}

#[derive(Default)]
struct Builds {
    running: HashMap<Slot, Build>,
    waiting: HashMap<ThreadId, Slot>,
}

impl Builds {
    /// The cycle closed by `me` waiting on `slot`, if any.
    fn cycle_through(&self, me: ThreadId, slot: &Slot) -> Option<Vec<&'static str>> {
        let mut path = vec![slot.1.display_name()];
        let mut current = slot;
        for _ in 0..=self.waiting.len() {
            let owner = self.running.get(current)?.owner;
            if owner == me {
                path.push(slot.1.display_name());
                return Some(path);
            }
            current = self.waiting.get(&owner)?;
            path.push(current.1.display_name());
        }
        None
    }
}

static BUILDS: Lazy<Mutex<Builds>> = Lazy::new(|| Mutex::new(Builds::default()));
static FINISHED: Condvar = Condvar::new();

/// Releases a claimed build when the owner finishes or unwinds.
struct Claim {
    slot: Slot,
    outcome: Outcome,
}

impl Drop for Claim {
    fn drop(&mut self) {
        // Only takes effect when the producer unwound before reporting.
        let _ = self.outcome.set(Err(DiError::Producer {
            service: self.slot.1.display_name(),
            message: "producer panicked".to_string(),
        }));
        BUILDS.lock().running.remove(&self.slot);
        FINISHED.notify_all();
    }
}

/// Returns the singleton in `cell`, running `build` on this thread if no
/// other thread is already building it.
///
/// Threads that wait on another thread's build receive that build's
/// outcome, error included. A later resolution retries a failed build.
pub(crate) fn get_or_build<F>(provider: u64, key: &Key, cell: &OnceCell<AnyArc>, build: F) -> DiResult<AnyArc>
where
    F: FnOnce() -> DiResult<AnyArc>,
{
    let me = thread::current().id();
    let slot = (provider, key.clone());

    let claim = {
        let mut builds = BUILDS.lock();
        if let Some(value) = cell.get() {
            return Ok(value.clone());
        }

        match builds.running.get(&slot).map(|running| running.outcome.clone()) {
            Some(outcome) => {
                if let Some(path) = builds.cycle_through(me, &slot) {
                    tracing::debug!(service = key.display_name(), ?path, "cross-thread singleton cycle");
                    return Err(DiError::CyclicDependency(path));
                }
                builds.waiting.insert(me, slot);
                loop {
                    if let Some(result) = outcome.get() {
                        builds.waiting.remove(&me);
                        return result.clone();
                    }
                    FINISHED.wait(&mut builds);
                }
            }
            None => {
                let outcome = Outcome::default();
                builds.running.insert(
                    slot.clone(),
                    Build {
                        owner: me,
                        outcome: outcome.clone(),
                    },
                );
                Claim { slot, outcome }
            }
        }
    };

    let result = build().map(|value| cell.get_or_init(|| value).clone());
    let _ = claim.outcome.set(result.clone());
    drop(claim);
    result
}
