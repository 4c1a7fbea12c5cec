//! Circular dependency detection infrastructure.

use std::any::Any;
use std::cell::RefCell;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};

use crate::error::{DiError, DiResult};
use crate::key::Key;

// Thread-local resolution stack for circular dependency detection.
// Entries carry the provider id so independent providers never collide.
thread_local! {
    static RESOLUTION_STACK: RefCell<Vec<(u64, Key)>> = const { RefCell::new(Vec::new()) };
}

/// Panic payload used by `get_required*` to carry a resolution error out of a
/// producer.
///
/// The provider that invoked the producer catches this payload and returns
/// the wrapped error, so a failure deep inside a dependency chain reaches the
/// outermost caller as an ordinary `DiError`.
#[derive(Debug, Clone)]
pub struct ResolutionPanic {
    /// The capability whose resolution failed
    pub service: &'static str,
    /// The underlying error
    pub error: DiError,
}

impl fmt::Display for ResolutionPanic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Failed to resolve {}: {}", self.service, self.error)
    }
}

/// Panics with a resolution failure.
///
/// Inside a producer the payload is a [`ResolutionPanic`] so the enclosing
/// provider can recover the error. Outside any resolution it is a plain
/// message.
pub(crate) fn raise(service: &'static str, error: DiError) -> ! {
    if in_resolution() {
        panic::panic_any(ResolutionPanic { service, error })
    }
    panic!("Failed to resolve {}: {}", service, error)
}

/// Whether a producer is currently running on this thread.
pub(crate) fn in_resolution() -> bool {
    RESOLUTION_STACK
        .try_with(|stack| !stack.borrow().is_empty())
        .unwrap_or(false)
}

/// Guard for managing the thread-local resolution stack
pub(crate) struct ResolutionGuard {
    provider: u64,
}

impl ResolutionGuard {
    /// Pushes `key`, failing if it is already being resolved on this thread
    /// by the same provider or if the stack is `max_depth` deep.
    pub(crate) fn enter(provider: u64, key: &Key, max_depth: usize) -> DiResult<Self> {
        RESOLUTION_STACK.with(|stack| {
            let mut stack = stack.borrow_mut();

            if let Some(start) = stack.iter().position(|(p, k)| *p == provider && k == key) {
                let mut path: Vec<&'static str> = stack[start..]
                    .iter()
                    .filter(|(p, _)| *p == provider)
                    .map(|(_, k)| k.display_name())
                    .collect();
                path.push(key.display_name());
                return Err(DiError::CyclicDependency(path));
            }

            if stack.len() >= max_depth {
                return Err(DiError::DepthExceeded(stack.len()));
            }

            stack.push((provider, key.clone()));
            Ok(Self { provider })
        })
    }
}

impl Drop for ResolutionGuard {
    fn drop(&mut self) {
        let _ = RESOLUTION_STACK.try_with(|stack| {
            let popped = stack.borrow_mut().pop();
            debug_assert!(matches!(popped, Some((p, _)) if p == self.provider));
        });
    }
}

/// Runs a producer, turning a [`ResolutionPanic`] back into its error.
///
/// Any other panic is handed to `on_panic` with its message and re-raised.
pub(crate) fn run_producer<T, F, P>(f: F, on_panic: P) -> DiResult<T>
where
    F: FnOnce() -> DiResult<T>,
    P: FnOnce(&str),
{
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(result) => result,
        Err(payload) => match payload.downcast::<ResolutionPanic>() {
            Ok(resolution) => Err(resolution.error),
            Err(payload) => {
                on_panic(&panic_message(payload.as_ref()));
                panic::resume_unwind(payload)
            }
        },
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&'static str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::key_of_type;

    #[test]
    fn reentering_same_key_reports_path() {
        let a = key_of_type::<u8>();
        let b = key_of_type::<u16>();
        let _ga = ResolutionGuard::enter(1, &a, 16).unwrap();
        let _gb = ResolutionGuard::enter(1, &b, 16).unwrap();

        match ResolutionGuard::enter(1, &a, 16) {
            Err(DiError::CyclicDependency(path)) => assert_eq!(path, vec!["u8", "u16", "u8"]),
            other => panic!("expected cycle, got {:?}", other.err()),
        }
    }

    #[test]
    fn different_providers_do_not_collide() {
        let a = key_of_type::<u8>();
        let _g1 = ResolutionGuard::enter(1, &a, 16).unwrap();
        assert!(ResolutionGuard::enter(2, &a, 16).is_ok());
    }

    #[test]
    fn guard_pops_on_drop() {
        let a = key_of_type::<u8>();
        {
            let _g = ResolutionGuard::enter(7, &a, 16).unwrap();
        }
        assert!(ResolutionGuard::enter(7, &a, 16).is_ok());
    }

    #[test]
    fn depth_limit() {
        let a = key_of_type::<u8>();
        let b = key_of_type::<u16>();
        let _g = ResolutionGuard::enter(3, &a, 1).unwrap();
        assert_eq!(ResolutionGuard::enter(3, &b, 1).err(), Some(DiError::DepthExceeded(1)));
    }

    #[test]
    fn run_producer_recovers_resolution_panic() {
        let _g = ResolutionGuard::enter(4, &key_of_type::<u8>(), 16).unwrap();
        let result: DiResult<()> = run_producer(|| raise("Svc", DiError::Unregistered("Dep")), |_| {});
        assert_eq!(result, Err(DiError::Unregistered("Dep")));
    }

    #[test]
    #[should_panic(expected = "Failed to resolve Svc: Service not registered: Dep")]
    fn raise_outside_resolution_panics_with_message() {
        raise("Svc", DiError::Unregistered("Dep"));
    }

    #[test]
    fn foreign_panics_are_reported_and_resumed() {
        let _g = ResolutionGuard::enter(5, &key_of_type::<u8>(), 16).unwrap();
        let mut seen = String::new();
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            let _: DiResult<()> = run_producer(|| panic!("boom"), |msg| seen = msg.to_string());
        }));
        assert!(outcome.is_err());
        assert_eq!(seen, "boom");
    }
}
