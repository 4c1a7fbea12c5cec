use ferrous_container::{
    DiError, DiObserver, Key, Lifetime, LoggingObserver, Resolver, ServiceCollection,
};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

#[derive(Default)]
struct Recorder {
    events: Mutex<Vec<String>>,
}

impl Recorder {
    fn events(&self) -> Vec<String> {
        self.events.lock().clone()
    }
}

impl DiObserver for Recorder {
    fn constructing(&self, key: &Key, lifetime: Lifetime) {
        self.events.lock().push(format!("constructing {} {:?}", key.display_name(), lifetime));
    }

    fn constructed(&self, key: &Key, _lifetime: Lifetime, _duration: Duration) {
        self.events.lock().push(format!("constructed {}", key.display_name()));
    }

    fn factory_panic(&self, key: &Key, message: &str) {
        self.events.lock().push(format!("panic {} {}", key.display_name(), message));
    }

    fn construction_failed(&self, key: &Key, error: &DiError) {
        self.events.lock().push(format!("failed {} {}", key.display_name(), error));
    }
}

#[test]
fn cached_lifetimes_notify_once() {
    let recorder = Arc::new(Recorder::default());
    let mut services = ServiceCollection::new();
    services.add_observer(recorder.clone());
    services.add_singleton_factory::<u32, _>(|_| 1);
    services.add_per_thread_factory::<u64, _>(|_| 2);

    let provider = services.build();
    for _ in 0..3 {
        provider.get_required::<u32>();
        provider.get_required::<u64>();
    }

    assert_eq!(
        recorder.events(),
        vec![
            "constructing u32 Singleton",
            "constructed u32",
            "constructing u64 PerThread",
            "constructed u64",
        ]
    );
}

#[test]
fn nested_constructions_are_reported_inside_out() {
    struct Outer;
    struct Inner;

    let recorder = Arc::new(Recorder::default());
    let mut services = ServiceCollection::new();
    services.add_observer(recorder.clone());
    services.add_transient_factory::<Inner, _>(|_| Inner);
    services.add_transient_factory::<Outer, _>(|r| {
        r.get_required::<Inner>();
        Outer
    });

    services.build().get_required::<Outer>();

    let outer = std::any::type_name::<Outer>();
    let inner = std::any::type_name::<Inner>();
    assert_eq!(
        recorder.events(),
        vec![
            format!("constructing {} Transient", outer),
            format!("constructing {} Transient", inner),
            format!("constructed {}", inner),
            format!("constructed {}", outer),
        ]
    );
}

#[test]
fn failures_are_reported() {
    let recorder = Arc::new(Recorder::default());
    let mut services = ServiceCollection::new();
    services.add_observer(recorder.clone());
    services
        .register::<u8, _>(Lifetime::Transient, |_| {
            Err(DiError::Producer {
                service: "u8",
                message: "offline".to_string(),
            })
        })
        .unwrap();

    assert!(services.build().get::<u8>().is_err());
    assert_eq!(
        recorder.events().last().map(String::as_str),
        Some("failed u8 Producer for u8 failed: offline")
    );
}

#[test]
fn foreign_panics_are_reported_then_propagate() {
    let recorder = Arc::new(Recorder::default());
    let mut services = ServiceCollection::new();
    services.add_observer(recorder.clone());
    services.add_transient_factory::<u16, _>(|_| panic!("bad wiring"));

    let provider = services.build();
    let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| provider.get::<u16>()));

    assert!(outcome.is_err());
    assert!(recorder.events().contains(&"panic u16 bad wiring".to_string()));
}

#[test]
fn logging_observer_can_be_installed() {
    let mut services = ServiceCollection::new();
    services.add_observer(Arc::new(LoggingObserver::with_prefix("test")));
    services.add_singleton_factory::<String, _>(|_| "logged".to_string());

    assert_eq!(&*services.build().get_required::<String>(), "logged");
}
