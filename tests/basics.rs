use ferrous_container::{DiError, Lifetime, Resolver, ServiceCollection};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[test]
fn test_concrete_singleton() {
    let mut sc = ServiceCollection::new();
    sc.add_singleton(42usize);
    sc.add_singleton("hello".to_string());

    let sp = sc.build();

    let num1 = sp.get_required::<usize>();
    let num2 = sp.get_required::<usize>();
    let str1 = sp.get_required::<String>();
    let str2 = sp.get_required::<String>();

    assert_eq!(*num1, 42);
    assert_eq!(*str1, "hello");
    assert!(Arc::ptr_eq(&num1, &num2));
    assert!(Arc::ptr_eq(&str1, &str2));
}

#[test]
fn test_factory_with_dependencies() {
    #[derive(Debug)]
    struct Config {
        port: u16,
    }

    #[derive(Debug)]
    struct Server {
        config: Arc<Config>,
        name: String,
    }

    let mut sc = ServiceCollection::new();
    sc.add_singleton(Config { port: 8080 });
    sc.add_singleton_factory::<Server, _>(|r| Server {
        config: r.get_required::<Config>(),
        name: "MyServer".to_string(),
    });

    let sp = sc.build();
    let server = sp.get_required::<Server>();

    assert_eq!(server.config.port, 8080);
    assert_eq!(server.name, "MyServer");
}

#[test]
fn test_transient_creates_new_instances() {
    let counter = Arc::new(AtomicUsize::new(0));
    let counter_clone = counter.clone();

    let mut sc = ServiceCollection::new();
    sc.add_transient_factory::<String, _>(move |_| {
        let n = counter_clone.fetch_add(1, Ordering::SeqCst) + 1;
        format!("instance-{}", n)
    });

    let sp = sc.build();
    let s1 = sp.get_required::<String>();
    let s2 = sp.get_required::<String>();

    assert_eq!(*s1, "instance-1");
    assert_eq!(*s2, "instance-2");
    assert!(!Arc::ptr_eq(&s1, &s2));
    assert_eq!(counter.load(Ordering::SeqCst), 2);
}

#[test]
fn test_singleton_factory_runs_once() {
    let calls = Arc::new(AtomicUsize::new(0));
    let calls_clone = calls.clone();

    let mut sc = ServiceCollection::new();
    sc.add_singleton_factory::<Vec<u8>, _>(move |_| {
        calls_clone.fetch_add(1, Ordering::SeqCst);
        vec![1, 2, 3]
    });

    let sp = sc.build();
    for _ in 0..5 {
        assert_eq!(sp.get_required::<Vec<u8>>().len(), 3);
    }
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_trait_single_binding() {
    trait Greeter: Send + Sync {
        fn greet(&self) -> String;
    }

    struct English;
    impl Greeter for English {
        fn greet(&self) -> String {
            "hello".to_string()
        }
    }

    struct French;
    impl Greeter for French {
        fn greet(&self) -> String {
            "bonjour".to_string()
        }
    }

    let mut sc = ServiceCollection::new();
    sc.add_singleton_trait(Arc::new(English) as Arc<dyn Greeter>);
    sc.add_transient_trait_factory::<dyn Greeter, _>(|_| Arc::new(French));

    // Last registration wins under the default policy.
    let sp = sc.build();
    assert_eq!(sp.get_required_trait::<dyn Greeter>().greet(), "bonjour");
}

#[test]
fn test_named_services() {
    let mut sc = ServiceCollection::new();
    sc.add_named_singleton("primary", 1u16);
    sc.add_named_singleton("replica", 2u16);
    sc.add_named_factory::<String, _>("region", Lifetime::Transient, |_| "eu-west".to_string());

    let sp = sc.build();
    assert_eq!(*sp.get_named_required::<u16>("primary"), 1);
    assert_eq!(*sp.get_named_required::<u16>("replica"), 2);
    assert_eq!(&*sp.get_named_required::<String>("region"), "eu-west");
    assert_eq!(sp.get::<u16>().err(), Some(DiError::Unregistered("u16")));
}

#[test]
fn test_named_traits() {
    trait Store: Send + Sync {
        fn kind(&self) -> &'static str;
    }
    struct Memory;
    impl Store for Memory {
        fn kind(&self) -> &'static str {
            "memory"
        }
    }
    struct Disk;
    impl Store for Disk {
        fn kind(&self) -> &'static str {
            "disk"
        }
    }

    let mut sc = ServiceCollection::new();
    sc.add_named_singleton_trait("cache", Arc::new(Memory) as Arc<dyn Store>);
    sc.add_named_trait_factory::<dyn Store, _>("archive", Lifetime::Singleton, |_| Arc::new(Disk));

    let sp = sc.build();
    assert_eq!(sp.get_named_trait_required::<dyn Store>("cache").kind(), "memory");
    assert_eq!(sp.get_named_trait_required::<dyn Store>("archive").kind(), "disk");
    assert!(sp.get_trait::<dyn Store>().is_err());
}

#[test]
fn test_unregistered_always_errors() {
    let sp = ServiceCollection::new().build();
    for _ in 0..3 {
        assert!(matches!(sp.get::<String>(), Err(DiError::Unregistered(_))));
    }
}

#[test]
#[should_panic(expected = "Failed to resolve")]
fn test_get_required_panics_on_unregistered() {
    let sp = ServiceCollection::new().build();
    let _ = sp.get_required::<String>();
}

#[test]
fn test_required_failure_inside_producer_becomes_error() {
    struct Needy;
    struct Missing;

    let mut sc = ServiceCollection::new();
    sc.add_transient_factory::<Needy, _>(|r| {
        r.get_required::<Missing>();
        Needy
    });

    let sp = sc.build();
    assert_eq!(sp.get::<Needy>().err(), Some(DiError::Unregistered(std::any::type_name::<Missing>())));
}

#[test]
fn test_fallible_producer_error_is_returned() {
    let mut sc = ServiceCollection::new();
    sc.register::<u64, _>(Lifetime::Transient, |_| {
        Err(DiError::Producer {
            service: "u64",
            message: "backend unavailable".to_string(),
        })
    })
    .unwrap();

    let sp = sc.build();
    let err = sp.get::<u64>().unwrap_err();
    assert_eq!(err.to_string(), "Producer for u64 failed: backend unavailable");
}

#[test]
fn test_get_owned_for_transient_only() {
    let mut sc = ServiceCollection::new();
    sc.add_transient_factory::<Vec<u32>, _>(|_| vec![7]);
    sc.add_per_thread_factory::<String, _>(|_| "cached".to_string());

    let sp = sc.build();
    let mut owned = sp.get_owned::<Vec<u32>>().unwrap();
    owned.push(8);
    assert_eq!(owned, vec![7, 8]);
    assert_eq!(sp.get_owned::<String>().err(), Some(DiError::SharedInstance(std::any::type_name::<String>())));
}

#[test]
fn test_provider_clone_shares_singletons() {
    let mut sc = ServiceCollection::new();
    sc.add_singleton_factory::<String, _>(|_| "shared".to_string());

    let sp = sc.build();
    let clone = sp.clone();
    assert!(Arc::ptr_eq(&sp.get_required::<String>(), &clone.get_required::<String>()));
}

#[test]
fn test_independent_providers_do_not_share_singletons() {
    let build = || {
        let mut sc = ServiceCollection::new();
        sc.add_singleton_factory::<String, _>(|_| "own".to_string());
        sc.build()
    };
    let a = build();
    let b = build();
    assert!(!Arc::ptr_eq(&a.get_required::<String>(), &b.get_required::<String>()));
}
