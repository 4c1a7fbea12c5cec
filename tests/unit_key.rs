/// Unit tests for Key type methods
use ferrous_container::{key_of_trait, key_of_type, Key};
use std::any::TypeId;
use std::collections::HashSet;

#[test]
fn test_key_display_name_type() {
    let key = Key::Type(TypeId::of::<String>(), "alloc::string::String");
    assert_eq!(key.display_name(), "alloc::string::String");
    assert_ne!(key.display_name(), "");
}

#[test]
fn test_key_display_name_trait() {
    let key = Key::Trait("dyn core::fmt::Debug");
    assert_eq!(key.display_name(), "dyn core::fmt::Debug");
}

#[test]
fn test_key_display_name_named() {
    let key = Key::TypeNamed(TypeId::of::<u32>(), "u32", "database_port");
    assert_eq!(key.display_name(), "u32");

    let key = Key::TraitNamed("dyn myapp::Logger", "console_logger");
    assert_eq!(key.display_name(), "dyn myapp::Logger");
}

#[test]
fn test_key_display_name_closed() {
    let key = Key::Closed(TypeId::of::<u8>(), TypeId::of::<String>(), "app::Repository<String>");
    assert_eq!(key.display_name(), "app::Repository<String>");
    assert!(key.is_closed_generic());
    assert_eq!(key.service_name(), None);
}

#[test]
fn test_key_service_name() {
    assert_eq!(key_of_type::<u32>().service_name(), None);
    assert_eq!(key_of_trait::<dyn std::fmt::Debug>().service_name(), None);
    assert_eq!(
        Key::TypeNamed(TypeId::of::<u32>(), "u32", "port").service_name(),
        Some("port")
    );
    assert_eq!(Key::TraitNamed("dyn Log", "file").service_name(), Some("file"));
}

#[test]
fn test_is_closed_generic_only_for_closed_keys() {
    assert!(!key_of_type::<u32>().is_closed_generic());
    assert!(!Key::Trait("dyn Log").is_closed_generic());
    assert!(!Key::TraitNamed("dyn Log", "file").is_closed_generic());
}

#[test]
fn test_key_helpers_use_type_names() {
    assert_eq!(key_of_type::<String>().display_name(), std::any::type_name::<String>());
    assert_eq!(
        key_of_trait::<dyn std::fmt::Debug>().display_name(),
        std::any::type_name::<dyn std::fmt::Debug>()
    );
}

#[test]
fn test_equality_ignores_display_strings() {
    let a = Key::Type(TypeId::of::<u32>(), "u32");
    let b = Key::Type(TypeId::of::<u32>(), "renamed");
    assert_eq!(a, b);

    let c = Key::Closed(TypeId::of::<u8>(), TypeId::of::<u16>(), "one");
    let d = Key::Closed(TypeId::of::<u8>(), TypeId::of::<u16>(), "two");
    assert_eq!(c, d);

    let mut set = HashSet::new();
    set.insert(a);
    assert!(set.contains(&b));
}

#[test]
fn test_distinct_keys_are_distinct() {
    let keys = vec![
        key_of_type::<u32>(),
        key_of_type::<u64>(),
        Key::TypeNamed(TypeId::of::<u32>(), "u32", "a"),
        Key::TypeNamed(TypeId::of::<u32>(), "u32", "b"),
        Key::Trait("dyn Log"),
        Key::TraitNamed("dyn Log", "a"),
        Key::Closed(TypeId::of::<u8>(), TypeId::of::<u32>(), "Repo<u32>"),
        Key::Closed(TypeId::of::<u8>(), TypeId::of::<u64>(), "Repo<u64>"),
    ];

    let unique: HashSet<Key> = keys.iter().cloned().collect();
    assert_eq!(unique.len(), keys.len());
}

#[test]
fn test_named_and_unnamed_never_collide() {
    let unnamed = key_of_type::<u32>();
    let named = Key::TypeNamed(TypeId::of::<u32>(), "u32", "");
    assert_ne!(unnamed, named);
    assert_ne!(Key::Trait("dyn Log"), Key::TraitNamed("dyn Log", ""));
}
