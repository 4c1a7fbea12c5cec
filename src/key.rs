//! Capability key types for the dependency injection container.

use std::any::TypeId;
use std::hash::{Hash, Hasher};

/// Key for capability storage and lookup.
///
/// Keys uniquely identify capabilities in the container.
///
/// # Key Types
///
/// - **Type**: Concrete types (structs, enums, primitives)
/// - **Trait**: Trait-object capabilities such as `dyn Logger`
/// - **Named variants**: Both of the above with an additional string name
/// - **Closed**: A closed instantiation of an open generic registration
///
/// # Examples
///
/// ```rust
/// use ferrous_container::{ServiceCollection, Resolver, Key};
/// use std::sync::Arc;
///
/// trait Logger: Send + Sync {
///     fn log(&self, msg: &str);
/// }
///
/// struct ConsoleLogger;
/// impl Logger for ConsoleLogger {
///     fn log(&self, msg: &str) {
///         println!("LOG: {}", msg);
///     }
/// }
///
/// let mut services = ServiceCollection::new();
/// services.add_singleton(42u32);
/// services.add_named_singleton("config_port", 8080u32);
/// services.add_singleton_trait(Arc::new(ConsoleLogger) as Arc<dyn Logger>);
///
/// let provider = services.build();
///
/// assert_eq!(*provider.get_required::<u32>(), 42);
/// assert_eq!(*provider.get_named_required::<u32>("config_port"), 8080);
/// provider.get_required_trait::<dyn Logger>().log("resolved");
/// ```
#[derive(Debug, Clone)]
pub enum Key {
    /// Concrete type key with TypeId and name for diagnostics
    Type(TypeId, &'static str),
    /// Trait-object binding key
    ///
    /// Only stores the trait name, as produced by `std::any::type_name`.
    Trait(&'static str),
    /// Named concrete type key with TypeId, typename, and name
    TypeNamed(TypeId, &'static str, &'static str),
    /// Named trait binding key with trait name and service name
    TraitNamed(&'static str, &'static str),
    /// Closed generic key: open marker TypeId, argument TypeId, closed type name
    Closed(TypeId, TypeId, &'static str),
}

impl Key {
    /// Get the type or trait name for display
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ferrous_container::Key;
    /// use std::any::TypeId;
    ///
    /// let type_key = Key::Type(TypeId::of::<String>(), "alloc::string::String");
    /// assert_eq!(type_key.display_name(), "alloc::string::String");
    ///
    /// let named_key = Key::TypeNamed(TypeId::of::<u32>(), "u32", "port");
    /// assert_eq!(named_key.display_name(), "u32");
    /// ```
    pub fn display_name(&self) -> &'static str {
        match self {
            Key::Type(_, name) => name,
            Key::Trait(name) => name,
            Key::TypeNamed(_, name, _) => name,
            Key::TraitNamed(name, _) => name,
            Key::Closed(_, _, name) => name,
        }
    }

    /// Get the service name for named services, or None for unnamed services
    pub fn service_name(&self) -> Option<&'static str> {
        match self {
            Key::TypeNamed(_, _, name) | Key::TraitNamed(_, name) => Some(name),
            Key::Type(_, _) | Key::Trait(_) | Key::Closed(_, _, _) => None,
        }
    }

    /// Returns true for keys produced by closing an open generic registration.
    pub fn is_closed_generic(&self) -> bool {
        matches!(self, Key::Closed(_, _, _))
    }
}

// Identity is the TypeId (or trait name); display strings are ignored.
impl PartialEq for Key {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Key::Type(a, _), Key::Type(b, _)) => a == b,
            (Key::TypeNamed(a, _, name_a), Key::TypeNamed(b, _, name_b)) => a == b && name_a == name_b,
            (Key::Trait(a), Key::Trait(b)) => a == b,
            (Key::TraitNamed(a, name_a), Key::TraitNamed(b, name_b)) => a == b && name_a == name_b,
            (Key::Closed(open_a, arg_a, _), Key::Closed(open_b, arg_b, _)) => {
                open_a == open_b && arg_a == arg_b
            }
            _ => false,
        }
    }
}

impl Eq for Key {}

impl Hash for Key {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Key::Type(id, _) => {
                0u8.hash(state);
                id.hash(state);
            }
            Key::TypeNamed(id, _, name) => {
                1u8.hash(state);
                id.hash(state);
                name.hash(state);
            }
            Key::Trait(name) => {
                2u8.hash(state);
                name.hash(state);
            }
            Key::TraitNamed(name, named) => {
                3u8.hash(state);
                name.hash(state);
                named.hash(state);
            }
            Key::Closed(open, arg, _) => {
                4u8.hash(state);
                open.hash(state);
                arg.hash(state);
            }
        }
    }
}

/// Key of a concrete capability type.
#[inline]
pub fn key_of_type<T: 'static>() -> Key {
    Key::Type(TypeId::of::<T>(), std::any::type_name::<T>())
}

/// Key of a trait-object capability such as `dyn Logger`.
#[inline]
pub fn key_of_trait<T: ?Sized + 'static>() -> Key {
    Key::Trait(std::any::type_name::<T>())
}
