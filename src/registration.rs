//! Service registration types.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

use once_cell::sync::OnceCell;

use crate::config::DuplicatePolicy;
use crate::descriptors::ServiceDescriptor;
use crate::error::{DiError, DiResult};
use crate::key::Key;
use crate::lifetime::Lifetime;

// ResolverContext is defined in provider module
pub(crate) use crate::provider::ResolverContext;

// Type-erased Arc for storage
pub(crate) type AnyArc = Arc<dyn Any + Send + Sync>;

/// Type-erased producer.
pub(crate) type Ctor = Arc<dyn for<'a> Fn(&ResolverContext<'a>) -> DiResult<AnyArc> + Send + Sync>;

/// Service registration with lifetime and producer
pub(crate) struct Registration {
    pub(crate) lifetime: Lifetime,
    pub(crate) ctor: Ctor,
    /// Implementation type name for diagnostics
    pub(crate) impl_name: Option<&'static str>,
    /// Process-wide slot, only ever filled for `Lifetime::Singleton`
    pub(crate) singleton: OnceCell<AnyArc>,
}

impl Registration {
    pub(crate) fn new(lifetime: Lifetime, ctor: Ctor, impl_name: Option<&'static str>) -> Self {
        Self {
            lifetime,
            ctor,
            impl_name,
            singleton: OnceCell::new(),
        }
    }
}

/// Open generic registration; closed forms are materialized at resolve time.
#[derive(Debug, Clone, Copy)]
pub(crate) struct OpenRegistration {
    pub(crate) lifetime: Lifetime,
    pub(crate) name: &'static str,
}

/// Service registry holding all registrations
pub(crate) struct Registry {
    pub(crate) one: HashMap<Key, Registration>,
    pub(crate) open: HashMap<TypeId, OpenRegistration>,
    pub(crate) policy: DuplicatePolicy,
}

impl Registry {
    pub(crate) fn new(policy: DuplicatePolicy) -> Self {
        Self {
            one: HashMap::new(),
            open: HashMap::new(),
            policy,
        }
    }

    /// Inserts a registration, honoring the duplicate policy.
    pub(crate) fn insert(&mut self, key: Key, registration: Registration) -> DiResult<()> {
        if self.one.contains_key(&key) {
            match self.policy {
                DuplicatePolicy::Reject => {
                    return Err(DiError::DuplicateRegistration(key.display_name()));
                }
                DuplicatePolicy::Replace => {
                    tracing::debug!(service = key.display_name(), "replacing existing registration");
                }
            }
        }
        self.one.insert(key, registration);
        Ok(())
    }

    /// Inserts an open generic registration, honoring the duplicate policy.
    pub(crate) fn insert_open(&mut self, open: TypeId, registration: OpenRegistration) -> DiResult<()> {
        if self.open.contains_key(&open) {
            match self.policy {
                DuplicatePolicy::Reject => {
                    return Err(DiError::DuplicateRegistration(registration.name));
                }
                DuplicatePolicy::Replace => {
                    tracing::debug!(service = registration.name, "replacing existing open generic registration");
                }
            }
        }
        self.open.insert(open, registration);
        Ok(())
    }

    #[inline]
    pub(crate) fn get(&self, key: &Key) -> Option<&Registration> {
        self.one.get(key)
    }

    #[inline]
    pub(crate) fn get_open(&self, open: &TypeId) -> Option<&OpenRegistration> {
        self.open.get(open)
    }

    #[inline]
    pub(crate) fn contains_key(&self, key: &Key) -> bool {
        self.one.contains_key(key)
    }

    /// Describes the binding for `key`, including open generic markers.
    pub(crate) fn descriptor(&self, key: &Key) -> Option<ServiceDescriptor> {
        if let Some(reg) = self.one.get(key) {
            return Some(ServiceDescriptor {
                key: key.clone(),
                lifetime: reg.lifetime,
                impl_type_name: reg.impl_name,
                open_generic: false,
            });
        }
        match key {
            Key::Type(id, _) => self.open.get(id).map(|open| open_descriptor(*id, open)),
            _ => None,
        }
    }

    pub(crate) fn descriptors(&self) -> Vec<ServiceDescriptor> {
        let mut out: Vec<ServiceDescriptor> = self
            .one
            .iter()
            .map(|(key, reg)| ServiceDescriptor {
                key: key.clone(),
                lifetime: reg.lifetime,
                impl_type_name: reg.impl_name,
                open_generic: false,
            })
            .collect();
        out.extend(self.open.iter().map(|(id, open)| open_descriptor(*id, open)));
        out
    }
}

fn open_descriptor(id: TypeId, open: &OpenRegistration) -> ServiceDescriptor {
    ServiceDescriptor {
        key: Key::Type(id, open.name),
        lifetime: open.lifetime,
        impl_type_name: None,
        open_generic: true,
    }
}
