//! Singleton storage.
//!
//! A [TypeMap] stores at most one instance of each type, behind the [Any] trait.
//! While a bean is being built its slot is marked as resolving: meeting such a slot again
//! means that the bean depends on itself.

use std::any::{type_name, Any, TypeId};
use std::collections::hash_map::{Entry, HashMap};
use std::sync::Arc;

use tracing::{debug, trace};

use crate::WiringError;

#[derive(Debug)]
enum TypeMapEntry {
    Resolving,
    Ready(Arc<dyn Any + Send + Sync>),
}

pub(crate) enum TypeMapContent<T> {
    None,
    Resolving,
    Mismatch,
    Ready(Arc<T>),
}

/// Store singletons of [Any] type
#[derive(Default)]
pub(crate) struct TypeMap(HashMap<TypeId, TypeMapEntry>);

impl TypeMap {
    /// Retrieve a stored singleton if it exists
    pub(crate) fn get<T: Any + Send + Sync>(&self) -> TypeMapContent<T> {
        match self.0.get(&TypeId::of::<T>()) {
            None => TypeMapContent::None,
            Some(TypeMapEntry::Resolving) => TypeMapContent::Resolving,
            Some(TypeMapEntry::Ready(b)) => match Arc::clone(b).downcast::<T>() {
                Err(_) => TypeMapContent::Mismatch,
                Ok(b) => TypeMapContent::Ready(b),
            },
        }
    }

    /// Retrieve a ready singleton, ignoring slots in any other state
    pub(crate) fn ready<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        match self.get::<T>() {
            TypeMapContent::Ready(v) => Some(v),
            _ => None,
        }
    }

    /// Fill a free spot with the resolving marker
    fn set_resolving<T: Any>(&mut self) -> bool {
        match self.0.entry(TypeId::of::<T>()) {
            Entry::Vacant(v) => {
                v.insert(TypeMapEntry::Resolving);
                true
            }
            Entry::Occupied(_) => false,
        }
    }

    /// Replace the resolving marker (or a free spot) with the finished instance
    pub(crate) fn insert<T: Any + Send + Sync>(&mut self, data: Arc<T>) {
        self.0.insert(TypeId::of::<T>(), TypeMapEntry::Ready(data));
    }

    /// Free a spot that is still resolving
    fn clear_resolving<T: Any>(&mut self) {
        if let Entry::Occupied(o) = self.0.entry(TypeId::of::<T>()) {
            if matches!(o.get(), TypeMapEntry::Resolving) {
                o.remove();
            }
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.0
            .values()
            .filter(|e| matches!(e, TypeMapEntry::Ready(_)))
            .count()
    }
}

/// Cache of services and controllers, with the chain of beans being built
#[derive(Default)]
pub(crate) struct BeanRegistry {
    beans: TypeMap,
    resolving: Vec<&'static str>,
}

impl BeanRegistry {
    pub(crate) fn get<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        self.beans.ready::<T>()
    }

    /// Look for an existing instance, failing if the type is currently being built
    pub(crate) fn lookup<T: Any + Send + Sync>(&self) -> Result<Option<Arc<T>>, WiringError> {
        match self.beans.get::<T>() {
            TypeMapContent::None => Ok(None),
            TypeMapContent::Ready(v) => Ok(Some(v)),
            TypeMapContent::Resolving => Err(WiringError::CyclicResolution {
                type_name: type_name::<T>(),
                chain: self.chain(type_name::<T>()),
            }),
            TypeMapContent::Mismatch => Err(WiringError::injection(
                type_name::<T>(),
                "<self>",
                "the cached instance has another type",
            )),
        }
    }

    /// Reserve the slot of a new bean before resolving its own dependencies
    pub(crate) fn reserve<T: Any>(&mut self, max_depth: usize) -> Result<(), WiringError> {
        let name = type_name::<T>();
        if self.resolving.len() >= max_depth {
            return Err(WiringError::DepthExceeded {
                type_name: name,
                depth: max_depth,
            });
        }
        if !self.beans.set_resolving::<T>() {
            return Err(WiringError::CyclicResolution {
                type_name: name,
                chain: self.chain(name),
            });
        }
        trace!(bean = name, depth = self.resolving.len(), "Resolving bean");
        self.resolving.push(name);
        Ok(())
    }

    /// Store a fully wired bean
    pub(crate) fn publish<T: Any + Send + Sync>(&mut self, bean: Arc<T>) {
        self.resolving.pop();
        self.beans.insert(bean);
        debug!(bean = type_name::<T>(), "Created bean");
    }

    /// Forget a bean whose creation failed
    pub(crate) fn abandon<T: Any>(&mut self) {
        self.resolving.pop();
        self.beans.clear_resolving::<T>();
    }

    pub(crate) fn len(&self) -> usize {
        self.beans.len()
    }

    fn chain(&self, last: &str) -> String {
        let mut chain = self.resolving.join(" -> ");
        if !chain.is_empty() {
            chain.push_str(" -> ");
        }
        chain.push_str(last);
        chain
    }
}
