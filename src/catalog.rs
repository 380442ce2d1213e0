//! Discovery of controller types.
//!
//! Controllers are registered ahead of time, either at link time with [register_controller]
//! (collected in the [CONTROLLERS] distributed slice and read by [LinkedCatalog]),
//! or explicitly in a [StaticCatalog]. Each registration carries a namespace, a module path
//! such as `my_app::controllers`, and a catalog returns the controllers registered in a namespace
//! or in any of its children. No ordering is guaranteed.
//!
//! [register_controller]: crate::register_controller

use std::any::TypeId;
use std::fmt;

use linkme::distributed_slice;
use tracing::{debug, warn};

use crate::descriptor::Controller;
use crate::{Trellis, WiringError};

/// Controllers registered at link time
#[distributed_slice]
pub static CONTROLLERS: [ControllerType] = [..];

/// Outcome of wiring a controller type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wired {
    Created,
    AlreadyWired,
}

/// Catalog entry for a controller type
#[derive(Clone, Copy)]
pub struct ControllerType {
    namespace: &'static str,
    type_name: fn() -> &'static str,
    type_id: fn() -> TypeId,
    wire: fn(&mut Trellis) -> Result<Wired, WiringError>,
}

impl ControllerType {
    pub const fn of<C: Controller>(namespace: &'static str) -> Self {
        ControllerType {
            namespace,
            type_name: std::any::type_name::<C>,
            type_id: TypeId::of::<C>,
            wire: wire_controller::<C>,
        }
    }

    pub fn namespace(&self) -> &'static str {
        self.namespace
    }

    pub fn type_name(&self) -> &'static str {
        (self.type_name)()
    }

    pub fn type_id(&self) -> TypeId {
        (self.type_id)()
    }

    pub(crate) fn wire(&self, trellis: &mut Trellis) -> Result<Wired, WiringError> {
        (self.wire)(trellis)
    }

    fn belongs_to(&self, namespace: &str) -> bool {
        match self.namespace.strip_prefix(namespace) {
            Some(rest) => rest.is_empty() || rest.starts_with("::"),
            None => false,
        }
    }
}

impl fmt::Debug for ControllerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ControllerType")
            .field("namespace", &self.namespace)
            .field("type_name", &self.type_name())
            .finish()
    }
}

fn wire_controller<C: Controller>(trellis: &mut Trellis) -> Result<Wired, WiringError> {
    if trellis.get_bean::<C>().is_some() {
        return Ok(Wired::AlreadyWired);
    }
    trellis.controller::<C>()?;
    Ok(Wired::Created)
}

/// Source of controller types
pub trait TypeCatalog {
    /// Enumerate the controller types registered under a namespace
    fn discover(&self, namespace: &str) -> Result<Vec<ControllerType>, WiringError>;
}

/// Catalog backed by the [CONTROLLERS] link-time registrations
#[derive(Debug, Default, Clone, Copy)]
pub struct LinkedCatalog;

impl TypeCatalog for LinkedCatalog {
    fn discover(&self, namespace: &str) -> Result<Vec<ControllerType>, WiringError> {
        filter(CONTROLLERS.iter(), namespace)
    }
}

/// Catalog populated explicitly by the host
#[derive(Debug, Default, Clone)]
pub struct StaticCatalog(Vec<ControllerType>);

impl StaticCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<C: Controller>(mut self, namespace: &'static str) -> Self {
        self.0.push(ControllerType::of::<C>(namespace));
        self
    }

    pub fn add(&mut self, controller: ControllerType) {
        self.0.push(controller);
    }
}

impl TypeCatalog for StaticCatalog {
    fn discover(&self, namespace: &str) -> Result<Vec<ControllerType>, WiringError> {
        filter(self.0.iter(), namespace)
    }
}

fn filter<'a>(
    entries: impl Iterator<Item = &'a ControllerType>,
    namespace: &str,
) -> Result<Vec<ControllerType>, WiringError> {
    check_namespace(namespace)?;

    let mut seen = Vec::new();
    let found: Vec<ControllerType> = entries
        .filter(|c| c.belongs_to(namespace))
        .filter(|c| {
            let id = c.type_id();
            if seen.contains(&id) {
                return false;
            }
            seen.push(id);
            true
        })
        .copied()
        .collect();

    if found.is_empty() {
        warn!(namespace, "No controller registered in this namespace");
    } else {
        debug!(namespace, count = found.len(), "Discovered controllers");
    }
    Ok(found)
}

/// A namespace is a `::`-separated path of identifiers
fn check_namespace(namespace: &str) -> Result<(), WiringError> {
    let malformed = |reason: String| WiringError::Discovery {
        namespace: namespace.to_string(),
        reason,
    };

    if namespace.trim().is_empty() {
        return Err(malformed("the namespace is empty".to_string()));
    }
    for segment in namespace.split("::") {
        let mut chars = segment.chars();
        let valid = match chars.next() {
            Some(c) if c == '_' || c.is_alphabetic() => {
                chars.all(|c| c == '_' || c.is_alphanumeric())
            }
            _ => false,
        };
        if !valid {
            return Err(malformed(format!("invalid path segment `{segment}`")));
        }
    }
    Ok(())
}

/// Register controller types in the link-time catalog.
///
/// The namespace defaults to the module path of the invocation site:
///
/// ```ignore
/// register_controller!(MainController, SettingsController);
/// register_controller!(in "my_app::ui"; MainController);
/// ```
#[macro_export]
macro_rules! register_controller {
    (in $namespace:expr; $($controller:ty),+ $(,)?) => {
        $(
        const _: () = {
            #[$crate::__private::linkme::distributed_slice($crate::CONTROLLERS)]
            #[linkme(crate = $crate::__private::linkme)]
            static CONTROLLER: $crate::ControllerType =
                $crate::ControllerType::of::<$controller>($namespace);
        };
        )+
    };
    ($($controller:ty),+ $(,)?) => {
        $crate::register_controller!(in module_path!(); $($controller),+);
    };
}
