//! Explicit registration records.
//!
//! Instead of introspecting live objects, every wired type describes itself with a [Descriptor]:
//! a factory playing the role of the no-argument constructor, the list of [InjectionPoint]s
//! with a typed accessor to the [Slot] receiving each value, and the lifecycle hooks to run once
//! injection is complete.

use std::any::{type_name, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::config::ContainerConfig;
use crate::helpers::SlotAccessor;
use crate::resolve::{self, ViewTree};
use crate::views::ViewCache;
use crate::widget::{View, Widget};
use crate::{Trellis, WiringError};

/// A type that can be created and cached as a singleton by the container
pub trait Bean: Send + Sync + Sized + 'static {
    fn descriptor() -> Descriptor<Self>;
}

/// A bean attached to a view, discovered and wired by [Trellis::scan].
///
/// Implementing this trait is what makes a type eligible for registration in a catalog.
pub trait Controller: Bean {
    type View: View;

    /// The root of the view managed by this controller, once injected
    fn view(&self) -> Option<Arc<Self::View>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InjectionKind {
    Service,
    View,
    Control,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cardinality {
    Scalar,
    List,
    KeyedMap,
}

/// Runtime identity of a type, with a readable name for diagnostics
#[derive(Clone, Copy)]
pub struct TypeKey {
    pub id: TypeId,
    pub name: &'static str,
}

impl TypeKey {
    pub fn of<T: ?Sized + 'static>() -> Self {
        TypeKey {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }
}

impl PartialEq for TypeKey {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeKey {}

impl fmt::Debug for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// One field to be filled by the container
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InjectionPoint {
    pub field: &'static str,
    pub kind: InjectionKind,
    /// Service or view type, or widget (element) type for controls
    pub declared: TypeKey,
    pub explicit_id: Option<String>,
    pub cardinality: Cardinality,
}

type ServiceBinder<T> =
    Box<dyn Fn(&mut T, &InjectionPoint, &mut Trellis) -> Result<(), WiringError>>;
type ViewBinder<T> =
    Box<dyn Fn(&mut T, &InjectionPoint, &mut ViewCache) -> Result<ViewTree, WiringError>>;
type ControlBinder<T> = Box<
    dyn Fn(&mut T, &InjectionPoint, &[ViewTree], &ContainerConfig) -> Result<(), WiringError>,
>;
type Hook<T> = Box<dyn Fn(&mut T) -> anyhow::Result<()>>;

enum Binder<T> {
    Service(ServiceBinder<T>),
    View(ViewBinder<T>),
    Control(ControlBinder<T>),
}

struct Binding<T> {
    point: InjectionPoint,
    binder: Binder<T>,
}

/// Registration record of a wired type
pub struct Descriptor<T> {
    type_name: &'static str,
    factory: Box<dyn Fn() -> anyhow::Result<T>>,
    bindings: Vec<Binding<T>>,
    post_construct: Vec<(&'static str, Hook<T>)>,
    initialize: Option<Hook<T>>,
}

impl<T: Default + 'static> Descriptor<T> {
    /// Descriptor using [Default] as constructor
    pub fn from_default() -> Self {
        Self::new(|| Ok(T::default()))
    }
}

impl<T: 'static> Descriptor<T> {
    pub fn new(factory: impl Fn() -> anyhow::Result<T> + 'static) -> Self {
        Self {
            type_name: type_name::<T>(),
            factory: Box::new(factory),
            bindings: Vec::new(),
            post_construct: Vec::new(),
            initialize: None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// All declared injection points, in declaration order
    pub fn injection_points(&self) -> impl Iterator<Item = &InjectionPoint> {
        self.bindings.iter().map(|b| &b.point)
    }

    /// Inject the singleton instance of a service
    pub fn service<S: Bean>(
        mut self,
        field: &'static str,
        slot: SlotAccessor<T, Arc<S>>,
    ) -> Self {
        let point = self.point::<S>(field, InjectionKind::Service, None, Cardinality::Scalar);
        let binder: ServiceBinder<T> = Box::new(move |target, point, trellis| {
            let service = trellis.bean::<S>()?;
            bind(target, slot, service, point)
        });
        self.bindings.push(Binding {
            point,
            binder: Binder::Service(binder),
        });
        self
    }

    /// Inject the shared root of a view, which also becomes a search tree for controls
    pub fn view<V: View>(mut self, field: &'static str, slot: SlotAccessor<T, Arc<V>>) -> Self {
        let point = self.point::<V>(field, InjectionKind::View, None, Cardinality::Scalar);
        let binder: ViewBinder<T> = Box::new(move |target, point, views| {
            let view = views.get_or_create::<V>()?;
            bind(target, slot, Arc::clone(&view), point)?;
            Ok(ViewTree {
                name: type_name::<V>(),
                root: view,
            })
        });
        self.bindings.push(Binding {
            point,
            binder: Binder::View(binder),
        });
        self
    }

    /// Inject a single widget, matched by field name or by type
    pub fn control<W: Widget>(self, field: &'static str, slot: SlotAccessor<T, Arc<W>>) -> Self {
        self.scalar_control(field, None, slot)
    }

    /// Inject a single widget with the given id
    pub fn control_id<W: Widget>(
        self,
        field: &'static str,
        id: &str,
        slot: SlotAccessor<T, Arc<W>>,
    ) -> Self {
        let id = id.trim();
        let explicit = (!id.is_empty()).then(|| id.to_string());
        self.scalar_control(field, explicit, slot)
    }

    /// Inject all widgets of a type
    pub fn controls<W: Widget>(
        mut self,
        field: &'static str,
        slot: SlotAccessor<T, Vec<Arc<W>>>,
    ) -> Self {
        let point = self.point::<W>(field, InjectionKind::Control, None, Cardinality::List);
        let binder: ControlBinder<T> = Box::new(move |target, point, trees, _| {
            let found = resolve::collect_list::<W>(trees);
            debug!(field = point.field, count = found.len(), "Collected controls");
            bind(target, slot, found, point)
        });
        self.bindings.push(Binding {
            point,
            binder: Binder::Control(binder),
        });
        self
    }

    /// Inject all identified widgets of a type, keyed by id
    pub fn control_map<W: Widget>(
        mut self,
        field: &'static str,
        slot: SlotAccessor<T, HashMap<String, Arc<W>>>,
    ) -> Self {
        let point = self.point::<W>(field, InjectionKind::Control, None, Cardinality::KeyedMap);
        let type_name = self.type_name;
        let binder: ControlBinder<T> = Box::new(move |target, point, trees, config| {
            let found = resolve::collect_map::<W>(trees, point, type_name, config)?;
            debug!(field = point.field, count = found.len(), "Collected keyed controls");
            bind(target, slot, found, point)
        });
        self.bindings.push(Binding {
            point,
            binder: Binder::Control(binder),
        });
        self
    }

    /// Declare a post-construction hook.
    /// When at least one is declared, [Self::initialize] is ignored.
    pub fn post_construct(
        mut self,
        name: &'static str,
        hook: impl Fn(&mut T) -> anyhow::Result<()> + 'static,
    ) -> Self {
        self.post_construct.push((name, Box::new(hook)));
        self
    }

    /// Declare the conventional initialization hook
    pub fn initialize(mut self, hook: impl Fn(&mut T) -> anyhow::Result<()> + 'static) -> Self {
        self.initialize = Some(Box::new(hook));
        self
    }

    fn scalar_control<W: Widget>(
        mut self,
        field: &'static str,
        explicit_id: Option<String>,
        slot: SlotAccessor<T, Arc<W>>,
    ) -> Self {
        let point = self.point::<W>(
            field,
            InjectionKind::Control,
            explicit_id,
            Cardinality::Scalar,
        );
        let type_name = self.type_name;
        let binder: ControlBinder<T> = Box::new(move |target, point, trees, _| {
            let found = resolve::find_scalar::<W>(trees, point, type_name)?;
            bind(target, slot, found, point)
        });
        self.bindings.push(Binding {
            point,
            binder: Binder::Control(binder),
        });
        self
    }

    fn point<D: ?Sized + 'static>(
        &self,
        field: &'static str,
        kind: InjectionKind,
        explicit_id: Option<String>,
        cardinality: Cardinality,
    ) -> InjectionPoint {
        InjectionPoint {
            field,
            kind,
            declared: TypeKey::of::<D>(),
            explicit_id,
            cardinality,
        }
    }

    /*
     * Wiring phases, driven by the container in this order
     */

    pub(crate) fn instantiate(&self) -> Result<T, WiringError> {
        (self.factory)().map_err(|source| WiringError::Instantiation {
            type_name: self.type_name,
            source,
        })
    }

    pub(crate) fn inject_services(
        &self,
        target: &mut T,
        trellis: &mut Trellis,
    ) -> Result<(), WiringError> {
        for binding in &self.bindings {
            if let Binder::Service(binder) = &binding.binder {
                binder(&mut *target, &binding.point, &mut *trellis)?;
            }
        }
        Ok(())
    }

    /// Bind the views and return their roots in declaration order
    pub(crate) fn inject_views(
        &self,
        target: &mut T,
        views: &mut ViewCache,
    ) -> Result<Vec<ViewTree>, WiringError> {
        let mut trees = Vec::new();
        for binding in &self.bindings {
            if let Binder::View(binder) = &binding.binder {
                trees.push(binder(&mut *target, &binding.point, &mut *views)?);
            }
        }
        Ok(trees)
    }

    pub(crate) fn inject_controls(
        &self,
        target: &mut T,
        trees: &[ViewTree],
        config: &ContainerConfig,
    ) -> Result<(), WiringError> {
        for binding in &self.bindings {
            if let Binder::Control(binder) = &binding.binder {
                binder(&mut *target, &binding.point, trees, config)?;
            }
        }
        Ok(())
    }

    pub(crate) fn post_construct_hooks(&self) -> impl Iterator<Item = (&'static str, &Hook<T>)> {
        self.post_construct.iter().map(|(name, hook)| (*name, hook))
    }

    pub(crate) fn initialize_hook(&self) -> Option<&Hook<T>> {
        self.initialize.as_ref()
    }
}

impl<T> fmt::Debug for Descriptor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Descriptor")
            .field("type_name", &self.type_name)
            .field(
                "points",
                &self.bindings.iter().map(|b| &b.point).collect::<Vec<_>>(),
            )
            .field(
                "post_construct",
                &self.post_construct.iter().map(|(n, _)| n).collect::<Vec<_>>(),
            )
            .field("initialize", &self.initialize.is_some())
            .finish()
    }
}

/// Write a resolved value in its slot
fn bind<T, V>(
    target: &mut T,
    slot: SlotAccessor<T, V>,
    value: V,
    point: &InjectionPoint,
) -> Result<(), WiringError> {
    slot(target).fill(value).map_err(|_| {
        WiringError::injection(type_name::<T>(), point.field, "the slot is already bound")
    })
}
