//! Lightweight wiring container for desktop UI controllers, based on explicit registration.
//!
//! # Simple use case
//!
//! ```
//! # use std::sync::Arc;
//! # use trellis::*;
//! // A widget tree: a view is the root node
//! struct Button;
//! impl Widget for Button {}
//!
//! struct MainView {
//!     children: Vec<WidgetRef>,
//! }
//!
//! impl Widget for MainView {
//!     fn children(&self) -> &[WidgetRef] {
//!         &self.children
//!     }
//! }
//!
//! impl View for MainView {
//!     fn create() -> anyhow::Result<Self> {
//!         Ok(MainView { children: vec![Arc::new(Button)] })
//!     }
//! }
//!
//! // A controller describes the fields to fill
//! #[derive(Default)]
//! struct MainController {
//!     view: Slot<Arc<MainView>>,
//!     button: Slot<Arc<Button>>,
//! }
//!
//! impl Bean for MainController {
//!     fn descriptor() -> Descriptor<Self> {
//!         Descriptor::<Self>::from_default()
//!             .view::<MainView>("view", |c| &mut c.view)
//!             .control::<Button>("button", |c| &mut c.button)
//!     }
//! }
//!
//! impl Controller for MainController {
//!     type View = MainView;
//!     fn view(&self) -> Option<Arc<MainView>> {
//!         self.view.get().cloned()
//!     }
//! }
//!
//! # fn main() -> Result<(), WiringError> {
//! let mut trellis = Trellis::with_catalog(
//!     StaticCatalog::new().register::<MainController>("app::controllers"),
//! );
//! trellis.scan("app")?;
//! let controller: Arc<MainController> = trellis.get_bean().unwrap();
//! assert!(controller.button.get().is_some());
//! # Ok(())
//! # }
//! ```
//!
//! # Mechanism
//!
//! Singletons are stored in a type map based on the ```Any``` trait, with one map for beans
//! (services and controllers) and one for views.
//! Instead of runtime reflection, each wired type provides a [Descriptor] through the [Bean] trait:
//! a factory and a list of injection points, each with an accessor to the [Slot] to fill.
//!
//! * A **service** point receives the singleton of another bean, created on demand.
//! * A **view** point receives the shared root of a [View], which also becomes a search tree.
//! * A **control** point receives widgets found in those trees: a single node (by explicit id,
//!   by field name, or as the only node of its type), all nodes of a type, or all identified
//!   nodes of a type keyed by id.
//!
//! Once all points are bound, the post-construction hooks (or else the `initialize` hook) run once.
//!
//! [Trellis::scan] drives this for every [Controller] registered in a namespace of a [TypeCatalog].
//! Dependency cycles are detected and reported as [WiringError::CyclicResolution].

mod catalog;
mod config;
mod container;
mod descriptor;
mod error;
mod helpers;
mod lifecycle;
mod registry;
mod resolve;
mod views;
mod widget;

pub use catalog::{
    ControllerType, LinkedCatalog, StaticCatalog, TypeCatalog, Wired, CONTROLLERS,
};
pub use config::ContainerConfig;
pub use container::{ScanReport, Trellis};
pub use descriptor::{
    Bean, Cardinality, Controller, Descriptor, InjectionKind, InjectionPoint, TypeKey,
};
pub use error::{ResolutionFailure, WiringError};
pub use helpers::{Slot, SlotAccessor};
pub use widget::{AsAny, View, Widget, WidgetRef};

#[doc(hidden)]
pub mod __private {
    pub use linkme;
}
