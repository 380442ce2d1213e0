use std::any::{type_name, Any};
use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::catalog::{LinkedCatalog, TypeCatalog, Wired};
use crate::config::ContainerConfig;
use crate::descriptor::{Bean, Controller};
use crate::lifecycle;
use crate::registry::BeanRegistry;
use crate::views::ViewCache;
use crate::widget::View;
use crate::WiringError;

/// Summary of a call to [Trellis::scan]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanReport {
    /// Controller types found in the namespace
    pub discovered: usize,
    /// Controllers created and wired by this scan
    pub wired: usize,
    /// Controllers which were already wired
    pub skipped: usize,
}

/// Wiring container.
///
/// Holds the bean registry and the view cache for the lifetime of the application.
/// Every operation creating instances takes `&mut self`: scans cannot overlap, and once the
/// scan phase is over the cached singletons can be shared freely.
pub struct Trellis {
    beans: BeanRegistry,
    views: ViewCache,
    catalog: Box<dyn TypeCatalog>,
    config: ContainerConfig,
}

impl Default for Trellis {
    fn default() -> Self {
        Self::new()
    }
}

impl Trellis {
    /// Container discovering the controllers registered with [crate::register_controller]
    pub fn new() -> Self {
        Self::with_catalog(LinkedCatalog)
    }

    pub fn with_catalog(catalog: impl TypeCatalog + 'static) -> Self {
        Self {
            beans: BeanRegistry::default(),
            views: ViewCache::default(),
            catalog: Box::new(catalog),
            config: ContainerConfig::default(),
        }
    }

    pub fn with_config(mut self, config: ContainerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &ContainerConfig {
        &self.config
    }

    /// Discover the controllers of a namespace and wire the ones which are not wired yet.
    ///
    /// Scanning the same namespace again creates nothing new: the caches are never invalidated.
    #[instrument(skip(self), name = "trellis_scan")]
    pub fn scan(&mut self, namespace: &str) -> Result<ScanReport, WiringError> {
        let controllers = self.catalog.discover(namespace)?;
        info!(count = controllers.len(), "Wiring controllers");

        let mut report = ScanReport {
            discovered: controllers.len(),
            ..ScanReport::default()
        };
        for controller in controllers {
            match controller.wire(self)? {
                Wired::Created => report.wired += 1,
                Wired::AlreadyWired => {
                    debug!(controller = controller.type_name(), "Already wired");
                    report.skipped += 1;
                }
            }
        }

        info!(
            wired = report.wired,
            skipped = report.skipped,
            beans = self.beans.len(),
            views = self.views.len(),
            "Scan complete"
        );
        Ok(report)
    }

    /// Obtain the singleton instance of a bean, creating and wiring it on first use.
    pub fn bean<T: Bean>(&mut self) -> Result<Arc<T>, WiringError> {
        self.create::<T>(|_, _| Ok(()))
    }

    /// Obtain a controller, which must pass the view check before being cached
    pub(crate) fn controller<C: Controller>(&mut self) -> Result<Arc<C>, WiringError> {
        self.create::<C>(check_view::<C>)
    }

    /// Obtain the shared instance of a view, creating it on first use.
    pub fn view<V: View>(&mut self) -> Result<Arc<V>, WiringError> {
        self.views.get_or_create::<V>()
    }

    /// Retrieve a bean which has already been created. Never creates anything.
    pub fn get_bean<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        self.beans.get::<T>()
    }

    /// Retrieve a view which has already been created. Never creates anything.
    pub fn get_view<V: View>(&self) -> Option<Arc<V>> {
        self.views.get::<V>()
    }

    fn create<T: Bean>(
        &mut self,
        accept: fn(&T, &ContainerConfig) -> Result<(), WiringError>,
    ) -> Result<Arc<T>, WiringError> {
        if let Some(bean) = self.beans.lookup::<T>()? {
            return Ok(bean);
        }

        self.beans.reserve::<T>(self.config.max_resolution_depth)?;
        let built = self
            .build::<T>()
            .and_then(|bean| accept(&bean, &self.config).map(|()| bean));
        match built {
            Ok(bean) => {
                let bean = Arc::new(bean);
                self.beans.publish(Arc::clone(&bean));
                Ok(bean)
            }
            Err(e) => {
                self.beans.abandon::<T>();
                Err(e)
            }
        }
    }

    /// Run all wiring phases on a new instance: services, views, controls, then lifecycle hooks
    fn build<T: Bean>(&mut self) -> Result<T, WiringError> {
        let descriptor = T::descriptor();
        let mut bean = descriptor.instantiate()?;

        descriptor.inject_services(&mut bean, self)?;
        let trees = descriptor.inject_views(&mut bean, &mut self.views)?;
        descriptor.inject_controls(&mut bean, &trees, &self.config)?;

        let hooks = lifecycle::invoke(&mut bean, &descriptor)?;
        debug!(bean = type_name::<T>(), hooks, "Wired bean");
        Ok(bean)
    }
}

/// A controller exposing no view is only tolerated when the configuration allows it
fn check_view<C: Controller>(controller: &C, config: &ContainerConfig) -> Result<(), WiringError> {
    if controller.view().is_some() {
        return Ok(());
    }
    let type_name = type_name::<C>();
    if config.require_controller_view {
        return Err(WiringError::injection(
            type_name,
            "view",
            "the controller exposes no view",
        ));
    }
    warn!(controller = type_name, "Controller exposes no view");
    Ok(())
}
