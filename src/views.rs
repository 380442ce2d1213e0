use std::any::type_name;
use std::sync::Arc;

use tracing::debug;

use crate::registry::{TypeMap, TypeMapContent};
use crate::widget::View;
use crate::WiringError;

/// Cache of view roots, one per view type.
///
/// Views are built by their own constructor: nothing is injected into them,
/// so creating a view never re-enters the cache.
#[derive(Default)]
pub(crate) struct ViewCache(TypeMap);

impl ViewCache {
    pub(crate) fn get<V: View>(&self) -> Option<Arc<V>> {
        self.0.ready::<V>()
    }

    pub(crate) fn get_or_create<V: View>(&mut self) -> Result<Arc<V>, WiringError> {
        match self.0.get::<V>() {
            TypeMapContent::Ready(v) => return Ok(v),
            TypeMapContent::Mismatch => {
                return Err(WiringError::injection(
                    type_name::<V>(),
                    "<self>",
                    "the cached view has another type",
                ));
            }
            TypeMapContent::None | TypeMapContent::Resolving => (),
        }

        let view = V::create().map_err(|source| WiringError::Instantiation {
            type_name: type_name::<V>(),
            source,
        })?;
        let view = Arc::new(view);
        self.0.insert(Arc::clone(&view));
        debug!(view = type_name::<V>(), "Created view");
        Ok(view)
    }

    pub(crate) fn len(&self) -> usize {
        self.0.len()
    }
}
