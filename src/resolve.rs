//! Resolution of widget references inside the view trees of a controller.
//!
//! * Scalar points look in each tree, in declaration order, for the node carrying the explicit id,
//!   or else the node named after the field, or else the only node of the declared type.
//!   The first tree providing a match wins.
//! * List points collect every node of the declared type across all trees.
//! * Keyed-map points collect every identified node of the declared type, keyed by id.
//!
//! Nodes are collected as sets: the same node reached twice (e.g. through a view declared twice)
//! is only kept once. Trees are never modified.

use std::any::type_name;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tracing::{trace, warn};

use crate::config::ContainerConfig;
use crate::descriptor::InjectionPoint;
use crate::widget::{self, Widget, WidgetRef};
use crate::{ResolutionFailure, WiringError};

/// Root of a view bound to the controller being wired
pub(crate) struct ViewTree {
    pub(crate) name: &'static str,
    pub(crate) root: WidgetRef,
}

pub(crate) fn find_scalar<W: Widget>(
    trees: &[ViewTree],
    point: &InjectionPoint,
    owner: &'static str,
) -> Result<Arc<W>, WiringError> {
    for tree in trees {
        let by_id = match &point.explicit_id {
            Some(id) => widget::lookup(&tree.root, id),
            None => widget::lookup(&tree.root, point.field),
        };

        if let Some(node) = by_id {
            trace!(field = point.field, view = tree.name, "Matched control by id");
            return widget::downcast::<W>(node).ok_or_else(|| {
                WiringError::injection(
                    owner,
                    point.field,
                    format!(
                        "node `{}` is not a `{}`",
                        node.id().unwrap_or_default(),
                        type_name::<W>()
                    ),
                )
            });
        }

        // An explicit id is never replaced by a type match
        if point.explicit_id.is_some() {
            continue;
        }

        let mut seen = HashSet::new();
        let candidates: Vec<&WidgetRef> = widget::walk(&tree.root)
            .filter(|n| widget::is_a::<W>(n))
            .filter(|n| seen.insert(widget::node_key(n)))
            .collect();

        match candidates.as_slice() {
            [] => continue,
            [node] => {
                trace!(field = point.field, view = tree.name, "Matched control by type");
                if let Some(found) = widget::downcast::<W>(node) {
                    return Ok(found);
                }
            }
            _ => {
                return Err(WiringError::Resolution {
                    type_name: owner,
                    field: point.field,
                    failure: ResolutionFailure::Ambiguous {
                        widget_type: type_name::<W>(),
                        view: tree.name,
                        count: candidates.len(),
                    },
                });
            }
        }
    }

    Err(WiringError::Resolution {
        type_name: owner,
        field: point.field,
        failure: ResolutionFailure::NotFound {
            widget_type: type_name::<W>(),
        },
    })
}

pub(crate) fn collect_list<W: Widget>(trees: &[ViewTree]) -> Vec<Arc<W>> {
    let mut seen = HashSet::new();
    trees
        .iter()
        .flat_map(|tree| widget::walk(&tree.root))
        .filter(|n| seen.insert(widget::node_key(n)))
        .filter_map(widget::downcast::<W>)
        .collect()
}

/// Collect identified nodes. Distinct nodes sharing an id overwrite each other, last one wins,
/// unless the configuration asks for strict maps.
pub(crate) fn collect_map<W: Widget>(
    trees: &[ViewTree],
    point: &InjectionPoint,
    owner: &'static str,
    config: &ContainerConfig,
) -> Result<HashMap<String, Arc<W>>, WiringError> {
    let mut found: HashMap<String, (usize, Arc<W>)> = HashMap::new();
    for node in trees.iter().flat_map(|tree| widget::walk(&tree.root)) {
        let Some(id) = node.id() else {
            continue;
        };
        let Some(typed) = widget::downcast::<W>(node) else {
            continue;
        };
        let key = widget::node_key(node);
        match found.insert(id.to_string(), (key, typed)) {
            Some((previous, _)) if previous != key => {
                if config.strict_keyed_maps {
                    return Err(WiringError::Resolution {
                        type_name: owner,
                        field: point.field,
                        failure: ResolutionFailure::DuplicateId { id: id.to_string() },
                    });
                }
                warn!(field = point.field, id, "Several nodes share this id, keeping the last one");
            }
            _ => (),
        }
    }
    Ok(found.into_iter().map(|(id, (_, node))| (id, node)).collect())
}
