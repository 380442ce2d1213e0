//! Read-only abstraction of the component tree of a view.
//!
//! The host toolkit exposes its nodes through the [Widget] trait:
//! an optional id and a list of children.
//! The runtime type of a node is the concrete type implementing [Widget], which is what the
//! control resolver matches against declared field types.

use std::any::Any;
use std::sync::Arc;

/// Upcast helper implemented for every sized `Send + Sync` type
pub trait AsAny: Any + Send + Sync {
    fn as_any(&self) -> &dyn Any;
    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;
}

impl<T: Any + Send + Sync> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}

/// A node in a view's component tree
pub trait Widget: AsAny {
    /// Identifier of the node, unique by convention
    fn id(&self) -> Option<&str> {
        None
    }

    fn children(&self) -> &[WidgetRef] {
        &[]
    }
}

/// Shared handle on a widget node
pub type WidgetRef = Arc<dyn Widget>;

/// Root of a component tree, created once and shared by every controller that declares it.
///
/// Views are self-contained: their constructor builds the whole composite and
/// the container never injects anything into them.
pub trait View: Widget + Sized {
    fn create() -> anyhow::Result<Self>;
}

/// Identity of a node, used to collect nodes as a set
pub(crate) fn node_key(node: &WidgetRef) -> usize {
    Arc::as_ptr(node) as *const () as usize
}

pub(crate) fn is_a<W: Widget>(node: &WidgetRef) -> bool {
    (**node).as_any().is::<W>()
}

/// Recover the concrete type of a node
pub(crate) fn downcast<W: Widget>(node: &WidgetRef) -> Option<Arc<W>> {
    if !is_a::<W>(node) {
        return None;
    }
    AsAny::into_any(Arc::clone(node)).downcast::<W>().ok()
}

/// Depth-first, pre-order walk over a tree, root included
pub(crate) fn walk<'a>(root: &'a WidgetRef) -> Walk<'a> {
    Walk { stack: vec![root] }
}

pub(crate) struct Walk<'a> {
    stack: Vec<&'a WidgetRef>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = &'a WidgetRef;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children().iter().rev());
        Some(node)
    }
}

/// First node carrying the given id
pub(crate) fn lookup<'a>(root: &'a WidgetRef, id: &str) -> Option<&'a WidgetRef> {
    walk(root).find(|n| n.id() == Some(id))
}
