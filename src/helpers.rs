use std::fmt;

use once_cell::sync::OnceCell;

/// A field filled by the container.
///
/// A slot can be written exactly once: the container binds it while wiring the owner
/// and it stays read-only afterwards.
pub struct Slot<T>(OnceCell<T>);

impl<T> Slot<T> {
    pub const fn new() -> Self {
        Slot(OnceCell::new())
    }

    /// The injected value, if the owner has been wired
    pub fn get(&self) -> Option<&T> {
        self.0.get()
    }

    pub fn is_bound(&self) -> bool {
        self.0.get().is_some()
    }

    /// Bind the slot, giving the value back if it was already bound
    pub(crate) fn fill(&mut self, value: T) -> Result<(), T> {
        self.0.set(value)
    }
}

impl<T> Default for Slot<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for Slot<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.get() {
            Some(v) => f.debug_tuple("Slot").field(v).finish(),
            None => f.write_str("Slot(<unbound>)"),
        }
    }
}

/// Accessor to a slot of the target type, used by descriptors instead of field reflection
pub type SlotAccessor<T, V> = fn(&mut T) -> &mut Slot<V>;
