use tracing::debug;

use crate::descriptor::Descriptor;
use crate::WiringError;

/// Run the initialization hooks of a freshly injected instance.
///
/// Post-construction hooks take precedence: when at least one is declared, all of them run
/// in declaration order and the conventional `initialize` hook is skipped.
/// Returns the number of hooks invoked, zero meaning that no initialization was required.
pub(crate) fn invoke<T: 'static>(
    target: &mut T,
    descriptor: &Descriptor<T>,
) -> Result<usize, WiringError> {
    let type_name = descriptor.type_name();
    let mut invoked = 0;

    for (hook_name, hook) in descriptor.post_construct_hooks() {
        debug!(bean = type_name, hook = hook_name, "Invoking post-construct hook");
        hook(&mut *target).map_err(|source| WiringError::Lifecycle {
            type_name,
            hook: hook_name,
            source,
        })?;
        invoked += 1;
    }
    if invoked > 0 {
        return Ok(invoked);
    }

    if let Some(hook) = descriptor.initialize_hook() {
        debug!(bean = type_name, "Invoking initialize");
        hook(&mut *target).map_err(|source| WiringError::Lifecycle {
            type_name,
            hook: "initialize",
            source,
        })?;
        invoked += 1;
    }
    Ok(invoked)
}
