use serde::Deserialize;

/// Tuning knobs of the container.
///
/// All fields have defaults, so a host can deserialize a partial table from its own settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ContainerConfig {
    /// Maximum number of nested bean creations before giving up
    pub max_resolution_depth: usize,
    /// Fail instead of overwriting when two nodes share an id in a keyed map
    pub strict_keyed_maps: bool,
    /// Fail when a wired controller exposes no view
    pub require_controller_view: bool,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            max_resolution_depth: 64,
            strict_keyed_maps: false,
            require_controller_view: false,
        }
    }
}
