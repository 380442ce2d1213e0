use std::fmt;

use thiserror::Error;

/// Errors triggered during the wiring process
///
/// All of them are fatal: the container never retries and never exposes a partially wired instance.
#[derive(Error, Debug)]
pub enum WiringError {
    #[error("Cannot enumerate namespace `{namespace}`: {reason}")]
    Discovery { namespace: String, reason: String },

    #[error("Failed to instantiate `{type_name}`")]
    Instantiation {
        type_name: &'static str,
        #[source]
        source: anyhow::Error,
    },

    #[error("Cannot inject field `{field}` of `{type_name}`: {reason}")]
    Injection {
        type_name: &'static str,
        field: &'static str,
        reason: String,
    },

    #[error("Cannot resolve control `{field}` of `{type_name}`: {failure}")]
    Resolution {
        type_name: &'static str,
        field: &'static str,
        failure: ResolutionFailure,
    },

    #[error("Hook `{hook}` of `{type_name}` failed")]
    Lifecycle {
        type_name: &'static str,
        hook: &'static str,
        #[source]
        source: anyhow::Error,
    },

    #[error("Cyclic dependencies: `{type_name}` is already being resolved ({chain})")]
    CyclicResolution {
        type_name: &'static str,
        chain: String,
    },

    #[error("Resolution depth {depth} exceeded while creating `{type_name}`")]
    DepthExceeded {
        type_name: &'static str,
        depth: usize,
    },
}

/// Reason why a control injection point could not be bound
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionFailure {
    /// No node matched in any of the view trees
    NotFound { widget_type: &'static str },
    /// Several nodes of the declared type and no id to pick one of them
    Ambiguous {
        widget_type: &'static str,
        view: &'static str,
        count: usize,
    },
    /// Two distinct nodes share an id (strict keyed maps only)
    DuplicateId { id: String },
}

impl fmt::Display for ResolutionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolutionFailure::NotFound { widget_type } => {
                write!(f, "no `{widget_type}` found in the controller views")
            }
            ResolutionFailure::Ambiguous {
                widget_type,
                view,
                count,
            } => write!(
                f,
                "view `{view}` contains {count} `{widget_type}` nodes, declare an explicit id"
            ),
            ResolutionFailure::DuplicateId { id } => {
                write!(f, "several nodes share the id `{id}`")
            }
        }
    }
}

impl WiringError {
    pub(crate) fn injection(
        type_name: &'static str,
        field: &'static str,
        reason: impl Into<String>,
    ) -> Self {
        WiringError::Injection {
            type_name,
            field,
            reason: reason.into(),
        }
    }
}
