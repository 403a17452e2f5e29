//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into [`HubError`]
//! via `#[from]` (or an explicit `From` impl for adapter errors).

use crate::param::ParamError;

/// Top-level error for lighthub operations.
#[derive(Debug, thiserror::Error)]
pub enum HubError {
    /// User-submitted configuration failed a domain invariant.
    #[error("validation error")]
    Validation(#[from] ValidationError),

    /// A referenced device, route target or action does not exist.
    #[error("not found")]
    NotFound(#[from] NotFoundError),

    /// A string parameter could not be decoded into its declared type.
    #[error("parameter error")]
    Param(#[from] ParamError),

    /// Persistence failure, boxed so adapters can carry their own error type.
    #[error("storage error")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Reasons a route, schedule entry or option value is rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// A required string field is empty or whitespace.
    #[error("field `{0}` must not be empty")]
    EmptyField(&'static str),

    /// The route's source event is not provided by the source device.
    #[error("device does not provide event `{0}`")]
    UnknownSourceEvent(String),

    /// The schedule entry names an action the device does not expose.
    #[error("device does not expose action `{0}`")]
    UnknownAction(String),

    /// Parameter names or count do not match the action's declaration.
    #[error("parameters do not match action `{0}`")]
    ParameterMismatch(String),

    /// The trigger has an out-of-range day, hour or minute.
    #[error("invalid schedule trigger")]
    InvalidTrigger,

    /// An option value is unknown or out of range for its descriptor.
    #[error("invalid value for option `{0}`")]
    InvalidOption(String),
}

/// A lookup that found nothing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{entity} `{id}` not found")]
pub struct NotFoundError {
    pub entity: &'static str,
    pub id: String,
}
