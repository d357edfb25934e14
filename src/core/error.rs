use thiserror::Error;

/// Core error types for configuration building
///
/// Every variant is raised by the single builder call that detected it; the tree is
/// left exactly as it was before that call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Block or service name violates the naming rules
    #[error("Invalid name '{name}': {reason}")]
    InvalidName { name: String, reason: String },

    /// Service redefined with a different port specification
    #[error("Service '{name}' conflicts with existing definition: {candidate} != {existing}")]
    Conflict {
        name: String,
        existing: String,
        candidate: String,
    },

    /// Server/client stanza references a service nobody defined
    #[error("Service '{0}' not defined (missing define_service call?)")]
    UndefinedService(String),

    /// Server/client stanza built with an empty service list
    #[error("{kind} stanza needs at least one service")]
    MissingServices { kind: String },

    /// A set-once stanza was attached twice to the same container
    #[error("{kind} already set on this {parent}")]
    Cardinality { kind: String, parent: String },

    /// Two node kinds registered the same builder operation on one parent kind
    #[error("Builder operation '{operation}' registered twice on {parent}")]
    InitializationConflict { parent: String, operation: String },

    /// The capability table has no such operation for the parent kind
    #[error("{parent} does not support '{operation}'")]
    UnsupportedOperation { parent: String, operation: String },

    /// Settings document could not be read
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
