//! Error types for the distribution library.
//!
//! Every variant is a configuration problem reported once, at construction
//! time. Lookups against a successfully built ring cannot fail.

use thiserror::Error;

/// Result type alias for the distribution library.
pub type Result<T> = std::result::Result<T, Error>;

/// Configuration errors raised while building a [`crate::Distrib`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Algorithm name is not one of `naive`, `consistent`, `redundant`.
    #[error("unknown algorithm: {0}")]
    UnknownAlgorithm(String),

    /// The backend set is empty.
    #[error("no backends configured")]
    NoBackends,

    /// A backend was configured with a zero weight.
    #[error("invalid weight {weight} for backend {backend}: weights must be positive")]
    InvalidWeight { backend: String, weight: u32 },

    /// The base replica count was zero.
    #[error("invalid replica count {0}: must be positive")]
    InvalidReplicas(u32),

    /// Malformed configuration document.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Config(err.to_string())
    }
}
