//! CAD push errors.

use thiserror::Error;

/// Errors raised while preparing or submitting a CAD variable update.
#[derive(Debug, Error)]
pub enum CadError {
    /// A credential or identifier was not configured.
    #[error("missing CAD setting: {0}")]
    Missing(&'static str),

    /// The payload could not be serialized.
    #[error("failed to serialize CAD payload: {0}")]
    Payload(#[from] serde_json::Error),

    /// The signing key was rejected.
    #[error("invalid signing key: {0}")]
    Key(String),

    /// The CAD service answered with a non-200 status.
    #[error("CAD API returned {status}: {body}")]
    Rejected {
        /// HTTP status code.
        status: u16,
        /// Response body, verbatim.
        body: String,
    },
}
