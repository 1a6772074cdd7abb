use thiserror::Error;

#[derive(Debug, Error)]
/// Errors surfaced by the remote similarity client.
///
/// All three kinds carry a human summary plus the raw underlying cause in
/// `detail`; none of them expose internal session state.
pub enum SpaceError {
    /// Session establishment failed after exhausting the retry budget.
    #[error("failed to initialize space session: {message}")]
    Connection {
        /// Human summary.
        message: String,
        /// Raw underlying cause, for diagnostics.
        detail: Option<String>,
    },

    /// The Space responded, but not in a shape this client understands.
    #[error("unexpected space return format")]
    Protocol {
        /// The raw response, for diagnostics.
        detail: String,
    },

    /// A prediction call failed after exhausting the retry budget.
    #[error("failed calling space: {message}")]
    CallFailed {
        /// Human summary.
        message: String,
        /// Last underlying cause (network, timeout, or protocol error).
        detail: Option<String>,
    },
}

impl SpaceError {
    /// Returns the raw underlying cause, when one was captured.
    pub fn detail(&self) -> Option<&str> {
        match self {
            SpaceError::Connection { detail, .. } => detail.as_deref(),
            SpaceError::Protocol { detail } => Some(detail),
            SpaceError::CallFailed { detail, .. } => detail.as_deref(),
        }
    }
}
