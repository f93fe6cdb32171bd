//! Error types for the conversation controller and its collaborators.
//!
//! None of these escape `submit` or `confirm_deploy`: the controller logs
//! collaborator failures and carries on.

/// Errors reported by platform collaborators.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("capability unsupported: {0}")]
    Unsupported(String),
    #[error("speech capture is already active")]
    AlreadyListening,
    #[error("speech capture is not active")]
    NotListening,
    #[error("unsupported URL: {0}")]
    InvalidUrl(String),
    #[error("navigation failed: {0}")]
    NavigationFailed(String),
}
