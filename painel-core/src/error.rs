//! Error types for the router and page controllers

use thiserror::Error;

/// Result type for router and controller operations
pub type Result<T> = std::result::Result<T, PainelError>;

/// Router and controller error types
#[derive(Error, Debug)]
pub enum PainelError {
    /// View template missing on the server
    #[error("View not found: {view} (HTTP {status})")]
    ViewNotFound { view: String, status: u16 },

    /// View template could not be retrieved at all
    #[error("View fetch failed: {0}")]
    ViewFetch(String),

    /// A page controller failed while mounting or handling an action
    #[error("Controller error: {0}")]
    Controller(String),

    /// REST backend error
    #[error("API error: {0}")]
    Api(#[from] painel_api::ApiError),

    /// The page host could not perform a DOM operation
    #[error("Host error: {0}")]
    Host(String),

    /// Route table failed validation
    #[error("Invalid route table: {0}")]
    RouteTable(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl PainelError {
    /// Message suitable for showing to the operator in a toast or inline.
    pub fn user_message(&self) -> String {
        match self {
            PainelError::Api(err) => err.message(),
            PainelError::Controller(msg) => msg.clone(),
            other => other.to_string(),
        }
    }
}

impl From<serde_json::Error> for PainelError {
    fn from(err: serde_json::Error) -> Self {
        PainelError::Config(err.to_string())
    }
}
