//! Error types for the REST client

use thiserror::Error;

/// REST client error
#[derive(Debug, Error)]
pub enum ApiError {
    /// Request never produced a response (network, CORS, timeout)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Form body could not be encoded
    #[error("Form encoding error: {0}")]
    Form(#[from] serde_urlencoded::ser::Error),

    /// Backend answered with a non-success status
    #[error("{message}")]
    Server { status: u16, message: String },

    /// Response had an unexpected shape
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl ApiError {
    /// HTTP status, when the backend answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Server { status, .. } => Some(*status),
            ApiError::Http(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Message for the operator
    pub fn message(&self) -> String {
        match self {
            ApiError::Server { message, .. } => message.clone(),
            ApiError::Http(_) => "Falha de comunicação com o servidor.".to_string(),
            ApiError::Json(_) | ApiError::Form(_) => {
                "Não foi possível preparar a requisição.".to_string()
            }
            ApiError::InvalidResponse(_) => "Resposta inesperada do servidor.".to_string(),
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self.status(), Some(401) | Some(403))
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

/// Result type for API operations
pub type Result<T> = std::result::Result<T, ApiError>;
