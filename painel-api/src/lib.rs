//! REST client for the dashboard backend
//!
//! One method per backend operation, grouped by domain. Entities
//! (denúncias, conflitos, usuários, instituições) are owned by the backend
//! and passed through as `serde_json::Value`; only request bodies are typed.
//!
//! Success yields the parsed JSON body (a non-JSON body becomes a JSON
//! string, an empty body becomes `null`). Failure yields an [`ApiError`]
//! carrying the HTTP status and a human-readable message.
//!
//! # Example
//!
//! ```rust,no_run
//! use painel_api::{ApiClient, ApiConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = ApiClient::new(ApiConfig {
//!     base_url: "http://localhost:8080/api".into(),
//!     ..Default::default()
//! })?;
//!
//! let pendentes = client.list_denuncias().await?;
//! client.aprovar_denuncia("42").await?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod types;

mod conflitos;
mod denuncias;
mod instituicoes;
mod relatorios;
mod usuarios;

pub use client::{extract_message, into_list, ApiClient};
pub use config::ApiConfig;
pub use error::{ApiError, Result};
pub use types::*;
