//! User lifecycle
//!
//! Registration, approval and rejection are form-encoded; everything else
//! is JSON.

use reqwest::Method;
use serde_json::Value;

use crate::client::{into_list, segment, ApiClient};
use crate::error::Result;
use crate::types::{NewUsuario, UsuarioDecision, UsuarioUpdate};

impl ApiClient {
    pub async fn list_usuarios(&self) -> Result<Vec<Value>> {
        into_list(self.get("/usuarios").await?)
    }

    /// Registrations awaiting approval
    pub async fn list_usuarios_pendentes(&self) -> Result<Vec<Value>> {
        into_list(self.get("/usuarios/pendentes").await?)
    }

    pub async fn create_usuario(&self, usuario: &NewUsuario) -> Result<Value> {
        self.send_form(Method::POST, "/usuarios", usuario).await
    }

    pub async fn aprovar_usuario(&self, id: &str) -> Result<Value> {
        self.send_form(
            Method::POST,
            &format!("/usuarios/{}/aprovar", segment(id)),
            &UsuarioDecision::default(),
        )
        .await
    }

    pub async fn rejeitar_usuario(&self, id: &str, motivo: &str) -> Result<Value> {
        let decision = UsuarioDecision {
            motivo: Some(motivo.to_string()),
        };
        self.send_form(
            Method::POST,
            &format!("/usuarios/{}/rejeitar", segment(id)),
            &decision,
        )
        .await
    }

    pub async fn update_usuario(&self, id: &str, update: &UsuarioUpdate) -> Result<Value> {
        self.send_json(Method::PATCH, &format!("/usuarios/{}", segment(id)), update)
            .await
    }

    pub async fn delete_usuario(&self, id: &str) -> Result<Value> {
        self.delete(&format!("/usuarios/{}", segment(id))).await
    }
}
