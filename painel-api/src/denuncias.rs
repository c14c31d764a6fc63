//! Denúncia intake and triage

use reqwest::Method;
use serde_json::Value;

use crate::client::{into_list, segment, ApiClient};
use crate::error::Result;
use crate::types::RejectDenuncia;

impl ApiClient {
    /// All denúncias visible to the caller
    pub async fn list_denuncias(&self) -> Result<Vec<Value>> {
        into_list(self.get("/denuncias").await?)
    }

    pub async fn get_denuncia(&self, id: &str) -> Result<Value> {
        self.get(&format!("/denuncias/{}", segment(id))).await
    }

    pub async fn aprovar_denuncia(&self, id: &str) -> Result<Value> {
        self.post_empty(&format!("/denuncias/{}/aprovar", segment(id)))
            .await
    }

    pub async fn rejeitar_denuncia(&self, id: &str, motivo: &str) -> Result<Value> {
        let body = RejectDenuncia {
            motivo: motivo.to_string(),
        };
        self.send_json(
            Method::POST,
            &format!("/denuncias/{}/rejeitar", segment(id)),
            &body,
        )
        .await
    }
}
