//! Institutions

use reqwest::Method;
use serde_json::Value;

use crate::client::{into_list, segment, ApiClient};
use crate::error::Result;
use crate::types::{InstituicaoInput, InstituicaoUpdate};

impl ApiClient {
    pub async fn list_instituicoes(&self) -> Result<Vec<Value>> {
        into_list(self.get("/instituicoes").await?)
    }

    pub async fn create_instituicao(&self, input: &InstituicaoInput) -> Result<Value> {
        self.send_json(Method::POST, "/instituicoes", input).await
    }

    pub async fn update_instituicao(&self, id: &str, update: &InstituicaoUpdate) -> Result<Value> {
        self.send_json(
            Method::PATCH,
            &format!("/instituicoes/{}", segment(id)),
            update,
        )
        .await
    }

    pub async fn delete_instituicao(&self, id: &str) -> Result<Value> {
        self.delete(&format!("/instituicoes/{}", segment(id))).await
    }
}
