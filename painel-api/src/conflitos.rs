//! Formal conflito cases

use reqwest::Method;
use serde_json::Value;

use crate::client::{into_list, segment, ApiClient};
use crate::error::Result;
use crate::types::{ConflitoStatus, ConflitoUpdate, EscalateDenuncias};

impl ApiClient {
    pub async fn list_conflitos(&self) -> Result<Vec<Value>> {
        into_list(self.get("/conflitos").await?)
    }

    pub async fn get_conflito(&self, id: &str) -> Result<Value> {
        self.get(&format!("/conflitos/{}", segment(id))).await
    }

    /// Open a conflito from one or more approved denúncias
    pub async fn escalar_denuncias(&self, input: &EscalateDenuncias) -> Result<Value> {
        self.send_json(Method::POST, "/conflitos", input).await
    }

    pub async fn update_conflito(&self, id: &str, update: &ConflitoUpdate) -> Result<Value> {
        self.send_json(Method::PATCH, &format!("/conflitos/{}", segment(id)), update)
            .await
    }

    pub async fn set_conflito_status(&self, id: &str, status: ConflitoStatus) -> Result<Value> {
        self.update_conflito(id, &ConflitoUpdate::status(status))
            .await
    }
}
