//! Reports

use serde_json::Value;

use crate::client::ApiClient;
use crate::error::Result;
use crate::types::ReportPeriod;

impl ApiClient {
    /// Headline counters for the dashboard
    pub async fn resumo(&self) -> Result<Value> {
        self.get("/relatorios/resumo").await
    }

    pub async fn relatorio(&self, period: &ReportPeriod) -> Result<Value> {
        self.get_with_query("/relatorios", period).await
    }
}
