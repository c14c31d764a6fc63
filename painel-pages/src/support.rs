//! Helpers shared by the page controllers

use serde_json::Value;
use std::future::Future;
use tracing::warn;

use painel_core::{Notice, PageScope};

/// Await an auxiliary list fetch; failures become an empty list.
pub async fn or_empty<F>(label: &str, fetch: F) -> Vec<Value>
where
    F: Future<Output = painel_api::Result<Vec<Value>>>,
{
    match fetch.await {
        Ok(records) => records,
        Err(err) => {
            warn!(list = label, status = ?err.status(), error = %err, "List fetch failed, showing empty");
            Vec::new()
        }
    }
}

/// Record id as text, whether the backend sent a string or a number
pub fn record_id(record: &Value) -> Option<String> {
    match record.get("id")? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Field as display text. Nested objects show their `nome`.
pub fn text(record: &Value, field: &str) -> String {
    match record.get(field) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => (if *b { "sim" } else { "não" }).to_string(),
        Some(Value::Array(items)) => items.len().to_string(),
        Some(Value::Object(map)) => map
            .get("nome")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        _ => String::new(),
    }
}

/// Lowercased `status` field
pub fn status(record: &Value) -> String {
    text(record, "status").trim().to_lowercase()
}

/// Keep records whose status matches `filter`. `todas`/`todos`/empty keep
/// everything.
pub fn filter_status(records: &[Value], filter: &str) -> Vec<Value> {
    let filter = filter.trim().to_lowercase();
    if filter.is_empty() || filter == "todas" || filter == "todos" {
        return records.to_vec();
    }
    records
        .iter()
        .filter(|record| status(record) == filter)
        .cloned()
        .collect()
}

/// Trimmed, non-empty form value
pub fn input(scope: &PageScope, target: &str) -> Option<String> {
    scope
        .read_value(target)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Toast an action's outcome. Returns whether it succeeded.
pub fn report<T>(scope: &PageScope, result: painel_api::Result<T>, success: &str) -> bool {
    match result {
        Ok(_) => {
            scope.notify(Notice::Success, success);
            true
        }
        Err(err) => {
            warn!(status = ?err.status(), error = %err, "Action failed");
            scope.notify(Notice::Error, &err.message());
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_record_id_accepts_numbers_and_strings() {
        assert_eq!(record_id(&json!({"id": 7})).as_deref(), Some("7"));
        assert_eq!(record_id(&json!({"id": "a1"})).as_deref(), Some("a1"));
        assert_eq!(record_id(&json!({"id": ""})), None);
        assert_eq!(record_id(&json!({})), None);
    }

    #[test]
    fn test_text_of_nested_institution() {
        let record = json!({"instituicao": {"id": 1, "nome": "INCRA"}, "ativo": false});
        assert_eq!(text(&record, "instituicao"), "INCRA");
        assert_eq!(text(&record, "ativo"), "não");
        assert_eq!(text(&record, "ausente"), "");
    }

    #[test]
    fn test_filter_status() {
        let records = vec![
            json!({"id": 1, "status": "PENDENTE"}),
            json!({"id": 2, "status": "aprovada"}),
        ];
        assert_eq!(filter_status(&records, "todas").len(), 2);
        assert_eq!(filter_status(&records, "pendente").len(), 1);
        assert_eq!(filter_status(&records, "rejeitada").len(), 0);
    }

    #[tokio::test]
    async fn test_or_empty_swallows_errors() {
        let failed = or_empty("denuncias", async {
            Err(painel_api::ApiError::Server {
                status: 500,
                message: "falhou".into(),
            })
        })
        .await;
        assert!(failed.is_empty());
    }
}
