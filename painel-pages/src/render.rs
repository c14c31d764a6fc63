//! Row and fragment markup
//!
//! All record text goes through [`escape_html`]; ids are escaped too since
//! they land in attributes.

use serde_json::Value;

use painel_core::markup::escape_html;

use crate::support::{record_id, text};

/// `<td>` with escaped text, `—` when empty
pub fn cell(value: &str) -> String {
    if value.trim().is_empty() {
        "<td>—</td>".to_string()
    } else {
        format!("<td>{}</td>", escape_html(value))
    }
}

/// Table cell for a record field
pub fn field_cell(record: &Value, field: &str) -> String {
    cell(&text(record, field))
}

/// ISO timestamps trimmed to their date
pub fn date_cell(record: &Value, field: &str) -> String {
    let value = text(record, field);
    cell(value.get(..10).unwrap_or(&value))
}

pub fn status_badge(status: &str) -> String {
    let status = status.trim().to_lowercase();
    if status.is_empty() {
        return "<td>—</td>".to_string();
    }
    format!(
        r#"<td><span class="status status-{0}">{0}</span></td>"#,
        escape_html(&status)
    )
}

/// Button picked up by a delegated list listener
pub fn action_button(action: &str, id: &str, label: &str) -> String {
    format!(
        r#"<button type="button" class="btn btn-{0}" data-action="{0}" data-id="{1}">{2}</button>"#,
        escape_html(action),
        escape_html(id),
        escape_html(label)
    )
}

/// Actions cell; `actions` are `(action, label)` pairs
pub fn actions_cell(record: &Value, actions: &[(&str, &str)]) -> String {
    let Some(id) = record_id(record) else {
        return "<td></td>".to_string();
    };
    let buttons: Vec<String> = actions
        .iter()
        .map(|(action, label)| action_button(action, &id, label))
        .collect();
    format!(r#"<td class="acoes">{}</td>"#, buttons.join(""))
}

/// Placeholder row spanning the table
pub fn empty_row(columns: usize, message: &str) -> String {
    format!(
        r#"<tr class="vazio"><td colspan="{}">{}</td></tr>"#,
        columns,
        escape_html(message)
    )
}

/// Rows, or the placeholder when there are none
pub fn rows<F>(records: &[Value], columns: usize, empty: &str, row: F) -> String
where
    F: Fn(&Value) -> String,
{
    if records.is_empty() {
        return empty_row(columns, empty);
    }
    records.iter().map(row).collect()
}

/// Inline notice inside a page
pub fn notice(message: &str) -> String {
    format!(
        r#"<p class="aviso" role="status">{}</p>"#,
        escape_html(message)
    )
}

/// Key/value listing for report objects. Nested values are flattened to
/// their JSON text.
pub fn definition_list(value: &Value) -> String {
    let Value::Object(map) = value else {
        return notice("Nenhum dado disponível.");
    };
    if map.is_empty() {
        return notice("Nenhum dado disponível.");
    }
    let mut out = String::from(r#"<dl class="relatorio">"#);
    for (key, value) in map {
        let shown = match value {
            Value::String(s) => s.clone(),
            Value::Null => String::new(),
            other => other.to_string(),
        };
        out.push_str(&format!(
            "<dt>{}</dt><dd>{}</dd>",
            escape_html(&label(key)),
            escape_html(&shown)
        ));
    }
    out.push_str("</dl>");
    out
}

/// `total_denuncias` → `Total denuncias`
fn label(key: &str) -> String {
    let spaced = key.replace(['_', '-'], " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Singular/plural counter text
pub fn counter(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("1 {}", singular)
    } else {
        format!("{} {}", count, plural)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_action_button_escapes_id() {
        assert_eq!(
            action_button("aprovar", "1\"", "Aprovar"),
            r#"<button type="button" class="btn btn-aprovar" data-action="aprovar" data-id="1&quot;">Aprovar</button>"#
        );
    }

    #[test]
    fn test_rows_placeholder() {
        assert_eq!(
            rows(&[], 3, "Nada aqui", |_| String::new()),
            r#"<tr class="vazio"><td colspan="3">Nada aqui</td></tr>"#
        );
    }

    #[test]
    fn test_date_cell_trims_time() {
        let record = json!({"data_criacao": "2024-03-05T10:20:00Z"});
        assert_eq!(date_cell(&record, "data_criacao"), "<td>2024-03-05</td>");
    }

    #[test]
    fn test_definition_list() {
        let html = definition_list(&json!({"total_denuncias": 3}));
        assert_eq!(
            html,
            r#"<dl class="relatorio"><dt>Total denuncias</dt><dd>3</dd></dl>"#
        );
        assert!(definition_list(&Value::Null).contains("Nenhum dado"));
    }

    #[test]
    fn test_counter() {
        assert_eq!(counter(1, "denúncia", "denúncias"), "1 denúncia");
        assert_eq!(counter(0, "denúncia", "denúncias"), "0 denúncias");
    }
}
