//! Markup helpers shared by the router and page renderers

/// Escape text for inclusion in HTML content or a quoted attribute.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// The single element the router leaves in the content container after a
/// failed navigation.
pub fn error_block(message: &str) -> String {
    format!(
        r#"<div class="page-error" role="alert">{}</div>"#,
        escape_html(message)
    )
}

/// Strip a leading `#` from a selector, giving the bare element id.
pub fn element_id(selector: &str) -> &str {
    selector.strip_prefix('#').unwrap_or(selector)
}
