//! HTTP plumbing shared by every domain module

use reqwest::{header, Client, Method, RequestBuilder};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::ApiConfig;
use crate::error::{ApiError, Result};

/// Body fields checked, in order, for a server-provided error message
const MESSAGE_FIELDS: &[&str] = &["message", "mensagem", "error", "detail"];

/// HTTP client for the dashboard backend
#[derive(Debug, Clone)]
pub struct ApiClient {
    config: ApiConfig,
    client: Client,
}

impl ApiClient {
    pub fn new(config: ApiConfig) -> Result<Self> {
        let builder = Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder.timeout(std::time::Duration::from_secs(config.timeout_secs));
        let client = builder.build()?;

        Ok(Self { config, client })
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    pub fn base_url(&self) -> &str {
        self.config.base_url.trim_end_matches('/')
    }

    // ==================== Request helpers ====================

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url(), path)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = self.url(path);
        debug!(method = %method, url = %url, "API request");
        let request = self.client.request(method, url);
        match self.config.token.as_deref() {
            Some(token) if !token.is_empty() => request.bearer_auth(token),
            _ => request,
        }
    }

    pub(crate) async fn get(&self, path: &str) -> Result<Value> {
        let response = self.request(Method::GET, path).send().await?;
        self.handle_response(response).await
    }

    pub(crate) async fn get_with_query<Q: Serialize>(&self, path: &str, query: &Q) -> Result<Value> {
        let encoded = serde_urlencoded::to_string(query)?;
        let path = if encoded.is_empty() {
            path.to_string()
        } else {
            format!("{}?{}", path, encoded)
        };
        self.get(&path).await
    }

    pub(crate) async fn send_json<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<Value> {
        let body = serde_json::to_vec(body)?;
        let response = self
            .request(method, path)
            .header(header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;
        self.handle_response(response).await
    }

    pub(crate) async fn send_form<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<Value> {
        let body = serde_urlencoded::to_string(body)?;
        let response = self
            .request(method, path)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(body)
            .send()
            .await?;
        self.handle_response(response).await
    }

    pub(crate) async fn post_empty(&self, path: &str) -> Result<Value> {
        let response = self.request(Method::POST, path).send().await?;
        self.handle_response(response).await
    }

    pub(crate) async fn delete(&self, path: &str) -> Result<Value> {
        let response = self.request(Method::DELETE, path).send().await?;
        self.handle_response(response).await
    }

    async fn handle_response(&self, response: reqwest::Response) -> Result<Value> {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let status = status.as_u16();
            let message = extract_message(status, &body);
            warn!(status, message = %message, "API request failed");
            return Err(ApiError::Server { status, message });
        }

        Ok(parse_body(&body))
    }
}

/// Percent-encode an id for use as a path segment
pub(crate) fn segment(id: &str) -> String {
    urlencoding::encode(id).into_owned()
}

fn parse_body(body: &str) -> Value {
    if body.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(body).unwrap_or_else(|_| Value::String(body.to_string()))
}

/// Human-readable message for a failed response: a known message field of
/// a JSON body, else the trimmed text body, else `HTTP <status>`.
pub fn extract_message(status: u16, body: &str) -> String {
    let trimmed = body.trim();

    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(trimmed) {
        for field in MESSAGE_FIELDS {
            if let Some(Value::String(message)) = map.get(*field) {
                if !message.trim().is_empty() {
                    return message.trim().to_string();
                }
            }
        }
        return format!("HTTP {}", status);
    }

    if trimmed.is_empty() {
        format!("HTTP {}", status)
    } else {
        trimmed.to_string()
    }
}

/// Pull a record list out of a response. Accepts a bare array or an
/// envelope with `data`, `items` or `content`; `null` is an empty list.
pub fn into_list(value: Value) -> Result<Vec<Value>> {
    match value {
        Value::Array(items) => Ok(items),
        Value::Null => Ok(Vec::new()),
        Value::Object(mut map) => {
            for key in ["data", "items", "content"] {
                if let Some(Value::Array(items)) = map.remove(key) {
                    return Ok(items);
                }
            }
            Err(ApiError::InvalidResponse(
                "expected a list of records".to_string(),
            ))
        }
        other => Err(ApiError::InvalidResponse(format!(
            "expected a list of records, got {}",
            kind(&other)
        ))),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
