//! View templates fetched over HTTP

use async_trait::async_trait;
use tracing::debug;

use painel_core::{PainelError, Result, ViewSource};

use crate::dom::js_error;

/// Fetches view markup relative to a base URL
pub struct HttpViews {
    client: reqwest::Client,
    base: String,
}

impl HttpViews {
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base: base.into(),
        }
    }

    fn url(&self, view: &str) -> Result<String> {
        resolve_url(view, &self.base)
    }
}

#[async_trait(?Send)]
impl ViewSource for HttpViews {
    async fn fetch_view(&self, view: &str) -> Result<String> {
        let url = self.url(view)?;
        debug!(view, url = %url, "Fetching view");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|err| PainelError::ViewFetch(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PainelError::ViewNotFound {
                view: view.to_string(),
                status: status.as_u16(),
            });
        }

        response
            .text()
            .await
            .map_err(|err| PainelError::ViewFetch(err.to_string()))
    }
}

/// Resolve a possibly relative URL against `base`. reqwest on wasm32 only
/// accepts absolute URLs.
pub fn resolve_url(url: &str, base: &str) -> Result<String> {
    web_sys::Url::new_with_base(url, base)
        .map(|resolved| resolved.href())
        .map_err(|err| js_error("URL", err))
}
