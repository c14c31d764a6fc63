//! Browser configuration
//!
//! Read from `window.PAINEL_CONFIG` when the page defines it; every field
//! has a default so a bare `index.html` works against a local backend.

use serde::{Deserialize, Serialize};
use wasm_bindgen::JsValue;

use painel_api::ApiConfig;
use painel_core::RouterConfig;

/// Global the host page may define before loading the bundle
pub const CONFIG_GLOBAL: &str = "PAINEL_CONFIG";

/// Web app configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebConfig {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub router: RouterConfig,

    #[serde(default)]
    pub shell: ShellSelectors,

    /// Base URL view references resolve against; the document base when unset
    #[serde(default)]
    pub views_base: Option<String>,

    /// Log level for the painel crates (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// How long toasts stay on screen
    #[serde(default = "default_toast_ms")]
    pub toast_ms: i32,
}

/// Where the shell elements live in `index.html`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShellSelectors {
    #[serde(default = "default_content")]
    pub content: String,
    #[serde(default = "default_loading")]
    pub loading: String,
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default = "default_subtitle")]
    pub subtitle: String,
    /// Sidebar links; their parent element gets the `active` class
    #[serde(default = "default_nav_links")]
    pub nav_links: String,
    #[serde(default = "default_toasts")]
    pub toasts: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_toast_ms() -> i32 {
    4000
}

fn default_content() -> String {
    "#conteudo".to_string()
}

fn default_loading() -> String {
    "#carregando".to_string()
}

fn default_title() -> String {
    "#titulo-pagina".to_string()
}

fn default_subtitle() -> String {
    "#subtitulo-pagina".to_string()
}

fn default_nav_links() -> String {
    ".sidebar a[href^='#/']".to_string()
}

fn default_toasts() -> String {
    "#toasts".to_string()
}

impl Default for ShellSelectors {
    fn default() -> Self {
        Self {
            content: default_content(),
            loading: default_loading(),
            title: default_title(),
            subtitle: default_subtitle(),
            nav_links: default_nav_links(),
            toasts: default_toasts(),
        }
    }
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            router: RouterConfig::default(),
            shell: ShellSelectors::default(),
            views_base: None,
            log_level: default_log_level(),
            toast_ms: default_toast_ms(),
        }
    }
}

impl WebConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Configuration from `window.PAINEL_CONFIG`, falling back to defaults
    /// when it is missing or malformed.
    pub fn from_window() -> Self {
        let Some(window) = web_sys::window() else {
            return Self::default();
        };
        let raw = match js_sys::Reflect::get(&window, &JsValue::from_str(CONFIG_GLOBAL)) {
            Ok(value) if !value.is_undefined() && !value.is_null() => value,
            _ => return Self::default(),
        };
        let json = match js_sys::JSON::stringify(&raw) {
            Ok(json) => String::from(json),
            Err(_) => return Self::default(),
        };
        match Self::from_json(&json) {
            Ok(config) => config,
            Err(err) => {
                web_sys::console::warn_1(&JsValue::from_str(&format!(
                    "{} is invalid, using defaults: {}",
                    CONFIG_GLOBAL, err
                )));
                Self::default()
            }
        }
    }
}
