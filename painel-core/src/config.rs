//! Router configuration

use serde::{Deserialize, Serialize};

use crate::error::{PainelError, Result};

/// Router settings, usually embedded in the web app's JSON configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouterConfig {
    /// Where the session guard sends unauthenticated visitors
    #[serde(default = "default_login_url")]
    pub login_url: String,

    /// Inline message shown when a view or controller fails to load
    #[serde(default = "default_error_message")]
    pub error_message: String,

    /// Route used for unrecognized hashes. When unset, the first table
    /// entry (the default route) is used instead.
    #[serde(default)]
    pub not_found: Option<String>,
}

fn default_login_url() -> String {
    "login.html".to_string()
}

fn default_error_message() -> String {
    "Não foi possível carregar a página. Tente novamente.".to_string()
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            login_url: default_login_url(),
            error_message: default_error_message(),
            not_found: None,
        }
    }
}

impl RouterConfig {
    /// Parse from a JSON document; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: RouterConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.login_url.trim().is_empty() {
            return Err(PainelError::Config("login_url must not be empty".into()));
        }
        if let Some(path) = &self.not_found {
            if !path.starts_with('/') {
                return Err(PainelError::Config(format!(
                    "not_found path must start with '/': {}",
                    path
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_json() {
        let config = RouterConfig::from_json("{}").unwrap();
        assert_eq!(config.login_url, "login.html");
        assert!(config.not_found.is_none());
        assert!(!config.error_message.is_empty());
    }

    #[test]
    fn test_not_found_requires_leading_slash() {
        let err = RouterConfig::from_json(r#"{"not_found": "404"}"#).unwrap_err();
        assert!(matches!(err, PainelError::Config(_)));

        let config = RouterConfig::from_json(r#"{"not_found": "/404"}"#).unwrap();
        assert_eq!(config.not_found.as_deref(), Some("/404"));
    }

    #[test]
    fn test_empty_login_url_rejected() {
        assert!(RouterConfig::from_json(r#"{"login_url": "  "}"#).is_err());
    }
}
