//! Session guard and explicit session context
//!
//! The session itself lives in an external key-value store written by the
//! login and logout flows. The router only reads it: a presence test on the
//! identity marker, then a snapshot handed to controllers.

use tracing::warn;

use crate::hierarchy::Role;
use crate::host::Navigator;

/// Identity marker written at login
pub const KEY_USER_ID: &str = "userId";
/// Display name
pub const KEY_USER_NAME: &str = "userName";
/// Role string (admin, gestor, usuario)
pub const KEY_USER_ROLE: &str = "userRole";
/// Name of the user's institution
pub const KEY_INSTITUTION: &str = "instituicaoNome";
/// Bearer token for the REST backend
pub const KEY_TOKEN: &str = "token";

/// Read-only view of the ambient session store.
pub trait SessionStore {
    fn get(&self, key: &str) -> Option<String>;
}

/// Snapshot of the logged-in user, passed explicitly into every controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    pub user_id: String,
    pub name: String,
    pub role: Role,
    pub institution_name: Option<String>,
}

impl SessionContext {
    pub fn new(user_id: impl Into<String>, role: Role) -> Self {
        Self {
            user_id: user_id.into(),
            name: String::new(),
            role,
            institution_name: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_institution(mut self, institution: impl Into<String>) -> Self {
        self.institution_name = Some(institution.into());
        self
    }

    /// Build from the store. `None` when the identity marker is absent.
    pub fn from_store(store: &dyn SessionStore) -> Option<Self> {
        let user_id = present(store, KEY_USER_ID)?;
        Some(Self {
            user_id,
            name: present(store, KEY_USER_NAME).unwrap_or_default(),
            role: Role::parse(&present(store, KEY_USER_ROLE).unwrap_or_default()),
            institution_name: present(store, KEY_INSTITUTION),
        })
    }
}

fn present(store: &dyn SessionStore, key: &str) -> Option<String> {
    store
        .get(key)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty() && value != "null" && value != "undefined")
}

/// Hard gate evaluated synchronously before every route resolution.
#[derive(Debug, Clone)]
pub struct SessionGuard {
    login_url: String,
}

impl SessionGuard {
    pub fn new(login_url: impl Into<String>) -> Self {
        Self {
            login_url: login_url.into(),
        }
    }

    pub fn login_url(&self) -> &str {
        &self.login_url
    }

    /// Return the session, or redirect to the login entry point and return
    /// `None`. No retries.
    pub fn authenticate(
        &self,
        store: &dyn SessionStore,
        navigator: &dyn Navigator,
    ) -> Option<SessionContext> {
        match SessionContext::from_store(store) {
            Some(session) => Some(session),
            None => {
                warn!(login_url = %self.login_url, "No session identity, redirecting to login");
                navigator.redirect(&self.login_url);
                None
            }
        }
    }

    /// Boolean form of [`SessionGuard::authenticate`].
    pub fn ensure_authenticated(&self, store: &dyn SessionStore, navigator: &dyn Navigator) -> bool {
        self.authenticate(store, navigator).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MemorySessionStore, RecordingNavigator};

    #[test]
    fn test_missing_marker_redirects() {
        let store = MemorySessionStore::new();
        let navigator = RecordingNavigator::new("");
        let guard = SessionGuard::new("/login.html");

        assert!(!guard.ensure_authenticated(&store, &navigator));
        assert_eq!(navigator.redirects(), vec!["/login.html".to_string()]);
    }

    #[test]
    fn test_blank_and_null_markers_count_as_absent() {
        let navigator = RecordingNavigator::new("");
        let guard = SessionGuard::new("login.html");

        for value in ["", "   ", "null", "undefined"] {
            let store = MemorySessionStore::new().with(KEY_USER_ID, value);
            assert!(guard.authenticate(&store, &navigator).is_none());
        }
        assert_eq!(navigator.redirects().len(), 4);
    }

    #[test]
    fn test_session_snapshot() {
        let store = MemorySessionStore::new()
            .with(KEY_USER_ID, "7")
            .with(KEY_USER_NAME, "Maria")
            .with(KEY_USER_ROLE, "Gestor")
            .with(KEY_INSTITUTION, "INCRA");
        let navigator = RecordingNavigator::new("");

        let session = SessionGuard::new("login.html")
            .authenticate(&store, &navigator)
            .unwrap();

        assert_eq!(session.user_id, "7");
        assert_eq!(session.name, "Maria");
        assert_eq!(session.role, Role::Gestor);
        assert_eq!(session.institution_name.as_deref(), Some("INCRA"));
        assert!(navigator.redirects().is_empty());
    }
}
