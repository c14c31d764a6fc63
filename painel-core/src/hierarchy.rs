//! Hierarchy scoping
//!
//! Staff see different slices of the same backend data depending on their
//! role: administrators see everything, gestores see their institution's
//! records, line users see only what they submitted. Records are opaque JSON
//! payloads; scoping only looks at two configurable fields.

use serde_json::Value;
use std::fmt;

use crate::session::SessionContext;

/// Hierarchy level carried by the session's role string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Role {
    /// Global administrator
    Admin,
    /// Institutional manager
    Gestor,
    /// Line user
    Usuario,
    /// Anything the backend sends that we do not recognize
    Unknown(String),
}

impl Role {
    /// Parse a role string, ignoring case, accents and surrounding spaces.
    pub fn parse(role: &str) -> Self {
        match fold(role).as_str() {
            "admin" | "administrador" | "administrator" => Role::Admin,
            "gestor" | "manager" => Role::Gestor,
            "usuario" | "user" => Role::Usuario,
            _ => Role::Unknown(role.trim().to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Role::Admin => "admin",
            Role::Gestor => "gestor",
            Role::Usuario => "usuario",
            Role::Unknown(raw) => raw,
        }
    }

    /// User approval and listing
    pub fn can_manage_users(&self) -> bool {
        matches!(self, Role::Admin | Role::Gestor)
    }

    /// Creating and deleting institutions
    pub fn can_manage_institutions(&self) -> bool {
        matches!(self, Role::Admin)
    }

    /// Approving, rejecting and escalating denúncias
    pub fn can_review(&self) -> bool {
        matches!(self, Role::Admin | Role::Gestor)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Which record fields carry the institution and the owning user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeFields {
    pub institution: String,
    pub owner: String,
}

impl Default for ScopeFields {
    fn default() -> Self {
        Self {
            institution: "instituicao".to_string(),
            owner: "usuario_id".to_string(),
        }
    }
}

impl ScopeFields {
    pub fn new(institution: impl Into<String>, owner: impl Into<String>) -> Self {
        Self {
            institution: institution.into(),
            owner: owner.into(),
        }
    }
}

/// Visibility predicate derived from a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HierarchyScope {
    /// Every record
    All,
    /// Records belonging to the named institution
    Institution(String),
    /// Records owned by the given user id
    Owner(String),
    /// No records
    Nothing,
}

impl HierarchyScope {
    /// Pure function of role (plus the identity it needs) to a scope.
    pub fn for_session(session: &SessionContext) -> Self {
        match session.role {
            Role::Admin => HierarchyScope::All,
            Role::Gestor => match session.institution_name.as_deref().map(str::trim) {
                Some(name) if !name.is_empty() => HierarchyScope::Institution(name.to_string()),
                _ => HierarchyScope::Nothing,
            },
            Role::Usuario => HierarchyScope::Owner(session.user_id.clone()),
            Role::Unknown(_) => HierarchyScope::Nothing,
        }
    }

    /// Whether a single record is visible under this scope.
    pub fn permits(&self, record: &Value, fields: &ScopeFields) -> bool {
        match self {
            HierarchyScope::All => true,
            HierarchyScope::Nothing => false,
            HierarchyScope::Institution(name) => field_text(record, &fields.institution)
                .map(|value| fold(&value) == fold(name))
                .unwrap_or(false),
            HierarchyScope::Owner(user_id) => field_text(record, &fields.owner)
                .map(|value| value.trim() == user_id.trim())
                .unwrap_or(false),
        }
    }

    /// Filter a fetched list down to the visible records, keeping order.
    pub fn apply(&self, records: Vec<Value>, fields: &ScopeFields) -> Vec<Value> {
        records
            .into_iter()
            .filter(|record| self.permits(record, fields))
            .collect()
    }
}

/// Scope a list with the default field names.
pub fn scope_records(session: &SessionContext, records: Vec<Value>) -> Vec<Value> {
    HierarchyScope::for_session(session).apply(records, &ScopeFields::default())
}

/// Read a field as text. Nested institution objects are matched by name.
fn field_text(record: &Value, field: &str) -> Option<String> {
    match record.get(field)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Object(map) => map
            .get("nome")
            .or_else(|| map.get("name"))
            .and_then(Value::as_str)
            .map(str::to_string),
        _ => None,
    }
}

/// Lowercase and strip the Portuguese diacritics that show up in role and
/// institution names.
fn fold(text: &str) -> String {
    text.trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'á' | 'à' | 'â' | 'ã' | 'ä' => 'a',
            'é' | 'è' | 'ê' | 'ë' => 'e',
            'í' | 'ì' | 'î' | 'ï' => 'i',
            'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
            'ú' | 'ù' | 'û' | 'ü' => 'u',
            'ç' => 'c',
            other => other,
        })
        .collect()
}
