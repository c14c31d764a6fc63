//! Request bodies
//!
//! Response entities stay untyped (`serde_json::Value`); the backend owns
//! their shape.

use serde::{Deserialize, Serialize};

// ==================== Denúncias ====================

/// Body of `POST /denuncias/{id}/rejeitar`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RejectDenuncia {
    pub motivo: String,
}

// ==================== Conflitos ====================

/// Escalation of approved denúncias into a conflito (`POST /conflitos`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EscalateDenuncias {
    pub titulo: String,
    pub denuncia_ids: Vec<String>,
}

/// Conflito lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConflitoStatus {
    Ativo,
    Resolvido,
    Cancelado,
}

impl ConflitoStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConflitoStatus::Ativo => "ativo",
            ConflitoStatus::Resolvido => "resolvido",
            ConflitoStatus::Cancelado => "cancelado",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "ativo" => Some(ConflitoStatus::Ativo),
            "resolvido" => Some(ConflitoStatus::Resolvido),
            "cancelado" => Some(ConflitoStatus::Cancelado),
            _ => None,
        }
    }
}

/// Partial update for `PATCH /conflitos/{id}`; unset fields are omitted
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConflitoUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ConflitoStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub titulo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub descricao: Option<String>,
}

impl ConflitoUpdate {
    pub fn status(status: ConflitoStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }
}

// ==================== Usuários ====================

/// Registration form (`POST /usuarios`, form-encoded)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUsuario {
    pub nome: String,
    pub email: String,
    pub perfil: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instituicao: Option<String>,
}

/// Approval or rejection form; `motivo` only on rejection
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UsuarioDecision {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub motivo: Option<String>,
}

/// Partial update for `PATCH /usuarios/{id}`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UsuarioUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nome: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub perfil: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ativo: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instituicao: Option<String>,
}

// ==================== Instituições ====================

/// Body of `POST /instituicoes`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstituicaoInput {
    pub nome: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sigla: Option<String>,
}

/// Partial update for `PATCH /instituicoes/{id}`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InstituicaoUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nome: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sigla: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ativa: Option<bool>,
}

// ==================== Relatórios ====================

/// Date range for `GET /relatorios` (ISO dates, both optional)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportPeriod {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inicio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fim: Option<String>,
}

impl ReportPeriod {
    /// Blank strings count as unset
    pub fn new(inicio: Option<&str>, fim: Option<&str>) -> Self {
        let clean = |v: Option<&str>| {
            v.map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };
        Self {
            inicio: clean(inicio),
            fim: clean(fim),
        }
    }
}
