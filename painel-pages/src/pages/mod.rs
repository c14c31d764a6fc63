//! One controller per route

pub mod conflitos;
pub mod dashboard;
pub mod denuncias;
pub mod instituicoes;
pub mod relatorios;
pub mod usuarios;

/// Shown on management pages to roles without access
pub const ACCESS_RESTRICTED: &str = "Acesso restrito a administradores e gestores.";
