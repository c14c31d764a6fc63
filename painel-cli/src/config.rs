//! Configuration for the painel CLI
//!
//! CLI arguments and environment variable handling using clap.

use clap::{Parser, Subcommand};

use painel_api::ApiConfig;
use painel_core::{Role, SessionContext};

/// Painel - land-conflict dashboard from the terminal
#[derive(Parser, Debug, Clone)]
#[command(name = "painel")]
#[command(about = "Inspect routes and work the denúncia/usuário queues of the dashboard backend")]
#[command(version)]
pub struct Args {
    /// REST backend base URL
    #[arg(long, env = "PAINEL_API_URL", default_value = "http://localhost:8080/api")]
    pub api_url: String,

    /// Bearer token for the backend
    #[arg(long, env = "PAINEL_TOKEN")]
    pub token: Option<String>,

    /// Request timeout in seconds
    #[arg(long, env = "PAINEL_TIMEOUT_SECS", default_value = "30")]
    pub timeout_secs: u64,

    /// Session identity used for rendering and scoping
    #[command(flatten)]
    pub session: SessionArgs,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

/// Who the CLI acts as
#[derive(clap::Args, Debug, Clone)]
pub struct SessionArgs {
    /// User id written to the session store
    #[arg(long, env = "PAINEL_USER_ID", default_value = "cli")]
    pub user_id: String,

    /// Role (admin, gestor, usuario)
    #[arg(long, env = "PAINEL_ROLE", default_value = "admin")]
    pub role: String,

    /// Institution name, for gestor scoping
    #[arg(long, env = "PAINEL_INSTITUICAO")]
    pub instituicao: Option<String>,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// List the route table in order
    Routes,

    /// Show which route a hash resolves to
    Resolve {
        /// Hash fragment, e.g. `#/denuncias`
        hash: String,
    },

    /// Run the router headlessly and print the rendered page
    Render {
        /// Hash fragment, e.g. `#/denuncias`
        hash: String,
    },

    /// Denúncia triage
    #[command(subcommand)]
    Denuncias(DenunciaCommand),

    /// User registration queue
    #[command(subcommand)]
    Usuarios(UsuarioCommand),

    /// Consolidated indicators
    Resumo,
}

#[derive(Debug, Clone, Subcommand)]
pub enum DenunciaCommand {
    /// List denúncias visible to the session
    List {
        /// Only this status
        #[arg(short, long)]
        status: Option<String>,
    },

    /// Approve a denúncia
    Aprovar { id: String },

    /// Reject a denúncia
    Rejeitar {
        id: String,
        /// Reason shown to the reporter
        #[arg(short, long)]
        motivo: String,
    },
}

#[derive(Debug, Clone, Subcommand)]
pub enum UsuarioCommand {
    /// Users awaiting approval, scoped to the session
    Pendentes,

    /// Approve a pending user
    Aprovar { id: String },

    /// Reject a pending user
    Rejeitar {
        id: String,
        #[arg(short, long)]
        motivo: Option<String>,
    },
}

impl Args {
    pub fn api_config(&self) -> ApiConfig {
        ApiConfig {
            base_url: self.api_url.clone(),
            timeout_secs: self.timeout_secs,
            token: self.token.clone().filter(|t| !t.trim().is_empty()),
        }
    }

    pub fn role(&self) -> Role {
        Role::parse(&self.session.role)
    }

    pub fn session_context(&self) -> SessionContext {
        let session = SessionContext::new(&self.session.user_id, self.role());
        match &self.session.instituicao {
            Some(instituicao) => session.with_institution(instituicao),
            None => session,
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.timeout_secs == 0 {
            return Err("PAINEL_TIMEOUT_SECS must be greater than zero".to_string());
        }
        if !self.api_url.starts_with("http://") && !self.api_url.starts_with("https://") {
            return Err("PAINEL_API_URL must be an absolute http(s) URL".to_string());
        }
        if let Role::Unknown(raw) = self.role() {
            return Err(format!("Unknown role: {}", raw));
        }
        if self.role() == Role::Gestor && self.session.instituicao.is_none() {
            return Err("A gestor session needs --instituicao".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("painel").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_defaults() {
        let args = parse(&["routes"]);
        assert_eq!(args.api_url, "http://localhost:8080/api");
        assert_eq!(args.role(), Role::Admin);
        assert!(matches!(args.command, Command::Routes));
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_nested_subcommand() {
        let args = parse(&["denuncias", "rejeitar", "12", "--motivo", "Duplicada"]);
        match args.command {
            Command::Denuncias(DenunciaCommand::Rejeitar { id, motivo }) => {
                assert_eq!(id, "12");
                assert_eq!(motivo, "Duplicada");
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_gestor_requires_institution() {
        let args = parse(&["--role", "gestor", "usuarios", "pendentes"]);
        assert!(args.validate().is_err());

        let args = parse(&["--role", "Gestor", "--instituicao", "INCRA", "usuarios", "pendentes"]);
        assert!(args.validate().is_ok());
        assert_eq!(args.session_context().institution_name.as_deref(), Some("INCRA"));
    }

    #[test]
    fn test_rejects_unknown_role_and_relative_url() {
        assert!(parse(&["--role", "visitante", "routes"]).validate().is_err());
        assert!(parse(&["--api-url", "/api", "routes"]).validate().is_err());
    }

    #[test]
    fn test_blank_token_is_dropped() {
        let args = parse(&["--token", "  ", "resumo"]);
        assert_eq!(args.api_config().token, None);
    }
}
