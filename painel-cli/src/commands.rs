//! Subcommand handlers
//!
//! Each handler returns the text to print so `main` owns stdout.

use std::rc::Rc;

use anyhow::{Context, Result};
use serde_json::Value;
use tracing::info;

use painel_api::ApiClient;
use painel_core::mock::{MemoryHost, MemorySessionStore, RecordingNavigator};
use painel_core::{
    normalize_hash, scope_records, HierarchyScope, Navigation, Router, ScopeFields,
};
use painel_pages::support::{filter_status, record_id, status, text};
use painel_pages::{routes, EmbeddedViews, Painel};

use crate::config::{Args, Command, DenunciaCommand, UsuarioCommand};

pub async fn run(args: &Args) -> Result<String> {
    match &args.command {
        Command::Routes => list_routes(),
        Command::Resolve { hash } => resolve(hash),
        Command::Render { hash } => render(args, hash).await,
        Command::Denuncias(command) => denuncias(args, command).await,
        Command::Usuarios(command) => usuarios(args, command).await,
        Command::Resumo => {
            let resumo = client(args)?.resumo().await?;
            Ok(serde_json::to_string_pretty(&resumo)?)
        }
    }
}

fn client(args: &Args) -> Result<ApiClient> {
    ApiClient::new(args.api_config()).context("Failed to build HTTP client")
}

// ============================================================================
// Routing
// ============================================================================

fn list_routes() -> Result<String> {
    let table = routes()?;
    let lines: Vec<String> = table
        .routes()
        .iter()
        .enumerate()
        .map(|(i, route)| {
            format!(
                "{:<2} {:<18} {:<28} {}{}",
                i,
                route.path,
                route.view,
                route.title,
                if route.controller.is_some() { "" } else { " (static)" }
            )
        })
        .collect();
    Ok(lines.join("\n"))
}

fn resolve(hash: &str) -> Result<String> {
    let table = routes()?;
    let path = normalize_hash(hash, table.default_route().path);
    let route = table.resolve(&path);
    let note = if route.path == path { "" } else { " (fallback)" };
    Ok(format!("{} -> {} [{}]{}", path, route.path, route.view, note))
}

/// Run one navigation against embedded views and an in-memory document.
async fn render(args: &Args, hash: &str) -> Result<String> {
    let session = args.session_context();
    let host = Rc::new(MemoryHost::new());
    let router = Router::new(
        routes()?,
        host.clone(),
        Rc::new(EmbeddedViews),
        Rc::new(RecordingNavigator::new(hash)),
        Rc::new(MemorySessionStore::authenticated(
            &session.user_id,
            session.role.clone(),
            session.institution_name.as_deref(),
        )),
        Painel::shared(client(args)?),
    );

    let outcome = router.load_route().await;
    info!(?outcome, "Render finished");

    let mut out = vec![format!("# {} - {}", host.title(), host.subtitle())];
    if let Navigation::Failed { reason, .. } = &outcome {
        out.push(format!("! {}", reason));
    }
    for target in host.rendered_targets() {
        let markup = host.rendered(&target).unwrap_or_default();
        out.push(format!("[{}]\n{}", target, markup));
    }
    if host.rendered_targets().is_empty() {
        out.push(host.content());
    }
    Ok(out.join("\n\n"))
}

// ============================================================================
// Backend queues
// ============================================================================

async fn denuncias(args: &Args, command: &DenunciaCommand) -> Result<String> {
    let api = client(args)?;
    match command {
        DenunciaCommand::List { status: wanted } => {
            let session = args.session_context();
            let records = scope_records(&session, api.list_denuncias().await?);
            let records = filter_status(&records, wanted.as_deref().unwrap_or_default());
            Ok(table(&records, "titulo"))
        }
        DenunciaCommand::Aprovar { id } => {
            api.aprovar_denuncia(id).await?;
            Ok(format!("Denúncia {} aprovada", id))
        }
        DenunciaCommand::Rejeitar { id, motivo } => {
            anyhow::ensure!(!motivo.trim().is_empty(), "Informe o motivo da rejeição");
            api.rejeitar_denuncia(id, motivo.trim()).await?;
            Ok(format!("Denúncia {} rejeitada", id))
        }
    }
}

async fn usuarios(args: &Args, command: &UsuarioCommand) -> Result<String> {
    let session = args.session_context();
    anyhow::ensure!(
        session.role.can_manage_users(),
        "O perfil {} não gerencia usuários",
        session.role.as_str()
    );
    let api = client(args)?;
    match command {
        UsuarioCommand::Pendentes => {
            let records = HierarchyScope::for_session(&session).apply(
                api.list_usuarios_pendentes().await?,
                &ScopeFields::new("instituicao", "id"),
            );
            Ok(table(&records, "nome"))
        }
        UsuarioCommand::Aprovar { id } => {
            api.aprovar_usuario(id).await?;
            Ok(format!("Usuário {} aprovado", id))
        }
        UsuarioCommand::Rejeitar { id, motivo } => {
            api.rejeitar_usuario(id, motivo.as_deref().unwrap_or_default().trim())
                .await?;
            Ok(format!("Usuário {} rejeitado", id))
        }
    }
}

fn table(records: &[Value], label: &str) -> String {
    if records.is_empty() {
        return "Nenhum registro encontrado.".to_string();
    }
    records
        .iter()
        .map(|record| {
            format!(
                "{:<8} {:<12} {}",
                record_id(record).unwrap_or_else(|| "-".to_string()),
                status(record),
                text(record, label)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn args(api_url: &str, extra: &[&str]) -> Args {
        let mut argv = vec!["painel", "--api-url", api_url];
        argv.extend_from_slice(extra);
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_resolve_falls_back_to_dashboard() {
        assert_eq!(
            resolve("#/denuncias").unwrap(),
            "/denuncias -> /denuncias [views/denuncias.html]"
        );
        assert!(resolve("#/inexistente").unwrap().ends_with("(fallback)"));
        assert!(resolve("").unwrap().starts_with("/dashboard -> /dashboard"));
    }

    #[test]
    fn test_list_routes_starts_with_default() {
        let listing = list_routes().unwrap();
        let first = listing.lines().next().unwrap();
        assert!(first.contains("/dashboard"));
        assert!(listing.contains("(static)"));
    }

    #[tokio::test]
    async fn test_gestor_lists_only_own_institution() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/denuncias"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": 1, "titulo": "Área A", "status": "pendente", "instituicao": "INCRA"},
                {"id": 2, "titulo": "Área B", "status": "pendente", "instituicao": "FUNAI"}
            ])))
            .mount(&server)
            .await;

        let args = args(
            &format!("{}/api", server.uri()),
            &["--role", "gestor", "--instituicao", "incra", "denuncias", "list"],
        );
        let out = run(&args).await.unwrap();

        assert!(out.contains("Área A"));
        assert!(!out.contains("Área B"));
    }

    #[tokio::test]
    async fn test_usuario_role_cannot_manage_users() {
        let args = args("http://127.0.0.1:9/api", &["--role", "usuario", "usuarios", "pendentes"]);
        let err = run(&args).await.unwrap_err();
        assert!(err.to_string().contains("não gerencia usuários"));
    }

    #[tokio::test]
    async fn test_render_prints_page_targets() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/denuncias"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": 7, "titulo": "Ocupação Rio Verde", "status": "pendente"}
            ])))
            .mount(&server)
            .await;

        let args = args(&format!("{}/api", server.uri()), &["render", "#/denuncias"]);
        let out = run(&args).await.unwrap();

        assert!(out.starts_with("# Denúncias"));
        assert!(out.contains("[#lista-denuncias]"));
        assert!(out.contains("Ocupação Rio Verde"));
    }
}
