//! Page controllers end to end: router + embedded views + in-memory host
//! against a mock backend.

use serde_json::json;
use std::rc::Rc;
use wiremock::matchers::{body_json, body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use painel_api::{ApiClient, ApiConfig};
use painel_core::mock::{MemoryHost, MemorySessionStore, RecordingNavigator};
use painel_core::{Navigation, Notice, Role, Router, UiEvent};
use painel_pages::{routes, EmbeddedViews, Painel};

struct App {
    router: Router<Painel>,
    host: Rc<MemoryHost>,
}

fn app(server: &MockServer, hash: &str, session: MemorySessionStore) -> App {
    let api = ApiClient::new(ApiConfig {
        base_url: format!("{}/api", server.uri()),
        ..Default::default()
    })
    .unwrap();
    let host = Rc::new(MemoryHost::new());
    let router = Router::new(
        routes().unwrap(),
        host.clone(),
        Rc::new(EmbeddedViews),
        Rc::new(RecordingNavigator::new(hash)),
        Rc::new(session),
        Painel::shared(api),
    );
    App { router, host }
}

fn gestor() -> MemorySessionStore {
    MemorySessionStore::authenticated("7", Role::Gestor, Some("INCRA"))
}

fn admin() -> MemorySessionStore {
    MemorySessionStore::authenticated("1", Role::Admin, None)
}

fn denuncias() -> serde_json::Value {
    json!([
        {"id": 1, "titulo": "Ocupação Fazenda Boa Vista", "status": "pendente", "instituicao": "INCRA", "municipio": "Marabá"},
        {"id": 2, "titulo": "Despejo coletivo", "status": "aprovada", "instituicao": "FUNAI", "municipio": "Altamira"},
        {"id": 3, "titulo": "Ameaça a posseiros", "status": "aprovada", "instituicao": "incra", "municipio": "Xinguara"}
    ])
}

async fn mock_get(server: &MockServer, endpoint: &str, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(endpoint))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

// ============================================================================
// Denúncias
// ============================================================================

#[tokio::test]
async fn test_denuncias_scoped_to_gestor_institution() {
    let server = MockServer::start().await;
    mock_get(&server, "/api/denuncias", denuncias()).await;
    let app = app(&server, "#/denuncias", gestor());

    assert!(app.router.load_route().await.is_rendered());

    let list = app.host.rendered("#lista-denuncias").unwrap();
    assert!(list.contains("Ocupação Fazenda Boa Vista"));
    assert!(list.contains("Ameaça a posseiros"));
    assert!(!list.contains("Despejo coletivo"));
    assert_eq!(
        app.host.rendered("#contador-denuncias").as_deref(),
        Some("2 denúncias")
    );
    assert_eq!(app.host.title(), "Denúncias");
}

#[tokio::test]
async fn test_denuncias_status_filter_rerenders_from_cache() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/denuncias"))
        .respond_with(ResponseTemplate::new(200).set_body_json(denuncias()))
        .expect(1)
        .mount(&server)
        .await;
    let app = app(&server, "#/denuncias", admin());
    app.router.load_route().await;

    app.host.set_value("#filtro-status", "pendente");
    app.host
        .dispatch("#filtro-status", UiEvent::new("change", "#filtro-status").with_value("pendente"));

    let list = app.host.rendered("#lista-denuncias").unwrap();
    assert!(list.contains("Ocupação Fazenda Boa Vista"));
    assert!(!list.contains("Despejo coletivo"));
    assert_eq!(
        app.host.rendered("#contador-denuncias").as_deref(),
        Some("1 denúncia")
    );
}

#[tokio::test]
async fn test_approve_reloads_and_keeps_single_listener() {
    let server = MockServer::start().await;
    mock_get(&server, "/api/denuncias", denuncias()).await;
    Mock::given(method("POST"))
        .and(path("/api/denuncias/1/aprovar"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 1, "status": "aprovada"})))
        .expect(1)
        .mount(&server)
        .await;
    let app = app(&server, "#/denuncias", admin());
    app.router.load_route().await;

    assert_eq!(app.host.click_action("#lista-denuncias", "aprovar", "1"), 1);
    app.host.run_pending().await;

    assert_eq!(
        app.host.last_notice(),
        Some((Notice::Success, "Denúncia aprovada.".to_string()))
    );
    assert_eq!(app.host.listeners_on("#lista-denuncias"), 1);
    assert_eq!(app.host.listeners_on("#filtro-status"), 1);

    // A second click after the rebind still runs exactly one handler
    assert_eq!(app.host.click_action("#lista-denuncias", "aprovar", "1"), 1);
}

#[tokio::test]
async fn test_reject_requires_reason() {
    let server = MockServer::start().await;
    mock_get(&server, "/api/denuncias", denuncias()).await;
    Mock::given(method("POST"))
        .and(path("/api/denuncias/1/rejeitar"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    let app = app(&server, "#/denuncias", admin());
    app.router.load_route().await;

    app.host.click_action("#lista-denuncias", "rejeitar", "1");
    app.host.run_pending().await;
    assert_eq!(
        app.host.last_notice(),
        Some((Notice::Error, "Informe o motivo da rejeição.".to_string()))
    );

    app.host.set_value("#motivo-rejeicao", "Fora da área de atuação");
    app.host.click_action("#lista-denuncias", "rejeitar", "1");
    app.host.run_pending().await;
    assert_eq!(
        app.host.last_notice(),
        Some((Notice::Success, "Denúncia rejeitada.".to_string()))
    );
}

#[tokio::test]
async fn test_escalation_uses_denuncia_title() {
    let server = MockServer::start().await;
    mock_get(&server, "/api/denuncias", denuncias()).await;
    Mock::given(method("POST"))
        .and(path("/api/conflitos"))
        .and(body_json(json!({"titulo": "Despejo coletivo", "denuncia_ids": ["2"]})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 40})))
        .expect(1)
        .mount(&server)
        .await;
    let app = app(&server, "#/denuncias", admin());
    app.router.load_route().await;

    let list = app.host.rendered("#lista-denuncias").unwrap();
    assert!(list.contains(r#"data-action="escalar" data-id="2""#));

    app.host.click_action("#lista-denuncias", "escalar", "2");
    app.host.run_pending().await;

    assert_eq!(app.host.last_notice().map(|(kind, _)| kind), Some(Notice::Success));
}

#[tokio::test]
async fn test_action_error_is_reported_as_toast() {
    let server = MockServer::start().await;
    mock_get(&server, "/api/denuncias", denuncias()).await;
    Mock::given(method("POST"))
        .and(path("/api/denuncias/1/aprovar"))
        .respond_with(
            ResponseTemplate::new(422).set_body_json(json!({"message": "Denúncia já analisada"})),
        )
        .mount(&server)
        .await;
    let app = app(&server, "#/denuncias", admin());
    app.router.load_route().await;

    app.host.click_action("#lista-denuncias", "aprovar", "1");
    app.host.run_pending().await;

    assert_eq!(
        app.host.last_notice(),
        Some((Notice::Error, "Denúncia já analisada".to_string()))
    );
    assert!(!app.host.content().contains("page-error"));
}

#[tokio::test]
async fn test_main_list_failure_shows_router_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/denuncias"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    let app = app(&server, "#/denuncias", admin());

    let nav = app.router.load_route().await;

    assert!(matches!(nav, Navigation::Failed { .. }));
    assert!(app.host.content().contains(r#"class="page-error""#));
    assert_eq!(app.host.listener_count(), 0);
}

#[tokio::test]
async fn test_line_user_sees_no_review_actions() {
    let server = MockServer::start().await;
    mock_get(
        &server,
        "/api/denuncias",
        json!([
            {"id": 5, "titulo": "Minha denúncia", "status": "pendente", "usuario_id": 9},
            {"id": 6, "titulo": "De outra pessoa", "status": "pendente", "usuario_id": 10}
        ]),
    )
    .await;
    let app = app(
        &server,
        "#/denuncias",
        MemorySessionStore::authenticated("9", Role::Usuario, None),
    );
    app.router.load_route().await;

    let list = app.host.rendered("#lista-denuncias").unwrap();
    assert!(list.contains("Minha denúncia"));
    assert!(!list.contains("De outra pessoa"));
    assert!(!list.contains("data-action"));
}

// ============================================================================
// Dashboard
// ============================================================================

#[tokio::test]
async fn test_dashboard_degrades_failed_lists_to_zero() {
    let server = MockServer::start().await;
    mock_get(&server, "/api/denuncias", denuncias()).await;
    Mock::given(method("GET"))
        .and(path("/api/conflitos"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    let app = app(&server, "", admin());

    assert!(app.router.start().await.is_rendered());

    assert_eq!(app.host.rendered("#total-denuncias").as_deref(), Some("3"));
    assert_eq!(app.host.rendered("#total-pendentes").as_deref(), Some("1"));
    assert_eq!(app.host.rendered("#total-conflitos").as_deref(), Some("0"));
    assert!(app
        .host
        .rendered("#denuncias-recentes")
        .unwrap()
        .contains("Despejo coletivo"));
}

#[tokio::test]
async fn test_dashboard_refresh_button() {
    let server = MockServer::start().await;
    mock_get(&server, "/api/denuncias", json!([])).await;
    mock_get(&server, "/api/conflitos", json!([{"id": 1, "status": "ativo"}])).await;
    let app = app(&server, "#/dashboard", admin());
    app.router.load_route().await;

    app.host
        .dispatch("#btn-atualizar", UiEvent::new("click", "#btn-atualizar"));
    app.host.run_pending().await;

    assert_eq!(app.host.rendered("#conflitos-ativos").as_deref(), Some("1"));
    assert_eq!(
        app.host.last_notice(),
        Some((Notice::Info, "Painel atualizado.".to_string()))
    );
}

// ============================================================================
// Conflitos
// ============================================================================

#[tokio::test]
async fn test_resolve_conflito_patches_status() {
    let server = MockServer::start().await;
    mock_get(
        &server,
        "/api/conflitos",
        json!([{"id": 8, "titulo": "Área Norte", "status": "ativo", "denuncias": [1, 2]}]),
    )
    .await;
    Mock::given(method("PATCH"))
        .and(path("/api/conflitos/8"))
        .and(body_json(json!({"status": "resolvido"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 8})))
        .expect(1)
        .mount(&server)
        .await;
    let app = app(&server, "#/conflitos", admin());
    app.router.load_route().await;

    let list = app.host.rendered("#lista-conflitos").unwrap();
    assert!(list.contains("<td>2</td>"));
    assert!(list.contains(r#"data-action="resolver""#));

    app.host.click_action("#lista-conflitos", "resolver", "8");
    app.host.run_pending().await;

    assert_eq!(
        app.host.last_notice(),
        Some((Notice::Success, "Conflito marcado como resolvido.".to_string()))
    );
}

// ============================================================================
// Usuários and instituições
// ============================================================================

#[tokio::test]
async fn test_users_page_restricted_for_line_users() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;
    let app = app(
        &server,
        "#/usuarios",
        MemorySessionStore::authenticated("9", Role::Usuario, None),
    );

    assert!(app.router.load_route().await.is_rendered());

    assert!(app
        .host
        .rendered("#aviso-usuarios")
        .unwrap()
        .contains("Acesso restrito"));
    assert_eq!(app.host.listener_count(), 0);
}

#[tokio::test]
async fn test_gestor_registers_user_into_own_institution() {
    let server = MockServer::start().await;
    mock_get(
        &server,
        "/api/usuarios",
        json!([
            {"id": 2, "nome": "Bruno", "instituicao": "INCRA", "ativo": true},
            {"id": 3, "nome": "Carla", "instituicao": "FUNAI", "ativo": true}
        ]),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/api/usuarios/pendentes"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/usuarios"))
        .and(body_string_contains("instituicao=INCRA"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 4})))
        .expect(1)
        .mount(&server)
        .await;
    let app = app(&server, "#/usuarios", gestor());
    app.router.load_route().await;

    let users = app.host.rendered("#lista-usuarios").unwrap();
    assert!(users.contains("Bruno"));
    assert!(!users.contains("Carla"));
    assert!(app
        .host
        .rendered("#lista-pendentes")
        .unwrap()
        .contains("Nenhum cadastro pendente"));

    app.host.set_value("#usuario-nome", "Dora");
    app.host.set_value("#usuario-email", "dora@incra.gov.br");
    app.host.set_value("#usuario-perfil", "usuario");
    app.host.set_value("#usuario-instituicao", "FUNAI");
    app.host.dispatch("#form-usuario", UiEvent::new("submit", "#form-usuario"));
    app.host.run_pending().await;

    assert_eq!(
        app.host.last_notice(),
        Some((Notice::Success, "Usuário cadastrado.".to_string()))
    );
}

#[tokio::test]
async fn test_gestor_cannot_create_admin() {
    let server = MockServer::start().await;
    mock_get(&server, "/api/usuarios", json!([])).await;
    mock_get(&server, "/api/usuarios/pendentes", json!([])).await;
    Mock::given(method("POST"))
        .and(path("/api/usuarios"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;
    let app = app(&server, "#/usuarios", gestor());
    app.router.load_route().await;

    app.host.set_value("#usuario-nome", "Eva");
    app.host.set_value("#usuario-email", "eva@incra.gov.br");
    app.host.set_value("#usuario-perfil", "admin");
    app.host.dispatch("#form-usuario", UiEvent::new("submit", "#form-usuario"));
    app.host.run_pending().await;

    assert_eq!(app.host.last_notice().map(|(kind, _)| kind), Some(Notice::Error));
}

#[tokio::test]
async fn test_pending_user_approval_is_form_encoded() {
    let server = MockServer::start().await;
    mock_get(&server, "/api/usuarios", json!([])).await;
    mock_get(
        &server,
        "/api/usuarios/pendentes",
        json!([{"id": 11, "nome": "Fábio", "email": "f@x.org"}]),
    )
    .await;
    Mock::given(method("POST"))
        .and(path("/api/usuarios/11/aprovar"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .expect(1)
        .mount(&server)
        .await;
    let app = app(&server, "#/usuarios", admin());
    app.router.load_route().await;

    app.host.click_action("#lista-pendentes", "aprovar", "11");
    app.host.run_pending().await;

    assert_eq!(
        app.host.last_notice(),
        Some((Notice::Success, "Cadastro aprovado.".to_string()))
    );
    assert_eq!(app.host.listeners_on("#lista-pendentes"), 1);
}

#[tokio::test]
async fn test_gestor_sees_own_institution_but_cannot_delete() {
    let server = MockServer::start().await;
    mock_get(
        &server,
        "/api/instituicoes",
        json!([{"id": 1, "nome": "INCRA"}, {"id": 2, "nome": "FUNAI"}]),
    )
    .await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&server)
        .await;
    let app = app(&server, "#/instituicoes", gestor());
    app.router.load_route().await;

    let list = app.host.rendered("#lista-instituicoes").unwrap();
    assert!(list.contains("INCRA"));
    assert!(!list.contains("FUNAI"));
    assert!(!list.contains("excluir"));

    app.host.click_action("#lista-instituicoes", "excluir", "1");
    app.host.run_pending().await;
    assert_eq!(app.host.last_notice().map(|(kind, _)| kind), Some(Notice::Error));
}

// ============================================================================
// Relatórios
// ============================================================================

#[tokio::test]
async fn test_reports_page() {
    let server = MockServer::start().await;
    mock_get(&server, "/api/relatorios/resumo", json!({"total_denuncias": 12})).await;
    mock_get(&server, "/api/relatorios", json!({"conflitos_resolvidos": 3})).await;
    let app = app(&server, "#/relatorios", admin());
    app.router.load_route().await;

    assert!(app
        .host
        .rendered("#relatorio-resumo")
        .unwrap()
        .contains("<dd>12</dd>"));

    app.host.set_value("#relatorio-inicio", "2024-01-01");
    app.host.set_value("#relatorio-fim", "2024-12-31");
    app.host
        .dispatch("#btn-gerar-relatorio", UiEvent::new("click", "#btn-gerar-relatorio"));
    app.host.run_pending().await;

    assert!(app
        .host
        .rendered("#relatorio-resultado")
        .unwrap()
        .contains("Conflitos resolvidos"));
}
