//! Painel Pages - the dashboard's routes and page controllers
//!
//! Every page follows the same lifecycle inside `mount`:
//!
//! 1. Fetch its lists through [`painel_api::ApiClient`]. The page's main
//!    list propagates failures to the router; auxiliary lists degrade to
//!    empty with a warning.
//! 2. Scope them to the session's role and institution.
//! 3. Render escaped rows into the view's named targets.
//! 4. Bind handlers through the page scope. List containers use event
//!    delegation (`data-action` / `data-id`), and every action reloads,
//!    re-renders and rebinds its sub-list under the same key.

use std::rc::Rc;

use painel_api::ApiClient;
use painel_core::{Result, Route, RouteTable};

pub mod pages;
pub mod render;
pub mod support;
pub mod views;

pub use views::EmbeddedViews;

/// Services shared by every controller
#[derive(Debug, Clone)]
pub struct Painel {
    api: ApiClient,
}

impl Painel {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn shared(api: ApiClient) -> Rc<Self> {
        Rc::new(Self::new(api))
    }
}

/// Path of the optional not-found page
pub const NOT_FOUND_PATH: &str = "/nao-encontrada";

/// The dashboard's route table. `/dashboard` is first and therefore the
/// default route.
pub fn routes() -> Result<RouteTable<Painel>> {
    RouteTable::new(vec![
        Route::new("/dashboard", "views/dashboard.html")
            .titled("Painel", "Visão geral das denúncias e conflitos")
            .with_controller(pages::dashboard::controller),
        Route::new("/denuncias", "views/denuncias.html")
            .titled("Denúncias", "Triagem e aprovação de denúncias recebidas")
            .with_controller(pages::denuncias::controller),
        Route::new("/conflitos", "views/conflitos.html")
            .titled("Conflitos", "Acompanhamento dos conflitos registrados")
            .with_controller(pages::conflitos::controller),
        Route::new("/usuarios", "views/usuarios.html")
            .titled("Usuários", "Cadastros, aprovações e perfis de acesso")
            .with_controller(pages::usuarios::controller),
        Route::new("/instituicoes", "views/instituicoes.html")
            .titled("Instituições", "Órgãos e entidades participantes")
            .with_controller(pages::instituicoes::controller),
        Route::new("/relatorios", "views/relatorios.html")
            .titled("Relatórios", "Indicadores consolidados por período")
            .with_controller(pages::relatorios::controller),
        Route::new(NOT_FOUND_PATH, "views/404.html").titled("Página não encontrada", ""),
    ])
}
