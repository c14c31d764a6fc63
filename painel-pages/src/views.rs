//! View templates compiled into the binary
//!
//! The web app fetches these over HTTP like any other static file; the
//! embedded copies serve headless rendering and tests.

use async_trait::async_trait;

use painel_core::{PainelError, Result, ViewSource};

const VIEWS: &[(&str, &str)] = &[
    ("views/dashboard.html", include_str!("../views/dashboard.html")),
    ("views/denuncias.html", include_str!("../views/denuncias.html")),
    ("views/conflitos.html", include_str!("../views/conflitos.html")),
    ("views/usuarios.html", include_str!("../views/usuarios.html")),
    ("views/instituicoes.html", include_str!("../views/instituicoes.html")),
    ("views/relatorios.html", include_str!("../views/relatorios.html")),
    ("views/404.html", include_str!("../views/404.html")),
];

/// Markup of an embedded view
pub fn markup(view: &str) -> Option<&'static str> {
    VIEWS
        .iter()
        .find(|(name, _)| *name == view)
        .map(|(_, markup)| *markup)
}

/// View source over the embedded templates
#[derive(Debug, Default, Clone, Copy)]
pub struct EmbeddedViews;

#[async_trait(?Send)]
impl ViewSource for EmbeddedViews {
    async fn fetch_view(&self, view: &str) -> Result<String> {
        markup(view)
            .map(str::to_string)
            .ok_or_else(|| PainelError::ViewNotFound {
                view: view.to_string(),
                status: 404,
            })
    }
}
