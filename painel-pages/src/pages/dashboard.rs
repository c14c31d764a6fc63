//! Dashboard: headline counters and the most recent denúncias
//!
//! Both lists are auxiliary here, so a backend failure shows zeros rather
//! than the router's error block.

use async_trait::async_trait;
use serde_json::Value;
use tracing::{info, warn};

use painel_core::{scope_records, Notice, PageContext, PageController, Result};

use crate::render::{date_cell, field_cell, rows, status_badge};
use crate::support::{or_empty, status, text};
use crate::Painel;

const RECENT: &str = "#denuncias-recentes";
const REFRESH: &str = "#btn-atualizar";
const RECENT_LIMIT: usize = 5;

pub fn controller() -> Box<dyn PageController<Painel>> {
    Box::new(DashboardPage)
}

pub struct DashboardPage;

#[async_trait(?Send)]
impl PageController<Painel> for DashboardPage {
    async fn mount(&mut self, cx: &PageContext<Painel>) -> Result<()> {
        load(cx).await?;

        let page = cx.clone();
        cx.scope().bind("atualizar", REFRESH, "click", move |_| {
            let page = page.clone();
            page.scope().clone().spawn(async move {
                match load(&page).await {
                    Ok(()) => page.scope().notify(Notice::Info, "Painel atualizado."),
                    Err(err) => warn!(error = %err, "Dashboard refresh failed"),
                }
            });
        })?;
        Ok(())
    }
}

/// Counters over already-scoped lists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Totals {
    pub denuncias: usize,
    pub pendentes: usize,
    pub conflitos: usize,
    pub conflitos_ativos: usize,
}

impl Totals {
    pub fn count(denuncias: &[Value], conflitos: &[Value]) -> Self {
        Self {
            denuncias: denuncias.len(),
            pendentes: denuncias.iter().filter(|d| status(d) == "pendente").count(),
            conflitos: conflitos.len(),
            conflitos_ativos: conflitos.iter().filter(|c| status(c) == "ativo").count(),
        }
    }
}

async fn load(cx: &PageContext<Painel>) -> Result<()> {
    let api = cx.services().api();
    let (denuncias, conflitos) = futures::join!(
        or_empty("denuncias", api.list_denuncias()),
        or_empty("conflitos", api.list_conflitos()),
    );
    let denuncias = scope_records(cx.session(), denuncias);
    let conflitos = scope_records(cx.session(), conflitos);

    let totals = Totals::count(&denuncias, &conflitos);
    info!(
        denuncias = totals.denuncias,
        pendentes = totals.pendentes,
        conflitos = totals.conflitos,
        "Dashboard loaded"
    );

    let scope = cx.scope();
    scope.render("#total-denuncias", &totals.denuncias.to_string())?;
    scope.render("#total-pendentes", &totals.pendentes.to_string())?;
    scope.render("#total-conflitos", &totals.conflitos.to_string())?;
    scope.render("#conflitos-ativos", &totals.conflitos_ativos.to_string())?;

    let recent = most_recent(denuncias, RECENT_LIMIT);
    let html = rows(&recent, 5, "Nenhuma denúncia registrada.", |record| {
        format!(
            "<tr>{}{}{}{}{}</tr>",
            field_cell(record, "id"),
            field_cell(record, "titulo"),
            field_cell(record, "municipio"),
            status_badge(&status(record)),
            date_cell(record, "data_criacao"),
        )
    });
    scope.render(RECENT, &html)?;
    Ok(())
}

/// Newest first by `data_criacao` (ISO text sorts chronologically)
fn most_recent(mut denuncias: Vec<Value>, limit: usize) -> Vec<Value> {
    denuncias.sort_by_key(|d| std::cmp::Reverse(text(d, "data_criacao")));
    denuncias.truncate(limit);
    denuncias
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_totals() {
        let denuncias = vec![
            json!({"status": "pendente"}),
            json!({"status": "Pendente"}),
            json!({"status": "aprovada"}),
        ];
        let conflitos = vec![json!({"status": "ativo"}), json!({"status": "resolvido"})];
        assert_eq!(
            Totals::count(&denuncias, &conflitos),
            Totals {
                denuncias: 3,
                pendentes: 2,
                conflitos: 2,
                conflitos_ativos: 1
            }
        );
    }

    #[test]
    fn test_most_recent_orders_and_limits() {
        let denuncias = vec![
            json!({"id": 1, "data_criacao": "2024-01-01"}),
            json!({"id": 2, "data_criacao": "2024-03-01"}),
            json!({"id": 3, "data_criacao": "2024-02-01"}),
        ];
        let recent = most_recent(denuncias, 2);
        assert_eq!(recent[0]["id"], 2);
        assert_eq!(recent[1]["id"], 3);
        assert_eq!(recent.len(), 2);
    }
}
