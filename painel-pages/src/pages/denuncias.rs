//! Denúncias: triage list with a status filter and row actions
//!
//! Reviewers (admin, gestor) can approve or reject pending denúncias and
//! escalate approved ones into a conflito. Rejection requires a reason.

use async_trait::async_trait;
use serde_json::Value;
use std::cell::RefCell;
use std::rc::Rc;
use tracing::{debug, info, warn};

use painel_api::EscalateDenuncias;
use painel_core::{scope_records, Notice, PageContext, PageController, Result};

use crate::render::{actions_cell, counter, field_cell, rows, status_badge};
use crate::support::{filter_status, input, record_id, report, status, text};
use crate::Painel;

const LIST: &str = "#lista-denuncias";
const FILTER: &str = "#filtro-status";
const COUNTER: &str = "#contador-denuncias";
const REASON: &str = "#motivo-rejeicao";
const COLUMNS: usize = 6;

type Records = Rc<RefCell<Vec<Value>>>;

pub fn controller() -> Box<dyn PageController<Painel>> {
    Box::new(DenunciasPage::default())
}

#[derive(Default)]
pub struct DenunciasPage {
    records: Records,
}

#[async_trait(?Send)]
impl PageController<Painel> for DenunciasPage {
    async fn mount(&mut self, cx: &PageContext<Painel>) -> Result<()> {
        let fetched = cx.services().api().list_denuncias().await?;
        let visible = scope_records(cx.session(), fetched);
        info!(count = visible.len(), role = %cx.session().role, "Loaded denúncias");
        *self.records.borrow_mut() = visible;

        render_list(cx, &self.records)?;
        bind(cx, &self.records)
    }

    fn unmount(&mut self, _cx: &PageContext<Painel>) {
        self.records.borrow_mut().clear();
    }
}

fn render_list(cx: &PageContext<Painel>, records: &Records) -> Result<()> {
    let filter = input(cx.scope(), FILTER).unwrap_or_else(|| "todas".to_string());
    let shown = filter_status(&records.borrow(), &filter);
    let can_review = cx.session().role.can_review();

    let html = rows(&shown, COLUMNS, "Nenhuma denúncia encontrada.", |record| {
        row(record, can_review)
    });
    cx.scope().render(LIST, &html)?;
    cx.scope()
        .render(COUNTER, &counter(shown.len(), "denúncia", "denúncias"))?;
    Ok(())
}

fn row(record: &Value, can_review: bool) -> String {
    let actions: &[(&str, &str)] = match (can_review, status(record).as_str()) {
        (false, _) => &[],
        (true, "pendente") => &[("aprovar", "Aprovar"), ("rejeitar", "Rejeitar")],
        (true, "aprovada") => &[("escalar", "Escalar para conflito")],
        _ => &[],
    };
    format!(
        "<tr>{}{}{}{}{}{}</tr>",
        field_cell(record, "id"),
        field_cell(record, "titulo"),
        field_cell(record, "municipio"),
        field_cell(record, "instituicao"),
        status_badge(&status(record)),
        actions_cell(record, actions),
    )
}

fn bind(cx: &PageContext<Painel>, records: &Records) -> Result<()> {
    let scope = cx.scope();

    let (page, list) = (cx.clone(), Rc::clone(records));
    scope.bind("filtro", FILTER, "change", move |_| {
        if let Err(err) = render_list(&page, &list) {
            warn!(error = %err, "Failed to apply denúncia filter");
        }
    })?;

    let (page, list) = (cx.clone(), Rc::clone(records));
    scope.bind("lista", LIST, "click", move |event| {
        let (Some(action), Some(id)) = (event.action.clone(), event.id.clone()) else {
            return;
        };
        page.scope()
            .spawn(run_action(page.clone(), Rc::clone(&list), action, id));
    })?;

    Ok(())
}

async fn run_action(cx: PageContext<Painel>, records: Records, action: String, id: String) {
    let scope = cx.scope();
    if !cx.session().role.can_review() {
        scope.notify(Notice::Error, "Seu perfil não permite revisar denúncias.");
        return;
    }

    let api = cx.services().api();
    let done = match action.as_str() {
        "aprovar" => report(scope, api.aprovar_denuncia(&id).await, "Denúncia aprovada."),
        "rejeitar" => {
            let Some(motivo) = input(scope, REASON) else {
                scope.notify(Notice::Error, "Informe o motivo da rejeição.");
                return;
            };
            report(
                scope,
                api.rejeitar_denuncia(&id, &motivo).await,
                "Denúncia rejeitada.",
            )
        }
        "escalar" => {
            let escalation = EscalateDenuncias {
                titulo: escalation_title(&records.borrow(), &id),
                denuncia_ids: vec![id.clone()],
            };
            report(
                scope,
                api.escalar_denuncias(&escalation).await,
                "Conflito criado a partir da denúncia.",
            )
        }
        other => {
            debug!(action = other, "Ignoring unknown denúncia action");
            return;
        }
    };

    if done {
        info!(action = %action, id = %id, "Denúncia updated");
        reload(&cx, &records).await;
    }
}

fn escalation_title(records: &[Value], id: &str) -> String {
    records
        .iter()
        .find(|record| record_id(record).as_deref() == Some(id))
        .map(|record| text(record, "titulo"))
        .filter(|titulo| !titulo.trim().is_empty())
        .unwrap_or_else(|| format!("Denúncia {}", id))
}

async fn reload(cx: &PageContext<Painel>, records: &Records) {
    let fetched = match cx.services().api().list_denuncias().await {
        Ok(fetched) => fetched,
        Err(err) => {
            cx.scope().notify(Notice::Error, &err.message());
            return;
        }
    };
    if !cx.is_current() {
        return;
    }
    *records.borrow_mut() = scope_records(cx.session(), fetched);

    if let Err(err) = render_list(cx, records).and_then(|_| bind(cx, records)) {
        warn!(error = %err, "Failed to refresh denúncias");
    }
}
