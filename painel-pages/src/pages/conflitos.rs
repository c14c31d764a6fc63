//! Conflitos: formal cases and their lifecycle

use async_trait::async_trait;
use serde_json::Value;
use std::cell::RefCell;
use std::rc::Rc;
use tracing::{debug, info, warn};

use painel_api::ConflitoStatus;
use painel_core::{scope_records, Notice, PageContext, PageController, Result};

use crate::render::{actions_cell, counter, field_cell, rows, status_badge};
use crate::support::{filter_status, input, report, status};
use crate::Painel;

const LIST: &str = "#lista-conflitos";
const FILTER: &str = "#filtro-status-conflito";
const COUNTER: &str = "#contador-conflitos";
const COLUMNS: usize = 6;

type Records = Rc<RefCell<Vec<Value>>>;

pub fn controller() -> Box<dyn PageController<Painel>> {
    Box::new(ConflitosPage::default())
}

#[derive(Default)]
pub struct ConflitosPage {
    records: Records,
}

#[async_trait(?Send)]
impl PageController<Painel> for ConflitosPage {
    async fn mount(&mut self, cx: &PageContext<Painel>) -> Result<()> {
        let fetched = cx.services().api().list_conflitos().await?;
        *self.records.borrow_mut() = scope_records(cx.session(), fetched);

        render_list(cx, &self.records)?;
        bind(cx, &self.records)
    }
}

/// Status transition behind each row action
fn transition(action: &str) -> Option<(ConflitoStatus, &'static str)> {
    match action {
        "resolver" => Some((ConflitoStatus::Resolvido, "Conflito marcado como resolvido.")),
        "cancelar" => Some((ConflitoStatus::Cancelado, "Conflito cancelado.")),
        "reativar" => Some((ConflitoStatus::Ativo, "Conflito reativado.")),
        _ => None,
    }
}

fn render_list(cx: &PageContext<Painel>, records: &Records) -> Result<()> {
    let filter = input(cx.scope(), FILTER).unwrap_or_else(|| "todos".to_string());
    let shown = filter_status(&records.borrow(), &filter);
    let can_review = cx.session().role.can_review();

    let html = rows(&shown, COLUMNS, "Nenhum conflito encontrado.", |record| {
        row(record, can_review)
    });
    cx.scope().render(LIST, &html)?;
    cx.scope()
        .render(COUNTER, &counter(shown.len(), "conflito", "conflitos"))?;
    Ok(())
}

fn row(record: &Value, can_review: bool) -> String {
    let current = status(record);
    let actions: &[(&str, &str)] = match (can_review, ConflitoStatus::parse(&current)) {
        (true, Some(ConflitoStatus::Ativo)) => &[("resolver", "Resolver"), ("cancelar", "Cancelar")],
        (true, Some(_)) => &[("reativar", "Reativar")],
        _ => &[],
    };
    format!(
        "<tr>{}{}{}{}{}{}</tr>",
        field_cell(record, "id"),
        field_cell(record, "titulo"),
        field_cell(record, "denuncias"),
        field_cell(record, "instituicao"),
        status_badge(&current),
        actions_cell(record, actions),
    )
}

fn bind(cx: &PageContext<Painel>, records: &Records) -> Result<()> {
    let scope = cx.scope();

    let (page, list) = (cx.clone(), Rc::clone(records));
    scope.bind("filtro", FILTER, "change", move |_| {
        if let Err(err) = render_list(&page, &list) {
            warn!(error = %err, "Failed to apply conflito filter");
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
    let Some((next, success)) = transition(&action) else {
        debug!(action = %action, "Ignoring unknown conflito action");
        return;
    };
    if !cx.session().role.can_review() {
        cx.scope()
            .notify(Notice::Error, "Seu perfil não permite alterar conflitos.");
        return;
    }

    let result = cx.services().api().set_conflito_status(&id, next).await;
    if report(cx.scope(), result, success) {
        info!(id = %id, status = next.as_str(), "Conflito status changed");
        reload(&cx, &records).await;
    }
}

async fn reload(cx: &PageContext<Painel>, records: &Records) {
    let fetched = match cx.services().api().list_conflitos().await {
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
        warn!(error = %err, "Failed to refresh conflitos");
    }
}
