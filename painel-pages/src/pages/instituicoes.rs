//! Instituições: listing for admins and gestores, writes for admins

use async_trait::async_trait;
use serde_json::Value;
use std::cell::RefCell;
use std::rc::Rc;
use tracing::{debug, info, warn};

use painel_api::InstituicaoInput;
use painel_core::{HierarchyScope, Notice, PageContext, PageController, Result, ScopeFields};

use super::ACCESS_RESTRICTED;
use crate::render::{actions_cell, cell, empty_row, field_cell, rows};
use crate::support::{input, report};
use crate::Painel;

const LIST: &str = "#lista-instituicoes";
const FORM: &str = "#form-instituicao";
const ADMIN_ONLY: &str = "Apenas administradores podem alterar instituições.";

type Records = Rc<RefCell<Vec<Value>>>;

pub fn controller() -> Box<dyn PageController<Painel>> {
    Box::new(InstituicoesPage::default())
}

#[derive(Default)]
pub struct InstituicoesPage {
    records: Records,
}

#[async_trait(?Send)]
impl PageController<Painel> for InstituicoesPage {
    async fn mount(&mut self, cx: &PageContext<Painel>) -> Result<()> {
        if !cx.session().role.can_manage_users() {
            cx.scope().render(LIST, &empty_row(4, ACCESS_RESTRICTED))?;
            return Ok(());
        }

        let fetched = cx.services().api().list_instituicoes().await?;
        store(cx, &self.records, fetched);

        render_list(cx, &self.records)?;
        bind(cx, &self.records)
    }
}

/// A gestor's institution is matched against the record's own name.
fn store(cx: &PageContext<Painel>, records: &Records, fetched: Vec<Value>) {
    let fields = ScopeFields::new("nome", "id");
    *records.borrow_mut() = HierarchyScope::for_session(cx.session()).apply(fetched, &fields);
}

fn render_list(cx: &PageContext<Painel>, records: &Records) -> Result<()> {
    let can_write = cx.session().role.can_manage_institutions();
    let html = rows(
        &records.borrow(),
        4,
        "Nenhuma instituição cadastrada.",
        |record| {
            let active = record.get("ativa").and_then(Value::as_bool).unwrap_or(true);
            let actions: &[(&str, &str)] = if can_write {
                &[("excluir", "Excluir")]
            } else {
                &[]
            };
            format!(
                "<tr>{}{}{}{}</tr>",
                field_cell(record, "nome"),
                field_cell(record, "sigla"),
                cell(if active { "Ativa" } else { "Inativa" }),
                actions_cell(record, actions),
            )
        },
    );
    cx.scope().render(LIST, &html)?;
    Ok(())
}

fn bind(cx: &PageContext<Painel>, records: &Records) -> Result<()> {
    let scope = cx.scope();

    let (page, list) = (cx.clone(), Rc::clone(records));
    scope.bind("lista", LIST, "click", move |event| {
        if event.action.as_deref() != Some("excluir") {
            return;
        }
        let Some(id) = event.id.clone() else {
            return;
        };
        page.scope()
            .spawn(remove(page.clone(), Rc::clone(&list), id));
    })?;

    let (page, list) = (cx.clone(), Rc::clone(records));
    scope.bind("form", FORM, "submit", move |_| {
        if !page.session().role.can_manage_institutions() {
            page.scope().notify(Notice::Error, ADMIN_ONLY);
            return;
        }
        let Some(nome) = input(page.scope(), "#instituicao-nome") else {
            page.scope()
                .notify(Notice::Error, "Informe o nome da instituição.");
            return;
        };
        let instituicao = InstituicaoInput {
            nome,
            sigla: input(page.scope(), "#instituicao-sigla"),
        };
        page.scope()
            .spawn(create(page.clone(), Rc::clone(&list), instituicao));
    })?;

    Ok(())
}

async fn remove(cx: PageContext<Painel>, records: Records, id: String) {
    if !cx.session().role.can_manage_institutions() {
        cx.scope().notify(Notice::Error, ADMIN_ONLY);
        return;
    }
    let result = cx.services().api().delete_instituicao(&id).await;
    if report(cx.scope(), result, "Instituição excluída.") {
        info!(id = %id, "Institution deleted");
        reload(&cx, &records).await;
    }
}

async fn create(cx: PageContext<Painel>, records: Records, instituicao: InstituicaoInput) {
    let result = cx.services().api().create_instituicao(&instituicao).await;
    if report(cx.scope(), result, "Instituição cadastrada.") {
        info!(nome = %instituicao.nome, "Institution created");
        reload(&cx, &records).await;
    }
}

async fn reload(cx: &PageContext<Painel>, records: &Records) {
    let fetched = match cx.services().api().list_instituicoes().await {
        Ok(fetched) => fetched,
        Err(err) => {
            cx.scope().notify(Notice::Error, &err.message());
            return;
        }
    };
    if !cx.is_current() {
        debug!("Institution reload finished after navigation");
        return;
    }
    store(cx, records, fetched);

    if let Err(err) = render_list(cx, records).and_then(|_| bind(cx, records)) {
        warn!(error = %err, "Failed to refresh institutions");
    }
}
