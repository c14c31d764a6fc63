//! Usuários: pending registrations, active users and the registration form
//!
//! Admins and gestores only. Gestores see and create users of their own
//! institution and cannot create administrators; deleting is admin-only.

use async_trait::async_trait;
use serde_json::Value;
use std::cell::RefCell;
use std::rc::Rc;
use tracing::{debug, info, warn};

use painel_api::{NewUsuario, UsuarioUpdate};
use painel_core::{
    HierarchyScope, Notice, PageContext, PageController, Result, Role, ScopeFields,
};

use super::ACCESS_RESTRICTED;
use crate::render::{actions_cell, cell, empty_row, field_cell, notice, rows};
use crate::support::{input, or_empty, report};
use crate::Painel;

const USERS: &str = "#lista-usuarios";
const PENDING: &str = "#lista-pendentes";
const FORM: &str = "#form-usuario";
const WARNING: &str = "#aviso-usuarios";
const REASON: &str = "#motivo-rejeicao-usuario";

pub fn controller() -> Box<dyn PageController<Painel>> {
    Box::new(UsuariosPage::default())
}

#[derive(Default)]
struct Lists {
    usuarios: Vec<Value>,
    pendentes: Vec<Value>,
}

type State = Rc<RefCell<Lists>>;

#[derive(Default)]
pub struct UsuariosPage {
    state: State,
}

#[async_trait(?Send)]
impl PageController<Painel> for UsuariosPage {
    async fn mount(&mut self, cx: &PageContext<Painel>) -> Result<()> {
        let scope = cx.scope();
        if !cx.session().role.can_manage_users() {
            debug!(role = %cx.session().role, "User management not allowed");
            scope.render(WARNING, &notice(ACCESS_RESTRICTED))?;
            scope.render(USERS, &empty_row(6, ACCESS_RESTRICTED))?;
            scope.render(PENDING, &empty_row(4, ACCESS_RESTRICTED))?;
            return Ok(());
        }

        let api = cx.services().api();
        let (usuarios, pendentes) = futures::join!(
            api.list_usuarios(),
            or_empty("usuarios_pendentes", api.list_usuarios_pendentes()),
        );
        let usuarios = usuarios?;
        store(cx, &self.state, usuarios, pendentes);

        render_lists(cx, &self.state)?;
        bind(cx, &self.state)
    }
}

/// Users are scoped by institution; a user record's own id is its owner.
fn scope_fields() -> ScopeFields {
    ScopeFields::new("instituicao", "id")
}

fn store(cx: &PageContext<Painel>, state: &State, usuarios: Vec<Value>, pendentes: Vec<Value>) {
    let visibility = HierarchyScope::for_session(cx.session());
    let fields = scope_fields();
    let mut lists = state.borrow_mut();
    lists.usuarios = visibility.apply(usuarios, &fields);
    lists.pendentes = visibility.apply(pendentes, &fields);
}

fn render_lists(cx: &PageContext<Painel>, state: &State) -> Result<()> {
    let lists = state.borrow();
    let is_admin = cx.session().role == Role::Admin;

    let users = rows(&lists.usuarios, 6, "Nenhum usuário cadastrado.", |record| {
        user_row(record, is_admin)
    });
    let pending = rows(&lists.pendentes, 4, "Nenhum cadastro pendente.", |record| {
        format!(
            "<tr>{}{}{}{}</tr>",
            field_cell(record, "nome"),
            field_cell(record, "email"),
            field_cell(record, "instituicao"),
            actions_cell(record, &[("aprovar", "Aprovar"), ("rejeitar", "Rejeitar")]),
        )
    });

    cx.scope().render(USERS, &users)?;
    cx.scope().render(PENDING, &pending)?;
    Ok(())
}

fn is_active(record: &Value) -> bool {
    record.get("ativo").and_then(Value::as_bool).unwrap_or(true)
}

fn user_row(record: &Value, is_admin: bool) -> String {
    let active = is_active(record);
    let mut actions = vec![if active {
        ("desativar", "Desativar")
    } else {
        ("ativar", "Ativar")
    }];
    if is_admin {
        actions.push(("excluir", "Excluir"));
    }
    format!(
        "<tr>{}{}{}{}{}{}</tr>",
        field_cell(record, "nome"),
        field_cell(record, "email"),
        field_cell(record, "perfil"),
        field_cell(record, "instituicao"),
        cell(if active { "Ativo" } else { "Inativo" }),
        actions_cell(record, &actions),
    )
}

fn bind(cx: &PageContext<Painel>, state: &State) -> Result<()> {
    let scope = cx.scope();

    let (page, lists) = (cx.clone(), Rc::clone(state));
    scope.bind("usuarios", USERS, "click", move |event| {
        let (Some(action), Some(id)) = (event.action.clone(), event.id.clone()) else {
            return;
        };
        page.scope()
            .spawn(user_action(page.clone(), Rc::clone(&lists), action, id));
    })?;

    let (page, lists) = (cx.clone(), Rc::clone(state));
    scope.bind("pendentes", PENDING, "click", move |event| {
        let (Some(action), Some(id)) = (event.action.clone(), event.id.clone()) else {
            return;
        };
        page.scope()
            .spawn(pending_action(page.clone(), Rc::clone(&lists), action, id));
    })?;

    let (page, lists) = (cx.clone(), Rc::clone(state));
    scope.bind("form", FORM, "submit", move |_| {
        match registration(&page) {
            Ok(usuario) => page
                .scope()
                .spawn(register(page.clone(), Rc::clone(&lists), usuario)),
            Err(message) => page.scope().notify(Notice::Error, message),
        }
    })?;

    Ok(())
}

async fn user_action(cx: PageContext<Painel>, state: State, action: String, id: String) {
    let api = cx.services().api();
    let done = match action.as_str() {
        "ativar" | "desativar" => {
            let update = UsuarioUpdate {
                ativo: Some(action == "ativar"),
                ..Default::default()
            };
            let success = if action == "ativar" {
                "Usuário ativado."
            } else {
                "Usuário desativado."
            };
            report(cx.scope(), api.update_usuario(&id, &update).await, success)
        }
        "excluir" => {
            if cx.session().role != Role::Admin {
                cx.scope()
                    .notify(Notice::Error, "Apenas administradores podem excluir usuários.");
                return;
            }
            report(cx.scope(), api.delete_usuario(&id).await, "Usuário excluído.")
        }
        other => {
            debug!(action = other, "Ignoring unknown user action");
            return;
        }
    };
    if done {
        info!(action = %action, id = %id, "User updated");
        reload(&cx, &state).await;
    }
}

async fn pending_action(cx: PageContext<Painel>, state: State, action: String, id: String) {
    let api = cx.services().api();
    let done = match action.as_str() {
        "aprovar" => report(cx.scope(), api.aprovar_usuario(&id).await, "Cadastro aprovado."),
        "rejeitar" => {
            let Some(motivo) = input(cx.scope(), REASON) else {
                cx.scope()
                    .notify(Notice::Error, "Informe o motivo da rejeição.");
                return;
            };
            report(
                cx.scope(),
                api.rejeitar_usuario(&id, &motivo).await,
                "Cadastro rejeitado.",
            )
        }
        other => {
            debug!(action = other, "Ignoring unknown registration action");
            return;
        }
    };
    if done {
        info!(action = %action, id = %id, "Registration reviewed");
        reload(&cx, &state).await;
    }
}

/// Read the registration form. Gestores register into their own
/// institution and cannot grant the admin profile.
fn registration(cx: &PageContext<Painel>) -> std::result::Result<NewUsuario, &'static str> {
    let scope = cx.scope();
    let (Some(nome), Some(email)) = (input(scope, "#usuario-nome"), input(scope, "#usuario-email"))
    else {
        return Err("Preencha nome e e-mail.");
    };
    let perfil = input(scope, "#usuario-perfil").unwrap_or_else(|| "usuario".to_string());
    let session = cx.session();

    let instituicao = match session.role {
        Role::Admin => input(scope, "#usuario-instituicao"),
        _ => {
            if Role::parse(&perfil) == Role::Admin {
                return Err("Gestores não podem cadastrar administradores.");
            }
            session.institution_name.clone()
        }
    };

    Ok(NewUsuario {
        nome,
        email,
        perfil,
        instituicao,
    })
}

async fn register(cx: PageContext<Painel>, state: State, usuario: NewUsuario) {
    let result = cx.services().api().create_usuario(&usuario).await;
    if report(cx.scope(), result, "Usuário cadastrado.") {
        info!(perfil = %usuario.perfil, "User registered");
        reload(&cx, &state).await;
    }
}

async fn reload(cx: &PageContext<Painel>, state: &State) {
    let api = cx.services().api();
    let (usuarios, pendentes) = futures::join!(
        api.list_usuarios(),
        or_empty("usuarios_pendentes", api.list_usuarios_pendentes()),
    );
    let usuarios = match usuarios {
        Ok(usuarios) => usuarios,
        Err(err) => {
            cx.scope().notify(Notice::Error, &err.message());
            return;
        }
    };
    if !cx.is_current() {
        return;
    }
    store(cx, state, usuarios, pendentes);

    if let Err(err) = render_lists(cx, state).and_then(|_| bind(cx, state)) {
        warn!(error = %err, "Failed to refresh users");
    }
}
