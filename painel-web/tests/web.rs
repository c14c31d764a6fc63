//! Browser tests, run with `wasm-pack test --headless --firefox painel-web`

#![cfg(target_arch = "wasm32")]

use std::cell::Cell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;

use painel_core::{Handler, Navigator, Notice, PageHost, SessionStore, UiEvent};
use painel_web::config::ShellSelectors;
use painel_web::views::resolve_url;
use painel_web::{DomHost, HashNavigator, LocalStorageSession};

wasm_bindgen_test_configure!(run_in_browser);

fn shell() -> DomHost {
    let window = web_sys::window().unwrap();
    let document = window.document().unwrap();
    let body = document.body().unwrap();
    body.set_inner_html(
        r##"<ul class="sidebar"><li><a href="#/dashboard">Painel</a></li><li><a href="#/denuncias">Denúncias</a></li></ul>
        <h2 id="titulo-pagina"></h2><p id="subtitulo-pagina"></p>
        <div id="carregando" hidden></div><div id="conteudo"></div><div id="toasts"></div>"##,
    );
    DomHost::new(window, ShellSelectors::default(), 50).unwrap()
}

fn inner(selector: &str) -> String {
    web_sys::window()
        .unwrap()
        .document()
        .unwrap()
        .query_selector(selector)
        .unwrap()
        .unwrap()
        .inner_html()
}

#[wasm_bindgen_test]
fn test_shell_operations() {
    let host = shell();

    host.set_heading("Denúncias", "Triagem");
    host.set_content("<p>ok</p>");
    host.mark_active_nav("/denuncias");

    assert_eq!(inner("#titulo-pagina"), "Denúncias");
    assert_eq!(inner("#conteudo"), "<p>ok</p>");
    let active = web_sys::window()
        .unwrap()
        .document()
        .unwrap()
        .query_selector_all(".sidebar li.active")
        .unwrap();
    assert_eq!(active.length(), 1);

    host.clear_content();
    assert_eq!(inner("#conteudo"), "");
}

#[wasm_bindgen_test]
fn test_render_into_missing_target_fails() {
    let host = shell();
    assert!(host.render("#nao-existe", "<tr></tr>").is_err());
}

fn noop() -> Handler {
    Rc::new(|_: &UiEvent| {})
}

#[wasm_bindgen_test]
fn test_rebinding_drops_retired_closures() {
    let host = shell();
    host.set_content(r#"<button id="salvar"></button>"#);

    let mut id = host.add_listener("#salvar", "click", noop()).unwrap();
    for _ in 0..10 {
        host.remove_listener(id);
        assert_eq!(host.retired_count(), 1);
        id = host.add_listener("#salvar", "click", noop()).unwrap();
        assert_eq!(host.retired_count(), 0);
    }
}

#[wasm_bindgen_test]
fn test_handler_rebinding_itself_keeps_closure_until_it_returns() {
    let host = Rc::new(shell());
    host.set_content(r#"<button id="salvar"></button>"#);
    let own_id = Rc::new(Cell::new(0));
    let clicks = Rc::new(Cell::new(0));

    let handler: Handler = {
        let host = Rc::clone(&host);
        let own_id = Rc::clone(&own_id);
        let clicks = Rc::clone(&clicks);
        Rc::new(move |_: &UiEvent| {
            clicks.set(clicks.get() + 1);
            host.remove_listener(own_id.get());
            let next = host.add_listener("#salvar", "click", noop()).unwrap();
            own_id.set(next);
        })
    };
    own_id.set(host.add_listener("#salvar", "click", handler).unwrap());

    let button = web_sys::window()
        .unwrap()
        .document()
        .unwrap()
        .query_selector("#salvar")
        .unwrap()
        .unwrap()
        .dyn_into::<web_sys::HtmlElement>()
        .unwrap();
    button.click();

    assert_eq!(clicks.get(), 1);
    assert_eq!(host.retired_count(), 1);

    host.add_listener("#salvar", "click", noop()).unwrap();
    assert_eq!(host.retired_count(), 0);
}

#[wasm_bindgen_test]
fn test_notify_appends_toast() {
    let host = shell();
    host.notify(Notice::Success, "Salvo");
    assert!(inner("#toasts").contains("toast-success"));
}

#[wasm_bindgen_test]
fn test_session_reads_local_storage() {
    let window = web_sys::window().unwrap();
    let storage = window.local_storage().unwrap().unwrap();
    storage.set_item("userId", "42").unwrap();

    let session = LocalStorageSession::new(&window);
    assert_eq!(session.get("userId").as_deref(), Some("42"));

    storage.remove_item("userId").unwrap();
    assert_eq!(session.get("userId"), None);
}

#[wasm_bindgen_test]
fn test_replace_hash_keeps_history_length() {
    let window = web_sys::window().unwrap();
    let navigator = HashNavigator::new(window.clone());
    let before = window.history().unwrap().length().unwrap();

    navigator.replace_hash("#/dashboard");

    assert_eq!(navigator.current_hash(), "#/dashboard");
    assert_eq!(window.history().unwrap().length().unwrap(), before);
}

#[wasm_bindgen_test]
fn test_resolve_relative_url() {
    assert_eq!(
        resolve_url("/api", "http://painel.local/app/index.html").unwrap(),
        "http://painel.local/api"
    );
    assert_eq!(
        resolve_url("views/denuncias.html", "http://painel.local/app/").unwrap(),
        "http://painel.local/app/views/denuncias.html"
    );
}
