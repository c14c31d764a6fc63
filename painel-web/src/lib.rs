//! Painel Web - browser entry point
//!
//! Wires the router to the live document: [`dom::DomHost`] for the shell and
//! page targets, `localStorage` for the session, `location.hash` for
//! navigation and HTTP for view templates.
//!
//! ## Usage in the shell page
//!
//! ```html
//! <script>
//!   window.PAINEL_CONFIG = { api: { base_url: "/api" }, router: { login_url: "login.html" } };
//! </script>
//! <script type="module">
//!   import init, { navigate } from './pkg/painel_web.js';
//!   await init();
//! </script>
//! ```
//!
//! ## Build
//!
//! ```bash
//! wasm-pack build painel-web --target web --out-dir static/pkg
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use tracing::{debug, info};
use wasm_bindgen::prelude::*;

use painel_api::ApiClient;
use painel_core::session::KEY_TOKEN;
use painel_core::{Router, SessionStore};
use painel_pages::Painel;

pub mod config;
pub mod dom;
pub mod logging;
pub mod session;
pub mod views;

pub use config::WebConfig;
pub use dom::DomHost;
pub use session::{HashNavigator, LocalStorageSession};
pub use views::HttpViews;

// Initialize panic hook for better error messages in browser console
#[cfg(feature = "console_error_panic_hook")]
pub fn set_panic_hook() {
    console_error_panic_hook::set_once();
}

thread_local! {
    static APP: RefCell<Option<Rc<Router<Painel>>>> = const { RefCell::new(None) };
}

/// Boot the dashboard once the bundle is loaded.
#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    #[cfg(feature = "console_error_panic_hook")]
    set_panic_hook();

    let config = WebConfig::from_window();
    logging::init(&config.log_level);

    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let base = document
        .base_uri()
        .ok()
        .flatten()
        .unwrap_or_else(|| window.location().href().unwrap_or_default());

    let session = LocalStorageSession::new(&window);

    let mut api_config = config.api.clone();
    api_config.base_url = views::resolve_url(&api_config.base_url, &base).map_err(to_js)?;
    if api_config.token.is_none() {
        api_config.token = session.get(KEY_TOKEN);
    }
    let api = ApiClient::new(api_config).map_err(|err| JsValue::from_str(&err.to_string()))?;

    let views_base = match &config.views_base {
        Some(views_base) => views::resolve_url(views_base, &base).map_err(to_js)?,
        None => base,
    };

    let host = DomHost::new(window.clone(), config.shell.clone(), config.toast_ms).map_err(to_js)?;
    let router = Router::new(
        painel_pages::routes().map_err(to_js)?,
        Rc::new(host),
        Rc::new(HttpViews::new(views_base)),
        Rc::new(HashNavigator::new(window.clone())),
        Rc::new(session),
        Painel::shared(api),
    )
    .with_config(config.router.clone())
    .map_err(to_js)?;
    let router = Rc::new(router);

    let on_hash_change = {
        let router = Rc::clone(&router);
        Closure::<dyn FnMut()>::new(move || {
            let router = Rc::clone(&router);
            wasm_bindgen_futures::spawn_local(async move {
                let outcome = router.load_route().await;
                debug!(?outcome, "Hash change handled");
            });
        })
    };
    window.add_event_listener_with_callback("hashchange", on_hash_change.as_ref().unchecked_ref())?;
    // Lives as long as the page
    on_hash_change.forget();

    APP.with(|app| *app.borrow_mut() = Some(Rc::clone(&router)));
    info!(api = %router_api_base(&router), "Painel started");

    wasm_bindgen_futures::spawn_local(async move {
        let outcome = router.start().await;
        debug!(?outcome, "Initial route handled");
    });
    Ok(())
}

/// Navigate to a dashboard path. The hash change performs the load.
#[wasm_bindgen]
pub fn navigate(path: &str) {
    APP.with(|app| {
        if let Some(router) = app.borrow().as_ref() {
            router.navigate(path);
        }
    });
}

/// Path of the route currently shown, if the dashboard has started
#[wasm_bindgen(js_name = activePath)]
pub fn active_path() -> Option<String> {
    APP.with(|app| app.borrow().as_ref().and_then(|router| router.active_path()))
}

fn router_api_base(router: &Router<Painel>) -> String {
    router.services().api().base_url().to_string()
}

fn to_js(err: painel_core::PainelError) -> JsValue {
    JsValue::from_str(&err.to_string())
}
