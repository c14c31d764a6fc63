//! `PageHost` over the live DOM
//!
//! Listeners are `Closure`s registered with `addEventListener`. A removed
//! listener's closure may still be on the call stack (handlers rebind
//! their own list after re-rendering), so removal parks it in `retired`.
//! Parked closures are dropped by the next `clear_content`, or by the next
//! `add_listener` made while no listener is running.

use futures::future::LocalBoxFuture;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;
use tracing::warn;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    Document, Element, Event, HtmlElement, HtmlInputElement, HtmlSelectElement,
    HtmlTextAreaElement, Window,
};

use painel_core::markup::error_block;
use painel_core::{Handler, ListenerId, Notice, PageHost, PainelError, Result, UiEvent};

use crate::config::ShellSelectors;

type Listener = Closure<dyn FnMut(Event)>;

struct Registered {
    element: Element,
    event: String,
    closure: Listener,
}

/// Page host bound to the document's shell elements
pub struct DomHost {
    window: Window,
    document: Document,
    shell: ShellSelectors,
    toast_ms: i32,
    listeners: RefCell<HashMap<ListenerId, Registered>>,
    retired: RefCell<Vec<Listener>>,
    /// Listener invocations currently on the stack
    dispatching: Rc<Cell<usize>>,
    next_id: Cell<ListenerId>,
}

impl DomHost {
    pub fn new(window: Window, shell: ShellSelectors, toast_ms: i32) -> Result<Self> {
        let document = window
            .document()
            .ok_or_else(|| PainelError::Host("window has no document".into()))?;
        Ok(Self {
            window,
            document,
            shell,
            toast_ms,
            listeners: RefCell::new(HashMap::new()),
            retired: RefCell::new(Vec::new()),
            dispatching: Rc::new(Cell::new(0)),
            next_id: Cell::new(0),
        })
    }

    fn query(&self, selector: &str) -> Result<Element> {
        self.document
            .query_selector(selector)
            .map_err(|err| js_error("query_selector", err))?
            .ok_or_else(|| PainelError::Host(format!("element not found: {}", selector)))
    }

    /// Closures removed but not yet dropped
    pub fn retired_count(&self) -> usize {
        self.retired.borrow().len()
    }

    fn drop_retired(&self) {
        if self.dispatching.get() == 0 {
            self.retired.borrow_mut().clear();
        }
    }

    /// Shell element, logged rather than failed when the page lacks it
    fn shell_element(&self, selector: &str) -> Option<Element> {
        match self.query(selector) {
            Ok(element) => Some(element),
            Err(err) => {
                warn!(selector, error = %err, "Shell element missing");
                None
            }
        }
    }
}

impl PageHost for DomHost {
    fn clear_content(&self) {
        if let Some(content) = self.shell_element(&self.shell.content) {
            content.set_inner_html("");
        }
        self.drop_retired();
    }

    fn set_content(&self, markup: &str) {
        if let Some(content) = self.shell_element(&self.shell.content) {
            content.set_inner_html(markup);
        }
    }

    fn show_error(&self, message: &str) {
        self.set_content(&error_block(message));
    }

    fn set_loading(&self, visible: bool) {
        if let Some(loading) = self.shell_element(&self.shell.loading) {
            if let Some(element) = loading.dyn_ref::<HtmlElement>() {
                element.set_hidden(!visible);
            }
        }
    }

    fn set_heading(&self, title: &str, subtitle: &str) {
        if let Some(element) = self.shell_element(&self.shell.title) {
            element.set_text_content(Some(title));
        }
        if let Some(element) = self.shell_element(&self.shell.subtitle) {
            element.set_text_content(Some(subtitle));
        }
    }

    fn mark_active_nav(&self, path: &str) {
        let links = match self.document.query_selector_all(&self.shell.nav_links) {
            Ok(links) => links,
            Err(err) => {
                warn!(error = %js_error("query_selector_all", err), "Cannot read sidebar");
                return;
            }
        };
        let wanted = format!("#{}", path);

        let containers: Vec<(Element, bool)> = (0..links.length())
            .filter_map(|i| links.item(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .filter_map(|link| {
                let matches = link.get_attribute("href").as_deref() == Some(wanted.as_str());
                link.parent_element().map(|parent| (parent, matches))
            })
            .collect();

        for (container, _) in &containers {
            let _ = container.class_list().remove_1("active");
        }
        for (container, matches) in &containers {
            if *matches {
                let _ = container.class_list().add_1("active");
            }
        }
    }

    fn render(&self, target: &str, markup: &str) -> Result<()> {
        self.query(target)?.set_inner_html(markup);
        Ok(())
    }

    fn read_value(&self, target: &str) -> Option<String> {
        let element = self.query(target).ok()?;
        if let Some(input) = element.dyn_ref::<HtmlInputElement>() {
            return Some(input.value());
        }
        if let Some(select) = element.dyn_ref::<HtmlSelectElement>() {
            return Some(select.value());
        }
        if let Some(area) = element.dyn_ref::<HtmlTextAreaElement>() {
            return Some(area.value());
        }
        None
    }

    fn add_listener(&self, target: &str, event: &str, handler: Handler) -> Result<ListenerId> {
        self.drop_retired();

        let element = self.query(target)?;
        let selector = target.to_string();
        let kind = event.to_string();
        let dispatching = Rc::clone(&self.dispatching);

        let closure: Listener = Closure::new(move |ev: Event| {
            if kind == "submit" {
                ev.prevent_default();
            }
            dispatching.set(dispatching.get() + 1);
            handler(&ui_event(&ev, &kind, &selector));
            dispatching.set(dispatching.get() - 1);
        });
        element
            .add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
            .map_err(|err| js_error("addEventListener", err))?;

        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        self.listeners.borrow_mut().insert(
            id,
            Registered {
                element,
                event: event.to_string(),
                closure,
            },
        );
        Ok(id)
    }

    fn remove_listener(&self, id: ListenerId) {
        let Some(registered) = self.listeners.borrow_mut().remove(&id) else {
            return;
        };
        let _ = registered.element.remove_event_listener_with_callback(
            &registered.event,
            registered.closure.as_ref().unchecked_ref(),
        );
        self.retired.borrow_mut().push(registered.closure);
    }

    fn notify(&self, notice: Notice, message: &str) {
        let Ok(toast) = self.document.create_element("div") else {
            return;
        };
        toast.set_class_name(&format!("toast toast-{}", notice.as_str()));
        let _ = toast.set_attribute("role", "status");
        toast.set_text_content(Some(message));

        let parent = self
            .query(&self.shell.toasts)
            .ok()
            .or_else(|| self.document.body().map(Element::from));
        let Some(parent) = parent else {
            return;
        };
        if parent.append_child(&toast).is_err() {
            return;
        }

        let dismiss = Closure::once_into_js(move || toast.remove());
        let _ = self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                dismiss.unchecked_ref(),
                self.toast_ms,
            );
    }

    fn spawn(&self, task: LocalBoxFuture<'static, ()>) {
        wasm_bindgen_futures::spawn_local(task);
    }
}

/// Translate a DOM event. Delegated actions come from the closest
/// `[data-action]` ancestor of the event's target.
fn ui_event(ev: &Event, kind: &str, selector: &str) -> UiEvent {
    let mut event = UiEvent::new(kind, selector);
    let Some(origin) = ev.target().and_then(|t| t.dyn_into::<Element>().ok()) else {
        return event;
    };

    if let Ok(Some(actionable)) = origin.closest("[data-action]") {
        event.action = actionable.get_attribute("data-action");
        event.id = actionable.get_attribute("data-id");
    }
    if let Some(input) = origin.dyn_ref::<HtmlInputElement>() {
        event.value = Some(input.value());
    } else if let Some(select) = origin.dyn_ref::<HtmlSelectElement>() {
        event.value = Some(select.value());
    }
    event
}

pub(crate) fn js_error(context: &str, err: JsValue) -> PainelError {
    let detail = err
        .as_string()
        .or_else(|| {
            js_sys::JSON::stringify(&err)
                .ok()
                .map(String::from)
        })
        .unwrap_or_else(|| "unknown error".to_string());
    PainelError::Host(format!("{}: {}", context, detail))
}
