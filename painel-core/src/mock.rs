//! In-memory host implementations for tests
//!
//! `MemoryHost` keeps the content container as a string and tracks
//! listeners, rendered targets and notices so tests can assert on them.
//! A target "exists" when the current markup contains `id="<target>"`,
//! which is enough to catch controllers rendering into elements their view
//! doesn't have.

use async_trait::async_trait;
use futures::channel::oneshot;
use futures::future::LocalBoxFuture;
use std::cell::{Cell, RefCell};
use std::collections::{HashMap, VecDeque};

use crate::error::{PainelError, Result};
use crate::hierarchy::Role;
use crate::host::{Handler, ListenerId, Navigator, Notice, PageHost, UiEvent, ViewSource};
use crate::markup::{element_id, error_block};
use crate::session::{
    SessionStore, KEY_INSTITUTION, KEY_USER_ID, KEY_USER_NAME, KEY_USER_ROLE,
};

// ============================================================================
// MemoryHost
// ============================================================================

struct Listener {
    id: ListenerId,
    target: String,
    event: String,
    handler: Handler,
}

/// Page host backed by plain strings.
#[derive(Default)]
pub struct MemoryHost {
    content: RefCell<String>,
    loading: Cell<bool>,
    heading: RefCell<(String, String)>,
    active_nav: RefCell<Option<String>>,
    rendered: RefCell<HashMap<String, String>>,
    values: RefCell<HashMap<String, String>>,
    listeners: RefCell<Vec<Listener>>,
    next_listener: Cell<ListenerId>,
    notices: RefCell<Vec<(Notice, String)>>,
    tasks: RefCell<VecDeque<LocalBoxFuture<'static, ()>>>,
    shell_writes: Cell<usize>,
}

impl MemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether an element with this id is present in the page
    pub fn has_element(&self, target: &str) -> bool {
        let needle = format!(r#"id="{}""#, element_id(target));
        self.content.borrow().contains(&needle)
            || self
                .rendered
                .borrow()
                .values()
                .any(|markup| markup.contains(&needle))
    }

    /// Fire an event at `target`. Returns how many handlers ran.
    pub fn dispatch(&self, target: &str, event: UiEvent) -> usize {
        let handlers: Vec<Handler> = self
            .listeners
            .borrow()
            .iter()
            .filter(|l| l.target == target && l.event == event.kind)
            .map(|l| Handler::clone(&l.handler))
            .collect();
        for handler in &handlers {
            handler(&event);
        }
        handlers.len()
    }

    /// Click a delegated row action (`data-action`, `data-id`) inside `target`.
    pub fn click_action(&self, target: &str, action: &str, id: &str) -> usize {
        self.dispatch(target, UiEvent::new("click", target).with_action(action, id))
    }

    /// Set a form control's value as if the user typed it.
    pub fn set_value(&self, target: &str, value: &str) {
        self.values
            .borrow_mut()
            .insert(target.to_string(), value.to_string());
    }

    /// Drive every spawned task to completion, including tasks spawned by
    /// other tasks.
    pub async fn run_pending(&self) {
        loop {
            let next = self.tasks.borrow_mut().pop_front();
            match next {
                Some(task) => task.await,
                None => break,
            }
        }
    }

    pub fn pending_tasks(&self) -> usize {
        self.tasks.borrow().len()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    pub fn listeners_on(&self, target: &str) -> usize {
        self.listeners
            .borrow()
            .iter()
            .filter(|l| l.target == target)
            .count()
    }

    pub fn notices(&self) -> Vec<(Notice, String)> {
        self.notices.borrow().clone()
    }

    pub fn last_notice(&self) -> Option<(Notice, String)> {
        self.notices.borrow().last().cloned()
    }

    pub fn content(&self) -> String {
        self.content.borrow().clone()
    }

    pub fn rendered(&self, target: &str) -> Option<String> {
        self.rendered.borrow().get(target).cloned()
    }

    /// Targets rendered since the content container was last replaced
    pub fn rendered_targets(&self) -> Vec<String> {
        let mut targets: Vec<String> = self.rendered.borrow().keys().cloned().collect();
        targets.sort();
        targets
    }

    pub fn title(&self) -> String {
        self.heading.borrow().0.clone()
    }

    pub fn subtitle(&self) -> String {
        self.heading.borrow().1.clone()
    }

    pub fn active_nav(&self) -> Option<String> {
        self.active_nav.borrow().clone()
    }

    pub fn is_loading(&self) -> bool {
        self.loading.get()
    }

    /// Number of shell mutations (heading, nav, loading, content) so far
    pub fn shell_writes(&self) -> usize {
        self.shell_writes.get()
    }

    fn touch(&self) {
        self.shell_writes.set(self.shell_writes.get() + 1);
    }

    fn require(&self, target: &str) -> Result<()> {
        if self.has_element(target) {
            Ok(())
        } else {
            Err(PainelError::Host(format!("element not found: {}", target)))
        }
    }
}

impl PageHost for MemoryHost {
    fn clear_content(&self) {
        self.touch();
        self.content.borrow_mut().clear();
        self.rendered.borrow_mut().clear();
    }

    fn set_content(&self, markup: &str) {
        self.touch();
        *self.content.borrow_mut() = markup.to_string();
        self.rendered.borrow_mut().clear();
    }

    fn show_error(&self, message: &str) {
        self.set_content(&error_block(message));
    }

    fn set_loading(&self, visible: bool) {
        self.touch();
        self.loading.set(visible);
    }

    fn set_heading(&self, title: &str, subtitle: &str) {
        self.touch();
        *self.heading.borrow_mut() = (title.to_string(), subtitle.to_string());
    }

    fn mark_active_nav(&self, path: &str) {
        self.touch();
        *self.active_nav.borrow_mut() = Some(path.to_string());
    }

    fn render(&self, target: &str, markup: &str) -> Result<()> {
        self.require(target)?;
        self.rendered
            .borrow_mut()
            .insert(target.to_string(), markup.to_string());
        Ok(())
    }

    fn read_value(&self, target: &str) -> Option<String> {
        self.values.borrow().get(target).cloned()
    }

    fn add_listener(&self, target: &str, event: &str, handler: Handler) -> Result<ListenerId> {
        self.require(target)?;
        let id = self.next_listener.get() + 1;
        self.next_listener.set(id);
        self.listeners.borrow_mut().push(Listener {
            id,
            target: target.to_string(),
            event: event.to_string(),
            handler,
        });
        Ok(id)
    }

    fn remove_listener(&self, id: ListenerId) {
        self.listeners.borrow_mut().retain(|l| l.id != id);
    }

    fn notify(&self, notice: Notice, message: &str) {
        self.notices
            .borrow_mut()
            .push((notice, message.to_string()));
    }

    fn spawn(&self, task: LocalBoxFuture<'static, ()>) {
        self.tasks.borrow_mut().push_back(task);
    }
}

// ============================================================================
// Session and navigation
// ============================================================================

/// Session store backed by a map.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    entries: RefCell<HashMap<String, String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store with identity, role and (optionally) institution set.
    pub fn authenticated(user_id: &str, role: Role, institution: Option<&str>) -> Self {
        let store = Self::new()
            .with(KEY_USER_ID, user_id)
            .with(KEY_USER_NAME, "Operador")
            .with(KEY_USER_ROLE, role.as_str());
        match institution {
            Some(name) => store.with(KEY_INSTITUTION, name),
            None => store,
        }
    }

    pub fn with(self, key: &str, value: &str) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&self, key: &str, value: &str) {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
    }

    /// Simulates logout
    pub fn clear(&self) {
        self.entries.borrow_mut().clear();
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }
}

/// Navigator that records what it was asked to do.
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    hash: RefCell<String>,
    hashes: RefCell<Vec<String>>,
    replaced: RefCell<Vec<String>>,
    redirects: RefCell<Vec<String>>,
}

impl RecordingNavigator {
    pub fn new(hash: &str) -> Self {
        Self {
            hash: RefCell::new(hash.to_string()),
            ..Default::default()
        }
    }

    /// Hashes set through `set_hash`
    pub fn hashes(&self) -> Vec<String> {
        self.hashes.borrow().clone()
    }

    /// Hashes set through `replace_hash`
    pub fn replaced(&self) -> Vec<String> {
        self.replaced.borrow().clone()
    }

    pub fn redirects(&self) -> Vec<String> {
        self.redirects.borrow().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn current_hash(&self) -> String {
        self.hash.borrow().clone()
    }

    fn set_hash(&self, hash: &str) {
        *self.hash.borrow_mut() = hash.to_string();
        self.hashes.borrow_mut().push(hash.to_string());
    }

    fn replace_hash(&self, hash: &str) {
        *self.hash.borrow_mut() = hash.to_string();
        self.replaced.borrow_mut().push(hash.to_string());
    }

    fn redirect(&self, url: &str) {
        self.redirects.borrow_mut().push(url.to_string());
    }
}

// ============================================================================
// StaticViews
// ============================================================================

enum ViewEntry {
    Markup(String),
    Status(u16),
}

/// View source serving fixed markup. Unknown views answer 404.
///
/// `gate` holds the next fetch of a view until the returned sender fires,
/// which lets tests interleave navigations deterministically.
#[derive(Default)]
pub struct StaticViews {
    views: RefCell<HashMap<String, ViewEntry>>,
    gates: RefCell<HashMap<String, oneshot::Receiver<()>>>,
    fetches: Cell<usize>,
}

impl StaticViews {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_view(self, view: &str, markup: &str) -> Self {
        self.views
            .borrow_mut()
            .insert(view.to_string(), ViewEntry::Markup(markup.to_string()));
        self
    }

    /// Answer `view` with a non-success HTTP status.
    pub fn with_status(self, view: &str, status: u16) -> Self {
        self.views
            .borrow_mut()
            .insert(view.to_string(), ViewEntry::Status(status));
        self
    }

    pub fn gate(&self, view: &str) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.gates.borrow_mut().insert(view.to_string(), rx);
        tx
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.get()
    }
}

#[async_trait(?Send)]
impl ViewSource for StaticViews {
    async fn fetch_view(&self, view: &str) -> Result<String> {
        self.fetches.set(self.fetches.get() + 1);

        let gate = self.gates.borrow_mut().remove(view);
        if let Some(gate) = gate {
            // A dropped sender releases the gate too
            let _ = gate.await;
        }

        match self.views.borrow().get(view) {
            Some(ViewEntry::Markup(markup)) => Ok(markup.clone()),
            Some(ViewEntry::Status(status)) => Err(PainelError::ViewNotFound {
                view: view.to_string(),
                status: *status,
            }),
            None => Err(PainelError::ViewNotFound {
                view: view.to_string(),
                status: 404,
            }),
        }
    }
}
