//! Page controller contract and mount scope
//!
//! Each route may carry a controller. The router mounts it once the view's
//! markup is in the document and unmounts it before the next navigation
//! clears the content container.
//!
//! Listener discipline: every listener a page registers goes through its
//! [`PageScope`] under a logical key. Binding a key that is already bound
//! detaches the old listener first, so re-rendering a sub-list and rebinding
//! its handlers any number of times leaves exactly one active listener per
//! key. `unbind_all` (run on unmount) detaches everything the scope added.

use async_trait::async_trait;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::future::Future;
use std::rc::Rc;

use tracing::debug;

use crate::error::Result;
use crate::host::{ListenerId, Notice, PageHost, UiEvent};
use crate::session::SessionContext;

/// Lifecycle of a page. `S` is the application's shared services (API
/// client and friends).
#[async_trait(?Send)]
pub trait PageController<S> {
    /// Fetch, render and bind. The view's markup is already present.
    async fn mount(&mut self, cx: &PageContext<S>) -> Result<()>;

    /// Release page-owned resources. Listeners bound through the scope are
    /// detached by the router right after this returns.
    fn unmount(&mut self, _cx: &PageContext<S>) {}
}

/// Identifies one navigation. Once a newer navigation starts, every token
/// handed out for older ones reports stale.
#[derive(Debug, Clone)]
pub struct PageToken {
    generation: u64,
    current: Rc<Cell<u64>>,
}

impl PageToken {
    pub fn new(generation: u64, current: Rc<Cell<u64>>) -> Self {
        Self {
            generation,
            current,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_current(&self) -> bool {
        self.current.get() == self.generation
    }
}

/// Render/bind surface owned by one mounted page.
///
/// Cheap to clone; clones share the same listener set, so handlers can
/// capture a clone and rebind after re-rendering. All writes are dropped
/// once the owning navigation has been superseded.
#[derive(Clone)]
pub struct PageScope {
    host: Rc<dyn PageHost>,
    token: PageToken,
    bound: Rc<RefCell<HashMap<String, ListenerId>>>,
}

impl PageScope {
    pub fn new(host: Rc<dyn PageHost>, token: PageToken) -> Self {
        Self {
            host,
            token,
            bound: Rc::new(RefCell::new(HashMap::new())),
        }
    }

    pub fn host(&self) -> &Rc<dyn PageHost> {
        &self.host
    }

    pub fn token(&self) -> &PageToken {
        &self.token
    }

    pub fn is_current(&self) -> bool {
        self.token.is_current()
    }

    /// Set a target's markup. Returns `Ok(false)` when superseded.
    pub fn render(&self, target: &str, markup: &str) -> Result<bool> {
        if !self.is_current() {
            debug!(target, generation = self.token.generation(), "Dropping stale render");
            return Ok(false);
        }
        self.host.render(target, markup)?;
        Ok(true)
    }

    /// Bind `handler` under `key`, replacing whatever was bound under that
    /// key before. Returns `Ok(false)` when superseded.
    pub fn bind<F>(&self, key: &str, target: &str, event: &str, handler: F) -> Result<bool>
    where
        F: Fn(&UiEvent) + 'static,
    {
        if !self.is_current() {
            return Ok(false);
        }
        self.unbind(key);
        let id = self.host.add_listener(target, event, Rc::new(handler))?;
        self.bound.borrow_mut().insert(key.to_string(), id);
        Ok(true)
    }

    /// Detach the listener bound under `key`, if any.
    pub fn unbind(&self, key: &str) -> bool {
        let removed = self.bound.borrow_mut().remove(key);
        match removed {
            Some(id) => {
                self.host.remove_listener(id);
                true
            }
            None => false,
        }
    }

    /// Detach every listener this scope registered. Returns how many.
    pub fn unbind_all(&self) -> usize {
        let ids: Vec<ListenerId> = self.bound.borrow_mut().drain().map(|(_, id)| id).collect();
        for id in &ids {
            self.host.remove_listener(*id);
        }
        ids.len()
    }

    pub fn bound_count(&self) -> usize {
        self.bound.borrow().len()
    }

    pub fn is_bound(&self, key: &str) -> bool {
        self.bound.borrow().contains_key(key)
    }

    pub fn read_value(&self, target: &str) -> Option<String> {
        self.host.read_value(target)
    }

    /// Toast, suppressed for superseded pages.
    pub fn notify(&self, notice: Notice, message: &str) {
        if self.is_current() {
            self.host.notify(notice, message);
        }
    }

    /// Run async work (API calls from handlers) on the UI thread.
    pub fn spawn<F>(&self, task: F)
    where
        F: Future<Output = ()> + 'static,
    {
        self.host.spawn(Box::pin(task));
    }
}

/// Everything a controller receives: the session snapshot, the app's shared
/// services and the page's scope.
pub struct PageContext<S> {
    session: SessionContext,
    services: Rc<S>,
    scope: PageScope,
}

impl<S> Clone for PageContext<S> {
    fn clone(&self) -> Self {
        Self {
            session: self.session.clone(),
            services: Rc::clone(&self.services),
            scope: self.scope.clone(),
        }
    }
}

impl<S> PageContext<S> {
    pub fn new(session: SessionContext, services: Rc<S>, scope: PageScope) -> Self {
        Self {
            session,
            services,
            scope,
        }
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    pub fn services(&self) -> &S {
        &self.services
    }

    pub fn scope(&self) -> &PageScope {
        &self.scope
    }

    pub fn is_current(&self) -> bool {
        self.scope.is_current()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MemoryHost;

    fn scope(host: &Rc<MemoryHost>, generation: &Rc<Cell<u64>>) -> PageScope {
        let host: Rc<dyn PageHost> = host.clone();
        PageScope::new(host, PageToken::new(generation.get(), Rc::clone(generation)))
    }

    #[test]
    fn test_rebinding_keeps_one_listener() {
        let host = Rc::new(MemoryHost::new());
        host.set_content(r#"<button id="salvar"></button>"#);
        let generation = Rc::new(Cell::new(1));
        let scope = scope(&host, &generation);
        let hits = Rc::new(Cell::new(0));

        for _ in 0..5 {
            let hits = Rc::clone(&hits);
            scope
                .bind("salvar", "#salvar", "click", move |_| hits.set(hits.get() + 1))
                .unwrap();
        }

        assert_eq!(host.listener_count(), 1);
        assert_eq!(host.dispatch("#salvar", UiEvent::new("click", "#salvar")), 1);
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn test_unbind_all_detaches_everything() {
        let host = Rc::new(MemoryHost::new());
        host.set_content(r#"<form id="f"></form><ul id="lista"></ul>"#);
        let generation = Rc::new(Cell::new(1));
        let scope = scope(&host, &generation);

        scope.bind("form", "#f", "submit", |_| {}).unwrap();
        scope.bind("lista", "#lista", "click", |_| {}).unwrap();
        assert_eq!(host.listener_count(), 2);

        assert_eq!(scope.unbind_all(), 2);
        assert_eq!(host.listener_count(), 0);
        assert_eq!(scope.bound_count(), 0);
    }

    #[test]
    fn test_stale_scope_drops_writes() {
        let host = Rc::new(MemoryHost::new());
        host.set_content(r#"<ul id="lista"></ul>"#);
        let generation = Rc::new(Cell::new(3));
        let scope = scope(&host, &generation);

        generation.set(4);

        assert!(!scope.render("#lista", "<li>late</li>").unwrap());
        assert!(!scope.bind("lista", "#lista", "click", |_| {}).unwrap());
        scope.notify(Notice::Info, "late");

        assert_eq!(host.rendered("#lista"), None);
        assert_eq!(host.listener_count(), 0);
        assert!(host.notices().is_empty());
    }

    #[test]
    fn test_render_unknown_target_is_an_error() {
        let host = Rc::new(MemoryHost::new());
        let generation = Rc::new(Cell::new(1));
        let scope = scope(&host, &generation);

        assert!(scope.render("#missing", "x").is_err());
    }
}
