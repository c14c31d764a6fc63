//! Hash router
//!
//! Two states, Idle and Loading. Every hash change starts a new Loading
//! sequence tagged with a fresh generation number:
//!
//! 1. Session guard. On failure the browser is sent to the login entry point
//!    and nothing in the content container is touched.
//! 2. Normalize the hash and resolve it against the route table.
//! 3. Unmount the previous page, update nav marker and heading, clear the
//!    content container and show the loading indicator.
//! 4. Fetch the view and inject it.
//! 5. Mount the route's controller, if any.
//!
//! Navigations are not queued. A newer navigation bumps the generation, and
//! an older one that resumes afterwards discards its results instead of
//! writing them, so the last navigation to start is the one that renders.
//! Only the latest navigation moves the state back to Idle, including when
//! it ends in a redirect.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use tracing::{debug, error, info};

use crate::config::RouterConfig;
use crate::error::{PainelError, Result};
use crate::host::{Navigator, PageHost, ViewSource};
use crate::page::{PageContext, PageController, PageScope, PageToken};
use crate::route::RouteTable;
use crate::session::{SessionContext, SessionGuard, SessionStore};

/// Router state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouterState {
    Idle,
    Loading,
}

/// Outcome of one `load_route` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    /// No session; the browser was sent to the login entry point
    Redirected,
    /// View injected and controller (if any) mounted
    Rendered { path: String, generation: u64 },
    /// View fetch or controller failed; the inline error is showing
    Failed {
        path: String,
        generation: u64,
        reason: String,
    },
    /// A newer navigation started first; nothing from this one was applied
    Superseded { path: String, generation: u64 },
}

impl Navigation {
    pub fn is_rendered(&self) -> bool {
        matches!(self, Navigation::Rendered { .. })
    }
}

struct MountedPage<S> {
    path: String,
    controller: Box<dyn PageController<S>>,
    cx: PageContext<S>,
}

/// Hash router over a static route table.
///
/// `S` is the services value shared with every controller.
pub struct Router<S> {
    table: RouteTable<S>,
    config: RouterConfig,
    guard: SessionGuard,
    host: Rc<dyn PageHost>,
    views: Rc<dyn ViewSource>,
    navigator: Rc<dyn Navigator>,
    session: Rc<dyn SessionStore>,
    services: Rc<S>,
    generation: Rc<Cell<u64>>,
    state: Cell<RouterState>,
    mounted: RefCell<Option<MountedPage<S>>>,
    active_path: RefCell<Option<String>>,
}

impl<S: 'static> Router<S> {
    pub fn new(
        table: RouteTable<S>,
        host: Rc<dyn PageHost>,
        views: Rc<dyn ViewSource>,
        navigator: Rc<dyn Navigator>,
        session: Rc<dyn SessionStore>,
        services: Rc<S>,
    ) -> Self {
        let config = RouterConfig::default();
        Self {
            table,
            guard: SessionGuard::new(config.login_url.clone()),
            config,
            host,
            views,
            navigator,
            session,
            services,
            generation: Rc::new(Cell::new(0)),
            state: Cell::new(RouterState::Idle),
            mounted: RefCell::new(None),
            active_path: RefCell::new(None),
        }
    }

    /// Apply configuration: login URL, inline error text and the optional
    /// not-found route.
    pub fn with_config(mut self, config: RouterConfig) -> Result<Self> {
        config.validate()?;
        if let Some(path) = &config.not_found {
            self.table = self.table.with_not_found(path)?;
        }
        self.guard = SessionGuard::new(config.login_url.clone());
        self.config = config;
        Ok(self)
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    /// Initial load: seed an empty hash with the default route without
    /// firing a hash change, then load.
    pub async fn start(&self) -> Navigation {
        if self.navigator.current_hash().trim_start_matches('#').trim().is_empty() {
            let hash = format!("#{}", self.table.default_route().path);
            self.navigator.replace_hash(&hash);
        }
        self.load_route().await
    }

    /// Programmatic navigation. Only changes the hash; the host's
    /// hash-change event performs the load.
    pub fn navigate(&self, path: &str) {
        let path = crate::route::normalize_hash(path, self.table.default_route().path);
        debug!(path = %path, "Navigating");
        self.navigator.set_hash(&format!("#{}", path));
    }

    /// Resolve the current hash and render it.
    pub async fn load_route(&self) -> Navigation {
        let generation = self.generation.get() + 1;
        self.generation.set(generation);

        let session = match self.guard.authenticate(self.session.as_ref(), self.navigator.as_ref()) {
            Some(session) => session,
            None => {
                // Superseded navigations never reset the state themselves
                self.state.set(RouterState::Idle);
                return Navigation::Redirected;
            }
        };

        self.state.set(RouterState::Loading);

        let path = self.table.normalize(&self.navigator.current_hash());
        let route = *self.table.resolve(&path);
        if route.path != path {
            debug!(requested = %path, resolved = route.path, "Unmatched path, using fallback route");
        }
        info!(path = route.path, view = route.view, generation, "Loading route");

        self.unmount_current();
        *self.active_path.borrow_mut() = Some(route.path.to_string());

        self.host.mark_active_nav(route.path);
        self.host.set_heading(route.title, route.subtitle);
        self.host.clear_content();
        self.host.set_loading(true);

        // Fetch phase
        let markup = match self.views.fetch_view(route.view).await {
            Ok(markup) => markup,
            Err(err) => return self.fail(route.path, generation, err),
        };
        if !self.is_current(generation) {
            debug!(path = route.path, generation, "View arrived after a newer navigation");
            return Navigation::Superseded {
                path: route.path.to_string(),
                generation,
            };
        }
        self.host.set_content(&markup);
        self.host.set_loading(false);

        // Controller phase
        if let Some(factory) = route.controller {
            let token = PageToken::new(generation, Rc::clone(&self.generation));
            let scope = PageScope::new(Rc::clone(&self.host), token);
            let cx = PageContext::new(session, Rc::clone(&self.services), scope);
            let mut controller = factory();

            let mounted = controller.mount(&cx).await;

            if !self.is_current(generation) {
                controller.unmount(&cx);
                cx.scope().unbind_all();
                debug!(path = route.path, generation, "Controller finished after a newer navigation");
                return Navigation::Superseded {
                    path: route.path.to_string(),
                    generation,
                };
            }
            if let Err(err) = mounted {
                controller.unmount(&cx);
                cx.scope().unbind_all();
                return self.fail(route.path, generation, err);
            }

            *self.mounted.borrow_mut() = Some(MountedPage {
                path: route.path.to_string(),
                controller,
                cx,
            });
        }

        self.state.set(RouterState::Idle);
        Navigation::Rendered {
            path: route.path.to_string(),
            generation,
        }
    }

    fn fail(&self, path: &str, generation: u64, err: PainelError) -> Navigation {
        if !self.is_current(generation) {
            debug!(path, generation, error = %err, "Ignoring failure of a superseded navigation");
            return Navigation::Superseded {
                path: path.to_string(),
                generation,
            };
        }
        error!(path, generation, error = %err, "Failed to load route");
        self.host.clear_content();
        self.host.show_error(&self.config.error_message);
        self.host.set_loading(false);
        self.state.set(RouterState::Idle);
        Navigation::Failed {
            path: path.to_string(),
            generation,
            reason: err.to_string(),
        }
    }

    fn unmount_current(&self) {
        let previous = self.mounted.borrow_mut().take();
        if let Some(mut page) = previous {
            page.controller.unmount(&page.cx);
            let detached = page.cx.scope().unbind_all();
            debug!(path = %page.path, detached, "Unmounted page");
        }
    }

    fn is_current(&self, generation: u64) -> bool {
        self.generation.get() == generation
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn state(&self) -> RouterState {
        self.state.get()
    }

    /// Generation of the most recent navigation
    pub fn generation(&self) -> u64 {
        self.generation.get()
    }

    /// Path of the route most recently resolved
    pub fn active_path(&self) -> Option<String> {
        self.active_path.borrow().clone()
    }

    /// Path of the page whose controller is currently mounted
    pub fn mounted_path(&self) -> Option<String> {
        self.mounted.borrow().as_ref().map(|page| page.path.clone())
    }

    pub fn table(&self) -> &RouteTable<S> {
        &self.table
    }

    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    pub fn services(&self) -> &S {
        &self.services
    }

    /// Session snapshot as the guard would see it now, without redirecting
    pub fn session(&self) -> Option<SessionContext> {
        SessionContext::from_store(self.session.as_ref())
    }
}
