//! Painel Core - hash router and page lifecycle
//!
//! The administrative dashboard for land-conflict reports (denúncias and
//! conflitos) is a single-page application. This crate holds the part of it
//! that has real invariants:
//!
//! - **Route table**: static, ordered path → view/controller/title bindings
//! - **Session guard**: hard gate evaluated before every navigation
//! - **Router**: hash → route → view markup → controller mount, with a
//!   generation token so superseded navigations never write to the page
//! - **Page lifecycle**: `mount`/`unmount` with keyed listener scopes, so a
//!   handler is never bound twice no matter how often a page re-renders
//! - **Hierarchy scoping**: role/institution visibility over opaque records
//!
//! # Architecture
//!
//! ```text
//! hashchange ──▶ Router::load_route
//!                  │
//!                  ├─ SessionGuard ──▶ Navigator::redirect (halt)
//!                  ├─ RouteTable::resolve
//!                  ├─ PageHost (nav marker, heading, loading, content)
//!                  ├─ ViewSource::fetch_view ──▶ PageHost::set_content
//!                  └─ PageController::mount(PageContext)
//!                                   │
//!                                   └─ PageScope (render / bind / spawn)
//! ```
//!
//! Everything that touches the browser sits behind the traits in [`host`];
//! the [`mock`] module provides in-memory implementations for tests.

pub mod config;
pub mod error;
pub mod hierarchy;
pub mod host;
pub mod markup;
pub mod mock;
pub mod page;
pub mod route;
pub mod router;
pub mod session;

pub use config::RouterConfig;
pub use error::{PainelError, Result};
pub use hierarchy::{scope_records, HierarchyScope, Role, ScopeFields};
pub use host::{Handler, ListenerId, Navigator, Notice, PageHost, UiEvent, ViewSource};
pub use page::{PageContext, PageController, PageScope, PageToken};
pub use route::{normalize_hash, ControllerFactory, Route, RouteTable};
pub use router::{Navigation, Router, RouterState};
pub use session::{SessionContext, SessionGuard, SessionStore};
