//! Route table
//!
//! An ordered list of path → view/controller/title bindings, validated once
//! at startup and never mutated afterwards. Lookup is a linear scan by exact
//! path. The first entry is the default route.

use std::collections::HashSet;
use std::fmt;

use crate::error::{PainelError, Result};
use crate::page::PageController;

/// Statically linked controller constructor. Using a plain `fn` keeps the
/// route → controller binding checkable at compile time.
pub type ControllerFactory<S> = fn() -> Box<dyn PageController<S>>;

/// A single route entry.
pub struct Route<S> {
    /// Hash path, leading slash required (e.g. `/denuncias`)
    pub path: &'static str,
    /// View template reference, fetched from the view source
    pub view: &'static str,
    /// Title display field
    pub title: &'static str,
    /// Subtitle display field
    pub subtitle: &'static str,
    /// Controller mounted after the view is injected
    pub controller: Option<ControllerFactory<S>>,
}

impl<S> Route<S> {
    pub fn new(path: &'static str, view: &'static str) -> Self {
        Self {
            path,
            view,
            title: "",
            subtitle: "",
            controller: None,
        }
    }

    pub fn titled(mut self, title: &'static str, subtitle: &'static str) -> Self {
        self.title = title;
        self.subtitle = subtitle;
        self
    }

    pub fn with_controller(mut self, factory: ControllerFactory<S>) -> Self {
        self.controller = Some(factory);
        self
    }
}

impl<S> Clone for Route<S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S> Copy for Route<S> {}

impl<S> fmt::Debug for Route<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("path", &self.path)
            .field("view", &self.view)
            .field("title", &self.title)
            .field("subtitle", &self.subtitle)
            .field("controller", &self.controller.is_some())
            .finish()
    }
}

/// Validated, ordered route table.
pub struct RouteTable<S> {
    routes: Vec<Route<S>>,
    not_found: Option<usize>,
}

impl<S> RouteTable<S> {
    /// Validate and build. The table must be non-empty, every path must
    /// start with `/`, and paths must be unique.
    pub fn new(routes: Vec<Route<S>>) -> Result<Self> {
        if routes.is_empty() {
            return Err(PainelError::RouteTable("route table is empty".into()));
        }

        let mut seen = HashSet::new();
        for route in &routes {
            if !route.path.starts_with('/') {
                return Err(PainelError::RouteTable(format!(
                    "path must start with '/': {}",
                    route.path
                )));
            }
            if !seen.insert(route.path) {
                return Err(PainelError::RouteTable(format!(
                    "duplicate path: {}",
                    route.path
                )));
            }
        }

        Ok(Self {
            routes,
            not_found: None,
        })
    }

    /// Route unrecognized hashes to `path` instead of the default route.
    pub fn with_not_found(mut self, path: &str) -> Result<Self> {
        let index = self
            .routes
            .iter()
            .position(|route| route.path == path)
            .ok_or_else(|| {
                PainelError::RouteTable(format!("not-found path is not in the table: {}", path))
            })?;
        self.not_found = Some(index);
        Ok(self)
    }

    /// First entry, used for an empty hash.
    pub fn default_route(&self) -> &Route<S> {
        &self.routes[0]
    }

    /// Route used for unrecognized hashes.
    pub fn not_found_route(&self) -> &Route<S> {
        match self.not_found {
            Some(index) => &self.routes[index],
            None => self.default_route(),
        }
    }

    /// Exact, case-sensitive match.
    pub fn find(&self, path: &str) -> Option<&Route<S>> {
        self.routes.iter().find(|route| route.path == path)
    }

    /// Always yields a route: exact match, else the not-found route.
    pub fn resolve(&self, path: &str) -> &Route<S> {
        self.find(path).unwrap_or_else(|| self.not_found_route())
    }

    /// Canonical path for a raw hash fragment.
    pub fn normalize(&self, hash: &str) -> String {
        normalize_hash(hash, self.default_route().path)
    }

    pub fn routes(&self) -> &[Route<S>] {
        &self.routes
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

/// Strip the leading `#`, default to `default_path` when empty, and force a
/// leading `/`.
pub fn normalize_hash(hash: &str, default_path: &str) -> String {
    let trimmed = hash.trim();
    let trimmed = trimmed.strip_prefix('#').unwrap_or(trimmed);
    if trimmed.is_empty() {
        return default_path.to_string();
    }
    if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{}", trimmed)
    }
}
