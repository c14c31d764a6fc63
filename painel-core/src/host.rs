//! Seams between the router and the browser
//!
//! `painel-web` implements these over `web-sys`; [`crate::mock`] implements
//! them in memory for tests.

use async_trait::async_trait;
use futures::future::LocalBoxFuture;
use std::rc::Rc;

use crate::error::Result;

/// Handle returned by [`PageHost::add_listener`]
pub type ListenerId = u64;

/// Event handler. Handlers are synchronous; async work goes through
/// [`PageHost::spawn`].
pub type Handler = Rc<dyn Fn(&UiEvent)>;

/// What a handler sees of a DOM event.
///
/// Lists use event delegation: rows carry `data-action` and `data-id`, and
/// the listener sits on the list container.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UiEvent {
    /// Event type (`click`, `change`, `submit`)
    pub kind: String,
    /// Selector the listener was bound to
    pub target: String,
    /// `data-action` of the closest element that has one
    pub action: Option<String>,
    /// `data-id` of that same element
    pub id: Option<String>,
    /// Current value when the event came from a form control
    pub value: Option<String>,
}

impl UiEvent {
    pub fn new(kind: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            target: target.into(),
            ..Default::default()
        }
    }

    pub fn with_action(mut self, action: impl Into<String>, id: impl Into<String>) -> Self {
        self.action = Some(action.into());
        self.id = Some(id.into());
        self
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }
}

/// Toast severity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    Success,
    Error,
    Info,
}

impl Notice {
    pub fn as_str(&self) -> &'static str {
        match self {
            Notice::Success => "success",
            Notice::Error => "error",
            Notice::Info => "info",
        }
    }
}

/// The document the dashboard renders into.
///
/// Shell operations are used by the router; the rest by page controllers
/// through their [`crate::PageScope`].
pub trait PageHost {
    // === Shell ===

    /// Remove everything under the content container
    fn clear_content(&self);

    /// Replace the content container's children with `markup`
    fn set_content(&self, markup: &str);

    /// Replace the content container with a single error element
    fn show_error(&self, message: &str);

    /// Show or hide the loading indicator
    fn set_loading(&self, visible: bool);

    /// Update the title and subtitle display fields
    fn set_heading(&self, title: &str, subtitle: &str);

    /// Mark the sidebar entry linking to `path` active, clearing all others
    fn mark_active_nav(&self, path: &str);

    // === Page ===

    /// Set the inner markup of the element matching `target`
    fn render(&self, target: &str, markup: &str) -> Result<()>;

    /// Current value of a form control
    fn read_value(&self, target: &str) -> Option<String>;

    /// Attach a listener to the element matching `target`
    fn add_listener(&self, target: &str, event: &str, handler: Handler) -> Result<ListenerId>;

    /// Detach a listener; unknown ids are ignored
    fn remove_listener(&self, id: ListenerId);

    /// Show a transient notification
    fn notify(&self, notice: Notice, message: &str);

    /// Run a future on the UI thread
    fn spawn(&self, task: LocalBoxFuture<'static, ()>);
}

/// Retrieves view templates.
#[async_trait(?Send)]
pub trait ViewSource {
    /// Fetch raw markup for a view reference. Non-success statuses must
    /// surface as [`crate::PainelError::ViewNotFound`].
    async fn fetch_view(&self, view: &str) -> Result<String>;
}

/// URL hash and document navigation.
pub trait Navigator {
    /// Current hash fragment, including the leading `#` if any
    fn current_hash(&self) -> String;

    /// Change the hash; the host's hash-change event drives the next load
    fn set_hash(&self, hash: &str);

    /// Change the hash without firing a hash-change event
    fn replace_hash(&self, hash: &str);

    /// Leave the document
    fn redirect(&self, url: &str);
}
