//! Navigation registry
//!
//! Page sections register themselves here when attached and remove themselves
//! when detached. The menu is rendered from the current list, which keeps
//! registration order: re-registering an id moves it to the end.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavItem {
    pub id: String,
    pub label: String,
}

impl NavItem {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }
}

/// Shared handle to the page's navigation model. Cloning is cheap and every
/// clone observes the same list.
#[derive(Debug, Clone)]
pub struct NavigationRegistry {
    items: Arc<watch::Sender<Vec<NavItem>>>,
    scroll_target: Arc<watch::Sender<Option<String>>>,
}

impl Default for NavigationRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl NavigationRegistry {
    pub fn new() -> Self {
        let (items, _) = watch::channel(Vec::new());
        let (scroll_target, _) = watch::channel(None);
        Self {
            items: Arc::new(items),
            scroll_target: Arc::new(scroll_target),
        }
    }

    /// Insert `item`, replacing any entry with the same id. The item always
    /// ends up last.
    pub fn register(&self, item: NavItem) {
        debug!("registering nav item '{}'", item.id);
        self.items.send_modify(|items| {
            items.retain(|existing| existing.id != item.id);
            items.push(item);
        });
    }

    /// Remove the entry with `id`. Unknown ids are ignored.
    pub fn unregister(&self, id: &str) {
        self.items.send_if_modified(|items| {
            let before = items.len();
            items.retain(|existing| existing.id != id);
            let removed = items.len() != before;
            if removed {
                debug!("unregistered nav item '{}'", id);
            }
            removed
        });
    }

    pub fn items(&self) -> Vec<NavItem> {
        self.items.borrow().clone()
    }

    pub fn ids(&self) -> Vec<String> {
        self.items.borrow().iter().map(|item| item.id.clone()).collect()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.items.borrow().iter().any(|item| item.id == id)
    }

    /// Watch the list; the receiver wakes on every change.
    pub fn subscribe(&self) -> watch::Receiver<Vec<NavItem>> {
        self.items.subscribe()
    }

    /// Ask the front-end to bring the section into view. Returns false, and
    /// leaves the current target untouched, when no such section is attached.
    pub fn scroll_to(&self, id: &str) -> bool {
        if !self.contains(id) {
            debug!("scroll target '{}' is not registered", id);
            return false;
        }
        self.scroll_target.send_replace(Some(id.to_string()));
        true
    }

    pub fn scroll_target(&self) -> Option<String> {
        self.scroll_target.borrow().clone()
    }

    pub fn subscribe_scroll(&self) -> watch::Receiver<Option<String>> {
        self.scroll_target.subscribe()
    }
}
