//! Scoped ownership of the lightbox's page-level side effects.
//!
//! While the lightbox is open the page holds a keyboard listener and locks
//! body scrolling. Both are acquired together as a [`ModalScope`] and released
//! when the scope is dropped, so closing the lightbox and tearing down the
//! viewer release them on the same path.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[derive(Debug, Default)]
struct Counters {
    key_listeners: AtomicUsize,
    scroll_locks: AtomicUsize,
}

/// Tracks page-level listeners held by open lightboxes.
///
/// Cloning shares the same counters, the way the DOM is shared by every
/// component on a page.
#[derive(Debug, Clone, Default)]
pub struct ListenerRegistry {
    counters: Arc<Counters>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach the key listener and lock page scrolling.
    pub fn acquire(&self) -> ModalScope {
        self.counters.key_listeners.fetch_add(1, Ordering::SeqCst);
        self.counters.scroll_locks.fetch_add(1, Ordering::SeqCst);
        log::debug!("Modal scope acquired ({} active)", self.active_key_listeners());
        ModalScope {
            counters: Arc::clone(&self.counters),
        }
    }

    /// Number of key listeners currently attached.
    pub fn active_key_listeners(&self) -> usize {
        self.counters.key_listeners.load(Ordering::SeqCst)
    }

    /// Whether any scope currently locks page scrolling.
    pub fn scroll_locked(&self) -> bool {
        self.counters.scroll_locks.load(Ordering::SeqCst) > 0
    }
}

/// Guard for an open lightbox's key listener and scroll lock.
#[derive(Debug)]
#[must_use = "dropping the scope immediately releases the listener"]
pub struct ModalScope {
    counters: Arc<Counters>,
}

impl Drop for ModalScope {
    fn drop(&mut self) {
        self.counters.key_listeners.fetch_sub(1, Ordering::SeqCst);
        self.counters.scroll_locks.fetch_sub(1, Ordering::SeqCst);
        log::debug!("Modal scope released");
    }
}
