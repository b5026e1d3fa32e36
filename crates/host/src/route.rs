//! Client-side route tracking.
//!
//! The injected navigation never triggers full page loads: a link
//! activation pushes a new history entry and synthesizes a
//! location-change notification, falling back to a hard navigation only
//! when history manipulation is unavailable. The tracker is the single
//! source of truth for the current path; the driver both polls it and
//! subscribes to its notifications, and treats either signal as a reason
//! to re-evaluate active highlighting and search mode.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use tokio::sync::watch;
use tracing::debug;

#[derive(Debug)]
struct RouteInner {
    notifier: watch::Sender<String>,
    history_available: AtomicBool,
    full_navigations: AtomicUsize,
}

/// Cloneable handle over the current location path and history seam.
#[derive(Debug, Clone)]
pub struct RouteTracker {
    inner: Arc<RouteInner>,
}

impl RouteTracker {
    /// Creates a tracker at the given initial path with history support.
    pub fn new(initial_path: &str) -> Self {
        let (notifier, _) = watch::channel(initial_path.to_string());
        Self {
            inner: Arc::new(RouteInner {
                notifier,
                history_available: AtomicBool::new(true),
                full_navigations: AtomicUsize::new(0),
            }),
        }
    }

    /// Marks history manipulation as unavailable; subsequent navigations
    /// degrade to full page loads.
    pub fn disable_history(&self) {
        self.inner.history_available.store(false, Ordering::SeqCst);
    }

    /// Current location path.
    pub fn current_path(&self) -> String {
        self.inner.notifier.borrow().clone()
    }

    /// Subscribes to location-change notifications.
    pub fn subscribe(&self) -> watch::Receiver<String> {
        self.inner.notifier.subscribe()
    }

    /// Navigates to `href`: history push plus a synthesized
    /// location-change notification, or a recorded full navigation when
    /// history is unavailable.
    pub fn navigate(&self, href: &str) {
        if !self.inner.history_available.load(Ordering::SeqCst) {
            self.inner.full_navigations.fetch_add(1, Ordering::SeqCst);
            debug!(href, "history unavailable; falling back to full navigation");
        }
        // send_replace notifies even when no subscriber is registered yet.
        self.inner.notifier.send_replace(href.to_string());
    }

    /// Records an out-of-band location change made by the host itself.
    pub fn set_path(&self, path: &str) {
        self.inner.notifier.send_replace(path.to_string());
    }

    /// Number of full-page navigations taken via the fallback.
    pub fn full_navigation_count(&self) -> usize {
        self.inner.full_navigations.load(Ordering::SeqCst)
    }
}

impl Default for RouteTracker {
    fn default() -> Self {
        Self::new("/")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn navigate_pushes_and_notifies() {
        let route = RouteTracker::new("/content-manager");
        let mut changes = route.subscribe();
        route.navigate("/content-manager/collection-types/api::post.post");
        assert!(changes.has_changed().unwrap());
        assert_eq!(route.current_path(), "/content-manager/collection-types/api::post.post");
        assert_eq!(route.full_navigation_count(), 0);
    }

    #[test]
    fn history_fallback_counts_full_navigations() {
        let route = RouteTracker::new("/");
        route.disable_history();
        route.navigate("/content-manager/single-types/api::home.home");
        assert_eq!(route.full_navigation_count(), 1);
        assert_eq!(route.current_path(), "/content-manager/single-types/api::home.home");
    }

    #[test]
    fn clones_observe_the_same_location() {
        let route = RouteTracker::new("/");
        let clone = route.clone();
        route.set_path("/somewhere");
        assert_eq!(clone.current_path(), "/somewhere");
    }
}
