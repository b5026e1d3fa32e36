//! Injectable navigation state store.
//!
//! The pipeline caches its last-fetched descriptors, permissions, and
//! grouping output so a failed refresh can keep showing the previous
//! navigation. The cache is read-then-replace: a refresh swaps the whole
//! snapshot atomically and nothing ever mutates a held snapshot in place.

use std::sync::{Arc, Mutex};

use groupnav_types::{ContentTypeDescriptor, ContentTypeGroup, Permission};

use crate::group_content_types;

/// One immutable view of the pipeline's cached state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NavSnapshot {
    /// Last normalized descriptor set.
    pub descriptors: Vec<ContentTypeDescriptor>,
    /// Last fetched permission set; empty means fail-open.
    pub permissions: Vec<Permission>,
    /// Grouping output derived from the two fields above.
    pub groups: Vec<ContentTypeGroup>,
}

/// Shared, cloneable handle to the cached navigation snapshot.
///
/// Cheap to clone; all clones observe the same state. The lock is only
/// held for the duration of a read-clone or a whole-snapshot swap.
#[derive(Debug, Clone, Default)]
pub struct NavStore {
    inner: Arc<Mutex<NavSnapshot>>,
}

impl NavStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clones the current snapshot.
    pub fn snapshot(&self) -> NavSnapshot {
        self.inner.lock().expect("nav store lock poisoned").clone()
    }

    /// Recomputes groups from fresh inputs and swaps the snapshot in one
    /// step. Returns the new snapshot for immediate rendering.
    pub fn refresh(&self, descriptors: Vec<ContentTypeDescriptor>, permissions: Vec<Permission>) -> NavSnapshot {
        let groups = group_content_types(&descriptors, &permissions);
        let snapshot = NavSnapshot {
            descriptors,
            permissions,
            groups,
        };
        *self.inner.lock().expect("nav store lock poisoned") = snapshot.clone();
        snapshot
    }

    /// Replaces the snapshot wholesale, for callers that already computed
    /// the grouping (e.g. replaying a cache hit).
    pub fn replace(&self, snapshot: NavSnapshot) {
        *self.inner.lock().expect("nav store lock poisoned") = snapshot;
    }

    /// Current groups without cloning the rest of the snapshot.
    pub fn groups(&self) -> Vec<ContentTypeGroup> {
        self.inner.lock().expect("nav store lock poisoned").groups.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use groupnav_types::ContentKind;

    fn descriptor(uid: &str, group: &str, sort_order: i64) -> ContentTypeDescriptor {
        ContentTypeDescriptor {
            uid: uid.to_string(),
            name: uid.to_string(),
            display_name: uid.to_string(),
            group: group.to_string(),
            kind: ContentKind::Collection,
            href: format!("/content-manager/collection-types/{uid}"),
            sort_order,
        }
    }

    #[test]
    fn refresh_replaces_the_whole_snapshot() {
        let store = NavStore::new();
        store.refresh(vec![descriptor("api::a.a", "Blog", 1)], vec![]);
        assert_eq!(store.groups().len(), 1);

        store.refresh(vec![descriptor("api::b.b", "Shop", 1)], vec![]);
        let snapshot = store.snapshot();
        assert_eq!(snapshot.descriptors.len(), 1);
        assert_eq!(snapshot.groups[0].name, "Shop");
    }

    #[test]
    fn clones_share_state() {
        let store = NavStore::new();
        let clone = store.clone();
        store.refresh(vec![descriptor("api::a.a", "Blog", 1)], vec![]);
        assert_eq!(clone.groups().len(), 1);
    }

    #[test]
    fn held_snapshots_are_unaffected_by_later_refreshes() {
        let store = NavStore::new();
        store.refresh(vec![descriptor("api::a.a", "Blog", 1)], vec![]);
        let held = store.snapshot();
        store.refresh(vec![], vec![]);
        assert_eq!(held.groups.len(), 1);
        assert!(store.groups().is_empty());
    }
}
