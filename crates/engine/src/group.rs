//! Grouping and ordering of normalized descriptors.
//!
//! This is the core sorting algorithm of the navigation: permission
//! filtering (fail-open), stable partition by group key, intra-group and
//! inter-group ordering with the "General" pin, and the collection-first
//! kind sub-partition renderers rely on.

use std::cmp::Ordering;
use std::collections::HashSet;

use groupnav_types::{
    ContentKind, ContentTypeDescriptor, ContentTypeGroup, GENERAL_GROUP_NAME, Permission,
};
use indexmap::IndexMap;
use tracing::debug;

/// Action granting read access to a content type in the host admin panel.
const READ_ACTION: &str = "plugin::content-manager.explorer.read";

/// Whether the permission set authorizes reading the descriptor.
///
/// An empty permission set authorizes everything: hiding the entire
/// navigation because a permission fetch failed would be worse than
/// showing it, so the policy is fail-open. Plugin-namespaced types accept
/// a looser match because plugins register their own action names.
pub fn is_permitted(descriptor: &ContentTypeDescriptor, permissions: &[Permission]) -> bool {
    if permissions.is_empty() {
        return true;
    }
    permissions.iter().any(|permission| {
        let subject_matches = permission.subject.as_deref() == Some(descriptor.uid.as_str());
        let action_matches = permission.action == READ_ACTION
            || (descriptor.uid.starts_with("plugin::")
                && (permission.action.contains("read") || permission.action.contains("find")));
        subject_matches && action_matches
    })
}

/// Partitions descriptors into deterministically ordered groups.
///
/// Ordering invariants:
/// - items: `sort_order` ascending, ties by case-insensitive label, then
///   uid so the result never depends on input iteration order
/// - groups: "General" pinned first, then minimum member `sort_order`
///   ascending, ties lexically by group name
/// - within each group the final list is collection-kind first, then
///   single-kind, as a stable sub-partition over the order above
///
/// Duplicate uids keep their first occurrence in sorted order. Running
/// this twice over the same input yields identical output.
pub fn group_content_types(
    descriptors: &[ContentTypeDescriptor],
    permissions: &[Permission],
) -> Vec<ContentTypeGroup> {
    let mut permitted: Vec<ContentTypeDescriptor> = descriptors
        .iter()
        .filter(|descriptor| {
            let allowed = is_permitted(descriptor, permissions);
            if !allowed {
                debug!(uid = %descriptor.uid, "descriptor filtered out by permissions");
            }
            allowed
        })
        .cloned()
        .collect();

    permitted.sort_by(compare_items);

    let mut seen_uids: HashSet<String> = HashSet::with_capacity(permitted.len());
    permitted.retain(|descriptor| seen_uids.insert(descriptor.uid.clone()));

    let mut partitions: IndexMap<String, Vec<ContentTypeDescriptor>> = IndexMap::new();
    for descriptor in permitted {
        partitions.entry(descriptor.group.clone()).or_default().push(descriptor);
    }

    let mut groups: Vec<ContentTypeGroup> = partitions
        .into_iter()
        .map(|(name, items)| {
            // Items are already sorted, so the head carries the minimum.
            let sort_order = items.first().map(|item| item.sort_order).unwrap_or(i64::MAX);
            let items = partition_by_kind(items);
            ContentTypeGroup { name, items, sort_order }
        })
        .collect();

    groups.sort_by(compare_groups);
    groups
}

fn compare_items(a: &ContentTypeDescriptor, b: &ContentTypeDescriptor) -> Ordering {
    a.sort_order
        .cmp(&b.sort_order)
        .then_with(|| a.display_name.to_lowercase().cmp(&b.display_name.to_lowercase()))
        .then_with(|| a.display_name.cmp(&b.display_name))
        .then_with(|| a.uid.cmp(&b.uid))
}

fn compare_groups(a: &ContentTypeGroup, b: &ContentTypeGroup) -> Ordering {
    let a_pinned = a.name == GENERAL_GROUP_NAME;
    let b_pinned = b.name == GENERAL_GROUP_NAME;
    b_pinned
        .cmp(&a_pinned)
        .then_with(|| a.sort_order.cmp(&b.sort_order))
        .then_with(|| a.name.cmp(&b.name))
}

/// Stable kind sub-partition: collections first, singles after, each side
/// keeping its numeric/alphabetic order.
fn partition_by_kind(items: Vec<ContentTypeDescriptor>) -> Vec<ContentTypeDescriptor> {
    let (mut collections, singles): (Vec<_>, Vec<_>) =
        items.into_iter().partition(|item| item.kind == ContentKind::Collection);
    collections.extend(singles);
    collections
}
