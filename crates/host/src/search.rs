//! Search-mode reconciliation.
//!
//! The host exposes a live text filter inside its navigation. While the
//! filter holds a value the host's own filtered list must stay usable, so
//! the injected tree yields: it hides itself and reveals the native
//! items. When the filter empties the inverse applies. Both directions
//! are idempotent visibility writes.

use crate::discover::discover_search_input;
use crate::dom::{HostDom, NodeId};

/// Current value of the host's filter input, or `None` when no input has
/// been rendered yet.
pub fn search_filter_value(dom: &dyn HostDom) -> Option<String> {
    let input = discover_search_input(dom)?;
    Some(dom.attr(input, "value").unwrap_or_default())
}

/// Whether the host filter currently holds a non-empty value.
pub fn search_mode_active(dom: &dyn HostDom) -> bool {
    search_filter_value(dom).is_some_and(|value| !value.trim().is_empty())
}

/// Applies the coordinated visibility states.
///
/// `filter_active` hides the injected container and reveals every native
/// sibling under the mount list; inactive does the inverse. Safe to
/// re-run redundantly: writes are change-detecting.
pub fn apply_search_mode(dom: &mut dyn HostDom, mount_list: NodeId, container: NodeId, filter_active: bool) {
    dom.set_hidden(container, filter_active);
    for child in dom.children(mount_list) {
        if child == container {
            continue;
        }
        dom.set_hidden(child, !filter_active);
    }
}
