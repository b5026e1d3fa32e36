//! Host label cleaning.
//!
//! Until the injected tree takes over, the host renders raw display names
//! wherever it pleases: the page-title heading and its own navigation
//! links. This pass strips the ordering-hint bracket pattern from those
//! places. It runs from its own observer subscription, independent of the
//! mount reconciler, and is idempotent: a cleaned label no longer matches
//! the pattern, so re-running writes nothing.

use groupnav_util::strip_order_hint;

use crate::dom::{HostDom, NodeId};

/// Strips ordering hints from the page-title heading and from link text
/// inside `nav_root`. Returns how many nodes were rewritten.
pub fn clean_labels(dom: &mut dyn HostDom, nav_root: Option<NodeId>) -> usize {
    let mut cleaned = 0;

    for node in dom.descendants(dom.root()) {
        if dom.tag(node) == "h1" && clean_node_text(dom, node) {
            cleaned += 1;
        }
    }

    if let Some(nav_root) = nav_root {
        for node in dom.descendants(nav_root) {
            if dom.tag(node) == "a" && clean_node_text(dom, node) {
                cleaned += 1;
            }
        }
    }

    cleaned
}

fn clean_node_text(dom: &mut dyn HostDom, node: NodeId) -> bool {
    let text = dom.text(node);
    match strip_order_hint(&text) {
        std::borrow::Cow::Owned(stripped) => {
            dom.set_text(node, &stripped);
            true
        }
        std::borrow::Cow::Borrowed(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::MemoryDom;

    #[test]
    fn strips_hints_from_heading_and_nav_links() {
        let mut dom = MemoryDom::new();
        let title = dom.append_element(dom.root(), "h1");
        dom.set_text(title, "[2] Blog | Post");
        let nav = dom.append_element(dom.root(), "nav");
        let link = dom.append_element(nav, "a");
        dom.set_text(link, "[1] Shop | Order");
        let outside = dom.append_element(dom.root(), "a");
        dom.set_text(outside, "[9] Untouched");

        let cleaned = clean_labels(&mut dom, Some(nav));
        assert_eq!(cleaned, 2);
        assert_eq!(dom.text(title), "Blog | Post");
        assert_eq!(dom.text(link), "Shop | Order");
        // Links outside the nav root are the host's business.
        assert_eq!(dom.text(outside), "[9] Untouched");
    }

    #[test]
    fn cleaning_is_idempotent() {
        let mut dom = MemoryDom::new();
        let title = dom.append_element(dom.root(), "h1");
        dom.set_text(title, "[3] Pages");

        assert_eq!(clean_labels(&mut dom, None), 1);
        assert_eq!(clean_labels(&mut dom, None), 0);
        assert_eq!(dom.text(title), "Pages");
    }
}
