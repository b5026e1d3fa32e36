//! Discovery of host navigation structures.
//!
//! The host's markup is not a stable contract: class names, nesting, and
//! accessible names drift between versions. Discovery is therefore an
//! ordered list of strategies tried in sequence, each answering
//! found/not-found, so supporting a new host version is a data change to
//! the table rather than new control flow.

use tracing::debug;

use crate::dom::{HostDom, NodeId};

/// Accessible name the host gives its content navigation landmark.
pub const NAV_ARIA_LABEL: &str = "Content";

/// Section labels the host renders above its native navigation lists.
pub const CATEGORY_LABELS: &[&str] = &["Collection Types", "Single Types"];

/// Marker attribute identifying the injected container.
pub const INJECTED_ATTR: &str = "data-grouped-nav";
/// Marker value for the injected container root.
pub const INJECTED_ROOT_VALUE: &str = "root";

const LIST_TAGS: &[&str] = &["ol", "ul"];

/// One discovery tier: a name for logging and a locate function.
pub struct DiscoveryStrategy {
    pub name: &'static str,
    locate: fn(&dyn HostDom) -> Option<NodeId>,
}

/// Tiers for locating the host's navigation root, tried in order.
pub const NAV_ROOT_STRATEGIES: &[DiscoveryStrategy] = &[
    DiscoveryStrategy {
        name: "aria-label",
        locate: |dom| {
            find_node(dom, dom.root(), &|dom, node| {
                dom.tag(node) == "nav" && dom.attr(node, "aria-label").as_deref() == Some(NAV_ARIA_LABEL)
            })
        },
    },
    DiscoveryStrategy {
        name: "navigation-role",
        locate: |dom| {
            find_node(dom, dom.root(), &|dom, node| {
                dom.attr(node, "role").as_deref() == Some("navigation")
            })
        },
    },
    DiscoveryStrategy {
        name: "category-labels",
        locate: |dom| {
            find_node(dom, dom.root(), &|dom, node| {
                dom.tag(node) == "nav" && contains_any_category_label(dom, node)
            })
        },
    },
];

/// Tiers for locating the host's live filter input, same pattern as the
/// navigation root.
pub const SEARCH_INPUT_STRATEGIES: &[DiscoveryStrategy] = &[
    DiscoveryStrategy {
        name: "aria-label",
        locate: |dom| {
            find_node(dom, dom.root(), &|dom, node| {
                dom.tag(node) == "input"
                    && dom
                        .attr(node, "aria-label")
                        .is_some_and(|label| label.to_ascii_lowercase().contains("search"))
            })
        },
    },
    DiscoveryStrategy {
        name: "search-type",
        locate: |dom| {
            find_node(dom, dom.root(), &|dom, node| {
                dom.tag(node) == "input" && dom.attr(node, "type").as_deref() == Some("search")
            })
        },
    },
    DiscoveryStrategy {
        name: "first-input",
        locate: |dom| find_node(dom, dom.root(), &|dom, node| dom.tag(node) == "input"),
    },
];

/// Runs a strategy table, returning the first hit.
pub fn run_strategies(dom: &dyn HostDom, strategies: &[DiscoveryStrategy]) -> Option<NodeId> {
    for strategy in strategies {
        if let Some(found) = (strategy.locate)(dom) {
            debug!(strategy = strategy.name, "discovery strategy matched");
            return Some(found);
        }
    }
    None
}

/// Locates the host's navigation root, or `None` when it has not rendered
/// yet. Absence is "not yet mounted", never an error.
pub fn discover_nav_root(dom: &dyn HostDom) -> Option<NodeId> {
    run_strategies(dom, NAV_ROOT_STRATEGIES)
}

/// Locates the host's live filter input.
pub fn discover_search_input(dom: &dyn HostDom) -> Option<NodeId> {
    run_strategies(dom, SEARCH_INPUT_STRATEGIES)
}

/// Finds the previously injected container inside `scope`, if it survived
/// the host's last re-render.
pub fn find_injected_container(dom: &dyn HostDom, scope: NodeId) -> Option<NodeId> {
    find_node(dom, scope, &|dom, node| {
        dom.attr(node, INJECTED_ATTR).as_deref() == Some(INJECTED_ROOT_VALUE)
    })
}

/// Selects the mount point inside the discovered navigation root.
///
/// Preference order: the list already holding a surviving injected
/// container; the outermost list that contains both category labels and
/// is not itself nested inside another list; the first list found.
pub fn find_mount_list(dom: &dyn HostDom, nav_root: NodeId) -> Option<NodeId> {
    if let Some(container) = find_injected_container(dom, nav_root)
        && let Some(parent) = dom.parent(container)
    {
        return Some(parent);
    }

    let top_level = find_node(dom, nav_root, &|dom, node| {
        is_list(dom, node)
            && contains_all_category_labels(dom, node)
            && !has_list_ancestor(dom, node, nav_root)
    });
    if top_level.is_some() {
        return top_level;
    }

    find_node(dom, nav_root, &|dom, node| is_list(dom, node))
}

/// Preorder search for the first node under `scope` matching `predicate`.
pub fn find_node(
    dom: &dyn HostDom,
    scope: NodeId,
    predicate: &dyn Fn(&dyn HostDom, NodeId) -> bool,
) -> Option<NodeId> {
    dom.descendants(scope).into_iter().find(|node| predicate(dom, *node))
}

fn is_list(dom: &dyn HostDom, node: NodeId) -> bool {
    let tag = dom.tag(node);
    LIST_TAGS.contains(&tag.as_str())
}

fn has_list_ancestor(dom: &dyn HostDom, node: NodeId, scope: NodeId) -> bool {
    let mut current = dom.parent(node);
    while let Some(ancestor) = current {
        if is_list(dom, ancestor) {
            return true;
        }
        if ancestor == scope {
            break;
        }
        current = dom.parent(ancestor);
    }
    false
}

fn contains_any_category_label(dom: &dyn HostDom, node: NodeId) -> bool {
    let text = dom.subtree_text(node);
    CATEGORY_LABELS.iter().any(|label| text.contains(label))
}

fn contains_all_category_labels(dom: &dyn HostDom, node: NodeId) -> bool {
    let text = dom.subtree_text(node);
    CATEGORY_LABELS.iter().all(|label| text.contains(label))
}
