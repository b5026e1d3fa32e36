//! Host synchronization controller.
//!
//! Keeps the injected navigation mounted inside the host-owned subtree
//! while the host rewrites it out-of-band. Everything funnels into one
//! idempotent [`SyncController::reconcile`] pass: discovery, mount,
//! render-if-changed, search-mode visibility, and category-header
//! suppression. The mutation observer and the interval backstop both call
//! the same pass, and running it redundantly never duplicates the
//! container or re-binds anything.

use std::collections::BTreeSet;
use std::hash::{DefaultHasher, Hash, Hasher};

use groupnav_engine::NavStore;
use groupnav_types::{ContentTypeGroup, NavTemplate};
use tracing::debug;

use crate::discover::{
    CATEGORY_LABELS, INJECTED_ATTR, INJECTED_ROOT_VALUE, discover_nav_root, find_injected_container,
    find_mount_list, find_node,
};
use crate::dom::{HostDom, NodeId};
use crate::route::RouteTracker;
use crate::search::{apply_search_mode, search_mode_active};

/// Per-render state handed to the active renderer.
#[derive(Debug, Clone, Default)]
pub struct RenderContext {
    /// Location path at the time of the render.
    pub current_path: String,
    /// Names of groups the collapsible template shows expanded. Survives
    /// re-renders; only user toggles and the first-mount auto-expand
    /// change it.
    pub expanded_groups: BTreeSet<String>,
    /// True until the first render with content; the collapsible template
    /// uses it to auto-expand the active item's group exactly once.
    pub first_mount: bool,
}

impl RenderContext {
    pub fn new() -> Self {
        Self {
            current_path: String::new(),
            expanded_groups: BTreeSet::new(),
            first_mount: true,
        }
    }

    /// Active-item rule: the current path contains the uid as a
    /// substring. The host appends query-like suffixes to the path, so
    /// exact equality would never match.
    pub fn is_active(&self, uid: &str) -> bool {
        !uid.is_empty() && self.current_path.contains(uid)
    }

    pub fn is_expanded(&self, group: &str) -> bool {
        self.expanded_groups.contains(group)
    }
}

/// One renderer variant. All three variants consume the same ordered
/// group list; selection happens once, outside the reconcile loop.
pub trait NavRenderer: Send {
    /// The template this renderer implements.
    fn template(&self) -> NavTemplate;

    /// Builds the navigation subtree under `parent`. Called with an empty
    /// `parent`; must skip groups without items and mark active items.
    /// May mutate `ctx.expanded_groups` (first-mount auto-expand).
    fn render_into(
        &self,
        dom: &mut dyn HostDom,
        parent: NodeId,
        groups: &[ContentTypeGroup],
        ctx: &mut RenderContext,
    );
}

/// Result of one reconcile pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// The host navigation has not rendered yet; retried by the observer
    /// and the interval backstop. Not an error.
    NotMounted,
    /// The injected tree is mounted and consistent.
    Synchronized {
        /// Whether this pass re-rendered the injected subtree.
        rerendered: bool,
    },
}

/// Drives the injected navigation to convergence with the host DOM.
pub struct SyncController {
    store: NavStore,
    route: RouteTracker,
    renderer: Box<dyn NavRenderer>,
    ctx: RenderContext,
    last_fingerprint: Option<u64>,
}

impl SyncController {
    pub fn new(store: NavStore, route: RouteTracker, renderer: Box<dyn NavRenderer>) -> Self {
        Self {
            store,
            route,
            renderer,
            ctx: RenderContext::new(),
            last_fingerprint: None,
        }
    }

    /// The route handle this controller re-evaluates against.
    pub fn route(&self) -> &RouteTracker {
        &self.route
    }

    /// User-driven disclosure toggle for the collapsible template. Takes
    /// effect on the next reconcile.
    pub fn toggle_group(&mut self, group: &str) {
        if !self.ctx.expanded_groups.remove(group) {
            self.ctx.expanded_groups.insert(group.to_string());
        }
        self.last_fingerprint = None;
    }

    /// One idempotent reconciliation pass.
    ///
    /// Mount rules: an existing injected container is never recreated; a
    /// container the host emptied is re-rendered in place; a missing
    /// container is created inside the selected mount list. Rendering
    /// only happens when the render inputs (groups, path, expansion
    /// state) differ from the last render, so redundant passes write
    /// nothing and the mutation-observer feedback loop converges.
    pub fn reconcile(&mut self, dom: &mut dyn HostDom) -> ReconcileOutcome {
        let Some(nav_root) = discover_nav_root(dom) else {
            debug!("host navigation not found; treating as not yet mounted");
            return ReconcileOutcome::NotMounted;
        };
        let Some(mount_list) = find_mount_list(dom, nav_root) else {
            return ReconcileOutcome::NotMounted;
        };
        let container = self.ensure_container(dom, mount_list);

        let groups = self.store.groups();
        self.ctx.current_path = self.route.current_path();

        let needs_render =
            dom.children(container).is_empty() || Some(self.fingerprint(&groups)) != self.last_fingerprint;
        let rerendered = if needs_render {
            dom.remove_children(container);
            self.renderer.render_into(dom, container, &groups, &mut self.ctx);
            if self.ctx.first_mount && !groups.is_empty() {
                self.ctx.first_mount = false;
            }
            // Recomputed after the render so a first-mount auto-expand is
            // part of the stored state, not a difference against it.
            self.last_fingerprint = Some(self.fingerprint(&groups));
            true
        } else {
            false
        };

        let filter_active = search_mode_active(dom);
        apply_search_mode(dom, mount_list, container, filter_active);
        suppress_category_headers(dom, nav_root, mount_list, !filter_active);

        ReconcileOutcome::Synchronized { rerendered }
    }

    fn ensure_container(&self, dom: &mut dyn HostDom, mount_list: NodeId) -> NodeId {
        if let Some(existing) = find_injected_container(dom, mount_list) {
            return existing;
        }
        let container = dom.create_element("div");
        dom.set_attr(container, INJECTED_ATTR, INJECTED_ROOT_VALUE);
        dom.append_child(mount_list, container);
        debug!("injected navigation container created");
        container
    }

    fn fingerprint(&self, groups: &[ContentTypeGroup]) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.renderer.template().id().hash(&mut hasher);
        self.ctx.current_path.hash(&mut hasher);
        self.ctx.expanded_groups.hash(&mut hasher);
        groups.hash(&mut hasher);
        hasher.finish()
    }
}

/// Hides (or restores) the host's redundant category headers and their
/// count badges while the injected tree is the visible one.
///
/// Heuristic per header label: the nearest ancestor that holds the label
/// text together with a numeric badge, is not itself a list element, and
/// does not contain the mount list. Structural, because the host gives
/// these headers no stable identity.
pub fn suppress_category_headers(dom: &mut dyn HostDom, nav_root: NodeId, mount_list: NodeId, hide: bool) {
    let label_nodes: Vec<NodeId> = dom
        .descendants(nav_root)
        .into_iter()
        .filter(|node| {
            let text = dom.text(*node);
            CATEGORY_LABELS.contains(&text.as_str())
        })
        .collect();

    for label_node in label_nodes {
        if let Some(header) = header_container(dom, label_node, nav_root, mount_list) {
            dom.set_hidden(header, hide);
        }
    }
}

fn header_container(dom: &dyn HostDom, label_node: NodeId, nav_root: NodeId, mount_list: NodeId) -> Option<NodeId> {
    let mut current = Some(label_node);
    while let Some(node) = current {
        if node == nav_root {
            break;
        }
        let tag = dom.tag(node);
        let is_list = tag == "ol" || tag == "ul";
        if !is_list && node != mount_list && !contains_node(dom, node, mount_list) && has_numeric_badge(dom, node) {
            return Some(node);
        }
        current = dom.parent(node);
    }
    None
}

fn has_numeric_badge(dom: &dyn HostDom, node: NodeId) -> bool {
    find_node(dom, node, &|dom, candidate| {
        let text = dom.text(candidate);
        !text.is_empty() && text.chars().all(|c| c.is_ascii_digit())
    })
    .is_some()
}

fn contains_node(dom: &dyn HostDom, haystack: NodeId, needle: NodeId) -> bool {
    if haystack == needle {
        return false;
    }
    let mut current = dom.parent(needle);
    while let Some(ancestor) = current {
        if ancestor == haystack {
            return true;
        }
        current = dom.parent(ancestor);
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::MemoryDom;
    use groupnav_types::{ContentKind, ContentTypeDescriptor};

    /// Minimal renderer: one link per item, one heading per group.
    struct FlatTestRenderer;

    impl NavRenderer for FlatTestRenderer {
        fn template(&self) -> NavTemplate {
            NavTemplate::Plain
        }

        fn render_into(
            &self,
            dom: &mut dyn HostDom,
            parent: NodeId,
            groups: &[ContentTypeGroup],
            ctx: &mut RenderContext,
        ) {
            for group in groups {
                if group.items.is_empty() {
                    continue;
                }
                let heading = dom.create_element("span");
                dom.set_text(heading, &group.name);
                dom.append_child(parent, heading);
                for item in &group.items {
                    let link = dom.create_element("a");
                    dom.set_attr(link, "href", &item.href);
                    dom.set_text(link, &item.display_name);
                    if ctx.is_active(&item.uid) {
                        dom.set_attr(link, "aria-current", "page");
                    }
                    dom.append_child(parent, link);
                }
            }
        }
    }

    fn descriptor(uid: &str, display_name: &str, group: &str, sort_order: i64) -> ContentTypeDescriptor {
        ContentTypeDescriptor {
            uid: uid.to_string(),
            name: display_name.to_lowercase(),
            display_name: display_name.to_string(),
            group: group.to_string(),
            kind: ContentKind::Collection,
            href: format!("/content-manager/collection-types/{uid}"),
            sort_order,
        }
    }

    fn build_host(dom: &mut MemoryDom) -> (NodeId, NodeId) {
        let nav = dom.append_element(dom.root(), "nav");
        dom.set_attr(nav, "aria-label", "Content");
        let list = dom.append_element(nav, "ol");
        for label in CATEGORY_LABELS {
            let header = dom.append_element(list, "li");
            let label_node = dom.append_element(header, "span");
            dom.set_text(label_node, label);
            let badge = dom.append_element(header, "span");
            dom.set_text(badge, "3");
        }
        (nav, list)
    }

    fn controller_with(groups_store: NavStore, route: RouteTracker) -> SyncController {
        SyncController::new(groups_store, route, Box::new(FlatTestRenderer))
    }

    fn snapshot(dom: &MemoryDom) -> Vec<(String, String, bool)> {
        dom.descendants(dom.root())
            .into_iter()
            .map(|node| (dom.tag(node), dom.text(node), dom.hidden(node)))
            .collect()
    }

    #[test]
    fn reconcile_without_host_nav_is_not_mounted() {
        let mut dom = MemoryDom::new();
        let mut controller = controller_with(NavStore::new(), RouteTracker::default());
        assert_eq!(controller.reconcile(&mut dom), ReconcileOutcome::NotMounted);
    }

    #[test]
    fn reconcile_mounts_once_and_renders() {
        let mut dom = MemoryDom::new();
        let (_, list) = build_host(&mut dom);
        let store = NavStore::new();
        store.refresh(vec![descriptor("api::post.post", "Post", "Blog", 1)], vec![]);
        let mut controller = controller_with(store, RouteTracker::default());

        assert_eq!(controller.reconcile(&mut dom), ReconcileOutcome::Synchronized { rerendered: true });
        let container = find_injected_container(&dom, list).expect("container mounted");
        assert_eq!(dom.children(container).len(), 2); // heading + link
    }

    #[test]
    fn redundant_reconcile_is_a_no_op() {
        let mut dom = MemoryDom::new();
        build_host(&mut dom);
        let store = NavStore::new();
        store.refresh(vec![descriptor("api::post.post", "Post", "Blog", 1)], vec![]);
        let mut controller = controller_with(store, RouteTracker::default());

        controller.reconcile(&mut dom);
        let first = snapshot(&dom);

        // Either producer may fire again at any time; the second pass must
        // neither duplicate the container nor rewrite anything.
        assert_eq!(controller.reconcile(&mut dom), ReconcileOutcome::Synchronized { rerendered: false });
        assert_eq!(snapshot(&dom), first);
    }

    #[test]
    fn emptied_container_is_rerendered_not_recreated() {
        let mut dom = MemoryDom::new();
        let (_, list) = build_host(&mut dom);
        let store = NavStore::new();
        store.refresh(vec![descriptor("api::post.post", "Post", "Blog", 1)], vec![]);
        let mut controller = controller_with(store, RouteTracker::default());

        controller.reconcile(&mut dom);
        let container = find_injected_container(&dom, list).unwrap();

        // Host wipes the children but leaves the container node alone.
        dom.remove_children(container);
        assert_eq!(controller.reconcile(&mut dom), ReconcileOutcome::Synchronized { rerendered: true });
        assert_eq!(find_injected_container(&dom, list), Some(container));
        assert!(!dom.children(container).is_empty());
    }

    #[test]
    fn route_change_triggers_a_rerender_with_new_active_item() {
        let mut dom = MemoryDom::new();
        let (_, list) = build_host(&mut dom);
        let store = NavStore::new();
        store.refresh(
            vec![
                descriptor("api::post.post", "Post", "Blog", 1),
                descriptor("api::category.category", "Category", "Blog", 2),
            ],
            vec![],
        );
        let route = RouteTracker::new("/content-manager");
        let mut controller = controller_with(store, route.clone());
        controller.reconcile(&mut dom);

        // Host appends query-like suffixes; substring matching still hits.
        route.navigate("/content-manager/collection-types/api::post.post?page=1");
        assert_eq!(controller.reconcile(&mut dom), ReconcileOutcome::Synchronized { rerendered: true });

        let container = find_injected_container(&dom, list).unwrap();
        let active: Vec<String> = dom
            .descendants(container)
            .into_iter()
            .filter(|n| dom.attr(*n, "aria-current").is_some())
            .map(|n| dom.text(n))
            .collect();
        assert_eq!(active, vec!["Post".to_string()]);
    }

    #[test]
    fn search_mode_flips_visibility_both_ways() {
        let mut dom = MemoryDom::new();
        let (nav, list) = build_host(&mut dom);
        let input = dom.append_element(nav, "input");
        dom.set_attr(input, "type", "search");
        let native = dom.append_element(list, "li");
        dom.set_text(native, "Article");

        let store = NavStore::new();
        store.refresh(vec![descriptor("api::post.post", "Post", "Blog", 1)], vec![]);
        let mut controller = controller_with(store, RouteTracker::default());

        controller.reconcile(&mut dom);
        let container = find_injected_container(&dom, list).unwrap();
        assert!(!dom.hidden(container));
        assert!(dom.hidden(native));

        dom.set_attr(input, "value", "art");
        controller.reconcile(&mut dom);
        assert!(dom.hidden(container));
        assert!(!dom.hidden(native));

        dom.set_attr(input, "value", "");
        controller.reconcile(&mut dom);
        assert!(!dom.hidden(container));
        assert!(dom.hidden(native));
    }

    #[test]
    fn category_headers_hide_while_injected_tree_is_visible() {
        let mut dom = MemoryDom::new();
        let (nav, list) = build_host(&mut dom);
        let store = NavStore::new();
        store.refresh(vec![descriptor("api::post.post", "Post", "Blog", 1)], vec![]);
        let mut controller = controller_with(store, RouteTracker::default());
        controller.reconcile(&mut dom);

        let hidden_headers: Vec<NodeId> = dom
            .children(list)
            .into_iter()
            .filter(|n| dom.hidden(*n) && !dom.subtree_text(*n).is_empty())
            .collect();
        // Both label+badge containers are suppressed; the list and nav
        // themselves stay visible.
        assert_eq!(hidden_headers.len(), 2);
        assert!(!dom.hidden(list));
        assert!(!dom.hidden(nav));
    }

    #[test]
    fn user_toggle_changes_expansion_and_forces_render() {
        let mut dom = MemoryDom::new();
        build_host(&mut dom);
        let store = NavStore::new();
        store.refresh(vec![descriptor("api::post.post", "Post", "Blog", 1)], vec![]);
        let mut controller = controller_with(store, RouteTracker::default());
        controller.reconcile(&mut dom);

        controller.toggle_group("Blog");
        assert!(controller.ctx.is_expanded("Blog"));
        assert_eq!(controller.reconcile(&mut dom), ReconcileOutcome::Synchronized { rerendered: true });

        controller.toggle_group("Blog");
        assert!(!controller.ctx.is_expanded("Blog"));
    }
}
