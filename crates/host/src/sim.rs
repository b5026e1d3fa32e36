//! Scripted host admin shell.
//!
//! Builds a representative admin-panel DOM (page title, navigation
//! landmark, filter input, native category headers and links) inside a
//! [`MemoryDom`] and exposes the out-of-band mutations a real host
//! performs: typing in the filter, wiping the injected subtree, and
//! re-rendering its navigation wholesale. Used by the `simulate` CLI
//! subcommand and exercisable from tests.

use std::sync::{Arc, Mutex};

use crate::discover::{CATEGORY_LABELS, NAV_ARIA_LABEL};
use crate::dom::{HostDom, MemoryDom, NodeId};

/// Raw labels the simulated host renders before any cleaning.
const NATIVE_LABELS: &[&str] = &["[2] Blog | Post", "Blog | Category", "Settings"];

/// A shared [`MemoryDom`] pre-populated with host markup, plus handles
/// for scripting the host's side of the conversation.
pub struct HostSimulator {
    dom: Arc<Mutex<MemoryDom>>,
    nav: NodeId,
    list: NodeId,
    search_input: NodeId,
    title: NodeId,
}

impl HostSimulator {
    pub fn new() -> Self {
        let mut dom = MemoryDom::new();
        let title = dom.append_element(dom.root(), "h1");
        dom.set_text(title, NATIVE_LABELS[0]);

        let nav = dom.append_element(dom.root(), "nav");
        dom.set_attr(nav, "aria-label", NAV_ARIA_LABEL);
        let search_input = dom.append_element(nav, "input");
        dom.set_attr(search_input, "type", "search");
        let list = dom.append_element(nav, "ol");
        populate_native_items(&mut dom, list);

        Self {
            dom: Arc::new(Mutex::new(dom)),
            nav,
            list,
            search_input,
            title,
        }
    }

    /// Shared handle suitable for [`crate::driver::spawn_sync`].
    pub fn dom(&self) -> Arc<Mutex<MemoryDom>> {
        self.dom.clone()
    }

    pub fn mount_list(&self) -> NodeId {
        self.list
    }

    pub fn page_title(&self) -> NodeId {
        self.title
    }

    /// Types into (or clears) the host's live filter input.
    pub fn type_in_filter(&self, value: &str) {
        let mut dom = self.dom.lock().expect("host dom lock poisoned");
        dom.set_attr(self.search_input, "value", value);
    }

    /// Host-side wipe of the injected container's children, leaving the
    /// container node in place.
    pub fn wipe_injected(&self) {
        let mut dom = self.dom.lock().expect("host dom lock poisoned");
        if let Some(container) = crate::discover::find_injected_container(&*dom, self.list) {
            dom.remove_children(container);
        }
    }

    /// Full host re-render of the navigation: drops everything under the
    /// landmark, injected container included, and rebuilds native markup.
    pub fn rerender_host_nav(&self) {
        let mut dom = self.dom.lock().expect("host dom lock poisoned");
        dom.remove_children(self.nav);
        let search_input = dom.append_element(self.nav, "input");
        dom.set_attr(search_input, "type", "search");
        let list = dom.append_element(self.nav, "ol");
        populate_native_items(&mut dom, list);
    }

    /// Indented textual dump of the document, for transcripts.
    pub fn describe(&self) -> String {
        let dom = self.dom.lock().expect("host dom lock poisoned");
        let mut out = String::new();
        describe_node(&*dom, dom.root(), 0, &mut out);
        out
    }
}

impl Default for HostSimulator {
    fn default() -> Self {
        Self::new()
    }
}

fn populate_native_items(dom: &mut MemoryDom, list: NodeId) {
    for label in CATEGORY_LABELS {
        let header = dom.append_element(list, "li");
        let label_node = dom.append_element(header, "span");
        dom.set_text(label_node, label);
        let badge = dom.append_element(header, "span");
        dom.set_text(badge, &NATIVE_LABELS.len().to_string());
    }
    for label in NATIVE_LABELS {
        let item = dom.append_element(list, "li");
        let link = dom.append_element(item, "a");
        dom.set_text(link, label);
    }
}

fn describe_node(dom: &MemoryDom, node: NodeId, depth: usize, out: &mut String) {
    let indent = "  ".repeat(depth);
    let tag = dom.tag(node);
    let text = dom.text(node);
    let hidden = if dom.hidden(node) { " hidden" } else { "" };
    if text.is_empty() {
        out.push_str(&format!("{indent}<{tag}{hidden}>\n"));
    } else {
        out.push_str(&format!("{indent}<{tag}{hidden}> {text}\n"));
    }
    for child in dom.children(node) {
        describe_node(dom, child, depth + 1, out);
    }
}
