//! Host DOM abstraction.
//!
//! The host admin panel owns its markup and rewrites it asynchronously
//! without notice, so everything the synchronization controller does goes
//! through the narrow [`HostDom`] trait: a tree of tagged nodes with
//! text, attributes, and a visibility bit, plus mutation-event fan-out.
//! [`MemoryDom`] is the in-process implementation used by tests and the
//! simulator; a real browser binding would implement the same trait.

use indexmap::IndexMap;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

/// Opaque handle to a node inside a [`HostDom`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) usize);

/// A structural change inside the host tree.
///
/// Observers receive these after the fact; they carry the affected node
/// only, never the payload, mirroring how little a mutation-observer
/// protocol can be trusted to deliver. Consumers must therefore re-read
/// the tree rather than interpret the event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DomMutation {
    /// A child list changed under this node (subtree added or removed).
    ChildrenChanged(NodeId),
    /// The node's own text changed.
    TextChanged(NodeId),
    /// An attribute changed, including externally-driven input values.
    AttributeChanged(NodeId),
}

/// Receiver half of a mutation subscription. Dropping it disconnects the
/// observer; no further callbacks fire for it.
pub type MutationReceiver = UnboundedReceiver<DomMutation>;

/// Minimal tree interface over the host-owned markup.
///
/// Write operations must be change-detecting: setting a value a node
/// already holds emits no mutation event. The reconciler relies on this
/// to converge instead of feeding its own writes back to itself.
pub trait HostDom: Send {
    /// The document root (the page body).
    fn root(&self) -> NodeId;

    /// Creates a detached element.
    fn create_element(&mut self, tag: &str) -> NodeId;
    /// Appends a detached node under `parent`.
    fn append_child(&mut self, parent: NodeId, child: NodeId);
    /// Detaches every child of `node`.
    fn remove_children(&mut self, node: NodeId);

    fn tag(&self, node: NodeId) -> String;
    fn text(&self, node: NodeId) -> String;
    fn set_text(&mut self, node: NodeId, text: &str);
    fn attr(&self, node: NodeId, name: &str) -> Option<String>;
    fn set_attr(&mut self, node: NodeId, name: &str, value: &str);
    fn hidden(&self, node: NodeId) -> bool;
    fn set_hidden(&mut self, node: NodeId, hidden: bool);

    fn parent(&self, node: NodeId) -> Option<NodeId>;
    fn children(&self, node: NodeId) -> Vec<NodeId>;

    /// Whether the node is still attached to the document root.
    fn is_attached(&self, node: NodeId) -> bool;

    /// Registers a mutation observer over the whole tree.
    fn subscribe(&mut self) -> MutationReceiver;

    /// Preorder walk of the subtree rooted at `node`, including `node`.
    fn descendants(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![node];
        while let Some(current) = stack.pop() {
            out.push(current);
            let mut children = self.children(current);
            children.reverse();
            stack.extend(children);
        }
        out
    }

    /// Concatenated text of the subtree, space separated.
    fn subtree_text(&self, node: NodeId) -> String {
        let mut parts = Vec::new();
        for descendant in self.descendants(node) {
            let text = self.text(descendant);
            if !text.is_empty() {
                parts.push(text);
            }
        }
        parts.join(" ")
    }
}

#[derive(Debug)]
struct NodeEntry {
    tag: String,
    text: String,
    attrs: IndexMap<String, String>,
    hidden: bool,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// In-memory [`HostDom`] with mutation-event fan-out.
///
/// Nodes are arena-allocated and never freed; detached subtrees simply
/// lose their path to the root, matching how a wiped browser subtree
/// still exists while an old handle points at it.
#[derive(Debug, Default)]
pub struct MemoryDom {
    nodes: Vec<NodeEntry>,
    pub(crate) subscribers: Vec<UnboundedSender<DomMutation>>,
}

impl MemoryDom {
    /// Creates a document holding only a `body` root.
    pub fn new() -> Self {
        let mut dom = Self::default();
        dom.nodes.push(NodeEntry {
            tag: "body".to_string(),
            text: String::new(),
            attrs: IndexMap::new(),
            hidden: false,
            parent: None,
            children: Vec::new(),
        });
        dom
    }

    /// Convenience for building fixtures: create, attach, and return.
    pub fn append_element(&mut self, parent: NodeId, tag: &str) -> NodeId {
        let node = self.create_element(tag);
        self.append_child(parent, node);
        node
    }

    fn emit(&mut self, mutation: DomMutation) {
        // Closed receivers are pruned on the way through; a dropped
        // subscription must never see another event.
        self.subscribers.retain(|sender| sender.send(mutation).is_ok());
    }

    fn entry(&self, node: NodeId) -> &NodeEntry {
        &self.nodes[node.0]
    }

    fn entry_mut(&mut self, node: NodeId) -> &mut NodeEntry {
        &mut self.nodes[node.0]
    }
}

impl HostDom for MemoryDom {
    fn root(&self) -> NodeId {
        NodeId(0)
    }

    fn create_element(&mut self, tag: &str) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(NodeEntry {
            tag: tag.to_string(),
            text: String::new(),
            attrs: IndexMap::new(),
            hidden: false,
            parent: None,
            children: Vec::new(),
        });
        id
    }

    fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if self.entry(child).parent == Some(parent) {
            return;
        }
        if let Some(old_parent) = self.entry(child).parent {
            let old = self.entry_mut(old_parent);
            old.children.retain(|c| *c != child);
        }
        self.entry_mut(child).parent = Some(parent);
        self.entry_mut(parent).children.push(child);
        self.emit(DomMutation::ChildrenChanged(parent));
    }

    fn remove_children(&mut self, node: NodeId) {
        let children = std::mem::take(&mut self.entry_mut(node).children);
        if children.is_empty() {
            return;
        }
        for child in children {
            self.entry_mut(child).parent = None;
        }
        self.emit(DomMutation::ChildrenChanged(node));
    }

    fn tag(&self, node: NodeId) -> String {
        self.entry(node).tag.clone()
    }

    fn text(&self, node: NodeId) -> String {
        self.entry(node).text.clone()
    }

    fn set_text(&mut self, node: NodeId, text: &str) {
        if self.entry(node).text == text {
            return;
        }
        self.entry_mut(node).text = text.to_string();
        self.emit(DomMutation::TextChanged(node));
    }

    fn attr(&self, node: NodeId, name: &str) -> Option<String> {
        self.entry(node).attrs.get(name).cloned()
    }

    fn set_attr(&mut self, node: NodeId, name: &str, value: &str) {
        if self.entry(node).attrs.get(name).map(String::as_str) == Some(value) {
            return;
        }
        self.entry_mut(node).attrs.insert(name.to_string(), value.to_string());
        self.emit(DomMutation::AttributeChanged(node));
    }

    fn hidden(&self, node: NodeId) -> bool {
        self.entry(node).hidden
    }

    fn set_hidden(&mut self, node: NodeId, hidden: bool) {
        if self.entry(node).hidden == hidden {
            return;
        }
        self.entry_mut(node).hidden = hidden;
        self.emit(DomMutation::AttributeChanged(node));
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.entry(node).parent
    }

    fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.entry(node).children.clone()
    }

    fn is_attached(&self, node: NodeId) -> bool {
        let mut current = node;
        loop {
            if current == self.root() {
                return true;
            }
            match self.entry(current).parent {
                Some(parent) => current = parent,
                None => return false,
            }
        }
    }

    fn subscribe(&mut self) -> MutationReceiver {
        let (sender, receiver) = mpsc::unbounded_channel();
        self.subscribers.push(sender);
        receiver
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_and_walk() {
        let mut dom = MemoryDom::new();
        let nav = dom.append_element(dom.root(), "nav");
        let list = dom.append_element(nav, "ol");
        let item = dom.append_element(list, "li");
        dom.set_text(item, "Articles");

        assert_eq!(dom.children(dom.root()), vec![nav]);
        assert_eq!(dom.parent(item), Some(list));
        assert!(dom.is_attached(item));
        assert_eq!(dom.subtree_text(nav), "Articles");
    }

    #[test]
    fn remove_children_detaches_subtrees() {
        let mut dom = MemoryDom::new();
        let nav = dom.append_element(dom.root(), "nav");
        let item = dom.append_element(nav, "li");
        dom.remove_children(nav);
        assert!(!dom.is_attached(item));
        assert!(dom.children(nav).is_empty());
    }

    #[test]
    fn unchanged_writes_emit_no_mutations() {
        let mut dom = MemoryDom::new();
        let nav = dom.append_element(dom.root(), "nav");
        dom.set_text(nav, "Content");
        dom.set_attr(nav, "aria-label", "Content");
        dom.set_hidden(nav, true);

        let mut events = dom.subscribe();

        dom.set_text(nav, "Content");
        dom.set_attr(nav, "aria-label", "Content");
        dom.set_hidden(nav, true);
        dom.remove_children(nav);

        assert!(events.try_recv().is_err());
    }

    #[test]
    fn mutation_events_fan_out_until_dropped() {
        let mut dom = MemoryDom::new();
        let mut events = dom.subscribe();
        let nav = dom.append_element(dom.root(), "nav");
        assert_eq!(events.try_recv().unwrap(), DomMutation::ChildrenChanged(dom.root()));

        drop(events);
        dom.append_element(nav, "ol");
        // The closed subscriber is pruned without panicking.
        assert!(dom.subscribers.is_empty());
    }

    #[test]
    fn reappending_to_same_parent_is_a_no_op() {
        let mut dom = MemoryDom::new();
        let nav = dom.append_element(dom.root(), "nav");
        let mut events = dom.subscribe();
        dom.append_child(dom.root(), nav);
        assert!(events.try_recv().is_err());
    }
}
