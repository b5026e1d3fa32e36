//! Plain-list renderer.

use groupnav_host::{HostDom, NavRenderer, NodeId, RenderContext};
use groupnav_types::{ContentTypeGroup, NavTemplate};

use crate::append_link;

/// One flat list: a non-interactive heading row per group followed by
/// its items. The simplest presentation of the shared group order.
pub struct PlainRenderer;

impl NavRenderer for PlainRenderer {
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
        let list = dom.create_element("ul");
        for group in groups {
            if group.items.is_empty() {
                continue;
            }
            let heading = dom.create_element("li");
            dom.set_attr(heading, "role", "presentation");
            dom.set_text(heading, &group.name);
            dom.append_child(list, heading);

            for item in &group.items {
                let entry = dom.create_element("li");
                append_link(dom, entry, item, ctx);
                dom.append_child(list, entry);
            }
        }
        dom.append_child(parent, list);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use groupnav_host::MemoryDom;
    use groupnav_types::{ContentKind, ContentTypeDescriptor};

    #[test]
    fn groups_become_heading_rows() {
        let items = vec![ContentTypeDescriptor {
            uid: "api::post.post".to_string(),
            name: "post".to_string(),
            display_name: "Post".to_string(),
            group: "Blog".to_string(),
            kind: ContentKind::Collection,
            href: "/content-manager/collection-types/api::post.post".to_string(),
            sort_order: 1,
        }];
        let groups = vec![ContentTypeGroup {
            name: "Blog".to_string(),
            items,
            sort_order: 1,
        }];

        let mut dom = MemoryDom::new();
        let parent = dom.append_element(dom.root(), "div");
        PlainRenderer.render_into(&mut dom, parent, &groups, &mut RenderContext::new());

        let list = dom.children(parent)[0];
        let rows = dom.children(list);
        assert_eq!(rows.len(), 2);
        assert_eq!(dom.attr(rows[0], "role").as_deref(), Some("presentation"));
        assert_eq!(dom.text(rows[0]), "Blog");
    }
}
