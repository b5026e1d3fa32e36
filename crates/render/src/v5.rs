//! Fifth-generation-sidebar renderer.

use groupnav_host::{HostDom, NavRenderer, NodeId, RenderContext};
use groupnav_types::{ContentTypeGroup, NavTemplate};

use crate::append_link;

/// Flat sections in the visual idiom of the host's v5 sidebar: a heading
/// per group, every item always visible, no disclosure controls.
pub struct V5Renderer;

impl NavRenderer for V5Renderer {
    fn template(&self) -> NavTemplate {
        NavTemplate::V5
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
            let section = dom.create_element("div");
            dom.set_attr(section, "class", "nav-section-v5");
            dom.set_attr(section, "data-group", &group.name);

            let heading = dom.create_element("span");
            dom.set_text(heading, &group.name);
            dom.append_child(section, heading);

            let list = dom.create_element("ul");
            for item in &group.items {
                let entry = dom.create_element("li");
                append_link(dom, entry, item, ctx);
                dom.append_child(list, entry);
            }
            dom.append_child(section, list);
            dom.append_child(parent, section);
        }
    }
}
