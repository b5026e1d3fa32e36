//! Collapsible-group renderer.

use groupnav_host::{HostDom, NavRenderer, NodeId, RenderContext};
use groupnav_types::{ContentTypeGroup, NavTemplate};

use crate::append_link;

/// Renders each multi-item group behind a disclosure button; single-item
/// groups render flat so a one-item group never grows a toggle.
///
/// On first mount the group containing the active item is auto-expanded.
/// Expansion state lives in the [`RenderContext`] and survives
/// re-renders; only user toggles change it afterwards.
pub struct AccordionRenderer;

impl NavRenderer for AccordionRenderer {
    fn template(&self) -> NavTemplate {
        NavTemplate::Accordion
    }

    fn render_into(
        &self,
        dom: &mut dyn HostDom,
        parent: NodeId,
        groups: &[ContentTypeGroup],
        ctx: &mut RenderContext,
    ) {
        if ctx.first_mount {
            for group in groups {
                if group.items.iter().any(|item| ctx.is_active(&item.uid)) {
                    ctx.expanded_groups.insert(group.name.clone());
                }
            }
        }

        for group in groups {
            if group.items.is_empty() {
                continue;
            }
            if group.is_singleton() {
                append_link(dom, parent, &group.items[0], ctx);
                continue;
            }

            let section = dom.create_element("section");
            dom.set_attr(section, "data-group", &group.name);
            if group.items.iter().any(|item| ctx.is_active(&item.uid)) {
                dom.set_attr(section, "data-active", "true");
            }

            let expanded = ctx.is_expanded(&group.name);
            let toggle = dom.create_element("button");
            dom.set_text(toggle, &group.name);
            dom.set_attr(toggle, "aria-expanded", if expanded { "true" } else { "false" });
            dom.append_child(section, toggle);

            if expanded {
                let list = dom.create_element("ul");
                for item in &group.items {
                    let entry = dom.create_element("li");
                    append_link(dom, entry, item, ctx);
                    dom.append_child(list, entry);
                }
                dom.append_child(section, list);
            }

            dom.append_child(parent, section);
        }
    }
}
