//! Renderer variants for the grouped navigation.
//!
//! Three interchangeable presentations of the same ordered group list
//! sit behind the [`NavRenderer`] trait the host controller consumes:
//!
//! - [`AccordionRenderer`] — collapsible groups with disclosure buttons
//! - [`V5Renderer`] — flat sections styled after the host's
//!   fifth-generation sidebar
//! - [`PlainRenderer`] — one list with group-heading separators
//!
//! [`renderer_for`] is the whole Presentation Selector: a pure mapping
//! from the configured template to a renderer, with no side effect
//! beyond the choice. Unknown template values never reach it; config
//! resolution already folded them into the default.
//!
//! Link activation is the caller's wiring: every rendered anchor carries
//! `href` and `data-uid`, and the host binding routes clicks to
//! [`groupnav_host::RouteTracker::navigate`] for client-side history
//! navigation with its full-load fallback.

mod accordion;
mod plain;
mod v5;

pub use accordion::AccordionRenderer;
pub use plain::PlainRenderer;
pub use v5::V5Renderer;

use groupnav_host::{HostDom, NavRenderer, NodeId, RenderContext};
use groupnav_types::{ContentTypeDescriptor, NavTemplate};

/// Maps a template to its renderer.
pub fn renderer_for(template: NavTemplate) -> Box<dyn NavRenderer> {
    match template {
        NavTemplate::Accordion => Box::new(AccordionRenderer),
        NavTemplate::V5 => Box::new(V5Renderer),
        NavTemplate::Plain => Box::new(PlainRenderer),
    }
}

/// Appends one navigation link under `parent`.
///
/// Active items are marked with `aria-current="page"` per the substring
/// rule in [`RenderContext::is_active`].
pub(crate) fn append_link(
    dom: &mut dyn HostDom,
    parent: NodeId,
    item: &ContentTypeDescriptor,
    ctx: &RenderContext,
) -> NodeId {
    let link = dom.create_element("a");
    dom.set_attr(link, "href", &item.href);
    dom.set_attr(link, "data-uid", &item.uid);
    dom.set_text(link, &item.display_name);
    if ctx.is_active(&item.uid) {
        dom.set_attr(link, "aria-current", "page");
    }
    dom.append_child(parent, link);
    link
}
