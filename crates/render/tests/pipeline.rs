//! End-to-end pipeline checks: raw listing → normalize → group → render.

use groupnav_engine::{group_content_types, normalize};
use groupnav_host::{HostDom, MemoryDom, RenderContext};
use groupnav_render::renderer_for;
use groupnav_types::{NavTemplate, RawContentType};
use serde_json::json;

fn listing() -> Vec<RawContentType> {
    let records = json!([
        { "uid": "api::post.post", "kind": "collectionType", "info": { "displayName": "[2] Blog | Post" } },
        { "uid": "api::category.category", "kind": "collectionType", "info": { "displayName": "Blog | Category" } },
        { "uid": "api::settings.settings", "kind": "singleType", "info": { "displayName": "Settings" } },
        { "uid": "api::contact.contact", "kind": "singleType", "info": { "displayName": "[1] General | Contact" } },
        { "uid": "admin::user", "kind": "collectionType", "info": { "displayName": "User" } }
    ]);
    serde_json::from_value(records).unwrap()
}

#[test]
fn listing_renders_in_grouped_order() {
    let descriptors = normalize(" | ", &listing());
    let groups = group_content_types(&descriptors, &[]);

    let names: Vec<&str> = groups.iter().map(|g| g.name.as_str()).collect();
    // General pins first, Blog carries order 2, Settings the sentinel.
    assert_eq!(names, vec!["General", "Blog", "Settings"]);

    let blog: Vec<&str> = groups[1].items.iter().map(|i| i.display_name.as_str()).collect();
    // Post has explicit order 2, Category the sentinel.
    assert_eq!(blog, vec!["Post", "Category"]);

    let mut dom = MemoryDom::new();
    let parent = dom.append_element(dom.root(), "div");
    let mut ctx = RenderContext::new();
    ctx.current_path = "/content-manager/collection-types/api::post.post".to_string();
    renderer_for(NavTemplate::Accordion).render_into(&mut dom, parent, &groups, &mut ctx);

    // The active item's group auto-expanded, so Post is reachable.
    let text = dom.subtree_text(parent);
    assert!(text.contains("Post"));
    assert!(text.contains("Contact"));
    // The admin record never made it into the tree.
    assert!(!text.contains("User"));
}

#[test]
fn all_templates_render_the_same_items() {
    let descriptors = normalize(" | ", &listing());
    let groups = group_content_types(&descriptors, &[]);

    for template in [NavTemplate::V5, NavTemplate::Plain] {
        let mut dom = MemoryDom::new();
        let parent = dom.append_element(dom.root(), "div");
        renderer_for(template).render_into(&mut dom, parent, &groups, &mut RenderContext::new());
        let links = dom
            .descendants(parent)
            .into_iter()
            .filter(|n| dom.tag(*n) == "a")
            .count();
        assert_eq!(links, 4, "template {template} must render every permitted item");
    }
}
