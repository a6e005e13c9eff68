//! Markup generation for hosts that describe the menu in JSON

use crate::config::CssClasses;
use crate::tree::{MenuTree, PanelId};

/// Nested list markup for `tree`, wrapped in the nav element
pub fn render_nav(tree: &MenuTree, classes: &CssClasses) -> String {
    let mut out = format!(r#"<nav class="{}">"#, classes.nav);
    write_panel(tree, tree.root(), &mut out);
    out.push_str("</nav>");
    out
}

/// A minimal page around the nav: open trigger plus sidebar container
pub fn render_document(tree: &MenuTree, classes: &CssClasses) -> String {
    format!(
        r#"<body><div class="{open}"></div><div class="{sidebar}">{nav}</div></body>"#,
        open = classes.icon_open,
        sidebar = classes.sidebar,
        nav = render_nav(tree, classes),
    )
}

fn write_panel(tree: &MenuTree, panel: PanelId, out: &mut String) {
    out.push_str("<ul>");
    for entry_id in tree.entries(panel) {
        let Ok(entry) = tree.entry(*entry_id) else {
            continue;
        };
        let href = entry.href().unwrap_or("#").replace('"', "&quot;");
        out.push_str(&format!(r#"<li><a href="{}">{}</a>"#, href, entry.title()));
        if let Some(child) = entry.child() {
            write_panel(tree, child, out);
        }
        out.push_str("</li>");
    }
    out.push_str("</ul>");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hierarchy::{classify, find_root_list};
    use crate::markup::Markup;
    use crate::tree::MenuItem;

    fn tree() -> MenuTree {
        MenuTree::from_items(&[
            MenuItem::new("Home").with_href("/"),
            MenuItem::new("Docs").with_children(vec![MenuItem::new("API").with_href("/api")]),
        ])
        .unwrap()
    }

    #[test]
    fn test_render_nav() {
        assert_eq!(
            render_nav(&tree(), &CssClasses::default()),
            concat!(
                r#"<nav class="off-canvas-nav"><ul>"#,
                r#"<li><a href="/">Home</a></li>"#,
                r##"<li><a href="#">Docs</a><ul><li><a href="/api">API</a></li></ul></li>"##,
                "</ul></nav>"
            )
        );
    }

    #[test]
    fn test_rendered_markup_classifies_to_same_tree() {
        let classes = CssClasses::default();
        let built = tree();
        let markup = Markup::parse(&render_document(&built, &classes)).unwrap();
        let root = find_root_list(&markup, &classes).unwrap();
        let reparsed = classify(&markup, &root).unwrap().tree;

        assert_eq!(reparsed.panel_count(), built.panel_count());
        assert_eq!(
            reparsed.visible_items(reparsed.root(), "Menu"),
            built.visible_items(built.root(), "Menu")
        );
        assert!(markup.find_first_by_class("icon-open-container", None).is_some());
    }
}
