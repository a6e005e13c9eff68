//! Navigation tree - panels (lists) and entries (list items)
//!
//! The tree is built once, either from a JSON item list or by classifying
//! host markup, and is never restructured afterwards. Panels keep a
//! back-reference to the entry that owns them, so the "back" path is an O(1)
//! lookup instead of a walk up through the markup.

use serde::{Deserialize, Serialize};

use crate::error::{MenuError, MenuResult};
use crate::markup::{decode_entities, strip_tags};

/// Handle to a panel; the root panel is always index 0
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PanelId(usize);

impl PanelId {
    pub const ROOT: PanelId = PanelId(0);

    pub fn index(self) -> usize {
        self.0
    }
}

/// Handle to an entry, numbered in document order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntryId(usize);

impl EntryId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Declarative menu item, as supplied by a host in JSON
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    pub title: String,
    #[serde(default)]
    pub href: Option<String>,
    #[serde(default)]
    pub children: Vec<MenuItem>,
}

impl MenuItem {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            href: None,
            children: Vec::new(),
        }
    }

    pub fn with_href(mut self, href: &str) -> Self {
        self.href = Some(href.to_string());
        self
    }

    pub fn with_children(mut self, children: Vec<MenuItem>) -> Self {
        self.children = children;
        self
    }
}

/// One level of the hierarchy, shown or hidden as a unit
#[derive(Debug, Clone)]
pub struct Panel {
    depth: u32,
    entries: Vec<EntryId>,
    owner: Option<EntryId>,
}

impl Panel {
    /// Nesting depth, 1 for the root
    pub fn depth(&self) -> u32 {
        self.depth
    }

    pub fn entries(&self) -> &[EntryId] {
        &self.entries
    }

    /// Entry whose child list this panel is; `None` for the root
    pub fn owner(&self) -> Option<EntryId> {
        self.owner
    }
}

/// A selectable row inside a panel
#[derive(Debug, Clone)]
pub struct Entry {
    title: String,
    plain_title: String,
    href: Option<String>,
    panel: PanelId,
    child: Option<PanelId>,
}

impl Entry {
    /// Label as markup
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Label with markup removed
    pub fn plain_title(&self) -> &str {
        &self.plain_title
    }

    pub fn href(&self) -> Option<&str> {
        self.href.as_deref()
    }

    /// Panel this entry is listed in
    pub fn panel(&self) -> PanelId {
        self.panel
    }

    /// Nested panel opened by this entry
    pub fn child(&self) -> Option<PanelId> {
        self.child
    }
}

/// Read-only snapshot of one entry of the visible panel
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VisibleItem {
    pub title: String,
    pub children_count: usize,
    pub has_children: bool,
    pub has_parent_list: bool,
    pub parent_title: String,
}

/// The navigation hierarchy
#[derive(Debug, Clone)]
pub struct MenuTree {
    panels: Vec<Panel>,
    entries: Vec<Entry>,
}

impl Default for MenuTree {
    fn default() -> Self {
        Self::new()
    }
}

impl MenuTree {
    /// Create a tree holding only an empty root panel
    pub fn new() -> Self {
        Self {
            panels: vec![Panel {
                depth: 1,
                entries: Vec::new(),
                owner: None,
            }],
            entries: Vec::new(),
        }
    }

    /// Build a tree from declarative items
    pub fn from_items(items: &[MenuItem]) -> MenuResult<Self> {
        if items.is_empty() {
            return Err(MenuError::EmptyMenu);
        }
        let mut tree = Self::new();
        tree.add_items(PanelId::ROOT, items);
        Ok(tree)
    }

    /// Build a tree from a JSON array of items
    pub fn from_json(json: &str) -> MenuResult<Self> {
        let items: Vec<MenuItem> = serde_json::from_str(json)?;
        Self::from_items(&items)
    }

    fn add_items(&mut self, panel: PanelId, items: &[MenuItem]) {
        for item in items {
            let entry = self.add_entry(panel, &item.title, item.href.as_deref());
            if !item.children.is_empty() {
                let child = self.add_child_panel(entry);
                self.add_items(child, &item.children);
            }
        }
    }

    // ========================
    // Building
    // ========================

    /// Append an entry to `panel`
    pub fn add_entry(&mut self, panel: PanelId, title: &str, href: Option<&str>) -> EntryId {
        let id = EntryId(self.entries.len());
        self.entries.push(Entry {
            title: title.trim().to_string(),
            plain_title: decode_entities(&strip_tags(title)).trim().to_string(),
            href: href.map(String::from),
            panel,
            child: None,
        });
        self.panels[panel.0].entries.push(id);
        id
    }

    /// Give `entry` a nested panel one level deeper than its own; returns
    /// the existing panel if it already has one
    pub fn add_child_panel(&mut self, entry: EntryId) -> PanelId {
        if let Some(existing) = self.entries[entry.0].child {
            return existing;
        }
        let depth = self.panels[self.entries[entry.0].panel.0].depth + 1;
        let id = PanelId(self.panels.len());
        self.panels.push(Panel {
            depth,
            entries: Vec::new(),
            owner: Some(entry),
        });
        self.entries[entry.0].child = Some(id);
        id
    }

    // ========================
    // Queries
    // ========================

    pub fn root(&self) -> PanelId {
        PanelId::ROOT
    }

    pub fn panel_count(&self) -> usize {
        self.panels.len()
    }

    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    /// All panels in document order
    pub fn panel_ids(&self) -> impl Iterator<Item = PanelId> {
        (0..self.panels.len()).map(PanelId)
    }

    /// All entries in document order
    pub fn entry_ids(&self) -> impl Iterator<Item = EntryId> {
        (0..self.entries.len()).map(EntryId)
    }

    pub fn panel(&self, id: PanelId) -> MenuResult<&Panel> {
        self.panels.get(id.0).ok_or(MenuError::UnknownPanel(id.0))
    }

    pub fn entry(&self, id: EntryId) -> MenuResult<&Entry> {
        self.entries.get(id.0).ok_or(MenuError::UnknownEntry(id.0))
    }

    /// Depth marker of a panel; 0 for a handle outside this tree
    pub fn depth(&self, panel: PanelId) -> u32 {
        self.panels.get(panel.0).map_or(0, |p| p.depth)
    }

    pub fn entries(&self, panel: PanelId) -> &[EntryId] {
        self.panels
            .get(panel.0)
            .map_or(&[][..], |p| p.entries.as_slice())
    }

    /// Entries of `panel` that lead to a nested panel
    pub fn entries_with_children(&self, panel: PanelId) -> Vec<EntryId> {
        self.entries(panel)
            .iter()
            .copied()
            .filter(|entry| self.entries[entry.0].child.is_some())
            .collect()
    }

    pub fn child_panel(&self, entry: EntryId) -> Option<PanelId> {
        self.entries.get(entry.0).and_then(|e| e.child)
    }

    /// Number of entries in the panel opened by `entry`
    pub fn child_count(&self, entry: EntryId) -> usize {
        self.child_panel(entry)
            .map_or(0, |child| self.panels[child.0].entries.len())
    }

    pub fn owner_entry(&self, panel: PanelId) -> Option<EntryId> {
        self.panels.get(panel.0).and_then(|p| p.owner)
    }

    /// Nearest enclosing panel, `None` for the root
    pub fn parent_panel(&self, panel: PanelId) -> Option<PanelId> {
        self.owner_entry(panel).map(|entry| self.entries[entry.0].panel)
    }

    /// Header title while `panel` is shown: the plain label of the entry that
    /// opened it, or `default` for the root
    pub fn context_title<'a>(&'a self, panel: PanelId, default: &'a str) -> &'a str {
        match self.owner_entry(panel) {
            Some(entry) if !self.entries[entry.0].plain_title.is_empty() => {
                &self.entries[entry.0].plain_title
            }
            _ => default,
        }
    }

    /// First entry, in document order, whose plain label equals `title`
    pub fn find_entry(&self, title: &str) -> Option<EntryId> {
        self.entries
            .iter()
            .position(|entry| entry.plain_title == title)
            .map(EntryId)
    }

    /// Entry of `panel` whose plain label equals `title`
    pub fn find_entry_in(&self, panel: PanelId, title: &str) -> Option<EntryId> {
        self.entries(panel)
            .iter()
            .copied()
            .find(|entry| self.entries[entry.0].plain_title == title)
    }

    /// Snapshot of the entries of `panel`
    pub fn visible_items(&self, panel: PanelId, default_title: &str) -> Vec<VisibleItem> {
        let has_parent_list = self.parent_panel(panel).is_some();
        let parent_title = self.context_title(panel, default_title).to_string();

        self.entries(panel)
            .iter()
            .map(|entry| {
                let children_count = self.child_count(*entry);
                VisibleItem {
                    title: self.entries[entry.0].title.clone(),
                    children_count,
                    has_children: children_count > 0,
                    has_parent_list,
                    parent_title: parent_title.clone(),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> MenuTree {
        MenuTree::from_items(&[
            MenuItem::new("A").with_href("/a"),
            MenuItem::new("B").with_children(vec![
                MenuItem::new("C1"),
                MenuItem::new("C2").with_children(vec![MenuItem::new("D1")]),
            ]),
        ])
        .unwrap()
    }

    #[test]
    fn test_structure() {
        let tree = sample();
        assert_eq!(tree.panel_count(), 3);
        assert_eq!(tree.entry_count(), 5);
        assert_eq!(tree.entries(tree.root()).len(), 2);

        let b = tree.find_entry("B").unwrap();
        let b_panel = tree.child_panel(b).unwrap();
        assert_eq!(tree.depth(b_panel), 2);
        assert_eq!(tree.child_count(b), 2);
        assert_eq!(tree.parent_panel(b_panel), Some(tree.root()));
        assert_eq!(tree.parent_panel(tree.root()), None);

        let c2 = tree.find_entry("C2").unwrap();
        let d_panel = tree.child_panel(c2).unwrap();
        assert_eq!(tree.depth(d_panel), 3);
        assert_eq!(tree.parent_panel(d_panel), Some(b_panel));
    }

    #[test]
    fn test_leaf_entry() {
        let tree = sample();
        let a = tree.find_entry("A").unwrap();
        assert_eq!(tree.child_panel(a), None);
        assert_eq!(tree.child_count(a), 0);
        assert_eq!(tree.entry(a).unwrap().href(), Some("/a"));
        assert_eq!(tree.entries_with_children(tree.root()), vec![tree.find_entry("B").unwrap()]);
    }

    #[test]
    fn test_context_title() {
        let tree = sample();
        let b_panel = tree.child_panel(tree.find_entry("B").unwrap()).unwrap();
        assert_eq!(tree.context_title(tree.root(), "Menu"), "Menu");
        assert_eq!(tree.context_title(b_panel, "Menu"), "B");
    }

    #[test]
    fn test_markup_titles_are_stripped() {
        let mut tree = MenuTree::new();
        let entry = tree.add_entry(tree.root(), "Shop<span class=\"badge\">new</span>", None);
        let child = tree.add_child_panel(entry);
        assert_eq!(tree.entry(entry).unwrap().plain_title(), "Shop");
        assert_eq!(tree.context_title(child, "Menu"), "Shop");
        assert_eq!(tree.add_child_panel(entry), child);
    }

    #[test]
    fn test_visible_items() {
        let tree = sample();
        let items = tree.visible_items(tree.root(), "Menu");
        assert_eq!(items.len(), 2);
        assert!(!items[0].has_children);
        assert_eq!(items[1].children_count, 2);
        assert!(!items[1].has_parent_list);
        assert_eq!(items[1].parent_title, "Menu");

        let b_panel = tree.child_panel(tree.find_entry("B").unwrap()).unwrap();
        let items = tree.visible_items(b_panel, "Menu");
        assert!(items.iter().all(|item| item.has_parent_list && item.parent_title == "B"));
    }

    #[test]
    fn test_from_json() {
        let tree = MenuTree::from_json(
            r#"[{ "title": "Home", "href": "/" }, { "title": "Docs", "children": [{ "title": "API" }] }]"#,
        )
        .unwrap();
        assert_eq!(tree.panel_count(), 2);
        assert!(matches!(MenuTree::from_json("[]"), Err(MenuError::EmptyMenu)));
        assert!(matches!(MenuTree::from_json("{"), Err(MenuError::Serialization(_))));
    }

    #[test]
    fn test_unknown_handles() {
        let tree = sample();
        assert!(matches!(tree.panel(PanelId(99)), Err(MenuError::UnknownPanel(99))));
        assert!(matches!(tree.entry(EntryId(42)), Err(MenuError::UnknownEntry(42))));
        assert!(tree.entries(PanelId(99)).is_empty());
        assert_eq!(tree.depth(PanelId(99)), 0);
    }

    #[test]
    fn test_find_entry_in_panel() {
        let tree = MenuTree::from_items(&[
            MenuItem::new("Men").with_children(vec![MenuItem::new("Sale")]),
            MenuItem::new("Women").with_children(vec![MenuItem::new("Sale")]),
        ])
        .unwrap();
        let women = tree.child_panel(tree.find_entry("Women").unwrap()).unwrap();

        let sale = tree.find_entry_in(women, "Sale").unwrap();
        assert_eq!(tree.entry(sale).unwrap().panel(), women);
        assert_ne!(Some(sale), tree.find_entry("Sale"));
        assert_eq!(tree.find_entry_in(tree.root(), "Sale"), None);
    }

    #[test]
    fn test_plain_title_decodes_entities() {
        let tree = MenuTree::from_items(&[MenuItem::new("Tops &amp; Tees")]).unwrap();
        let entry = tree.entry_ids().next().unwrap();
        assert_eq!(tree.entry(entry).unwrap().plain_title(), "Tops & Tees");
        assert_eq!(tree.find_entry("Tops & Tees"), Some(entry));
    }
}
