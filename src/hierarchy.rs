//! List hierarchy classifier
//!
//! Walks nested `ul`/`li` markup once, turning it into a [`MenuTree`] and
//! remembering the node behind every panel and entry. The walk is generic over
//! [`ListSource`] so the same rules apply to the in-memory [`Markup`] arena and
//! to the browser DOM.

use log::{debug, info, warn};

use crate::config::CssClasses;
use crate::error::{MenuError, MenuResult};
use crate::markup::{Markup, NodeId};
use crate::tree::{EntryId, MenuTree, PanelId};

/// Expand indicator inserted after the label of every entry with children
pub const NEXT_LEVEL_INDICATOR: &str = "<a href='#'></a>";

/// Read access to a tree of list elements
pub trait ListSource {
    type Handle: Clone;

    /// Lowercase tag name
    fn tag_name(&self, node: &Self::Handle) -> String;

    /// Element children in document order
    fn element_children(&self, node: &Self::Handle) -> Vec<Self::Handle>;

    fn inner_html(&self, node: &Self::Handle) -> String;

    fn attribute(&self, node: &Self::Handle, name: &str) -> Option<String>;
}

/// Write access used for the one-time markup decoration
pub trait Decorate: ListSource {
    fn add_class(&mut self, node: &Self::Handle, class: &str);

    /// Insert [`NEXT_LEVEL_INDICATOR`] right after `node`
    fn insert_indicator_after(&mut self, node: &Self::Handle) -> MenuResult<Option<Self::Handle>>;

    /// Append a `<span class="{class}">{count}</span>` badge to `node`
    fn append_counter(&mut self, node: &Self::Handle, class: &str, count: usize) -> MenuResult<()>;
}

/// Nodes behind one entry
#[derive(Debug, Clone)]
pub struct EntryNodes<H> {
    /// The `li` element
    pub item: H,
    /// First element child, carrying the display label
    pub label: Option<H>,
    /// Expand indicator, present after decoration for entries with children
    pub indicator: Option<H>,
}

/// A classified list hierarchy: the tree plus the node behind each handle
#[derive(Debug, Clone)]
pub struct Classified<H> {
    pub tree: MenuTree,
    panels: Vec<H>,
    entries: Vec<EntryNodes<H>>,
    decorated: bool,
}

impl<H> Classified<H> {
    pub fn panel_node(&self, panel: PanelId) -> Option<&H> {
        self.panels.get(panel.index())
    }

    pub fn entry_nodes(&self, entry: EntryId) -> Option<&EntryNodes<H>> {
        self.entries.get(entry.index())
    }

    /// Panel nodes indexed by `PanelId`
    pub fn panel_nodes(&self) -> &[H] {
        &self.panels
    }

    pub fn is_decorated(&self) -> bool {
        self.decorated
    }

    /// Split into the tree and the panel and entry nodes, indexed by handle
    pub fn into_parts(self) -> (MenuTree, Vec<H>, Vec<EntryNodes<H>>) {
        (self.tree, self.panels, self.entries)
    }
}

/// Classify the list rooted at `root`.
///
/// Direct `li` children of a list are its entries; the first direct `ul`
/// child of an entry is its nested panel. Depth starts at 1 for `root`.
pub fn classify<S: ListSource>(source: &S, root: &S::Handle) -> MenuResult<Classified<S::Handle>> {
    if source.tag_name(root) != "ul" {
        return Err(MenuError::MissingElement("ul".to_string()));
    }

    let mut classified = Classified {
        tree: MenuTree::new(),
        panels: vec![root.clone()],
        entries: Vec::new(),
        decorated: false,
    };
    visit(source, root, PanelId::ROOT, &mut classified);

    if classified.tree.entries(PanelId::ROOT).is_empty() {
        return Err(MenuError::EmptyMenu);
    }
    debug!(
        "classified {} panels and {} entries",
        classified.tree.panel_count(),
        classified.tree.entry_count()
    );
    Ok(classified)
}

fn visit<S: ListSource>(
    source: &S,
    list: &S::Handle,
    panel: PanelId,
    classified: &mut Classified<S::Handle>,
) {
    for item in source.element_children(list) {
        if source.tag_name(&item) != "li" {
            continue;
        }

        let children = source.element_children(&item);
        let nested = children
            .iter()
            .find(|child| source.tag_name(child) == "ul")
            .cloned();
        let label = children
            .iter()
            .find(|child| source.tag_name(child) != "ul")
            .cloned();

        let title = match &label {
            Some(label) => source.inner_html(label),
            None => {
                warn!("list item without a label element in panel #{}", panel.index());
                String::new()
            }
        };
        let href = label
            .as_ref()
            .and_then(|label| source.attribute(label, "href"));

        let entry = classified.tree.add_entry(panel, &title, href.as_deref());
        classified.entries.push(EntryNodes {
            item,
            label,
            indicator: None,
        });

        if let Some(nested) = nested {
            let child = classified.tree.add_child_panel(entry);
            debug_assert_eq!(child.index(), classified.panels.len());
            classified.panels.push(nested.clone());
            visit(source, &nested, child, classified);
        }
    }
}

/// Apply the one-time markup decoration: depth class on every panel, expand
/// indicator and child counter on every entry with children.
pub fn decorate<D: Decorate>(
    doc: &mut D,
    classified: &mut Classified<D::Handle>,
    classes: &CssClasses,
) -> MenuResult<()> {
    if classified.decorated {
        debug!("markup already decorated");
        return Ok(());
    }

    for panel in classified.tree.panel_ids() {
        let class = classes.level(classified.tree.depth(panel));
        doc.add_class(&classified.panels[panel.index()], &class);
    }

    let mut counters = 0;
    for entry in classified.tree.entry_ids() {
        if classified.tree.child_panel(entry).is_none() {
            continue;
        }
        let Some(label) = classified.entries[entry.index()].label.clone() else {
            warn!("entry #{} has children but no label to decorate", entry.index());
            continue;
        };
        let indicator = doc.insert_indicator_after(&label)?;
        doc.append_counter(
            &label,
            &classes.children_item_counter,
            classified.tree.child_count(entry),
        )?;
        classified.entries[entry.index()].indicator = indicator;
        counters += 1;
    }

    classified.decorated = true;
    info!(
        "menu markup prepared: {} panels, {} expandable entries",
        classified.tree.panel_count(),
        counters
    );
    Ok(())
}

/// Root list of the menu: the first `ul` inside the nav element, falling back
/// to the first `ul` of the document
pub fn find_root_list(markup: &Markup, classes: &CssClasses) -> Option<NodeId> {
    let nav = markup.find_first_by_class(&classes.nav, None);
    if nav.is_none() {
        warn!("no .{} element, using the first list of the document", classes.nav);
    }
    markup.find_first_by_tag("ul", nav)
}

impl ListSource for Markup {
    type Handle = NodeId;

    fn tag_name(&self, node: &NodeId) -> String {
        self.tag(*node).unwrap_or_default().to_string()
    }

    fn element_children(&self, node: &NodeId) -> Vec<NodeId> {
        Markup::element_children(self, *node)
    }

    fn inner_html(&self, node: &NodeId) -> String {
        Markup::inner_html(self, *node)
    }

    fn attribute(&self, node: &NodeId, name: &str) -> Option<String> {
        self.attr(*node, name).map(String::from)
    }
}

impl Decorate for Markup {
    fn add_class(&mut self, node: &NodeId, class: &str) {
        Markup::add_class(self, *node, class);
    }

    fn insert_indicator_after(&mut self, node: &NodeId) -> MenuResult<Option<NodeId>> {
        let inserted = self.insert_html_after(*node, NEXT_LEVEL_INDICATOR)?;
        Ok(inserted.into_iter().find(|id| self.is_element(*id)))
    }

    fn append_counter(&mut self, node: &NodeId, class: &str, count: usize) -> MenuResult<()> {
        let counter = self.create_element("span");
        Markup::add_class(self, counter, class);
        let text = self.create_text(&count.to_string());
        self.append_child(counter, text);
        self.append_child(*node, counter);
        Ok(())
    }
}
