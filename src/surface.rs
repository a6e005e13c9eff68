//! Native surface over the in-memory markup
//!
//! Applies transitions to a [`Markup`] document the same way the browser
//! surface applies them to the DOM: class flags on the sidebar and panels,
//! inline styles, a header fragment and a backdrop element. Handlers are
//! simulated by a [`BindingRegistry`] holding the target node of each listener.

use log::{debug, warn};

use crate::bindings::{Binding, BindingRegistry};
use crate::config::{CssClasses, MenuConfig};
use crate::error::{MenuError, MenuResult};
use crate::header::render_header;
use crate::hierarchy::{classify, decorate, find_root_list, EntryNodes};
use crate::machine::{MenuEvent, MenuMachine, MenuSurface};
use crate::markup::{Markup, NodeId};
use crate::render::render_document;
use crate::tree::{MenuItem, MenuTree, PanelId};

/// Header height used when nothing is laid out
pub const DEFAULT_HEADER_HEIGHT: f64 = 56.0;

/// [`MenuSurface`] backed by a [`Markup`] document
#[derive(Debug)]
pub struct MarkupSurface {
    markup: Markup,
    classes: CssClasses,
    body: NodeId,
    sidebar: Option<NodeId>,
    container: Option<NodeId>,
    icon_open: Option<NodeId>,
    panels: Vec<NodeId>,
    entries: Vec<EntryNodes<NodeId>>,
    /// Attached header
    header: Option<NodeId>,
    /// Attached backdrop
    backdrop: Option<NodeId>,
    /// Header and backdrop elements, built on first use and reattached on
    /// every later open
    header_node: Option<NodeId>,
    backdrop_node: Option<NodeId>,
    header_height: f64,
    listeners: BindingRegistry<NodeId>,
}

impl MarkupSurface {
    /// Resolve the host elements once; `panels` and `entries` are indexed by
    /// `PanelId` and `EntryId`
    pub fn new(
        markup: Markup,
        classes: CssClasses,
        panels: Vec<NodeId>,
        entries: Vec<EntryNodes<NodeId>>,
    ) -> Self {
        let body = markup
            .find_first_by_tag("body", None)
            .unwrap_or_else(|| markup.root());
        let sidebar = markup.find_first_by_class(&classes.sidebar, None);
        let container = markup.find_first_by_class(&classes.container, None);
        let icon_open = markup.find_first_by_class(&classes.icon_open, None);
        if sidebar.is_none() {
            warn!("no .{} element, the menu cannot be shown", classes.sidebar);
        }

        Self {
            markup,
            classes,
            body,
            sidebar,
            container,
            icon_open,
            panels,
            entries,
            header: None,
            backdrop: None,
            header_node: None,
            backdrop_node: None,
            header_height: DEFAULT_HEADER_HEIGHT,
            listeners: BindingRegistry::new(),
        }
    }

    /// Height reported for the header, standing in for layout
    pub fn with_header_height(mut self, height: f64) -> Self {
        self.header_height = height;
        self
    }

    pub fn markup(&self) -> &Markup {
        &self.markup
    }

    pub fn listeners(&self) -> &BindingRegistry<NodeId> {
        &self.listeners
    }

    pub fn panel_node(&self, panel: PanelId) -> Option<NodeId> {
        self.panels.get(panel.index()).copied()
    }

    pub fn is_panel_visible(&self, panel: PanelId) -> bool {
        self.panel_node(panel)
            .is_some_and(|node| self.markup.has_class(node, &self.classes.show))
    }

    /// Number of panels carrying the visibility flag
    pub fn visible_panel_count(&self) -> usize {
        self.panels
            .iter()
            .filter(|node| self.markup.has_class(**node, &self.classes.show))
            .count()
    }

    pub fn is_sidebar_open(&self) -> bool {
        self.sidebar
            .is_some_and(|node| self.markup.has_class(node, &self.classes.show))
    }

    pub fn is_scroll_locked(&self) -> bool {
        self.markup.style(self.body, "overflow").as_deref() == Some("hidden")
    }

    pub fn has_backdrop(&self) -> bool {
        self.markup
            .find_first_by_class(&self.classes.backdrop, None)
            .is_some()
    }

    /// Title text currently rendered in the header
    pub fn title_text(&self) -> Option<String> {
        let header = self.header?;
        let title = self.markup.find_first_by_class(&self.classes.title, Some(header))?;
        Some(self.markup.text(title))
    }

    /// Whether the back control is rendered visible
    pub fn is_back_visible(&self) -> bool {
        self.control(&self.classes.icon_back)
            .and_then(|node| self.markup.style(node, "visibility"))
            .as_deref()
            == Some("visible")
    }

    fn control(&self, class: &str) -> Option<NodeId> {
        self.markup.find_first_by_class(class, self.header)
    }

    fn target(&self, binding: Binding) -> Option<NodeId> {
        match binding {
            Binding::Open => self.icon_open,
            Binding::Entry(entry) => self
                .entries
                .get(entry.index())
                .and_then(|nodes| nodes.indicator.or(nodes.label)),
            Binding::Back => self.control(&self.classes.icon_back),
            Binding::Close => self.control(&self.classes.icon_close),
            Binding::Backdrop => self.backdrop,
            Binding::Keyboard => Some(self.markup.root()),
        }
    }
}

impl MenuSurface for MarkupSurface {
    fn lock_body_scroll(&mut self) {
        self.markup.set_style(self.body, "overflow", "hidden");
    }

    fn unlock_body_scroll(&mut self) {
        self.markup.set_style(self.body, "overflow", "");
    }

    fn show_sidebar(&mut self) {
        if let Some(sidebar) = self.sidebar {
            self.markup.add_class(sidebar, &self.classes.show);
            self.markup.set_style(sidebar, "visibility", "visible");
        }
    }

    fn hide_sidebar(&mut self) {
        if let Some(sidebar) = self.sidebar {
            self.markup.remove_class(sidebar, &self.classes.show);
        }
    }

    fn insert_header(&mut self, title: &str) {
        while let Some(existing) = self.markup.find_first_by_class(&self.classes.header, None) {
            self.markup.remove(existing);
        }
        self.header = None;

        let Some(container) = self.container else {
            warn!("no .{} container, header not inserted", self.classes.container);
            return;
        };
        let header = match self.header_node {
            Some(header) => header,
            None => match self
                .markup
                .parse_fragment(&render_header(&self.classes, title))
            {
                Ok(Some(header)) => header,
                Ok(None) => {
                    warn!("header template produced no element");
                    return;
                }
                Err(e) => {
                    warn!("header template rejected: {}", e);
                    return;
                }
            },
        };
        self.header_node = Some(header);
        self.markup.prepend_child(container, header);
        self.header = Some(header);
        self.set_title(title);
    }

    fn header_height(&self) -> f64 {
        if self.header.is_some() {
            self.header_height
        } else {
            0.0
        }
    }

    fn set_title(&mut self, title: &str) {
        let Some(header) = self.header else {
            return;
        };
        if let Some(node) = self.markup.find_first_by_class(&self.classes.title, Some(header)) {
            self.markup.set_text(node, title);
        }
    }

    fn set_back_visible(&mut self, visible: bool) {
        if let Some(back) = self.control(&self.classes.icon_back) {
            let value = if visible { "visible" } else { "hidden" };
            self.markup.set_style(back, "visibility", value);
        }
    }

    fn set_panel_visible(&mut self, panel: PanelId, visible: bool) {
        let Some(node) = self.panel_node(panel) else {
            return;
        };
        if visible {
            self.markup.add_class(node, &self.classes.show);
        } else {
            self.markup.remove_class(node, &self.classes.show);
        }
    }

    fn set_panel_offset(&mut self, top: f64) {
        let value = format!("{top}px");
        for node in self.panels.clone() {
            self.markup.set_style(node, "top", &value);
        }
    }

    fn create_backdrop(&mut self) {
        let backdrop = match self.backdrop_node {
            Some(backdrop) => backdrop,
            None => {
                let backdrop = self.markup.create_element("div");
                self.markup.set_class_name(backdrop, &self.classes.backdrop);
                self.backdrop_node = Some(backdrop);
                backdrop
            }
        };
        self.markup.append_child(self.body, backdrop);
        self.backdrop = Some(backdrop);
    }

    fn remove_backdrop(&mut self) {
        if let Some(backdrop) = self.backdrop.take() {
            self.markup.remove(backdrop);
        }
    }

    fn bind(&mut self, binding: Binding) -> bool {
        let Some(target) = self.target(binding) else {
            return false;
        };
        if self.listeners.bind(binding, target).is_some() {
            debug!("replaced stale listener for {:?}", binding);
        }
        true
    }

    fn unbind(&mut self, binding: Binding) {
        self.listeners.unbind(binding);
    }
}

/// A menu driven against in-memory markup
#[derive(Debug)]
pub struct MarkupMenu {
    machine: MenuMachine,
    surface: MarkupSurface,
}

impl MarkupMenu {
    /// Parse a host page, prepare its list markup and wire the open trigger
    pub fn from_markup(html: &str, config: MenuConfig) -> MenuResult<Self> {
        let mut markup = Markup::parse(html)?;
        let root = find_root_list(&markup, &config.classes)
            .ok_or_else(|| MenuError::MissingElement("ul".to_string()))?;

        let mut classified = classify(&markup, &root)?;
        decorate(&mut markup, &mut classified, &config.classes)?;
        let (tree, panels, entries) = classified.into_parts();

        let surface = MarkupSurface::new(markup, config.classes.clone(), panels, entries);
        Self::assemble(tree, surface, config)
    }

    /// Render a page for declarative items, then set it up like host markup
    pub fn from_items(items: &[MenuItem], config: MenuConfig) -> MenuResult<Self> {
        let tree = MenuTree::from_items(items)?;
        Self::from_markup(&render_document(&tree, &config.classes), config)
    }

    fn assemble(tree: MenuTree, mut surface: MarkupSurface, config: MenuConfig) -> MenuResult<Self> {
        let mut machine = MenuMachine::new(tree, config);
        machine.init(&mut surface)?;
        Ok(Self { machine, surface })
    }

    /// Override the simulated header height
    pub fn with_header_height(mut self, height: f64) -> Self {
        self.surface = self.surface.with_header_height(height);
        self
    }

    pub fn dispatch(&mut self, event: MenuEvent) -> bool {
        self.machine.handle(event, &mut self.surface)
    }

    /// Click the expand control of the entry labelled `title`, looked up in
    /// the visible panel first and then in document order.
    ///
    /// Only entries with a live listener react, as in the browser.
    pub fn click_entry(&mut self, title: &str) -> bool {
        let tree = self.machine.tree();
        let entry = self
            .machine
            .visible_panel()
            .and_then(|panel| tree.find_entry_in(panel, title))
            .or_else(|| tree.find_entry(title));
        let Some(entry) = entry else {
            return false;
        };
        if !self.surface.listeners().is_bound(Binding::Entry(entry)) {
            return false;
        }
        self.dispatch(MenuEvent::EntryClicked(entry))
    }

    /// Click the backdrop, if one is present and listened to
    pub fn click_backdrop(&mut self) -> bool {
        if !self.surface.listeners().is_bound(Binding::Backdrop) {
            return false;
        }
        self.dispatch(MenuEvent::BackdropClicked)
    }

    pub fn machine(&self) -> &MenuMachine {
        &self.machine
    }

    pub fn surface(&self) -> &MarkupSurface {
        &self.surface
    }

    pub fn to_html(&self) -> String {
        self.surface.markup().to_html()
    }
}
