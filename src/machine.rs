//! Off-canvas menu state machine
//!
//! The machine owns the navigation tree and the open/closed lifecycle. It
//! never touches markup directly: every side effect of a transition goes
//! through a [`MenuSurface`], which the browser and the native preview
//! implement in their own way.

use log::{debug, warn};

use crate::bindings::Binding;
use crate::config::MenuConfig;
use crate::error::{MenuError, MenuResult};
use crate::tree::{EntryId, MenuTree, PanelId, VisibleItem};

/// Key that closes an open menu
pub const CLOSE_KEY: &str = "Escape";

/// Lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuState {
    Closed,
    /// Open, showing exactly one panel
    Open { visible: PanelId },
}

/// User input the machine reacts to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuEvent {
    Open,
    EntryClicked(EntryId),
    Back,
    Close,
    BackdropClicked,
    KeyDown(String),
}

/// Side effects of menu transitions
pub trait MenuSurface {
    fn lock_body_scroll(&mut self);
    fn unlock_body_scroll(&mut self);

    fn show_sidebar(&mut self);
    fn hide_sidebar(&mut self);

    /// Replace any existing header with a fresh one titled `title`
    fn insert_header(&mut self, title: &str);

    /// Rendered header height in pixels, 0 without a header
    fn header_height(&self) -> f64;

    fn set_title(&mut self, title: &str);
    fn set_back_visible(&mut self, visible: bool);

    fn set_panel_visible(&mut self, panel: PanelId, visible: bool);

    /// Top offset applied to every panel
    fn set_panel_offset(&mut self, top: f64);

    fn create_backdrop(&mut self);
    fn remove_backdrop(&mut self);

    /// Attach the handler for `binding`; `false` when its target is absent
    fn bind(&mut self, binding: Binding) -> bool;
    fn unbind(&mut self, binding: Binding);
}

/// State owned by one open-to-close session
#[derive(Debug, Default)]
struct Session {
    bindings: Vec<Binding>,
}

/// The menu's state machine
#[derive(Debug)]
pub struct MenuMachine {
    tree: MenuTree,
    config: MenuConfig,
    state: MenuState,
    session: Option<Session>,
    bound_entries: Vec<EntryId>,
    title: String,
    back_visible: bool,
    panel_offset: f64,
}

impl MenuMachine {
    pub fn new(tree: MenuTree, config: MenuConfig) -> Self {
        let title = config.menu_title.clone();
        Self {
            tree,
            config,
            state: MenuState::Closed,
            session: None,
            bound_entries: Vec::new(),
            title,
            back_visible: false,
            panel_offset: 0.0,
        }
    }

    /// Wire the open trigger. Must run once before any interaction.
    pub fn init<S: MenuSurface + ?Sized>(&mut self, surface: &mut S) -> MenuResult<()> {
        if !surface.bind(Binding::Open) {
            return Err(MenuError::MissingElement(self.config.classes.icon_open.clone()));
        }
        for panel in self.tree.panel_ids() {
            surface.set_panel_visible(panel, false);
        }
        debug!("menu initialised with {} panels", self.tree.panel_count());
        Ok(())
    }

    // ========================
    // Queries
    // ========================

    pub fn state(&self) -> MenuState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, MenuState::Open { .. })
    }

    pub fn visible_panel(&self) -> Option<PanelId> {
        match self.state {
            MenuState::Open { visible } => Some(visible),
            MenuState::Closed => None,
        }
    }

    /// Current header title
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn back_visible(&self) -> bool {
        self.back_visible
    }

    /// Top offset last applied to the panels
    pub fn panel_offset(&self) -> f64 {
        self.panel_offset
    }

    pub fn tree(&self) -> &MenuTree {
        &self.tree
    }

    pub fn config(&self) -> &MenuConfig {
        &self.config
    }

    /// Entries whose click handlers are live
    pub fn bound_entries(&self) -> &[EntryId] {
        &self.bound_entries
    }

    /// Snapshot of the visible panel's entries, empty while closed
    pub fn visible_items(&self) -> Vec<VisibleItem> {
        self.visible_panel()
            .map(|panel| self.tree.visible_items(panel, &self.config.menu_title))
            .unwrap_or_default()
    }

    // ========================
    // Transitions
    // ========================

    /// Apply `event`; returns whether it caused a transition
    pub fn handle<S: MenuSurface + ?Sized>(&mut self, event: MenuEvent, surface: &mut S) -> bool {
        match event {
            MenuEvent::Open => self.open(surface),
            MenuEvent::EntryClicked(entry) => self.drill_down(entry, surface),
            MenuEvent::Back => self.back(surface),
            MenuEvent::Close => self.close(surface),
            MenuEvent::BackdropClicked => {
                if self.config.close_on_backdrop_click {
                    self.close(surface)
                } else {
                    debug!("backdrop click ignored, backdrop close disabled");
                    false
                }
            }
            MenuEvent::KeyDown(key) if key == CLOSE_KEY => self.close(surface),
            MenuEvent::KeyDown(_) => false,
        }
    }

    fn open<S: MenuSurface + ?Sized>(&mut self, surface: &mut S) -> bool {
        if self.is_open() {
            debug!("open ignored, menu already open");
            return false;
        }

        surface.lock_body_scroll();
        surface.show_sidebar();

        self.title = self.config.menu_title.clone();
        surface.insert_header(&self.title);
        self.apply_offset(surface);
        surface.create_backdrop();

        let root = self.tree.root();
        self.show_only(root, surface);
        self.state = MenuState::Open { visible: root };
        self.sync_back_control(surface);

        let mut session = Session::default();
        let mut wanted = vec![Binding::Close];
        if self.config.close_on_backdrop_click {
            wanted.push(Binding::Backdrop);
        }
        wanted.extend([Binding::Back, Binding::Keyboard]);
        for binding in wanted {
            if surface.bind(binding) {
                session.bindings.push(binding);
            } else {
                warn!("no target for {:?}, handler skipped", binding);
            }
        }
        self.session = Some(session);
        self.rebind_entries(root, surface);

        debug!("menu opened");
        true
    }

    fn drill_down<S: MenuSurface + ?Sized>(&mut self, entry: EntryId, surface: &mut S) -> bool {
        let MenuState::Open { visible } = self.state else {
            debug!("entry click ignored, menu closed");
            return false;
        };
        let Ok(clicked) = self.tree.entry(entry) else {
            warn!("click on unknown entry #{}", entry.index());
            return false;
        };
        if clicked.panel() != visible {
            debug!("entry #{} is not in the visible panel", entry.index());
            return false;
        }
        let Some(child) = clicked.child() else {
            return false;
        };

        surface.set_panel_visible(child, true);
        surface.set_panel_visible(visible, false);
        self.state = MenuState::Open { visible: child };
        self.update_title(surface);
        self.rebind_entries(child, surface);
        self.sync_back_control(surface);
        self.apply_offset(surface);

        debug!(
            "drilled into panel #{} (depth {})",
            child.index(),
            self.tree.depth(child)
        );
        true
    }

    fn back<S: MenuSurface + ?Sized>(&mut self, surface: &mut S) -> bool {
        let MenuState::Open { visible } = self.state else {
            return false;
        };
        let Some(parent) = self.tree.parent_panel(visible) else {
            debug!("back ignored, root panel visible");
            return false;
        };

        surface.set_panel_visible(visible, false);
        surface.set_panel_visible(parent, true);
        self.state = MenuState::Open { visible: parent };
        self.update_title(surface);
        self.sync_back_control(surface);
        self.rebind_entries(parent, surface);

        debug!("back to panel #{}", parent.index());
        true
    }

    fn close<S: MenuSurface + ?Sized>(&mut self, surface: &mut S) -> bool {
        if !self.is_open() {
            return false;
        }

        surface.unlock_body_scroll();
        surface.hide_sidebar();
        surface.remove_backdrop();

        if let Some(session) = self.session.take() {
            for binding in session.bindings {
                surface.unbind(binding);
            }
        }
        for entry in std::mem::take(&mut self.bound_entries) {
            surface.unbind(Binding::Entry(entry));
        }
        for panel in self.tree.panel_ids() {
            surface.set_panel_visible(panel, false);
        }

        self.state = MenuState::Closed;
        self.title = self.config.menu_title.clone();
        self.back_visible = false;

        debug!("menu closed");
        true
    }

    // ========================
    // Helpers
    // ========================

    fn show_only<S: MenuSurface + ?Sized>(&self, panel: PanelId, surface: &mut S) {
        for other in self.tree.panel_ids() {
            surface.set_panel_visible(other, false);
        }
        surface.set_panel_visible(panel, true);
    }

    fn update_title<S: MenuSurface + ?Sized>(&mut self, surface: &mut S) {
        let Some(visible) = self.visible_panel() else {
            return;
        };
        self.title = self
            .tree
            .context_title(visible, &self.config.menu_title)
            .to_string();
        surface.set_title(&self.title);
    }

    fn sync_back_control<S: MenuSurface + ?Sized>(&mut self, surface: &mut S) {
        self.back_visible = self
            .visible_panel()
            .and_then(|panel| self.tree.parent_panel(panel))
            .is_some();
        surface.set_back_visible(self.back_visible);
    }

    /// Release the handlers of the previous panel's entries, then bind the
    /// entries of `panel` that lead somewhere
    fn rebind_entries<S: MenuSurface + ?Sized>(&mut self, panel: PanelId, surface: &mut S) {
        for entry in std::mem::take(&mut self.bound_entries) {
            surface.unbind(Binding::Entry(entry));
        }
        for entry in self.tree.entries_with_children(panel) {
            if surface.bind(Binding::Entry(entry)) {
                self.bound_entries.push(entry);
            }
        }
    }

    fn apply_offset<S: MenuSurface + ?Sized>(&mut self, surface: &mut S) {
        self.panel_offset = surface.header_height();
        surface.set_panel_offset(self.panel_offset);
    }
}
