//! Browser surface
//!
//! Applies transitions to the live DOM. Every listener is a `Closure` kept in
//! a [`BindingRegistry`]; a closure removed from the DOM is parked in
//! `retired` and dropped at the start of the next event, because the closure
//! being unbound may be the one currently running.

use std::rc::Weak;

use log::{debug, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Event, EventTarget, HtmlElement, KeyboardEvent};

use crate::bindings::{Binding, BindingRegistry};
use crate::config::CssClasses;
use crate::header::render_header;
use crate::hierarchy::EntryNodes;
use crate::machine::{MenuEvent, MenuSurface};
use crate::tree::PanelId;

use super::dom::{find_first_by_class, parse_fragment};
use super::MenuInner;

struct Listener {
    target: EventTarget,
    event: &'static str,
    closure: Closure<dyn FnMut(Event)>,
}

impl Listener {
    fn detach(&self) {
        if let Err(e) = self
            .target
            .remove_event_listener_with_callback(self.event, self.closure.as_ref().unchecked_ref())
        {
            warn!("could not remove {} listener: {:?}", self.event, e);
        }
    }
}

/// Host elements resolved once at init
pub(crate) struct HostElements {
    pub body: HtmlElement,
    pub sidebar: HtmlElement,
    pub container: Option<HtmlElement>,
    pub icon_open: HtmlElement,
    pub panels: Vec<HtmlElement>,
    pub entries: Vec<EntryNodes<Element>>,
}

pub(crate) struct DomSurface {
    document: Document,
    classes: CssClasses,
    elements: HostElements,
    header: Option<HtmlElement>,
    backdrop: Option<HtmlElement>,
    listeners: BindingRegistry<Listener>,
    retired: Vec<Listener>,
    menu: Weak<MenuInner>,
}

impl DomSurface {
    pub(crate) fn new(
        document: Document,
        classes: CssClasses,
        elements: HostElements,
        menu: Weak<MenuInner>,
    ) -> Self {
        Self {
            document,
            classes,
            elements,
            header: None,
            backdrop: None,
            listeners: BindingRegistry::new(),
            retired: Vec::new(),
            menu,
        }
    }

    /// Drop closures unbound during earlier events
    pub(crate) fn release_retired(&mut self) {
        self.retired.clear();
    }

    fn control(&self, class: &str) -> Option<HtmlElement> {
        find_first_by_class(&self.document, class, self.header.as_deref())
    }

    fn target(&self, binding: Binding) -> Option<EventTarget> {
        match binding {
            Binding::Open => Some(self.elements.icon_open.clone().into()),
            Binding::Entry(entry) => self
                .elements
                .entries
                .get(entry.index())
                .and_then(|nodes| nodes.indicator.clone().or_else(|| nodes.label.clone()))
                .map(Into::into),
            Binding::Back => self.control(&self.classes.icon_back).map(Into::into),
            Binding::Close => self.control(&self.classes.icon_close).map(Into::into),
            Binding::Backdrop => self.backdrop.clone().map(Into::into),
            Binding::Keyboard => Some(self.document.clone().into()),
        }
    }

    fn retire(&mut self, listener: Listener) {
        listener.detach();
        self.retired.push(listener);
    }

    fn toggle_class(element: &HtmlElement, class: &str, on: bool) {
        let classes = element.class_list();
        let result = if on {
            classes.add_1(class)
        } else {
            classes.remove_1(class)
        };
        if let Err(e) = result {
            warn!("could not toggle {}: {:?}", class, e);
        }
    }

    fn set_style(element: &HtmlElement, property: &str, value: &str) {
        if let Err(e) = element.style().set_property(property, value) {
            warn!("could not set {}: {:?}", property, e);
        }
    }
}

fn to_menu_event(binding: Binding, event: &Event) -> Option<MenuEvent> {
    Some(match binding {
        Binding::Open => MenuEvent::Open,
        Binding::Entry(entry) => {
            event.prevent_default();
            MenuEvent::EntryClicked(entry)
        }
        Binding::Back => MenuEvent::Back,
        Binding::Close => MenuEvent::Close,
        Binding::Backdrop => MenuEvent::BackdropClicked,
        Binding::Keyboard => MenuEvent::KeyDown(event.dyn_ref::<KeyboardEvent>()?.key()),
    })
}

impl MenuSurface for DomSurface {
    fn lock_body_scroll(&mut self) {
        Self::set_style(&self.elements.body, "overflow", "hidden");
    }

    fn unlock_body_scroll(&mut self) {
        Self::set_style(&self.elements.body, "overflow", "");
    }

    fn show_sidebar(&mut self) {
        let sidebar = &self.elements.sidebar;
        Self::toggle_class(sidebar, &self.classes.show, true);
        Self::set_style(sidebar, "visibility", "visible");
    }

    fn hide_sidebar(&mut self) {
        Self::toggle_class(&self.elements.sidebar, &self.classes.show, false);
    }

    fn insert_header(&mut self, title: &str) {
        while let Some(existing) = find_first_by_class(&self.document, &self.classes.header, None) {
            existing.remove();
        }
        let header = self.header.take();

        let Some(container) = &self.elements.container else {
            warn!("no .{} container, header not inserted", self.classes.container);
            return;
        };
        let header = header.or_else(|| {
            parse_fragment(&self.document, &render_header(&self.classes, title))
        });
        let Some(header) = header else {
            warn!("header template produced no element");
            return;
        };
        match container.prepend_with_node_1(&header) {
            Ok(()) => {
                self.header = Some(header);
                self.set_title(title);
            }
            Err(e) => warn!("could not insert header: {:?}", e),
        }
    }

    fn header_height(&self) -> f64 {
        self.header
            .as_ref()
            .map_or(0.0, |header| header.get_bounding_client_rect().height())
    }

    fn set_title(&mut self, title: &str) {
        if let Some(node) = self.control(&self.classes.title) {
            node.set_inner_text(title);
        }
    }

    fn set_back_visible(&mut self, visible: bool) {
        if let Some(back) = self.control(&self.classes.icon_back) {
            Self::set_style(&back, "visibility", if visible { "visible" } else { "hidden" });
        }
    }

    fn set_panel_visible(&mut self, panel: PanelId, visible: bool) {
        let Some(node) = self.elements.panels.get(panel.index()) else {
            return;
        };
        Self::toggle_class(node, &self.classes.show, visible);
    }

    fn set_panel_offset(&mut self, top: f64) {
        let value = format!("{top}px");
        for panel in &self.elements.panels {
            Self::set_style(panel, "top", &value);
        }
    }

    fn create_backdrop(&mut self) {
        let backdrop = match self.document.create_element("div") {
            Ok(element) => element,
            Err(e) => {
                warn!("could not create backdrop: {:?}", e);
                return;
            }
        };
        backdrop.set_class_name(&self.classes.backdrop);
        if let Err(e) = self.elements.body.append_child(&backdrop) {
            warn!("could not attach backdrop: {:?}", e);
            return;
        }
        self.backdrop = backdrop.dyn_into::<HtmlElement>().ok();
    }

    fn remove_backdrop(&mut self) {
        if let Some(backdrop) = self.backdrop.take() {
            backdrop.remove();
        }
    }

    fn bind(&mut self, binding: Binding) -> bool {
        let Some(target) = self.target(binding) else {
            return false;
        };
        let event = match binding {
            Binding::Keyboard => "keydown",
            _ => "click",
        };

        let menu = self.menu.clone();
        let closure = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
            if let Some(menu_event) = to_menu_event(binding, &event) {
                super::dispatch(&menu, menu_event);
            }
        });
        if let Err(e) =
            target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
        {
            warn!("could not listen for {:?}: {:?}", binding, e);
            return false;
        }

        let listener = Listener {
            target,
            event,
            closure,
        };
        if let Some(stale) = self.listeners.bind(binding, listener) {
            debug!("replaced stale listener for {:?}", binding);
            self.retire(stale);
        }
        true
    }

    fn unbind(&mut self, binding: Binding) {
        if let Some(listener) = self.listeners.unbind(binding) {
            self.retire(listener);
        }
    }
}

impl Drop for DomSurface {
    fn drop(&mut self) {
        for (_, listener) in self.listeners.drain() {
            listener.detach();
        }
    }
}
