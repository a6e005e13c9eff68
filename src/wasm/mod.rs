//! WASM bindings for the off-canvas menu
//!
//! ## Usage
//!
//! ```javascript,ignore
//! import init, { OffCanvasMenu } from './offcanvas_menu.js';
//!
//! await init();
//! const menu = new OffCanvasMenu({ close_on_backdrop_click: false });
//! menu.init();
//! ```

mod dom;
mod logger;
mod surface;

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use log::{debug, warn, LevelFilter};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlElement};

use crate::config::MenuConfig;
use crate::error::{MenuError, MenuResult};
use crate::hierarchy::{classify, decorate};
use crate::machine::{MenuEvent, MenuMachine};

pub use dom::{
    document, find_all_by_tag, find_first_by_class, find_first_by_tag, parse_fragment, strip_tags,
    BrowserDocument,
};
use dom::js_error;
use surface::{DomSurface, HostElements};

// Use wee_alloc for smaller WASM binary
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

/// Initialize panic hook and console logging
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    logger::init(LevelFilter::Info);
}

/// Change the console log level (`"off"`, `"error"`, ... `"trace"`)
#[wasm_bindgen(js_name = setLogLevel)]
pub fn set_log_level(level: &str) -> Result<(), JsValue> {
    let level: LevelFilter = level
        .parse()
        .map_err(|_| JsValue::from_str(&format!("unknown log level '{level}'")))?;
    logger::init(level);
    Ok(())
}

/// Get version information
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Machine and surface shared with the DOM listeners
pub(crate) struct MenuInner {
    machine: RefCell<MenuMachine>,
    surface: RefCell<DomSurface>,
}

impl MenuInner {
    fn dispatch(&self, event: MenuEvent) -> bool {
        let (Ok(mut machine), Ok(mut surface)) =
            (self.machine.try_borrow_mut(), self.surface.try_borrow_mut())
        else {
            warn!("nested menu event {:?} dropped", event);
            return false;
        };
        surface.release_retired();
        machine.handle(event, &mut *surface)
    }
}

pub(crate) fn dispatch(menu: &Weak<MenuInner>, event: MenuEvent) {
    if let Some(menu) = menu.upgrade() {
        menu.dispatch(event);
    }
}

fn to_js(error: MenuError) -> JsValue {
    JsValue::from_str(&error.to_string())
}

fn html_element(element: Element) -> MenuResult<HtmlElement> {
    element.dyn_into::<HtmlElement>().map_err(|e| js_error(e.into()))
}

fn required(element: Option<HtmlElement>, class: &str) -> MenuResult<HtmlElement> {
    element.ok_or_else(|| MenuError::MissingElement(class.to_string()))
}

/// The off-canvas menu, attached to the host page's markup
#[wasm_bindgen]
pub struct OffCanvasMenu {
    config: MenuConfig,
    inner: Option<Rc<MenuInner>>,
}

#[wasm_bindgen]
impl OffCanvasMenu {
    /// Create a menu; `config` may be omitted to use the defaults
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<OffCanvasMenu, JsValue> {
        let config = if config.is_undefined() || config.is_null() {
            MenuConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)?
        };
        Ok(Self {
            config,
            inner: None,
        })
    }

    /// Prepare the list markup and wire the open trigger. Call once, after the
    /// menu markup is in the page.
    pub fn init(&mut self) -> Result<(), JsValue> {
        if self.inner.is_some() {
            debug!("menu already initialised");
            return Ok(());
        }
        let inner = self.attach().map_err(to_js)?;
        self.inner = Some(inner);
        Ok(())
    }

    /// Open the menu as if the trigger was clicked
    pub fn open(&self) -> bool {
        self.dispatch(MenuEvent::Open)
    }

    /// Close the menu as if the close control was clicked
    pub fn close(&self) -> bool {
        self.dispatch(MenuEvent::Close)
    }

    /// Go back one level
    pub fn back(&self) -> bool {
        self.dispatch(MenuEvent::Back)
    }

    #[wasm_bindgen(getter, js_name = isOpen)]
    pub fn is_open(&self) -> bool {
        self.inner
            .as_ref()
            .is_some_and(|inner| inner.machine.borrow().is_open())
    }

    /// Current header title
    #[wasm_bindgen(getter)]
    pub fn title(&self) -> String {
        match &self.inner {
            Some(inner) => inner.machine.borrow().title().to_string(),
            None => self.config.menu_title.clone(),
        }
    }

    /// Depth of the visible panel, 0 while closed
    #[wasm_bindgen(getter, js_name = visibleDepth)]
    pub fn visible_depth(&self) -> u32 {
        self.inner.as_ref().map_or(0, |inner| {
            let machine = inner.machine.borrow();
            machine
                .visible_panel()
                .map_or(0, |panel| machine.tree().depth(panel))
        })
    }

    /// Entries of the visible panel as plain objects
    #[wasm_bindgen(js_name = visibleItems)]
    pub fn visible_items(&self) -> Result<JsValue, JsValue> {
        let items = self
            .inner
            .as_ref()
            .map(|inner| inner.machine.borrow().visible_items())
            .unwrap_or_default();
        Ok(serde_wasm_bindgen::to_value(&items)?)
    }
}

impl OffCanvasMenu {
    fn attach(&self) -> MenuResult<Rc<MenuInner>> {
        let document = document().ok_or_else(|| MenuError::MissingElement("document".into()))?;
        let classes = &self.config.classes;

        let body = document
            .body()
            .ok_or_else(|| MenuError::MissingElement("body".into()))?;
        let icon_open = required(
            find_first_by_class(&document, &classes.icon_open, None),
            &classes.icon_open,
        )?;
        let sidebar = required(
            find_first_by_class(&document, &classes.sidebar, None),
            &classes.sidebar,
        )?;
        let container = find_first_by_class(&document, &classes.container, None);

        let nav = find_first_by_class(&document, &classes.nav, None);
        let root = find_first_by_tag(&document, "ul", nav.as_deref())
            .ok_or_else(|| MenuError::MissingElement("ul".into()))?;

        let mut source = BrowserDocument::new(document.clone());
        let root: Element = root.into();
        let mut classified = classify(&source, &root)?;
        decorate(&mut source, &mut classified, classes)?;
        let (tree, panels, entries) = classified.into_parts();
        let panels = panels
            .into_iter()
            .map(html_element)
            .collect::<MenuResult<Vec<_>>>()?;

        let elements = HostElements {
            body,
            sidebar,
            container,
            icon_open,
            panels,
            entries,
        };
        let config = self.config.clone();
        let inner = Rc::new_cyclic(|menu: &Weak<MenuInner>| MenuInner {
            machine: RefCell::new(MenuMachine::new(tree, config.clone())),
            surface: RefCell::new(DomSurface::new(
                document,
                config.classes.clone(),
                elements,
                menu.clone(),
            )),
        });

        inner
            .machine
            .borrow_mut()
            .init(&mut *inner.surface.borrow_mut())?;
        Ok(inner)
    }

    fn dispatch(&self, event: MenuEvent) -> bool {
        self.inner
            .as_ref()
            .is_some_and(|inner| inner.dispatch(event))
    }
}
