//! Off-Canvas Menu - a drill-down navigation menu for the browser
//!
//! The menu overlays the page with one list of links at a time. Choosing an
//! entry that has a nested list slides that list in; the back control slides
//! the parent back. The close control, a backdrop click or Escape closes it.
//!
//! The crate is split into a host-independent core and two surfaces:
//! - [`tree`] and [`hierarchy`]: the navigation tree, classified once from
//!   nested `ul`/`li` markup or built from JSON
//! - [`machine`]: the open/closed state machine and the [`MenuSurface`]
//!   seam through which it applies its side effects
//! - [`surface`]: a surface over the in-memory [`markup`] document
//! - `wasm` (feature `wasm`): a surface over the browser DOM, exported with
//!   `wasm-bindgen`
//!
//! ## Example
//! ```rust
//! use offcanvas_menu::prelude::*;
//!
//! let page = r#"
//!   <div class="icon-open-container"></div>
//!   <div class="off-canvas">
//!     <nav class="off-canvas-nav"><ul>
//!       <li><a href="/">Home</a></li>
//!       <li><a href="/shop">Shop</a><ul><li><a href="/shop/shoes">Shoes</a></li></ul></li>
//!     </ul></nav>
//!   </div>"#;
//!
//! let mut menu = MarkupMenu::from_markup(page, MenuConfig::default()).unwrap();
//! menu.dispatch(MenuEvent::Open);
//! menu.click_entry("Shop");
//! assert_eq!(menu.machine().title(), "Shop");
//!
//! menu.dispatch(MenuEvent::Back);
//! assert_eq!(menu.machine().title(), "Menu");
//! ```

pub mod bindings;
pub mod config;
pub mod error;
pub mod header;
pub mod hierarchy;
pub mod machine;
pub mod markup;
pub mod render;
pub mod surface;
pub mod tree;

pub use machine::MenuSurface;

// Re-export common types
pub mod prelude {
    pub use crate::bindings::{Binding, BindingRegistry};
    pub use crate::config::{CssClasses, MenuConfig};
    pub use crate::error::{MenuError, MenuResult};
    pub use crate::hierarchy::{classify, decorate, Classified};
    pub use crate::machine::{MenuEvent, MenuMachine, MenuState, MenuSurface};
    pub use crate::markup::{strip_tags, Markup, NodeId};
    pub use crate::surface::{MarkupMenu, MarkupSurface};
    pub use crate::tree::{EntryId, MenuItem, MenuTree, PanelId, VisibleItem};
}

#[cfg(feature = "wasm")]
pub mod wasm;
