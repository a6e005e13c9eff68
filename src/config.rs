//! Menu configuration and the class names shared with host styling

use serde::{Deserialize, Serialize};

use crate::error::MenuResult;

/// Title shown in the header while the root list is visible
pub const DEFAULT_MENU_TITLE: &str = "Menu";

/// Class names the menu reads from and writes to the host markup.
///
/// Defaults match the stylesheet shipped with the menu; override them only if
/// the host page uses its own names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CssClasses {
    pub icon_back: String,
    pub icon_close: String,
    pub icon_open: String,
    pub backdrop: String,
    pub title: String,
    /// Container the header is prepended to
    pub container: String,
    pub header: String,
    pub nav: String,
    /// Sidebar root, toggled between open and closed
    pub sidebar: String,
    /// State flag on the sidebar and on the visible list
    pub show: String,
    pub children_item_counter: String,
    /// Prefix of the depth marker, completed with the level (`list-level-2`)
    pub level_prefix: String,
}

impl Default for CssClasses {
    fn default() -> Self {
        Self {
            icon_back: "icon-back".to_string(),
            icon_close: "icon-close".to_string(),
            icon_open: "icon-open-container".to_string(),
            backdrop: "off-canvas-backdrop".to_string(),
            title: "off-canvas-title".to_string(),
            container: "off-canvas".to_string(),
            header: "off-canvas-header".to_string(),
            nav: "off-canvas-nav".to_string(),
            sidebar: "off-canvas".to_string(),
            show: "show".to_string(),
            children_item_counter: "children-item-counter".to_string(),
            level_prefix: "list-level-".to_string(),
        }
    }
}

impl CssClasses {
    /// Depth marker class for a list at `level` (1-based)
    pub fn level(&self, level: u32) -> String {
        format!("{}{}", self.level_prefix, level)
    }
}

/// Options for the off-canvas menu
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MenuConfig {
    /// Close the menu when the backdrop is clicked
    pub close_on_backdrop_click: bool,
    /// Header title for the root list
    pub menu_title: String,
    /// Class names shared with the host stylesheet
    pub classes: CssClasses,
}

impl Default for MenuConfig {
    fn default() -> Self {
        Self {
            close_on_backdrop_click: true,
            menu_title: DEFAULT_MENU_TITLE.to_string(),
            classes: CssClasses::default(),
        }
    }
}

impl MenuConfig {
    /// Parse a configuration object; missing fields keep their defaults
    pub fn from_json(json: &str) -> MenuResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Enable or disable closing through the backdrop
    pub fn with_backdrop_close(mut self, enabled: bool) -> Self {
        self.close_on_backdrop_click = enabled;
        self
    }

    /// Set the root header title
    pub fn with_title(mut self, title: &str) -> Self {
        self.menu_title = title.to_string();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = MenuConfig::default();
        assert!(config.close_on_backdrop_click);
        assert_eq!(config.menu_title, "Menu");
        assert_eq!(config.classes.level(3), "list-level-3");
    }

    #[test]
    fn test_backdrop_close_can_be_disabled() {
        let config = MenuConfig::from_json(r#"{ "close_on_backdrop_click": false }"#).unwrap();
        assert!(!config.close_on_backdrop_click);
        assert_eq!(config.menu_title, DEFAULT_MENU_TITLE);

        let config = MenuConfig::default().with_backdrop_close(false);
        assert!(!config.close_on_backdrop_click);
    }

    #[test]
    fn test_partial_classes() {
        let config =
            MenuConfig::from_json(r#"{ "menu_title": "Navigation", "classes": { "show": "is-open" } }"#)
                .unwrap();
        assert_eq!(config.menu_title, "Navigation");
        assert_eq!(config.classes.show, "is-open");
        assert_eq!(config.classes.nav, "off-canvas-nav");
    }

    #[test]
    fn test_invalid_json() {
        assert!(MenuConfig::from_json("{ not json").is_err());
    }
}
