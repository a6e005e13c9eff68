//! Error types for the off-canvas menu

use thiserror::Error;

/// Main error type for menu setup
#[derive(Error, Debug)]
pub enum MenuError {
    #[error("Required element '{0}' not found in host markup")]
    MissingElement(String),

    #[error("Root list has no entries")]
    EmptyMenu,

    #[error("Markup parse error: {0}")]
    MarkupParse(String),

    #[error("Entry #{0} is not part of this menu")]
    UnknownEntry(usize),

    #[error("Panel #{0} is not part of this menu")]
    UnknownPanel(usize),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Browser call failed: {0}")]
    Js(String),
}

/// Result type for menu operations
pub type MenuResult<T> = Result<T, MenuError>;
