//! Typed views over resolved settings
//!
//! The resolver works on untyped fields and lists; these views give
//! rendering code checked, strongly typed access to the portal schema.

mod hub;
mod theme;

pub use hub::HubLayout;
pub use theme::{DisplayMode, ThemeSettings};

/// Errors building a typed view
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ViewError {
    #[error("missing setting: {0}")]
    Missing(&'static str),

    #[error("setting {field} has an unexpected value: {value}")]
    InvalidValue { field: &'static str, value: String },
}
