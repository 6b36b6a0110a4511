//! Document error types

use thiserror::Error;

use crate::tree::ElementId;

/// Errors raised by document and host operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomError {
    /// The element id does not refer to a live element
    #[error("Unknown element: {0:?}")]
    UnknownElement(ElementId),

    /// Appending would make an element its own ancestor
    #[error("Hierarchy error: {child:?} cannot be appended to {parent:?}")]
    Hierarchy { parent: ElementId, child: ElementId },

    /// Selector text could not be parsed
    #[error("Invalid selector '{selector}' at offset {position}")]
    InvalidSelector { selector: String, position: usize },

    /// The layout engine rejected an operation
    #[error("Layout failed: {0}")]
    Layout(String),
}

impl From<taffy::TaffyError> for DomError {
    fn from(err: taffy::TaffyError) -> Self {
        DomError::Layout(err.to_string())
    }
}

/// Result type for document operations
pub type Result<T> = std::result::Result<T, DomError>;
