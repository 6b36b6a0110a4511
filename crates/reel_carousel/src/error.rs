//! Carousel error types

use reel_dom::DomError;
use thiserror::Error;

/// Errors raised while mounting a carousel
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CarouselError {
    /// The root has no element matching the scroller selector
    #[error("Carousel root has no scroller matching '{selector}'")]
    MissingScroller { selector: String },

    /// A document operation failed
    #[error("Document error: {0}")]
    Dom(#[from] DomError),
}

/// Result type for carousel operations
pub type Result<T> = std::result::Result<T, CarouselError>;
