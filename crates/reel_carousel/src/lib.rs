//! Reel Carousel
//!
//! A scroll carousel over a [`reel_dom::Host`]. The carousel binds to an
//! existing root element, finds its scroller and controls by selector,
//! generates pagination dots and keeps the current slide in sync with
//! clicks, user scrolling and an optional autoplay timer.
//!
//! # Markup
//!
//! ```text
//! div.carousel[data-autoplay][data-looped]
//!   ul.carousel__container        required, slides are its children
//!   div.pagination
//!     button.pagination-button_back
//!     div.pagination__dots        dots are generated here
//!     span.pagination__current
//!     span.pagination__total
//!     button.pagination-button_forward
//! ```
//!
//! # Example
//!
//! ```ignore
//! use reel_carousel::prelude::*;
//!
//! let carousel = Carousel::builder(root).looped(true).mount(&mut host)?;
//! carousel.next(&mut host);
//! host.settle();
//! assert_eq!(carousel.current_index(), 1);
//! ```

mod autoplay;
mod carousel;
mod error;
mod options;
mod visibility;

#[cfg(test)]
mod tests;

pub use carousel::{Carousel, CarouselBuilder, CarouselSnapshot};
pub use error::{CarouselError, Result};
pub use options::{is_truthy, CarouselMarkup, CarouselOptions};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::carousel::{Carousel, CarouselBuilder, CarouselSnapshot};
    pub use crate::error::{CarouselError, Result};
    pub use crate::options::{CarouselMarkup, CarouselOptions};
    pub use reel_dom::prelude::*;
}
