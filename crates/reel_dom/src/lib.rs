//! Reel headless document
//!
//! A small, single-threaded document model for driving UI components
//! without a browser. It provides the pieces a scroll-driven widget needs:
//!
//! - [`Document`] - element tree with attributes, classes, text and box styles
//! - Selector queries (`query_selector`, `query_selector_all`, `matches`)
//! - Layout geometry computed with Taffy (`offset_left`, `client_rect`, ...)
//! - Scroll offsets with spring-animated smooth scrolling
//! - [`Host`] - the event loop owning listeners, intersection observers and
//!   timers on a virtual clock
//!
//! # Example
//!
//! ```ignore
//! use reel_dom::prelude::*;
//!
//! let mut host = Host::new();
//! let body = host.dom().body();
//! let button = el("button").text("next").mount(host.dom_mut(), body)?;
//!
//! host.on_click(button, |host, event| {
//!     tracing::info!("clicked {:?} at {:?}", event.target, host.now());
//! });
//! host.click(button);
//! ```

mod builder;
mod error;
mod events;
mod host;
mod layout;
mod observer;
mod scroll;
mod selector;
mod spring;
mod timer;
mod tree;

pub use builder::{el, ElementBuilder};
pub use error::{DomError, Result};
pub use events::{Event, EventType, ListenerCallback, ListenerId};
pub use host::{Host, FRAME};
pub use layout::ElementBounds;
pub use observer::{IntersectionEntry, ObserverCallback, ObserverId, ObserverOptions};
pub use scroll::{ScrollBehavior, ScrollToOptions};
pub use selector::{Combinator, ComplexSelector, CompoundSelector, SelectorList, SimpleSelector};
pub use spring::{Spring, SpringConfig};
pub use timer::{TimerCallback, TimerId};
pub use tree::{Document, ElementId};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::builder::{el, ElementBuilder};
    pub use crate::error::{DomError, Result};
    pub use crate::events::{Event, EventType, ListenerId};
    pub use crate::host::Host;
    pub use crate::layout::ElementBounds;
    pub use crate::observer::{IntersectionEntry, ObserverId, ObserverOptions};
    pub use crate::scroll::{ScrollBehavior, ScrollToOptions};
    pub use crate::timer::TimerId;
    pub use crate::tree::{Document, ElementId};
}
