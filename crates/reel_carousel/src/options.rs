//! Carousel configuration and markup contract

use std::time::Duration;

use reel_dom::{Document, ElementId};
use serde::{Deserialize, Serialize};

/// Behavior flags resolved once when a carousel mounts
///
/// Missing fields take their defaults when deserialized, so a host can
/// load a partial table:
///
/// ```ignore
/// let options: CarouselOptions = toml::from_str("looped = true")?;
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CarouselOptions {
    /// Advance to the next slide on a timer until the user navigates
    pub autoplay: bool,
    /// Wrap from the last slide to the first and back
    pub looped: bool,
    /// Autoplay period in milliseconds
    pub autoplay_interval_ms: u64,
    /// Visible ratio at which a slide becomes current
    pub visibility_threshold: f32,
}

impl Default for CarouselOptions {
    fn default() -> Self {
        Self {
            autoplay: false,
            looped: false,
            autoplay_interval_ms: 4000,
            visibility_threshold: 0.6,
        }
    }
}

impl CarouselOptions {
    /// Read `data-autoplay` and `data-looped` from the root element
    pub fn from_dataset(doc: &Document, root: ElementId) -> Self {
        Self {
            autoplay: is_truthy(doc.dataset(root, "autoplay")),
            looped: is_truthy(doc.dataset(root, "looped")),
            ..Self::default()
        }
    }

    pub fn autoplay_interval(&self) -> Duration {
        Duration::from_millis(self.autoplay_interval_ms)
    }

    /// Replace a NaN or infinite threshold with the default
    pub fn sanitized(mut self) -> Self {
        if !self.visibility_threshold.is_finite() {
            let fallback = Self::default().visibility_threshold;
            tracing::warn!(
                "visibility threshold {} is not a number, using {}",
                self.visibility_threshold,
                fallback
            );
            self.visibility_threshold = fallback;
        }
        self
    }
}

/// Interpret a flag attribute
///
/// Absent is false. A present attribute is true unless its value is one of
/// `false`, `0`, `off` or `no` (any case).
pub fn is_truthy(value: Option<&str>) -> bool {
    match value {
        None => false,
        Some(value) => {
            let value = value.trim();
            !["false", "0", "off", "no"]
                .iter()
                .any(|falsy| value.eq_ignore_ascii_case(falsy))
        }
    }
}

/// Selectors and class names the carousel expects in its markup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CarouselMarkup {
    pub scroller: String,
    pub previous: String,
    pub next: String,
    pub pagination: String,
    pub dots: String,
    pub current_text: String,
    pub total_text: String,
    /// Class given to every generated dot
    pub dot_class: String,
    pub dot_active_class: String,
    pub slide_active_class: String,
    /// `aria-label` of generated dots
    pub dot_label: String,
}

impl Default for CarouselMarkup {
    fn default() -> Self {
        Self {
            scroller: ".carousel__container".into(),
            previous: ".pagination-button_back".into(),
            next: ".pagination-button_forward".into(),
            pagination: ".pagination".into(),
            dots: ".pagination__dots".into(),
            current_text: ".pagination__current".into(),
            total_text: ".pagination__total".into(),
            dot_class: "pagination__dot".into(),
            dot_active_class: "pagination__dot_active".into(),
            slide_active_class: "carousel__item_active".into(),
            dot_label: "navigate to slide".into(),
        }
    }
}
