//! Scroll offsets and smooth scrolling

use rustc_hash::FxHashMap;

use crate::error::Result;
use crate::spring::{Spring, SpringConfig};
use crate::tree::{Document, ElementId};

/// Scroll animation behavior
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScrollBehavior {
    /// Instant scroll (no animation)
    #[default]
    Auto,
    /// Smooth animated scroll
    Smooth,
}

/// Target of a `scroll_to` request; `None` keeps the current offset on that axis
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollToOptions {
    pub left: Option<f32>,
    pub top: Option<f32>,
    pub behavior: ScrollBehavior,
}

impl ScrollToOptions {
    pub fn smooth(left: f32, top: f32) -> Self {
        Self {
            left: Some(left),
            top: Some(top),
            behavior: ScrollBehavior::Smooth,
        }
    }

    pub fn instant(left: f32, top: f32) -> Self {
        Self {
            left: Some(left),
            top: Some(top),
            behavior: ScrollBehavior::Auto,
        }
    }
}

impl Document {
    /// Current scroll offset (x, y)
    pub fn scroll_offset(&self, id: ElementId) -> (f32, f32) {
        self.scroll_offsets.get(id).copied().unwrap_or_default()
    }

    pub fn scroll_left(&self, id: ElementId) -> f32 {
        self.scroll_offset(id).0
    }

    pub fn scroll_top(&self, id: ElementId) -> f32 {
        self.scroll_offset(id).1
    }

    /// Maximum scroll offset (x, y)
    pub fn max_scroll(&self, id: ElementId) -> Result<(f32, f32)> {
        let bounds = self.bounds(id)?;
        Ok((
            (self.scroll_width(id)? - bounds.width).max(0.0),
            (self.scroll_height(id)? - bounds.height).max(0.0),
        ))
    }

    /// Set the scroll offset, clamped to the scrollable range
    ///
    /// Returns the offset actually applied.
    pub fn set_scroll_offset(&mut self, id: ElementId, x: f32, y: f32) -> Result<(f32, f32)> {
        let (max_x, max_y) = self.max_scroll(id)?;
        let clamped = (x.clamp(0.0, max_x), y.clamp(0.0, max_y));
        self.scroll_offsets.insert(id, clamped);
        Ok(clamped)
    }
}

/// In-flight smooth scrolls, one per scroll container
#[derive(Debug, Default)]
pub(crate) struct ScrollAnimations {
    active: FxHashMap<ElementId, (Spring, Spring)>,
    config: SpringConfig,
}

impl ScrollAnimations {
    pub(crate) fn new(config: SpringConfig) -> Self {
        Self {
            active: FxHashMap::default(),
            config,
        }
    }

    /// Start or retarget the animation for `id`
    pub(crate) fn animate_to(&mut self, id: ElementId, from: (f32, f32), to: (f32, f32)) {
        let config = self.config;
        let (spring_x, spring_y) = self.active.entry(id).or_insert_with(|| {
            (Spring::new(config, from.0), Spring::new(config, from.1))
        });
        spring_x.set_target(to.0);
        spring_y.set_target(to.1);
    }

    pub(crate) fn cancel(&mut self, id: ElementId) -> bool {
        self.active.remove(&id).is_some()
    }

    pub(crate) fn is_animating(&self, id: ElementId) -> bool {
        self.active.contains_key(&id)
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    /// Step every animation, returning new offsets and dropping settled ones
    pub(crate) fn step(&mut self, dt: f32) -> Vec<(ElementId, (f32, f32))> {
        let mut frames = Vec::with_capacity(self.active.len());

        self.active.retain(|&id, (spring_x, spring_y)| {
            spring_x.step(dt);
            spring_y.step(dt);
            frames.push((id, (spring_x.value(), spring_y.value())));
            !(spring_x.is_settled() && spring_y.is_settled())
        });

        frames
    }
}
