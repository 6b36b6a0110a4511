//! Cooperative host loop
//!
//! [`Host`] owns a [`Document`] together with everything that can call back
//! into user code: event listeners, intersection observers and timers. It
//! also drives smooth scroll animations. All work runs on the caller's
//! thread and every entry point runs to completion before returning.
//!
//! Only [`Host::click`], [`Host::advance`], [`Host::settle`],
//! [`Host::scroll_user`] and [`Host::flush_observers`] invoke callbacks.
//! Everything else (scrolling, timer and listener management) only records
//! the request, so callbacks may call it freely.
//!
//! ```ignore
//! let mut host = Host::new();
//! host.set_interval(Duration::from_secs(4), |host, _| { /* ... */ });
//! host.advance(Duration::from_secs(12)); // fires three times
//! ```

use std::rc::Rc;
use std::time::Duration;

use crate::error::Result;
use crate::events::{Event, EventType, ListenerId, ListenerMap};
use crate::observer::{IntersectionEntry, ObserverId, ObserverOptions, ObserverSet};
use crate::scroll::{ScrollAnimations, ScrollBehavior, ScrollToOptions};
use crate::spring::SpringConfig;
use crate::timer::{TimerId, TimerQueue};
use crate::tree::{Document, ElementId};

/// Length of one animation frame
pub const FRAME: Duration = Duration::from_millis(16);

/// Upper bound on virtual time spent in [`Host::settle`]
const SETTLE_LIMIT: Duration = Duration::from_secs(30);

/// Shortest allowed interval period
const MIN_PERIOD: Duration = Duration::from_millis(1);

/// Owner of a document and its event sources
#[derive(Debug)]
pub struct Host {
    dom: Document,
    listeners: ListenerMap,
    observers: ObserverSet,
    timers: TimerQueue,
    scrolls: ScrollAnimations,
    now: Duration,
}

impl Default for Host {
    fn default() -> Self {
        Self::new()
    }
}

impl Host {
    pub fn new() -> Self {
        Self::with_document(Document::new())
    }

    pub fn with_document(dom: Document) -> Self {
        Self {
            dom,
            listeners: ListenerMap::default(),
            observers: ObserverSet::default(),
            timers: TimerQueue::default(),
            scrolls: ScrollAnimations::new(SpringConfig::scroll()),
            now: Duration::ZERO,
        }
    }

    /// Use a different spring for smooth scrolling
    pub fn with_scroll_spring(mut self, config: SpringConfig) -> Self {
        self.scrolls = ScrollAnimations::new(config);
        self
    }

    pub fn dom(&self) -> &Document {
        &self.dom
    }

    pub fn dom_mut(&mut self) -> &mut Document {
        &mut self.dom
    }

    /// Current virtual time
    pub fn now(&self) -> Duration {
        self.now
    }

    // =========================================================================
    // Listeners
    // =========================================================================

    pub fn add_listener<F>(&mut self, element: ElementId, kind: EventType, callback: F) -> ListenerId
    where
        F: Fn(&mut Host, &Event) + 'static,
    {
        self.listeners.add(element, kind, Rc::new(callback))
    }

    /// Register a click listener
    pub fn on_click<F>(&mut self, element: ElementId, callback: F) -> ListenerId
    where
        F: Fn(&mut Host, &Event) + 'static,
    {
        self.add_listener(element, EventType::Click, callback)
    }

    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(id)
    }

    pub fn listener_count(&self, element: ElementId, kind: EventType) -> usize {
        self.listeners.count(element, kind)
    }

    // =========================================================================
    // Observers
    // =========================================================================

    pub fn create_observer<F>(&mut self, options: ObserverOptions, callback: F) -> ObserverId
    where
        F: Fn(&mut Host, &[IntersectionEntry]) + 'static,
    {
        self.observers.create(options, Rc::new(callback))
    }

    pub fn observe(&mut self, observer: ObserverId, target: ElementId) -> bool {
        self.observers.observe(observer, target)
    }

    pub fn unobserve(&mut self, observer: ObserverId, target: ElementId) -> bool {
        self.observers.unobserve(observer, target)
    }

    pub fn disconnect(&mut self, observer: ObserverId) -> bool {
        self.observers.disconnect(observer)
    }

    pub fn observed_count(&self, observer: ObserverId) -> usize {
        self.observers.target_count(observer)
    }

    /// Deliver pending intersection batches
    pub fn flush_observers(&mut self) {
        let batches = self.observers.evaluate(&self.dom);
        for (callback, entries) in batches {
            tracing::trace!("delivering {} intersection entries", entries.len());
            callback(self, &entries);
        }
    }

    // =========================================================================
    // Timers
    // =========================================================================

    /// Call `callback` every `period`, first after one period
    pub fn set_interval<F>(&mut self, period: Duration, callback: F) -> TimerId
    where
        F: Fn(&mut Host, TimerId) + 'static,
    {
        let period = period.max(MIN_PERIOD);
        let id = self
            .timers
            .schedule(self.now, period, Some(period), Rc::new(callback));
        tracing::debug!("interval {:?} every {:?}", id, period);
        id
    }

    /// Call `callback` once after `delay`
    pub fn set_timeout<F>(&mut self, delay: Duration, callback: F) -> TimerId
    where
        F: Fn(&mut Host, TimerId) + 'static,
    {
        self.timers.schedule(self.now, delay, None, Rc::new(callback))
    }

    /// Cancel a timer; returns false when it already fired or was cleared
    pub fn clear_timer(&mut self, id: TimerId) -> bool {
        let cleared = self.timers.clear(id);
        if cleared {
            tracing::debug!("cleared timer {:?}", id);
        }
        cleared
    }

    pub fn is_timer_active(&self, id: TimerId) -> bool {
        self.timers.is_active(id)
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    // =========================================================================
    // Scrolling
    // =========================================================================

    /// Scroll an element, instantly or with a spring animation
    ///
    /// A smooth request on an element that is already animating retargets
    /// the running animation, so the most recent request wins.
    pub fn scroll_to(&mut self, element: ElementId, options: ScrollToOptions) -> Result<()> {
        let current = self.dom.scroll_offset(element);
        let (max_x, max_y) = self.dom.max_scroll(element)?;
        let target = (
            options.left.unwrap_or(current.0).clamp(0.0, max_x),
            options.top.unwrap_or(current.1).clamp(0.0, max_y),
        );

        match options.behavior {
            ScrollBehavior::Auto => {
                self.scrolls.cancel(element);
                self.dom.set_scroll_offset(element, target.0, target.1)?;
            }
            ScrollBehavior::Smooth => {
                if target == current && !self.scrolls.is_animating(element) {
                    return Ok(());
                }
                tracing::trace!("smooth scroll {:?} to {:?}", element, target);
                self.scrolls.animate_to(element, current, target);
            }
        }
        Ok(())
    }

    /// Whether a smooth scroll is running on `element`
    pub fn is_scrolling(&self, element: ElementId) -> bool {
        self.scrolls.is_animating(element)
    }

    /// Simulate a user swipe: jump to `left` and report visibility changes
    pub fn scroll_user(&mut self, element: ElementId, left: f32) -> Result<(f32, f32)> {
        self.scrolls.cancel(element);
        let top = self.dom.scroll_top(element);
        let applied = self.dom.set_scroll_offset(element, left, top)?;
        self.flush_observers();
        Ok(applied)
    }

    fn step_scrolls(&mut self, dt: f32) {
        if self.scrolls.is_empty() {
            return;
        }
        for (element, (x, y)) in self.scrolls.step(dt) {
            if let Err(err) = self.dom.set_scroll_offset(element, x, y) {
                tracing::warn!("dropping scroll animation on {:?}: {}", element, err);
                self.scrolls.cancel(element);
            }
        }
    }

    // =========================================================================
    // Dispatch
    // =========================================================================

    /// Click an element, bubbling through its ancestors
    ///
    /// Returns false when the element does not exist or is a disabled button.
    pub fn click(&mut self, element: ElementId) -> bool {
        if !self.dom.exists(element) {
            return false;
        }
        if self.dom.tag_name(element) == Some("button") && self.dom.has_attr(element, "disabled")
        {
            tracing::trace!("click on disabled {:?} ignored", element);
            return false;
        }

        self.dispatch(element, EventType::Click);
        self.flush_observers();
        true
    }

    fn dispatch(&mut self, target: ElementId, kind: EventType) {
        let mut path = vec![target];
        path.extend(self.dom.ancestors(target));

        for current_target in path {
            let event = Event {
                kind,
                target,
                current_target,
            };
            for (id, callback) in self.listeners.snapshot(current_target, kind) {
                // removed by an earlier listener in this dispatch
                if !self.listeners.contains(id) {
                    continue;
                }
                callback(self, &event);
            }
        }
    }

    // =========================================================================
    // Time
    // =========================================================================

    /// Run the loop for `duration` of virtual time
    ///
    /// Each frame fires due timers in deadline order, steps smooth scrolls,
    /// then delivers intersection batches.
    pub fn advance(&mut self, duration: Duration) {
        let end = self.now + duration;

        loop {
            let frame_start = self.now;
            let frame_end = (frame_start + FRAME).min(end);

            while let Some((id, deadline)) = self.timers.next_due(frame_end) {
                self.now = deadline.max(self.now);
                if let Some(callback) = self.timers.fire(id) {
                    callback(self, id);
                }
            }

            self.now = frame_end;
            self.step_scrolls((frame_end - frame_start).as_secs_f32());
            self.flush_observers();

            if self.now >= end {
                break;
            }
        }
    }

    /// Advance frame by frame until no smooth scroll is running
    pub fn settle(&mut self) {
        let limit = self.now + SETTLE_LIMIT;
        while !self.scrolls.is_empty() {
            if self.now >= limit {
                tracing::warn!("scroll animations still running after {:?}", SETTLE_LIMIT);
                break;
            }
            self.advance(FRAME);
        }
    }
}
