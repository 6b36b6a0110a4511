//! Scroll carousel bound to a root element
//!
//! The carousel resolves its parts inside the root, renders one dot per
//! slide and wires three event sources on the [`Host`]: control and dot
//! clicks, an intersection observer over the slides, and an optional
//! autoplay interval. All three share one state value behind an
//! `Rc<RefCell<_>>`; the host only ever runs one callback at a time, and
//! host calls made from inside the state (scrolling, clearing the timer)
//! never re-enter a callback.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use reel_dom::{el, Document, ElementId, Host, IntersectionEntry, ObserverId, ObserverOptions, ScrollToOptions};
use serde::Serialize;

use crate::autoplay::AutoplayLatch;
use crate::error::{CarouselError, Result};
use crate::options::{CarouselMarkup, CarouselOptions};
use crate::visibility::visible_slide;

/// Elements found inside the root at mount
#[derive(Debug, Clone)]
struct Elements {
    root: ElementId,
    scroller: ElementId,
    previous: Vec<ElementId>,
    next: Vec<ElementId>,
    pagination: Vec<ElementId>,
    dots: Option<ElementId>,
    current_text: Option<ElementId>,
    total_text: Option<ElementId>,
}

impl Elements {
    fn resolve(dom: &Document, root: ElementId, markup: &CarouselMarkup) -> Result<Self> {
        let scroller = dom.query_selector(root, &markup.scroller)?.ok_or_else(|| {
            CarouselError::MissingScroller {
                selector: markup.scroller.clone(),
            }
        })?;

        let elements = Self {
            root,
            scroller,
            previous: dom.query_selector_all(root, &markup.previous)?,
            next: dom.query_selector_all(root, &markup.next)?,
            pagination: dom.query_selector_all(root, &markup.pagination)?,
            dots: dom.query_selector(root, &markup.dots)?,
            current_text: dom.query_selector(root, &markup.current_text)?,
            total_text: dom.query_selector(root, &markup.total_text)?,
        };

        tracing::debug!(
            "carousel parts: {} previous, {} next, {} pagination, dots {}, current label {}, total label {}",
            elements.previous.len(),
            elements.next.len(),
            elements.pagination.len(),
            elements.dots.is_some(),
            elements.current_text.is_some(),
            elements.total_text.is_some(),
        );
        Ok(elements)
    }
}

#[derive(Debug)]
struct CarouselState {
    elements: Elements,
    markup: CarouselMarkup,
    options: CarouselOptions,
    /// Scroller children at mount, in slide order
    slides: Vec<ElementId>,
    /// Generated dots, `dots[i]` points at `slides[i]`
    dots: Vec<ElementId>,
    current_index: usize,
    autoplay: AutoplayLatch,
    observer: Option<ObserverId>,
}

impl CarouselState {
    fn total(&self) -> usize {
        self.slides.len()
    }

    fn current(&self) -> Option<ElementId> {
        self.slides.get(self.current_index).copied()
    }

    fn next(&mut self, host: &mut Host) {
        let total = self.total();
        if self.current_index + 1 < total {
            self.navigate(host, self.current_index + 1);
        } else if self.options.looped && total > 0 {
            self.navigate(host, 0);
        } else {
            tracing::trace!("next ignored at last slide");
        }
    }

    fn prev(&mut self, host: &mut Host) {
        let total = self.total();
        if self.current_index > 0 {
            self.navigate(host, self.current_index - 1);
        } else if self.options.looped && total > 0 {
            self.navigate(host, total - 1);
        } else {
            tracing::trace!("prev ignored at first slide");
        }
    }

    /// Scroll `slides[index]` to the leading edge and make it current right away
    fn navigate(&mut self, host: &mut Host, index: usize) {
        let Some(slide) = self.slides.get(index).copied() else {
            return;
        };

        let scroller = self.elements.scroller;
        let scrolled = self
            .scroll_target(host.dom(), slide)
            .and_then(|left| host.scroll_to(scroller, ScrollToOptions::smooth(left, 0.0)));
        if let Err(err) = scrolled {
            tracing::warn!("could not scroll to slide {}: {}", index, err);
        }

        tracing::debug!("navigate {} -> {}", self.current_index, index);
        self.current_index = index;
        self.refresh(host.dom_mut());
    }

    fn scroll_target(&self, dom: &Document, slide: ElementId) -> reel_dom::Result<f32> {
        let scroller = self.elements.scroller;
        let delta = (dom.offset_left(scroller)? - dom.offset_left(slide)?).abs();
        Ok(delta - dom.padding_left(scroller)?)
    }

    fn reconcile(&mut self, dom: &mut Document, entries: &[IntersectionEntry]) {
        let Some(index) = visible_slide(entries, &self.slides) else {
            return;
        };
        if index != self.current_index {
            tracing::debug!("visible slide {} replaces {}", index, self.current_index);
        }
        self.current_index = index;
        self.refresh(dom);
    }

    /// Clear the autoplay interval the first time only
    fn release_autoplay(&mut self, host: &mut Host) -> bool {
        match self.autoplay.release() {
            Some(timer) => {
                host.clear_timer(timer);
                tracing::info!("autoplay cancelled by user navigation");
                true
            }
            None => false,
        }
    }

    fn refresh(&self, dom: &mut Document) {
        if let Err(err) = self.try_refresh(dom) {
            tracing::warn!("carousel refresh failed: {}", err);
        }
    }

    fn try_refresh(&self, dom: &mut Document) -> reel_dom::Result<()> {
        self.update_text(dom)?;
        self.update_dots(dom)?;
        self.update_slides(dom)?;
        self.update_controls(dom)
    }

    fn update_text(&self, dom: &mut Document) -> reel_dom::Result<()> {
        if let Some(label) = self.elements.current_text {
            dom.set_text(label, (self.current_index + 1).to_string())?;
        }
        if let Some(label) = self.elements.total_text {
            dom.set_text(label, self.total().to_string())?;
        }
        Ok(())
    }

    fn update_dots(&self, dom: &mut Document) -> reel_dom::Result<()> {
        let active = &self.markup.dot_active_class;
        for (index, &dot) in self.dots.iter().enumerate() {
            dom.toggle_class(dot, active, Some(index == self.current_index))?;
        }
        Ok(())
    }

    fn update_slides(&self, dom: &mut Document) -> reel_dom::Result<()> {
        let active = &self.markup.slide_active_class;
        for (index, &slide) in self.slides.iter().enumerate() {
            dom.toggle_class(slide, active, Some(index == self.current_index))?;
        }
        Ok(())
    }

    /// Looped carousels never disable their controls
    fn update_controls(&self, dom: &mut Document) -> reel_dom::Result<()> {
        if self.options.looped {
            return Ok(());
        }

        let total = self.total();
        let at_start = total == 0 || self.current_index == 0;
        let at_end = total == 0 || self.current_index + 1 >= total;

        for &button in &self.elements.previous {
            dom.toggle_attr(button, "disabled", Some(at_start))?;
        }
        for &button in &self.elements.next {
            dom.toggle_attr(button, "disabled", Some(at_end))?;
        }
        Ok(())
    }
}

/// Observable carousel state, for logging and assertions
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CarouselSnapshot {
    pub current_index: usize,
    pub total: usize,
    pub current_label: Option<String>,
    pub total_label: Option<String>,
    /// Indices of dots carrying the active class
    pub active_dots: Vec<usize>,
    /// Indices of slides carrying the active class
    pub active_slides: Vec<usize>,
    pub previous_disabled: Vec<bool>,
    pub next_disabled: Vec<bool>,
    pub autoplay: bool,
    pub looped: bool,
    pub scroll_left: f32,
}

/// A mounted carousel
///
/// Cloning yields another handle to the same carousel.
#[derive(Clone)]
pub struct Carousel {
    state: Rc<RefCell<CarouselState>>,
}

impl std::fmt::Debug for Carousel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("Carousel")
            .field("root", &state.elements.root)
            .field("current_index", &state.current_index)
            .field("total", &state.total())
            .finish()
    }
}

impl Carousel {
    pub fn builder(root: ElementId) -> CarouselBuilder {
        CarouselBuilder::new(root)
    }

    /// Mount with the default markup and options read from the root's dataset
    pub fn mount(host: &mut Host, root: ElementId) -> Result<Self> {
        Self::builder(root).mount(host)
    }

    /// Advance one slide, wrapping when looped
    pub fn next(&self, host: &mut Host) {
        self.state.borrow_mut().next(host);
    }

    /// Retreat one slide, wrapping when looped
    pub fn prev(&self, host: &mut Host) {
        self.state.borrow_mut().prev(host);
    }

    /// Navigate to a slide; returns false for an index past the end
    pub fn go_to(&self, host: &mut Host, index: usize) -> bool {
        let mut state = self.state.borrow_mut();
        if index >= state.total() {
            tracing::warn!("slide {} out of range (total {})", index, state.total());
            return false;
        }
        state.navigate(host, index);
        true
    }

    /// Stop autoplay for good; returns false if it was not running
    pub fn cancel_autoplay(&self, host: &mut Host) -> bool {
        self.state.borrow_mut().release_autoplay(host)
    }

    pub fn current_index(&self) -> usize {
        self.state.borrow().current_index
    }

    /// The slide at [`Carousel::current_index`], `None` without slides
    pub fn current(&self) -> Option<ElementId> {
        self.state.borrow().current()
    }

    pub fn total(&self) -> usize {
        self.state.borrow().total()
    }

    pub fn is_autoplay(&self) -> bool {
        self.state.borrow().autoplay.is_active()
    }

    pub fn is_looped(&self) -> bool {
        self.state.borrow().options.looped
    }

    pub fn options(&self) -> CarouselOptions {
        self.state.borrow().options
    }

    pub fn root(&self) -> ElementId {
        self.state.borrow().elements.root
    }

    pub fn scroller(&self) -> ElementId {
        self.state.borrow().elements.scroller
    }

    pub fn slides(&self) -> Vec<ElementId> {
        self.state.borrow().slides.clone()
    }

    /// Generated dot buttons in slide order
    pub fn dots(&self) -> Vec<ElementId> {
        self.state.borrow().dots.clone()
    }

    pub fn previous_controls(&self) -> Vec<ElementId> {
        self.state.borrow().elements.previous.clone()
    }

    pub fn next_controls(&self) -> Vec<ElementId> {
        self.state.borrow().elements.next.clone()
    }

    pub fn pagination(&self) -> Vec<ElementId> {
        self.state.borrow().elements.pagination.clone()
    }

    pub fn observer(&self) -> Option<ObserverId> {
        self.state.borrow().observer
    }

    pub fn snapshot(&self, host: &Host) -> CarouselSnapshot {
        let state = self.state.borrow();
        let dom = host.dom();
        let label = |id: Option<ElementId>| id.and_then(|id| dom.text(id)).map(str::to_owned);
        let marked = |elements: &[ElementId], class_name: &str| {
            elements
                .iter()
                .enumerate()
                .filter(|&(_, &id)| dom.has_class(id, class_name))
                .map(|(index, _)| index)
                .collect::<Vec<_>>()
        };
        let disabled = |controls: &[ElementId]| {
            controls
                .iter()
                .map(|&id| dom.has_attr(id, "disabled"))
                .collect::<Vec<_>>()
        };

        CarouselSnapshot {
            current_index: state.current_index,
            total: state.total(),
            current_label: label(state.elements.current_text),
            total_label: label(state.elements.total_text),
            active_dots: marked(&state.dots, &state.markup.dot_active_class),
            active_slides: marked(&state.slides, &state.markup.slide_active_class),
            previous_disabled: disabled(&state.elements.previous),
            next_disabled: disabled(&state.elements.next),
            autoplay: state.autoplay.is_active(),
            looped: state.options.looped,
            scroll_left: dom.scroll_left(state.elements.scroller),
        }
    }

    // =========================================================================
    // Mount steps
    // =========================================================================

    /// Markup changes made at mount, kept apart from listener wiring
    fn render(&self, dom: &mut Document) -> Result<()> {
        self.render_dots(dom)?;
        self.state.borrow().try_refresh(dom)?;
        Ok(())
    }

    fn render_dots(&self, dom: &mut Document) -> Result<()> {
        let mut state = self.state.borrow_mut();
        let Some(container) = state.elements.dots else {
            return Ok(());
        };

        for index in 0..state.total() {
            let dot = el("button")
                .class(state.markup.dot_class.as_str())
                .attr("type", "button")
                .attr("aria-label", state.markup.dot_label.as_str())
                .attr("data-index", index.to_string())
                .mount(dom, container)?;
            state.dots.push(dot);
        }
        Ok(())
    }

    /// Take back the dots of a mount that failed
    fn discard_dots(&self, dom: &mut Document) {
        let dots = std::mem::take(&mut self.state.borrow_mut().dots);
        for dot in dots {
            if let Err(err) = dom.detach(dot) {
                tracing::warn!("could not remove dot {:?}: {}", dot, err);
            }
        }
    }

    fn bind_dots(&self, host: &mut Host) {
        let dots = self.state.borrow().dots.clone();
        for (index, dot) in dots.into_iter().enumerate() {
            let shared = Rc::clone(&self.state);
            host.on_click(dot, move |host, _| {
                shared.borrow_mut().navigate(host, index);
            });
        }
    }

    fn observe_slides(&self, host: &mut Host) {
        let (scroller, threshold, slides) = {
            let state = self.state.borrow();
            (
                state.elements.scroller,
                state.options.visibility_threshold,
                state.slides.clone(),
            )
        };

        let shared = Rc::clone(&self.state);
        let observer = host.create_observer(
            ObserverOptions::new(scroller, threshold),
            move |host, entries| {
                shared.borrow_mut().reconcile(host.dom_mut(), entries);
            },
        );
        for slide in slides {
            host.observe(observer, slide);
        }
        self.state.borrow_mut().observer = Some(observer);
    }

    fn bind_controls(&self, host: &mut Host) {
        let (previous, next) = {
            let state = self.state.borrow();
            (state.elements.previous.clone(), state.elements.next.clone())
        };

        for button in previous {
            let shared = Rc::clone(&self.state);
            host.on_click(button, move |host, _| {
                let mut state = shared.borrow_mut();
                state.release_autoplay(host);
                state.prev(host);
            });
        }
        for button in next {
            let shared = Rc::clone(&self.state);
            host.on_click(button, move |host, _| {
                let mut state = shared.borrow_mut();
                state.release_autoplay(host);
                state.next(host);
            });
        }
    }

    fn start_autoplay(&self, host: &mut Host) {
        let (enabled, period) = {
            let state = self.state.borrow();
            (state.options.autoplay, state.options.autoplay_interval())
        };
        if !enabled {
            return;
        }

        let shared = Rc::clone(&self.state);
        let timer = host.set_interval(period, move |host, _| {
            shared.borrow_mut().next(host);
        });
        self.state.borrow_mut().autoplay.arm(timer);
        tracing::debug!("autoplay every {:?}", period);
    }
}

/// Builder for [`Carousel`]
///
/// Flags left unset are read from the root's `data-autoplay` and
/// `data-looped` attributes at mount.
#[derive(Debug, Clone)]
pub struct CarouselBuilder {
    root: ElementId,
    markup: CarouselMarkup,
    options: Option<CarouselOptions>,
    autoplay: Option<bool>,
    looped: Option<bool>,
    autoplay_interval: Option<Duration>,
    visibility_threshold: Option<f32>,
}

impl CarouselBuilder {
    pub fn new(root: ElementId) -> Self {
        Self {
            root,
            markup: CarouselMarkup::default(),
            options: None,
            autoplay: None,
            looped: None,
            autoplay_interval: None,
            visibility_threshold: None,
        }
    }

    /// Use these options instead of reading the dataset
    pub fn options(mut self, options: CarouselOptions) -> Self {
        self.options = Some(options);
        self
    }

    pub fn markup(mut self, markup: CarouselMarkup) -> Self {
        self.markup = markup;
        self
    }

    pub fn autoplay(mut self, enabled: bool) -> Self {
        self.autoplay = Some(enabled);
        self
    }

    pub fn looped(mut self, enabled: bool) -> Self {
        self.looped = Some(enabled);
        self
    }

    pub fn autoplay_interval(mut self, period: Duration) -> Self {
        self.autoplay_interval = Some(period);
        self
    }

    pub fn visibility_threshold(mut self, threshold: f32) -> Self {
        self.visibility_threshold = Some(threshold);
        self
    }

    fn resolve_options(&self, dom: &Document) -> CarouselOptions {
        let mut options = self
            .options
            .unwrap_or_else(|| CarouselOptions::from_dataset(dom, self.root));
        if let Some(autoplay) = self.autoplay {
            options.autoplay = autoplay;
        }
        if let Some(looped) = self.looped {
            options.looped = looped;
        }
        if let Some(period) = self.autoplay_interval {
            options.autoplay_interval_ms = u64::try_from(period.as_millis()).unwrap_or(u64::MAX);
        }
        if let Some(threshold) = self.visibility_threshold {
            options.visibility_threshold = threshold;
        }
        options.sanitized()
    }

    /// Resolve the markup and wire the carousel into `host`
    ///
    /// Fails only when the scroller is missing or a query is malformed;
    /// every other part is optional.
    pub fn mount(self, host: &mut Host) -> Result<Carousel> {
        let elements = Elements::resolve(host.dom(), self.root, &self.markup)?;
        let options = self.resolve_options(host.dom());
        assemble(host, elements, self.markup, options)
    }
}

/// Render and wire a carousel over resolved parts
///
/// Listeners are added only after every markup change succeeds. A failed
/// render detaches the dots it created.
fn assemble(
    host: &mut Host,
    elements: Elements,
    markup: CarouselMarkup,
    options: CarouselOptions,
) -> Result<Carousel> {
    let slides = host.dom().children(elements.scroller).to_vec();
    let carousel = Carousel {
        state: Rc::new(RefCell::new(CarouselState {
            elements,
            markup,
            options,
            slides,
            dots: Vec::new(),
            current_index: 0,
            autoplay: AutoplayLatch::default(),
            observer: None,
        })),
    };

    if let Err(err) = carousel.render(host.dom_mut()) {
        carousel.discard_dots(host.dom_mut());
        return Err(err);
    }
    carousel.bind_dots(host);
    carousel.observe_slides(host);
    carousel.bind_controls(host);
    carousel.start_autoplay(host);
    // initial observation lands before any input
    host.flush_observers();

    tracing::info!(
        "carousel mounted with {} slides (autoplay: {}, looped: {})",
        carousel.total(),
        options.autoplay,
        options.looped
    );
    Ok(carousel)
}
