//! Carousel scenarios driven through a real host
//!
//! Slides are 300px wide inside a 300px scroller, so slide `k` sits at
//! scroll offset `k * 300` unless a test builds its own geometry.

use std::time::Duration;

use crate::prelude::*;

const SLIDE_WIDTH: f32 = 300.0;

fn slides(count: usize) -> impl Iterator<Item = ElementBuilder> {
    (0..count).map(|i| {
        el("li")
            .class("carousel__item")
            .w(SLIDE_WIDTH)
            .h(200.0)
            .flex_shrink_0()
            .text(format!("slide {i}"))
    })
}

fn scroller(count: usize) -> ElementBuilder {
    el("ul")
        .class("carousel__container")
        .flex_row()
        .w(SLIDE_WIDTH)
        .h(200.0)
        .overflow_x_scroll()
        .children(slides(count))
}

fn pagination() -> ElementBuilder {
    el("div")
        .class("pagination")
        .child(el("button").class("pagination-button_back"))
        .child(el("div").class("pagination__dots"))
        .child(el("span").class("pagination__current"))
        .child(el("span").class("pagination__total"))
        .child(el("button").class("pagination-button_forward"))
}

/// Full markup with `count` slides and the given `data-*` flags on the root
fn markup(host: &mut Host, count: usize, flags: &[(&str, &str)]) -> ElementId {
    let mut root = el("div").class("carousel").flex_col();
    for (name, value) in flags {
        root = root.data(name, *value);
    }
    let body = host.dom().body();
    root.child(scroller(count))
        .child(pagination())
        .mount(host.dom_mut(), body)
        .unwrap()
}

fn mounted(count: usize, flags: &[(&str, &str)]) -> (Host, Carousel) {
    let mut host = Host::new();
    let root = markup(&mut host, count, flags);
    let carousel = Carousel::mount(&mut host, root).unwrap();
    (host, carousel)
}

fn click_next(host: &mut Host, carousel: &Carousel) -> bool {
    let button = carousel.next_controls()[0];
    host.click(button)
}

fn click_prev(host: &mut Host, carousel: &Carousel) -> bool {
    let button = carousel.previous_controls()[0];
    host.click(button)
}

fn assert_showing(host: &Host, carousel: &Carousel, index: usize) {
    let snapshot = carousel.snapshot(host);
    assert_eq!(snapshot.current_index, index);
    assert_eq!(snapshot.active_dots, vec![index]);
    assert_eq!(snapshot.active_slides, vec![index]);
    assert_eq!(snapshot.current_label.as_deref(), Some((index + 1).to_string().as_str()));
    assert_eq!(snapshot.total_label, Some(snapshot.total.to_string()));
    assert_eq!(carousel.current(), Some(carousel.slides()[index]));
}

// =========================================================================
// Mount
// =========================================================================

#[test]
fn test_initial_state() {
    let (host, carousel) = mounted(5, &[]);

    assert_eq!(carousel.total(), 5);
    assert_showing(&host, &carousel, 0);

    let snapshot = carousel.snapshot(&host);
    assert_eq!(snapshot.previous_disabled, vec![true]);
    assert_eq!(snapshot.next_disabled, vec![false]);
    assert_eq!(snapshot.current_label.as_deref(), Some("1"));
    assert_eq!(snapshot.total_label.as_deref(), Some("5"));
    assert!(!snapshot.autoplay);
    assert!(!snapshot.looped);
}

#[test]
fn test_dots_rendered_per_slide() {
    let (host, carousel) = mounted(5, &[]);
    let dom = host.dom();
    let dots = carousel.dots();

    assert_eq!(dots.len(), 5);
    for (index, &dot) in dots.iter().enumerate() {
        assert_eq!(dom.tag_name(dot), Some("button"));
        assert_eq!(dom.attr(dot, "type"), Some("button"));
        assert_eq!(dom.attr(dot, "aria-label"), Some("navigate to slide"));
        assert_eq!(dom.dataset(dot, "index"), Some(index.to_string().as_str()));
        assert!(dom.has_class(dot, "pagination__dot"));
    }

    let container = dom.parent(dots[0]).unwrap();
    assert!(dom.has_class(container, "pagination__dots"));
    assert_eq!(dom.children(container), dots.as_slice());
}

#[test]
fn test_missing_scroller_is_error() {
    let mut host = Host::new();
    let body = host.dom().body();
    let root = el("div").child(pagination()).mount(host.dom_mut(), body).unwrap();

    let err = Carousel::mount(&mut host, root).unwrap_err();
    assert_eq!(
        err,
        CarouselError::MissingScroller {
            selector: ".carousel__container".to_string()
        }
    );
}

#[test]
fn test_optional_parts_may_be_absent() {
    let mut host = Host::new();
    let body = host.dom().body();
    let root = el("div").child(scroller(3)).mount(host.dom_mut(), body).unwrap();

    let carousel = Carousel::mount(&mut host, root).unwrap();
    carousel.next(&mut host);
    host.settle();

    let snapshot = carousel.snapshot(&host);
    assert_eq!(snapshot.current_index, 1);
    assert_eq!(snapshot.active_slides, vec![1]);
    assert!(snapshot.active_dots.is_empty());
    assert_eq!(snapshot.current_label, None);
    assert_eq!(snapshot.total_label, None);
    assert!(carousel.dots().is_empty());
}

#[test]
fn test_zero_slides_disables_controls() {
    let (mut host, carousel) = mounted(0, &[]);

    let snapshot = carousel.snapshot(&host);
    assert_eq!(snapshot.previous_disabled, vec![true]);
    assert_eq!(snapshot.next_disabled, vec![true]);
    assert_eq!(snapshot.total_label.as_deref(), Some("0"));
    assert_eq!(carousel.current(), None);

    carousel.next(&mut host);
    carousel.prev(&mut host);
    assert!(!carousel.go_to(&mut host, 0));
    assert_eq!(carousel.current_index(), 0);
}

// =========================================================================
// Navigation
// =========================================================================

#[test]
fn test_clicking_next_to_the_end() {
    let (mut host, carousel) = mounted(5, &[]);

    for _ in 0..3 {
        assert!(click_next(&mut host, &carousel));
    }
    assert_showing(&host, &carousel, 3);
    let snapshot = carousel.snapshot(&host);
    assert_eq!(snapshot.current_label.as_deref(), Some("4"));
    assert_eq!(snapshot.previous_disabled, vec![false]);
    assert_eq!(snapshot.next_disabled, vec![false]);

    assert!(click_next(&mut host, &carousel));
    assert_showing(&host, &carousel, 4);
    assert_eq!(carousel.snapshot(&host).next_disabled, vec![true]);

    // the disabled control no longer receives clicks, and next is a no-op anyway
    assert!(!click_next(&mut host, &carousel));
    carousel.next(&mut host);
    assert_eq!(carousel.current_index(), 4);

    host.settle();
    assert_showing(&host, &carousel, 4);
    assert_eq!(host.dom().scroll_left(carousel.scroller()), 4.0 * SLIDE_WIDTH);
}

#[test]
fn test_prev_at_first_slide_is_noop() {
    let (mut host, carousel) = mounted(5, &[]);

    carousel.prev(&mut host);
    assert_eq!(carousel.current_index(), 0);
    assert!(!host.is_scrolling(carousel.scroller()));
    assert!(!click_prev(&mut host, &carousel));
}

#[test]
fn test_looped_wraps_both_ways() {
    let (mut host, carousel) = mounted(5, &[("looped", "")]);
    assert!(carousel.is_looped());

    assert!(carousel.go_to(&mut host, 4));
    host.settle();
    assert!(click_next(&mut host, &carousel));
    assert_showing(&host, &carousel, 0);
    host.settle();
    assert_eq!(host.dom().scroll_left(carousel.scroller()), 0.0);

    assert!(click_prev(&mut host, &carousel));
    assert_showing(&host, &carousel, 4);

    let snapshot = carousel.snapshot(&host);
    assert_eq!(snapshot.previous_disabled, vec![false]);
    assert_eq!(snapshot.next_disabled, vec![false]);
}

#[test]
fn test_looped_controls_never_disabled() {
    let (mut host, carousel) = mounted(5, &[("looped", "")]);

    for index in [0, 4, 2, 0] {
        carousel.go_to(&mut host, index);
        host.settle();
        let snapshot = carousel.snapshot(&host);
        assert_eq!(snapshot.previous_disabled, vec![false]);
        assert_eq!(snapshot.next_disabled, vec![false]);
    }
}

#[test]
fn test_each_navigation_leaves_one_active_dot() {
    let (mut host, carousel) = mounted(5, &[]);
    let dots = carousel.dots();

    for index in [2, 0, 4, 1, 3] {
        assert!(host.click(dots[index]));
        assert_showing(&host, &carousel, index);
        host.settle();
        assert_showing(&host, &carousel, index);
        assert_eq!(
            host.dom().scroll_left(carousel.scroller()),
            index as f32 * SLIDE_WIDTH
        );
    }
}

#[test]
fn test_controls_follow_the_ends() {
    let (mut host, carousel) = mounted(5, &[]);

    carousel.go_to(&mut host, 4);
    let snapshot = carousel.snapshot(&host);
    assert_eq!(snapshot.previous_disabled, vec![false]);
    assert_eq!(snapshot.next_disabled, vec![true]);

    carousel.go_to(&mut host, 0);
    let snapshot = carousel.snapshot(&host);
    assert_eq!(snapshot.previous_disabled, vec![true]);
    assert_eq!(snapshot.next_disabled, vec![false]);
}

#[test]
fn test_duplicated_controls_all_work() {
    let mut host = Host::new();
    let body = host.dom().body();
    let root = el("div")
        .child(scroller(4))
        .child(pagination())
        .child(
            el("div")
                .class("pagination")
                .child(el("button").class("pagination-button_back"))
                .child(el("button").class("pagination-button_forward")),
        )
        .mount(host.dom_mut(), body)
        .unwrap();
    let carousel = Carousel::mount(&mut host, root).unwrap();

    assert_eq!(carousel.pagination().len(), 2);
    let next = carousel.next_controls();
    assert_eq!(next.len(), 2);

    assert!(host.click(next[1]));
    assert!(host.click(next[0]));
    assert_eq!(carousel.current_index(), 2);

    let snapshot = carousel.snapshot(&host);
    assert_eq!(snapshot.previous_disabled, vec![false, false]);
    assert_eq!(snapshot.next_disabled, vec![false, false]);

    carousel.go_to(&mut host, 3);
    assert_eq!(carousel.snapshot(&host).next_disabled, vec![true, true]);
}

#[test]
fn test_go_to_out_of_range_is_rejected() {
    let (mut host, carousel) = mounted(3, &[]);
    assert!(!carousel.go_to(&mut host, 3));
    assert_eq!(carousel.current_index(), 0);
}

#[test]
fn test_total_fixed_after_mount() {
    let (mut host, carousel) = mounted(5, &[]);
    let scroller = carousel.scroller();
    el("li")
        .class("carousel__item")
        .w(SLIDE_WIDTH)
        .h(200.0)
        .flex_shrink_0()
        .mount(host.dom_mut(), scroller)
        .unwrap();
    assert_eq!(host.dom().children(scroller).len(), 6);

    assert!(carousel.go_to(&mut host, 4));
    host.settle();
    carousel.next(&mut host);
    host.settle();

    assert_eq!(carousel.total(), 5);
    assert_eq!(carousel.slides().len(), 5);
    assert_eq!(carousel.current_index(), 4);
    let snapshot = carousel.snapshot(&host);
    assert_eq!(snapshot.next_disabled, vec![true]);
    assert_eq!(snapshot.total_label.as_deref(), Some("5"));
}

#[test]
fn test_scroll_target_accounts_for_padding() {
    let mut host = Host::new();
    let body = host.dom().body();
    let root = el("div")
        .child(
            el("ul")
                .class("carousel__container")
                .flex_row()
                .w(300.0)
                .h(200.0)
                .pl(20.0)
                .pr(20.0)
                .gap_x(20.0)
                .overflow_x_scroll()
                .children((0..5).map(|_| el("li").w(260.0).h(200.0).flex_shrink_0())),
        )
        .mount(host.dom_mut(), body)
        .unwrap();
    let carousel = Carousel::mount(&mut host, root).unwrap();

    carousel.go_to(&mut host, 3);
    host.settle();

    let left = host.dom().scroll_left(carousel.scroller());
    assert!((left - 840.0).abs() < 0.01, "scrolled to {left}");
    assert_eq!(carousel.current_index(), 3);
}

// =========================================================================
// Autoplay
// =========================================================================

#[test]
fn test_autoplay_advances_every_period() {
    let (mut host, carousel) = mounted(5, &[("autoplay", "")]);
    assert!(carousel.is_autoplay());

    host.advance(Duration::from_millis(3999));
    assert_eq!(carousel.current_index(), 0);

    host.advance(Duration::from_millis(8001));
    host.settle();
    assert_showing(&host, &carousel, 3);
}

#[test]
fn test_autoplay_stops_at_end_without_loop() {
    let (mut host, carousel) = mounted(5, &[("autoplay", "")]);

    host.advance(Duration::from_secs(28));
    host.settle();
    assert_showing(&host, &carousel, 4);
    // the interval keeps running, each firing is a no-op
    assert!(carousel.is_autoplay());
}

#[test]
fn test_autoplay_wraps_when_looped() {
    let (mut host, carousel) = mounted(5, &[("autoplay", ""), ("looped", "")]);

    host.advance(Duration::from_secs(24));
    host.settle();
    assert_showing(&host, &carousel, 1);
}

#[test]
fn test_first_control_click_cancels_autoplay() {
    let (mut host, carousel) = mounted(5, &[("autoplay", "")]);
    assert_eq!(host.pending_timers(), 1);

    assert!(click_next(&mut host, &carousel));
    assert!(!carousel.is_autoplay());
    assert_eq!(host.pending_timers(), 0);

    assert!(click_prev(&mut host, &carousel));
    assert!(!carousel.is_autoplay());
    assert!(!carousel.cancel_autoplay(&mut host));

    host.advance(Duration::from_secs(20));
    assert_showing(&host, &carousel, 0);
}

#[test]
fn test_dot_click_keeps_autoplay() {
    let (mut host, carousel) = mounted(5, &[("autoplay", "")]);

    assert!(host.click(carousel.dots()[2]));
    assert!(carousel.is_autoplay());

    host.advance(Duration::from_millis(4000));
    host.settle();
    assert_showing(&host, &carousel, 3);
}

#[test]
fn test_false_attribute_does_not_enable_autoplay() {
    let (host, carousel) = mounted(5, &[("autoplay", "false"), ("looped", "0")]);
    assert!(!carousel.is_autoplay());
    assert!(!carousel.is_looped());
    assert_eq!(host.pending_timers(), 0);
}

// =========================================================================
// Visibility
// =========================================================================

#[test]
fn test_user_scroll_moves_current() {
    let (mut host, carousel) = mounted(5, &[]);
    let scroller = carousel.scroller();

    host.scroll_user(scroller, 2.0 * SLIDE_WIDTH).unwrap();
    assert_showing(&host, &carousel, 2);
    let snapshot = carousel.snapshot(&host);
    assert_eq!(snapshot.previous_disabled, vec![false]);
    assert_eq!(snapshot.next_disabled, vec![false]);

    host.scroll_user(scroller, 4.0 * SLIDE_WIDTH).unwrap();
    assert_showing(&host, &carousel, 4);
    assert_eq!(carousel.snapshot(&host).next_disabled, vec![true]);
}

#[test]
fn test_partial_scroll_below_threshold_keeps_current() {
    let (mut host, carousel) = mounted(5, &[]);

    // slides 0 and 1 are both half visible
    host.scroll_user(carousel.scroller(), 150.0).unwrap();
    assert_showing(&host, &carousel, 0);

    host.scroll_user(carousel.scroller(), 200.0).unwrap();
    assert_showing(&host, &carousel, 1);
}

#[test]
fn test_repeated_observation_is_idempotent() {
    let (mut host, carousel) = mounted(5, &[]);

    host.scroll_user(carousel.scroller(), 300.0).unwrap();
    let first = carousel.snapshot(&host);
    host.scroll_user(carousel.scroller(), 300.0).unwrap();
    host.flush_observers();

    assert_eq!(carousel.snapshot(&host), first);
}

// =========================================================================
// Configuration
// =========================================================================

#[test]
fn test_builder_overrides_dataset() {
    let mut host = Host::new();
    let root = markup(&mut host, 5, &[("looped", "")]);

    let carousel = Carousel::builder(root)
        .looped(false)
        .autoplay(true)
        .autoplay_interval(Duration::from_millis(1000))
        .mount(&mut host)
        .unwrap();

    assert!(!carousel.is_looped());
    assert!(carousel.is_autoplay());
    assert_eq!(carousel.options().autoplay_interval_ms, 1000);
}

#[test]
fn test_nan_threshold_keeps_visibility_tracking() {
    let mut host = Host::new();
    let root = markup(&mut host, 5, &[]);
    let carousel = Carousel::builder(root)
        .visibility_threshold(f32::NAN)
        .mount(&mut host)
        .unwrap();

    assert_eq!(carousel.options().visibility_threshold, 0.6);
    host.scroll_user(carousel.scroller(), 3.0 * SLIDE_WIDTH).unwrap();
    assert_showing(&host, &carousel, 3);
}

#[test]
fn test_options_loaded_from_toml() {
    let options: CarouselOptions =
        toml::from_str("autoplay = true\nlooped = true\nautoplay_interval_ms = 1000").unwrap();
    let mut host = Host::new();
    let root = markup(&mut host, 3, &[]);

    let carousel = Carousel::builder(root).options(options).mount(&mut host).unwrap();

    host.advance(Duration::from_millis(3000));
    host.settle();
    assert_showing(&host, &carousel, 0);
}

#[test]
fn test_custom_markup() {
    let mut host = Host::new();
    let body = host.dom().body();
    let root = el("section")
        .child(
            el("div")
                .class("track")
                .flex_row()
                .w(300.0)
                .h(100.0)
                .overflow_x_scroll()
                .children((0..3).map(|_| el("div").w(300.0).h(100.0).flex_shrink_0())),
        )
        .child(el("nav").class("bullets"))
        .mount(host.dom_mut(), body)
        .unwrap();

    let markup = CarouselMarkup {
        scroller: ".track".into(),
        dots: ".bullets".into(),
        dot_class: "bullet".into(),
        dot_active_class: "bullet_on".into(),
        ..CarouselMarkup::default()
    };
    let carousel = Carousel::builder(root).markup(markup).mount(&mut host).unwrap();

    let dots = carousel.dots();
    assert_eq!(dots.len(), 3);
    assert!(host.dom().has_class(dots[0], "bullet_on"));
    host.click(dots[2]);
    assert!(host.dom().has_class(dots[2], "bullet_on"));
    assert!(!host.dom().has_class(dots[0], "bullet_on"));
}

#[test]
fn test_snapshot_serializes() {
    let (host, carousel) = mounted(2, &[]);
    let value = serde_json::to_value(carousel.snapshot(&host)).unwrap();

    assert_eq!(value["current_index"], 0);
    assert_eq!(value["current_label"], "1");
    assert_eq!(value["total_label"], "2");
    assert_eq!(value["next_disabled"], serde_json::json!([false]));
}
