//! Headless Carousel Demo
//!
//! Builds carousel markup in a headless document, then drives it with
//! autoplay, control clicks, dot clicks and a simulated swipe, logging a
//! snapshot after each step.
//!
//! Run with: RUST_LOG=reel_carousel=debug cargo run -p reel_carousel --example headless_carousel

use std::time::Duration;

use anyhow::Result;
use reel_carousel::prelude::*;

const SLIDE_COUNT: usize = 5;
const SLIDE_WIDTH: f32 = 280.0;
const SLIDE_GAP: f32 = 20.0;
const VIEWPORT_WIDTH: f32 = 320.0;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let mut host = Host::new();
    let root = build_markup(&mut host)?;
    let carousel = Carousel::mount(&mut host, root)?;
    report(&host, &carousel, "mounted")?;

    host.advance(Duration::from_secs(9));
    host.settle();
    report(&host, &carousel, "after two autoplay steps")?;

    let next = carousel.next_controls()[0];
    host.click(next);
    host.settle();
    report(&host, &carousel, "clicked next, autoplay cancelled")?;

    let dots = carousel.dots();
    host.click(dots[SLIDE_COUNT - 1]);
    host.settle();
    report(&host, &carousel, "clicked last dot")?;

    host.scroll_user(carousel.scroller(), SLIDE_WIDTH + SLIDE_GAP)?;
    report(&host, &carousel, "swiped to slide 2")?;

    host.advance(Duration::from_secs(10));
    report(&host, &carousel, "idle for 10s")?;

    Ok(())
}

fn build_markup(host: &mut Host) -> Result<ElementId> {
    let body = host.dom().body();
    let root = el("div")
        .class("carousel")
        .data("autoplay", "")
        .flex_col()
        .child(
            el("ul")
                .class("carousel__container")
                .flex_row()
                .w(VIEWPORT_WIDTH)
                .h(360.0)
                .pl(SLIDE_GAP)
                .pr(SLIDE_GAP)
                .gap_x(SLIDE_GAP)
                .overflow_x_scroll()
                .children((0..SLIDE_COUNT).map(|i| {
                    el("li")
                        .class("carousel__item")
                        .w(SLIDE_WIDTH)
                        .h(360.0)
                        .flex_shrink_0()
                        .text(format!("Card {}", i + 1))
                })),
        )
        .child(
            el("div")
                .class("pagination")
                .flex_row()
                .child(el("button").class("pagination-button_back").text("<"))
                .child(el("div").class("pagination__dots").flex_row())
                .child(el("span").class("pagination__current"))
                .child(el("span").text("/"))
                .child(el("span").class("pagination__total"))
                .child(el("button").class("pagination-button_forward").text(">")),
        )
        .mount(host.dom_mut(), body)?;
    Ok(root)
}

fn report(host: &Host, carousel: &Carousel, step: &str) -> Result<()> {
    let snapshot = carousel.snapshot(host);
    tracing::info!(
        "[{:>6}ms] {}: {}",
        host.now().as_millis(),
        step,
        serde_json::to_string(&snapshot)?
    );
    Ok(())
}
