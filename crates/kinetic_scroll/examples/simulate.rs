//! Carousel Flick Simulation
//!
//! Drives a headless paging carousel through a flick and prints the
//! offset at every 16ms frame until it settles.
//!
//! Run with: RUST_LOG=kinetic_scroll=debug cargo run -p kinetic_scroll --example simulate

use std::rc::Rc;

use kinetic_animation::ManualClock;
use kinetic_core::{PointerEvent, Size};
use kinetic_scroll::{HeadlessSurface, ScrollContext, ScrollOptions, ScrollView};

const FRAME_MS: f64 = 16.0;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let clock = Rc::new(ManualClock::new(0.0));
    let surface = HeadlessSurface::new(Size::new(320.0, 480.0), Size::new(1600.0, 480.0));
    let mut view = ScrollView::new(
        ScrollContext::new(clock.clone()),
        surface,
        ScrollOptions::carousel(),
    );

    view.handlers_mut().on_scroll_end(|ctx| {
        println!("settled at x = {} on page {}", ctx.offset.x, ctx.page.0);
    });

    let gesture = [
        PointerEvent::start(260.0, 200.0, 0.0),
        PointerEvent::moved(240.0, 200.0, 30.0),
        PointerEvent::moved(180.0, 200.0, 60.0),
        PointerEvent::moved(90.0, 200.0, 90.0),
        PointerEvent::end(90.0, 200.0, 90.0),
    ];
    for event in &gesture {
        clock.set(event.timestamp_ms);
        view.handle_pointer(event);
    }
    println!("released at x = {}, heading for page {}", view.offset().x, view.current_page().0);

    loop {
        let now = clock.advance(FRAME_MS);
        let busy = view.tick();
        println!("{now:>6.0}ms  x = {:>8.2}  {:?}", view.offset().x, view.phase());
        if !busy {
            break;
        }
    }
}
