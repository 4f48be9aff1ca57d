//! Kinetic Scroll
//!
//! Headless inertial scrolling for touch-style scroll views.
//!
//! # Features
//!
//! - **Momentum**: constant-deceleration flicks with a bounded overshoot past the edges
//! - **Rubber-banding**: halved drag resistance past the edges and timed snap-back
//! - **Snapping**: fixed viewport pages or pages derived from child elements
//! - **Direction lock**: drags latch to the dominant axis
//! - **Pinch and double-tap zoom** with elastic limits
//! - **Scrollbar indicators** that shrink while overscrolled
//! - **Two drivers**: per-frame sampling or host-side transitions
//!
//! The engine never renders. Hosts implement [`Scrollable`], [`Transformable`]
//! and [`Renderable`] for their widget (or use [`HeadlessSurface`]) and feed
//! pointer events and ticks to a [`ScrollView`].
//!
//! # Example
//!
//! ```
//! use std::rc::Rc;
//!
//! use kinetic_animation::ManualClock;
//! use kinetic_core::Size;
//! use kinetic_scroll::{HeadlessSurface, PageTarget, ScrollContext, ScrollOptions, ScrollView};
//!
//! let clock = Rc::new(ManualClock::new(0.0));
//! let surface = HeadlessSurface::new(Size::new(320.0, 480.0), Size::new(960.0, 480.0));
//! let mut view = ScrollView::new(
//!     ScrollContext::new(clock.clone()),
//!     surface,
//!     ScrollOptions::carousel(),
//! );
//!
//! view.scroll_to_page(PageTarget::Next, PageTarget::Index(0), None);
//! clock.advance(400.0);
//! view.tick();
//!
//! assert_eq!(view.offset().x, -320.0);
//! assert_eq!(view.current_page(), (1, 0));
//! ```

pub mod bounds;
pub mod config;
pub mod context;
pub mod error;
pub mod gesture;
pub mod handlers;
pub mod headless;
pub mod momentum;
pub mod pages;
pub mod scrollbar;
pub mod snap;
pub mod state;
pub mod surface;
pub mod view;

pub use bounds::{Boundary, ScrollBounds};
pub use config::{DriverMode, ScrollOptions, SnapMode, WheelAction};
pub use context::ScrollContext;
pub use error::{ConfigError, Result};
pub use gesture::{GestureTracker, Release};
pub use handlers::{ScrollCallback, ScrollEventContext, ScrollEventKind, ScrollHandlers};
pub use headless::HeadlessSurface;
pub use momentum::{momentum, Momentum};
pub use pages::{PageSet, Pages};
pub use scrollbar::{IndicatorGeometry, Scrollbar};
pub use snap::SnapResult;
pub use state::{scroll_events, ScrollPhase};
pub use surface::{Renderable, Scrollable, Surface, Transformable};
pub use view::{PageTarget, ScrollView};
