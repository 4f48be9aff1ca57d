//! Kinetic Core
//!
//! Foundational primitives shared by the Kinetic motion engine:
//!
//! - **Geometry**: points, sizes, rects, axes and the 2D translate/scale transform
//! - **State Machines**: the `StateTransitions` trait used by gesture and scroll phases
//! - **Input**: raw mouse/touch/wheel events and the normalizer that turns them
//!   into a uniform pointer list
//!
//! # Example
//!
//! ```rust
//! use kinetic_core::input::{PointerNormalizer, PointerPhase, RawInput, TouchEvent};
//!
//! let mut normalizer = PointerNormalizer::new();
//! let event = normalizer
//!     .normalize(RawInput::Touch(TouchEvent::Started { id: 1, x: 10.0, y: 20.0 }), 0.0)
//!     .unwrap();
//!
//! assert_eq!(event.phase, PointerPhase::Start);
//! assert_eq!(event.pointers.len(), 1);
//! ```

pub mod fsm;
pub mod geometry;
pub mod input;

pub use fsm::StateTransitions;
pub use geometry::{Axis, Point, Rect, Size, Transform2D};
pub use input::{
    MouseButton, MouseEvent, Pointer, PointerEvent, PointerList, PointerNormalizer, PointerPhase,
    RawInput, TouchEvent, WheelEvent,
};
