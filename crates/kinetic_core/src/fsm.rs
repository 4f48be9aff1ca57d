//! Finite state machine trait
//!
//! Interaction states are small `Copy` enums that react to `u32` event codes.
//! Returning `None` means "no transition", so callers can write:
//!
//! ```rust
//! use kinetic_core::StateTransitions;
//!
//! #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
//! enum Press {
//!     Up,
//!     Down,
//! }
//!
//! const DOWN: u32 = 1;
//! const UP: u32 = 2;
//!
//! impl StateTransitions for Press {
//!     fn on_event(&self, event: u32) -> Option<Self> {
//!         match (self, event) {
//!             (Press::Up, DOWN) => Some(Press::Down),
//!             (Press::Down, UP) => Some(Press::Up),
//!             _ => None,
//!         }
//!     }
//! }
//!
//! let mut state = Press::Up;
//! if let Some(next) = state.on_event(DOWN) {
//!     state = next;
//! }
//! assert_eq!(state, Press::Down);
//! ```

use std::hash::Hash;

/// A state that transitions in response to event codes
pub trait StateTransitions: Clone + Copy + PartialEq + Eq + Hash + std::fmt::Debug + 'static {
    /// Handle an event and return the new state, or None if no transition
    fn on_event(&self, event: u32) -> Option<Self>;

    /// Apply an event in place, returning true if the state changed
    fn transition(&mut self, event: u32) -> bool {
        match self.on_event(event) {
            Some(next) if next != *self => {
                tracing::trace!(from = ?self, to = ?next, event, "state transition");
                *self = next;
                true
            }
            _ => false,
        }
    }
}
