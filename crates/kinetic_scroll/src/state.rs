//! Scroll phase state machine
//!
//! ```text
//! Idle ──POINTER_DOWN──► Dragging ──POINTER_UP──► Idle
//!   │                       │
//!   └──ANIMATE / SNAP_BACK──┴──► Animating / SnappingBack ──SETTLED──► Idle
//! ```
//!
//! A pointer-down interrupts any animation and goes straight to `Dragging`.

use kinetic_core::StateTransitions;

/// Scroll phase event codes
pub mod scroll_events {
    pub const POINTER_DOWN: u32 = 1;
    pub const POINTER_UP: u32 = 2;
    /// A plan toward a chosen destination started
    pub const ANIMATE: u32 = 3;
    /// A plan bringing an out-of-bounds offset back started
    pub const SNAP_BACK: u32 = 4;
    /// The active plan finished or was stopped
    pub const SETTLED: u32 = 5;
}

/// What the view is doing right now
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ScrollPhase {
    #[default]
    Idle,
    Dragging,
    Animating,
    SnappingBack,
}

impl ScrollPhase {
    pub fn is_dragging(&self) -> bool {
        matches!(self, ScrollPhase::Dragging)
    }

    /// True for both animation flavours
    pub fn is_animating(&self) -> bool {
        matches!(self, ScrollPhase::Animating | ScrollPhase::SnappingBack)
    }
}

impl StateTransitions for ScrollPhase {
    fn on_event(&self, event: u32) -> Option<Self> {
        use scroll_events::*;
        use ScrollPhase::*;

        match (self, event) {
            (_, POINTER_DOWN) => Some(Dragging),
            (Dragging, POINTER_UP) => Some(Idle),

            (Idle | Animating | SnappingBack, ANIMATE) => Some(Animating),
            (Idle | Animating | SnappingBack, SNAP_BACK) => Some(SnappingBack),

            (Animating | SnappingBack, SETTLED) => Some(Idle),

            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::scroll_events::*;
    use super::*;

    #[test]
    fn test_drag_then_animate() {
        let mut phase = ScrollPhase::Idle;
        assert!(phase.transition(POINTER_DOWN));
        assert!(phase.is_dragging());

        // Animations never start mid-drag
        assert!(!phase.transition(ANIMATE));

        assert!(phase.transition(POINTER_UP));
        assert!(phase.transition(ANIMATE));
        assert!(phase.is_animating());
        assert!(phase.transition(SETTLED));
        assert_eq!(phase, ScrollPhase::Idle);
    }

    #[test]
    fn test_snap_back_after_animation() {
        let mut phase = ScrollPhase::Animating;
        assert!(phase.transition(SNAP_BACK));
        assert_eq!(phase, ScrollPhase::SnappingBack);
        assert!(phase.is_animating());
    }

    #[test]
    fn test_pointer_down_interrupts() {
        for start in [ScrollPhase::Animating, ScrollPhase::SnappingBack, ScrollPhase::Idle] {
            assert_eq!(start.on_event(POINTER_DOWN), Some(ScrollPhase::Dragging));
        }
    }

    #[test]
    fn test_idle_ignores_settled() {
        assert_eq!(ScrollPhase::Idle.on_event(SETTLED), None);
        assert_eq!(ScrollPhase::Idle.on_event(POINTER_UP), None);
    }
}
