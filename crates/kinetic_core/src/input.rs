//! Input event types and pointer normalization
//!
//! Hosts deliver raw mouse and touch events; the [`PointerNormalizer`] folds
//! them into a uniform [`PointerEvent`] stream (start/move/end/cancel with the
//! list of pointers currently down) so the gesture tracker never needs to know
//! which device produced the input.

use smallvec::SmallVec;

use crate::geometry::Point;

/// Pointer id used for the primary mouse button
pub const MOUSE_POINTER_ID: u64 = u64::MAX;

// ============================================================================
// Raw Events
// ============================================================================

/// Raw input from the host platform
#[derive(Clone, Debug)]
pub enum RawInput {
    /// Mouse event
    Mouse(MouseEvent),
    /// Touch event (mobile/touchscreen)
    Touch(TouchEvent),
}

/// Mouse events
#[derive(Clone, Debug)]
pub enum MouseEvent {
    /// Mouse moved to position
    Moved { x: f32, y: f32 },
    /// Mouse button pressed
    ButtonPressed { button: MouseButton, x: f32, y: f32 },
    /// Mouse button released
    ButtonReleased { button: MouseButton, x: f32, y: f32 },
    /// Mouse left the surface
    Left,
}

/// Mouse buttons
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Other(u16),
}

/// Touch events for touchscreens
#[derive(Clone, Debug)]
pub enum TouchEvent {
    /// A touch started
    Started { id: u64, x: f32, y: f32 },
    /// A touch moved
    Moved { id: u64, x: f32, y: f32 },
    /// A touch ended
    Ended { id: u64, x: f32, y: f32 },
    /// A touch was cancelled (e.g., by system gesture)
    Cancelled { id: u64 },
}

impl TouchEvent {
    /// Get the touch ID
    pub fn id(&self) -> u64 {
        match self {
            TouchEvent::Started { id, .. }
            | TouchEvent::Moved { id, .. }
            | TouchEvent::Ended { id, .. }
            | TouchEvent::Cancelled { id } => *id,
        }
    }
}

/// Wheel / trackpad scroll
///
/// Deltas are already in pixels, positive meaning "content moves
/// right/down" (the same sign as a drag).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct WheelEvent {
    pub delta_x: f32,
    pub delta_y: f32,
    /// Pointer position, used as the zoom origin
    pub x: f32,
    pub y: f32,
    pub timestamp_ms: f64,
}

// ============================================================================
// Normalized Pointer Events
// ============================================================================

/// Phase of a normalized pointer event
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PointerPhase {
    Start,
    Move,
    End,
    Cancel,
}

/// A single contact point
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pointer {
    pub id: u64,
    pub position: Point,
}

impl Pointer {
    pub fn new(id: u64, x: f32, y: f32) -> Self {
        Self {
            id,
            position: Point::new(x, y),
        }
    }
}

/// Pointers currently in contact; two inline slots cover pinch gestures
pub type PointerList = SmallVec<[Pointer; 2]>;

/// Device-independent pointer event
#[derive(Clone, Debug, PartialEq)]
pub struct PointerEvent {
    pub phase: PointerPhase,
    /// Pointers still down after this event
    pub pointers: PointerList,
    /// The pointer this event is about
    pub changed: Pointer,
    pub timestamp_ms: f64,
}

impl PointerEvent {
    /// Build an event directly, bypassing the normalizer
    pub fn new(
        phase: PointerPhase,
        pointers: &[Pointer],
        changed: Pointer,
        timestamp_ms: f64,
    ) -> Self {
        Self {
            phase,
            pointers: pointers.iter().copied().collect(),
            changed,
            timestamp_ms,
        }
    }

    /// Single-pointer start at `(x, y)`
    pub fn start(x: f32, y: f32, timestamp_ms: f64) -> Self {
        let p = Pointer::new(0, x, y);
        Self::new(PointerPhase::Start, &[p], p, timestamp_ms)
    }

    /// Single-pointer move to `(x, y)`
    pub fn moved(x: f32, y: f32, timestamp_ms: f64) -> Self {
        let p = Pointer::new(0, x, y);
        Self::new(PointerPhase::Move, &[p], p, timestamp_ms)
    }

    /// Single-pointer release at `(x, y)`
    pub fn end(x: f32, y: f32, timestamp_ms: f64) -> Self {
        Self::new(PointerPhase::End, &[], Pointer::new(0, x, y), timestamp_ms)
    }

    /// Position of the primary pointer
    pub fn position(&self) -> Point {
        self.pointers
            .first()
            .map(|p| p.position)
            .unwrap_or(self.changed.position)
    }

    /// Number of pointers still down
    pub fn touch_count(&self) -> usize {
        self.pointers.len()
    }

    /// The first two pointers, if a pinch is possible
    pub fn pair(&self) -> Option<(Point, Point)> {
        match self.pointers.as_slice() {
            [a, b, ..] => Some((a.position, b.position)),
            _ => None,
        }
    }
}

// ============================================================================
// Normalizer
// ============================================================================

/// Folds mouse and touch input into [`PointerEvent`]s
#[derive(Debug, Default)]
pub struct PointerNormalizer {
    touches: SmallVec<[Pointer; 4]>,
    mouse: Option<Pointer>,
}

impl PointerNormalizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// True while any pointer is down
    pub fn is_active(&self) -> bool {
        !self.touches.is_empty() || self.mouse.is_some()
    }

    /// Forget every tracked pointer (e.g. when the view is disabled)
    pub fn reset(&mut self) {
        self.touches.clear();
        self.mouse = None;
    }

    /// Translate one raw event, returning `None` when it carries no pointer
    /// information (hover moves, non-primary buttons, unknown touch ids)
    pub fn normalize(&mut self, input: RawInput, timestamp_ms: f64) -> Option<PointerEvent> {
        match input {
            RawInput::Touch(touch) => self.touch(touch, timestamp_ms),
            RawInput::Mouse(mouse) => self.mouse(mouse, timestamp_ms),
        }
    }

    fn touch(&mut self, event: TouchEvent, timestamp_ms: f64) -> Option<PointerEvent> {
        match event {
            TouchEvent::Started { id, x, y } => {
                let pointer = Pointer::new(id, x, y);
                match self.touches.iter_mut().find(|p| p.id == id) {
                    Some(existing) => *existing = pointer,
                    None => self.touches.push(pointer),
                }
                Some(self.emit(PointerPhase::Start, pointer, timestamp_ms))
            }
            TouchEvent::Moved { id, x, y } => {
                let existing = self.touches.iter_mut().find(|p| p.id == id)?;
                existing.position = Point::new(x, y);
                let pointer = *existing;
                Some(self.emit(PointerPhase::Move, pointer, timestamp_ms))
            }
            TouchEvent::Ended { id, x, y } => {
                let index = self.touches.iter().position(|p| p.id == id)?;
                self.touches.remove(index);
                Some(self.emit(PointerPhase::End, Pointer::new(id, x, y), timestamp_ms))
            }
            TouchEvent::Cancelled { id } => {
                let index = self.touches.iter().position(|p| p.id == id)?;
                let pointer = self.touches.remove(index);
                Some(self.emit(PointerPhase::Cancel, pointer, timestamp_ms))
            }
        }
    }

    fn mouse(&mut self, event: MouseEvent, timestamp_ms: f64) -> Option<PointerEvent> {
        match event {
            MouseEvent::ButtonPressed {
                button: MouseButton::Left,
                x,
                y,
            } => {
                let pointer = Pointer::new(MOUSE_POINTER_ID, x, y);
                self.mouse = Some(pointer);
                Some(self.emit(PointerPhase::Start, pointer, timestamp_ms))
            }
            MouseEvent::Moved { x, y } => {
                let pointer = self.mouse.as_mut()?;
                pointer.position = Point::new(x, y);
                let pointer = *pointer;
                Some(self.emit(PointerPhase::Move, pointer, timestamp_ms))
            }
            MouseEvent::ButtonReleased {
                button: MouseButton::Left,
                x,
                y,
            } => {
                self.mouse.take()?;
                let pointer = Pointer::new(MOUSE_POINTER_ID, x, y);
                Some(self.emit(PointerPhase::End, pointer, timestamp_ms))
            }
            MouseEvent::Left => {
                let pointer = self.mouse.take()?;
                Some(self.emit(PointerPhase::Cancel, pointer, timestamp_ms))
            }
            MouseEvent::ButtonPressed { .. } | MouseEvent::ButtonReleased { .. } => None,
        }
    }

    fn emit(&self, phase: PointerPhase, changed: Pointer, timestamp_ms: f64) -> PointerEvent {
        let mut pointers: PointerList = self.touches.iter().copied().collect();
        if let Some(mouse) = self.mouse {
            pointers.push(mouse);
        }
        PointerEvent {
            phase,
            pointers,
            changed,
            timestamp_ms,
        }
    }
}
