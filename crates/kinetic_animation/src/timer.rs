//! Cancellable deadline timers
//!
//! Deferred work (click passthrough, zoom-end notifications, scrollbar
//! fades) is registered here instead of with ad-hoc platform timeouts, so the
//! owner can cancel any pending callback synchronously through its handle.
//! The queue never fires on its own: the owner drains it with `pop_due`
//! from its tick.

use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// Handle to a scheduled timer
    pub struct TimerId;
}

#[derive(Debug)]
struct Timer<T> {
    due_ms: f64,
    seq: u64,
    payload: T,
}

/// Deadline-ordered timers with cancellation handles
#[derive(Debug)]
pub struct TimerQueue<T> {
    timers: SlotMap<TimerId, Timer<T>>,
    next_seq: u64,
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self {
            timers: SlotMap::with_key(),
            next_seq: 0,
        }
    }
}

impl<T> TimerQueue<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `payload` to become due at `due_ms`
    pub fn schedule(&mut self, due_ms: f64, payload: T) -> TimerId {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.timers.insert(Timer {
            due_ms,
            seq,
            payload,
        })
    }

    /// Cancel a timer, returning its payload if it was still pending
    pub fn cancel(&mut self, id: TimerId) -> Option<T> {
        self.timers.remove(id).map(|t| t.payload)
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.timers.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    /// Earliest pending deadline
    pub fn next_deadline(&self) -> Option<f64> {
        self.timers
            .values()
            .map(|t| t.due_ms)
            .min_by(|a, b| a.total_cmp(b))
    }

    /// Remove and return every timer due at or before `now_ms`, in deadline
    /// order (ties in scheduling order)
    pub fn pop_due(&mut self, now_ms: f64) -> Vec<(TimerId, T)> {
        let mut due: Vec<(TimerId, f64, u64)> = self
            .timers
            .iter()
            .filter(|(_, t)| t.due_ms <= now_ms)
            .map(|(id, t)| (id, t.due_ms, t.seq))
            .collect();
        due.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.2.cmp(&b.2)));

        due.into_iter()
            .filter_map(|(id, _, _)| self.timers.remove(id).map(|t| (id, t.payload)))
            .collect()
    }

    /// Drop every pending timer
    pub fn clear(&mut self) {
        self.timers.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pop_due_in_deadline_order() {
        let mut q = TimerQueue::new();
        q.schedule(300.0, "late");
        q.schedule(100.0, "early");
        q.schedule(100.0, "early-second");
        q.schedule(900.0, "future");

        assert_eq!(q.next_deadline(), Some(100.0));

        let fired: Vec<_> = q.pop_due(300.0).into_iter().map(|(_, p)| p).collect();
        assert_eq!(fired, vec!["early", "early-second", "late"]);
        assert_eq!(q.len(), 1);
        assert_eq!(q.next_deadline(), Some(900.0));
    }

    #[test]
    fn test_cancel_is_synchronous() {
        let mut q = TimerQueue::new();
        let id = q.schedule(10.0, 1u32);
        assert!(q.is_pending(id));

        assert_eq!(q.cancel(id), Some(1));
        assert!(!q.is_pending(id));
        assert!(q.pop_due(100.0).is_empty());

        // Stale handles are harmless
        assert_eq!(q.cancel(id), None);
    }
}
