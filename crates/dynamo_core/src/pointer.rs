//! Pointer data model
//!
//! Coordinates carried by [`PointerEvent`] are in a bottom-left-origin space:
//! the capture layer flips raw top-left-origin input against the surface
//! height before anything reaches the queue.

use std::fmt;

/// Identifier of one continuous contact. Reused by the platform after release.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PointerId(pub u32);

impl fmt::Display for PointerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Transition type of a contact.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Phase {
    Down,
    Move,
    Up,
    /// Gesture aborted by the platform. Terminal like `Up`, but scripts may
    /// want to skip committing whatever the gesture was doing.
    Cancel,
}

impl Phase {
    /// Whether the finger is still touching the surface after this transition.
    pub fn is_down(self) -> bool {
        matches!(self, Phase::Down | Phase::Move)
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Phase::Up | Phase::Cancel)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Down => "down",
            Phase::Move => "move",
            Phase::Up => "up",
            Phase::Cancel => "cancel",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PointerEvent {
    pub id: PointerId,
    pub phase: Phase,
    pub x: f32,
    pub y: f32,
}

impl PointerEvent {
    pub fn new(id: PointerId, phase: Phase, x: f32, y: f32) -> Self {
        Self { id, phase, x, y }
    }
}

/// Events derived from one raw input sample, in capture index order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointerBatch {
    events: Vec<PointerEvent>,
}

impl PointerBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(event: PointerEvent) -> Self {
        Self {
            events: vec![event],
        }
    }

    pub fn push(&mut self, event: PointerEvent) {
        self.events.push(event);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn events(&self) -> &[PointerEvent] {
        &self.events
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PointerEvent> {
        self.events.iter()
    }
}

impl IntoIterator for PointerBatch {
    type Item = PointerEvent;
    type IntoIter = std::vec::IntoIter<PointerEvent>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.into_iter()
    }
}

impl<'a> IntoIterator for &'a PointerBatch {
    type Item = &'a PointerEvent;
    type IntoIter = std::slice::Iter<'a, PointerEvent>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}

impl FromIterator<PointerEvent> for PointerBatch {
    fn from_iter<I: IntoIterator<Item = PointerEvent>>(iter: I) -> Self {
        Self {
            events: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancel_and_up_both_release() {
        assert!(!Phase::Up.is_down());
        assert!(!Phase::Cancel.is_down());
        assert!(Phase::Down.is_down());
        assert!(Phase::Move.is_down());
        assert!(Phase::Cancel.is_terminal());
        assert!(!Phase::Move.is_terminal());
    }

    #[test]
    fn batch_keeps_push_order() {
        let mut batch = PointerBatch::new();
        batch.push(PointerEvent::new(PointerId(3), Phase::Move, 1.0, 2.0));
        batch.push(PointerEvent::new(PointerId(1), Phase::Move, 3.0, 4.0));

        let ids: Vec<_> = batch.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![PointerId(3), PointerId(1)]);
        assert_eq!(batch.len(), 2);
    }
}
