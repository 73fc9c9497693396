//! Touch input normalization
//!
//! Turns one raw multi-contact sample into a [`PointerBatch`] of per-finger
//! transitions. Raw samples use the Android `MotionEvent` action encoding:
//! the low byte is the action kind, the next byte the index of the contact
//! that changed (secondary down/up only).

use dynamo_core::{Phase, PointerBatch, PointerEvent, PointerId};
use thiserror::Error;

pub const ACTION_MASK: u32 = 0xff;
pub const ACTION_POINTER_INDEX_MASK: u32 = 0xff00;
pub const ACTION_POINTER_INDEX_SHIFT: u32 = 8;

pub const ACTION_DOWN: u32 = 0;
pub const ACTION_UP: u32 = 1;
pub const ACTION_MOVE: u32 = 2;
pub const ACTION_CANCEL: u32 = 3;
pub const ACTION_POINTER_DOWN: u32 = 5;
pub const ACTION_POINTER_UP: u32 = 6;

/// Decoded action of a raw sample.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RawAction {
    /// First contact touched down (always raw index 0).
    Down,
    /// Another contact touched down while others are active.
    PointerDown { index: usize },
    /// One or more active contacts moved.
    Move,
    /// Last contact lifted (always raw index 0).
    Up,
    /// One of several active contacts lifted.
    PointerUp { index: usize },
    /// The platform aborted the gesture.
    Cancel,
}

impl RawAction {
    /// `None` for action kinds the bridge does not track (hover, scroll, ...).
    pub fn decode(action: u32) -> Option<Self> {
        let index = ((action & ACTION_POINTER_INDEX_MASK) >> ACTION_POINTER_INDEX_SHIFT) as usize;
        match action & ACTION_MASK {
            ACTION_DOWN => Some(RawAction::Down),
            ACTION_UP => Some(RawAction::Up),
            ACTION_MOVE => Some(RawAction::Move),
            ACTION_CANCEL => Some(RawAction::Cancel),
            ACTION_POINTER_DOWN => Some(RawAction::PointerDown { index }),
            ACTION_POINTER_UP => Some(RawAction::PointerUp { index }),
            _ => None,
        }
    }

    pub fn encode(self) -> u32 {
        let with_index = |kind: u32, index: usize| {
            kind | (((index as u32) << ACTION_POINTER_INDEX_SHIFT) & ACTION_POINTER_INDEX_MASK)
        };
        match self {
            RawAction::Down => ACTION_DOWN,
            RawAction::Up => ACTION_UP,
            RawAction::Move => ACTION_MOVE,
            RawAction::Cancel => ACTION_CANCEL,
            RawAction::PointerDown { index } => with_index(ACTION_POINTER_DOWN, index),
            RawAction::PointerUp { index } => with_index(ACTION_POINTER_UP, index),
        }
    }
}

/// One active contact, top-left origin.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RawContact {
    pub id: PointerId,
    pub x: f32,
    pub y: f32,
}

impl RawContact {
    pub fn new(id: u32, x: f32, y: f32) -> Self {
        Self {
            id: PointerId(id),
            x,
            y,
        }
    }
}

/// Snapshot of all active contacts plus the encoded action that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct RawSample {
    pub action: u32,
    pub contacts: Vec<RawContact>,
}

impl RawSample {
    pub fn new(action: RawAction, contacts: Vec<RawContact>) -> Self {
        Self {
            action: action.encode(),
            contacts,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrackError {
    #[error("sample references contact index {index} but only {available} contacts are active")]
    MissingContact { index: usize, available: usize },
}

/// Stateless sample → batch conversion.
#[derive(Debug, Default, Copy, Clone)]
pub struct PointerTracker;

impl PointerTracker {
    pub fn new() -> Self {
        Self
    }

    pub fn track(&self, sample: &RawSample, surface_height: f32) -> Result<PointerBatch, TrackError> {
        let Some(action) = RawAction::decode(sample.action) else {
            tracing::trace!(action = sample.action, "ignoring untracked touch action");
            return Ok(PointerBatch::new());
        };

        let batch = match action {
            RawAction::Down => Self::single(sample, 0, Phase::Down, surface_height)?,
            RawAction::Up => Self::single(sample, 0, Phase::Up, surface_height)?,
            RawAction::PointerDown { index } => {
                Self::single(sample, index, Phase::Down, surface_height)?
            }
            RawAction::PointerUp { index } => {
                Self::single(sample, index, Phase::Up, surface_height)?
            }
            RawAction::Move => Self::all(sample, Phase::Move, surface_height),
            RawAction::Cancel => Self::all(sample, Phase::Cancel, surface_height),
        };
        Ok(batch)
    }

    fn single(
        sample: &RawSample,
        index: usize,
        phase: Phase,
        surface_height: f32,
    ) -> Result<PointerBatch, TrackError> {
        let contact = sample
            .contacts
            .get(index)
            .ok_or(TrackError::MissingContact {
                index,
                available: sample.contacts.len(),
            })?;
        Ok(PointerBatch::single(flip(contact, phase, surface_height)))
    }

    fn all(sample: &RawSample, phase: Phase, surface_height: f32) -> PointerBatch {
        sample
            .contacts
            .iter()
            .map(|contact| flip(contact, phase, surface_height))
            .collect()
    }
}

/// Moves a contact into the bottom-left-origin space.
fn flip(contact: &RawContact, phase: Phase, surface_height: f32) -> PointerEvent {
    PointerEvent::new(contact.id, phase, contact.x, surface_height - contact.y)
}
