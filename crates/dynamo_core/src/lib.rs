//! Dynamo Core
//!
//! Contains the pieces shared by the capture and render roles:
//! - Pointer data model (ids, phases, events, batches)
//! - Frame results and typed messages
//! - The capture → render event queue
//! - Frame pacing

pub mod message;
pub mod pointer;
pub mod queue;
pub mod time;

pub use message::{FrameResult, Message, MessageValue, ResultValue};
pub use pointer::{Phase, PointerBatch, PointerEvent, PointerId};
pub use queue::{EventQueue, PointerSink, QueueClosed, QueueProducer, Task};

/// Engine version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
