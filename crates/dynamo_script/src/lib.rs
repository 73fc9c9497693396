//! Dynamo Scripting Bridge
//!
//! Drives a QuickJS context from the render thread: boot, touch injection,
//! one `cycle()` per frame, and conversion of what `cycle()` returns into
//! typed observer messages.
//!
//! ## Architecture
//!
//! - **runtime:** [`RuntimeBridge`] owns the context (`!Send`, render thread only)
//! - **loader:** search-path module resolution (`<dir>/<name>.js`, `<dir>/<name>/init.js`)
//! - **ffi:** plain data crossing the boundary (touch arguments, frame results)
//! - **drain:** [`ResultDrainer`] dispatches frame results to a [`MessageObserver`]

pub mod drain;
pub mod error;
pub mod ffi;
pub mod loader;
pub mod runtime;

pub use drain::{DrainReport, MessageObserver, ResultDrainer};
pub use error::{CallError, InitError};
pub use loader::SearchPathResolver;
pub use runtime::{BootConfig, BridgeState, RuntimeBridge, ScriptHost};

pub use rquickjs;
