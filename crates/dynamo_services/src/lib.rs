//! Dynamo Services Layer
//!
//! Platform-facing helpers: touch input normalization and host settings.

pub mod input;
pub mod settings;

pub use input::{PointerTracker, RawAction, RawContact, RawSample, TrackError};
pub use settings::{Settings, SettingsError, SettingsOrigin};
