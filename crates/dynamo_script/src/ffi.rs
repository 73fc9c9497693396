//! FFI layer between Rust and scripts
//!
//! Plain-data views of what crosses the boundary: touch arguments going in,
//! frame results coming out.

use dynamo_core::{FrameResult, PointerEvent, ResultValue};
use rquickjs::{Type, Value};

/// Arguments of one `postTouchEvent` call, minus the manager handle.
///
/// `Up` and `Cancel` share `is_down == false`; only `phase` tells them apart.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TouchArgs {
    pub finger: u32,
    pub is_down: bool,
    pub x: f64,
    pub y: f64,
    pub phase: &'static str,
}

impl TouchArgs {
    /// The positional part every boot script sees: `(finger, isDown, x, y)`.
    pub fn positional(&self) -> (u32, bool, f64, f64) {
        (self.finger, self.is_down, self.x, self.y)
    }
}

impl From<&PointerEvent> for TouchArgs {
    fn from(event: &PointerEvent) -> Self {
        Self {
            finger: event.id.0,
            is_down: event.phase.is_down(),
            x: f64::from(event.x),
            y: f64::from(event.y),
            phase: event.phase.as_str(),
        }
    }
}

/// Objects and arrays are table-like; anything else carries no messages.
pub fn is_table_like(value: &Value<'_>) -> bool {
    matches!(value.type_of(), Type::Object | Type::Array)
}

pub fn result_value(value: &Value<'_>) -> rquickjs::Result<ResultValue> {
    let converted = match value.type_of() {
        Type::Bool => ResultValue::Bool(value.as_bool().unwrap_or_default()),
        Type::Int | Type::Float => ResultValue::Number(value.as_number().unwrap_or_default()),
        Type::String => match value.as_string() {
            Some(string) => ResultValue::String(string.to_string()?),
            None => unsupported(Type::String),
        },
        other => unsupported(other),
    };
    Ok(converted)
}

fn unsupported(type_of: Type) -> ResultValue {
    ResultValue::Unsupported {
        type_name: format!("{type_of:?}"),
    }
}

/// Snapshot of a frame cycle's return value. `None` unless table-like.
pub fn frame_result(value: &Value<'_>) -> rquickjs::Result<Option<FrameResult>> {
    if !is_table_like(value) {
        return Ok(None);
    }
    let Some(object) = value.as_object() else {
        return Ok(None);
    };

    let mut result = FrameResult::new();
    for entry in object.props::<String, Value>() {
        let (key, value) = entry?;
        result.insert(key, result_value(&value)?);
    }
    Ok(Some(result))
}
