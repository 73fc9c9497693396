//! Frame result → observer messages

use dynamo_core::{FrameResult, MessageValue};

/// Receives the typed messages of each frame, on the render thread.
///
/// Delivery order between distinct keys of one frame is unspecified.
pub trait MessageObserver {
    fn on_message(&mut self, key: &str, value: MessageValue);
}

impl<F> MessageObserver for F
where
    F: FnMut(&str, MessageValue),
{
    fn on_message(&mut self, key: &str, value: MessageValue) {
        self(key, value)
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DrainReport {
    pub delivered: usize,
    pub dropped: usize,
}

pub struct ResultDrainer;

impl ResultDrainer {
    /// Delivers every supported entry of `result` before returning.
    /// Entries of unsupported type are logged and skipped.
    pub fn drain<O>(result: Option<FrameResult>, observer: &mut O) -> DrainReport
    where
        O: MessageObserver + ?Sized,
    {
        let mut report = DrainReport::default();
        let Some(result) = result else {
            return report;
        };

        for (key, value) in result {
            match MessageValue::try_from(value) {
                Ok(value) => {
                    observer.on_message(&key, value);
                    report.delivered += 1;
                }
                Err(type_name) => {
                    tracing::warn!(key = %key, type_name = %type_name, "unhandled message type");
                    report.dropped += 1;
                }
            }
        }
        report
    }
}
