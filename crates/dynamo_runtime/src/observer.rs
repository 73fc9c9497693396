//! Host-side message observer
//!
//! Logs every script message and, when enabled, prints it to stdout as one
//! JSON object per line for whatever is wrapping the process.

use dynamo_core::{Message, MessageValue};
use dynamo_script::MessageObserver;
use std::io::Write;

pub struct LogObserver<W> {
    json_lines: Option<W>,
    delivered: u64,
}

impl LogObserver<std::io::Stdout> {
    pub fn stdout(json_lines: bool) -> Self {
        Self::new(json_lines.then(std::io::stdout))
    }
}

impl<W: Write> LogObserver<W> {
    pub fn new(json_lines: Option<W>) -> Self {
        Self {
            json_lines,
            delivered: 0,
        }
    }

    pub fn delivered(&self) -> u64 {
        self.delivered
    }

    fn write_line(&mut self, message: &Message) -> anyhow::Result<()> {
        if let Some(out) = self.json_lines.as_mut() {
            serde_json::to_writer(&mut *out, message)?;
            out.write_all(b"\n")?;
            out.flush()?;
        }
        Ok(())
    }
}

impl<W: Write> MessageObserver for LogObserver<W> {
    fn on_message(&mut self, key: &str, value: MessageValue) {
        self.delivered += 1;
        tracing::info!(target: "dynamo::message", key, value = %value, "script message");

        if let Err(err) = self.write_line(&Message::new(key, value)) {
            tracing::warn!(key, error = %err, "failed to write message line");
        }
    }
}
