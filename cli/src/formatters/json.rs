use serde::Serialize;
use std::fmt::Debug;
use std::io::{self, Write};
use tracing::warn;

/// Pretty JSON rendering with a plain-text fallback
pub struct JsonFormatter;

impl JsonFormatter {
    /// Never fails: a value that cannot be serialized is rendered with `Debug`.
    pub fn render<T: Serialize + Debug>(value: &T) -> String {
        match serde_json::to_string_pretty(value) {
            Ok(json) => json,
            Err(e) => {
                warn!("Falling back to plain output, JSON serialization failed: {}", e);
                format!("{:?}", value)
            }
        }
    }

    pub fn write_to<T: Serialize + Debug, W: Write>(value: &T, out: &mut W) -> io::Result<()> {
        writeln!(out, "{}", Self::render(value))
    }
}
