use serde_json::Value;
use std::io::{self, Read};

/// Read a piped scenario JSON document from stdin, if one is there.
///
/// Returns `None` when stdin is a TTY or the pipe carries nothing but
/// whitespace, so callers fall through to flag-based input.
pub fn read_stdin() -> Result<Option<Value>, Box<dyn std::error::Error>> {
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }

    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;

    let trimmed = buffer.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let value: Value = serde_json::from_str(trimmed)
        .map_err(|e| format!("Piped input is not valid scenario JSON: {}", e))?;
    Ok(Some(value))
}
