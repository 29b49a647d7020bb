use serde_json::Value;

/// Pretty-print the full computation envelope as JSON.
///
/// The default format: scenario result plus methodology, assumptions,
/// warnings, and metadata, suitable for piping into other tooling.
pub fn print_json(value: &Value) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{}", s),
        Err(e) => eprintln!("Failed to render scenario output as JSON: {}", e),
    }
}
