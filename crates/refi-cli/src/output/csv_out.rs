use serde_json::Value;
use std::io;

/// Write output as CSV to stdout.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    match value {
        Value::Object(map) => {
            match map.get("result") {
                // Schedule rows dominate their output; emit the grid.
                Some(Value::Object(result)) if result.get("rows").is_some() => {
                    if let Some(Value::Array(rows)) = result.get("rows") {
                        write_array_csv(&mut wtr, rows);
                    }
                }
                Some(Value::Object(result)) => {
                    let _ = wtr.write_record(["field", "value"]);
                    write_object_csv(&mut wtr, result, "");
                }
                _ => {
                    let _ = wtr.write_record(["field", "value"]);
                    for (key, val) in map {
                        let _ = wtr.write_record([key.as_str(), &format_csv_value(val)]);
                    }
                }
            }
        }
        Value::Array(arr) => {
            write_array_csv(&mut wtr, arr);
        }
        _ => {
            let _ = wtr.write_record([&format_csv_value(value)]);
        }
    }

    let _ = wtr.flush();
}

/// Flatten nested scenario objects as `scenario.field` rows, so the
/// comparison board stays two-column.
fn write_object_csv(
    wtr: &mut csv::Writer<io::StdoutLock<'_>>,
    map: &serde_json::Map<String, Value>,
    prefix: &str,
) {
    for (key, val) in map {
        let name = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{}.{}", prefix, key)
        };
        match val {
            Value::Object(inner) => write_object_csv(wtr, inner, &name),
            other => {
                let _ = wtr.write_record([name.as_str(), &format_csv_value(other)]);
            }
        }
    }
}

fn write_array_csv(wtr: &mut csv::Writer<io::StdoutLock<'_>>, arr: &[Value]) {
    if arr.is_empty() {
        return;
    }

    if let Some(Value::Object(first)) = arr.first() {
        let headers: Vec<&str> = first.keys().map(|k| k.as_str()).collect();
        let _ = wtr.write_record(&headers);

        for item in arr {
            if let Value::Object(map) = item {
                let row: Vec<String> = headers
                    .iter()
                    .map(|h| map.get(*h).map(format_csv_value).unwrap_or_default())
                    .collect();
                let _ = wtr.write_record(&row);
            }
        }
    } else {
        for item in arr {
            let _ = wtr.write_record([&format_csv_value(item)]);
        }
    }
}

fn format_csv_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
