use serde_json::Value;
use tabled::{builder::Builder, Table};

/// Format output as a table using the tabled crate.
///
/// Scenario results render as field/value tables; the comparison board
/// renders one table per scenario; schedule rows render as a grid.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => {
            if let Some(result) = map.get("result") {
                print_result(result, map);
            } else {
                print_flat_object(value);
            }
        }
        Value::Array(arr) => {
            print_array_table(arr);
        }
        _ => {
            println!("{}", value);
        }
    }
}

fn print_result(result: &Value, envelope: &serde_json::Map<String, Value>) {
    match result {
        // Comparison board: every field is itself a scenario object.
        Value::Object(map) if map.values().all(|v| v.is_object()) && !map.is_empty() => {
            for (name, scenario) in map {
                println!("{}", name);
                print_flat_object(scenario);
                println!();
            }
        }
        Value::Object(map) => {
            // Schedule output carries its rows as a nested grid.
            let (rows, scalars): (Vec<_>, Vec<_>) =
                map.iter().partition(|(_, v)| v.is_array());
            if !scalars.is_empty() {
                let mut builder = Builder::default();
                builder.push_record(["Field", "Value"]);
                for (key, val) in scalars {
                    builder.push_record([key.as_str(), &format_field(key, val)]);
                }
                println!("{}", Table::from(builder));
            }
            for (_, val) in rows {
                if let Value::Array(arr) = val {
                    print_array_table(arr);
                }
            }
        }
        _ => println!("{}", result),
    }

    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings {
                if let Value::String(s) = w {
                    println!("  - {}", s);
                }
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

fn print_flat_object(value: &Value) {
    if let Value::Object(map) = value {
        let mut builder = Builder::default();
        builder.push_record(["Field", "Value"]);
        for (key, val) in map {
            builder.push_record([key.as_str(), &format_field(key, val)]);
        }
        println!("{}", Table::from(builder));
    }
}

fn print_array_table(arr: &[Value]) {
    if arr.is_empty() {
        println!("(empty)");
        return;
    }

    if let Some(Value::Object(first)) = arr.first() {
        let headers: Vec<String> = first.keys().cloned().collect();
        let mut builder = Builder::default();
        builder.push_record(&headers);

        for item in arr {
            if let Value::Object(map) = item {
                let row: Vec<String> = headers
                    .iter()
                    .map(|h| {
                        map.get(h)
                            .map(|v| format_field(h, v))
                            .unwrap_or_default()
                    })
                    .collect();
                builder.push_record(row);
            }
        }
        println!("{}", Table::from(builder));
    } else {
        for item in arr {
            println!("{}", item);
        }
    }
}

/// Percent fields display at 3 decimals; everything else as stored.
fn format_field(key: &str, value: &Value) -> String {
    if key.ends_with("_pct") {
        let raw = match value {
            Value::String(s) => s.parse::<f64>().ok(),
            Value::Number(n) => n.as_f64(),
            _ => None,
        };
        if let Some(pct) = raw {
            return format!("{:.3}%", pct);
        }
    }
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "-".to_string(),
        other => other.to_string(),
    }
}
