//! Assertions for status line output

use serde_json::Value;

/// Assert that output is valid JSON and return parsed value
pub fn assert_valid_json(output: &str, context: &str) -> Value {
    serde_json::from_str(output).unwrap_or_else(|e| {
        panic!(
            "Expected valid JSON ({}): {}\nOutput:\n{}",
            context, e, output
        )
    })
}

/// Assert a status line's severity and its `(name, state)` detail, in order
pub fn assert_status_line(line: &Value, text: &str, detail: &[(&str, &str)]) {
    assert_eq!(line["text"], text, "severity mismatch in {}", line);

    let tooltip = line["tooltip"]
        .as_array()
        .unwrap_or_else(|| panic!("tooltip is not an array: {}", line));
    let actual: Vec<(&str, &str)> = tooltip
        .iter()
        .map(|entry| {
            (
                entry["name"].as_str().unwrap_or(""),
                entry["state"].as_str().unwrap_or(""),
            )
        })
        .collect();
    assert_eq!(actual, detail, "tooltip mismatch in {}", line);
}
