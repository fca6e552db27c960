use serde_json::Value;

const TRACE_POINTERS: [&str; 2] = ["/deterministic/razonamiento", "/razonamiento"];

/// Reasoning trace carried by a diagnosis response, if any. A field that is
/// present but not a string counts as missing.
pub fn reasoning_trace(response: &Value) -> Option<&str> {
    TRACE_POINTERS
        .iter()
        .find_map(|pointer| response.pointer(pointer))
        .and_then(Value::as_str)
}
