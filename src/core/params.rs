//! Task parameters - typed configuration with bindable fields

use serde_json::Value;

use crate::core::binding::InputBinding;
use crate::core::context::ExecutionContext;
use crate::core::error::BindingError;

/// Longest parameter value the engine will echo into the log
pub const MAX_LOGGED_VALUE_LEN: usize = 5000;

/// Configuration object of a concrete task type
///
/// Fields keep their statically-assigned defaults unless a binding for them
/// resolves to a value in [`TaskParams::load_results`].
pub trait TaskParams: Send {
    /// Replace the declared binding set (empty input is a no-op)
    fn load_bindings(&mut self, bindings: Vec<InputBinding>);

    /// Resolve every declared binding against the context and assign the
    /// fetched values to the corresponding fields
    ///
    /// Fields with no declared binding, or whose binding's source value is
    /// absent, are silently left at their defaults.
    fn load_results(&mut self, ctx: &ExecutionContext) -> Result<(), BindingError>;

    /// Property-by-property dump of the resolved parameters, logged by the
    /// engine right before execution
    fn snapshot(&self) -> Vec<(String, String)>;
}

/// Truncate a value for the diagnostic snapshot
pub fn truncate_for_log(s: &str) -> String {
    if s.len() <= MAX_LOGGED_VALUE_LEN {
        return s.to_string();
    }
    let mut end = MAX_LOGGED_VALUE_LEN;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &s[..end])
}

/// Append one parameter field to a snapshot
///
/// Object-valued fields are flattened to one `key:value` entry per member;
/// everything else becomes a single entry. String values are logged bare
/// (no surrounding quotes) and bounded by [`MAX_LOGGED_VALUE_LEN`].
pub fn snapshot_field(out: &mut Vec<(String, String)>, name: &str, value: &Value) {
    match value {
        Value::Object(map) => {
            for (key, member) in map {
                out.push((key.clone(), truncate_for_log(&render_value(member))));
            }
        }
        other => out.push((name.to_string(), truncate_for_log(&render_value(other)))),
    }
}

fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
