//! Demonstration units and their execution results.

use std::fmt;

use serde::Serialize;

use crate::error::UnitError;
use crate::value::Render;

type Action = Box<dyn Fn() -> Result<String, UnitError> + Send + Sync>;

/// A named, self-contained demonstration.
pub struct DemonstrationUnit {
    name: String,
    topic: String,
    action: Action,
}

impl DemonstrationUnit {
    /// Wraps any closure whose success value can be rendered.
    pub fn new<F, T>(name: impl Into<String>, action: F) -> Self
    where
        F: Fn() -> Result<T, UnitError> + Send + Sync + 'static,
        T: Render,
    {
        Self {
            name: name.into(),
            topic: String::new(),
            action: Box::new(move || action().map(|value| value.render())),
        }
    }

    pub fn with_topic(mut self, topic: impl Into<String>) -> Self {
        self.topic = topic.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Runs the action and renders its value.
    pub fn invoke(&self) -> Result<String, UnitError> {
        (self.action)()
    }
}

impl fmt::Debug for DemonstrationUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DemonstrationUnit")
            .field("name", &self.name)
            .field("topic", &self.topic)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status")]
pub enum Outcome {
    #[serde(rename = "ok")]
    Succeeded { value: String },
    #[serde(rename = "error")]
    Failed { message: String },
}

impl Outcome {
    pub fn succeeded(value: impl Into<String>) -> Self {
        Outcome::Succeeded {
            value: value.into(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Outcome::Failed {
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Succeeded { .. })
    }
}

/// What happened when one unit ran.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExecutionResult {
    #[serde(rename = "unit")]
    pub unit_name: String,
    #[serde(flatten)]
    pub outcome: Outcome,
}

impl ExecutionResult {
    pub fn new(unit_name: impl Into<String>, outcome: Outcome) -> Self {
        Self {
            unit_name: unit_name.into(),
            outcome,
        }
    }
}

/// `<name>: OK (<value>)` or `<name>: ERROR (<message>)`, always one line.
impl fmt::Display for ExecutionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = escape_control(&self.unit_name);
        match &self.outcome {
            Outcome::Succeeded { value } => write!(f, "{name}: OK ({})", escape_control(value)),
            Outcome::Failed { message } => {
                write!(f, "{name}: ERROR ({})", escape_control(message))
            }
        }
    }
}

/// Escapes control characters so text fits on a single output line.
pub fn escape_control(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            c if c.is_control() => escaped.extend(c.escape_unicode()),
            c => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;

    #[test]
    fn test_unit_renders_value() {
        let unit = DemonstrationUnit::new("list", || Ok(vec![1_i64, 2, 3]));
        assert_eq!(unit.invoke(), Ok("[1,2,3]".to_string()));
    }

    #[test]
    fn test_unit_returning_nothing_is_none() {
        let unit = DemonstrationUnit::new("print", || Ok(()));
        assert_eq!(unit.invoke(), Ok("None".to_string()));
    }

    #[test]
    fn test_non_finite_floats_keep_their_value() {
        let nan = DemonstrationUnit::new("nan", || Ok(f64::NAN));
        let inf = DemonstrationUnit::new("inf", || Ok(f64::INFINITY));
        assert_eq!(nan.invoke(), Ok("NaN".to_string()));
        assert_eq!(inf.invoke(), Ok("inf".to_string()));
    }

    #[test]
    fn test_map_with_tuple_keys_succeeds() {
        let unit = DemonstrationUnit::new("pairs", || Ok(HashMap::from([((1_i32, 2_i32), "a")])));
        assert_eq!(unit.invoke(), Ok(r#"{[1,2]:"a"}"#.to_string()));
    }

    #[test]
    fn test_unit_error_passes_through() {
        let unit = DemonstrationUnit::new("boom", || -> Result<(), UnitError> {
            Err(UnitError::value("bad"))
        });
        assert_eq!(unit.invoke(), Err(UnitError::value("bad")));
    }

    #[test]
    fn test_topic() {
        let unit = DemonstrationUnit::new("x", || Ok(1)).with_topic("Primitive types");
        assert_eq!(unit.topic(), "Primitive types");
        assert_eq!(unit.name(), "x");
    }

    #[test]
    fn test_result_line_format() {
        let ok = ExecutionResult::new("double", Outcome::succeeded("4"));
        let err = ExecutionResult::new("boom", Outcome::failed("bad"));
        assert_eq!(ok.to_string(), "double: OK (4)");
        assert_eq!(err.to_string(), "boom: ERROR (bad)");
    }

    #[test]
    fn test_result_line_escapes_newlines() {
        let ok = ExecutionResult::new("text", Outcome::succeeded("a\nb"));
        let err = ExecutionResult::new("multi", Outcome::failed("line1\r\nline2\u{7}"));
        assert_eq!(ok.to_string(), "text: OK (a\\nb)");
        assert_eq!(err.to_string(), "multi: ERROR (line1\\r\\nline2\\u{7})");
    }

    #[test]
    fn test_escape_control_keeps_printable_text() {
        assert_eq!(escape_control(r#"{"a":1} ünï"#), r#"{"a":1} ünï"#);
    }

    #[test]
    fn test_result_json_shape() {
        let ok = ExecutionResult::new("double", Outcome::succeeded("4"));
        let err = ExecutionResult::new("boom", Outcome::failed("bad"));
        assert_eq!(
            serde_json::to_value(&ok).unwrap(),
            json!({"unit": "double", "status": "ok", "value": "4"})
        );
        assert_eq!(
            serde_json::to_value(&err).unwrap(),
            json!({"unit": "boom", "status": "error", "message": "bad"})
        );
    }
}
