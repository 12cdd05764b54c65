//! Transform application for `transform` nodes.
//!
//! Grounded in `agent_flow.engine.executor.WorkflowExecution._execute_transform_node`.

use serde_json::Value;

/// The transform kinds a `transform` node can declare via `config.transform_type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformType {
    Passthrough,
    Extract,
    Template,
    Json,
}

impl TransformType {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "extract" => Self::Extract,
            "template" => Self::Template,
            "json" => Self::Json,
            _ => Self::Passthrough,
        }
    }
}

/// Applies a transform to `input`, using `transform_config` for the
/// transform's own parameters (`field_path` for `extract`, `template` for
/// `template`). Failures degrade to returning the input unchanged — a
/// transform node never raises on bad configuration, it just passes through.
pub fn apply(
    transform_type: TransformType,
    input: &Value,
    transform_config: &serde_json::Map<String, Value>,
) -> Value {
    match transform_type {
        TransformType::Passthrough => input.clone(),
        TransformType::Extract => {
            let field_path = transform_config
                .get("field_path")
                .and_then(|v| v.as_str())
                .unwrap_or("");
            if field_path.is_empty() {
                input.clone()
            } else {
                extract_field_path(input, field_path).unwrap_or(Value::Null)
            }
        }
        TransformType::Template => {
            let template = transform_config
                .get("template")
                .and_then(|v| v.as_str())
                .unwrap_or("${input}");
            let input_str = value_as_text(input);
            Value::String(template.replace("${input}", &input_str))
        }
        TransformType::Json => match input {
            Value::String(s) => serde_json::from_str(s).unwrap_or_else(|_| input.clone()),
            other => other.clone(),
        },
    }
}

/// Walks a dotted field path through nested objects and numeric-indexed
/// arrays, e.g. `"weather.forecast.0.summary"`.
fn extract_field_path(value: &Value, field_path: &str) -> Option<Value> {
    let mut current = value.clone();
    for part in field_path.split('.') {
        current = match current {
            Value::Object(ref map) => map.get(part)?.clone(),
            Value::Array(ref arr) => {
                let index: usize = part.parse().ok()?;
                arr.get(index)?.clone()
            }
            _ => return None,
        };
    }
    Some(current)
}

/// Projects any JSON value to its text form the way the source's
/// `MessageValue.__str__` does: a bare string is returned as-is, everything
/// else is serialized as JSON.
pub fn value_as_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => serde_json::to_string(other).unwrap_or_default(),
    }
}
