//! Argument validation and JSON-Schema rendering for declared parameters.

use crate::error::ToolError;
use crate::types::{ParamType, ParameterSpec};
use serde_json::{json, Value};

/// Check `args` against `params` before any handler runs.
///
/// `null` is accepted as "no arguments". Undeclared keys are ignored.
pub fn validate_arguments(
    tool: &str,
    params: &[ParameterSpec],
    args: &Value,
) -> Result<(), ToolError> {
    let invalid = |reason: String| ToolError::Validation {
        tool: tool.to_string(),
        reason,
    };

    let empty = serde_json::Map::new();
    let obj = match args {
        Value::Null => &empty,
        Value::Object(map) => map,
        _ => return Err(invalid("arguments must be a JSON object".into())),
    };

    for spec in params {
        let value = match obj.get(&spec.name) {
            None | Some(Value::Null) => {
                if spec.required {
                    return Err(invalid(format!(
                        "missing required parameter '{}'",
                        spec.name
                    )));
                }
                continue;
            }
            Some(v) => v,
        };

        let type_ok = match spec.param_type {
            ParamType::String | ParamType::Enum => value.is_string(),
            ParamType::Number => value.is_number(),
            ParamType::Boolean => value.is_boolean(),
        };
        if !type_ok {
            return Err(invalid(format!(
                "parameter '{}' must be a {}",
                spec.name, spec.param_type
            )));
        }

        if let (Some(allowed), Some(s)) = (&spec.enum_values, value.as_str()) {
            if !allowed.iter().any(|a| a == s) {
                return Err(invalid(format!(
                    "parameter '{}' must be one of [{}], got '{}'",
                    spec.name,
                    allowed.join(", "),
                    s
                )));
            }
        }
    }

    Ok(())
}

/// Render declared parameters as a JSON Schema object for function calling.
pub fn parameters_schema(params: &[ParameterSpec]) -> Value {
    let mut properties = serde_json::Map::new();
    let mut required = Vec::new();

    for spec in params {
        let json_type = match spec.param_type {
            ParamType::String | ParamType::Enum => "string",
            ParamType::Number => "number",
            ParamType::Boolean => "boolean",
        };
        let mut prop = json!({
            "type": json_type,
            "description": spec.description,
        });
        if let Some(values) = &spec.enum_values {
            prop["enum"] = json!(values);
        }
        properties.insert(spec.name.clone(), prop);
        if spec.required {
            required.push(Value::String(spec.name.clone()));
        }
    }

    json!({
        "type": "object",
        "properties": properties,
        "required": required,
    })
}
