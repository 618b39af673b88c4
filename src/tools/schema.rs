//! Tool schemas
//!
//! JSON Schema for tool arguments plus the MCP annotations clients use to
//! decide whether a call needs confirmation.

use serde::Serialize;
use serde_json::{json, Value};

/// Behaviour hints published with each tool
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ToolAnnotations {
    pub title: String,
    #[serde(rename = "readOnlyHint")]
    pub read_only: bool,
    #[serde(rename = "destructiveHint")]
    pub destructive: bool,
    #[serde(rename = "openWorldHint")]
    pub open_world: bool,
}

/// JSON Schema for tool parameters
#[derive(Debug, Clone)]
pub struct ToolSchema {
    /// Tool name (snake_case)
    pub name: String,
    /// Human-readable description
    pub description: String,
    /// JSON Schema for parameters
    pub parameters: Value,
    /// Required parameter names
    pub required: Vec<String>,
    pub annotations: ToolAnnotations,
    /// Progress message sent when the call starts
    pub start_message: String,
}

impl ToolSchema {
    /// Create a read-only tool schema; chain `writes()` / `destructive()` to
    /// change the hints
    pub fn new(name: &str, title: &str, description: &str) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            parameters: json!({
                "type": "object",
                "properties": {}
            }),
            required: vec![],
            annotations: ToolAnnotations {
                title: title.to_string(),
                read_only: true,
                destructive: false,
                open_world: true,
            },
            start_message: format!("Starting {}", title.to_lowercase()),
        }
    }

    /// The tool changes state on LinkedIn
    pub fn writes(mut self) -> Self {
        self.annotations.read_only = false;
        self
    }

    /// The tool removes or undoes something
    pub fn destructive(mut self) -> Self {
        self.annotations.read_only = false;
        self.annotations.destructive = true;
        self
    }

    /// The tool only touches the signed-in member's own data
    pub fn closed_world(mut self) -> Self {
        self.annotations.open_world = false;
        self
    }

    pub fn with_start_message(mut self, message: &str) -> Self {
        self.start_message = message.to_string();
        self
    }

    fn with_param(mut self, name: &str, property: Value, required: bool) -> Self {
        if let Some(props) = self.parameters.get_mut("properties") {
            props[name] = property;
        }
        if required {
            self.required.push(name.to_string());
        }
        self
    }

    /// Add a string parameter
    pub fn with_string_param(self, name: &str, description: &str, required: bool) -> Self {
        self.with_param(
            name,
            json!({ "type": "string", "description": description }),
            required,
        )
    }

    /// Add an integer parameter with a default
    pub fn with_int_param(self, name: &str, description: &str, default: u32) -> Self {
        self.with_param(
            name,
            json!({ "type": "integer", "description": description, "default": default }),
            false,
        )
    }

    /// Add an optional boolean parameter
    pub fn with_bool_param(self, name: &str, description: &str, default: bool) -> Self {
        self.with_param(
            name,
            json!({ "type": "boolean", "description": description, "default": default }),
            false,
        )
    }

    /// Add an enum parameter
    pub fn with_enum_param(self, name: &str, description: &str, values: &[&str], required: bool) -> Self {
        self.with_param(
            name,
            json!({ "type": "string", "description": description, "enum": values }),
            required,
        )
    }

    /// Publish the value used when an optional parameter is omitted
    pub fn with_default(mut self, name: &str, default: Value) -> Self {
        if let Some(property) = self.parameters["properties"].get_mut(name) {
            property["default"] = default;
        }
        self
    }

    /// Add an object parameter whose values are strings
    pub fn with_map_param(self, name: &str, description: &str) -> Self {
        self.with_param(
            name,
            json!({
                "type": "object",
                "description": description,
                "additionalProperties": { "type": "string" }
            }),
            false,
        )
    }

    /// Validate parameters against schema
    pub fn validate(&self, params: &Value) -> Result<(), String> {
        if !params.is_object() {
            return Err("Arguments must be an object".to_string());
        }

        // Check required parameters
        for req in &self.required {
            if params.get(req).map_or(true, Value::is_null) {
                return Err(format!("Missing required parameter: {}", req));
            }
        }

        let Some(props) = self.parameters.get("properties").and_then(Value::as_object) else {
            return Ok(());
        };
        for (name, schema) in props {
            let Some(value) = params.get(name) else {
                continue;
            };
            // Optional arguments may be sent as explicit nulls
            if value.is_null() && !self.required.contains(name) {
                continue;
            }
            let expected_type = schema.get("type").and_then(Value::as_str);
            let valid = match expected_type {
                Some("string") => value.is_string(),
                Some("integer") => value.is_u64() || value.is_i64(),
                Some("number") => value.is_number(),
                Some("boolean") => value.is_boolean(),
                Some("array") => value.is_array(),
                Some("object") => value.as_object().map_or(false, |map| {
                    map.values().all(|v| v.is_string() || v.is_number() || v.is_boolean())
                }),
                _ => true,
            };
            if !valid {
                return Err(format!(
                    "Parameter '{}' has wrong type, expected {}",
                    name,
                    expected_type.unwrap_or("unknown")
                ));
            }
            if let (Some(allowed), Some(given)) = (
                schema.get("enum").and_then(Value::as_array),
                value.as_str(),
            ) {
                if !allowed.iter().any(|a| a.as_str() == Some(given)) {
                    return Err(format!(
                        "Parameter '{}' must be one of {}",
                        name,
                        Value::Array(allowed.clone())
                    ));
                }
            }
        }

        Ok(())
    }

    /// Format as an MCP `tools/list` entry
    pub fn to_definition(&self) -> Value {
        json!({
            "name": self.name,
            "title": self.annotations.title,
            "description": self.description,
            "inputSchema": {
                "type": "object",
                "properties": self.parameters.get("properties").cloned().unwrap_or_else(|| json!({})),
                "required": self.required
            },
            "annotations": self.annotations
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema() -> ToolSchema {
        ToolSchema::new("search_jobs", "Search Jobs", "Search for jobs")
            .with_string_param("keywords", "Search terms", true)
            .with_string_param("location", "Location", false)
            .with_int_param("limit", "Max results", 50)
            .with_enum_param("visibility", "Who sees it", &["anyone", "connections"], false)
            .with_default("visibility", json!("anyone"))
            .with_map_param("answers", "Question answers")
    }

    #[test]
    fn test_validate_required() {
        let schema = schema();
        assert!(schema.validate(&json!({"keywords": "rust"})).is_ok());
        let err = schema.validate(&json!({"location": "Berlin"})).unwrap_err();
        assert_eq!(err, "Missing required parameter: keywords");
        assert!(schema.validate(&json!({"keywords": null})).is_err());
        assert!(schema.validate(&json!("rust")).is_err());
    }

    #[test]
    fn test_validate_types() {
        let schema = schema();
        assert!(schema.validate(&json!({"keywords": 42})).is_err());
        assert!(schema.validate(&json!({"keywords": "rust", "limit": "ten"})).is_err());
        assert!(schema.validate(&json!({"keywords": "rust", "limit": 1.5})).is_err());
        assert!(schema.validate(&json!({"keywords": "rust", "limit": 10})).is_ok());
        assert!(schema.validate(&json!({"keywords": "rust", "location": null})).is_ok());
    }

    #[test]
    fn test_validate_enum_and_map() {
        let schema = schema();
        assert!(schema
            .validate(&json!({"keywords": "k", "visibility": "connections"}))
            .is_ok());
        let err = schema
            .validate(&json!({"keywords": "k", "visibility": "public"}))
            .unwrap_err();
        assert!(err.contains("must be one of"));
        assert!(schema
            .validate(&json!({"keywords": "k", "answers": {"years": "5"}}))
            .is_ok());
        assert!(schema
            .validate(&json!({"keywords": "k", "answers": {"years": ["5"]}}))
            .is_err());
    }

    #[test]
    fn test_definition_shape() {
        let def = schema().writes().closed_world().to_definition();
        assert_eq!(def["name"], "search_jobs");
        assert_eq!(def["title"], "Search Jobs");
        assert_eq!(def["inputSchema"]["required"], json!(["keywords"]));
        assert_eq!(def["inputSchema"]["properties"]["limit"]["default"], 50);
        assert_eq!(def["inputSchema"]["properties"]["visibility"]["default"], "anyone");
        assert_eq!(def["annotations"]["readOnlyHint"], false);
        assert_eq!(def["annotations"]["destructiveHint"], false);
        assert_eq!(def["annotations"]["openWorldHint"], false);
    }

    #[test]
    fn test_destructive_implies_write() {
        let schema = ToolSchema::new("remove_connection", "Remove Connection", "").destructive();
        assert!(!schema.annotations.read_only);
        assert!(schema.annotations.destructive);
        assert_eq!(schema.start_message, "Starting remove connection");
    }
}
