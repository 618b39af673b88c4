//! Typed access to validated tool arguments

use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::BTreeMap;

use super::ToolCallError;

/// Arguments of one `tools/call`, already checked against the schema
#[derive(Debug, Clone, Copy)]
pub struct Args<'a>(pub &'a Value);

impl<'a> Args<'a> {
    /// Required string argument
    pub fn str(&self, key: &str) -> Result<&'a str, ToolCallError> {
        self.0
            .get(key)
            .and_then(Value::as_str)
            .ok_or_else(|| ToolCallError::InvalidParams(format!("Missing required parameter: {}", key)))
    }

    /// Optional string argument; empty strings count as absent
    pub fn opt_str(&self, key: &str) -> Option<&'a str> {
        self.0
            .get(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    pub fn str_or(&self, key: &str, default: &'a str) -> &'a str {
        self.opt_str(key).unwrap_or(default)
    }

    /// Non-negative integer argument, saturating at `u32::MAX`
    pub fn u32_or(&self, key: &str, default: u32) -> u32 {
        self.0
            .get(key)
            .and_then(Value::as_u64)
            .map(|n| n.min(u64::from(u32::MAX)) as u32)
            .unwrap_or(default)
    }

    /// Object of scalar values, stringified
    pub fn string_map(&self, key: &str) -> BTreeMap<String, String> {
        let Some(map) = self.0.get(key).and_then(Value::as_object) else {
            return BTreeMap::new();
        };
        map.iter()
            .map(|(k, v)| {
                let v = match v {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                (k.clone(), v)
            })
            .collect()
    }

    /// Deserialize the whole argument object into a form struct
    pub fn parse<T: DeserializeOwned>(&self) -> Result<T, ToolCallError> {
        serde_json::from_value(self.0.clone()).map_err(|e| ToolCallError::InvalidParams(e.to_string()))
    }
}

/// `"S, o,,F"` to `["S", "O", "F"]`
pub fn parse_network(raw: Option<&str>) -> Vec<String> {
    raw.unwrap_or("")
        .split(',')
        .map(|n| n.trim().to_uppercase())
        .filter(|n| !n.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_string_access() {
        let value = json!({"keywords": "rust", "location": "  ", "note": null});
        let args = Args(&value);
        assert_eq!(args.str("keywords").unwrap(), "rust");
        assert!(matches!(args.str("missing"), Err(ToolCallError::InvalidParams(_))));
        assert_eq!(args.opt_str("location"), None);
        assert_eq!(args.opt_str("note"), None);
        assert_eq!(args.str_or("language", "en"), "en");
    }

    #[test]
    fn test_u32_defaults_and_saturates() {
        let value = json!({"limit": 10, "huge": 1u64 << 40, "negative": -1});
        let args = Args(&value);
        assert_eq!(args.u32_or("limit", 50), 10);
        assert_eq!(args.u32_or("missing", 50), 50);
        assert_eq!(args.u32_or("huge", 50), u32::MAX);
        assert_eq!(args.u32_or("negative", 50), 50);
    }

    #[test]
    fn test_string_map_stringifies() {
        let value = json!({"answers": {"years of experience": 5, "sponsorship": "No", "remote": true}});
        let map = Args(&value).string_map("answers");
        assert_eq!(map["years of experience"], "5");
        assert_eq!(map["sponsorship"], "No");
        assert_eq!(map["remote"], "true");
    }

    #[test]
    fn test_parse_network() {
        assert_eq!(parse_network(Some("S, o,,F")), vec!["S", "O", "F"]);
        assert!(parse_network(None).is_empty());
    }
}
