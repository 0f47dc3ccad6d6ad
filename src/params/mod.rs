//! Route parameters and typed access to them.
//!
//! Parameters are a string keyed bag of [serde_json::Value]s. Query string
//! and path values always arrive as strings, values passed in code keep
//! their JSON type. The [ParamsExt] accessors convert between the two.

mod store;

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::route::{Error, Result};

pub use store::ObjectStore;

pub type Params = BTreeMap<String, Value>;

pub trait ParamsExt {
    fn require_string(&self, key: &str) -> Result<String>;
    fn require_int(&self, key: &str) -> Result<i32>;
    fn require_long(&self, key: &str) -> Result<i64>;
    fn require_double(&self, key: &str) -> Result<f64>;
    fn require_float(&self, key: &str) -> Result<f32>;
    fn require_bool(&self, key: &str) -> Result<bool>;
    fn require_list(&self, key: &str) -> Result<Vec<Value>>;
    fn require_map(&self, key: &str) -> Result<Map<String, Value>>;

    fn opt_string(&self, key: &str) -> Option<String> {
        self.require_string(key).ok()
    }

    fn opt_int(&self, key: &str, default: i32) -> i32 {
        self.require_int(key).unwrap_or(default)
    }

    fn opt_long(&self, key: &str, default: i64) -> i64 {
        self.require_long(key).unwrap_or(default)
    }

    fn opt_double(&self, key: &str, default: f64) -> f64 {
        self.require_double(key).unwrap_or(default)
    }

    fn opt_float(&self, key: &str, default: f32) -> f32 {
        self.require_float(key).unwrap_or(default)
    }

    fn opt_bool(&self, key: &str, default: bool) -> bool {
        self.require_bool(key).unwrap_or(default)
    }

    fn opt_list(&self, key: &str) -> Option<Vec<Value>> {
        self.require_list(key).ok()
    }

    fn opt_map(&self, key: &str) -> Option<Map<String, Value>> {
        self.require_map(key).ok()
    }
}

fn describe(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Array(_) => "list".to_string(),
        Value::Object(_) => "map".to_string(),
        other => other.to_string(),
    }
}

fn convert<T>(
    params: &Params,
    key: &str,
    type_name: &str,
    conversion: impl FnOnce(&Value) -> Option<T>,
) -> Result<T> {
    let value = params
        .get(key)
        .filter(|value| !value.is_null())
        .ok_or_else(|| Error::param(key, format!("Missing required param: {key}")))?;
    conversion(value).ok_or_else(|| {
        Error::param(
            key,
            format!("Cannot convert '{}' to {type_name}", describe(value)),
        )
    })
}

fn as_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => number
            .as_i64()
            .or_else(|| number.as_f64().map(|float| float as i64)),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

fn as_float(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

impl ParamsExt for Params {
    fn require_string(&self, key: &str) -> Result<String> {
        convert(self, key, "String", |value| match value {
            Value::String(text) => Some(text.clone()),
            other => Some(other.to_string()),
        })
    }

    fn require_int(&self, key: &str) -> Result<i32> {
        convert(self, key, "Int", |value| {
            as_integer(value).and_then(|number| i32::try_from(number).ok())
        })
    }

    fn require_long(&self, key: &str) -> Result<i64> {
        convert(self, key, "Long", as_integer)
    }

    fn require_double(&self, key: &str) -> Result<f64> {
        convert(self, key, "Double", as_float)
    }

    fn require_float(&self, key: &str) -> Result<f32> {
        convert(self, key, "Float", |value| as_float(value).map(|float| float as f32))
    }

    fn require_bool(&self, key: &str) -> Result<bool> {
        convert(self, key, "Boolean", |value| match value {
            Value::Bool(flag) => Some(*flag),
            Value::String(text) => text.parse().ok(),
            Value::Number(_) => as_integer(value).map(|number| number != 0),
            _ => None,
        })
    }

    fn require_list(&self, key: &str) -> Result<Vec<Value>> {
        convert(self, key, "List", |value| value.as_array().cloned())
    }

    fn require_map(&self, key: &str) -> Result<Map<String, Value>> {
        convert(self, key, "Map", |value| value.as_object().cloned())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn params() -> Params {
        Params::from([
            ("orderId".to_string(), json!("123")),
            ("count".to_string(), json!(7)),
            ("price".to_string(), json!("9.5")),
            ("ratio".to_string(), json!(0.25)),
            ("big".to_string(), json!("9000000000")),
            ("flag".to_string(), json!("true")),
            ("one".to_string(), json!(1)),
            ("tags".to_string(), json!(["a", "b"])),
            ("meta".to_string(), json!({"k": "v"})),
            ("nothing".to_string(), Value::Null),
        ])
    }

    #[test]
    fn converts_strings_to_numbers() {
        let params = params();
        assert_eq!(params.require_int("orderId").unwrap(), 123);
        assert_eq!(params.require_long("big").unwrap(), 9_000_000_000);
        assert_eq!(params.require_double("price").unwrap(), 9.5);
        assert_eq!(params.require_float("ratio").unwrap(), 0.25);
    }

    #[test]
    fn stringifies_non_string_values() {
        let params = params();
        assert_eq!(params.require_string("count").unwrap(), "7");
        assert_eq!(params.require_string("orderId").unwrap(), "123");
        assert_eq!(params.require_string("tags").unwrap(), r#"["a","b"]"#);
        assert_eq!(params.require_string("meta").unwrap(), r#"{"k":"v"}"#);
    }

    #[test]
    fn converts_booleans() {
        let params = params();
        assert!(params.require_bool("flag").unwrap());
        assert!(params.require_bool("one").unwrap());
        assert!(params.require_bool("orderId").is_err());
    }

    #[test]
    fn missing_and_null_are_reported() {
        let params = params();
        let error = params.require_string("missing").unwrap_err();
        assert_eq!(error.to_string(), "Missing required param: missing");
        assert!(params.require_string("nothing").is_err());
    }

    #[test]
    fn unconvertible_values_are_reported() {
        let params = params();
        let error = params.require_int("flag").unwrap_err();
        assert_eq!(error.to_string(), "Cannot convert 'true' to Int");
        assert!(params.require_int("big").is_err());
        assert!(matches!(error, Error::ParamValidation { ref key, .. } if key == "flag"));
    }

    #[test]
    fn optional_accessors_fall_back_to_default() {
        let params = params();
        assert_eq!(params.opt_int("missing", 5), 5);
        assert_eq!(params.opt_int("flag", 5), 5);
        assert_eq!(params.opt_int("count", 5), 7);
        assert!(!params.opt_bool("missing", false));
        assert_eq!(params.opt_string("missing"), None);
    }

    #[test]
    fn collections() {
        let params = params();
        assert_eq!(params.require_list("tags").unwrap(), vec![json!("a"), json!("b")]);
        assert_eq!(params.opt_map("meta").unwrap().get("k"), Some(&json!("v")));
        assert_eq!(params.opt_list("meta"), None);
    }
}
