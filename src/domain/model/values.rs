//! Coercion of client-supplied JSON into the typed values field setters accept.

use serde_json::Value as JsonValue;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FieldError {
    #[error("'{key}' is not an updatable field (allowed: {allowed})")]
    Unknown { key: String, allowed: String },

    #[error("field '{field}' expects {expected}, got {got}")]
    WrongType {
        field: &'static str,
        expected: &'static str,
        got: &'static str,
    },

    #[error("field '{0}' must not be empty")]
    Empty(&'static str),
}

pub fn json_kind(v: &JsonValue) -> &'static str {
    match v {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "bool",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}

pub fn expect_string(field: &'static str, v: &JsonValue) -> Result<String, FieldError> {
    match v {
        JsonValue::String(s) => Ok(s.clone()),
        // numbers stringify for text attributes
        JsonValue::Number(n) => Ok(n.to_string()),
        other => Err(FieldError::WrongType {
            field,
            expected: "string",
            got: json_kind(other),
        }),
    }
}

pub fn expect_non_empty_string(field: &'static str, v: &JsonValue) -> Result<String, FieldError> {
    let s = expect_string(field, v)?;
    if s.trim().is_empty() {
        return Err(FieldError::Empty(field));
    }
    // stored verbatim: lookups compare the raw value
    Ok(s)
}

pub fn expect_bool(field: &'static str, v: &JsonValue) -> Result<bool, FieldError> {
    let wrong = || FieldError::WrongType {
        field,
        expected: "bool",
        got: json_kind(v),
    };
    match v {
        JsonValue::Bool(b) => Ok(*b),
        JsonValue::String(s) => match s.trim().to_lowercase().as_str() {
            "true" | "t" | "1" => Ok(true),
            "false" | "f" | "0" => Ok(false),
            _ => Err(wrong()),
        },
        _ => Err(wrong()),
    }
}

pub fn expect_string_list(field: &'static str, v: &JsonValue) -> Result<Vec<String>, FieldError> {
    let items = v.as_array().ok_or(FieldError::WrongType {
        field,
        expected: "array of strings",
        got: json_kind(v),
    })?;
    items
        .iter()
        .map(|item| match item {
            JsonValue::String(s) => Ok(s.clone()),
            other => Err(FieldError::WrongType {
                field,
                expected: "array of strings",
                got: json_kind(other),
            }),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn bools_accept_common_string_forms() {
        assert_eq!(expect_bool("featured", &json!(true)), Ok(true));
        assert_eq!(expect_bool("featured", &json!("False")), Ok(false));
        assert_eq!(expect_bool("featured", &json!(" t ")), Ok(true));
        assert!(expect_bool("featured", &json!("maybe")).is_err());
        assert!(expect_bool("featured", &json!(1)).is_err());
    }

    #[test]
    fn string_lists_reject_mixed_items() {
        assert_eq!(
            expect_string_list("images", &json!(["a.png", "b.png"])),
            Ok(vec!["a.png".to_string(), "b.png".to_string()])
        );
        assert_eq!(
            expect_string_list("images", &json!(["a.png", 3])),
            Err(FieldError::WrongType {
                field: "images",
                expected: "array of strings",
                got: "number"
            })
        );
        assert!(expect_string_list("images", &json!("a.png")).is_err());
    }

    #[test]
    fn strings_accept_numbers_but_not_objects() {
        assert_eq!(expect_string("alt", &json!(42)), Ok("42".to_string()));
        assert!(expect_string("alt", &json!({ "x": 1 })).is_err());
        assert_eq!(
            expect_non_empty_string("name", &json!("   ")),
            Err(FieldError::Empty("name"))
        );
        assert_eq!(
            expect_non_empty_string("name", &json!(" Vase ")),
            Ok(" Vase ".to_string())
        );
    }
}
