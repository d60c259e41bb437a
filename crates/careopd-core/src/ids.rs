//! Canonical identifier handling.
//!
//! Records arrive from more than one backend generation: some carry Mongo-style
//! `_id` strings, older seed data carries numeric `id` fields. Every identifier
//! is coerced to a canonical string at the deserialization boundary, and every
//! comparison goes through [`same`] so mixed representations never diverge.

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Canonical form of a raw identifier.
pub fn canonical(raw: &str) -> &str {
    raw.trim()
}

/// Compare two identifiers in canonical form.
pub fn same(a: &str, b: &str) -> bool {
    canonical(a) == canonical(b)
}

/// Deserialize an identifier that may be a JSON string or number.
pub fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    id_from_value(value).ok_or_else(|| DeError::custom("identifier must be a string or number"))
}

/// Deserialize an optional identifier, treating `null` as absent.
pub fn deserialize_opt_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    match value {
        Value::Null => Ok(None),
        other => id_from_value(other)
            .map(Some)
            .ok_or_else(|| DeError::custom("identifier must be a string or number")),
    }
}

fn id_from_value(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(canonical(&s).to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Record {
        #[serde(rename = "_id", alias = "id", deserialize_with = "deserialize_id")]
        id: String,
    }

    #[test]
    fn test_string_id() {
        let rec: Record = serde_json::from_str(r#"{"_id": "66a1f0c2"}"#).unwrap();
        assert_eq!(rec.id, "66a1f0c2");
    }

    #[test]
    fn test_numeric_id() {
        let rec: Record = serde_json::from_str(r#"{"id": 201}"#).unwrap();
        assert_eq!(rec.id, "201");
    }

    #[test]
    fn test_same_ignores_whitespace() {
        assert!(same(" 201", "201"));
        assert!(!same("201", "202"));
    }
}
