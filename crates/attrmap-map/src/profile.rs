//! Declarative mapping profiles.
//!
//! A profile describes one `add_mapping` call as data, so rule sets can live in
//! JSON or TOML configuration. Transforms are referenced by name and resolved
//! against a [`TransformRegistry`].
//!
//! # Rule shapes
//!
//! - `"new_name"`: rename
//! - `{ rename = "new_name" }`, `{ transform = "reverse" }` or both
//! - `["new_name", "reverse"]`: rename and transform
//!
//! # Example
//!
//! ```ignore
//! let profile = MappingProfile::from_toml_str(r#"
//!     exclusions = ["age"]
//!
//!     [rules]
//!     name = { transform = "reverse" }
//!     email = "contact"
//! "#)?;
//! let registration = profile.to_registration(&TransformRegistry::with_builtins())?;
//! mapper.add_mapping::<Target>(SourceSpec::of::<Source>(), registration)?;
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{MapperError, Result};
use crate::rules::{FieldRule, Registration};
use crate::transforms::TransformRegistry;

/// Serialized form of a [`Registration`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MappingProfile {
    /// Source attribute name to untyped rule.
    pub rules: BTreeMap<String, Value>,
    pub exclusions: Vec<String>,
}

impl MappingProfile {
    pub fn from_json_str(input: &str) -> Result<Self> {
        serde_json::from_str(input).map_err(|source| MapperError::ProfileJson { source })
    }

    pub fn from_toml_str(input: &str) -> Result<Self> {
        toml::from_str(input).map_err(|source| MapperError::ProfileToml { source })
    }

    /// Resolve rule shapes and transform names.
    pub fn to_registration(&self, transforms: &TransformRegistry) -> Result<Registration> {
        let mut registration = Registration::new();
        for (field, rule) in &self.rules {
            let rule = parse_rule(field, rule, transforms)?;
            registration = registration.rule(field.as_str(), rule);
        }
        for field in &self.exclusions {
            registration = registration.exclude(field.as_str());
        }
        Ok(registration)
    }
}

fn parse_rule(field: &str, rule: &Value, transforms: &TransformRegistry) -> Result<FieldRule> {
    let unsupported = |reason: String| MapperError::UnsupportedRule {
        field: field.to_string(),
        reason,
    };
    let transform = |name: &str| {
        transforms
            .get(name)
            .ok_or_else(|| unsupported(format!("unknown transform '{name}'")))
    };

    match rule {
        Value::String(name) => Ok(FieldRule::Rename(name.clone())),
        Value::Array(items) => match items.as_slice() {
            [Value::String(name), Value::String(f)] => {
                Ok(FieldRule::RenameAndTransform(name.clone(), transform(f.as_str())?))
            }
            _ => Err(unsupported(
                "expected a [name, transform] pair of strings".to_string(),
            )),
        },
        Value::Object(map) => {
            if let Some(key) = map.keys().find(|k| *k != "rename" && *k != "transform") {
                return Err(unsupported(format!("unknown key '{key}'")));
            }
            let rename = string_entry(map, "rename").map_err(&unsupported)?;
            let f = string_entry(map, "transform").map_err(&unsupported)?;
            match (rename, f) {
                (Some(name), Some(f)) => {
                    Ok(FieldRule::RenameAndTransform(name, transform(f.as_str())?))
                }
                (Some(name), None) => Ok(FieldRule::Rename(name)),
                (None, Some(f)) => Ok(FieldRule::Transform(transform(f.as_str())?)),
                (None, None) => Err(unsupported(
                    "expected 'rename' or 'transform'".to_string(),
                )),
            }
        }
        other => Err(unsupported(format!("unexpected value {other}"))),
    }
}

fn string_entry(
    map: &serde_json::Map<String, Value>,
    key: &str,
) -> std::result::Result<Option<String>, String> {
    match map.get(key) {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err(format!("'{key}' must be a string, got {other}")),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn registry() -> TransformRegistry {
        TransformRegistry::with_builtins()
    }

    #[test]
    fn parses_every_rule_shape() {
        let profile = MappingProfile::from_json_str(
            r#"{
                "rules": {
                    "a": "x",
                    "b": {"transform": "reverse"},
                    "c": {"rename": "y", "transform": "uppercase"},
                    "d": ["z", "trim"],
                    "e": {"rename": "w"}
                },
                "exclusions": ["f"]
            }"#,
        )
        .unwrap();
        let registration = profile.to_registration(&registry()).unwrap();
        let rules = registration.rules();

        assert!(matches!(rules.get("a"), FieldRule::Rename(n) if n == "x"));
        assert!(matches!(rules.get("b"), FieldRule::Transform(_)));
        assert!(matches!(rules.get("c"), FieldRule::RenameAndTransform(n, _) if n == "y"));
        assert!(matches!(rules.get("d"), FieldRule::RenameAndTransform(n, _) if n == "z"));
        assert!(matches!(rules.get("e"), FieldRule::Rename(n) if n == "w"));
        assert_eq!(registration.exclusions(), ["f".to_string()]);

        let (name, value) = rules.get("c").apply("c", json!("abc")).unwrap();
        assert_eq!((name.as_str(), value), ("y", json!("ABC")));
    }

    #[test]
    fn unsupported_shapes_are_rejected() {
        let cases = [
            json!(42),
            json!(null),
            json!(["only-one"]),
            json!(["a", 1]),
            json!({}),
            json!({"rename": 1}),
            json!({"colour": "red"}),
            json!({"transform": "nope"}),
        ];
        for rule in cases {
            let profile = MappingProfile {
                rules: BTreeMap::from([("field".to_string(), rule.clone())]),
                exclusions: Vec::new(),
            };
            let err = profile.to_registration(&registry()).unwrap_err();
            assert!(
                matches!(&err, MapperError::UnsupportedRule { field, .. } if field == "field"),
                "{rule} gave {err:?}"
            );
        }
    }

    #[test]
    fn unsupported_rule_message() {
        let profile = MappingProfile {
            rules: BTreeMap::from([("name".to_string(), json!(true))]),
            exclusions: Vec::new(),
        };
        let err = profile.to_registration(&registry()).unwrap_err();
        insta::assert_snapshot!(
            err.to_string(),
            @"Unsupported transform type for property 'name': unexpected value true"
        );
    }

    #[test]
    fn toml_profiles_load() {
        let profile = MappingProfile::from_toml_str(
            r#"
            exclusions = ["age"]

            [rules]
            name = { transform = "reverse" }
            email = "contact"
            "#,
        )
        .unwrap();

        assert_eq!(profile.exclusions, vec!["age".to_string()]);
        assert_eq!(profile.rules["email"], json!("contact"));
        assert_eq!(profile.rules["name"], json!({"transform": "reverse"}));
    }

    #[test]
    fn malformed_input_keeps_the_parse_error() {
        use std::error::Error as _;

        let err = MappingProfile::from_json_str("{\"rules\": 3}").unwrap_err();
        assert!(matches!(err, MapperError::ProfileJson { .. }));
        assert_eq!(err.to_string(), "Invalid JSON mapping profile");
        assert!(err.source().is_some_and(|s| s.is::<serde_json::Error>()));

        let err = MappingProfile::from_toml_str("unknown = 1").unwrap_err();
        assert!(matches!(err, MapperError::ProfileToml { .. }));
        assert!(err.source().is_some_and(|s| s.is::<toml::de::Error>()));
    }
}
