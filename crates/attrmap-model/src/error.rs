//! Error types for records and construction.

use std::fmt;

use thiserror::Error;

/// Errors moving a record to or from its field representation.
#[derive(Debug, Error)]
pub enum RecordError {
    /// The record did not serialize to an object of named fields.
    #[error("{type_name} does not serialize to a set of named fields")]
    NotAnObject { type_name: &'static str },

    #[error("failed to read fields of {type_name}: {source}")]
    Serialize {
        type_name: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to assign fields to {type_name}: {source}")]
    Deserialize {
        type_name: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

/// Model-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub struct ValidationError {
    model: String,
    violations: Vec<FieldViolation>,
}

impl ValidationError {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            violations: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_violation(mut self, field: impl Into<String>, message: impl Into<String>) -> Self {
        self.violations.push(FieldViolation {
            field: field.into(),
            message: message.into(),
        });
        self
    }

    /// One "field required" violation per missing field.
    pub fn missing_fields(model: impl Into<String>, fields: &[String]) -> Self {
        fields
            .iter()
            .fold(Self::new(model), |err, field| err.with_violation(field, "field required"))
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn violations(&self) -> &[FieldViolation] {
        &self.violations
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let count = self.violations.len();
        let noun = if count == 1 { "error" } else { "errors" };
        write!(f, "{count} validation {noun} for {}", self.model)?;
        for violation in &self.violations {
            write!(f, "\n{}: {}", violation.field, violation.message)?;
        }
        Ok(())
    }
}

/// Errors raised by a record constructor.
#[derive(Debug, Error)]
pub enum ConstructError {
    /// Required parameters without a supplied argument.
    #[error("{type_name}() missing {}", describe_missing(.missing))]
    MissingArguments {
        type_name: &'static str,
        missing: Vec<String>,
    },

    #[error(transparent)]
    Record(#[from] RecordError),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Result type for record operations.
pub type Result<T> = std::result::Result<T, ConstructError>;

fn describe_missing(missing: &[String]) -> String {
    let noun = if missing.len() == 1 { "argument" } else { "arguments" };
    format!("{} required {noun}: {}", missing.len(), quoted_list(missing))
}

fn quoted_list(names: &[String]) -> String {
    let quoted: Vec<String> = names.iter().map(|n| format!("'{n}'")).collect();
    match quoted.split_last() {
        None => String::new(),
        Some((last, [])) => last.clone(),
        Some((last, rest)) => format!("{} and {last}", rest.join(", ")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_arguments_display() {
        let one = ConstructError::MissingArguments {
            type_name: "Target",
            missing: vec!["name".to_string()],
        };
        insta::assert_snapshot!(one.to_string(), @"Target() missing 1 required argument: 'name'");

        let many = ConstructError::MissingArguments {
            type_name: "Target",
            missing: vec!["age".to_string(), "email".to_string(), "name".to_string()],
        };
        insta::assert_snapshot!(
            many.to_string(),
            @"Target() missing 3 required arguments: 'age', 'email' and 'name'"
        );
    }

    #[test]
    fn validation_error_lists_violations() {
        let err = ValidationError::new("User")
            .with_violation("age", "age must be positive")
            .with_violation("email", "not an email");

        assert_eq!(err.violations().len(), 2);
        assert_eq!(
            err.to_string(),
            "2 validation errors for User\nage: age must be positive\nemail: not an email"
        );
    }

    #[test]
    fn missing_fields_builds_one_violation_each() {
        let err = ValidationError::missing_fields("User", &["user_name_alias".to_string()]);
        assert_eq!(
            err.to_string(),
            "1 validation error for User\nuser_name_alias: field required"
        );
    }
}
