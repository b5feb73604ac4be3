//! Error types for mapping operations.

use attrmap_model::{ConstructError, RecordError, ValidationError};
use thiserror::Error;

use crate::source::SourceLabel;

/// Errors from registering or applying mappings.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum MapperError {
    /// Rule keys that no registered source exposes.
    #[error(
        "Mapping {} not found in source {sources}.",
        counted("attribute", "attributes", .missing)
    )]
    UnknownAttributes {
        /// Sorted attribute names.
        missing: Vec<String>,
        sources: SourceLabel,
    },

    /// Required target parameters removed by the exclusion list.
    #[error(
        "{target} requires {} which {} excluded from mapping {sources} -> {target}.",
        counted("argument", "arguments", .missing),
        verb(.missing)
    )]
    ExcludedRequired {
        target: &'static str,
        /// Sorted parameter names.
        missing: Vec<String>,
        sources: SourceLabel,
    },

    /// The target constructor rejected the mapped arguments.
    #[error(
        "{} missing required properties for target object {target}: {source}",
        describe_sources(.sources)
    )]
    Construction {
        sources: SourceLabel,
        target: &'static str,
        #[source]
        source: ConstructError,
    },

    /// A field transform failed; its error is passed through unchanged.
    #[error(transparent)]
    Transform(anyhow::Error),

    #[error("Unsupported transform type for property '{field}': {reason}")]
    UnsupportedRule { field: String, reason: String },

    /// Model-level validation of the target failed.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Record(#[from] RecordError),

    #[error("Invalid JSON mapping profile")]
    ProfileJson {
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid TOML mapping profile")]
    ProfileToml {
        #[source]
        source: toml::de::Error,
    },
}

impl MapperError {
    /// Attribute or parameter names the error is about, if any.
    pub fn names(&self) -> &[String] {
        match self {
            Self::UnknownAttributes { missing, .. } | Self::ExcludedRequired { missing, .. } => {
                missing
            }
            _ => &[],
        }
    }
}

/// Result type for mapping operations.
pub type Result<T> = std::result::Result<T, MapperError>;

/// Join names as "a", "a and b", "a, b and c".
pub(crate) fn join_names(names: &[String]) -> String {
    match names.split_last() {
        None => String::new(),
        Some((last, [])) => last.clone(),
        Some((last, rest)) => format!("{} and {last}", rest.join(", ")),
    }
}

fn counted(singular: &str, plural: &str, names: &[String]) -> String {
    let noun = if names.len() == 1 { singular } else { plural };
    format!("{noun} {}", join_names(names))
}

fn verb(names: &[String]) -> &'static str {
    if names.len() == 1 { "is" } else { "are" }
}

fn describe_sources(sources: &SourceLabel) -> String {
    if sources.is_collection() {
        format!("Source objects {} are", sources.ordered())
    } else {
        format!("Source object {} is", sources.ordered())
    }
}
