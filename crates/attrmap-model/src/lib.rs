//! Object model for the attribute mapper.
//!
//! Describes the records the mapper reads from and writes to: their declared
//! constructor parameters, class-level attributes, serialized field values and
//! validation hooks.
//!
//! # Overview
//!
//! This crate provides:
//! - **Records**: the [`Record`] trait and its object-safe view [`AttributeSource`]
//! - **Schemas**: [`Schema`] and [`Param`] describing how a type is constructed
//! - **Construction**: [`TargetBuilder`] with a validating and a raw assignment path
//! - **Errors**: [`RecordError`], [`ConstructError`] and [`ValidationError`]
//!
//! # Example
//!
//! ```ignore
//! use attrmap_model::{Param, Record, Schema};
//!
//! #[derive(Serialize, Deserialize)]
//! struct Person {
//!     name: String,
//!     email: String,
//! }
//!
//! impl Record for Person {
//!     fn schema() -> Schema {
//!         Schema::plain("Person")
//!             .param(Param::required("name"))
//!             .param(Param::optional("email", "fixed@email.com"))
//!     }
//! }
//! ```

#![deny(unsafe_code)]

mod builder;
mod error;
mod record;
mod schema;

pub use builder::{TargetBuilder, assign_fields, construct_with_schema};
pub use error::{ConstructError, FieldViolation, RecordError, Result, ValidationError};
pub use record::{AttributeSource, Fields, Record, TypeInfo, TypeKey, from_fields, to_fields};
pub use schema::{Param, RecordKind, Schema};

pub use serde_json::Value;
