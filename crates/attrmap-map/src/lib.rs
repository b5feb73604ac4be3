//! Rule-driven attribute mapping between records.
//!
//! # Overview
//!
//! A [`Mapper`] copies attributes from one or more source records into a
//! target record. Per `(source, target)` pair it holds:
//! - **Field rules**: renames and value transforms ([`FieldRule`])
//! - **Exclusions**: source attributes that are never copied
//!
//! Targets are built through their constructor, into a blank instance, or onto
//! an existing instance. Plain records and validated models are read through
//! their own [`AttributeAdapter`].
//!
//! # Example
//!
//! ```ignore
//! use attrmap_map::{FieldRule, Mapper, Registration, SourceSpec, transforms};
//!
//! let mut mapper = Mapper::new();
//! mapper.add_mapping::<Target>(
//!     SourceSpec::of::<Source>(),
//!     Registration::new().rule("name", FieldRule::transform(transforms::reverse)),
//! )?;
//!
//! let target: Target = mapper.map(&source)?;
//! let patched: Target = mapper.source((&a, &b)).extra("age", 30).construct()?;
//! ```

#![deny(unsafe_code)]

mod adapter;
mod error;
mod mapper;
mod profile;
mod rules;
mod source;
pub mod transforms;

pub use adapter::{AttributeAdapter, ConstructorParam, ModelAdapter, PlainAdapter, adapter_for};
pub use error::{MapperError, Result};
pub use mapper::{MapRequest, Mapper};
pub use profile::MappingProfile;
pub use rules::{FieldRule, Registration, RuleSet, TransformFn};
pub use source::{MappingKey, SourceKey, SourceLabel, SourceSpec, Sources, SpecEntry};
pub use transforms::TransformRegistry;
