//! Two-phase construction of mapping targets.
//!
//! A [`TargetBuilder`] accumulates named values and then either runs the
//! record's validating constructor or writes the values straight into an
//! instance without running it.

use std::marker::PhantomData;

use serde_json::Value;

use crate::error::{ConstructError, RecordError, ValidationError};
use crate::record::{Fields, Record, from_fields, to_fields};
use crate::schema::RecordKind;

/// Schema-driven constructor used by [`Record::construct`].
///
/// Arguments are looked up by [`Param::key_for`](crate::Param::key_for) the schema's kind, so only
/// models accept aliases. Missing ones fall back to their declared default,
/// and the assembled record is validated.
pub fn construct_with_schema<T: Record>(mut args: Fields) -> Result<T, ConstructError> {
    let schema = T::schema();
    let kind = schema.kind();
    let mut fields = Fields::new();
    let mut missing = Vec::new();

    for param in schema.params() {
        let key = param.key_for(kind);
        match args.remove(key).or_else(|| param.default().cloned()) {
            Some(value) => {
                fields.insert(param.name().to_string(), value);
            }
            None => missing.push(key.to_string()),
        }
    }

    if !missing.is_empty() {
        return Err(match schema.kind() {
            RecordKind::Plain => ConstructError::MissingArguments {
                type_name: schema.type_name(),
                missing,
            },
            RecordKind::Model => {
                ValidationError::missing_fields(schema.type_name(), &missing).into()
            }
        });
    }

    let record: T = from_fields(fields)?;
    record.validate()?;
    Ok(record)
}

/// Serde-driven assignment used by [`Record::assign`].
///
/// Serializes `target`, lays `fields` over the result and deserializes it
/// back. Names the target does not declare are ignored. State serde does not
/// carry, such as `#[serde(skip)]` fields, comes back as its default.
pub fn assign_fields<T: Record>(target: &mut T, fields: Fields) -> Result<(), RecordError> {
    let mut current = to_fields(&*target)?;
    current.extend(fields);
    *target = from_fields(current)?;
    Ok(())
}

/// Accumulates target fields before choosing how to build the target.
#[derive(Debug, Clone)]
pub struct TargetBuilder<T> {
    fields: Fields,
    _target: PhantomData<fn() -> T>,
}

impl<T: Record> Default for TargetBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Record> TargetBuilder<T> {
    pub fn new() -> Self {
        Self::from_fields(Fields::new())
    }

    pub fn from_fields(fields: Fields) -> Self {
        Self {
            fields,
            _target: PhantomData,
        }
    }

    /// Set a field, replacing any earlier value.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(name, value);
        self
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(name.into(), value.into());
    }

    pub fn fields(&self) -> &Fields {
        &self.fields
    }

    /// Build the target through its constructor.
    pub fn construct(self) -> Result<T, ConstructError> {
        T::construct(self.fields)
    }

    /// Overwrite fields of an existing target.
    ///
    /// Neither the constructor nor validation runs. Goes through
    /// [`Record::assign`].
    pub fn assign(self, target: &mut T) -> Result<(), RecordError> {
        target.assign(self.fields)
    }

    /// Assign into a default-valued target without running the constructor.
    pub fn assign_blank(self) -> Result<T, RecordError>
    where
        T: Default,
    {
        let mut target = T::default();
        self.assign(&mut target)?;
        Ok(target)
    }
}
