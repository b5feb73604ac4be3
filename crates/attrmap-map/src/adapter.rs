//! Attribute adapters.
//!
//! An adapter knows how to read one kind of record: which attributes an
//! instance exposes, which names are visible on the type itself, which
//! constructor parameters exist and which of them are mandatory. Plain records
//! and validated models answer these questions differently, and each record
//! is routed to its adapter by the [`RecordKind`] tag on its schema.

use std::collections::BTreeSet;

use attrmap_model::{AttributeSource, Fields, RecordError, RecordKind, Schema};

use crate::source::SpecEntry;

/// A constructor parameter as seen by the mapper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstructorParam {
    /// Name the constructor accepts the argument under.
    pub name: String,
    pub has_default: bool,
}

/// Introspection strategy for one kind of record.
pub trait AttributeAdapter: Send + Sync {
    fn kind(&self) -> RecordKind;

    /// Public attributes of an instance.
    fn public_attributes(&self, source: &dyn AttributeSource) -> Result<Fields, RecordError>;

    /// Public attribute names visible on the type without an instance.
    fn type_attribute_names(&self, schema: &Schema) -> BTreeSet<String>;

    fn constructor_parameters(&self, schema: &Schema) -> Vec<ConstructorParam>;

    /// Field values a bare instance starts from when the constructor is skipped.
    fn blank_fields(&self, schema: &Schema) -> Fields;

    fn constructor_parameter_names(&self, schema: &Schema) -> BTreeSet<String> {
        self.constructor_parameters(schema)
            .into_iter()
            .map(|p| p.name)
            .collect()
    }

    /// Constructor parameters without a default that are not already provided
    /// by the type or by `present` instance attributes.
    fn required_parameter_names(
        &self,
        schema: &Schema,
        present: &BTreeSet<String>,
    ) -> BTreeSet<String> {
        let type_attributes = self.type_attribute_names(schema);
        self.constructor_parameters(schema)
            .into_iter()
            .filter(|p| !p.has_default)
            .map(|p| p.name)
            .filter(|name| !type_attributes.contains(name) && !present.contains(name))
            .collect()
    }

    /// Every name a mapping rule may reference on a registration-time source.
    fn discoverable_names(&self, entry: &SpecEntry<'_>) -> Result<BTreeSet<String>, RecordError> {
        let info = entry.type_info();
        let mut names = match entry {
            SpecEntry::Type(_) => self.type_attribute_names(info.schema()),
            SpecEntry::Instance(source) => {
                self.public_attributes(*source)?.into_keys().collect()
            }
        };
        names.extend(self.constructor_parameter_names(info.schema()));
        Ok(names)
    }
}

/// Adapter for plain records.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainAdapter;

impl AttributeAdapter for PlainAdapter {
    fn kind(&self) -> RecordKind {
        RecordKind::Plain
    }

    fn public_attributes(&self, source: &dyn AttributeSource) -> Result<Fields, RecordError> {
        let info = source.type_info();
        let mut attributes = info.schema().class_attributes().clone();
        attributes.extend(source.field_values()?);
        attributes.extend(source.computed_properties());
        attributes.retain(|name, _| is_public(name));
        Ok(attributes)
    }

    /// Class attributes and declared properties.
    fn type_attribute_names(&self, schema: &Schema) -> BTreeSet<String> {
        schema
            .class_attributes()
            .keys()
            .chain(schema.properties())
            .filter(|name| is_public(name))
            .cloned()
            .collect()
    }

    fn constructor_parameters(&self, schema: &Schema) -> Vec<ConstructorParam> {
        schema
            .params()
            .iter()
            .map(|p| ConstructorParam {
                name: p.key_for(RecordKind::Plain).to_string(),
                has_default: p.has_default(),
            })
            .collect()
    }

    fn blank_fields(&self, _schema: &Schema) -> Fields {
        Fields::new()
    }
}

/// Adapter for validated models.
#[derive(Debug, Clone, Copy, Default)]
pub struct ModelAdapter;

impl AttributeAdapter for ModelAdapter {
    fn kind(&self) -> RecordKind {
        RecordKind::Model
    }

    fn public_attributes(&self, source: &dyn AttributeSource) -> Result<Fields, RecordError> {
        let mut attributes = source.field_values()?;
        attributes.retain(|name, _| is_public(name));
        Ok(attributes)
    }

    /// Only declared fields that carry a default.
    fn type_attribute_names(&self, schema: &Schema) -> BTreeSet<String> {
        schema
            .params()
            .iter()
            .filter(|p| p.has_default())
            .map(|p| p.name().to_string())
            .collect()
    }

    fn constructor_parameters(&self, schema: &Schema) -> Vec<ConstructorParam> {
        schema
            .params()
            .iter()
            .map(|p| ConstructorParam {
                name: p.key_for(RecordKind::Model).to_string(),
                has_default: p.has_default(),
            })
            .collect()
    }

    fn blank_fields(&self, schema: &Schema) -> Fields {
        schema
            .params()
            .iter()
            .filter_map(|p| Some((p.name().to_string(), p.default()?.clone())))
            .collect()
    }
}

static PLAIN: PlainAdapter = PlainAdapter;
static MODEL: ModelAdapter = ModelAdapter;

/// Adapter for a record kind.
pub fn adapter_for(kind: RecordKind) -> &'static dyn AttributeAdapter {
    match kind {
        RecordKind::Plain => &PLAIN,
        RecordKind::Model => &MODEL,
    }
}

fn is_public(name: &str) -> bool {
    !name.starts_with('_')
}
