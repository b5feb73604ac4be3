//! Type-level description of a record.
//!
//! A [`Schema`] replaces runtime introspection: each record type declares its
//! constructor parameters and class-level attributes once, and the mapper reads
//! them through the adapter matching the schema's [`RecordKind`].

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::record::Fields;

/// Type tag used to route a record to its attribute adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    /// Plain structured record with a constructor and public fields.
    Plain,
    /// Schema-validated model with declared fields, defaults and aliases.
    Model,
}

impl RecordKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Plain => "plain",
            Self::Model => "model",
        }
    }
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A constructor parameter, or a declared field of a model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Param {
    name: String,
    alias: Option<String>,
    default: Option<Value>,
}

impl Param {
    /// Parameter that must be supplied to the constructor.
    pub fn required(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            alias: None,
            default: None,
        }
    }

    /// Parameter with a default value used when no argument is supplied.
    pub fn optional(name: impl Into<String>, default: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            alias: None,
            default: Some(default.into()),
        }
    }

    /// Accept the argument under `alias` instead of the field name.
    ///
    /// Only models honor aliases; see [`Param::key_for`].
    #[must_use]
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Field name as serialized on the record.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name under which a model constructor expects the argument.
    pub fn key(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }

    /// Argument name for a constructor of the given kind.
    ///
    /// Plain constructors take the field name even when an alias is declared.
    pub fn key_for(&self, kind: RecordKind) -> &str {
        match kind {
            RecordKind::Plain => &self.name,
            RecordKind::Model => self.key(),
        }
    }

    pub fn default(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    pub fn has_default(&self) -> bool {
        self.default.is_some()
    }
}

/// Declared shape of a record type.
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    type_name: &'static str,
    kind: RecordKind,
    params: Vec<Param>,
    class_attributes: Fields,
    properties: Vec<String>,
}

impl Schema {
    /// Schema for a plain record.
    pub fn plain(type_name: &'static str) -> Self {
        Self::new(type_name, RecordKind::Plain)
    }

    /// Schema for a validated model.
    pub fn model(type_name: &'static str) -> Self {
        Self::new(type_name, RecordKind::Model)
    }

    fn new(type_name: &'static str, kind: RecordKind) -> Self {
        Self {
            type_name,
            kind,
            params: Vec::new(),
            class_attributes: Fields::new(),
            properties: Vec::new(),
        }
    }

    /// Add a constructor parameter (a declared field for models).
    ///
    /// Re-declaring a name replaces the earlier parameter in place.
    #[must_use]
    pub fn param(mut self, param: Param) -> Self {
        match self.params.iter_mut().find(|p| p.name == param.name) {
            Some(existing) => *existing = param,
            None => self.params.push(param),
        }
        self
    }

    /// Add a class-level attribute, visible on the type and on every instance.
    #[must_use]
    pub fn class_attribute(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.class_attributes.insert(name.into(), value.into());
        self
    }

    /// Declare a computed property so it is visible without an instance.
    #[must_use]
    pub fn property(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        if !self.properties.contains(&name) {
            self.properties.push(name);
        }
        self
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn kind(&self) -> RecordKind {
        self.kind
    }

    /// Constructor parameters in declaration order.
    pub fn params(&self) -> &[Param] {
        &self.params
    }

    pub fn class_attributes(&self) -> &Fields {
        &self.class_attributes
    }

    /// Names of declared computed properties.
    pub fn properties(&self) -> &[String] {
        &self.properties
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn param_key_prefers_alias() {
        let plain = Param::required("name");
        let aliased = Param::required("name").with_alias("user_name_alias");

        assert_eq!(plain.key(), "name");
        assert_eq!(aliased.key(), "user_name_alias");
        assert_eq!(aliased.name(), "name");
        assert_eq!(aliased.key_for(RecordKind::Plain), "name");
        assert_eq!(aliased.key_for(RecordKind::Model), "user_name_alias");
    }

    #[test]
    fn redeclared_param_replaces_previous() {
        let schema = Schema::plain("Target")
            .param(Param::required("name"))
            .param(Param::required("email"))
            .param(Param::optional("name", "anonymous"));

        assert_eq!(schema.params().len(), 2);
        assert_eq!(schema.params()[0].default(), Some(&json!("anonymous")));
    }

    #[test]
    fn properties_are_declared_once() {
        let schema = Schema::plain("Person")
            .property("full_name")
            .property("full_name")
            .class_attribute("species", "human");

        assert_eq!(schema.properties(), ["full_name".to_string()]);
        assert_eq!(schema.class_attributes().get("species"), Some(&json!("human")));
    }
}
