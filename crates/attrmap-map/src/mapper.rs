//! The mapper: rule registries and the mapping pipeline.
//!
//! A map call runs the same steps whatever the target mode:
//!
//! 1. reject excluded attributes the target constructor requires
//! 2. gather public attributes from each source, later sources shadowing
//!    earlier ones, excluded names skipped
//! 3. apply the registered field rules
//! 4. lay caller-supplied extras on top
//! 5. build the target through its constructor, into a blank instance, or
//!    onto an existing instance

use std::collections::{BTreeMap, BTreeSet};

use attrmap_model::{
    AttributeSource, ConstructError, Fields, Record, Schema, TargetBuilder, TypeInfo, TypeKey,
    Value,
};
use tracing::{debug, trace};

use crate::adapter::adapter_for;
use crate::error::{MapperError, Result};
use crate::rules::{Registration, RuleSet};
use crate::source::{MappingKey, SourceSpec, Sources};

/// Registry of field rules and exclusions per `(source, target)` pair.
#[derive(Debug, Clone, Default)]
pub struct Mapper {
    mappings: BTreeMap<MappingKey, RuleSet>,
    exclusions: BTreeMap<MappingKey, Vec<String>>,
}

impl Mapper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register rules and exclusions for mapping `source` into `T`.
    ///
    /// Every rule key must name an attribute or constructor parameter of one
    /// of the sources. On error nothing is registered. Rules merge field by
    /// field with earlier registrations for the same pair; exclusions
    /// accumulate.
    pub fn add_mapping<'a, T: Record>(
        &mut self,
        source: impl Into<SourceSpec<'a>>,
        registration: Registration,
    ) -> Result<()> {
        let spec = source.into();
        let key = MappingKey::new(spec.key(), TypeKey::of::<T>());
        let (rules, exclusions) = registration.into_parts();

        if !rules.is_empty() {
            let mut discoverable = BTreeSet::new();
            for entry in spec.entries() {
                let adapter = adapter_for(entry.type_info().kind());
                discoverable.extend(adapter.discoverable_names(entry)?);
            }

            let missing: Vec<String> = rules
                .fields()
                .filter(|field| !discoverable.contains(*field))
                .map(str::to_string)
                .collect();
            if !missing.is_empty() {
                return Err(MapperError::UnknownAttributes {
                    missing,
                    sources: spec.label(),
                });
            }
        }

        debug!(
            mapping = %key,
            rules = rules.len(),
            exclusions = exclusions.len(),
            "registered mapping"
        );
        self.mappings.entry(key.clone()).or_default().merge(rules);
        self.exclusions.entry(key).or_default().extend(exclusions);
        Ok(())
    }

    /// Map `source` into a new `T` through its constructor.
    pub fn map<'a, T: Record>(&self, source: impl Into<Sources<'a>>) -> Result<T> {
        self.source(source).construct()
    }

    /// Start a map call, for extras or a non-constructor target mode.
    pub fn source<'a>(&self, source: impl Into<Sources<'a>>) -> MapRequest<'_, 'a> {
        MapRequest {
            mapper: self,
            sources: source.into(),
            extra: Fields::new(),
        }
    }

    /// Rules registered for a pair.
    pub fn rules(&self, key: &MappingKey) -> Option<&RuleSet> {
        self.mappings.get(key)
    }

    /// Exclusions registered for a pair, in registration order.
    pub fn exclusions(&self, key: &MappingKey) -> &[String] {
        self.exclusions.get(key).map(Vec::as_slice).unwrap_or_default()
    }

    fn guard_excluded_required(
        &self,
        key: &MappingKey,
        sources: &Sources<'_>,
        target: &Schema,
        extra: &Fields,
        present: &BTreeSet<String>,
    ) -> Result<()> {
        let excluded = self.exclusions(key);
        if excluded.is_empty() {
            return Ok(());
        }

        let required = adapter_for(target.kind()).required_parameter_names(target, present);
        let missing: BTreeSet<&String> = excluded
            .iter()
            .filter(|name| !extra.contains_key(*name) && required.contains(*name))
            .collect();
        if missing.is_empty() {
            return Ok(());
        }

        Err(MapperError::ExcludedRequired {
            target: target.type_name(),
            missing: missing.into_iter().cloned().collect(),
            sources: sources.label(),
        })
    }

    fn gather(&self, key: &MappingKey, sources: &Sources<'_>) -> Result<Fields> {
        let excluded = self.exclusions(key);
        let mut combined = Fields::new();
        for source in sources.iter() {
            let adapter = adapter_for(source.type_info().kind());
            let mut attributes = adapter.public_attributes(source)?;
            attributes.retain(|name, _| !excluded.contains(name));
            combined.extend(attributes);
        }
        Ok(combined)
    }

    fn apply_rules(&self, key: &MappingKey, attributes: Fields) -> Result<Fields> {
        let empty = RuleSet::new();
        let rules = self.mappings.get(key).unwrap_or(&empty);
        let mut mapped = Fields::new();
        for (name, value) in attributes {
            let rule = rules.get(&name);
            let (target_name, value) = rule
                .apply(&name, value)
                .map_err(MapperError::Transform)?;
            trace!(
                field = %name,
                target_field = %target_name,
                rule = ?rule,
                "applied field rule"
            );
            mapped.insert(target_name, value);
        }
        Ok(mapped)
    }
}

/// A pending map call.
///
/// Finish with [`construct`](Self::construct),
/// [`skip_init`](Self::skip_init) or [`onto`](Self::onto).
#[derive(Debug)]
pub struct MapRequest<'m, 'a> {
    mapper: &'m Mapper,
    sources: Sources<'a>,
    extra: Fields,
}

impl MapRequest<'_, '_> {
    /// Set a value on the target, overriding anything mapped from the sources.
    #[must_use]
    pub fn extra(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(name.into(), value.into());
        self
    }

    #[must_use]
    pub fn extras(mut self, values: Fields) -> Self {
        self.extra.extend(values);
        self
    }

    /// Build a new `T` through its constructor.
    ///
    /// Mapped names that are not constructor parameters of `T` are dropped.
    /// Model validation failures surface as [`MapperError::Validation`]; any
    /// other constructor failure is wrapped in [`MapperError::Construction`].
    pub fn construct<T: Record>(self) -> Result<T> {
        let info = TypeInfo::of::<T>();
        let key = self.key(&info);
        let label = self.sources.label();
        debug!(
            mapping = %key,
            kind = %self.sources.kind(),
            mode = "construct",
            "mapping sources"
        );

        let mapped = self.run(&key, &info, &BTreeSet::new())?;
        let params = adapter_for(info.kind()).constructor_parameter_names(info.schema());
        let args: Fields = mapped
            .into_iter()
            .filter(|(name, _)| params.contains(name))
            .collect();

        TargetBuilder::<T>::from_fields(args)
            .construct()
            .map_err(|source| match source {
                ConstructError::Validation(err) => MapperError::Validation(err),
                source => MapperError::Construction {
                    sources: label,
                    target: info.name(),
                    source,
                },
            })
    }

    /// Build a new `T` without running its constructor.
    ///
    /// Starts from `T::default()` plus the model defaults, then assigns every
    /// mapped value. Validation does not run.
    pub fn skip_init<T: Record + Default>(self) -> Result<T> {
        let info = TypeInfo::of::<T>();
        let key = self.key(&info);
        debug!(
            mapping = %key,
            kind = %self.sources.kind(),
            mode = "skip_init",
            "mapping sources"
        );

        let mapped = self.run(&key, &info, &BTreeSet::new())?;
        let mut fields = adapter_for(info.kind()).blank_fields(info.schema());
        fields.extend(mapped);
        Ok(TargetBuilder::<T>::from_fields(fields).assign_blank()?)
    }

    /// Assign mapped values onto an existing `target`.
    ///
    /// The constructor never runs and attributes that are not mapped keep their
    /// current values.
    pub fn onto<T: Record>(self, target: &mut T) -> Result<()> {
        let info = TypeInfo::of::<T>();
        let key = self.key(&info);
        debug!(
            mapping = %key,
            kind = %self.sources.kind(),
            mode = "onto",
            "mapping sources"
        );

        let present: BTreeSet<String> = adapter_for(info.kind())
            .public_attributes(&*target as &dyn AttributeSource)?
            .into_keys()
            .collect();
        let mapped = self.run(&key, &info, &present)?;
        TargetBuilder::<T>::from_fields(mapped).assign(target)?;
        Ok(())
    }

    fn key(&self, target: &TypeInfo) -> MappingKey {
        MappingKey::new(self.sources.key(), target.key())
    }

    fn run(
        &self,
        key: &MappingKey,
        target: &TypeInfo,
        present: &BTreeSet<String>,
    ) -> Result<Fields> {
        self.mapper.guard_excluded_required(
            key,
            &self.sources,
            target.schema(),
            &self.extra,
            present,
        )?;
        let gathered = self.mapper.gather(key, &self.sources)?;
        let mut mapped = self.mapper.apply_rules(key, gathered)?;
        mapped.extend(self.extra.clone());
        Ok(mapped)
    }
}
