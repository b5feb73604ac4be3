//! Per-field mapping rules.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use attrmap_model::Value;

/// A value transform supplied by the caller.
pub type TransformFn = Arc<dyn Fn(Value) -> anyhow::Result<Value> + Send + Sync>;

/// How one source attribute lands on the target.
#[derive(Clone, Default)]
pub enum FieldRule {
    /// Same name, same value.
    #[default]
    Identity,
    /// Same name, transformed value.
    Transform(TransformFn),
    /// New name, same value.
    Rename(String),
    /// New name, transformed value.
    RenameAndTransform(String, TransformFn),
}

impl FieldRule {
    pub fn transform<F>(f: F) -> Self
    where
        F: Fn(Value) -> anyhow::Result<Value> + Send + Sync + 'static,
    {
        Self::Transform(Arc::new(f))
    }

    pub fn rename(name: impl Into<String>) -> Self {
        Self::Rename(name.into())
    }

    pub fn rename_and_transform<F>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(Value) -> anyhow::Result<Value> + Send + Sync + 'static,
    {
        Self::RenameAndTransform(name.into(), Arc::new(f))
    }

    /// Target name for a source attribute.
    pub fn target_name<'a>(&'a self, source_name: &'a str) -> &'a str {
        match self {
            Self::Identity | Self::Transform(_) => source_name,
            Self::Rename(name) | Self::RenameAndTransform(name, _) => name,
        }
    }

    /// Apply the rule, returning the target name and value.
    ///
    /// Transform errors are returned as-is.
    pub fn apply(&self, name: &str, value: Value) -> anyhow::Result<(String, Value)> {
        let value = match self {
            Self::Identity | Self::Rename(_) => value,
            Self::Transform(f) | Self::RenameAndTransform(_, f) => f(value)?,
        };
        Ok((self.target_name(name).to_string(), value))
    }
}

impl fmt::Debug for FieldRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Identity => f.write_str("Identity"),
            Self::Transform(_) => f.write_str("Transform(..)"),
            Self::Rename(name) => f.debug_tuple("Rename").field(name).finish(),
            Self::RenameAndTransform(name, _) => f
                .debug_tuple("RenameAndTransform")
                .field(name)
                .field(&"..")
                .finish(),
        }
    }
}

impl From<&str> for FieldRule {
    fn from(name: &str) -> Self {
        Self::Rename(name.to_string())
    }
}

impl From<String> for FieldRule {
    fn from(name: String) -> Self {
        Self::Rename(name)
    }
}

/// Field rules for one `(source, target)` pair, keyed by source attribute name.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: BTreeMap<String, FieldRule>,
}

static IDENTITY: FieldRule = FieldRule::Identity;

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: impl Into<String>, rule: FieldRule) {
        self.rules.insert(field.into(), rule);
    }

    /// Rule for a source attribute; [`FieldRule::Identity`] when none was set.
    pub fn get(&self, field: &str) -> &FieldRule {
        self.rules.get(field).unwrap_or(&IDENTITY)
    }

    /// Source attribute names with a registered rule.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.rules.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Add `other`'s rules, overwriting existing ones field by field.
    pub fn merge(&mut self, other: RuleSet) {
        self.rules.extend(other.rules);
    }
}

impl<K: Into<String>> FromIterator<(K, FieldRule)> for RuleSet {
    fn from_iter<I: IntoIterator<Item = (K, FieldRule)>>(iter: I) -> Self {
        Self {
            rules: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

/// Rules and exclusions passed to one `add_mapping` call.
#[derive(Debug, Clone, Default)]
pub struct Registration {
    rules: RuleSet,
    exclusions: Vec<String>,
}

impl Registration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Identity mapping for a set of names.
    pub fn fields<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let rules = names
            .into_iter()
            .map(|name| {
                let name = name.into();
                (name.clone(), FieldRule::Rename(name))
            })
            .collect();
        Self {
            rules,
            exclusions: Vec::new(),
        }
    }

    #[must_use]
    pub fn rule(mut self, field: impl Into<String>, rule: impl Into<FieldRule>) -> Self {
        self.rules.insert(field, rule.into());
        self
    }

    #[must_use]
    pub fn exclude(mut self, field: impl Into<String>) -> Self {
        self.exclusions.push(field.into());
        self
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn exclusions(&self) -> &[String] {
        &self.exclusions
    }

    pub fn into_parts(self) -> (RuleSet, Vec<String>) {
        (self.rules, self.exclusions)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn double() -> FieldRule {
        FieldRule::transform(|v| Ok(json!(v.as_i64().unwrap_or_default() * 2)))
    }

    #[test]
    fn rules_apply_by_shape() {
        assert_eq!(
            FieldRule::Identity.apply("a", json!(1)).unwrap(),
            ("a".to_string(), json!(1))
        );
        assert_eq!(double().apply("a", json!(2)).unwrap(), ("a".to_string(), json!(4)));
        assert_eq!(
            FieldRule::rename("b").apply("a", json!(1)).unwrap(),
            ("b".to_string(), json!(1))
        );
        assert_eq!(
            FieldRule::rename_and_transform("b", |v| Ok(json!([v])))
                .apply("a", json!(1))
                .unwrap(),
            ("b".to_string(), json!([1]))
        );
    }

    #[test]
    fn transform_errors_propagate() {
        let rule = FieldRule::transform(|_| anyhow::bail!("boom"));
        let err = rule.apply("a", json!(1)).unwrap_err();
        assert_eq!(err.to_string(), "boom");
    }

    #[test]
    fn missing_rule_is_identity() {
        let rules = RuleSet::new();
        assert!(matches!(rules.get("anything"), FieldRule::Identity));
    }

    #[test]
    fn merge_overwrites_per_field() {
        let mut rules: RuleSet = [("a", FieldRule::rename("x")), ("b", FieldRule::rename("y"))]
            .into_iter()
            .collect();
        rules.merge([("b", FieldRule::rename("z"))].into_iter().collect());

        assert_eq!(rules.len(), 2);
        assert_eq!(rules.get("a").target_name("a"), "x");
        assert_eq!(rules.get("b").target_name("b"), "z");
    }

    #[test]
    fn field_shorthand_is_identity_rename() {
        let registration = Registration::fields(["name", "email"]);
        let fields: Vec<&str> = registration.rules().fields().collect();

        assert_eq!(fields, vec!["email", "name"]);
        assert_eq!(registration.rules().get("name").target_name("name"), "name");
    }

    #[test]
    fn debug_hides_functions() {
        assert_eq!(format!("{:?}", double()), "Transform(..)");
        assert_eq!(format!("{:?}", FieldRule::rename("x")), "Rename(\"x\")");
    }
}
