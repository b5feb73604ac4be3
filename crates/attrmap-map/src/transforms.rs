//! Named value transforms for declarative profiles.

use std::collections::BTreeMap;
use std::sync::Arc;

use anyhow::bail;
use attrmap_model::Value;

use crate::rules::TransformFn;

/// Reverse a string by characters.
pub fn reverse(value: Value) -> anyhow::Result<Value> {
    let s = expect_str("reverse", &value)?;
    Ok(Value::String(s.chars().rev().collect()))
}

pub fn uppercase(value: Value) -> anyhow::Result<Value> {
    Ok(Value::String(expect_str("uppercase", &value)?.to_uppercase()))
}

pub fn lowercase(value: Value) -> anyhow::Result<Value> {
    Ok(Value::String(expect_str("lowercase", &value)?.to_lowercase()))
}

pub fn trim(value: Value) -> anyhow::Result<Value> {
    Ok(Value::String(expect_str("trim", &value)?.trim().to_string()))
}

/// Render any value as a string; strings pass through unchanged.
pub fn to_string(value: Value) -> anyhow::Result<Value> {
    Ok(match value {
        Value::String(_) => value,
        other => Value::String(other.to_string()),
    })
}

fn expect_str<'a>(transform: &str, value: &'a Value) -> anyhow::Result<&'a str> {
    match value.as_str() {
        Some(s) => Ok(s),
        None => bail!("{transform} expects a string, got {value}"),
    }
}

/// Transform functions addressable by name.
#[derive(Clone)]
pub struct TransformRegistry {
    transforms: BTreeMap<String, TransformFn>,
}

impl TransformRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self {
            transforms: BTreeMap::new(),
        }
    }

    /// A registry holding `reverse`, `uppercase`, `lowercase`, `trim` and `to_string`.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register("reverse", reverse);
        registry.register("uppercase", uppercase);
        registry.register("lowercase", lowercase);
        registry.register("trim", trim);
        registry.register("to_string", to_string);
        registry
    }

    /// Register a transform, replacing any with the same name.
    pub fn register<F>(&mut self, name: impl Into<String>, f: F)
    where
        F: Fn(Value) -> anyhow::Result<Value> + Send + Sync + 'static,
    {
        self.transforms.insert(name.into(), Arc::new(f));
    }

    pub fn get(&self, name: &str) -> Option<TransformFn> {
        self.transforms.get(name).cloned()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.transforms.keys().map(String::as_str)
    }
}

impl Default for TransformRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl std::fmt::Debug for TransformRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransformRegistry")
            .field("transforms", &self.transforms.keys().collect::<Vec<_>>())
            .finish()
    }
}
