//! Shared fixtures for mapper integration tests.

#![allow(dead_code)]

use std::sync::Once;

use attrmap_model::{Param, Record, Schema};
use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

/// Route mapper logs to the test writer; filter with `RUST_LOG`.
pub fn init_tracing() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceClassA {
    pub name: String,
    pub email: String,
}

impl SourceClassA {
    pub fn new(name: &str, email: &str) -> Self {
        Self {
            name: name.to_string(),
            email: email.to_string(),
        }
    }
}

impl Record for SourceClassA {
    fn schema() -> Schema {
        Schema::plain("SourceClassA")
            .param(Param::required("name"))
            .param(Param::required("email"))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceClassB {
    pub name: String,
    pub email: String,
}

impl SourceClassB {
    pub fn new(name: &str, email: &str) -> Self {
        Self {
            name: name.to_string(),
            email: email.to_string(),
        }
    }
}

impl Record for SourceClassB {
    fn schema() -> Schema {
        Schema::plain("SourceClassB")
            .param(Param::required("name"))
            .param(Param::required("email"))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TargetClass {
    pub name: String,
    pub email: String,
}

impl Record for TargetClass {
    fn schema() -> Schema {
        Schema::plain("TargetClass")
            .param(Param::required("name"))
            .param(Param::required("email"))
    }
}

/// Target whose `email` parameter defaults to `fixed@email.com`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TargetWithDefault {
    pub name: String,
    pub email: String,
}

impl Record for TargetWithDefault {
    fn schema() -> Schema {
        Schema::plain("TargetWithDefault")
            .param(Param::required("name"))
            .param(Param::optional("email", "fixed@email.com"))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    pub name: String,
    pub email: String,
    pub age: i64,
}

impl Person {
    pub fn new(name: &str, email: &str, age: i64) -> Self {
        Self {
            name: name.to_string(),
            email: email.to_string(),
            age,
        }
    }
}

impl Record for Person {
    fn schema() -> Schema {
        Schema::plain("Person")
            .param(Param::required("name"))
            .param(Param::required("email"))
            .param(Param::required("age"))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    pub name: String,
    pub email: String,
    pub age: i64,
}

impl Employee {
    pub fn new(name: &str, email: &str, age: i64) -> Self {
        Self {
            name: name.to_string(),
            email: email.to_string(),
            age,
        }
    }
}

impl Record for Employee {
    fn schema() -> Schema {
        Schema::plain("Employee")
            .param(Param::required("name"))
            .param(Param::required("email"))
            .param(Param::required("age"))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    pub name: String,
    pub email: String,
    pub age: i64,
}

impl Record for Contact {
    fn schema() -> Schema {
        Schema::plain("Contact")
            .param(Param::required("name"))
            .param(Param::required("email"))
            .param(Param::required("age"))
    }
}
