//! Target backends. Each maker flattens the method list with its own naming and typing rules and
//! renders one or more files.

mod go;
mod openapi;
mod rust;
mod typescript;

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::field::Method;

pub use go::{go_layout, GoMaker};
pub use openapi::OpenApiMaker;
pub use rust::{rust_formatter, RustMaker};
pub use typescript::{ts_scalar, AngularMaker, AxiosMaker, UmiMaker};

/// A generated source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct File {
    pub name: String,
    pub content: String,
}

impl File {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }
}

pub trait Maker: Send + Sync {
    /// Tag used to pick basic-type mappings, e.g. `go` or `ts`.
    fn lang(&self) -> &str;

    fn make(&self, package: &str, methods: Vec<Method>) -> Result<Vec<File>>;
}

/// Makers keyed by target name.
#[derive(Clone)]
pub struct MakerRegistry {
    makers: BTreeMap<String, Arc<dyn Maker>>,
}

impl MakerRegistry {
    pub fn with_defaults() -> Self {
        let mut registry = Self {
            makers: BTreeMap::new(),
        };
        registry.insert("go", Arc::new(GoMaker));
        registry.insert("angular", Arc::new(AngularMaker));
        registry.insert("umi", Arc::new(UmiMaker));
        registry.insert("axios", Arc::new(AxiosMaker));
        registry.insert("rust", Arc::new(RustMaker));
        registry.insert("openapi", Arc::new(OpenApiMaker));
        registry
    }

    /// Adds or replaces the maker for `target`.
    pub fn insert(&mut self, target: impl Into<String>, maker: Arc<dyn Maker>) {
        self.makers.insert(target.into(), maker);
    }

    pub fn get(&self, target: &str) -> Result<Arc<dyn Maker>> {
        self.makers
            .get(target)
            .cloned()
            .ok_or_else(|| Error::MakerNotFound(target.to_string()))
    }

    pub fn targets(&self) -> impl Iterator<Item = &str> {
        self.makers.keys().map(String::as_str)
    }
}

impl std::fmt::Debug for MakerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.targets()).finish()
    }
}
