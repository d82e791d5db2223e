//! Per-target substitutions for native types that must render as opaque leaves.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use serde::Serialize;

use crate::markers::{Decimal, Html, Text};
use crate::schema::{Reflect, TypeIdentity};

/// An import a substituted type needs in the generated source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Package {
    pub import: String,
    pub from: String,
}

/// How one basic type renders for one target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Library {
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package: Option<Package>,
}

impl Library {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            package: None,
        }
    }

    pub fn import(mut self, import: impl Into<String>, from: impl Into<String>) -> Self {
        self.package = Some(Package {
            import: import.into(),
            from: from.into(),
        });
        self
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BasicType {
    pub identity: TypeIdentity,
    /// Keyed by target tag (`go`, `ts`, `rust`, `openapi`).
    pub mapping: BTreeMap<String, Library>,
}

impl BasicType {
    pub fn new(identity: TypeIdentity) -> Self {
        Self {
            identity,
            mapping: BTreeMap::new(),
        }
    }

    pub fn of<T: Reflect + ?Sized>() -> Self {
        Self::new(TypeIdentity::of::<T>())
    }

    pub fn map(mut self, lang: impl Into<String>, library: Library) -> Self {
        self.mapping.insert(lang.into(), library);
        self
    }

    pub fn library(&self, lang: &str) -> Option<&Library> {
        self.mapping.get(lang)
    }
}

/// Exact-match registry of basic types. Registering an identity twice replaces the earlier entry.
#[derive(Debug, Clone, Default)]
pub struct BasicTypeRegistry {
    entries: Vec<Arc<BasicType>>,
    index: HashMap<TypeIdentity, usize>,
}

impl BasicTypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry pre-populated with the `Decimal`, `Html` and `Text` markers.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        let shopspring =
            Library::new("decimal.Decimal").import("decimal", "github.com/shopspring/decimal");
        registry.register(
            BasicType::of::<Decimal>()
                .map("go", shopspring)
                .map("ts", Library::new("string"))
                .map("rust", Library::new("String"))
                .map("openapi", Library::new("string")),
        );
        for text in [BasicType::of::<Html>(), BasicType::of::<Text>()] {
            registry.register(
                text.map("go", Library::new("string"))
                    .map("ts", Library::new("string"))
                    .map("rust", Library::new("String"))
                    .map("openapi", Library::new("string")),
            );
        }
        registry
    }

    pub fn register(&mut self, basic: BasicType) {
        let basic = Arc::new(basic);
        match self.index.get(&basic.identity) {
            Some(&slot) => self.entries[slot] = basic,
            None => {
                self.index.insert(basic.identity.clone(), self.entries.len());
                self.entries.push(basic);
            }
        }
    }

    pub fn lookup(&self, identity: &TypeIdentity) -> Option<Arc<BasicType>> {
        self.index.get(identity).map(|&slot| self.entries[slot].clone())
    }

    /// Entries in first-registration order.
    pub fn all(&self) -> &[Arc<BasicType>] {
        &self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_registration_wins_in_place() {
        let mut registry = BasicTypeRegistry::with_defaults();
        let before = registry.all().len();
        registry.register(BasicType::of::<Decimal>().map("ts", Library::new("Big")));
        assert_eq!(registry.all().len(), before);
        let decimal = registry.lookup(&TypeIdentity::of::<Decimal>()).unwrap();
        assert_eq!(decimal.library("ts").unwrap().type_name, "Big");
        assert!(decimal.library("go").is_none());
        assert_eq!(registry.all()[0].identity, TypeIdentity::of::<Decimal>());
    }

    #[test]
    fn lookup_is_exact() {
        let registry = BasicTypeRegistry::with_defaults();
        assert!(registry.lookup(&TypeIdentity::new("other", "Decimal")).is_none());
        assert!(registry.lookup(&TypeIdentity::of::<Html>()).is_some());
    }
}
