//! Self-describing type descriptors.
//!
//! Every type that may appear in a handler signature implements [`Reflect`], which returns a
//! [`TypeDesc`]: an identity plus one of a small closed set of kinds. Struct members and
//! container elements are stored as [`TypeThunk`]s and only evaluated on demand, so a struct can
//! describe a member of its own type without recursing forever.

mod impls;

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::field::Validator;

/// Lazily produces the descriptor of a member or element type.
pub type TypeThunk = fn() -> TypeDesc;

/// Implemented by every type the exporter can describe. Usually derived with `#[api_dto]`.
pub trait Reflect {
    fn describe() -> TypeDesc;
}

/// Fully-qualified identity of a native type. Basic-type lookups match on both parts exactly.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TypeIdentity {
    pub namespace: Cow<'static, str>,
    pub name: Cow<'static, str>,
}

impl TypeIdentity {
    pub fn new(
        namespace: impl Into<Cow<'static, str>>,
        name: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }

    pub fn of<T: Reflect + ?Sized>() -> Self {
        T::describe().deref().identity
    }
}

impl fmt::Display for TypeIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.namespace.is_empty() {
            f.write_str(&self.name)
        } else {
            write!(f, "{}::{}", self.namespace, self.name)
        }
    }
}

#[derive(Debug, Clone)]
pub enum Kind {
    Scalar,
    Struct(Vec<MemberDesc>),
    Array(TypeThunk),
    /// Transparent indirection (`Box`, `Option`, `Arc`, references).
    Pointer(TypeThunk),
    Map(TypeThunk, TypeThunk),
    /// The cancellation/deadline carrying handler context.
    Context,
    /// The error half of a handler result.
    Error,
}

#[derive(Debug, Clone)]
pub struct TypeDesc {
    pub identity: TypeIdentity,
    pub kind: Kind,
    pub description: &'static str,
}

impl TypeDesc {
    pub fn scalar(name: &'static str) -> Self {
        Self::new(TypeIdentity::new("core", name), Kind::Scalar)
    }

    pub fn structure(identity: TypeIdentity, members: Vec<MemberDesc>) -> Self {
        Self::new(identity, Kind::Struct(members))
    }

    pub fn array(elem: TypeThunk) -> Self {
        Self::new(TypeIdentity::new("alloc::vec", "Vec"), Kind::Array(elem))
    }

    pub fn pointer(inner: TypeThunk) -> Self {
        Self::new(TypeIdentity::new("alloc::boxed", "Box"), Kind::Pointer(inner))
    }

    pub fn map(key: TypeThunk, value: TypeThunk) -> Self {
        Self::new(TypeIdentity::new("std::collections", "Map"), Kind::Map(key, value))
    }

    pub fn context() -> Self {
        Self::new(TypeIdentity::new("sdk_kit::context", "Context"), Kind::Context)
    }

    /// Descriptor for the error type of a `Result`. `name` is only used for diagnostics.
    pub fn error(name: &'static str) -> Self {
        Self::new(TypeIdentity::new("", name), Kind::Error)
    }

    pub fn new(identity: TypeIdentity, kind: Kind) -> Self {
        Self {
            identity,
            kind,
            description: "",
        }
    }

    pub fn with_description(mut self, description: &'static str) -> Self {
        self.description = description;
        self
    }

    /// Strips every level of pointer indirection.
    pub fn deref(self) -> TypeDesc {
        let mut desc = self;
        while let Kind::Pointer(inner) = desc.kind {
            desc = inner();
        }
        desc
    }

    pub fn is_struct(&self) -> bool {
        matches!(self.kind, Kind::Struct(_))
    }

    /// The neutral type string recorded on a `Field`, e.g. `Post`, `[]string`, `map[string]int64`.
    pub fn display_name(&self) -> String {
        match &self.kind {
            Kind::Array(elem) => format!("[]{}", elem().display_name()),
            Kind::Pointer(inner) => inner().display_name(),
            Kind::Map(key, value) => {
                format!("map[{}]{}", key().display_name(), value().display_name())
            }
            _ => self.identity.name.to_string(),
        }
    }
}

/// One member of a struct descriptor.
#[derive(Debug, Clone)]
pub struct MemberDesc {
    pub name: &'static str,
    pub param: Option<&'static str>,
    pub label: &'static str,
    pub description: &'static str,
    pub validator: Option<Validator>,
    /// Excluded members are never reflected.
    pub skip: bool,
    pub ty: TypeThunk,
}

impl MemberDesc {
    pub fn new(name: &'static str, ty: TypeThunk) -> Self {
        Self {
            name,
            param: None,
            label: "",
            description: "",
            validator: None,
            skip: false,
            ty,
        }
    }

    pub fn param(mut self, param: &'static str) -> Self {
        self.param = Some(param);
        self
    }

    pub fn label(mut self, label: &'static str) -> Self {
        self.label = label;
        self
    }

    pub fn description(mut self, description: &'static str) -> Self {
        self.description = description;
        self
    }

    pub fn required(mut self) -> Self {
        self.validator.get_or_insert_with(Validator::default).required = true;
        self
    }

    pub fn min(mut self, min: i64) -> Self {
        self.validator.get_or_insert_with(Validator::default).min = Some(min);
        self
    }

    pub fn max(mut self, max: u64) -> Self {
        self.validator.get_or_insert_with(Validator::default).max = Some(max);
        self
    }

    pub fn enums(mut self, values: &[&str]) -> Self {
        self.validator.get_or_insert_with(Validator::default).enums =
            values.iter().map(|v| v.to_string()).collect();
        self
    }

    pub fn skip(mut self) -> Self {
        self.skip = true;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Node;

    impl Reflect for Node {
        fn describe() -> TypeDesc {
            TypeDesc::structure(
                TypeIdentity::new("tests", "Node"),
                vec![
                    MemberDesc::new("value", <i64 as Reflect>::describe),
                    MemberDesc::new("next", <Option<Box<Node>> as Reflect>::describe),
                ],
            )
        }
    }

    #[test]
    fn deref_strips_nested_pointers() {
        let desc = <Option<Box<Node>> as Reflect>::describe().deref();
        assert_eq!(desc.identity, TypeIdentity::new("tests", "Node"));
        assert!(desc.is_struct());
    }

    #[test]
    fn display_names_are_neutral() {
        assert_eq!(<Vec<Vec<Node>> as Reflect>::describe().display_name(), "[][]Node");
        assert_eq!(<Vec<String> as Reflect>::describe().display_name(), "[]string");
        assert_eq!(
            <std::collections::HashMap<String, u32> as Reflect>::describe().display_name(),
            "map[string]uint32"
        );
        assert_eq!(<Option<&bool> as Reflect>::describe().display_name(), "bool");
    }

    #[test]
    fn identity_of_ignores_indirection() {
        assert_eq!(TypeIdentity::of::<Box<Node>>(), TypeIdentity::new("tests", "Node"));
        assert_eq!(TypeIdentity::of::<Node>().to_string(), "tests::Node");
    }

    #[test]
    fn member_validator_accumulates() {
        let member = MemberDesc::new("title", <String as Reflect>::describe)
            .required()
            .max(64)
            .enums(&["a", "b"]);
        let validator = member.validator.unwrap();
        assert!(validator.required);
        assert_eq!(validator.max, Some(64));
        assert_eq!(validator.min, None);
        assert_eq!(validator.enums, vec!["a".to_string(), "b".to_string()]);
    }
}
