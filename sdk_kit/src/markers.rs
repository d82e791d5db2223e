//! Marker types with special meaning to the exporter.
//!
//! `Html` and `Text` signal a non-JSON response body. `Decimal` is an arbitrary-precision
//! decimal carried as its string form. All three are registered as default basic types, so they
//! render as opaque scalars on every target.

use serde::{Deserialize, Serialize};

use crate::schema::{MemberDesc, Reflect, TypeDesc, TypeIdentity};

pub const NAMESPACE: &str = "sdk_kit::markers";

/// An HTML document returned as `text/html`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Html(pub String);

/// Plain text returned as `text/plain`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Text(pub String);

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Decimal {
    repr: String,
}

impl Decimal {
    pub fn new(repr: impl Into<String>) -> Self {
        Self { repr: repr.into() }
    }

    pub fn as_str(&self) -> &str {
        &self.repr
    }
}

impl Reflect for Html {
    fn describe() -> TypeDesc {
        TypeDesc::new(TypeIdentity::new(NAMESPACE, "Html"), crate::schema::Kind::Scalar)
    }
}

impl Reflect for Text {
    fn describe() -> TypeDesc {
        TypeDesc::new(TypeIdentity::new(NAMESPACE, "Text"), crate::schema::Kind::Scalar)
    }
}

// Struct-shaped on purpose: it only stays opaque because it is a registered basic type.
impl Reflect for Decimal {
    fn describe() -> TypeDesc {
        TypeDesc::structure(
            TypeIdentity::new(NAMESPACE, "Decimal"),
            vec![MemberDesc::new("repr", <String as Reflect>::describe)],
        )
    }
}
