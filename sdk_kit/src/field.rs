//! The language-neutral schema produced by reflection.

use std::sync::Arc;

use serde::Serialize;

use crate::basic::BasicType;

/// Type tag of the sentinel emitted where a struct refers back to itself.
pub const NESTED: &str = "nested";

/// Declarative validation rules attached to a field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Validator {
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<u64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub enums: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum FieldKind {
    Scalar,
    Struct { fields: Vec<Field> },
    Array { elem: Box<Field> },
}

/// One node of a reflected type tree.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    pub name: String,
    /// Serialized key on the wire.
    pub param: String,
    pub label: String,
    pub description: String,
    /// Original type name. Set on sentinels and by the protocol rewrite.
    pub origin: String,
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validator: Option<Validator>,
    #[serde(flatten)]
    pub kind: FieldKind,
    pub nested: bool,
    #[serde(skip)]
    pub basic_type: Option<Arc<BasicType>>,
}

impl Field {
    pub fn scalar(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            param: name.clone(),
            name,
            label: String::new(),
            description: String::new(),
            origin: String::new(),
            type_name: type_name.into(),
            validator: None,
            kind: FieldKind::Scalar,
            nested: false,
            basic_type: None,
        }
    }

    pub fn is_struct(&self) -> bool {
        matches!(self.kind, FieldKind::Struct { .. })
    }

    pub fn is_array(&self) -> bool {
        matches!(self.kind, FieldKind::Array { .. })
    }

    pub fn is_self_ref(&self) -> bool {
        self.type_name == NESTED
    }

    pub fn is_required(&self) -> bool {
        self.validator.as_ref().is_some_and(|v| v.required)
    }

    pub fn children(&self) -> &[Field] {
        match &self.kind {
            FieldKind::Struct { fields } => fields,
            _ => &[],
        }
    }

    pub fn elem(&self) -> Option<&Field> {
        match &self.kind {
            FieldKind::Array { elem } => Some(elem),
            _ => None,
        }
    }

    /// Visits this field and every descendant, parents before children.
    pub fn walk_mut(&mut self, visit: &mut impl FnMut(&mut Field)) {
        visit(self);
        match &mut self.kind {
            FieldKind::Struct { fields } => {
                for field in fields {
                    field.walk_mut(visit);
                }
            }
            FieldKind::Array { elem } => elem.walk_mut(visit),
            FieldKind::Scalar => {}
        }
    }
}

/// A registered operation with its reflected input and output.
#[derive(Debug, Clone, Serialize)]
pub struct Method {
    pub name: String,
    pub method: String,
    pub path: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input: Option<Field>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<Field>,
}
