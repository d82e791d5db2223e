//! Flattens reflected methods into template-ready data for one target.
//!
//! Struct definitions are collected from every method and deduplicated by rendered name: the
//! first definition seen wins and later ones are dropped. Imports needed by basic-type
//! substitutions are deduplicated by source location. Two methods must not render to the same
//! name, and descriptions are folded onto one line so templates can put them in line comments.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::error::{Error, Result};
use crate::field::{Field, FieldKind, Method};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameKind {
    Method,
    Type,
    Field,
}

/// Rendered shape of a type reference, as passed to a [`Typer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// A neutral scalar name such as `int64`, `string` or `map[string]bool`.
    Scalar,
    /// Already substituted by a basic-type mapping for this target.
    Basic,
    Struct,
    /// Back-reference to a struct currently being defined.
    SelfRef,
    /// The argument is the already rendered element type.
    Array,
}

pub type Namer = fn(&str, NameKind) -> String;
pub type Typer = fn(&str, Shape) -> String;

pub fn identity_namer(name: &str, _: NameKind) -> String {
    name.to_string()
}

/// Neutral type strings as they appear on scalar fields.
#[derive(Debug, PartialEq, Eq)]
pub enum Neutral<'a> {
    Array(&'a str),
    Map(&'a str, &'a str),
    Name(&'a str),
}

impl<'a> Neutral<'a> {
    pub fn parse(ty: &'a str) -> Self {
        if let Some(elem) = ty.strip_prefix("[]") {
            return Neutral::Array(elem);
        }
        if let Some(rest) = ty.strip_prefix("map[") {
            let mut depth = 1usize;
            for (i, c) in rest.char_indices() {
                match c {
                    '[' => depth += 1,
                    ']' => {
                        depth -= 1;
                        if depth == 0 {
                            return Neutral::Map(&rest[..i], &rest[i + 1..]);
                        }
                    }
                    _ => {}
                }
            }
        }
        Neutral::Name(ty)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RenderPackage {
    pub from: String,
    pub imports: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct RenderMethod {
    pub name: String,
    pub input_type: String,
    pub output_type: String,
    /// The input references a generated struct.
    pub input_ref: bool,
    pub output_ref: bool,
    /// The output is a single struct, not an array or scalar.
    pub output_struct: bool,
    pub description: String,
    pub method: String,
    pub path: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RenderField {
    pub name: String,
    pub param: String,
    #[serde(rename = "type")]
    pub type_name: String,
    pub description: String,
    pub required: bool,
    pub label: String,
    /// The field points back at a struct that encloses it.
    pub self_ref: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct RenderStruct {
    pub name: String,
    pub description: String,
    pub fields: Vec<RenderField>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct RenderData {
    pub package: String,
    pub packages: Vec<RenderPackage>,
    pub methods: Vec<RenderMethod>,
    pub structs: Vec<RenderStruct>,
}

pub fn make_render_data(
    lang: &str,
    package: &str,
    methods: &[Method],
    namer: Namer,
    typer: Typer,
) -> Result<RenderData> {
    let mut flattener = Flattener {
        lang,
        namer,
        typer,
        packages: Vec::new(),
        package_index: HashMap::new(),
        seen: HashSet::new(),
        structs: Vec::new(),
    };
    let mut rendered: Vec<RenderMethod> = Vec::with_capacity(methods.len());
    for method in methods {
        let next = flattener.method(method)?;
        if let Some(taken) = rendered.iter().find(|m| m.name == next.name) {
            return Err(Error::SchemaResolution(format!(
                "methods '{} {}' and '{} {}' both render as '{}' for '{}'",
                taken.method, taken.path, next.method, next.path, next.name, lang
            )));
        }
        rendered.push(next);
        for io in [&method.input, &method.output].into_iter().flatten() {
            flattener.collect(io)?;
        }
    }
    Ok(RenderData {
        package: package.to_string(),
        packages: flattener.packages,
        methods: rendered,
        structs: flattener.structs,
    })
}

struct Flattener<'a> {
    lang: &'a str,
    namer: Namer,
    typer: Typer,
    packages: Vec<RenderPackage>,
    package_index: HashMap<String, usize>,
    seen: HashSet<String>,
    structs: Vec<RenderStruct>,
}

impl Flattener<'_> {
    fn method(&mut self, method: &Method) -> Result<RenderMethod> {
        let mut rendered = RenderMethod {
            name: (self.namer)(&method.name, NameKind::Method),
            description: single_line(&method.description),
            method: method.method.clone(),
            path: method.path.clone(),
            ..Default::default()
        };
        if let Some(input) = &method.input {
            rendered.input_type = self.type_ref(input)?;
            rendered.input_ref = refers_to_struct(input);
        }
        if let Some(output) = &method.output {
            rendered.output_type = self.type_ref(output)?;
            rendered.output_ref = refers_to_struct(output);
            rendered.output_struct = output.is_struct();
        }
        Ok(rendered)
    }

    /// Renders a reference to the type of `field` for this target.
    fn type_ref(&mut self, field: &Field) -> Result<String> {
        if let Some(basic) = &field.basic_type {
            return match basic.library(self.lang) {
                Some(library) if library.type_name.is_empty() => {
                    Err(Error::SchemaResolution(format!(
                        "basic type '{}' has an empty '{}' mapping",
                        basic.identity, self.lang
                    )))
                }
                Some(library) => {
                    if let Some(package) = &library.package {
                        self.add_import(&package.from, &package.import);
                    }
                    Ok((self.typer)(&library.type_name, Shape::Basic))
                }
                None => {
                    tracing::warn!(
                        "basic type '{}' has no '{}' mapping, using '{}'",
                        basic.identity,
                        self.lang,
                        field.type_name
                    );
                    Ok((self.typer)(&field.type_name, Shape::Scalar))
                }
            };
        }
        if field.is_self_ref() {
            let name = (self.namer)(&field.origin, NameKind::Type);
            return Ok((self.typer)(&name, Shape::SelfRef));
        }
        match &field.kind {
            FieldKind::Struct { .. } => {
                let name = (self.namer)(&field.type_name, NameKind::Type);
                Ok((self.typer)(&name, Shape::Struct))
            }
            FieldKind::Array { elem } => {
                // Elements sit behind the container already, so a back-reference renders plainly.
                let elem = if elem.is_self_ref() && elem.basic_type.is_none() {
                    let name = (self.namer)(&elem.origin, NameKind::Type);
                    (self.typer)(&name, Shape::Struct)
                } else {
                    self.type_ref(elem)?
                };
                Ok((self.typer)(&elem, Shape::Array))
            }
            FieldKind::Scalar => Ok((self.typer)(&field.type_name, Shape::Scalar)),
        }
    }

    fn collect(&mut self, field: &Field) -> Result<()> {
        match &field.kind {
            FieldKind::Struct { .. } if field.basic_type.is_none() => self.define(field),
            FieldKind::Array { elem } if field.nested => self.collect(elem),
            _ => Ok(()),
        }
    }

    fn define(&mut self, field: &Field) -> Result<()> {
        let name = (self.namer)(&field.type_name, NameKind::Type);
        if !self.seen.insert(name.clone()) {
            return Ok(());
        }
        let slot = self.structs.len();
        self.structs.push(RenderStruct {
            name,
            description: single_line(&field.description),
            fields: Vec::new(),
        });
        let mut fields = Vec::with_capacity(field.children().len());
        for child in field.children() {
            fields.push(RenderField {
                name: (self.namer)(&child.name, NameKind::Field),
                param: child.param.clone(),
                type_name: self.type_ref(child)?,
                description: single_line(&child.description),
                required: child.is_required(),
                label: child.label.clone(),
                self_ref: child.is_self_ref(),
            });
            self.collect(child)?;
        }
        self.structs[slot].fields = fields;
        Ok(())
    }

    fn add_import(&mut self, from: &str, import: &str) {
        if from.is_empty() {
            return;
        }
        let slot = match self.package_index.get(from) {
            Some(&slot) => slot,
            None => {
                self.package_index.insert(from.to_string(), self.packages.len());
                self.packages.push(RenderPackage {
                    from: from.to_string(),
                    imports: Vec::new(),
                });
                self.packages.len() - 1
            }
        };
        let imports = &mut self.packages[slot].imports;
        if !import.is_empty() && !imports.iter().any(|i| i == import) {
            imports.push(import.to_string());
        }
    }
}

/// Joins the non-blank lines of `text` with single spaces.
fn single_line(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn refers_to_struct(field: &Field) -> bool {
    if field.basic_type.is_some() {
        return false;
    }
    match &field.kind {
        FieldKind::Struct { .. } => true,
        FieldKind::Array { elem } => refers_to_struct(elem),
        FieldKind::Scalar => field.is_self_ref(),
    }
}
