use heck::{ToSnakeCase, ToUpperCamelCase};

use super::{File, Maker};
use crate::error::Result;
use crate::field::Method;
use crate::flatten::{make_render_data, NameKind, Neutral, Shape};
use crate::render::render;

const CLIENT_TEMPLATE: &str = include_str!("templates/rust_client.jinja");

const KEYWORDS: &[&str] = &[
    "abstract", "as", "async", "await", "become", "box", "break", "const", "continue", "do", "dyn",
    "else", "enum", "extern", "false", "final", "fn", "for", "gen", "if", "impl", "in", "let",
    "loop", "macro", "match", "mod", "move", "mut", "override", "priv", "pub", "ref", "return",
    "static", "struct", "trait", "true", "try", "type", "typeof", "unsafe", "unsized", "use",
    "virtual", "where", "while", "yield",
];

/// Async `reqwest` client in a single `client.make.rs`.
pub struct RustMaker;

impl Maker for RustMaker {
    fn lang(&self) -> &str {
        "rust"
    }

    fn make(&self, package: &str, methods: Vec<Method>) -> Result<Vec<File>> {
        let package = if package.is_empty() { "api" } else { package };
        let data = make_render_data(self.lang(), package, &methods, rust_namer, rust_typer)?;
        let client = render("client.make.rs", CLIENT_TEMPLATE, &data, rust_formatter)?;
        Ok(vec![File::new("client.make.rs", client)])
    }
}

/// Parses the source with `syn` and pretty-prints it.
pub fn rust_formatter(source: &str) -> std::result::Result<String, String> {
    let file = syn::parse_file(source).map_err(|e| format!("generated code is invalid: {e}"))?;
    Ok(prettyplease::unparse(&file))
}

fn rust_namer(name: &str, kind: NameKind) -> String {
    match kind {
        NameKind::Type => name.to_upper_camel_case(),
        NameKind::Method | NameKind::Field => {
            let name = name.to_snake_case();
            match name.as_str() {
                "self" | "super" | "crate" => format!("{name}_"),
                n if KEYWORDS.contains(&n) => format!("r#{name}"),
                _ => name,
            }
        }
    }
}

fn rust_typer(ty: &str, shape: Shape) -> String {
    match shape {
        Shape::Struct | Shape::Basic => ty.to_string(),
        Shape::SelfRef => format!("Box<{ty}>"),
        Shape::Array => format!("Vec<{ty}>"),
        Shape::Scalar => rust_scalar(ty),
    }
}

fn rust_scalar(ty: &str) -> String {
    match Neutral::parse(ty) {
        Neutral::Array(elem) => format!("Vec<{}>", rust_scalar(elem)),
        Neutral::Map(key, value) => format!(
            "std::collections::HashMap<{}, {}>",
            rust_scalar(key),
            rust_scalar(value)
        ),
        Neutral::Name(name) => match name {
            "bool" => "bool",
            "string" => "String",
            "int8" => "i8",
            "int16" => "i16",
            "int32" => "i32",
            "int64" | "int" => "i64",
            "uint8" => "u8",
            "uint16" => "u16",
            "uint32" => "u32",
            "uint64" | "uint" => "u64",
            "float32" => "f32",
            "float64" => "f64",
            "any" => "serde_json::Value",
            other => other,
        }
        .to_string(),
    }
}
