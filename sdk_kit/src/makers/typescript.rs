use heck::ToLowerCamelCase;

use super::{File, Maker};
use crate::error::Result;
use crate::field::Method;
use crate::flatten::{make_render_data, NameKind, Neutral, RenderData, Shape};
use crate::render::{render, tidy_formatter};

const ANGULAR_TEMPLATE: &str = include_str!("templates/angular_service.jinja");
const UMI_API_TEMPLATE: &str = include_str!("templates/umi_api.jinja");
const UMI_TYPINGS_TEMPLATE: &str = include_str!("templates/umi_typings.jinja");
const AXIOS_TEMPLATE: &str = include_str!("templates/axios_service.jinja");

/// TypeScript spelling of a neutral scalar type.
pub fn ts_scalar(ty: &str) -> String {
    match Neutral::parse(ty) {
        Neutral::Array(elem) => format!("{}[]", ts_scalar(elem)),
        Neutral::Map(key, value) => format!("Record<{}, {}>", ts_scalar(key), ts_scalar(value)),
        Neutral::Name(name) => match name {
            "int" | "int8" | "int16" | "int32" | "int64" | "uint" | "uint8" | "uint16" | "uint32"
            | "uint64" | "float32" | "float64" => "number".to_string(),
            "bool" => "boolean".to_string(),
            other => other.to_string(),
        },
    }
}

fn ts_namer(name: &str, kind: NameKind) -> String {
    match kind {
        NameKind::Method => name.to_lower_camel_case(),
        NameKind::Type | NameKind::Field => name.to_string(),
    }
}

fn ts_typer(ty: &str, shape: Shape) -> String {
    match shape {
        Shape::Scalar => ts_scalar(ty),
        Shape::Array => format!("{ty}[]"),
        Shape::Struct | Shape::SelfRef | Shape::Basic => ty.to_string(),
    }
}

fn ts_data(package: &str, methods: &[Method]) -> Result<RenderData> {
    make_render_data("ts", package, methods, ts_namer, ts_typer)
}

/// Angular `HttpClient` service.
pub struct AngularMaker;

impl Maker for AngularMaker {
    fn lang(&self) -> &str {
        "ts"
    }

    fn make(&self, package: &str, methods: Vec<Method>) -> Result<Vec<File>> {
        let data = ts_data(package, &methods)?;
        let service = render("service.make.ts", ANGULAR_TEMPLATE, &data, tidy_formatter)?;
        Ok(vec![File::new("service.make.ts", service)])
    }
}

/// Umi `request` functions with the types declared in the global `API` namespace.
pub struct UmiMaker;

impl Maker for UmiMaker {
    fn lang(&self) -> &str {
        "ts"
    }

    fn make(&self, package: &str, methods: Vec<Method>) -> Result<Vec<File>> {
        let data = ts_data(package, &methods)?;
        let api = render("api.make.ts", UMI_API_TEMPLATE, &data, tidy_formatter)?;
        let typings = render("typings.d.ts", UMI_TYPINGS_TEMPLATE, &data, tidy_formatter)?;
        Ok(vec![File::new("api.make.ts", api), File::new("typings.d.ts", typings)])
    }
}

pub struct AxiosMaker;

impl Maker for AxiosMaker {
    fn lang(&self) -> &str {
        "ts"
    }

    fn make(&self, package: &str, methods: Vec<Method>) -> Result<Vec<File>> {
        let data = ts_data(package, &methods)?;
        let service = render("service.make.ts", AXIOS_TEMPLATE, &data, tidy_formatter)?;
        Ok(vec![File::new("service.make.ts", service)])
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::basic::{BasicType, Library};
    use crate::field::{Field, FieldKind};
    use crate::schema::TypeIdentity;

    fn method() -> Method {
        let mut input = Field::scalar("in", "GetPost");
        input.kind = FieldKind::Struct {
            fields: vec![Field::scalar("id", "uint64")],
        };
        let mut output = Field::scalar("out", "[]string");
        output.kind = FieldKind::Array {
            elem: Box::new(Field::scalar("out", "string")),
        };
        Method {
            name: "list_titles".to_string(),
            method: "GET".to_string(),
            path: "/titles".to_string(),
            description: "List titles".to_string(),
            input: Some(input),
            output: Some(output),
        }
    }

    fn order_method() -> Method {
        let big = BasicType::new(TypeIdentity::new("tests", "Decimal"))
            .map("ts", Library::new("Big").import("Big", "big.js"));
        let mut amount = Field::scalar("amount", "Decimal");
        amount.basic_type = Some(Arc::new(big));
        let mut input = Field::scalar("in", "Order");
        input.kind = FieldKind::Struct {
            fields: vec![amount],
        };
        Method {
            name: "pay".to_string(),
            method: "POST".to_string(),
            path: "/pay".to_string(),
            description: String::new(),
            input: Some(input),
            output: None,
        }
    }

    #[test]
    fn scalars_map_to_typescript() {
        assert_eq!(ts_scalar("int64"), "number");
        assert_eq!(ts_scalar("bool"), "boolean");
        assert_eq!(ts_scalar("map[string][]float64"), "Record<string, number[]>");
        assert_eq!(ts_typer(&ts_typer("Post", Shape::Struct), Shape::Array), "Post[]");
    }

    #[test]
    fn umi_prefixes_only_generated_types() {
        let files = UmiMaker.make("", vec![method()]).unwrap();
        assert_eq!(files[0].name, "api.make.ts");
        let api = &files[0].content;
        assert!(api.contains("export async function listTitles(params: API.GetPost,"), "{api}");
        assert!(api.contains("request<string[]>('/titles'"), "{api}");
        assert!(api.contains("    params,\n"), "{api}");
        let typings = &files[1].content;
        assert!(typings.contains("export interface GetPost {"), "{typings}");
        assert!(typings.contains("id?: number;"), "{typings}");
        assert!(typings.starts_with("declare namespace API {\n"), "{typings}");
        assert!(!typings.contains("import"), "{typings}");
    }

    #[test]
    fn umi_typings_with_imports_stay_global() {
        let files = UmiMaker.make("", vec![order_method()]).unwrap();
        let api = &files[0].content;
        assert!(api.contains("import { Big } from 'big.js';\n"), "{api}");
        assert!(api.contains("pay(params: API.Order,"), "{api}");

        let typings = &files[1].content;
        let head = "import { Big } from 'big.js';\n\ndeclare global {\n  namespace API {\n";
        assert!(typings.starts_with(head), "{typings}");
        assert!(
            typings.contains("    export interface Order {\n      amount?: Big;\n    }\n"),
            "{typings}"
        );
        assert!(typings.ends_with("  }\n}\n"), "{typings}");
    }

    #[test]
    fn axios_and_angular_import_basic_types() {
        for maker in [&AxiosMaker as &dyn Maker, &AngularMaker] {
            let files = maker.make("", vec![order_method()]).unwrap();
            let content = &files[0].content;
            assert!(content.contains("import { Big } from 'big.js';"), "{content}");
            assert!(content.contains("amount?: Big;"), "{content}");
        }
    }

    #[test]
    fn angular_puts_get_params_in_query() {
        let files = AngularMaker.make("", vec![method()]).unwrap();
        let service = &files[0].content;
        assert!(service.contains("// List titles"), "{service}");
        assert!(service.contains(
            "listTitles(params: GetPost, options?: HttpOptions): Observable<string[]> {"
        ));
        assert!(service.contains("options.params = params;"));
        assert!(!service.contains("options.body"));
    }
}
