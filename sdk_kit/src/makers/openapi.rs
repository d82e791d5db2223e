use std::collections::{BTreeMap, HashSet};

use utoipa::openapi::path::{HttpMethod, OperationBuilder, ParameterBuilder, ParameterIn};
use utoipa::openapi::request_body::RequestBodyBuilder;
use utoipa::openapi::schema::{
    AdditionalProperties, ArrayBuilder, KnownFormat, Object, ObjectBuilder, SchemaFormat, Type,
};
use utoipa::openapi::{
    self, ComponentsBuilder, ContentBuilder, Ref, RefOr, Required, ResponseBuilder,
    ResponsesBuilder, Schema,
};

use super::{File, Maker};
use crate::error::{Error, Result};
use crate::field::{Field, FieldKind, Method};
use crate::flatten::Neutral;

/// OpenAPI 3.1 document describing every method, written to `openapi.json`.
pub struct OpenApiMaker;

impl Maker for OpenApiMaker {
    fn lang(&self) -> &str {
        "openapi"
    }

    fn make(&self, package: &str, methods: Vec<Method>) -> Result<Vec<File>> {
        let title = if package.is_empty() { "api" } else { package };
        let document = build_document(self.lang(), title, &methods)?;
        Ok(vec![File::new("openapi.json", document.to_pretty_json()?)])
    }
}

fn build_document(lang: &str, title: &str, methods: &[Method]) -> Result<openapi::OpenApi> {
    let mut openapi = openapi::OpenApiBuilder::new()
        .info(openapi::InfoBuilder::new().title(title).version("0.1.0").build())
        .paths(openapi::Paths::new())
        .build();
    let mut schemas = SchemaCollector {
        lang,
        components: BTreeMap::new(),
    };

    let mut operation_ids = HashSet::new();
    for method in methods {
        if !operation_ids.insert(method.name.as_str()) {
            return Err(Error::SchemaResolution(format!(
                "operation id '{}' is used twice, again by '{} {}'",
                method.name, method.method, method.path
            )));
        }
        let mut operation = OperationBuilder::new()
            .operation_id(Some(method.name.clone()))
            .description((!method.description.is_empty()).then(|| method.description.clone()));

        let http_method = match method.method.to_lowercase().as_str() {
            "get" => HttpMethod::Get,
            "post" => HttpMethod::Post,
            "put" => HttpMethod::Put,
            "delete" => HttpMethod::Delete,
            "patch" => HttpMethod::Patch,
            "options" => HttpMethod::Options,
            "head" => HttpMethod::Head,
            "trace" => HttpMethod::Trace,
            other => {
                tracing::warn!("skipping '{}' with unsupported method '{}'", method.name, other);
                continue;
            }
        };

        if let Some(input) = &method.input {
            if matches!(http_method, HttpMethod::Get | HttpMethod::Delete) {
                for child in input.children() {
                    let parameter = ParameterBuilder::new()
                        .name(&child.param)
                        .parameter_in(ParameterIn::Query)
                        .required(required(child))
                        .description(
                            (!child.description.is_empty()).then(|| child.description.clone()),
                        )
                        .schema(Some(schemas.schema_of(child)?))
                        .build();
                    operation = operation.parameter(parameter);
                }
            } else {
                let body = RequestBodyBuilder::new()
                    .required(Some(Required::True))
                    .content(
                        "application/json",
                        ContentBuilder::new().schema(Some(schemas.schema_of(input)?)).build(),
                    )
                    .build();
                operation = operation.request_body(Some(body));
            }
        }

        let mut response = ResponseBuilder::new().description("OK");
        if let Some(output) = &method.output {
            response = response.content(
                "application/json",
                ContentBuilder::new().schema(Some(schemas.schema_of(output)?)).build(),
            );
        }
        let responses = ResponsesBuilder::new().response("200", response.build()).build();
        operation = operation.responses(responses);

        let operation = operation.build();
        let path_item = openapi.paths.paths.entry(method.path.clone()).or_default();
        match http_method {
            HttpMethod::Get => path_item.get = Some(operation),
            HttpMethod::Post => path_item.post = Some(operation),
            HttpMethod::Put => path_item.put = Some(operation),
            HttpMethod::Delete => path_item.delete = Some(operation),
            HttpMethod::Options => path_item.options = Some(operation),
            HttpMethod::Head => path_item.head = Some(operation),
            HttpMethod::Patch => path_item.patch = Some(operation),
            HttpMethod::Trace => path_item.trace = Some(operation),
        }
    }

    let components = ComponentsBuilder::new().schemas_from_iter(schemas.components).build();
    openapi.components = Some(components);
    Ok(openapi)
}

fn required(field: &Field) -> Required {
    if field.is_required() {
        Required::True
    } else {
        Required::False
    }
}

struct SchemaCollector<'a> {
    lang: &'a str,
    components: BTreeMap<String, RefOr<Schema>>,
}

impl SchemaCollector<'_> {
    fn schema_of(&mut self, field: &Field) -> Result<RefOr<Schema>> {
        if let Some(basic) = &field.basic_type {
            return match basic.library(self.lang) {
                Some(library) if library.type_name.is_empty() => {
                    Err(Error::SchemaResolution(format!(
                        "basic type '{}' has an empty '{}' mapping",
                        basic.identity, self.lang
                    )))
                }
                Some(library) => Ok(named_schema(&library.type_name)),
                None => {
                    tracing::warn!(
                        "basic type '{}' has no '{}' mapping",
                        basic.identity,
                        self.lang
                    );
                    Ok(primitive(Type::String))
                }
            };
        }
        if field.is_self_ref() {
            return Ok(RefOr::Ref(Ref::from_schema_name(field.origin.clone())));
        }
        match &field.kind {
            FieldKind::Struct { fields } => {
                if !self.components.contains_key(&field.type_name) {
                    // Reserve the name before recursing; a later definition never replaces it.
                    self.components
                        .insert(field.type_name.clone(), RefOr::T(Schema::Object(Object::new())));
                    let mut object = ObjectBuilder::new().schema_type(Type::Object);
                    if !field.description.is_empty() {
                        object = object.description(Some(field.description.clone()));
                    }
                    for child in fields {
                        object = object.property(&child.param, self.member_schema(child)?);
                        if child.is_required() {
                            object = object.required(&child.param);
                        }
                    }
                    self.components
                        .insert(field.type_name.clone(), RefOr::T(Schema::Object(object.build())));
                }
                Ok(RefOr::Ref(Ref::from_schema_name(field.type_name.clone())))
            }
            FieldKind::Array { elem } => Ok(RefOr::T(Schema::Array(
                ArrayBuilder::new().items(self.schema_of(elem)?).build(),
            ))),
            FieldKind::Scalar => Ok(neutral_schema(&field.type_name)),
        }
    }

    /// Schema of a struct member, with its label, description and validator applied.
    fn member_schema(&mut self, field: &Field) -> Result<RefOr<Schema>> {
        let schema = self.schema_of(field)?;
        let RefOr::T(Schema::Object(object)) = schema else {
            return Ok(schema);
        };
        let mut object = ObjectBuilder::from(object);
        if !field.label.is_empty() {
            object = object.title(Some(field.label.clone()));
        }
        if !field.description.is_empty() {
            object = object.description(Some(field.description.clone()));
        }
        if let Some(validator) = &field.validator {
            if !validator.enums.is_empty() {
                object = object.enum_values(Some(validator.enums.clone()));
            }
            if field.type_name == "string" {
                object = object
                    .min_length(validator.min.and_then(|min| usize::try_from(min).ok()))
                    .max_length(validator.max.and_then(|max| usize::try_from(max).ok()));
            }
        }
        Ok(RefOr::T(Schema::Object(object.build())))
    }
}

fn primitive(ty: Type) -> RefOr<Schema> {
    RefOr::T(Schema::Object(ObjectBuilder::new().schema_type(ty).build()))
}

fn formatted(ty: Type, format: KnownFormat) -> RefOr<Schema> {
    RefOr::T(Schema::Object(
        ObjectBuilder::new()
            .schema_type(ty)
            .format(Some(SchemaFormat::KnownFormat(format)))
            .build(),
    ))
}

/// A basic-type mapping: an OpenAPI primitive name, or the name of a component.
fn named_schema(name: &str) -> RefOr<Schema> {
    match name {
        "string" => primitive(Type::String),
        "integer" => primitive(Type::Integer),
        "number" => primitive(Type::Number),
        "boolean" => primitive(Type::Boolean),
        "object" => primitive(Type::Object),
        other => RefOr::Ref(Ref::from_schema_name(other)),
    }
}

fn neutral_schema(ty: &str) -> RefOr<Schema> {
    match Neutral::parse(ty) {
        Neutral::Array(elem) => {
            RefOr::T(Schema::Array(ArrayBuilder::new().items(neutral_schema(elem)).build()))
        }
        Neutral::Map(_, value) => RefOr::T(Schema::Object(
            ObjectBuilder::new()
                .schema_type(Type::Object)
                .additional_properties(Some(AdditionalProperties::RefOr(neutral_schema(value))))
                .build(),
        )),
        Neutral::Name(name) => match name {
            "bool" => primitive(Type::Boolean),
            "string" => primitive(Type::String),
            "int8" | "int16" | "int32" | "uint8" | "uint16" | "uint32" => {
                formatted(Type::Integer, KnownFormat::Int32)
            }
            "int" | "int64" | "uint" | "uint64" => formatted(Type::Integer, KnownFormat::Int64),
            "float32" => formatted(Type::Number, KnownFormat::Float),
            "float64" => formatted(Type::Number, KnownFormat::Double),
            "any" => RefOr::T(Schema::Object(Object::new())),
            other => RefOr::Ref(Ref::from_schema_name(other)),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::Validator;

    fn post_method() -> Method {
        let mut title = Field::scalar("title", "string");
        title.validator = Some(Validator {
            required: true,
            max: Some(120),
            ..Default::default()
        });
        let mut parent = Field::scalar("parent", "Post");
        parent.origin = "Post".to_string();
        parent.type_name = crate::field::NESTED.to_string();
        let mut post = Field::scalar("out", "Post");
        post.kind = FieldKind::Struct {
            fields: vec![title, parent, Field::scalar("meta", "map[string]int64")],
        };
        let mut query = Field::scalar("in", "GetPost");
        query.kind = FieldKind::Struct {
            fields: vec![Field::scalar("id", "uint64")],
        };
        Method {
            name: "get_post".to_string(),
            method: "GET".to_string(),
            path: "/post".to_string(),
            description: String::new(),
            input: Some(query),
            output: Some(post),
        }
    }

    #[test]
    fn document_has_components_and_query_parameters() {
        let files = OpenApiMaker.make("blog", vec![post_method()]).unwrap();
        assert_eq!(files[0].name, "openapi.json");
        let doc: serde_json::Value = serde_json::from_str(&files[0].content).unwrap();
        assert_eq!(doc["info"]["title"], "blog");
        let get = &doc["paths"]["/post"]["get"];
        assert_eq!(get["operationId"], "get_post");
        assert_eq!(get["parameters"][0]["name"], "id");
        assert_eq!(get["parameters"][0]["in"], "query");
        assert_eq!(
            get["responses"]["200"]["content"]["application/json"]["schema"]["$ref"],
            "#/components/schemas/Post"
        );
        let post = &doc["components"]["schemas"]["Post"];
        assert_eq!(post["required"][0], "title");
        assert_eq!(post["properties"]["title"]["maxLength"], 120);
        assert_eq!(post["properties"]["parent"]["$ref"], "#/components/schemas/Post");
        assert_eq!(post["properties"]["meta"]["type"], "object");
        assert!(doc["components"]["schemas"].get("GetPost").is_none());
    }

    #[test]
    fn duplicate_operation_ids_are_rejected() {
        let mut other = post_method();
        other.path = "/admin/post".to_string();
        let err = OpenApiMaker.make("", vec![post_method(), other]).unwrap_err();
        match err {
            Error::SchemaResolution(message) => {
                assert!(message.contains("/admin/post"), "{message}")
            }
            other => panic!("expected SchemaResolution, got {other:?}"),
        }
    }
}
