#![allow(dead_code)]

use sdk_kit::flatten::{identity_namer, make_render_data, Shape};
use sdk_kit::{api, api_dto, Context, Error, Exporter};

#[derive(Debug)]
pub struct Failure;

/// A blog post.
#[api_dto]
pub struct Post {
    #[field(label = "Title", required)]
    pub title: String,
    pub tags: Vec<String>,
}

/// Creates a post
#[api(POST, "/post")]
pub async fn add_post(_ctx: Context, post: Post) -> Result<Post, Failure> {
    Ok(post)
}

fn neutral_typer(ty: &str, shape: Shape) -> String {
    match shape {
        Shape::Array => format!("[]{ty}"),
        _ => ty.to_string(),
    }
}

fn exporter() -> Exporter {
    Exporter::builder().version("1.0.0").discover().build().unwrap()
}

#[test]
fn add_post_yields_one_struct_referenced_both_ways() {
    let exporter = exporter();
    let data =
        make_render_data("go", "", exporter.methods(), identity_namer, neutral_typer).unwrap();

    assert_eq!(data.structs.len(), 1);
    let post = &data.structs[0];
    assert_eq!(post.name, "Post");
    assert_eq!(post.description, "A blog post.");
    let fields: Vec<(&str, &str)> = post
        .fields
        .iter()
        .map(|f| (f.param.as_str(), f.type_name.as_str()))
        .collect();
    assert_eq!(fields, vec![("title", "string"), ("tags", "[]string")]);
    assert!(post.fields[0].required);
    assert_eq!(post.fields[0].label, "Title");

    let method = &data.methods[0];
    assert_eq!(method.name, "add_post");
    assert_eq!(method.description, "Creates a post");
    assert_eq!(method.input_type, "Post");
    assert_eq!(method.output_type, "Post");
    assert!(method.input_ref && method.output_ref && method.output_struct);
}

#[test]
fn go_sdk_declares_post_and_the_method() {
    let files = exporter().generate("go", "blog").unwrap();
    let names: Vec<_> = files.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["service.make.go", "values.make.go"]);
    let service = &files[0].content;
    assert!(service.starts_with("package blog"));
    assert!(service.contains("type Post struct {"));
    assert!(service.contains("Title string `json:\"title\"`"));
    assert!(service.contains("AddPost(ctx context.Context, in *Post) (out *Post, err error)"));
}

#[test]
fn unknown_target_produces_no_files() {
    let exporter = exporter();
    match exporter.generate("kotlin", "") {
        Err(Error::MakerNotFound(target)) => assert_eq!(target, "kotlin"),
        other => panic!("expected MakerNotFound, got {other:?}"),
    }
}

#[test]
fn generation_is_deterministic() {
    let exporter = exporter();
    for target in exporter.targets().map(str::to_string).collect::<Vec<_>>() {
        let first = exporter.generate_json(&target, "").unwrap();
        let second = exporter.generate_json(&target, "").unwrap();
        assert_eq!(first, second, "{target} output differs between runs");
    }
}

#[test]
fn protocol_serializes_the_reflected_tree() {
    let protocol = serde_json::to_value(exporter().protocol("ts")).unwrap();
    assert_eq!(protocol["version"], "1.0.0");
    let input = &protocol["methods"][0]["input"];
    assert_eq!(input["kind"], "struct");
    assert_eq!(input["fields"][1]["param"], "tags");
    assert_eq!(input["fields"][1]["type"], "string[]");
    assert_eq!(input["fields"][1]["origin"], "[]string");
    assert_eq!(input["fields"][0]["validator"]["required"], true);
}
