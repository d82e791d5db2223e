#![allow(dead_code)]

use sdk_kit::flatten::{identity_namer, make_render_data, Shape};
use sdk_kit::Exporter;

#[derive(Debug)]
pub struct Failure;

mod drafts {
    use super::Failure;
    use sdk_kit::{api, api_dto, Context};

    #[api_dto]
    pub struct Post {
        pub title: String,
        pub body: String,
    }

    #[api(POST, "/a/draft")]
    pub async fn save_draft(_ctx: Context, post: Post) -> Result<Post, Failure> {
        Ok(post)
    }
}

mod archive {
    use super::Failure;
    use sdk_kit::{api, api_dto, Context};

    #[api_dto]
    pub struct Post {
        pub body: String,
        pub extra: u32,
    }

    #[api(POST, "/b/archive")]
    pub async fn archive(_ctx: Context, post: Post) -> Result<(), Failure> {
        let _ = post;
        Ok(())
    }
}

fn plain_typer(ty: &str, shape: Shape) -> String {
    match shape {
        Shape::Array => format!("[]{ty}"),
        _ => ty.to_string(),
    }
}

#[test]
fn first_definition_wins_for_a_shared_name() {
    let exporter = Exporter::builder().discover().build().unwrap();
    assert_eq!(exporter.methods().len(), 2);

    let data = make_render_data("go", "", exporter.methods(), identity_namer, plain_typer).unwrap();
    assert_eq!(data.structs.len(), 1);
    let post = &data.structs[0];
    assert_eq!(post.name, "Post");
    let params: Vec<_> = post.fields.iter().map(|f| f.param.as_str()).collect();
    assert_eq!(params, vec!["title", "body"]);

    let inputs: Vec<_> = data.methods.iter().map(|m| m.input_type.as_str()).collect();
    assert_eq!(inputs, vec!["Post", "Post"]);
}

#[test]
fn every_target_accepts_the_shared_name() {
    let exporter = Exporter::builder().discover().build().unwrap();
    for target in ["go", "angular", "umi", "axios", "rust", "openapi"] {
        assert!(exporter.generate(target, "").is_ok(), "{target} failed");
    }
}
