use std::fmt;

use sdk_kit::{api, Context, Html};

use crate::dtos::{
    AddPostRequest, DeletePostRequest, GetPostRequest, ListPostsRequest, Post, PostPage,
};

#[derive(Debug)]
pub enum AppError {
    NotFound(u64),
    Cancelled,
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::NotFound(id) => write!(f, "post {id} not found"),
            AppError::Cancelled => f.write_str("request cancelled"),
        }
    }
}

impl std::error::Error for AppError {}

fn sample(id: u64, title: String) -> Post {
    Post {
        id,
        title,
        body: Html(String::new()),
        tags: Vec::new(),
        category: None,
        comments: Vec::new(),
        price: None,
    }
}

/// Creates a post
#[api(POST, "/post")]
pub async fn add_post(ctx: Context, req: AddPostRequest) -> Result<Post, AppError> {
    if ctx.is_done() {
        return Err(AppError::Cancelled);
    }
    let mut post = sample(1, req.title);
    post.body = req.body;
    post.tags = req.tags;
    Ok(post)
}

/// Fetches one post
#[api(GET, "/post")]
pub async fn get_post(_ctx: Context, req: GetPostRequest) -> Result<Post, AppError> {
    match req.id {
        1 => Ok(sample(1, "hello".to_string())),
        id => Err(AppError::NotFound(id)),
    }
}

/// Lists posts, newest first
#[api(GET, "/posts")]
pub async fn list_posts(_ctx: Context, req: ListPostsRequest) -> Result<PostPage, AppError> {
    let items: Vec<Post> = (1..=u64::from(req.limit.min(3)))
        .map(|id| sample(id + u64::from(req.offset), format!("post {id}")))
        .collect();
    Ok(PostPage {
        total: items.len() as u64,
        items,
    })
}

#[api(DELETE, "/post")]
pub async fn delete_post(_ctx: Context, req: &DeletePostRequest) -> Result<(), AppError> {
    tracing::info!("deleting post {}: {}", req.post_id, req.reason);
    Ok(())
}

/// Liveness probe
#[api(GET, "/ping")]
pub async fn ping(_ctx: Context) -> Result<String, AppError> {
    Ok("pong".to_string())
}
