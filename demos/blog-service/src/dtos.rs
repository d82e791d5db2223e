use sdk_kit::{api_dto, Decimal, Html};

/// A published post.
#[api_dto]
pub struct Post {
    pub id: u64,
    #[field(label = "Title", required, max = 120)]
    pub title: String,
    /// Rendered body
    pub body: Html,
    pub tags: Vec<Tag>,
    pub category: Option<Category>,
    pub comments: Vec<Comment>,
    /// Optional tip price
    pub price: Option<Decimal>,
}

#[api_dto]
pub struct Tag {
    pub name: String,
    #[field(enums("red", "green", "blue"))]
    pub color: String,
}

/// A comment with nested replies.
#[api_dto]
pub struct Comment {
    pub author: String,
    pub text: String,
    pub replies: Vec<Comment>,
}

#[api_dto]
pub struct Category {
    pub name: String,
    pub parent: Option<Box<Category>>,
}

#[api_dto]
pub struct AddPostRequest {
    #[field(label = "Title", required, max = 120)]
    pub title: String,
    pub body: Html,
    pub tags: Vec<Tag>,
    #[field(label = "Category id", min = 1)]
    pub category_id: u64,
}

#[api_dto]
pub struct GetPostRequest {
    #[field(required, min = 1)]
    pub id: u64,
}

#[api_dto]
pub struct ListPostsRequest {
    #[field(min = 0)]
    pub offset: u32,
    #[field(min = 1, max = 100)]
    pub limit: u32,
    pub tag: Option<String>,
}

#[api_dto]
pub struct PostPage {
    pub total: u64,
    pub items: Vec<Post>,
}

#[api_dto(rename_all = "snake_case")]
pub struct DeletePostRequest {
    #[field(required)]
    pub post_id: u64,
    /// Audit note, never sent to clients
    #[field(skip)]
    pub reason: String,
}
