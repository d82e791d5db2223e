use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::contract::ShapeRule;

#[derive(Error, Debug)]
pub enum Error {
    /// A registered handler does not match the accepted contract. Fatal at start-up.
    #[error("invalid handler shape, {rule}: {signature}")]
    InvalidHandlerShape { rule: ShapeRule, signature: String },

    #[error("target '{0}' maker not found")]
    MakerNotFound(String),

    #[error("render template '{name}' error: {source}")]
    TemplateRender {
        name: String,
        #[source]
        source: minijinja::Error,
    },

    /// The formatter rejected the rendered text. `listing` is that text with line numbers.
    #[error("format '{name}' error: {message}\n{listing}")]
    Format {
        name: String,
        message: String,
        listing: String,
    },

    #[error("schema resolution error: {0}")]
    SchemaResolution(String),

    #[error("Config Error: {0}")]
    Config(String),
    #[error("Toml Error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("SerdeJson Error: {0}")]
    SerdeJson(#[from] serde_json::Error),
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = match self {
            Error::MakerNotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, self.to_string()).into_response()
    }
}
