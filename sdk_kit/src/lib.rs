//! # SDK Kit - Client SDK generation for Rust services
//!
//! `sdk_kit` extracts a language-neutral schema from the handlers a service registers and
//! renders client SDKs from it for several targets.
//!
//! ## Core Features:
//!
//! - **`#[api_dto]`**: derives `serde` and [`Reflect`] for request and response types. Field
//!   labels, descriptions and validation rules are read from `#[field(...)]` and doc comments.
//!
//! - **`#[api(METHOD, "/path")]`**: registers a handler. Its signature is checked at start-up:
//!   a [`Context`], an optional struct body, and a `Result` return.
//!
//! - **[`ExporterBuilder`]**: discovers every registered handler, reflects the types and builds an
//!   immutable [`Exporter`] that generates `go`, `angular`, `umi`, `axios`, `rust` and `openapi`
//!   output, or any custom [`Maker`].
//!
//! - **[`exporter_router`]**: serves `/sdk` and `/protocol` over HTTP, for the `forge-cli sdk`
//!   download command.

pub mod basic;
pub mod config;
pub mod context;
pub mod contract;
pub mod error;
pub mod exporter;
pub mod field;
pub mod flatten;
pub mod makers;
pub mod markers;
pub mod reflect;
pub mod render;
pub mod schema;
pub mod server;

// Re-export key dependencies so that macros can use them
pub use inventory;
pub use serde;

#[cfg(feature = "macros")]
pub use sdk_kit_macros::{api, api_dto};

pub use basic::{BasicType, BasicTypeRegistry, Library, Package};
pub use config::{Env, ExporterOptions, ManifestConfig};
pub use context::Context;
pub use contract::{HandlerShape, HandlerSignature, ShapeRule};
pub use error::{Error, Result};
pub use exporter::{Exporter, ExporterBuilder, Protocol, RouteSpec};
pub use field::{Field, FieldKind, Method, Validator};
pub use makers::{File, Maker, MakerRegistry};
pub use markers::{Decimal, Html, Text};
pub use schema::{MemberDesc, Reflect, TypeDesc, TypeIdentity};
pub use server::exporter_router;

/// A handler registered with `#[api]`.
#[derive(Debug)]
pub struct ApiRoute {
    pub operation_id: &'static str,
    pub method: &'static str,
    pub path: &'static str,
    pub description: &'static str,
    pub signature: fn() -> HandlerSignature,
}
inventory::collect!(ApiRoute);
