use std::sync::Arc;

use axum::Router;
use sdk_kit::{exporter_router, Exporter, ExporterOptions, ManifestConfig};

pub mod dtos;
pub mod handlers;

/// Builds the exporter from every `#[api]` handler in this crate.
pub fn build_exporter() -> sdk_kit::Result<Exporter> {
    let manifest_dir = std::path::Path::new(env!("CARGO_MANIFEST_DIR"));
    let options = match ManifestConfig::from_project(manifest_dir) {
        Ok(config) => config.options,
        Err(err) => {
            tracing::warn!("no sdk_kit metadata, using defaults: {}", err);
            ExporterOptions::default()
        }
    };
    Exporter::builder()
        .version(env!("CARGO_PKG_VERSION"))
        .options(options)
        .discover()
        .build()
}

/// Serves `/sdk` and `/protocol` for `forge-cli`.
pub fn build_router(exporter: Arc<Exporter>) -> Router {
    Router::new().merge(exporter_router(exporter))
}
