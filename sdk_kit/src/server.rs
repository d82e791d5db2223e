use std::sync::Arc;

use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;

use crate::error::Result;
use crate::exporter::{Exporter, Protocol};
use crate::makers::File;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SdkQuery {
    pub lang: String,
    pub package: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ProtocolQuery {
    pub lang: String,
}

/// `GET /sdk?lang=&package=` and `GET /protocol?lang=`.
pub fn exporter_router(exporter: Arc<Exporter>) -> Router {
    Router::new()
        .route("/sdk", get(sdk_handler))
        .route("/protocol", get(protocol_handler))
        .with_state(exporter)
}

pub async fn sdk_handler(
    State(exporter): State<Arc<Exporter>>,
    Query(query): Query<SdkQuery>,
) -> Result<Json<Vec<File>>> {
    Ok(Json(exporter.generate(&query.lang, &query.package)?))
}

pub async fn protocol_handler(
    State(exporter): State<Arc<Exporter>>,
    Query(query): Query<ProtocolQuery>,
) -> Json<Protocol> {
    Json(exporter.protocol(&query.lang))
}
