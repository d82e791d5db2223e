use std::sync::Arc;

use blog_service as app;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,sdk_kit=debug")),
        )
        .init();

    let exporter = Arc::new(app::build_exporter()?);
    let router = app::build_router(exporter);

    let address = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into())
        + ":"
        + &std::env::var("PORT").unwrap_or_else(|_| "3000".into());
    tracing::info!("exporter available at http://{}/sdk?lang=umi", address);
    let listener = tokio::net::TcpListener::bind(&address).await?;
    axum::serve(listener, router).await?;
    Ok(())
}
