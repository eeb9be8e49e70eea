use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use std::sync::Arc;
use stillframe_core::Config;
use stillframe_handler::{HandlerResponse, ThumbnailHandler};
use stillframe_processing::FfmpegToolkit;
use stillframe_storage::S3ObjectStore;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

type AppHandler = ThumbnailHandler<S3ObjectStore, FfmpegToolkit>;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = Config::from_env();
    tracing::info!(
        context = ?config.execution,
        staging_root = %config.staging_root.display(),
        "starting stillframe handler"
    );

    let store =
        S3ObjectStore::new(config.aws_region.clone(), config.s3_endpoint_url.clone()).await?;
    let toolkit = FfmpegToolkit::new(config.ffmpeg_path.clone(), config.ffprobe_path.clone())?;

    let addr = format!("0.0.0.0:{}", config.port);
    let handler = Arc::new(ThumbnailHandler::new(config, store, toolkit));

    let app = Router::new()
        .route("/", post(generate_thumbnail))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(handler);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "listening");
    axum::serve(listener, app).await?;

    Ok(())
}

async fn generate_thumbnail(
    State(handler): State<Arc<AppHandler>>,
    Json(payload): Json<serde_json::Value>,
) -> HandlerResponse {
    handler.handle(payload).await
}
