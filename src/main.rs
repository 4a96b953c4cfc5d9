use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use showkeeper::config::Config;
use showkeeper::db::Database;
use showkeeper::jobs::banner_sync::{BannerFetcher, BannerSyncJob, DiskProvider, SeriesProvider};
use showkeeper::services::{HttpBannerFetcher, ProgressTracker, TokioDisk, WebhookSender};
use showkeeper::{AppState, api, jobs};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Arc::new(Config::from_env()?);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "showkeeper=debug,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Showkeeper Backend");

    let db = Database::connect(&config.database_url).await?;
    db.sync_schema().await?;
    tracing::info!("Database connected");

    // Banner sync collaborators, shared by the scheduler and the API triggers
    let series: Arc<dyn SeriesProvider> = Arc::new(db.series());
    let fetcher: Arc<dyn BannerFetcher> = Arc::new(HttpBannerFetcher::new());
    let disk: Arc<dyn DiskProvider> = Arc::new(TokioDisk);
    let banner_job = Arc::new(BannerSyncJob::new(
        series,
        fetcher,
        disk,
        PathBuf::from(&config.banner_path),
    ));
    let progress = Arc::new(ProgressTracker::new());

    let webhooks = Arc::new(WebhookSender::new(
        config.instance_name.clone(),
        config.webhook_url.clone(),
    ));
    if webhooks.is_configured() {
        tracing::info!("Webhook notifications enabled");
    }

    // Scheduler handle must stay alive for jobs to fire
    let _scheduler = if config.enable_scheduler {
        Some(jobs::start_scheduler(banner_job.clone(), progress.clone()).await?)
    } else {
        tracing::info!("Scheduler disabled");
        None
    };

    let state = AppState {
        config: config.clone(),
        db,
        banner_job,
        progress,
        webhooks,
    };

    let app = Router::new()
        .merge(api::health::router())
        .nest("/api", api::series::router())
        .nest("/api", api::jobs::router())
        .nest("/api", api::webhook::router())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
