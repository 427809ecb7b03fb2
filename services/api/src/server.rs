use crate::cli::ServeArgs;
use crate::infra::{load_catalog, AppState, InMemoryResultsPublisher};
use crate::routes::with_recommendation_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use card_match::config::AppConfig;
use card_match::error::AppError;
use card_match::matching::RecommendationService;
use card_match::telemetry;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let catalog = load_catalog(&config.catalog)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
        catalog_size: catalog.len(),
        catalog_loaded_at: chrono::Utc::now(),
    };

    let publisher = Arc::new(InMemoryResultsPublisher::default());
    let service = Arc::new(RecommendationService::new(Arc::new(catalog), publisher));

    let app = with_recommendation_routes(service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "tuition card matcher ready");

    axum::serve(listener, app).await?;
    Ok(())
}
