use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemorySettingsStore};
use crate::routes::with_checkout_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use min_order::checkout::MinimumOrderService;
use min_order::config::AppConfig;
use min_order::error::AppError;
use min_order::telemetry;
use std::sync::atomic::Ordering;
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

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let storefront = config.storefront.clone();
    info!(
        enabled = storefront.settings.enabled,
        min_amount = %storefront.settings.min_amount,
        apply_after_coupons = storefront.settings.apply_after_coupons,
        "minimum order settings loaded"
    );

    let store = Arc::new(InMemorySettingsStore::new(storefront.settings));
    let checkout_service = Arc::new(MinimumOrderService::new(
        store,
        Arc::new(storefront.price_format),
    ));

    let app = with_checkout_routes(checkout_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "minimum order service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
