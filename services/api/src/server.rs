use crate::cli::ServeArgs;
use crate::infra::{build_store, AppState};
use crate::routes::with_intake_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use intake_desk::admin::{AccessGuard, AdminState};
use intake_desk::config::AppConfig;
use intake_desk::error::AppError;
use intake_desk::submissions::IntakeServices;
use intake_desk::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{info, warn};

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

    let store = build_store(&config.store)?;
    let backend = store.backend_tag();
    let services = Arc::new(IntakeServices::new(store));

    if config.admin.passcode.is_none() {
        warn!("ADMIN_PASSCODE not set; any passcode opens the admin console");
    }
    let admin = Arc::new(AdminState::new(
        services.clone(),
        AccessGuard::default(),
        config.admin.passcode.clone(),
    ));

    let app = with_intake_routes(services, admin)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, backend, "intake desk ready");

    axum::serve(listener, app).await?;
    Ok(())
}
