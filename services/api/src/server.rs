use crate::cli::ServeArgs;
use crate::infra::{seed_directory, AppState};
use crate::routes::with_recruitment_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use recruit::config::AppConfig;
use recruit::error::AppError;
use recruit::recruitment::{InMemoryGateway, RecruitmentServices};
use recruit::telemetry;
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
    if let Some(companies) = args.companies.take() {
        config.seed.companies_csv = Some(companies);
    }
    if let Some(users) = args.users.take() {
        config.seed.users_csv = Some(users);
    }

    telemetry::init(&config.telemetry)?;

    let gateway = Arc::new(InMemoryGateway::new());
    let seeded = seed_directory(gateway.as_ref(), &config.seed)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
        seeded,
    };

    let services = Arc::new(RecruitmentServices::new(gateway));
    let app = with_recruitment_routes(services)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        companies = seeded.companies,
        users = seeded.users,
        "recruitment api ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
