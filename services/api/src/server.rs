use crate::cli::ServeArgs;
use crate::infra::{sample_roster, AppState, InMemoryAllocationRepository};
use crate::routes::with_allocation_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use casework::config::AppConfig;
use casework::error::AppError;
use casework::telemetry;
use casework::workflows::allocation::{
    standard_rules, AllocationPolicyConfig, CaseAllocationService, InMemoryStaffDirectory,
};
use casework::workflows::roster::StaffRosterImporter;
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

    let directory = Arc::new(InMemoryStaffDirectory::new());
    let staff = match &config.allocation.roster_path {
        Some(path) => StaffRosterImporter::from_path(path)?,
        None => sample_roster(),
    };
    let staff_count = staff.len();
    for user in staff {
        directory.register(user);
    }

    let policy = AllocationPolicyConfig::from_settings(&config.allocation);
    let repository = Arc::new(InMemoryAllocationRepository::default());
    let allocation_service = Arc::new(CaseAllocationService::new(
        directory,
        repository,
        standard_rules(&policy),
    ));

    let app = with_allocation_routes(allocation_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, staff_count, "case allocation service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
