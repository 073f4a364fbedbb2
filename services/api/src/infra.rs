use metrics_exporter_prometheus::PrometheusHandle;
use recruit::config::SeedConfig;
use recruit::error::AppError;
use recruit::recruitment::seed::{import_companies_from_path, import_users_from_path};
use recruit::recruitment::RecruitmentGateway;
use serde::Serialize;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) seeded: SeedSummary,
}

/// Rows loaded from the seed files at startup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub(crate) struct SeedSummary {
    pub(crate) companies: usize,
    pub(crate) users: usize,
}

/// Load whichever seed files are configured, companies first.
pub(crate) fn seed_directory<G>(gateway: &G, seed: &SeedConfig) -> Result<SeedSummary, AppError>
where
    G: RecruitmentGateway,
{
    let mut summary = SeedSummary::default();
    if let Some(path) = &seed.companies_csv {
        summary.companies = import_companies_from_path(gateway, path)?.len();
    }
    if let Some(path) = &seed.users_csv {
        summary.users = import_users_from_path(gateway, path)?.len();
    }
    Ok(summary)
}
