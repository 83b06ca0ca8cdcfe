use std::sync::Arc;

use crate::assessment::AssessmentOrchestrator;
use crate::config::Config;
use crate::profiles::ProfileService;
use crate::ranking::RankingOrchestrator;
use crate::store::EntityStore;

/// Shared application state injected into all route handlers via Axum extractors.
/// Every service is constructed once in `main` and shared by `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub entities: Arc<dyn EntityStore>,
    pub assessor: Arc<AssessmentOrchestrator>,
    pub ranker: Arc<RankingOrchestrator>,
    pub profiles: Arc<ProfileService>,
}
