//! HTTP Handlers
//!
//! The signed-in user comes from the [`CurrentSession`] extension set by
//! the Dashboard Layout Guard; data calls run under its access token.

use std::sync::Arc;

use auth::CurrentSession;
use axum::Json;
use axum::extract::{Extension, Path, Query, State};
use axum::http::Uri;

use crate::application::config::GaitConfig;
use crate::application::{
    AcknowledgeAlertUseCase, DashboardOverviewUseCase, FetchAlertsUseCase, FetchGaitDataUseCase,
};
use crate::domain::entities::Alert;
use crate::domain::navigation::sidebar;
use crate::domain::repository::GaitRepository;
use crate::domain::services::unacknowledged_count;
use crate::error::GaitResult;
use crate::presentation::dto::{
    AcknowledgeRequest, AlertsResponse, GaitDataResponse, LimitQuery, OverviewResponse,
    SettingsResponse,
};

/// Shared state for dashboard handlers
pub struct GaitAppState<R>
where
    R: GaitRepository + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub config: Arc<GaitConfig>,
}

impl<R> GaitAppState<R>
where
    R: GaitRepository + Send + Sync + 'static,
{
    pub fn new(repo: R, config: GaitConfig) -> Self {
        Self {
            repo: Arc::new(repo),
            config: Arc::new(config),
        }
    }
}

impl<R> Clone for GaitAppState<R>
where
    R: GaitRepository + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
            config: self.config.clone(),
        }
    }
}

/// GET /dashboard
pub async fn overview<R>(
    State(state): State<GaitAppState<R>>,
    Extension(session): Extension<CurrentSession>,
    uri: Uri,
) -> GaitResult<Json<OverviewResponse>>
where
    R: GaitRepository + Send + Sync + 'static,
{
    let use_case = DashboardOverviewUseCase::new(state.repo.clone(), state.config.clone());
    let overview = use_case.execute(session.user, &session.access_token).await?;

    Ok(Json(OverviewResponse {
        latest: overview.latest().map(|data| data.metrics),
        sidebar: sidebar(uri.path()),
        user: overview.user,
        profile: overview.profile,
        summary: overview.summary,
        recent_alerts: overview.alerts,
        unacknowledged_alerts: overview.unacknowledged_alerts,
    }))
}

/// GET /dashboard/gait
pub async fn gait_data<R>(
    State(state): State<GaitAppState<R>>,
    Extension(session): Extension<CurrentSession>,
    Query(query): Query<LimitQuery>,
) -> GaitResult<Json<GaitDataResponse>>
where
    R: GaitRepository + Send + Sync + 'static,
{
    let use_case = FetchGaitDataUseCase::new(state.repo.clone(), state.config.clone());
    let data = use_case.execute(&session.access_token, query.limit).await?;

    Ok(Json(GaitDataResponse { data }))
}

/// GET /dashboard/alerts
pub async fn alerts<R>(
    State(state): State<GaitAppState<R>>,
    Extension(session): Extension<CurrentSession>,
    Query(query): Query<LimitQuery>,
) -> GaitResult<Json<AlertsResponse>>
where
    R: GaitRepository + Send + Sync + 'static,
{
    let use_case = FetchAlertsUseCase::new(state.repo.clone(), state.config.clone());
    let alerts = use_case.execute(&session.access_token, query.limit).await?;

    Ok(Json(AlertsResponse {
        unacknowledged: unacknowledged_count(&alerts),
        alerts,
    }))
}

/// POST /dashboard/alerts/{id}/acknowledge
pub async fn acknowledge_alert<R>(
    State(state): State<GaitAppState<R>>,
    Extension(session): Extension<CurrentSession>,
    Path(alert_id): Path<i64>,
    Json(req): Json<AcknowledgeRequest>,
) -> GaitResult<Json<Alert>>
where
    R: GaitRepository + Send + Sync + 'static,
{
    let use_case = AcknowledgeAlertUseCase::new(state.repo.clone());
    let alert = use_case
        .execute(&session.access_token, alert_id, req.acknowledged)
        .await?;

    Ok(Json(alert))
}

/// GET /dashboard/settings
pub async fn settings<R>(
    State(state): State<GaitAppState<R>>,
    Extension(session): Extension<CurrentSession>,
    uri: Uri,
) -> GaitResult<Json<SettingsResponse>>
where
    R: GaitRepository + Send + Sync + 'static,
{
    let profile = state
        .repo
        .fetch_profile(&session.access_token, session.user.id)
        .await?;

    Ok(Json(SettingsResponse {
        user: session.user,
        profile,
        sidebar: sidebar(uri.path()),
    }))
}
