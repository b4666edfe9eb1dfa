//! Dashboard Overview Use Case
//!
//! Loads everything the overview page shows in one round: profile,
//! recent measurements and recent alerts are fetched concurrently.

use std::sync::Arc;

use auth::models::UserRef;

use crate::application::config::GaitConfig;
use crate::domain::entities::{Alert, GaitData, Profile};
use crate::domain::repository::GaitRepository;
use crate::domain::services::{GaitSummary, summarize, unacknowledged_count};
use crate::error::GaitResult;

#[derive(Debug, Clone)]
pub struct DashboardOverview {
    pub user: UserRef,
    pub profile: Option<Profile>,
    pub summary: GaitSummary,
    /// Newest first
    pub gait_data: Vec<GaitData>,
    /// Newest first
    pub alerts: Vec<Alert>,
    pub unacknowledged_alerts: usize,
}

impl DashboardOverview {
    pub fn latest(&self) -> Option<&GaitData> {
        self.gait_data.first()
    }
}

pub struct DashboardOverviewUseCase<R>
where
    R: GaitRepository + Send + Sync + 'static,
{
    repo: Arc<R>,
    config: Arc<GaitConfig>,
}

impl<R> DashboardOverviewUseCase<R>
where
    R: GaitRepository + Send + Sync + 'static,
{
    pub fn new(repo: Arc<R>, config: Arc<GaitConfig>) -> Self {
        Self { repo, config }
    }

    pub async fn execute(&self, user: UserRef, access_token: &str) -> GaitResult<DashboardOverview> {
        let (profile, gait_data, alerts) = tokio::try_join!(
            self.repo.fetch_profile(access_token, user.id),
            self.repo
                .fetch_gait_data(access_token, self.config.default_gait_limit),
            self.repo
                .fetch_alerts(access_token, self.config.default_alert_limit),
        )?;

        tracing::debug!(
            user_id = %user.id,
            measurements = gait_data.len(),
            alerts = alerts.len(),
            "Dashboard overview loaded"
        );

        Ok(DashboardOverview {
            user,
            profile,
            summary: summarize(&gait_data),
            unacknowledged_alerts: unacknowledged_count(&alerts),
            gait_data,
            alerts,
        })
    }
}
