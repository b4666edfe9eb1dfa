//! Fetch Gait Data / Alerts Use Cases

use std::sync::Arc;

use crate::application::config::GaitConfig;
use crate::domain::entities::{Alert, GaitData};
use crate::domain::repository::GaitRepository;
use crate::error::GaitResult;

pub struct FetchGaitDataUseCase<R>
where
    R: GaitRepository + Send + Sync + 'static,
{
    repo: Arc<R>,
    config: Arc<GaitConfig>,
}

impl<R> FetchGaitDataUseCase<R>
where
    R: GaitRepository + Send + Sync + 'static,
{
    pub fn new(repo: Arc<R>, config: Arc<GaitConfig>) -> Self {
        Self { repo, config }
    }

    pub async fn execute(&self, access_token: &str, limit: Option<u32>) -> GaitResult<Vec<GaitData>> {
        let limit = self.config.gait_limit(limit)?;
        self.repo.fetch_gait_data(access_token, limit).await
    }
}

pub struct FetchAlertsUseCase<R>
where
    R: GaitRepository + Send + Sync + 'static,
{
    repo: Arc<R>,
    config: Arc<GaitConfig>,
}

impl<R> FetchAlertsUseCase<R>
where
    R: GaitRepository + Send + Sync + 'static,
{
    pub fn new(repo: Arc<R>, config: Arc<GaitConfig>) -> Self {
        Self { repo, config }
    }

    pub async fn execute(&self, access_token: &str, limit: Option<u32>) -> GaitResult<Vec<Alert>> {
        let limit = self.config.alert_limit(limit)?;
        self.repo.fetch_alerts(access_token, limit).await
    }
}
