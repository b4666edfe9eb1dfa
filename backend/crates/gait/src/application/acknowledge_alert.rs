//! Acknowledge Alert Use Case

use std::sync::Arc;

use crate::domain::entities::Alert;
use crate::domain::repository::GaitRepository;
use crate::error::GaitResult;

pub struct AcknowledgeAlertUseCase<R>
where
    R: GaitRepository + Send + Sync + 'static,
{
    repo: Arc<R>,
}

impl<R> AcknowledgeAlertUseCase<R>
where
    R: GaitRepository + Send + Sync + 'static,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(
        &self,
        access_token: &str,
        alert_id: i64,
        acknowledged: bool,
    ) -> GaitResult<Alert> {
        let alert = self
            .repo
            .update_alert_status(access_token, alert_id, acknowledged)
            .await?;

        tracing::info!(alert_id, acknowledged, "Alert status updated");
        Ok(alert)
    }
}
