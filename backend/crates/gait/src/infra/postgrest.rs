//! Table API Gait Repository
//!
//! Reads and updates the dashboard tables through the backend's REST
//! table interface (`/rest/v1/{table}`), authenticated as the signed-in
//! user so row-level security applies.

use kernel::id::UserId;
use platform::backend::{BackendClient, Method, send_json};
use serde_json::json;

use crate::domain::entities::{Alert, GaitData, Profile};
use crate::domain::repository::GaitRepository;
use crate::error::{GaitError, GaitResult};

const GAIT_TABLE: &str = "gait_data";
const ALERTS_TABLE: &str = "alerts";
const PROFILES_TABLE: &str = "profiles";

#[derive(Clone)]
pub struct PostgrestGaitRepository {
    client: BackendClient,
}

impl PostgrestGaitRepository {
    pub fn new(client: BackendClient) -> Self {
        Self { client }
    }
}

/// `select=*&order=created_at.desc&limit=N`
fn newest_first(limit: u32) -> Vec<(&'static str, String)> {
    vec![
        ("select", "*".to_string()),
        ("order", "created_at.desc".to_string()),
        ("limit", limit.to_string()),
    ]
}

impl GaitRepository for PostgrestGaitRepository {
    async fn fetch_gait_data(&self, access_token: &str, limit: u32) -> GaitResult<Vec<GaitData>> {
        let request = self
            .client
            .rest(Method::GET, GAIT_TABLE)
            .bearer_auth(access_token)
            .query(&newest_first(limit));

        Ok(send_json(request).await?)
    }

    async fn fetch_alerts(&self, access_token: &str, limit: u32) -> GaitResult<Vec<Alert>> {
        let request = self
            .client
            .rest(Method::GET, ALERTS_TABLE)
            .bearer_auth(access_token)
            .query(&newest_first(limit));

        Ok(send_json(request).await?)
    }

    async fn update_alert_status(
        &self,
        access_token: &str,
        alert_id: i64,
        acknowledged: bool,
    ) -> GaitResult<Alert> {
        let request = self
            .client
            .rest(Method::PATCH, ALERTS_TABLE)
            .bearer_auth(access_token)
            .header("Prefer", "return=representation")
            .query(&[("id", format!("eq.{alert_id}"))])
            .json(&json!({ "acknowledged": acknowledged }));

        // zero rows: unknown id or hidden by row-level security
        let updated: Vec<Alert> = send_json(request).await?;
        updated
            .into_iter()
            .next()
            .ok_or_else(|| GaitError::NotFound(format!("Alert {alert_id}")))
    }

    async fn fetch_profile(
        &self,
        access_token: &str,
        user_id: UserId,
    ) -> GaitResult<Option<Profile>> {
        let request = self
            .client
            .rest(Method::GET, PROFILES_TABLE)
            .bearer_auth(access_token)
            .query(&[
                ("select", "*".to_string()),
                ("id", format!("eq.{user_id}")),
                ("limit", "1".to_string()),
            ]);

        let profiles: Vec<Profile> = send_json(request).await?;
        Ok(profiles.into_iter().next())
    }
}
