//! Repository Traits
//!
//! Every call runs under the signed-in user's access token so row-level
//! security on the backend decides what is visible.

use kernel::id::UserId;

use crate::domain::entities::{Alert, GaitData, Profile};
use crate::error::GaitResult;

/// Gait data repository trait
#[trait_variant::make(GaitRepository: Send)]
pub trait LocalGaitRepository {
    /// Newest measurements first
    async fn fetch_gait_data(&self, access_token: &str, limit: u32) -> GaitResult<Vec<GaitData>>;

    /// Newest alerts first
    async fn fetch_alerts(&self, access_token: &str, limit: u32) -> GaitResult<Vec<Alert>>;

    /// Set the acknowledged flag; `NotFound` when no visible alert has `alert_id`
    async fn update_alert_status(
        &self,
        access_token: &str,
        alert_id: i64,
        acknowledged: bool,
    ) -> GaitResult<Alert>;

    async fn fetch_profile(&self, access_token: &str, user_id: UserId)
    -> GaitResult<Option<Profile>>;
}
