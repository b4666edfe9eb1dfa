//! API DTOs (Data Transfer Objects)

use auth::models::UserRef;
use serde::{Deserialize, Serialize};

use crate::domain::entities::{Alert, GaitData, GaitMetrics, Profile};
use crate::domain::navigation::SidebarEntry;
use crate::domain::services::GaitSummary;

/// `?limit=N`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LimitQuery {
    pub limit: Option<u32>,
}

/// Response for GET /dashboard
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverviewResponse {
    pub user: UserRef,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<Profile>,
    pub sidebar: Vec<SidebarEntry>,
    pub latest: Option<GaitMetrics>,
    pub summary: GaitSummary,
    pub recent_alerts: Vec<Alert>,
    pub unacknowledged_alerts: usize,
}

/// Response for GET /dashboard/gait
#[derive(Debug, Clone, Serialize)]
pub struct GaitDataResponse {
    pub data: Vec<GaitData>,
}

/// Response for GET /dashboard/alerts
#[derive(Debug, Clone, Serialize)]
pub struct AlertsResponse {
    pub alerts: Vec<Alert>,
    pub unacknowledged: usize,
}

/// Request for POST /dashboard/alerts/{id}/acknowledge
#[derive(Debug, Clone, Deserialize)]
pub struct AcknowledgeRequest {
    #[serde(default = "default_acknowledged")]
    pub acknowledged: bool,
}

fn default_acknowledged() -> bool {
    true
}

/// Response for GET /dashboard/settings
#[derive(Debug, Clone, Serialize)]
pub struct SettingsResponse {
    pub user: UserRef,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<Profile>,
    pub sidebar: Vec<SidebarEntry>,
}
