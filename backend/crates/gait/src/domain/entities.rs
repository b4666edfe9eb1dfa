//! Domain Entities
//!
//! Rows of the `gait_data`, `alerts` and `profiles` tables as the
//! dashboard reads them. Gait metrics are produced by the edge device and
//! only displayed here.

use chrono::{DateTime, Utc};
use kernel::id::UserId;
use serde::{Deserialize, Deserializer, Serialize};

// ============================================================================
// Gait data
// ============================================================================

/// Per-window gait measurement
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GaitMetrics {
    /// Steps per minute
    pub cadence: f64,
    pub step_time_variability: f64,
    /// Meters
    pub estimated_stride_length: f64,
    /// Meters per second
    pub gait_speed: f64,
    pub steps_in_window: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GaitData {
    pub id: i64,
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
    #[serde(deserialize_with = "metrics_from_text_or_object")]
    pub metrics: GaitMetrics,
}

/// The metrics column is stored as JSON text by older edge builds
fn metrics_from_text_or_object<'de, D>(deserializer: D) -> Result<GaitMetrics, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Object(GaitMetrics),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Object(metrics) => Ok(metrics),
        Raw::Text(text) => serde_json::from_str(&text).map_err(serde::de::Error::custom),
    }
}

// ============================================================================
// Alerts
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    Warning,
    Info,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertDetails {
    /// As written by the edge device (ISO 8601, possibly without offset)
    pub detection_time: String,
    /// Fall alerts only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub impact_magnitude: Option<f64>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub id: i64,
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
    #[serde(rename = "type")]
    pub alert_type: String,
    pub message: String,
    pub severity: Severity,
    pub details: AlertDetails,
    #[serde(default)]
    pub acknowledged: bool,
}

// ============================================================================
// Profiles
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Elder,
    Family,
    Physician,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: UserId,
    pub full_name: String,
    pub role: Role,
    /// Monitored elder, for family members and physicians
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elder_id: Option<UserId>,
}
