//! Domain Services
//!
//! Summary statistics for the dashboard overview cards.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::entities::{Alert, GaitData};

/// Overview card values; averages are `None` when there is no data
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GaitSummary {
    pub average_gait_speed: Option<f64>,
    pub average_cadence: Option<f64>,
    pub last_measurement: Option<DateTime<Utc>>,
    pub samples: usize,
}

/// Summarize measurements ordered newest first
pub fn summarize(data: &[GaitData]) -> GaitSummary {
    GaitSummary {
        average_gait_speed: mean(data.iter().map(|d| d.metrics.gait_speed)),
        average_cadence: mean(data.iter().map(|d| d.metrics.cadence)),
        last_measurement: data.iter().map(|d| d.created_at).max(),
        samples: data.len(),
    }
}

fn mean(values: impl ExactSizeIterator<Item = f64>) -> Option<f64> {
    let count = values.len();
    if count == 0 {
        return None;
    }
    Some(values.sum::<f64>() / count as f64)
}

/// Alerts that still need attention
pub fn unacknowledged_count(alerts: &[Alert]) -> usize {
    alerts.iter().filter(|alert| !alert.acknowledged).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::GaitMetrics;
    use kernel::id::UserId;

    fn sample(id: i64, minute: u32, speed: f64, cadence: f64) -> GaitData {
        GaitData {
            id,
            user_id: UserId::new(),
            created_at: format!("2024-05-01T10:{minute:02}:00Z").parse().unwrap(),
            metrics: GaitMetrics {
                cadence,
                step_time_variability: 0.05,
                estimated_stride_length: 0.6,
                gait_speed: speed,
                steps_in_window: 10,
            },
        }
    }

    #[test]
    fn test_summarize() {
        let data = vec![sample(2, 5, 1.2, 110.0), sample(1, 0, 0.8, 90.0)];
        let summary = summarize(&data);

        assert_eq!(summary.samples, 2);
        assert!((summary.average_gait_speed.unwrap() - 1.0).abs() < 1e-9);
        assert!((summary.average_cadence.unwrap() - 100.0).abs() < 1e-9);
        assert_eq!(summary.last_measurement, Some(data[0].created_at));
    }

    #[test]
    fn test_summarize_empty() {
        let summary = summarize(&[]);
        assert_eq!(summary.average_gait_speed, None);
        assert_eq!(summary.last_measurement, None);
        assert_eq!(summary.samples, 0);
    }
}
