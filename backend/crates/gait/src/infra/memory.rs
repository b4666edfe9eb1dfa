//! In-Memory Gait Repository
//!
//! Table contents held in process, for tests and local runs without a
//! backend. Access tokens are not checked; the guard in front of the
//! handlers already did that.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

use kernel::id::UserId;

use crate::domain::entities::{Alert, GaitData, Profile};
use crate::domain::repository::GaitRepository;
use crate::error::{GaitError, GaitResult};

#[derive(Debug, Default)]
struct Tables {
    gait_data: Vec<GaitData>,
    alerts: Vec<Alert>,
    profiles: Vec<Profile>,
}

#[derive(Debug, Default)]
pub struct InMemoryGaitRepository {
    tables: Mutex<Tables>,
    unavailable: AtomicBool,
}

impl InMemoryGaitRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn insert_gait_data(&self, data: GaitData) {
        self.lock().gait_data.push(data);
    }

    pub fn insert_alert(&self, alert: Alert) {
        self.lock().alerts.push(alert);
    }

    pub fn insert_profile(&self, profile: Profile) {
        self.lock().profiles.push(profile);
    }

    /// Make every call fail with a network error
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check_available(&self) -> GaitResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(GaitError::Network("connection refused".to_string()));
        }
        Ok(())
    }
}

fn newest_first<T: Clone>(rows: &[T], created_at: impl Fn(&T) -> chrono::DateTime<chrono::Utc>, limit: u32) -> Vec<T> {
    let mut rows = rows.to_vec();
    rows.sort_by_key(|row| std::cmp::Reverse(created_at(row)));
    rows.truncate(limit as usize);
    rows
}

impl GaitRepository for InMemoryGaitRepository {
    async fn fetch_gait_data(&self, _access_token: &str, limit: u32) -> GaitResult<Vec<GaitData>> {
        self.check_available()?;
        Ok(newest_first(&self.lock().gait_data, |d| d.created_at, limit))
    }

    async fn fetch_alerts(&self, _access_token: &str, limit: u32) -> GaitResult<Vec<Alert>> {
        self.check_available()?;
        Ok(newest_first(&self.lock().alerts, |a| a.created_at, limit))
    }

    async fn update_alert_status(
        &self,
        _access_token: &str,
        alert_id: i64,
        acknowledged: bool,
    ) -> GaitResult<Alert> {
        self.check_available()?;

        let mut tables = self.lock();
        let alert = tables
            .alerts
            .iter_mut()
            .find(|alert| alert.id == alert_id)
            .ok_or_else(|| GaitError::NotFound(format!("Alert {alert_id}")))?;

        alert.acknowledged = acknowledged;
        Ok(alert.clone())
    }

    async fn fetch_profile(
        &self,
        _access_token: &str,
        user_id: UserId,
    ) -> GaitResult<Option<Profile>> {
        self.check_available()?;
        Ok(self
            .lock()
            .profiles
            .iter()
            .find(|profile| profile.id == user_id)
            .cloned())
    }
}
