//! Application Configuration
//!
//! Configuration for the Gait application layer.

use crate::error::{GaitError, GaitResult};

/// Gait application configuration
#[derive(Debug, Clone)]
pub struct GaitConfig {
    /// Measurements loaded when no limit is given
    pub default_gait_limit: u32,
    /// Alerts loaded when no limit is given
    pub default_alert_limit: u32,
    /// Upper bound for any requested limit
    pub max_limit: u32,
}

impl Default for GaitConfig {
    fn default() -> Self {
        Self {
            default_gait_limit: 50,
            default_alert_limit: 5,
            max_limit: 500,
        }
    }
}

impl GaitConfig {
    /// Resolve a requested limit, falling back to `default`
    pub fn limit(&self, requested: Option<u32>, default: u32) -> GaitResult<u32> {
        match requested {
            None => Ok(default),
            Some(0) => Err(GaitError::InvalidInput("limit must be positive".to_string())),
            Some(limit) if limit > self.max_limit => Err(GaitError::InvalidInput(format!(
                "limit must not exceed {}",
                self.max_limit
            ))),
            Some(limit) => Ok(limit),
        }
    }

    pub fn gait_limit(&self, requested: Option<u32>) -> GaitResult<u32> {
        self.limit(requested, self.default_gait_limit)
    }

    pub fn alert_limit(&self, requested: Option<u32>) -> GaitResult<u32> {
        self.limit(requested, self.default_alert_limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limits() {
        let config = GaitConfig::default();
        assert_eq!(config.gait_limit(None).unwrap(), 50);
        assert_eq!(config.alert_limit(None).unwrap(), 5);
        assert_eq!(config.alert_limit(Some(20)).unwrap(), 20);
        assert!(config.gait_limit(Some(0)).is_err());
        assert!(config.gait_limit(Some(501)).is_err());
    }
}
