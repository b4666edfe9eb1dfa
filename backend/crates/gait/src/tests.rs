//! Router-level tests for the gait crate
//!
//! The dashboard router runs behind the real Dashboard Layout Guard with
//! in-memory auth and gait stores.

#[cfg(test)]
mod support {
    use auth::{AuthAppState, AuthConfig, InMemorySessionStore};
    use axum::Router;
    use axum::body::Body;
    use axum::http::{Request, Response, header};
    use chrono::{DateTime, Duration, Utc};
    use kernel::id::UserId;

    use crate::application::config::GaitConfig;
    use crate::domain::entities::{Alert, AlertDetails, GaitData, GaitMetrics, Profile, Role, Severity};
    use crate::infra::memory::InMemoryGaitRepository;
    use crate::presentation::handlers::GaitAppState;
    use crate::presentation::router::dashboard_router;

    pub const EMAIL: &str = "elder@example.com";

    pub struct Harness {
        pub auth: AuthAppState<InMemorySessionStore>,
        pub gait: GaitAppState<InMemoryGaitRepository>,
        pub user_id: UserId,
    }

    impl Harness {
        pub fn new() -> Self {
            let store = InMemorySessionStore::new();
            let user = store.add_user(EMAIL, "walking-123", true);

            Self {
                auth: AuthAppState::new(store, AuthConfig::default()),
                gait: GaitAppState::new(InMemoryGaitRepository::new(), GaitConfig::default()),
                user_id: user.id,
            }
        }

        pub fn router(&self) -> Router {
            dashboard_router(self.gait.clone(), self.auth.clone())
        }

        pub fn repo(&self) -> &InMemoryGaitRepository {
            &self.gait.repo
        }

        /// Cookie header of a fresh session
        pub fn cookie(&self) -> String {
            let session = self.auth.store.issue_session(EMAIL).unwrap();
            format!(
                "sb-access-token={}; sb-refresh-token={}",
                session.access_token, session.refresh_token
            )
        }

        pub fn seed(&self) {
            let base: DateTime<Utc> = "2024-05-01T10:00:00Z".parse().unwrap();
            for (i, (speed, cadence)) in [(1.0, 100.0), (1.2, 110.0), (0.8, 90.0)].into_iter().enumerate() {
                self.repo().insert_gait_data(GaitData {
                    id: i as i64 + 1,
                    user_id: self.user_id,
                    created_at: base + Duration::minutes(i as i64),
                    metrics: GaitMetrics {
                        cadence,
                        step_time_variability: 0.05,
                        estimated_stride_length: 0.6,
                        gait_speed: speed,
                        steps_in_window: 12,
                    },
                });
            }

            for (id, acknowledged) in [(1, true), (2, false), (3, false)] {
                self.repo().insert_alert(Alert {
                    id,
                    user_id: self.user_id,
                    created_at: base + Duration::minutes(id),
                    alert_type: "gait_speed_drop".to_string(),
                    message: "Gait speed below baseline".to_string(),
                    severity: Severity::Warning,
                    details: AlertDetails {
                        detection_time: "2024-05-01T10:00:00".to_string(),
                        impact_magnitude: None,
                        extra: Default::default(),
                    },
                    acknowledged,
                });
            }

            self.repo().insert_profile(Profile {
                id: self.user_id,
                full_name: "Hanako".to_string(),
                role: Role::Elder,
                elder_id: None,
            });
        }
    }

    pub fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        builder.body(Body::empty()).unwrap()
    }

    pub fn post_json(uri: &str, cookie: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::COOKIE, cookie)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    pub async fn body_json(response: Response<Body>) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }
}

#[cfg(test)]
mod guard_tests {
    use super::support::*;
    use axum::http::{StatusCode, header};
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_dashboard_requires_session() {
        let harness = Harness::new();

        for uri in ["/dashboard", "/dashboard/gait", "/dashboard/alerts", "/dashboard/settings"] {
            let response = harness.router().oneshot(get(uri, None)).await.unwrap();
            assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT, "{uri}");
            assert_eq!(response.headers()[header::LOCATION], "/login");
        }
    }

    #[tokio::test]
    async fn test_revoked_session_is_rejected() {
        let harness = Harness::new();
        let cookie = "sb-access-token=gone; sb-refresh-token=gone";

        let response = harness
            .router()
            .oneshot(get("/dashboard", Some(cookie)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    }
}

#[cfg(test)]
mod dashboard_tests {
    use super::support::*;
    use axum::http::StatusCode;
    use serde_json::json;
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_overview() {
        let harness = Harness::new();
        harness.seed();

        let response = harness
            .router()
            .oneshot(get("/dashboard", Some(&harness.cookie())))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["user"]["email"], EMAIL);
        assert_eq!(body["profile"]["full_name"], "Hanako");
        assert_eq!(body["summary"]["samples"], 3);
        assert_eq!(body["summary"]["averageCadence"], 100.0);
        assert_eq!(body["latest"]["gait_speed"], 0.8);
        assert_eq!(body["unacknowledgedAlerts"], 2);
        assert_eq!(body["recentAlerts"][0]["id"], 3);
        assert_eq!(body["sidebar"][0], json!({"label": "Overview", "href": "/dashboard", "active": true}));
    }

    #[tokio::test]
    async fn test_overview_without_data() {
        let harness = Harness::new();

        let response = harness
            .router()
            .oneshot(get("/dashboard", Some(&harness.cookie())))
            .await
            .unwrap();

        let body = body_json(response).await;
        assert!(body["summary"]["averageGaitSpeed"].is_null());
        assert!(body["latest"].is_null());
        assert!(body.get("profile").is_none());
    }

    #[tokio::test]
    async fn test_gait_data_limit() {
        let harness = Harness::new();
        harness.seed();

        let response = harness
            .router()
            .oneshot(get("/dashboard/gait?limit=2", Some(&harness.cookie())))
            .await
            .unwrap();

        let body = body_json(response).await;
        let ids: Vec<i64> = body["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|row| row["id"].as_i64().unwrap())
            .collect();
        assert_eq!(ids, vec![3, 2]);
    }

    #[tokio::test]
    async fn test_invalid_limit() {
        let harness = Harness::new();

        let response = harness
            .router()
            .oneshot(get("/dashboard/alerts?limit=0", Some(&harness.cookie())))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "gait/invalid-input");
    }

    #[tokio::test]
    async fn test_acknowledge_alert() {
        let harness = Harness::new();
        harness.seed();
        let cookie = harness.cookie();

        let response = harness
            .router()
            .oneshot(post_json(
                "/dashboard/alerts/2/acknowledge",
                &cookie,
                json!({"acknowledged": true}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["acknowledged"], true);

        let response = harness
            .router()
            .oneshot(get("/dashboard/alerts", Some(&cookie)))
            .await
            .unwrap();
        assert_eq!(body_json(response).await["unacknowledged"], 1);
    }

    #[tokio::test]
    async fn test_acknowledge_unknown_alert() {
        let harness = Harness::new();
        let response = harness
            .router()
            .oneshot(post_json(
                "/dashboard/alerts/42/acknowledge",
                &harness.cookie(),
                json!({}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_backend_outage_hides_details() {
        let harness = Harness::new();
        harness.repo().set_unavailable(true);

        let response = harness
            .router()
            .oneshot(get("/dashboard", Some(&harness.cookie())))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let body = body_json(response).await;
        assert_eq!(body["error"]["message"], "An unexpected error occurred");
    }

    #[tokio::test]
    async fn test_settings_marks_sidebar() {
        let harness = Harness::new();
        harness.seed();

        let response = harness
            .router()
            .oneshot(get("/dashboard/settings", Some(&harness.cookie())))
            .await
            .unwrap();

        let body = body_json(response).await;
        let active: Vec<&str> = body["sidebar"]
            .as_array()
            .unwrap()
            .iter()
            .filter(|entry| entry["active"] == true)
            .map(|entry| entry["label"].as_str().unwrap())
            .collect();
        assert_eq!(active, vec!["Settings"]);
    }
}
