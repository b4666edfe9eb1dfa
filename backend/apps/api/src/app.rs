//! Application Router
//!
//! Assembles pages, auth actions and the dashboard behind the Route Guard.

use auth::{AuthAppState, SessionStore, auth_router, callback_router, pages_router, route_guard};
use axum::Router;
use axum::middleware::from_fn_with_state;
use gait::{GaitAppState, GaitRepository, dashboard_router};
use tower_http::trace::TraceLayer;

pub fn build_router<S, R>(auth_state: AuthAppState<S>, gait_state: GaitAppState<R>) -> Router
where
    S: SessionStore + Send + Sync + 'static,
    R: GaitRepository + Send + Sync + 'static,
{
    Router::new()
        .merge(pages_router())
        .nest("/api/auth", auth_router(auth_state.clone()))
        .nest("/auth", callback_router(auth_state.clone()))
        .merge(dashboard_router(gait_state, auth_state.clone()))
        .layer(from_fn_with_state(auth_state, route_guard::<S>))
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use super::*;
    use auth::{AuthConfig, InMemorySessionStore};
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use gait::{GaitConfig, InMemoryGaitRepository};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    const EMAIL: &str = "elder@example.com";
    const PASSWORD: &str = "walking-123";

    struct TestApp {
        router: Router,
        auth: AuthAppState<InMemorySessionStore>,
    }

    fn test_app() -> TestApp {
        let store = InMemorySessionStore::new();
        store.add_user(EMAIL, PASSWORD, true);
        let auth = AuthAppState::new(store, AuthConfig::development());
        let gait = GaitAppState::new(InMemoryGaitRepository::new(), GaitConfig::default());

        TestApp {
            router: build_router(auth.clone(), gait),
            auth,
        }
    }

    impl TestApp {
        fn cookie(&self) -> String {
            let session = self.auth.store.issue_session(EMAIL).unwrap();
            format!(
                "sb-access-token={}; sb-refresh-token={}",
                session.access_token, session.refresh_token
            )
        }
    }

    fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        builder.body(Body::empty()).unwrap()
    }

    fn location(response: &axum::response::Response) -> &str {
        response.headers()[header::LOCATION].to_str().unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_landing_page_is_public() {
        let app = test_app();
        let response = app.router.oneshot(get("/", None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_dashboard_requires_sign_in() {
        let app = test_app();
        let response = app
            .router
            .oneshot(get("/dashboard/alerts", None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(location(&response), "/login?redirectTo=%2Fdashboard%2Falerts");
    }

    #[tokio::test]
    async fn test_signed_in_user_reaches_dashboard() {
        let app = test_app();
        let cookie = app.cookie();
        let response = app
            .router
            .oneshot(get("/dashboard", Some(&cookie)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["user"]["email"], EMAIL);
        assert_eq!(body["unacknowledgedAlerts"], 0);
    }

    #[tokio::test]
    async fn test_signed_in_user_skips_login_page() {
        let app = test_app();
        let cookie = app.cookie();
        let response = app
            .router
            .oneshot(get("/login", Some(&cookie)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(location(&response), "/dashboard");
    }

    #[tokio::test]
    async fn test_login_action_is_mounted() {
        let app = test_app();
        let request = Request::builder()
            .method("POST")
            .uri("/api/auth/login")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(
                json!({"email": EMAIL, "password": PASSWORD}).to_string(),
            ))
            .unwrap();

        let response = app.router.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["redirectTo"], "/dashboard");
    }
}
