use axum::{middleware, routing::get, Router};
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use super::handlers;
use super::health;
use super::middleware::{logging_middleware, rate_limit_middleware};
use super::state::AppState;

/// Create a minimal router without state (for testing)
/// Note: /ready endpoint is not available without state
pub fn create_router() -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/live", get(health::live_check))
        .layer(TraceLayer::new_for_http())
}

/// Create the full router with application state
///
/// Rate limiting covers `/api` only so probes are never throttled.
pub fn create_router_with_state(state: AppState) -> Router {
    let api = handlers::create_api_router().layer(middleware::from_fn_with_state(
        state.clone(),
        rate_limit_middleware,
    ));

    Router::new()
        // Health endpoints
        .route("/health", get(health::health_check))
        .route("/ready", get(health::ready_check))
        .route("/live", get(health::live_check))
        // Real-time events
        .route("/ws", get(handlers::realtime::realtime_stream))
        // REST API
        .nest("/api", api)
        // Add state and middleware
        .layer(middleware::from_fn(logging_middleware))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Method, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::config::AppConfig;

    async fn app() -> Router {
        let state = crate::create_app_state(&AppConfig::default()).await.unwrap();
        create_router_with_state(state)
    }

    fn request(method: Method, uri: &str, user: Option<&str>, body: Option<Value>) -> Request<Body> {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(user) = user {
            builder = builder.header("x-user-id", user);
        }

        match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn create_disaster(app: &Router) -> String {
        let response = app
            .clone()
            .oneshot(request(
                Method::POST,
                "/api/disasters",
                Some("citizen1"),
                Some(json!({
                    "title": "NYC Flood",
                    "description": "Heavy flooding in Manhattan",
                    "tags": ["flood"]
                })),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        json_body(response).await["id"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_health_without_state() {
        let response = create_router()
            .oneshot(request(Method::GET, "/health", None, None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_ready_reports_checks() {
        let response = app()
            .await
            .oneshot(request(Method::GET, "/ready", None, None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["checks"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_request_id_is_assigned_and_propagated() {
        let app = app().await;

        let response = app
            .clone()
            .oneshot(request(Method::GET, "/health", None, None))
            .await
            .unwrap();
        assert!(response.headers().contains_key("x-request-id"));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .header("x-request-id", "req-42")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.headers()["x-request-id"], "req-42");
    }

    #[tokio::test]
    async fn test_api_requires_identity() {
        let response = app()
            .await
            .oneshot(request(Method::GET, "/api/disasters", None, None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = json_body(response).await;
        assert_eq!(body["error"]["type"], "authentication_error");
    }

    #[tokio::test]
    async fn test_unknown_user_is_rejected() {
        let response = app()
            .await
            .oneshot(request(Method::GET, "/api/disasters", Some("mallory"), None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_bearer_identity_is_accepted() {
        let response = app()
            .await
            .oneshot(
                Request::builder()
                    .uri("/api/disasters")
                    .header("authorization", "Bearer reliefAdmin")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-ratelimit-limit"));
    }

    #[tokio::test]
    async fn test_missing_disaster_is_not_found() {
        let response = app()
            .await
            .oneshot(request(Method::GET, "/api/disasters/nope", Some("citizen1"), None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = json_body(response).await;
        assert_eq!(body["error"]["message"], "Disaster not found");
    }

    #[tokio::test]
    async fn test_unknown_route_is_not_found() {
        let response = app()
            .await
            .oneshot(request(Method::GET, "/api/nowhere", Some("citizen1"), None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_create_requires_title_and_description() {
        let response = app()
            .await
            .oneshot(request(
                Method::POST,
                "/api/disasters",
                Some("citizen1"),
                Some(json!({ "title": "No description" })),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_malformed_json_is_rejected_as_json() {
        let response = app()
            .await
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/api/disasters")
                    .header("x-user-id", "citizen1")
                    .header("content-type", "application/json")
                    .body(Body::from("{not json"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["error"]["code"], "json_parse_error");
    }

    #[tokio::test]
    async fn test_delete_requires_admin() {
        let app = app().await;
        let id = create_disaster(&app).await;
        let uri = format!("/api/disasters/{}", id);

        let response = app
            .clone()
            .oneshot(request(Method::DELETE, &uri, Some("citizen1"), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let response = app
            .clone()
            .oneshot(request(Method::DELETE, &uri, Some("reliefAdmin"), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["id"], json!(id));
    }

    #[tokio::test]
    async fn test_resource_search_is_cached() {
        let app = app().await;
        let id = create_disaster(&app).await;
        let uri = format!("/api/disasters/{}/resources?lat=40.7128&lon=-74.0060&radius=5", id);

        let first = app
            .clone()
            .oneshot(request(Method::GET, &uri, Some("citizen1"), None))
            .await
            .unwrap();
        assert_eq!(first.status(), StatusCode::OK);
        let first = json_body(first).await;
        assert_eq!(first["cache"], "miss");
        assert_eq!(first["radius"], json!(5.0));

        let second = app
            .clone()
            .oneshot(request(Method::GET, &uri, Some("citizen1"), None))
            .await
            .unwrap();
        let second = json_body(second).await;
        assert_eq!(second["cache"], "hit");
        assert_eq!(second["resources"], first["resources"]);

        let stats = app
            .clone()
            .oneshot(request(Method::GET, "/api/cache/stats", Some("citizen1"), None))
            .await
            .unwrap();
        let stats = json_body(stats).await;
        assert!(stats["entries"].as_u64().unwrap() >= 1);
    }

    #[tokio::test]
    async fn test_invalid_query_is_bad_request() {
        let app = app().await;
        let id = create_disaster(&app).await;
        let uri = format!("/api/disasters/{}/resources?radius=far", id);

        let response = app
            .oneshot(request(Method::GET, &uri, Some("citizen1"), None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_cache_admin_routes() {
        let app = app().await;

        let response = app
            .clone()
            .oneshot(request(Method::DELETE, "/api/cache", Some("contributor1"), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let response = app
            .clone()
            .oneshot(request(Method::POST, "/api/cache/cleanup", Some("netrunnerX"), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["removed"], json!(0));

        let response = app
            .clone()
            .oneshot(request(
                Method::DELETE,
                "/api/cache/geocode_manhattan",
                Some("netrunnerX"),
                None,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_rate_limit_rejects_excess_requests() {
        let mut config = AppConfig::default();
        config.rate_limit.max_requests = 1;
        let state = crate::create_app_state(&config).await.unwrap();
        let app = create_router_with_state(state);

        let first = app
            .clone()
            .oneshot(request(Method::GET, "/api/disasters", Some("citizen1"), None))
            .await
            .unwrap();
        assert_eq!(first.status(), StatusCode::OK);

        let second = app
            .clone()
            .oneshot(request(Method::GET, "/api/disasters", Some("citizen1"), None))
            .await
            .unwrap();
        assert_eq!(second.status(), StatusCode::TOO_MANY_REQUESTS);
        assert!(json_body(second).await["retry_after"].as_u64().is_some());

        let health = app
            .oneshot(request(Method::GET, "/health", None, None))
            .await
            .unwrap();
        assert_eq!(health.status(), StatusCode::OK);
    }
}
