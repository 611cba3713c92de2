//! Per-client rate limiting middleware

use std::net::SocketAddr;

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{HeaderMap, HeaderName, HeaderValue, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde_json::json;
use tracing::warn;

use crate::api::state::AppState;
use crate::infrastructure::rate_limit::RateLimitDecision;

pub const LIMIT_HEADER: &str = "x-ratelimit-limit";
pub const REMAINING_HEADER: &str = "x-ratelimit-remaining";
pub const RESET_HEADER: &str = "x-ratelimit-reset";

/// Applies the sliding window limiter keyed by client address.
///
/// A no-op when the state carries no limiter.
pub async fn rate_limit_middleware(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let Some(limiter) = state.rate_limiter.clone() else {
        return next.run(request).await;
    };

    let client = client_identifier(&request);
    let decision = limiter.check_and_record(&client).await;

    if !decision.allowed {
        warn!(client = %client, limit = decision.limit, "Rate limit exceeded");
        return rate_limited_response(&decision);
    }

    let mut response = next.run(request).await;
    apply_headers(response.headers_mut(), &decision);
    response
}

/// Socket address when known, else the first `x-forwarded-for` hop
fn client_identifier(request: &Request<Body>) -> String {
    if let Some(ConnectInfo(addr)) = request.extensions().get::<ConnectInfo<SocketAddr>>() {
        return addr.ip().to_string();
    }

    request
        .headers()
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| "unknown".to_string())
}

fn rate_limited_response(decision: &RateLimitDecision) -> Response {
    let body = json!({
        "error": {
            "message": "Rate limit exceeded. Please try again later.",
            "type": "rate_limit_error",
            "code": "rate_limit_exceeded",
        },
        "retry_after": decision.reset_in_seconds,
    });

    let mut response = (StatusCode::TOO_MANY_REQUESTS, Json(body)).into_response();
    apply_headers(response.headers_mut(), decision);
    response
}

fn apply_headers(headers: &mut HeaderMap, decision: &RateLimitDecision) {
    let reset_at = Utc::now().timestamp() as u64 + decision.reset_in_seconds;

    for (name, value) in [
        (LIMIT_HEADER, decision.limit as u64),
        (REMAINING_HEADER, decision.remaining as u64),
        (RESET_HEADER, reset_at),
    ] {
        headers.insert(HeaderName::from_static(name), HeaderValue::from(value));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decision(allowed: bool) -> RateLimitDecision {
        RateLimitDecision {
            allowed,
            remaining: if allowed { 99 } else { 0 },
            limit: 100,
            reset_in_seconds: 900,
        }
    }

    #[test]
    fn test_forwarded_for_first_hop() {
        let request = Request::builder()
            .header("x-forwarded-for", "203.0.113.7, 10.0.0.1")
            .body(Body::empty())
            .unwrap();

        assert_eq!(client_identifier(&request), "203.0.113.7");
    }

    #[test]
    fn test_connect_info_wins() {
        let mut request = Request::builder()
            .header("x-forwarded-for", "203.0.113.7")
            .body(Body::empty())
            .unwrap();
        request
            .extensions_mut()
            .insert(ConnectInfo(SocketAddr::from(([192, 0, 2, 1], 40000))));

        assert_eq!(client_identifier(&request), "192.0.2.1");
    }

    #[test]
    fn test_unknown_client() {
        let request = Request::builder().body(Body::empty()).unwrap();
        assert_eq!(client_identifier(&request), "unknown");
    }

    #[test]
    fn test_headers_applied() {
        let mut headers = HeaderMap::new();
        apply_headers(&mut headers, &decision(true));

        assert_eq!(headers[LIMIT_HEADER], "100");
        assert_eq!(headers[REMAINING_HEADER], "99");

        let reset: i64 = headers[RESET_HEADER].to_str().unwrap().parse().unwrap();
        assert!(reset >= Utc::now().timestamp() + 899);
    }

    #[test]
    fn test_rate_limited_response() {
        let response = rate_limited_response(&decision(false));

        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(response.headers()[REMAINING_HEADER], "0");
    }
}
