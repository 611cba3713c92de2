//! JSON body extractor and responder

use axum::{
    extract::{rejection::JsonRejection, FromRequest, Request},
    response::{IntoResponse, Response},
    Json as AxumJson,
};
use serde::{de::DeserializeOwned, Serialize};

use super::error::{ApiError, ApiErrorType};

/// Request and response body wrapper
///
/// Malformed disaster, resource and report bodies are rejected with the same
/// `{"error": {...}}` shape as every other failure, code `json_parse_error`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Json<T>(pub T);

impl<S, T> FromRequest<S> for Json<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        AxumJson::<T>::from_request(req, state)
            .await
            .map(|AxumJson(value)| Json(value))
            .map_err(|rejection| body_error(&rejection))
    }
}

impl<T: Serialize> IntoResponse for Json<T> {
    fn into_response(self) -> Response {
        AxumJson(self.0).into_response()
    }
}

fn body_error(rejection: &JsonRejection) -> ApiError {
    let message = match rejection {
        JsonRejection::JsonDataError(err) => {
            format!("Request body has the wrong shape: {}", err.body_text())
        }
        JsonRejection::JsonSyntaxError(err) => {
            format!("Request body is not valid JSON: {}", err.body_text())
        }
        JsonRejection::MissingJsonContentType(_) => {
            "Expected a 'Content-Type: application/json' request body".to_string()
        }
        JsonRejection::BytesRejection(err) => {
            format!("Request body could not be read: {}", err.body_text())
        }
        _ => "Invalid JSON request body".to_string(),
    };

    ApiError::new(rejection.status(), ApiErrorType::InvalidRequestError, message)
        .with_code("json_parse_error")
}
