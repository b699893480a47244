use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use serde_json::json;

use crudapps_core::FieldErrors;
use crudapps_infra::StoreError;
use crudapps_infra::external::MetadataError;

/// `{"error": {"<code>": <detail>}}`, the cafe API's error envelope.
pub fn json_error(status: StatusCode, code: &'static str, detail: impl Serialize) -> Response {
    (status, axum::Json(json!({ "error": { code: detail } }))).into_response()
}

pub fn json_not_found(message: &str) -> Response {
    json_error(StatusCode::NOT_FOUND, "Not Found", message)
}

/// Lookups (`/search`, `/update-price`) answer a miss with the not-found
/// envelope and `200 OK`.
pub fn json_no_match(message: &str) -> Response {
    json_error(StatusCode::OK, "Not Found", message)
}

pub fn json_bad_request(errors: &FieldErrors) -> Response {
    json_error(StatusCode::BAD_REQUEST, "Bad Request", errors)
}

pub fn json_forbidden(message: &str) -> Response {
    (StatusCode::FORBIDDEN, axum::Json(json!({ "error": message }))).into_response()
}

/// Map a storage failure on a JSON route.
pub fn store_error_to_json(err: StoreError, not_found: &str) -> Response {
    match err {
        StoreError::NotFound => json_not_found(not_found),
        StoreError::Conflict(msg) => json_error(StatusCode::CONFLICT, "Conflict", msg),
        other => {
            tracing::error!(error = %other, "store failure");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error", "internal error")
        }
    }
}

/// Map a storage failure on an HTML route.
pub fn store_error_to_page(err: StoreError, not_found: &str) -> Response {
    match err {
        StoreError::NotFound => (StatusCode::NOT_FOUND, not_found.to_string()).into_response(),
        StoreError::Conflict(msg) => (StatusCode::CONFLICT, msg).into_response(),
        other => internal_error(other),
    }
}

pub fn metadata_error(err: MetadataError) -> Response {
    tracing::error!(error = %err, "movie metadata lookup failed");
    (StatusCode::BAD_GATEWAY, "The movie database could not be reached. Please try again later.")
        .into_response()
}

/// Log and hide an unexpected failure.
pub fn internal_error(err: impl std::fmt::Display) -> Response {
    tracing::error!(error = %err, "request failed");
    (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn not_found_uses_the_api_envelope() {
        let response = store_error_to_json(StoreError::NotFound, "Sorry, no cafe.");
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await, json!({"error": {"Not Found": "Sorry, no cafe."}}));
    }

    #[tokio::test]
    async fn lookup_miss_keeps_the_envelope_with_ok_status() {
        let response = json_no_match("Sorry, no cafe.");
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!({"error": {"Not Found": "Sorry, no cafe."}}));
    }

    #[tokio::test]
    async fn conflict_and_forbidden_shapes() {
        let response = store_error_to_json(StoreError::Conflict("dup".to_string()), "x");
        assert_eq!(response.status(), StatusCode::CONFLICT);
        assert_eq!(body_json(response).await, json!({"error": {"Conflict": "dup"}}));

        let response = json_forbidden("nope");
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(body_json(response).await, json!({"error": "nope"}));
    }

    #[tokio::test]
    async fn field_errors_are_listed_per_field() {
        let mut errors = FieldErrors::new();
        errors.push("name", "This field is required.");
        let response = json_bad_request(&errors);
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await,
            json!({"error": {"Bad Request": {"name": ["This field is required."]}}})
        );
    }
}
