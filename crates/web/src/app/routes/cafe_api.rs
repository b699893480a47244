//! JSON API over the `cafe` table.

use std::sync::Arc;

use axum::{
    extract::{rejection::FormRejection, Extension, Form, Path, Query},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, patch, post},
    Json, Router,
};
use minijinja::context;
use serde_json::json;
use subtle::ConstantTimeEq;

use crudapps_cafes::AddCafeForm;
use crudapps_core::{DomainError, FieldErrors, RecordId};
use crudapps_infra::StoreError;

use crate::app::dto::{self, ApiKeyQuery, LocationQuery, NewPriceQuery};
use crate::app::errors;
use crate::app::services::CafeApiServices;
use crate::app::views::Views;

const NO_CAFE_AT_LOCATION: &str = "Sorry, we don't have a cafe at that location.";
const NO_CAFE_WITH_ID: &str = "Sorry, a cafe with that id was not found in the database.";
const NO_CAFES: &str = "Sorry, there are no cafes in the database.";
const WRONG_API_KEY: &str = "Sorry, that's not allowed. Make sure you have the correct api_key";

pub fn router() -> Router {
    Router::new()
        .route("/", get(home))
        .route("/all", get(all_cafes))
        .route("/search", get(search))
        .route("/random", get(random_cafe))
        .route("/add", post(add_cafe))
        .route("/update-price/:id", patch(update_price))
        .route("/report-closed/:id", delete(report_closed))
}

pub async fn home(Extension(views): Extension<Arc<Views>>) -> Response {
    views.page("cafe_api/index.html", context! {})
}

pub async fn all_cafes(Extension(services): Extension<Arc<CafeApiServices>>) -> Response {
    match services.cafes.all().await {
        Ok(cafes) => {
            let cafes = cafes.iter().map(dto::cafe_to_json).collect::<Vec<_>>();
            (StatusCode::OK, Json(json!({ "cafes": cafes }))).into_response()
        }
        Err(e) => errors::store_error_to_json(e, NO_CAFES),
    }
}

pub async fn search(
    Extension(services): Extension<Arc<CafeApiServices>>,
    Query(query): Query<LocationQuery>,
) -> Response {
    let Some(location) = query.loc.filter(|l| !l.trim().is_empty()) else {
        return errors::json_no_match(NO_CAFE_AT_LOCATION);
    };

    match services.cafes.find_by_location(&location).await {
        Ok(cafes) if cafes.is_empty() => errors::json_no_match(NO_CAFE_AT_LOCATION),
        Ok(cafes) => {
            let cafes = cafes.iter().map(dto::cafe_to_json).collect::<Vec<_>>();
            (StatusCode::OK, Json(json!({ "cafes": cafes }))).into_response()
        }
        Err(e) => errors::store_error_to_json(e, NO_CAFE_AT_LOCATION),
    }
}

pub async fn random_cafe(Extension(services): Extension<Arc<CafeApiServices>>) -> Response {
    match services.cafes.random().await {
        Ok(Some(cafe)) => (StatusCode::OK, Json(json!({ "cafe": dto::cafe_to_json(&cafe) }))).into_response(),
        Ok(None) => errors::json_not_found(NO_CAFES),
        Err(e) => errors::store_error_to_json(e, NO_CAFES),
    }
}

pub async fn add_cafe(
    Extension(services): Extension<Arc<CafeApiServices>>,
    form: Result<Form<AddCafeForm>, FormRejection>,
) -> Response {
    let form = match form {
        Ok(Form(form)) => form,
        Err(rejection) => {
            tracing::debug!(error = %rejection, "cafe submission unreadable");
            let mut field_errors = FieldErrors::new();
            field_errors.push("form", rejection.body_text());
            return errors::json_bad_request(&field_errors);
        }
    };

    let new_cafe = match form.into_new_cafe() {
        Ok(cafe) => cafe,
        Err(DomainError::Form(field_errors)) => return errors::json_bad_request(&field_errors),
        Err(other) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "Bad Request", other.to_string());
        }
    };

    match services.cafes.insert(new_cafe).await {
        Ok(cafe) => {
            tracing::info!(id = %cafe.id, name = %cafe.name, "cafe added");
            (
                StatusCode::OK,
                Json(json!({ "response": { "succes": "Successfully added the new cafe." } })),
            )
                .into_response()
        }
        Err(e) => errors::store_error_to_json(e, NO_CAFE_WITH_ID),
    }
}

pub async fn update_price(
    Extension(services): Extension<Arc<CafeApiServices>>,
    Path(id): Path<String>,
    Query(query): Query<NewPriceQuery>,
) -> Response {
    let Some(new_price) = query.new_price.map(|p| p.trim().to_string()).filter(|p| !p.is_empty()) else {
        let mut field_errors = FieldErrors::new();
        field_errors.push("new_price", "This field is required.");
        return errors::json_bad_request(&field_errors);
    };

    let Ok(id) = id.parse::<RecordId>() else {
        return errors::json_no_match(NO_CAFE_WITH_ID);
    };

    match services.cafes.update_price(id, &new_price).await {
        Ok(()) => (StatusCode::OK, Json(json!({ "success": "Successfully updated the price." }))).into_response(),
        Err(StoreError::NotFound) => errors::json_no_match(NO_CAFE_WITH_ID),
        Err(e) => errors::store_error_to_json(e, NO_CAFE_WITH_ID),
    }
}

/// Remove a cafe that closed down. The API key is checked before the id.
pub async fn report_closed(
    Extension(services): Extension<Arc<CafeApiServices>>,
    Path(id): Path<String>,
    Query(query): Query<ApiKeyQuery>,
) -> Response {
    if !api_key_matches(&services.api_key, query.api_key.as_deref()) {
        tracing::warn!(%id, "cafe deletion refused: wrong api key");
        return errors::json_forbidden(WRONG_API_KEY);
    }

    let Ok(id) = id.parse::<RecordId>() else {
        return errors::json_not_found(NO_CAFE_WITH_ID);
    };

    match services.cafes.delete(id).await {
        Ok(()) => {
            tracing::info!(%id, "cafe reported closed and deleted");
            (StatusCode::OK, Json(json!({ "success": "Successfully deleted the cafe." }))).into_response()
        }
        Err(e) => errors::store_error_to_json(e, NO_CAFE_WITH_ID),
    }
}

/// Constant-time comparison of the submitted `api-key`.
fn api_key_matches(expected: &str, submitted: Option<&str>) -> bool {
    submitted.is_some_and(|key| bool::from(key.as_bytes().ct_eq(expected.as_bytes())))
}
