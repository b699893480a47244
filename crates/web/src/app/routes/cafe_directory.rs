//! Cafe directory backed by a CSV file.

use std::sync::Arc;

use axum::{
    extract::{Extension, Form},
    response::{IntoResponse, Redirect, Response},
    routing::get,
    Router,
};
use minijinja::context;

use crudapps_cafes::{COFFEE_CHOICES, CafeEntry, CafeForm, POWER_CHOICES, WIFI_CHOICES};
use crudapps_core::{DomainError, FieldErrors};

use crate::app::dto::DirectoryRow;
use crate::app::errors;
use crate::app::services::CafeDirectoryServices;
use crate::app::views::Views;

pub fn router() -> Router {
    Router::new()
        .route("/", get(home))
        .route("/add", get(add_form).post(add_cafe))
        .route("/cafes", get(list_cafes))
}

pub async fn home(Extension(views): Extension<Arc<Views>>) -> Response {
    views.page("cafe_directory/index.html", context! {})
}

pub async fn add_form(Extension(views): Extension<Arc<Views>>) -> Response {
    render_form(&views, &CafeForm::default(), &FieldErrors::new())
}

pub async fn add_cafe(
    Extension(views): Extension<Arc<Views>>,
    Extension(services): Extension<Arc<CafeDirectoryServices>>,
    Form(form): Form<CafeForm>,
) -> Response {
    let entry = match form.clone().into_entry() {
        Ok(entry) => entry,
        Err(DomainError::Form(field_errors)) => return render_form(&views, &form, &field_errors),
        Err(other) => return errors::internal_error(other),
    };

    match services.cafes.append(entry).await {
        Ok(()) => Redirect::to("/cafes").into_response(),
        Err(e) => errors::internal_error(e),
    }
}

pub async fn list_cafes(
    Extension(views): Extension<Arc<Views>>,
    Extension(services): Extension<Arc<CafeDirectoryServices>>,
) -> Response {
    match services.cafes.rows().await {
        Ok(rows) => {
            let mut rows = rows.into_iter();
            let header = rows.next().unwrap_or_default();
            let cafes: Vec<DirectoryRow> = rows
                .filter_map(|row| {
                    let entry = CafeEntry::from_record(row.iter().map(String::as_str));
                    if entry.is_none() {
                        tracing::warn!(columns = row.len(), "skipping short cafe directory row");
                    }
                    entry
                })
                .map(DirectoryRow::from)
                .collect();
            views.page("cafe_directory/cafes.html", context! { header, cafes })
        }
        Err(e) => errors::internal_error(e),
    }
}

fn render_form(views: &Views, form: &CafeForm, field_errors: &FieldErrors) -> Response {
    views.page(
        "cafe_directory/add.html",
        context! {
            form,
            errors => field_errors,
            coffee_choices => COFFEE_CHOICES,
            wifi_choices => WIFI_CHOICES,
            power_choices => POWER_CHOICES,
        },
    )
}
