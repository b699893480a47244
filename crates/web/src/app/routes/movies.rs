//! Top-movies list: search an external catalogue, add, rate, delete.

use std::sync::Arc;

use axum::{
    extract::{Extension, Form, Query},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::get,
    Router,
};
use minijinja::context;

use crudapps_core::{DomainError, FieldErrors, RecordId};
use crudapps_infra::StoreError;
use crudapps_movies::{FindMovieForm, Movie, RateMovieForm, assign_rankings};

use crate::app::dto::IdQuery;
use crate::app::errors;
use crate::app::services::MovieServices;
use crate::app::views::Views;

const NOT_FOUND: &str = "Sorry! A movie with this id does not exist.";

pub fn router() -> Router {
    Router::new()
        .route("/", get(home))
        .route("/add", get(add_form).post(search))
        .route("/select", get(select))
        .route("/edit", get(edit_form).post(rate))
        .route("/delete", get(delete))
}

pub async fn home(
    Extension(views): Extension<Arc<Views>>,
    Extension(services): Extension<Arc<MovieServices>>,
) -> Response {
    match services.movies.all_by_rating().await {
        Ok(mut movies) => {
            assign_rankings(&mut movies);
            views.page("movies/index.html", context! { movies })
        }
        Err(e) => errors::internal_error(e),
    }
}

pub async fn add_form(Extension(views): Extension<Arc<Views>>) -> Response {
    views.page(
        "movies/add.html",
        context! { form => FindMovieForm::default(), errors => FieldErrors::new() },
    )
}

/// Validate the title, query the catalogue and list the candidates.
pub async fn search(
    Extension(views): Extension<Arc<Views>>,
    Extension(services): Extension<Arc<MovieServices>>,
    Form(form): Form<FindMovieForm>,
) -> Response {
    let title = match form.clone().into_query() {
        Ok(title) => title,
        Err(DomainError::Form(field_errors)) => {
            return views.page("movies/add.html", context! { form, errors => field_errors });
        }
        Err(other) => return errors::internal_error(other),
    };

    match services.metadata.search(&title).await {
        Ok(movies) => views.page("movies/select.html", context! { movies, query => title }),
        Err(e) => errors::metadata_error(e),
    }
}

/// Fetch details for a catalogue id, store the movie and go rate it.
pub async fn select(
    Extension(services): Extension<Arc<MovieServices>>,
    Query(query): Query<IdQuery>,
) -> Response {
    let Some(external_id) = query.id.as_deref().and_then(|id| id.trim().parse::<i64>().ok()) else {
        return (StatusCode::NOT_FOUND, "Sorry! That movie could not be found.").into_response();
    };

    let details = match services.metadata.details(external_id).await {
        Ok(details) => details,
        Err(e) => return errors::metadata_error(e),
    };

    let new_movie = match details.into_new_movie(services.metadata.image_base()) {
        Ok(movie) => movie,
        Err(e) => {
            tracing::error!(external_id, error = %e, "movie details unusable");
            return (StatusCode::BAD_GATEWAY, "The movie database returned incomplete details.")
                .into_response();
        }
    };

    match services.movies.insert(new_movie).await {
        Ok(movie) => {
            tracing::info!(id = %movie.id, title = %movie.title, "movie added");
            Redirect::to(&format!("/edit?id={}", movie.id)).into_response()
        }
        Err(e) => errors::store_error_to_page(e, NOT_FOUND),
    }
}

pub async fn edit_form(
    Extension(views): Extension<Arc<Views>>,
    Extension(services): Extension<Arc<MovieServices>>,
    Query(query): Query<IdQuery>,
) -> Response {
    let movie = match load_movie(&services, &query).await {
        Ok(movie) => movie,
        Err(response) => return response,
    };

    let form = RateMovieForm {
        rating: movie.rating.map(|r| r.to_string()).unwrap_or_default(),
        review: movie.review.clone().unwrap_or_default(),
    };
    views.page("movies/edit.html", context! { movie, form, errors => FieldErrors::new() })
}

pub async fn rate(
    Extension(views): Extension<Arc<Views>>,
    Extension(services): Extension<Arc<MovieServices>>,
    Query(query): Query<IdQuery>,
    Form(form): Form<RateMovieForm>,
) -> Response {
    let movie = match load_movie(&services, &query).await {
        Ok(movie) => movie,
        Err(response) => return response,
    };

    let review = match form.clone().into_review() {
        Ok(review) => review,
        Err(DomainError::Form(field_errors)) => {
            return views.page("movies/edit.html", context! { movie, form, errors => field_errors });
        }
        Err(other) => return errors::internal_error(other),
    };

    match services.movies.update_review(movie.id, &review).await {
        Ok(()) => Redirect::to("/").into_response(),
        Err(e) => errors::store_error_to_page(e, NOT_FOUND),
    }
}

pub async fn delete(
    Extension(services): Extension<Arc<MovieServices>>,
    Query(query): Query<IdQuery>,
) -> Response {
    let Some(id) = parse_id(&query) else {
        return (StatusCode::NOT_FOUND, NOT_FOUND).into_response();
    };
    match services.movies.delete(id).await {
        Ok(()) => Redirect::to("/").into_response(),
        Err(e) => errors::store_error_to_page(e, NOT_FOUND),
    }
}

fn parse_id(query: &IdQuery) -> Option<RecordId> {
    query.id.as_deref()?.trim().parse().ok()
}

async fn load_movie(services: &MovieServices, query: &IdQuery) -> Result<Movie, Response> {
    let id = parse_id(query).ok_or_else(|| (StatusCode::NOT_FOUND, NOT_FOUND).into_response())?;
    services.movies.get(id).await.map_err(|e| match e {
        StoreError::NotFound => (StatusCode::NOT_FOUND, NOT_FOUND).into_response(),
        other => errors::internal_error(other),
    })
}
