//! HTTP application wiring (Axum router + service wiring).
//!
//! - `services.rs`: stores and clients each app needs
//! - `routes/`: HTTP routes + handlers (one file per app)
//! - `views.rs`: HTML templates
//! - `dto.rs`: query DTOs and JSON projections
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use anyhow::Context;
use axum::{routing::get, Extension, Router};
use tower::ServiceBuilder;

use crudapps_infra::external::{MovieMetadataSource, TmdbClient};

use crate::config::{AppKind, Settings};
use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;
pub mod views;

/// Build the router for `settings.app` (public entrypoint used by `main.rs`).
pub async fn build_app(settings: &Settings) -> anyhow::Result<Router> {
    let metadata: Option<Arc<dyn MovieMetadataSource>> = match (settings.app, &settings.tmdb) {
        (AppKind::Movies, Some(tmdb)) => Some(Arc::new(
            TmdbClient::new(tmdb.clone()).context("failed to build TMDB client")?,
        )),
        (AppKind::Movies, None) => anyhow::bail!("the movies app needs TMDB settings"),
        _ => None,
    };
    build_app_with_metadata(settings, metadata).await
}

/// Like [`build_app`], with the movie-metadata source supplied by the caller.
pub async fn build_app_with_metadata(
    settings: &Settings,
    metadata: Option<Arc<dyn MovieMetadataSource>>,
) -> anyhow::Result<Router> {
    let views = Arc::new(views::Views::new().context("failed to load templates")?);

    let app = match settings.app {
        AppKind::CafeDirectory => {
            let services = Arc::new(services::cafe_directory(settings));
            routes::cafe_directory::router().layer(Extension(services))
        }
        AppKind::Movies => {
            let metadata = metadata.context("the movies app needs a metadata source")?;
            let services = Arc::new(services::movies(settings, metadata).await?);
            routes::movies::router().layer(Extension(services))
        }
        AppKind::CafeApi => {
            let services = Arc::new(services::cafe_api(settings).await?);
            routes::cafe_api::router().layer(Extension(services))
        }
        AppKind::Blog => {
            let services = Arc::new(services::blog(settings).await?);
            routes::blog::router().layer(Extension(services))
        }
        AppKind::Auth => {
            let services = Arc::new(services::auth(settings).await?);

            // Protected routes: anonymous visitors are sent to /login.
            let protected = routes::auth_demo::protected_router().layer(
                axum::middleware::from_fn_with_state(services.clone(), middleware::require_login),
            );

            routes::auth_demo::public_router()
                .merge(protected)
                .layer(Extension(services))
        }
    };

    tracing::info!(app = %settings.app, "router built");

    Ok(Router::new()
        .route("/health", get(routes::system::health))
        .merge(app)
        .layer(
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn(middleware::log_requests))
                .layer(Extension(views)),
        ))
}
