//! Register / login / logout demo with a protected page and download.

use std::sync::Arc;

use axum::{
    extract::{Extension, Form},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Redirect, Response},
    routing::get,
    Router,
};
use chrono::Utc;
use minijinja::context;

use crudapps_auth::{AuthError, LoginForm, RegisterForm, User, check_credentials};
use crudapps_core::{DomainError, FieldErrors};
use crudapps_infra::StoreError;

use crate::app::errors;
use crate::app::services::AuthServices;
use crate::app::views::Views;
use crate::context::CurrentUser;
use crate::cookies::{SetCookie, read_flash};
use crate::middleware::resolve_session;

const ALREADY_REGISTERED: &str = "You've already signed up with that email, log in instead";
const CHEAT_SHEET: &str = "files/cheat_sheet.pdf";

/// Routes open to everyone.
pub fn public_router() -> Router {
    Router::new()
        .route("/", get(home))
        .route("/register", get(register_form).post(register))
        .route("/login", get(login_form).post(login))
        .route("/logout", get(logout))
}

/// Routes behind the login check.
pub fn protected_router() -> Router {
    Router::new()
        .route("/secrets", get(secrets))
        .route("/download", get(download))
}

pub async fn home(
    Extension(views): Extension<Arc<Views>>,
    Extension(services): Extension<Arc<AuthServices>>,
    headers: HeaderMap,
) -> Response {
    let state = resolve_session(&services, &headers).await;
    views.page(
        "auth/index.html",
        context! { logged_in => state.is_authenticated(), name => state.user().map(|u| u.name.clone()) },
    )
}

pub async fn register_form(
    Extension(views): Extension<Arc<Views>>,
    Extension(services): Extension<Arc<AuthServices>>,
    headers: HeaderMap,
) -> Response {
    let logged_in = resolve_session(&services, &headers).await.is_authenticated();
    render_with_flash(
        &views,
        &headers,
        "auth/register.html",
        context! { form => RegisterForm::default(), errors => FieldErrors::new(), logged_in },
    )
}

pub async fn register(
    Extension(views): Extension<Arc<Views>>,
    Extension(services): Extension<Arc<AuthServices>>,
    Form(form): Form<RegisterForm>,
) -> Response {
    let email = crudapps_auth::normalize_email(&form.email);
    match services.users.find_by_email(&email).await {
        Ok(Some(_)) => return already_registered(),
        Ok(None) => {}
        Err(e) => return errors::internal_error(e),
    }

    // PBKDF2 is CPU-bound; run it on the blocking pool.
    let passwords = services.passwords;
    let submitted = form.clone();
    let new_user = match tokio::task::spawn_blocking(move || submitted.into_new_user(&passwords)).await {
        Ok(Ok(new_user)) => new_user,
        Ok(Err(AuthError::Domain(DomainError::Form(field_errors)))) => {
            return views.page(
                "auth/register.html",
                context! { form, errors => field_errors, logged_in => false },
            );
        }
        Ok(Err(e)) => return errors::internal_error(e),
        Err(e) => return errors::internal_error(e),
    };

    let user = match services.users.insert(new_user).await {
        Ok(user) => user,
        Err(StoreError::Conflict(_)) => return already_registered(),
        Err(e) => return errors::internal_error(e),
    };

    tracing::info!(user_id = %user.id, "user registered");
    start_session(&services, &user)
}

pub async fn login_form(
    Extension(views): Extension<Arc<Views>>,
    Extension(services): Extension<Arc<AuthServices>>,
    headers: HeaderMap,
) -> Response {
    let logged_in = resolve_session(&services, &headers).await.is_authenticated();
    render_with_flash(
        &views,
        &headers,
        "auth/login.html",
        context! { form => LoginForm::default(), errors => FieldErrors::new(), logged_in },
    )
}

pub async fn login(
    Extension(views): Extension<Arc<Views>>,
    Extension(services): Extension<Arc<AuthServices>>,
    Form(form): Form<LoginForm>,
) -> Response {
    match form.check() {
        Ok(()) => {}
        Err(DomainError::Form(field_errors)) => {
            return views.page("auth/login.html", context! { form, errors => field_errors, logged_in => false });
        }
        Err(other) => return errors::internal_error(other),
    }

    let found = match services.users.find_by_email(&form.email()).await {
        Ok(found) => found,
        Err(e) => return errors::internal_error(e),
    };

    let passwords = services.passwords;
    let password = form.password.clone();
    let outcome = tokio::task::spawn_blocking(move || check_credentials(&passwords, found, &password)).await;

    match outcome {
        Ok(Ok(state)) => match state.user() {
            Some(user) => {
                tracing::info!(user_id = %user.id, "user logged in");
                start_session(&services, user)
            }
            None => errors::internal_error("credential check returned no user"),
        },
        Ok(Err(failure)) => {
            tracing::info!(reason = ?failure, "login refused");
            (SetCookie::flash(&failure.to_string()), Redirect::to("/login")).into_response()
        }
        Err(e) => errors::internal_error(e),
    }
}

pub async fn secrets(
    Extension(views): Extension<Arc<Views>>,
    Extension(current): Extension<CurrentUser>,
) -> Response {
    views.page(
        "auth/secrets.html",
        context! { name => current.user().name.clone(), logged_in => true },
    )
}

pub async fn logout() -> Response {
    (SetCookie::clear_session(), Redirect::to("/")).into_response()
}

pub async fn download(
    Extension(services): Extension<Arc<AuthServices>>,
    Extension(current): Extension<CurrentUser>,
) -> Response {
    let path = services.static_dir.join(CHEAT_SHEET);
    match tokio::fs::read(&path).await {
        Ok(bytes) => {
            tracing::info!(user_id = %current.user().id, "cheat sheet downloaded");
            (
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, "application/pdf"),
                    (header::CONTENT_DISPOSITION, "attachment; filename=\"cheat_sheet.pdf\""),
                ],
                bytes,
            )
                .into_response()
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::error!(path = %path.display(), "download file missing");
            (StatusCode::NOT_FOUND, "File not found").into_response()
        }
        Err(e) => errors::internal_error(e),
    }
}

fn start_session(services: &AuthServices, user: &User) -> Response {
    match services.sessions.issue(user.id, Utc::now()) {
        Ok(token) => (
            SetCookie::session(&token, services.sessions.ttl()),
            Redirect::to("/secrets"),
        )
            .into_response(),
        Err(e) => errors::internal_error(e),
    }
}

fn already_registered() -> Response {
    (SetCookie::flash(ALREADY_REGISTERED), Redirect::to("/login")).into_response()
}

/// Render a page, consuming any pending flash message.
fn render_with_flash(views: &Views, headers: &HeaderMap, name: &str, ctx: minijinja::Value) -> Response {
    let Some(message) = read_flash(headers) else {
        return views.page(name, ctx);
    };
    let ctx = context! { flash => message, ..ctx };
    (SetCookie::clear_flash(), views.page(name, ctx)).into_response()
}
