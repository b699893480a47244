//! Blog with create / edit / delete.

use std::sync::Arc;

use axum::{
    extract::{Extension, Form, Path},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::get,
    Router,
};
use chrono::Utc;
use minijinja::context;

use crudapps_blog::{BlogPost, NewPost, PostForm, format_post_date};
use crudapps_core::{DomainError, FieldErrors, RecordId};
use crudapps_infra::StoreError;

use crate::app::errors;
use crate::app::services::BlogServices;
use crate::app::views::Views;

const NOT_FOUND: &str = "Sorry! A post with this id does not exist on the server";

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_posts))
        .route("/post/:id", get(show_post))
        .route("/new_post", get(new_post_form).post(create_post))
        .route("/edit-post/:id", get(edit_post_form).post(edit_post))
        .route("/delete/:id", get(delete_post))
        .route("/about", get(about))
        .route("/contact", get(contact))
}

pub async fn list_posts(
    Extension(views): Extension<Arc<Views>>,
    Extension(services): Extension<Arc<BlogServices>>,
) -> Response {
    match services.posts.all().await {
        Ok(posts) => views.page("blog/index.html", context! { posts }),
        Err(e) => errors::internal_error(e),
    }
}

pub async fn show_post(
    Extension(views): Extension<Arc<Views>>,
    Extension(services): Extension<Arc<BlogServices>>,
    Path(id): Path<String>,
) -> Response {
    match load_post(&services, &id).await {
        Ok(post) => views.page("blog/post.html", context! { post }),
        Err(PostLookup::Missing) => (StatusCode::OK, NOT_FOUND).into_response(),
        Err(PostLookup::Failed(response)) => response,
    }
}

pub async fn new_post_form(Extension(views): Extension<Arc<Views>>) -> Response {
    render_editor(&views, None, &PostForm::default(), &FieldErrors::new())
}

pub async fn create_post(
    Extension(views): Extension<Arc<Views>>,
    Extension(services): Extension<Arc<BlogServices>>,
    Form(form): Form<PostForm>,
) -> Response {
    let content = match form.clone().into_content() {
        Ok(content) => content,
        Err(DomainError::Form(field_errors)) => return render_editor(&views, None, &form, &field_errors),
        Err(other) => return errors::internal_error(other),
    };

    let new_post = NewPost {
        content,
        date: format_post_date(Utc::now().date_naive()),
    };

    match services.posts.insert(new_post).await {
        Ok(post) => {
            tracing::info!(id = %post.id, title = %post.title, "post created");
            Redirect::to("/").into_response()
        }
        Err(StoreError::Conflict(msg)) => render_editor(&views, None, &form, &title_taken(msg)),
        Err(e) => errors::internal_error(e),
    }
}

pub async fn edit_post_form(
    Extension(views): Extension<Arc<Views>>,
    Extension(services): Extension<Arc<BlogServices>>,
    Path(id): Path<String>,
) -> Response {
    match load_post(&services, &id).await {
        Ok(post) => render_editor(&views, Some(&post), &PostForm::from_post(&post), &FieldErrors::new()),
        Err(lookup) => lookup.into_response(),
    }
}

pub async fn edit_post(
    Extension(views): Extension<Arc<Views>>,
    Extension(services): Extension<Arc<BlogServices>>,
    Path(id): Path<String>,
    Form(form): Form<PostForm>,
) -> Response {
    let post = match load_post(&services, &id).await {
        Ok(post) => post,
        Err(lookup) => return lookup.into_response(),
    };

    let content = match form.clone().into_content() {
        Ok(content) => content,
        Err(DomainError::Form(field_errors)) => {
            return render_editor(&views, Some(&post), &form, &field_errors);
        }
        Err(other) => return errors::internal_error(other),
    };

    match services.posts.update_content(post.id, &content).await {
        Ok(()) => Redirect::to(&format!("/post/{}", post.id)).into_response(),
        Err(StoreError::Conflict(msg)) => render_editor(&views, Some(&post), &form, &title_taken(msg)),
        Err(e) => errors::store_error_to_page(e, NOT_FOUND),
    }
}

pub async fn delete_post(
    Extension(services): Extension<Arc<BlogServices>>,
    Path(id): Path<String>,
) -> Response {
    let Ok(id) = id.parse::<RecordId>() else {
        return (StatusCode::NOT_FOUND, NOT_FOUND).into_response();
    };
    match services.posts.delete(id).await {
        Ok(()) => {
            tracing::info!(%id, "post deleted");
            Redirect::to("/").into_response()
        }
        Err(e) => errors::store_error_to_page(e, NOT_FOUND),
    }
}

pub async fn about(Extension(views): Extension<Arc<Views>>) -> Response {
    views.page("blog/about.html", context! {})
}

pub async fn contact(Extension(views): Extension<Arc<Views>>) -> Response {
    views.page("blog/contact.html", context! {})
}

enum PostLookup {
    /// Absent and malformed ids alike.
    Missing,
    Failed(Response),
}

impl IntoResponse for PostLookup {
    /// Editing a missing post is a 404; only the read page answers `200`.
    fn into_response(self) -> Response {
        match self {
            Self::Missing => (StatusCode::NOT_FOUND, NOT_FOUND).into_response(),
            Self::Failed(response) => response,
        }
    }
}

async fn load_post(services: &BlogServices, id: &str) -> Result<BlogPost, PostLookup> {
    let id = id.parse::<RecordId>().map_err(|_| PostLookup::Missing)?;
    services.posts.get(id).await.map_err(|e| match e {
        StoreError::NotFound => PostLookup::Missing,
        other => PostLookup::Failed(errors::internal_error(other)),
    })
}

fn title_taken(message: String) -> FieldErrors {
    let mut field_errors = FieldErrors::new();
    field_errors.push("title", message);
    field_errors
}

fn render_editor(views: &Views, post: Option<&BlogPost>, form: &PostForm, field_errors: &FieldErrors) -> Response {
    views.page(
        "blog/make-post.html",
        context! {
            form,
            errors => field_errors,
            post_id => post.map(|p| p.id.get()),
            is_edit => post.is_some(),
        },
    )
}
