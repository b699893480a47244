//! Server-rendered HTML pages (minijinja templates compiled into the binary).

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use minijinja::Environment;
use serde::Serialize;

use crate::app::errors;

macro_rules! templates {
    ($($name:literal),* $(,)?) => {
        &[$(($name, include_str!(concat!("../../templates/", $name)))),*]
    };
}

const TEMPLATES: &[(&str, &str)] = templates![
    "cafe_directory/base.html",
    "cafe_directory/index.html",
    "cafe_directory/add.html",
    "cafe_directory/cafes.html",
    "movies/base.html",
    "movies/index.html",
    "movies/add.html",
    "movies/select.html",
    "movies/edit.html",
    "cafe_api/index.html",
    "blog/base.html",
    "blog/index.html",
    "blog/post.html",
    "blog/make-post.html",
    "blog/about.html",
    "blog/contact.html",
    "auth/base.html",
    "auth/index.html",
    "auth/register.html",
    "auth/login.html",
    "auth/secrets.html",
];

/// Template registry shared by every handler.
pub struct Views {
    env: Environment<'static>,
}

impl Views {
    pub fn new() -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        for &(name, source) in TEMPLATES {
            env.add_template(name, source)?;
        }
        Ok(Self { env })
    }

    pub fn render_string<S: Serialize>(&self, name: &str, ctx: S) -> Result<String, minijinja::Error> {
        self.env.get_template(name)?.render(ctx)
    }

    /// Render `name` as a 200 page.
    pub fn page<S: Serialize>(&self, name: &str, ctx: S) -> Response {
        self.page_with_status(StatusCode::OK, name, ctx)
    }

    pub fn page_with_status<S: Serialize>(&self, status: StatusCode, name: &str, ctx: S) -> Response {
        match self.render_string(name, ctx) {
            Ok(html) => (status, Html(html)).into_response(),
            Err(e) => errors::internal_error(format!("rendering {name}: {e:#}")),
        }
    }
}
