#![allow(dead_code)]

use std::sync::Arc;

use crudapps_infra::external::MovieMetadataSource;
use crudapps_web::config::{AppKind, Settings};

pub struct TestServer {
    pub base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    pub async fn spawn(settings: Settings) -> Self {
        Self::spawn_with_metadata(settings, None).await
    }

    pub async fn spawn_with_metadata(
        settings: Settings,
        metadata: Option<Arc<dyn MovieMetadataSource>>,
    ) -> Self {
        // Build app (same router as prod), but bind to an ephemeral port.
        let app = crudapps_web::app::build_app_with_metadata(&settings, metadata)
            .await
            .expect("failed to build app");
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Settings for `app` backed by a private in-memory database.
pub fn test_settings(app: AppKind) -> Settings {
    let mut settings = Settings::defaults(app);
    settings.database_url = "sqlite::memory:".to_string();
    settings.password_hash_rounds = 1_000;
    settings
}

/// Client that never follows redirects, so tests can assert on them.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap()
}

pub fn location(res: &reqwest::Response) -> &str {
    res.headers()
        .get(reqwest::header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

/// `name=value` pair of a cookie set by `res`, if any.
pub fn set_cookie(res: &reqwest::Response, name: &str) -> Option<String> {
    res.headers()
        .get_all(reqwest::header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .filter_map(|v| v.split(';').next())
        .find(|pair| pair.starts_with(&format!("{name}=")))
        .map(str::to_string)
}

/// Undo the HTML escaping applied to template output.
pub fn unescape(html: &str) -> String {
    html.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#x27;", "'")
        .replace("&#x2f;", "/")
        .replace("&amp;", "&")
}
