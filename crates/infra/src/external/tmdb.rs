//! TMDB v3 client (bearer-token auth).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crudapps_movies::{MovieDetails, MovieSearchHit};

use super::{MetadataError, MovieMetadataSource};

pub const DEFAULT_SEARCH_URL: &str = "https://api.themoviedb.org/3/search/movie";
pub const DEFAULT_DETAILS_URL: &str = "https://api.themoviedb.org/3/movie";
pub const DEFAULT_IMG_URL: &str = "https://image.tmdb.org/t/p/w500";

#[derive(Debug, Clone)]
pub struct TmdbConfig {
    pub bearer: String,
    pub search_url: String,
    pub details_url: String,
    pub img_url: String,
}

impl TmdbConfig {
    pub fn new(bearer: impl Into<String>) -> Self {
        Self {
            bearer: bearer.into(),
            search_url: DEFAULT_SEARCH_URL.to_string(),
            details_url: DEFAULT_DETAILS_URL.to_string(),
            img_url: DEFAULT_IMG_URL.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<MovieSearchHit>,
}

pub struct TmdbClient {
    client: Client,
    config: TmdbConfig,
}

impl TmdbClient {
    pub fn new(config: TmdbConfig) -> Result<Self, MetadataError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(concat!("crudapps/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client, config })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, MetadataError> {
        let response = request
            .bearer_auth(&self.config.bearer)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), "metadata API returned an error");
            return Err(MetadataError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| MetadataError::Malformed(e.to_string()))
    }
}

#[async_trait]
impl MovieMetadataSource for TmdbClient {
    async fn search(&self, title: &str) -> Result<Vec<MovieSearchHit>, MetadataError> {
        tracing::debug!(title, "searching movie metadata");
        let request = self.client.get(&self.config.search_url).query(&[("query", title)]);
        let response: SearchResponse = self.get_json(request).await?;
        Ok(response.results)
    }

    async fn details(&self, id: i64) -> Result<MovieDetails, MetadataError> {
        tracing::debug!(id, "fetching movie details");
        let url = format!("{}/{}", self.config.details_url.trim_end_matches('/'), id);
        self.get_json(self.client.get(url)).await
    }

    fn image_base(&self) -> &str {
        &self.config.img_url
    }
}
