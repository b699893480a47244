//! Clients for third-party HTTP APIs.

pub mod tmdb;

use async_trait::async_trait;
use thiserror::Error;

use crudapps_movies::{MovieDetails, MovieSearchHit};

pub use tmdb::{TmdbClient, TmdbConfig};

/// Failure talking to the movie-metadata API.
#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("metadata request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("metadata API answered {status}: {body}")]
    Status { status: u16, body: String },

    #[error("metadata response was malformed: {0}")]
    Malformed(String),
}

/// Source of movie search results and details.
///
/// Implemented by [`TmdbClient`]; tests substitute an in-process fake.
#[async_trait]
pub trait MovieMetadataSource: Send + Sync {
    async fn search(&self, title: &str) -> Result<Vec<MovieSearchHit>, MetadataError>;

    async fn details(&self, id: i64) -> Result<MovieDetails, MetadataError>;

    /// Prefix for poster paths returned in [`MovieDetails`].
    fn image_base(&self) -> &str;
}
