//! Process-wide objects each app's handlers need, built once at startup.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;

use crudapps_auth::{Hs256SessionCodec, Passwords};
use crudapps_infra::db;
use crudapps_infra::external::MovieMetadataSource;
use crudapps_infra::stores::{CafeFileStore, CafeStore, MovieStore, PostStore, UserStore};

use crate::config::Settings;

pub struct CafeDirectoryServices {
    pub cafes: CafeFileStore,
}

pub struct MovieServices {
    pub movies: MovieStore,
    pub metadata: Arc<dyn MovieMetadataSource>,
}

pub struct CafeApiServices {
    pub cafes: CafeStore,
    pub api_key: String,
}

pub struct BlogServices {
    pub posts: PostStore,
}

pub struct AuthServices {
    pub users: UserStore,
    pub passwords: Passwords,
    pub sessions: Hs256SessionCodec,
    pub static_dir: PathBuf,
}

pub fn cafe_directory(settings: &Settings) -> CafeDirectoryServices {
    CafeDirectoryServices {
        cafes: CafeFileStore::new(&settings.cafe_csv_path),
    }
}

pub async fn movies(
    settings: &Settings,
    metadata: Arc<dyn MovieMetadataSource>,
) -> anyhow::Result<MovieServices> {
    let pool = db::connect(&settings.database_url)
        .await
        .with_context(|| format!("failed to open {}", settings.database_url))?;
    let movies = MovieStore::new(pool);
    movies.ensure_schema().await.context("failed to create movie table")?;
    Ok(MovieServices { movies, metadata })
}

pub async fn cafe_api(settings: &Settings) -> anyhow::Result<CafeApiServices> {
    let pool = db::connect(&settings.database_url)
        .await
        .with_context(|| format!("failed to open {}", settings.database_url))?;
    let cafes = CafeStore::new(pool);
    cafes.ensure_schema().await.context("failed to create cafe table")?;
    Ok(CafeApiServices {
        cafes,
        api_key: settings.cafe_api_key.clone(),
    })
}

pub async fn blog(settings: &Settings) -> anyhow::Result<BlogServices> {
    let pool = db::connect(&settings.database_url)
        .await
        .with_context(|| format!("failed to open {}", settings.database_url))?;
    let posts = PostStore::new(pool);
    posts.ensure_schema().await.context("failed to create blog_post table")?;
    Ok(BlogServices { posts })
}

pub async fn auth(settings: &Settings) -> anyhow::Result<AuthServices> {
    let pool = db::connect(&settings.database_url)
        .await
        .with_context(|| format!("failed to open {}", settings.database_url))?;
    let users = UserStore::new(pool);
    users.ensure_schema().await.context("failed to create user table")?;
    Ok(AuthServices {
        users,
        passwords: Passwords::new(settings.password_hash_rounds),
        sessions: Hs256SessionCodec::new(settings.secret_key.as_bytes(), settings.session_ttl()),
        static_dir: settings.static_dir.clone(),
    })
}
