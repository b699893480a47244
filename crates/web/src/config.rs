//! Runtime settings, read once from the environment at startup.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, anyhow, bail};

use crudapps_auth::Passwords;
use crudapps_infra::external::TmdbConfig;

const DEV_SECRET_KEY: &str = "dev-secret-key";
const DEV_CAFE_API_KEY: &str = "TopSecretAPIKey";

/// Which of the bundled apps this process serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppKind {
    CafeDirectory,
    Movies,
    CafeApi,
    Blog,
    Auth,
}

impl AppKind {
    pub const ALL: [AppKind; 5] = [
        AppKind::CafeDirectory,
        AppKind::Movies,
        AppKind::CafeApi,
        AppKind::Blog,
        AppKind::Auth,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            AppKind::CafeDirectory => "cafe-directory",
            AppKind::Movies => "movies",
            AppKind::CafeApi => "cafe-api",
            AppKind::Blog => "blog",
            AppKind::Auth => "auth",
        }
    }

    fn default_database_url(self) -> &'static str {
        match self {
            AppKind::CafeDirectory | AppKind::CafeApi => "sqlite://cafes.db",
            AppKind::Movies => "sqlite://top-movies.db",
            AppKind::Blog => "sqlite://posts.db",
            AppKind::Auth => "sqlite://users.db",
        }
    }
}

impl fmt::Display for AppKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AppKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AppKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s.trim())
            .ok_or_else(|| {
                let known: Vec<_> = AppKind::ALL.iter().map(|k| k.as_str()).collect();
                anyhow!("unknown app {s:?}; expected one of: {}", known.join(", "))
            })
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub app: AppKind,
    pub bind: String,
    pub database_url: String,
    pub cafe_csv_path: PathBuf,
    pub secret_key: String,
    pub cafe_api_key: String,
    pub static_dir: PathBuf,
    pub session_ttl_minutes: i64,
    pub password_hash_rounds: u32,
    /// Only required (and only read) for the movies app.
    pub tmdb: Option<TmdbConfig>,
}

impl Settings {
    /// Development defaults for `app`.
    pub fn defaults(app: AppKind) -> Self {
        Self {
            app,
            bind: "0.0.0.0:5000".to_string(),
            database_url: app.default_database_url().to_string(),
            cafe_csv_path: PathBuf::from("cafe-data.csv"),
            secret_key: DEV_SECRET_KEY.to_string(),
            cafe_api_key: DEV_CAFE_API_KEY.to_string(),
            static_dir: PathBuf::from("static"),
            session_ttl_minutes: 24 * 60,
            password_hash_rounds: Passwords::DEFAULT_ROUNDS,
            tmdb: None,
        }
    }

    /// Read settings from the process environment.
    ///
    /// `app_arg` (the first CLI argument) wins over `CRUDAPPS_APP`.
    pub fn from_env(app_arg: Option<String>) -> anyhow::Result<Self> {
        Self::from_lookup(app_arg, |key| std::env::var(key).ok())
    }

    /// Same as [`Settings::from_env`], with an injectable variable source.
    pub fn from_lookup(
        app_arg: Option<String>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> anyhow::Result<Self> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let app = match app_arg.or_else(|| var("CRUDAPPS_APP")) {
            Some(name) => name.parse::<AppKind>()?,
            None => bail!("no app selected; pass one as the first argument or set CRUDAPPS_APP"),
        };

        let mut settings = Self::defaults(app);

        if let Some(bind) = var("CRUDAPPS_BIND") {
            settings.bind = bind;
        }
        if let Some(url) = var("DATABASE_URL") {
            settings.database_url = url;
        }
        if let Some(path) = var("CAFE_CSV_PATH") {
            settings.cafe_csv_path = PathBuf::from(path);
        }
        if let Some(dir) = var("STATIC_DIR") {
            settings.static_dir = PathBuf::from(dir);
        }
        if let Some(ttl) = var("SESSION_TTL_MINUTES") {
            settings.session_ttl_minutes = ttl
                .parse::<i64>()
                .ok()
                .filter(|m| *m > 0)
                .with_context(|| format!("SESSION_TTL_MINUTES must be a positive integer, got {ttl:?}"))?;
        }
        if let Some(rounds) = var("PASSWORD_HASH_ROUNDS") {
            settings.password_hash_rounds = rounds
                .parse::<u32>()
                .ok()
                .filter(|r| *r > 0)
                .with_context(|| format!("PASSWORD_HASH_ROUNDS must be a positive integer, got {rounds:?}"))?;
        }

        match var("SECRET_KEY") {
            Some(key) => settings.secret_key = key,
            None if matches!(app, AppKind::Auth) => {
                tracing::warn!("SECRET_KEY not set; using insecure dev default");
            }
            None => {}
        }
        match var("CAFE_API_KEY") {
            Some(key) => settings.cafe_api_key = key,
            None if matches!(app, AppKind::CafeApi) => {
                tracing::warn!("CAFE_API_KEY not set; using insecure dev default");
            }
            None => {}
        }

        if matches!(app, AppKind::Movies) {
            let bearer = var("TMDB_API_BEARER")
                .context("TMDB_API_BEARER must be set for the movies app")?;
            let mut tmdb = TmdbConfig::new(bearer);
            if let Some(url) = var("TMDB_SEARCH_URL") {
                tmdb.search_url = url;
            }
            if let Some(url) = var("TMDB_DETAILS_URL") {
                tmdb.details_url = url;
            }
            if let Some(url) = var("TMDB_IMG_URL") {
                tmdb.img_url = url;
            }
            settings.tmdb = Some(tmdb);
        }

        Ok(settings)
    }

    pub fn session_ttl(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.session_ttl_minutes)
    }
}
