//! Shapes returned by the external movie-metadata API (TMDB v3).

use serde::{Deserialize, Serialize};

use crudapps_core::DomainError;

use crate::NewMovie;

/// One candidate from a title search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieSearchHit {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub release_date: Option<String>,
}

/// Full record for one movie id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieDetails {
    pub original_title: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
}

impl MovieDetails {
    /// Build the movie to store. `img_base` is prepended to the poster path.
    pub fn into_new_movie(self, img_base: &str) -> Result<NewMovie, DomainError> {
        let year = self
            .release_date
            .as_deref()
            .and_then(|d| d.get(0..4))
            .and_then(|y| y.parse::<i32>().ok())
            .ok_or_else(|| DomainError::validation("release_date has no year"))?;

        let img_url = match self.poster_path.as_deref() {
            Some(path) if !path.is_empty() => format!("{img_base}{path}"),
            _ => String::new(),
        };

        Ok(NewMovie {
            title: self.original_title,
            year,
            description: self.overview.unwrap_or_default(),
            img_url,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const IMG: &str = "https://image.tmdb.org/t/p/w500";

    #[test]
    fn details_map_to_new_movie() {
        let details: MovieDetails = serde_json::from_value(serde_json::json!({
            "original_title": "Phone Booth",
            "poster_path": "/tjrX2oWRCM3Tvarz38zlZM7Uc10.jpg",
            "release_date": "2002-11-17",
            "overview": "Publicist Stuart Shepard finds himself trapped in a phone booth.",
            "runtime": 81
        }))
        .unwrap();

        let movie = details.into_new_movie(IMG).unwrap();
        assert_eq!(movie.title, "Phone Booth");
        assert_eq!(movie.year, 2002);
        assert_eq!(movie.img_url, format!("{IMG}/tjrX2oWRCM3Tvarz38zlZM7Uc10.jpg"));
        assert!(movie.description.starts_with("Publicist"));
    }

    #[test]
    fn missing_release_date_is_rejected() {
        let details = MovieDetails {
            original_title: "Untitled".to_string(),
            poster_path: None,
            release_date: Some(String::new()),
            overview: None,
        };
        assert!(matches!(details.into_new_movie(IMG), Err(DomainError::Validation(_))));
    }

    #[test]
    fn search_hits_tolerate_missing_dates() {
        let hit: MovieSearchHit =
            serde_json::from_value(serde_json::json!({"id": 1575, "title": "Phone Booth"})).unwrap();
        assert_eq!(hit.release_date, None);
    }
}
