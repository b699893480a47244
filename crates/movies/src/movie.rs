use serde::{Deserialize, Serialize};
use validator::Validate;

use crudapps_core::form::{not_blank, parse_float, required_float};
use crudapps_core::{DomainError, Entity, RecordId};

/// A movie on the list.
///
/// `rating` and `review` stay empty until the user rates the movie.
/// `ranking` is derived (see [`crate::assign_rankings`]) and never trusted
/// from storage.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Movie {
    pub id: RecordId,
    pub title: String,
    pub year: i32,
    pub description: String,
    pub rating: Option<f64>,
    pub ranking: Option<i64>,
    pub review: Option<String>,
    pub img_url: String,
}

impl Entity for Movie {
    const TABLE: &'static str = "movie";

    fn id(&self) -> RecordId {
        self.id
    }
}

/// A movie built from external metadata, before it is stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMovie {
    pub title: String,
    pub year: i32,
    pub description: String,
    pub img_url: String,
}

/// Rating + review to apply to an existing movie.
#[derive(Debug, Clone, PartialEq)]
pub struct MovieReview {
    pub rating: f64,
    pub review: String,
}

/// Title search form (`/add`).
#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate)]
#[serde(default)]
pub struct FindMovieForm {
    #[validate(custom(function = "not_blank"))]
    pub movie_title: String,
}

impl FindMovieForm {
    pub fn into_query(self) -> Result<String, DomainError> {
        self.validate()?;
        Ok(self.movie_title.trim().to_string())
    }
}

/// Rating form (`/edit`).
#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate)]
#[serde(default)]
pub struct RateMovieForm {
    #[validate(custom(function = "required_float"))]
    pub rating: String,
    #[validate(custom(function = "not_blank"))]
    pub review: String,
}

impl RateMovieForm {
    pub fn into_review(self) -> Result<MovieReview, DomainError> {
        self.validate()?;
        let rating = parse_float(&self.rating).ok_or_else(|| DomainError::validation("rating"))?;
        Ok(MovieReview {
            rating,
            review: self.review.trim().to_string(),
        })
    }
}
