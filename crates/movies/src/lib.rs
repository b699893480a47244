//! Movies domain module (personal top-movies list).
//!
//! Movies are created from external metadata, rated later, and ranked by
//! rating every time the list is read. Pure domain logic only.

pub mod metadata;
pub mod movie;
pub mod ranking;

pub use metadata::{MovieDetails, MovieSearchHit};
pub use movie::{FindMovieForm, Movie, MovieReview, NewMovie, RateMovieForm};
pub use ranking::assign_rankings;
