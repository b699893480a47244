//! Infrastructure layer: SQLite stores, the cafe directory file and the
//! movie-metadata HTTP client.

pub mod db;
pub mod error;
pub mod external;
pub mod stores;

pub use error::StoreError;
