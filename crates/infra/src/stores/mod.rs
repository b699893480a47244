//! Persistence for each app's records.
//!
//! Every store is a cheap, cloneable handle (`SqlitePool` or a shared file
//! lock) so route handlers can hold it behind an `Arc` without extra locking.

pub mod cafe_file;
pub mod cafes;
pub mod movies;
pub mod posts;
pub mod users;

pub use cafe_file::CafeFileStore;
pub use cafes::CafeStore;
pub use movies::MovieStore;
pub use posts::PostStore;
pub use users::UserStore;
