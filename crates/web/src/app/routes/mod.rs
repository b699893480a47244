//! One router per app; `/health` is shared.

pub mod auth_demo;
pub mod blog;
pub mod cafe_api;
pub mod cafe_directory;
pub mod movies;
pub mod system;
