//! `crudapps-core`: shared building blocks for the CRUD apps.
//!
//! This crate contains **pure domain** primitives (no IO, no HTTP, no storage):
//! record identifiers, the domain error model and form validation helpers.

pub mod entity;
pub mod error;
pub mod form;
pub mod id;

pub use entity::Entity;
pub use error::DomainError;
pub use form::FieldErrors;
pub use id::RecordId;
