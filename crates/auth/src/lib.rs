//! `crudapps-auth`: password hashing, session tokens and account rules.
//!
//! This crate is intentionally decoupled from HTTP and storage.

pub mod password;
pub mod session;
pub mod user;

pub use password::{PasswordHash, Passwords};
pub use session::{Hs256SessionCodec, SessionClaims, SessionError, SessionValidator, validate_claims};
pub use user::{
    check_credentials, normalize_email, AuthState, LoginFailure, LoginForm, NewUser, RegisterForm, User,
};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("password hashing failed: {0}")]
    Hashing(String),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Domain(#[from] crudapps_core::DomainError),
}
