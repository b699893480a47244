//! User accounts for the login demo.
//!
//! Registration, credential checks and the anonymous/authenticated state a
//! request can be in.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crudapps_core::form::not_blank;
use crudapps_core::{DomainError, Entity, RecordId};

use crate::password::{PasswordHash, Passwords};
use crate::AuthError;

// ─────────────────────────────────────────────────────────────────────────────
// User
// ─────────────────────────────────────────────────────────────────────────────

/// A registered user.
///
/// # Invariants
/// - `email` is unique (enforced by the store) and stored trimmed + lowercased.
/// - The clear-text password is never kept; only `password_hash`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: RecordId,
    pub email: String,
    pub password_hash: PasswordHash,
    pub name: String,
}

impl Entity for User {
    const TABLE: &'static str = "user";

    fn id(&self) -> RecordId {
        self.id
    }
}

/// A user ready to insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub email: String,
    pub password_hash: PasswordHash,
    pub name: String,
}

/// Canonical form used for storage and lookups.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

// ─────────────────────────────────────────────────────────────────────────────
// Forms
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate)]
#[serde(default)]
pub struct RegisterForm {
    #[validate(custom(function = "not_blank"))]
    pub email: String,
    #[serde(skip_serializing)]
    #[validate(custom(function = "not_blank"))]
    pub password: String,
    #[validate(custom(function = "not_blank"))]
    pub name: String,
}

impl RegisterForm {
    /// Validate and hash the password. The returned user has no id yet.
    pub fn into_new_user(self, passwords: &Passwords) -> Result<NewUser, AuthError> {
        self.validate().map_err(DomainError::from)?;
        Ok(NewUser {
            email: normalize_email(&self.email),
            password_hash: passwords.hash(&self.password)?,
            name: self.name.trim().to_string(),
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate)]
#[serde(default)]
pub struct LoginForm {
    #[validate(custom(function = "not_blank"))]
    pub email: String,
    #[serde(skip_serializing)]
    #[validate(custom(function = "not_blank"))]
    pub password: String,
}

impl LoginForm {
    pub fn check(&self) -> Result<(), DomainError> {
        self.validate()?;
        Ok(())
    }

    pub fn email(&self) -> String {
        normalize_email(&self.email)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Authentication state
// ─────────────────────────────────────────────────────────────────────────────

/// Whether the current request carries a valid session.
///
/// `Anonymous → Authenticated` on valid credentials, back to `Anonymous` on
/// logout (or when the session's user no longer exists).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthState {
    Anonymous,
    Authenticated(User),
}

impl AuthState {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthState::Authenticated(_))
    }

    pub fn user(&self) -> Option<&User> {
        match self {
            AuthState::Authenticated(user) => Some(user),
            AuthState::Anonymous => None,
        }
    }
}

/// Why a login attempt was refused. The display text is shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum LoginFailure {
    #[error("That email does not exist, please try again.")]
    UnknownEmail,

    #[error("Password incorrect, please try again.")]
    WrongPassword,
}

/// Check a login attempt against the user found for its email (if any).
pub fn check_credentials(
    passwords: &Passwords,
    found: Option<User>,
    password: &str,
) -> Result<AuthState, LoginFailure> {
    let user = found.ok_or(LoginFailure::UnknownEmail)?;
    if !passwords.verify(password, &user.password_hash) {
        return Err(LoginFailure::WrongPassword);
    }
    Ok(AuthState::Authenticated(user))
}
