use crudapps_auth::User;

/// The logged-in user for a request.
///
/// Inserted by the login middleware; only present on protected routes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    user: User,
}

impl CurrentUser {
    pub fn new(user: User) -> Self {
        Self { user }
    }

    pub fn user(&self) -> &User {
        &self.user
    }
}
