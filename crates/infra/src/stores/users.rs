//! `user` table for the login demo.

use sqlx::sqlite::{SqlitePool, SqliteRow};
use sqlx::Row;

use crudapps_auth::{NewUser, PasswordHash, User};
use crudapps_core::RecordId;

use crate::db;
use crate::StoreError;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS "user" (
    id       INTEGER PRIMARY KEY AUTOINCREMENT,
    email    TEXT NOT NULL UNIQUE,
    password TEXT NOT NULL,
    name     TEXT NOT NULL
)
"#;

#[derive(Debug, Clone)]
pub struct UserStore {
    pool: SqlitePool,
}

impl UserStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        db::ensure_schema(&self.pool, &[SCHEMA]).await
    }

    /// Insert a user; an email that is already registered is a `Conflict`.
    pub async fn insert(&self, user: NewUser) -> Result<User, StoreError> {
        let result = sqlx::query(r#"INSERT INTO "user" (email, password, name) VALUES (?1, ?2, ?3)"#)
            .bind(&user.email)
            .bind(user.password_hash.as_str())
            .bind(&user.name)
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::from_write(e, "email already registered"))?;

        Ok(User {
            id: RecordId::new(result.last_insert_rowid()),
            email: user.email,
            password_hash: user.password_hash,
            name: user.name,
        })
    }

    /// Look up by already-normalized email.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let row = sqlx::query(r#"SELECT id, email, password, name FROM "user" WHERE email = ?1"#)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(user_from_row).transpose()
    }

    pub async fn get(&self, id: RecordId) -> Result<Option<User>, StoreError> {
        let row = sqlx::query(r#"SELECT id, email, password, name FROM "user" WHERE id = ?1"#)
            .bind(id.get())
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(user_from_row).transpose()
    }

    pub async fn count(&self) -> Result<i64, StoreError> {
        db::count::<User>(&self.pool).await
    }
}

fn user_from_row(row: &SqliteRow) -> Result<User, StoreError> {
    Ok(User {
        id: RecordId::new(row.try_get("id")?),
        email: row.try_get("email")?,
        password_hash: PasswordHash::from_stored(row.try_get::<String, _>("password")?),
        name: row.try_get("name")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crudapps_auth::{Passwords, RegisterForm};

    fn new_user(email: &str) -> NewUser {
        RegisterForm {
            email: email.to_string(),
            password: "s3cret".to_string(),
            name: "Angela".to_string(),
        }
        .into_new_user(&Passwords::new(1_000))
        .unwrap()
    }

    async fn store() -> UserStore {
        let store = UserStore::new(db::memory_pool().await);
        store.ensure_schema().await.unwrap();
        store
    }

    #[tokio::test]
    async fn second_registration_with_same_email_is_rejected() {
        let store = store().await;
        let first = store.insert(new_user("angela@example.com")).await.unwrap();
        let err = store.insert(new_user("ANGELA@example.com ")).await.unwrap_err();

        assert!(matches!(err, StoreError::Conflict(_)));
        assert_eq!(store.count().await.unwrap(), 1);
        assert_eq!(store.find_by_email("angela@example.com").await.unwrap(), Some(first.clone()));
        assert_eq!(store.get(first.id).await.unwrap(), Some(first));
    }

    #[tokio::test]
    async fn unknown_user_is_none() {
        let store = store().await;
        assert!(store.find_by_email("nobody@example.com").await.unwrap().is_none());
        assert!(store.get(RecordId::new(1)).await.unwrap().is_none());
    }
}
