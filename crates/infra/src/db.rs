//! SQLite connection pool and schema bootstrap.

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

use crudapps_core::{Entity, RecordId};

use crate::StoreError;

/// Open a pool for `database_url`, creating the database file if needed.
///
/// In-memory databases are pinned to a single, never-recycled connection:
/// every new connection to `:memory:` would otherwise see an empty database.
pub async fn connect(database_url: &str) -> Result<SqlitePool, StoreError> {
    let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

    let in_memory = database_url.contains(":memory:") || database_url.contains("mode=memory");
    let pool_options = if in_memory {
        SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        SqlitePoolOptions::new().max_connections(8)
    };

    let pool = pool_options.connect_with(options).await?;
    tracing::info!(database_url, in_memory, "connected to sqlite");
    Ok(pool)
}

/// Run `CREATE TABLE IF NOT EXISTS` statements; existing tables are left as
/// they are.
pub async fn ensure_schema(pool: &SqlitePool, statements: &[&str]) -> Result<(), StoreError> {
    for statement in statements {
        sqlx::query(statement).execute(pool).await?;
    }
    Ok(())
}

/// Delete one row of `E` by primary key.
pub async fn delete_by_id<E: Entity>(pool: &SqlitePool, id: RecordId) -> Result<(), StoreError> {
    let sql = format!(r#"DELETE FROM "{}" WHERE id = ?1"#, E::TABLE);
    let result = sqlx::query(&sql).bind(id.get()).execute(pool).await?;
    if result.rows_affected() == 0 {
        return Err(StoreError::NotFound);
    }
    Ok(())
}

/// Count rows of `E`.
pub async fn count<E: Entity>(pool: &SqlitePool) -> Result<i64, StoreError> {
    let sql = format!(r#"SELECT COUNT(*) FROM "{}""#, E::TABLE);
    let (n,): (i64,) = sqlx::query_as(&sql).fetch_one(pool).await?;
    Ok(n)
}

#[cfg(test)]
pub(crate) async fn memory_pool() -> SqlitePool {
    connect("sqlite::memory:").await.unwrap()
}
