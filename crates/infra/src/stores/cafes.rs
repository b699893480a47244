//! `cafe` table behind the cafe JSON API.

use sqlx::sqlite::{SqlitePool, SqliteRow};
use sqlx::Row;

use crudapps_cafes::{Cafe, NewCafe};
use crudapps_core::RecordId;

use crate::db;
use crate::StoreError;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS "cafe" (
    id             INTEGER PRIMARY KEY AUTOINCREMENT,
    name           TEXT    NOT NULL UNIQUE,
    map_url        TEXT    NOT NULL,
    img_url        TEXT    NOT NULL,
    location       TEXT    NOT NULL,
    seats          TEXT    NOT NULL,
    has_toilet     INTEGER NOT NULL,
    has_wifi       INTEGER NOT NULL,
    has_sockets    INTEGER NOT NULL,
    can_take_calls INTEGER NOT NULL,
    coffee_price   TEXT    NULL
)
"#;

const COLUMNS: &str = "id, name, map_url, img_url, location, seats, has_toilet, has_wifi, \
                       has_sockets, can_take_calls, coffee_price";

#[derive(Debug, Clone)]
pub struct CafeStore {
    pool: SqlitePool,
}

impl CafeStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        db::ensure_schema(&self.pool, &[SCHEMA]).await
    }

    /// Insert a cafe; a duplicate name is a `Conflict`.
    pub async fn insert(&self, cafe: NewCafe) -> Result<Cafe, StoreError> {
        let result = sqlx::query(
            r#"
            INSERT INTO "cafe" (name, map_url, img_url, location, seats, has_toilet,
                                has_wifi, has_sockets, can_take_calls, coffee_price)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
        )
        .bind(&cafe.name)
        .bind(&cafe.map_url)
        .bind(&cafe.img_url)
        .bind(&cafe.location)
        .bind(&cafe.seats)
        .bind(cafe.has_toilet)
        .bind(cafe.has_wifi)
        .bind(cafe.has_sockets)
        .bind(cafe.can_take_calls)
        .bind(cafe.coffee_price.as_deref())
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::from_write(e, "A cafe with that name already exists."))?;

        Ok(cafe.with_id(RecordId::new(result.last_insert_rowid())))
    }

    pub async fn all(&self) -> Result<Vec<Cafe>, StoreError> {
        let sql = format!(r#"SELECT {COLUMNS} FROM "cafe" ORDER BY id"#);
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;
        rows.iter().map(cafe_from_row).collect()
    }

    /// Cafes whose location equals `location` exactly.
    pub async fn find_by_location(&self, location: &str) -> Result<Vec<Cafe>, StoreError> {
        let sql = format!(r#"SELECT {COLUMNS} FROM "cafe" WHERE location = ?1 ORDER BY id"#);
        let rows = sqlx::query(&sql).bind(location).fetch_all(&self.pool).await?;
        rows.iter().map(cafe_from_row).collect()
    }

    /// A uniformly random cafe, `None` on an empty table.
    pub async fn random(&self) -> Result<Option<Cafe>, StoreError> {
        let sql = format!(r#"SELECT {COLUMNS} FROM "cafe" ORDER BY RANDOM() LIMIT 1"#);
        let row = sqlx::query(&sql).fetch_optional(&self.pool).await?;
        row.as_ref().map(cafe_from_row).transpose()
    }

    pub async fn get(&self, id: RecordId) -> Result<Cafe, StoreError> {
        let sql = format!(r#"SELECT {COLUMNS} FROM "cafe" WHERE id = ?1"#);
        let row = sqlx::query(&sql)
            .bind(id.get())
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound)?;
        cafe_from_row(&row)
    }

    pub async fn update_price(&self, id: RecordId, price: &str) -> Result<(), StoreError> {
        let result = sqlx::query(r#"UPDATE "cafe" SET coffee_price = ?1 WHERE id = ?2"#)
            .bind(price)
            .bind(id.get())
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    pub async fn delete(&self, id: RecordId) -> Result<(), StoreError> {
        db::delete_by_id::<Cafe>(&self.pool, id).await
    }
}

fn cafe_from_row(row: &SqliteRow) -> Result<Cafe, StoreError> {
    Ok(Cafe {
        id: RecordId::new(row.try_get("id")?),
        name: row.try_get("name")?,
        map_url: row.try_get("map_url")?,
        img_url: row.try_get("img_url")?,
        location: row.try_get("location")?,
        seats: row.try_get("seats")?,
        has_toilet: row.try_get("has_toilet")?,
        has_wifi: row.try_get("has_wifi")?,
        has_sockets: row.try_get("has_sockets")?,
        can_take_calls: row.try_get("can_take_calls")?,
        coffee_price: row.try_get("coffee_price")?,
    })
}
