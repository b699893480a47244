//! `blog_post` table.

use sqlx::sqlite::{SqlitePool, SqliteRow};
use sqlx::Row;

use crudapps_blog::{BlogPost, NewPost, PostContent};
use crudapps_core::RecordId;

use crate::db;
use crate::StoreError;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS "blog_post" (
    id       INTEGER PRIMARY KEY AUTOINCREMENT,
    title    TEXT NOT NULL UNIQUE,
    subtitle TEXT NOT NULL,
    date     TEXT NOT NULL,
    body     TEXT NOT NULL,
    author   TEXT NOT NULL,
    img_url  TEXT NOT NULL
)
"#;

const COLUMNS: &str = "id, title, subtitle, date, body, author, img_url";
const DUPLICATE_TITLE: &str = "A post with this title already exists.";

#[derive(Debug, Clone)]
pub struct PostStore {
    pool: SqlitePool,
}

impl PostStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        db::ensure_schema(&self.pool, &[SCHEMA]).await
    }

    pub async fn insert(&self, post: NewPost) -> Result<BlogPost, StoreError> {
        let NewPost { content, date } = post;
        let result = sqlx::query(
            r#"
            INSERT INTO "blog_post" (title, subtitle, date, body, author, img_url)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&content.title)
        .bind(&content.subtitle)
        .bind(&date)
        .bind(&content.body)
        .bind(&content.author)
        .bind(&content.img_url)
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::from_write(e, DUPLICATE_TITLE))?;

        Ok(BlogPost {
            id: RecordId::new(result.last_insert_rowid()),
            title: content.title,
            subtitle: content.subtitle,
            date,
            body: content.body,
            author: content.author,
            img_url: content.img_url,
        })
    }

    pub async fn all(&self) -> Result<Vec<BlogPost>, StoreError> {
        let sql = format!(r#"SELECT {COLUMNS} FROM "blog_post" ORDER BY id"#);
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;
        rows.iter().map(post_from_row).collect()
    }

    pub async fn get(&self, id: RecordId) -> Result<BlogPost, StoreError> {
        let sql = format!(r#"SELECT {COLUMNS} FROM "blog_post" WHERE id = ?1"#);
        let row = sqlx::query(&sql)
            .bind(id.get())
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound)?;
        post_from_row(&row)
    }

    /// Replace the editable fields; `date` is left untouched.
    pub async fn update_content(&self, id: RecordId, content: &PostContent) -> Result<(), StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE "blog_post"
               SET title = ?1, subtitle = ?2, body = ?3, author = ?4, img_url = ?5
             WHERE id = ?6
            "#,
        )
        .bind(&content.title)
        .bind(&content.subtitle)
        .bind(&content.body)
        .bind(&content.author)
        .bind(&content.img_url)
        .bind(id.get())
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::from_write(e, DUPLICATE_TITLE))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    pub async fn delete(&self, id: RecordId) -> Result<(), StoreError> {
        db::delete_by_id::<BlogPost>(&self.pool, id).await
    }
}

fn post_from_row(row: &SqliteRow) -> Result<BlogPost, StoreError> {
    Ok(BlogPost {
        id: RecordId::new(row.try_get("id")?),
        title: row.try_get("title")?,
        subtitle: row.try_get("subtitle")?,
        date: row.try_get("date")?,
        body: row.try_get("body")?,
        author: row.try_get("author")?,
        img_url: row.try_get("img_url")?,
    })
}
