//! `movie` table for the top-movies list.

use sqlx::sqlite::{SqlitePool, SqliteRow};
use sqlx::Row;

use crudapps_core::RecordId;
use crudapps_movies::{Movie, MovieReview, NewMovie};

use crate::db;
use crate::StoreError;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS "movie" (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    title       TEXT    NOT NULL UNIQUE,
    year        INTEGER NOT NULL,
    description TEXT    NOT NULL,
    rating      REAL    NULL,
    ranking     INTEGER NULL,
    review      TEXT    NULL,
    img_url     TEXT    NOT NULL
)
"#;

const COLUMNS: &str = "id, title, year, description, rating, ranking, review, img_url";

#[derive(Debug, Clone)]
pub struct MovieStore {
    pool: SqlitePool,
}

impl MovieStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        db::ensure_schema(&self.pool, &[SCHEMA]).await
    }

    /// Insert an unrated movie; a duplicate title is a `Conflict`.
    pub async fn insert(&self, movie: NewMovie) -> Result<Movie, StoreError> {
        let result = sqlx::query(
            r#"INSERT INTO "movie" (title, year, description, img_url) VALUES (?1, ?2, ?3, ?4)"#,
        )
        .bind(&movie.title)
        .bind(movie.year)
        .bind(&movie.description)
        .bind(&movie.img_url)
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::from_write(e, "That movie is already on the list."))?;

        Ok(Movie {
            id: RecordId::new(result.last_insert_rowid()),
            title: movie.title,
            year: movie.year,
            description: movie.description,
            rating: None,
            ranking: None,
            review: None,
            img_url: movie.img_url,
        })
    }

    /// Every movie, best rated first and unrated last.
    ///
    /// `ranking` is returned as stored; callers derive it with
    /// `crudapps_movies::assign_rankings`.
    pub async fn all_by_rating(&self) -> Result<Vec<Movie>, StoreError> {
        let sql = format!(
            r#"SELECT {COLUMNS} FROM "movie" ORDER BY rating IS NULL, rating DESC, id"#
        );
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;
        rows.iter().map(movie_from_row).collect()
    }

    pub async fn get(&self, id: RecordId) -> Result<Movie, StoreError> {
        let sql = format!(r#"SELECT {COLUMNS} FROM "movie" WHERE id = ?1"#);
        let row = sqlx::query(&sql)
            .bind(id.get())
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound)?;
        movie_from_row(&row)
    }

    pub async fn find_by_title(&self, title: &str) -> Result<Option<Movie>, StoreError> {
        let sql = format!(r#"SELECT {COLUMNS} FROM "movie" WHERE title = ?1"#);
        let row = sqlx::query(&sql).bind(title).fetch_optional(&self.pool).await?;
        row.as_ref().map(movie_from_row).transpose()
    }

    pub async fn update_review(&self, id: RecordId, review: &MovieReview) -> Result<(), StoreError> {
        let result = sqlx::query(r#"UPDATE "movie" SET rating = ?1, review = ?2 WHERE id = ?3"#)
            .bind(review.rating)
            .bind(&review.review)
            .bind(id.get())
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    pub async fn delete(&self, id: RecordId) -> Result<(), StoreError> {
        db::delete_by_id::<Movie>(&self.pool, id).await
    }
}

fn movie_from_row(row: &SqliteRow) -> Result<Movie, StoreError> {
    Ok(Movie {
        id: RecordId::new(row.try_get("id")?),
        title: row.try_get("title")?,
        year: row.try_get("year")?,
        description: row.try_get("description")?,
        rating: row.try_get("rating")?,
        ranking: row.try_get("ranking")?,
        review: row.try_get("review")?,
        img_url: row.try_get("img_url")?,
    })
}
