//! Authors repository for database operations

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::author::{Author, AuthorQuery, CreateAuthor, UpdateAuthor},
};

#[derive(Clone)]
pub struct AuthorsRepository {
    pool: Pool<Postgres>,
}

impl AuthorsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Search authors with pagination
    pub async fn search(&self, query: &AuthorQuery) -> AppResult<(Vec<Author>, i64)> {
        let page = query.page.unwrap_or(1).max(1);
        let per_page = query.limit.unwrap_or(10).clamp(1, 100);
        let offset = (page - 1) * per_page;

        let pattern = query
            .name_filter()
            .map(|name| format!("%{}%", name.to_lowercase()));

        let (total, authors) = if let Some(ref pattern) = pattern {
            let total: i64 =
                sqlx::query_scalar("SELECT COUNT(*) FROM authors WHERE LOWER(name) LIKE $1")
                    .bind(pattern)
                    .fetch_one(&self.pool)
                    .await?;

            let authors = sqlx::query_as::<_, Author>(
                r#"
                SELECT id, name, bio, created_at, updated_at
                FROM authors
                WHERE LOWER(name) LIKE $1
                ORDER BY id
                LIMIT $2 OFFSET $3
                "#,
            )
            .bind(pattern)
            .bind(per_page)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

            (total, authors)
        } else {
            let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM authors")
                .fetch_one(&self.pool)
                .await?;

            let authors = sqlx::query_as::<_, Author>(
                r#"
                SELECT id, name, bio, created_at, updated_at
                FROM authors
                ORDER BY id
                LIMIT $1 OFFSET $2
                "#,
            )
            .bind(per_page)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

            (total, authors)
        };

        Ok((authors, total))
    }

    /// Get author by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Author> {
        sqlx::query_as::<_, Author>(
            "SELECT id, name, bio, created_at, updated_at FROM authors WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Author with id {} not found", id)))
    }

    /// Check if an author row exists
    pub async fn exists(&self, id: i32) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM authors WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    /// Create a new author
    pub async fn create(&self, author: &CreateAuthor) -> AppResult<Author> {
        let created = sqlx::query_as::<_, Author>(
            r#"
            INSERT INTO authors (name, bio, created_at, updated_at)
            VALUES ($1, $2, NOW(), NOW())
            RETURNING id, name, bio, created_at, updated_at
            "#,
        )
        .bind(&author.name)
        .bind(&author.bio)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    /// Update an existing author; absent fields keep their stored values
    pub async fn update(&self, id: i32, author: &UpdateAuthor) -> AppResult<Author> {
        let updated = sqlx::query_as::<_, Author>(
            r#"
            UPDATE authors
            SET name = COALESCE($2, name),
                bio = COALESCE($3, bio),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, bio, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&author.name)
        .bind(&author.bio)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Author with id {} not found", id)))?;

        Ok(updated)
    }

    /// Delete an author
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM authors WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Author with id {} not found", id)));
        }

        Ok(())
    }

    /// Number of books referencing an author
    pub async fn book_count(&self, id: i32) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books WHERE author_id = $1")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
