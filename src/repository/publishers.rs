//! Publishers repository for database operations

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::publisher::{CreatePublisher, Publisher, PublisherQuery, UpdatePublisher},
};

#[derive(Clone)]
pub struct PublishersRepository {
    pool: Pool<Postgres>,
}

impl PublishersRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Search publishers with pagination
    pub async fn search(&self, query: &PublisherQuery) -> AppResult<(Vec<Publisher>, i64)> {
        let page = query.page.unwrap_or(1).max(1);
        let per_page = query.limit.unwrap_or(10).clamp(1, 100);
        let offset = (page - 1) * per_page;

        let pattern = query
            .name_filter()
            .map(|name| format!("%{}%", name.to_lowercase()));

        let (total, publishers) = if let Some(ref pattern) = pattern {
            let total: i64 =
                sqlx::query_scalar("SELECT COUNT(*) FROM publishers WHERE LOWER(name) LIKE $1")
                    .bind(pattern)
                    .fetch_one(&self.pool)
                    .await?;

            let publishers = sqlx::query_as::<_, Publisher>(
                r#"
                SELECT id, name, address, created_at, updated_at
                FROM publishers
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

            (total, publishers)
        } else {
            let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM publishers")
                .fetch_one(&self.pool)
                .await?;

            let publishers = sqlx::query_as::<_, Publisher>(
                r#"
                SELECT id, name, address, created_at, updated_at
                FROM publishers
                ORDER BY id
                LIMIT $1 OFFSET $2
                "#,
            )
            .bind(per_page)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

            (total, publishers)
        };

        Ok((publishers, total))
    }

    /// Get publisher by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Publisher> {
        sqlx::query_as::<_, Publisher>(
            "SELECT id, name, address, created_at, updated_at FROM publishers WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Publisher with id {} not found", id)))
    }

    /// Check if a publisher row exists
    pub async fn exists(&self, id: i32) -> AppResult<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM publishers WHERE id = $1)")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }

    /// Create a new publisher
    pub async fn create(&self, publisher: &CreatePublisher) -> AppResult<Publisher> {
        let created = sqlx::query_as::<_, Publisher>(
            r#"
            INSERT INTO publishers (name, address, created_at, updated_at)
            VALUES ($1, $2, NOW(), NOW())
            RETURNING id, name, address, created_at, updated_at
            "#,
        )
        .bind(&publisher.name)
        .bind(&publisher.address)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    /// Update an existing publisher; absent fields keep their stored values
    pub async fn update(&self, id: i32, publisher: &UpdatePublisher) -> AppResult<Publisher> {
        let updated = sqlx::query_as::<_, Publisher>(
            r#"
            UPDATE publishers
            SET name = COALESCE($2, name),
                address = COALESCE($3, address),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, address, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&publisher.name)
        .bind(&publisher.address)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Publisher with id {} not found", id)))?;

        Ok(updated)
    }

    /// Delete a publisher
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM publishers WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "Publisher with id {} not found",
                id
            )));
        }

        Ok(())
    }

    /// Number of books referencing a publisher
    pub async fn book_count(&self, id: i32) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books WHERE publisher_id = $1")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
