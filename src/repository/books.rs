//! Books repository for database operations

use sqlx::{postgres::PgRow, Pool, Postgres, Row};

use crate::{
    error::{AppError, AppResult},
    models::{
        author::Author,
        book::{Book, BookQuery, CreateBook, UpdateBook},
        publisher::Publisher,
    },
};

/// Book columns plus the joined author and publisher summaries
const BOOK_SELECT: &str = r#"
    SELECT b.id, b.title, b.description, b.author_id, b.publisher_id,
           b.created_at, b.updated_at,
           a.name AS author_name, a.bio AS author_bio,
           a.created_at AS author_created_at, a.updated_at AS author_updated_at,
           p.name AS publisher_name, p.address AS publisher_address,
           p.created_at AS publisher_created_at, p.updated_at AS publisher_updated_at
    FROM books b
    JOIN authors a ON a.id = b.author_id
    JOIN publishers p ON p.id = b.publisher_id
"#;

/// Map a joined row into a book with embedded relations
fn book_from_row(row: &PgRow) -> Book {
    let author_id: i32 = row.get("author_id");
    let publisher_id: i32 = row.get("publisher_id");

    Book {
        id: row.get("id"),
        title: row.get("title"),
        description: row.get("description"),
        author_id,
        publisher_id,
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
        author: Some(Author {
            id: author_id,
            name: row.get("author_name"),
            bio: row.get("author_bio"),
            created_at: row.get("author_created_at"),
            updated_at: row.get("author_updated_at"),
        }),
        publisher: Some(Publisher {
            id: publisher_id,
            name: row.get("publisher_name"),
            address: row.get("publisher_address"),
            created_at: row.get("publisher_created_at"),
            updated_at: row.get("publisher_updated_at"),
        }),
    }
}

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Search books with filters, sorting and pagination
    pub async fn search(&self, query: &BookQuery) -> AppResult<(Vec<Book>, i64)> {
        let page = query.page.unwrap_or(1).max(1);
        let per_page = query.limit.unwrap_or(10).clamp(1, 100);
        let offset = (page - 1) * per_page;

        let title_pattern = query
            .title_filter()
            .map(|title| format!("%{}%", title.to_lowercase()));

        let mut conditions = Vec::new();
        let mut param_idx = 0;

        if title_pattern.is_some() {
            param_idx += 1;
            conditions.push(format!("LOWER(b.title) LIKE ${}", param_idx));
        }
        if query.author_id.is_some() {
            param_idx += 1;
            conditions.push(format!("b.author_id = ${}", param_idx));
        }
        if query.publisher_id.is_some() {
            param_idx += 1;
            conditions.push(format!("b.publisher_id = ${}", param_idx));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let count_query = format!("SELECT COUNT(*) FROM books b {}", where_clause);
        let mut count_builder = sqlx::query_scalar::<_, i64>(&count_query);
        if let Some(ref pattern) = title_pattern {
            count_builder = count_builder.bind(pattern);
        }
        if let Some(author_id) = query.author_id {
            count_builder = count_builder.bind(author_id);
        }
        if let Some(publisher_id) = query.publisher_id {
            count_builder = count_builder.bind(publisher_id);
        }
        let total = count_builder.fetch_one(&self.pool).await?;

        // sort column and direction come from a fixed whitelist, never from raw input
        let select_query = format!(
            "{} {} ORDER BY b.{} {} LIMIT {} OFFSET {}",
            BOOK_SELECT,
            where_clause,
            query.sort_column(),
            query.sort_direction(),
            per_page,
            offset
        );

        let mut select_builder = sqlx::query(&select_query);
        if let Some(ref pattern) = title_pattern {
            select_builder = select_builder.bind(pattern);
        }
        if let Some(author_id) = query.author_id {
            select_builder = select_builder.bind(author_id);
        }
        if let Some(publisher_id) = query.publisher_id {
            select_builder = select_builder.bind(publisher_id);
        }

        let rows = select_builder.fetch_all(&self.pool).await?;
        let books = rows.iter().map(book_from_row).collect();

        Ok((books, total))
    }

    /// Get book by ID with author and publisher expanded
    pub async fn get_by_id(&self, id: i32) -> AppResult<Book> {
        let query = format!("{} WHERE b.id = $1", BOOK_SELECT);

        let row = sqlx::query(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))?;

        Ok(book_from_row(&row))
    }

    /// Create a new book; foreign keys are validated by the service beforehand
    pub async fn create(&self, book: &CreateBook) -> AppResult<Book> {
        let id = sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO books (title, description, author_id, publisher_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, NOW(), NOW())
            RETURNING id
            "#,
        )
        .bind(&book.title)
        .bind(&book.description)
        .bind(book.author_id)
        .bind(book.publisher_id)
        .fetch_one(&self.pool)
        .await?;

        self.get_by_id(id).await
    }

    /// Update an existing book; absent fields keep their stored values
    pub async fn update(&self, id: i32, book: &UpdateBook) -> AppResult<Book> {
        let result = sqlx::query(
            r#"
            UPDATE books
            SET title = COALESCE($2, title),
                description = COALESCE($3, description),
                author_id = COALESCE($4, author_id),
                publisher_id = COALESCE($5, publisher_id),
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(&book.title)
        .bind(&book.description)
        .bind(book.author_id)
        .bind(book.publisher_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Book with id {} not found", id)));
        }

        self.get_by_id(id).await
    }

    /// Delete a book
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Book with id {} not found", id)));
        }

        Ok(())
    }
}
