//! Book catalog service

use validator::Validate;

use crate::{
    error::{AppError, AppResult, FieldErrors},
    models::book::{Book, BookQuery, CreateBook, UpdateBook},
    repository::Repository,
};

#[derive(Clone)]
pub struct BooksService {
    repository: Repository,
}

impl BooksService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Search books with filters, sorting and pagination
    pub async fn search(&self, query: &BookQuery) -> AppResult<(Vec<Book>, i64)> {
        self.repository.books.search(query).await
    }

    /// Get book by ID with author and publisher expanded
    pub async fn get(&self, id: i32) -> AppResult<Book> {
        self.repository.books.get_by_id(id).await
    }

    /// Create a new book; both foreign keys must reference existing rows
    pub async fn create(&self, book: CreateBook) -> AppResult<Book> {
        book.validate()?;
        self.check_references(book.author_id, book.publisher_id)
            .await?;
        self.repository.books.create(&book).await
    }

    /// Update an existing book; supplied foreign keys must reference existing rows
    pub async fn update(&self, id: i32, book: UpdateBook) -> AppResult<Book> {
        self.repository.books.get_by_id(id).await?;
        book.validate()?;
        self.check_references(book.author_id, book.publisher_id)
            .await?;
        self.repository.books.update(id, &book).await
    }

    /// Delete a book
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        self.repository.books.delete(id).await
    }

    /// Reject dangling author/publisher references before any mutation
    async fn check_references(
        &self,
        author_id: Option<i32>,
        publisher_id: Option<i32>,
    ) -> AppResult<()> {
        let mut errors = FieldErrors::new();

        if let Some(author_id) = author_id {
            if !self.repository.authors.exists(author_id).await? {
                errors.insert(
                    "author_id".to_string(),
                    vec!["The selected author_id is invalid.".to_string()],
                );
            }
        }

        if let Some(publisher_id) = publisher_id {
            if !self.repository.publishers.exists(publisher_id).await? {
                errors.insert(
                    "publisher_id".to_string(),
                    vec!["The selected publisher_id is invalid.".to_string()],
                );
            }
        }

        if !errors.is_empty() {
            return Err(AppError::Validation(errors));
        }

        Ok(())
    }
}
