//! Author catalog service

use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::author::{Author, AuthorQuery, CreateAuthor, UpdateAuthor},
    repository::Repository,
};

#[derive(Clone)]
pub struct AuthorsService {
    repository: Repository,
}

impl AuthorsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Search authors with filters and pagination
    pub async fn search(&self, query: &AuthorQuery) -> AppResult<(Vec<Author>, i64)> {
        self.repository.authors.search(query).await
    }

    /// Get author by ID
    pub async fn get(&self, id: i32) -> AppResult<Author> {
        self.repository.authors.get_by_id(id).await
    }

    /// Create a new author
    pub async fn create(&self, author: CreateAuthor) -> AppResult<Author> {
        author.validate()?;
        self.repository.authors.create(&author).await
    }

    /// Update an existing author
    pub async fn update(&self, id: i32, author: UpdateAuthor) -> AppResult<Author> {
        self.repository.authors.get_by_id(id).await?;
        author.validate()?;
        self.repository.authors.update(id, &author).await
    }

    /// Delete an author; rejected while books still reference it
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        self.repository.authors.get_by_id(id).await?;

        let book_count = self.repository.authors.book_count(id).await?;
        if book_count > 0 {
            return Err(AppError::Conflict(format!(
                "Author has {} book(s) and cannot be deleted",
                book_count
            )));
        }

        self.repository.authors.delete(id).await
    }
}
