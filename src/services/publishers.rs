//! Publisher catalog service

use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::publisher::{CreatePublisher, Publisher, PublisherQuery, UpdatePublisher},
    repository::Repository,
};

#[derive(Clone)]
pub struct PublishersService {
    repository: Repository,
}

impl PublishersService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Search publishers with filters and pagination
    pub async fn search(&self, query: &PublisherQuery) -> AppResult<(Vec<Publisher>, i64)> {
        self.repository.publishers.search(query).await
    }

    /// Get publisher by ID
    pub async fn get(&self, id: i32) -> AppResult<Publisher> {
        self.repository.publishers.get_by_id(id).await
    }

    /// Create a new publisher
    pub async fn create(&self, publisher: CreatePublisher) -> AppResult<Publisher> {
        publisher.validate()?;
        self.repository.publishers.create(&publisher).await
    }

    /// Update an existing publisher
    pub async fn update(&self, id: i32, publisher: UpdatePublisher) -> AppResult<Publisher> {
        self.repository.publishers.get_by_id(id).await?;
        publisher.validate()?;
        self.repository.publishers.update(id, &publisher).await
    }

    /// Delete a publisher; rejected while books still reference it
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        self.repository.publishers.get_by_id(id).await?;

        let book_count = self.repository.publishers.book_count(id).await?;
        if book_count > 0 {
            return Err(AppError::Conflict(format!(
                "Publisher has {} book(s) and cannot be deleted",
                book_count
            )));
        }

        self.repository.publishers.delete(id).await
    }
}
