//! Books service

use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, BookDetails, BookQuery, CreateBook, UpdateBook},
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

    /// Search books with pagination
    pub async fn search(&self, query: &BookQuery, viewer_id: i32) -> AppResult<(Vec<BookDetails>, i64)> {
        self.repository.books.search(query, viewer_id).await
    }

    /// Books owned by the user
    pub async fn owned(&self, owner_id: i32) -> AppResult<Vec<BookDetails>> {
        self.repository.books.list_owned(owner_id).await
    }

    pub async fn details(&self, id: i32, viewer_id: i32) -> AppResult<BookDetails> {
        self.repository.books.get_details(id, viewer_id).await
    }

    /// Register a book owned by the caller
    pub async fn create(&self, owner_id: i32, data: &CreateBook) -> AppResult<BookDetails> {
        data.validate()?;
        // Verify author exists
        self.repository.authors.get_by_id(data.author_id).await?;

        let book = self.repository.books.create(owner_id, data).await?;
        tracing::info!(book_id = book.id, owner_id, "Book created");

        self.repository.books.get_details(book.id, owner_id).await
    }

    /// Update a book (owner only)
    pub async fn update(&self, id: i32, actor_id: i32, data: &UpdateBook) -> AppResult<BookDetails> {
        data.validate()?;
        self.get_owned(id, actor_id).await?;

        if let Some(author_id) = data.author_id {
            self.repository.authors.get_by_id(author_id).await?;
        }

        self.repository.books.update(id, data).await?;
        self.repository.books.get_details(id, actor_id).await
    }

    /// Delete a book (owner only)
    pub async fn delete(&self, id: i32, actor_id: i32) -> AppResult<()> {
        self.get_owned(id, actor_id).await?;
        self.repository.books.delete(id).await?;
        tracing::info!(book_id = id, owner_id = actor_id, "Book deleted");
        Ok(())
    }

    async fn get_owned(&self, id: i32, actor_id: i32) -> AppResult<Book> {
        let book = self.repository.books.get_by_id(id).await?;
        if !book.is_owned_by(actor_id) {
            return Err(AppError::Authorization(
                "Only the owner can modify this book".to_string(),
            ));
        }
        Ok(book)
    }
}
