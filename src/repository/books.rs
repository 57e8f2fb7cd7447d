//! Books repository for database operations

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, BookDetails, BookDetailsRow, BookQuery, CreateBook, UpdateBook},
};

/// Columns for [`BookDetailsRow`], expects `books b`, `authors a` and `users o`
const DETAILS_COLUMNS: &str = r#"
    b.id, b.title, b.created_at,
    a.id AS author_id, a.first_name AS author_first_name, a.last_name AS author_last_name,
    o.id AS owner_id, o.username AS owner_username,
    EXISTS (
        SELECT 1 FROM borrowing_requests br
        WHERE br.book_id = b.id AND br.status = 1
    ) AS is_borrowed
"#;

/// Filters shared by the search and its count, parameters $1..$3
const SEARCH_FILTER: &str = r#"
    ($1::text IS NULL OR b.title ILIKE '%' || $1 || '%')
    AND ($2::int IS NULL OR b.author_id = $2)
    AND ($3::bool IS NULL OR $3 = NOT EXISTS (
        SELECT 1 FROM borrowing_requests br
        WHERE br.book_id = b.id AND br.status = 1
    ))
"#;

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get book by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Book> {
        sqlx::query_as::<_, Book>("SELECT * FROM books WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book {} not found", id)))
    }

    /// Get book with author, owner and availability
    pub async fn get_details(&self, id: i32, viewer_id: i32) -> AppResult<BookDetails> {
        let query = format!(
            r#"
            SELECT {DETAILS_COLUMNS}
            FROM books b
            JOIN authors a ON a.id = b.author_id
            JOIN users o ON o.id = b.owner_id
            WHERE b.id = $1
            "#
        );

        sqlx::query_as::<_, BookDetailsRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(|row| row.into_details(viewer_id))
            .ok_or_else(|| AppError::NotFound(format!("Book {} not found", id)))
    }

    /// Search books with pagination
    pub async fn search(&self, query: &BookQuery, viewer_id: i32) -> AppResult<(Vec<BookDetails>, i64)> {
        let title = query
            .title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty());

        let count_query = format!("SELECT COUNT(*) FROM books b WHERE {SEARCH_FILTER}");
        let total: i64 = sqlx::query_scalar(&count_query)
            .bind(title)
            .bind(query.author_id)
            .bind(query.available)
            .fetch_one(&self.pool)
            .await?;

        let select_query = format!(
            r#"
            SELECT {DETAILS_COLUMNS}
            FROM books b
            JOIN authors a ON a.id = b.author_id
            JOIN users o ON o.id = b.owner_id
            WHERE {SEARCH_FILTER}
            ORDER BY b.title, b.id
            LIMIT $4 OFFSET $5
            "#
        );

        let rows = sqlx::query_as::<_, BookDetailsRow>(&select_query)
            .bind(title)
            .bind(query.author_id)
            .bind(query.available)
            .bind(query.per_page())
            .bind(query.offset())
            .fetch_all(&self.pool)
            .await?;

        let books = rows
            .into_iter()
            .map(|row| row.into_details(viewer_id))
            .collect();

        Ok((books, total))
    }

    /// List books owned by a user
    pub async fn list_owned(&self, owner_id: i32) -> AppResult<Vec<BookDetails>> {
        let query = format!(
            r#"
            SELECT {DETAILS_COLUMNS}
            FROM books b
            JOIN authors a ON a.id = b.author_id
            JOIN users o ON o.id = b.owner_id
            WHERE b.owner_id = $1
            ORDER BY b.title, b.id
            "#
        );

        let rows = sqlx::query_as::<_, BookDetailsRow>(&query)
            .bind(owner_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(|row| row.into_details(owner_id)).collect())
    }

    /// Create a book owned by `owner_id`
    pub async fn create(&self, owner_id: i32, data: &CreateBook) -> AppResult<Book> {
        let book = sqlx::query_as::<_, Book>(
            "INSERT INTO books (author_id, owner_id, title) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(data.author_id)
        .bind(owner_id)
        .bind(data.title.trim())
        .fetch_one(&self.pool)
        .await?;
        Ok(book)
    }

    /// Update a book, leaving missing fields unchanged
    pub async fn update(&self, id: i32, data: &UpdateBook) -> AppResult<Book> {
        sqlx::query_as::<_, Book>(
            r#"
            UPDATE books
            SET author_id = COALESCE($1, author_id),
                title = COALESCE($2, title)
            WHERE id = $3
            RETURNING *
            "#,
        )
        .bind(data.author_id)
        .bind(data.title.as_deref().map(str::trim))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Book {} not found", id)))
    }

    /// Delete a book; its borrowing requests go with it
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Book {} not found", id)));
        }
        Ok(())
    }
}
