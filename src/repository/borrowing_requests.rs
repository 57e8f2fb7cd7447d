//! Borrowing requests repository
//!
//! State changes run inside a transaction that first locks the book row, so
//! concurrent borrow/approve calls on the same book are serialized.

use chrono::Utc;
use sqlx::{Pool, Postgres, Transaction};

use crate::{
    error::{AppError, AppResult},
    models::{
        book::Book,
        borrowing_request::{
            check_borrow, plan_decision, BorrowStatus, BorrowingRequest, BorrowingRequestDetails,
            BorrowingRequestDetailsRow, DecisionPlan, RequestDecision,
        },
    },
};

const DETAILS_SELECT: &str = r#"
    SELECT br.id, br.status, br.book_id, b.title AS book_title,
           br.borrower_id, u.username AS borrower_username,
           b.owner_id, o.username AS owner_username,
           br.created_at, br.updated_at
    FROM borrowing_requests br
    JOIN books b ON b.id = br.book_id
    JOIN users u ON u.id = br.borrower_id
    JOIN users o ON o.id = b.owner_id
"#;

#[derive(Clone)]
pub struct BorrowingRequestsRepository {
    pool: Pool<Postgres>,
}

impl BorrowingRequestsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get borrowing request with book, borrower and owner
    pub async fn get_details(&self, id: i32) -> AppResult<BorrowingRequestDetails> {
        let query = format!("{DETAILS_SELECT} WHERE br.id = $1");
        sqlx::query_as::<_, BorrowingRequestDetailsRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(Into::into)
            .ok_or_else(|| AppError::NotFound(format!("Borrowing request {} not found", id)))
    }

    /// All requests of a book, oldest first
    pub async fn list_for_book(&self, book_id: i32) -> AppResult<Vec<BorrowingRequest>> {
        let requests = sqlx::query_as::<_, BorrowingRequest>(
            "SELECT * FROM borrowing_requests WHERE book_id = $1 ORDER BY created_at, id",
        )
        .bind(book_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(requests)
    }

    /// Requests made on books owned by `owner_id`
    pub async fn list_for_owner(
        &self,
        owner_id: i32,
        status: Option<BorrowStatus>,
    ) -> AppResult<Vec<BorrowingRequestDetails>> {
        let query = format!(
            "{DETAILS_SELECT} WHERE b.owner_id = $1 AND ($2::smallint IS NULL OR br.status = $2) \
             ORDER BY br.created_at DESC, br.id DESC"
        );
        let rows = sqlx::query_as::<_, BorrowingRequestDetailsRow>(&query)
            .bind(owner_id)
            .bind(status)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Requests made by `borrower_id`
    pub async fn list_for_borrower(
        &self,
        borrower_id: i32,
        status: Option<BorrowStatus>,
    ) -> AppResult<Vec<BorrowingRequestDetails>> {
        let query = format!(
            "{DETAILS_SELECT} WHERE br.borrower_id = $1 AND ($2::smallint IS NULL OR br.status = $2) \
             ORDER BY br.created_at DESC, br.id DESC"
        );
        let rows = sqlx::query_as::<_, BorrowingRequestDetailsRow>(&query)
            .bind(borrower_id)
            .bind(status)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Open a pending request on `book_id` for `borrower_id`
    pub async fn borrow(&self, book_id: i32, borrower_id: i32) -> AppResult<BorrowingRequest> {
        let mut tx = self.pool.begin().await?;

        let book = lock_book(&mut tx, book_id).await?;
        let requests = requests_for_book(&mut tx, book_id).await?;

        check_borrow(&book, borrower_id, &requests)?;

        let request = sqlx::query_as::<_, BorrowingRequest>(
            r#"
            INSERT INTO borrowing_requests (book_id, borrower_id, status)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(book_id)
        .bind(borrower_id)
        .bind(BorrowStatus::Pending)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| AppError::from_unique_violation(e, "You already requested this book"))?;

        tx.commit().await?;
        Ok(request)
    }

    /// Approve or decline `request_id` on behalf of `actor_id`.
    ///
    /// An approval declines every other pending request of the book in the same transaction.
    pub async fn apply_decision(
        &self,
        request_id: i32,
        actor_id: i32,
        decision: RequestDecision,
    ) -> AppResult<DecisionPlan> {
        let book_id: i32 = sqlx::query_scalar("SELECT book_id FROM borrowing_requests WHERE id = $1")
            .bind(request_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Borrowing request {} not found", request_id)))?;

        let mut tx = self.pool.begin().await?;

        let book = lock_book(&mut tx, book_id).await?;
        let requests = requests_for_book(&mut tx, book_id).await?;

        let plan = plan_decision(&book, actor_id, request_id, &requests, decision)?;
        let now = Utc::now();

        // Siblings are declined before the approval is written
        if !plan.declined.is_empty() {
            sqlx::query(
                r#"
                UPDATE borrowing_requests SET status = $1, updated_at = $2
                WHERE id = ANY($3) AND status = $4
                "#,
            )
            .bind(BorrowStatus::Declined)
            .bind(now)
            .bind(plan.declined.as_slice())
            .bind(BorrowStatus::Pending)
            .execute(&mut *tx)
            .await?;
        }

        sqlx::query("UPDATE borrowing_requests SET status = $1, updated_at = $2 WHERE id = $3")
            .bind(plan.new_status)
            .bind(now)
            .bind(plan.request_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::from_unique_violation(e, "Book is already borrowed"))?;

        tx.commit().await?;
        Ok(plan)
    }
}

async fn lock_book(tx: &mut Transaction<'_, Postgres>, book_id: i32) -> AppResult<Book> {
    sqlx::query_as::<_, Book>("SELECT * FROM books WHERE id = $1 FOR UPDATE")
        .bind(book_id)
        .fetch_optional(&mut **tx)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Book {} not found", book_id)))
}

async fn requests_for_book(
    tx: &mut Transaction<'_, Postgres>,
    book_id: i32,
) -> AppResult<Vec<BorrowingRequest>> {
    let requests = sqlx::query_as::<_, BorrowingRequest>(
        "SELECT * FROM borrowing_requests WHERE book_id = $1 ORDER BY created_at, id",
    )
    .bind(book_id)
    .fetch_all(&mut **tx)
    .await?;
    Ok(requests)
}
