//! Borrowing request service

use crate::{
    error::{AppError, AppResult},
    models::borrowing_request::{
        BorrowStatus, BorrowingRequest, BorrowingRequestDetails, RequestDecision,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct BorrowingService {
    repository: Repository,
}

impl BorrowingService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Ask to borrow a book
    pub async fn borrow(&self, book_id: i32, borrower_id: i32) -> AppResult<BorrowingRequestDetails> {
        let request = self.repository.borrowing_requests.borrow(book_id, borrower_id).await?;

        tracing::info!(
            request_id = request.id,
            book_id,
            borrower_id,
            "Borrowing request created"
        );

        self.repository.borrowing_requests.get_details(request.id).await
    }

    /// Get a request, visible to its borrower and to the book owner
    pub async fn get(&self, request_id: i32, viewer_id: i32) -> AppResult<BorrowingRequestDetails> {
        let request = self.repository.borrowing_requests.get_details(request_id).await?;
        if request.borrower.id != viewer_id && request.owner.id != viewer_id {
            return Err(AppError::NotFound(format!(
                "Borrowing request {} not found",
                request_id
            )));
        }
        Ok(request)
    }

    /// Every request of a book (owner only)
    pub async fn for_book(&self, book_id: i32, actor_id: i32) -> AppResult<Vec<BorrowingRequest>> {
        let book = self.repository.books.get_by_id(book_id).await?;
        if !book.is_owned_by(actor_id) {
            return Err(AppError::Authorization(
                "Only the book owner can list its borrowing requests".to_string(),
            ));
        }
        self.repository.borrowing_requests.list_for_book(book_id).await
    }

    /// Requests made on the caller's books
    pub async fn incoming(
        &self,
        owner_id: i32,
        status: Option<BorrowStatus>,
    ) -> AppResult<Vec<BorrowingRequestDetails>> {
        self.repository.borrowing_requests.list_for_owner(owner_id, status).await
    }

    /// Requests made by the caller
    pub async fn outgoing(
        &self,
        borrower_id: i32,
        status: Option<BorrowStatus>,
    ) -> AppResult<Vec<BorrowingRequestDetails>> {
        self.repository.borrowing_requests.list_for_borrower(borrower_id, status).await
    }

    /// Approve a request; other pending requests of the book get declined
    pub async fn approve(&self, request_id: i32, actor_id: i32) -> AppResult<BorrowingRequestDetails> {
        self.decide(request_id, actor_id, RequestDecision::Approve).await
    }

    /// Decline a request
    pub async fn decline(&self, request_id: i32, actor_id: i32) -> AppResult<BorrowingRequestDetails> {
        self.decide(request_id, actor_id, RequestDecision::Decline).await
    }

    async fn decide(
        &self,
        request_id: i32,
        actor_id: i32,
        decision: RequestDecision,
    ) -> AppResult<BorrowingRequestDetails> {
        let plan = self
            .repository
            .borrowing_requests
            .apply_decision(request_id, actor_id, decision)
            .await?;

        tracing::info!(
            request_id,
            owner_id = actor_id,
            status = %plan.new_status,
            declined = ?plan.declined,
            "Borrowing request handled"
        );

        self.repository.borrowing_requests.get_details(request_id).await
    }
}
