//! Borrowing request endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::borrowing_request::{BorrowingRequest, BorrowingRequestDetails, BorrowingRequestQuery},
};

use super::AuthenticatedUser;

/// Ask to borrow a book
#[utoipa::path(
    post,
    path = "/books/{id}/borrow",
    tag = "borrowing",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Book ID")),
    responses(
        (status = 201, description = "Borrowing request created", body = BorrowingRequestDetails),
        (status = 404, description = "Book not found"),
        (status = 409, description = "Book already borrowed or already requested"),
        (status = 422, description = "Book belongs to the caller")
    )
)]
pub async fn borrow_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(book_id): Path<i32>,
) -> AppResult<(StatusCode, Json<BorrowingRequestDetails>)> {
    let request = state.services.borrowing.borrow(book_id, claims.user_id).await?;
    Ok((StatusCode::CREATED, Json(request)))
}

/// List every request of a book
#[utoipa::path(
    get,
    path = "/books/{id}/requests",
    tag = "borrowing",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Requests of the book", body = Vec<BorrowingRequest>),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn list_book_requests(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(book_id): Path<i32>,
) -> AppResult<Json<Vec<BorrowingRequest>>> {
    let requests = state.services.borrowing.for_book(book_id, claims.user_id).await?;
    Ok(Json(requests))
}

/// List requests made on the current user's books
#[utoipa::path(
    get,
    path = "/requests",
    tag = "borrowing",
    security(("bearer_auth" = [])),
    params(BorrowingRequestQuery),
    responses(
        (status = 200, description = "Incoming requests", body = Vec<BorrowingRequestDetails>)
    )
)]
pub async fn list_incoming_requests(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<BorrowingRequestQuery>,
) -> AppResult<Json<Vec<BorrowingRequestDetails>>> {
    let requests = state
        .services
        .borrowing
        .incoming(claims.user_id, query.status)
        .await?;
    Ok(Json(requests))
}

/// List requests made by the current user
#[utoipa::path(
    get,
    path = "/requests/mine",
    tag = "borrowing",
    security(("bearer_auth" = [])),
    params(BorrowingRequestQuery),
    responses(
        (status = 200, description = "Own requests", body = Vec<BorrowingRequestDetails>)
    )
)]
pub async fn list_my_requests(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<BorrowingRequestQuery>,
) -> AppResult<Json<Vec<BorrowingRequestDetails>>> {
    let requests = state
        .services
        .borrowing
        .outgoing(claims.user_id, query.status)
        .await?;
    Ok(Json(requests))
}

/// Get a borrowing request
#[utoipa::path(
    get,
    path = "/requests/{id}",
    tag = "borrowing",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Borrowing request ID")),
    responses(
        (status = 200, description = "Request details", body = BorrowingRequestDetails),
        (status = 404, description = "Request not found")
    )
)]
pub async fn get_request(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<BorrowingRequestDetails>> {
    let request = state.services.borrowing.get(id, claims.user_id).await?;
    Ok(Json(request))
}

/// Approve a borrowing request; other pending requests of the book are declined
#[utoipa::path(
    post,
    path = "/requests/{id}/approve",
    tag = "borrowing",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Borrowing request ID")),
    responses(
        (status = 200, description = "Request approved", body = BorrowingRequestDetails),
        (status = 403, description = "Not the book owner"),
        (status = 404, description = "Request not found"),
        (status = 409, description = "Request not pending or book already borrowed")
    )
)]
pub async fn approve_request(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<BorrowingRequestDetails>> {
    let request = state.services.borrowing.approve(id, claims.user_id).await?;
    Ok(Json(request))
}

/// Decline a borrowing request
#[utoipa::path(
    post,
    path = "/requests/{id}/decline",
    tag = "borrowing",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Borrowing request ID")),
    responses(
        (status = 200, description = "Request declined", body = BorrowingRequestDetails),
        (status = 403, description = "Not the book owner"),
        (status = 404, description = "Request not found"),
        (status = 409, description = "Request not pending")
    )
)]
pub async fn decline_request(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<BorrowingRequestDetails>> {
    let request = state.services.borrowing.decline(id, claims.user_id).await?;
    Ok(Json(request))
}
